// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A hand-written recursive-descent parser reconstructing a [`Distribution`]
//! from the text its own [`Display`](std::fmt::Display) impl produces
//! (`tag(name=value, name=value, ...)`), so `parse(repr(d)) == d` holds
//! without ever calling into a code-execution facility.

use serde_json::{Map, Value};

use super::{from_tag_and_fields, Distribution};
use crate::error::Error;

/// Parse `text` — the output of a [`Distribution`]'s `Display` impl — back
/// into a `Distribution`.
pub fn parse(text: &str) -> Result<Distribution, Error> {
    let text = text.trim();
    let open = text
        .find('(')
        .ok_or_else(|| Error::value("distribution text must have the form tag(params)"))?;
    if !text.ends_with(')') {
        return Err(Error::value("distribution text must end with ')'"));
    }
    let tag = &text[..open];
    let body = &text[open + 1..text.len() - 1];

    let mut fields = Map::new();
    for pair in split_top_level(body) {
        if pair.is_empty() {
            continue;
        }
        let eq = pair
            .find('=')
            .ok_or_else(|| Error::value(format!("malformed parameter '{pair}', expected name=value")))?;
        let name = pair[..eq].trim();
        let value_text = pair[eq + 1..].trim();
        let value: Value = serde_json::from_str(value_text)
            .map_err(|e| Error::kind_type(format!("cannot parse value for '{name}': {e}")))?;
        fields.insert(name.to_string(), value);
    }
    from_tag_and_fields(tag, &fields)
}

/// Split `s` on top-level commas, ignoring commas nested inside `[...]`,
/// `{...}`, or `"..."`.
fn split_top_level(s: &str) -> Vec<&str> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0usize;
    let mut out = Vec::new();
    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                out.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(s[start..].trim());
    out
}
