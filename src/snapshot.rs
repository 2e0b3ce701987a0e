// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Snapshots: a serializable capture of `(seed, seed_hash, index)`.

use serde::{Deserialize, Serialize};

use crate::seed::Seed;

/// A point-in-time capture of a [`SequenceEngine`]'s identity and position.
///
/// `cascading` is never captured — snapshots cannot be taken from inside a
/// cascade (attempting to do so is a [`ModeViolation`]) and there is no
/// cascade state to restore.
///
/// [`SequenceEngine`]: crate::engine::SequenceEngine
/// [`ModeViolation`]: crate::error::Error::ModeViolation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The seed in its original shape.
    pub seed: Seed,
    /// The 64-bit digest of `seed`, cached so `restore` never re-hashes it.
    pub seed_hash: u64,
    /// The index the engine was at when the snapshot was taken.
    pub index: u64,
}

impl Snapshot {
    /// Encode this snapshot as a `{seed, seed_hash, index}` JSON object, the
    /// wire form spec.md §6 describes.
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "seed": serde_json::to_value(&self.seed).expect("Seed always serializes"),
            "seed_hash": self.seed_hash,
            "index": self.index,
        })
    }

    /// Decode a snapshot from its dict wire form.
    pub fn from_dict(value: &serde_json::Value) -> Result<Self, crate::error::Error> {
        let obj = value
            .as_object()
            .ok_or_else(|| crate::error::Error::kind_type("snapshot dict must be an object"))?;
        let seed_value = obj
            .get("seed")
            .ok_or_else(|| crate::error::Error::value("snapshot dict missing 'seed'"))?;
        let seed: Seed = serde_json::from_value(seed_value.clone())
            .map_err(|e| crate::error::Error::kind_type(format!("bad 'seed': {e}")))?;
        let seed_hash = obj
            .get("seed_hash")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| crate::error::Error::kind_type("'seed_hash' must be a u64"))?;
        let index = obj
            .get("index")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| crate::error::Error::kind_type("'index' must be a u64"))?;
        Ok(Snapshot { seed, seed_hash, index })
    }
}
