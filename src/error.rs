// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The error taxonomy shared by the sequence engine and the distribution
//! catalog.
//!
//! There is a single [`Error`] type rather than one type per component: every
//! fallible operation in this crate rejects for one of a small, closed set of
//! reasons, and callers generally want to match on "what kind of reject was
//! this" rather than "which module produced it".

use core::fmt;

/// Everything that can go wrong calling into this crate.
///
/// No operation that returns an `Error` mutates engine state before
/// returning it: a rejected call leaves the sequence engine's index and
/// cascade mode exactly as they were.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A parameter was outside the domain the operation requires (negative
    /// variance, an empty population, a malformed weight vector, a geometric
    /// mean that doesn't support `include_zero = false`, a zero step, and so
    /// on).
    ValueRejected(String),
    /// A value crossing a dynamically-typed boundary (JSON parameters) had
    /// the wrong shape for where it landed — e.g. a float where an integer
    /// parameter was required.
    TypeRejected(String),
    /// An index-bearing operation (`choice`, `sample`) was asked to index
    /// into something that can't support it: an empty collection, or a
    /// sample size larger than the population.
    IndexRejected(String),
    /// An operation forbidden while the engine is inside a [`cascade`] was
    /// called anyway (`reseed`, `reset`, `snapshot`, `restore`, reading or
    /// writing the index).
    ///
    /// [`cascade`]: crate::engine::SequenceEngine::cascade
    ModeViolation(String),
    /// Two mutually exclusive arguments were both supplied (e.g. `weights`
    /// and `cum_weights`).
    ArgConflict(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ValueRejected(msg) => write!(f, "value rejected: {msg}"),
            Error::TypeRejected(msg) => write!(f, "type rejected: {msg}"),
            Error::IndexRejected(msg) => write!(f, "index rejected: {msg}"),
            Error::ModeViolation(msg) => write!(f, "mode violation: {msg}"),
            Error::ArgConflict(msg) => write!(f, "argument conflict: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn value(msg: impl Into<String>) -> Self {
        Error::ValueRejected(msg.into())
    }
    pub(crate) fn kind_type(msg: impl Into<String>) -> Self {
        Error::TypeRejected(msg.into())
    }
    pub(crate) fn index(msg: impl Into<String>) -> Self {
        Error::IndexRejected(msg.into())
    }
    pub(crate) fn mode(msg: impl Into<String>) -> Self {
        Error::ModeViolation(msg.into())
    }
    pub(crate) fn conflict(msg: impl Into<String>) -> Self {
        Error::ArgConflict(msg.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_mentions_kind() {
        assert!(Error::value("bad").to_string().contains("value rejected"));
        assert!(Error::mode("bad").to_string().contains("mode violation"));
    }
}
