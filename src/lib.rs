// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A repeatable, seekable pseudo-random sequence engine and a catalog of
//! sampleable probability distributions.
//!
//! ## Example
//!
//! ```rust
//! use seqspace::SequenceEngine;
//!
//! let mut seq = SequenceEngine::new(42i64);
//! let x: f64 = seq.random();
//! assert!((0.0..1.0).contains(&x));
//!
//! // Snapshots make any point in the stream replayable.
//! let snap = seq.snapshot().unwrap();
//! let next = seq.random();
//! seq.restore(&snap).unwrap();
//! assert_eq!(seq.random(), next);
//! ```
//!
//! # The sequence engine
//!
//! [`SequenceEngine`] is a pure function of `(seed_hash, index)`: the same
//! seed and the same index always produce the same block, in this process,
//! in another, or after a [`Snapshot`] round-trip through JSON. There is no
//! hidden state beyond what [`SequenceEngine::snapshot`] captures, except
//! while inside a [`SequenceEngine::cascade`] scope — cascading opens a
//! frozen sub-stream that the outer index does not see move until the scope
//! ends, at which point the outer index advances by exactly one regardless
//! of how many draws happened inside.
//!
//! # The distribution catalog
//!
//! [`distributions::Distribution`] is a closed, serializable set of 21
//! variants — from `constant` to `zipfmandelbrotcategorical` — each
//! dispatchable over any [`capability::Generator`]. `SequenceEngine`
//! implements `Generator` with true, cascade-aware sampling; any other
//! `random()`-only source gets every specialized distribution for free via
//! the trait's default methods.

#[cfg(feature = "log")]
#[macro_use]
extern crate log;
#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($x:tt)*) => {};
}
#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($x:tt)*) => {};
}
#[cfg(not(feature = "log"))]
macro_rules! warn {
    ($($x:tt)*) => {};
}
#[cfg(not(feature = "log"))]
macro_rules! error {
    ($($x:tt)*) => {};
}

pub mod capability;
pub mod distributions;
pub mod engine;
mod engine_continuous;
mod engine_discrete;
mod engine_sequences;
pub mod error;
pub mod seed;
pub mod snapshot;

mod hash;

pub use capability::Generator;
pub use distributions::{Distribution, Sample};
pub use engine::{CascadeGuard, SequenceEngine};
pub use error::Error;
pub use seed::Seed;
pub use snapshot::Snapshot;
