// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The sequence engine: a repeatable, seekable, cascade-capable stream of
//! pseudo-random blocks built on [`crate::hash::block_hash`].

use crate::error::Error;
use crate::hash::{block_hash, block_hash_cascade};
use crate::seed::Seed;
use crate::snapshot::Snapshot;

/// A repeatable, seekable pseudo-random sequence.
///
/// Every draw is, at bottom, a call to the pure block hash keyed by
/// `(seed_hash, index)`: restoring a snapshot and redrawing reproduces
/// exactly the same values (I1), and the engine never holds any state a
/// snapshot doesn't capture (I2) except the transient cascade stack, which
/// is why cascading forbids snapshotting.
#[derive(Debug, Clone)]
pub struct SequenceEngine {
    seed: Seed,
    seed_hash: u64,
    index: u64,
    /// One entry per open cascade level; the value is that level's private
    /// sub-index, incremented on every draw made at that depth. Empty when
    /// flat (not cascading).
    cascade_stack: Vec<u64>,
}

impl SequenceEngine {
    /// Construct a new engine from a seed, starting at index 0.
    pub fn new(seed: impl Into<Seed>) -> Self {
        let seed = seed.into();
        let seed_hash = seed.hash64();
        trace!("new sequence engine, seed_hash={seed_hash:#x}");
        SequenceEngine { seed, seed_hash, index: 0, cascade_stack: Vec::new() }
    }

    /// True while inside one or more nested [`cascade`](Self::cascade) calls.
    pub fn is_cascading(&self) -> bool {
        !self.cascade_stack.is_empty()
    }

    fn ensure_flat(&self, what: &str) -> Result<(), Error> {
        if self.is_cascading() {
            return Err(Error::mode(format!("{what} is not allowed while cascading")));
        }
        Ok(())
    }

    /// The seed this engine was constructed or most recently reseeded with.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// The 64-bit digest of [`Self::seed`] that actually feeds the block hash.
    pub fn seed_hash(&self) -> u64 {
        self.seed_hash
    }

    /// Replace the seed and rewind to index 0. Rejected while cascading.
    pub fn reseed(&mut self, seed: impl Into<Seed>) -> Result<(), Error> {
        self.ensure_flat("reseed")?;
        let seed = seed.into();
        self.seed_hash = seed.hash64();
        self.seed = seed;
        self.index = 0;
        Ok(())
    }

    /// Rewind to index 0 without changing the seed. Rejected while cascading.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.ensure_flat("reset")?;
        self.index = 0;
        Ok(())
    }

    /// The current outer index. Rejected while cascading, since the outer
    /// index is frozen for the duration of the cascade and reading it out
    /// would suggest it's meaningful to do so mid-cascade.
    pub fn index(&self) -> Result<u64, Error> {
        self.ensure_flat("reading index")?;
        Ok(self.index)
    }

    /// Seek to an arbitrary index, forward or backward. Rejected while
    /// cascading.
    pub fn set_index(&mut self, index: u64) -> Result<(), Error> {
        self.ensure_flat("setting index")?;
        self.index = index;
        Ok(())
    }

    /// Capture `(seed, seed_hash, index)`. Rejected while cascading: there is
    /// no cascade-stack slot in a [`Snapshot`] to restore into.
    pub fn snapshot(&self) -> Result<Snapshot, Error> {
        self.ensure_flat("snapshot")?;
        Ok(Snapshot { seed: self.seed.clone(), seed_hash: self.seed_hash, index: self.index })
    }

    /// Restore a previously captured snapshot. Rejected while cascading.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), Error> {
        self.ensure_flat("restore")?;
        self.seed = snapshot.seed.clone();
        self.seed_hash = snapshot.seed_hash;
        self.index = snapshot.index;
        Ok(())
    }

    /// Draw the next raw 64-bit block and advance position by one, whether
    /// that means the outer index (flat) or the innermost cascade's private
    /// sub-index (cascading).
    pub fn next_block(&mut self) -> u64 {
        match self.cascade_stack.last().copied() {
            None => {
                let block = block_hash(self.seed_hash, self.index);
                self.index = self.index.wrapping_add(1);
                block
            }
            Some(sub_index) => {
                let depth = self.cascade_stack.len() as u32;
                let block = block_hash_cascade(self.seed_hash, self.index, depth, sub_index);
                *self.cascade_stack.last_mut().unwrap() = sub_index.wrapping_add(1);
                block
            }
        }
    }

    /// A uniform draw in `[0, 1)` with 53 bits of precision, matching the
    /// double-precision mantissa width (`random()` in spec.md §4).
    pub fn random(&mut self) -> f64 {
        let block = self.next_block();
        (block >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// `n` bytes of raw block output, little-endian, truncated out of the
    /// last block if `n` isn't a multiple of 8.
    pub fn randbytes(&mut self, n: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            let block = self.next_block();
            let remaining = n - out.len();
            out.extend_from_slice(&block.to_le_bytes()[..remaining.min(8)]);
        }
        out
    }

    /// `k` uniformly distributed random bits as a `u128`.
    ///
    /// Bounded at 128 bits (two cascaded 64-bit blocks) rather than Python's
    /// arbitrary precision: nothing in this crate ever needs more than two
    /// blocks worth of randomness for a single draw, and adding a bignum
    /// dependency purely to accept `k > 128` would buy nothing.
    pub fn getrandbits(&mut self, k: i64) -> Result<u128, Error> {
        if k <= 0 {
            // Still consumes a block, matching the "every draw costs exactly
            // one index/sub-index step" invariant even for a degenerate ask.
            self.next_block();
            return Ok(0);
        }
        if k > 128 {
            return Err(Error::value(format!("getrandbits supports at most 128 bits, got {k}")));
        }
        if k <= 64 {
            let block = self.next_block();
            let mask = if k == 64 { u64::MAX } else { (1u64 << k) - 1 };
            return Ok((block & mask) as u128);
        }
        let mut c = self.cascade();
        let low = c.next_block();
        let high_bits = k - 64;
        let high_block = c.next_block();
        let high_mask = if high_bits == 64 { u64::MAX } else { (1u64 << high_bits) - 1 };
        let high = (high_block & high_mask) as u128;
        Ok((high << 64) | low as u128)
    }

    /// Enter a cascade: opens a frozen sub-stream keyed off the current
    /// outer index. The outer index does not move until the returned guard
    /// is dropped, at which point it advances by exactly one regardless of
    /// how many draws were made inside (I3).
    ///
    /// Nested cascades are allowed; each nesting level gets its own
    /// independent sub-index space (`test_cascade_indices` in the reference
    /// suite this crate's cascade semantics were reverse-engineered from).
    pub fn cascade(&mut self) -> CascadeGuard<'_> {
        trace!("entering cascade at depth {}", self.cascade_stack.len() + 1);
        self.cascade_stack.push(0);
        CascadeGuard { engine: self }
    }
}

/// RAII guard for a cascade scope, returned by [`SequenceEngine::cascade`].
///
/// Dropping the guard — falling out of scope, including via an early
/// `return` or a panic unwind — releases the cascade and advances the outer
/// index by one. There is no explicit "exit cascade" method; scope is the
/// only way out, by design (spec.md §9's redesign note: this stood in for a
/// context-manager `__exit__` in the system this crate's behavior was
/// modeled on).
pub struct CascadeGuard<'a> {
    engine: &'a mut SequenceEngine,
}

impl<'a> std::ops::Deref for CascadeGuard<'a> {
    type Target = SequenceEngine;
    fn deref(&self) -> &SequenceEngine {
        self.engine
    }
}

impl<'a> std::ops::DerefMut for CascadeGuard<'a> {
    fn deref_mut(&mut self) -> &mut SequenceEngine {
        self.engine
    }
}

impl<'a> Drop for CascadeGuard<'a> {
    fn drop(&mut self) {
        self.engine.cascade_stack.pop();
        if self.engine.cascade_stack.is_empty() {
            self.engine.index = self.engine.index.wrapping_add(1);
        }
        trace!("left cascade, outer index now {}", self.engine.index);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn random_is_reproducible_from_same_seed() {
        let mut a = SequenceEngine::new(7i64);
        let mut b = SequenceEngine::new(7i64);
        let xs: Vec<f64> = (0..10).map(|_| a.random()).collect();
        let ys: Vec<f64> = (0..10).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn random_is_in_unit_interval() {
        let mut e = SequenceEngine::new(1i64);
        for _ in 0..1000 {
            let x = e.random();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn snapshot_restore_reproduces_future_draws() {
        let mut e = SequenceEngine::new("hello");
        e.random();
        e.random();
        let snap = e.snapshot().unwrap();
        let next_three: Vec<f64> = (0..3).map(|_| e.random()).collect();
        e.restore(&snap).unwrap();
        let replay: Vec<f64> = (0..3).map(|_| e.random()).collect();
        assert_eq!(next_three, replay);
    }

    #[test]
    fn set_index_rewinds() {
        let mut e = SequenceEngine::new(42i64);
        let first = e.random();
        e.set_index(0).unwrap();
        let replay = e.random();
        assert_eq!(first, replay);
    }

    #[test]
    fn reset_rewinds_to_zero_without_changing_seed() {
        let mut e = SequenceEngine::new(42i64);
        e.random();
        e.random();
        let seed_hash_before = e.seed_hash();
        e.reset().unwrap();
        assert_eq!(e.index().unwrap(), 0);
        assert_eq!(e.seed_hash(), seed_hash_before);
    }

    #[test]
    fn reseed_rewinds_and_changes_stream() {
        let mut e = SequenceEngine::new(1i64);
        let a = e.random();
        e.reseed(2i64).unwrap();
        assert_eq!(e.index().unwrap(), 0);
        let b = e.random();
        assert_ne!(a, b);
    }

    #[test]
    fn cascade_advances_outer_index_by_exactly_one() {
        let mut e = SequenceEngine::new(5i64);
        let before = e.index().unwrap();
        {
            let mut c = e.cascade();
            c.random();
            c.random();
            c.random();
            c.random();
        }
        assert_eq!(e.index().unwrap(), before + 1);
    }

    #[test]
    fn cascade_draws_are_isolated_from_outer_stream() {
        let mut plain = SequenceEngine::new(9i64);
        let plain_next = plain.random();

        let mut cascading = SequenceEngine::new(9i64);
        let inside = {
            let mut c = cascading.cascade();
            c.random()
        };
        assert_ne!(plain_next, inside);
    }

    #[test]
    fn nested_cascades_have_independent_sub_indices() {
        let mut e = SequenceEngine::new(3i64);
        let (outer_level, inner_level);
        {
            let mut c1 = e.cascade();
            outer_level = c1.random();
            {
                let mut c2 = c1.cascade();
                inner_level = c2.random();
            }
        }
        assert_ne!(outer_level, inner_level);
    }

    #[test]
    fn operations_forbidden_while_cascading() {
        let mut e = SequenceEngine::new(1i64);
        let mut c = e.cascade();
        assert!(matches!(c.index(), Err(Error::ModeViolation(_))));
        assert!(matches!(c.reset(), Err(Error::ModeViolation(_))));
        assert!(matches!(c.reseed(2i64), Err(Error::ModeViolation(_))));
        assert!(matches!(c.snapshot(), Err(Error::ModeViolation(_))));
    }

    #[test]
    fn getrandbits_zero_or_negative_is_zero_and_advances() {
        let mut e = SequenceEngine::new(1i64);
        assert_eq!(e.getrandbits(0).unwrap(), 0);
        assert_eq!(e.index().unwrap(), 1);
        assert_eq!(e.getrandbits(-5).unwrap(), 0);
        assert_eq!(e.index().unwrap(), 2);
    }

    #[test]
    fn getrandbits_masks_to_requested_width() {
        let mut e = SequenceEngine::new(1i64);
        let bits = e.getrandbits(5).unwrap();
        assert!(bits < 32);
    }

    #[test]
    fn getrandbits_above_64_consumes_two_blocks_under_one_cascade() {
        let mut e = SequenceEngine::new(1i64);
        let before = e.index().unwrap();
        let bits = e.getrandbits(100).unwrap();
        assert_eq!(e.index().unwrap(), before + 1);
        assert!(bits < (1u128 << 100));
    }

    #[test]
    fn getrandbits_rejects_over_128() {
        let mut e = SequenceEngine::new(1i64);
        assert!(matches!(e.getrandbits(129), Err(Error::ValueRejected(_))));
    }

    #[test]
    fn randbytes_length_matches_request() {
        let mut e = SequenceEngine::new(1i64);
        assert_eq!(e.randbytes(0).len(), 0);
        assert_eq!(e.randbytes(5).len(), 5);
        assert_eq!(e.randbytes(16).len(), 16);
        assert_eq!(e.randbytes(17).len(), 17);
    }
}
