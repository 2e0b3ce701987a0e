// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The block hash: `H(seed_hash, index) -> u64`.
//!
//! This is the one pure function everything else in the crate is built on.
//! Flipping any bit of `index` (or of `seed_hash`) must flip roughly half of
//! the output bits, and the same `(seed_hash, index)` pair must always
//! produce the same block, in this process or another. The construction
//! below is a SplitMix64-family finalizer applied to the 128-bit tuple: one
//! pass gives `index` full avalanche, a second pass folds in `seed_hash` and
//! re-avalanches the combination.
//!
//! This construction is part of the on-disk contract (snapshots and streams
//! recorded with one version of this function must reproduce under a later
//! version) — changing it is a format-breaking change, not a bugfix.

/// The golden-ratio increment SplitMix64 advances its state by between draws.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// The SplitMix64 output finalizer (Steele, Lea & Flood 2014), used here as a
/// general-purpose 64-to-64 bit avalanche mixer rather than as a stateful
/// generator.
#[inline]
fn splitmix64_finalize(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// The block hash `H(seed_hash, index)`.
///
/// A pure function: calling this twice with the same arguments always
/// produces the same result, in this process, in another process, or after a
/// restored snapshot (invariants I1, I2).
#[inline]
pub fn block_hash(seed_hash: u64, index: u64) -> u64 {
    let mixed_index = splitmix64_finalize(index.wrapping_add(GOLDEN_GAMMA));
    splitmix64_finalize(seed_hash ^ mixed_index.rotate_left(32))
}

/// The cascade variant of the block hash: mixes in the cascade depth and the
/// cascade-private sub-index alongside the frozen outer `(seed_hash, index)`
/// pair, so that nested cascades at different depths or sub-positions never
/// collide with each other or with the outer stream.
#[inline]
pub fn block_hash_cascade(seed_hash: u64, index: u64, depth: u32, sub_index: u64) -> u64 {
    let base = block_hash(seed_hash, index);
    let depth_salt = GOLDEN_GAMMA.wrapping_mul(depth as u64 + 1);
    let mixed = splitmix64_finalize(base ^ sub_index.wrapping_add(depth_salt));
    splitmix64_finalize(mixed ^ (depth as u64).rotate_left(17))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pure_and_reproducible() {
        assert_eq!(block_hash(42, 7), block_hash(42, 7));
    }

    #[test]
    fn avalanches_on_index() {
        // Flipping a single bit of `index` should change roughly half the
        // output bits; we don't assert an exact count (that belongs to a
        // statistical test suite) but we do assert it's not degenerate:
        // at least a quarter and at most three quarters of the bits flip
        // for a handful of sampled bit positions.
        let base = block_hash(123456, 1000);
        for bit in [0u32, 1, 17, 33, 63] {
            let flipped = block_hash(123456, 1000 ^ (1u64 << bit));
            let hamming = (base ^ flipped).count_ones();
            assert!(
                (16..=48).contains(&hamming),
                "bit {bit}: hamming distance {hamming} out of expected avalanche range"
            );
        }
    }

    #[test]
    fn distinct_seed_hash_distinct_stream() {
        assert_ne!(block_hash(1, 0), block_hash(2, 0));
    }

    #[test]
    fn cascade_self_similar_across_depth() {
        // Two different depths with the same sub-index must not collide.
        let a = block_hash_cascade(9, 4, 1, 0);
        let b = block_hash_cascade(9, 4, 2, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn cascade_distinct_from_outer_stream() {
        let outer = block_hash(9, 4);
        let cascaded = block_hash_cascade(9, 4, 1, 0);
        assert_ne!(outer, cascaded);
    }
}
