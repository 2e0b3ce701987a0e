// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Seed polymorphism: a caller's seed may be an integer, raw bytes, or text,
//! and any of the three normalizes to the same 64-bit `seed_hash` that feeds
//! the block hash.

use serde::{Deserialize, Serialize};

/// A seed in one of the three shapes a caller may supply.
///
/// Two seeds are equivalent (produce the same stream) iff [`Seed::digest`]
/// agrees, which only happens for byte-identical canonical encodings — an
/// integer seed can never collide with a bytes or text seed because the
/// canonical encoding is prefixed with a type discriminator before hashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    /// A 64-bit integer seed.
    Int(i64),
    /// A raw byte-sequence seed.
    Bytes(Vec<u8>),
    /// A text seed, hashed over its UTF-8 bytes.
    Text(String),
}

impl Seed {
    fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            Seed::Int(i) => {
                let mut buf = Vec::with_capacity(9);
                buf.push(0u8);
                buf.extend_from_slice(&i.to_le_bytes());
                buf
            }
            Seed::Bytes(b) => {
                let mut buf = Vec::with_capacity(1 + b.len());
                buf.push(1u8);
                buf.extend_from_slice(b);
                buf
            }
            Seed::Text(s) => {
                let mut buf = Vec::with_capacity(1 + s.len());
                buf.push(2u8);
                buf.extend_from_slice(s.as_bytes());
                buf
            }
        }
    }

    /// The 128-bit digest of this seed's canonical byte encoding.
    ///
    /// Only the low 64 bits ([`Seed::hash64`]) participate in block
    /// generation; the full 128 bits exist so that the digest step has
    /// comfortable collision margin independent of what a future format
    /// version decides to do with the high bits.
    pub fn digest(&self) -> u128 {
        let bytes = self.canonical_bytes();
        let lo = fnv1a64(&bytes, FNV_OFFSET_LO);
        let hi = fnv1a64(&bytes, FNV_OFFSET_HI);
        ((hi as u128) << 64) | lo as u128
    }

    /// The 64-bit `seed_hash` that is the only seed-derived quantity entering
    /// the block hash.
    pub fn hash64(&self) -> u64 {
        self.digest() as u64
    }
}

impl From<i64> for Seed {
    fn from(i: i64) -> Self {
        Seed::Int(i)
    }
}

impl From<Vec<u8>> for Seed {
    fn from(b: Vec<u8>) -> Self {
        Seed::Bytes(b)
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Seed::Text(s)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Seed::Text(s.to_string())
    }
}

// Two independent 64-bit FNV-1a offsets produce two decorrelated lanes of
// the 128-bit digest from one pass over the canonical bytes.
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
const FNV_OFFSET_LO: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_OFFSET_HI: u64 = 0x9E37_79B9_7F4A_7C15;

fn fnv1a64(bytes: &[u8], offset: u64) -> u64 {
    let mut hash = offset;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
