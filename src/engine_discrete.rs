// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Discrete distributions over non-negative integers: geometric, finite
//! geometric, Zipf-Mandelbrot, and the uniform-product helper used by a
//! couple of the categorical variants.

use crate::engine::SequenceEngine;
use crate::error::Error;

impl SequenceEngine {
    /// Geometric distribution by mean. `include_zero` selects support
    /// `{0, 1, 2, ...}` (mean must be `> 0`) or `{1, 2, 3, ...}` (mean must
    /// be `> 1`), via inverse-CDF sampling on the underlying success
    /// probability `p = 1 / mean` (resp. `1 / (mean - 1)`).
    pub fn geometric(&mut self, mean: f64, include_zero: bool) -> Result<u64, Error> {
        if include_zero {
            if mean <= 0.0 {
                return Err(Error::value("geometric with include_zero requires mean > 0"));
            }
            let p = 1.0 / (mean + 1.0);
            let u = self.random();
            Ok(((1.0 - u).ln() / (1.0 - p).ln()).floor().max(0.0) as u64)
        } else {
            if mean <= 1.0 {
                return Err(Error::value(
                    "geometric without include_zero requires mean > 1",
                ));
            }
            let p = 1.0 / mean;
            let u = self.random();
            Ok(((1.0 - u).ln() / (1.0 - p).ln()).ceil().max(1.0) as u64)
        }
    }

    /// Geometric distribution truncated to `{0, 1, ..., n-1}` with decay
    /// parameter `s > 0`; `n >= 1`.
    pub fn finitegeometric(&mut self, s: f64, n: u64) -> Result<u64, Error> {
        if n == 0 {
            return Err(Error::value("finitegeometric requires n >= 1"));
        }
        if s <= 0.0 {
            return Err(Error::value("finitegeometric requires s > 0"));
        }
        if n == 1 {
            self.next_block();
            return Ok(0);
        }
        let r = (-s).exp();
        let weights: Vec<f64> = (0..n).map(|k| r.powi(k as i32)).collect();
        let total: f64 = weights.iter().sum();
        let mut c = self.cascade();
        let target = c.random() * total;
        let mut acc = 0.0;
        for (k, w) in weights.iter().enumerate() {
            acc += w;
            if target < acc {
                return Ok(k as u64);
            }
        }
        Ok(n - 1)
    }

    /// Zipf-Mandelbrot distribution truncated to `{0, 1, ..., n-1}`: weight
    /// of `k` is proportional to `(k + q) ^ -s`. Requires `s > 0`, `q >= 0`,
    /// `n >= 1`.
    pub fn zipfmandelbrot(&mut self, s: f64, q: f64, n: u64) -> Result<u64, Error> {
        if n == 0 {
            return Err(Error::value("zipfmandelbrot requires n >= 1"));
        }
        if s <= 0.0 {
            return Err(Error::value("zipfmandelbrot requires s > 0"));
        }
        if q < 0.0 {
            return Err(Error::value("zipfmandelbrot requires q >= 0"));
        }
        if n == 1 {
            self.next_block();
            return Ok(0);
        }
        let weights: Vec<f64> = (0..n).map(|k| (k as f64 + q).powf(-s)).collect();
        let total: f64 = weights.iter().sum();
        let mut c = self.cascade();
        let target = c.random() * total;
        let mut acc = 0.0;
        for (k, w) in weights.iter().enumerate() {
            acc += w;
            if target < acc {
                return Ok(k as u64);
            }
        }
        Ok(n - 1)
    }

    /// Product of `n` independent `uniform[0, 1)` draws, all under one
    /// cascade (`n == 0` yields `1.0` and still consumes exactly one block
    /// on the outer stream).
    pub fn uniformproduct(&mut self, n: u64) -> f64 {
        if n == 0 {
            self.next_block();
            return 1.0;
        }
        let mut c = self.cascade();
        let mut product = 1.0;
        for _ in 0..n {
            product *= c.random();
        }
        product
    }
}
