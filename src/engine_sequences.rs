// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sequence and combinatorial operations: `randbelow`, `randrange`, `randint`,
//! `choice`, `shuffle`, `sample`, `choices`.
//!
//! Every operation here that may need more than one underlying block (any
//! rejection-sampling loop) runs inside an implicit [`cascade`], so a
//! rejected draw never leaks into the outer index — only the net effect,
//! "one combinatorial operation happened", is visible from outside.
//!
//! [`cascade`]: crate::engine::SequenceEngine::cascade

use crate::engine::SequenceEngine;
use crate::error::Error;

impl SequenceEngine {
    /// Unbiased integer in `[0, n)` via rejection sampling on the smallest
    /// number of bits that cover `n`, the same scheme CPython's
    /// `Random._randbelow` uses. `n == 0` rejects.
    pub fn randbelow(&mut self, n: u64) -> Result<u64, Error> {
        if n == 0 {
            return Err(Error::value("randbelow requires n > 0"));
        }
        if n == 1 {
            return Ok(0);
        }
        let k = 64 - (n - 1).leading_zeros() as i64;
        let mut c = self.cascade();
        loop {
            let candidate = c.getrandbits(k)? as u64;
            if candidate < n {
                return Ok(candidate);
            }
        }
    }

    /// An integer drawn uniformly from the half-open range
    /// `start..stop` stepping by `step` (`step` may be negative).
    pub fn randrange(&mut self, start: i64, stop: i64, step: i64) -> Result<i64, Error> {
        if step == 0 {
            return Err(Error::value("randrange step must not be 0"));
        }
        let width = stop - start;
        let count = if step > 0 {
            if width <= 0 {
                0
            } else {
                (width + step - 1) / step
            }
        } else {
            if width >= 0 {
                0
            } else {
                (-width + (-step) - 1) / (-step)
            }
        };
        if count <= 0 {
            return Err(Error::value(format!(
                "empty range for randrange({start}, {stop}, {step})"
            )));
        }
        let offset = self.randbelow(count as u64)? as i64;
        Ok(start + step * offset)
    }

    /// An integer drawn uniformly from the closed range `a..=b`.
    pub fn randint(&mut self, a: i64, b: i64) -> Result<i64, Error> {
        self.randrange(a, b + 1, 1)
    }

    /// A uniformly chosen index into a `len`-long sequence.
    pub fn choice_index(&mut self, len: usize) -> Result<usize, Error> {
        if len == 0 {
            return Err(Error::index("choice from an empty sequence"));
        }
        Ok(self.randbelow(len as u64)? as usize)
    }

    /// An item uniformly chosen from `items`, cloned out.
    pub fn choice<T: Clone>(&mut self, items: &[T]) -> Result<T, Error> {
        let idx = self.choice_index(items.len())?;
        Ok(items[idx].clone())
    }

    /// Fisher-Yates shuffle, in place, using one cascade for the whole
    /// permutation so the outer index advances by exactly one regardless of
    /// the sequence's length.
    pub fn shuffle<T>(&mut self, items: &mut [T]) -> Result<(), Error> {
        let len = items.len();
        if len <= 1 {
            return Ok(());
        }
        let mut c = self.cascade();
        for i in (1..len).rev() {
            let k = 64 - ((i as u64 + 1) - 1).leading_zeros() as i64;
            let j = loop {
                let candidate = c.getrandbits(k)? as usize;
                if candidate <= i {
                    break candidate;
                }
            };
            items.swap(i, j);
        }
        Ok(())
    }

    /// `k` distinct items drawn without replacement from `population`,
    /// returned in draw order (not the population's original order).
    pub fn sample<T: Clone>(&mut self, population: &[T], k: usize) -> Result<Vec<T>, Error> {
        let n = population.len();
        if k > n {
            return Err(Error::value(format!(
                "sample size {k} exceeds population size {n}"
            )));
        }
        if n == 0 {
            return if k == 0 {
                Ok(Vec::new())
            } else {
                Err(Error::index("sample from an empty population"))
            };
        }
        let mut pool: Vec<usize> = (0..n).collect();
        let mut result = Vec::with_capacity(k);
        let mut c = self.cascade();
        for remaining in (1..=n).rev().take(k) {
            let bits = 64 - ((remaining as u64) - 1).leading_zeros() as i64;
            let idx = loop {
                let candidate = c.getrandbits(bits.max(1))? as usize;
                if candidate < remaining {
                    break candidate;
                }
            };
            result.push(population[pool[idx]].clone());
            pool.swap(idx, remaining - 1);
        }
        Ok(result)
    }

    /// `k` items drawn *with* replacement from `population`, optionally
    /// weighted. At most one of `weights` or `cum_weights` may be given;
    /// passing both is an [`ArgConflict`](Error::ArgConflict). Absent
    /// weights fall back to a uniform draw per item.
    pub fn choices<T: Clone>(
        &mut self,
        population: &[T],
        k: usize,
        weights: Option<&[f64]>,
        cum_weights: Option<&[f64]>,
    ) -> Result<Vec<T>, Error> {
        if population.is_empty() {
            return Err(Error::index("choices from an empty population"));
        }
        if weights.is_some() && cum_weights.is_some() {
            return Err(Error::conflict("choices accepts weights or cum_weights, not both"));
        }

        let cumulative: Option<Vec<f64>> = match (weights, cum_weights) {
            (Some(w), None) => {
                if w.len() != population.len() {
                    return Err(Error::value(
                        "weights length must match population length",
                    ));
                }
                let mut acc = 0.0;
                let mut out = Vec::with_capacity(w.len());
                for &wi in w {
                    acc += wi;
                    out.push(acc);
                }
                Some(out)
            }
            (None, Some(cw)) => {
                if cw.len() != population.len() {
                    return Err(Error::value(
                        "cum_weights length must match population length",
                    ));
                }
                Some(cw.to_vec())
            }
            (None, None) => None,
        };

        let mut out = Vec::with_capacity(k);
        let mut c = self.cascade();
        match cumulative {
            None => {
                for _ in 0..k {
                    let idx = c.choice_index(population.len())?;
                    out.push(population[idx].clone());
                }
            }
            Some(cum) => {
                let total = *cum.last().unwrap();
                if total <= 0.0 {
                    return Err(Error::value("choices weights must sum to a positive total"));
                }
                for _ in 0..k {
                    let target = c.random() * total;
                    let idx = cum.partition_point(|&x| x <= target).min(population.len() - 1);
                    out.push(population[idx].clone());
                }
            }
        }
        Ok(out)
    }
}
