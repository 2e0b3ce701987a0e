// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `Generator` capability trait.
//!
//! The system this crate's behavior was modeled on swaps a generator's
//! sampling methods at runtime by rebinding method pointers on an instance.
//! Rust has no equivalent of that without paying for dynamic dispatch on
//! every call, so this is redesigned as a trait with one required method —
//! [`Generator::random`] — and every specialized sampler provided as a
//! default method built purely in terms of it. A type that only has a raw
//! `[0, 1)` source gets a complete, if statistically generic, distribution
//! surface for free; [`SequenceEngine`] overrides every default with its
//! true, cascade-aware implementation.
//!
//! [`SequenceEngine`]: crate::engine::SequenceEngine

use std::f64::consts::PI;

use crate::engine::SequenceEngine;
use crate::error::Error;

/// A source of uniform `[0, 1)` draws, with a full distribution surface
/// derivable from that one primitive.
pub trait Generator {
    /// A uniform draw in `[0, 1)`. The only method implementors must supply.
    fn random(&mut self) -> f64;

    /// Uniform over `[a, b)`.
    fn uniform(&mut self, a: f64, b: f64) -> f64 {
        a + (b - a) * self.random()
    }

    /// Gaussian via the trigonometric Box-Muller transform.
    fn gauss(&mut self, mu: f64, sigma: f64) -> f64 {
        let u1 = self.random();
        let u2 = self.random();
        let r = (-2.0 * (1.0 - u1).ln()).sqrt();
        mu + sigma * r * (2.0 * PI * u2).cos()
    }

    /// Exponential with rate `lambd`.
    fn expovariate(&mut self, lambd: f64) -> Result<f64, Error> {
        if lambd == 0.0 {
            return Err(Error::value("expovariate requires lambd != 0"));
        }
        Ok(-(1.0 - self.random()).ln() / lambd)
    }

    /// An integer drawn (approximately) uniformly from `[0, n)`.
    ///
    /// Implemented here as a scaled float draw rather than rejection
    /// sampling: the generic default has no cascade to hide retries inside,
    /// so it trades perfect uniformity at the boundaries for a single,
    /// predictable call to [`Generator::random`]. [`SequenceEngine`]
    /// overrides this with true rejection sampling.
    fn below(&mut self, n: u64) -> Result<u64, Error> {
        if n == 0 {
            return Err(Error::value("below requires n > 0"));
        }
        Ok((self.random() * n as f64) as u64)
    }

    /// An item chosen uniformly from `items`.
    fn choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, Error> {
        if items.is_empty() {
            return Err(Error::index("choice from an empty sequence"));
        }
        let idx = self.below(items.len() as u64)? as usize;
        Ok(&items[idx])
    }

    /// An integer drawn from the half-open range `start..stop` by `step`.
    fn randrange(&mut self, start: i64, stop: i64, step: i64) -> Result<i64, Error> {
        if step == 0 {
            return Err(Error::value("randrange step must not be 0"));
        }
        let width = stop - start;
        let count = if step > 0 {
            if width <= 0 { 0 } else { (width + step - 1) / step }
        } else if width >= 0 {
            0
        } else {
            (-width + (-step) - 1) / (-step)
        };
        if count <= 0 {
            return Err(Error::value(format!(
                "empty range for randrange({start}, {stop}, {step})"
            )));
        }
        let offset = self.below(count as u64)? as i64;
        Ok(start + step * offset)
    }

    /// `k` items drawn with replacement, optionally weighted.
    fn choices<'a, T: Clone>(
        &mut self,
        population: &'a [T],
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
                    return Err(Error::value("weights length must match population length"));
                }
                let mut acc = 0.0;
                Some(w.iter().map(|wi| { acc += wi; acc }).collect())
            }
            (None, Some(cw)) => {
                if cw.len() != population.len() {
                    return Err(Error::value("cum_weights length must match population length"));
                }
                Some(cw.to_vec())
            }
            (None, None) => None,
        };
        let mut out = Vec::with_capacity(k);
        match cumulative {
            None => {
                for _ in 0..k {
                    let idx = self.below(population.len() as u64)? as usize;
                    out.push(population[idx].clone());
                }
            }
            Some(cum) => {
                let total = *cum.last().unwrap();
                if total <= 0.0 {
                    return Err(Error::value("choices weights must sum to a positive total"));
                }
                for _ in 0..k {
                    let target = self.random() * total;
                    let idx = cum.partition_point(|&x| x <= target).min(population.len() - 1);
                    out.push(population[idx].clone());
                }
            }
        }
        Ok(out)
    }

    /// Triangular distribution with support `[low, high]` and mode `mode`.
    fn triangular(&mut self, low: f64, high: f64, mode: f64) -> Result<f64, Error> {
        if high < low {
            return Err(Error::value("triangular requires high >= low"));
        }
        if mode < low || mode > high {
            return Err(Error::value("triangular requires low <= mode <= high"));
        }
        let u = self.random();
        let width = high - low;
        if width == 0.0 {
            return Ok(low);
        }
        let split = (mode - low) / width;
        if u <= split {
            Ok(low + (width * split * u).sqrt())
        } else {
            Ok(high - (width * (1.0 - split) * (1.0 - u)).sqrt())
        }
    }

    /// Log-normal: `exp(gauss(mu, sigma))`.
    fn lognormvariate(&mut self, mu: f64, sigma: f64) -> f64 {
        self.gauss(mu, sigma).exp()
    }

    /// Von Mises distribution via Best & Fisher (1979); `kappa == 0` is a
    /// uniform angle in `[0, 2*pi)`.
    fn vonmisesvariate(&mut self, mu: f64, kappa: f64) -> Result<f64, Error> {
        if kappa < 0.0 {
            return Err(Error::value("vonmisesvariate requires kappa >= 0"));
        }
        if kappa == 0.0 {
            return Ok(2.0 * PI * self.random());
        }
        let s = 0.5 / kappa;
        let r = s + (1.0 + s * s).sqrt();
        loop {
            let u1 = self.random();
            let z = (PI * u1).cos();
            let d = z / (r + z);
            let u2 = self.random();
            if u2 < 1.0 - d * d || u2 <= (1.0 - d) * (-d).exp() {
                let u3 = self.random();
                let sign = if u3 > 0.5 { 1.0 } else { -1.0 };
                let theta = mu + sign * (d / r).acos();
                return Ok(theta.rem_euclid(2.0 * PI));
            }
        }
    }

    /// Gamma distribution: Marsaglia-Tsang for `alpha >= 1`, Ahrens-Dieter
    /// for `0 < alpha < 1`, exponential shortcut for `alpha == 1`.
    fn gammavariate(&mut self, alpha: f64, beta: f64) -> Result<f64, Error> {
        if alpha <= 0.0 || beta <= 0.0 {
            return Err(Error::value("gammavariate requires alpha > 0 and beta > 0"));
        }
        if alpha == 1.0 {
            return self.expovariate(1.0 / beta);
        }
        if alpha < 1.0 {
            let b = 1.0 + alpha / std::f64::consts::E;
            loop {
                let p = b * self.random();
                if p <= 1.0 {
                    let x = p.powf(1.0 / alpha);
                    let u = self.random();
                    if u <= (-x).exp() {
                        return Ok(x * beta);
                    }
                } else {
                    let x = -((b - p) / alpha).ln();
                    let u = self.random();
                    if u <= x.powf(alpha - 1.0) {
                        return Ok(x * beta);
                    }
                }
            }
        }
        let d = alpha - 1.0 / 3.0;
        let c_factor = 1.0 / (9.0 * d).sqrt();
        loop {
            let (x, v) = loop {
                let u1 = self.random();
                let u2 = self.random();
                let r = (-2.0 * (1.0 - u1).ln()).sqrt();
                let z = r * (2.0 * PI * u2).cos();
                let v = (1.0 + c_factor * z).powi(3);
                if v > 0.0 {
                    break (z, v);
                }
            };
            let u = self.random();
            let x2 = x * x;
            if u < 1.0 - 0.0331 * x2 * x2 {
                return Ok(d * v * beta);
            }
            if u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
                return Ok(d * v * beta);
            }
        }
    }

    /// Beta via two gamma draws.
    fn betavariate(&mut self, alpha: f64, beta: f64) -> Result<f64, Error> {
        let y1 = self.gammavariate(alpha, 1.0)?;
        let y2 = self.gammavariate(beta, 1.0)?;
        if y1 == 0.0 && y2 == 0.0 {
            return Ok(0.0);
        }
        Ok(y1 / (y1 + y2))
    }

    /// Pareto distribution with shape `alpha > 0`.
    fn paretovariate(&mut self, alpha: f64) -> Result<f64, Error> {
        if alpha <= 0.0 {
            return Err(Error::value("paretovariate requires alpha > 0"));
        }
        Ok((1.0 - self.random()).powf(-1.0 / alpha))
    }

    /// Weibull distribution, CPython parameter order `(alpha=scale, beta=shape)`.
    fn weibullvariate(&mut self, alpha: f64, beta: f64) -> Result<f64, Error> {
        if alpha <= 0.0 || beta <= 0.0 {
            return Err(Error::value("weibullvariate requires alpha > 0 and beta > 0"));
        }
        Ok(alpha * (-(1.0 - self.random()).ln()).powf(1.0 / beta))
    }

    /// Geometric distribution by mean (see spec.md §4.3's inverse-CDF form).
    fn geometric(&mut self, mean: f64, include_zero: bool) -> Result<u64, Error> {
        if include_zero {
            if mean <= 0.0 {
                return Err(Error::value("geometric with include_zero requires mean > 0"));
            }
            let p = 1.0 / (mean + 1.0);
            let u = self.random();
            Ok(((1.0 - u).ln() / (1.0 - p).ln()).floor().max(0.0) as u64)
        } else {
            if mean <= 1.0 {
                return Err(Error::value("geometric without include_zero requires mean > 1"));
            }
            let p = 1.0 / mean;
            let u = self.random();
            Ok(((1.0 - u).ln() / (1.0 - p).ln()).ceil().max(1.0) as u64)
        }
    }

    /// Product of `n` independent `uniform[0, 1)` draws.
    fn uniformproduct(&mut self, n: u64) -> f64 {
        (0..n).fold(1.0, |acc, _| acc * self.random())
    }
}

impl Generator for SequenceEngine {
    fn random(&mut self) -> f64 {
        SequenceEngine::random(self)
    }

    fn uniform(&mut self, a: f64, b: f64) -> f64 {
        SequenceEngine::uniform(self, a, b)
    }

    fn gauss(&mut self, mu: f64, sigma: f64) -> f64 {
        SequenceEngine::gauss(self, mu, sigma)
    }

    fn expovariate(&mut self, lambd: f64) -> Result<f64, Error> {
        SequenceEngine::expovariate(self, lambd)
    }

    fn below(&mut self, n: u64) -> Result<u64, Error> {
        SequenceEngine::randbelow(self, n)
    }

    fn choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, Error> {
        if items.is_empty() {
            return Err(Error::index("choice from an empty sequence"));
        }
        let idx = SequenceEngine::choice_index(self, items.len())?;
        Ok(&items[idx])
    }

    fn randrange(&mut self, start: i64, stop: i64, step: i64) -> Result<i64, Error> {
        SequenceEngine::randrange(self, start, stop, step)
    }

    fn choices<'a, T: Clone>(
        &mut self,
        population: &'a [T],
        k: usize,
        weights: Option<&[f64]>,
        cum_weights: Option<&[f64]>,
    ) -> Result<Vec<T>, Error> {
        SequenceEngine::choices(self, population, k, weights, cum_weights)
    }

    fn triangular(&mut self, low: f64, high: f64, mode: f64) -> Result<f64, Error> {
        SequenceEngine::triangular(self, low, high, mode)
    }

    fn lognormvariate(&mut self, mu: f64, sigma: f64) -> f64 {
        SequenceEngine::lognormvariate(self, mu, sigma)
    }

    fn vonmisesvariate(&mut self, mu: f64, kappa: f64) -> Result<f64, Error> {
        SequenceEngine::vonmisesvariate(self, mu, kappa)
    }

    fn gammavariate(&mut self, alpha: f64, beta: f64) -> Result<f64, Error> {
        SequenceEngine::gammavariate(self, alpha, beta)
    }

    fn betavariate(&mut self, alpha: f64, beta: f64) -> Result<f64, Error> {
        SequenceEngine::betavariate(self, alpha, beta)
    }

    fn paretovariate(&mut self, alpha: f64) -> Result<f64, Error> {
        SequenceEngine::paretovariate(self, alpha)
    }

    fn weibullvariate(&mut self, alpha: f64, beta: f64) -> Result<f64, Error> {
        SequenceEngine::weibullvariate(self, alpha, beta)
    }

    fn geometric(&mut self, mean: f64, include_zero: bool) -> Result<u64, Error> {
        SequenceEngine::geometric(self, mean, include_zero)
    }

    fn uniformproduct(&mut self, n: u64) -> f64 {
        SequenceEngine::uniformproduct(self, n)
    }
}
