// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Continuous distributions drawn directly off the engine: uniform,
//! triangular, gaussian, log-normal, exponential, von Mises, gamma, beta,
//! Pareto, Weibull.

use std::f64::consts::PI;

use crate::engine::SequenceEngine;
use crate::error::Error;

impl SequenceEngine {
    /// Uniform over `[a, b)` (or `(b, a]` if `b < a`, matching CPython's
    /// `uniform`, which does not require `a <= b`).
    pub fn uniform(&mut self, a: f64, b: f64) -> f64 {
        a + (b - a) * self.random()
    }

    /// Triangular distribution with support `[low, high]` and mode `mode`.
    /// `mode` defaults to the midpoint when callers don't have one handy.
    pub fn triangular(&mut self, low: f64, high: f64, mode: f64) -> Result<f64, Error> {
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

    /// Gaussian with mean `mu` and standard deviation `sigma`, via the
    /// Box-Muller polar-free (trigonometric) method. Always consumes exactly
    /// two draws, matching the reference implementation's accounting
    /// (`test_gauss_advances_index_by_two`).
    pub fn gauss(&mut self, mu: f64, sigma: f64) -> f64 {
        let u1 = self.random();
        let u2 = self.random();
        let r = (-2.0 * (1.0 - u1).ln()).sqrt();
        mu + sigma * r * (2.0 * PI * u2).cos()
    }

    /// Log-normal: `exp(gauss(mu, sigma))`.
    pub fn lognormvariate(&mut self, mu: f64, sigma: f64) -> f64 {
        self.gauss(mu, sigma).exp()
    }

    /// Exponential with rate `lambd` (`lambd != 0`).
    pub fn expovariate(&mut self, lambd: f64) -> Result<f64, Error> {
        if lambd == 0.0 {
            return Err(Error::value("expovariate requires lambd != 0"));
        }
        Ok(-(1.0 - self.random()).ln() / lambd)
    }

    /// Von Mises distribution on the circle, mean direction `mu` (radians),
    /// concentration `kappa >= 0`. `kappa == 0` is a uniform angle in
    /// `[0, 2*pi)`; otherwise uses the Best & Fisher (1979) algorithm.
    pub fn vonmisesvariate(&mut self, mu: f64, kappa: f64) -> Result<f64, Error> {
        if kappa < 0.0 {
            return Err(Error::value("vonmisesvariate requires kappa >= 0"));
        }
        if kappa == 0.0 {
            return Ok(2.0 * PI * self.random());
        }
        let mut c = self.cascade();
        let s = 0.5 / kappa;
        let r = s + (1.0 + s * s).sqrt();
        loop {
            let u1 = c.random();
            let z = (PI * u1).cos();
            let d = z / (r + z);
            let u2 = c.random();
            if u2 < 1.0 - d * d || u2 <= (1.0 - d) * (-d).exp() {
                let u3 = c.random();
                let sign = if u3 > 0.5 { 1.0 } else { -1.0 };
                let theta = mu + sign * (d / r).acos();
                return Ok(theta.rem_euclid(2.0 * PI));
            }
        }
    }

    /// Gamma distribution with shape `alpha > 0` and scale `beta > 0`.
    /// Uses Marsaglia & Tsang (2000) for `alpha >= 1`, Ahrens & Dieter
    /// (1974) for `0 < alpha < 1`, and the plain exponential shortcut when
    /// `alpha == 1`.
    pub fn gammavariate(&mut self, alpha: f64, beta: f64) -> Result<f64, Error> {
        if alpha <= 0.0 || beta <= 0.0 {
            return Err(Error::value("gammavariate requires alpha > 0 and beta > 0"));
        }
        if alpha == 1.0 {
            return self.expovariate(1.0 / beta);
        }
        let mut c = self.cascade();
        if alpha < 1.0 {
            // Ahrens-Dieter GS algorithm.
            let b = 1.0 + alpha / std::f64::consts::E;
            loop {
                let p = b * c.random();
                if p <= 1.0 {
                    let x = p.powf(1.0 / alpha);
                    let u = c.random();
                    if u <= (-x).exp() {
                        return Ok(x * beta);
                    }
                } else {
                    let x = -((b - p) / alpha).ln();
                    let u = c.random();
                    if u <= x.powf(alpha - 1.0) {
                        return Ok(x * beta);
                    }
                }
            }
        }
        // Marsaglia-Tsang for alpha >= 1.
        let d = alpha - 1.0 / 3.0;
        let c_factor = 1.0 / (9.0 * d).sqrt();
        loop {
            let (x, v) = loop {
                let u1 = c.random();
                let u2 = c.random();
                let z = inverse_normal_cdf_approx(u1, u2);
                let v = (1.0 + c_factor * z).powi(3);
                if v > 0.0 {
                    break (z, v);
                }
            };
            let u = c.random();
            let x2 = x * x;
            if u < 1.0 - 0.0331 * x2 * x2 {
                return Ok(d * v * beta);
            }
            if u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
                return Ok(d * v * beta);
            }
        }
    }

    /// Beta distribution via two gamma draws:
    /// `Beta(a, b) = Gamma(a,1) / (Gamma(a,1) + Gamma(b,1))`.
    pub fn betavariate(&mut self, alpha: f64, beta: f64) -> Result<f64, Error> {
        let mut c = self.cascade();
        let y1 = c.gammavariate(alpha, 1.0)?;
        let y2 = c.gammavariate(beta, 1.0)?;
        if y1 == 0.0 && y2 == 0.0 {
            return Ok(0.0);
        }
        Ok(y1 / (y1 + y2))
    }

    /// Pareto distribution with shape `alpha > 0`.
    pub fn paretovariate(&mut self, alpha: f64) -> Result<f64, Error> {
        if alpha <= 0.0 {
            return Err(Error::value("paretovariate requires alpha > 0"));
        }
        Ok((1.0 - self.random()).powf(-1.0 / alpha))
    }

    /// Weibull distribution with shape `beta > 0` and scale `alpha > 0`,
    /// following CPython's `weibullvariate(alpha, beta)` parameter order.
    pub fn weibullvariate(&mut self, alpha: f64, beta: f64) -> Result<f64, Error> {
        if alpha <= 0.0 || beta <= 0.0 {
            return Err(Error::value("weibullvariate requires alpha > 0 and beta > 0"));
        }
        Ok(alpha * (-(1.0 - self.random()).ln()).powf(1.0 / beta))
    }
}

/// A Box-Muller transform used only inside `gammavariate`'s
/// Marsaglia-Tsang loop, where the method wants a raw standard normal
/// variate without the two-draws-per-call accounting `gauss` guarantees.
fn inverse_normal_cdf_approx(u1: f64, u2: f64) -> f64 {
    let r = (-2.0 * (1.0 - u1).ln()).sqrt();
    r * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn uniform_respects_bounds() {
        let mut e = SequenceEngine::new(1i64);
        for _ in 0..2000 {
            let x = e.uniform(2.0, 5.0);
            assert!((2.0..5.0).contains(&x));
        }
    }

    #[test]
    fn triangular_respects_support() {
        let mut e = SequenceEngine::new(1i64);
        for _ in 0..2000 {
            let x = e.triangular(0.0, 10.0, 3.0).unwrap();
            assert!((0.0..=10.0).contains(&x));
        }
    }

    #[test]
    fn triangular_rejects_mode_outside_support() {
        let mut e = SequenceEngine::new(1i64);
        assert!(matches!(e.triangular(0.0, 10.0, 20.0), Err(Error::ValueRejected(_))));
    }

    #[test]
    fn gauss_advances_index_by_two() {
        let mut e = SequenceEngine::new(1i64);
        let before = e.index().unwrap();
        e.gauss(0.0, 1.0);
        assert_eq!(e.index().unwrap(), before + 2);
    }

    #[test]
    fn expovariate_rejects_zero_rate() {
        let mut e = SequenceEngine::new(1i64);
        assert!(matches!(e.expovariate(0.0), Err(Error::ValueRejected(_))));
    }

    #[test]
    fn expovariate_is_nonnegative_for_positive_rate() {
        let mut e = SequenceEngine::new(1i64);
        for _ in 0..500 {
            assert!(e.expovariate(2.0).unwrap() >= 0.0);
        }
    }

    #[test]
    fn vonmises_zero_kappa_is_uniform_angle() {
        let mut e = SequenceEngine::new(1i64);
        for _ in 0..500 {
            let theta = e.vonmisesvariate(0.0, 0.0).unwrap();
            assert!((0.0..2.0 * PI).contains(&theta));
        }
    }

    #[test]
    fn vonmises_rejects_negative_kappa() {
        let mut e = SequenceEngine::new(1i64);
        assert!(matches!(e.vonmisesvariate(0.0, -1.0), Err(Error::ValueRejected(_))));
    }

    #[test]
    fn gammavariate_rejects_nonpositive_params() {
        let mut e = SequenceEngine::new(1i64);
        assert!(matches!(e.gammavariate(0.0, 1.0), Err(Error::ValueRejected(_))));
        assert!(matches!(e.gammavariate(1.0, 0.0), Err(Error::ValueRejected(_))));
    }

    #[test]
    fn gammavariate_is_positive() {
        let mut e = SequenceEngine::new(1i64);
        for alpha in [0.3, 1.0, 2.5] {
            for _ in 0..200 {
                assert!(e.gammavariate(alpha, 1.0).unwrap() > 0.0);
            }
        }
    }

    #[test]
    fn betavariate_in_unit_interval() {
        let mut e = SequenceEngine::new(1i64);
        for _ in 0..500 {
            let x = e.betavariate(2.0, 3.0).unwrap();
            assert!((0.0..=1.0).contains(&x));
        }
    }

    #[test]
    fn paretovariate_rejects_nonpositive_alpha() {
        let mut e = SequenceEngine::new(1i64);
        assert!(matches!(e.paretovariate(0.0), Err(Error::ValueRejected(_))));
    }

    #[test]
    fn paretovariate_is_at_least_one() {
        let mut e = SequenceEngine::new(1i64);
        for _ in 0..500 {
            assert!(e.paretovariate(3.0).unwrap() >= 1.0);
        }
    }

    #[test]
    fn weibullvariate_rejects_nonpositive_params() {
        let mut e = SequenceEngine::new(1i64);
        assert!(matches!(e.weibullvariate(0.0, 1.0), Err(Error::ValueRejected(_))));
        assert!(matches!(e.weibullvariate(1.0, 0.0), Err(Error::ValueRejected(_))));
    }

    #[test]
    fn weibullvariate_is_nonnegative() {
        let mut e = SequenceEngine::new(1i64);
        for _ in 0..500 {
            assert!(e.weibullvariate(1.0, 2.0).unwrap() >= 0.0);
        }
    }
}
