// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The distribution catalog: a closed set of sampleable, serializable
//! probability distributions, each dispatchable over anything implementing
//! [`Generator`](crate::capability::Generator).

use std::fmt;

use serde_json::{json, Map, Value};

use crate::capability::Generator;
use crate::error::Error;

pub mod parse;

/// A weighted categorical population entry: a value paired with the
/// cumulative weight of itself and everything before it.
pub type WeightedItem = (Value, f64);

/// The closed set of distribution variants (spec.md §6).
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Constant { value: Value },
    Uniform { min_val: f64, max_val: f64 },
    DiscreteUniform { min_val: i64, max_val: i64 },
    Geometric { mean: f64, include_zero: bool },
    FiniteGeometric { s: f64, n: u64 },
    ZipfMandelbrot { s: f64, q: f64, n: u64 },
    Gamma { alpha: f64, beta: f64 },
    Triangular { low: f64, high: f64, mode: Option<f64> },
    UniformProduct { n: u64 },
    LogNormal { mu: f64, sigma: f64 },
    Exponential { lambd: f64 },
    VonMises { mu: f64, kappa: f64 },
    Beta { alpha: f64, beta: f64 },
    Pareto { alpha: f64 },
    Weibull { alpha: f64, beta: f64 },
    Gaussian { mu: f64, sigma: f64 },
    Bernoulli { p: f64 },
    WeightedCategorical { items: Vec<WeightedItem> },
    UniformCategorical { population: Vec<Value> },
    FiniteGeometricCategorical { population: Vec<Value>, s: f64 },
    ZipfMandelbrotCategorical { population: Vec<Value>, s: f64, q: f64 },
}

/// The uniform return type of [`Distribution::sample`]: numeric
/// distributions yield [`Sample::Float`], categoricals yield a cloned
/// [`Sample::Item`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Float(f64),
    Item(Value),
}

impl Sample {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Sample::Float(f) => Some(*f),
            Sample::Item(_) => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Sample::Float(f) => json!(f),
            Sample::Item(v) => v,
        }
    }
}

impl Distribution {
    /// The variant tag used in dict/list wire form and in [`Display`].
    pub fn tag(&self) -> &'static str {
        match self {
            Distribution::Constant { .. } => "constant",
            Distribution::Uniform { .. } => "uniform",
            Distribution::DiscreteUniform { .. } => "discreteuniform",
            Distribution::Geometric { .. } => "geometric",
            Distribution::FiniteGeometric { .. } => "finitegeometric",
            Distribution::ZipfMandelbrot { .. } => "zipfmandelbrot",
            Distribution::Gamma { .. } => "gamma",
            Distribution::Triangular { .. } => "triangular",
            Distribution::UniformProduct { .. } => "uniformproduct",
            Distribution::LogNormal { .. } => "lognormal",
            Distribution::Exponential { .. } => "exponential",
            Distribution::VonMises { .. } => "vonmises",
            Distribution::Beta { .. } => "beta",
            Distribution::Pareto { .. } => "pareto",
            Distribution::Weibull { .. } => "weibull",
            Distribution::Gaussian { .. } => "gaussian",
            Distribution::Bernoulli { .. } => "bernoulli",
            Distribution::WeightedCategorical { .. } => "weightedcategorical",
            Distribution::UniformCategorical { .. } => "uniformcategorical",
            Distribution::FiniteGeometricCategorical { .. } => "finitegeometriccategorical",
            Distribution::ZipfMandelbrotCategorical { .. } => "zipfmandelbrotcategorical",
        }
    }

    /// Validate construction-time domain constraints (spec.md §6's
    /// parameter table). Called by every `from_dict`/`from_list` path so a
    /// malformed distribution can never be built, matching the "immutable,
    /// validated-at-construction" contract of spec.md §3.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Distribution::Constant { .. } => Ok(()),
            Distribution::Uniform { min_val, max_val } => {
                require(min_val <= max_val, "uniform requires min_val <= max_val")
            }
            Distribution::DiscreteUniform { min_val, max_val } => {
                require(min_val <= max_val, "discreteuniform requires min_val <= max_val")
            }
            Distribution::Geometric { mean, include_zero } => {
                if *include_zero {
                    require(*mean > 0.0, "geometric with include_zero requires mean > 0")
                } else {
                    require(*mean > 1.0, "geometric without include_zero requires mean > 1")
                }
            }
            Distribution::FiniteGeometric { s, n } => {
                require(*n >= 1, "finitegeometric requires n >= 1")?;
                require(*s > 0.0, "finitegeometric requires s > 0")
            }
            Distribution::ZipfMandelbrot { s, q, n } => {
                require(*n >= 1, "zipfmandelbrot requires n >= 1")?;
                require(*s > 0.0, "zipfmandelbrot requires s > 0")?;
                require(*q >= 0.0, "zipfmandelbrot requires q >= 0")
            }
            Distribution::Gamma { alpha, beta } => {
                require(*alpha > 0.0, "gamma requires alpha > 0")?;
                require(*beta > 0.0, "gamma requires beta > 0")
            }
            Distribution::Triangular { low, high, mode } => {
                require(low <= high, "triangular requires low <= high")?;
                if let Some(m) = mode {
                    require(m >= low && m <= high, "triangular requires low <= mode <= high")?;
                }
                Ok(())
            }
            Distribution::UniformProduct { .. } => Ok(()),
            Distribution::LogNormal { sigma, .. } => {
                require(*sigma > 0.0, "lognormal requires sigma > 0")
            }
            Distribution::Exponential { lambd } => {
                require(*lambd != 0.0, "exponential requires lambd != 0")
            }
            Distribution::VonMises { kappa, .. } => {
                require(*kappa >= 0.0, "vonmises requires kappa >= 0")
            }
            Distribution::Beta { alpha, beta } => {
                require(*alpha > 0.0 && *beta > 0.0, "beta requires alpha > 0 and beta > 0")
            }
            Distribution::Pareto { alpha } => require(*alpha > 0.0, "pareto requires alpha > 0"),
            Distribution::Weibull { alpha, beta } => {
                require(*alpha > 0.0 && *beta > 0.0, "weibull requires alpha > 0 and beta > 0")
            }
            Distribution::Gaussian { sigma, .. } => {
                require(*sigma > 0.0, "gaussian requires sigma > 0")
            }
            Distribution::Bernoulli { p } => {
                require(*p >= 0.0 && *p <= 1.0, "bernoulli requires 0 <= p <= 1")
            }
            Distribution::WeightedCategorical { items } => {
                require(!items.is_empty(), "weightedcategorical requires a non-empty population")?;
                let mut prev = f64::NEG_INFINITY;
                for (_, cum) in items {
                    require(*cum > prev, "weightedcategorical cumulative weights must be strictly increasing")?;
                    prev = *cum;
                }
                require(prev > 0.0, "weightedcategorical cumulative weights must be positive")
            }
            Distribution::UniformCategorical { population } => {
                require(!population.is_empty(), "uniformcategorical requires a non-empty population")
            }
            Distribution::FiniteGeometricCategorical { population, s } => {
                require(!population.is_empty(), "finitegeometriccategorical requires a non-empty population")?;
                require(*s > 0.0, "finitegeometriccategorical requires s > 0")
            }
            Distribution::ZipfMandelbrotCategorical { population, s, q } => {
                require(!population.is_empty(), "zipfmandelbrotcategorical requires a non-empty population")?;
                require(*s > 0.0, "zipfmandelbrotcategorical requires s > 0")?;
                require(*q >= 0.0, "zipfmandelbrotcategorical requires q >= 0")
            }
        }
    }

    /// Draw a single sample against `gen`.
    pub fn sample<G: Generator + ?Sized>(&self, gen: &mut G) -> Result<Sample, Error> {
        self.validate()?;
        match self {
            Distribution::Constant { value } => Ok(Sample::Item(value.clone())),
            Distribution::Uniform { min_val, max_val } => {
                Ok(Sample::Float(gen.uniform(*min_val, *max_val)))
            }
            Distribution::DiscreteUniform { min_val, max_val } => {
                let v = gen.randrange(*min_val, *max_val + 1, 1)?;
                Ok(Sample::Float(v as f64))
            }
            Distribution::Geometric { mean, include_zero } => {
                Ok(Sample::Float(gen.geometric(*mean, *include_zero)? as f64))
            }
            Distribution::FiniteGeometric { s, n } => {
                Ok(Sample::Float(sample_finite_weighted(gen, *n, |k| (-s).exp().powi(k as i32))? as f64))
            }
            Distribution::ZipfMandelbrot { s, q, n } => {
                Ok(Sample::Float(sample_finite_weighted(gen, *n, |k| (k as f64 + q).powf(-s))? as f64))
            }
            Distribution::Gamma { alpha, beta } => Ok(Sample::Float(gen.gammavariate(*alpha, *beta)?)),
            Distribution::Triangular { low, high, mode } => {
                let m = mode.unwrap_or((low + high) / 2.0);
                Ok(Sample::Float(gen.triangular(*low, *high, m)?))
            }
            Distribution::UniformProduct { n } => Ok(Sample::Float(gen.uniformproduct(*n))),
            Distribution::LogNormal { mu, sigma } => Ok(Sample::Float(gen.lognormvariate(*mu, *sigma))),
            Distribution::Exponential { lambd } => Ok(Sample::Float(gen.expovariate(*lambd)?)),
            Distribution::VonMises { mu, kappa } => Ok(Sample::Float(gen.vonmisesvariate(*mu, *kappa)?)),
            Distribution::Beta { alpha, beta } => Ok(Sample::Float(gen.betavariate(*alpha, *beta)?)),
            Distribution::Pareto { alpha } => Ok(Sample::Float(gen.paretovariate(*alpha)?)),
            Distribution::Weibull { alpha, beta } => Ok(Sample::Float(gen.weibullvariate(*alpha, *beta)?)),
            Distribution::Gaussian { mu, sigma } => Ok(Sample::Float(gen.gauss(*mu, *sigma))),
            Distribution::Bernoulli { p } => {
                Ok(Sample::Float(if gen.random() < *p { 1.0 } else { 0.0 }))
            }
            Distribution::WeightedCategorical { items } => {
                let total = items.last().unwrap().1;
                let target = gen.random() * total;
                let idx = items.partition_point(|(_, cum)| *cum <= target).min(items.len() - 1);
                Ok(Sample::Item(items[idx].0.clone()))
            }
            Distribution::UniformCategorical { population } => {
                Ok(Sample::Item(gen.choice(population)?.clone()))
            }
            Distribution::FiniteGeometricCategorical { population, s } => {
                let idx = sample_finite_weighted(gen, population.len() as u64, |k| (-s).exp().powi(k as i32))?;
                Ok(Sample::Item(population[idx as usize].clone()))
            }
            Distribution::ZipfMandelbrotCategorical { population, s, q } => {
                let idx = sample_finite_weighted(gen, population.len() as u64, |k| (k as f64 + q).powf(-s))?;
                Ok(Sample::Item(population[idx as usize].clone()))
            }
        }
    }

    /// Draw `count` independent samples.
    pub fn samples<G: Generator + ?Sized>(&self, gen: &mut G, count: usize) -> Result<Vec<Sample>, Error> {
        (0..count).map(|_| self.sample(gen)).collect()
    }

    /// List wire form: `[tag, params...]` in the declared order of spec.md §6.
    pub fn to_list(&self) -> Vec<Value> {
        let mut out = vec![json!(self.tag())];
        match self {
            Distribution::Constant { value } => out.push(value.clone()),
            Distribution::Uniform { min_val, max_val } => {
                out.push(json!(min_val));
                out.push(json!(max_val));
            }
            Distribution::DiscreteUniform { min_val, max_val } => {
                out.push(json!(min_val));
                out.push(json!(max_val));
            }
            Distribution::Geometric { mean, include_zero } => {
                out.push(json!(mean));
                out.push(json!(include_zero));
            }
            Distribution::FiniteGeometric { s, n } => {
                out.push(json!(s));
                out.push(json!(n));
            }
            Distribution::ZipfMandelbrot { s, q, n } => {
                out.push(json!(s));
                out.push(json!(q));
                out.push(json!(n));
            }
            Distribution::Gamma { alpha, beta } => {
                out.push(json!(alpha));
                out.push(json!(beta));
            }
            Distribution::Triangular { low, high, mode } => {
                out.push(json!(low));
                out.push(json!(high));
                if let Some(m) = mode {
                    out.push(json!(m));
                }
            }
            Distribution::UniformProduct { n } => out.push(json!(n)),
            Distribution::LogNormal { mu, sigma } => {
                out.push(json!(mu));
                out.push(json!(sigma));
            }
            Distribution::Exponential { lambd } => out.push(json!(lambd)),
            Distribution::VonMises { mu, kappa } => {
                out.push(json!(mu));
                out.push(json!(kappa));
            }
            Distribution::Beta { alpha, beta } => {
                out.push(json!(alpha));
                out.push(json!(beta));
            }
            Distribution::Pareto { alpha } => out.push(json!(alpha)),
            Distribution::Weibull { alpha, beta } => {
                out.push(json!(alpha));
                out.push(json!(beta));
            }
            Distribution::Gaussian { mu, sigma } => {
                out.push(json!(mu));
                out.push(json!(sigma));
            }
            Distribution::Bernoulli { p } => out.push(json!(p)),
            Distribution::WeightedCategorical { items } => {
                out.push(Value::Array(
                    items.iter().map(|(v, w)| json!([v, w])).collect(),
                ));
            }
            Distribution::UniformCategorical { population } => {
                out.push(Value::Array(population.clone()))
            }
            Distribution::FiniteGeometricCategorical { population, s } => {
                out.push(Value::Array(population.clone()));
                out.push(json!(s));
            }
            Distribution::ZipfMandelbrotCategorical { population, s, q } => {
                out.push(Value::Array(population.clone()));
                out.push(json!(s));
                out.push(json!(q));
            }
        }
        out
    }

    /// Dict wire form: `{"distribution": tag, ...params}`.
    pub fn to_dict(&self) -> Value {
        let mut map = Map::new();
        map.insert("distribution".into(), json!(self.tag()));
        insert_named_params(&mut map, self);
        Value::Object(map)
    }

    /// Reconstruct from list wire form.
    pub fn from_list(items: &[Value]) -> Result<Self, Error> {
        let tag = items
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| Error::kind_type("distribution list must start with a string tag"))?;
        let params = &items[1.min(items.len())..];
        from_tag_and_params(tag, params)
    }

    /// Reconstruct from dict wire form.
    pub fn from_dict(value: &Value) -> Result<Self, Error> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::kind_type("distribution dict must be an object"))?;
        let tag = obj
            .get("distribution")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::kind_type("distribution dict missing string 'distribution' key"))?;
        from_tag_and_fields(tag, obj)
    }
}

fn require(cond: bool, msg: &str) -> Result<(), Error> {
    if cond {
        Ok(())
    } else {
        Err(Error::value(msg))
    }
}

/// Shared CDF-walk used by the non-categorical and categorical finite
/// weighted variants (`finitegeometric`, `zipfmandelbrot`, and their
/// categorical counterparts): builds the weight table for `n` buckets from
/// `weight_of(k)` and walks it against a single `random()` draw.
fn sample_finite_weighted<G: Generator + ?Sized>(
    gen: &mut G,
    n: u64,
    weight_of: impl Fn(u64) -> f64,
) -> Result<u64, Error> {
    if n == 0 {
        return Err(Error::value("finite weighted sampling requires n >= 1"));
    }
    if n == 1 {
        let _ = gen.random();
        return Ok(0);
    }
    let weights: Vec<f64> = (0..n).map(&weight_of).collect();
    let total: f64 = weights.iter().sum();
    let target = gen.random() * total;
    let mut acc = 0.0;
    for (k, w) in weights.iter().enumerate() {
        acc += w;
        if target < acc {
            return Ok(k as u64);
        }
    }
    Ok(n - 1)
}

fn insert_named_params(map: &mut Map<String, Value>, d: &Distribution) {
    match d {
        Distribution::Constant { value } => {
            map.insert("value".into(), value.clone());
        }
        Distribution::Uniform { min_val, max_val } => {
            map.insert("min_val".into(), json!(min_val));
            map.insert("max_val".into(), json!(max_val));
        }
        Distribution::DiscreteUniform { min_val, max_val } => {
            map.insert("min_val".into(), json!(min_val));
            map.insert("max_val".into(), json!(max_val));
        }
        Distribution::Geometric { mean, include_zero } => {
            map.insert("mean".into(), json!(mean));
            map.insert("include_zero".into(), json!(include_zero));
        }
        Distribution::FiniteGeometric { s, n } => {
            map.insert("s".into(), json!(s));
            map.insert("n".into(), json!(n));
        }
        Distribution::ZipfMandelbrot { s, q, n } => {
            map.insert("s".into(), json!(s));
            map.insert("q".into(), json!(q));
            map.insert("n".into(), json!(n));
        }
        Distribution::Gamma { alpha, beta } => {
            map.insert("alpha".into(), json!(alpha));
            map.insert("beta".into(), json!(beta));
        }
        Distribution::Triangular { low, high, mode } => {
            map.insert("low".into(), json!(low));
            map.insert("high".into(), json!(high));
            if let Some(m) = mode {
                map.insert("mode".into(), json!(m));
            }
        }
        Distribution::UniformProduct { n } => {
            map.insert("n".into(), json!(n));
        }
        Distribution::LogNormal { mu, sigma } => {
            map.insert("mu".into(), json!(mu));
            map.insert("sigma".into(), json!(sigma));
        }
        Distribution::Exponential { lambd } => {
            map.insert("lambd".into(), json!(lambd));
        }
        Distribution::VonMises { mu, kappa } => {
            map.insert("mu".into(), json!(mu));
            map.insert("kappa".into(), json!(kappa));
        }
        Distribution::Beta { alpha, beta } => {
            map.insert("alpha".into(), json!(alpha));
            map.insert("beta".into(), json!(beta));
        }
        Distribution::Pareto { alpha } => {
            map.insert("alpha".into(), json!(alpha));
        }
        Distribution::Weibull { alpha, beta } => {
            map.insert("alpha".into(), json!(alpha));
            map.insert("beta".into(), json!(beta));
        }
        Distribution::Gaussian { mu, sigma } => {
            map.insert("mu".into(), json!(mu));
            map.insert("sigma".into(), json!(sigma));
        }
        Distribution::Bernoulli { p } => {
            map.insert("p".into(), json!(p));
        }
        Distribution::WeightedCategorical { items } => {
            map.insert(
                "items".into(),
                Value::Array(items.iter().map(|(v, w)| json!([v, w])).collect()),
            );
        }
        Distribution::UniformCategorical { population } => {
            map.insert("population".into(), Value::Array(population.clone()));
        }
        Distribution::FiniteGeometricCategorical { population, s } => {
            map.insert("population".into(), Value::Array(population.clone()));
            map.insert("s".into(), json!(s));
        }
        Distribution::ZipfMandelbrotCategorical { population, s, q } => {
            map.insert("population".into(), Value::Array(population.clone()));
            map.insert("s".into(), json!(s));
            map.insert("q".into(), json!(q));
        }
    }
}

fn as_f64(v: &Value, field: &str) -> Result<f64, Error> {
    v.as_f64().ok_or_else(|| Error::kind_type(format!("'{field}' must be a number")))
}

fn as_int(v: &Value, field: &str) -> Result<i64, Error> {
    match v {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.as_i64().unwrap()),
        Value::Number(n) => {
            let f = n.as_f64().unwrap();
            if f.fract() == 0.0 {
                Ok(f as i64)
            } else {
                Err(Error::kind_type(format!("'{field}' must be an integer, got {f}")))
            }
        }
        _ => Err(Error::kind_type(format!("'{field}' must be an integer"))),
    }
}

fn as_u64(v: &Value, field: &str) -> Result<u64, Error> {
    let i = as_int(v, field)?;
    if i < 0 {
        return Err(Error::value(format!("'{field}' must be non-negative")));
    }
    Ok(i as u64)
}

fn as_bool(v: &Value, field: &str) -> Result<bool, Error> {
    v.as_bool().ok_or_else(|| Error::kind_type(format!("'{field}' must be a boolean")))
}

fn as_array<'a>(v: &'a Value, field: &str) -> Result<&'a Vec<Value>, Error> {
    v.as_array().ok_or_else(|| Error::kind_type(format!("'{field}' must be an array")))
}

fn as_f64_array(v: &Value, field: &str) -> Result<Vec<f64>, Error> {
    as_array(v, field)?.iter().map(|x| as_f64(x, field)).collect()
}

/// Normalize a `(population, weights)` pair into `items`: running sums of
/// `weights` become the ascending cumulative weights `items` stores.
fn items_from_population_and_weights(population: &[Value], weights: &[f64]) -> Result<Vec<WeightedItem>, Error> {
    if population.len() != weights.len() {
        return Err(Error::value("weightedcategorical requires population and weights of equal length"));
    }
    let mut acc = 0.0;
    let mut out = Vec::with_capacity(population.len());
    for (v, w) in population.iter().zip(weights) {
        acc += w;
        out.push((v.clone(), acc));
    }
    Ok(out)
}

/// `(population, cum_weights)` already carries ascending cumulative weights,
/// so this is a straight zip into `items`.
fn items_from_population_and_cum_weights(population: &[Value], cum_weights: &[f64]) -> Result<Vec<WeightedItem>, Error> {
    if population.len() != cum_weights.len() {
        return Err(Error::value("weightedcategorical requires population and cum_weights of equal length"));
    }
    Ok(population.iter().cloned().zip(cum_weights.iter().copied()).collect())
}

fn from_tag_and_params(tag: &str, p: &[Value]) -> Result<Distribution, Error> {
    let get = |i: usize, name: &str| -> Result<&Value, Error> {
        p.get(i).ok_or_else(|| Error::value(format!("{tag} missing parameter '{name}'")))
    };
    let d = match tag {
        "constant" => Distribution::Constant { value: get(0, "value")?.clone() },
        "uniform" => Distribution::Uniform {
            min_val: as_f64(get(0, "min_val")?, "min_val")?,
            max_val: as_f64(get(1, "max_val")?, "max_val")?,
        },
        "discreteuniform" => Distribution::DiscreteUniform {
            min_val: as_int(get(0, "min_val")?, "min_val")?,
            max_val: as_int(get(1, "max_val")?, "max_val")?,
        },
        "geometric" => Distribution::Geometric {
            mean: as_f64(get(0, "mean")?, "mean")?,
            include_zero: as_bool(get(1, "include_zero")?, "include_zero")?,
        },
        "finitegeometric" => Distribution::FiniteGeometric {
            s: as_f64(get(0, "s")?, "s")?,
            n: as_u64(get(1, "n")?, "n")?,
        },
        "zipfmandelbrot" => Distribution::ZipfMandelbrot {
            s: as_f64(get(0, "s")?, "s")?,
            q: as_f64(get(1, "q")?, "q")?,
            n: as_u64(get(2, "n")?, "n")?,
        },
        "gamma" => Distribution::Gamma {
            alpha: as_f64(get(0, "alpha")?, "alpha")?,
            beta: as_f64(get(1, "beta")?, "beta")?,
        },
        "triangular" => Distribution::Triangular {
            low: as_f64(get(0, "low")?, "low")?,
            high: as_f64(get(1, "high")?, "high")?,
            mode: p.get(2).map(|v| as_f64(v, "mode")).transpose()?,
        },
        "uniformproduct" => Distribution::UniformProduct { n: as_u64(get(0, "n")?, "n")? },
        "lognormal" => Distribution::LogNormal {
            mu: as_f64(get(0, "mu")?, "mu")?,
            sigma: as_f64(get(1, "sigma")?, "sigma")?,
        },
        "exponential" => Distribution::Exponential { lambd: as_f64(get(0, "lambd")?, "lambd")? },
        "vonmises" => Distribution::VonMises {
            mu: as_f64(get(0, "mu")?, "mu")?,
            kappa: as_f64(get(1, "kappa")?, "kappa")?,
        },
        "beta" => Distribution::Beta {
            alpha: as_f64(get(0, "alpha")?, "alpha")?,
            beta: as_f64(get(1, "beta")?, "beta")?,
        },
        "pareto" => Distribution::Pareto { alpha: as_f64(get(0, "alpha")?, "alpha")? },
        "weibull" => Distribution::Weibull {
            alpha: as_f64(get(0, "alpha")?, "alpha")?,
            beta: as_f64(get(1, "beta")?, "beta")?,
        },
        "gaussian" => Distribution::Gaussian {
            mu: as_f64(get(0, "mu")?, "mu")?,
            sigma: as_f64(get(1, "sigma")?, "sigma")?,
        },
        "bernoulli" => Distribution::Bernoulli { p: as_f64(get(0, "p")?, "p")? },
        "weightedcategorical" => {
            if p.len() <= 1 {
                let arr = as_array(get(0, "items")?, "items")?;
                Distribution::WeightedCategorical { items: parse_weighted_items(arr)? }
            } else {
                // Two-parameter list form: (population, weights). `cum_weights`
                // has no canonical positional slot of its own to distinguish it
                // from `weights`, so it's only reachable through the dict form.
                let population = as_array(get(0, "population")?, "population")?;
                let weights = as_f64_array(get(1, "weights")?, "weights")?;
                Distribution::WeightedCategorical { items: items_from_population_and_weights(population, &weights)? }
            }
        }
        "uniformcategorical" => {
            Distribution::UniformCategorical { population: as_array(get(0, "population")?, "population")?.clone() }
        }
        "finitegeometriccategorical" => Distribution::FiniteGeometricCategorical {
            population: as_array(get(0, "population")?, "population")?.clone(),
            s: as_f64(get(1, "s")?, "s")?,
        },
        "zipfmandelbrotcategorical" => Distribution::ZipfMandelbrotCategorical {
            population: as_array(get(0, "population")?, "population")?.clone(),
            s: as_f64(get(1, "s")?, "s")?,
            q: as_f64(get(2, "q")?, "q")?,
        },
        other => return Err(Error::value(format!("unknown distribution tag '{other}'"))),
    };
    d.validate()?;
    Ok(d)
}

pub(crate) fn from_tag_and_fields(tag: &str, obj: &Map<String, Value>) -> Result<Distribution, Error> {
    let get = |name: &str| -> Result<&Value, Error> {
        obj.get(name).ok_or_else(|| Error::value(format!("{tag} missing field '{name}'")))
    };
    let d = match tag {
        "constant" => Distribution::Constant { value: get("value")?.clone() },
        "uniform" => Distribution::Uniform {
            min_val: as_f64(get("min_val")?, "min_val")?,
            max_val: as_f64(get("max_val")?, "max_val")?,
        },
        "discreteuniform" => Distribution::DiscreteUniform {
            min_val: as_int(get("min_val")?, "min_val")?,
            max_val: as_int(get("max_val")?, "max_val")?,
        },
        "geometric" => Distribution::Geometric {
            mean: as_f64(get("mean")?, "mean")?,
            include_zero: as_bool(get("include_zero")?, "include_zero")?,
        },
        "finitegeometric" => Distribution::FiniteGeometric {
            s: as_f64(get("s")?, "s")?,
            n: as_u64(get("n")?, "n")?,
        },
        "zipfmandelbrot" => Distribution::ZipfMandelbrot {
            s: as_f64(get("s")?, "s")?,
            q: as_f64(get("q")?, "q")?,
            n: as_u64(get("n")?, "n")?,
        },
        "gamma" => Distribution::Gamma {
            alpha: as_f64(get("alpha")?, "alpha")?,
            beta: as_f64(get("beta")?, "beta")?,
        },
        "triangular" => Distribution::Triangular {
            low: as_f64(get("low")?, "low")?,
            high: as_f64(get("high")?, "high")?,
            mode: obj.get("mode").map(|v| as_f64(v, "mode")).transpose()?,
        },
        "uniformproduct" => Distribution::UniformProduct { n: as_u64(get("n")?, "n")? },
        "lognormal" => Distribution::LogNormal {
            mu: as_f64(get("mu")?, "mu")?,
            sigma: as_f64(get("sigma")?, "sigma")?,
        },
        "exponential" => Distribution::Exponential { lambd: as_f64(get("lambd")?, "lambd")? },
        "vonmises" => Distribution::VonMises {
            mu: as_f64(get("mu")?, "mu")?,
            kappa: as_f64(get("kappa")?, "kappa")?,
        },
        "beta" => Distribution::Beta {
            alpha: as_f64(get("alpha")?, "alpha")?,
            beta: as_f64(get("beta")?, "beta")?,
        },
        "pareto" => Distribution::Pareto { alpha: as_f64(get("alpha")?, "alpha")? },
        "weibull" => Distribution::Weibull {
            alpha: as_f64(get("alpha")?, "alpha")?,
            beta: as_f64(get("beta")?, "beta")?,
        },
        "gaussian" => Distribution::Gaussian {
            mu: as_f64(get("mu")?, "mu")?,
            sigma: as_f64(get("sigma")?, "sigma")?,
        },
        "bernoulli" => Distribution::Bernoulli { p: as_f64(get("p")?, "p")? },
        "weightedcategorical" => {
            if let Some(items_val) = obj.get("items") {
                let arr = as_array(items_val, "items")?;
                Distribution::WeightedCategorical { items: parse_weighted_items(arr)? }
            } else {
                let population = as_array(get("population")?, "population")?;
                match (obj.get("weights"), obj.get("cum_weights")) {
                    (Some(_), Some(_)) => {
                        return Err(Error::conflict("weightedcategorical accepts weights or cum_weights, not both"))
                    }
                    (Some(w), None) => {
                        let weights = as_f64_array(w, "weights")?;
                        Distribution::WeightedCategorical { items: items_from_population_and_weights(population, &weights)? }
                    }
                    (None, Some(cw)) => {
                        let cum_weights = as_f64_array(cw, "cum_weights")?;
                        Distribution::WeightedCategorical { items: items_from_population_and_cum_weights(population, &cum_weights)? }
                    }
                    (None, None) => {
                        return Err(Error::value("weightedcategorical requires 'items', or 'population' with 'weights'/'cum_weights'"))
                    }
                }
            }
        }
        "uniformcategorical" => {
            Distribution::UniformCategorical { population: as_array(get("population")?, "population")?.clone() }
        }
        "finitegeometriccategorical" => Distribution::FiniteGeometricCategorical {
            population: as_array(get("population")?, "population")?.clone(),
            s: as_f64(get("s")?, "s")?,
        },
        "zipfmandelbrotcategorical" => Distribution::ZipfMandelbrotCategorical {
            population: as_array(get("population")?, "population")?.clone(),
            s: as_f64(get("s")?, "s")?,
            q: as_f64(get("q")?, "q")?,
        },
        other => return Err(Error::value(format!("unknown distribution tag '{other}'"))),
    };
    d.validate()?;
    Ok(d)
}

fn parse_weighted_items(arr: &[Value]) -> Result<Vec<WeightedItem>, Error> {
    arr.iter()
        .map(|pair| {
            let pair = pair
                .as_array()
                .filter(|a| a.len() == 2)
                .ok_or_else(|| Error::kind_type("each weightedcategorical item must be [value, cumulative_weight]"))?;
            let weight = as_f64(&pair[1], "cumulative_weight")?;
            Ok((pair[0].clone(), weight))
        })
        .collect()
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.tag())?;
        let params = self.display_params();
        for (i, (name, value)) in params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, ")")
    }
}

impl Distribution {
    /// `(name, formatted value)` pairs in declared order, shared by
    /// [`Display`] and the hand-written parser in [`parse`].
    fn display_params(&self) -> Vec<(&'static str, String)> {
        fn num(x: f64) -> String {
            format!("{x}")
        }
        match self {
            Distribution::Constant { value } => vec![("value", value.to_string())],
            Distribution::Uniform { min_val, max_val } => {
                vec![("min_val", num(*min_val)), ("max_val", num(*max_val))]
            }
            Distribution::DiscreteUniform { min_val, max_val } => {
                vec![("min_val", min_val.to_string()), ("max_val", max_val.to_string())]
            }
            Distribution::Geometric { mean, include_zero } => {
                vec![("mean", num(*mean)), ("include_zero", include_zero.to_string())]
            }
            Distribution::FiniteGeometric { s, n } => vec![("s", num(*s)), ("n", n.to_string())],
            Distribution::ZipfMandelbrot { s, q, n } => {
                vec![("s", num(*s)), ("q", num(*q)), ("n", n.to_string())]
            }
            Distribution::Gamma { alpha, beta } => vec![("alpha", num(*alpha)), ("beta", num(*beta))],
            Distribution::Triangular { low, high, mode } => {
                let mut v = vec![("low", num(*low)), ("high", num(*high))];
                if let Some(m) = mode {
                    v.push(("mode", num(*m)));
                }
                v
            }
            Distribution::UniformProduct { n } => vec![("n", n.to_string())],
            Distribution::LogNormal { mu, sigma } => vec![("mu", num(*mu)), ("sigma", num(*sigma))],
            Distribution::Exponential { lambd } => vec![("lambd", num(*lambd))],
            Distribution::VonMises { mu, kappa } => vec![("mu", num(*mu)), ("kappa", num(*kappa))],
            Distribution::Beta { alpha, beta } => vec![("alpha", num(*alpha)), ("beta", num(*beta))],
            Distribution::Pareto { alpha } => vec![("alpha", num(*alpha))],
            Distribution::Weibull { alpha, beta } => vec![("alpha", num(*alpha)), ("beta", num(*beta))],
            Distribution::Gaussian { mu, sigma } => vec![("mu", num(*mu)), ("sigma", num(*sigma))],
            Distribution::Bernoulli { p } => vec![("p", num(*p))],
            Distribution::WeightedCategorical { items } => {
                vec![("items", Value::Array(items.iter().map(|(v, w)| json!([v, w])).collect()).to_string())]
            }
            Distribution::UniformCategorical { population } => {
                vec![("population", Value::Array(population.clone()).to_string())]
            }
            Distribution::FiniteGeometricCategorical { population, s } => {
                vec![("population", Value::Array(population.clone()).to_string()), ("s", num(*s))]
            }
            Distribution::ZipfMandelbrotCategorical { population, s, q } => {
                vec![
                    ("population", Value::Array(population.clone()).to_string()),
                    ("s", num(*s)),
                    ("q", num(*q)),
                ]
            }
        }
    }
}
