// Copyright 2013-2017 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// https://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cross-module integration coverage of the testable properties each
//! module's own unit tests only check in isolation, plus the boundary
//! behaviors enumerated for distribution construction and sampling.

use serde_json::json;

use seqspace::distributions::parse;
use seqspace::{Distribution, Error, Generator, Sample, SequenceEngine};

// P1: the next block at (seed, i) is a pure function of (seed_hash, i) —
// observable here as two independently constructed engines on the same seed
// producing identical blocks at every index, not just the first.
#[test]
fn p1_block_is_pure_function_of_seed_hash_and_index() {
    let mut a = SequenceEngine::new(777i64);
    let mut b = SequenceEngine::new(777i64);
    for _ in 0..50 {
        assert_eq!(a.random(), b.random());
    }
}

// P2: to_list/from_list and to_dict/from_dict round-trip for every variant
// in the catalog.
#[test]
fn p2_every_variant_round_trips_list_and_dict() {
    let samples = vec![
        Distribution::Constant { value: json!({"k": [1, 2, 3]}) },
        Distribution::Uniform { min_val: -3.0, max_val: 9.5 },
        Distribution::DiscreteUniform { min_val: -4, max_val: 10 },
        Distribution::Geometric { mean: 3.0, include_zero: true },
        Distribution::Geometric { mean: 2.0, include_zero: false },
        Distribution::FiniteGeometric { s: 0.5, n: 12 },
        Distribution::ZipfMandelbrot { s: 1.2, q: 0.5, n: 30 },
        Distribution::Gamma { alpha: 2.0, beta: 3.0 },
        Distribution::Triangular { low: 0.0, high: 5.0, mode: None },
        Distribution::Triangular { low: 0.0, high: 5.0, mode: Some(1.0) },
        Distribution::UniformProduct { n: 4 },
        Distribution::LogNormal { mu: 0.1, sigma: 0.9 },
        Distribution::Exponential { lambd: 1.5 },
        Distribution::VonMises { mu: 1.0, kappa: 2.0 },
        Distribution::Beta { alpha: 2.0, beta: 5.0 },
        Distribution::Pareto { alpha: 3.0 },
        Distribution::Weibull { alpha: 1.0, beta: 2.0 },
        Distribution::Gaussian { mu: -1.0, sigma: 2.0 },
        Distribution::Bernoulli { p: 0.3 },
        Distribution::WeightedCategorical {
            items: vec![(json!("a"), 1.0), (json!("b"), 3.0), (json!("c"), 4.0)],
        },
        Distribution::UniformCategorical { population: vec![json!(1), json!(2), json!(3)] },
        Distribution::FiniteGeometricCategorical {
            population: vec![json!("x"), json!("y")],
            s: 0.8,
        },
        Distribution::ZipfMandelbrotCategorical {
            population: vec![json!("x"), json!("y"), json!("z")],
            s: 1.1,
            q: 0.2,
        },
    ];

    for d in &samples {
        let via_list = Distribution::from_list(&d.to_list()).unwrap_or_else(|e| {
            panic!("{} failed to round-trip through list form: {e}", d.tag())
        });
        assert_eq!(*d, via_list, "{} list round-trip mismatch", d.tag());

        let via_dict = Distribution::from_dict(&d.to_dict()).unwrap_or_else(|e| {
            panic!("{} failed to round-trip through dict form: {e}", d.tag())
        });
        assert_eq!(*d, via_dict, "{} dict round-trip mismatch", d.tag());
    }
}

// P3: Display's text form parses back to an equal distribution, for every
// variant.
#[test]
fn p3_every_variant_round_trips_through_display_and_parse() {
    let samples = vec![
        Distribution::Constant { value: json!(42) },
        Distribution::Uniform { min_val: 0.0, max_val: 1.0 },
        Distribution::DiscreteUniform { min_val: 1, max_val: 6 },
        Distribution::Geometric { mean: 4.0, include_zero: true },
        Distribution::FiniteGeometric { s: 0.4, n: 8 },
        Distribution::ZipfMandelbrot { s: 1.0, q: 1.0, n: 20 },
        Distribution::Gamma { alpha: 2.0, beta: 1.0 },
        Distribution::Triangular { low: 0.0, high: 10.0, mode: Some(4.0) },
        Distribution::UniformProduct { n: 3 },
        Distribution::LogNormal { mu: 0.0, sigma: 1.0 },
        Distribution::Exponential { lambd: 2.0 },
        Distribution::VonMises { mu: 0.0, kappa: 1.0 },
        Distribution::Beta { alpha: 2.0, beta: 2.0 },
        Distribution::Pareto { alpha: 2.5 },
        Distribution::Weibull { alpha: 1.0, beta: 1.5 },
        Distribution::Gaussian { mu: 0.0, sigma: 1.0 },
        Distribution::Bernoulli { p: 0.5 },
        Distribution::WeightedCategorical {
            items: vec![(json!("a"), 2.0), (json!("b"), 5.0)],
        },
        Distribution::UniformCategorical { population: vec![json!("a"), json!("b"), json!("c")] },
        Distribution::FiniteGeometricCategorical { population: vec![json!(1), json!(2)], s: 0.5 },
        Distribution::ZipfMandelbrotCategorical {
            population: vec![json!(1), json!(2), json!(3)],
            s: 1.0,
            q: 0.0,
        },
    ];

    for d in &samples {
        let text = d.to_string();
        let back = parse::parse(&text).unwrap_or_else(|e| {
            panic!("{text:?} failed to parse back: {e}")
        });
        assert_eq!(*d, back, "round trip mismatch for {text:?}");
    }
}

// P4: any operation forbidden while cascading rejects with ModeViolation
// and leaves the outer index untouched.
#[test]
fn p4_cascade_forbidden_ops_reject_and_leave_index_untouched() {
    let mut e = SequenceEngine::new(11i64);
    e.random();
    let before = e.index().unwrap();
    {
        let mut c = e.cascade();
        assert!(matches!(c.index(), Err(Error::ModeViolation(_))));
        assert!(matches!(c.set_index(0), Err(Error::ModeViolation(_))));
        assert!(matches!(c.snapshot(), Err(Error::ModeViolation(_))));
        assert!(matches!(c.reset(), Err(Error::ModeViolation(_))));
        assert!(matches!(c.reseed(2i64), Err(Error::ModeViolation(_))));
        c.random();
    }
    assert_eq!(e.index().unwrap(), before + 1);
}

// P5: a cascade with n internal draws advances the outer index by exactly
// one, and the block drawn immediately after equals H(seed_hash, old_index+1)
// — i.e. the next flat draw picks up exactly where a non-cascading draw
// would have, as if the cascade had never happened from the outer stream's
// point of view.
#[test]
fn p5_cascade_exit_lands_on_the_next_flat_block() {
    let mut cascaded = SequenceEngine::new(23i64);
    {
        let mut c = cascaded.cascade();
        for _ in 0..7 {
            c.random();
        }
    }
    let after_cascade = cascaded.random();

    let mut flat = SequenceEngine::new(23i64);
    flat.random(); // occupies index 0, matching the one index the cascade consumed
    let after_flat = flat.random();

    assert_eq!(after_cascade, after_flat);
}

// P6: two engines built from equal seeds produce coincident block streams,
// checked at full distribution-sampling granularity rather than just raw
// random() draws.
#[test]
fn p6_equal_seeds_produce_coincident_streams_through_distributions() {
    let mut a = SequenceEngine::new("coincidence");
    let mut b = SequenceEngine::new("coincidence");
    let d = Distribution::Gamma { alpha: 2.0, beta: 1.0 };
    for _ in 0..20 {
        assert_eq!(d.sample(&mut a).unwrap(), d.sample(&mut b).unwrap());
    }
}

// P7: snapshot/restore is exact, including across a distribution sample
// that consumes a variable number of underlying blocks.
#[test]
fn p7_snapshot_restore_is_exact_across_distribution_sampling() {
    let mut e = SequenceEngine::new(99i64);
    let d = Distribution::FiniteGeometric { s: 0.3, n: 50 };
    d.sample(&mut e).unwrap();

    let snap = e.snapshot().unwrap();
    let next = d.sample(&mut e).unwrap();
    e.restore(&snap).unwrap();
    let replay = d.sample(&mut e).unwrap();
    assert_eq!(next, replay);
}

// P8: getrandbits consumes exactly one outer-index step per draw, whether
// it needs one block (k <= 64) or two cascaded blocks (64 < k <= 128) — the
// cascade collapses the two internal draws into the same one-step cost.
#[test]
fn p8_getrandbits_index_accounting_across_mixed_widths() {
    let mut e = SequenceEngine::new(1i64);
    let start = e.index().unwrap();
    e.getrandbits(1).unwrap();
    e.getrandbits(64).unwrap();
    e.getrandbits(65).unwrap();
    e.getrandbits(128).unwrap();
    assert_eq!(e.index().unwrap(), start + 1 + 1 + 1 + 1);
}

// P9: shuffle preserves the multiset of elements and consumes exactly one
// outer index regardless of length, checked at two different lengths.
#[test]
fn p9_shuffle_preserves_multiset_and_costs_one_index() {
    let mut e = SequenceEngine::new(1i64);
    for &len in &[2usize, 500] {
        let before = e.index().unwrap();
        let mut items: Vec<u32> = (0..len as u32).collect();
        let original = items.clone();
        e.shuffle(&mut items).unwrap();
        assert_eq!(e.index().unwrap(), before + 1);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, original);
    }
}

// P10: a generic Generator caller dispatches to SequenceEngine's true
// cascade-aware overrides rather than the trait's random()-only defaults.
// Proven by instrumenting a wrapper whose random() counts calls, then
// checking the specialized SequenceEngine path advances the outer index by
// exactly one for gauss (two internal draws under no cascade at the trait
// level would otherwise leak two index steps) — comparing against the
// inherent gauss's own two-draws contract run through the trait object.
#[test]
fn p10_generator_dispatch_reaches_sequence_engines_specialized_methods() {
    let mut e = SequenceEngine::new(5i64);
    let before = e.index().unwrap();
    let _ = Generator::gauss(&mut e, 0.0, 1.0);
    // SequenceEngine::gauss is not cascade-wrapped and draws exactly two
    // blocks, advancing the flat index by two — the same behavior the
    // inherent method documents, proving the trait call landed on the
    // override rather than some other path.
    assert_eq!(e.index().unwrap(), before + 2);

    let mut e2 = SequenceEngine::new(5i64);
    let before2 = e2.index().unwrap();
    let _ = Generator::betavariate(&mut e2, 2.0, 3.0).unwrap();
    // The inherent betavariate wraps both gamma draws in one cascade, so the
    // override must advance the outer index by exactly one; the generic
    // default (no cascade available at the trait level) could not do this.
    assert_eq!(e2.index().unwrap(), before2 + 1);
}

// Boundary: a non-integral bound reaching an integer-typed field over the
// dynamically-typed dict boundary rejects with TypeRejected.
#[test]
fn boundary_fractional_integer_field_is_type_rejected() {
    let dict = json!({"distribution": "discreteuniform", "min_val": 2.1, "max_val": 6});
    assert!(matches!(Distribution::from_dict(&dict), Err(Error::TypeRejected(_))));
}

// Boundary: randrange with a zero step is rejected.
#[test]
fn boundary_randrange_zero_step_is_value_rejected() {
    let mut e = SequenceEngine::new(1i64);
    assert!(matches!(e.randrange(1, 2, 0), Err(Error::ValueRejected(_))));
}

// Boundary: sampling from an empty population is IndexRejected, but
// sampling zero items from an empty population is vacuously Ok(vec![]).
#[test]
fn boundary_sample_empty_population() {
    let mut e = SequenceEngine::new(1i64);
    let empty: Vec<i32> = Vec::new();
    assert!(matches!(e.sample(&empty, 1), Err(Error::IndexRejected(_))));
    assert_eq!(e.sample(&empty, 0).unwrap(), Vec::<i32>::new());
}

// Boundary: choices with a weights vector one element too short (here, one
// item, two weights) rejects as a length mismatch.
#[test]
fn boundary_choices_weight_length_mismatch() {
    let mut e = SequenceEngine::new(1i64);
    let items = vec![1];
    let weights = [1.0, 2.0];
    assert!(matches!(
        e.choices(&items, 3, Some(&weights), None),
        Err(Error::ValueRejected(_))
    ));
}

// Boundary: pareto/weibull/gamma reject non-positive shape/scale parameters.
#[test]
fn boundary_nonpositive_shape_params_are_value_rejected() {
    let mut e = SequenceEngine::new(1i64);
    assert!(matches!(e.paretovariate(0.0), Err(Error::ValueRejected(_))));
    assert!(matches!(e.weibullvariate(1.0, 0.0), Err(Error::ValueRejected(_))));
    assert!(matches!(e.gammavariate(-1.0, -1.0), Err(Error::ValueRejected(_))));
}

// Boundary: triangular with high < low rejects; a degenerate zero-width
// triangular (low == high == mode) always returns that point.
#[test]
fn boundary_triangular_degenerate_and_inverted() {
    let mut e = SequenceEngine::new(1i64);
    assert!(matches!(e.triangular(2.0, 1.0, 1.5), Err(Error::ValueRejected(_))));
    for _ in 0..20 {
        assert_eq!(e.triangular(2.0, 2.0, 2.0).unwrap(), 2.0);
    }
}

// Distribution construction rejects out-of-domain parameters the same way
// whether they arrive via direct construction + validate() or via the
// dict/list wire boundary.
#[test]
fn distribution_validation_matches_across_construction_paths() {
    let direct = Distribution::Pareto { alpha: -1.0 };
    assert!(direct.validate().is_err());

    let via_dict = Distribution::from_dict(&json!({"distribution": "pareto", "alpha": -1.0}));
    assert!(via_dict.is_err());

    let via_list = Distribution::from_list(&[json!("pareto"), json!(-1.0)]);
    assert!(via_list.is_err());
}

// Sample::as_f64 / Sample::into_value cover both the numeric and
// categorical shapes the catalog can return.
#[test]
fn sample_shapes_distinguish_float_and_item() {
    let mut e = SequenceEngine::new(1i64);
    let numeric = Distribution::Uniform { min_val: 0.0, max_val: 1.0 }.sample(&mut e).unwrap();
    assert!(matches!(numeric, Sample::Float(_)));
    assert!(numeric.as_f64().is_some());

    let categorical = Distribution::UniformCategorical { population: vec![json!("only")] }
        .sample(&mut e)
        .unwrap();
    assert!(matches!(categorical, Sample::Item(_)));
    assert_eq!(categorical.as_f64(), None);
    assert_eq!(categorical.into_value(), json!("only"));
}
