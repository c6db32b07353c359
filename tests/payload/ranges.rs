//! Integration tests for SampleRange
//!
//! Tests parsing, sampling bounds, and probabilistic rounding.

use proptest::prelude::*;
use ruleweave_payload::{SampleRange, random};

#[test]
fn parse_forms() {
    let point: SampleRange = "5".parse().unwrap();
    assert!(point.is_point());

    let span: SampleRange = "5-10".parse().unwrap();
    assert!((span.start() - 5.0).abs() < f64::EPSILON);
    assert!((span.end() - 10.0).abs() < f64::EPSILON);

    let negative: SampleRange = "-3--1".parse().unwrap();
    assert!((negative.start() + 3.0).abs() < f64::EPSILON);
    assert!((negative.end() + 1.0).abs() < f64::EPSILON);

    assert!("five".parse::<SampleRange>().is_err());
}

#[test]
fn fractional_point_rounds_probabilistically() {
    let range = SampleRange::point(0.2);
    let mut rng = random::seeded(11);
    let mut ones = 0;
    for _ in 0..10_000 {
        match range.sample_int(&mut rng) {
            0 => {}
            1 => ones += 1,
            other => panic!("unexpected sample {other}"),
        }
    }
    assert!((1500..2500).contains(&ones), "ones = {ones}");
}

#[test]
fn whole_number_range_is_uniform_including_bounds() {
    let range: SampleRange = "5-10".parse().unwrap();
    let mut rng = random::seeded(7);
    let mut counts = [0usize; 6];
    for _ in 0..60_000 {
        let value = range.sample_int(&mut rng);
        assert!((5..=10).contains(&value), "out of range: {value}");
        counts[usize::try_from(value - 5).unwrap()] += 1;
    }
    for (offset, count) in counts.iter().enumerate() {
        assert!((9_000..11_000).contains(count), "{} drew {count}", offset + 5);
    }
}

#[test]
fn negative_whole_number_range_reaches_both_bounds() {
    let range: SampleRange = "-3--1".parse().unwrap();
    let mut rng = random::seeded(2);
    let draws: Vec<i64> = (0..3_000).map(|_| range.sample_int(&mut rng)).collect();
    assert!(draws.iter().all(|v| (-3..=-1).contains(v)));
    assert!(draws.contains(&-3));
    assert!(draws.contains(&-1));
}

#[test]
fn multiply_scales_both_bounds() {
    let range = SampleRange::new(2.0, 4.0).multiply(1.5);
    assert!((range.start() - 3.0).abs() < f64::EPSILON);
    assert!((range.end() - 6.0).abs() < f64::EPSILON);
}

proptest! {
    #[test]
    fn samples_stay_in_bounds(a in -100.0f64..100.0, b in -100.0f64..100.0, seed in any::<u64>()) {
        let range = SampleRange::new(a, b);
        let mut rng = random::seeded(seed);
        let value = range.sample(&mut rng);
        prop_assert!(range.contains(value));

        #[allow(clippy::cast_possible_truncation)]
        let (low, high) = (range.start().floor() as i64, range.end().ceil() as i64);
        let whole = range.sample_int(&mut rng);
        prop_assert!(low <= whole && whole <= high);
    }
}
