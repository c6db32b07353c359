//! Uniform sampling ranges with probabilistic rounding.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use ruleweave_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ranges narrower than this are treated as a single point.
const POINT_EPSILON: f64 = 0.001;

/// A closed range of numbers to draw rewards from.
///
/// Integer draws over whole-number bounds are uniform: `5-10` yields each of
/// `5..=10` equally often. Ranges with a fractional bound round the
/// continuous draw probabilistically instead: a draw of `2.3` yields `3`
/// with probability 0.3 and `2` otherwise. A collapsed range like `0.2`
/// therefore yields `0` most of the time and `1` occasionally, so small
/// fractional rewards still pay out on average.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleRange {
    start: f64,
    end: f64,
}

impl SampleRange {
    /// Creates a range between two bounds, in either order.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Creates a range holding a single value.
    #[must_use]
    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    /// The lower bound.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// The upper bound.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Returns true if the range holds a single value.
    #[must_use]
    pub fn is_point(&self) -> bool {
        (self.end - self.start).abs() < POINT_EPSILON
    }

    /// Returns true if `value` lies within the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value <= self.end
    }

    /// Draws a number uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.is_point() {
            self.start
        } else {
            self.start + (self.end - self.start) * rng.gen_range(0.0..1.0)
        }
    }

    /// Returns true if both bounds are whole numbers.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.start.fract() == 0.0 && self.end.fract() == 0.0
    }

    /// Draws a whole number.
    ///
    /// Whole-number bounds give a uniform draw over every integer in the
    /// range, bounds included. Otherwise the continuous draw is rounded
    /// probabilistically.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample_int<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        if self.is_integral() && !self.is_point() {
            return rng.gen_range(self.start as i64..=self.end as i64);
        }
        let value = self.sample(rng);
        round_probabilistic(rng, value)
    }

    /// Returns a new range with both bounds scaled by `factor`.
    #[must_use]
    pub fn multiply(&self, factor: f64) -> Self {
        Self::new(self.start * factor, self.end * factor)
    }
}

/// Rounds `value` down or up at random, weighted by its fractional part.
#[allow(clippy::cast_possible_truncation)]
pub fn round_probabilistic<R: Rng + ?Sized>(rng: &mut R, value: f64) -> i64 {
    let floor = value.floor();
    let fraction = value - floor;
    let round_up = fraction > 0.0 && rng.gen_bool(fraction.min(1.0));
    floor as i64 + i64::from(round_up)
}

impl fmt::Display for SampleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for SampleRange {
    type Err = Error;

    /// Parses `"5"`, `"0.5"`, `"5-10"` or `"-3--1"`.
    fn from_str(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let number = |part: &str, position: usize| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| Error::parse(format!("invalid number {part:?}: {e}"), position))
        };

        match separator(trimmed) {
            Some(at) => {
                let start = number(&trimmed[..at], 0)?;
                let end = number(&trimmed[at + 1..], at + 1)?;
                Ok(Self::new(start, end))
            }
            None => Ok(Self::point(number(trimmed, 0)?)),
        }
    }
}

/// Finds the `-` separating two bounds, skipping a leading sign and exponents.
fn separator(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    (1..bytes.len()).find(|&i| {
        if bytes[i] != b'-' {
            return false;
        }
        let before = text[..i].trim_end();
        before
            .bytes()
            .last()
            .is_some_and(|b| b.is_ascii_digit() || b == b'.')
    })
}
