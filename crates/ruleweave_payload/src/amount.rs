//! The numeric payload most rules resolve to.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use ruleweave_foundation::{Error, Result};

use crate::expr::Variables;
use crate::formula::Formula;
use crate::range::{SampleRange, round_probabilistic};

/// A configured amount: either a sampling range or a formula.
#[derive(Clone, Debug, PartialEq)]
pub enum Amount {
    /// Uniform draw between two bounds.
    Range(SampleRange),
    /// Expression over per-event variables.
    Formula(Formula),
}

impl Amount {
    /// Evaluates the amount as a real number.
    ///
    /// Ranges ignore `variables`.
    ///
    /// # Errors
    /// Propagates formula evaluation errors.
    pub fn evaluate<R: Rng + ?Sized>(&self, variables: &Variables, rng: &mut R) -> Result<f64> {
        match self {
            Self::Range(range) => Ok(range.sample(rng)),
            Self::Formula(formula) => formula.evaluate(variables, rng),
        }
    }

    /// Draws a whole number.
    ///
    /// Ranges sample as [`SampleRange::sample_int`] does; formula results
    /// round probabilistically.
    ///
    /// # Errors
    /// Propagates formula evaluation errors.
    pub fn sample_int<R: Rng + ?Sized>(&self, variables: &Variables, rng: &mut R) -> Result<i64> {
        match self {
            Self::Range(range) => Ok(range.sample_int(rng)),
            Self::Formula(formula) => {
                let value = formula.evaluate(variables, rng)?;
                Ok(round_probabilistic(rng, value))
            }
        }
    }

    /// Returns a new amount scaled by `factor`.
    #[must_use]
    pub fn multiply(&self, factor: f64) -> Self {
        match self {
            Self::Range(range) => Self::Range(range.multiply(factor)),
            Self::Formula(formula) => Self::Formula(formula.multiply(factor)),
        }
    }
}

impl From<SampleRange> for Amount {
    fn from(range: SampleRange) -> Self {
        Self::Range(range)
    }
}

impl From<Formula> for Amount {
    fn from(formula: Formula) -> Self {
        Self::Formula(formula)
    }
}

impl FromStr for Amount {
    type Err = Error;

    /// Plain numbers and `a-b` bounds become ranges; anything else is a formula.
    fn from_str(text: &str) -> Result<Self> {
        match text.parse::<SampleRange>() {
            Ok(range) => Ok(Self::Range(range)),
            Err(_) => Formula::parse(text).map(Self::Formula),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(range) => range.fmt(f),
            Self::Formula(formula) => formula.fmt(f),
        }
    }
}
