//! Arithmetic formulas evaluated against per-event variables.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;
use ruleweave_foundation::{Error, Result};

use crate::expr::{BinaryOp, Expr, Variables};
use crate::parser::Parser;

/// A parsed arithmetic formula.
///
/// Formulas are parsed once when configuration loads and evaluated lazily,
/// each time with the event's variable bindings and a random source. Cloning
/// is cheap; the syntax tree is shared.
///
/// # Example
/// ```
/// use ruleweave_payload::{Formula, Variables, random};
///
/// let formula = Formula::parse("level * 2 + 1").unwrap();
/// let mut vars = Variables::new();
/// vars.insert("level".to_string(), 10.0);
///
/// let mut rng = random::seeded(1);
/// assert_eq!(formula.evaluate(&vars, &mut rng).unwrap(), 21.0);
/// ```
#[derive(Clone, Debug)]
pub struct Formula {
    source: Arc<str>,
    expr: Arc<Expr>,
}

impl Formula {
    /// Parses a formula that may reference any variable.
    ///
    /// # Errors
    /// Returns a parse error for malformed text.
    pub fn parse(source: &str) -> Result<Self> {
        let expr = Parser::new(source).parse()?;
        Ok(Self::from_parts(source, expr))
    }

    /// Parses a formula whose variables must come from `declared`.
    ///
    /// # Errors
    /// Returns a parse error for malformed text, or `UndefinedVariable` for a
    /// name outside `declared`.
    pub fn parse_with(source: &str, declared: &[&str]) -> Result<Self> {
        let expr = Parser::new(source).with_declared(declared).parse()?;
        Ok(Self::from_parts(source, expr))
    }

    /// A formula that always yields `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::from_parts(&value.to_string(), Expr::Number(value))
    }

    fn from_parts(source: &str, expr: Expr) -> Self {
        Self {
            source: source.trim().into(),
            expr: Arc::new(expr),
        }
    }

    /// The text this formula was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed syntax tree.
    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Names of all variables the formula references.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.expr.collect_variables(&mut names);
        names
    }

    /// Evaluates the formula.
    ///
    /// Every referenced variable must be bound, even when it is meaningless
    /// for the event at hand; bind it to `0.0` in that case.
    ///
    /// # Errors
    /// Returns `UndefinedVariable` or `DivisionByZero`.
    pub fn evaluate<R: Rng + ?Sized>(&self, variables: &Variables, rng: &mut R) -> Result<f64> {
        self.expr.eval(variables, rng)
    }

    /// Returns a new formula whose result is scaled by `factor`.
    #[must_use]
    pub fn multiply(&self, factor: f64) -> Self {
        Self {
            source: format!("({}) * {factor}", self.source).into(),
            expr: Arc::new(Expr::Binary(
                BinaryOp::Mul,
                Box::new(Expr::clone(&self.expr)),
                Box::new(Expr::Number(factor)),
            )),
        }
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
