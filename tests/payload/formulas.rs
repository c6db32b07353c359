//! Integration tests for Formula and Amount
//!
//! Tests parsing, evaluation, evaluation errors, and scaling.

use ruleweave_foundation::ErrorKind;
use ruleweave_payload::{Amount, Formula, Variables, random};

fn vars(pairs: &[(&str, f64)]) -> Variables {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), *value))
        .collect()
}

fn eval(source: &str, variables: &Variables) -> f64 {
    Formula::parse(source)
        .unwrap()
        .evaluate(variables, &mut random::seeded(0))
        .unwrap()
}

// =============================================================================
// Evaluation
// =============================================================================

#[test]
fn precedence_and_associativity() {
    let none = Variables::new();
    assert!((eval("1 + 2 * 3", &none) - 7.0).abs() < f64::EPSILON);
    assert!((eval("(1 + 2) * 3", &none) - 9.0).abs() < f64::EPSILON);
    assert!((eval("2 ^ 3 ^ 2", &none) - 512.0).abs() < f64::EPSILON);
    assert!((eval("-2 ^ 2", &none) + 4.0).abs() < f64::EPSILON);
    assert!((eval("7 % 4", &none) - 3.0).abs() < f64::EPSILON);
}

#[test]
fn functions_and_variables() {
    let v = vars(&[("level", 9.0), ("looting", 2.0)]);
    assert!((eval("max(1, sqrt(level)) + looting", &v) - 5.0).abs() < f64::EPSILON);
    assert!((eval("floor(level / 2)", &v) - 4.0).abs() < f64::EPSILON);
    assert!((eval("pow(looting, 3)", &v) - 8.0).abs() < f64::EPSILON);
}

#[test]
fn random_draws_within_bounds() {
    let formula = Formula::parse("random(5, 10)").unwrap();
    let mut rng = random::seeded(4);
    for _ in 0..100 {
        let value = formula.evaluate(&Variables::new(), &mut rng).unwrap();
        assert!((5.0..10.0).contains(&value));
    }
}

#[test]
fn seeded_evaluation_is_reproducible() {
    let formula = Formula::parse("random() * level").unwrap();
    let v = vars(&[("level", 100.0)]);
    let a = formula.evaluate(&v, &mut random::seeded(42)).unwrap();
    let b = formula.evaluate(&v, &mut random::seeded(42)).unwrap();
    assert!((a - b).abs() < f64::EPSILON);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn division_by_zero() {
    let formula = Formula::parse("level / (looting - 2)").unwrap();
    let err = formula
        .evaluate(&vars(&[("level", 1.0), ("looting", 2.0)]), &mut random::seeded(0))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DivisionByZero));
    assert!(err.is_evaluation());
}

#[test]
fn undefined_variable_at_evaluation() {
    let formula = Formula::parse("level + bonus").unwrap();
    let err = formula
        .evaluate(&vars(&[("level", 1.0)]), &mut random::seeded(0))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UndefinedVariable(ref name) if name == "bonus"));
}

#[test]
fn undeclared_variable_at_parse() {
    let err = Formula::parse_with("level + bonus", &["level"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UndefinedVariable(_)));
    assert!(Formula::parse_with("level * 2", &["level"]).is_ok());
}

#[test]
fn malformed_text() {
    for source in ["", "1 +", "(1", "foo(1)", "min()", "1 2"] {
        let err = Formula::parse(source).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::ParseError { .. }),
            "{source:?} gave {err}"
        );
    }
}

// =============================================================================
// Amounts
// =============================================================================

#[test]
fn amount_multiply_returns_new_value() {
    let amount: Amount = "level + 1".parse().unwrap();
    let tripled = amount.multiply(3.0);
    let v = vars(&[("level", 1.0)]);
    let mut rng = random::seeded(0);
    assert_eq!(amount.sample_int(&v, &mut rng).unwrap(), 2);
    assert_eq!(tripled.sample_int(&v, &mut rng).unwrap(), 6);
}

#[test]
fn amount_range_ignores_variables() {
    let amount: Amount = "3-3".parse().unwrap();
    assert_eq!(
        amount.sample_int(&Variables::new(), &mut random::seeded(0)).unwrap(),
        3
    );
}
