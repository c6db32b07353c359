//! Integration tests for KeyParser
//!
//! Tests rule keys end to end: parse, insert, and look up.

use ruleweave_engine::{Atom, ContradictionPolicy, KeyParser, RuleIndex, Schema, Vocabulary};
use ruleweave_foundation::ErrorKind;

fn parser() -> KeyParser<Atom> {
    let schema = Schema::new("mobs")
        .with_value("entity_category")
        .with_value("damage_cause")
        .with_flag("spawner");
    KeyParser::new(schema)
        .with_vocabulary(
            "entity_category",
            Vocabulary::atoms(["zombie", "husk", "skeleton", "creeper"]),
        )
        .unwrap()
        .with_vocabulary(
            "damage_cause",
            Vocabulary::atoms(["fall", "lava", "entity_attack"]),
        )
        .unwrap()
}

#[test]
fn negated_and_positive_spawner_is_a_duplicate() {
    let err = parser().parse_pattern("spawner,!spawner").unwrap_err();
    match err.kind {
        ErrorKind::DuplicateValue { dimension, value } => {
            assert_eq!(dimension, "spawner");
            assert_eq!(value, "spawner");
        }
        other => panic!("expected DuplicateValue, got {other:?}"),
    }
}

#[test]
fn collapse_policy_is_explicit() {
    let query = parser()
        .with_policy(ContradictionPolicy::Collapse)
        .parse_pattern("spawner,!spawner")
        .unwrap();
    assert!(query.dimensions().all(|d| d.is_wildcard()));
}

#[test]
fn value_and_its_negation_is_a_duplicate() {
    let err = parser().parse_pattern("ZOMBIE,!zombie").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateValue { .. }));
}

#[test]
fn parsed_rules_resolve_events() {
    let parser = parser();
    let mut index = RuleIndex::new(parser.schema().clone());
    for (key, payload) in [
        ("", 0),
        ("zombie,husk", 1),
        ("zombie|fall", 2),
        ("!creeper|lava", 3),
        ("spawner", 4),
        ("*|entity_attack|!spawner", 5),
    ] {
        index.insert(parser.parse_pattern(key).unwrap(), payload).unwrap();
    }

    let resolve = |names: &[&str], flags: &[&str]| {
        let event = parser.event(names, flags).unwrap();
        index.lookup(&event).unwrap().copied()
    };

    assert_eq!(resolve(&["zombie", "fall"], &[]), Some(2));
    assert_eq!(resolve(&["husk", "fall"], &[]), Some(1));
    assert_eq!(resolve(&["skeleton", "lava"], &[]), Some(3));
    assert_eq!(resolve(&["creeper", "lava"], &[]), Some(0));
    assert_eq!(resolve(&["creeper", "entity_attack"], &[]), Some(5));
    assert_eq!(resolve(&["creeper", "entity_attack"], &["spawner"]), Some(4));
}

#[test]
fn unknown_segment_is_reported() {
    let err = parser().parse_pattern("zombie|fall|blaze").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnrecognizedToken(ref token) if token == "blaze"));
}
