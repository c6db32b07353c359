//! Integration tests for RuleIndex
//!
//! Tests most-specific-match lookup across several dimensions.

use ruleweave_engine::{Atom, MatchDimension, Query, RuleIndex, Schema};
use ruleweave_foundation::ErrorKind;

fn damage_schema() -> Schema {
    Schema::new("damage")
        .with_value("entityCategory")
        .with_value("damageCause")
}

fn event(schema: &Schema, category: &str, cause: &str) -> Query<Atom> {
    Query::builder(schema)
        .exact("entityCategory", Atom::new(category))
        .exact("damageCause", Atom::new(cause))
        .build()
        .unwrap()
}

fn scenario_index(schema: Schema) -> RuleIndex<Atom, &'static str> {
    let mut index = RuleIndex::new(schema.clone());
    index.insert(Query::wildcard(&schema), "A").unwrap();
    index
        .insert(
            Query::builder(&schema)
                .exact("entityCategory", Atom::new("ZOMBIE"))
                .build()
                .unwrap(),
            "B",
        )
        .unwrap();
    index
        .insert(
            Query::builder(&schema)
                .exact("damageCause", Atom::new("FALL"))
                .build()
                .unwrap(),
            "C",
        )
        .unwrap();
    index
}

// =============================================================================
// Priority
// =============================================================================

#[test]
fn category_outranks_cause_by_declaration_order() {
    let schema = damage_schema();
    assert_eq!(schema.priority(), &[0, 1]);
    let index = scenario_index(schema.clone());

    let hit = index.lookup(&event(&schema, "ZOMBIE", "ENTITY_ATTACK")).unwrap();
    assert_eq!(hit, Some(&"B"));
    let hit = index.lookup(&event(&schema, "ZOMBIE", "FALL")).unwrap();
    assert_eq!(hit, Some(&"B"));
    let hit = index.lookup(&event(&schema, "SKELETON", "FALL")).unwrap();
    assert_eq!(hit, Some(&"C"));
    let hit = index.lookup(&event(&schema, "SKELETON", "LAVA")).unwrap();
    assert_eq!(hit, Some(&"A"));
}

#[test]
fn explicit_priority_puts_cause_first() {
    let schema = damage_schema()
        .with_priority(&["damageCause", "entityCategory"])
        .unwrap();
    let index = scenario_index(schema.clone());
    let hit = index.lookup(&event(&schema, "ZOMBIE", "FALL")).unwrap();
    assert_eq!(hit, Some(&"C"));
}

#[test]
fn pinning_both_dimensions_wins() {
    let schema = damage_schema();
    let mut index = scenario_index(schema.clone());
    index
        .insert(
            Query::builder(&schema)
                .exact("entityCategory", Atom::new("zombie"))
                .exact("damageCause", Atom::new("fall"))
                .build()
                .unwrap(),
            "D",
        )
        .unwrap();
    assert_eq!(index.lookup(&event(&schema, "zombie", "fall")).unwrap(), Some(&"D"));
    assert_eq!(index.lookup(&event(&schema, "zombie", "lava")).unwrap(), Some(&"B"));
}

// =============================================================================
// Flags and Sets
// =============================================================================

#[test]
fn flags_and_sets_rank_between_wildcard_and_exact() {
    let schema = Schema::new("drops")
        .with_value("entity_category")
        .with_flag("baby");
    let mut index = RuleIndex::new(schema.clone());

    let undead = MatchDimension::one_of([Atom::new("zombie"), Atom::new("husk")]);
    index
        .insert(Query::new(vec![undead, MatchDimension::Any]), 1)
        .unwrap();
    index
        .insert(
            Query::new(vec![MatchDimension::Any, MatchDimension::flag(true)]),
            2,
        )
        .unwrap();
    index
        .insert(
            Query::new(vec![
                MatchDimension::none_of([Atom::new("creeper")]),
                MatchDimension::flag(false),
            ]),
            3,
        )
        .unwrap();

    let lookup = |category: &str, baby: bool| {
        let event = Query::builder(&schema)
            .exact("entity_category", Atom::new(category))
            .flag("baby", baby)
            .build()
            .unwrap();
        index.lookup(&event).unwrap().copied()
    };

    assert_eq!(lookup("husk", true), Some(1));
    assert_eq!(lookup("spider", true), Some(2));
    assert_eq!(lookup("spider", false), Some(3));
    assert_eq!(lookup("creeper", false), None);
}

// =============================================================================
// Errors and Mutation
// =============================================================================

#[test]
fn wildcard_event_is_invalid() {
    let schema = damage_schema();
    let index = scenario_index(schema.clone());
    let err = index.lookup(&Query::wildcard(&schema)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidQuery(_)));
}

#[test]
fn remove_then_reinsert() {
    let schema = damage_schema();
    let mut index = scenario_index(schema.clone());
    let zombie = Query::builder(&schema)
        .exact("entityCategory", Atom::new("zombie"))
        .build()
        .unwrap();

    assert_eq!(index.remove(&zombie), Some("B"));
    assert_eq!(index.lookup(&event(&schema, "zombie", "lava")).unwrap(), Some(&"A"));

    index.insert(zombie, "B2").unwrap();
    assert_eq!(index.lookup(&event(&schema, "zombie", "lava")).unwrap(), Some(&"B2"));
    assert_eq!(index.len(), 3);
}

#[test]
fn clones_are_independent() {
    let schema = damage_schema();
    let original = scenario_index(schema.clone());
    let mut copy = original.clone();
    copy.remove(&Query::wildcard(&schema));
    assert_eq!(original.len(), 3);
    assert_eq!(copy.len(), 2);
    assert_eq!(original.lookup(&event(&schema, "witch", "lava")).unwrap(), Some(&"A"));
    assert_eq!(copy.lookup(&event(&schema, "witch", "lava")).unwrap(), None);
}
