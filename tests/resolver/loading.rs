//! Integration tests for rule loading
//!
//! Tests that bad entries are skipped, reported, and logged.

use ruleweave_engine::{Atom, KeyParser, Schema, Vocabulary};
use ruleweave_foundation::ErrorKind;
use ruleweave_payload::{Amount, Formula, Variables, random};
use ruleweave_resolver::{Resolver, ResolverConfig, RuleSetLoader, TierTableLoader};
use tracing_test::traced_test;

fn parser() -> KeyParser<Atom> {
    let schema = Schema::new("drops")
        .with_value("entity_category")
        .with_value("damage_cause")
        .with_flag("spawner");
    KeyParser::new(schema)
        .with_vocabulary(
            "entity_category",
            Vocabulary::atoms(["zombie", "skeleton", "spider"]),
        )
        .unwrap()
        .with_vocabulary("damage_cause", Vocabulary::atoms(["fall", "lava"]))
        .unwrap()
}

#[test]
#[traced_test]
fn skipped_rules_are_logged_and_reported() {
    let loader = RuleSetLoader::new("drops", parser(), &ResolverConfig::default());
    let (index, report) = loader.load::<Amount>([
        ("zombie", "1-3"),
        ("blaze", "2"),
        ("skeleton|fall", "level / 0"),
        ("spider", "1 +"),
    ]);

    // Division by zero only shows up at evaluation time.
    assert_eq!(index.len(), 2);
    assert_eq!(report.loaded(), 2);
    assert_eq!(report.skipped().len(), 2);

    assert!(logs_contain("skipping rule set entry"));
    assert!(logs_contain("blaze"));
    assert!(logs_contain("built rule index"));
}

#[test]
#[traced_test]
fn inverted_tier_is_skipped() {
    let loader = TierTableLoader::new("levels");
    let (store, report) = loader.load::<Amount>([("0-9", "1"), ("20-10", "5"), ("10-19", "2")]);

    assert_eq!(store.len(), 2);
    let skipped = &report.skipped()[0];
    assert!(matches!(skipped.kind, ErrorKind::InvalidRange { .. }));
    assert_eq!(
        skipped.context.as_ref().and_then(|c| c.key.as_deref()),
        Some("20-10")
    );
    assert!(logs_contain("skipping tier table entry"));
}

#[test]
#[traced_test]
fn skip_warnings_carry_the_callers_span() {
    let loader = RuleSetLoader::new("drops", parser(), &ResolverConfig::default());
    let span = tracing::info_span!("reload_world", world = "nether");
    let (_, report) = span.in_scope(|| {
        tracing::info!("loading drops");
        loader.load::<Amount>([("blaze", "1")])
    });

    assert_eq!(report.skipped().len(), 1);
    assert!(logs_contain("loading drops"));
    assert!(logs_contain("reload_world"));
    assert!(logs_contain("skipping rule set entry"));
}

#[test]
fn formula_only_sections_load_as_formulas() {
    let loader = RuleSetLoader::new("drops", parser(), &ResolverConfig::default());
    let (index, report) = loader.load::<Formula>([("zombie", "level * 2"), ("spider", "level +")]);
    assert_eq!(index.len(), 1);
    assert!(matches!(report.skipped()[0].kind, ErrorKind::ParseError { .. }));

    let event = loader.parser().event(&["zombie", "fall"], &[]).unwrap();
    let formula = index.lookup(&event).unwrap().unwrap();
    let mut variables = Variables::new();
    variables.insert("level".into(), 4.0);
    let value = formula.evaluate(&variables, &mut random::seeded(0)).unwrap();
    assert!((value - 8.0).abs() < f64::EPSILON);
}

#[test]
fn prefix_matching_follows_config() {
    let strict = RuleSetLoader::new("drops", parser(), &ResolverConfig::strict());
    let (_, report) = strict.load::<Amount>([("skel", "1")]);
    assert_eq!(report.skipped().len(), 1);

    let lenient = RuleSetLoader::new("drops", parser(), &ResolverConfig::lenient());
    let (index, report) = lenient.load::<Amount>([("skel", "1")]);
    assert!(report.is_clean());
    assert_eq!(index.len(), 1);
}

#[test]
#[traced_test]
fn reload_reports_both_sections() {
    let resolver = Resolver::new("drops", parser(), ResolverConfig::deterministic(5));
    let report = resolver.reload(
        [("zombie", "2"), ("spawner,!spawner", "0")],
        [("0-9", "1"), ("x-y", "1")],
    );
    assert_eq!(report.loaded(), 2);
    assert_eq!(report.skipped().len(), 2);
    assert!(logs_contain("reloaded rules"));

    let sections: Vec<_> = report
        .skipped()
        .iter()
        .filter_map(|e| e.context.as_ref()?.section.clone())
        .collect();
    assert_eq!(sections, vec!["drops".to_string(), "drops.tiers".to_string()]);

    let event = resolver.parser().event(&["zombie", "lava"], &[]).unwrap();
    let value = resolver
        .snapshot()
        .resolve(&event, &Variables::new(), &mut random::seeded(5))
        .unwrap();
    assert_eq!(value, Some(2));
}
