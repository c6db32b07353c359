//! Integration tests for IntervalStore
//!
//! Tests point lookup, overwrite splitting, removal, and the model laws.

use proptest::prelude::*;
use ruleweave_foundation::{ErrorKind, Interval, IntervalStore};

fn scenario() -> IntervalStore<i64, i32> {
    let mut store = IntervalStore::new();
    store.put(1, 5, 10).unwrap();
    store.put(2, 3, 9).unwrap();
    store.put(7, 10, 15).unwrap();
    store.put(11, 14, 20).unwrap();
    store
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn lookup_after_overlapping_puts() {
    let store = scenario();
    assert_eq!(store.get(&1), Some(&10));
    assert_eq!(store.get(&2), Some(&9));
    assert_eq!(store.get(&4), Some(&10));
    assert_eq!(store.get(&6), None);
    assert_eq!(store.get(&8), Some(&15));
    assert_eq!(store.get(&14), Some(&20));
    assert_eq!(store.get(&15), None);
    assert_eq!(store.get(&0), None);
}

#[test]
fn remove_drops_intersecting_intervals() {
    let mut store = scenario();
    store.remove(&6, &12).unwrap();
    assert_eq!(store.get(&4), Some(&10));
    assert_eq!(store.get(&8), None);
    assert_eq!(store.get(&11), None);
    assert_eq!(store.get(&14), None);
}

#[test]
fn nested_put_preserves_flanks() {
    let mut store = IntervalStore::new();
    store.put(1, 5, 'X').unwrap();
    store.put(2, 3, 'Y').unwrap();
    assert_eq!(store.get(&1), Some(&'X'));
    assert_eq!(store.get(&2), Some(&'Y'));
    assert_eq!(store.get(&3), Some(&'Y'));
    assert_eq!(store.get(&4), Some(&'X'));
    assert_eq!(store.get(&5), Some(&'X'));

    let intervals: Vec<_> = store.iter().map(Interval::cloned).collect();
    assert_eq!(
        intervals,
        vec![
            Interval { lower: 1, upper: 1, value: 'X' },
            Interval { lower: 2, upper: 3, value: 'Y' },
            Interval { lower: 4, upper: 5, value: 'X' },
        ]
    );
}

#[test]
fn cut_keeps_straddling_parts() {
    let mut store = scenario();
    store.cut(&4, &8).unwrap();
    assert_eq!(store.get(&3), Some(&9));
    assert_eq!(store.get(&4), None);
    assert_eq!(store.get(&8), None);
    assert_eq!(store.get(&9), Some(&15));
}

#[test]
fn inverted_range_is_rejected() {
    let mut store = scenario();
    let err = store.put(20, 10, 1).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRange { .. }));
    assert_eq!(store, scenario());
}

#[test]
fn map_values_builds_new_store() {
    let store = scenario();
    let doubled = store.map_values(|v| v * 2);
    assert_eq!(doubled.get(&8), Some(&30));
    assert_eq!(store.get(&8), Some(&15));
    assert_eq!(doubled.len(), store.len());
}

// =============================================================================
// Laws
// =============================================================================

proptest! {
    #[test]
    fn overwrite_round_trip(a in -50i64..50, len in 0i64..20, v in any::<u8>(), v2 in any::<u8>()) {
        let b = a + len;
        let mut store = IntervalStore::new();
        store.put(a, b, v).unwrap();
        store.put(a, b, v2).unwrap();
        for k in a..=b {
            prop_assert_eq!(store.get(&k), Some(&v2));
        }
        prop_assert_eq!(store.get(&(a - 1)), None);
        prop_assert_eq!(store.get(&(b + 1)), None);
    }

    #[test]
    fn remove_is_idempotent(
        puts in proptest::collection::vec((0i64..60, 0i64..10, any::<u8>()), 0..10),
        lower in 0i64..70,
        len in 0i64..15,
    ) {
        let mut store = IntervalStore::new();
        for (start, width, value) in puts {
            store.put(start, start + width, value).unwrap();
        }
        store.remove(&lower, &(lower + len)).unwrap();
        let once = store.clone();
        store.remove(&lower, &(lower + len)).unwrap();
        prop_assert_eq!(store, once);
    }

    #[test]
    fn disjoint_puts_are_found(starts in proptest::collection::btree_set(0i64..40, 0..8)) {
        // Each start owns [4s, 4s + 2], so intervals never touch.
        let mut store = IntervalStore::new();
        for &s in &starts {
            store.put(4 * s, 4 * s + 2, s).unwrap();
        }
        for k in -1..170 {
            let owner = starts.iter().copied().find(|&s| 4 * s <= k && k <= 4 * s + 2);
            prop_assert_eq!(store.get(&k).copied(), owner);
        }
    }
}
