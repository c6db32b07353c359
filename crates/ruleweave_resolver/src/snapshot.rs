//! Immutable rule snapshots and their atomic publication.
//!
//! A reload builds a new [`RuleSet`] off to the side and publishes it in one
//! swap. Readers that already hold the previous snapshot keep using it until
//! they drop their `Arc`; nothing published is ever mutated.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::Rng;
use ruleweave_engine::{Query, RuleIndex, Schema};
use ruleweave_foundation::{IntervalStore, Result};
use ruleweave_payload::{Amount, Variables};
use tracing::debug;

// =============================================================================
// Published
// =============================================================================

/// The current snapshot of some state, swapped atomically.
pub struct Published<S> {
    current: ArcSwap<S>,
}

impl<S> Published<S> {
    /// Publishes `initial`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// The snapshot published most recently.
    #[must_use]
    pub fn current(&self) -> Arc<S> {
        self.current.load_full()
    }

    /// Replaces the snapshot, returning the one it replaced.
    pub fn publish(&self, next: S) -> Arc<S> {
        debug!("publishing snapshot");
        self.current.swap(Arc::new(next))
    }

    /// Publishes a snapshot derived from the current one, returning the
    /// snapshot it replaced.
    ///
    /// The read and the swap are one atomic step. If another publication
    /// lands in between, `f` runs again on the newer snapshot, so it may be
    /// called more than once and should have no side effects.
    pub fn derive(&self, mut f: impl FnMut(&S) -> S) -> Arc<S> {
        debug!("deriving snapshot");
        self.current.rcu(|current| Arc::new(f(&**current)))
    }
}

impl<S: fmt::Debug> fmt::Debug for Published<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Published").field(&self.current()).finish()
    }
}

// =============================================================================
// RuleSet
// =============================================================================

/// One domain's rules and level tiers, resolved to amounts.
#[derive(Clone, Debug)]
pub struct RuleSet<V: Eq + Hash> {
    rules: RuleIndex<V, Amount>,
    tiers: IntervalStore<i64, Amount>,
}

impl<V: Clone + Eq + Hash> RuleSet<V> {
    /// An empty rule set over `schema`.
    #[must_use]
    pub fn empty(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            rules: RuleIndex::new(schema),
            tiers: IntervalStore::new(),
        }
    }

    /// Bundles a rule index and a tier table.
    #[must_use]
    pub fn new(rules: RuleIndex<V, Amount>, tiers: IntervalStore<i64, Amount>) -> Self {
        Self { rules, tiers }
    }

    /// The rule index.
    #[must_use]
    pub fn rules(&self) -> &RuleIndex<V, Amount> {
        &self.rules
    }

    /// The level tiers.
    #[must_use]
    pub fn tiers(&self) -> &IntervalStore<i64, Amount> {
        &self.tiers
    }

    /// A copy with every amount multiplied by `multiplier`.
    #[must_use]
    pub fn scaled(&self, multiplier: f64) -> Self {
        Self {
            rules: self.rules.map_payloads(|amount| amount.multiply(multiplier)),
            tiers: self.tiers.map_values(|amount| amount.multiply(multiplier)),
        }
    }

    /// Samples the amount of the most specific rule matching `event`.
    ///
    /// # Errors
    /// Returns `InvalidQuery` for a non-concrete event, or an evaluation
    /// error from the matched formula.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        event: &Query<V>,
        variables: &Variables,
        rng: &mut R,
    ) -> Result<Option<i64>>
    where
        V: fmt::Debug,
    {
        self.rules
            .lookup(event)?
            .map(|amount| amount.sample_int(variables, rng))
            .transpose()
    }

    /// Samples the amount of the tier containing `level`.
    ///
    /// # Errors
    /// Returns an evaluation error from the tier's formula.
    pub fn resolve_tier<R: Rng + ?Sized>(
        &self,
        level: i64,
        variables: &Variables,
        rng: &mut R,
    ) -> Result<Option<i64>> {
        self.tiers
            .get(&level)
            .map(|amount| amount.sample_int(variables, rng))
            .transpose()
    }
}
