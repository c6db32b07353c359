//! One domain's live configuration.

use std::hash::Hash;
use std::sync::Arc;

use ruleweave_engine::KeyParser;
use ruleweave_foundation::Result;
use tracing::{debug, info};

use crate::config::ResolverConfig;
use crate::loader::{LoadReport, RuleSetLoader, TierTableLoader};
use crate::pending::PendingLookup;
use crate::snapshot::{Published, RuleSet};

/// Loads a domain's rules and serves lookups from the latest snapshot.
///
/// [`reload`](Self::reload) builds a complete [`RuleSet`], applies the
/// configured multiplier, and publishes it. Lookups in flight finish on the
/// snapshot they started with.
pub struct Resolver<V: Eq + Hash> {
    config: ResolverConfig,
    rules: RuleSetLoader<V>,
    tiers: TierTableLoader,
    published: Published<RuleSet<V>>,
}

impl<V: Clone + Eq + Hash> Resolver<V> {
    /// Creates a resolver with an empty snapshot.
    #[must_use]
    pub fn new(section: &str, parser: KeyParser<V>, config: ResolverConfig) -> Self {
        let empty = RuleSet::empty(Arc::clone(parser.schema()));
        Self {
            rules: RuleSetLoader::new(section, parser, &config),
            tiers: TierTableLoader::new(format!("{section}.tiers")),
            published: Published::new(empty),
            config,
        }
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Rebuilds and publishes the snapshot, skipping bad entries.
    pub fn reload<'k>(
        &self,
        rules: impl IntoIterator<Item = (&'k str, &'k str)>,
        tiers: impl IntoIterator<Item = (&'k str, &'k str)>,
    ) -> LoadReport
    where
        V: std::fmt::Debug,
    {
        let (index, mut report) = self.rules.load(rules);
        let (store, tier_report) = self.tiers.load(tiers);
        report.absorb(tier_report);

        let mut set = RuleSet::new(index, store);
        if (self.config.multiplier - 1.0).abs() > f64::EPSILON {
            debug!(multiplier = self.config.multiplier, "scaling rule set");
            set = set.scaled(self.config.multiplier);
        }
        self.published.publish(set);

        info!(
            section = self.rules.section(),
            loaded = report.loaded(),
            skipped = report.skipped().len(),
            "reloaded rules"
        );
        report
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RuleSet<V>> {
        self.published.current()
    }

    /// The parser for rule keys and events of this domain.
    #[must_use]
    pub fn parser(&self) -> &KeyParser<V> {
        self.rules.parser()
    }

    /// Waits on an external lookup for at most the configured timeout.
    ///
    /// # Errors
    /// Returns `Timeout` or `Interrupted` from the lookup.
    pub fn await_lookup<T>(&self, lookup: PendingLookup<T>) -> Result<T> {
        lookup.wait(self.config.lookup_timeout)
    }
}
