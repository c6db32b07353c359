//! Configuration for rule loading and resolution.

use std::time::Duration;

use ruleweave_engine::ContradictionPolicy;
use ruleweave_payload::random::{self, SampleRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings passed by reference into loaders and resolvers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResolverConfig {
    /// Factor applied to every numeric payload when a snapshot is built.
    pub multiplier: f64,

    /// Seed for payload sampling; `None` draws fresh entropy.
    pub seed: Option<u64>,

    /// How a flag that is both required and excluded is treated.
    pub contradiction_policy: ContradictionPolicy,

    /// Whether rule keys may abbreviate names to a unique prefix.
    pub allow_prefix: bool,

    /// Longest a caller blocks on a pending lookup.
    pub lookup_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            seed: None,
            contradiction_policy: ContradictionPolicy::Reject,
            allow_prefix: false,
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration that rejects anything ambiguous.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Creates a configuration that accepts abbreviated names and collapses
    /// contradictory flags.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            contradiction_policy: ContradictionPolicy::Collapse,
            allow_prefix: true,
            ..Self::default()
        }
    }

    /// Creates a reproducible configuration for tests and replays.
    #[must_use]
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            lookup_timeout: Duration::from_millis(250),
            ..Self::default()
        }
    }

    /// Builder method to set the payload multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Builder method to set the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to set the contradiction policy.
    #[must_use]
    pub fn with_contradiction_policy(mut self, policy: ContradictionPolicy) -> Self {
        self.contradiction_policy = policy;
        self
    }

    /// Builder method to enable/disable prefix matching.
    #[must_use]
    pub fn with_allow_prefix(mut self, allow_prefix: bool) -> Self {
        self.allow_prefix = allow_prefix;
        self
    }

    /// Builder method to set the pending-lookup timeout.
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Creates the random source this configuration asks for.
    #[must_use]
    pub fn rng(&self) -> SampleRng {
        match self.seed {
            Some(seed) => random::seeded(seed),
            None => random::unseeded(),
        }
    }
}
