//! Building rule indexes and tier tables from configuration entries.
//!
//! Loaders collect and continue: a bad entry is logged, recorded in the
//! [`LoadReport`] with its section and key, and skipped. Everything else in
//! the section still loads.

use std::hash::Hash;
use std::str::FromStr;

use ruleweave_engine::{KeyParser, RuleIndex};
use ruleweave_foundation::{Error, ErrorContext, IntervalStore, Result};
use tracing::{debug, warn};

use crate::config::ResolverConfig;

// =============================================================================
// Load Report
// =============================================================================

/// What a load kept and what it skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    loaded: usize,
    skipped: Vec<Error>,
}

impl LoadReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries that loaded.
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Errors for skipped entries, each carrying section and key context.
    #[must_use]
    pub fn skipped(&self) -> &[Error] {
        &self.skipped
    }

    /// Returns true if nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Folds another report into this one.
    pub fn absorb(&mut self, other: Self) {
        self.loaded += other.loaded;
        self.skipped.extend(other.skipped);
    }

    fn skip(&mut self, section: &str, key: &str, frame: &str, error: Error) {
        warn!(section, key, error = %error, "skipping {frame} entry");
        let context = ErrorContext::new()
            .with_section(section)
            .with_key(key)
            .with_frame(frame);
        self.skipped.push(error.with_context(context));
    }
}

// =============================================================================
// Rule Set Loader
// =============================================================================

/// Loads `key = payload` entries of one section into a [`RuleIndex`].
#[derive(Clone, Debug)]
pub struct RuleSetLoader<V> {
    section: String,
    parser: KeyParser<V>,
}

impl<V: Clone + Eq + Hash> RuleSetLoader<V> {
    /// Creates a loader whose parser follows `config`.
    #[must_use]
    pub fn new(section: impl Into<String>, parser: KeyParser<V>, config: &ResolverConfig) -> Self {
        Self {
            section: section.into(),
            parser: parser
                .with_policy(config.contradiction_policy)
                .with_prefix_matching(config.allow_prefix),
        }
    }

    /// The section this loader reads.
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// The key parser in use.
    #[must_use]
    pub fn parser(&self) -> &KeyParser<V> {
        &self.parser
    }

    /// Parses every entry, skipping the ones that fail.
    ///
    /// Later entries with the same pattern replace earlier ones.
    pub fn load<'k, T>(
        &self,
        entries: impl IntoIterator<Item = (&'k str, &'k str)>,
    ) -> (RuleIndex<V, T>, LoadReport)
    where
        V: std::fmt::Debug,
        T: FromStr<Err = Error>,
    {
        let mut index = RuleIndex::new(self.parser.schema().clone());
        let mut report = LoadReport::new();

        for (key, payload) in entries {
            let result = self
                .parser
                .parse_pattern(key)
                .and_then(|pattern| Ok((pattern, payload.parse::<T>()?)))
                .and_then(|(pattern, payload)| index.insert(pattern, payload));
            match result {
                Ok(()) => report.loaded += 1,
                Err(error) => report.skip(&self.section, key, "rule set", error),
            }
        }

        debug!(
            section = %self.section,
            rules = index.len(),
            skipped = report.skipped.len(),
            "built rule index"
        );
        (index, report)
    }
}

// =============================================================================
// Tier Table Loader
// =============================================================================

/// Loads `lower-upper = payload` entries into an [`IntervalStore`].
///
/// A key is a single integer (`5`) or an inclusive range (`0-15`, `-5--1`).
/// Later entries overwrite the overlapped parts of earlier ones.
#[derive(Clone, Debug)]
pub struct TierTableLoader {
    section: String,
}

impl TierTableLoader {
    /// Creates a loader for one section.
    #[must_use]
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
        }
    }

    /// Parses every entry, skipping the ones that fail.
    pub fn load<'k, T>(
        &self,
        entries: impl IntoIterator<Item = (&'k str, &'k str)>,
    ) -> (IntervalStore<i64, T>, LoadReport)
    where
        T: Clone + FromStr<Err = Error>,
    {
        let mut store = IntervalStore::new();
        let mut report = LoadReport::new();

        for (key, payload) in entries {
            let result = parse_bounds(key).and_then(|(lower, upper)| {
                let payload = payload.parse::<T>()?;
                store.put(lower, upper, payload)
            });
            match result {
                Ok(()) => report.loaded += 1,
                Err(error) => report.skip(&self.section, key, "tier table", error),
            }
        }

        debug!(
            section = %self.section,
            intervals = store.len(),
            skipped = report.skipped.len(),
            "built tier table"
        );
        (store, report)
    }
}

/// Splits `5`, `0-15`, or `-5--1` into inclusive bounds.
fn parse_bounds(key: &str) -> Result<(i64, i64)> {
    let split = key.char_indices().skip(1).find(|&(i, c)| {
        c == '-'
            && key[..i]
                .trim_end()
                .ends_with(|before: char| before.is_ascii_digit())
    });
    match split {
        Some((i, _)) => Ok((parse_int(&key[..i], 0)?, parse_int(&key[i + 1..], i + 1)?)),
        None => {
            let value = parse_int(key, 0)?;
            Ok((value, value))
        }
    }
}

fn parse_int(text: &str, position: usize) -> Result<i64> {
    text.trim()
        .parse()
        .map_err(|_| Error::parse(format!("expected an integer, found {:?}", text.trim()), position))
}
