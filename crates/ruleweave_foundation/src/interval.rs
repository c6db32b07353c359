//! Non-overlapping closed intervals mapped to values.
//!
//! [`IntervalStore`] keeps one endpoint marker per interval boundary in an
//! ordered persistent map. An interval `[a, b]` with `a < b` is stored as an
//! `Open` marker at `a` and a `Close` marker at `b`; a single-key interval is
//! one `Both` marker. Point lookups find the nearest marker at or before the
//! key, so they cost one ordered-map search.
//!
//! Writes never leave overlapping intervals behind: [`IntervalStore::put`]
//! trims whatever it overlaps and keeps the parts that stick out on either
//! side.

use std::fmt;
use std::ops::Bound;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::step::StepKey;

/// A closed interval `[lower, upper]` and its value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<K, V> {
    /// Inclusive lower bound.
    pub lower: K,
    /// Inclusive upper bound.
    pub upper: K,
    /// The associated value.
    pub value: V,
}

impl<K: Ord, V> Interval<K, V> {
    /// Returns true if `key` falls inside this interval.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.lower <= *key && *key <= self.upper
    }
}

impl<K, V: Clone> Interval<K, &V> {
    /// Clones the borrowed value into an owned interval.
    #[must_use]
    pub fn cloned(self) -> Interval<K, V> {
        Interval {
            lower: self.lower,
            upper: self.upper,
            value: self.value.clone(),
        }
    }
}

/// Which boundary of an interval a marker represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum Marker {
    Open,
    Close,
    Both,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Endpoint<V> {
    marker: Marker,
    value: V,
}

impl<V> Endpoint<V> {
    fn open(value: V) -> Self {
        Self {
            marker: Marker::Open,
            value,
        }
    }

    fn close(value: V) -> Self {
        Self {
            marker: Marker::Close,
            value,
        }
    }

    fn both(value: V) -> Self {
        Self {
            marker: Marker::Both,
            value,
        }
    }

    fn starts_interval(&self) -> bool {
        matches!(self.marker, Marker::Open | Marker::Both)
    }
}

/// A map from non-overlapping closed intervals to values.
///
/// Cloning is O(1); clones share structure until one of them is modified.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntervalStore<K, V>
where
    K: StepKey,
    V: Clone,
{
    markers: im::OrdMap<K, Endpoint<V>>,
}

impl<K: StepKey, V: Clone> Default for IntervalStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StepKey, V: Clone> IntervalStore<K, V> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            markers: im::OrdMap::new(),
        }
    }

    /// Associates every key in `[lower, upper]` with `value`.
    ///
    /// Intervals that partially overlap the new one are trimmed so that the
    /// parts outside `[lower, upper]` keep their old value.
    ///
    /// # Errors
    /// Returns `InvalidRange` if `lower > upper`.
    pub fn put(&mut self, lower: K, upper: K, value: V) -> Result<()> {
        check_bounds(&lower, &upper)?;
        self.carve(&lower, &upper);

        if lower == upper {
            self.markers.insert(lower, Endpoint::both(value));
        } else {
            self.markers.insert(lower, Endpoint::open(value.clone()));
            self.markers.insert(upper, Endpoint::close(value));
        }
        Ok(())
    }

    /// Copies every interval of `other` into this store.
    ///
    /// Intervals from `other` win wherever the two stores overlap.
    pub fn put_all(&mut self, other: &Self) {
        for interval in other.iter() {
            self.carve(&interval.lower, &interval.upper);
            self.write(interval.cloned());
        }
    }

    /// Returns the value whose interval contains `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let (at, endpoint) = self.floor(key)?;
        match endpoint.marker {
            Marker::Open => Some(&endpoint.value),
            Marker::Close | Marker::Both if at == key => Some(&endpoint.value),
            Marker::Close | Marker::Both => None,
        }
    }

    /// Returns true if some interval contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns the full interval containing `key`.
    #[must_use]
    pub fn get_interval(&self, key: &K) -> Option<Interval<K, &V>> {
        let (at, endpoint) = self.floor(key)?;
        match endpoint.marker {
            Marker::Open => {
                let (upper, _) = self
                    .markers
                    .range((Bound::Excluded(at.clone()), Bound::Unbounded))
                    .next()?;
                Some(Interval {
                    lower: at.clone(),
                    upper: upper.clone(),
                    value: &endpoint.value,
                })
            }
            Marker::Close if at == key => {
                let (lower, _) = self.markers.range(..at.clone()).next_back()?;
                Some(Interval {
                    lower: lower.clone(),
                    upper: at.clone(),
                    value: &endpoint.value,
                })
            }
            Marker::Both if at == key => Some(Interval {
                lower: at.clone(),
                upper: at.clone(),
                value: &endpoint.value,
            }),
            Marker::Close | Marker::Both => None,
        }
    }

    /// Removes every interval that intersects `[lower, upper]`.
    ///
    /// Intersecting intervals are dropped whole, including the parts outside
    /// the given range. Returns the number of intervals removed.
    ///
    /// # Errors
    /// Returns `InvalidRange` if `lower > upper`.
    pub fn remove(&mut self, lower: &K, upper: &K) -> Result<usize> {
        check_bounds(lower, upper)?;

        let start = self
            .get_interval(lower)
            .map_or_else(|| lower.clone(), |interval| interval.lower);
        let end = self
            .get_interval(upper)
            .map_or_else(|| upper.clone(), |interval| interval.upper);

        let mut removed = 0;
        for (key, starts) in self.span(&start, &end) {
            if starts {
                removed += 1;
            }
            self.markers.remove(&key);
        }
        Ok(removed)
    }

    /// Removes exactly the keys `[lower, upper]`.
    ///
    /// Unlike [`remove`](Self::remove), intervals straddling either bound
    /// keep the part that lies outside the range.
    ///
    /// # Errors
    /// Returns `InvalidRange` if `lower > upper`.
    pub fn cut(&mut self, lower: &K, upper: &K) -> Result<()> {
        check_bounds(lower, upper)?;
        self.carve(lower, upper);
        Ok(())
    }

    /// Removes all intervals.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Returns the number of intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers
            .values()
            .filter(|endpoint| endpoint.starts_interval())
            .count()
    }

    /// Returns true if the store holds no intervals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Returns the smallest covered key.
    #[must_use]
    pub fn first_key(&self) -> Option<&K> {
        self.markers.get_min().map(|(key, _)| key)
    }

    /// Returns the largest covered key.
    #[must_use]
    pub fn last_key(&self) -> Option<&K> {
        self.markers.get_max().map(|(key, _)| key)
    }

    /// Iterates the intervals in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = Interval<K, &V>> + '_ {
        let mut open: Option<K> = None;
        self.markers
            .iter()
            .filter_map(move |(key, endpoint)| match endpoint.marker {
                Marker::Open => {
                    open = Some(key.clone());
                    None
                }
                Marker::Close => open.take().map(|lower| Interval {
                    lower,
                    upper: key.clone(),
                    value: &endpoint.value,
                }),
                Marker::Both => Some(Interval {
                    lower: key.clone(),
                    upper: key.clone(),
                    value: &endpoint.value,
                }),
            })
    }

    /// Builds a new store with the same intervals and transformed values.
    ///
    /// `f` is called once per interval.
    #[must_use]
    pub fn map_values<U, F>(&self, mut f: F) -> IntervalStore<K, U>
    where
        U: Clone,
        F: FnMut(&V) -> U,
    {
        let mut mapped = IntervalStore::new();
        for interval in self.iter() {
            mapped.write(Interval {
                value: f(interval.value),
                lower: interval.lower,
                upper: interval.upper,
            });
        }
        mapped
    }

    /// Nearest marker at or before `key`.
    fn floor(&self, key: &K) -> Option<(&K, &Endpoint<V>)> {
        self.markers.range(..=key.clone()).next_back()
    }

    /// Markers inside `[lower, upper]`, flagged with whether each starts an interval.
    fn span(&self, lower: &K, upper: &K) -> Vec<(K, bool)> {
        self.markers
            .range(lower.clone()..=upper.clone())
            .map(|(key, endpoint)| (key.clone(), endpoint.starts_interval()))
            .collect()
    }

    /// Clears `[lower, upper]`, closing and reopening the straddling intervals.
    fn carve(&mut self, lower: &K, upper: &K) {
        let left = self
            .get_interval(lower)
            .filter(|interval| interval.lower < *lower)
            .map(Interval::cloned);
        let right = self
            .get_interval(upper)
            .filter(|interval| interval.upper > *upper)
            .map(Interval::cloned);

        for (key, _) in self.span(lower, upper) {
            self.markers.remove(&key);
        }

        if let (Some(left), Some(end)) = (left, lower.predecessor()) {
            self.write(Interval {
                lower: left.lower,
                upper: end,
                value: left.value,
            });
        }
        if let (Some(right), Some(start)) = (right, upper.successor()) {
            self.write(Interval {
                lower: start,
                upper: right.upper,
                value: right.value,
            });
        }
    }

    /// Writes both markers of an interval, replacing whatever sits at its bounds.
    fn write(&mut self, interval: Interval<K, V>) {
        if interval.lower == interval.upper {
            self.markers
                .insert(interval.lower, Endpoint::both(interval.value));
        } else {
            self.markers
                .insert(interval.lower, Endpoint::open(interval.value.clone()));
            self.markers
                .insert(interval.upper, Endpoint::close(interval.value));
        }
    }
}

impl<K, V> fmt::Debug for IntervalStore<K, V>
where
    K: StepKey,
    V: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|interval| (interval.lower..=interval.upper, interval.value)),
            )
            .finish()
    }
}

fn check_bounds<K: StepKey>(lower: &K, upper: &K) -> Result<()> {
    if lower > upper {
        return Err(Error::invalid_range(lower, upper));
    }
    Ok(())
}
