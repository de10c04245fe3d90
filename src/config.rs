// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Construction-time configuration shared by every map.

use std::fmt::{Debug, Error, Formatter};
use std::sync::Arc;

use crate::capacity::{Capacity, OverflowPolicy, Reject};
use crate::error::MapError;

/// The smallest bucket/slot array a hash table will use. Must be a prime
/// greater than 2, so that the open-addressing probe step is never zero.
pub(crate) const MIN_TABLE_LEN: usize = 11;

/// The largest bucket/slot array a hash table will grow to.
// 2^31 - 1 is prime.
pub(crate) const MAX_TABLE_LEN: usize = 2_147_483_647;

/// Load factor of the separate-chaining table.
pub const DEFAULT_CHAINED_LOAD_FACTOR: f64 = 0.75;

/// Load factor of the open-addressing table.
pub const DEFAULT_OPEN_LOAD_FACTOR: f64 = 0.7;

/// Chance that a skip-list entry is promoted one layer up.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Layer ceiling of a skip list.
pub(crate) const MAX_SKIP_HEIGHT: usize = 64;

/// Seed of the default skip-list random source.
pub(crate) const DEFAULT_SKIP_SEED: u64 = 0x5eed_1e55_c0ff_ee00;

/// Configuration handed to every map constructor.
///
/// Capacity and the overflow policy apply to all strategies. The load
/// factor is read by the hash tables only, and the promotion probability
/// by the skip list only; the others ignore them. Unset fields fall back
/// to each strategy's own default.
///
/// # Examples
///
/// ```
/// # use keyed::{AvlTreeMap, Map, MapConfig, MapError};
/// let config = MapConfig::new().with_capacity(1);
/// let mut map = AvlTreeMap::with_config(config).unwrap();
/// assert_eq!(Ok(None), map.put(1, "one"));
/// assert_eq!(Err(MapError::Overflow { capacity: 1 }), map.put(2, "two"));
/// ```
pub struct MapConfig<K, V> {
    pub(crate) capacity: Capacity,
    pub(crate) overflow: Arc<dyn OverflowPolicy<K, V> + Send + Sync>,
    pub(crate) load_factor: Option<f64>,
    pub(crate) probability: Option<f64>,
}

impl<K, V> MapConfig<K, V> {
    /// An unbounded configuration that rejects nothing.
    #[must_use]
    pub fn new() -> Self {
        MapConfig {
            capacity: Capacity::Unbounded,
            overflow: Arc::new(Reject),
            load_factor: None,
            probability: None,
        }
    }

    /// Bound the map to at most `max` entries.
    #[must_use]
    pub fn with_capacity(mut self, max: usize) -> Self {
        self.capacity = Capacity::Bounded(max);
        self
    }

    /// Set the policy consulted when a new key arrives at a full map.
    #[must_use]
    pub fn with_overflow<O>(mut self, policy: O) -> Self
    where
        O: OverflowPolicy<K, V> + Send + Sync + 'static,
    {
        self.overflow = Arc::new(policy);
        self
    }

    /// Set the load factor of a hash table.
    #[must_use]
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = Some(load_factor);
        self
    }

    /// Set the skip-list promotion probability.
    #[must_use]
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability);
        self
    }

    /// The configured capacity.
    #[must_use]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub(crate) fn load_factor_or(&self, default: f64) -> Result<f64, MapError> {
        let load_factor = self.load_factor.unwrap_or(default);
        if load_factor.is_finite() && load_factor > 0.0 {
            Ok(load_factor)
        } else {
            Err(MapError::invalid_config(format!(
                "load factor must be finite and positive, got {load_factor}"
            )))
        }
    }

    pub(crate) fn probability_or(&self, default: f64) -> Result<f64, MapError> {
        let probability = self.probability.unwrap_or(default);
        if probability > 0.0 && probability < 1.0 {
            Ok(probability)
        } else {
            Err(MapError::invalid_config(format!(
                "promotion probability must lie strictly between 0 and 1, got {probability}"
            )))
        }
    }
}

impl<K, V> Default for MapConfig<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// We impl Clone instead of deriving it, because we want Clone even if K and V aren't.
impl<K, V> Clone for MapConfig<K, V> {
    fn clone(&self) -> Self {
        MapConfig {
            capacity: self.capacity,
            overflow: self.overflow.clone(),
            load_factor: self.load_factor,
            probability: self.probability,
        }
    }
}

impl<K, V> Debug for MapConfig<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_struct("MapConfig")
            .field("capacity", &self.capacity)
            .field("load_factor", &self.load_factor)
            .field("probability", &self.probability)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_bad_load_factors() {
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let config = MapConfig::<i32, i32>::new().with_load_factor(bad);
            assert!(matches!(
                config.load_factor_or(DEFAULT_OPEN_LOAD_FACTOR),
                Err(MapError::InvalidConfig { .. })
            ));
        }
        let config = MapConfig::<i32, i32>::new();
        assert_eq!(Ok(0.7), config.load_factor_or(DEFAULT_OPEN_LOAD_FACTOR));
    }

    #[test]
    fn rejects_bad_probabilities() {
        for bad in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            let config = MapConfig::<i32, i32>::new().with_probability(bad);
            assert!(config.probability_or(DEFAULT_PROBABILITY).is_err());
        }
        let config = MapConfig::<i32, i32>::new().with_probability(0.25);
        assert_eq!(Ok(0.25), config.probability_or(DEFAULT_PROBABILITY));
    }
}
