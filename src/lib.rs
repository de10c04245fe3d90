// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! # Capacity-bounded keyed maps
//!
//! This library provides five interchangeable map strategies behind one
//! contract:
//!
//! | Type | Strategy | Order | Lookup |
//! | --- | --- | --- | --- |
//! | [`ChainedHashMap`] | separate chaining | table | O(1) expected |
//! | [`OpenHashMap`] | open addressing, double hashing | table | O(1) expected |
//! | [`AvlTreeMap`] | height-balanced binary tree | key | O(log n) |
//! | [`SplayTreeMap`] | self-adjusting binary tree | key | O(log n) amortised |
//! | [`SkipListMap`] | randomised layered list | key | O(log n) expected |
//!
//! Every map implements [`Map`]. The three ordered maps also implement
//! [`NavigableMap`], which adds the extrema, the floor, ceiling, lower
//! and higher neighbour queries, polling from either end and ranged
//! iteration.
//!
//! ## Capacity
//!
//! A map may be given a ceiling through [`MapConfig`]. Replacing the value
//! of a key that is already present always succeeds, but a new key
//! arriving at a full map is handed to the map's overflow policy. The
//! default policy refuses, and the insert fails with
//! [`MapError::Overflow`] without touching the map. The
//! [`capacity`] module provides policies which evict the first or last
//! entry instead, and any closure over the [`Evict`][capacity::Evict]
//! surface will do as well.
//!
//! ```
//! # use keyed::{Map, MapConfig, MapError, OpenHashMap};
//! let config = MapConfig::new().with_capacity(2);
//! let mut map = OpenHashMap::with_config(config).unwrap();
//! map.put("a", 1).unwrap();
//! map.put("b", 2).unwrap();
//! assert_eq!(Ok(Some(1)), map.put("a", 10));
//! assert_eq!(Err(MapError::Overflow { capacity: 2 }), map.put("c", 3));
//! assert_eq!(2, map.len());
//! ```
//!
//! ## Thread safety
//!
//! None of the maps synchronise internally. They are all [`Send`], and
//! all but [`SplayTreeMap`] are [`Sync`]: a splay tree restructures
//! itself on every lookup, even through a shared reference, so it can't
//! be shared between threads. Wrap a map in a lock to share it.
//!
//! ## Feature Flags
//!
//! keyed comes with optional support for the following crates through
//! Cargo feature flags. You can enable them in your `Cargo.toml` file like
//! this:
//!
//! ```no_compile
//! [dependencies]
//! keyed = { version = "*", features = ["proptest", "serde"] }
//! ```
//!
//! | Feature | Description |
//! | ------- | ----------- |
//! | [`proptest`](https://crates.io/crates/proptest) | Strategies for all map types under a `proptest` namespace, eg. `keyed::proptest::avl_map` |
//! | [`quickcheck`](https://crates.io/crates/quickcheck) | [`quickcheck::Arbitrary`](https://docs.rs/quickcheck/latest/quickcheck/trait.Arbitrary.html) implementations for all map types |
//! | [`arbitrary`](https://crates.io/crates/arbitrary/) | [`arbitrary::Arbitrary`](https://docs.rs/arbitrary/latest/arbitrary/trait.Arbitrary.html) implementations for all map types |
//! | [`serde`](https://crates.io/crates/serde) | [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html) and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) implementations for all map types |
//! | `debug` | Exposes internal invariant checks |

#![forbid(rust_2018_idioms)]
#![deny(unsafe_code, nonstandard_style)]
#![warn(unreachable_pub, missing_docs)]

pub mod capacity;
pub mod config;
pub mod error;
pub mod map;

mod nodes;
mod util;

pub mod hash;
pub mod ord;

#[cfg(any(test, feature = "serde"))]
#[doc(hidden)]
pub mod ser;

#[cfg(feature = "arbitrary")]
#[doc(hidden)]
pub mod arbitrary;

#[cfg(feature = "quickcheck")]
#[doc(hidden)]
pub mod quickcheck;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest;

pub use crate::capacity::Capacity;
pub use crate::config::MapConfig;
pub use crate::error::MapError;
pub use crate::hash::chained::ChainedHashMap;
pub use crate::hash::open::OpenHashMap;
pub use crate::map::{Comparator, Map, NaturalOrder, NavigableMap};
pub use crate::ord::avl::AvlTreeMap;
pub use crate::ord::skiplist::SkipListMap;
pub use crate::ord::splay::SplayTreeMap;
