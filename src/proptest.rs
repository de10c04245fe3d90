// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Proptest strategies.
//!
//! These are only available when using the `proptest` feature flag.
//! Every strategy builds an unbounded map with the default hasher or
//! comparator.

use ::proptest::collection::vec;
use ::proptest::strategy::{BoxedStrategy, Strategy, ValueTree};
use std::hash::Hash;
use std::ops::Range;

use crate::{AvlTreeMap, ChainedHashMap, OpenHashMap, SkipListMap, SplayTreeMap};

/// A strategy for a [`ChainedHashMap`] of a given size.
///
/// # Examples
///
/// ```rust,no_run
/// # use ::proptest::proptest;
/// proptest! {
///     #[test]
///     fn proptest_works(ref m in keyed::proptest::chained_map(0..9999, ".*", 10..100)) {
///         assert!(m.len() < 100);
///         assert!(m.len() >= 10);
///     }
/// }
/// ```
pub fn chained_map<K: Strategy + 'static, V: Strategy + 'static>(
    key: K,
    value: V,
    size: Range<usize>,
) -> BoxedStrategy<ChainedHashMap<<K::Tree as ValueTree>::Value, <V::Tree as ValueTree>::Value>>
where
    <K::Tree as ValueTree>::Value: Hash + Eq,
{
    vec((key, value), size.clone())
        .prop_map(ChainedHashMap::from)
        .prop_filter("ChainedHashMap minimum size".to_owned(), move |m| {
            m.len() >= size.start
        })
        .boxed()
}

/// A strategy for an [`OpenHashMap`] of a given size.
pub fn open_map<K: Strategy + 'static, V: Strategy + 'static>(
    key: K,
    value: V,
    size: Range<usize>,
) -> BoxedStrategy<OpenHashMap<<K::Tree as ValueTree>::Value, <V::Tree as ValueTree>::Value>>
where
    <K::Tree as ValueTree>::Value: Hash + Eq,
{
    vec((key, value), size.clone())
        .prop_map(OpenHashMap::from)
        .prop_filter("OpenHashMap minimum size".to_owned(), move |m| {
            m.len() >= size.start
        })
        .boxed()
}

/// A strategy for an [`AvlTreeMap`] of a given size.
///
/// # Examples
///
/// ```rust,no_run
/// # use ::proptest::proptest;
/// # use keyed::NavigableMap;
/// proptest! {
///     #[test]
///     fn proptest_works(ref m in keyed::proptest::avl_map(0..9999, ".*", 10..100)) {
///         assert!(m.len() < 100);
///         assert!(m.first_key().is_ok());
///     }
/// }
/// ```
pub fn avl_map<K: Strategy + 'static, V: Strategy + 'static>(
    key: K,
    value: V,
    size: Range<usize>,
) -> BoxedStrategy<AvlTreeMap<<K::Tree as ValueTree>::Value, <V::Tree as ValueTree>::Value>>
where
    <K::Tree as ValueTree>::Value: Ord,
{
    vec((key, value), size.clone())
        .prop_map(AvlTreeMap::from)
        .prop_filter("AvlTreeMap minimum size".to_owned(), move |m| {
            m.len() >= size.start
        })
        .boxed()
}

/// A strategy for a [`SplayTreeMap`] of a given size.
pub fn splay_map<K: Strategy + 'static, V: Strategy + 'static>(
    key: K,
    value: V,
    size: Range<usize>,
) -> BoxedStrategy<SplayTreeMap<<K::Tree as ValueTree>::Value, <V::Tree as ValueTree>::Value>>
where
    <K::Tree as ValueTree>::Value: Ord,
{
    vec((key, value), size.clone())
        .prop_map(SplayTreeMap::from)
        .prop_filter("SplayTreeMap minimum size".to_owned(), move |m| {
            m.len() >= size.start
        })
        .boxed()
}

/// A strategy for a [`SkipListMap`] of a given size.
pub fn skip_map<K: Strategy + 'static, V: Strategy + 'static>(
    key: K,
    value: V,
    size: Range<usize>,
) -> BoxedStrategy<SkipListMap<<K::Tree as ValueTree>::Value, <V::Tree as ValueTree>::Value>>
where
    <K::Tree as ValueTree>::Value: Ord,
{
    vec((key, value), size.clone())
        .prop_map(SkipListMap::from)
        .prop_filter("SkipListMap minimum size".to_owned(), move |m| {
            m.len() >= size.start
        })
        .boxed()
}
