// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every map serialises as a plain map in its iteration order, and
//! deserialises into an unbounded map with the default hasher or
//! comparator.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use crate::map::{Comparator, Map};
use crate::{AvlTreeMap, ChainedHashMap, OpenHashMap, SkipListMap, SplayTreeMap};

struct MapVisitor<'de, S, K, V> {
    phantom_s: PhantomData<S>,
    phantom_k: PhantomData<K>,
    phantom_v: PhantomData<V>,
    phantom_lifetime: PhantomData<&'de ()>,
}

impl<'de, S, K, V> MapVisitor<'de, S, K, V> {
    pub(crate) fn new() -> MapVisitor<'de, S, K, V> {
        MapVisitor {
            phantom_s: PhantomData,
            phantom_k: PhantomData,
            phantom_v: PhantomData,
            phantom_lifetime: PhantomData,
        }
    }
}

impl<'de, S, K, V> Visitor<'de> for MapVisitor<'de, S, K, V>
where
    S: From<Vec<(K, V)>>,
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = S;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<Access>(self, mut access: Access) -> Result<Self::Value, Access::Error>
    where
        Access: MapAccess<'de>,
    {
        let mut v: Vec<(K, V)> = match access.size_hint() {
            None => Vec::new(),
            Some(l) => Vec::with_capacity(l),
        };
        while let Some(i) = access.next_entry()? {
            v.push(i)
        }
        Ok(From::from(v))
    }
}

fn serialize_entries<'a, K, V, M, S>(map: &'a M, ser: S) -> Result<S::Ok, S::Error>
where
    K: Serialize + 'a,
    V: Serialize + 'a,
    M: Map<K, V>,
    S: Serializer,
{
    let mut s = ser.serialize_map(Some(map.len()))?;
    for (k, v) in map.iter() {
        s.serialize_entry(k, v)?;
    }
    s.end()
}

// Hash maps

impl<'de, K, V, S> Deserialize<'de> for ChainedHashMap<K, V, S>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        des.deserialize_map(MapVisitor::<'de, ChainedHashMap<K, V, S>, K, V>::new())
    }
}

impl<K, V, S> Serialize for ChainedHashMap<K, V, S>
where
    K: Serialize + Hash + Eq,
    V: Serialize,
    S: BuildHasher,
{
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serialize_entries(self, ser)
    }
}

impl<'de, K, V, S> Deserialize<'de> for OpenHashMap<K, V, S>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        des.deserialize_map(MapVisitor::<'de, OpenHashMap<K, V, S>, K, V>::new())
    }
}

impl<K, V, S> Serialize for OpenHashMap<K, V, S>
where
    K: Serialize + Hash + Eq,
    V: Serialize,
    S: BuildHasher,
{
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serialize_entries(self, ser)
    }
}

// Ordered maps

impl<'de, K, V, C> Deserialize<'de> for AvlTreeMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        des.deserialize_map(MapVisitor::<'de, AvlTreeMap<K, V, C>, K, V>::new())
    }
}

impl<K: Serialize, V: Serialize, C: Comparator<K>> Serialize for AvlTreeMap<K, V, C> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_entries(self, ser)
    }
}

impl<'de, K, V, C> Deserialize<'de> for SplayTreeMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        des.deserialize_map(MapVisitor::<'de, SplayTreeMap<K, V, C>, K, V>::new())
    }
}

impl<K: Serialize, V: Serialize, C: Comparator<K>> Serialize for SplayTreeMap<K, V, C> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_entries(self, ser)
    }
}

impl<'de, K, V, C> Deserialize<'de> for SkipListMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        des.deserialize_map(MapVisitor::<'de, SkipListMap<K, V, C>, K, V>::new())
    }
}

impl<K, V, C, R> Serialize for SkipListMap<K, V, C, R>
where
    K: Serialize,
    V: Serialize,
    C: Comparator<K>,
    R: rand_core::RngCore,
{
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_entries(self, ser)
    }
}

// Tests

#[cfg(test)]
mod test {
    use crate::proptest::{avl_map, chained_map, open_map, skip_map, splay_map};
    use crate::{AvlTreeMap, ChainedHashMap, OpenHashMap, SkipListMap, SplayTreeMap};
    use proptest::num::i32;
    use proptest::proptest;
    use serde_json::{from_str, to_string};

    #[test]
    fn ordered_maps_serialise_in_key_order() {
        let map: AvlTreeMap<i32, &str> = vec![(3, "c"), (1, "a"), (2, "b")].into();
        assert_eq!(r#"{"1":"a","2":"b","3":"c"}"#, to_string(&map).unwrap());
    }

    proptest! {
        #[test]
        fn ser_chained_map(ref v in chained_map(i32::ANY, i32::ANY, 0..100)) {
            assert_eq!(v, &from_str::<ChainedHashMap<i32, i32>>(&to_string(&v).unwrap()).unwrap());
        }

        #[test]
        fn ser_open_map(ref v in open_map(i32::ANY, i32::ANY, 0..100)) {
            assert_eq!(v, &from_str::<OpenHashMap<i32, i32>>(&to_string(&v).unwrap()).unwrap());
        }

        #[test]
        fn ser_avl_map(ref v in avl_map(i32::ANY, i32::ANY, 0..100)) {
            assert_eq!(v, &from_str::<AvlTreeMap<i32, i32>>(&to_string(&v).unwrap()).unwrap());
        }

        #[test]
        fn ser_splay_map(ref v in splay_map(i32::ANY, i32::ANY, 0..100)) {
            assert_eq!(v, &from_str::<SplayTreeMap<i32, i32>>(&to_string(&v).unwrap()).unwrap());
        }

        #[test]
        fn ser_skip_map(ref v in skip_map(i32::ANY, i32::ANY, 0..100)) {
            assert_eq!(v, &from_str::<SkipListMap<i32, i32>>(&to_string(&v).unwrap()).unwrap());
        }
    }
}
