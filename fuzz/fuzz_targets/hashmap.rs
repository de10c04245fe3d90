#![no_main]

use std::collections::HashMap as NatMap;
use std::fmt::Debug;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use keyed::{ChainedHashMap, Map, MapConfig, OpenHashMap};

#[derive(Arbitrary, Debug)]
enum Action<K, V> {
    Put(K, V),
    Remove(K),
    Retain(u8),
    Clear,
}

fuzz_target!(|input: (u8, Vec<Action<u16, u32>>)| {
    let (capacity, actions) = input;
    let capacity = usize::from(capacity);
    let mut chained = ChainedHashMap::with_config(MapConfig::new().with_capacity(capacity)).unwrap();
    let mut open = OpenHashMap::with_config(MapConfig::new().with_capacity(capacity)).unwrap();
    let mut nat = NatMap::new();
    for action in actions {
        match action {
            Action::Put(key, value) => {
                let fits = nat.contains_key(&key) || nat.len() < capacity;
                let expected = if fits { Ok(nat.insert(key, value)) } else { Err(()) };
                assert_eq!(expected, chained.put(key, value).map_err(|_| ()));
                assert_eq!(expected, open.put(key, value).map_err(|_| ()));
            }
            Action::Remove(key) => {
                let expected = nat.remove(&key);
                assert_eq!(expected, chained.remove(&key));
                assert_eq!(expected, open.remove(&key));
            }
            Action::Retain(modulus) => {
                let modulus = u32::from(modulus.max(1));
                let before = nat.len();
                nat.retain(|_, v| *v % modulus != 0);
                let removed = before - nat.len();
                assert_eq!(removed, chained.filter_entries(|_, v| *v % modulus != 0));
                assert_eq!(removed, open.filter_entries(|_, v| *v % modulus != 0));
            }
            Action::Clear => {
                nat.clear();
                chained.clear();
                open.clear();
            }
        }
        assert_eq!(nat.len(), chained.len());
        assert_eq!(nat.len(), open.len());
    }
    chained.assert_invariants();
    open.assert_invariants();
    for (key, value) in &nat {
        assert_eq!(Some(value), chained.get(key));
        assert_eq!(Some(value), open.get(key));
    }
    assert_eq!(nat.len(), chained.iter().count());
    assert_eq!(nat.len(), open.into_iter().count());
});
