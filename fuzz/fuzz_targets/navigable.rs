#![no_main]

use std::collections::BTreeMap as NatMap;
use std::fmt::Debug;
use std::ops::Range;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use keyed::{AvlTreeMap, Map, NavigableMap, SkipListMap, SplayTreeMap};

#[derive(Arbitrary, Debug)]
enum Action<K, V> {
    Put(K, V),
    Remove(K),
    PollFirst,
    PollLast,
    Range(Range<K>),
}

fn check<M: NavigableMap<u32, u32>>(map: &M, nat: &NatMap<u32, u32>, probe: u32) {
    assert_eq!(nat.first_key_value(), map.first_entry());
    assert_eq!(nat.last_key_value(), map.last_entry());
    assert_eq!(nat.range(..=probe).next_back(), map.floor_entry(&probe));
    assert_eq!(nat.range(..probe).next_back(), map.lower_entry(&probe));
    assert_eq!(nat.range(probe..).next(), map.ceiling_entry(&probe));
    assert_eq!(
        probe.checked_add(1).and_then(|next| nat.range(next..).next()),
        map.higher_entry(&probe)
    );
}

fuzz_target!(|actions: Vec<Action<u32, u32>>| {
    let mut avl = AvlTreeMap::new();
    let mut splay = SplayTreeMap::new();
    let mut skip = SkipListMap::new();
    let mut nat = NatMap::new();
    for action in actions {
        match action {
            Action::Put(key, value) => {
                let expected = nat.insert(key, value);
                assert_eq!(expected, avl.put(key, value).unwrap());
                assert_eq!(expected, splay.put(key, value).unwrap());
                assert_eq!(expected, skip.put(key, value).unwrap());
            }
            Action::Remove(key) => {
                let expected = nat.remove(&key);
                assert_eq!(expected, Map::remove(&mut avl, &key));
                assert_eq!(expected, Map::remove(&mut splay, &key));
                assert_eq!(expected, Map::remove(&mut skip, &key));
            }
            Action::PollFirst => {
                let expected = nat.pop_first();
                assert_eq!(expected, avl.poll_first_entry());
                assert_eq!(expected, splay.poll_first_entry());
                assert_eq!(expected, skip.poll_first_entry());
            }
            Action::PollLast => {
                let expected = nat.pop_last();
                assert_eq!(expected, avl.poll_last_entry());
                assert_eq!(expected, splay.poll_last_entry());
                assert_eq!(expected, skip.poll_last_entry());
            }
            Action::Range(range) => {
                check(&avl, &nat, range.start);
                check(&splay, &nat, range.start);
                check(&skip, &nat, range.start);
                if range.start <= range.end {
                    let expected: Vec<_> = nat.range(range.clone()).collect();
                    assert_eq!(expected, avl.range(range.clone()).collect::<Vec<_>>());
                    assert_eq!(expected, splay.range(range.clone()).collect::<Vec<_>>());
                    assert_eq!(expected, skip.range(range).collect::<Vec<_>>());
                }
            }
        }
        assert_eq!(nat.len(), Map::len(&avl));
        assert_eq!(nat.len(), Map::len(&splay));
        assert_eq!(nat.len(), Map::len(&skip));
    }
    avl.assert_invariants();
    splay.assert_invariants();
    skip.assert_invariants();
    assert!(nat.iter().eq(avl.iter()));
    assert!(nat.iter().eq(Map::iter(&splay)));
    assert!(nat.iter().rev().eq(skip.iter().rev()));
    assert!(nat.into_iter().eq(avl.into_iter()));
});
