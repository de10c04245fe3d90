//! Key and value generation shared by the map benchmarks.
#![allow(dead_code)]

use rand::seq::SliceRandom;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

const SEED: u64 = 1;

/// Keys (and values) the benchmarks know how to make in bulk.
pub trait BenchKey: Clone + Debug + Ord + Hash {
    /// `size` distinct random values, in ascending order.
    fn distinct(size: usize) -> Vec<Self>;

    /// The `n`th value of a strictly increasing sequence.
    fn nth(n: usize) -> Self;

    /// The first `size` values of the increasing sequence.
    fn ascending(size: usize) -> Vec<Self> {
        (0..size).map(Self::nth).collect()
    }
}

impl BenchKey for i64 {
    fn distinct(size: usize) -> Vec<Self> {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut set = BTreeSet::new();
        while set.len() < size {
            set.insert(rng.random::<i64>());
        }
        set.into_iter().collect()
    }

    fn nth(n: usize) -> Self {
        n as i64
    }
}

impl BenchKey for String {
    fn distinct(size: usize) -> Vec<Self> {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut set = BTreeSet::new();
        while set.len() < size {
            let len = rng.random_range(5..20);
            let s: String = (0..len)
                .map(|_| rng.random_range(b'a'..=b'z') as char)
                .collect();
            set.insert(s);
        }
        set.into_iter().collect()
    }

    // Zero padded, so string order matches numeric order.
    fn nth(n: usize) -> Self {
        format!("{n:012}")
    }
}

/// A copy of `items` in a fixed pseudo-random order.
pub fn shuffled<A: Clone>(items: &[A]) -> Vec<A> {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut out = items.to_vec();
    out.shuffle(&mut rng);
    out
}

/// `size` keys to put in a map, and `size` other keys that are never in it,
/// both shuffled.
pub fn present_and_absent<K: BenchKey>(size: usize) -> (Vec<K>, Vec<K>) {
    let mut keys = shuffled(&K::distinct(size * 2));
    let absent = keys.split_off(size);
    (keys, absent)
}

/// Entries for a map bounded to `capacity`: enough of them to overflow it
/// `rounds` times over, in a fixed pseudo-random order.
pub fn churn<K: BenchKey, V: BenchKey>(capacity: usize, rounds: usize) -> Vec<(K, V)> {
    let size = capacity * (rounds + 1);
    let keys = shuffled(&K::distinct(size));
    keys.into_iter().zip(V::ascending(size)).collect()
}
