use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use keyed::capacity::EvictFirst;
use keyed::{
    AvlTreeMap, ChainedHashMap, Map, MapConfig, NavigableMap, OpenHashMap, SkipListMap,
    SplayTreeMap,
};
use std::collections::BTreeMap;
use std::hint::black_box;
use std::iter::FromIterator;

mod utils;
use utils::*;

// Every strategy builds from pairs, starts out empty and unbounded, and
// can be bounded with an evicting policy
trait BenchMap<K, V>: Map<K, V> + Clone + Default + FromIterator<(K, V)> {
    fn bounded(capacity: usize) -> Self;
}

macro_rules! bench_map {
    ($($map:ident),+) => {
        $(
            impl<K, V> BenchMap<K, V> for $map<K, V>
            where
                $map<K, V>: Map<K, V> + Clone + Default + FromIterator<(K, V)>,
            {
                fn bounded(capacity: usize) -> Self {
                    let config = MapConfig::new()
                        .with_capacity(capacity)
                        .with_overflow(EvictFirst);
                    $map::with_config(config).unwrap()
                }
            }
        )+
    };
}

bench_map!(ChainedHashMap, OpenHashMap, AvlTreeMap, SplayTreeMap, SkipListMap);

fn bench_lookup<M, K, V>(b: &mut Bencher, size: usize)
where
    M: BenchMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let keys = K::distinct(size);
    let order = shuffled(&keys);
    let m: M = keys.into_iter().zip(V::ascending(size)).collect();
    b.iter(|| {
        for k in &order {
            black_box(m.get(k));
        }
    })
}

fn bench_lookup_ne<M, K, V>(b: &mut Bencher, size: usize)
where
    M: BenchMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let (present, absent) = present_and_absent::<K>(size);
    let m: M = present.into_iter().zip(V::ascending(size)).collect();
    b.iter(|| {
        for k in &absent {
            black_box(m.get(k));
        }
    })
}

fn bench_insert<M, K, V>(b: &mut Bencher, size: usize)
where
    M: BenchMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let entries: Vec<(K, V)> = shuffled(&K::distinct(size))
        .into_iter()
        .zip(V::ascending(size))
        .collect();
    b.iter(|| {
        let mut m = M::default();
        for (k, v) in entries.iter().cloned() {
            let _ = m.put(k, v);
        }
        m
    })
}

// Sorted input builds a splay tree into a single spine, and costs the AVL
// tree a rotation on most puts.
fn bench_insert_ascending<M, K, V>(b: &mut Bencher, size: usize)
where
    M: BenchMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let keys = K::ascending(size);
    let values = V::ascending(size);
    b.iter(|| {
        let mut m = M::default();
        for (k, v) in keys.iter().cloned().zip(values.iter().cloned()) {
            let _ = m.put(k, v);
        }
        m
    })
}

// Every put past the first `capacity` evicts an entry.
fn bench_bounded_churn<M, K, V>(b: &mut Bencher, capacity: usize)
where
    M: BenchMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let entries = churn::<K, V>(capacity, 4);
    b.iter(|| {
        let mut m = M::bounded(capacity);
        for (k, v) in entries.iter().cloned() {
            let _ = m.put(k, v);
        }
        assert!(m.is_full());
        m
    })
}

fn bench_remove<M, K, V>(b: &mut Bencher, size: usize)
where
    M: BenchMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let keys = K::distinct(size);
    let order = shuffled(&keys);
    let map: M = keys.into_iter().zip(V::ascending(size)).collect();
    b.iter(|| {
        let mut m = map.clone();
        for k in &order {
            m.remove(k);
        }
        m
    })
}

fn bench_iter<M, K, V>(b: &mut Bencher, size: usize)
where
    M: BenchMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let m: M = K::distinct(size).into_iter().zip(V::ascending(size)).collect();
    b.iter(|| {
        for p in m.iter() {
            black_box(p);
        }
    })
}

fn bench_floor<M, K, V>(b: &mut Bencher, size: usize)
where
    M: BenchMap<K, V> + NavigableMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let (present, absent) = present_and_absent::<K>(size);
    let mut order = present.clone();
    order.extend(absent);
    let order = shuffled(&order);
    let m: M = present.into_iter().zip(V::ascending(size)).collect();
    b.iter(|| {
        for k in &order {
            black_box(m.floor_entry(k));
        }
    })
}

fn bench_range_iter<M, K, V>(b: &mut Bencher, size: usize)
where
    M: BenchMap<K, V> + NavigableMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let keys = K::distinct(size);
    let order = shuffled(&keys);
    let m: M = keys.into_iter().zip(V::ascending(size)).collect();
    b.iter(|| {
        for k in order.iter().take(10) {
            for p in m.range(k.clone()..).take(100) {
                black_box(p);
            }
        }
    })
}

fn bench_poll_first<M, K, V>(b: &mut Bencher, size: usize)
where
    M: BenchMap<K, V> + NavigableMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let map: M = K::distinct(size).into_iter().zip(V::ascending(size)).collect();
    b.iter(|| {
        let mut m = map.clone();
        while let Some(entry) = m.poll_first_entry() {
            black_box(entry);
        }
        assert!(m.is_empty());
        m
    })
}

// Helper function to run the shared benchmarks for a specific map/key/value type
fn bench_group<M, K, V>(c: &mut Criterion, group_name: &str)
where
    M: BenchMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    let mut group = c.benchmark_group(group_name);

    for size in &[100, 1000, 10000, 100000] {
        group.bench_function(format!("lookup_{}", size), |b| {
            bench_lookup::<M, K, V>(b, *size)
        });
    }

    for size in &[10000, 100000] {
        group.bench_function(format!("lookup_ne_{}", size), |b| {
            bench_lookup_ne::<M, K, V>(b, *size)
        });
    }

    for size in &[100, 1000, 10000, 100000] {
        group.bench_function(format!("insert_{}", size), |b| {
            bench_insert::<M, K, V>(b, *size)
        });
    }

    for size in &[1000, 10000] {
        group.bench_function(format!("insert_ascending_{}", size), |b| {
            bench_insert_ascending::<M, K, V>(b, *size)
        });
    }

    for capacity in &[100, 1000] {
        group.bench_function(format!("bounded_churn_{}", capacity), |b| {
            bench_bounded_churn::<M, K, V>(b, *capacity)
        });
    }

    for size in &[100, 1000, 10000] {
        group.bench_function(format!("remove_{}", size), |b| {
            bench_remove::<M, K, V>(b, *size)
        });
    }

    for size in &[1000, 10000] {
        group.bench_function(format!("iter_{}", size), |b| {
            bench_iter::<M, K, V>(b, *size)
        });
    }

    group.finish();
}

fn bench_navigable_group<M, K, V>(c: &mut Criterion, group_name: &str)
where
    M: BenchMap<K, V> + NavigableMap<K, V>,
    K: BenchKey,
    V: BenchKey,
{
    bench_group::<M, K, V>(c, group_name);

    let mut group = c.benchmark_group(format!("{}_nav", group_name));

    for size in &[1000, 100000] {
        group.bench_function(format!("floor_{}", size), |b| {
            bench_floor::<M, K, V>(b, *size)
        });
    }

    for size in &[100, 1000, 10000, 100000] {
        group.bench_function(format!("range_iter_{}", size), |b| {
            bench_range_iter::<M, K, V>(b, *size)
        });
    }

    for size in &[1000] {
        group.bench_function(format!("poll_first_{}", size), |b| {
            bench_poll_first::<M, K, V>(b, *size)
        });
    }

    group.finish();
}

fn bench_hash_maps(c: &mut Criterion) {
    bench_group::<ChainedHashMap<i64, i64>, i64, i64>(c, "chained_i64");
    bench_group::<ChainedHashMap<String, String>, String, String>(c, "chained_str");
    bench_group::<OpenHashMap<i64, i64>, i64, i64>(c, "open_i64");
    bench_group::<OpenHashMap<String, String>, String, String>(c, "open_str");
}

fn bench_ordered_maps(c: &mut Criterion) {
    bench_navigable_group::<AvlTreeMap<i64, i64>, i64, i64>(c, "avl_i64");
    bench_navigable_group::<AvlTreeMap<String, String>, String, String>(c, "avl_str");
    bench_navigable_group::<SplayTreeMap<i64, i64>, i64, i64>(c, "splay_i64");
    bench_navigable_group::<SkipListMap<i64, i64>, i64, i64>(c, "skiplist_i64");
    bench_navigable_group::<SkipListMap<String, String>, String, String>(c, "skiplist_str");
}

fn bench_btreemap(c: &mut Criterion) {
    let mut group = c.benchmark_group("btreemap_i64");
    for size in &[100, 1000, 10000, 100000] {
        let keys = i64::distinct(*size);
        let order = shuffled(&keys);
        let m: BTreeMap<i64, i64> = keys.iter().map(|k| (*k, *k)).collect();
        group.bench_function(format!("lookup_{}", size), |b| {
            b.iter(|| {
                for k in &order {
                    black_box(m.get(k));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hash_maps, bench_ordered_maps, bench_btreemap);
criterion_main!(benches);
