/*!
 * Sharded Lock Benchmarks
 *
 * Compare one global RwLock against the sharded locks under a partitioned
 * map workload, plus raw lock/unlock and read_lock_all cost
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parking_lot::RwLock;
use sharded_rwlock::{ShardedLock, ShardedRwLock, ShardedRwLock128};
use std::cell::UnsafeCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

const SHARDS: usize = 16;
const KEYS: u64 = 100_000;
const OPS_PER_THREAD: u64 = 2_000;

trait Store: Send + Sync {
    fn set(&self, key: u64, value: u64);
    fn get(&self, key: u64) -> Option<u64>;
}

struct LockedMap {
    data: RwLock<HashMap<u64, u64>>,
}

impl Store for LockedMap {
    fn set(&self, key: u64, value: u64) {
        self.data.write().insert(key, value);
    }

    fn get(&self, key: u64) -> Option<u64> {
        self.data.read().get(&key).copied()
    }
}

struct ShardedMap {
    lock: ShardedRwLock,
    buckets: Vec<UnsafeCell<HashMap<u64, u64>>>,
}

// SAFETY: buckets are only touched under their shard's lock
unsafe impl Sync for ShardedMap {}

impl ShardedMap {
    fn new(shards: usize) -> Self {
        Self {
            lock: ShardedRwLock::new(shards),
            buckets: (0..shards).map(|_| UnsafeCell::new(HashMap::new())).collect(),
        }
    }
}

impl Store for ShardedMap {
    fn set(&self, key: u64, value: u64) {
        let guard = self.lock.write(key as usize);
        unsafe { (*self.buckets[guard.shard()].get()).insert(key, value) };
    }

    fn get(&self, key: u64) -> Option<u64> {
        let guard = self.lock.read(key as usize);
        unsafe { (*self.buckets[guard.shard()].get()).get(&key).copied() }
    }
}

fn run_workload(store: &Arc<dyn Store>, threads: usize) {
    let handles: Vec<_> = (0..threads as u64)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                let mut key = t.wrapping_mul(0x9E37_79B9_7F4A_7C15);
                for _ in 0..OPS_PER_THREAD {
                    key = key.wrapping_mul(6364136223846793005).wrapping_add(1);
                    let k = key % KEYS;
                    store.set(k, key);
                    black_box(store.get(k));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

fn bench_map_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_contention");

    for threads in [4, 16, 64] {
        let single: Arc<dyn Store> = Arc::new(LockedMap {
            data: RwLock::new(HashMap::new()),
        });
        group.bench_with_input(BenchmarkId::new("single", threads), &threads, |b, &n| {
            b.iter(|| run_workload(&single, n));
        });

        let sharded: Arc<dyn Store> = Arc::new(ShardedMap::new(SHARDS));
        group.bench_with_input(BenchmarkId::new("sharded", threads), &threads, |b, &n| {
            b.iter(|| run_workload(&sharded, n));
        });
    }

    group.finish();
}

fn bench_lock_unlock(c: &mut Criterion) {
    let mut group = c.benchmark_group("lock_unlock");

    let plain = RwLock::new(());
    group.bench_function("rwlock", |b| {
        b.iter(|| drop(black_box(plain.write())));
    });

    let sharded = ShardedRwLock::new(128);
    group.bench_function("sharded", |b| {
        b.iter(|| drop(black_box(sharded.write(1))));
    });

    let fixed = ShardedRwLock128::new();
    group.bench_function("fixed128", |b| {
        b.iter(|| drop(black_box(fixed.write(1))));
    });

    group.finish();
}

fn bench_read_lock_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_lock_all");

    for shards in [16, 128, 512] {
        let lock = ShardedRwLock::new(shards);
        group.bench_with_input(BenchmarkId::from_parameter(shards), &lock, |b, lock| {
            b.iter(|| drop(black_box(lock.read_all())));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_map_contention,
    bench_lock_unlock,
    bench_read_lock_all
);
criterion_main!(benches);
