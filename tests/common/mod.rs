/*!
 * Shared test fixtures: a sharded map built on the lock, the way a
 * partitioned table would use it.
 */

#![allow(dead_code)]

use sharded_rwlock::{ShardedLock, ShardedRwLock};
use std::cell::UnsafeCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Install a test subscriber once; honours RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Hash map split into buckets, one bucket per shard
pub struct ShardedMap {
    lock: ShardedRwLock,
    buckets: Vec<UnsafeCell<HashMap<u64, String>>>,
    /// Set while a writer is inside the bucket's critical section
    active: Vec<AtomicBool>,
}

// SAFETY: every bucket is only touched under its shard's lock
unsafe impl Sync for ShardedMap {}

impl ShardedMap {
    pub fn new(shards: usize) -> Self {
        Self {
            lock: ShardedRwLock::new(shards),
            buckets: (0..shards).map(|_| UnsafeCell::new(HashMap::new())).collect(),
            active: (0..shards).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    pub fn lock(&self) -> &ShardedRwLock {
        &self.lock
    }

    pub fn set(&self, key: u64, value: &str) {
        let guard = self.lock.write(key as usize);
        let shard = guard.shard();

        let was_active = self.active[shard].swap(true, Ordering::SeqCst);
        assert!(!was_active, "two writers inside shard {shard}");

        // SAFETY: exclusive lock on `shard` is held
        unsafe { (*self.buckets[shard].get()).insert(key, value.to_string()) };
        thread::yield_now();

        self.active[shard].store(false, Ordering::SeqCst);
    }

    pub fn get(&self, key: u64) -> Option<String> {
        let guard = self.lock.read(key as usize);
        // SAFETY: shared lock on the shard is held
        unsafe { (*self.buckets[guard.shard()].get()).get(&key).cloned() }
    }

    /// Writers currently inside a critical section
    pub fn active_writers(&self) -> usize {
        self.active
            .iter()
            .filter(|flag| flag.load(Ordering::SeqCst))
            .count()
    }

    /// Total entries, read under `read_all`
    pub fn len(&self) -> usize {
        let _all = self.lock.read_all();
        self.buckets
            .iter()
            // SAFETY: every shard is read-locked
            .map(|bucket| unsafe { (*bucket.get()).len() })
            .sum()
    }
}
