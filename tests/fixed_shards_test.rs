/*!
 * Fixed-Size Sharded Lock Integration Tests
 */

use sharded_rwlock::{FixedShardedRwLock, ShardedLock, ShardedRwLock128};
use std::cell::UnsafeCell;
use std::sync::Arc;
use std::thread;

static GLOBAL: ShardedRwLock128 = ShardedRwLock128::new();

struct Counters<const N: usize> {
    lock: FixedShardedRwLock<N>,
    values: [UnsafeCell<u64>; N],
}

// SAFETY: each counter is only touched under its shard's lock
unsafe impl<const N: usize> Sync for Counters<N> {}

impl<const N: usize> Counters<N> {
    fn new() -> Self {
        Self {
            lock: FixedShardedRwLock::new(),
            values: std::array::from_fn(|_| UnsafeCell::new(0)),
        }
    }

    fn bump(&self, key: usize) {
        let guard = self.lock.write(key);
        // SAFETY: exclusive lock on the shard is held
        unsafe { *self.values[guard.shard()].get() += 1 };
    }

    fn total(&self) -> u64 {
        (0..N)
            .map(|shard| {
                let _guard = self.lock.read(shard);
                // SAFETY: shared lock on the shard is held
                unsafe { *self.values[shard].get() }
            })
            .sum()
    }
}

#[test]
fn test_static_lock() {
    assert_eq!(GLOBAL.shard_count(), 128);

    let guard = GLOBAL.write(300);
    assert_eq!(guard.shard(), 44);
    assert!(GLOBAL.is_write_locked(44));
    drop(guard);
    assert!(!GLOBAL.is_write_locked(44));
}

#[test]
fn test_counters_under_contention() {
    let counters = Arc::new(Counters::<8>::new());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let counters = counters.clone();
            thread::spawn(move || {
                for i in 0..1_000 {
                    counters.bump(t * 31 + i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(counters.total(), 8_000);
}

#[test]
fn test_raw_pairs() {
    let lock = FixedShardedRwLock::<4>::default();

    lock.read_lock(1);
    lock.read_lock(5);
    unsafe {
        lock.read_unlock(1);
        lock.read_unlock(5);
    }

    lock.lock(2);
    assert!(lock.is_write_locked(6));
    unsafe { lock.unlock(2) };
    assert!(!lock.is_write_locked(2));
}
