/*!
 * Global State Register
 *
 * One `AtomicU64` shared by every shard, packed as two independent counters:
 *
 * ```text
 *  63                32 31                 0
 * +--------------------+--------------------+
 * |      readers       |      writers       |
 * +--------------------+--------------------+
 * ```
 *
 * - `readers`: `read_lock_all` calls between announce and retract
 * - `writers`: write locks held or mid-acquisition, summed over all shards
 *
 * The register is only ever changed by compare-and-swap. Because the fields
 * never overflow into each other, adding `1` or `1 << 32` to the whole word
 * is the same as incrementing one field.
 *
 * All accesses are `SeqCst`: the wake path relies on a store to the register
 * and a store to a shard's parked counter being observed in a single order.
 */

use super::backoff::Backoff;
use crate::core::limits::{MAX_GLOBAL_READERS, MAX_WRITERS, READER_SHIFT, WRITER_MASK};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

const ONE_WRITER: u64 = 1;
const ONE_READER: u64 = 1 << READER_SHIFT;

/// Decoded view of the state register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Global readers in their acquisition phase
    pub readers: u32,
    /// Writers holding or acquiring a shard
    pub writers: u32,
}

impl StateSnapshot {
    #[inline(always)]
    #[must_use]
    pub const fn new(readers: u32, writers: u32) -> Self {
        Self { readers, writers }
    }

    /// Encode into a register word
    #[inline(always)]
    #[must_use]
    pub const fn pack(self) -> u64 {
        ((self.readers as u64) << READER_SHIFT) | self.writers as u64
    }

    /// Decode a register word
    #[inline(always)]
    #[must_use]
    pub const fn unpack(word: u64) -> Self {
        Self {
            readers: (word >> READER_SHIFT) as u32,
            writers: (word & WRITER_MASK) as u32,
        }
    }

    #[inline(always)]
    pub const fn is_idle(self) -> bool {
        self.readers == 0 && self.writers == 0
    }
}

#[inline(always)]
const fn readers(word: u64) -> u64 {
    word >> READER_SHIFT
}

#[inline(always)]
const fn writers(word: u64) -> u64 {
    word & WRITER_MASK
}

/// Lock-free reader/writer counter pair
#[derive(Debug, Default)]
pub(crate) struct StateRegister {
    word: AtomicU64,
}

impl StateRegister {
    pub(crate) const fn new() -> Self {
        Self {
            word: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn load(&self) -> u64 {
        self.word.load(Ordering::SeqCst)
    }

    #[inline]
    pub(crate) fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::unpack(self.load())
    }

    /// True if a `read_lock_all` is between announce and retract in `word`
    #[inline(always)]
    pub(crate) const fn has_readers(word: u64) -> bool {
        readers(word) != 0
    }

    /// Single attempt to count one more writer, against a previously observed word
    ///
    /// Fails if the register changed since `observed` was read.
    #[inline]
    pub(crate) fn try_add_writer(&self, observed: u64) -> bool {
        debug_assert!(writers(observed) < MAX_WRITERS, "writer counter overflow");
        self.word
            .compare_exchange(
                observed,
                observed + ONE_WRITER,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Count one writer fewer, retrying until the CAS lands
    pub(crate) fn remove_writer(&self, spin_limit: u32) {
        let mut backoff = Backoff::new(spin_limit);
        loop {
            let current = self.load();
            debug_assert!(writers(current) > 0, "writer counter underflow");
            if self.cas(current, current - ONE_WRITER) {
                return;
            }
            backoff.snooze();
        }
    }

    /// Announce a `read_lock_all`, yielding while writers are in flight
    pub(crate) fn add_reader(&self, spin_limit: u32) {
        let mut backoff = Backoff::new(spin_limit);
        loop {
            let current = self.load();
            if writers(current) != 0 {
                backoff.yield_now();
            }
            debug_assert!(readers(current) < MAX_GLOBAL_READERS, "reader counter overflow");
            if self.cas(current, current + ONE_READER) {
                return;
            }
            backoff.snooze();
        }
    }

    /// Retract a `read_lock_all` announcement
    pub(crate) fn remove_reader(&self, spin_limit: u32) {
        let mut backoff = Backoff::new(spin_limit);
        loop {
            let current = self.load();
            debug_assert!(readers(current) > 0, "reader counter underflow");
            if self.cas(current, current - ONE_READER) {
                return;
            }
            backoff.snooze();
        }
    }

    #[inline(always)]
    fn cas(&self, current: u64, new: u64) -> bool {
        self.word
            .compare_exchange_weak(current, new, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
