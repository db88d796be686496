/*!
 * Shard Lock
 *
 * One raw read/write lock per shard, paired with a condition variable built
 * directly on parking_lot_core. The condition's wait-set is bound to the
 * shard's exclusive lock: a parked writer releases the exclusive lock while
 * asleep and takes it back before returning, like a condvar over a mutex.
 *
 * # Parking
 *
 * Writers park on the address of the shard's `parked` counter. The park is
 * validated under the parking bucket lock against a caller-supplied
 * predicate, so a wake issued after the predicate turned false can never be
 * missed.
 */

use parking_lot::lock_api::RawRwLock as _;
use parking_lot::RawRwLock;
use parking_lot_core::{park, unpark_all, ParkResult, DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Pads and aligns a value to the length of a cache line
///
/// Neighbouring shards in an array never share a cache line, so lock traffic
/// on one shard does not invalidate its neighbours.
#[cfg_attr(
    any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64"),
    repr(C, align(128))
)]
#[cfg_attr(
    not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64")),
    repr(C, align(64))
)]
#[derive(Debug, Default)]
pub struct CacheAligned<T> {
    value: T,
}

impl<T> CacheAligned<T> {
    #[inline]
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T> Deref for CacheAligned<T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for CacheAligned<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// A shard: raw read/write lock plus its writer wait-set
pub(crate) struct Shard {
    lock: RawRwLock,
    /// Writers currently parked (also the parking address)
    parked: AtomicUsize,
}

impl Shard {
    pub(crate) const fn new() -> Self {
        Self {
            lock: RawRwLock::INIT,
            parked: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub(crate) fn lock_exclusive(&self) {
        self.lock.lock_exclusive();
    }

    /// # Safety
    ///
    /// The shard must be exclusively locked by the caller.
    #[inline]
    pub(crate) unsafe fn unlock_exclusive(&self) {
        self.lock.unlock_exclusive();
    }

    #[inline]
    pub(crate) fn lock_shared(&self) {
        self.lock.lock_shared();
    }

    /// # Safety
    ///
    /// The caller must hold one shared lock on the shard.
    #[inline]
    pub(crate) unsafe fn unlock_shared(&self) {
        self.lock.unlock_shared();
    }

    #[inline]
    pub(crate) fn is_locked_exclusive(&self) -> bool {
        self.lock.is_locked_exclusive()
    }

    #[inline]
    pub(crate) fn parked(&self) -> usize {
        self.parked.load(Ordering::SeqCst)
    }

    #[inline(always)]
    fn park_key(&self) -> usize {
        &self.parked as *const AtomicUsize as usize
    }

    /// Park the calling writer until woken, if `should_park` still holds
    ///
    /// The caller must hold the shard's exclusive lock; it holds it again on
    /// return. Returns early without sleeping if `should_park` is false once
    /// the wait-set is locked. Wakeups may be spurious.
    pub(crate) fn wait_while<F>(&self, should_park: F)
    where
        F: FnOnce() -> bool,
    {
        self.parked.fetch_add(1, Ordering::SeqCst);

        // SAFETY: the caller holds the exclusive lock, and the lock is only
        // released once the thread is queued.
        let before_sleep = || unsafe { self.lock.unlock_exclusive() };

        // SAFETY: the key is the address of our own counter, which nothing
        // else parks on. `should_park` only reads atomics and never re-enters
        // parking_lot while the bucket is locked.
        let result = unsafe {
            park(
                self.park_key(),
                should_park,
                before_sleep,
                |_, _| {},
                DEFAULT_PARK_TOKEN,
                None,
            )
        };

        self.parked.fetch_sub(1, Ordering::SeqCst);

        // An invalid park never ran `before_sleep`, so the lock is still ours
        if !matches!(result, ParkResult::Invalid) {
            self.lock.lock_exclusive();
        }
    }

    /// Wake every writer parked on this shard, returning how many woke
    pub(crate) fn wake_all(&self) -> usize {
        if self.parked.load(Ordering::SeqCst) == 0 {
            return 0;
        }
        // SAFETY: no callbacks are involved; the key is our own counter.
        unsafe { unpark_all(self.park_key(), DEFAULT_UNPARK_TOKEN) }
    }
}
