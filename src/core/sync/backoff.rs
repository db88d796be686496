/*!
 * Register Backoff
 *
 * Two-phase backoff for the state register's compare-and-swap retry loops:
 *
 * 1. **Tight spin phase** (first `spin_limit` retries): `spin_loop()` hint
 * 2. **Yield phase** (afterwards): `yield_now()` every retry
 *
 * There is no sleep phase. Register contention only lasts as long as other
 * threads' own CAS attempts, so parking would only add latency.
 */

use std::hint;
use std::thread;

/// Per-loop backoff state
#[derive(Debug)]
pub(crate) struct Backoff {
    step: u32,
    spin_limit: u32,
}

impl Backoff {
    #[inline]
    pub(crate) const fn new(spin_limit: u32) -> Self {
        Self {
            step: 0,
            spin_limit,
        }
    }

    /// Back off after a failed CAS
    #[inline]
    pub(crate) fn snooze(&mut self) {
        if self.step < self.spin_limit {
            hint::spin_loop();
            self.step += 1;
        } else {
            thread::yield_now();
        }
    }

    /// Give up the processor immediately, regardless of phase
    #[inline]
    pub(crate) fn yield_now(&mut self) {
        self.step = self.spin_limit;
        thread::yield_now();
    }

    #[cfg(test)]
    fn is_yielding(&self) -> bool {
        self.step >= self.spin_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_then_yield() {
        let mut backoff = Backoff::new(3);
        for _ in 0..3 {
            assert!(!backoff.is_yielding());
            backoff.snooze();
        }
        assert!(backoff.is_yielding());
        backoff.snooze();
        assert!(backoff.is_yielding());
    }

    #[test]
    fn test_zero_spin_limit_always_yields() {
        let backoff = Backoff::new(0);
        assert!(backoff.is_yielding());
    }

    #[test]
    fn test_explicit_yield_ends_spin_phase() {
        let mut backoff = Backoff::new(10);
        backoff.yield_now();
        assert!(backoff.is_yielding());
    }
}
