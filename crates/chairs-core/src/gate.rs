//! Resource gate: the chairs available in one round.
//!
//! A gate is a lock-free counting admission gate. Claims never block: a
//! player either takes a chair immediately or learns that none are left.
//!
//! Gates are rebuilt rather than resized. Each round gets a fresh
//! [`ChairGate`] tagged with its round number, so a permit from a finished
//! round can never be observed by the next one.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counting gate over a fixed number of chairs.
#[derive(Debug)]
pub struct ChairGate {
    round: u32,
    capacity: usize,
    available: AtomicUsize,
}

impl ChairGate {
    /// Create a gate for `round` with every chair available.
    pub fn new(round: u32, capacity: usize) -> Self {
        Self {
            round,
            capacity,
            available: AtomicUsize::new(capacity),
        }
    }

    /// Try to take one chair without waiting.
    ///
    /// Returns `false` when every chair is taken.
    pub fn try_claim(&self) -> bool {
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Return up to `n` chairs to the gate.
    ///
    /// Never raises availability above the gate's capacity.
    pub fn release_all(&self, n: usize) {
        let capacity = self.capacity;
        let _ = self
            .available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |avail| {
                Some(avail.saturating_add(n).min(capacity))
            });
    }

    /// Round this gate was built for.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Chairs this gate was built with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Chairs still free.
    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }

    /// Chairs taken so far.
    pub fn claimed(&self) -> usize {
        self.capacity - self.available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn claims_until_exhausted() {
        let gate = ChairGate::new(1, 2);

        assert!(gate.try_claim());
        assert!(gate.try_claim());
        assert!(!gate.try_claim());
        assert_eq!(gate.claimed(), 2);
        assert_eq!(gate.available(), 0);
    }

    #[test]
    fn zero_capacity_rejects_everyone() {
        let gate = ChairGate::new(1, 0);
        assert!(!gate.try_claim());
        assert_eq!(gate.claimed(), 0);
    }

    #[test]
    fn release_is_capped_at_capacity() {
        let gate = ChairGate::new(1, 3);
        assert!(gate.try_claim());

        gate.release_all(10);
        assert_eq!(gate.available(), 3);
    }

    #[test]
    fn one_chair_two_contenders() {
        for _ in 0..200 {
            let gate = Arc::new(ChairGate::new(1, 1));
            let start = Arc::new(Barrier::new(2));
            let winners = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let gate = Arc::clone(&gate);
                    let start = Arc::clone(&start);
                    let winners = Arc::clone(&winners);
                    thread::spawn(move || {
                        start.wait();
                        if gate.try_claim() {
                            winners.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(winners.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn concurrent_claims_never_exceed_capacity() {
        let gate = Arc::new(ChairGate::new(1, 7));
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let winners = Arc::clone(&winners);
                thread::spawn(move || {
                    if gate.try_claim() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(winners.load(Ordering::SeqCst), 7);
        assert_eq!(gate.claimed(), 7);
    }

    proptest! {
        #[test]
        fn rebuild_yields_exact_capacity(previous in 0usize..16, taken in 0usize..16, next in 0usize..16) {
            let old = ChairGate::new(1, previous);
            for _ in 0..taken {
                old.try_claim();
            }

            let fresh = ChairGate::new(2, next);
            let mut granted = 0;
            while fresh.try_claim() {
                granted += 1;
            }

            prop_assert_eq!(granted, next);
            prop_assert_eq!(old.claimed(), taken.min(previous));
        }
    }
}
