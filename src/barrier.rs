use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Instant,
};

/// counts down the probes launched in one cycle.
///
/// the barrier is created together with exactly one [`Arrival`] per probe. an arrival is
/// released when it is dropped, so a probe that returns, fails, or panics arrives exactly once.
#[derive(Debug)]
pub struct CycleBarrier {
    remaining: Mutex<usize>,
    done: Condvar,
}

/// a probe's pending arrival at a [`CycleBarrier`].
#[derive(Debug)]
#[must_use = "dropping an arrival releases it"]
pub struct Arrival {
    barrier: Arc<CycleBarrier>,
}

// === impl CycleBarrier ===

impl CycleBarrier {
    /// returns a barrier expecting `count` arrivals, and those arrivals.
    pub fn with_arrivals(count: usize) -> (Arc<Self>, Vec<Arrival>) {
        let barrier = Arc::new(Self {
            remaining: Mutex::new(count),
            done: Condvar::new(),
        });
        let arrivals = (0..count)
            .map(|_| Arrival {
                barrier: Arc::clone(&barrier),
            })
            .collect();

        (barrier, arrivals)
    }

    /// the number of arrivals still outstanding.
    pub fn remaining(&self) -> usize {
        *self.lock()
    }

    /// blocks until every arrival has been released, or the deadline passes.
    ///
    /// returns `true` if every arrival was released.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut remaining = self.lock();
        while *remaining > 0 {
            let Some(timeout) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };
            remaining = self
                .done
                .wait_timeout(remaining, timeout)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        true
    }

    fn arrive(&self) {
        let mut remaining = self.lock();
        *remaining = remaining
            .checked_sub(1)
            .expect("a barrier should never see more arrivals than it was created with");
        if *remaining == 0 {
            self.done.notify_all();
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// === impl Arrival ===

impl Drop for Arrival {
    fn drop(&mut self) {
        self.barrier.arrive();
    }
}
