//! the sampling loop.
//!
//! each cycle launches every probe on its own thread, waits for them at a [`CycleBarrier`], and
//! publishes the formatted [`Record`]. the record is owned here; sound readings produced by the
//! refresh thread arrive over a channel and are applied at the start of the next cycle, so a
//! published line never mixes two sound readings.

use {
    crate::{
        Error,
        barrier::CycleBarrier,
        config::FailurePolicy,
        probe::{Probe, ProbeError, Reading},
        record::Record,
        sink::Publisher,
        sound::Sound,
    },
    crossbeam::channel::{Receiver, TryRecvError, bounded, select},
    log::{debug, info, trace, warn},
    std::{
        panic::{self, AssertUnwindSafe},
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        thread,
        time::{Duration, Instant},
    },
};

/// drives the sample-and-publish loop.
pub struct Scheduler {
    probes: Vec<Arc<dyn Probe>>,
    /// one flag per probe, set while a run of that probe has not returned. a probe that outlived
    /// an earlier deadline is not launched again until it does.
    running: Vec<Arc<AtomicBool>>,
    publisher: Publisher,
    record: Record,
    /// cycle starts. `crossbeam::channel::tick` holds at most one pending tick, so ticks missed
    /// during a long cycle are coalesced.
    ticker: Receiver<Instant>,
    shutdown: Receiver<()>,
    sound: Receiver<Sound>,
    deadline: Duration,
    policy: FailurePolicy,
}

type Outcome = Result<Reading, ProbeError>;

// === impl Scheduler ===

impl Scheduler {
    pub fn new(
        probes: Vec<Arc<dyn Probe>>,
        publisher: Publisher,
        ticker: Receiver<Instant>,
        shutdown: Receiver<()>,
        sound: Receiver<Sound>,
    ) -> Self {
        let running = probes.iter().map(|_| Arc::default()).collect();
        Self {
            probes,
            running,
            publisher,
            record: Record::default(),
            ticker,
            shutdown,
            sound,
            deadline: Duration::from_secs(3),
            policy: FailurePolicy::default(),
        }
    }

    /// sets how long a cycle waits for its probes.
    pub fn deadline(self, deadline: Duration) -> Self {
        Self { deadline, ..self }
    }

    pub fn policy(self, policy: FailurePolicy) -> Self {
        Self { policy, ..self }
    }

    /// runs cycles until shutdown is requested, then restores the sink's default label.
    ///
    /// a shutdown requested while probes are running takes effect once they have finished (or
    /// the deadline passed). a disconnected shutdown or ticker channel also ends the loop.
    pub fn run(mut self) -> Result<(), Error> {
        info!("sampling {} probes every cycle", self.probes.len());

        let mut cycles = 0_u64;
        loop {
            self.absorb_sound();
            let outcomes = self.sample();

            if self.shutdown_requested() {
                info!("shutting down after {cycles} cycles, in-flight probes drained");
                break;
            }

            self.apply(outcomes)?;
            let label = self.record.to_string();
            trace!("publishing {label:?}");
            self.publisher.publish(&label)?;
            cycles += 1;

            select! {
                recv(self.shutdown) -> _ => {
                    info!("shutting down after {cycles} cycles");
                    break;
                }
                recv(self.ticker) -> tick => {
                    if tick.is_err() {
                        info!("ticker stopped after {cycles} cycles");
                        break;
                    }
                }
            }
        }

        self.publisher.release().map_err(Error::from)
    }

    /// applies the most recent sound reading, if any arrived since the last cycle.
    fn absorb_sound(&mut self) {
        if let Some(sound) = self.sound.try_iter().last() {
            debug!("applying sound reading {sound:?}");
            self.record.sound = Some(sound);
        }
    }

    /// runs every probe concurrently, and returns their outcomes in probe order.
    fn sample(&self) -> Vec<Outcome> {
        let Self {
            probes,
            running,
            deadline,
            ..
        } = self;

        let started = Instant::now();
        let (barrier, arrivals) = CycleBarrier::with_arrivals(probes.len());
        let (tx, rx) = bounded::<(usize, Outcome)>(probes.len());
        let mut outcomes = probes.iter().map(|_| None).collect::<Vec<Option<Outcome>>>();

        let launches = probes.iter().zip(running).zip(arrivals).enumerate();
        for (slot, ((probe, running), arrival)) in launches {
            if running.swap(true, Ordering::AcqRel) {
                debug!("{} is still running from an earlier cycle", probe.name());
                outcomes[slot] = Some(Err(ProbeError::Timeout(*deadline)));
                drop(arrival);
                continue;
            }

            let probe = Arc::clone(probe);
            let flag = Arc::clone(running);
            let tx = tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("probe-{}", probe.name()))
                .spawn(move || {
                    let started = Instant::now();
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| probe.sample()))
                        .unwrap_or(Err(ProbeError::Panicked));
                    trace!("{} finished in {:?}", probe.name(), started.elapsed());
                    flag.store(false, Ordering::Release);

                    // the outcome must be queued before the barrier can release the scheduler.
                    let _ = tx.send((slot, outcome));
                    drop(arrival);
                });

            // the closure, and its arrival, were dropped with the error.
            if let Err(err) = spawned {
                running.store(false, Ordering::Release);
                outcomes[slot] = Some(Err(ProbeError::Spawn(err)));
            }
        }
        drop(tx);

        if !barrier.wait_until(started + *deadline) {
            warn!(
                "{} probes missed the {deadline:?} deadline",
                barrier.remaining()
            );
        }

        for (slot, outcome) in rx.try_iter() {
            outcomes[slot] = Some(outcome);
        }

        outcomes
            .into_iter()
            .map(|outcome| outcome.unwrap_or(Err(ProbeError::Timeout(*deadline))))
            .collect()
    }

    /// stores a cycle's outcomes in the record.
    fn apply(&mut self, outcomes: Vec<Outcome>) -> Result<(), Error> {
        let Self {
            probes,
            record,
            policy,
            ..
        } = self;

        for (probe, outcome) in probes.iter().zip(outcomes) {
            let info = probe.info();
            match (outcome, *policy) {
                (Ok(reading), _) => record.apply(reading),
                (Err(source), FailurePolicy::Strict) => {
                    return Err(Error::Probe {
                        name: info.name,
                        source,
                    });
                }
                (Err(err), FailurePolicy::Degrade) => {
                    warn!("{} probe failed: {err}", info.name);
                    record.clear(info.field);
                }
            }
        }

        Ok(())
    }

    fn shutdown_requested(&self) -> bool {
        match self.shutdown.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        }
    }
}
