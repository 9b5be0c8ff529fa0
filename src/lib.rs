//! a compact status bar sampler.
//!
//! every cycle, battery, cpu, network, memory, and clock probes run in parallel. once they have
//! all finished, their readings are formatted into one line and published to a display sink,
//! by default the root window's name that dwm draws in its bar. volume is refreshed separately,
//! on `SIGUSR1`.

use {
    self::{
        probe::ProbeError,
        scheduler::Scheduler,
        sink::{Publisher, SinkError},
        signal::Signals,
        sound::SystemRunner,
    },
    crossbeam::channel::{tick, unbounded},
    log::info,
    std::io,
};

pub use self::{
    barrier::{Arrival, CycleBarrier},
    config::{Config, FailurePolicy, SinkKind},
    record::Record,
};

pub mod barrier;
pub mod config;
pub mod probe;
pub mod record;
pub mod scheduler;
pub mod signal;
pub mod sink;
pub mod sound;
pub mod source;

/// kernel statistics facilities.
///
/// this file provides tools to read the aggregate cpu times in `/proc/stat`.
mod stat;

pub struct App {
    config: Config,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not update the display: {0}")]
    Sink(#[from] SinkError),
    #[error("{name} probe failed: {source}")]
    Probe {
        name: &'static str,
        #[source]
        source: ProbeError,
    },
    #[error("could not set up signal handling: {0}")]
    Signal(#[source] io::Error),
    #[error("could not start the {name} thread: {source}")]
    Thread {
        name: &'static str,
        #[source]
        source: io::Error,
    },
}

// === impl App ===

impl App {
    /// initializes a new application.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// runs the application until a termination signal arrives.
    pub fn run(self) -> Result<(), Error> {
        let Self { config } = self;

        // must precede every other thread.
        let signals = Signals::block().map_err(Error::Signal)?;

        let (shutdown_tx, shutdown_rx) = unbounded();
        let (refresh_tx, refresh_rx) = unbounded();
        let (sound_tx, sound_rx) = unbounded();

        signals
            .forward(shutdown_tx, refresh_tx.clone())
            .map_err(|source| Error::Thread {
                name: "signals",
                source,
            })?;
        sound::refresher(SystemRunner, refresh_rx, sound_tx).map_err(|source| Error::Thread {
            name: "sound",
            source,
        })?;

        // read the volume once up front, rather than waiting for the first `SIGUSR1`.
        let _ = refresh_tx.send(());

        info!("starting with {config:?}");
        let publisher = Publisher::new(config.sink.open(), config.default_label.clone());
        Scheduler::new(
            probe::standard(&config),
            publisher,
            tick(config.interval),
            shutdown_rx,
            sound_rx,
        )
        .deadline(config.deadline)
        .policy(config.policy)
        .run()
    }
}
