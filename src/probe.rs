//! metric probes.
//!
//! every probe samples one metric family and is run on its own thread once per cycle. probes
//! share nothing with each other, and report through their return value rather than by writing
//! into the record.

use {
    crate::{
        config::Config,
        source::{KernelFile, Source, SystemClock},
    },
    chrono::{DateTime, Local},
    std::{
        fmt,
        io::{self, Read},
        sync::Arc,
        time::Duration,
    },
};

pub use self::{
    battery::{Battery, BatteryProbe, ChargeState},
    cpu::CpuProbe,
    memory::MemoryProbe,
    network::{Counters, Network, NetworkProbe, Rate},
    time::TimeProbe,
};

mod battery;
mod cpu;
mod memory;
mod network;
mod time;

/// a unit of work sampling one metric.
pub trait Probe: Send + Sync {
    /// probe metadata.
    fn info(&self) -> &ProbeInfo;

    /// samples the metric. may block for up to one sampling window.
    fn sample(&self) -> Result<Reading, ProbeError>;

    /// convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}

/// metadata about a probe.
#[derive(Clone, Debug)]
pub struct ProbeInfo {
    /// unique identifier (e.g. `"cpu"`).
    pub name: &'static str,
    /// the record field this probe fills.
    pub field: Field,
    /// how the probe samples.
    pub strategy: Strategy,
}

/// a field of the [`Record`][crate::Record] filled by a periodic probe.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Field {
    Battery,
    Cpu,
    Network,
    Memory,
    Time,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// a single read.
    Instant,
    /// two reads, separated by a fixed window, reported as a rate.
    Windowed(Duration),
}

/// the output of one probe run.
#[derive(Clone, Debug, PartialEq)]
pub enum Reading {
    Battery(Battery),
    /// busy percentage, `0.0..=100.0`.
    Cpu(f64),
    Network(Network),
    /// used memory, in whole MiB.
    Memory(u64),
    Time(DateTime<Local>),
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// a metric source could not be opened or read.
    #[error("could not read {location}: {source}")]
    Unavailable {
        location: String,
        #[source]
        source: io::Error,
    },
    /// a metric source did not have the expected shape.
    #[error("could not parse {location}: {detail}")]
    Parse { location: String, detail: String },
    /// the probe did not finish before the cycle deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// the probe panicked.
    #[error("panicked")]
    Panicked,
    /// the probe's thread could not be started.
    #[error("could not spawn probe thread: {0}")]
    Spawn(#[source] io::Error),
}

/// the five periodic probes, in launch order.
pub fn standard(config: &Config) -> Vec<Arc<dyn Probe>> {
    let window = config.window;

    vec![
        Arc::new(BatteryProbe::<KernelFile>::system(&config.battery)),
        Arc::new(CpuProbe::<KernelFile>::system(window)),
        Arc::new(NetworkProbe::<KernelFile>::system(
            &config.wired,
            &config.wireless,
            window,
        )),
        Arc::new(MemoryProbe::<KernelFile>::system()),
        Arc::new(TimeProbe::new(SystemClock)),
    ]
}

// === impl ProbeError ===

impl ProbeError {
    fn unavailable(source: &impl Source, error: io::Error) -> Self {
        Self::Unavailable {
            location: source.location().to_owned(),
            source: error,
        }
    }

    fn parse(source: &impl Source, detail: impl fmt::Display) -> Self {
        Self::Parse {
            location: source.location().to_owned(),
            detail: detail.to_string(),
        }
    }
}

/// reads a source to the end.
fn read_to_string(source: &impl Source) -> Result<String, ProbeError> {
    let mut contents = String::new();
    source
        .open()
        .and_then(|mut reader| reader.read_to_string(&mut contents))
        .map_err(|error| ProbeError::unavailable(source, error))?;

    Ok(contents)
}

/// reads a source holding a single unsigned integer, like sysfs counters.
fn read_counter(source: &impl Source) -> Result<u64, ProbeError> {
    let contents = read_to_string(source)?;
    let contents = contents.trim();

    contents
        .parse::<u64>()
        .map_err(|error| ProbeError::parse(source, format_args!("{contents:?}: {error}")))
}

/// sleeps for a sampling window.
fn sleep(window: Duration) {
    if !window.is_zero() {
        std::thread::sleep(window);
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::source::MockFile};

    #[test]
    fn read_counter_trims_newline() {
        let source = MockFile::new(["123456\n"]);
        assert_eq!(read_counter(&source).unwrap(), 123456);
    }

    #[test]
    fn read_counter_rejects_garbage() {
        let source = MockFile::new(["up\n"]);
        assert!(matches!(
            read_counter(&source),
            Err(ProbeError::Parse { .. })
        ));
    }

    #[test]
    fn read_counter_missing_source() {
        let source = MockFile::default();
        match read_counter(&source) {
            Err(ProbeError::Unavailable { location, .. }) => assert_eq!(location, "<mock>"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn standard_set() {
        let probes = standard(&Config::default());
        let fields = probes.iter().map(|p| p.info().field).collect::<Vec<_>>();
        assert_eq!(
            fields,
            [
                Field::Battery,
                Field::Cpu,
                Field::Network,
                Field::Memory,
                Field::Time
            ]
        );
    }
}
