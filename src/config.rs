use {
    crate::sink::{Lines, RootWindow, Sink, Terminal},
    std::time::Duration,
};

/// runtime configuration.
///
/// the defaults reproduce the classic setup: a 1.5 second cycle drawn on the root window for
/// dwm, with `dwm` restored on exit.
#[derive(Clone, Debug)]
pub struct Config {
    /// time between cycle starts.
    pub interval: Duration,
    /// how long windowed probes (cpu, network) wait between their two readings.
    pub window: Duration,
    /// how long a cycle waits for its probes.
    pub deadline: Duration,
    pub sink: SinkKind,
    /// the label restored on exit.
    pub default_label: String,
    /// the battery under `/sys/class/power_supply`.
    pub battery: String,
    /// the wired interface, preferred whenever it is up.
    pub wired: String,
    pub wireless: String,
    pub policy: FailurePolicy,
}

/// where the status line is displayed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum SinkKind {
    /// the root window's name, via `xsetroot`.
    #[default]
    #[value(name = "xroot")]
    RootWindow,
    /// the current terminal line.
    Terminal,
    /// one line per cycle on stdout.
    Stdout,
}

/// what a cycle does when a probe fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FailurePolicy {
    /// show a placeholder for the probe's field, and keep going.
    #[default]
    Degrade,
    /// stop sampling.
    Strict,
}

// === impl Config ===

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1500),
            window: Duration::from_secs(1),
            deadline: Duration::from_secs(3),
            sink: SinkKind::default(),
            default_label: "dwm".to_owned(),
            battery: "BAT1".to_owned(),
            wired: "enp0s25".to_owned(),
            wireless: "wlp3s0".to_owned(),
            policy: FailurePolicy::default(),
        }
    }
}

// === impl SinkKind ===

impl SinkKind {
    pub fn open(self) -> Box<dyn Sink> {
        match self {
            Self::RootWindow => Box::new(RootWindow),
            Self::Terminal => Box::new(Terminal),
            Self::Stdout => Box::new(Lines),
        }
    }
}
