use super::*;

use std::str::FromStr;

/// how the system's cpus, in aggregate, have spent their time since boot.
///
/// only the first four columns are kept. kernels since 2.6.33 report ten, older ones fewer; the
/// trailing columns (iowait, irq, softirq, steal, guest, guest_nice) do not count towards load.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CpuTime {
    /// time spent in user mode.
    pub user: UserHz,
    /// time spent in user mode with low priority (nice).
    pub nice: UserHz,
    /// time spent in system mode.
    pub system: UserHz,
    /// time spent in the idle task.
    pub idle: UserHz,
}

/// a measurement of the difference between two [`CpuTime`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Measurement {
    user: UserHz,
    system: UserHz,
    idle: UserHz,
}

// === impl Measurement ===

impl Measurement {
    pub fn new(a: CpuTime, b: CpuTime) -> Self {
        Self {
            user: b.user.saturating_sub(a.user),
            system: b.system.saturating_sub(a.system),
            idle: b.idle.saturating_sub(a.idle),
        }
    }

    /// returns the percentage of time spent busy, in `[0.0, 100.0]`.
    ///
    /// returns `None` if no time elapsed between the two readings.
    pub fn percentage(&self) -> Option<f64> {
        let total = self.total();
        if total.is_zero() {
            return None;
        }

        Some(self.busy() / total * 100.0)
    }

    /// time spent in user or system mode. niced time is not counted.
    pub fn busy(&self) -> UserHz {
        let Self {
            user,
            system,
            idle: _,
        } = *self;

        user + system
    }

    pub fn total(&self) -> UserHz {
        let Self { user, system, idle } = *self;

        user + system + idle
    }
}

// === impl CpuTime ===

impl CpuTime {
    const MIN_COLUMNS: usize = 4;
    const MAX_COLUMNS: usize = 10;
}

impl FromStr for CpuTime {
    type Err = StatParseError;
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let tokens = entry.split_whitespace().collect::<Vec<_>>();
        let [kind, times @ ..] = tokens.as_slice() else {
            return Err(StatParseError::Empty);
        };

        // per-cpu lines ("cpu0", "cpu1", ...) are not the aggregate.
        if *kind != "cpu" {
            return Err(StatParseError::UnrecognizedEntry {
                kind: (*kind).to_owned(),
            });
        }

        times
            .iter()
            .map(|t| t.parse::<UserHz>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(StatParseError::UserHzParse)
            .and_then(CpuTime::try_from)
    }
}

impl TryFrom<Vec<UserHz>> for CpuTime {
    type Error = StatParseError;
    fn try_from(times: Vec<UserHz>) -> Result<Self, Self::Error> {
        let found = times.len();
        if !(Self::MIN_COLUMNS..=Self::MAX_COLUMNS).contains(&found) {
            return Err(StatParseError::CpuTime { found });
        }

        let [user, nice, system, idle, ..] = times.as_slice() else {
            unreachable!("at least four columns were checked for");
        };

        Ok(Self {
            user: *user,
            nice: *nice,
            system: *system,
            idle: *idle,
        })
    }
}
