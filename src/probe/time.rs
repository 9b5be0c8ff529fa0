use {super::*, crate::source::Clock};

/// records the current wall-clock time.
pub struct TimeProbe<C = SystemClock> {
    info: ProbeInfo,
    clock: C,
}

// === impl TimeProbe ===

impl<C: Clock> TimeProbe<C> {
    pub fn new(clock: C) -> Self {
        Self {
            info: ProbeInfo {
                name: "time",
                field: Field::Time,
                strategy: Strategy::Instant,
            },
            clock,
        }
    }
}

impl<C: Clock> Probe for TimeProbe<C> {
    fn info(&self) -> &ProbeInfo {
        &self.info
    }

    fn sample(&self) -> Result<Reading, ProbeError> {
        Ok(Reading::Time(self.clock.now()))
    }
}
