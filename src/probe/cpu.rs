use {
    super::*,
    crate::stat::{self, Measurement, StatReadError},
};

/// measures cpu load by reading `/proc/stat` twice, one window apart.
pub struct CpuProbe<S = KernelFile> {
    info: ProbeInfo,
    stats: S,
    window: Duration,
}

// === impl CpuProbe ===

impl CpuProbe<KernelFile> {
    const STAT: &str = "/proc/stat";

    pub fn system(window: Duration) -> Self {
        Self::new(KernelFile::new(Self::STAT), window)
    }
}

impl<S: Source> CpuProbe<S> {
    pub fn new(stats: S, window: Duration) -> Self {
        Self {
            info: ProbeInfo {
                name: "cpu",
                field: Field::Cpu,
                strategy: Strategy::Windowed(window),
            },
            stats,
            window,
        }
    }

    fn read(&self) -> Result<stat::CpuTime, ProbeError> {
        let Self { stats, .. } = self;

        stat::read(stats).map_err(|error| match error {
            StatReadError::Io(error) => ProbeError::unavailable(stats, error),
            StatReadError::Entry(error) => ProbeError::parse(stats, error),
        })
    }
}

impl<S: Source> Probe for CpuProbe<S> {
    fn info(&self) -> &ProbeInfo {
        &self.info
    }

    fn sample(&self) -> Result<Reading, ProbeError> {
        let a = self.read()?;
        sleep(self.window);
        let b = self.read()?;

        Measurement::new(a, b)
            .percentage()
            .map(Reading::Cpu)
            .ok_or_else(|| ProbeError::parse(&self.stats, "cpu counters did not advance"))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::source::MockFile};

    #[test]
    fn busy_percentage() {
        let stats = MockFile::new([
            "cpu  100 7 100 800 0 0 0 0 0 0\n",
            "cpu  150 9 125 825 0 0 0 0 0 0\n",
        ]);
        let probe = CpuProbe::new(stats, Duration::ZERO);
        // (50 + 25) busy out of (50 + 25 + 25).
        assert_eq!(probe.sample().unwrap(), Reading::Cpu(75.0));
    }

    #[test]
    fn windowed() {
        let probe = CpuProbe::new(MockFile::default(), Duration::from_secs(1));
        assert_eq!(
            probe.info().strategy,
            Strategy::Windowed(Duration::from_secs(1))
        );
    }

    #[test]
    fn stalled_counters() {
        let line = "cpu 1 2 3 4\n";
        let probe = CpuProbe::new(MockFile::new([line, line]), Duration::ZERO);
        assert!(matches!(probe.sample(), Err(ProbeError::Parse { .. })));
    }

    #[test]
    fn second_read_fails() {
        let probe = CpuProbe::new(MockFile::new(["cpu 1 2 3 4\n"]), Duration::ZERO);
        assert!(matches!(
            probe.sample(),
            Err(ProbeError::Unavailable { .. })
        ));
    }

    #[test]
    fn malformed() {
        let probe = CpuProbe::new(MockFile::new(["cpu 1 2\n"]), Duration::ZERO);
        assert!(matches!(probe.sample(), Err(ProbeError::Parse { .. })));
    }
}
