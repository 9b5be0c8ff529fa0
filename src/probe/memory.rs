use {
    super::*,
    std::io::{BufRead, BufReader},
};

/// measures used memory from `/proc/meminfo`.
pub struct MemoryProbe<S = KernelFile> {
    info: ProbeInfo,
    meminfo: S,
}

/// the fields of `/proc/meminfo` used memory is computed from, in kB.
#[derive(Debug, Default, Eq, PartialEq)]
struct MemInfo {
    total: u64,
    free: u64,
    buffers: u64,
    cached: u64,
}

// === impl MemoryProbe ===

impl MemoryProbe<KernelFile> {
    const MEMINFO: &str = "/proc/meminfo";

    pub fn system() -> Self {
        Self::new(KernelFile::new(Self::MEMINFO))
    }
}

impl<S: Source> MemoryProbe<S> {
    pub fn new(meminfo: S) -> Self {
        Self {
            info: ProbeInfo {
                name: "memory",
                field: Field::Memory,
                strategy: Strategy::Instant,
            },
            meminfo,
        }
    }

    /// scans `/proc/meminfo` up to `SwapCached`, which follows every field we need.
    fn scan(&self) -> Result<MemInfo, ProbeError> {
        let Self { meminfo, .. } = self;
        let reader = meminfo
            .open()
            .map(BufReader::new)
            .map_err(|error| ProbeError::unavailable(meminfo, error))?;

        let mut info = MemInfo::default();
        for line in reader.lines() {
            let line = line.map_err(|error| ProbeError::unavailable(meminfo, error))?;
            let (key, value) = Self::parse_line(&line)
                .ok_or_else(|| ProbeError::parse(meminfo, format_args!("{line:?}")))?;

            match key {
                "MemTotal:" => info.total = value,
                "MemFree:" => info.free = value,
                "Buffers:" => info.buffers = value,
                "Cached:" => info.cached = value,
                "SwapCached:" => break,
                _ => {}
            }
        }

        Ok(info)
    }

    /// splits a `Key:   1234 kB` line.
    fn parse_line(line: &str) -> Option<(&str, u64)> {
        let mut tokens = line.split_whitespace();
        let key = tokens.next()?;
        let value = tokens.next()?.parse().ok()?;
        Some((key, value))
    }
}

impl<S: Source> Probe for MemoryProbe<S> {
    fn info(&self) -> &ProbeInfo {
        &self.info
    }

    fn sample(&self) -> Result<Reading, ProbeError> {
        self.scan().map(|info| Reading::Memory(info.used_mib()))
    }
}

// === impl MemInfo ===

impl MemInfo {
    fn used_mib(&self) -> u64 {
        let Self {
            total,
            free,
            buffers,
            cached,
        } = *self;

        let unused = free.saturating_add(buffers).saturating_add(cached);
        total.saturating_sub(unused) >> 10
    }
}
