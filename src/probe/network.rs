use {
    super::*,
    std::path::Path,
};

/// network throughput over the active interface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Network {
    /// set when the wired interface is the active one.
    pub tag: Option<&'static str>,
    pub rx: Rate,
    pub tx: Rate,
}

/// a per-second byte rate, scaled to a readable unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rate {
    pub value: u64,
    /// index into [`Rate::UNITS`].
    pub unit: usize,
}

/// measures throughput by reading an interface's byte counters twice, one window apart.
pub struct NetworkProbe<S = KernelFile> {
    info: ProbeInfo,
    /// the wired interface's `operstate`, which decides which interface is sampled.
    wired_state: S,
    wired: Counters<S>,
    wireless: Counters<S>,
    window: Duration,
}

/// an interface's `statistics/{rx,tx}_bytes` counters.
pub struct Counters<S> {
    pub rx_bytes: S,
    pub tx_bytes: S,
}

// === impl NetworkProbe ===

impl NetworkProbe<KernelFile> {
    const NET: &str = "/sys/class/net";

    pub fn system(wired: &str, wireless: &str, window: Duration) -> Self {
        let net = Path::new(Self::NET);
        let counters = |iface: &str| {
            let stats = net.join(iface).join("statistics");
            Counters {
                rx_bytes: KernelFile::new(stats.join("rx_bytes")),
                tx_bytes: KernelFile::new(stats.join("tx_bytes")),
            }
        };

        Self::new(
            KernelFile::new(net.join(wired).join("operstate")),
            counters(wired),
            counters(wireless),
            window,
        )
    }
}

impl<S: Source> NetworkProbe<S> {
    /// the tag shown when traffic is measured on the wired interface.
    pub const WIRED_TAG: &str = "E: ";

    pub fn new(wired_state: S, wired: Counters<S>, wireless: Counters<S>, window: Duration) -> Self {
        Self {
            info: ProbeInfo {
                name: "network",
                field: Field::Network,
                strategy: Strategy::Windowed(window),
            },
            wired_state,
            wired,
            wireless,
            window,
        }
    }

    fn wired_is_up(&self) -> Result<bool, ProbeError> {
        read_to_string(&self.wired_state).map(|state| state.trim() == "up")
    }

    /// converts the difference between two counter readings into bytes per second.
    fn per_second(&self, before: u64, after: u64) -> u64 {
        let delta = after.saturating_sub(before);
        match self.window.as_millis() {
            0 => delta,
            millis => u64::try_from(u128::from(delta) * 1000 / millis).unwrap_or(u64::MAX),
        }
    }
}

impl<S: Source> Probe for NetworkProbe<S> {
    fn info(&self) -> &ProbeInfo {
        &self.info
    }

    fn sample(&self) -> Result<Reading, ProbeError> {
        let (tag, Counters { rx_bytes, tx_bytes }) = if self.wired_is_up()? {
            (Some(Self::WIRED_TAG), &self.wired)
        } else {
            (None, &self.wireless)
        };

        let (rx0, tx0) = (read_counter(rx_bytes)?, read_counter(tx_bytes)?);
        sleep(self.window);
        let (rx1, tx1) = (read_counter(rx_bytes)?, read_counter(tx_bytes)?);

        Ok(Reading::Network(Network {
            tag,
            rx: Rate::scale(self.per_second(rx0, rx1)),
            tx: Rate::scale(self.per_second(tx0, tx1)),
        }))
    }
}

// === impl Rate ===

impl Rate {
    pub const UNITS: [&str; 4] = ["B/s", "KiB/s", "MiB/s", "GiB/s"];

    /// divides by 1024 until the value is at most 1024, or the largest unit is reached.
    pub fn scale(mut value: u64) -> Self {
        let mut unit = 0;
        while value > 1024 && unit < Self::UNITS.len() - 1 {
            value >>= 10;
            unit += 1;
        }

        Self { value, unit }
    }

    pub fn unit_name(&self) -> &'static str {
        Self::UNITS[self.unit]
    }
}
