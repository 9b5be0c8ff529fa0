use {
    super::*,
    std::path::Path,
};

/// a battery's charge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Battery {
    /// charge percentage, `0..=100`.
    pub capacity: u8,
    pub state: ChargeState,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChargeState {
    Charging,
    Discharging,
    Full,
    Unknown,
}

/// reads a battery's charge from `/sys/class/power_supply`.
pub struct BatteryProbe<S = KernelFile> {
    info: ProbeInfo,
    capacity: S,
    status: S,
}

// === impl BatteryProbe ===

impl BatteryProbe<KernelFile> {
    const POWER_SUPPLY: &str = "/sys/class/power_supply";

    /// probes the named battery, e.g. `BAT0`.
    pub fn system(battery: &str) -> Self {
        let dir = Path::new(Self::POWER_SUPPLY).join(battery);
        Self::new(
            KernelFile::new(dir.join("capacity")),
            KernelFile::new(dir.join("status")),
        )
    }
}

impl<S: Source> BatteryProbe<S> {
    pub fn new(capacity: S, status: S) -> Self {
        Self {
            info: ProbeInfo {
                name: "battery",
                field: Field::Battery,
                strategy: Strategy::Instant,
            },
            capacity,
            status,
        }
    }
}

impl<S: Source> Probe for BatteryProbe<S> {
    fn info(&self) -> &ProbeInfo {
        &self.info
    }

    fn sample(&self) -> Result<Reading, ProbeError> {
        let Self {
            info: _,
            capacity: capacity_file,
            status: status_file,
        } = self;

        let percent = read_counter(capacity_file)?;
        let capacity = u8::try_from(percent)
            .ok()
            .filter(|percent| *percent <= 100)
            .ok_or_else(|| {
                ProbeError::parse(capacity_file, format_args!("capacity {percent} > 100"))
            })?;

        let state = read_to_string(status_file)?
            .chars()
            .next()
            .map(ChargeState::from_code)
            .ok_or_else(|| ProbeError::parse(status_file, "empty status"))?;

        Ok(Reading::Battery(Battery { capacity, state }))
    }
}

// === impl ChargeState ===

impl ChargeState {
    /// maps the first letter of a sysfs `status` ("Charging", "Discharging", "Full",
    /// "Not charging") to a state.
    pub fn from_code(code: char) -> Self {
        match code {
            'C' => Self::Charging,
            'D' => Self::Discharging,
            // "not charging" is reported by batteries held at a charge threshold.
            'F' | 'N' => Self::Full,
            _ => Self::Unknown,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Charging => '+',
            Self::Discharging => '-',
            Self::Full => '=',
            Self::Unknown => '?',
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::source::MockFile};

    fn probe(capacity: &str, status: &str) -> BatteryProbe<MockFile> {
        BatteryProbe::new(MockFile::new([capacity]), MockFile::new([status]))
    }

    #[test]
    fn discharging() {
        let reading = probe("87\n", "Discharging\n").sample().unwrap();
        assert_eq!(
            reading,
            Reading::Battery(Battery {
                capacity: 87,
                state: ChargeState::Discharging
            })
        );
    }

    #[test]
    fn symbols() {
        let cases = [
            ('C', '+'),
            ('D', '-'),
            ('F', '='),
            ('N', '='),
            ('U', '?'),
            ('x', '?'),
        ];
        for (code, symbol) in cases {
            assert_eq!(ChargeState::from_code(code).symbol(), symbol, "{code}");
        }
    }

    #[test]
    fn capacity_out_of_range() {
        let err = probe("101\n", "Full\n").sample().unwrap_err();
        assert!(matches!(err, ProbeError::Parse { .. }));
    }

    #[test]
    fn empty_status() {
        let err = probe("50\n", "").sample().unwrap_err();
        assert!(matches!(err, ProbeError::Parse { .. }));
    }

    #[test]
    fn missing_battery() {
        let probe = BatteryProbe::new(MockFile::default(), MockFile::default());
        assert!(matches!(
            probe.sample(),
            Err(ProbeError::Unavailable { .. })
        ));
    }
}
