use {
    crate::{
        probe::{Battery, Field, Network, Reading},
        sound::Sound,
    },
    chrono::{DateTime, Local},
    std::fmt::{self, Display},
};

/// the latest value of every metric.
///
/// owned by the scheduler. periodic fields are replaced together once a cycle's probes have all
/// finished; `None` means the field's probe failed in the latest cycle. sound is sticky, and only
/// changes when a refresh delivers a new reading.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    pub battery: Option<Battery>,
    pub cpu: Option<f64>,
    pub network: Option<Network>,
    pub memory: Option<u64>,
    pub time: Option<DateTime<Local>>,
    pub sound: Option<Sound>,
}

// === impl Record ===

impl Record {
    const TIME_FORMAT: &str = "%a %b %d %I:%M %p";

    /// stores a probe's reading in its field.
    pub fn apply(&mut self, reading: Reading) {
        match reading {
            Reading::Battery(battery) => self.battery = Some(battery),
            Reading::Cpu(cpu) => self.cpu = Some(cpu),
            Reading::Network(network) => self.network = Some(network),
            Reading::Memory(memory) => self.memory = Some(memory),
            Reading::Time(time) => self.time = Some(time),
        }
    }

    /// marks a field as unavailable.
    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Battery => self.battery = None,
            Field::Cpu => self.cpu = None,
            Field::Network => self.network = None,
            Field::Memory => self.memory = None,
            Field::Time => self.time = None,
        }
    }
}

/// renders the status line.
///
/// fields are separated by three spaces:
/// `E: 12 KiB/s↓ 3 KiB/s↑   BM40%   12.50%   2048 MiB   87%-   Mon Jan 02 03:04 PM`
impl Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            battery,
            cpu,
            network,
            memory,
            time,
            sound,
        } = self;

        match network {
            Some(Network { tag, rx, tx }) => write!(
                f,
                "{}{} {}↓ {} {}↑",
                tag.unwrap_or_default(),
                rx.value,
                rx.unit_name(),
                tx.value,
                tx.unit_name()
            )?,
            None => f.write_str("?↓ ?↑")?,
        }
        f.write_str("   ")?;

        match sound {
            Some(Sound {
                volume,
                muted,
                bluetooth,
            }) => write!(
                f,
                "{}{}{volume}%",
                if *bluetooth { "B" } else { "" },
                if *muted { "M" } else { "" },
            )?,
            None => f.write_str("?%")?,
        }
        f.write_str("   ")?;

        match cpu {
            Some(cpu) => write!(f, "{cpu:.2}%")?,
            None => f.write_str("?%")?,
        }
        f.write_str("   ")?;

        match memory {
            Some(memory) => write!(f, "{memory} MiB")?,
            None => f.write_str("? MiB")?,
        }
        f.write_str("   ")?;

        match battery {
            Some(Battery { capacity, state }) => write!(f, "{capacity}%{}", state.symbol())?,
            None => f.write_str("?%?")?,
        }
        f.write_str("   ")?;

        match time {
            Some(time) => write!(f, "{}", time.format(Self::TIME_FORMAT)),
            None => f.write_str("?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::probe::{ChargeState, Rate},
        chrono::TimeZone,
    };

    fn full() -> Record {
        Record {
            battery: Some(Battery {
                capacity: 87,
                state: ChargeState::Discharging,
            }),
            cpu: Some(12.5),
            network: Some(Network {
                tag: Some("E: "),
                rx: Rate { value: 12, unit: 1 },
                tx: Rate { value: 3, unit: 0 },
            }),
            memory: Some(2048),
            time: Some(Local.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()),
            sound: Some(Sound {
                volume: 40,
                muted: true,
                bluetooth: true,
            }),
        }
    }

    #[test]
    fn renders_every_field() {
        assert_eq!(
            full().to_string(),
            "E: 12 KiB/s↓ 3 B/s↑   BM40%   12.50%   2048 MiB   87%-   Mon Jan 02 03:04 PM"
        );
    }

    #[test]
    fn renders_without_tags() {
        let mut record = full();
        record.network = record.network.map(|n| Network { tag: None, ..n });
        record.sound = Some(Sound {
            volume: 100,
            muted: false,
            bluetooth: false,
        });
        assert_eq!(
            record.to_string(),
            "12 KiB/s↓ 3 B/s↑   100%   12.50%   2048 MiB   87%-   Mon Jan 02 03:04 PM"
        );
    }

    #[test]
    fn renders_placeholders() {
        assert_eq!(
            Record::default().to_string(),
            "?↓ ?↑   ?%   ?%   ? MiB   ?%?   ?"
        );
    }

    #[test]
    fn clear_only_touches_one_field() {
        let mut record = full();
        record.clear(Field::Cpu);
        assert_eq!(record.cpu, None);
        assert_eq!(record.memory, Some(2048));
        assert!(record.sound.is_some());
    }

    #[test]
    fn apply_replaces() {
        let mut record = Record::default();
        record.apply(Reading::Memory(1));
        record.apply(Reading::Memory(2));
        assert_eq!(record.memory, Some(2));
    }
}
