//! a compact status bar sampler.

use {
    clap::Parser,
    rootbar::{App, Config, FailurePolicy, SinkKind},
    std::time::Duration,
};

mod logger;

#[derive(Parser)]
#[command(name = "rootbar")]
#[command(about = "a compact status bar sampler")]
#[command(version)]
struct Cli {
    /// Milliseconds between cycle starts
    #[arg(long, default_value_t = 1500)]
    interval_ms: u64,

    /// Milliseconds the cpu and network probes wait between their two readings
    #[arg(long, default_value_t = 1000)]
    window_ms: u64,

    /// Milliseconds a cycle waits for its probes before showing placeholders
    #[arg(long, default_value_t = 3000)]
    deadline_ms: u64,

    /// Where the status line is displayed
    #[arg(long, value_enum, default_value_t = SinkKind::RootWindow)]
    sink: SinkKind,

    /// Label restored on exit
    #[arg(long, default_value = "dwm")]
    default_label: String,

    /// Battery name under /sys/class/power_supply
    #[arg(long, default_value = "BAT1")]
    battery: String,

    /// Wired interface, preferred whenever it is up
    #[arg(long, default_value = "enp0s25")]
    wired: String,

    /// Wireless interface, used when the wired one is down
    #[arg(long, default_value = "wlp3s0")]
    wireless: String,

    /// Exit on the first probe failure instead of showing a placeholder
    #[arg(long)]
    strict: bool,

    /// More logging (-v info, -vv debug, -vvv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), rootbar::Error> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    App::new(cli.into()).run()
}

// === impl Cli ===

impl From<Cli> for Config {
    fn from(
        Cli {
            interval_ms,
            window_ms,
            deadline_ms,
            sink,
            default_label,
            battery,
            wired,
            wireless,
            strict,
            verbose: _,
        }: Cli,
    ) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            window: Duration::from_millis(window_ms),
            deadline: Duration::from_millis(deadline_ms),
            sink,
            default_label,
            battery,
            wired,
            wireless,
            policy: if strict {
                FailurePolicy::Strict
            } else {
                FailurePolicy::Degrade
            },
        }
    }
}
