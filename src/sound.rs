//! out-of-band sound refresh.
//!
//! volume and bluetooth state are queried through external commands, which are slow enough that
//! they are only re-run when asked for (by `SIGUSR1`, typically sent by whatever changed the
//! volume), rather than on every cycle.

use {
    crossbeam::channel::{Receiver, Sender},
    log::{debug, warn},
    std::{io, process::Command, thread},
};

/// the sound state shown in the status line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Sound {
    /// volume percentage. may exceed 100 when the sink is over-amplified.
    pub volume: u16,
    pub muted: bool,
    /// set when a bluetooth device is connected.
    pub bluetooth: bool,
}

/// the result of running an external command.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub stdout: String,
}

/// runs external commands.
pub trait Runner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<Outcome>;
}

/// runs commands as child processes.
#[derive(Default)]
pub struct SystemRunner;

#[derive(Debug, thiserror::Error)]
pub enum SoundError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited unsuccessfully")]
    Status { program: &'static str },
    #[error("could not parse volume from {output:?}")]
    Parse { output: String },
}

const VOLUME: (&str, &[&str]) = ("wpctl", &["get-volume", "@DEFAULT_AUDIO_SINK@"]);
const BLUETOOTH: (&str, &[&str]) = ("bluetoothctl", &["info"]);

/// queries the bluetooth and volume state concurrently.
///
/// a failed bluetooth query means no device is connected. a failed volume query is an error.
pub fn refresh(runner: &impl Runner) -> Result<Sound, SoundError> {
    thread::scope(|s| {
        let bluetooth = s.spawn(|| {
            let (program, args) = BLUETOOTH;
            runner
                .run(program, args)
                .map(|outcome| outcome.success)
                .unwrap_or(false)
        });

        let volume = query_volume(runner);
        let bluetooth = bluetooth.join().unwrap_or(false);

        volume.map(|(volume, muted)| Sound {
            volume,
            muted,
            bluetooth,
        })
    })
}

fn query_volume(runner: &impl Runner) -> Result<(u16, bool), SoundError> {
    let (program, args) = VOLUME;
    let Outcome { success, stdout } = runner
        .run(program, args)
        .map_err(|source| SoundError::Spawn { program, source })?;

    if !success {
        return Err(SoundError::Status { program });
    }

    parse_volume(&stdout)
}

/// parses `wpctl get-volume` output, e.g. `Volume: 0.40` or `Volume: 0.40 [MUTED]`.
pub fn parse_volume(output: &str) -> Result<(u16, bool), SoundError> {
    let parse_error = || SoundError::Parse {
        output: output.to_owned(),
    };

    let tokens = output.split_whitespace().collect::<Vec<_>>();
    let fraction = tokens
        .get(1)
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|fraction| fraction.is_finite() && *fraction >= 0.0)
        .ok_or_else(parse_error)?;
    let muted = tokens.len() >= 3;

    // round, so that e.g. 0.29 is not truncated to 28.
    let volume = (fraction * 100.0).round().min(f64::from(u16::MAX)) as u16;

    Ok((volume, muted))
}

/// re-runs [`refresh`] on each trigger, sending results to the scheduler.
///
/// runs until either channel disconnects. failures are logged, and the scheduler keeps showing
/// the last value that was sent.
pub fn refresher(
    runner: impl Runner + 'static,
    triggers: Receiver<()>,
    readings: Sender<Sound>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("sound".to_owned())
        .spawn(move || {
            for () in triggers.iter() {
                match refresh(&runner) {
                    Ok(sound) => {
                        debug!("refreshed sound: {sound:?}");
                        if readings.send(sound).is_err() {
                            break;
                        }
                    }
                    Err(error) => warn!("sound refresh failed: {error}"),
                }
            }
        })
}

// === impl SystemRunner ===

impl Runner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<Outcome> {
        let output = Command::new(program).args(args).output()?;

        Ok(Outcome {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
