use {
    crate::source::Source,
    std::{
        io::{self, BufRead, BufReader},
        num::ParseIntError,
    },
};

pub use self::{
    cpu_time::{CpuTime, Measurement},
    user_hz::UserHz,
};

mod cpu_time;
mod user_hz;

#[cfg(test)]
mod tests;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum StatParseError {
    #[error("empty entry")]
    Empty,
    #[error("unrecognized entry kind: {kind}")]
    UnrecognizedEntry { kind: String },
    #[error("invalid time value: {0}")]
    UserHzParse(#[from] ParseIntError),
    #[error("expected 4 to 10 cpu times, found {found}")]
    CpuTime { found: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum StatReadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Entry(#[from] StatParseError),
}

/// reads the aggregate cpu times from a `/proc/stat` source.
///
/// the aggregate `cpu` line is always the first entry of the table, so nothing past it is read.
/// see `proc_stat(5)` for more information.
pub fn read(stats: &impl Source) -> Result<CpuTime, StatReadError> {
    let mut line = String::new();
    let reader = stats.open()?;
    BufReader::new(reader).read_line(&mut line)?;

    line.parse::<CpuTime>().map_err(StatReadError::from)
}
