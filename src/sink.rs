//! display sinks.
//!
//! a sink is where the status line goes: the root window's name (which dwm and similar window
//! managers draw in their bar), the current terminal line, or plain lines on stdout.

use {
    crossterm::{
        QueueableCommand, cursor,
        style::Print,
        terminal::{self, ClearType},
    },
    log::{debug, error},
    std::{
        io::{self, Write},
        process::Command,
    },
};

/// a surface that displays a label.
pub trait Sink: Send {
    /// replaces the displayed label.
    fn set(&mut self, label: &str) -> Result<(), SinkError>;

    /// restores the label shown when nothing is running.
    fn reset(&mut self, default: &str) -> Result<(), SinkError> {
        self.set(default)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{program} exited unsuccessfully")]
    Status { program: &'static str },
}

/// sets the root window's name through `xsetroot(1)`.
#[derive(Debug, Default)]
pub struct RootWindow;

/// rewrites the current terminal line.
#[derive(Debug, Default)]
pub struct Terminal;

/// prints one line per label.
#[derive(Debug, Default)]
pub struct Lines;

/// owns a sink for the lifetime of the scheduler, and restores its default label exactly once.
///
/// the default is restored by [`Publisher::release()`], or when the publisher is dropped if it
/// was never released.
pub struct Publisher {
    sink: Option<Box<dyn Sink>>,
    default: String,
}

// === impl RootWindow ===

impl RootWindow {
    const PROGRAM: &str = "xsetroot";
}

impl Sink for RootWindow {
    fn set(&mut self, label: &str) -> Result<(), SinkError> {
        let status = Command::new(Self::PROGRAM)
            .args(["-name", label])
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(SinkError::Status {
                program: Self::PROGRAM,
            })
        }
    }
}

// === impl Terminal ===

impl Sink for Terminal {
    fn set(&mut self, label: &str) -> Result<(), SinkError> {
        let mut stdout = io::stdout().lock();
        stdout
            .queue(cursor::MoveToColumn(0))?
            .queue(terminal::Clear(ClearType::CurrentLine))?
            .queue(Print(label))?;
        stdout.flush().map_err(SinkError::from)
    }

    /// leaves the default on its own line, so the shell prompt does not overwrite it.
    fn reset(&mut self, default: &str) -> Result<(), SinkError> {
        self.set(default)?;
        writeln!(io::stdout()).map_err(SinkError::from)
    }
}

// === impl Lines ===

impl Sink for Lines {
    fn set(&mut self, label: &str) -> Result<(), SinkError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{label}")?;
        stdout.flush().map_err(SinkError::from)
    }
}

// === impl Publisher ===

impl Publisher {
    pub fn new(sink: Box<dyn Sink>, default: impl Into<String>) -> Self {
        Self {
            sink: Some(sink),
            default: default.into(),
        }
    }

    /// displays a label.
    pub fn publish(&mut self, label: &str) -> Result<(), SinkError> {
        match self.sink.as_mut() {
            Some(sink) => sink.set(label),
            None => Ok(()),
        }
    }

    /// restores the default label and releases the sink.
    pub fn release(mut self) -> Result<(), SinkError> {
        self.restore()
    }

    fn restore(&mut self) -> Result<(), SinkError> {
        let Self { sink, default } = self;

        match sink.take() {
            Some(mut sink) => {
                debug!("restoring default label {default:?}");
                sink.reset(default)
            }
            None => Ok(()),
        }
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            error!("could not restore the default label: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::sync::{Arc, Mutex},
    };

    #[derive(Clone, Debug, Eq, PartialEq)]
    enum Event {
        Set(String),
        Reset(String),
    }

    /// a sink that records what it was asked to display.
    #[derive(Clone, Default)]
    struct MockSink {
        events: Arc<Mutex<Vec<Event>>>,
        fail: bool,
    }

    impl MockSink {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Sink for MockSink {
        fn set(&mut self, label: &str) -> Result<(), SinkError> {
            self.events.lock().unwrap().push(Event::Set(label.to_owned()));
            if self.fail {
                return Err(SinkError::Status { program: "mock" });
            }
            Ok(())
        }

        fn reset(&mut self, default: &str) -> Result<(), SinkError> {
            self.events
                .lock()
                .unwrap()
                .push(Event::Reset(default.to_owned()));
            Ok(())
        }
    }

    #[test]
    fn release_restores_once() {
        let sink = MockSink::default();
        let mut publisher = Publisher::new(Box::new(sink.clone()), "dwm");
        publisher.publish("a").unwrap();
        publisher.release().unwrap();
        assert_eq!(
            sink.events(),
            [Event::Set("a".into()), Event::Reset("dwm".into())]
        );
    }

    #[test]
    fn drop_restores() {
        let sink = MockSink::default();
        {
            let _publisher = Publisher::new(Box::new(sink.clone()), "dwm");
        }
        assert_eq!(sink.events(), [Event::Reset("dwm".into())]);
    }

    #[test]
    fn publish_failure_is_reported_and_still_restores() {
        let sink = MockSink {
            fail: true,
            ..MockSink::default()
        };
        let mut publisher = Publisher::new(Box::new(sink.clone()), "dwm");
        assert!(matches!(
            publisher.publish("a"),
            Err(SinkError::Status { program: "mock" })
        ));
        drop(publisher);
        assert_eq!(
            sink.events(),
            [Event::Set("a".into()), Event::Reset("dwm".into())]
        );
    }

    #[test]
    fn default_reset_sets_the_label() {
        let mut sink = MockSinkWithoutReset::default();
        sink.reset("dwm").unwrap();
        assert_eq!(sink.0, ["dwm"]);
    }

    #[derive(Default)]
    struct MockSinkWithoutReset(Vec<String>);

    impl Sink for MockSinkWithoutReset {
        fn set(&mut self, label: &str) -> Result<(), SinkError> {
            self.0.push(label.to_owned());
            Ok(())
        }
    }
}
