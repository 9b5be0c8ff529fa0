use {
    chrono::{DateTime, Local},
    std::{
        collections::VecDeque,
        fs::File,
        io::{self, BufReader, Cursor, Read},
        path::PathBuf,
        sync::{Mutex, PoisonError},
    },
};

pub use self::{clock::*, files::*};

mod clock {
    use super::*;

    /// a source of wall-clock time.
    pub trait Clock: Send + Sync {
        fn now(&self) -> DateTime<Local>;
    }

    #[derive(Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Local> {
            Local::now()
        }
    }

    /// a mock clock.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockClock {
        times: Mutex<VecDeque<DateTime<Local>>>,
    }

    impl MockClock {
        #[allow(dead_code, reason = "this is a testing utility.")]
        pub fn new(times: impl IntoIterator<Item = DateTime<Local>>) -> Self {
            Self {
                times: Mutex::new(times.into_iter().collect()),
            }
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Local> {
            let MockClock { times } = self;

            times
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .expect("mock times should not be empty")
        }
    }
}

/// abstracts over providers of metric files.
mod files {
    use super::*;

    /// a readable source of one metric.
    pub trait Source: Send + Sync {
        /// returns a reader.
        fn open(&self) -> io::Result<impl Read>;

        /// where this source reads from, for error reports.
        fn location(&self) -> &str;
    }

    /// a source backed by a file in `/proc` or `/sys`.
    #[derive(Clone, Debug)]
    pub struct KernelFile {
        path: PathBuf,
        display: String,
    }

    /// a mock source, replaying one queued content per `open()`.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockFile {
        contents: Mutex<VecDeque<String>>,
    }

    // === impl KernelFile ===

    impl KernelFile {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            let path = path.into();
            let display = path.display().to_string();
            Self { path, display }
        }
    }

    impl Source for KernelFile {
        fn open(&self) -> io::Result<impl Read> {
            File::open(&self.path).map(BufReader::new)
        }

        fn location(&self) -> &str {
            &self.display
        }
    }

    // === impl MockFile ===

    impl MockFile {
        #[allow(dead_code, reason = "this is a testing utility.")]
        pub fn new<S: Into<String>>(contents: impl IntoIterator<Item = S>) -> Self {
            let contents = contents.into_iter().map(Into::into).collect();
            Self {
                contents: Mutex::new(contents),
            }
        }
    }

    impl Source for MockFile {
        /// an exhausted mock behaves like a missing file.
        fn open(&self) -> io::Result<impl Read> {
            let Self { contents } = self;

            contents
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .map(Cursor::new)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "mock source is exhausted"))
        }

        fn location(&self) -> &str {
            "<mock>"
        }
    }
}
