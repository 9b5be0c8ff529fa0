//! process signals.
//!
//! the handled signals are blocked in every thread and taken synchronously with `sigwait(3)` by a
//! single listener, which turns them into channel messages. nothing runs in signal-handler
//! context.

use {
    crossbeam::channel::Sender,
    libc::c_int,
    log::{debug, error, info},
    std::{io, mem::MaybeUninit, ptr, thread},
};

/// what a received signal asks for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Signal {
    Shutdown,
    Refresh,
}

/// the set of handled signals, blocked in the calling thread.
pub struct Signals {
    set: libc::sigset_t,
}

// === impl Signal ===

impl Signal {
    pub const SHUTDOWN: [c_int; 4] = [libc::SIGHUP, libc::SIGINT, libc::SIGTERM, libc::SIGQUIT];
    pub const REFRESH: c_int = libc::SIGUSR1;

    pub fn classify(signo: c_int) -> Option<Self> {
        if Self::SHUTDOWN.contains(&signo) {
            Some(Self::Shutdown)
        } else if signo == Self::REFRESH {
            Some(Self::Refresh)
        } else {
            None
        }
    }
}

// === impl Signals ===

impl Signals {
    /// blocks the handled signals in the calling thread.
    ///
    /// threads inherit their creator's mask, so this must be called before any other thread is
    /// spawned.
    pub fn block() -> io::Result<Self> {
        let mut set = MaybeUninit::<libc::sigset_t>::uninit();
        // SAFETY: sigemptyset initializes the set, and cannot fail for a valid pointer.
        let mut set = unsafe {
            libc::sigemptyset(set.as_mut_ptr());
            set.assume_init()
        };

        for signo in Signal::SHUTDOWN.into_iter().chain([Signal::REFRESH]) {
            // SAFETY: `set` is initialized, and `signo` is a valid signal number.
            if unsafe { libc::sigaddset(&mut set, signo) } != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        // SAFETY: `set` is initialized. the previous mask is not asked for.
        match unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &set, ptr::null_mut()) } {
            0 => Ok(Self { set }),
            errno => Err(io::Error::from_raw_os_error(errno)),
        }
    }

    /// blocks until a handled signal is pending, and takes it.
    pub fn wait(&self) -> io::Result<Signal> {
        loop {
            let mut signo: c_int = 0;
            // SAFETY: both pointers are valid for the duration of the call.
            match unsafe { libc::sigwait(&self.set, &mut signo) } {
                0 => {}
                errno => return Err(io::Error::from_raw_os_error(errno)),
            }

            debug!("received signal {signo}");
            if let Some(signal) = Signal::classify(signo) {
                return Ok(signal);
            }
        }
    }

    /// forwards signals to the shutdown and refresh channels from a dedicated thread.
    pub fn forward(
        self,
        shutdown: Sender<()>,
        refresh: Sender<()>,
    ) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("signals".to_owned())
            .spawn(move || {
                loop {
                    let sent = match self.wait() {
                        Ok(Signal::Shutdown) => {
                            info!("received a termination signal");
                            shutdown.send(())
                        }
                        Ok(Signal::Refresh) => refresh.send(()),
                        Err(err) => {
                            error!("could not wait for signals: {err}");
                            break;
                        }
                    };
                    if sent.is_err() {
                        break;
                    }
                }
            })
    }
}
