//! Cooperative stop signals for the pipeline workers.
//!
//! Each worker owns one [`StopToken`]. The control flow stops workers one at a
//! time, upstream first, so that every stage can drain what its producer left
//! behind before it exits. A token is a one-way latch: once stop has been
//! requested it stays requested.

use parking_lot::{Condvar, Mutex};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Default)]
struct StopState {
    requested: Mutex<bool>,
    cv: Condvar,
}

#[derive(Debug, Clone, Default)]
pub struct StopToken {
    state: Arc<StopState>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        let mut requested = self.state.requested.lock();
        *requested = true;
        self.state.cv.notify_all();
    }

    pub fn stop_requested(&self) -> bool {
        *self.state.requested.lock()
    }

    /// Sleep for up to `timeout`, returning early if stop is requested.
    ///
    /// Returns `true` when stop has been requested.
    pub fn sleep(&self, timeout: Duration) -> bool {
        let mut requested = self.state.requested.lock();
        if !*requested {
            let _ = self.state.cv.wait_for(&mut requested, timeout);
        }
        *requested
    }

    /// Block until stop is requested.
    pub fn wait(&self) {
        let mut requested = self.state.requested.lock();
        while !*requested {
            self.state.cv.wait(&mut requested);
        }
    }
}

/// A named long-lived pipeline thread together with its stop token.
#[derive(Debug)]
pub struct Worker {
    name: &'static str,
    token: StopToken,
    handle: JoinHandle<()>,
}

impl Worker {
    pub fn spawn<F>(name: &'static str, f: F) -> io::Result<Self>
    where
        F: FnOnce(StopToken) + Send + 'static,
    {
        let token = StopToken::new();
        let worker_token = token.clone();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || f(worker_token))?;

        tracing::debug!(worker = name, "worker started");
        Ok(Self {
            name,
            token,
            handle,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn token(&self) -> &StopToken {
        &self.token
    }

    /// Request stop and wait for the worker to drain and exit.
    pub fn stop(self) {
        self.token.request_stop();
        self.join();
    }

    /// Give up on the worker without waiting, e.g. a reader stuck in a
    /// blocking read after an interrupt.
    pub fn detach(self) {
        tracing::debug!(worker = self.name, "worker detached");
    }

    pub fn join(self) {
        if self.handle.join().is_err() {
            tracing::error!(worker = self.name, "worker panicked");
        } else {
            tracing::debug!(worker = self.name, "worker stopped");
        }
    }
}

/// Set once the process has been interrupted (Ctrl-C / SIGTERM).
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

/// Route Ctrl-C into the pipeline: the input stage is told to stop and the
/// interrupt is recorded so the control flow knows the reader may still be
/// blocked in a read.
pub fn install_interrupt_handler(
    input_done: StopToken,
    flag: InterruptFlag,
) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        tracing::info!("shutdown requested, flushing pending windows");
        flag.raise();
        input_done.request_stop();
    })
}
