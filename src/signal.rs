//! Cancellation for graceful shutdown.
//!
//! A [`CancellationToken`] is handed to the collector loop, which polls it once
//! per tick. The only place that sets it from outside is the SIGINT boundary
//! registered by [`CancellationToken::install`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ProcwatchError, Result};

/// Shared stop flag polled by the collector loop.
///
/// Cloning shares the underlying flag. Cancelling is idempotent: a second
/// interrupt while already stopping has no further effect.
#[derive(Clone, Default, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not connected to any signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token and registers the process-wide SIGINT handler that cancels it.
    ///
    /// The handler only stores into the flag; logging happens in the loop once
    /// the flag is observed.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler was already registered for this process
    /// or the OS refuses the registration.
    pub fn install() -> Result<Self> {
        let token = Self::new();
        let handle = token.clone();

        ctrlc::set_handler(move || handle.cancel())
            .map_err(|e| ProcwatchError::SignalHandler(e.to_string()))?;

        Ok(token)
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Checks if cancellation has been requested (non-blocking).
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
