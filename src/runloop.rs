//! The single-threaded event loop.
//!
//! One loop owns all state mutation. Every other execution context — the
//! signal handler, the surface's key callbacks, the binary's stdin reader —
//! only enqueues [`LockEvent`]s on the channel. Timer obligations
//! (reassertion, the post-match feedback delay) are served by waking from
//! `recv_timeout` and dispatching a `Tick`.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::Instant;

use crate::controller::{LockController, LockEvent};
use crate::error::{Error, Result};
use crate::session::UnlockReason;

/// Drives a [`LockController`] until the session reaches `Unlocked`.
pub struct RunLoop {
    controller: LockController,
    tx: Sender<LockEvent>,
    rx: Receiver<LockEvent>,
}

impl RunLoop {
    /// Wrap a controller. Device capture is enqueued as the first message,
    /// deferred out of the construction path so the surface can render
    /// before grabbing starts.
    pub fn new(controller: LockController) -> Self {
        let (tx, rx) = channel();
        // The loop holds its own sender, so this cannot fail.
        let _ = tx.send(LockEvent::CaptureDevices);
        Self { controller, tx, rx }
    }

    /// A sender for external event producers.
    pub fn sender(&self) -> Sender<LockEvent> {
        self.tx.clone()
    }

    /// Route SIGINT/SIGTERM into the loop as unlock requests.
    ///
    /// The handler runs in signal context and therefore only enqueues;
    /// leaving a termination signal unrouted would leak kernel-exclusive
    /// grabs on exit.
    pub fn install_signal_handler(&self) -> Result<()> {
        let tx = self.tx.clone();
        ctrlc::set_handler(move || {
            let _ = tx.send(LockEvent::UnlockRequested(UnlockReason::Signal));
        })
        .map_err(|e| Error::Signal(e.to_string()))
    }

    /// Run until unlocked, then hand the controller back.
    pub fn run(mut self) -> LockController {
        while !self.controller.should_exit() {
            let timeout = self.controller.timeout(Instant::now());
            match self.rx.recv_timeout(timeout) {
                Ok(event) => {
                    self.controller.dispatch(event);
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.controller.dispatch(LockEvent::Tick);
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.controller
    }
}
