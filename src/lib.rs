//! # trainlock
//!
//! A session input lock for unattended machines: while active it
//! exclusively captures pointer-class input devices at the kernel level
//! and intercepts every keyboard event behind a password/hotkey gate.
//! Control is released only through one of the authorized unlock paths,
//! and devices are always ungrabbed — on correct unlock, on a termination
//! signal, or on redundant unlock calls.
//!
//! ## Quick Start
//!
//! ```no_run
//! use trainlock::{
//!     ConsoleSurface, LockConfig, LockController, RunLoop, default_provider,
//! };
//!
//! let controller = LockController::new(
//!     LockConfig::default(),
//!     "train123",
//!     default_provider(),
//!     Box::new(ConsoleSurface::default()),
//! )
//! .expect("failed to create lock surface");
//!
//! let looper = RunLoop::new(controller);
//! looper.install_signal_handler().expect("signal handler");
//! let controller = looper.run();
//! assert_eq!(controller.grabbed_count(), 0);
//! ```
//!
//! ## Architecture
//!
//! A single event loop ([`RunLoop`]) owns all state mutation. Key events,
//! password submissions, timer wakeups and signal-driven unlock requests
//! arrive as [`LockEvent`] messages; [`LockController`] is the only
//! component that transitions the [`session::LockSession`]. Device
//! capture sits behind the [`device::InputDeviceProvider`] trait so the
//! whole system degrades to "no pointer block" where the kernel facility
//! is unavailable.
//!
//! Unlock paths:
//! 1. Type the password + Enter
//! 2. Press Ctrl+Alt+U (instant, no password)
//! 3. Send SIGTERM/SIGINT to the process

pub mod auth;
pub mod controller;
pub mod device;
pub mod error;
pub mod grab;
pub mod hotkey;
pub mod keys;
pub mod reassert;
pub mod runloop;
pub mod session;
pub mod surface;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports
pub use auth::{AuthAttempt, AuthOutcome, AuthValidator};
pub use controller::{KeyDisposition, LockConfig, LockController, LockEvent};
pub use device::{
    DeviceClass, DeviceHandle, InputDevice, InputDeviceProvider, NullProvider, default_provider,
};
#[cfg(all(target_os = "linux", feature = "evdev"))]
pub use device::EvdevProvider;
pub use error::{Error, Result};
pub use grab::DeviceGrabManager;
pub use hotkey::{HotkeyClassifier, KeyAction};
pub use reassert::ReassertionScheduler;
pub use runloop::RunLoop;
pub use session::{LockSession, LockState, UnlockReason};
pub use surface::{ConsoleSurface, LockSurface, PASSWORD_FIELD, StatusIndicator};
