//! Error types for the input lock.
//!
//! Nothing in this taxonomy is fatal to the process. The design is
//! fail-open toward the unlock path (an operator must never be locked out
//! by a device error) and fail-closed toward capture (errors reduce
//! coverage, they never pretend a grab succeeded).

use thiserror::Error;

/// Result type alias for trainlock operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing or releasing input devices.
#[derive(Debug, Error)]
pub enum Error {
    /// The device enumeration facility itself is unavailable.
    #[error("cannot enumerate input devices: {0}")]
    Enumeration(String),

    /// Opening or grabbing one specific device failed.
    #[error("device access failed: {0}")]
    DeviceAccess(String),

    /// Ungrabbing or closing one specific device failed during teardown.
    #[error("device release failed: {0}")]
    Release(String),

    /// The display surface rejected a lifecycle or focus command.
    #[error("surface error: {0}")]
    Surface(String),

    /// Installing the signal handler failed.
    #[error("signal handler: {0}")]
    Signal(String),

    /// Kernel-level capture is not available on this platform or build.
    #[error("not supported: {0}")]
    NotSupported(String),
}
