//! Exclusive capture of pointer-class devices.
//!
//! [`DeviceGrabManager`] owns every grabbed device for the lifetime of the
//! lock. Keyboard-class devices are deliberately left ungrabbed: keyboard
//! interception belongs to the display surface's focus mechanism, so the
//! password entry and the unlock chord stay deliverable to the lock.

use crate::device::{DeviceClass, DeviceHandle, InputDeviceProvider};

/// Owns the set of currently grabbed devices.
pub struct DeviceGrabManager {
    provider: Box<dyn InputDeviceProvider>,
    grabbed: Vec<DeviceHandle>,
}

impl DeviceGrabManager {
    /// Build on top of whatever provider was selected at startup.
    pub fn new(provider: Box<dyn InputDeviceProvider>) -> Self {
        Self {
            provider,
            grabbed: Vec::new(),
        }
    }

    /// Enumerate devices and exclusively grab every pointer-class one.
    ///
    /// Best-effort: a device that fails to grab is logged, closed and
    /// skipped; an unavailable enumeration facility is logged once and
    /// yields zero grabs. Never fails the lock. Returns how many devices
    /// ended up grabbed.
    pub fn acquire_all(&mut self) -> usize {
        let devices = match self.provider.open_all() {
            Ok(devices) => devices,
            Err(e) => {
                log::warn!("pointer block unavailable: {e}");
                return self.grabbed.len();
            }
        };

        for device in devices {
            if device.class() != DeviceClass::Pointer {
                // Dropped here: non-pointer devices are closed, not grabbed.
                continue;
            }
            let mut handle = DeviceHandle::new(device);
            match handle.grab() {
                Ok(()) => {
                    log::info!("grabbed pointer: {}", handle.name());
                    self.grabbed.push(handle);
                }
                Err(e) => {
                    log::warn!("cannot grab {}: {e}", handle.name());
                    // Handle drops, closing the device.
                }
            }
        }

        self.grabbed.len()
    }

    /// Ungrab and close every grabbed device.
    ///
    /// Idempotent, and per-device failures never abort the sweep: an
    /// already-revoked device must not keep the rest grabbed.
    pub fn release_all(&mut self) {
        for mut handle in self.grabbed.drain(..) {
            if let Err(e) = handle.ungrab() {
                log::warn!("release failed for {}: {e}", handle.name());
            }
        }
    }

    /// Number of devices currently held under exclusive grab.
    pub fn grabbed_count(&self) -> usize {
        self.grabbed.len()
    }

    /// Whether no grabs are currently held.
    pub fn is_empty(&self) -> bool {
        self.grabbed.is_empty()
    }

    /// Names of the currently grabbed devices, for diagnostics.
    pub fn grabbed_names(&self) -> Vec<&str> {
        self.grabbed.iter().map(|h| h.name()).collect()
    }

    /// Whether the underlying provider can reach a kernel capture facility.
    pub fn is_capture_capable(&self) -> bool {
        self.provider.is_capture_capable()
    }
}
