//! Input device enumeration and kernel-level exclusive capture.
//!
//! The rest of the crate is written against [`InputDeviceProvider`] only.
//! Two implementations exist: the evdev-backed [`EvdevProvider`] (Linux,
//! behind the `evdev` feature) and the [`NullProvider`] stub used wherever
//! the kernel facility is unavailable. Selection happens once at startup
//! via [`default_provider`].
//!
//! ## Permissions
//!
//! Opening `/dev/input/event*` read/write requires either root or
//! membership in the `input` group:
//! ```bash
//! sudo usermod -aG input $USER
//! # Then log out and back in
//! ```

use std::path::Path;

use crate::error::Result;

/// Capability class of an opened input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Reports relative or absolute positional axes (mouse, touchpad,
    /// touchscreen).
    Pointer,
    /// Pure key-event device.
    Keyboard,
    /// Anything else (switches, LEDs, ...).
    Other,
}

/// One opened input device.
///
/// Closing happens on drop; an exclusive grab must be released explicitly
/// before that.
pub trait InputDevice {
    /// Device node path.
    fn path(&self) -> &Path;
    /// Human-readable device name.
    fn name(&self) -> &str;
    /// Capability class, fixed at open time.
    fn class(&self) -> DeviceClass;
    /// Request kernel-exclusive delivery of this device's events.
    fn grab(&mut self) -> Result<()>;
    /// Release a previously acquired exclusive grab.
    fn ungrab(&mut self) -> Result<()>;
}

/// Enumerates and opens system input devices.
pub trait InputDeviceProvider {
    /// Open every enumerable input device.
    ///
    /// Per-device open failures are skipped inside the implementation;
    /// an `Err` means the enumeration facility itself is unavailable.
    fn open_all(&mut self) -> Result<Vec<Box<dyn InputDevice>>>;

    /// Whether this provider can actually reach a kernel capture facility.
    fn is_capture_capable(&self) -> bool {
        true
    }
}

/// An opened device plus its grab state, owned by the grab manager.
pub struct DeviceHandle {
    inner: Box<dyn InputDevice>,
    grabbed: bool,
}

impl DeviceHandle {
    /// Wrap a freshly opened, ungrabbed device.
    pub fn new(inner: Box<dyn InputDevice>) -> Self {
        Self {
            inner,
            grabbed: false,
        }
    }

    /// Device node path.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Human-readable device name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Capability class.
    pub fn class(&self) -> DeviceClass {
        self.inner.class()
    }

    /// Whether this handle currently holds an exclusive grab.
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Acquire the exclusive grab.
    pub fn grab(&mut self) -> Result<()> {
        self.inner.grab()?;
        self.grabbed = true;
        Ok(())
    }

    /// Release the exclusive grab. Succeeding or not, the handle no longer
    /// claims the grab afterwards.
    pub fn ungrab(&mut self) -> Result<()> {
        self.grabbed = false;
        self.inner.ungrab()
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("path", &self.path())
            .field("name", &self.name())
            .field("class", &self.class())
            .field("grabbed", &self.grabbed)
            .finish()
    }
}

/// Stub provider for platforms or sandboxes without device access.
///
/// Reports zero devices, so the lock degrades to "no pointer block
/// available" instead of failing startup.
#[derive(Debug, Default)]
pub struct NullProvider;

impl InputDeviceProvider for NullProvider {
    fn open_all(&mut self) -> Result<Vec<Box<dyn InputDevice>>> {
        Ok(Vec::new())
    }

    fn is_capture_capable(&self) -> bool {
        false
    }
}

#[cfg(all(target_os = "linux", feature = "evdev"))]
pub use self::evdev_impl::EvdevProvider;

#[cfg(all(target_os = "linux", feature = "evdev"))]
mod evdev_impl {
    use super::*;
    use crate::error::Error;
    use evdev::{Device, EventType};
    use std::fs;
    use std::path::PathBuf;

    /// Kernel-backed provider reading `/dev/input/event*` via evdev.
    /// Works on both X11 and Wayland.
    #[derive(Debug, Default)]
    pub struct EvdevProvider;

    struct EvdevDevice {
        path: PathBuf,
        name: String,
        class: DeviceClass,
        device: Device,
    }

    impl InputDevice for EvdevDevice {
        fn path(&self) -> &Path {
            &self.path
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn class(&self) -> DeviceClass {
            self.class
        }

        fn grab(&mut self) -> Result<()> {
            self.device
                .grab()
                .map_err(|e| Error::DeviceAccess(format!("{}: {}", self.name, e)))
        }

        fn ungrab(&mut self) -> Result<()> {
            self.device
                .ungrab()
                .map_err(|e| Error::Release(format!("{}: {}", self.name, e)))
        }
    }

    /// Classify by capability set: positional axes win over keys, since
    /// mice also report button keys.
    fn classify(device: &Device) -> DeviceClass {
        let supported = device.supported_events();
        if supported.contains(EventType::RELATIVE) || supported.contains(EventType::ABSOLUTE) {
            DeviceClass::Pointer
        } else if supported.contains(EventType::KEY) {
            DeviceClass::Keyboard
        } else {
            DeviceClass::Other
        }
    }

    impl InputDeviceProvider for EvdevProvider {
        fn open_all(&mut self) -> Result<Vec<Box<dyn InputDevice>>> {
            let dir = fs::read_dir("/dev/input").map_err(|e| {
                Error::Enumeration(format!(
                    "cannot access /dev/input: {}. Make sure you're in the 'input' group.",
                    e
                ))
            })?;

            let mut devices: Vec<Box<dyn InputDevice>> = Vec::new();
            for entry in dir.flatten() {
                let path = entry.path();
                let Some(file_name) = path.file_name() else {
                    continue;
                };
                if !file_name.to_string_lossy().starts_with("event") {
                    continue;
                }
                match Device::open(&path) {
                    Ok(device) => {
                        let class = classify(&device);
                        let name = device.name().unwrap_or("unknown").to_string();
                        devices.push(Box::new(EvdevDevice {
                            path,
                            name,
                            class,
                            device,
                        }));
                    }
                    Err(e) => {
                        log::debug!("failed to open {}: {}", path.display(), e);
                    }
                }
            }

            Ok(devices)
        }
    }
}

/// Pick the provider for this platform and build, once at startup.
pub fn default_provider() -> Box<dyn InputDeviceProvider> {
    #[cfg(all(target_os = "linux", feature = "evdev"))]
    {
        Box::new(EvdevProvider)
    }
    #[cfg(not(all(target_os = "linux", feature = "evdev")))]
    {
        log::warn!("kernel input capture unavailable on this build; pointer block disabled");
        Box::new(NullProvider)
    }
}
