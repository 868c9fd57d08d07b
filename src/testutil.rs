//! Shared mock implementations for unit tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::device::{DeviceClass, InputDevice, InputDeviceProvider};
use crate::error::{Error, Result};
use crate::surface::{LockSurface, StatusIndicator};

/// Per-run call record shared between a test and its mocks.
#[derive(Debug, Default)]
pub struct CallLog {
    pub grabs: Vec<String>,
    pub ungrabs: Vec<String>,
    pub surface_destroys: usize,
    pub presents: usize,
    pub fullscreens: usize,
    pub focuses: usize,
    pub cleared_fields: usize,
    pub statuses: Vec<StatusIndicator>,
    pub cursor_visible: Option<bool>,
}

pub type SharedLog = Rc<RefCell<CallLog>>;

pub fn new_log() -> SharedLog {
    Rc::new(RefCell::new(CallLog::default()))
}

/// A scripted input device with controllable grab/ungrab outcomes.
pub struct ScriptedDevice {
    pub path: PathBuf,
    pub name: String,
    pub class: DeviceClass,
    pub fail_grab: bool,
    pub fail_ungrab: bool,
    pub log: SharedLog,
}

impl ScriptedDevice {
    pub fn pointer(name: &str, log: &SharedLog) -> Self {
        Self::with_class(name, DeviceClass::Pointer, log)
    }

    pub fn keyboard(name: &str, log: &SharedLog) -> Self {
        Self::with_class(name, DeviceClass::Keyboard, log)
    }

    pub fn with_class(name: &str, class: DeviceClass, log: &SharedLog) -> Self {
        Self {
            path: PathBuf::from(format!("/dev/input/{name}")),
            name: name.to_string(),
            class,
            fail_grab: false,
            fail_ungrab: false,
            log: log.clone(),
        }
    }
}

impl InputDevice for ScriptedDevice {
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
        if self.fail_grab {
            return Err(Error::DeviceAccess(format!("{}: permission denied", self.name)));
        }
        self.log.borrow_mut().grabs.push(self.name.clone());
        Ok(())
    }

    fn ungrab(&mut self) -> Result<()> {
        if self.fail_ungrab {
            return Err(Error::Release(format!("{}: device gone", self.name)));
        }
        self.log.borrow_mut().ungrabs.push(self.name.clone());
        Ok(())
    }
}

/// Provider handing out a scripted device list once.
#[derive(Default)]
pub struct MockProvider {
    pub devices: Vec<ScriptedDevice>,
    pub fail_enumeration: bool,
}

impl MockProvider {
    pub fn with_devices(devices: Vec<ScriptedDevice>) -> Self {
        Self {
            devices,
            fail_enumeration: false,
        }
    }
}

impl InputDeviceProvider for MockProvider {
    fn open_all(&mut self) -> Result<Vec<Box<dyn InputDevice>>> {
        if self.fail_enumeration {
            return Err(Error::Enumeration("scripted failure".into()));
        }
        Ok(self
            .devices
            .drain(..)
            .map(|d| Box::new(d) as Box<dyn InputDevice>)
            .collect())
    }
}

/// Surface mock recording lifecycle/focus commands.
pub struct MockSurface {
    pub log: SharedLog,
    pub field_focused: bool,
    pub destroyed: bool,
}

impl MockSurface {
    pub fn new(log: &SharedLog) -> Self {
        Self {
            log: log.clone(),
            field_focused: false,
            destroyed: false,
        }
    }
}

impl LockSurface for MockSurface {
    fn create_fullscreen_always_on_top(&mut self) -> Result<()> {
        Ok(())
    }

    fn present(&mut self) {
        self.log.borrow_mut().presents += 1;
    }

    fn set_fullscreen(&mut self) {
        self.log.borrow_mut().fullscreens += 1;
    }

    fn focus_field(&mut self, _field: &str) {
        self.field_focused = true;
        self.log.borrow_mut().focuses += 1;
    }

    fn field_has_focus(&self, _field: &str) -> bool {
        self.field_focused
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.log.borrow_mut().cursor_visible = Some(visible);
    }

    fn clear_field(&mut self, _field: &str) {
        self.log.borrow_mut().cleared_fields += 1;
    }

    fn set_status(&mut self, status: StatusIndicator) {
        self.log.borrow_mut().statuses.push(status);
    }

    fn destroy(&mut self) {
        assert!(!self.destroyed, "surface destroyed twice");
        self.destroyed = true;
        self.log.borrow_mut().surface_destroys += 1;
    }
}
