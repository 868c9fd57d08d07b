//! The display-surface boundary.
//!
//! The core never draws. It issues lifecycle and focus commands through
//! [`LockSurface`]; rendering, styling and the actual windowing technology
//! live behind this trait in the embedding front end.

use crate::error::Result;

/// Field id of the password entry on the lock surface.
pub const PASSWORD_FIELD: &str = "password-entry";

/// Feedback shown next to the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    /// No indicator.
    Clear,
    /// Wrong password, try again.
    WrongPassword,
    /// Correct password, unlocking shortly.
    Unlocking,
}

/// Lifecycle and focus commands the core issues to its fullscreen,
/// always-on-top, undecorated surface.
pub trait LockSurface {
    /// Create the surface: fullscreen, always on top, undecorated,
    /// close-request blocked.
    fn create_fullscreen_always_on_top(&mut self) -> Result<()>;

    /// Raise the surface above all other surfaces.
    fn present(&mut self);

    /// Re-enter fullscreen.
    fn set_fullscreen(&mut self);

    /// Force input focus onto the given field.
    fn focus_field(&mut self, field: &str);

    /// Whether the given field currently holds input focus.
    fn field_has_focus(&self, field: &str) -> bool;

    /// Show or hide the cursor over the surface.
    fn set_cursor_visible(&mut self, visible: bool);

    /// Clear the text of the given field.
    fn clear_field(&mut self, field: &str);

    /// Update the status indicator.
    fn set_status(&mut self, status: StatusIndicator);

    /// Tear the surface down. Must tolerate being called on an
    /// already-destroyed surface.
    fn destroy(&mut self);
}

/// Log-only surface used by the shipped binary.
///
/// Keeps the core fully exercisable without a compositor; a real front end
/// replaces this with a toolkit-backed implementation.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    destroyed: bool,
    focused_field: Option<String>,
}

impl LockSurface for ConsoleSurface {
    fn create_fullscreen_always_on_top(&mut self) -> Result<()> {
        log::debug!("surface: create fullscreen always-on-top");
        Ok(())
    }

    fn present(&mut self) {
        log::trace!("surface: present");
    }

    fn set_fullscreen(&mut self) {
        log::trace!("surface: fullscreen");
    }

    fn focus_field(&mut self, field: &str) {
        self.focused_field = Some(field.to_string());
    }

    fn field_has_focus(&self, field: &str) -> bool {
        self.focused_field.as_deref() == Some(field)
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        log::debug!("surface: cursor visible = {visible}");
    }

    fn clear_field(&mut self, field: &str) {
        log::debug!("surface: clear field {field}");
    }

    fn set_status(&mut self, status: StatusIndicator) {
        match status {
            StatusIndicator::Clear => {}
            StatusIndicator::WrongPassword => log::info!("wrong password, try again"),
            StatusIndicator::Unlocking => log::info!("unlocking"),
        }
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            log::debug!("surface: destroy");
        }
    }
}
