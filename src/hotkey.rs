//! Keyboard event classification while the lock is active.
//!
//! Every key event the surface delivers goes through [`HotkeyClassifier`]
//! before anything else sees it. The classifier is independent of the
//! password gate: the unlock chord always works, even with an empty entry
//! field.

use crate::keys::{is_alt_held, is_ctrl_held};

/// What the lock should do with one keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Unlock immediately, bypassing the password gate.
    UnlockNow,
    /// Consume the event so it never reaches the window manager.
    SwallowDangerous,
    /// Forward the event to the password entry field.
    PassThrough,
}

/// Window-manager escape combos consumed while locked. Best-effort: some
/// compositors intercept these before delivery.
const DANGEROUS_WITH_ALT: &[&str] = &["Tab", "F1", "F2", "F3", "F4"];
const DANGEROUS_ALONE: &[&str] = &["Super_L", "Super_R"];

/// Interprets raw key events (keysym name + modifier mask).
#[derive(Debug, Clone)]
pub struct HotkeyClassifier {
    unlock_key: String,
}

impl Default for HotkeyClassifier {
    fn default() -> Self {
        Self::new("u")
    }
}

impl HotkeyClassifier {
    /// Create a classifier with the given unlock key (matched
    /// case-insensitively, always together with Ctrl+Alt).
    pub fn new(unlock_key: impl Into<String>) -> Self {
        Self {
            unlock_key: unlock_key.into(),
        }
    }

    /// Classify one key event.
    pub fn classify(&self, keysym: &str, mask: u32) -> KeyAction {
        if keysym.eq_ignore_ascii_case(&self.unlock_key)
            && is_ctrl_held(mask)
            && is_alt_held(mask)
        {
            return KeyAction::UnlockNow;
        }

        if is_alt_held(mask) && DANGEROUS_WITH_ALT.contains(&keysym) {
            return KeyAction::SwallowDangerous;
        }
        if DANGEROUS_ALONE.contains(&keysym) {
            return KeyAction::SwallowDangerous;
        }

        KeyAction::PassThrough
    }
}
