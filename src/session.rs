//! Lock session state.

use std::time::SystemTime;

/// State machine positions. `Unlocking` is transient: it exists only while
/// devices are released and the surface is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Input is captured; the lock surface owns the screen.
    Locked,
    /// Teardown in progress.
    Unlocking,
    /// Terminal: everything released, the process may exit.
    Unlocked,
}

/// Which authorized path triggered the unlock. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockReason {
    /// Correct password submitted.
    Password,
    /// Ctrl+Alt+unlock-key chord.
    Hotkey,
    /// Termination or interrupt signal.
    Signal,
}

/// The single owned instance of lock state. Created `Locked`, mutated only
/// by the controller, destroyed only after reaching `Unlocked`.
#[derive(Debug)]
pub struct LockSession {
    state: LockState,
    unlock_reason: Option<UnlockReason>,
    created_at: SystemTime,
}

impl Default for LockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LockSession {
    /// Start a session in the `Locked` state.
    pub fn new() -> Self {
        Self {
            state: LockState::Locked,
            unlock_reason: None,
            created_at: SystemTime::now(),
        }
    }

    /// Current state.
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Why the session left `Locked`, once it has.
    pub fn unlock_reason(&self) -> Option<UnlockReason> {
        self.unlock_reason
    }

    /// Session start time.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// `Locked -> Unlocking`. Returns false (and changes nothing) unless
    /// currently `Locked`, making redundant unlock triggers silent no-ops.
    pub fn begin_unlocking(&mut self, reason: UnlockReason) -> bool {
        if self.state != LockState::Locked {
            return false;
        }
        self.state = LockState::Unlocking;
        self.unlock_reason = Some(reason);
        true
    }

    /// `Unlocking -> Unlocked`, once teardown has completed.
    pub fn finish_unlocking(&mut self) {
        if self.state == LockState::Unlocking {
            self.state = LockState::Unlocked;
        }
    }
}
