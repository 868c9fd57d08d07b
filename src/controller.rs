//! The lock state machine.
//!
//! [`LockController`] is the single authority over state change. Key
//! events, timer wakeups, password submissions and signal-driven unlock
//! requests all arrive as [`LockEvent`] messages on one thread; the
//! controller queries the classifier and the validator, and commands the
//! grab manager and the display surface.

use std::time::{Duration, Instant};

use crate::auth::{AuthAttempt, AuthOutcome, AuthValidator};
use crate::device::InputDeviceProvider;
use crate::error::Result;
use crate::grab::DeviceGrabManager;
use crate::hotkey::{HotkeyClassifier, KeyAction};
use crate::reassert::ReassertionScheduler;
use crate::session::{LockSession, LockState, UnlockReason};
use crate::surface::{LockSurface, PASSWORD_FIELD, StatusIndicator};

/// Tunables for one lock session.
#[derive(Debug, Clone)]
pub struct LockConfig {
    /// Cosmetic pause between a password match and the actual unlock, so
    /// the success indicator is visible. Zero is allowed.
    pub unlock_feedback_delay: Duration,
    /// How often the surface is re-raised and re-focused while locked.
    pub reassert_interval: Duration,
    /// Letter of the Ctrl+Alt unlock chord.
    pub unlock_key: String,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            unlock_feedback_delay: Duration::from_millis(250),
            reassert_interval: Duration::from_millis(500),
            unlock_key: "u".into(),
        }
    }
}

/// Messages dispatched to the controller. All producers (surface key
/// callbacks, the signal handler, timer wakeups) enqueue these; only the
/// loop thread executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockEvent {
    /// Deferred startup capture, sent once after the surface exists so the
    /// initial frame can render before device grabbing begins.
    CaptureDevices,
    /// A raw key event from the surface: keysym name plus modifier mask.
    KeyPressed { keysym: String, mask: u32 },
    /// The password field was activated with this text.
    PasswordSubmitted(String),
    /// Timer wakeup. Drives both reassertion and the post-match delay.
    Tick,
    /// Unlock requested from outside the keyboard path (signals).
    UnlockRequested(UnlockReason),
}

/// What the embedding surface should do with a key event it delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Consumed by the lock; do not propagate.
    Swallow,
    /// Forward to the password entry field.
    PassThrough,
    /// Not a key event, nothing to propagate.
    Handled,
}

/// The state machine tying validator, classifier, grab manager and surface
/// together.
pub struct LockController {
    config: LockConfig,
    session: LockSession,
    auth: AuthValidator,
    classifier: HotkeyClassifier,
    grabs: DeviceGrabManager,
    surface: Box<dyn LockSurface>,
    reassert: ReassertionScheduler,
    unlock_due: Option<Instant>,
}

impl LockController {
    /// Create the controller and its surface. Device capture does not
    /// happen here: enqueue [`LockEvent::CaptureDevices`] once the loop is
    /// running.
    pub fn new(
        config: LockConfig,
        secret: impl Into<String>,
        provider: Box<dyn InputDeviceProvider>,
        mut surface: Box<dyn LockSurface>,
    ) -> Result<Self> {
        surface.create_fullscreen_always_on_top()?;
        let reassert = ReassertionScheduler::new(config.reassert_interval);
        let classifier = HotkeyClassifier::new(config.unlock_key.clone());
        Ok(Self {
            config,
            session: LockSession::new(),
            auth: AuthValidator::new(secret),
            classifier,
            grabs: DeviceGrabManager::new(provider),
            surface,
            reassert,
            unlock_due: None,
        })
    }

    /// Current state.
    pub fn state(&self) -> LockState {
        self.session.state()
    }

    /// Why the lock released, once it has.
    pub fn unlock_reason(&self) -> Option<UnlockReason> {
        self.session.unlock_reason()
    }

    /// Number of devices currently held under exclusive grab.
    pub fn grabbed_count(&self) -> usize {
        self.grabs.grabbed_count()
    }

    /// Whether the kernel capture facility is reachable at all.
    pub fn is_capture_capable(&self) -> bool {
        self.grabs.is_capture_capable()
    }

    /// True once the run loop should terminate.
    pub fn should_exit(&self) -> bool {
        self.session.state() == LockState::Unlocked
    }

    /// How long the run loop may sleep before the next timer obligation.
    pub fn timeout(&self, now: Instant) -> Duration {
        let mut timeout = self
            .reassert
            .timeout(now)
            .unwrap_or(self.config.reassert_interval);
        if let Some(due) = self.unlock_due {
            timeout = timeout.min(due.saturating_duration_since(now));
        }
        timeout
    }

    /// Dispatch one event at the current time.
    pub fn dispatch(&mut self, event: LockEvent) -> KeyDisposition {
        self.dispatch_at(event, Instant::now())
    }

    /// Dispatch one event at an explicit time. All state mutation funnels
    /// through here.
    pub fn dispatch_at(&mut self, event: LockEvent, now: Instant) -> KeyDisposition {
        match event {
            LockEvent::CaptureDevices => {
                if self.session.state() == LockState::Locked {
                    let grabbed = self.grabs.acquire_all();
                    log::info!("pointer block active on {grabbed} device(s)");
                    self.surface.set_cursor_visible(false);
                }
                KeyDisposition::Handled
            }
            LockEvent::KeyPressed { keysym, mask } => self.on_key(&keysym, mask, now),
            LockEvent::PasswordSubmitted(text) => {
                self.on_password(&text, now);
                KeyDisposition::Handled
            }
            LockEvent::Tick => {
                self.on_tick(now);
                KeyDisposition::Handled
            }
            LockEvent::UnlockRequested(reason) => {
                self.begin_unlock(reason);
                KeyDisposition::Handled
            }
        }
    }

    fn on_key(&mut self, keysym: &str, mask: u32, _now: Instant) -> KeyDisposition {
        if self.session.state() != LockState::Locked {
            return KeyDisposition::Swallow;
        }
        match self.classifier.classify(keysym, mask) {
            KeyAction::UnlockNow => {
                self.begin_unlock(UnlockReason::Hotkey);
                KeyDisposition::Swallow
            }
            KeyAction::SwallowDangerous => KeyDisposition::Swallow,
            KeyAction::PassThrough => {
                if !self.surface.field_has_focus(PASSWORD_FIELD) {
                    self.surface.focus_field(PASSWORD_FIELD);
                }
                KeyDisposition::PassThrough
            }
        }
    }

    fn on_password(&mut self, text: &str, now: Instant) {
        if self.session.state() != LockState::Locked {
            return;
        }
        // A match is already pending; repeated submissions during the
        // feedback delay are no-ops.
        if self.unlock_due.is_some() {
            return;
        }
        match self.auth.check(&AuthAttempt::new(text)) {
            AuthOutcome::Match => {
                self.surface.set_status(StatusIndicator::Unlocking);
                self.unlock_due = Some(now + self.config.unlock_feedback_delay);
            }
            AuthOutcome::Mismatch => {
                self.surface.clear_field(PASSWORD_FIELD);
                self.surface.set_status(StatusIndicator::WrongPassword);
            }
        }
    }

    fn on_tick(&mut self, now: Instant) {
        if let Some(due) = self.unlock_due {
            if now >= due {
                self.begin_unlock(UnlockReason::Password);
                return;
            }
        }
        if self.session.state() == LockState::Locked && self.reassert.tick_due(now) {
            self.surface.present();
            self.surface.set_fullscreen();
            if !self.surface.field_has_focus(PASSWORD_FIELD) {
                self.surface.focus_field(PASSWORD_FIELD);
            }
        }
    }

    /// The one unlock path. Safe to reach redundantly from password,
    /// hotkey and signal without double-releasing anything.
    fn begin_unlock(&mut self, reason: UnlockReason) {
        if !self.session.begin_unlocking(reason) {
            log::debug!("unlock already in progress, ignoring {reason:?}");
            return;
        }
        self.unlock_due = None;
        self.grabs.release_all();
        self.surface.set_cursor_visible(true);
        self.surface.destroy();
        self.reassert.stop();
        self.session.finish_unlocking();
        log::info!("input lock released ({reason:?})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{MASK_ALT, MASK_CTRL};
    use crate::testutil::{MockProvider, MockSurface, ScriptedDevice, SharedLog, new_log};

    fn key(keysym: &str, mask: u32) -> LockEvent {
        LockEvent::KeyPressed {
            keysym: keysym.into(),
            mask,
        }
    }

    fn controller_with(log: &SharedLog, devices: Vec<ScriptedDevice>) -> LockController {
        let config = LockConfig {
            unlock_feedback_delay: Duration::ZERO,
            ..LockConfig::default()
        };
        LockController::new(
            config,
            "train123",
            Box::new(MockProvider::with_devices(devices)),
            Box::new(MockSurface::new(log)),
        )
        .unwrap()
    }

    fn locked_controller(log: &SharedLog) -> LockController {
        let mut c = controller_with(
            log,
            vec![
                ScriptedDevice::pointer("mouse0", log),
                ScriptedDevice::keyboard("kbd0", log),
            ],
        );
        c.dispatch(LockEvent::CaptureDevices);
        c
    }

    #[test]
    fn test_capture_grabs_pointers_and_hides_cursor() {
        let log = new_log();
        let c = locked_controller(&log);
        assert_eq!(c.state(), LockState::Locked);
        assert_eq!(c.grabbed_count(), 1);
        assert_eq!(log.borrow().grabs, vec!["mouse0"]);
        assert_eq!(log.borrow().cursor_visible, Some(false));
    }

    #[test]
    fn test_correct_password_unlocks_after_feedback_delay() {
        // Scenario A.
        let log = new_log();
        let mut c = locked_controller(&log);
        let now = Instant::now();

        c.dispatch_at(LockEvent::PasswordSubmitted("train123".into()), now);
        assert_eq!(c.state(), LockState::Locked);
        assert_eq!(log.borrow().statuses, vec![StatusIndicator::Unlocking]);

        c.dispatch_at(LockEvent::Tick, now);
        assert_eq!(c.state(), LockState::Unlocked);
        assert_eq!(c.unlock_reason(), Some(UnlockReason::Password));
        assert_eq!(c.grabbed_count(), 0);
        assert_eq!(log.borrow().ungrabs, vec!["mouse0"]);
        assert_eq!(log.borrow().surface_destroys, 1);
        assert_eq!(log.borrow().cursor_visible, Some(true));
        assert!(c.should_exit());
    }

    #[test]
    fn test_wrong_password_stays_locked() {
        // Scenario B.
        let log = new_log();
        let mut c = locked_controller(&log);

        c.dispatch(LockEvent::PasswordSubmitted("wrong".into()));
        assert_eq!(c.state(), LockState::Locked);
        assert_eq!(c.grabbed_count(), 1);
        assert_eq!(log.borrow().cleared_fields, 1);
        assert_eq!(log.borrow().statuses, vec![StatusIndicator::WrongPassword]);
    }

    #[test]
    fn test_feedback_delay_is_respected() {
        let log = new_log();
        let mut c = controller_with(&log, vec![ScriptedDevice::pointer("mouse0", &log)]);
        c.dispatch(LockEvent::CaptureDevices);
        // Non-zero delay for this one.
        c.config.unlock_feedback_delay = Duration::from_millis(250);
        let now = Instant::now();

        c.dispatch_at(LockEvent::PasswordSubmitted("train123".into()), now);
        // A tick before the deadline does not unlock.
        c.dispatch_at(LockEvent::Tick, now + Duration::from_millis(100));
        assert_eq!(c.state(), LockState::Locked);
        // Resubmission during the delay is a no-op.
        c.dispatch_at(LockEvent::PasswordSubmitted("train123".into()), now);
        c.dispatch_at(LockEvent::Tick, now + Duration::from_millis(300));
        assert_eq!(c.state(), LockState::Unlocked);
        assert_eq!(log.borrow().ungrabs.len(), 1);
    }

    #[test]
    fn test_hotkey_unlocks_regardless_of_password_state() {
        let log = new_log();
        let mut c = locked_controller(&log);

        let disposition = c.dispatch(key("U", MASK_CTRL | MASK_ALT));
        assert_eq!(disposition, KeyDisposition::Swallow);
        assert_eq!(c.state(), LockState::Unlocked);
        assert_eq!(c.unlock_reason(), Some(UnlockReason::Hotkey));
        assert_eq!(log.borrow().ungrabs, vec!["mouse0"]);
    }

    #[test]
    fn test_signal_unlock_releases_devices() {
        // Scenario E.
        let log = new_log();
        let mut c = locked_controller(&log);

        c.dispatch(LockEvent::UnlockRequested(UnlockReason::Signal));
        assert_eq!(c.state(), LockState::Unlocked);
        assert_eq!(c.unlock_reason(), Some(UnlockReason::Signal));
        assert_eq!(c.grabbed_count(), 0);
    }

    #[test]
    fn test_redundant_unlock_triggers_release_exactly_once() {
        let log = new_log();
        let mut c = locked_controller(&log);
        let now = Instant::now();

        c.dispatch_at(key("u", MASK_CTRL | MASK_ALT), now);
        assert_eq!(c.state(), LockState::Unlocked);

        // Every further entry point is a silent no-op.
        c.dispatch_at(LockEvent::UnlockRequested(UnlockReason::Signal), now);
        c.dispatch_at(LockEvent::PasswordSubmitted("train123".into()), now);
        c.dispatch_at(key("u", MASK_CTRL | MASK_ALT), now);
        c.dispatch_at(LockEvent::Tick, now + Duration::from_secs(5));

        assert_eq!(log.borrow().ungrabs.len(), 1);
        assert_eq!(log.borrow().surface_destroys, 1);
        assert_eq!(c.unlock_reason(), Some(UnlockReason::Hotkey));
    }

    #[test]
    fn test_dangerous_combos_are_swallowed() {
        let log = new_log();
        let mut c = locked_controller(&log);

        assert_eq!(c.dispatch(key("Tab", MASK_ALT)), KeyDisposition::Swallow);
        assert_eq!(c.dispatch(key("F4", MASK_ALT)), KeyDisposition::Swallow);
        assert_eq!(c.dispatch(key("Super_L", 0)), KeyDisposition::Swallow);
        assert_eq!(c.state(), LockState::Locked);
    }

    #[test]
    fn test_stray_key_forces_focus_then_passes_through() {
        let log = new_log();
        let mut c = locked_controller(&log);

        assert_eq!(c.dispatch(key("a", 0)), KeyDisposition::PassThrough);
        assert_eq!(log.borrow().focuses, 1);
        // Field now holds focus; no repeated forcing.
        assert_eq!(c.dispatch(key("b", 0)), KeyDisposition::PassThrough);
        assert_eq!(log.borrow().focuses, 1);
    }

    #[test]
    fn test_reassert_tick_re_presents_while_locked() {
        let log = new_log();
        let mut c = locked_controller(&log);
        let now = Instant::now();

        c.dispatch_at(LockEvent::Tick, now + Duration::from_millis(600));
        assert_eq!(log.borrow().presents, 1);
        assert_eq!(log.borrow().fullscreens, 1);
        assert_eq!(log.borrow().focuses, 1);

        // After unlock, ticks stop operating on the torn-down surface.
        c.dispatch_at(LockEvent::UnlockRequested(UnlockReason::Signal), now);
        c.dispatch_at(LockEvent::Tick, now + Duration::from_secs(10));
        assert_eq!(log.borrow().presents, 1);
        assert_eq!(log.borrow().fullscreens, 1);
    }

    #[test]
    fn test_partial_grab_failure_keeps_lock_functional() {
        // Scenario D.
        let log = new_log();
        let mut denied = ScriptedDevice::pointer("mouse0", &log);
        denied.fail_grab = true;
        let mut c = controller_with(
            &log,
            vec![denied, ScriptedDevice::pointer("touchpad0", &log)],
        );

        c.dispatch(LockEvent::CaptureDevices);
        assert_eq!(c.state(), LockState::Locked);
        assert_eq!(c.grabbed_count(), 1);
        assert_eq!(log.borrow().grabs, vec!["touchpad0"]);
    }

    #[test]
    fn test_timeout_tracks_pending_unlock() {
        let log = new_log();
        let mut c = locked_controller(&log);
        c.config.unlock_feedback_delay = Duration::from_millis(100);
        let now = Instant::now();

        assert!(c.timeout(now) <= Duration::from_millis(500));
        c.dispatch_at(LockEvent::PasswordSubmitted("train123".into()), now);
        assert!(c.timeout(now) <= Duration::from_millis(100));
    }
}
