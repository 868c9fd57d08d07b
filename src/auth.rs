//! Password validation.

use std::time::SystemTime;

/// Outcome of a single password check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The attempt matched the secret exactly.
    Match,
    /// The attempt did not match.
    Mismatch,
}

/// One submitted attempt. Transient: built for a single check, never stored.
#[derive(Debug)]
pub struct AuthAttempt<'a> {
    /// The raw submitted text, untrimmed.
    pub input: &'a str,
    /// When the attempt was submitted.
    pub at: SystemTime,
}

impl<'a> AuthAttempt<'a> {
    /// Wrap raw input with the current timestamp.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            at: SystemTime::now(),
        }
    }
}

/// Exact-match password check.
///
/// Comparison is byte-for-byte and case-sensitive; surrounding whitespace
/// is significant, so `" train123"` never matches `"train123"`.
#[derive(Debug)]
pub struct AuthValidator {
    secret: String,
}

impl AuthValidator {
    /// Create a validator holding the unlock secret. The secret is never
    /// logged or displayed.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Check one attempt against the secret.
    pub fn check(&self, attempt: &AuthAttempt<'_>) -> AuthOutcome {
        if attempt.input.as_bytes() == self.secret.as_bytes() {
            AuthOutcome::Match
        } else {
            AuthOutcome::Mismatch
        }
    }
}
