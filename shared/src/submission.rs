//! Duplicate-submission guard for the reservation form
//!
//! The guard is advisory: it stops double clicks and rapid resubmits on this
//! client. At-most-once creation is the server's job, keyed on the
//! idempotency key each attempt carries.
//!
//! ```text
//! Idle ──try_begin──▶ Submitting ──succeed──▶ Cooldown(expiry) ──(now ≥ expiry)──▶ Idle
//!                         │
//!                         └────fail────▶ Idle
//! ```

use rand::Rng;
use serde::Serialize;

/// Minimum gap between the start of a successful submission and the next one
pub const SUBMIT_COOLDOWN_MS: i64 = 2000;

const KEY_SUFFIX_LEN: usize = 9;
const KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// `reservation_<epochMillis>_<9 chars of [a-z0-9]>`
pub fn idempotency_key(now_millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..KEY_SUFFIX_LEN)
        .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
        .collect();
    format!("reservation_{now_millis}_{suffix}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmitState {
    Idle,
    Submitting { started_at: i64 },
    Cooldown { expires_at: i64 },
}

/// Why a submit attempt was suppressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuardRejection {
    #[error("a submission is already in progress")]
    InFlight,
    #[error("please wait {remaining_ms} ms before submitting again")]
    CoolingDown { remaining_ms: i64 },
}

/// Permission to send one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub started_at: i64,
    pub idempotency_key: String,
}

#[derive(Debug, Clone)]
pub struct SubmitGuard {
    state: SubmitState,
    cooldown_ms: i64,
}

impl Default for SubmitGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::with_cooldown(SUBMIT_COOLDOWN_MS)
    }

    pub fn with_cooldown(cooldown_ms: i64) -> Self {
        Self {
            state: SubmitState::Idle,
            cooldown_ms,
        }
    }

    /// Current state as seen at `now`; an expired cooldown reads as idle
    pub fn state(&self, now: i64) -> SubmitState {
        match self.state {
            SubmitState::Cooldown { expires_at } if now >= expires_at => SubmitState::Idle,
            state => state,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmitState::Submitting { .. })
    }

    /// Start a submission at `now`, issuing a fresh idempotency key
    pub fn try_begin(&mut self, now: i64) -> Result<SubmitTicket, GuardRejection> {
        match self.state(now) {
            SubmitState::Submitting { .. } => Err(GuardRejection::InFlight),
            SubmitState::Cooldown { expires_at } => Err(GuardRejection::CoolingDown {
                remaining_ms: expires_at - now,
            }),
            SubmitState::Idle => {
                self.state = SubmitState::Submitting { started_at: now };
                Ok(SubmitTicket {
                    started_at: now,
                    idempotency_key: idempotency_key(now),
                })
            }
        }
    }

    /// The request succeeded; the cooldown runs from the submission start
    pub fn succeed(&mut self, ticket: &SubmitTicket) {
        self.state = SubmitState::Cooldown {
            expires_at: ticket.started_at + self.cooldown_ms,
        };
    }

    /// The request failed; the user may retry immediately
    pub fn fail(&mut self) {
        self.state = SubmitState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_key_format() {
        let pattern = Regex::new(r"^reservation_\d+_[a-z0-9]{9}$").unwrap();
        let key = idempotency_key(1_700_000_000_000);
        assert!(pattern.is_match(&key), "{key}");
        assert!(key.starts_with("reservation_1700000000000_"));
    }

    #[test]
    fn test_keys_are_distinct() {
        let a = idempotency_key(1);
        let b = idempotency_key(1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_in_flight_rejects() {
        let mut guard = SubmitGuard::new();
        let ticket = guard.try_begin(1_000).unwrap();
        assert_eq!(guard.state(1_000), SubmitState::Submitting { started_at: 1_000 });
        assert_eq!(guard.try_begin(1_001), Err(GuardRejection::InFlight));
        // in-flight never times out on its own
        assert_eq!(guard.try_begin(60_000), Err(GuardRejection::InFlight));
        guard.succeed(&ticket);
    }

    #[test]
    fn test_cooldown_after_success() {
        let mut guard = SubmitGuard::new();
        let ticket = guard.try_begin(10_000).unwrap();
        guard.succeed(&ticket);

        assert_eq!(
            guard.try_begin(11_500),
            Err(GuardRejection::CoolingDown { remaining_ms: 500 })
        );
        assert_eq!(guard.state(11_999), SubmitState::Cooldown { expires_at: 12_000 });
        assert_eq!(guard.state(12_000), SubmitState::Idle);

        let second = guard.try_begin(12_001).unwrap();
        assert_ne!(second.idempotency_key, ticket.idempotency_key);
    }

    #[test]
    fn test_failure_allows_immediate_retry() {
        let mut guard = SubmitGuard::new();
        guard.try_begin(5_000).unwrap();
        guard.fail();
        assert_eq!(guard.state(5_001), SubmitState::Idle);
        assert!(guard.try_begin(5_001).is_ok());
    }
}
