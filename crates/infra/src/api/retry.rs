//! Refresh-and-retry decision for rejected resource calls
//!
//! A resource call answered with 401 gets exactly one second chance: the
//! dispatcher refreshes the token and resends the identical request. A second
//! 401 is final. Both dispatchers drive this policy so the async and blocking
//! paths cannot drift apart.

/// HTTP status that triggers token recovery
pub const UNAUTHORIZED: u16 = 401;

/// What the dispatcher does after receiving a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Hand the response to the caller (success or a non-auth failure)
    Done,
    /// Refresh the token, then resend the same request
    RefreshAndRetry,
    /// Already refreshed once; surface the rejection
    GiveUp,
}

/// Per-request state for the single retry
#[derive(Debug, Default)]
pub struct ReauthPolicy {
    refreshed: bool,
}

impl ReauthPolicy {
    /// Upper bound on sends for one request.
    pub const MAX_ATTEMPTS: usize = 2;

    pub const fn new() -> Self {
        Self { refreshed: false }
    }

    /// Decide what follows a response with `status`.
    pub fn on_status(&mut self, status: u16) -> Attempt {
        if status != UNAUTHORIZED {
            return Attempt::Done;
        }
        if self.refreshed {
            Attempt::GiveUp
        } else {
            self.refreshed = true;
            Attempt::RefreshAndRetry
        }
    }

    pub const fn refreshed(&self) -> bool {
        self.refreshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_done() {
        let mut policy = ReauthPolicy::new();
        assert_eq!(policy.on_status(200), Attempt::Done);
        assert!(!policy.refreshed());
    }

    #[test]
    fn test_first_401_refreshes_second_gives_up() {
        let mut policy = ReauthPolicy::new();
        assert_eq!(policy.on_status(401), Attempt::RefreshAndRetry);
        assert!(policy.refreshed());
        assert_eq!(policy.on_status(401), Attempt::GiveUp);
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        let mut policy = ReauthPolicy::new();
        for status in [403, 404, 429, 500] {
            assert_eq!(policy.on_status(status), Attempt::Done);
        }
    }

    #[test]
    fn test_retry_then_success() {
        let mut policy = ReauthPolicy::new();
        let outcomes: Vec<_> = [401, 200].into_iter().map(|s| policy.on_status(s)).collect();
        assert_eq!(outcomes, vec![Attempt::RefreshAndRetry, Attempt::Done]);
        assert!(outcomes.len() <= ReauthPolicy::MAX_ATTEMPTS);
    }
}
