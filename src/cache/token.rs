use std::time::Duration;

use tokio::time::Instant;

/// Access token held in the cache together with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: Instant,
}

impl CachedToken {
    /// `issued_at` is the time the token request was sent, not the time the
    /// response arrived. `None` when the lifetime does not fit on the clock.
    pub fn new(token: String, issued_at: Instant, expires_in_seconds: u64) -> Option<Self> {
        let expires_at = issued_at.checked_add(Duration::from_secs(expires_in_seconds))?;
        Some(Self { token, expires_at })
    }

    /// A token expiring exactly at `now` is already expired.
    pub fn is_valid_at(&self, now: Instant) -> bool {
        self.expires_at > now
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_boundary_is_exclusive() {
        let t0 = Instant::now();
        let token = CachedToken::new("T1".into(), t0, 60).unwrap();

        assert!(token.is_valid_at(t0 + Duration::from_secs(59)));
        assert!(!token.is_valid_at(t0 + Duration::from_secs(60)));
        assert!(!token.is_valid_at(t0 + Duration::from_secs(61)));
        assert_eq!(token.remaining(t0 + Duration::from_secs(61)), Duration::ZERO);
    }

    #[test]
    fn unrepresentable_lifetime_is_rejected() {
        assert!(CachedToken::new("T".into(), Instant::now(), u64::MAX).is_none());
    }
}
