//! The authorization value handed to each request

/// When a session stops being usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Never,
    /// Epoch milliseconds, already reduced by the safety margin
    At(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub header_value: String,
    pub expires_at: Expiry,
}

impl AuthSession {
    #[must_use]
    pub fn permanent(header_value: String) -> Self {
        Self {
            header_value,
            expires_at: Expiry::Never,
        }
    }

    #[must_use]
    pub fn expiring(header_value: String, expires_at_ms: i64) -> Self {
        Self {
            header_value,
            expires_at: Expiry::At(expires_at_ms),
        }
    }

    /// A session expires at its deadline, not one millisecond after
    #[must_use]
    pub fn is_expired(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Expiry::Never => false,
            Expiry::At(deadline) => now_ms >= deadline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_never_expires() {
        let session = AuthSession::permanent("Basic x".into());
        assert!(!session.is_expired(i64::MAX));
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let session = AuthSession::expiring("Bearer t".into(), 1_000);
        assert!(!session.is_expired(999));
        assert!(session.is_expired(1_000));
    }
}
