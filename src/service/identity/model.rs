use chrono::{DateTime, Utc};

/// Human-verification artifact required before an OTP may be sent. Created
/// lazily and replaced after a challenge failure; never shared globally.
#[derive(Debug, Clone)]
pub struct ChallengeToken {
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Opaque provider handle tying a sent code to its verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationHandle(pub String);
