#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("Verification failed. Please try again.")]
    ChallengeFailed,
    #[error("Invalid phone number format. Please check and try again.")]
    InvalidPhone,
    #[error("Too many attempts. Please try again later.")]
    RateLimited,
    #[error("Failed to send OTP. Please try again.")]
    SendFailed(String),
    #[error("Verification failed")]
    VerificationFailed,
}
