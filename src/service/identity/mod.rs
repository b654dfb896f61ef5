mod error;
mod model;
mod provider;

pub use error::IdentityError;
pub use model::*;
pub use provider::{HostedOtpProvider, OtpProvider};

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::utils::{validate_otp, validate_phone};

/// Wraps OTP send/verify and owns the lazily-created challenge token.
#[derive(Clone)]
pub struct IdentityService {
    provider: Arc<dyn OtpProvider>,
    challenge: Arc<Mutex<Option<ChallengeToken>>>,
    phone_prefix: String,
}

impl IdentityService {
    pub fn new(phone_prefix: String, provider: Arc<dyn OtpProvider>) -> Self {
        Self {
            provider,
            challenge: Arc::new(Mutex::new(None)),
            phone_prefix,
        }
    }

    async fn current_challenge(&self) -> Result<ChallengeToken, IdentityError> {
        let mut guard = self.challenge.lock().await;
        match guard.as_ref() {
            Some(challenge) => Ok(challenge.clone()),
            None => {
                let challenge = self.provider.create_challenge().await?;
                *guard = Some(challenge.clone());
                Ok(challenge)
            }
        }
    }

    /// Sends a one-time code to the given 10-digit number. A failed
    /// challenge is discarded so the next call starts from a fresh one.
    pub async fn send_code(&self, phone: &str) -> Result<VerificationHandle, IdentityError> {
        validate_phone(phone).map_err(IdentityError::InvalidInput)?;

        let challenge = self.current_challenge().await?;
        let formatted = format!("{}{}", self.phone_prefix, phone);

        match self.provider.send_code(&formatted, &challenge).await {
            Ok(handle) => Ok(handle),
            Err(IdentityError::ChallengeFailed) => {
                warn!("Verification challenge failed, discarding it");
                *self.challenge.lock().await = None;
                Err(IdentityError::ChallengeFailed)
            }
            Err(e) => Err(e),
        }
    }

    /// Any provider-side failure (wrong code, expired handle) surfaces as
    /// `VerificationFailed`; the caller re-prompts, nothing auto-retries.
    pub async fn verify_code(&self, handle: &VerificationHandle, code: &str) -> Result<(), IdentityError> {
        validate_otp(code).map_err(IdentityError::InvalidInput)?;

        self.provider.verify_code(handle, code).await.map_err(|e| match e {
            IdentityError::InvalidInput(m) => IdentityError::InvalidInput(m),
            _ => IdentityError::VerificationFailed,
        })
    }
}
