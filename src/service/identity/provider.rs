use async_trait::async_trait;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;

use crate::config::IdentityConfig;
use crate::service::http::{HttpClient, HttpError};

use super::{ChallengeToken, IdentityError, VerificationHandle};

#[async_trait]
pub trait OtpProvider: Send + Sync {
    async fn create_challenge(&self) -> Result<ChallengeToken, IdentityError>;
    async fn send_code(&self, phone: &str, challenge: &ChallengeToken) -> Result<VerificationHandle, IdentityError>;
    async fn verify_code(&self, handle: &VerificationHandle, code: &str) -> Result<(), IdentityError>;
}

/// Identity-toolkit REST provider. `phone` is the full dial-prefixed
/// number; the challenge token rides along with the send request.
pub struct HostedOtpProvider {
    http: Arc<dyn HttpClient>,
    config: IdentityConfig,
}

impl HostedOtpProvider {
    pub fn new(config: IdentityConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { http, config }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}?key={}", self.config.base_url, method, self.config.api_key)
    }

    fn map_send_error(error: HttpError) -> IdentityError {
        match error {
            HttpError::TooManyRequests => IdentityError::RateLimited,
            HttpError::Status { ref body, .. } if body.contains("CAPTCHA_CHECK_FAILED") => {
                IdentityError::ChallengeFailed
            }
            HttpError::Status { ref body, .. } if body.contains("INVALID_PHONE_NUMBER") => IdentityError::InvalidPhone,
            HttpError::Status { ref body, .. } if body.contains("TOO_MANY_ATTEMPTS_TRY_LATER") => {
                IdentityError::RateLimited
            }
            other => IdentityError::SendFailed(other.to_string()),
        }
    }
}

#[async_trait]
impl OtpProvider for HostedOtpProvider {
    async fn create_challenge(&self) -> Result<ChallengeToken, IdentityError> {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(40)
            .map(char::from)
            .collect();

        debug!("Created verification challenge");

        Ok(ChallengeToken {
            token,
            created_at: Utc::now(),
        })
    }

    async fn send_code(&self, phone: &str, challenge: &ChallengeToken) -> Result<VerificationHandle, IdentityError> {
        let body = serde_json::json!({
            "phoneNumber": phone,
            "recaptchaToken": challenge.token,
        });

        let value = self
            .http
            .post_json(&self.endpoint("sendVerificationCode"), Some(body))
            .await
            .map_err(Self::map_send_error)?;

        let session_info = value
            .get("sessionInfo")
            .and_then(|v| v.as_str())
            .ok_or_else(|| IdentityError::SendFailed("Missing sessionInfo".to_string()))?;

        Ok(VerificationHandle(session_info.to_string()))
    }

    async fn verify_code(&self, handle: &VerificationHandle, code: &str) -> Result<(), IdentityError> {
        let body = serde_json::json!({
            "sessionInfo": handle.0,
            "code": code,
        });

        self.http
            .post_json(&self.endpoint("signInWithPhoneNumber"), Some(body))
            .await
            .map_err(|_| IdentityError::VerificationFailed)?;

        Ok(())
    }
}
