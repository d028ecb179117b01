use crate::config::relay::RelayConfig;
use crate::core::Verifier;
use crate::domain::model::VerificationResponse;
use crate::utils::error::{RelayError, Result};
use reqwest::Client;
use std::time::Duration;

/// Verifies widget tokens against a siteverify-compatible endpoint.
pub struct ReCaptchaVerifier {
    client: Client,
    endpoint: String,
    secret: String,
}

impl ReCaptchaVerifier {
    pub fn new(
        endpoint: impl Into<String>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            secret: secret.into(),
        })
    }

    /// 開發模式下 secret 可以不存在，此時改用空字串；handler 不會呼叫它
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        Self::new(
            config.verify_url.clone(),
            config.recaptcha_secret.clone().unwrap_or_default(),
            Duration::from_secs(config.verify_timeout_seconds),
        )
    }
}

#[async_trait::async_trait]
impl Verifier for ReCaptchaVerifier {
    async fn verify(&self, token: &str) -> Result<VerificationResponse> {
        tracing::debug!("Verifying token against: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        tracing::debug!("Verification response status: {}", status);

        if !status.is_success() {
            return Err(RelayError::VerificationServiceError {
                message: format!("HTTP {}: {}", status, raw),
            });
        }

        serde_json::from_str(&raw).map_err(|e| RelayError::VerificationServiceError {
            message: format!("Malformed reply ({}): {}", e, raw),
        })
    }
}
