use crate::core::ConfigProvider;
use crate::domain::model::Mode;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{self, Validate};
use std::env;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_VERIFY_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub mode: Mode,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub email_user: String,
    pub email_pass: String,
    pub recaptcha_secret: Option<String>,
    pub verify_url: String,
    pub verify_timeout_seconds: u64,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 以任意來源查詢設定值，測試時不必改動行程環境變數
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("APP_ENV") {
            Some(value) => Mode::parse(&value).ok_or_else(|| {
                RelayError::InvalidConfigValueError {
                    field: "APP_ENV".to_string(),
                    value: value.clone(),
                    reason: "Expected 'development' or 'production'".to_string(),
                }
            })?,
            None => Mode::Production,
        };

        let smtp_port = match lookup("SMTP_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| RelayError::InvalidConfigValueError {
                    field: "SMTP_PORT".to_string(),
                    value: value.clone(),
                    reason: "Expected a port number".to_string(),
                })?,
            None => DEFAULT_SMTP_PORT,
        };

        let verify_timeout_seconds = match lookup("VERIFY_TIMEOUT_SECONDS") {
            Some(value) => value
                .parse()
                .map_err(|_| RelayError::InvalidConfigValueError {
                    field: "VERIFY_TIMEOUT_SECONDS".to_string(),
                    value: value.clone(),
                    reason: "Expected a number of seconds".to_string(),
                })?,
            None => DEFAULT_VERIFY_TIMEOUT_SECONDS,
        };

        Ok(Self {
            mode,
            smtp_host: lookup("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port,
            email_user: lookup("EMAIL_USER").ok_or_else(|| RelayError::MissingConfigError {
                field: "EMAIL_USER".to_string(),
            })?,
            email_pass: lookup("EMAIL_PASS").ok_or_else(|| RelayError::MissingConfigError {
                field: "EMAIL_PASS".to_string(),
            })?,
            recaptcha_secret: lookup("RECAPTCHA_SECRET_KEY").filter(|s| !s.is_empty()),
            verify_url: lookup("RECAPTCHA_VERIFY_URL")
                .unwrap_or_else(|| DEFAULT_VERIFY_URL.to_string()),
            verify_timeout_seconds,
        })
    }

    pub fn verification_required(&self) -> bool {
        !self.mode.is_development()
    }
}

impl ConfigProvider for RelayConfig {
    fn operator_mailbox(&self) -> &str {
        &self.email_user
    }

    fn mode(&self) -> Mode {
        self.mode
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("smtp_host", &self.smtp_host)?;
        validation::validate_range("smtp_port", self.smtp_port, 1, u16::MAX)?;

        validation::validate_non_empty_string("email_user", &self.email_user)?;
        self.email_user.parse::<lettre::Address>()?;
        validation::validate_non_empty_string("email_pass", &self.email_pass)?;

        validation::validate_url("verify_url", &self.verify_url)?;
        validation::validate_range("verify_timeout_seconds", self.verify_timeout_seconds, 1, 60)?;

        // 開發模式不驗證 CAPTCHA，因此不需要 secret
        if self.verification_required() {
            validation::validate_required_field("recaptcha_secret", &self.recaptcha_secret)?;
        }

        tracing::info!("✅ Relay configuration validation passed ({} mode)", self.mode);
        Ok(())
    }
}
