use crate::config::relay::{
    RelayConfig, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, DEFAULT_VERIFY_TIMEOUT_SECONDS,
    DEFAULT_VERIFY_URL,
};
use crate::domain::model::Mode;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub mode: Mode,
    pub mail: MailConfig,
    #[serde(default)]
    pub verification: Option<VerificationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    pub secret: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 密碼與 secret 通常以 ${VAR} 形式引用環境變數
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EMAIL_PASS})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn into_relay_config(self) -> RelayConfig {
        let verification = self.verification.unwrap_or(VerificationConfig {
            secret: None,
            endpoint: None,
            timeout_seconds: None,
        });

        RelayConfig {
            mode: self.mode,
            smtp_host: self
                .mail
                .smtp_host
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: self.mail.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            email_user: self.mail.user,
            email_pass: self.mail.password,
            recaptcha_secret: verification.secret.filter(|s| !s.is_empty()),
            verify_url: verification
                .endpoint
                .unwrap_or_else(|| DEFAULT_VERIFY_URL.to_string()),
            verify_timeout_seconds: verification
                .timeout_seconds
                .unwrap_or(DEFAULT_VERIFY_TIMEOUT_SECONDS),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_relay_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
mode = "development"

[mail]
user = "me@example.com"
password = "app-password"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.mode, Mode::Development);

        let relay = config.into_relay_config();
        assert_eq!(relay.smtp_host, DEFAULT_SMTP_HOST);
        assert_eq!(relay.smtp_port, DEFAULT_SMTP_PORT);
        assert_eq!(relay.verify_url, DEFAULT_VERIFY_URL);
        assert!(relay.recaptcha_secret.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONTACT_RELAY_TEST_SECRET", "from-env");

        let toml_content = r#"
[mail]
user = "me@example.com"
password = "x"

[verification]
secret = "${CONTACT_RELAY_TEST_SECRET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.verification.unwrap().secret.as_deref(),
            Some("from-env")
        );

        std::env::remove_var("CONTACT_RELAY_TEST_SECRET");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
mode = "production"

[mail]
user = "me@example.com"
password = "x"

[verification]
secret = "s"
endpoint = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[mail]
smtp_host = "smtp.example.com"
smtp_port = 587
user = "me@example.com"
password = "x"

[verification]
secret = "s"
timeout_seconds = 5
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.mode, Mode::Production);
        let relay = config.into_relay_config();
        assert_eq!(relay.smtp_host, "smtp.example.com");
        assert_eq!(relay.smtp_port, 587);
        assert_eq!(relay.verify_timeout_seconds, 5);
        assert!(relay.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        let result = TomlConfig::from_toml_str("mode = ");
        assert!(matches!(result, Err(RelayError::ConfigError { .. })));
    }
}
