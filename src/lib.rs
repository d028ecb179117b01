pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{recaptcha::ReCaptchaVerifier, smtp::SmtpMailer};
pub use crate::config::{relay::RelayConfig, toml_config::TomlConfig};

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::core::{
    banner::Banner,
    handler::SubmissionHandler,
    transport::{FormTransport, SubmitOutcome},
};
pub use crate::domain::model::{
    HttpRequest, HttpResponse, Mode, SubmissionRequest, SubmissionResult,
};
pub use crate::utils::error::{RelayError, Result, SubmissionError};

/// Handler wired to the production collaborators.
pub type ContactHandler = SubmissionHandler<ReCaptchaVerifier, SmtpMailer, RelayConfig>;

/// Builds the production handler from a validated configuration.
pub fn build_handler(config: RelayConfig) -> Result<ContactHandler> {
    let verifier = ReCaptchaVerifier::from_config(&config)?;
    let mailer = SmtpMailer::from_config(&config)?;
    Ok(SubmissionHandler::new(verifier, mailer, config))
}
