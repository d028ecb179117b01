use crate::core::banner::{Banner, BannerKind};
use crate::core::ContactForm;
use crate::domain::model::{SubmissionResult, TOKEN_FIELD};
use reqwest::Client;
use serde_json::{Map, Value};

pub const SUBMIT_LABEL: &str = "Send Message";
pub const BUSY_LABEL: &str = "Sending...";
pub const SENT_MESSAGE: &str = "Message sent successfully!";
pub const FALLBACK_ERROR: &str = "Failed to send message";
pub const NETWORK_ERROR: &str = "Error sending message. Please try again.";
pub const TOKEN_MISSING: &str = "Please complete the reCAPTCHA verification";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed(String),
}

impl SubmitOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SubmitOutcome::Sent)
    }
}

/// Client side of the contact form: one POST per submit, no automatic retry.
pub struct FormTransport {
    client: Client,
    endpoint: String,
    require_token: bool,
}

impl FormTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            require_token: false,
        }
    }

    /// Refuse to submit before the verification widget produced a token.
    pub fn require_token(mut self, require: bool) -> Self {
        self.require_token = require;
        self
    }

    /// Submits the form and always leaves it idle with a banner showing the outcome.
    pub async fn submit<F: ContactForm>(&self, form: &mut F, banner: &Banner) -> SubmitOutcome {
        form.set_busy(true);
        banner.clear();

        let outcome = self.send(form).await;

        match &outcome {
            SubmitOutcome::Sent => {
                form.reset();
                banner.show(BannerKind::Success, SENT_MESSAGE);
            }
            SubmitOutcome::Failed(error) => {
                tracing::error!("❌ Contact form submission failed: {}", error);
                banner.show(BannerKind::Error, error.clone());
            }
        }

        form.set_busy(false);
        outcome
    }

    async fn send<F: ContactForm>(&self, form: &F) -> SubmitOutcome {
        let token = form.verification_token().filter(|t| !t.is_empty());
        if self.require_token && token.is_none() {
            return SubmitOutcome::Failed(TOKEN_MISSING.to_string());
        }

        let payload = build_payload(form.fields(), token);
        tracing::debug!("Posting contact form to: {}", self.endpoint);

        let response = match self.client.post(&self.endpoint).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Request error: {}", e);
                return SubmitOutcome::Failed(NETWORK_ERROR.to_string());
            }
        };

        let status = response.status();
        tracing::debug!("Submission response status: {}", status);

        if status.is_success() {
            return SubmitOutcome::Sent;
        }

        let error = response
            .json::<SubmissionResult>()
            .await
            .ok()
            .and_then(|result| result.error)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR.to_string());
        SubmitOutcome::Failed(error)
    }
}

/// Field values plus the widget token, as a flat JSON object.
pub fn build_payload(fields: Vec<(String, String)>, token: Option<String>) -> Value {
    let mut object: Map<String, Value> = fields
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();

    if let Some(token) = token {
        object.insert(TOKEN_FIELD.to_string(), Value::String(token));
    }

    Value::Object(object)
}
