use crate::core::compose::compose_mail;
use crate::core::{ConfigProvider, Mailer, Verifier};
use crate::domain::model::{
    HttpRequest, HttpResponse, SubmissionRequest, SubmissionResult, TOKEN_FIELD,
};
use crate::utils::error::SubmissionError;
use crate::utils::validation::is_header_safe;
use base64::Engine;
use chrono::Utc;
use std::fmt;

/// Token value that test harnesses send in place of a real widget response.
/// Accepted nowhere: in production it counts as a missing token.
pub const BYPASS_TOKEN: &str = "dev-bypass";

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";
pub const FIELDS_REQUIRED: &str = "All fields are required";
pub const INVALID_BODY: &str = "Invalid request body";
pub const UNSAFE_HEADER_VALUE: &str =
    "Name and email must not contain line breaks or control characters";
pub const TOKEN_REQUIRED: &str = "Please complete the reCAPTCHA verification";
pub const VERIFICATION_FAILED: &str = "reCAPTCHA verification failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Received,
    MethodChecked,
    Validated,
    VerificationSkipped,
    VerificationChecked,
    MailDispatched,
    Responded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::MethodChecked => "method-checked",
            Stage::Validated => "validated",
            Stage::VerificationSkipped => "verification-skipped",
            Stage::VerificationChecked => "verification-checked",
            Stage::MailDispatched => "mail-dispatched",
            Stage::Responded => "responded",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    tracing::debug!(stage = %stage, "submission stage");
}

/// Stateless contact form endpoint: method check, body validation, optional
/// human verification, one mail dispatch. Collaborators are called at most once
/// per invocation and never retried.
pub struct SubmissionHandler<V: Verifier, M: Mailer, C: ConfigProvider> {
    verifier: V,
    mailer: M,
    config: C,
}

impl<V: Verifier, M: Mailer, C: ConfigProvider> SubmissionHandler<V, M, C> {
    pub fn new(verifier: V, mailer: M, config: C) -> Self {
        Self {
            verifier,
            mailer,
            config,
        }
    }

    /// Runs one invocation and maps the outcome to a status code and JSON body.
    pub async fn handle(&self, request: &HttpRequest) -> HttpResponse {
        enter(Stage::Received);
        let response = match self.process(request).await {
            Ok(()) => HttpResponse::json(200, &SubmissionResult::success(SUCCESS_MESSAGE)),
            Err(err) => self.error_response(&err),
        };
        enter(Stage::Responded);
        response
    }

    pub async fn process(&self, request: &HttpRequest) -> Result<(), SubmissionError> {
        if !request.http_method.eq_ignore_ascii_case("POST") {
            tracing::warn!("Rejected {} request", request.http_method);
            return Err(SubmissionError::MethodNotAllowed);
        }
        enter(Stage::MethodChecked);

        let submission = decode_body(request)?;
        validate_submission(&submission)?;
        enter(Stage::Validated);

        tracing::info!(
            name = %submission.name,
            email = %submission.email,
            message_chars = submission.message.chars().count(),
            has_token = submission.token().is_some(),
            "📨 New form submission"
        );

        self.check_verification(&submission).await?;

        let mail = compose_mail(&submission, self.config.operator_mailbox(), Utc::now());
        self.mailer.send(&mail).await.map_err(|e| {
            tracing::error!("❌ Mail dispatch failed: {}", e);
            SubmissionError::DispatchError {
                details: e.to_string(),
            }
        })?;
        enter(Stage::MailDispatched);

        tracing::info!("✅ Contact notification sent for {}", submission.email);
        Ok(())
    }

    async fn check_verification(
        &self,
        submission: &SubmissionRequest,
    ) -> Result<(), SubmissionError> {
        if self.config.mode().is_development() {
            enter(Stage::VerificationSkipped);
            tracing::debug!("Development mode, skipping token verification");
            return Ok(());
        }

        let token = match submission.token() {
            Some(BYPASS_TOKEN) => {
                tracing::warn!("Bypass token presented in production, rejecting");
                return Err(SubmissionError::verification(TOKEN_REQUIRED));
            }
            Some(token) => token,
            None => return Err(SubmissionError::verification(TOKEN_REQUIRED)),
        };

        match self.verifier.verify(token).await {
            Ok(reply) if reply.success => {
                enter(Stage::VerificationChecked);
                Ok(())
            }
            Ok(reply) => {
                tracing::warn!(
                    error_codes = ?reply.error_codes,
                    hostname = ?reply.hostname,
                    "Token verification rejected"
                );
                Err(SubmissionError::verification(VERIFICATION_FAILED))
            }
            Err(e) => {
                tracing::error!("❌ Token verification failed: {}", e);
                Err(SubmissionError::verification(VERIFICATION_FAILED))
            }
        }
    }

    fn error_response(&self, err: &SubmissionError) -> HttpResponse {
        match err {
            SubmissionError::MethodNotAllowed => {
                let result = SubmissionResult {
                    error: Some(err.to_string()),
                    ..Default::default()
                };
                HttpResponse::json(err.status_code(), &result).with_header("Allow", "POST")
            }
            SubmissionError::DispatchError { details } => {
                let mut result = SubmissionResult::failure(err.to_string());
                if self.config.mode().is_development() {
                    result.details = Some(details.clone());
                }
                HttpResponse::json(err.status_code(), &result)
            }
            SubmissionError::ValidationError { .. } | SubmissionError::VerificationError { .. } => {
                let result = SubmissionResult::failure(err.to_string());
                HttpResponse::json(err.status_code(), &result)
            }
        }
    }
}

/// Decodes a JSON or URL-encoded body into a submission.
pub fn decode_body(request: &HttpRequest) -> Result<SubmissionRequest, SubmissionError> {
    let raw = request.body.as_deref().unwrap_or_default();

    let body = if request.is_base64_encoded {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(raw)
            .map_err(|_| SubmissionError::validation(INVALID_BODY))?;
        String::from_utf8(bytes).map_err(|_| SubmissionError::validation(INVALID_BODY))?
    } else {
        raw.to_string()
    };

    if body.trim().is_empty() {
        return Err(SubmissionError::validation(FIELDS_REQUIRED));
    }

    let is_form = request
        .header("content-type")
        .map(|ct| {
            let media_type = ct.split(';').next().unwrap_or_default().trim();
            media_type.eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
        .unwrap_or(false);

    if is_form {
        let mut submission = SubmissionRequest::default();
        for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
            match key.as_ref() {
                "name" => submission.name = value.into_owned(),
                "email" => submission.email = value.into_owned(),
                "message" => submission.message = value.into_owned(),
                TOKEN_FIELD => submission.verification_token = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(submission)
    } else {
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Body is not a valid submission: {}", e);
            SubmissionError::validation(INVALID_BODY)
        })
    }
}

/// Presence check on the three fields (no address format check), then header safety.
pub fn validate_submission(submission: &SubmissionRequest) -> Result<(), SubmissionError> {
    if submission.name.is_empty() || submission.email.is_empty() || submission.message.is_empty()
    {
        return Err(SubmissionError::validation(FIELDS_REQUIRED));
    }

    if !is_header_safe(&submission.name) || !is_header_safe(&submission.email) {
        return Err(SubmissionError::validation(UNSAFE_HEADER_VALUE));
    }

    Ok(())
}
