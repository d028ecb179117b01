use crate::domain::model::{Mode, OutgoingMail, VerificationResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Human-verification service (reCAPTCHA siteverify or a stand-in).
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerificationResponse>;
}

/// Outbound mail relay.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// The browser-side form as seen by the transport: field values in, UI state out.
pub trait ContactForm {
    /// Field values in form order, without the verification token.
    fn fields(&self) -> Vec<(String, String)>;
    fn verification_token(&self) -> Option<String>;
    /// Busy: control disabled, label "Sending...", spinner shown. Idle restores all three.
    fn set_busy(&mut self, busy: bool);
    /// Clears the fields and resets the verification widget.
    fn reset(&mut self);
}

pub trait ConfigProvider: Send + Sync {
    fn operator_mailbox(&self) -> &str;
    fn mode(&self) -> Mode;
}
