use crate::config::relay::RelayConfig;
use crate::core::Mailer;
use crate::domain::model::OutgoingMail;
use crate::utils::error::Result;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Submission port that expects a plaintext greeting upgraded with STARTTLS.
pub const STARTTLS_PORT: u16 = 587;

/// Sends notifications through an authenticated SMTP relay. Port 587 upgrades
/// with STARTTLS, every other port uses implicit TLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

pub fn uses_starttls(port: u16) -> bool {
    port == STARTTLS_PORT
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Result<Self> {
        let builder = if uses_starttls(port) {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        };
        tracing::debug!(
            "SMTP relay {}:{} ({})",
            host,
            port,
            if uses_starttls(port) { "STARTTLS" } else { "implicit TLS" }
        );
        let transport = builder
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        Ok(Self { transport })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        Self::new(
            &config.smtp_host,
            config.smtp_port,
            &config.email_user,
            &config.email_pass,
        )
    }
}

/// Converts a composed notification into a MIME message.
///
/// The operator mailbox must parse. The reply-to address is submitter input and
/// only checked for presence upstream, so an unparsable one is dropped with a
/// warning instead of failing the dispatch.
pub fn build_message(mail: &OutgoingMail) -> Result<Message> {
    let from: Mailbox = mail.from.parse()?;
    let to: Mailbox = mail.to.parse()?;

    let mut builder = Message::builder().from(from).to(to).subject(&mail.subject);

    match mail.reply_to.email.parse::<Address>() {
        Ok(address) => {
            builder = builder.reply_to(Mailbox::new(Some(mail.reply_to.name.clone()), address));
        }
        Err(e) => {
            tracing::warn!(
                "⚠️ Reply-to address '{}' is not a valid mailbox ({}), sending without Reply-To",
                mail.reply_to.email,
                e
            );
        }
    }

    let message = builder.multipart(MultiPart::alternative_plain_html(
        mail.text_body.clone(),
        mail.html_body.clone(),
    ))?;
    Ok(message)
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = build_message(mail)?;

        tracing::debug!("Dispatching mail via SMTP: {}", mail.subject);
        let response = self.transport.send(message).await?;
        tracing::debug!("SMTP relay answered with code {}", response.code());

        Ok(())
    }
}
