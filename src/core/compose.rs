use crate::domain::model::{OutgoingMail, ReplyTo, SubmissionRequest};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

pub fn subject_for(name: &str) -> String {
    format!("New Contact Form Submission from {}", name)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapes the message and turns every line break (`\r\n`, `\n`, `\r`) into `<br>`.
pub fn message_to_html(message: &str) -> String {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    let re = LINE_BREAK.get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern"));
    re.replace_all(&escape_html(message), "<br>").into_owned()
}

/// Builds the operator notification for an accepted submission.
pub fn compose_mail(
    request: &SubmissionRequest,
    operator_mailbox: &str,
    submitted_at: DateTime<Utc>,
) -> OutgoingMail {
    let timestamp = submitted_at.format("%Y-%m-%d %H:%M:%S UTC");

    let text_body = format!(
        "Name: {}\nEmail: {}\nSubmitted: {}\n\nMessage:\n{}\n",
        request.name, request.email, timestamp, request.message
    );

    let html_body = format!(
        "<h2>New Contact Form Submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Submitted:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>",
        escape_html(&request.name),
        escape_html(&request.email),
        timestamp,
        message_to_html(&request.message)
    );

    OutgoingMail {
        from: operator_mailbox.to_string(),
        to: operator_mailbox.to_string(),
        reply_to: ReplyTo {
            name: request.name.clone(),
            email: request.email.clone(),
        },
        subject: subject_for(&request.name),
        text_body,
        html_body,
    }
}
