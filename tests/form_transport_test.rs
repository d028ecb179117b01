use contact_relay::core::banner::BannerKind;
use contact_relay::core::transport::{
    BUSY_LABEL, FALLBACK_ERROR, NETWORK_ERROR, SENT_MESSAGE, SUBMIT_LABEL, TOKEN_MISSING,
};
use contact_relay::core::ContactForm;
use contact_relay::{Banner, FormTransport, SubmitOutcome};
use httpmock::prelude::*;

/// Records every UI state change the transport makes.
struct MockForm {
    name: String,
    email: String,
    message: String,
    token: Option<String>,
    enabled: bool,
    label: &'static str,
    spinner: bool,
    history: Vec<&'static str>,
    resets: usize,
}

impl MockForm {
    fn filled(token: Option<&str>) -> Self {
        Self {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hi".to_string(),
            token: token.map(str::to_string),
            enabled: true,
            label: SUBMIT_LABEL,
            spinner: false,
            history: Vec::new(),
            resets: 0,
        }
    }

    fn assert_idle(&self) {
        assert!(self.enabled);
        assert_eq!(self.label, SUBMIT_LABEL);
        assert!(!self.spinner);
    }
}

impl ContactForm for MockForm {
    fn fields(&self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), self.name.clone()),
            ("email".to_string(), self.email.clone()),
            ("message".to_string(), self.message.clone()),
        ]
    }

    fn verification_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn set_busy(&mut self, busy: bool) {
        self.enabled = !busy;
        self.spinner = busy;
        self.label = if busy { BUSY_LABEL } else { SUBMIT_LABEL };
        self.history.push(self.label);
    }

    fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.token = None;
        self.resets += 1;
    }
}

#[tokio::test]
async fn test_successful_submission_resets_form() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/submit-form")
            .json_body(serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Hi",
                "g-recaptcha-response": "tok"
            }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "success": true,
                "message": "Message sent successfully!"
            }));
    });

    let transport = FormTransport::new(server.url("/api/submit-form"));
    let banner = Banner::new();
    let mut form = MockForm::filled(Some("tok"));

    let outcome = transport.submit(&mut form, &banner).await;

    api_mock.assert();
    assert_eq!(outcome, SubmitOutcome::Sent);
    assert_eq!(form.history, vec![BUSY_LABEL, SUBMIT_LABEL]);
    form.assert_idle();
    assert_eq!(form.resets, 1);
    assert!(form.name.is_empty());
    assert!(form.token.is_none());

    let shown = banner.current().unwrap();
    assert_eq!(shown.kind, BannerKind::Success);
    assert_eq!(shown.text, SENT_MESSAGE);
}

#[tokio::test]
async fn test_failed_submission_uses_error_field() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/submit-form");
        then.status(400)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "success": false,
                "error": "Please complete the reCAPTCHA verification"
            }));
    });

    let transport = FormTransport::new(server.url("/api/submit-form"));
    let banner = Banner::new();
    let mut form = MockForm::filled(None);

    let outcome = transport.submit(&mut form, &banner).await;

    api_mock.assert();
    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Please complete the reCAPTCHA verification".to_string())
    );
    form.assert_idle();
    // 失敗時保留使用者輸入
    assert_eq!(form.resets, 0);
    assert_eq!(form.name, "Ada");

    let shown = banner.current().unwrap();
    assert_eq!(shown.kind, BannerKind::Error);
    assert_eq!(shown.text, "Please complete the reCAPTCHA verification");
}

#[tokio::test]
async fn test_failed_submission_without_error_body_uses_fallback() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/submit-form");
        then.status(502).body("Bad Gateway");
    });

    let transport = FormTransport::new(server.url("/api/submit-form"));
    let banner = Banner::new();
    let mut form = MockForm::filled(Some("tok"));

    let outcome = transport.submit(&mut form, &banner).await;

    assert_eq!(outcome, SubmitOutcome::Failed(FALLBACK_ERROR.to_string()));
    form.assert_idle();
    assert_eq!(banner.current().unwrap().text, FALLBACK_ERROR);
}

#[tokio::test]
async fn test_method_not_allowed_body_is_surfaced() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/submit-form");
        then.status(405)
            .json_body(serde_json::json!({ "error": "Method not allowed" }));
    });

    let transport = FormTransport::new(server.url("/api/submit-form"));
    let banner = Banner::new();
    let mut form = MockForm::filled(Some("tok"));

    let outcome = transport.submit(&mut form, &banner).await;
    assert_eq!(outcome, SubmitOutcome::Failed("Method not allowed".to_string()));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    // 保留一個不會有人監聽的位址
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let transport = FormTransport::new(format!("http://{}/api/submit-form", address));
    let banner = Banner::new();
    let mut form = MockForm::filled(Some("tok"));

    let outcome = transport.submit(&mut form, &banner).await;

    assert_eq!(outcome, SubmitOutcome::Failed(NETWORK_ERROR.to_string()));
    form.assert_idle();
    assert_eq!(form.history, vec![BUSY_LABEL, SUBMIT_LABEL]);
}

#[tokio::test]
async fn test_required_token_missing_makes_no_request() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/submit-form");
        then.status(200);
    });

    let transport = FormTransport::new(server.url("/api/submit-form")).require_token(true);
    let banner = Banner::new();
    let mut form = MockForm::filled(Some(""));

    let outcome = transport.submit(&mut form, &banner).await;

    api_mock.assert_hits(0);
    assert_eq!(outcome, SubmitOutcome::Failed(TOKEN_MISSING.to_string()));
    form.assert_idle();
    assert_eq!(banner.current().unwrap().kind, BannerKind::Error);
}

#[tokio::test]
async fn test_token_is_omitted_when_absent() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/submit-form")
            .json_body(serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Hi"
            }));
        then.status(200)
            .json_body(serde_json::json!({ "success": true, "message": "ok" }));
    });

    let transport = FormTransport::new(server.url("/api/submit-form"));
    let banner = Banner::new();
    let mut form = MockForm::filled(None);

    let outcome = transport.submit(&mut form, &banner).await;

    api_mock.assert();
    assert!(outcome.is_sent());
}
