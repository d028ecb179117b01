use contact_relay::core::handler::FIELDS_REQUIRED;
use contact_relay::utils::validation::Validate;
use contact_relay::{build_handler, HttpRequest, HttpResponse, Mode, RelayConfig};
use std::collections::HashMap;
use tokio_test::{assert_err, assert_ok};

fn development_config() -> RelayConfig {
    let vars: HashMap<&str, &str> = [
        ("APP_ENV", "development"),
        ("EMAIL_USER", "owner@example.com"),
        ("EMAIL_PASS", "app-password"),
        ("SMTP_HOST", "smtp.example.com"),
    ]
    .into_iter()
    .collect();
    RelayConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
}

#[test]
fn test_parse_gateway_event() {
    let event = r#"{
        "resource": "/api/submit-form",
        "path": "/api/submit-form",
        "httpMethod": "POST",
        "headers": { "Content-Type": "application/json", "Origin": "https://portfolio.example.com" },
        "requestContext": { "requestId": "abc-123" },
        "body": "{\"name\":\"Ada\",\"email\":\"ada@example.com\",\"message\":\"Hi\"}",
        "isBase64Encoded": false
    }"#;

    let request: HttpRequest = serde_json::from_str(event).unwrap();

    assert_eq!(request.http_method, "POST");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert!(!request.is_base64_encoded);
    assert!(request.body.unwrap().contains("Ada"));
}

#[test]
fn test_parse_event_with_null_headers() {
    let event = r#"{"httpMethod":"GET","headers":null,"body":null,"isBase64Encoded":false}"#;

    let request: HttpRequest = serde_json::from_str(event).unwrap();

    assert_eq!(request.http_method, "GET");
    assert!(request.headers.is_empty());
    assert_eq!(request.header("content-type"), None);
    assert!(request.body.is_none());
}

#[test]
fn test_response_serializes_gateway_shape() {
    let response = HttpResponse::json(
        200,
        &contact_relay::SubmissionResult::success("Message sent successfully!"),
    );
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["statusCode"], 200);
    assert_eq!(value["headers"]["Content-Type"], "application/json");
    assert_eq!(
        value["body"],
        r#"{"success":true,"message":"Message sent successfully!"}"#
    );
}

// SMTP 連線池會在背景啟動清理工作，需要 runtime
#[tokio::test]
async fn test_wired_handler_rejects_without_network() {
    let config = development_config();
    assert_ok!(config.validate());
    assert_eq!(config.mode, Mode::Development);

    let handler = build_handler(config).unwrap();

    let get = HttpRequest {
        http_method: "GET".to_string(),
        ..Default::default()
    };
    assert_eq!(handler.handle(&get).await.status_code, 405);

    // 沒有 header 的主控台測試事件也要走到 handler
    let bare: HttpRequest = serde_json::from_str(
        r#"{"httpMethod":"POST","headers":null,"body":null,"isBase64Encoded":false}"#,
    )
    .unwrap();
    let response = handler.handle(&bare).await;
    assert_eq!(response.status_code, 400);
    assert_eq!(response.result().unwrap().error.as_deref(), Some(FIELDS_REQUIRED));

    let empty = HttpRequest::post_json(r#"{"name":"","email":"a@b.com","message":"hi"}"#);
    let response = handler.handle(&empty).await;
    assert_eq!(response.status_code, 400);
    assert_eq!(response.result().unwrap().error.as_deref(), Some(FIELDS_REQUIRED));
}

#[test]
fn test_production_config_without_secret_is_invalid() {
    let mut config = development_config();
    config.mode = Mode::Production;
    assert_err!(config.validate());

    config.recaptcha_secret = Some("secret".to_string());
    assert_ok!(config.validate());
}
