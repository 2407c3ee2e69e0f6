use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nuodbaas_provider::client::{ErrorCode, RestClient, RestError};
use url::Url;

#[test]
fn test_error_code_classification_ignores_case_and_separators() {
    for raw in [
        "CONCURRENT_UPDATE",
        "CONCURRENTUPDATE",
        "concurrent-update",
        "Concurrent_Update",
        "concurrent update",
    ] {
        assert_eq!(
            ErrorCode::classify(raw),
            ErrorCode::ConcurrentUpdate,
            "'{}' should classify as a concurrent update",
            raw
        );
    }
    assert_eq!(ErrorCode::classify("NOT_FOUND"), ErrorCode::NotFound);
    assert_eq!(ErrorCode::classify("notfound"), ErrorCode::NotFound);
    assert_eq!(
        ErrorCode::classify("QUOTA_EXCEEDED"),
        ErrorCode::Other("QUOTA_EXCEEDED".to_string())
    );
}

#[test]
fn test_concurrent_update_predicate_accepts_normalized_codes() {
    let err = RestError::from_response(
        409,
        &json!({"code": "concurrentupdate", "detail": "resource version mismatch"}).to_string(),
    );
    assert!(err.is_concurrent_update());

    let err = RestError::from_response(
        409,
        &json!({"code": "CONFLICT", "detail": "already exists"}).to_string(),
    );
    assert!(!err.is_concurrent_update());
}

#[test]
fn test_non_json_body_is_preserved_verbatim() {
    let body = "<html><body>Internal Server Error</body></html>";
    let err = RestError::from_response(500, body);
    match &err {
        RestError::Http { status, body: raw } => {
            assert_eq!(*status, 500);
            assert_eq!(raw, body);
        }
        other => panic!("expected a generic HTTP error, got {:?}", other),
    }
    assert!(err.to_string().contains(body));
    assert_eq!(err.status(), Some(500));
}

#[test]
fn test_json_body_without_code_or_detail_stays_generic() {
    let err = RestError::from_response(500, r#"{"unexpected": "shape"}"#);
    assert!(matches!(err, RestError::Http { status: 500, .. }));
}

#[test]
fn test_404_empty_detail_marks_rotation_unsupported() {
    // No body at all: the endpoint itself is missing.
    let err = RestError::from_response(404, "");
    assert!(err.is_not_found());
    assert!(err.is_dba_password_update_unsupported());

    // A structured 404 about the database itself is an ordinary not-found.
    let err = RestError::from_response(
        404,
        &json!({"code": "NOT_FOUND", "detail": "database not found"}).to_string(),
    );
    assert!(err.is_not_found());
    assert!(!err.is_dba_password_update_unsupported());
}

#[tokio::test]
async fn test_slow_response_surfaces_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/acme/main"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"sla": "dev"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = RestClient::new(
        Url::parse(&server.uri()).unwrap(),
        None,
        false,
        Some(Duration::from_millis(50)),
    )
    .unwrap();
    let err = client
        .get::<serde_json::Value>("projects/acme/main")
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected a timeout, got {:?}", err);
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_html_error_page_over_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/acme/main"))
        .respond_with(
            ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
        )
        .mount(&server)
        .await;

    let client = RestClient::new(Url::parse(&server.uri()).unwrap(), None, false, None).unwrap();
    let err = client
        .get::<serde_json::Value>("projects/acme/main")
        .await
        .unwrap_err();
    match err {
        RestError::Http { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "<html>Bad Gateway</html>");
        }
        other => panic!("expected a generic HTTP error, got {:?}", other),
    }
}
