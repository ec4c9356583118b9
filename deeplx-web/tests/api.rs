use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use deeplx::jsonrpc::{MockReply, MockTransport, RpcMethod};
use deeplx::{TokenAllowList, TranslationGateway};
use deeplx_web::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn split_reply(sentences: &[&str]) -> MockReply {
    MockReply::json(json!({
        "jsonrpc": "2.0",
        "id": 8_300_001_000i64,
        "result": {
            "lang": { "detected": "EN", "isConfident": true },
            "texts": [{
                "chunks": sentences
                    .iter()
                    .map(|text| json!({ "sentences": [{ "prefix": "", "text": text }] }))
                    .collect::<Vec<_>>()
            }]
        }
    }))
}

fn jobs_reply(beams_per_job: &[&[&str]]) -> MockReply {
    MockReply::json(json!({
        "jsonrpc": "2.0",
        "id": 8_300_002_000i64,
        "result": {
            "translations": beams_per_job
                .iter()
                .map(|beams| json!({
                    "beams": beams
                        .iter()
                        .map(|t| json!({ "sentences": [{ "text": t, "ids": [1] }] }))
                        .collect::<Vec<_>>()
                }))
                .collect::<Vec<_>>(),
            "source_lang": "EN",
            "target_lang": "DE"
        }
    }))
}

fn hallo_mock() -> MockTransport {
    MockTransport::new()
        .with_reply(RpcMethod::SplitText, split_reply(&["Hello."]))
        .with_reply(RpcMethod::HandleJobs, jobs_reply(&[&["Hallo.", "Hallo!"]]))
}

fn app(mock: MockTransport, tokens: &str) -> Router {
    router(AppState::new(
        TranslationGateway::new(mock),
        TokenAllowList::parse(tokens),
    ))
}

fn translate_request(uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ========== Root ==========

#[tokio::test]
async fn test_root_usage_hint() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(app(MockTransport::new(), "abc"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "code": 200, "msg": "Go to /translate with POST." }));
}

// ========== Auth ==========

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let mock = hallo_mock();
    let request = translate_request("/translate", None, json!({ "text": "Hello." }));
    let (status, body) = send(app(mock.clone(), "abc"), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid Token" }));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_query_token_is_rejected() {
    let request = translate_request("/translate?token=xyz", None, json!({ "text": "Hello." }));
    let (status, _) = send(app(hallo_mock(), "abc"), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_accepted_token_forms() {
    let cases = [
        ("/translate?token=abc", None),
        ("/translate", Some("Bearer abc")),
        ("/translate", Some("DeepL-Auth-Key abc")),
        ("/translate", Some("abc")),
        ("/translate?token=def", Some("Bearer nope")),
    ];
    for (uri, auth) in cases {
        let request = translate_request(uri, auth, json!({ "text": "Hello." }));
        let (status, _) = send(app(hallo_mock(), "abc,def"), request).await;
        assert_eq!(status, StatusCode::OK, "uri={uri} auth={auth:?}");
    }
}

#[tokio::test]
async fn test_empty_token_config_admits_anyone() {
    let request = translate_request("/translate", None, json!({ "text": "Hello." }));
    let (status, _) = send(app(hallo_mock(), ""), request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_root_needs_no_token() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, _) = send(app(MockTransport::new(), "abc"), request).await;

    assert_eq!(status, StatusCode::OK);
}

// ========== Translate ==========

#[tokio::test]
async fn test_translate_success_shape() {
    let request = translate_request(
        "/translate?token=abc",
        None,
        json!({ "text": "Hello.", "source_lang": "auto", "target_lang": "de" }),
    );
    let (status, body) = send(app(hallo_mock(), "abc"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"], "Hallo.");
    assert_eq!(body["alternatives"], json!(["Hallo.", "Hallo!"]));
    assert_eq!(body["method"], "Free");
    assert_eq!(body["source_lang"], "EN");
    assert_eq!(body["target_lang"], "DE");
    assert!(body["id"].is_i64());
}

#[tokio::test]
async fn test_text_list_translates_first_entry() {
    let mock = hallo_mock();
    let request = translate_request(
        "/translate",
        Some("Bearer abc"),
        json!({ "text": ["Hello.", "ignored"], "target_lang": "de" }),
    );
    let (status, _) = send(app(mock.clone(), "abc"), request).await;

    assert_eq!(status, StatusCode::OK);
    let split: Value = serde_json::from_str(&mock.calls()[0].body).unwrap();
    assert_eq!(split["params"]["texts"], json!(["Hello."]));
}

#[tokio::test]
async fn test_tag_handling_string_selects_richtext() {
    let mock = hallo_mock();
    let request = translate_request(
        "/translate",
        Some("abc"),
        json!({ "text": "Hello.", "tag_handling": "html" }),
    );
    let (status, _) = send(app(mock.clone(), "abc"), request).await;

    assert_eq!(status, StatusCode::OK);
    let split: Value = serde_json::from_str(&mock.calls()[0].body).unwrap();
    assert_eq!(split["params"]["textType"], "richtext");
}

#[tokio::test]
async fn test_tag_handling_false_keeps_plaintext() {
    let mock = hallo_mock();
    let request = translate_request(
        "/translate",
        Some("abc"),
        json!({ "text": "Hello.", "tag_handling": false }),
    );
    let (status, _) = send(app(mock.clone(), "abc"), request).await;

    assert_eq!(status, StatusCode::OK);
    let split: Value = serde_json::from_str(&mock.calls()[0].body).unwrap();
    assert_eq!(split["params"]["textType"], "plaintext");
}

#[tokio::test]
async fn test_empty_text_is_bad_request() {
    let mock = hallo_mock();
    let request = translate_request("/translate", Some("abc"), json!({ "text": "" }));
    let (status, body) = send(app(mock.clone(), "abc"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No text to translate" }));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_upstream_status_body_is_passed_through() {
    let mock = MockTransport::new()
        .with_reply(RpcMethod::SplitText, MockReply::status(429, "Too many requests"));
    let request = translate_request("/translate", Some("abc"), json!({ "text": "Hello." }));
    let (status, body) = send(app(mock, "abc"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Too many requests" }));
}

#[tokio::test]
async fn test_transport_failure_is_bad_request() {
    let mock = MockTransport::new()
        .with_reply(RpcMethod::SplitText, MockReply::transport_error("connection refused"));
    let request = translate_request("/translate", Some("abc"), json!({ "text": "Hello." }));
    let (status, body) = send(app(mock, "abc"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_invalid_json_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/translate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "abc")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(hallo_mock(), "abc"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
