use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, SPAM_AUTHOR, SUBMIT_THANKS};
use tower::ServiceExt;

const VALID_KEY: &str = "AABBCCDDEEFF";

async fn body_text(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

// --- verify-key ---

#[tokio::test]
async fn verify_key_accepts_the_configured_key() {
    let resp = app(VALID_KEY)
        .oneshot(form_request(
            "/1.1/verify-key",
            "key=AABBCCDDEEFF&blog=http%3A%2F%2Fblog.example.com%2F",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "valid");
}

#[tokio::test]
async fn verify_key_rejects_other_keys() {
    let resp = app(VALID_KEY)
        .oneshot(form_request(
            "/1.1/verify-key",
            "key=FFEEDDCCBBAA&blog=http%3A%2F%2Fblog.example.com%2F",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "invalid");
}

#[tokio::test]
async fn verify_key_rejects_missing_blog() {
    let resp = app(VALID_KEY)
        .oneshot(form_request("/1.1/verify-key", "key=AABBCCDDEEFF"))
        .await
        .unwrap();

    assert_eq!(body_text(resp).await, "invalid");
}

// --- comment-check ---

#[tokio::test]
async fn comment_check_flags_the_spam_author() {
    let body = format!(
        "blog=http%3A%2F%2Fblog.example.com%2F&user_ip=127.0.0.1&user_agent=X&comment_author={SPAM_AUTHOR}"
    );
    let resp = app(VALID_KEY)
        .oneshot(form_request("/1.1/comment-check", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "true");
}

#[tokio::test]
async fn comment_check_passes_ordinary_comments() {
    let resp = app(VALID_KEY)
        .oneshot(form_request(
            "/1.1/comment-check",
            "blog=http%3A%2F%2Fblog.example.com%2F&user_ip=127.0.0.1&user_agent=X&comment_author=Test+Author",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "false");
}

#[tokio::test]
async fn comment_check_requires_user_ip() {
    let resp = app(VALID_KEY)
        .oneshot(form_request(
            "/1.1/comment-check",
            "blog=http%3A%2F%2Fblog.example.com%2F&user_agent=X",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, "Missing required field: user_ip.");
}

// --- submit endpoints ---

#[tokio::test]
async fn submit_spam_thanks_the_reporter() {
    let resp = app(VALID_KEY)
        .oneshot(form_request(
            "/1.1/submit-spam",
            "blog=http%3A%2F%2Fblog.example.com%2F&user_ip=127.0.0.1&user_agent=X",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, SUBMIT_THANKS);
}

#[tokio::test]
async fn submit_ham_thanks_the_reporter() {
    let resp = app(VALID_KEY)
        .oneshot(form_request(
            "/1.1/submit-ham",
            "blog=http%3A%2F%2Fblog.example.com%2F&user_ip=127.0.0.1&user_agent=X",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, SUBMIT_THANKS);
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let resp = app(VALID_KEY)
        .oneshot(form_request("/1.1/comment-score", "blog=x"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
