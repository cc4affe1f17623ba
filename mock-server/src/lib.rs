//! Mock of the Akismet REST API for integration testing.
//!
//! Serves the four endpoints the client speaks to, with the service's
//! plain-text response bodies. Verification checks the form key against the
//! configured valid key; comment-check follows the service's documented test
//! convention that a `comment_author` of `viagra-test-123` is always spam.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Form, Router};
use serde::Deserialize;
use tokio::net::TcpListener;

/// Author name the service guarantees to classify as spam.
pub const SPAM_AUTHOR: &str = "viagra-test-123";

/// Body returned by both submit endpoints.
pub const SUBMIT_THANKS: &str = "Thanks for making the web a better place.";

struct ApiConfig {
    valid_key: String,
}

pub fn app(valid_key: &str) -> Router {
    let config = Arc::new(ApiConfig {
        valid_key: valid_key.to_string(),
    });
    Router::new()
        .route("/1.1/verify-key", post(verify_key))
        .route("/1.1/comment-check", post(comment_check))
        .route("/1.1/submit-spam", post(submit))
        .route("/1.1/submit-ham", post(submit))
        .with_state(config)
}

pub async fn run(listener: TcpListener, valid_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(valid_key)).await
}

#[derive(Deserialize)]
struct VerifyKey {
    #[serde(default)]
    key: String,
    #[serde(default)]
    blog: String,
}

async fn verify_key(
    State(config): State<Arc<ApiConfig>>,
    Form(form): Form<VerifyKey>,
) -> &'static str {
    if !form.key.is_empty() && form.key == config.valid_key && !form.blog.is_empty() {
        "valid"
    } else {
        "invalid"
    }
}

async fn comment_check(
    Form(params): Form<BTreeMap<String, String>>,
) -> Result<&'static str, (StatusCode, String)> {
    require_fields(&params)?;
    Ok(classify(&params))
}

async fn submit(
    Form(params): Form<BTreeMap<String, String>>,
) -> Result<&'static str, (StatusCode, String)> {
    require_fields(&params)?;
    Ok(SUBMIT_THANKS)
}

fn require_fields(params: &BTreeMap<String, String>) -> Result<(), (StatusCode, String)> {
    for required in ["blog", "user_ip", "user_agent"] {
        if !params.contains_key(required) {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Missing required field: {required}."),
            ));
        }
    }
    Ok(())
}

fn classify(params: &BTreeMap<String, String>) -> &'static str {
    if params.get("comment_author").is_some_and(|author| author == SPAM_AUTHOR) {
        "true"
    } else {
        "false"
    }
}
