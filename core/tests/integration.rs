//! End-to-end run against the live mock Akismet server.
//!
//! # Design
//! Starts the mock server on a random port, then drives verification, spam
//! checks and submissions over real HTTP using ureq. The client addresses
//! per-key subdomains of the configured API host, which do not resolve for a
//! local mock, so the test transport keeps each request's path and directs
//! it at the mock's address instead.

use akismet_core::{
    AkismetClient, AkismetError, AmbientContext, ClientConfig, Comment, HttpMethod, HttpRequest,
    HttpResponse, HttpTransport, TransportError,
};

const VALID_KEY: &str = "AABBCCDDEEFF";

/// Executes requests over real HTTP, rewriting every target to the mock
/// server's base address.
struct MockDirectedTransport {
    agent: ureq::Agent,
    base: String,
}

impl MockDirectedTransport {
    fn new(base: &str) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            base: base.to_string(),
        }
    }
}

impl HttpTransport for MockDirectedTransport {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let parsed = url::Url::parse(&request.url).map_err(|e| TransportError {
            message: e.to_string(),
        })?;
        let target = format!("{}{}", self.base, parsed.path());

        let result = match request.method {
            HttpMethod::Post => {
                let mut builder = self.agent.post(&target);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                let body = request.body.clone().unwrap_or_default();
                builder.send(body.as_bytes())
            }
            HttpMethod::Get => self.agent.get(&target).call(),
        };

        let mut response = result.map_err(|e| TransportError {
            message: e.to_string(),
        })?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError {
                message: e.to_string(),
            })?;

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

/// Start the mock server on a random port and return its base URL.
fn start_mock() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, VALID_KEY).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn comment_by(author: &str) -> Comment {
    let mut comment = Comment::new(AmbientContext::new());
    comment
        .set_author(Some(author))
        .set_author_email(Some("test@example.com"))
        .set_content(Some("Hello, World!"))
        .set_user_ip(Some("127.0.0.1"))
        .set_user_agent(Some("akismet-core integration tests"))
        .set_http_referrer(Some("http://example.com/"));
    comment
}

#[test]
fn check_and_submit_lifecycle() {
    let base = start_mock();
    let config = ClientConfig::new("http://blog.example.com/", VALID_KEY);
    let mut client = AkismetClient::with_transport(
        config,
        AmbientContext::new(),
        Box::new(MockDirectedTransport::new(&base)),
    )
    .unwrap();

    // the service's guaranteed-spam test author
    let spam = comment_by(mock_server::SPAM_AUTHOR);
    assert!(client.is_spam(&spam).unwrap());

    let ham = comment_by("Test Author");
    assert!(!client.is_spam(&ham).unwrap());

    // corrections chain on the same client
    client
        .submit_spam(&spam)
        .unwrap()
        .submit_false_positive(&ham)
        .unwrap();
}

#[test]
fn wrong_key_fails_at_construction() {
    let base = start_mock();
    let config = ClientConfig::new("http://blog.example.com/", "000000000000");
    let err = AkismetClient::with_transport(
        config,
        AmbientContext::new(),
        Box::new(MockDirectedTransport::new(&base)),
    )
    .unwrap_err();

    match err {
        AkismetError::InvalidApiKey { api_key } => assert_eq!(api_key, "000000000000"),
        other => panic!("expected InvalidApiKey, got {other:?}"),
    }
}

#[test]
fn incomplete_comment_never_reaches_the_network() {
    let base = start_mock();
    let config = ClientConfig::new("http://blog.example.com/", VALID_KEY);
    let mut client = AkismetClient::with_transport(
        config,
        AmbientContext::new(),
        Box::new(MockDirectedTransport::new(&base)),
    )
    .unwrap();

    let mut comment = comment_by("Test Author");
    comment.set_http_referrer(None);

    let err = client.submit_spam(&comment).unwrap_err();
    assert!(matches!(
        err,
        AkismetError::InvalidComment {
            missing_field: "referrer",
            ..
        }
    ));
}
