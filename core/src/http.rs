//! HTTP transport boundary for the Akismet client.
//!
//! # Design
//! Requests and responses are described as plain data. The client builds
//! `HttpRequest` values and interprets `HttpResponse` values; the actual
//! round-trip goes through the `HttpTransport` trait so tests can script
//! responses without a network. `UreqTransport` is the default blocking
//! implementation.
//!
//! All fields use owned types (`String`, `Vec`) so request values can be
//! carried inside errors for diagnostics without lifetime concerns.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// Built by `AkismetClient::build_*` methods and executed by an
/// `HttpTransport`. Carried inside `AkismetError::Http` when a round-trip
/// fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Socket-level failure reported by a transport (connection refused, DNS,
/// broken stream). Distinct from non-2xx responses, which transports must
/// return as `HttpResponse` data.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failure: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Executes one blocking HTTP round-trip.
///
/// Implementations must return every response they receive, including 4xx
/// and 5xx, as an `HttpResponse`; `TransportError` is reserved for failures
/// where no response was obtained at all.
pub trait HttpTransport {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Encode name/value pairs as an `application/x-www-form-urlencoded` body.
pub(crate) fn form_encode<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

/// Default transport backed by a blocking [`ureq::Agent`].
///
/// Status-as-error is disabled so the client sees 4xx/5xx responses as data
/// and applies its own classification.
#[derive(Debug)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpTransport for UreqTransport {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (&request.method, &request.body) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            (HttpMethod::Post, Some(body)) => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send_empty()
            }
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
