//! Client for the Akismet REST API.
//!
//! # Design
//! `AkismetClient` owns its configuration and a boxed [`HttpTransport`].
//! Request building and response parsing are split into `build_*` methods and
//! per-endpoint parsers, both deterministic and network-free; the public
//! operations (`is_spam`, `submit_spam`, `submit_false_positive`) wire them
//! together through the transport, one blocking round-trip each.
//!
//! The API key is verified eagerly: both constructors issue the `verify-key`
//! request and fail with [`AkismetError::InvalidApiKey`] on rejection, so a
//! client value that exists is always a verified one.

use serde::{Deserialize, Serialize};

use crate::ambient::AmbientContext;
use crate::comment::{Comment, CommentInput};
use crate::error::AkismetError;
use crate::http::{form_encode, HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};

/// Default API host.
pub const DEFAULT_API_SERVER: &str = "rest.akismet.com";

/// Default API version path segment.
pub const DEFAULT_API_VERSION: &str = "1.1";

/// Configuration for an [`AkismetClient`].
///
/// Serde uses the camelCase names (`blog`, `apiKey`, `apiServer`,
/// `apiVersion`, `userAgent`), the same names [`ClientConfig::set`] accepts,
/// so a config can be loaded from a JSON document with any subset of keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// URL of the blog comments are checked for.
    pub blog: String,
    /// Akismet (Wordpress) API key.
    pub api_key: String,
    /// API host, without scheme.
    pub api_server: String,
    /// API version path segment.
    pub api_version: String,
    /// User-agent string identifying this library to the service.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            blog: String::new(),
            api_key: String::new(),
            api_server: DEFAULT_API_SERVER.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: format!("akismet-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new(blog: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            blog: blog.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Updates one value by configuration name. Unknown names are an
    /// [`AkismetError::InvalidArgument`] error.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), AkismetError> {
        match name {
            "blog" => self.blog = value.to_string(),
            "apiKey" => self.api_key = value.to_string(),
            "apiServer" => self.api_server = value.to_string(),
            "apiVersion" => self.api_version = value.to_string(),
            "userAgent" => self.user_agent = value.to_string(),
            other => {
                return Err(AkismetError::InvalidArgument(format!(
                    "unknown configuration name: \"{other}\""
                )))
            }
        }
        Ok(())
    }
}

/// Synchronous client for the Akismet spam-detection service.
///
/// Not safe for unsynchronized sharing: configuration and the transport are
/// mutable state, and every operation takes `&mut self`.
///
/// # Example
///
/// ```no_run
/// use akismet_core::{AkismetClient, AmbientContext, ClientConfig, Comment};
///
/// # fn main() -> Result<(), akismet_core::AkismetError> {
/// let config = ClientConfig::new("http://blog.example.com/", "AABBCCDDEEFF");
/// let mut client = AkismetClient::new(config, AmbientContext::new())?;
///
/// let mut comment = Comment::new(AmbientContext::new());
/// comment
///     .set_author(Some("Test Author"))
///     .set_content(Some("Hello, World!"))
///     .set_user_ip(Some("127.0.0.1"))
///     .set_user_agent(Some("Mozilla/5.0"))
///     .set_http_referrer(Some("http://example.com/"));
///
/// if client.is_spam(&comment)? {
///     // discard the comment
/// }
/// # Ok(())
/// # }
/// ```
pub struct AkismetClient {
    config: ClientConfig,
    ambient: AmbientContext,
    transport: Box<dyn HttpTransport>,
}

impl std::fmt::Debug for AkismetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AkismetClient")
            .field("config", &self.config)
            .field("ambient", &self.ambient)
            .finish_non_exhaustive()
    }
}

impl AkismetClient {
    /// Creates a client over the default ureq transport and verifies the API
    /// key against the service before returning.
    pub fn new(config: ClientConfig, ambient: AmbientContext) -> Result<Self, AkismetError> {
        Self::with_transport(config, ambient, Box::new(UreqTransport::new()))
    }

    /// Creates a client over the given transport and verifies the API key
    /// before returning. A `verify-key` body of `invalid` fails with
    /// [`AkismetError::InvalidApiKey`] and no client value is produced.
    pub fn with_transport(
        config: ClientConfig,
        ambient: AmbientContext,
        transport: Box<dyn HttpTransport>,
    ) -> Result<Self, AkismetError> {
        let mut client = Self {
            config,
            ambient,
            transport,
        };
        client.verify_key()?;
        Ok(client)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Updates one configuration value by name.
    pub fn set_config(&mut self, name: &str, value: &str) -> Result<&mut Self, AkismetError> {
        self.config.set(name, value)?;
        Ok(self)
    }

    /// Merges a set of configuration overrides.
    pub fn set_configs<I, K, V>(&mut self, overrides: I) -> Result<&mut Self, AkismetError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in overrides {
            self.config.set(name.as_ref(), value.as_ref())?;
        }
        Ok(self)
    }

    /// Replaces the transport used for subsequent requests.
    pub fn set_request(&mut self, transport: Box<dyn HttpTransport>) -> &mut Self {
        self.transport = transport;
        self
    }

    /// Checks a comment against the service. `true` means spam.
    pub fn is_spam(&mut self, comment: impl Into<CommentInput>) -> Result<bool, AkismetError> {
        let comment = self.normalize(comment.into());
        let request = self.build_comment_check(&comment)?;
        let response = self.execute(request)?;
        Self::parse_comment_check(&response.body)
    }

    /// Reports a comment the service missed as spam.
    pub fn submit_spam(
        &mut self,
        comment: impl Into<CommentInput>,
    ) -> Result<&mut Self, AkismetError> {
        let comment = self.normalize(comment.into());
        let request = self.build_submit_spam(&comment)?;
        self.execute(request)?;
        Ok(self)
    }

    /// Reports a legitimate comment the service misclassified as spam.
    pub fn submit_false_positive(
        &mut self,
        comment: impl Into<CommentInput>,
    ) -> Result<&mut Self, AkismetError> {
        let comment = self.normalize(comment.into());
        let request = self.build_submit_false_positive(&comment)?;
        self.execute(request)?;
        Ok(self)
    }

    /// The `verify-key` request: `key` and `blog`, form-encoded, against the
    /// bare API host.
    pub fn build_verify_key(&self) -> HttpRequest {
        let body = form_encode([
            ("key", self.config.api_key.as_str()),
            ("blog", self.config.blog.as_str()),
        ]);
        let url = format!(
            "http://{}/{}/verify-key",
            self.config.api_server, self.config.api_version
        );
        self.post_request(url, body)
    }

    pub fn build_comment_check(&self, comment: &Comment) -> Result<HttpRequest, AkismetError> {
        self.build_comment_request("comment-check", comment)
    }

    pub fn build_submit_spam(&self, comment: &Comment) -> Result<HttpRequest, AkismetError> {
        self.build_comment_request("submit-spam", comment)
    }

    /// False positives go to the service's `submit-ham` endpoint.
    pub fn build_submit_false_positive(
        &self,
        comment: &Comment,
    ) -> Result<HttpRequest, AkismetError> {
        self.build_comment_request("submit-ham", comment)
    }

    /// Response grammar of `verify-key`: `valid` or `invalid`, nothing else.
    pub fn parse_verify_key(body: &str) -> Result<bool, AkismetError> {
        match body {
            "valid" => Ok(true),
            "invalid" => Ok(false),
            other => Err(AkismetError::Protocol {
                endpoint: "verify-key",
                body: other.to_string(),
            }),
        }
    }

    /// Response grammar of `comment-check`: `true` or `false`, nothing else.
    pub fn parse_comment_check(body: &str) -> Result<bool, AkismetError> {
        match body {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(AkismetError::Protocol {
                endpoint: "comment-check",
                body: other.to_string(),
            }),
        }
    }

    fn verify_key(&mut self) -> Result<(), AkismetError> {
        let request = self.build_verify_key();
        let response = self.execute(request)?;
        if Self::parse_verify_key(&response.body)? {
            Ok(())
        } else {
            Err(AkismetError::InvalidApiKey {
                api_key: self.config.api_key.clone(),
            })
        }
    }

    /// Wraps a raw field map into a comment using the client's ambient
    /// context; a prepared comment passes through unchanged.
    fn normalize(&self, input: CommentInput) -> Comment {
        match input {
            CommentInput::Comment(comment) => comment,
            CommentInput::Fields(fields) => Comment::with_fields(self.ambient.clone(), fields),
        }
    }

    /// Comment endpoints live on the key subdomain and receive the comment's
    /// post parameters plus `blog`. The configured blog URL overrides any
    /// `blog` comment field.
    fn build_comment_request(
        &self,
        operation: &str,
        comment: &Comment,
    ) -> Result<HttpRequest, AkismetError> {
        let mut parameters = comment.post_parameters()?;
        parameters.insert("blog".to_string(), self.config.blog.clone());

        let body = form_encode(parameters.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let url = format!(
            "http://{}.{}/{}/{operation}",
            self.config.api_key, self.config.api_server, self.config.api_version
        );
        Ok(self.post_request(url, body))
    }

    fn post_request(&self, url: String, body: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: vec![
                (
                    "content-type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ),
                ("user-agent".to_string(), self.config.user_agent.clone()),
            ],
            body: Some(body),
        }
    }

    /// One round-trip. Transport failures and non-2xx statuses both become
    /// [`AkismetError::Http`] carrying the original request.
    fn execute(&mut self, request: HttpRequest) -> Result<HttpResponse, AkismetError> {
        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(e) => {
                return Err(AkismetError::Http {
                    request,
                    status: None,
                    message: e.message,
                })
            }
        };
        if !(200..300).contains(&response.status) {
            return Err(AkismetError::Http {
                request,
                status: Some(response.status),
                message: response.body,
            });
        }
        Ok(response)
    }
}
