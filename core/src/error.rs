//! Error types for the Akismet client.
//!
//! # Design
//! One enum covers the whole failure surface. Variants carry the object that
//! triggered them — the offending comment, the rejected API key, the original
//! request — so callers can diagnose failures without re-deriving context.
//! Nothing in this layer retries or swallows; every failure reaches the
//! caller synchronously.

use std::fmt;

use crate::comment::Comment;
use crate::http::HttpRequest;

/// Errors returned by `Comment` serialization and `AkismetClient` operations.
#[derive(Debug)]
pub enum AkismetError {
    /// A required field was missing when the comment was serialized.
    /// `missing_field` is the first missing field in required order.
    InvalidComment {
        comment: Box<Comment>,
        missing_field: &'static str,
    },

    /// The service rejected the API key during verification. The client is
    /// never constructed in this case.
    InvalidApiKey { api_key: String },

    /// The round-trip failed: either no response was obtained (`status` is
    /// `None`) or the service returned a non-2xx status. Carries the
    /// original request for diagnostics.
    Http {
        request: HttpRequest,
        status: Option<u16>,
        message: String,
    },

    /// A 2xx response body was outside the literal set the endpoint defines.
    Protocol { endpoint: &'static str, body: String },

    /// An unknown configuration name was passed to `set_config`.
    InvalidArgument(String),
}

impl fmt::Display for AkismetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AkismetError::InvalidComment { missing_field, .. } => {
                write!(f, "comment is missing required field: \"{missing_field}\"")
            }
            AkismetError::InvalidApiKey { api_key } => {
                write!(f, "invalid API key: \"{api_key}\"")
            }
            AkismetError::Http {
                status: Some(status),
                message,
                ..
            } => {
                write!(f, "HTTP {status}: {message}")
            }
            AkismetError::Http {
                status: None,
                message,
                ..
            } => {
                write!(f, "HTTP transport failure: {message}")
            }
            AkismetError::Protocol { endpoint, body } => {
                write!(f, "unexpected {endpoint} response: \"{body}\"")
            }
            AkismetError::InvalidArgument(message) => {
                write!(f, "invalid argument: {message}")
            }
        }
    }
}

impl std::error::Error for AkismetError {}
