//! Client library for the Akismet spam-detection service.
//!
//! # Overview
//! A [`Comment`] accumulates submission fields, defaulting the posting side's
//! IP, user agent and referrer from an explicit [`AmbientContext`]. An
//! [`AkismetClient`] verifies the API key eagerly at construction and then
//! offers the three service operations: spam check, spam submission and
//! false-positive submission. Responses are the service's literal text
//! bodies (`valid`/`invalid`, `true`/`false`), parsed per endpoint.
//!
//! # Design
//! - Request building and response parsing are deterministic and
//!   network-free; the round-trip goes through the [`HttpTransport`] trait,
//!   with [`UreqTransport`] as the default and scripted transports in tests.
//! - Only fields named by the caller plus a fixed whitelist of ambient
//!   server metadata ever travel to the service; the required-field check
//!   gates every operation at serialization time.
//! - All failures surface synchronously as [`AkismetError`]; nothing is
//!   retried or coerced to a default.

pub mod ambient;
pub mod client;
pub mod comment;
pub mod error;
pub mod http;

pub use ambient::{AmbientContext, SERVER_VAR_WHITELIST};
pub use client::{AkismetClient, ClientConfig, DEFAULT_API_SERVER, DEFAULT_API_VERSION};
pub use comment::{Comment, CommentInput, REQUIRED_FIELDS};
pub use error::AkismetError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError, UreqTransport};
