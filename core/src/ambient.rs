//! Ambient request context: metadata from the environment in which a comment
//! was posted.
//!
//! # Design
//! The original service reads server variables from process-wide request
//! state. Here the caller builds an explicit `AmbientContext` value instead,
//! and only whitelisted keys are ever retained, so nothing sensitive can leak
//! into an outgoing submission by accident.

use std::collections::BTreeMap;

/// Server variables permitted to travel with a submission.
///
/// Akismet recommends sending as much request metadata as possible, but many
/// server variables carry sensitive data (authentication, cookies) that is
/// irrelevant for spam detection. This closed set identifies a unique
/// client/server pair without exposing any of that. Keys are case-sensitive.
pub const SERVER_VAR_WHITELIST: [&str; 30] = [
    "SCRIPT_URI",
    "HTTP_HOST",
    "HTTP_USER_AGENT",
    "HTTP_ACCEPT",
    "HTTP_ACCEPT_LANGUAGE",
    "HTTP_ACCEPT_ENCODING",
    "HTTP_ACCEPT_CHARSET",
    "HTTP_KEEP_ALIVE",
    "HTTP_CONNECTION",
    "HTTP_CACHE_CONTROL",
    "HTTP_PRAGMA",
    "HTTP_DATE",
    "HTTP_EXPECT",
    "HTTP_MAX_FORWARDS",
    "HTTP_RANGE",
    "CONTENT_TYPE",
    "CONTENT_LENGTH",
    "SERVER_SIGNATURE",
    "SERVER_SOFTWARE",
    "SERVER_NAME",
    "SERVER_ADDR",
    "SERVER_PORT",
    "REMOTE_PORT",
    "GATEWAY_INTERFACE",
    "SERVER_PROTOCOL",
    "REQUEST_METHOD",
    "QUERY_STRING",
    "REQUEST_URI",
    "SCRIPT_NAME",
    "REQUEST_TIME",
];

/// Metadata about the request in which a comment was posted.
///
/// Seeds the `user_ip` / `user_agent` / `referrer` defaults of a
/// [`Comment`](crate::Comment) and contributes the whitelisted server
/// variables merged into its post parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientContext {
    remote_addr: Option<String>,
    user_agent: Option<String>,
    referrer: Option<String>,
    server_vars: BTreeMap<String, String>,
}

impl AmbientContext {
    /// An empty context: no defaults, no server variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from CGI-style server variables.
    ///
    /// `REMOTE_ADDR`, `HTTP_USER_AGENT` and `HTTP_REFERER` feed the comment
    /// defaults; whitelisted keys are retained as server variables; every
    /// other key is discarded.
    pub fn from_server_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut context = Self::new();
        for (name, value) in vars {
            let name = name.as_ref();
            let value = value.into();
            match name {
                "REMOTE_ADDR" => context.remote_addr = Some(value),
                "HTTP_REFERER" => context.referrer = Some(value),
                // HTTP_USER_AGENT is both a default source and whitelisted.
                "HTTP_USER_AGENT" => {
                    context.user_agent = Some(value.clone());
                    context.server_vars.insert(name.to_string(), value);
                }
                _ if SERVER_VAR_WHITELIST.contains(&name) => {
                    context.server_vars.insert(name.to_string(), value);
                }
                _ => {}
            }
        }
        context
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Adds one server variable. Keys outside the whitelist are discarded.
    pub fn with_server_var(mut self, name: &str, value: impl Into<String>) -> Self {
        if SERVER_VAR_WHITELIST.contains(&name) {
            self.server_vars.insert(name.to_string(), value.into());
        }
        self
    }

    /// IP address the comment was posted from, if known.
    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    /// User agent the comment was posted with, if known.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Referrer header of the posting request, if known.
    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }

    /// The retained (whitelisted) server variables.
    pub fn server_vars(&self) -> &BTreeMap<String, String> {
        &self.server_vars
    }
}
