//! Comment record: the field set describing one submission.
//!
//! # Design
//! A `Comment` accumulates name/value fields through raw and named setters,
//! defaulting `user_ip` / `user_agent` / `referrer` from an
//! [`AmbientContext`] at construction. Setters perform no validation; the
//! required-field check is deferred to [`Comment::post_parameters`], the
//! gate every client operation serializes through. Fields live in a
//! `BTreeMap` so serialization and debug output are deterministic.

use std::collections::BTreeMap;
use std::fmt;

use crate::ambient::AmbientContext;
use crate::error::AkismetError;
use crate::http::form_encode;

/// Fields that must be present before a comment can be serialized for
/// submission, in the order missing ones are reported.
pub const REQUIRED_FIELDS: [&str; 3] = ["user_ip", "user_agent", "referrer"];

/// A comment to check or submit.
///
/// # Example
///
/// ```
/// use akismet_core::{AmbientContext, Comment};
///
/// let mut comment = Comment::new(AmbientContext::new());
/// comment
///     .set_author(Some("Test Author"))
///     .set_author_email(Some("test@example.com"))
///     .set_content(Some("Hello, World!"))
///     .set_user_ip(Some("127.0.0.1"))
///     .set_user_agent(Some("Mozilla/5.0"))
///     .set_http_referrer(Some("http://example.com/"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    fields: BTreeMap<String, String>,
    ambient: AmbientContext,
}

impl Comment {
    /// Creates a comment, seeding `user_ip`, `user_agent` and `referrer`
    /// from the ambient context where it has them.
    pub fn new(ambient: AmbientContext) -> Self {
        let mut fields = BTreeMap::new();
        if let Some(addr) = ambient.remote_addr() {
            fields.insert("user_ip".to_string(), addr.to_string());
        }
        if let Some(user_agent) = ambient.user_agent() {
            fields.insert("user_agent".to_string(), user_agent.to_string());
        }
        if let Some(referrer) = ambient.referrer() {
            fields.insert("referrer".to_string(), referrer.to_string());
        }
        Self {
            fields,
            ambient,
        }
    }

    /// Creates a comment from raw field names and values. Ambient defaults
    /// are applied first, so explicit fields always win.
    pub fn with_fields<I, K, V>(ambient: AmbientContext, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut comment = Self::new(ambient);
        comment.set_fields(fields);
        comment
    }

    /// Sets one raw field. `None` removes the field; an unset field is
    /// indistinguishable from one that was never set. No validation happens
    /// here.
    pub fn set_field(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) => {
                self.fields.insert(name.to_string(), value.to_string());
            }
            None => {
                self.fields.remove(name);
            }
        }
        self
    }

    /// Sets several raw fields at once.
    pub fn set_fields<I, K, V>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in fields {
            self.fields.insert(name.into(), value.into());
        }
        self
    }

    /// The name of the comment author.
    pub fn set_author(&mut self, author: Option<&str>) -> &mut Self {
        self.set_field("comment_author", author)
    }

    /// The email address of the comment author.
    pub fn set_author_email(&mut self, email: Option<&str>) -> &mut Self {
        self.set_field("comment_author_email", email)
    }

    /// A link provided by the comment author.
    pub fn set_author_url(&mut self, url: Option<&str>) -> &mut Self {
        self.set_field("comment_author_url", url)
    }

    /// The content of the comment.
    pub fn set_content(&mut self, content: Option<&str>) -> &mut Self {
        self.set_field("comment_content", content)
    }

    /// The comment type, e.g. `comment`, `trackback`, `pingback`.
    pub fn set_comment_type(&mut self, comment_type: Option<&str>) -> &mut Self {
        self.set_field("comment_type", comment_type)
    }

    /// Permalink of the post the comment was added to. Not required, but
    /// Akismet can use it to improve detection accuracy.
    pub fn set_post_permalink(&mut self, permalink: Option<&str>) -> &mut Self {
        self.set_field("permalink", permalink)
    }

    /// IP address the comment was posted from. Defaulted from the ambient
    /// context at construction when available.
    pub fn set_user_ip(&mut self, ip_address: Option<&str>) -> &mut Self {
        self.set_field("user_ip", ip_address)
    }

    /// User agent the comment was posted with. Defaulted from the ambient
    /// context at construction when available.
    pub fn set_user_agent(&mut self, user_agent: Option<&str>) -> &mut Self {
        self.set_field("user_agent", user_agent)
    }

    /// Referrer header of the posting request. Defaulted from the ambient
    /// context at construction when available.
    pub fn set_http_referrer(&mut self, referrer: Option<&str>) -> &mut Self {
        self.set_field("referrer", referrer)
    }

    /// The currently set fields. The view is read-only; mutation goes
    /// through the setters.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Serializes this comment for submission to the service.
    ///
    /// Fails with [`AkismetError::InvalidComment`], naming the first missing
    /// field in [`REQUIRED_FIELDS`] order, if any required field is absent.
    /// On success the named fields are merged over the ambient whitelisted
    /// server variables, read at call time, with named fields winning key
    /// collisions.
    pub fn post_parameters(&self) -> Result<BTreeMap<String, String>, AkismetError> {
        for field in REQUIRED_FIELDS {
            if !self.fields.contains_key(field) {
                return Err(AkismetError::InvalidComment {
                    comment: Box::new(self.clone()),
                    missing_field: field,
                });
            }
        }

        let mut parameters = self.ambient.server_vars().clone();
        for (name, value) in &self.fields {
            parameters.insert(name.clone(), value.clone());
        }
        Ok(parameters)
    }
}

/// Debug rendering: the set fields as `name => value` lines, then either the
/// form-encoded post data or the missing required field names. Unlike
/// [`Comment::post_parameters`] this never fails on incomplete records.
impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fields:")?;
        writeln!(f)?;
        for (name, value) in &self.fields {
            writeln!(f, "\t{name} => {value}")?;
        }
        match self.post_parameters() {
            Ok(parameters) => {
                writeln!(f)?;
                writeln!(f, "Post Data:")?;
                writeln!(f)?;
                let encoded =
                    form_encode(parameters.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                writeln!(f, "\t{encoded}")?;
            }
            Err(_) => {
                writeln!(f)?;
                writeln!(f, "\tMissing Required Fields:")?;
                writeln!(f)?;
                for field in REQUIRED_FIELDS {
                    if !self.fields.contains_key(field) {
                        writeln!(f, "\t{field}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Input accepted by every client operation: a prepared [`Comment`] or a raw
/// field map, which is wrapped into a comment (with the client's ambient
/// defaults) before use.
#[derive(Debug, Clone)]
pub enum CommentInput {
    Comment(Comment),
    Fields(BTreeMap<String, String>),
}

impl From<Comment> for CommentInput {
    fn from(comment: Comment) -> Self {
        CommentInput::Comment(comment)
    }
}

impl From<&Comment> for CommentInput {
    fn from(comment: &Comment) -> Self {
        CommentInput::Comment(comment.clone())
    }
}

impl From<BTreeMap<String, String>> for CommentInput {
    fn from(fields: BTreeMap<String, String>) -> Self {
        CommentInput::Fields(fields)
    }
}
