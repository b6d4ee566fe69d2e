//! Request descriptor types
//!
//! A [`RequestDescriptor`] captures everything the dispatch layer needs to
//! transmit a request: method, target path, headers, body, and the
//! `retried` flag that bounds the automatic retry-after-refresh to one
//! resubmission per request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// Canonical name of the authorization header.
pub const AUTHORIZATION: &str = "Authorization";

/// Supported HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET method
    #[default]
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP HEAD method
    Head,
    /// HTTP OPTIONS method
    Options,
}

impl HttpMethod {
    /// Returns whether this method typically has a request body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns the method as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            other => Err(DomainError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// A header name-value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The header name
    pub name: String,
    /// The header value
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A collection of request headers.
///
/// Lookups are case-insensitive per RFC 9110; insertion order is preserved
/// for transmission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(Vec<Header>);

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets a header, replacing any existing header with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self
            .0
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(&name))
        {
            existing.value = value;
        } else {
            self.0.push(Header::new(name, value));
        }
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Removes a header by name (case-insensitive).
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|h| !h.name.eq_ignore_ascii_case(name));
    }

    /// Returns true if a header with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over all headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.0.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// An outgoing request as seen by the dispatch layer.
///
/// Created per call by a caller and discarded after the dispatcher returns
/// a result. The `retried` flag is set once, the first time the request is
/// resubmitted after a token refresh, and is never cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpMethod,
    /// Target path, relative to the client's base URL (e.g. `/jobs/42`)
    pub path: String,
    /// Request headers
    pub headers: Headers,
    /// Optional request body, already serialized
    pub body: Option<String>,
    /// Whether this request has already been resubmitted after a refresh.
    #[serde(default)]
    pub retried: bool,
}

impl RequestDescriptor {
    /// Creates a descriptor with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
            retried: false,
        }
    }

    /// Creates a GET descriptor for the given path.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST descriptor with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn post_json<T: Serialize>(path: impl Into<String>, payload: &T) -> DomainResult<Self> {
        let body = serde_json::to_string(payload)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        let mut descriptor = Self::new(HttpMethod::Post, path);
        descriptor
            .headers
            .set("Content-Type", "application/json");
        descriptor.body = Some(body);
        Ok(descriptor)
    }

    /// Adds a header, builder-style.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Marks this request as having been resubmitted after a refresh.
    ///
    /// The flag is one-way: once set it stays set for the lifetime of the
    /// descriptor, which bounds automatic retries to one per request.
    pub fn mark_retried(&mut self) {
        self.retried = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_headers_case_insensitive_lookup() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "application/json");

        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_headers_set_replaces_existing() {
        let mut headers = Headers::new();
        headers.set(AUTHORIZATION, "Bearer old");
        headers.set("authorization", "Bearer new");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(AUTHORIZATION), Some("Bearer new"));
    }

    #[test]
    fn test_headers_remove() {
        let mut headers = Headers::new();
        headers.set(AUTHORIZATION, "Bearer t");
        headers.remove("AUTHORIZATION");

        assert!(!headers.contains(AUTHORIZATION));
    }

    #[test]
    fn test_descriptor_starts_unretried() {
        let descriptor = RequestDescriptor::get("/jobs");
        assert!(!descriptor.retried);
    }

    #[test]
    fn test_mark_retried_is_one_way() {
        let mut descriptor = RequestDescriptor::get("/jobs");
        descriptor.mark_retried();
        descriptor.mark_retried();
        assert!(descriptor.retried);
    }

    #[test]
    fn test_post_json_rejects_unserializable_payload() {
        // Non-string map keys cannot be represented in JSON.
        let mut payload = std::collections::HashMap::new();
        payload.insert(vec![1_u8], "x");

        let result = RequestDescriptor::post_json("/jobs", &payload);
        assert!(matches!(result, Err(DomainError::InvalidBody(_))));
    }

    #[test]
    fn test_post_json_sets_content_type() {
        let descriptor =
            RequestDescriptor::post_json("/auth/login", &serde_json::json!({"user": "a"})).unwrap();

        assert_eq!(descriptor.method, HttpMethod::Post);
        assert_eq!(descriptor.headers.get("Content-Type"), Some("application/json"));
        assert_eq!(descriptor.body.as_deref(), Some(r#"{"user":"a"}"#));
    }
}
