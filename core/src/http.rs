//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The core builds an `HttpRequest`,
//! hands it to a [`Transport`], and parses the `HttpResponse` it gets back;
//! TLS, pooling, retries and timeouts all live behind that trait. Tests
//! substitute their own `Transport`, and a host that wants to do the I/O
//! itself can skip the trait and use `OnfleetClient::build_request` with
//! `dispatch::parse_response` directly.
//!
//! All fields use owned types so values can be stored or moved across
//! threads without lifetime concerns.

use std::fmt;

use crate::error::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API key passed through to the transport untouched.
///
/// The provider expects it as the user part of HTTP basic auth with an empty
/// password. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self(api_key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub credential: Credential,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Raw body; empty when nothing was read.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one request against the network (or a stand-in).
///
/// Implementations should return non-2xx responses as `Ok` data so the
/// provider's error envelope reaches the classifier; `Err` is reserved for
/// failures where no response exists at all.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        (**self).execute(request)
    }
}
