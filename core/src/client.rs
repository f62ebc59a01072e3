//! Client entry point and per-request call chains.
//!
//! # Design
//! `OnfleetClient` holds only its configuration and a transport and carries
//! no mutable state between calls. Every request starts a fresh [`Call`],
//! which owns its own path accumulator: segments are appended with
//! [`Call::segment`] and the chain ends in one terminal operation
//! (`get`, `post`, `put`, `delete` or `send`) that builds the request,
//! executes it through the transport and dispatches the response.
//!
//! A bad segment does not break the chain; the `InvalidSegment` error is
//! returned by the terminal operation, together with every other failure.
//!
//! Callers that execute HTTP themselves use [`OnfleetClient::build_request`]
//! and [`crate::dispatch::parse_response`] around their own I/O.

use tracing::debug;

use crate::config::ClientConfig;
use crate::dispatch::{self, Response};
use crate::encoder::{self, Body};
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::path::PathBuilder;

pub struct OnfleetClient<T> {
    config: ClientConfig,
    transport: T,
}

#[cfg(feature = "ureq-transport")]
impl OnfleetClient<crate::transport::UreqTransport> {
    /// Client over the blocking `ureq` transport.
    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(config, crate::transport::UreqTransport::new())
    }
}

impl<T: Transport> OnfleetClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a call chain at an arbitrary resource.
    pub fn call(&self, resource: impl Into<String>) -> Call<'_, T> {
        Call {
            client: self,
            path: PathBuilder::new(resource),
            query: Vec::new(),
            parse_response: true,
        }
    }

    pub fn workers(&self) -> Call<'_, T> {
        self.call("workers")
    }

    pub fn tasks(&self) -> Call<'_, T> {
        self.call("tasks")
    }

    pub fn recipients(&self) -> Call<'_, T> {
        self.call("recipients")
    }

    pub fn destinations(&self) -> Call<'_, T> {
        self.call("destinations")
    }

    /// The caller's own organization.
    pub fn organization(&self) -> Call<'_, T> {
        self.call("organization")
    }

    /// Delegatee organizations, addressed by id.
    pub fn organizations(&self) -> Call<'_, T> {
        self.call("organizations")
    }

    pub fn admins(&self) -> Call<'_, T> {
        self.call("admins")
    }

    pub fn teams(&self) -> Call<'_, T> {
        self.call("teams")
    }

    pub fn hubs(&self) -> Call<'_, T> {
        self.call("hubs")
    }

    pub fn webhooks(&self) -> Call<'_, T> {
        self.call("webhooks")
    }

    /// Build the request for `path` without executing it.
    pub fn build_request(
        &self,
        path: &PathBuilder,
        method: HttpMethod,
        body: Option<&Body<'_>>,
        query: &[(String, String)],
    ) -> Result<HttpRequest, Error> {
        let body = body.map(encoder::encode_to_string).transpose()?;
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        let request = HttpRequest {
            method,
            url: path.url(&self.config.base_url),
            query: query.to_vec(),
            headers,
            credential: self.config.api_key.clone(),
            body,
        };
        debug!(method = %request.method, url = %request.url, "built provider request");
        Ok(request)
    }
}

/// One request in the making.
pub struct Call<'c, T> {
    client: &'c OnfleetClient<T>,
    path: Result<PathBuilder, Error>,
    query: Vec<(String, String)>,
    parse_response: bool,
}

impl<'c, T: Transport> Call<'c, T> {
    /// Append a path segment. Empty segments fail the call.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.path = self.path.and_then(|path| path.push(segment));
        self
    }

    /// Add a query-string parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Return the response JSON as-is instead of parsing records.
    pub fn raw(mut self) -> Self {
        self.parse_response = false;
        self
    }

    pub fn get(self) -> Result<Response, Error> {
        self.send(HttpMethod::Get, None)
    }

    pub fn post<'b>(self, body: impl Into<Body<'b>>) -> Result<Response, Error> {
        self.send(HttpMethod::Post, Some(body.into()))
    }

    pub fn put<'b>(self, body: impl Into<Body<'b>>) -> Result<Response, Error> {
        self.send(HttpMethod::Put, Some(body.into()))
    }

    pub fn delete(self) -> Result<Response, Error> {
        self.send(HttpMethod::Delete, None)
    }

    /// Execute the call with an explicit method and optional body.
    pub fn send(self, method: HttpMethod, body: Option<Body<'_>>) -> Result<Response, Error> {
        let path = self.path?;
        let request = self
            .client
            .build_request(&path, method, body.as_ref(), &self.query)?;
        let response = self.client.transport.execute(&request)?;
        debug!(status = response.status, url = %request.url, "provider responded");
        dispatch::parse_response(path.segments(), method, self.parse_response, response)
    }
}
