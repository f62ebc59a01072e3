//! Blocking transport on `ureq`.
//!
//! Status-code-as-error is disabled so 4xx/5xx responses come back as data
//! and the provider's error envelope reaches the classifier. Responses to
//! DELETE are not read.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use crate::error::Error;
use crate::http::{Credential, HttpMethod, HttpRequest, HttpResponse, Transport};

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a preconfigured agent (timeouts, proxy, TLS).
    ///
    /// The agent must not treat HTTP status codes as errors.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let url = request.url.as_str();
        let result = match request.method {
            HttpMethod::Get => prepare(self.agent.get(url), request).call(),
            HttpMethod::Delete => prepare(self.agent.delete(url), request).call(),
            HttpMethod::Post => send(prepare(self.agent.post(url), request), request.body.as_deref()),
            HttpMethod::Put => send(prepare(self.agent.put(url), request), request.body.as_deref()),
        };
        let mut response = result.map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = if request.method == HttpMethod::Delete {
            String::new()
        } else {
            response
                .body_mut()
                .read_to_string()
                .map_err(|e| Error::Transport(e.to_string()))?
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn prepare<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    builder = builder.header("Authorization", basic_auth(&request.credential));
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn basic_auth(credential: &Credential) -> String {
    let token = STANDARD.encode(format!("{}:", credential.expose()));
    format!("Basic {token}")
}
