//! The I/O seam between request building and response parsing.
//!
//! `UreqTransport` is the default. Any other HTTP stack (or a test double)
//! can be plugged in through `MainPay::set_transport`.

use ureq::Agent;

use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes an `HttpRequest` against a base URL and returns the response as
/// data. Non-2xx statuses must come back as `Ok`; only a missing response is
/// an `Err`.
pub trait Transport: Send + Sync {
    fn base_url(&self) -> &str;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    base_url: String,
    agent: Agent,
}

impl UreqTransport {
    pub fn new(base_url: &str) -> Self {
        // Status codes are interpreted by `MainPay::parse_response`, not ureq.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Transport for UreqTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = self.url(&request.path);
        let body = request.body.as_deref();

        let mut response = match request.method {
            HttpMethod::Get => prepare(self.agent.get(&url), request).call(),
            HttpMethod::Delete => prepare(self.agent.delete(&url), request).call(),
            HttpMethod::Post => send_body(prepare(self.agent.post(&url), request), body),
            HttpMethod::Put => send_body(prepare(self.agent.put(&url), request), body),
            HttpMethod::Patch => send_body(prepare(self.agent.patch(&url), request), body),
        }?;

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
        let body = response.body_mut().read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn prepare<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}

fn send_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&str>,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
