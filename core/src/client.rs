//! The MainPay API client.
//!
//! # Design
//! `MainPay` owns its configuration (server key, production flag, base URL)
//! and a `Transport` bound to the base URL. Every operation goes through the
//! same three steps:
//!
//! 1. `build_request` turns method, path, options and version into a plain
//!    `HttpRequest` with basic auth attached.
//! 2. The transport performs the round trip.
//! 3. `parse_response` normalizes the outcome: success bodies and 4xx bodies
//!    both come back as parsed JSON, everything else is a typed error.
//!
//! Steps 1 and 3 are pure and public, so a host that wants to do its own I/O
//! can skip the transport entirely.
//!
//! Mutation goes through `&mut self`. Sharing a client across threads for
//! read-only requests is fine; changing its configuration concurrently is
//! the caller's job to serialize.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::{environment_base_url, normalize_base_url, Config, DEFAULT_API_VERSION};
use crate::error::{MainPayError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for the MainPay transaction API.
pub struct MainPay {
    server_key: String,
    production: bool,
    base_url: String,
    transport: Box<dyn Transport>,
}

impl MainPay {
    /// Validate `config` and build a client with a `UreqTransport` bound to
    /// the resolved base URL.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let base_url = normalize_base_url(config.base_url())?;
        let transport = UreqTransport::new(&base_url);
        Ok(Self {
            server_key: config.server_key,
            production: config.production,
            base_url,
            transport: Box::new(transport),
        })
    }

    /// Same as `new`, but sends requests through `transport`.
    pub fn with_transport<T: Transport + 'static>(config: Config, transport: T) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.set_transport(transport);
        Ok(client)
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Override the base URL and rebind the transport to it. Any custom
    /// transport is replaced by a fresh `UreqTransport`.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        let base_url = normalize_base_url(base_url)?;
        debug!(base_url = %base_url, "rebinding transport");
        self.transport = Box::new(UreqTransport::new(&base_url));
        self.base_url = base_url;
        Ok(())
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn set_transport<T: Transport + 'static>(&mut self, transport: T) {
        self.transport = Box::new(transport);
    }

    pub fn server_key(&self) -> &str {
        &self.server_key
    }

    pub fn set_server_key(&mut self, server_key: impl Into<String>) {
        self.server_key = server_key.into();
    }

    pub fn production(&self) -> bool {
        self.production
    }

    /// Record the production flag only. The base URL and transport keep
    /// pointing where they did; use `switch_environment` to move both.
    pub fn set_production(&mut self, production: bool) {
        self.production = production;
    }

    /// Set the production flag and point the base URL and transport at the
    /// matching environment.
    pub fn switch_environment(&mut self, production: bool) {
        let base_url = environment_base_url(production);
        debug!(production, base_url, "switching environment");
        self.production = production;
        self.base_url = base_url.to_string();
        self.transport = Box::new(UreqTransport::new(base_url));
    }

    // -----------------------------------------------------------------------
    // Dispatcher
    // -----------------------------------------------------------------------

    /// Send a request against API version `v1`.
    pub fn request(&self, method: HttpMethod, path: &str, options: RequestOptions) -> Result<Value> {
        self.request_with_version(method, path, options, DEFAULT_API_VERSION)
    }

    /// Send a request to `/{version}{path}` and normalize the response.
    #[instrument(skip(self, method, options), fields(method = %method))]
    pub fn request_with_version(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
        version: &str,
    ) -> Result<Value> {
        let request = self.build_request(method, path, options, version)?;
        debug!(base_url = self.transport.base_url(), "dispatching request");

        let response = self.transport.send(&request).inspect_err(|err| {
            warn!(error = %err, "no response from MainPay");
        })?;
        debug!(status = response.status, "received response");

        self.parse_response(response)
    }

    /// Build the `HttpRequest` for `/{version}{path}` with basic auth from
    /// the server key. A caller-supplied `Authorization` header is dropped.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
        version: &str,
    ) -> Result<HttpRequest> {
        if !path.starts_with('/') {
            return Err(MainPayError::InvalidRequest(format!(
                "path must begin with '/', got {path:?}"
            )));
        }

        let mut headers: Vec<(String, String)> = options
            .headers
            .into_iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
            .collect();
        headers.push(("authorization".to_string(), self.authorization()));
        if !has_header(&headers, "accept") {
            headers.push(("accept".to_string(), "application/json".to_string()));
        }

        let body = match options.json {
            Some(json) => {
                if !has_header(&headers, "content-type") {
                    headers.push(("content-type".to_string(), "application/json".to_string()));
                }
                Some(serde_json::to_string(&json).map_err(MainPayError::Serialize)?)
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            path: format!("/{version}{path}"),
            headers,
            query: options.query,
            body,
        })
    }

    /// Decode a response into JSON.
    ///
    /// 2xx bodies and non-empty 4xx bodies are returned as parsed JSON (an
    /// empty 2xx body is `Value::Null`). A bodiless 4xx and any other status
    /// become `MainPayError::Remote`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value> {
        let has_body = !response.body.iter().all(u8::is_ascii_whitespace);
        match response.status {
            200..=299 if !has_body => Ok(Value::Null),
            200..=299 => decode(&response.body),
            400..=499 if has_body => decode(&response.body),
            status => {
                warn!(status, "MainPay rejected the request");
                Err(MainPayError::Remote {
                    status,
                    body: String::from_utf8_lossy(&response.body).into_owned(),
                })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    /// `POST /v1/transactions` with `transaction` as the JSON body.
    pub fn create_transaction<T: Serialize + ?Sized>(&self, transaction: &T) -> Result<Value> {
        self.request(HttpMethod::Post, "/transactions", RequestOptions::json(transaction)?)
    }

    pub fn get_transactions(&self) -> Result<Value> {
        self.request(HttpMethod::Get, "/transactions", RequestOptions::new())
    }

    pub fn get_transaction(&self, id: &str) -> Result<Value> {
        self.request(HttpMethod::Get, &transaction_path(id, "")?, RequestOptions::new())
    }

    pub fn get_transaction_items(&self, id: &str) -> Result<Value> {
        self.request(HttpMethod::Get, &transaction_path(id, "/items")?, RequestOptions::new())
    }

    pub fn get_transaction_status(&self, id: &str) -> Result<Value> {
        self.request(HttpMethod::Get, &transaction_path(id, "/status")?, RequestOptions::new())
    }

    fn authorization(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:", self.server_key)))
    }
}

impl fmt::Debug for MainPay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainPay")
            .field("server_key", &"<redacted>")
            .field("production", &self.production)
            .field("base_url", &self.base_url)
            .field("transport", &self.transport.base_url())
            .finish()
    }
}

/// `/transactions/{id}{suffix}`. The id must stay a single path segment, so
/// an empty id or one containing `/`, `?`, `#`, whitespace or a control
/// character is rejected.
fn transaction_path(id: &str, suffix: &str) -> Result<String> {
    let invalid = id.is_empty()
        || id
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace() || c.is_control());
    if invalid {
        return Err(MainPayError::InvalidRequest(format!(
            "transaction id must be a single path segment, got {id:?}"
        )));
    }
    Ok(format!("/transactions/{id}{suffix}"))
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
}

fn decode(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(MainPayError::Decode)
}
