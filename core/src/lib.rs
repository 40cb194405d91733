//! Synchronous client for the MainPay payment API.
//!
//! # Overview
//! `MainPay` holds a server key and an environment (production or sandbox),
//! signs every request with HTTP basic auth and maps five transaction
//! operations onto the REST endpoints under `/v1/transactions`.
//!
//! # Design
//! - `Config` is the single entry point for construction; the base URL is
//!   derived from the production flag unless explicitly overridden.
//! - Requests are built as plain `HttpRequest` data, executed by a
//!   pluggable `Transport` (`UreqTransport` by default) and normalized by
//!   `MainPay::parse_response`.
//! - A 4xx response with a JSON body is returned as data; missing
//!   responses, bodiless errors and malformed JSON are typed
//!   `MainPayError`s.
//! - Response bodies are `serde_json::Value`; their shape belongs to the
//!   remote service.
//!
//! ```no_run
//! use mainpay::{Config, MainPay};
//!
//! let client = MainPay::new(Config::sandbox("my-server-key"))?;
//! let status = client.get_transaction_status("19b749f4-3d20-4de9-ab4a-bcb35a9d1291")?;
//! println!("{}", status["status"]);
//! # Ok::<(), mainpay::MainPayError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::MainPay;
pub use config::{Config, DEFAULT_API_VERSION, PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
pub use error::{MainPayError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use transport::{Transport, UreqTransport};
pub use types::{Address, Customer, Item, Transaction};
