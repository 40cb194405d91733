use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub const DEFAULT_SERVER_KEY: &str = "mainpay_server_key";

pub type Db = Arc<RwLock<HashMap<String, Value>>>;

/// Errors the mock API answers with. Every variant renders as a JSON body so
/// clients see the same shape the real service returns.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("transaction not found")]
    NotFound,
    #[error("{0}")]
    InvalidPayload(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Clone)]
struct AppState {
    server_key: Arc<str>,
    production: bool,
    db: Db,
}

/// In-memory stand-in for the MainPay transaction API.
#[derive(Debug, Clone)]
pub struct MockApi {
    server_key: String,
    production: bool,
    transactions: HashMap<String, Value>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_KEY, false)
    }
}

impl MockApi {
    pub fn new(server_key: impl Into<String>, production: bool) -> Self {
        Self {
            server_key: server_key.into(),
            production,
            transactions: HashMap::new(),
        }
    }

    /// Pre-load a transaction under `id`. `id` and a `pending` status are
    /// filled in unless `payload` already carries them.
    pub fn with_transaction(mut self, id: &str, payload: Value) -> Self {
        self.transactions.insert(id.to_string(), into_record(id, payload));
        self
    }

    pub fn router(self) -> Router {
        let state = AppState {
            server_key: Arc::from(self.server_key),
            production: self.production,
            db: Arc::new(RwLock::new(self.transactions)),
        };
        Router::new()
            .route("/v1/transactions", get(list_transactions).post(create_transaction))
            .route("/v1/transactions/{id}", get(get_transaction))
            .route("/v1/transactions/{id}/items", get(get_transaction_items))
            .route("/v1/transactions/{id}/status", get(get_transaction_status))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_basic_auth))
            .with_state(state)
    }

    pub async fn serve(self, listener: TcpListener) -> Result<(), std::io::Error> {
        axum::serve(listener, self.router()).await
    }
}

/// Parse a boolean environment flag. Accepts `true/false`, `1/0` and
/// `yes/no` in any case, the same vocabulary as the client's config loader.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Router with the default server key in sandbox mode.
pub fn app() -> Router {
    MockApi::default().router()
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    MockApi::default().serve(listener).await
}

async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match basic_auth_user(request.headers()) {
        Some(user) if user == *state.server_key => Ok(next.run(request).await),
        _ => {
            warn!(path = %request.uri().path(), "rejected request with bad credentials");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Username from an `Authorization: Basic ...` header.
fn basic_auth_user(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (user, _password) = decoded.split_once(':')?;
    Some(user.to_string())
}

fn into_record(id: &str, payload: Value) -> Value {
    let mut record = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("payload".to_string(), other);
            map
        }
    };
    record.insert("id".to_string(), json!(id));
    record.entry("status").or_insert_with(|| json!("pending"));
    Value::Object(record)
}

fn redirect_url(production: bool, token: &str) -> String {
    let host = if production {
        "https://app.mainpay.id"
    } else {
        "https://app.sandbox.mainpay.id"
    };
    format!("{host}/snap/{token}")
}

async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !payload.is_object() {
        return Err(ApiError::InvalidPayload(
            "transaction must be a JSON object".to_string(),
        ));
    }
    let id = Uuid::new_v4().to_string();
    let token = Uuid::new_v4().to_string();
    state.db.write().await.insert(id.clone(), into_record(&id, payload));
    info!(%id, "transaction created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "production": state.production,
            "token": token,
            "redirect_url": redirect_url(state.production, &token),
        })),
    ))
}

async fn list_transactions(State(state): State<AppState>) -> Json<Value> {
    let db = state.db.read().await;
    let mut transactions: Vec<Value> = db.values().cloned().collect();
    transactions.sort_by(|a, b| a["id"].as_str().cmp(&b["id"].as_str()));
    Json(json!({
        "production": state.production,
        "transactions": transactions,
    }))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = state.db.read().await;
    let transaction = db.get(&id).cloned().ok_or(ApiError::NotFound)?;
    Ok(Json(json!({
        "production": state.production,
        "transaction": transaction,
    })))
}

async fn get_transaction_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = state.db.read().await;
    let transaction = db.get(&id).ok_or(ApiError::NotFound)?;
    let items = transaction.get("items").cloned().unwrap_or_else(|| json!([]));
    Ok(Json(json!({
        "production": state.production,
        "items": items,
    })))
}

async fn get_transaction_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = state.db.read().await;
    let transaction = db.get(&id).ok_or(ApiError::NotFound)?;
    Ok(Json(json!({
        "production": state.production,
        "status": transaction["status"],
    })))
}
