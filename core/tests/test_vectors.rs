//! Verify request building and response normalization against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Requests are captured by a recording transport instead of going over the
//! network. Comparing parsed JSON (not raw strings) avoids false negatives
//! from field-ordering differences.

use std::sync::{Arc, Mutex};

use mainpay::{
    Config, HttpMethod, HttpRequest, HttpResponse, MainPay, MainPayError, Result, Transaction,
    Transport,
};
use serde_json::Value;

/// Records requests and answers every one with `200 {}`.
#[derive(Clone, Default)]
struct Recorder {
    sent: Arc<Mutex<Vec<HttpRequest>>>,
}

impl Recorder {
    fn take(&self) -> HttpRequest {
        let mut sent = self.sent.lock().unwrap();
        assert_eq!(sent.len(), 1, "expected exactly one request");
        sent.remove(0)
    }
}

impl Transport for Recorder {
    fn base_url(&self) -> &str {
        "http://vectors.test"
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.sent.lock().unwrap().push(request.clone());
        Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: b"{}".to_vec(),
        })
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let recorder = Recorder::default();
    let server_key = vectors["server_key"].as_str().unwrap();
    let client = MainPay::with_transport(Config::production(server_key), recorder.clone()).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap_or_default();

        match case["operation"].as_str().unwrap() {
            "create_transaction" => {
                let input: Transaction = serde_json::from_value(case["input"].clone()).unwrap();
                client.create_transaction(&input).unwrap();
            }
            "get_transactions" => {
                client.get_transactions().unwrap();
            }
            "get_transaction" => {
                client.get_transaction(id).unwrap();
            }
            "get_transaction_items" => {
                client.get_transaction_items(id).unwrap();
            }
            "get_transaction_status" => {
                client.get_transaction_status(id).unwrap();
            }
            other => panic!("{name}: unknown operation {other}"),
        }

        let req = recorder.take();
        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(
            req.header("authorization"),
            expected["authorization"].as_str(),
            "{name}: authorization"
        );
        assert_eq!(
            req.header("content-type"),
            expected["content_type"].as_str(),
            "{name}: content-type"
        );

        match expected.get("body") {
            Some(body) => {
                let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&sent, body, "{name}: body");
            }
            None => assert!(req.body.is_none(), "{name}: body should be None"),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = MainPay::new(Config::default()).unwrap();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
        };
        let result = client.parse_response(response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error["kind"].as_str().unwrap() {
                "Remote" => {
                    let status = expected_error["status"].as_u64().unwrap() as u16;
                    assert!(
                        matches!(err, MainPayError::Remote { status: s, .. } if s == status),
                        "{name}: expected Remote {status}, got {err}"
                    );
                }
                "Decode" => assert!(matches!(err, MainPayError::Decode(_)), "{name}: expected Decode"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let value = result.unwrap();
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
        }
    }
}
