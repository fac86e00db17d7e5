use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use crate::{
    config::AppConfig,
    service::{api::ApiError, http::BackendApi},
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub method: Method,
    pub payload: Option<Value>,
    pub auth_token: Option<String>,
}

/// In-memory backend that records every call and answers from canned
/// responses. Endpoints without a canned response answer `{}`.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<HashMap<String, Result<Value, ApiError>>>,
}

impl FakeBackend {
    pub fn respond(&self, endpoint: &str, response: Result<Value, ApiError>) {
        self.responses.lock().unwrap().insert(endpoint.to_string(), response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.endpoint).collect()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.endpoint == endpoint).collect()
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
        auth_token: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            method,
            payload,
            auth_token: auth_token.map(str::to_string),
        });

        self.responses
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

/// App state wired to a fresh `FakeBackend`; user 42 is the only admin.
pub fn setup_test_state() -> (AppState, Arc<FakeBackend>) {
    let backend = Arc::new(FakeBackend::default());
    let state = AppState::with_backend(AppConfig::new_test_config(), backend.clone());
    (state, backend)
}
