use async_trait::async_trait;
use reqwest::{header, Client, Method, StatusCode};
use serde_json::Value;

use crate::{config::ApiConfig, service::api::ApiError, service::api::FieldError, utils::http};

/// Raw access to the backend: one call, one JSON answer.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
        auth_token: Option<&str>,
    ) -> Result<Value, ApiError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(std::time::Duration::from_secs(10)))
            .pool_idle_timeout(std::time::Duration::from_secs(60))
            .user_agent(http::DEFAULT_USER_AGENT);

        let client = http::build_client(builder)?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
        auth_token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method.clone(), &url);
        if let Some(token) = auth_token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(payload) = payload {
            builder = if method == Method::GET {
                builder.query(&payload)
            } else {
                builder.json(&payload)
            };
        }

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let json = if body.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Value>(&body).ok()
        };

        if status.is_success() {
            let value = match json {
                Some(value) => value,
                None if body.trim().is_empty() => Value::Null,
                None => return Err(ApiError::Decode(format!("{} returned non-JSON body", endpoint))),
            };
            return unwrap_envelope(value);
        }

        let error = classify_status(status, json.as_ref(), &body);
        warn!("{} {} -> {}", method, url, error);
        Err(error)
    }
}

/// Strips the `{"success": .., "data": ..}` wrapper some endpoints use.
pub(crate) fn unwrap_envelope(value: Value) -> Result<Value, ApiError> {
    let Value::Object(mut map) = value else {
        return Ok(value);
    };

    if map.get("success").and_then(Value::as_bool) == Some(false) {
        let message = error_message(&Value::Object(map.clone())).unwrap_or_else(|| "Unknown error".to_string());
        return Err(ApiError::Rejected(message));
    }

    match map.remove("data") {
        Some(data) if map.is_empty() || map.contains_key("success") => Ok(data),
        Some(data) => {
            map.insert("data".to_string(), data);
            Ok(Value::Object(map))
        }
        None => Ok(Value::Object(map)),
    }
}

pub(crate) fn classify_status(status: StatusCode, json: Option<&Value>, body: &str) -> ApiError {
    let code = status.as_u16();
    let message = json
        .and_then(error_message)
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty() && json.is_none()).then(|| text.chars().take(200).collect())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    match code {
        401 | 403 => ApiError::Auth { status: code, message },
        400..=499 => ApiError::Validation {
            status: code,
            message,
            fields: json.map(field_errors).unwrap_or_default(),
        },
        _ => ApiError::Server { status: code, message },
    }
}

fn error_message(json: &Value) -> Option<String> {
    match json.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(_)) => {
            let fields = field_errors(json);
            if !fields.is_empty() {
                return Some(fields.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "));
            }
        }
        _ => {}
    }

    ["error", "message"]
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
}

fn field_errors(json: &Value) -> Vec<FieldError> {
    let Some(items) = json.get("detail").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let message = item.get("msg").and_then(Value::as_str)?.to_string();
            // FastAPI reports ["body", "email"]; the last segment is the field
            let field = item
                .get("loc")
                .and_then(Value::as_array)
                .and_then(|loc| loc.last())
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            Some(FieldError { field, message })
        })
        .collect()
}
