mod error;
mod model;

pub use error::{ApiError, FieldError};
pub use model::*;

use std::sync::Arc;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use teloxide::types::UserId;

use super::http::BackendApi;

/// Typed endpoints of the SPL Shield backend.
#[derive(Clone)]
pub struct ApiService {
    backend: Arc<dyn BackendApi>,
}

impl ApiService {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self { backend }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
        auth_token: Option<&str>,
    ) -> Result<T, ApiError> {
        let value = self.backend.call(endpoint, method, payload, auth_token).await?;
        // empty bodies decode into the type's defaults
        let value = if value.is_null() { json!({}) } else { value };
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{}: {}", endpoint, e)))
    }

    fn body<T: Serialize>(payload: &T) -> Result<Value, ApiError> {
        serde_json::to_value(payload).map_err(ApiError::from)
    }

    pub async fn health(&self) -> Result<(), ApiError> {
        self.backend.call("/health", Method::GET, None, None).await.map(|_| ())
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.request("/api/auth/register", Method::POST, Some(Self::body(request)?), None)
            .await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.request("/api/auth/login", Method::POST, Some(Self::body(request)?), None)
            .await
    }

    pub async fn logout(&self, telegram_id: UserId, auth_token: Option<&str>) -> Result<(), ApiError> {
        self.backend
            .call(
                "/api/auth/logout",
                Method::POST,
                Some(json!({ "telegram_id": telegram_id.0 })),
                auth_token,
            )
            .await
            .map(|_| ())
    }

    pub async fn scan(&self, request: &ScanRequest, auth_token: Option<&str>) -> Result<ScanResult, ApiError> {
        self.request("/api/scan", Method::POST, Some(Self::body(request)?), auth_token)
            .await
    }

    pub async fn scan_history(&self, telegram_id: UserId, auth_token: &str) -> Result<Vec<ScanHistoryEntry>, ApiError> {
        let value = self
            .backend
            .call(
                "/api/scan/history",
                Method::GET,
                Some(json!({ "telegram_id": telegram_id.0 })),
                Some(auth_token),
            )
            .await?;

        // some deployments wrap the list as {"scans": [...]}
        let list = match value {
            Value::Object(mut map) => map.remove("scans").unwrap_or(Value::Array(Vec::new())),
            Value::Null => Value::Array(Vec::new()),
            other => other,
        };
        serde_json::from_value(list).map_err(|e| ApiError::Decode(format!("/api/scan/history: {}", e)))
    }

    pub async fn dashboard(&self, auth_token: &str) -> Result<DashboardData, ApiError> {
        self.request("/api/user/dashboard", Method::GET, None, Some(auth_token))
            .await
    }

    pub async fn balance(&self, auth_token: &str) -> Result<BalanceData, ApiError> {
        self.request("/api/user/balance", Method::GET, None, Some(auth_token))
            .await
    }

    pub async fn verify_payment(
        &self,
        request: &PaymentVerification,
        auth_token: Option<&str>,
    ) -> Result<PaymentReceipt, ApiError> {
        self.request("/api/payment/verify", Method::POST, Some(Self::body(request)?), auth_token)
            .await
    }

    pub async fn admin_stats(&self, auth_token: Option<&str>) -> Result<AdminStats, ApiError> {
        self.request("/api/admin/stats", Method::GET, None, auth_token).await
    }

    pub async fn detailed_stats(&self, auth_token: Option<&str>) -> Result<DetailedStats, ApiError> {
        self.request("/api/admin/stats/detailed", Method::GET, None, auth_token)
            .await
    }

    pub async fn admin_users(&self, limit: usize, auth_token: Option<&str>) -> Result<Vec<AdminUser>, ApiError> {
        self.request(
            "/api/admin/users",
            Method::GET,
            Some(json!({ "limit": limit })),
            auth_token,
        )
        .await
    }

    pub async fn admin_transactions(
        &self,
        limit: usize,
        auth_token: Option<&str>,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.request(
            "/api/admin/transactions",
            Method::GET,
            Some(json!({ "limit": limit })),
            auth_token,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::service::http::HttpBackend;
    use std::time::Duration;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn service_for(server: &MockServer) -> ApiService {
        let backend = HttpBackend::new(&ApiConfig {
            base_url: server.uri().parse().unwrap(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        ApiService::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn test_register_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_partial_json(json!({
                "email": "user@example.com",
                "username": "johndoe",
                "password": "MySecurePass123",
                "confirm_password": "MySecurePass123",
                "telegram_id": 7
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Verification email sent",
                "tier": "free",
                "daily_scans": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = service_for(&server).await;
        let response = api
            .register(&RegisterRequest {
                email: "user@example.com".into(),
                username: "johndoe".into(),
                password: "MySecurePass123".into(),
                confirm_password: "MySecurePass123".into(),
                telegram_id: 7,
            })
            .await
            .unwrap();

        assert_eq!(response.tier, Some(Tier::Free));
        assert_eq!(response.daily_scans, Some(5));
        assert_eq!(response.message.as_deref(), Some("Verification email sent"));
    }

    #[tokio::test]
    async fn test_dashboard_uses_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/dashboard"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "email": "user@example.com",
                    "tier": "premium",
                    "scans_today": 3,
                    "total_scans": 40,
                    "tdl_balance": 12.5,
                    "credits": {"free": 2, "premium": 1}
                }
            })))
            .mount(&server)
            .await;

        let api = service_for(&server).await;
        let dashboard = api.dashboard("secret").await.unwrap();

        assert_eq!(dashboard.tier, Tier::Premium);
        assert_eq!(dashboard.total_scans, 40);
        assert_eq!(dashboard.credits.premium, 1);
        assert_eq!(dashboard.credits.mvp, 0);
    }

    #[tokio::test]
    async fn test_scan_history_accepts_wrapped_list() {
        let server = MockServer::start().await;
        Mock::given(path("/api/scan/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "scans": [{"address": "abc", "tier": "mvp", "risk_score": 0.4, "timestamp": "2024-01-01"}]
            })))
            .mount(&server)
            .await;

        let api = service_for(&server).await;
        let history = api.scan_history(UserId(7), "tok").await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].tier, Tier::Mvp);
        assert_eq!(history[0].created_at.as_deref(), Some("2024-01-01"));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(path("/api/admin/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"oops": true})))
            .mount(&server)
            .await;

        let api = service_for(&server).await;
        let err = api.admin_users(20, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
