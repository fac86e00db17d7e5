use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    #[serde(alias = "FREE", alias = "Free")]
    Free,
    #[serde(alias = "PREMIUM", alias = "Premium")]
    Premium,
    #[serde(alias = "MVP", alias = "Mvp")]
    Mvp,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Premium, Tier::Mvp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Premium => "premium",
            Tier::Mvp => "mvp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Free => "FREE",
            Tier::Premium => "PREMIUM",
            Tier::Mvp => "MVP",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            "mvp" => Ok(Tier::Mvp),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub telegram_id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub telegram_id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanRequest {
    pub address: String,
    pub tier: Tier,
    pub telegram_id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentVerification {
    pub tx_signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    pub telegram_id: u64,
}

// Responses

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credits {
    pub free: u64,
    pub premium: u64,
    pub mvp: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegisterResponse {
    pub message: Option<String>,
    pub tier: Option<Tier>,
    pub daily_scans: Option<u64>,
    #[serde(alias = "token")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub tier: Tier,
    pub scans_today: u64,
    pub scans_remaining: Option<u64>,
    pub daily_limit: Option<u64>,
    pub total_scans: u64,
    pub tdl_balance: f64,
    pub credits: Credits,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    #[serde(alias = "token")]
    pub access_token: Option<String>,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScanResult {
    pub address: Option<String>,
    #[serde(alias = "tier")]
    pub tier_used: Option<Tier>,
    pub risk_score: f64,
    pub risk_level: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub risk_factors: Vec<String>,
    pub safe_indicators: Vec<String>,
    pub ai_summary: Option<String>,
    pub recommendation: Option<String>,
    pub message: Option<String>,
}

impl ScanResult {
    /// Backend scores are nominally in `[0, 1]`; anything else is clamped.
    pub fn normalized_score(&self) -> f64 {
        if self.risk_score.is_nan() {
            0.0
        } else {
            self.risk_score.clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScanHistoryEntry {
    pub address: String,
    pub tier: Tier,
    pub risk_score: Option<f64>,
    pub risk_level: Option<String>,
    #[serde(alias = "timestamp")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardData {
    pub email: Option<String>,
    pub username: Option<String>,
    pub tier: Tier,
    pub created_at: Option<String>,
    pub scans_today: u64,
    pub daily_limit: Option<u64>,
    pub total_scans: u64,
    pub tdl_balance: f64,
    pub credits: Credits,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BalanceData {
    pub tdl_balance: f64,
    pub tier: Tier,
    pub credits: Credits,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaymentReceipt {
    pub message: Option<String>,
    pub credits_added: Option<u64>,
    pub tier: Option<Tier>,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    pub total_users: u64,
    pub active_today: u64,
    pub total_scans: u64,
    pub scans_today: u64,
    pub total_revenue: f64,
    pub revenue_today: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetailedStats {
    pub free_users: u64,
    pub premium_users: u64,
    pub mvp_users: u64,
    pub scans_today: u64,
    pub scans_week: u64,
    pub scans_month: u64,
    pub api_status: Option<String>,
    pub uptime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdminUser {
    pub username: String,
    pub email: String,
    pub tier: Tier,
    pub total_scans: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub user: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tier_parsing() {
        assert_eq!("Premium".parse::<Tier>().unwrap(), Tier::Premium);
        assert_eq!(" MVP ".parse::<Tier>().unwrap(), Tier::Mvp);
        assert!("gold".parse::<Tier>().is_err());

        let tier: Tier = serde_json::from_value(json!("PREMIUM")).unwrap();
        assert_eq!(tier, Tier::Premium);
        assert_eq!(serde_json::to_value(Tier::Mvp).unwrap(), json!("mvp"));
    }

    #[test]
    fn test_scan_result_defaults_and_clamp() {
        let result: ScanResult = serde_json::from_value(json!({
            "risk_score": 1.7,
            "type": "Token",
            "tier": "premium"
        }))
        .unwrap();

        assert_eq!(result.kind.as_deref(), Some("Token"));
        assert_eq!(result.tier_used, Some(Tier::Premium));
        assert!(result.risk_factors.is_empty());
        assert_eq!(result.normalized_score(), 1.0);
    }

    #[test]
    fn test_auth_response_token_alias() {
        let auth: AuthResponse = serde_json::from_value(json!({
            "token": "abc",
            "user": {"username": "johndoe", "tier": "free", "tdl_balance": 12}
        }))
        .unwrap();

        assert_eq!(auth.access_token.as_deref(), Some("abc"));
        assert_eq!(auth.user.username.as_deref(), Some("johndoe"));
        assert_eq!(auth.user.tdl_balance, 12.0);
    }
}
