use std::{collections::HashSet, path::PathBuf, time::Duration};

use teloxide::types::UserId;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    MissingKey(String),
    #[error("Invalid {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub api: ApiConfig,
    pub admin: AdminAllowList,
    pub dialogue: DialogueConfig,
    pub payment: PaymentConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Clone)]
pub struct TelegramConfig(pub String);

// keep the bot token out of debug output
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TelegramConfig(***)")
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

/// Telegram ids allowed to run admin commands. Parsed once at startup and
/// never mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct AdminAllowList(HashSet<UserId>);

impl AdminAllowList {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut ids = HashSet::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id = part.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "ADMIN_USER_IDS".to_string(),
                value: part.to_string(),
            })?;
            ids.insert(UserId(id));
        }
        Ok(Self(ids))
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.0.contains(&user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Clone, Debug)]
pub struct DialogueConfig {
    /// Inactivity window after which an unfinished flow is dropped.
    pub timeout: Duration,
    pub cleanup_interval: Duration,
}

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub treasury_wallet: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub environment: String,
    pub debug: bool,
    pub log_level: String,
}

impl RuntimeConfig {
    pub fn default_log_filter(&self) -> String {
        if self.debug {
            "debug".to_string()
        } else {
            self.log_level.to_lowercase()
        }
    }
}

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DIALOGUE_TIMEOUT_SECS: u64 = 900;
const DEFAULT_DIALOGUE_CLEANUP_INTERVAL_SECS: u64 = 60;

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment. Also
    /// returns the `.env` path that was loaded, since the logger is not up
    /// yet at this point.
    pub fn from_env() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let env_file = dotenvy::dotenv().ok();
        let config = build_config(|key| std::env::var(key).ok())?;
        Ok((config, env_file))
    }
}

pub fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let token = get("BOT_TOKEN").ok_or_else(|| ConfigError::MissingKey("BOT_TOKEN".to_string()))?;

    let raw_url = get("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let base_url = Url::parse(&raw_url).map_err(|_| ConfigError::InvalidValue {
        key: "API_BASE_URL".to_string(),
        value: raw_url.clone(),
    })?;

    let admin = match get("ADMIN_USER_IDS") {
        Some(raw) => AdminAllowList::parse(&raw)?,
        None => AdminAllowList::default(),
    };

    let parse_secs = |key: &str, default: u64| -> Result<Duration, ConfigError> {
        match get(key) {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw,
                }),
            None => Ok(Duration::from_secs(default)),
        }
    };

    let debug = match get("DEBUG") {
        Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
            key: "DEBUG".to_string(),
            value: raw,
        })?,
        None => false,
    };

    Ok(AppConfig {
        telegram: TelegramConfig(token),
        api: ApiConfig {
            base_url,
            timeout: parse_secs("API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?,
        },
        admin,
        dialogue: DialogueConfig {
            timeout: parse_secs("DIALOGUE_TIMEOUT_SECS", DEFAULT_DIALOGUE_TIMEOUT_SECS)?,
            cleanup_interval: parse_secs(
                "DIALOGUE_CLEANUP_INTERVAL_SECS",
                DEFAULT_DIALOGUE_CLEANUP_INTERVAL_SECS,
            )?,
        },
        payment: PaymentConfig {
            treasury_wallet: get("TREASURY_WALLET"),
        },
        runtime: RuntimeConfig {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "production".to_string()),
            debug,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        },
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn new_test_config() -> Self {
        build_config(|key| match key {
            "BOT_TOKEN" => Some("123456:TEST".to_string()),
            "ADMIN_USER_IDS" => Some("42".to_string()),
            _ => None,
        })
        .expect("test config must build")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = build_config(lookup(&[("BOT_TOKEN", "abc")])).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.dialogue.timeout, Duration::from_secs(900));
        assert_eq!(config.admin.len(), 0);
        assert_eq!(config.runtime.environment, "production");
        assert!(!config.runtime.debug);
        assert_eq!(config.runtime.default_log_filter(), "info");
        assert!(config.payment.treasury_wallet.is_none());
    }

    #[test]
    fn test_missing_token() {
        let err = build_config(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(key) if key == "BOT_TOKEN"));
    }

    #[test]
    fn test_admin_ids() {
        let config = build_config(lookup(&[("BOT_TOKEN", "abc"), ("ADMIN_USER_IDS", " 1, 2 ,,3 ")])).unwrap();
        assert_eq!(config.admin.len(), 3);
        assert!(config.admin.contains(UserId(2)));
        assert!(!config.admin.contains(UserId(4)));

        let err = build_config(lookup(&[("BOT_TOKEN", "abc"), ("ADMIN_USER_IDS", "1,bob")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { value, .. } if value == "bob"));
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let config = build_config(lookup(&[("BOT_TOKEN", "abc"), ("DEBUG", "True"), ("LOG_LEVEL", "WARN")])).unwrap();
        assert!(config.runtime.debug);
        assert_eq!(config.runtime.default_log_filter(), "debug");

        let config = build_config(lookup(&[("BOT_TOKEN", "abc"), ("LOG_LEVEL", "WARN")])).unwrap();
        assert_eq!(config.runtime.default_log_filter(), "warn");
    }

    #[test]
    fn test_invalid_values() {
        assert!(build_config(lookup(&[("BOT_TOKEN", "abc"), ("API_BASE_URL", "not a url")])).is_err());
        assert!(build_config(lookup(&[("BOT_TOKEN", "abc"), ("API_TIMEOUT_SECS", "soon")])).is_err());
        assert!(build_config(lookup(&[("BOT_TOKEN", "abc"), ("DEBUG", "maybe")])).is_err());
    }

    #[test]
    fn test_from_env_hands_back_env_file() {
        // the only test touching the process environment
        std::env::set_var("BOT_TOKEN", "from-process-env");

        let (config, env_file) = AppConfig::from_env().unwrap();
        assert!(!config.telegram.0.is_empty());
        if let Some(path) = env_file {
            assert!(path.ends_with(".env"));
        }
    }

    #[test]
    fn test_token_hidden_in_debug() {
        let config = build_config(lookup(&[("BOT_TOKEN", "super-secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
