use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The backend could not be reached or did not answer in time.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Validation failed ({status}): {message}")]
    Validation {
        status: u16,
        message: String,
        fields: Vec<FieldError>,
    },

    /// A 2xx answer carrying `"success": false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. } | ApiError::Decode(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }

    /// Reason suitable for showing to the user.
    pub fn reason(&self) -> String {
        match self {
            ApiError::Network(_) => "the service is unreachable right now".to_string(),
            ApiError::Auth { message, .. } if message.is_empty() => "unauthorized".to_string(),
            ApiError::Auth { message, .. } => message.clone(),
            ApiError::Validation { message, fields, .. } => {
                if fields.is_empty() {
                    message.clone()
                } else {
                    fields.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
                }
            }
            ApiError::Rejected(message) => message.clone(),
            ApiError::Server { status, .. } => format!("server error ({})", status),
            ApiError::Decode(_) => "unexpected response from the service".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(ApiError::Network("timeout".into()).is_unavailable());
        assert!(ApiError::Server {
            status: 502,
            message: String::new()
        }
        .is_unavailable());
        assert!(!ApiError::Rejected("nope".into()).is_unavailable());
        assert!(ApiError::Auth {
            status: 401,
            message: String::new()
        }
        .is_auth());
    }

    #[test]
    fn test_reason_prefers_field_errors() {
        let error = ApiError::Validation {
            status: 422,
            message: "Unprocessable".into(),
            fields: vec![
                FieldError {
                    field: "email".into(),
                    message: "already registered".into(),
                },
                FieldError {
                    field: String::new(),
                    message: "try again".into(),
                },
            ],
        };
        assert_eq!(error.reason(), "email: already registered; try again");
    }
}
