use thiserror::Error;

/// 使用者輸入空白查詢時顯示的訊息
pub const BLANK_QUERY_MESSAGE: &str = "Please enter a product name.";

/// 任何推薦服務失敗時統一顯示的訊息
pub const SERVICE_FAILURE_MESSAGE: &str =
    "Sorry, we couldn't find a recommendation. Please try another product.";

/// Failures talking to the generative service. The user never sees these
/// details; they only reach the logs.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("empty response")]
    EmptyResponse,

    #[error("malformed response")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("missing required fields")]
    MissingRequiredFields { fields: Vec<&'static str> },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned HTTP {status}")]
    Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum EcoError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Recommendation service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
}

impl EcoError {
    pub fn blank_query() -> Self {
        EcoError::ValidationError {
            message: BLANK_QUERY_MESSAGE.to_string(),
        }
    }

    pub fn is_service_error(&self) -> bool {
        matches!(self, EcoError::ServiceError(_))
    }

    /// 給終端使用者的訊息，不包含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            EcoError::ValidationError { .. } => BLANK_QUERY_MESSAGE.to_string(),
            EcoError::ServiceError(_) => SERVICE_FAILURE_MESSAGE.to_string(),
            EcoError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            EcoError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting {}: {}", field, reason)
            }
            EcoError::ConfigError { message } => message.clone(),
            EcoError::IoError(e) => format!("File access failed: {}", e),
            EcoError::TomlError(_) => "The configuration file is not valid TOML.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EcoError::ValidationError { .. } => "Type the name of a product, e.g. \"paper towels\".",
            EcoError::ServiceError(_) => "Try again or search for a different product.",
            EcoError::MissingConfigError { .. } => {
                "Set GEMINI_API_KEY (or API_KEY), pass --api-key, or add api_key to the config file."
            }
            EcoError::InvalidConfigValueError { .. } | EcoError::ConfigError { .. } => {
                "Check the command line flags and the [service] section of the config file."
            }
            EcoError::IoError(_) | EcoError::TomlError(_) => {
                "Make sure the config file exists and is valid TOML."
            }
        }
    }

    /// Service failures may succeed on a later attempt; everything else
    /// needs the user to change something first.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EcoError::ServiceError(_) => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }
}

pub type Result<T> = std::result::Result<T, EcoError>;
