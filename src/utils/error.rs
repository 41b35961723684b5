use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("No element matches '{selector}'")]
    ElementNotFound { selector: String },

    #[error("Document error: {message}")]
    Dom { message: String },

    #[error("Background fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Fetch scheduling failed: {message}")]
    Scheduling { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },
}

impl DirectoryError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    pub fn dom(message: impl Into<String>) -> Self {
        Self::Dom {
            message: message.into(),
        }
    }

    /// 呼叫端誤用（例如 id 為 0）而非執行期失敗
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfigValue { .. } | Self::ConfigParse { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Http(_) => "Check network connectivity and the --api-base-url value",
            Self::Status { status, .. } if *status == 404 => {
                "The requested record does not exist on the remote API"
            }
            Self::Status { .. } => "The remote API rejected the request; try again later",
            Self::Decode { .. } => "The API host does not serve JSONPlaceholder-shaped records",
            Self::InvalidInput { .. } => "Pass a positive, non-zero id",
            Self::ElementNotFound { .. } | Self::Dom { .. } => {
                "Render the page layout before wiring events"
            }
            Self::Task(_) | Self::Scheduling { .. } => {
                "Re-run with --verbose to see which fetch failed"
            }
            Self::Io(_) => "Check that the output path exists and is writable",
            Self::InvalidConfigValue { .. } | Self::ConfigParse { .. } => {
                "Fix the configuration value and run again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
