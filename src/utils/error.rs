use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Env file error: {0}")]
    EnvFileError(#[from] dotenvy::Error),

    #[error("{field} is not defined. Please set it in .env file or as environment variable.")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to fetch {url}: {reason}")]
    FetchError { url: String, reason: String },

    #[error("Failed to update firewall name (HTTP {status}): {body}")]
    RenameError { status: u16, body: String },

    #[error("Failed to apply firewall rules (HTTP {status}): {body}")]
    ApplyRulesError { status: u16, body: String },

    #[error("Firewall rules may have been applied, but the result is unknown: {reason}")]
    ApplyRulesUnconfirmedError { reason: String },

    #[error("Unauthorized for manual calls.")]
    UnauthorizedError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Fetch,
    Provider,
    Authorization,
    Transport,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::EnvFileError(_) => ErrorCategory::Configuration,
            SyncError::FetchError { .. } => ErrorCategory::Fetch,
            SyncError::RenameError { .. }
            | SyncError::ApplyRulesError { .. }
            | SyncError::ApplyRulesUnconfirmedError { .. } => ErrorCategory::Provider,
            SyncError::UnauthorizedError => ErrorCategory::Authorization,
            SyncError::HttpError(_) | SyncError::SerializationError(_) => {
                ErrorCategory::Transport
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::MissingConfigError { .. } => {
                "Set the variable in the environment or in a .env file next to the binary"
            }
            SyncError::InvalidConfigValueError { .. } => {
                "Fix the reported value and run again"
            }
            SyncError::EnvFileError(_) => "Check that the env file exists and uses KEY=value lines",
            SyncError::FetchError { .. } => {
                "The Cloudflare range list is unavailable; nothing was changed, try again later"
            }
            SyncError::RenameError { .. } => {
                "Check API_TOKEN permissions and FIREWALL_ID; the firewall was not modified"
            }
            SyncError::ApplyRulesError { .. } => {
                "The firewall was renamed but still holds its previous rules; fix the cause and re-run"
            }
            SyncError::ApplyRulesUnconfirmedError { .. } => {
                "The firewall was renamed and may already hold the new rules; check it in the Hetzner console before re-running"
            }
            SyncError::UnauthorizedError => "Send the WORKER_SECRET value in the Authorization header",
            SyncError::HttpError(_) | SyncError::SerializationError(_) => {
                "Check network connectivity to the Hetzner API and re-run"
            }
        }
    }

    /// Whether the firewall may have been touched before the error happened.
    pub fn firewall_modified(&self) -> bool {
        matches!(
            self,
            SyncError::ApplyRulesError { .. } | SyncError::ApplyRulesUnconfirmedError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
