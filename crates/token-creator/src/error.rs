use thiserror::Error;

/// Form rule violations, reported first-error-wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Token name is required")]
    NameRequired,

    #[error("Token name must be 32 characters or less")]
    NameTooLong,

    #[error("Token symbol is required")]
    SymbolRequired,

    #[error("Token symbol must be 10 characters or less")]
    SymbolTooLong,

    #[error("Token URI is required")]
    UriRequired,

    #[error("Token URI must be 200 characters or less")]
    UriTooLong,

    #[error("Decimals must be between 0 and 9")]
    DecimalsOutOfRange,

    #[error("Description must be 200 characters or less")]
    DescriptionTooLong,

    #[error("Metadata field key must not be empty")]
    EmptyMetadataKey,

    #[error("Duplicate metadata key: {0}")]
    DuplicateMetadataKey(String),

    #[error("Token metadata is too large for one transaction ({size} bytes, limit {limit})")]
    TransactionTooLarge { size: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(e: reqwest::Error) -> Self {
        LedgerError::Transport(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Transaction rejected by user")]
    Rejected,

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

impl From<chain_sol::SolError> for WalletError {
    fn from(e: chain_sol::SolError) -> Self {
        WalletError::SigningFailed(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum PinError {
    #[error("Pinata credentials not configured")]
    NotConfigured,

    #[error("File size must be less than 5MB")]
    ImageTooLarge { size: usize },

    #[error("File must be an image")]
    NotAnImage { content_type: String },

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Image uploaded but not accessible. Please check Pinata configuration.")]
    NotRetrievable { url: String },
}

impl From<reqwest::Error> for PinError {
    fn from(e: reqwest::Error) -> Self {
        PinError::Upload(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid value for {field}: {value} (expected {expected})")]
    Invalid {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Load(e.to_string())
    }
}

/// What went wrong in a creation attempt, at the granularity a user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    Validation,
    WalletUnavailable,
    RentLookup,
    Rejected,
    Broadcast,
    TransactionFailed,
    Unconfirmed,
    Internal,
}

/// Failure of one token-creation attempt.
#[derive(Debug, Error)]
pub enum CreatorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Please connect your wallet")]
    WalletUnavailable,

    #[error("Rent lookup failed: {0}")]
    RentLookup(LedgerError),

    #[error("Transaction rejected by wallet")]
    Rejected,

    #[error("Failed to send transaction: {0}")]
    Broadcast(String),

    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error("Transaction {signature} was not confirmed in time; outcome unknown")]
    ConfirmationTimeout { signature: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CreatorError {
    pub fn category(&self) -> FailureCategory {
        match self {
            CreatorError::Validation(_) => FailureCategory::Validation,
            CreatorError::WalletUnavailable => FailureCategory::WalletUnavailable,
            CreatorError::RentLookup(_) => FailureCategory::RentLookup,
            CreatorError::Rejected => FailureCategory::Rejected,
            CreatorError::Broadcast(_) => FailureCategory::Broadcast,
            CreatorError::TransactionFailed { .. } => FailureCategory::TransactionFailed,
            CreatorError::ConfirmationTimeout { .. } => FailureCategory::Unconfirmed,
            CreatorError::Internal(_) => FailureCategory::Internal,
        }
    }

    /// Signature of the submitted transaction, when it got that far.
    pub fn signature(&self) -> Option<&str> {
        match self {
            CreatorError::TransactionFailed { signature, .. }
            | CreatorError::ConfirmationTimeout { signature } => Some(signature),
            _ => None,
        }
    }

    /// Text for the user-facing error notification.
    pub fn notification_message(&self) -> String {
        match self {
            CreatorError::Validation(e) => e.to_string(),
            CreatorError::WalletUnavailable => self.to_string(),
            CreatorError::Rejected => "Transaction rejected".to_string(),
            CreatorError::ConfirmationTimeout { .. } => {
                "Transaction sent but not confirmed yet. Check the explorer".to_string()
            }
            _ => "Failed to create token".to_string(),
        }
    }
}

impl From<WalletError> for CreatorError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::NotConnected => CreatorError::WalletUnavailable,
            WalletError::Rejected => CreatorError::Rejected,
            WalletError::SigningFailed(msg) => CreatorError::Internal(format!("signing: {msg}")),
            WalletError::SendFailed(msg) => CreatorError::Broadcast(msg),
        }
    }
}

impl From<chain_sol::SolError> for CreatorError {
    fn from(e: chain_sol::SolError) -> Self {
        CreatorError::Internal(format!("SOL: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages() {
        assert_eq!(ValidationError::NameRequired.to_string(), "Token name is required");
        assert_eq!(
            ValidationError::DecimalsOutOfRange.to_string(),
            "Decimals must be between 0 and 9"
        );
    }

    #[test]
    fn validation_error_is_transparent() {
        let err: CreatorError = ValidationError::SymbolTooLong.into();
        assert_eq!(err.to_string(), "Token symbol must be 10 characters or less");
        assert_eq!(err.category(), FailureCategory::Validation);
        assert_eq!(err.notification_message(), err.to_string());
    }

    #[test]
    fn wallet_errors_map_to_categories() {
        assert_eq!(
            CreatorError::from(WalletError::Rejected).category(),
            FailureCategory::Rejected
        );
        assert_eq!(
            CreatorError::from(WalletError::NotConnected).category(),
            FailureCategory::WalletUnavailable
        );
        assert_eq!(
            CreatorError::from(WalletError::SendFailed("blockhash expired".into())).category(),
            FailureCategory::Broadcast
        );
    }

    #[test]
    fn timeout_carries_signature() {
        let err = CreatorError::ConfirmationTimeout {
            signature: "5sig".into(),
        };
        assert_eq!(err.category(), FailureCategory::Unconfirmed);
        assert_eq!(err.signature(), Some("5sig"));
        assert!(err.to_string().contains("outcome unknown"));
    }

    #[test]
    fn generic_failures_use_generic_notification() {
        let err = CreatorError::Broadcast("boom".into());
        assert_eq!(err.notification_message(), "Failed to create token");
        assert_eq!(err.signature(), None);
    }

    #[test]
    fn config_invalid_display() {
        let err = ConfigError::Invalid {
            field: "poll_interval_ms",
            value: "0".into(),
            expected: "greater than 0",
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for poll_interval_ms: 0 (expected greater than 0)"
        );
    }
}
