//! Error types for the TWA signing tools.

use thiserror::Error;

/// Core error type for keystore and asset-links operations.
#[derive(Error, Debug)]
pub enum TwaError {
    #[error(
        "{program} not found.\n\n\
         Please install Java JDK 17:\n  \
         Windows/Mac/Linux: https://adoptium.net/\n\n\
         After installation, ensure \"keytool\" is in your PATH."
    )]
    ToolNotFound { program: String },

    #[error("keytool {operation} failed: {message}")]
    ToolInvocation {
        operation: &'static str,
        message: String,
    },

    #[error("Could not parse SHA-256 fingerprint from keytool output")]
    FingerprintNotFound,

    #[error(
        "No fingerprint provided. Either:\n  \
         1. Use --keystore=/path/to/keystore --alias=key-alias\n  \
         2. Use --fingerprint=\"XX:XX:XX:...\"\n  \
         3. Set KEYSTORE_PASSWORD and KEY_PASSWORD environment variables"
    )]
    MissingFingerprint,

    #[error("Overwrite of existing keystore declined")]
    OverwriteDeclined,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TwaError {
    /// Process exit code for this error.
    ///
    /// A declined overwrite is a clean cancellation; everything else is fatal.
    pub fn exit_code(&self) -> u8 {
        match self {
            TwaError::OverwriteDeclined => 0,
            _ => 1,
        }
    }
}

/// Result type alias for TWA signing operations.
pub type Result<T> = std::result::Result<T, TwaError>;
