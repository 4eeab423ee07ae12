use thiserror::Error;

/// All errors that can occur in envpush.
#[derive(Debug, Error)]
pub enum EnvPushError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Integrity check failed — wrong master key or tampered ciphertext")]
    Integrity,

    #[error("Master key not set — export ENVPUSH_MASTER_KEY before running")]
    MasterKeyMissing,

    // --- Store errors ---
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Environment '{0}' not found")]
    EnvironmentNotFound(String),

    #[error("Secret '{0}' not found")]
    SecretNotFound(String),

    #[error("Token '{0}' not found")]
    TokenNotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for envpush results.
pub type Result<T> = std::result::Result<T, EnvPushError>;
