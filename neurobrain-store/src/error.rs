use thiserror::Error;

pub const THROUGHPUT_EXCEEDED: &str = "ProvisionedThroughputExceededException";

/// Failures reported by a key-value store call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Throttled by the service; `code` is the code it reported
    #[error("Provisioned throughput exceeded [{code}]: {message}")]
    ThroughputExceeded { code: String, message: String },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Conditional check failed: {0}")]
    ConditionalCheckFailed(String),

    #[error("Service error [{code}]: {message}")]
    Service { code: String, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Throughput error carrying the provisioned-throughput code
    pub fn throughput_exceeded(message: impl Into<String>) -> Self {
        StoreError::ThroughputExceeded {
            code: THROUGHPUT_EXCEEDED.to_string(),
            message: message.into(),
        }
    }

    /// Build the matching variant from a service error code
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            THROUGHPUT_EXCEEDED | "ThrottlingException" => StoreError::ThroughputExceeded {
                code: code.to_string(),
                message,
            },
            "ResourceNotFoundException" => StoreError::TableNotFound(message),
            "ConditionalCheckFailedException" => StoreError::ConditionalCheckFailed(message),
            _ => StoreError::Service {
                code: code.to_string(),
                message,
            },
        }
    }

    /// Service error code, when the store supplied one
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::ThroughputExceeded { code, .. } => Some(code),
            StoreError::TableNotFound(_) => Some("ResourceNotFoundException"),
            StoreError::ConditionalCheckFailed(_) => Some("ConditionalCheckFailedException"),
            StoreError::Service { code, .. } => Some(code),
            StoreError::Transport(_) | StoreError::Malformed(_) => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures that stop a seeding run before any record is written
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Missing tables: {}", .0.join(", "))]
    MissingTables(Vec<String>),

    #[error("Table {table} exists but is not active (status: {status})")]
    InactiveTable { table: String, status: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
