use thiserror::Error;

/// Failure reported by a host bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host cannot provide this capability right now
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    /// Transport-level failure: connection refused, TLS, timeout
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The settings backend rejected a read or write
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
