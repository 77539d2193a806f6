use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// Stored bytes exist but do not satisfy the caller's expected shape.
    #[error("Storage read failed for key '{key}': {message}")]
    StorageRead { key: String, message: String },

    /// The underlying medium refused the write, or the value could not be encoded.
    #[error("Storage write failed for key '{key}': {message}")]
    StorageWrite { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    pub fn storage_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageRead {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn storage_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            key: key.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
