//! Error types for Trolley
//!
//! All modules use `CartResult<T>` as their return type.

use thiserror::Error;

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

/// All errors that can occur in Trolley
#[derive(Error, Debug)]
pub enum CartError {
    // Lifecycle errors
    #[error("Cart accessed before hydration. Call hydrate() first.")]
    NotInitialized,

    #[error("Persistence task stopped")]
    PersistenceStopped,

    // Storage errors
    #[error("Durable store read failed: {context}")]
    StorageRead {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Durable store write failed: {context}")]
    StorageWrite {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CartError {
    /// Create a storage read error with context
    pub fn storage_read(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::StorageRead {
            context: context.into(),
            source,
        }
    }

    /// Create a storage write error with context
    pub fn storage_write(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::StorageWrite {
            context: context.into(),
            source,
        }
    }

    /// Check if the error is a non-fatal durability warning
    ///
    /// Durability warnings leave the in-memory cart fully usable; only the
    /// on-device snapshot is stale until the next successful write.
    pub fn is_durability_warning(&self) -> bool {
        matches!(self, Self::StorageRead { .. } | Self::StorageWrite { .. })
    }
}
