//! Unified error system for storefront operations
//!
//! One flat error type shared by every layer, with per-effect error enums
//! converting into it. The live-view engine adds its own tagged error on top.

use crate::effects::{CacheError, CatalogError, RenderError, SurfaceError};
use serde::{Deserialize, Serialize};

/// Unified error type for all storefront operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StorefrontError {
    /// Invalid input or arguments
    #[error("Invalid: {message}")]
    Invalid {
        /// What was invalid
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Cache store failure
    #[error("Cache error: {message}")]
    Cache {
        /// Error message describing the cache failure
        message: String,
    },

    /// Messaging surface rejected an operation
    #[error("Surface error: {message}")]
    Surface {
        /// Error message describing the surface failure
        message: String,
    },

    /// Catalog or basket store failure
    #[error("Catalog error: {message}")]
    Catalog {
        /// Error message describing the catalog failure
        message: String,
    },

    /// An item could not be rendered into a card
    #[error("Render error: {message}")]
    Render {
        /// Error message describing the render failure
        message: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl StorefrontError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a surface error
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for storefront operations
pub type Result<T> = std::result::Result<T, StorefrontError>;

impl From<serde_json::Error> for StorefrontError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for StorefrontError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<CacheError> for StorefrontError {
    fn from(err: CacheError) -> Self {
        Self::cache(err.to_string())
    }
}

impl From<SurfaceError> for StorefrontError {
    fn from(err: SurfaceError) -> Self {
        Self::surface(err.to_string())
    }
}

impl From<RenderError> for StorefrontError {
    fn from(err: RenderError) -> Self {
        Self::render(err.to_string())
    }
}

impl From<CatalogError> for StorefrontError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownItem { .. } | CatalogError::UnknownUser { .. } => {
                Self::not_found(err.to_string())
            }
            CatalogError::Backend { .. } => Self::catalog(err.to_string()),
        }
    }
}
