//! Errors raised while starting or moving a browsing view.
//!
//! The variants double as the error-kind tag callers switch on: the
//! structural kinds abort a request before anything is touched, the
//! per-card kinds are collected while the rest of the plan keeps running.

use std::fmt;
use storefront_core::effects::{CacheError, RenderError, SurfaceError};
use storefront_core::{CardHandle, Direction, StorefrontError};

/// Surface operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOp {
    /// Editing a product card in place
    EditCard,
    /// Deleting a product card
    DeleteCard,
    /// Posting a new product card
    CreateCard,
    /// Editing the navigation control
    EditControl,
    /// Deleting the navigation control
    DeleteControl,
    /// Posting a new navigation control
    CreateControl,
}

impl fmt::Display for SurfaceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceOp::EditCard => "edit card",
            SurfaceOp::DeleteCard => "delete card",
            SurfaceOp::CreateCard => "create card",
            SurfaceOp::EditControl => "edit control",
            SurfaceOp::DeleteControl => "delete control",
            SurfaceOp::CreateControl => "create control",
        };
        f.write_str(name)
    }
}

/// View-layer error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// No page state (or only a corrupt one) exists for the session
    #[error("No active browsing session for {key}")]
    NoActiveSession {
        /// Cache key that was looked up
        key: String,
    },

    /// Navigation past the first or last page
    #[error("No {direction} page")]
    BoundaryReached {
        /// Requested direction
        direction: Direction,
    },

    /// A browsing session was requested for an empty listing
    #[error("Nothing to show")]
    NothingToShow,

    /// The surface rejected one card or control operation
    #[error("Surface operation {op} failed: {source}")]
    SurfaceOperationFailed {
        /// Which operation
        op: SurfaceOp,
        /// Card or control the operation targeted; `None` for creates
        handle: Option<CardHandle>,
        /// Underlying surface error
        source: SurfaceError,
    },

    /// An item at a page position could not be rendered
    #[error("Card at position {slot} could not be rendered: {source}")]
    Render {
        /// Position on the target page
        slot: usize,
        /// Underlying render error
        source: RenderError,
    },

    /// The page-state store could not be read or written
    #[error("Page state store failed: {0}")]
    Cache(#[from] CacheError),

    /// The page state could not be encoded for storage
    #[error("Page state could not be encoded: {message}")]
    Encode {
        /// Encoder message
        message: String,
    },
}

impl ViewError {
    /// Build a surface failure
    pub fn surface(op: SurfaceOp, handle: Option<CardHandle>, source: SurfaceError) -> Self {
        Self::SurfaceOperationFailed { op, handle, source }
    }

    /// Whether this is a locally recovered no-op: nothing was touched and
    /// the user sees no change
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            ViewError::NoActiveSession { .. } | ViewError::BoundaryReached { .. }
        )
    }

    /// Whether the error concerns a single card and left the rest of the plan running
    pub fn is_per_card(&self) -> bool {
        matches!(
            self,
            ViewError::SurfaceOperationFailed { .. } | ViewError::Render { .. }
        )
    }
}

impl From<ViewError> for StorefrontError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::NoActiveSession { .. } => StorefrontError::not_found(err.to_string()),
            ViewError::BoundaryReached { .. } | ViewError::NothingToShow => {
                StorefrontError::invalid(err.to_string())
            }
            ViewError::SurfaceOperationFailed { source, .. } => source.into(),
            ViewError::Render { source, .. } => source.into(),
            ViewError::Cache(source) => source.into(),
            ViewError::Encode { message } => StorefrontError::serialization(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_classification() {
        assert!(ViewError::NoActiveSession {
            key: "a:basket".into()
        }
        .is_noop());
        assert!(ViewError::BoundaryReached {
            direction: Direction::Forward
        }
        .is_noop());
        assert!(!ViewError::NothingToShow.is_noop());
    }

    #[test]
    fn test_surface_failure_message() {
        let err = ViewError::surface(
            SurfaceOp::DeleteCard,
            Some(CardHandle(5)),
            SurfaceError::NotFound {
                handle: CardHandle(5),
            },
        );
        assert!(err.is_per_card());
        assert_eq!(
            err.to_string(),
            "Surface operation delete card failed: Message not found: msg:5"
        );
    }
}
