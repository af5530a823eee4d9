//! Media resolution interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `storefront-effects` (filesystem), `storefront-testkit` (static)
//! - **Usage**: the card renderer, once per rendered card
//!
//! Resolution is synchronous and must be deterministic: the same reference
//! resolves to the same location until the underlying file disappears.

use crate::item::MediaRef;
use crate::payload::ResolvedMedia;
use serde::{Deserialize, Serialize};

/// Error type for rendering an item into a card.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum RenderError {
    #[error("Media {media} unavailable: {reason}")]
    MediaUnavailable { media: MediaRef, reason: String },
}

/// Pure trait for turning a stored media reference into something the surface can send
pub trait MediaResolver: Send + Sync {
    /// Resolve `media`, failing if it cannot be sent
    fn resolve(&self, media: &MediaRef) -> Result<ResolvedMedia, RenderError>;
}

impl<T: MediaResolver + ?Sized> MediaResolver for &T {
    fn resolve(&self, media: &MediaRef) -> Result<ResolvedMedia, RenderError> {
        (**self).resolve(media)
    }
}

impl<T: MediaResolver + ?Sized> MediaResolver for std::sync::Arc<T> {
    fn resolve(&self, media: &MediaRef) -> Result<ResolvedMedia, RenderError> {
        (**self).resolve(media)
    }
}
