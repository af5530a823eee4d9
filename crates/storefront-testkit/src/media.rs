//! Deterministic media resolver

use std::collections::HashSet;
use storefront_core::effects::{MediaResolver, RenderError};
use storefront_core::{MediaRef, ResolvedMedia};

/// Resolves every reference to `static://{reference}` without touching disk
#[derive(Debug, Clone, Default)]
pub struct StaticMediaResolver {
    failing: HashSet<String>,
}

impl StaticMediaResolver {
    /// Resolver that never fails
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that fails for each of `references`
    pub fn failing_on<I, S>(references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing: references.into_iter().map(Into::into).collect(),
        }
    }
}

impl MediaResolver for StaticMediaResolver {
    fn resolve(&self, media: &MediaRef) -> Result<ResolvedMedia, RenderError> {
        if self.failing.contains(media.as_str()) {
            return Err(RenderError::MediaUnavailable {
                media: media.clone(),
                reason: "unavailable in test".to_string(),
            });
        }
        Ok(ResolvedMedia(format!("static://{media}")))
    }
}
