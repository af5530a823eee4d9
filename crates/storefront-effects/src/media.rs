//! Filesystem media resolver

use std::path::{Component, Path, PathBuf};
use storefront_core::effects::{MediaResolver, RenderError};
use storefront_core::{MediaRef, ResolvedMedia, StorefrontConfig};

/// Resolves item pictures relative to a media root directory
#[derive(Debug, Clone)]
pub struct FilesystemMediaResolver {
    root: PathBuf,
}

impl FilesystemMediaResolver {
    /// Create a resolver rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a resolver rooted at the configured `media_root`
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(config.media_root.clone())
    }

    /// Media root
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaResolver for FilesystemMediaResolver {
    fn resolve(&self, media: &MediaRef) -> Result<ResolvedMedia, RenderError> {
        let unavailable = |reason: &str| RenderError::MediaUnavailable {
            media: media.clone(),
            reason: reason.to_string(),
        };

        let relative = Path::new(media.as_str());
        if media.as_str().is_empty() {
            return Err(unavailable("empty media reference"));
        }
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(unavailable("path escapes the media root"));
        }

        let path = self.root.join(relative);
        if !path.is_file() {
            return Err(unavailable("file not found"));
        }
        Ok(ResolvedMedia(path.display().to_string()))
    }
}
