//! Mock effects implementation for storefront tests
//!
//! Bundles every effect the bot needs behind one value: the in-memory cache
//! and catalog handlers from `storefront-effects` plus a [`MockSurface`].
//! Clones share state.

use crate::mock_surface::MockSurface;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use storefront_core::effects::{
    BasketChange, CacheEffects, CacheError, CatalogEffects, CatalogError, CatalogScope,
    SurfaceEffects, SurfaceError, UserProfile,
};
use storefront_core::{
    CallbackId, CardHandle, CardPayload, ChatId, ControlPayload, Item, ItemId, Keyboard, UserId,
};
use storefront_effects::{MemoryCacheHandler, MemoryCatalogHandler};

/// Cache, catalog and surface for deterministic testing
#[derive(Debug, Clone, Default)]
pub struct MockEffects {
    cache: MemoryCacheHandler,
    catalog: MemoryCatalogHandler,
    surface: MockSurface,
    basket_offline: Arc<AtomicBool>,
}

impl MockEffects {
    /// Empty catalog, empty cache, empty surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding `items`
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            catalog: MemoryCatalogHandler::with_items(items),
            ..Self::default()
        }
    }

    /// The recording surface
    pub fn surface(&self) -> &MockSurface {
        &self.surface
    }

    /// The cache
    pub fn cache(&self) -> &MemoryCacheHandler {
        &self.cache
    }

    /// The catalog
    pub fn catalog(&self) -> &MemoryCatalogHandler {
        &self.catalog
    }

    /// Make basket changes fail with a backend error until switched back
    pub fn set_basket_offline(&self, offline: bool) {
        self.basket_offline.store(offline, Ordering::SeqCst);
    }

    fn basket_available(&self) -> Result<(), CatalogError> {
        if self.basket_offline.load(Ordering::SeqCst) {
            return Err(CatalogError::Backend {
                reason: "basket store offline".to_string(),
            });
        }
        Ok(())
    }

    /// Raw cache entry, decoded as UTF-8
    pub async fn cache_text(&self, key: &str) -> Option<String> {
        let raw = self.cache.get(key).await.ok()??;
        String::from_utf8(raw).ok()
    }
}

#[async_trait]
impl CacheEffects for MockEffects {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.cache.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.cache.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        self.cache.remove(key).await
    }
}

#[async_trait]
impl CatalogEffects for MockEffects {
    async fn list_items(&self, scope: &CatalogScope) -> Result<Vec<Item>, CatalogError> {
        self.catalog.list_items(scope).await
    }

    async fn get_item(&self, item: ItemId) -> Result<Option<Item>, CatalogError> {
        self.catalog.get_item(item).await
    }

    async fn ensure_user(&self, profile: UserProfile) -> Result<(UserProfile, bool), CatalogError> {
        self.catalog.ensure_user(profile).await
    }

    async fn add_to_basket(
        &self,
        user: &UserId,
        item: ItemId,
    ) -> Result<BasketChange, CatalogError> {
        self.basket_available()?;
        self.catalog.add_to_basket(user, item).await
    }

    async fn remove_from_basket(
        &self,
        user: &UserId,
        item: ItemId,
    ) -> Result<BasketChange, CatalogError> {
        self.basket_available()?;
        self.catalog.remove_from_basket(user, item).await
    }
}

#[async_trait]
impl SurfaceEffects for MockEffects {
    async fn create_card(
        &self,
        chat: ChatId,
        payload: &CardPayload,
    ) -> Result<CardHandle, SurfaceError> {
        self.surface.create_card(chat, payload).await
    }

    async fn edit_card(
        &self,
        chat: ChatId,
        handle: CardHandle,
        payload: &CardPayload,
    ) -> Result<(), SurfaceError> {
        self.surface.edit_card(chat, handle, payload).await
    }

    async fn delete_card(&self, chat: ChatId, handle: CardHandle) -> Result<(), SurfaceError> {
        self.surface.delete_card(chat, handle).await
    }

    async fn create_control(
        &self,
        chat: ChatId,
        payload: &ControlPayload,
    ) -> Result<CardHandle, SurfaceError> {
        self.surface.create_control(chat, payload).await
    }

    async fn edit_control(
        &self,
        chat: ChatId,
        handle: CardHandle,
        payload: &ControlPayload,
    ) -> Result<CardHandle, SurfaceError> {
        self.surface.edit_control(chat, handle, payload).await
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<CardHandle, SurfaceError> {
        self.surface.send_text(chat, text, keyboard).await
    }

    async fn answer_callback(
        &self,
        callback: &CallbackId,
        text: &str,
        alert: bool,
    ) -> Result<(), SurfaceError> {
        self.surface.answer_callback(callback, text, alert).await
    }
}
