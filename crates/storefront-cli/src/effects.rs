//! Handler bundle used by the terminal front end

use async_trait::async_trait;
use storefront_core::effects::{
    BasketChange, CacheEffects, CacheError, CatalogEffects, CatalogError, CatalogScope,
    SurfaceEffects, SurfaceError, UserProfile,
};
use storefront_core::{
    CallbackId, CardHandle, CardPayload, ChatId, ControlPayload, Item, ItemId, Keyboard, UserId,
};
use storefront_effects::{ConsoleSurfaceHandler, MemoryCacheHandler, MemoryCatalogHandler};

/// Cache, catalog and console surface behind one value
#[derive(Debug, Clone)]
pub struct TerminalEffects {
    pub cache: MemoryCacheHandler,
    pub catalog: MemoryCatalogHandler,
    pub surface: ConsoleSurfaceHandler,
}

#[async_trait]
impl CacheEffects for TerminalEffects {
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
impl CatalogEffects for TerminalEffects {
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
        self.catalog.add_to_basket(user, item).await
    }

    async fn remove_from_basket(
        &self,
        user: &UserId,
        item: ItemId,
    ) -> Result<BasketChange, CatalogError> {
        self.catalog.remove_from_basket(user, item).await
    }
}

#[async_trait]
impl SurfaceEffects for TerminalEffects {
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
