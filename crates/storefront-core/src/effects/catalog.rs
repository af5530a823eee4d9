//! Catalog effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Application Effect
//! - **Implementation**: `storefront-effects` (in-memory store)
//! - **Usage**: session start (item listing) and basket buttons
//!
//! The view engine only reads from the catalog. Basket mutations come from
//! the command layer and never touch an active page state.

use crate::identifiers::{ItemId, UserId};
use crate::item::{paginate, Item};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum CatalogError {
    #[error("Unknown item: {item}")]
    UnknownItem { item: ItemId },
    #[error("Unknown user: {user}")]
    UnknownUser { user: UserId },
    #[error("Catalog backend failure: {reason}")]
    Backend { reason: String },
}

/// Which items a listing covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogScope {
    /// Every product
    AllProducts,
    /// Items in one user's basket
    Basket(UserId),
    /// Products matching a free-text query
    Search(String),
}

/// A registered bot user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Username
    pub user: UserId,
    /// First name, if shared
    pub first_name: Option<String>,
    /// Last name, if shared
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Profile with only a username
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            first_name: None,
            last_name: None,
        }
    }

    /// Name used in greetings
    pub fn display_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or(self.user.as_str())
    }
}

/// Result of a basket mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasketChange {
    /// The item was put into the basket
    Added,
    /// The item was already in the basket
    AlreadyPresent,
    /// The item was taken out of the basket
    Removed,
    /// The item was not in the basket
    NotPresent,
    /// No such item exists
    UnknownItem,
}

/// Pure trait for catalog, user and basket operations
#[async_trait]
pub trait CatalogEffects: Send + Sync {
    /// List the items in `scope`, in display order
    async fn list_items(&self, scope: &CatalogScope) -> Result<Vec<Item>, CatalogError>;

    /// List the items in `scope` already sliced into pages of `page_size`
    ///
    /// An empty scope yields no pages.
    async fn list_items_paginated(
        &self,
        scope: &CatalogScope,
        page_size: usize,
    ) -> Result<Vec<Vec<Item>>, CatalogError> {
        let items = self.list_items(scope).await?;
        paginate(items, page_size).map_err(|e| CatalogError::Backend {
            reason: e.to_string(),
        })
    }

    /// Look up one item
    async fn get_item(&self, item: ItemId) -> Result<Option<Item>, CatalogError>;

    /// Register the user if unknown; returns the stored profile and whether it was created
    async fn ensure_user(&self, profile: UserProfile) -> Result<(UserProfile, bool), CatalogError>;

    /// Put an item into the user's basket
    async fn add_to_basket(&self, user: &UserId, item: ItemId)
        -> Result<BasketChange, CatalogError>;

    /// Take an item out of the user's basket
    async fn remove_from_basket(
        &self,
        user: &UserId,
        item: ItemId,
    ) -> Result<BasketChange, CatalogError>;
}
