//! In-memory catalog, user registry and baskets
//!
//! Products can be seeded from a TOML file:
//!
//! ```toml
//! [[product]]
//! item_id = 1
//! name = "Green tea"
//! description = "Loose leaf, 100 g"
//! media = "media/tea.png"
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use storefront_core::effects::{
    BasketChange, CatalogEffects, CatalogError, CatalogScope, UserProfile,
};
use storefront_core::{Item, ItemId, StorefrontError, UserId};
use tokio::sync::RwLock;

/// Contents of a catalog seed file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSeed {
    /// Products, in any order
    #[serde(default)]
    pub product: Vec<Item>,
}

impl CatalogSeed {
    /// Parse seed TOML
    pub fn from_toml_str(content: &str) -> Result<Self, StorefrontError> {
        toml::from_str(content).map_err(|e| StorefrontError::config(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    products: BTreeMap<ItemId, Item>,
    users: HashMap<UserId, UserProfile>,
    baskets: HashMap<UserId, Vec<ItemId>>,
}

/// In-memory catalog handler
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogHandler {
    state: Arc<RwLock<CatalogState>>,
}

impl MemoryCatalogHandler {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `items`; a later item replaces an earlier one with the same id
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let products = items.into_iter().map(|i| (i.item_id, i)).collect();
        Self {
            state: Arc::new(RwLock::new(CatalogState {
                products,
                ..CatalogState::default()
            })),
        }
    }

    /// Load a seed file; a missing file yields an empty catalog
    pub async fn from_seed_file(path: &Path) -> Result<Self, StorefrontError> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "catalog seed not found, starting empty");
            return Ok(Self::new());
        }
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            StorefrontError::config(format!("Failed to read catalog {}: {e}", path.display()))
        })?;
        let seed = CatalogSeed::from_toml_str(&content).map_err(|e| {
            StorefrontError::config(format!("Failed to parse catalog {}: {e}", path.display()))
        })?;
        tracing::info!(products = seed.product.len(), "catalog loaded");
        Ok(Self::with_items(seed.product))
    }

    /// Add or replace a product
    pub async fn insert_item(&self, item: Item) {
        self.state.write().await.products.insert(item.item_id, item);
    }

    /// Remove a product; baskets keep the id and skip it when listed
    pub async fn remove_item(&self, item: ItemId) -> bool {
        self.state.write().await.products.remove(&item).is_some()
    }
}

/// Case-insensitive substring match on the name, names starting with the
/// query ranked first; ties keep catalog order
fn search<'a>(products: impl Iterator<Item = &'a Item>, query: &str) -> Vec<Item> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut prefix = Vec::new();
    let mut inner = Vec::new();
    for item in products {
        let name = item.name.to_lowercase();
        if name.starts_with(&needle) {
            prefix.push(item.clone());
        } else if name.contains(&needle) {
            inner.push(item.clone());
        }
    }
    prefix.append(&mut inner);
    prefix
}

#[async_trait]
impl CatalogEffects for MemoryCatalogHandler {
    async fn list_items(&self, scope: &CatalogScope) -> Result<Vec<Item>, CatalogError> {
        let state = self.state.read().await;
        let items = match scope {
            CatalogScope::AllProducts => state.products.values().cloned().collect(),
            CatalogScope::Basket(user) => state
                .baskets
                .get(user)
                .into_iter()
                .flatten()
                .filter_map(|id| state.products.get(id).cloned())
                .collect(),
            CatalogScope::Search(query) => search(state.products.values(), query),
        };
        Ok(items)
    }

    async fn get_item(&self, item: ItemId) -> Result<Option<Item>, CatalogError> {
        Ok(self.state.read().await.products.get(&item).cloned())
    }

    async fn ensure_user(&self, profile: UserProfile) -> Result<(UserProfile, bool), CatalogError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.users.get(&profile.user) {
            return Ok((existing.clone(), false));
        }
        tracing::info!(user = %profile.user, "new user registered");
        state.users.insert(profile.user.clone(), profile.clone());
        Ok((profile, true))
    }

    async fn add_to_basket(
        &self,
        user: &UserId,
        item: ItemId,
    ) -> Result<BasketChange, CatalogError> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&item) {
            return Ok(BasketChange::UnknownItem);
        }
        let basket = state.baskets.entry(user.clone()).or_default();
        if basket.contains(&item) {
            return Ok(BasketChange::AlreadyPresent);
        }
        basket.push(item);
        Ok(BasketChange::Added)
    }

    async fn remove_from_basket(
        &self,
        user: &UserId,
        item: ItemId,
    ) -> Result<BasketChange, CatalogError> {
        let mut state = self.state.write().await;
        let known = state.products.contains_key(&item);
        let removed = match state.baskets.get_mut(user) {
            Some(basket) => {
                let before = basket.len();
                basket.retain(|id| *id != item);
                basket.len() != before
            }
            None => false,
        };
        Ok(match (removed, known) {
            (true, _) => BasketChange::Removed,
            (false, true) => BasketChange::NotPresent,
            (false, false) => BasketChange::UnknownItem,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MemoryCatalogHandler {
        MemoryCatalogHandler::with_items(vec![
            Item::new(1, "Green tea", ""),
            Item::new(2, "Teapot", ""),
            Item::new(3, "Black tea", ""),
            Item::new(4, "Coffee", ""),
        ])
    }

    fn ids(items: &[Item]) -> Vec<u64> {
        items.iter().map(|i| i.item_id.0).collect()
    }

    #[tokio::test]
    async fn test_search_ranks_prefix_matches_first() {
        let found = catalog()
            .list_items(&CatalogScope::Search("TEA".into()))
            .await
            .unwrap();
        assert_eq!(ids(&found), vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_blank_search_finds_nothing() {
        let found = catalog()
            .list_items(&CatalogScope::Search("  ".into()))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_basket_changes() {
        let catalog = catalog();
        let user = UserId::new("ann");

        assert_eq!(catalog.add_to_basket(&user, ItemId(4)).await.unwrap(), BasketChange::Added);
        assert_eq!(
            catalog.add_to_basket(&user, ItemId(4)).await.unwrap(),
            BasketChange::AlreadyPresent
        );
        assert_eq!(
            catalog.add_to_basket(&user, ItemId(99)).await.unwrap(),
            BasketChange::UnknownItem
        );
        catalog.add_to_basket(&user, ItemId(1)).await.unwrap();

        let basket = catalog
            .list_items(&CatalogScope::Basket(user.clone()))
            .await
            .unwrap();
        assert_eq!(ids(&basket), vec![4, 1]);

        assert_eq!(
            catalog.remove_from_basket(&user, ItemId(4)).await.unwrap(),
            BasketChange::Removed
        );
        assert_eq!(
            catalog.remove_from_basket(&user, ItemId(4)).await.unwrap(),
            BasketChange::NotPresent
        );
        assert_eq!(
            catalog.remove_from_basket(&user, ItemId(99)).await.unwrap(),
            BasketChange::UnknownItem
        );
    }

    #[tokio::test]
    async fn test_removed_product_disappears_from_baskets() {
        let catalog = catalog();
        let user = UserId::new("ann");
        catalog.add_to_basket(&user, ItemId(2)).await.unwrap();
        assert!(catalog.remove_item(ItemId(2)).await);

        let basket = catalog.list_items(&CatalogScope::Basket(user.clone())).await.unwrap();
        assert!(basket.is_empty());
        assert_eq!(
            catalog.remove_from_basket(&user, ItemId(2)).await.unwrap(),
            BasketChange::Removed
        );
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let catalog = MemoryCatalogHandler::new();
        let mut profile = UserProfile::new(UserId::new("ann"));
        profile.first_name = Some("Ann".into());

        let (stored, created) = catalog.ensure_user(profile.clone()).await.unwrap();
        assert!(created);
        assert_eq!(stored.display_name(), "Ann");

        profile.first_name = Some("Other".into());
        let (stored, created) = catalog.ensure_user(profile).await.unwrap();
        assert!(!created);
        assert_eq!(stored.display_name(), "Ann");
    }
}
