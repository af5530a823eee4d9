//! Catalog items and pagination.
//!
//! Items are immutable values handed out by the catalog. The view engine never
//! mutates them; it only slices them into pages and renders them into cards.

use crate::{identifiers::ItemId, StorefrontError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Media shown on a product card when none was uploaded
pub const DEFAULT_MEDIA: &str = "media/Box.png";

/// Relative path of an item's picture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaRef(pub String);

impl MediaRef {
    /// Create a media reference
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Borrow the stored path
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MediaRef {
    fn default() -> Self {
        Self(DEFAULT_MEDIA.to_string())
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog entry or basket entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Catalog identifier
    pub item_id: ItemId,
    /// Display name
    pub name: String,
    /// Free-form description shown under the name
    pub description: String,
    /// Picture attached to the card
    #[serde(default)]
    pub media: MediaRef,
    /// Category the item belongs to, if categorised
    #[serde(default)]
    pub category_id: Option<u64>,
}

impl Item {
    /// Create an item with the default picture and no category
    pub fn new(item_id: u64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            item_id: ItemId(item_id),
            name: name.into(),
            description: description.into(),
            media: MediaRef::default(),
            category_id: None,
        }
    }

    /// Replace the item's picture
    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = MediaRef::new(media);
        self
    }

    /// Assign a category
    pub fn with_category(mut self, category_id: u64) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Which action button accompanies a rendered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardVariant {
    /// No action button
    #[default]
    Omitted,
    /// Offer to put the item into the basket
    OfferAdd,
    /// Offer to take the item out of the basket
    OfferRemove,
}

/// Slice `items` into consecutive pages of `page_size`.
///
/// The last page holds the remainder and may be shorter. No items means no
/// pages, so callers can tell an empty listing apart from a one-page one.
pub fn paginate(items: Vec<Item>, page_size: usize) -> Result<Vec<Vec<Item>>, StorefrontError> {
    if page_size == 0 {
        return Err(StorefrontError::invalid("page size must be at least 1"));
    }

    let mut pages = Vec::with_capacity(items.len().div_ceil(page_size));
    let mut current = Vec::with_capacity(page_size);
    for item in items {
        current.push(item);
        if current.len() == page_size {
            pages.push(std::mem::replace(&mut current, Vec::with_capacity(page_size)));
        }
    }
    if !current.is_empty() {
        pages.push(current);
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn items(n: u64) -> Vec<Item> {
        (1..=n).map(|i| Item::new(i, format!("item {i}"), "")).collect()
    }

    #[test]
    fn test_paginate_with_remainder() {
        let pages = paginate(items(7), 3).unwrap();
        let lens: Vec<usize> = pages.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![3, 3, 1]);
        assert_eq!(pages[2][0].item_id, ItemId(7));
    }

    #[test]
    fn test_paginate_empty_has_no_pages() {
        assert!(paginate(Vec::new(), 3).unwrap().is_empty());
    }

    #[test]
    fn test_paginate_rejects_zero_width() {
        assert!(matches!(
            paginate(items(2), 0),
            Err(StorefrontError::Invalid { .. })
        ));
    }

    #[test]
    fn test_item_defaults_to_box_picture() {
        let item = Item::new(1, "Tea", "Green");
        assert_eq!(item.media.as_str(), DEFAULT_MEDIA);
    }

    proptest! {
        /// Pagination preserves order and only the last page may be short
        #[test]
        fn paginate_preserves_order(n in 0u64..60, size in 1usize..8) {
            let pages = paginate(items(n), size).unwrap();
            let flattened: Vec<ItemId> = pages.iter().flatten().map(|i| i.item_id).collect();
            let expected: Vec<ItemId> = (1..=n).map(ItemId).collect();
            prop_assert_eq!(flattened, expected);
            if let Some((last, full)) = pages.split_last() {
                prop_assert!(full.iter().all(|p| p.len() == size));
                prop_assert!(!last.is_empty() && last.len() <= size);
            }
        }
    }
}
