//! User-facing texts

/// Reply when the catalog has no products
pub const NO_PRODUCTS: &str = "Products will appear soon";
/// Reply when the basket is empty
pub const EMPTY_BASKET: &str = "Your basket is empty";
/// Prompt sent by `/find`
pub const SEARCH_PROMPT: &str = "What are you looking for?";
/// Reply when a search finds nothing
pub const NOTHING_FOUND: &str = "Nothing found for your request";
/// Reply to text the bot does not understand
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// Alert after adding an item
pub const ADDED_TO_BASKET: &str = "Added to basket";
/// Alert when the item was already in the basket
pub const ALREADY_IN_BASKET: &str = "Already in your basket";
/// Alert after removing an item
pub const REMOVED_FROM_BASKET: &str = "Removed from basket";
/// Alert when the item was not in the basket
pub const NOT_IN_BASKET: &str = "This product is no longer in your basket";
/// Alert when the item no longer exists
pub const UNKNOWN_PRODUCT: &str = "This product no longer exists";

/// Menu button opening the catalog
pub const MENU_PRODUCTS: &str = "🛍 Products";
/// Menu button opening the basket
pub const MENU_BASKET: &str = "🧺 Basket";
/// Menu button starting a search
pub const MENU_FIND: &str = "🔎 Find";
