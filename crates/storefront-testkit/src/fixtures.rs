//! Item, user and session fixtures

use storefront_core::effects::UserProfile;
use storefront_core::{ChatId, Item, SessionKey, StorefrontConfig, UserId, ViewKind};

/// Item `id` named `item {id}`
pub fn item(id: u64) -> Item {
    Item::new(id, format!("item {id}"), format!("description of item {id}"))
}

/// Items `1..=n`
pub fn items(n: u64) -> Vec<Item> {
    (1..=n).map(item).collect()
}

/// Pages with the given sizes, item ids counting up from 1 across pages
pub fn pages(sizes: &[usize]) -> Vec<Vec<Item>> {
    let mut next = 0u64;
    sizes
        .iter()
        .map(|&size| {
            (0..size)
                .map(|_| {
                    next += 1;
                    item(next)
                })
                .collect()
        })
        .collect()
}

/// Small tea shop catalog with seven products
pub fn sample_catalog() -> Vec<Item> {
    vec![
        Item::new(1, "Green tea", "Loose leaf, 100 g").with_category(1),
        Item::new(2, "Black tea", "Assam, 250 g").with_category(1),
        Item::new(3, "Teapot", "Cast iron, 0.8 l").with_media("media/teapot.png"),
        Item::new(4, "Cup", "Porcelain"),
        Item::new(5, "Honey", "Linden, 300 g"),
        Item::new(6, "Tea strainer", "Stainless steel"),
        Item::new(7, "Coffee", "Arabica beans, 1 kg"),
    ]
}

/// Chat used by most tests
pub fn test_chat() -> ChatId {
    ChatId(100)
}

/// User id from a username
pub fn user(name: &str) -> UserId {
    UserId::new(name)
}

/// Profile with a first name
pub fn profile(name: &str, first_name: &str) -> UserProfile {
    UserProfile {
        user: user(name),
        first_name: Some(first_name.to_string()),
        last_name: None,
    }
}

/// Session key for `name` browsing `view`
pub fn session(name: &str, view: ViewKind) -> SessionKey {
    SessionKey::new(user(name), view)
}

/// Default configuration with a fixed page size
pub fn test_config(page_size: usize) -> StorefrontConfig {
    StorefrontConfig {
        page_size,
        ..StorefrontConfig::default()
    }
}

/// Install a test-friendly tracing subscriber once per process
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
