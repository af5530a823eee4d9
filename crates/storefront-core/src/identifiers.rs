//! Identifiers for users, chats, rendered messages and browsing sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user of the bot, identified by their chat username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a user identifier from a username
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// Borrow the username
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A conversation on the messaging surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat:{}", self.0)
    }
}

/// Opaque reference to one message on the messaging surface.
///
/// Handles are only meaningful within the chat that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardHandle(pub i64);

impl fmt::Display for CardHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

/// Catalog item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an inline-button press awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackId(pub String);

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The independent browsing views a user can hold at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    /// The full product catalog
    Catalog,
    /// The user's basket
    Basket,
    /// Results of the last search
    Search,
}

impl ViewKind {
    /// All views, in a stable order
    pub const ALL: [ViewKind; 3] = [ViewKind::Catalog, ViewKind::Basket, ViewKind::Search];

    /// Short name used in callback data (`{slug}_left`, `{slug}_right`)
    pub fn slug(self) -> &'static str {
        match self {
            ViewKind::Catalog => "product",
            ViewKind::Basket => "basket",
            ViewKind::Search => "search",
        }
    }

    /// Suffix appended to the user identifier to form the cache key
    pub fn cache_suffix(self) -> &'static str {
        match self {
            ViewKind::Catalog => ":product",
            ViewKind::Basket => ":basket",
            ViewKind::Search => ":search",
        }
    }

    /// Look a view up by its slug
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.slug() == slug)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Navigation direction through a paginated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards the last page
    Forward,
    /// Towards the first page
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("next"),
            Direction::Backward => f.write_str("previous"),
        }
    }
}

/// One user's browsing session for one view.
///
/// Each user holds at most one live session per [`ViewKind`], so basket,
/// catalog and search browsing never interfere with each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    /// Owner of the session
    pub user: UserId,
    /// Which view the session browses
    pub view: ViewKind,
}

impl SessionKey {
    /// Create a session key
    pub fn new(user: UserId, view: ViewKind) -> Self {
        Self { user, view }
    }

    /// Cache key holding this session's page state: `{user}{view_suffix}`
    pub fn cache_key(&self) -> String {
        format!("{}{}", self.user, self.view.cache_suffix())
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_composition() {
        let key = SessionKey::new(UserId::new("alice"), ViewKind::Basket);
        assert_eq!(key.cache_key(), "alice:basket");

        let key = SessionKey::new(UserId::new("alice"), ViewKind::Catalog);
        assert_eq!(key.cache_key(), "alice:product");
    }

    #[test]
    fn test_views_have_distinct_keys() {
        let user = UserId::new("bob");
        let keys: std::collections::HashSet<String> = ViewKind::ALL
            .into_iter()
            .map(|view| SessionKey::new(user.clone(), view).cache_key())
            .collect();
        assert_eq!(keys.len(), ViewKind::ALL.len());
    }

    #[test]
    fn test_slug_lookup() {
        for view in ViewKind::ALL {
            assert_eq!(ViewKind::from_slug(view.slug()), Some(view));
        }
        assert_eq!(ViewKind::from_slug("nope"), None);
    }
}
