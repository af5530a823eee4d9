//! Storefront Core - Layer 1: Foundation
//!
//! Pure types and effect interfaces shared by every storefront crate.
//! This crate defines **what** the bot can do to the outside world; handlers
//! in `storefront-effects` and `storefront-testkit` define **how**.
//!
//! # Contents
//!
//! - Identifiers: users, chats, card handles, items, browsing sessions
//! - Catalog items and pagination
//! - Card and navigation-control payloads, keyboards and callback data
//! - Effect traits: `CacheEffects`, `SurfaceEffects`, `CatalogEffects`
//! - Unified error type and configuration
//!
//! # What's NOT in this crate
//!
//! - Effect handlers (belong in `storefront-effects`)
//! - The live-view reconciliation engine (belongs in `storefront-view`)
//! - Command routing (belongs in `storefront-bot`)

#![forbid(unsafe_code)]

/// Browsing session, user, chat and message identifiers
pub mod identifiers;

/// Catalog items and pagination
pub mod item;

/// Renderable card and control payloads
pub mod payload;

/// Callback-data codec for inline buttons
pub mod callback;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Storefront configuration
pub mod config;

pub use callback::CallbackAction;
pub use config::StorefrontConfig;
pub use errors::{Result, StorefrontError};
pub use identifiers::{CallbackId, CardHandle, ChatId, Direction, ItemId, SessionKey, UserId, ViewKind};
pub use item::{paginate, CardVariant, Item, MediaRef};
pub use payload::{Button, CardPayload, ControlPayload, Keyboard, ResolvedMedia};
