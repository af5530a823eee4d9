//! Layer 1: Core Effect Trait Definitions
//!
//! Pure trait definitions for every side effect the storefront performs.
//! This module defines **what** effects can be performed; handlers define **how**.
//!
//! # Effect Classification
//!
//! - **Cache**: session-scoped key/value state with no cross-key transactions
//! - **Surface**: the append-only, edit-and-delete-capable chat surface
//! - **Catalog**: products, users and baskets (read-mostly from the view engine)
//! - **Media**: resolving item pictures for the card renderer
//!
//! All effect-using code is parameterized by these traits, so the same
//! controller runs against in-memory handlers, the console surface, or mocks.

pub mod cache;
pub mod catalog;
pub mod media;
pub mod surface;

pub use cache::{CacheEffects, CacheError};
pub use catalog::{BasketChange, CatalogEffects, CatalogError, CatalogScope, UserProfile};
pub use media::{MediaResolver, RenderError};
pub use surface::{SurfaceEffects, SurfaceError};
