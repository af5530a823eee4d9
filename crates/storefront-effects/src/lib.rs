//! Storefront Effects - Layer 3: Handlers
//!
//! Implementations of the effect traits defined in `storefront-core`:
//!
//! - [`MemoryCacheHandler`]: key/value session cache with optional expiry
//! - [`MemoryCatalogHandler`]: products, users and baskets, seeded from TOML
//! - [`ConsoleSurfaceHandler`]: a chat surface that prints to the terminal
//! - [`FilesystemMediaResolver`]: item pictures under a media root
//!
//! **Layer Constraint**: no mock handlers here; those belong in `storefront-testkit`.

#![forbid(unsafe_code)]

pub mod cache;
pub mod catalog;
pub mod media;
pub mod surface;

pub use cache::MemoryCacheHandler;
pub use catalog::{CatalogSeed, MemoryCatalogHandler};
pub use media::FilesystemMediaResolver;
pub use surface::{ConsoleSurfaceHandler, MessageKind};
