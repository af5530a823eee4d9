//! Storefront Testing Infrastructure
//!
//! Mocks, fixtures and proptest strategies shared by the storefront crates'
//! tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! storefront-testkit = { path = "../storefront-testkit" }
//! ```
//!
//! ```rust,ignore
//! use storefront_testkit::*;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let effects = MockEffects::with_items(sample_catalog());
//!     // ... drive a controller or router with &effects
//!     assert_eq!(effects.surface().live_cards(test_chat()).len(), 3);
//! }
//! ```

pub mod fixtures;
pub mod media;
pub mod mock_effects;
pub mod mock_surface;
pub mod strategies;

pub use fixtures::*;
pub use media::StaticMediaResolver;
pub use mock_effects::MockEffects;
pub use mock_surface::{CallKind, MockSurface, SurfaceCall};
