//! # Storefront View - Live-View Pagination & Reconciliation
//!
//! Keeps a paginated virtual list of items (catalog, basket, search results)
//! synchronized with the cards actually rendered in a chat.
//!
//! # Architecture
//!
//! - [`PageState`] / [`PageStateStore`]: per-session view state persisted through `CacheEffects`
//! - [`CardRenderer`]: pure item → card payload mapping
//! - [`reconcile`]: positional alignment of rendered cards with the next page and the
//!   resulting edit / delete / create plan
//! - [`ViewController`]: loads state, plans, executes the plan against `SurfaceEffects`
//!   and writes the state back
//!
//! The chat surface can only be changed one message at a time and has no
//! transactions, so the controller always persists whatever state the executed
//! operations produced. A later navigation repairs anything a failure left behind.
//!
//! # Usage
//!
//! ```ignore
//! let controller = ViewController::new(&config, resolver);
//! controller.start_browsing(&effects, &key, chat, pages, CardVariant::OfferAdd).await?;
//! controller.navigate(&effects, &key, Direction::Forward).await?;
//! ```

#![forbid(unsafe_code)]

pub mod controller;
pub mod error;
pub mod page_state;
pub mod reconcile;
pub mod render;

pub use controller::{NavigationReport, StartReport, ViewController};
pub use error::{SurfaceOp, ViewError};
pub use page_state::{PageState, PageStateStore, Slot};
pub use reconcile::{align, plan_navigation, plan_page, Alignment, CardOp, ControlUpdate, ReconcilePlan};
pub use render::CardRenderer;
