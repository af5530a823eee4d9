//! # Storefront Bot - Layer 5: Command Layer
//!
//! Turns incoming chat updates into catalog queries, basket changes and
//! browsing sessions driven by `storefront-view`.
//!
//! - [`Update`] / [`Command`]: what arrives from the chat
//! - [`StorefrontBot`]: routing of commands, free text and button presses
//! - [`ScratchLedger`]: transient messages removed when the next command runs
//! - [`SearchPrompt`]: the "what are you looking for?" waiting state
//!
//! Like every handler in the workspace, the bot holds no effect handlers
//! itself; each call receives the effects it should use.

#![forbid(unsafe_code)]

pub mod prompt;
pub mod replies;
pub mod router;
pub mod scratch;
pub mod update;

pub use prompt::SearchPrompt;
pub use router::{Outcome, StorefrontBot};
pub use scratch::ScratchLedger;
pub use update::{Command, Update};
