//! Messaging surface effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `storefront-effects` (console), `storefront-testkit` (mock)
//! - **Usage**: the view controller and the command layer
//!
//! The surface is a chat: new messages always land at the bottom, existing
//! messages can be edited or deleted one at a time, and nothing is atomic
//! across messages.

use crate::identifiers::{CallbackId, CardHandle, ChatId};
use crate::payload::{CardPayload, ControlPayload, Keyboard};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for surface operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum SurfaceError {
    /// The referenced message no longer exists (deleted by the user, expired, ...)
    #[error("Message not found: {handle}")]
    NotFound { handle: CardHandle },
    /// The surface refused the operation
    #[error("Operation rejected: {reason}")]
    Rejected { reason: String },
    /// The surface could not be reached
    #[error("Surface unavailable: {reason}")]
    Unavailable { reason: String },
}

impl SurfaceError {
    /// Whether the error means the target message is gone for good
    pub fn is_not_found(&self) -> bool {
        matches!(self, SurfaceError::NotFound { .. })
    }
}

/// Pure trait for messaging surface operations
#[async_trait]
pub trait SurfaceEffects: Send + Sync {
    /// Post a new product card at the bottom of the chat
    async fn create_card(&self, chat: ChatId, payload: &CardPayload)
        -> Result<CardHandle, SurfaceError>;

    /// Replace the media, caption and buttons of an existing card
    async fn edit_card(
        &self,
        chat: ChatId,
        handle: CardHandle,
        payload: &CardPayload,
    ) -> Result<(), SurfaceError>;

    /// Delete any message (card, control or plain text)
    async fn delete_card(&self, chat: ChatId, handle: CardHandle) -> Result<(), SurfaceError>;

    /// Post a new navigation control at the bottom of the chat
    async fn create_control(
        &self,
        chat: ChatId,
        payload: &ControlPayload,
    ) -> Result<CardHandle, SurfaceError>;

    /// Update the navigation control in place
    async fn edit_control(
        &self,
        chat: ChatId,
        handle: CardHandle,
        payload: &ControlPayload,
    ) -> Result<CardHandle, SurfaceError>;

    /// Post a plain text message, optionally with buttons
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<CardHandle, SurfaceError>;

    /// Acknowledge a button press, optionally showing `text` to the user
    async fn answer_callback(
        &self,
        callback: &CallbackId,
        text: &str,
        alert: bool,
    ) -> Result<(), SurfaceError>;
}
