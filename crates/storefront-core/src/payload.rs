//! Payloads sent to the messaging surface.
//!
//! A [`CardPayload`] is everything needed to create or edit one product card;
//! a [`ControlPayload`] is the "page N / M" navigation message. Both are plain
//! values so the view engine can recompute and compare them freely.

use serde::{Deserialize, Serialize};

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Button {
    /// Label shown to the user
    pub text: String,
    /// Data delivered back to the bot when pressed
    pub callback_data: String,
}

impl Button {
    /// Create a button
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Inline keyboard laid out as rows of buttons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Keyboard {
    /// Button rows, top to bottom
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// A keyboard with no buttons
    pub fn empty() -> Self {
        Self::default()
    }

    /// A keyboard with a single row
    pub fn single_row(row: Vec<Button>) -> Self {
        Self { rows: vec![row] }
    }

    /// Whether the keyboard has no buttons at all
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    /// Iterate every button, row by row
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// Media reference after resolution against the media root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedMedia(pub String);

impl ResolvedMedia {
    /// Borrow the resolved location
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Renderable product card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardPayload {
    /// Picture shown on the card
    pub media: ResolvedMedia,
    /// HTML caption
    pub caption: String,
    /// Action buttons
    pub keyboard: Keyboard,
}

/// The single navigation message below a page of cards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlPayload {
    /// Message text
    pub text: String,
    /// Navigation buttons
    pub keyboard: Keyboard,
}
