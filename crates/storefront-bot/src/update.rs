//! Incoming chat updates

use crate::replies::{MENU_BASKET, MENU_FIND, MENU_PRODUCTS};
use storefront_core::effects::UserProfile;
use storefront_core::{CallbackId, CardHandle, ChatId, UserId};

/// One update delivered by the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// A text message
    Message {
        /// Sender
        from: UserProfile,
        /// Chat it was sent in
        chat: ChatId,
        /// The user's own message, if the surface reports it
        message: Option<CardHandle>,
        /// Text
        text: String,
    },
    /// An inline button press
    Callback {
        /// Presser
        from: UserId,
        /// Chat of the message carrying the button
        chat: ChatId,
        /// Id to acknowledge
        callback: CallbackId,
        /// Button callback data
        data: String,
    },
}

impl Update {
    /// User the update came from
    pub fn user(&self) -> &UserId {
        match self {
            Update::Message { from, .. } => &from.user,
            Update::Callback { from, .. } => from,
        }
    }
}

/// Bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/show_products` or the products menu button
    ShowProducts,
    /// `/basket` or the basket menu button
    Basket,
    /// `/find` or the find menu button
    Find,
    /// Any other slash command
    Unknown(String),
}

impl Command {
    /// Parse a message text; `None` when the text is not a command
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text {
            MENU_PRODUCTS => return Some(Command::ShowProducts),
            MENU_BASKET => return Some(Command::Basket),
            MENU_FIND => return Some(Command::Find),
            _ => {}
        }

        let body = text.strip_prefix('/')?;
        let name = body.split_whitespace().next().unwrap_or_default();
        // `/cmd@botname` addresses a specific bot in group chats.
        let name = name.split('@').next().unwrap_or_default();
        Some(match name {
            "start" => Command::Start,
            "show_products" => Command::ShowProducts,
            "basket" => Command::Basket,
            "find" => Command::Find,
            other => Command::Unknown(other.to_string()),
        })
    }
}
