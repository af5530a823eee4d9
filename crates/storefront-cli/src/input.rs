//! Terminal lines to chat updates
//!
//! A line starting with `!` is a button press carrying the rest of the line as
//! callback data; anything else is a message typed into the chat.

use storefront_bot::Update;
use storefront_core::effects::UserProfile;
use storefront_core::{CallbackId, ChatId};

/// Who is typing and where
#[derive(Debug, Clone)]
pub struct Session {
    pub profile: UserProfile,
    pub chat: ChatId,
    presses: u64,
}

impl Session {
    pub fn new(profile: UserProfile, chat: ChatId) -> Self {
        Self {
            profile,
            chat,
            presses: 0,
        }
    }

    /// Turn one input line into an update; blank lines produce nothing
    pub fn update_for(&mut self, line: &str) -> Option<Update> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if let Some(data) = line.strip_prefix('!') {
            self.presses += 1;
            return Some(Update::Callback {
                from: self.profile.user.clone(),
                chat: self.chat,
                callback: CallbackId(format!("press-{}", self.presses)),
                data: data.trim().to_string(),
            });
        }
        Some(Update::Message {
            from: self.profile.clone(),
            chat: self.chat,
            message: None,
            text: line.to_string(),
        })
    }
}
