//! Search prompt state
//!
//! `/find` arms the prompt; the next plain text from the same user is taken
//! as the query. Any command disarms it.

use serde::{Deserialize, Serialize};
use storefront_core::effects::CacheEffects;
use storefront_core::{ChatId, StorefrontError, UserId};

const PROMPT_SUFFIX: &str = ":search_prompt";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Armed {
    chat: ChatId,
}

/// Cache-backed "awaiting search query" flag per user
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchPrompt;

impl SearchPrompt {
    fn key(user: &UserId) -> String {
        format!("{user}{PROMPT_SUFFIX}")
    }

    /// Wait for a query from `user` in `chat`
    pub async fn arm<C>(cache: &C, user: &UserId, chat: ChatId) -> Result<(), StorefrontError>
    where
        C: CacheEffects + ?Sized,
    {
        cache
            .set(&Self::key(user), serde_json::to_vec(&Armed { chat })?)
            .await?;
        Ok(())
    }

    /// Whether a query from `user` in `chat` is awaited; disarms the prompt if so
    pub async fn take<C>(cache: &C, user: &UserId, chat: ChatId) -> Result<bool, StorefrontError>
    where
        C: CacheEffects + ?Sized,
    {
        let key = Self::key(user);
        let Some(raw) = cache.get(&key).await? else {
            return Ok(false);
        };
        let armed_here = serde_json::from_slice::<Armed>(&raw).is_ok_and(|a| a.chat == chat);
        if armed_here {
            cache.remove(&key).await?;
        }
        Ok(armed_here)
    }

    /// Stop waiting; returns whether a prompt was armed
    pub async fn cancel<C>(cache: &C, user: &UserId) -> Result<bool, StorefrontError>
    where
        C: CacheEffects + ?Sized,
    {
        Ok(cache.remove(&Self::key(user)).await?)
    }
}
