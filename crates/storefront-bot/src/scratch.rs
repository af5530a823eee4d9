//! Scratch-message ledger
//!
//! Prompts, "nothing found" replies and the user's own search text only make
//! sense until the next command. They are recorded per user and deleted in
//! one sweep when another command arrives.

use serde::{Deserialize, Serialize};
use storefront_core::effects::{CacheEffects, SurfaceEffects};
use storefront_core::{CardHandle, ChatId, StorefrontError, UserId};

const SCRATCH_SUFFIX: &str = ":scratch";

/// A transient message awaiting deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScratchMessage {
    /// Chat holding the message
    pub chat: ChatId,
    /// The message
    pub handle: CardHandle,
}

/// Cache-backed list of transient messages per user
#[derive(Debug, Clone, Copy, Default)]
pub struct ScratchLedger;

impl ScratchLedger {
    fn key(user: &UserId) -> String {
        format!("{user}{SCRATCH_SUFFIX}")
    }

    /// Messages currently tracked for `user`
    pub async fn tracked<C>(cache: &C, user: &UserId) -> Result<Vec<ScratchMessage>, StorefrontError>
    where
        C: CacheEffects + ?Sized,
    {
        let Some(raw) = cache.get(&Self::key(user)).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice(&raw) {
            Ok(messages) => Ok(messages),
            Err(e) => {
                tracing::warn!(%user, error = %e, "dropping unreadable scratch ledger");
                Ok(Vec::new())
            }
        }
    }

    /// Record `handle` as transient
    pub async fn track<C>(
        cache: &C,
        user: &UserId,
        chat: ChatId,
        handle: CardHandle,
    ) -> Result<(), StorefrontError>
    where
        C: CacheEffects + ?Sized,
    {
        let mut messages = Self::tracked(cache, user).await?;
        messages.push(ScratchMessage { chat, handle });
        cache
            .set(&Self::key(user), serde_json::to_vec(&messages)?)
            .await?;
        Ok(())
    }

    /// Delete every tracked message and empty the ledger; returns how many
    /// messages are gone, counting ones the user already removed
    pub async fn flush<E>(effects: &E, user: &UserId) -> Result<usize, StorefrontError>
    where
        E: CacheEffects + SurfaceEffects + ?Sized,
    {
        let messages = Self::tracked(effects, user).await?;
        if messages.is_empty() {
            return Ok(0);
        }

        let mut gone = 0;
        for ScratchMessage { chat, handle } in messages {
            match effects.delete_card(chat, handle).await {
                Ok(()) => gone += 1,
                Err(e) if e.is_not_found() => gone += 1,
                Err(e) => tracing::warn!(%user, %handle, error = %e, "scratch message not removed"),
            }
        }
        effects.remove(&Self::key(user)).await?;
        tracing::debug!(%user, gone, "scratch messages flushed");
        Ok(gone)
    }
}
