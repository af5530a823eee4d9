//! Per-session page state and its cache-backed store.

use crate::error::ViewError;
use serde::{Deserialize, Serialize};
use storefront_core::effects::CacheEffects;
use storefront_core::{CardHandle, CardVariant, ChatId, Direction, Item, SessionKey};

/// One rendered position: a live card, or nothing.
pub type Slot = Option<CardHandle>;

/// The persisted state of one browsing session.
///
/// `pages` is fixed when the session starts. Only the cursor, the rendered
/// slots and the control handle change afterwards, and only through the
/// view controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    chat: ChatId,
    variant: CardVariant,
    page_size: usize,
    pages: Vec<Vec<Item>>,
    current_page: usize,
    rendered_cards: Vec<Slot>,
    summary_handle: Option<CardHandle>,
}

impl PageState {
    /// Fresh state positioned on the first page with nothing rendered yet
    pub fn new(chat: ChatId, pages: Vec<Vec<Item>>, variant: CardVariant) -> Result<Self, ViewError> {
        if pages.iter().all(Vec::is_empty) {
            return Err(ViewError::NothingToShow);
        }
        let page_size = pages.iter().map(Vec::len).max().unwrap_or_default();
        Ok(Self {
            chat,
            variant,
            page_size,
            pages,
            current_page: 0,
            rendered_cards: Vec::new(),
            summary_handle: None,
        })
    }

    /// Chat the cards live in
    pub fn chat(&self) -> ChatId {
        self.chat
    }

    /// Action button variant used for every card of this session
    pub fn variant(&self) -> CardVariant {
        self.variant
    }

    /// Widest page of the session
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Zero-based cursor
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Items of page `index`
    pub fn page(&self, index: usize) -> Option<&[Item]> {
        self.pages.get(index).map(Vec::as_slice)
    }

    /// Items of the page under the cursor
    pub fn current_items(&self) -> &[Item] {
        self.page(self.current_page).unwrap_or_default()
    }

    /// Rendered slots, aligned with the items of the page last rendered
    pub fn rendered_cards(&self) -> &[Slot] {
        &self.rendered_cards
    }

    /// Live card handles, in slot order
    pub fn live_handles(&self) -> impl Iterator<Item = CardHandle> + '_ {
        self.rendered_cards.iter().flatten().copied()
    }

    /// Handle of the navigation control, if one exists
    pub fn summary_handle(&self) -> Option<CardHandle> {
        self.summary_handle
    }

    /// Page reached by moving one step in `direction`, if it exists
    pub fn target_page(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Forward if self.current_page + 1 < self.pages.len() => {
                Some(self.current_page + 1)
            }
            Direction::Backward if self.current_page > 0 => Some(self.current_page - 1),
            _ => None,
        }
    }

    /// Move the cursor and replace the rendered slots in one step
    ///
    /// `rendered_cards` must be aligned with `page`; a mismatched length is
    /// padded with empty slots or truncated so the alignment invariant holds.
    pub(crate) fn commit(&mut self, page: usize, mut rendered_cards: Vec<Slot>) {
        let width = self.page(page).map_or(0, <[Item]>::len);
        rendered_cards.resize(width, None);
        self.current_page = page;
        self.rendered_cards = rendered_cards;
    }

    pub(crate) fn set_summary_handle(&mut self, handle: Option<CardHandle>) {
        self.summary_handle = handle;
    }

    /// Structural checks applied to state read back from the cache
    pub fn is_consistent(&self) -> bool {
        if self.current_page >= self.pages.len() {
            return false;
        }
        if self.rendered_cards.len() > self.page_size {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        self.live_handles().all(|handle| seen.insert(handle))
            && self.summary_handle.map_or(true, |h| !seen.contains(&h))
    }
}

/// Pass-through persistence for [`PageState`].
///
/// Stateless; every call takes the cache effect it should use. There is no
/// compare-and-swap, so load → mutate → save is best effort.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageStateStore;

impl PageStateStore {
    /// Load the state of `key`
    ///
    /// Corrupt or inconsistent entries read as absent so the user can simply
    /// start browsing again.
    pub async fn load<C>(cache: &C, key: &SessionKey) -> Result<Option<PageState>, ViewError>
    where
        C: CacheEffects + ?Sized,
    {
        let cache_key = key.cache_key();
        let Some(raw) = cache.get(&cache_key).await? else {
            return Ok(None);
        };

        match serde_json::from_slice::<PageState>(&raw) {
            Ok(state) if state.is_consistent() => Ok(Some(state)),
            Ok(_) => {
                tracing::warn!(session = %key, "discarding inconsistent page state");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(session = %key, error = %e, "discarding corrupt page state");
                Ok(None)
            }
        }
    }

    /// Persist `state` under `key`, replacing whatever was there
    pub async fn save<C>(cache: &C, key: &SessionKey, state: &PageState) -> Result<(), ViewError>
    where
        C: CacheEffects + ?Sized,
    {
        let data = serde_json::to_vec(state).map_err(|e| ViewError::Encode {
            message: e.to_string(),
        })?;
        cache.set(&key.cache_key(), data).await?;
        Ok(())
    }

    /// Forget the state of `key`; returns whether one existed
    pub async fn discard<C>(cache: &C, key: &SessionKey) -> Result<bool, ViewError>
    where
        C: CacheEffects + ?Sized,
    {
        Ok(cache.remove(&key.cache_key()).await?)
    }
}
