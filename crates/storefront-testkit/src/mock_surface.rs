//! Recording messaging surface with scripted failures
//!
//! # Blocking Lock Usage
//!
//! Uses `std::sync::Mutex`: this is test infrastructure, no lock is held
//! across an await, and a synchronous inspection API keeps assertions short.

#![allow(clippy::disallowed_types)]

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use storefront_core::effects::{SurfaceEffects, SurfaceError};
use storefront_core::{CallbackId, CardHandle, CardPayload, ChatId, ControlPayload, Keyboard};
use storefront_effects::MessageKind;

/// Surface operation kind, used to script failures and filter the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `create_card`
    CreateCard,
    /// `edit_card`
    EditCard,
    /// `delete_card`
    DeleteCard,
    /// `create_control`
    CreateControl,
    /// `edit_control`
    EditControl,
    /// `send_text`
    SendText,
    /// `answer_callback`
    AnswerCallback,
}

/// One attempted surface call, successful or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    /// A card was posted (`handle` is `None` if the call failed)
    CreateCard {
        /// Target chat
        chat: ChatId,
        /// Assigned handle
        handle: Option<CardHandle>,
        /// Content
        payload: CardPayload,
    },
    /// A card was edited
    EditCard {
        /// Target chat
        chat: ChatId,
        /// Edited card
        handle: CardHandle,
        /// New content
        payload: CardPayload,
    },
    /// A message was deleted
    DeleteCard {
        /// Target chat
        chat: ChatId,
        /// Deleted message
        handle: CardHandle,
    },
    /// A control was posted
    CreateControl {
        /// Target chat
        chat: ChatId,
        /// Assigned handle
        handle: Option<CardHandle>,
        /// Content
        payload: ControlPayload,
    },
    /// A control was edited
    EditControl {
        /// Target chat
        chat: ChatId,
        /// Edited control
        handle: CardHandle,
        /// New content
        payload: ControlPayload,
    },
    /// A text reply was posted
    SendText {
        /// Target chat
        chat: ChatId,
        /// Assigned handle
        handle: Option<CardHandle>,
        /// Body
        text: String,
    },
    /// A button press was acknowledged
    AnswerCallback {
        /// Acknowledged callback
        callback: CallbackId,
        /// Notification text
        text: String,
        /// Shown as an alert
        alert: bool,
    },
}

impl SurfaceCall {
    /// Kind of the call
    pub fn kind(&self) -> CallKind {
        match self {
            SurfaceCall::CreateCard { .. } => CallKind::CreateCard,
            SurfaceCall::EditCard { .. } => CallKind::EditCard,
            SurfaceCall::DeleteCard { .. } => CallKind::DeleteCard,
            SurfaceCall::CreateControl { .. } => CallKind::CreateControl,
            SurfaceCall::EditControl { .. } => CallKind::EditControl,
            SurfaceCall::SendText { .. } => CallKind::SendText,
            SurfaceCall::AnswerCallback { .. } => CallKind::AnswerCallback,
        }
    }
}

#[derive(Debug)]
struct ScriptedFailure {
    kind: CallKind,
    handle: Option<CardHandle>,
    error: SurfaceError,
}

#[derive(Debug, Default)]
struct SurfaceState {
    next_handle: i64,
    journal: Vec<SurfaceCall>,
    live: BTreeMap<CardHandle, (ChatId, MessageKind)>,
    failures: VecDeque<ScriptedFailure>,
}

impl SurfaceState {
    fn scripted(&mut self, kind: CallKind, handle: Option<CardHandle>) -> Option<SurfaceError> {
        let index = self.failures.iter().position(|f| {
            f.kind == kind && (f.handle.is_none() || f.handle == handle)
        })?;
        self.failures.remove(index).map(|f| f.error)
    }

    fn allocate(&mut self) -> CardHandle {
        self.next_handle += 1;
        CardHandle(self.next_handle)
    }

    fn check_live(&self, chat: ChatId, handle: CardHandle) -> Result<(), SurfaceError> {
        match self.live.get(&handle) {
            Some((owner, _)) if *owner == chat => Ok(()),
            _ => Err(SurfaceError::NotFound { handle }),
        }
    }
}

/// In-memory surface that journals every call
#[derive(Debug, Clone, Default)]
pub struct MockSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl MockSurface {
    /// Create an empty surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `kind` fail with `error`
    pub fn fail_next(&self, kind: CallKind, error: SurfaceError) {
        self.state.lock().unwrap().failures.push_back(ScriptedFailure {
            kind,
            handle: None,
            error,
        });
    }

    /// Make the next call of `kind` targeting `handle` fail with `error`
    pub fn fail_on(&self, kind: CallKind, handle: CardHandle, error: SurfaceError) {
        self.state.lock().unwrap().failures.push_back(ScriptedFailure {
            kind,
            handle: Some(handle),
            error,
        });
    }

    /// Remove a message behind the bot's back, as a user deleting it would
    pub fn forget(&self, handle: CardHandle) -> bool {
        self.state.lock().unwrap().live.remove(&handle).is_some()
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.state.lock().unwrap().journal.clone()
    }

    /// Kinds of every call so far, in order
    pub fn kinds(&self) -> Vec<CallKind> {
        self.calls().iter().map(SurfaceCall::kind).collect()
    }

    /// Number of calls of `kind`
    pub fn count(&self, kind: CallKind) -> usize {
        self.calls().iter().filter(|c| c.kind() == kind).count()
    }

    /// Forget the journal, keeping live messages
    pub fn clear_journal(&self) {
        self.state.lock().unwrap().journal.clear();
    }

    /// Live product cards in `chat`, oldest first
    pub fn live_cards(&self, chat: ChatId) -> Vec<(CardHandle, CardPayload)> {
        let state = self.state.lock().unwrap();
        state
            .live
            .iter()
            .filter_map(|(handle, (owner, kind))| match kind {
                MessageKind::Card(card) if *owner == chat => Some((*handle, card.clone())),
                _ => None,
            })
            .collect()
    }

    /// Live navigation controls in `chat`
    pub fn live_controls(&self, chat: ChatId) -> Vec<(CardHandle, ControlPayload)> {
        let state = self.state.lock().unwrap();
        state
            .live
            .iter()
            .filter_map(|(handle, (owner, kind))| match kind {
                MessageKind::Control(control) if *owner == chat => {
                    Some((*handle, control.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Live text messages in `chat`
    pub fn live_texts(&self, chat: ChatId) -> Vec<(CardHandle, String)> {
        let state = self.state.lock().unwrap();
        state
            .live
            .iter()
            .filter_map(|(handle, (owner, kind))| match kind {
                MessageKind::Text(text) if *owner == chat => Some((*handle, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Whether `handle` is currently shown
    pub fn is_live(&self, handle: CardHandle) -> bool {
        self.state.lock().unwrap().live.contains_key(&handle)
    }

    /// Texts of every text message sent so far, deleted or not
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::SendText { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Texts of every callback answer so far
    pub fn answers(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::AnswerCallback { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SurfaceEffects for MockSurface {
    async fn create_card(
        &self,
        chat: ChatId,
        payload: &CardPayload,
    ) -> Result<CardHandle, SurfaceError> {
        let mut state = self.state.lock().unwrap();
        let result = match state.scripted(CallKind::CreateCard, None) {
            Some(error) => Err(error),
            None => {
                let handle = state.allocate();
                state
                    .live
                    .insert(handle, (chat, MessageKind::Card(payload.clone())));
                Ok(handle)
            }
        };
        state.journal.push(SurfaceCall::CreateCard {
            chat,
            handle: result.as_ref().ok().copied(),
            payload: payload.clone(),
        });
        result
    }

    async fn edit_card(
        &self,
        chat: ChatId,
        handle: CardHandle,
        payload: &CardPayload,
    ) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap();
        state.journal.push(SurfaceCall::EditCard {
            chat,
            handle,
            payload: payload.clone(),
        });
        if let Some(error) = state.scripted(CallKind::EditCard, Some(handle)) {
            return Err(error);
        }
        state.check_live(chat, handle)?;
        state
            .live
            .insert(handle, (chat, MessageKind::Card(payload.clone())));
        Ok(())
    }

    async fn delete_card(&self, chat: ChatId, handle: CardHandle) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap();
        state.journal.push(SurfaceCall::DeleteCard { chat, handle });
        if let Some(error) = state.scripted(CallKind::DeleteCard, Some(handle)) {
            return Err(error);
        }
        state.check_live(chat, handle)?;
        state.live.remove(&handle);
        Ok(())
    }

    async fn create_control(
        &self,
        chat: ChatId,
        payload: &ControlPayload,
    ) -> Result<CardHandle, SurfaceError> {
        let mut state = self.state.lock().unwrap();
        let result = match state.scripted(CallKind::CreateControl, None) {
            Some(error) => Err(error),
            None => {
                let handle = state.allocate();
                state
                    .live
                    .insert(handle, (chat, MessageKind::Control(payload.clone())));
                Ok(handle)
            }
        };
        state.journal.push(SurfaceCall::CreateControl {
            chat,
            handle: result.as_ref().ok().copied(),
            payload: payload.clone(),
        });
        result
    }

    async fn edit_control(
        &self,
        chat: ChatId,
        handle: CardHandle,
        payload: &ControlPayload,
    ) -> Result<CardHandle, SurfaceError> {
        let mut state = self.state.lock().unwrap();
        state.journal.push(SurfaceCall::EditControl {
            chat,
            handle,
            payload: payload.clone(),
        });
        if let Some(error) = state.scripted(CallKind::EditControl, Some(handle)) {
            return Err(error);
        }
        state.check_live(chat, handle)?;
        state
            .live
            .insert(handle, (chat, MessageKind::Control(payload.clone())));
        Ok(handle)
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        _keyboard: Option<&Keyboard>,
    ) -> Result<CardHandle, SurfaceError> {
        let mut state = self.state.lock().unwrap();
        let result = match state.scripted(CallKind::SendText, None) {
            Some(error) => Err(error),
            None => {
                let handle = state.allocate();
                state
                    .live
                    .insert(handle, (chat, MessageKind::Text(text.to_string())));
                Ok(handle)
            }
        };
        state.journal.push(SurfaceCall::SendText {
            chat,
            handle: result.as_ref().ok().copied(),
            text: text.to_string(),
        });
        result
    }

    async fn answer_callback(
        &self,
        callback: &CallbackId,
        text: &str,
        alert: bool,
    ) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap();
        state.journal.push(SurfaceCall::AnswerCallback {
            callback: callback.clone(),
            text: text.to_string(),
            alert,
        });
        match state.scripted(CallKind::AnswerCallback, None) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
