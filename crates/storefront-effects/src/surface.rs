//! Console messaging surface
//!
//! Stands in for a chat when the bot runs in a terminal. Each message gets an
//! increasing handle, edits and deletes of unknown handles fail with
//! `NotFound` like a real chat does once a user removes a message, and every
//! operation is printed as one line.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use storefront_core::effects::{SurfaceEffects, SurfaceError};
use storefront_core::{CallbackId, CardHandle, CardPayload, ChatId, ControlPayload, Keyboard};
use tokio::sync::Mutex;

/// What a live message is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// Product card
    Card(CardPayload),
    /// Navigation control
    Control(ControlPayload),
    /// Plain text reply
    Text(String),
}

#[derive(Debug, Default)]
struct ConsoleState {
    next_handle: i64,
    live: BTreeMap<CardHandle, (ChatId, MessageKind)>,
    transcript: Vec<String>,
}

/// Terminal-backed surface
#[derive(Debug, Clone)]
pub struct ConsoleSurfaceHandler {
    state: Arc<Mutex<ConsoleState>>,
    echo: bool,
}

impl Default for ConsoleSurfaceHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSurfaceHandler {
    /// Surface printing to stdout
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            echo: true,
        }
    }

    /// Surface that only records its transcript
    pub fn silent() -> Self {
        Self {
            state: Arc::default(),
            echo: false,
        }
    }

    /// Every line printed so far
    pub async fn transcript(&self) -> Vec<String> {
        self.state.lock().await.transcript.clone()
    }

    /// Messages currently shown in `chat`, oldest first
    pub async fn live_messages(&self, chat: ChatId) -> Vec<(CardHandle, MessageKind)> {
        let state = self.state.lock().await;
        state
            .live
            .iter()
            .filter(|(_, (c, _))| *c == chat)
            .map(|(h, (_, kind))| (*h, kind.clone()))
            .collect()
    }

    fn emit(&self, state: &mut ConsoleState, line: String) -> Result<(), SurfaceError> {
        if self.echo {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{line}").map_err(|e| SurfaceError::Unavailable {
                reason: e.to_string(),
            })?;
        }
        state.transcript.push(line);
        Ok(())
    }

    fn post(
        &self,
        state: &mut ConsoleState,
        chat: ChatId,
        kind: MessageKind,
    ) -> Result<CardHandle, SurfaceError> {
        state.next_handle += 1;
        let handle = CardHandle(state.next_handle);
        let line = format!("[{chat} {handle}] + {}", describe(&kind));
        self.emit(state, line)?;
        state.live.insert(handle, (chat, kind));
        Ok(handle)
    }

    fn replace(
        &self,
        state: &mut ConsoleState,
        chat: ChatId,
        handle: CardHandle,
        kind: MessageKind,
    ) -> Result<(), SurfaceError> {
        match state.live.get(&handle) {
            Some((owner, _)) if *owner == chat => {}
            _ => return Err(SurfaceError::NotFound { handle }),
        }
        let line = format!("[{chat} {handle}] ~ {}", describe(&kind));
        self.emit(state, line)?;
        state.live.insert(handle, (chat, kind));
        Ok(())
    }
}

fn describe(kind: &MessageKind) -> String {
    match kind {
        MessageKind::Card(card) => format!(
            "({}) {}{}",
            card.media.as_str(),
            card.caption.replace('\n', " / "),
            buttons(&card.keyboard)
        ),
        MessageKind::Control(control) => {
            format!("{}{}", control.text, buttons(&control.keyboard))
        }
        MessageKind::Text(text) => text.clone(),
    }
}

fn buttons(keyboard: &Keyboard) -> String {
    if keyboard.is_empty() {
        return String::new();
    }
    let labels: Vec<String> = keyboard
        .buttons()
        .map(|b| format!("[{}]", b.text))
        .collect();
    format!(" {}", labels.join(" "))
}

#[async_trait]
impl SurfaceEffects for ConsoleSurfaceHandler {
    async fn create_card(
        &self,
        chat: ChatId,
        payload: &CardPayload,
    ) -> Result<CardHandle, SurfaceError> {
        let mut state = self.state.lock().await;
        self.post(&mut state, chat, MessageKind::Card(payload.clone()))
    }

    async fn edit_card(
        &self,
        chat: ChatId,
        handle: CardHandle,
        payload: &CardPayload,
    ) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().await;
        self.replace(&mut state, chat, handle, MessageKind::Card(payload.clone()))
    }

    async fn delete_card(&self, chat: ChatId, handle: CardHandle) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().await;
        match state.live.get(&handle) {
            Some((owner, _)) if *owner == chat => {}
            _ => return Err(SurfaceError::NotFound { handle }),
        }
        state.live.remove(&handle);
        self.emit(&mut state, format!("[{chat} {handle}] -"))
    }

    async fn create_control(
        &self,
        chat: ChatId,
        payload: &ControlPayload,
    ) -> Result<CardHandle, SurfaceError> {
        let mut state = self.state.lock().await;
        self.post(&mut state, chat, MessageKind::Control(payload.clone()))
    }

    async fn edit_control(
        &self,
        chat: ChatId,
        handle: CardHandle,
        payload: &ControlPayload,
    ) -> Result<CardHandle, SurfaceError> {
        let mut state = self.state.lock().await;
        self.replace(&mut state, chat, handle, MessageKind::Control(payload.clone()))?;
        Ok(handle)
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<CardHandle, SurfaceError> {
        let mut state = self.state.lock().await;
        let mut body = text.to_string();
        if let Some(keyboard) = keyboard {
            body.push_str(&buttons(keyboard));
        }
        self.post(&mut state, chat, MessageKind::Text(body))
    }

    async fn answer_callback(
        &self,
        callback: &CallbackId,
        text: &str,
        alert: bool,
    ) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().await;
        let marker = if alert { "!" } else { "*" };
        self.emit(&mut state, format!("[{callback}] {marker} {text}"))
    }
}
