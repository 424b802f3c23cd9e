use eyre::Result;
use tracing::{debug, warn};

use super::conversation_state::{Entry, Message, RenderedMessage, Sender};
use super::surface::{InputControl, MessageSurface};
use crate::chat_client::ChatTransport;
use crate::error::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was rendered or sent.
    Skipped,
    Replied,
    Failed(String),
}

/// Mediates between the input control, one request to the chat endpoint and
/// the rendered message list.
///
/// `submit` borrows the widget mutably for the whole exchange, so a second
/// request cannot start while one is in flight.
pub struct ChatWidget<S, I, T> {
    surface: S,
    input: I,
    transport: T,
    greeting: String,
    suggestions: Vec<String>,
    state: WidgetState,
}

impl<S, I, T> ChatWidget<S, I, T>
where
    S: MessageSurface,
    I: InputControl,
    T: ChatTransport,
{
    pub fn new(surface: S, input: I, transport: T, greeting: String, suggestions: Vec<String>) -> Self {
        Self {
            surface,
            input,
            transport,
            greeting,
            suggestions,
            state: WidgetState::Idle,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Clears the message list and shows the greeting.
    pub fn initialize(&mut self) -> Result<()> {
        self.surface.clear()?;
        let greeting = self.greeting.clone();
        self.render_message(&greeting, Sender::Bot)?;
        self.state = WidgetState::Idle;
        Ok(())
    }

    pub fn render_message(&mut self, text: &str, sender: Sender) -> Result<()> {
        let rendered = RenderedMessage::render(Message::new(text, sender));
        self.surface.append(Entry::Message(rendered))?;
        self.surface.scroll_to_latest()
    }

    pub fn show_loading(&mut self) -> Result<()> {
        self.surface.append(Entry::Loading)?;
        self.surface.scroll_to_latest()
    }

    pub fn hide_loading(&mut self) -> Result<()> {
        if !self.surface.remove_first_loading()? {
            debug!("No loading placeholder to remove");
        }
        Ok(())
    }

    /// Sends `text` and renders the reply. The input is re-enabled on every
    /// path, including surface errors.
    pub async fn submit(&mut self, text: &str) -> Result<SubmitOutcome> {
        if text.trim().is_empty() {
            return Ok(SubmitOutcome::Skipped);
        }

        self.input.set_disabled(true);
        self.state = WidgetState::AwaitingResponse;

        let outcome = self.exchange(text).await;

        self.input.set_disabled(false);
        self.state = WidgetState::Idle;

        if let Ok(SubmitOutcome::Replied) = outcome {
            self.input.clear();
            self.input.focus();
        }
        outcome
    }

    /// Fills the input with the numbered suggestion (1-based) and submits it.
    pub async fn activate_suggestion(&mut self, number: usize) -> Result<SubmitOutcome> {
        let suggestion = number
            .checked_sub(1)
            .and_then(|index| self.suggestions.get(index))
            .cloned()
            .ok_or(ChatError::UnknownSuggestion(number))?;

        self.input.set_value(&suggestion);
        self.submit(&suggestion).await
    }

    async fn exchange(&mut self, text: &str) -> Result<SubmitOutcome> {
        self.render_message(text, Sender::User)?;
        self.show_loading()?;

        let reply = self.transport.send(text).await;
        if let Err(e) = self.hide_loading() {
            warn!("Failed to remove loading indicator: {}", e);
        }

        match reply {
            Ok(reply) => {
                self.render_message(&reply, Sender::Bot)?;
                Ok(SubmitOutcome::Replied)
            }
            Err(err) => {
                warn!("Chat request failed: {}", err);
                let reason = err.reason().to_string();
                self.render_message(&format!("Error: {}", reason), Sender::Bot)?;
                Ok(SubmitOutcome::Failed(reason))
            }
        }
    }
}
