use std::fmt;

use chrono::Local;
use eyre::Result;

use super::markdown;
use super::surface::MessageSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One chat entry as the user or server wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub timestamp: String,
}

impl Message {
    pub fn new(text: &str, sender: Sender) -> Self {
        Self {
            text: text.to_string(),
            sender,
            timestamp: format_time(),
        }
    }
}

/// A message together with its rendered HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub message: Message,
    pub body: String,
}

impl RenderedMessage {
    pub fn render(message: Message) -> Self {
        let body = markdown::render(&message.text);
        Self { message, body }
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="message message-{}">{}<div class="message-time">{}</div></div>"#,
            self.message.sender, self.body, self.message.timestamp
        )
    }
}

pub const LOADING_HTML: &str = r#"<div class="message message-bot loading-message"><div class="loading-indicator"></div><span class="ms-2">Thinking...</span></div>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(RenderedMessage),
    Loading,
}

impl Entry {
    pub fn is_loading(&self) -> bool {
        matches!(self, Entry::Loading)
    }

    pub fn to_html(&self) -> String {
        match self {
            Entry::Message(message) => message.to_html(),
            Entry::Loading => LOADING_HTML.to_string(),
        }
    }
}

/// Hour and minute in the local time zone, e.g. `09:41 AM`.
pub fn format_time() -> String {
    Local::now().format("%I:%M %p").to_string()
}

/// In-memory message list: an ordered, append-only run of entries. Only the
/// loading placeholder is ever removed.
#[derive(Debug, Default)]
pub struct ConversationView {
    entries: Vec<Entry>,
    scrolled_to: Option<usize>,
}

impl ConversationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(rendered) => Some(&rendered.message),
            Entry::Loading => None,
        })
    }

    pub fn loading_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_loading()).count()
    }

    /// Index of the entry last scrolled into view.
    pub fn scrolled_to(&self) -> Option<usize> {
        self.scrolled_to
    }
}

impl MessageSurface for ConversationView {
    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.scrolled_to = None;
        Ok(())
    }

    fn append(&mut self, entry: Entry) -> Result<()> {
        self.entries.push(entry);
        Ok(())
    }

    fn remove_first_loading(&mut self) -> Result<bool> {
        match self.entries.iter().position(Entry::is_loading) {
            Some(index) => {
                self.entries.remove(index);
                let last = self.entries.len().checked_sub(1);
                self.scrolled_to = self.scrolled_to.zip(last).map(|(i, last)| i.min(last));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn scroll_to_latest(&mut self) -> Result<()> {
        self.scrolled_to = self.entries.len().checked_sub(1);
        Ok(())
    }
}
