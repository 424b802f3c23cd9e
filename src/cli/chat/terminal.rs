use std::io::Write;

use crossterm::style::Stylize;
use crossterm::{cursor, queue, terminal};
use eyre::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rustyline::error::ReadlineError;
use rustyline::Editor;
use tracing::debug;

use super::conversation_state::{ConversationView, Entry, RenderedMessage, Sender};
use super::prompt::{self, generate_prompt};
use super::surface::{InputControl, InputState, MessageSurface};

const LOADING_TEXT: &str = "Thinking...";

static ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a href="([^"]*)" target="_blank">(.*?)</a>"#).unwrap());
static STRONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<strong>(.*?)</strong>").unwrap());
static EM: Lazy<Regex> = Lazy::new(|| Regex::new(r"<em>(.*?)</em>").unwrap());
static UNORDERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:<br>)?<ul>(.*?)</ul>(?:<br>)?").unwrap());
static ORDERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:<br>)?<ol>(.*?)</ol>(?:<br>)?").unwrap());
static ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"<li>(.*?)</li>").unwrap());

/// Converts a rendered message body into styled terminal text.
pub fn html_to_terminal(html: &str) -> String {
    let text = ANCHOR.replace_all(html, |caps: &Captures| {
        let (href, label) = (&caps[1], &caps[2]);
        if href == label {
            href.underlined().to_string()
        } else {
            format!("{} ({})", label.underlined(), href)
        }
    });
    let text = STRONG.replace_all(&text, |caps: &Captures| caps[1].bold().to_string());
    let text = EM.replace_all(&text, |caps: &Captures| caps[1].italic().to_string());
    let text = UNORDERED.replace_all(&text, |caps: &Captures| {
        list_block(&caps[1], |_| "•".to_string())
    });
    let text = ORDERED.replace_all(&text, |caps: &Captures| {
        list_block(&caps[1], |n| format!("{}.", n))
    });
    let text = text.replace("<br>", "\n");

    unescape_html(text.trim_matches('\n'))
}

fn list_block(items: &str, marker: impl Fn(usize) -> String) -> String {
    let lines: Vec<String> = ITEM
        .captures_iter(items)
        .enumerate()
        .map(|(i, caps)| format!("  {} {}", marker(i + 1), &caps[1]))
        .collect();
    format!("\n{}\n", lines.join("\n"))
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

fn header(message: &RenderedMessage) -> String {
    let label = match message.message.sender {
        Sender::User => "You".cyan().bold(),
        Sender::Bot => "Bot".green().bold(),
    };
    format!("{} {}", label, message.message.timestamp.as_str().dim())
}

/// Writes the conversation to a terminal while keeping an in-memory copy.
pub struct TerminalSurface {
    view: ConversationView,
    output: Box<dyn Write>,
    loading_shown: bool,
}

impl TerminalSurface {
    pub fn new(output: Box<dyn Write>) -> Self {
        Self {
            view: ConversationView::new(),
            output,
            loading_shown: false,
        }
    }

    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    /// Prints text that is not part of the conversation, like help output.
    pub fn print_notice(&mut self, text: &str) -> Result<()> {
        self.end_loading_line()?;
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    fn end_loading_line(&mut self) -> Result<()> {
        if self.loading_shown {
            writeln!(self.output)?;
            self.loading_shown = false;
        }
        Ok(())
    }
}

impl MessageSurface for TerminalSurface {
    fn clear(&mut self) -> Result<()> {
        if !self.view.is_empty() {
            queue!(
                self.output,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
        }
        self.loading_shown = false;
        self.view.clear()
    }

    fn append(&mut self, entry: Entry) -> Result<()> {
        debug!("Rendered {}", entry.to_html());
        match &entry {
            Entry::Message(message) => {
                self.end_loading_line()?;
                writeln!(self.output, "{}", header(message))?;
                writeln!(self.output, "{}\n", html_to_terminal(&message.body))?;
            }
            Entry::Loading => {
                self.end_loading_line()?;
                write!(self.output, "{}", LOADING_TEXT.dim())?;
                self.loading_shown = true;
            }
        }
        self.view.append(entry)
    }

    fn remove_first_loading(&mut self) -> Result<bool> {
        let removed = self.view.remove_first_loading()?;
        if removed && self.loading_shown {
            queue!(
                self.output,
                cursor::MoveToColumn(0),
                terminal::Clear(terminal::ClearType::CurrentLine)
            )?;
            self.loading_shown = false;
        }
        Ok(removed)
    }

    fn scroll_to_latest(&mut self) -> Result<()> {
        self.view.scroll_to_latest()?;
        self.output.flush()?;
        Ok(())
    }
}

/// Line editor standing in for the text field. The current value is offered
/// as the initial text of the next line, so input kept after a failed request
/// can be resubmitted.
pub struct TerminalInput {
    editor: Editor<()>,
    state: InputState,
    prompt: String,
}

impl TerminalInput {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: prompt::rl()?,
            state: InputState::default(),
            prompt: generate_prompt(None),
        })
    }

    /// Returns `None` once the user closes the input with Ctrl-C or Ctrl-D.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        if self.state.is_disabled() {
            bail!("Input is disabled while a reply is pending");
        }

        let initial = self.state.value().to_string();
        match self.editor.readline_with_initial(&self.prompt, (&initial, "")) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str());
                }
                self.state.set_value(&line);
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl InputControl for TerminalInput {
    fn set_disabled(&mut self, disabled: bool) {
        self.state.set_disabled(disabled);
    }

    fn is_disabled(&self) -> bool {
        self.state.is_disabled()
    }

    fn value(&self) -> &str {
        self.state.value()
    }

    fn set_value(&mut self, value: &str) {
        self.state.set_value(value);
    }

    fn focus(&mut self) {
        self.state.focus();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    use super::*;
    use crate::cli::chat::conversation_state::Message;
    use crate::cli::chat::markdown;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn message(text: &str, sender: Sender) -> Entry {
        Entry::Message(RenderedMessage::render(Message::new(text, sender)))
    }

    #[test]
    fn lists_are_laid_out_one_item_per_line() {
        let text = html_to_terminal(&markdown::render("Steps:\n1. Pull\n2. Aim"));
        assert_eq!(text, "Steps:\n  1. Pull\n  2. Aim");

        let text = html_to_terminal(&markdown::render("- gloves\n- goggles\nthen start"));
        assert_eq!(text, "  • gloves\n  • goggles\nthen start");
    }

    #[test]
    fn entities_and_tags_are_removed() {
        let text = html_to_terminal(&markdown::render("a < b & **c**"));
        assert!(text.starts_with("a < b & "));
        assert!(text.contains('c'));
        assert!(!text.contains("<strong>"));
    }

    #[test]
    fn labeled_links_show_their_target() {
        let text = html_to_terminal(&markdown::render("[WHO](https://who.int)"));
        assert!(text.contains("WHO"));
        assert!(text.contains("(https://who.int)"));
    }

    #[test]
    fn surface_writes_messages_and_erases_loading() {
        let buffer = SharedBuffer::default();
        let mut surface = TerminalSurface::new(Box::new(buffer.clone()));

        surface.append(message("Hello there", Sender::Bot)).unwrap();
        surface.append(Entry::Loading).unwrap();
        assert!(buffer.contents().contains(LOADING_TEXT));

        assert!(surface.remove_first_loading().unwrap());
        assert!(!surface.remove_first_loading().unwrap());
        surface.append(message("Hi", Sender::User)).unwrap();

        let output = buffer.contents();
        assert!(output.contains("Hello there"));
        assert!(output.contains("You"));
        assert_eq!(surface.view().entries().len(), 2);
        assert_eq!(surface.view().loading_count(), 0);
    }

    #[test]
    fn notice_is_not_part_of_the_conversation() {
        let buffer = SharedBuffer::default();
        let mut surface = TerminalSurface::new(Box::new(buffer.clone()));

        surface.print_notice("Conversation cleared.").unwrap();

        assert!(buffer.contents().contains("Conversation cleared."));
        assert!(surface.view().is_empty());
    }
}
