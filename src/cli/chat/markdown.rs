//! Lightweight markdown-to-HTML conversion for chat messages.
//!
//! Rendering is an ordered list of pure text-to-text steps. Every step works
//! on the output of the one before it, so the order in [`PIPELINE`] is part of
//! the output format.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A single named transform in the rendering pipeline.
pub struct Step {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

pub const PIPELINE: &[Step] = &[
    Step { name: "escape_html", apply: escape_html },
    Step { name: "autolink_urls", apply: autolink_urls },
    Step { name: "inline_links", apply: inline_links },
    Step { name: "bold", apply: bold },
    Step { name: "italic", apply: italic },
    Step { name: "unordered_lists", apply: unordered_lists },
    Step { name: "ordered_lists", apply: ordered_lists },
    Step { name: "line_breaks", apply: line_breaks },
];

// List steps tag the items they create so that a later list step never wraps
// items that already belong to a list. The markers are stripped from the
// source during escaping, so they cannot come from message text.
const UL_ITEM: char = '\u{1}';
const OL_ITEM: char = '\u{2}';

static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\]\()?(https?://\S+)").unwrap());
static INLINE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static BULLET_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[*\-]\s+(.+)$").unwrap());
static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.\s+(.+)$").unwrap());
static UL_ITEM_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x01(<li>.*?</li>)").unwrap());
static OL_ITEM_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x02(<li>.*?</li>)").unwrap());
static ADJACENT_UL: Lazy<Regex> = Lazy::new(|| Regex::new(r"</ul>\s*<ul>").unwrap());
static ADJACENT_OL: Lazy<Regex> = Lazy::new(|| Regex::new(r"</ol>\s*<ol>").unwrap());

/// Renders message text to an HTML fragment. The input is left untouched.
pub fn render(text: &str) -> String {
    PIPELINE
        .iter()
        .fold(text.to_string(), |acc, step| (step.apply)(&acc))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            UL_ITEM | OL_ITEM => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// Bare `http(s)://` URLs, up to the next whitespace, become anchors opening
/// in a new window. URLs that are the target of `[label](url)` are left for
/// [`inline_links`].
pub fn autolink_urls(text: &str) -> String {
    BARE_URL
        .replace_all(text, |caps: &Captures| {
            if caps.get(1).is_some() {
                return caps[0].to_string();
            }
            let url = &caps[2];
            format!(r#"<a href="{url}" target="_blank">{url}</a>"#)
        })
        .into_owned()
}

pub fn inline_links(text: &str) -> String {
    INLINE_LINK
        .replace_all(text, r#"<a href="$2" target="_blank">$1</a>"#)
        .into_owned()
}

pub fn bold(text: &str) -> String {
    BOLD.replace_all(text, "<strong>$1</strong>").into_owned()
}

pub fn italic(text: &str) -> String {
    ITALIC.replace_all(text, "<em>$1</em>").into_owned()
}

/// Lines starting with `*` or `-` become one `<ul>` per run of adjacent lines.
pub fn unordered_lists(text: &str) -> String {
    let items = BULLET_LINE.replace_all(text, "\u{1}<li>$1</li>");
    let wrapped = UL_ITEM_RUN.replace_all(&items, "<ul>$1</ul>");
    ADJACENT_UL.replace_all(&wrapped, "").into_owned()
}

/// Lines starting with `N.` become one `<ol>` per run of adjacent lines.
pub fn ordered_lists(text: &str) -> String {
    let items = NUMBERED_LINE.replace_all(text, "\u{2}<li>$1</li>");
    let wrapped = OL_ITEM_RUN.replace_all(&items, "<ol>$1</ol>");
    ADJACENT_OL.replace_all(&wrapped, "").into_owned()
}

pub fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}
