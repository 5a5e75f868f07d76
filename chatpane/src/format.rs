//! Minimal markdown-like message formatting.
//!
//! Rules run in a fixed order: bold, italic, fenced code, inline code,
//! then newlines. Each rule only touches text containing its own trigger,
//! so plain text passes through unchanged.
//!
//! Control characters in message text are dropped first, so a reply can
//! never carry escape sequences of its own to the terminal.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("valid regex"));
static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid regex"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));

/// Open/close strings for each formatting construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markup {
    pub bold: (&'static str, &'static str),
    pub italic: (&'static str, &'static str),
    pub code_block: (&'static str, &'static str),
    pub inline_code: (&'static str, &'static str),
    pub line_break: &'static str,
}

impl Markup {
    /// Markup for a browser pane.
    pub const HTML: Self = Self {
        bold: ("<strong>", "</strong>"),
        italic: ("<em>", "</em>"),
        code_block: ("<pre><code>", "</code></pre>"),
        inline_code: ("<code>", "</code>"),
        line_break: "<br>",
    };

    /// Markup for an ANSI terminal.
    pub const ANSI: Self = Self {
        bold: ("\x1b[1m", "\x1b[22m"),
        italic: ("\x1b[3m", "\x1b[23m"),
        code_block: ("\x1b[36m", "\x1b[39m"),
        inline_code: ("\x1b[36m", "\x1b[39m"),
        line_break: "\n",
    };

    /// Drops the markers, for output that is piped or redirected.
    pub const PLAIN: Self = Self {
        bold: ("", ""),
        italic: ("", ""),
        code_block: ("", ""),
        inline_code: ("", ""),
        line_break: "\n",
    };
}

fn wrap(re: &Regex, text: &str, (open, close): (&str, &str)) -> String {
    re.replace_all(text, |caps: &Captures<'_>| format!("{open}{}{close}", &caps[1]))
        .into_owned()
}

fn is_stripped(c: char) -> bool {
    c.is_control() && c != '\n' && c != '\t'
}

/// Remove control characters other than newline and tab.
pub fn strip_controls(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_stripped) {
        Cow::Owned(text.chars().filter(|&c| !is_stripped(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// Format raw message text for display.
pub fn format_message(text: &str, markup: &Markup) -> String {
    let text = strip_controls(text);
    let text = wrap(&BOLD, &text, markup.bold);
    let text = wrap(&ITALIC, &text, markup.italic);
    let text = wrap(&CODE_BLOCK, &text, markup.code_block);
    let text = wrap(&INLINE_CODE, &text, markup.inline_code);
    text.replace('\n', markup.line_break)
}
