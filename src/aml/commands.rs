//! Command recognition
//!
//!     Every input line is exactly one [`Command`]. Patterns are tried in a fixed order and
//!     the first match wins:
//!
//!         1. `:ignore`                  stop parsing
//!         2. `:skip` / `:endskip`       start / stop discarding lines
//!         3. `:end`                     commit the multi-line buffer
//!         4. `[key]`, `[.+key]`, `[]`   open / close arrays
//!         5. `* text`                   bullet (string and untyped arrays only)
//!         6. `key: text`                key-value (anywhere but string arrays)
//!         7. `{key}`, `{.key}`, `{}`    open / close scopes
//!         8. any line                   text entry (freeform arrays only)
//!         9. any line                   plain text
//!
//!     Keywords are case-insensitive, surrounding whitespace is ignored, and anything
//!     trailing a command keyword or bracket is discarded. A plain-text line that starts
//!     with a backslash has that one character removed.
//!
//!     Recognition is stateless apart from the kind of the current context, which gates
//!     items 5, 6 and 8.

use crate::aml::context::ContextKind;
use once_cell::sync::Lazy;
use regex::Regex;

static IGNORE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*:ignore").unwrap());

static SKIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*:(?:(?P<start>skip)|(?P<end>endskip))").unwrap());

static END_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*:end").unwrap());

static ARRAY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*\[\s*(?P<dots>\.+)?(?P<freeform>\+\s*)?(?P<key>[a-zA-Z0-9_\-.]+)?\s*\]",
    )
    .unwrap()
});

static BULLET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*\s*(?P<value>.+)").unwrap());

static KEY_VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<key>[a-zA-Z0-9_\-.]+)\s*:\s*(?P<value>.+)$").unwrap()
});

static SCOPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\{\s*(?P<dots>\.+)?(?P<key>[a-zA-Z0-9_\-.]+)?\s*\}").unwrap()
});

/// A classified input line. Borrowed slices point into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Ignore,
    SkipStart,
    SkipEnd,
    EndMultiline,
    /// `[key]`. `relative` is the leading-dot marker, `freeform` the `+` marker.
    /// A missing key closes the innermost array.
    Array {
        relative: bool,
        freeform: bool,
        key: Option<&'a str>,
    },
    /// `* value`. The value keeps trailing whitespace.
    Bullet { value: &'a str },
    /// `key: value`. The value keeps trailing whitespace.
    KeyValue { key: &'a str, value: &'a str },
    /// `{key}`. A missing key closes the innermost scope.
    Scope {
        relative: bool,
        key: Option<&'a str>,
    },
    /// A line inside a freeform array, trimmed. May be empty.
    FreeformText { text: &'a str },
    /// Any other line, with a single leading backslash removed.
    Text { text: &'a str },
}

impl<'a> Command<'a> {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ignore => "ignore",
            Command::SkipStart => "skip",
            Command::SkipEnd => "endskip",
            Command::EndMultiline => "end",
            Command::Array { key: None, .. } => "array-close",
            Command::Array { .. } => "array-open",
            Command::Bullet { .. } => "bullet",
            Command::KeyValue { .. } => "key-value",
            Command::Scope { key: None, .. } => "scope-close",
            Command::Scope { .. } => "scope-open",
            Command::FreeformText { .. } => "freeform-text",
            Command::Text { .. } => "text",
        }
    }

    /// True for commands that reset the multi-line buffer.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Command::SkipStart
                | Command::Array { .. }
                | Command::Bullet { .. }
                | Command::KeyValue { .. }
                | Command::Scope { .. }
        )
    }
}

/// Lines that may end a skip block or the whole parse while skipping.
///
/// Inside `:skip` nothing else is interpreted.
pub fn classify_skipped(line: &str) -> Option<Command<'_>> {
    if IGNORE_PATTERN.is_match(line) {
        return Some(Command::Ignore);
    }
    skip_command(line)
}

/// Classify one line in the given context.
pub fn classify(line: &str, context: ContextKind) -> Command<'_> {
    if IGNORE_PATTERN.is_match(line) {
        return Command::Ignore;
    }
    // :endskip must win over :end
    if let Some(command) = skip_command(line) {
        return command;
    }
    if END_PATTERN.is_match(line) {
        return Command::EndMultiline;
    }
    if let Some(caps) = ARRAY_PATTERN.captures(line) {
        return Command::Array {
            relative: caps.name("dots").is_some(),
            freeform: caps.name("freeform").is_some(),
            key: caps.name("key").map(|m| m.as_str()),
        };
    }
    if matches!(context, ContextKind::StringArray | ContextKind::UnknownArray) {
        if let Some(caps) = BULLET_PATTERN.captures(line) {
            if let Some(value) = caps.name("value") {
                return Command::Bullet {
                    value: value.as_str(),
                };
            }
        }
    }
    if context != ContextKind::StringArray {
        if let Some(caps) = KEY_VALUE_PATTERN.captures(line) {
            if let (Some(key), Some(value)) = (caps.name("key"), caps.name("value")) {
                return Command::KeyValue {
                    key: key.as_str(),
                    value: value.as_str(),
                };
            }
        }
    }
    if let Some(caps) = SCOPE_PATTERN.captures(line) {
        return Command::Scope {
            relative: caps.name("dots").is_some(),
            key: caps.name("key").map(|m| m.as_str()),
        };
    }
    if context == ContextKind::FreeformArray {
        return Command::FreeformText { text: line.trim() };
    }
    Command::Text {
        text: unescape(line),
    }
}

fn skip_command(line: &str) -> Option<Command<'_>> {
    let caps = SKIP_PATTERN.captures(line)?;
    if caps.name("start").is_some() {
        Some(Command::SkipStart)
    } else {
        Some(Command::SkipEnd)
    }
}

/// Remove one leading backslash, the only escape in the format.
pub fn unescape(line: &str) -> &str {
    line.strip_prefix('\\').unwrap_or(line)
}
