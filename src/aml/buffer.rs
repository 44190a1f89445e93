//! Multi-line values
//!
//! Text lines following a key or bullet are collected here. They only become part of
//! the value when an `:end` line commits them; any structural command in between
//! throws them away.

use crate::aml::document::{Document, NodeId};

#[derive(Debug, Default, Clone)]
pub struct MultilineBuffer {
    text: String,
    destination: Option<NodeId>,
}

impl MultilineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the pending text and forget the destination.
    pub fn clear(&mut self) {
        self.text.clear();
        self.destination = None;
    }

    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
        self.text.push('\n');
    }

    /// Start a new value: the buffer now holds `first_line` and commits into `scalar`.
    pub fn start(&mut self, scalar: NodeId, first_line: &str) {
        self.clear();
        self.destination = Some(scalar);
        self.append(first_line);
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Write the collected text into the destination scalar, then clear.
    ///
    /// Outer spaces, tabs and newlines are trimmed; everything inside is kept.
    /// Without a destination this only clears.
    pub fn commit(&mut self, document: &mut Document) {
        if let Some(scalar) = self.destination {
            let value = self
                .text
                .trim_matches(|c| matches!(c, ' ' | '\t' | '\n'))
                .to_string();
            document.set_text(scalar, value);
        }
        self.clear();
    }
}
