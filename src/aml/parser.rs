//! Line driver
//!
//!     The parser makes a single pass over the input, one line at a time, with no
//!     look-ahead and no backtracking. Each line is classified (see
//!     [commands](crate::aml::commands)), applied to the tree (see
//!     [building](crate::aml::building)), or collected into the multi-line buffer.
//!
//!     Two modes exist: normal, and skipping (between `:skip` and `:endskip`), where
//!     every line is dropped unless it ends the skip or is an `:ignore`.
//!
//!     Parsing cannot fail. If applying a line hits an inconsistency, whatever the line
//!     already changed is kept, the fault is logged, and the next line is processed
//!     normally. Text still pending in the multi-line buffer when input runs out is
//!     discarded.

use crate::aml::buffer::MultilineBuffer;
use crate::aml::building::TreeBuilder;
use crate::aml::commands::{classify, classify_skipped, Command};
use crate::aml::document::Document;
use crate::aml::error::ParseFault;
use tracing::{debug, trace};

/// Parse a whole source string.
pub fn parse(source: &str) -> Document {
    parse_lines(source.lines())
}

/// Parse a sequence of lines (without line terminators).
pub fn parse_lines<I, S>(lines: I) -> Document
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Parser::new().parse_lines(lines)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Skipping,
}

/// What the driver does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Incremental parser state: the tree, the context stack, and the pending text.
///
/// Lines can be pushed one by one with [`Parser::feed`], which is handy when the
/// input arrives piecemeal; [`Parser::finish`] hands back the document.
#[derive(Debug, Clone)]
pub struct Parser {
    builder: TreeBuilder,
    buffer: MultilineBuffer,
    mode: Mode,
    line_number: usize,
    stopped: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            builder: TreeBuilder::new(),
            buffer: MultilineBuffer::new(),
            mode: Mode::Normal,
            line_number: 0,
            stopped: false,
        }
    }

    /// Feed every line, then finish.
    pub fn parse_lines<I, S>(mut self, lines: I) -> Document
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            if !self.feed(line.as_ref()) {
                break;
            }
        }
        self.finish()
    }

    /// Process one line. Returns `false` once an `:ignore` line has ended the parse;
    /// from then on further lines are dropped.
    pub fn feed(&mut self, line: &str) -> bool {
        if self.stopped {
            return false;
        }
        self.line_number += 1;
        match self.process_line(line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stop) => {
                debug!(line = self.line_number, "ignore command, parsing stopped");
                self.stopped = true;
            }
            Err(fault) => {
                debug!(
                    line = self.line_number,
                    text = line,
                    %fault,
                    "line skipped after parse fault"
                );
            }
        }
        !self.stopped
    }

    /// True while between `:skip` and `:endskip`.
    pub fn is_skipping(&self) -> bool {
        self.mode == Mode::Skipping
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Number of lines fed so far, including the `:ignore` line if any.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The document as built so far.
    pub fn document(&self) -> &Document {
        self.builder.document()
    }

    /// Hand back the document. An uncommitted multi-line buffer is dropped.
    pub fn finish(self) -> Document {
        self.builder.into_document()
    }

    fn process_line(&mut self, line: &str) -> Result<Flow, ParseFault> {
        if self.mode == Mode::Skipping {
            match classify_skipped(line) {
                Some(Command::Ignore) => return Ok(Flow::Stop),
                Some(Command::SkipEnd) => self.mode = Mode::Normal,
                _ => {}
            }
            return Ok(Flow::Continue);
        }

        let command = classify(line, self.builder.context());
        trace!(line = self.line_number, command = command.name());
        if command.is_structural() {
            self.buffer.clear();
        }

        match command {
            Command::Ignore => return Ok(Flow::Stop),
            Command::SkipStart => self.mode = Mode::Skipping,
            Command::SkipEnd => {}
            Command::EndMultiline => self.buffer.commit(self.builder.document_mut()),
            Command::Array { key: None, .. } | Command::Scope { key: None, .. } => {
                self.builder.close()
            }
            Command::Array {
                key: Some(key),
                relative,
                freeform,
            } => self.builder.open_array(key, relative, freeform)?,
            Command::Scope { key: Some(key), .. } => self.builder.open_scope(key)?,
            Command::Bullet { value } => {
                if let Some(scalar) = self.builder.bullet(value)? {
                    self.buffer.start(scalar, value);
                }
            }
            Command::KeyValue { key, value } => match self.builder.key_value(key, value)? {
                Some(scalar) => self.buffer.start(scalar, value),
                // Freeform entries are single-line; the buffer stays empty
                None => {}
            },
            Command::FreeformText { text } => self.builder.freeform_text(text)?,
            Command::Text { text } => self.buffer.append(text),
        }
        Ok(Flow::Continue)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
