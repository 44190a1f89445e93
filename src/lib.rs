//! # archieml
//!
//! A parser for ArchieML, the "structured prose with inline commands" format.
//!
//! ArchieML lets authors write plain text with a handful of line commands
//! (`key: value`, `[array]`, `{scope}`, `* bullet`, `:end`, `:skip`, `:ignore`)
//! and turns it into a tree of objects, arrays and strings.
//!
//! File Layout
//!
//! src/aml
//!   ├── commands     Line classification (which command, if any, a line is)
//!   ├── context      The stack of nested construction contexts
//!   ├── building     Dispatch of commands onto the document tree
//!   ├── buffer       Pending multi-line text
//!   ├── parser       The line driver tying it all together
//!   ├── document     The resulting tree
//!   └── loader, formats, config   Input, output and settings around the core
//!
//! Parsing never fails: every input, however malformed, yields a document.
//!
//! For test helpers, see the [testing module](aml::testing).

pub mod aml;

pub use aml::document::{Document, Node, NodeId, NodeKind, NodeRef, Properties};
pub use aml::parser::{parse, parse_lines, Parser};
