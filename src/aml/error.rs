//! Error types
//!
//! Parsing itself has no error type visible to callers: [`ParseFault`] only
//! travels from the tree builder up to the line driver, which logs and drops
//! it. Loading and rendering are ordinary fallible operations.

use crate::aml::document::NodeId;
use thiserror::Error;

/// An inconsistency hit while applying a single line to the document.
///
/// Faults are caught per line by the parser; the line's partial effects are
/// kept and parsing resumes with the next line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFault {
    /// A context expected to write into an object found some other node.
    #[error("node {0} is not an object")]
    NotAnObject(NodeId),
    /// A context expected to append to an array found some other node.
    #[error("node {0} is not an array")]
    NotAnArray(NodeId),
    /// An object array context has no open item to write into.
    #[error("object array {0} has no current item")]
    MissingArrayItem(NodeId),
}

/// Errors raised while acquiring source text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "remote")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote fetching is not enabled in this build")]
    RemoteDisabled,
    #[error("no document id found in {0:?}")]
    MissingDocumentId(String),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Errors raised while rendering a document to text.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown output format '{0}' (expected json, xml or yaml)")]
    UnknownFormat(String),
}
