//! Document loading utilities
//!
//! The parser only needs lines of text. This module gets that text from wherever it
//! lives: an in-memory string, a file, standard input, an HTTP URL, or a published
//! Google Doc (by URL or bare document id), and hands it to the parser.
//!
//! Unlike parsing, loading fails fast: IO and network errors surface as [`LoadError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use archieml::aml::loader::{load_path, Source};
//! use archieml::aml::config::FetchConfig;
//!
//! let doc = load_path("story.aml")?;
//! let doc = Source::GoogleDoc("1Lu7Vv4s2UIlVfBa2aBh3Q1_kUB6SyjkOJpgqFNEOS_o".into())
//!     .load(&FetchConfig::default())?;
//! ```

use crate::aml::config::FetchConfig;
use crate::aml::document::Document;
use crate::aml::error::LoadError;
use crate::aml::parser::parse;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

static GDOC_URL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/document/d/(?P<id>[A-Za-z0-9_-]+)").unwrap());

static GDOC_BARE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{20,}$").unwrap());

/// Where source text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Text(String),
    Path(PathBuf),
    Stdin,
    Url(String),
    /// A Google Docs URL or document id.
    GoogleDoc(String),
}

impl Source {
    /// Acquire the full source text.
    pub fn read(&self, fetch: &FetchConfig) -> Result<String, LoadError> {
        let text = match self {
            Source::Text(text) => text.clone(),
            Source::Path(path) => {
                debug!(path = %path.display(), "reading file");
                fs::read_to_string(path)?
            }
            Source::Stdin => {
                debug!("reading standard input");
                let mut text = String::new();
                std::io::stdin().lock().read_to_string(&mut text)?;
                text
            }
            Source::Url(url) => fetch_text(url, fetch)?,
            Source::GoogleDoc(reference) => {
                let url = google_doc_export_url(reference, &fetch.gdoc_export_url)?;
                fetch_text(&url, fetch)?
            }
        };
        Ok(strip_bom(text))
    }

    /// Acquire and parse.
    pub fn load(&self, fetch: &FetchConfig) -> Result<Document, LoadError> {
        Ok(parse(&self.read(fetch)?))
    }
}

/// Parse an in-memory string. Never fails.
pub fn load_str(source: &str) -> Document {
    parse(strip_bom_str(source))
}

pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Document, LoadError> {
    Source::Path(path.as_ref().to_path_buf()).load(&FetchConfig::default())
}

pub fn load_reader<R: Read>(mut reader: R) -> Result<Document, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(load_str(&text))
}

pub fn load_url(url: &str, fetch: &FetchConfig) -> Result<Document, LoadError> {
    Source::Url(url.to_string()).load(fetch)
}

pub fn load_google_doc(reference: &str, fetch: &FetchConfig) -> Result<Document, LoadError> {
    Source::GoogleDoc(reference.to_string()).load(fetch)
}

/// Extract a Google Docs document id from a document URL or a bare id.
pub fn google_doc_id(reference: &str) -> Option<&str> {
    let reference = reference.trim();
    if let Some(caps) = GDOC_URL_ID.captures(reference) {
        return caps.name("id").map(|m| m.as_str());
    }
    GDOC_BARE_ID.is_match(reference).then_some(reference)
}

/// The plain-text export URL for a document, from a template containing `{id}`.
pub fn google_doc_export_url(reference: &str, template: &str) -> Result<String, LoadError> {
    let id = google_doc_id(reference)
        .ok_or_else(|| LoadError::MissingDocumentId(reference.to_string()))?;
    debug!(id, "resolved hosted document id");
    Ok(template.replace("{id}", id))
}

#[cfg(feature = "remote")]
fn fetch_text(url: &str, fetch: &FetchConfig) -> Result<String, LoadError> {
    use std::time::Duration;

    debug!(url, timeout_secs = fetch.timeout_secs, "fetching");
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(fetch.timeout_secs))
        .user_agent(fetch.user_agent.clone())
        .build()?;
    let text = client.get(url).send()?.error_for_status()?.text()?;
    Ok(text)
}

#[cfg(not(feature = "remote"))]
fn fetch_text(url: &str, _fetch: &FetchConfig) -> Result<String, LoadError> {
    debug!(url, "remote fetching disabled");
    Err(LoadError::RemoteDisabled)
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

fn strip_bom_str(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
