//! Output formats
//!
//! A parsed [`Document`] can be rendered as JSON, YAML or XML. All formats keep object
//! keys and array elements in the order they were written.

pub mod xml;

use crate::aml::config::OutputConfig;
use crate::aml::document::Document;
use crate::aml::error::FormatError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Names are matched case-insensitively, on the command line and in config files alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Format {
    Json,
    Xml,
    Yaml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Xml, Format::Yaml];

    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}

impl TryFrom<String> for Format {
    type Error = FormatError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Render `doc` in `format`, using `output` for pretty-printing and the XML root name.
pub fn render(doc: &Document, format: Format, output: &OutputConfig) -> Result<String, FormatError> {
    match format {
        Format::Json => to_json(doc, output.pretty),
        Format::Yaml => to_yaml(doc),
        Format::Xml => Ok(xml::to_xml(doc, &output.xml_root, output.pretty)),
    }
}

pub fn to_json(doc: &Document, pretty: bool) -> Result<String, FormatError> {
    let text = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    Ok(text)
}

pub fn to_yaml(doc: &Document) -> Result<String, FormatError> {
    Ok(serde_yaml::to_string(doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aml::parser::parse;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("XML".parse::<Format>().unwrap(), Format::Xml);
        assert_eq!(" Yaml ".parse::<Format>().unwrap(), Format::Yaml);
        assert!(matches!(
            "toml".parse::<Format>(),
            Err(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_compact_json_keeps_order() {
        let doc = parse("zeta: 1\nalpha: 2\n[list]\n* b\n* a\n");
        assert_eq!(
            to_json(&doc, false).unwrap(),
            r#"{"zeta":"1","alpha":"2","list":["b","a"]}"#
        );
    }

    #[test]
    fn test_pretty_json() {
        let doc = parse("{cfg}\nlang: en\n{}\n[items]\n* one\n");
        insta::assert_snapshot!(to_json(&doc, true).unwrap(), @r#"
        {
          "cfg": {
            "lang": "en"
          },
          "items": [
            "one"
          ]
        }
        "#);
    }

    #[test]
    fn test_yaml() {
        let doc = parse("{cfg}\nlang: en\n{}\n[items]\n* one\n* two\n");
        insta::assert_snapshot!(to_yaml(&doc).unwrap(), @r"
        cfg:
          lang: en
        items:
        - one
        - two
        ");
    }

    #[test]
    fn test_render_dispatch() {
        let doc = parse("a: 1");
        let output = OutputConfig {
            pretty: false,
            ..OutputConfig::default()
        };
        assert_eq!(render(&doc, Format::Json, &output).unwrap(), r#"{"a":"1"}"#);
        assert_eq!(
            render(&doc, Format::Xml, &output).unwrap(),
            "<root><a>1</a></root>"
        );
        assert_eq!(render(&doc, Format::Yaml, &output).unwrap(), "a: '1'\n");
    }
}
