//! XML rendering
//!
//!     Documents map onto elements one key at a time:
//!
//!         {a: "x"}              <a>x</a>
//!         {a: {b: "x"}}         <a><b>x</b></a>
//!         {a: ["x", "y"]}       <a>x</a><a>y</a>
//!         {a: []}               (nothing)
//!
//!     Array items repeat the element name of the key holding the array; arrays nested
//!     directly in arrays flatten into the same repeated name. Everything is wrapped in a
//!     single root element.
//!
//!     Keys that are not valid XML names get each offending character encoded as
//!     `_xHHHH_`, the way .NET's `XmlConvert.EncodeName` does.

use crate::aml::document::{Document, Node, NodeRef};

const INDENT: &str = "  ";

/// Render the document under a `root` element.
pub fn to_xml(doc: &Document, root: &str, pretty: bool) -> String {
    let mut writer = XmlWriter {
        out: String::new(),
        pretty,
    };
    writer.element(&encode_name(root), doc.root(), 0);
    if pretty {
        // Trailing newline belongs to the caller
        writer.out.truncate(writer.out.trim_end().len());
    }
    writer.out
}

struct XmlWriter {
    out: String,
    pretty: bool,
}

impl XmlWriter {
    fn element(&mut self, name: &str, node: NodeRef<'_>, depth: usize) {
        match node.node() {
            Node::Scalar(text) => {
                self.indent(depth);
                self.out.push_str(&format!("<{name}>{}</{name}>", escape_text(text)));
                self.newline();
            }
            Node::Object(props) if props.is_empty() => {
                self.indent(depth);
                self.out.push_str(&format!("<{name} />"));
                self.newline();
            }
            Node::Object(_) => {
                self.indent(depth);
                self.out.push_str(&format!("<{name}>"));
                self.newline();
                for (key, child) in node.entries() {
                    self.element(&encode_name(key), child, depth + 1);
                }
                self.indent(depth);
                self.out.push_str(&format!("</{name}>"));
                self.newline();
            }
            Node::Array(_) => {
                for item in node.items() {
                    self.element(name, item, depth);
                }
            }
        }
    }

    fn indent(&mut self, depth: usize) {
        if self.pretty {
            for _ in 0..depth {
                self.out.push_str(INDENT);
            }
        }
    }

    fn newline(&mut self) {
        if self.pretty {
            self.out.push('\n');
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Make `key` a valid XML element name.
pub fn encode_name(key: &str) -> String {
    if key.is_empty() {
        return "_".to_string();
    }
    let mut name = String::with_capacity(key.len());
    for (i, c) in key.chars().enumerate() {
        let valid = if i == 0 {
            c.is_alphabetic() || c == '_'
        } else {
            c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
        };
        if valid {
            name.push(c);
        } else {
            name.push_str(&format!("_x{:04X}_", c as u32));
        }
    }
    name
}
