//! Testing utilities for document assertions
//!
//!     Parser tests should check the whole shape they care about, not just a count or a
//!     single value. [`assert_doc`] starts a fluent chain over the root object; closures
//!     descend into properties and array items, and failures report the path that was
//!     being checked:
//!
//!     ```rust,ignore
//!     use archieml::aml::testing::assert_doc;
//!
//!     let doc = archieml::parse("[people]\nname: Alice\nname: Bob\n");
//!     assert_doc(&doc).keys(&["people"]).field("people", |people| {
//!         people
//!             .item_count(2)
//!             .item(0, |p| { p.field("name", |n| { n.text("Alice"); }); })
//!             .item(1, |p| { p.field("name", |n| { n.text("Bob"); }); });
//!     });
//!     ```
//!
//!     For whole-tree comparisons, [`NodeAssertion::json`] compares against a
//!     `serde_json::Value`.

use crate::aml::document::{Document, NodeKind, NodeRef};
use serde_json::Value;

/// Create an assertion builder for a document's root object.
pub fn assert_doc(doc: &Document) -> NodeAssertion<'_> {
    NodeAssertion {
        node: doc.root(),
        context: "root".to_string(),
    }
}

pub struct NodeAssertion<'a> {
    node: NodeRef<'a>,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    fn expect_kind(&self, expected: NodeKind) {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: Expected {}, found {} ({:?})",
            self.context,
            expected,
            self.node.kind(),
            self.node
        );
    }

    /// Assert a scalar with exactly this text.
    pub fn text(self, expected: &str) -> Self {
        self.expect_kind(NodeKind::Scalar);
        assert_eq!(
            self.node.as_str(),
            Some(expected),
            "{}: Unexpected text",
            self.context
        );
        self
    }

    pub fn is_object(self) -> Self {
        self.expect_kind(NodeKind::Object);
        self
    }

    pub fn is_array(self) -> Self {
        self.expect_kind(NodeKind::Array);
        self
    }

    /// Assert an object whose keys are exactly these, in this order.
    pub fn keys(self, expected: &[&str]) -> Self {
        self.expect_kind(NodeKind::Object);
        let actual: Vec<&str> = self.node.keys().collect();
        assert_eq!(actual, expected, "{}: Unexpected keys", self.context);
        self
    }

    pub fn no_field(self, key: &str) -> Self {
        self.expect_kind(NodeKind::Object);
        assert!(
            self.node.get(key).is_none(),
            "{}: Expected no '{}' key, found {:?}",
            self.context,
            key,
            self.node.get(key)
        );
        self
    }

    /// Descend into property `key`.
    pub fn field<F>(self, key: &str, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        self.expect_kind(NodeKind::Object);
        let child = self.node.get(key).unwrap_or_else(|| {
            panic!(
                "{}: Expected key '{}', found keys {:?}",
                self.context,
                key,
                self.node.keys().collect::<Vec<_>>()
            )
        });
        check(NodeAssertion {
            node: child,
            context: format!("{}.{}", self.context, key),
        });
        self
    }

    pub fn item_count(self, expected: usize) -> Self {
        self.expect_kind(NodeKind::Array);
        assert_eq!(
            self.node.len(),
            expected,
            "{}: Expected {} items, found {} ({:?})",
            self.context,
            expected,
            self.node.len(),
            self.node
        );
        self
    }

    /// Descend into array element `index`.
    pub fn item<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        self.expect_kind(NodeKind::Array);
        let child = self.node.at(index).unwrap_or_else(|| {
            panic!(
                "{}: Expected item {}, array has {} items",
                self.context,
                index,
                self.node.len()
            )
        });
        check(NodeAssertion {
            node: child,
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Assert an array of scalars with exactly these texts.
    pub fn strings(self, expected: &[&str]) -> Self {
        self.expect_kind(NodeKind::Array);
        let actual: Vec<Option<&str>> = self.node.items().map(|item| item.as_str()).collect();
        let expected: Vec<Option<&str>> = expected.iter().map(|s| Some(*s)).collect();
        assert_eq!(actual, expected, "{}: Unexpected strings", self.context);
        self
    }

    /// Assert freeform entry `index` has this `type` and descend into its `value`.
    pub fn entry<F>(self, index: usize, kind: &str, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        self.item(index, |entry| {
            entry
                .keys(&["type", "value"])
                .field("type", |t| {
                    t.text(kind);
                })
                .field("value", check);
        })
    }

    /// Compare the whole subtree with a JSON value.
    pub fn json(self, expected: Value) -> Self {
        assert_eq!(
            self.node.to_value(),
            expected,
            "{}: Subtree differs",
            self.context
        );
        self
    }
}
