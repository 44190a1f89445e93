//! Tree building
//!
//!     [`TreeBuilder`] owns the document under construction and the context stack, and
//!     applies recognized commands to them. It knows nothing about lines, escapes or the
//!     multi-line buffer: operations that write a scalar return its id so the caller can
//!     point the buffer at it.
//!
//! Addressing
//!
//!     Undotted `[key]` and `{key}` close the current construct first, then resolve `key`
//!     from the nearest enclosing object. Dotted `[.key]` nests inside the construct that
//!     is currently open:
//!
//!         - untyped array: becomes an object array whose first item holds `key`
//!         - object array:  `key` goes on the current item (a new one if `key` is the delimiter)
//!         - freeform:      a `{type: key, value: [...]}` entry is appended
//!         - object:        `key` goes on the object itself
//!         - string array:  `key` goes on the object holding the string array
//!
//!     Every assignment of an array is a fresh array; whatever was at that key before,
//!     including another array, is discarded.

use crate::aml::context::{ContextFrame, ContextKind, ContextStack};
use crate::aml::document::{Document, NodeId};
use crate::aml::error::ParseFault;

/// Where a new nested array gets attached.
enum Holder {
    /// Set as a (dot-path) property of this object.
    Object(NodeId),
    /// Wrapped in a `{type, value}` entry appended to this freeform array.
    Entry(NodeId),
}

#[derive(Debug, Clone)]
pub struct TreeBuilder {
    document: Document,
    stack: ContextStack,
}

impl TreeBuilder {
    pub fn new() -> Self {
        let document = Document::new();
        let stack = ContextStack::new(document.root_id());
        Self { document, stack }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn stack(&self) -> &ContextStack {
        &self.stack
    }

    pub fn context(&self) -> ContextKind {
        self.stack.kind()
    }

    /// `key: value`. Returns the scalar written, if any.
    pub fn key_value(&mut self, key: &str, value: &str) -> Result<Option<NodeId>, ParseFault> {
        let value = value.trim_end();
        match self.stack.kind() {
            ContextKind::Object => {
                let target = self.stack.current().target;
                self.assign(target, key, value).map(Some)
            }
            ContextKind::UnknownArray | ContextKind::ObjectArray => {
                let item = self.item_for_key(key)?;
                self.assign(item, key, value).map(Some)
            }
            ContextKind::FreeformArray => {
                let array = self.stack.current().target;
                let scalar = self.document.new_scalar(value);
                let entry = self.document.new_entry(key, scalar);
                self.document.push(array, entry)?;
                Ok(None)
            }
            // Key-value lines are plain text in string arrays
            ContextKind::StringArray => Ok(None),
        }
    }

    /// `* value`. Returns the scalar appended, if the context takes bullets.
    pub fn bullet(&mut self, value: &str) -> Result<Option<NodeId>, ParseFault> {
        match self.stack.kind() {
            ContextKind::UnknownArray | ContextKind::StringArray => {
                let frame = self.stack.current_mut();
                frame.kind = ContextKind::StringArray;
                let array = frame.target;
                let scalar = self.document.new_scalar(value.trim_end());
                self.document.push(array, scalar)?;
                Ok(Some(scalar))
            }
            _ => Ok(None),
        }
    }

    /// `[key]`, `[.key]`, `[+key]` or `[.+key]`.
    pub fn open_array(
        &mut self,
        key: &str,
        relative: bool,
        freeform: bool,
    ) -> Result<(), ParseFault> {
        let (array, owner) = if relative {
            let holder = self.relative_holder(key)?;
            self.attach_array(holder, key)?
        } else {
            self.stack.pop();
            let base = self.stack.enclosing_object();
            self.attach_array(Holder::Object(base), key)?
        };
        self.stack.push(ContextFrame::array(array, owner, freeform));
        Ok(())
    }

    /// `{key}` or `{.key}`.
    ///
    /// The dot only matters inside freeform arrays, where every scope becomes an entry.
    pub fn open_scope(&mut self, key: &str) -> Result<(), ParseFault> {
        let target = if self.stack.kind() == ContextKind::FreeformArray {
            let array = self.stack.current().target;
            let object = self.document.new_object();
            let entry = self.document.new_entry(key, object);
            self.document.push(array, entry)?;
            object
        } else {
            self.stack.pop();
            let base = self.stack.enclosing_object();
            self.document.resolve_object(base, key)?
        };
        self.stack.push(ContextFrame::object(target));
        Ok(())
    }

    /// `[]` or `{}`: leave the innermost construct. The root is never left.
    pub fn close(&mut self) {
        self.stack.pop();
    }

    /// A plain line inside a freeform array becomes a `text` entry; blank lines are dropped.
    pub fn freeform_text(&mut self, text: &str) -> Result<(), ParseFault> {
        if text.is_empty() {
            return Ok(());
        }
        let array = self.stack.current().target;
        let scalar = self.document.new_scalar(text);
        let entry = self.document.new_entry("text", scalar);
        self.document.push(array, entry)
    }

    /// Set the scalar at dot-path `key` under `target`, overwriting what was there.
    fn assign(&mut self, target: NodeId, key: &str, value: &str) -> Result<NodeId, ParseFault> {
        let (parent, last) = self.document.resolve_parent(target, key)?;
        let scalar = self.document.new_scalar(value);
        self.document.set_property(parent, last, scalar)?;
        Ok(scalar)
    }

    /// The object-array item a line with `key` writes into.
    ///
    /// The first key seen in an array becomes its delimiter; every occurrence of the
    /// delimiter starts a new item.
    fn item_for_key(&mut self, key: &str) -> Result<NodeId, ParseFault> {
        let frame = self.stack.current_mut();
        frame.kind = ContextKind::ObjectArray;
        let delimiter = frame.delimiter.get_or_insert_with(|| key.to_string());
        if delimiter.as_str() == key {
            self.start_item()
        } else {
            frame.item.ok_or(ParseFault::MissingArrayItem(frame.target))
        }
    }

    /// Append a fresh object to the current array frame and make it the current item.
    fn start_item(&mut self) -> Result<NodeId, ParseFault> {
        let item = self.document.new_object();
        let frame = self.stack.current_mut();
        self.document.push(frame.target, item)?;
        frame.item = Some(item);
        Ok(item)
    }

    /// Where a dotted array command attaches, given the current context.
    fn relative_holder(&mut self, key: &str) -> Result<Holder, ParseFault> {
        match self.stack.kind() {
            ContextKind::UnknownArray => {
                let frame = self.stack.current_mut();
                frame.kind = ContextKind::ObjectArray;
                frame.delimiter = Some(key.to_string());
                self.start_item().map(Holder::Object)
            }
            ContextKind::ObjectArray => self.item_for_key(key).map(Holder::Object),
            ContextKind::FreeformArray => Ok(Holder::Entry(self.stack.current().target)),
            ContextKind::Object => Ok(Holder::Object(self.stack.current().target)),
            // A sibling of the string array, on the object holding it
            ContextKind::StringArray => {
                let frame = self.stack.current();
                let owner = frame.owner.unwrap_or_else(|| self.stack.enclosing_object());
                Ok(Holder::Object(owner))
            }
        }
    }

    /// Attach a fresh array at `key`. Returns the array and the object now holding it.
    fn attach_array(&mut self, holder: Holder, key: &str) -> Result<(NodeId, NodeId), ParseFault> {
        let array = self.document.new_array();
        let owner = match holder {
            Holder::Object(object) => {
                let (parent, last) = self.document.resolve_parent(object, key)?;
                self.document.set_property(parent, last, array)?;
                parent
            }
            Holder::Entry(list) => {
                let entry = self.document.new_entry(key, array);
                self.document.push(list, entry)?;
                entry
            }
        };
        Ok((array, owner))
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_value_in_root() {
        let mut builder = TreeBuilder::new();
        let scalar = builder.key_value("a.b", "v  ").unwrap();
        assert!(scalar.is_some());
        assert_eq!(builder.document().to_value(), json!({"a": {"b": "v"}}));
    }

    #[test]
    fn test_first_key_delimits_items() {
        let mut builder = TreeBuilder::new();
        builder.open_array("people", false, false).unwrap();
        builder.key_value("name", "Alice").unwrap();
        builder.key_value("role", "eng").unwrap();
        builder.key_value("name", "Bob").unwrap();
        assert_eq!(builder.context(), ContextKind::ObjectArray);
        assert_eq!(
            builder.document().to_value(),
            json!({"people": [{"name": "Alice", "role": "eng"}, {"name": "Bob"}]})
        );
    }

    #[test]
    fn test_bullets_promote_to_string_array() {
        let mut builder = TreeBuilder::new();
        builder.open_array("list", false, false).unwrap();
        builder.bullet("one").unwrap();
        builder.bullet("two ").unwrap();
        assert_eq!(builder.context(), ContextKind::StringArray);
        assert_eq!(
            builder.document().to_value(),
            json!({"list": ["one", "two"]})
        );
    }

    #[test]
    fn test_bullet_outside_array_is_ignored() {
        let mut builder = TreeBuilder::new();
        assert_eq!(builder.bullet("x").unwrap(), None);
        assert!(builder.document().is_empty());
    }

    #[test]
    fn test_relative_array_in_untyped_array_starts_item() {
        let mut builder = TreeBuilder::new();
        builder.open_array("array", false, false).unwrap();
        builder.open_array("subarray", true, false).unwrap();
        builder.key_value("key", "value").unwrap();
        assert_eq!(builder.stack().depth(), 3);
        assert_eq!(
            builder.document().to_value(),
            json!({"array": [{"subarray": [{"key": "value"}]}]})
        );
    }

    #[test]
    fn test_undotted_array_resolves_from_enclosing_item() {
        let mut builder = TreeBuilder::new();
        builder.open_array("outer", false, false).unwrap();
        builder.key_value("name", "a").unwrap();
        builder.open_array("inner", true, false).unwrap();
        builder.bullet("x").unwrap();
        // Resolved against the open item, not the root
        builder.open_array("other", false, false).unwrap();
        builder.bullet("y").unwrap();
        assert_eq!(
            builder.document().to_value(),
            json!({"outer": [{"name": "a", "inner": ["x"], "other": ["y"]}]})
        );
    }

    #[test]
    fn test_dotted_array_in_string_array_joins_its_holder() {
        let mut builder = TreeBuilder::new();
        builder.open_scope("scope").unwrap();
        builder.open_array("a.b", false, false).unwrap();
        builder.bullet("x").unwrap();
        builder.open_array("c", true, false).unwrap();
        builder.bullet("y").unwrap();
        let holder = builder.document().get_path("scope.a").map(|a| a.id());
        assert_eq!(builder.stack().current().owner, holder);
        assert_eq!(
            builder.document().to_value(),
            json!({"scope": {"a": {"b": ["x"], "c": ["y"]}}})
        );
    }

    #[test]
    fn test_scope_inside_freeform_is_an_entry() {
        let mut builder = TreeBuilder::new();
        builder.open_array("ff", false, true).unwrap();
        builder.freeform_text("Text").unwrap();
        builder.freeform_text("").unwrap();
        builder.open_scope("image").unwrap();
        builder.key_value("name", "map.jpg").unwrap();
        builder.close();
        builder.key_value("kind", "value ").unwrap();
        assert_eq!(
            builder.document().to_value(),
            json!({"ff": [
                {"type": "text", "value": "Text"},
                {"type": "image", "value": {"name": "map.jpg"}},
                {"type": "kind", "value": "value"}
            ]})
        );
    }

    #[test]
    fn test_scope_pops_current_frame_first() {
        let mut builder = TreeBuilder::new();
        builder.open_scope("a").unwrap();
        builder.open_scope("b").unwrap();
        builder.key_value("k", "v").unwrap();
        assert_eq!(builder.stack().depth(), 2);
        assert_eq!(
            builder.document().to_value(),
            json!({"a": {}, "b": {"k": "v"}})
        );
    }

    #[test]
    fn test_close_never_leaves_root() {
        let mut builder = TreeBuilder::new();
        builder.close();
        builder.close();
        assert!(builder.stack().is_at_root());
        builder.key_value("k", "v").unwrap();
        assert_eq!(builder.document().to_value(), json!({"k": "v"}));
    }

    #[test]
    fn test_array_redefinition_discards_previous_contents() {
        let mut builder = TreeBuilder::new();
        builder.open_array("a", false, false).unwrap();
        builder.key_value("k", "v").unwrap();
        builder.close();
        builder.open_array("a", false, false).unwrap();
        builder.bullet("x").unwrap();
        assert_eq!(builder.document().to_value(), json!({"a": ["x"]}));
    }
}
