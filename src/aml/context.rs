//! Construction contexts
//!
//!     While parsing, lines are written "somewhere": the root object, a scope opened with
//!     `{key}`, or an array opened with `[key]`. Each of those is a [`ContextFrame`] on the
//!     [`ContextStack`]. The bottom frame is always the root object and can never be popped.
//!
//!     Array frames start out as [`ContextKind::UnknownArray`] and are promoted by the first
//!     line that reveals what they hold: a bullet makes them a string array, a key makes
//!     them an object array.

use crate::aml::document::NodeId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// The root, or a scope opened with `{key}`.
    Object,
    /// A freshly opened `[key]` array nothing has been written to yet.
    UnknownArray,
    /// An array of objects; items are delimited by a repeated key.
    ObjectArray,
    /// An array of strings written with `* bullet` lines.
    StringArray,
    /// A `[+key]` array of `{type, value}` entries.
    FreeformArray,
}

impl ContextKind {
    pub fn is_array(self) -> bool {
        !matches!(self, ContextKind::Object)
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContextKind::Object => "object",
            ContextKind::UnknownArray => "unknown-array",
            ContextKind::ObjectArray => "object-array",
            ContextKind::StringArray => "string-array",
            ContextKind::FreeformArray => "freeform-array",
        };
        f.write_str(name)
    }
}

/// One level of nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFrame {
    pub kind: ContextKind,
    /// The object (for `Object`) or array (for every array kind) receiving writes.
    pub target: NodeId,
    /// Object arrays only: the key whose recurrence starts a new item.
    pub delimiter: Option<String>,
    /// Object arrays only: the item currently being filled.
    pub item: Option<NodeId>,
    /// Array frames only: the object the array was attached to.
    pub owner: Option<NodeId>,
}

impl ContextFrame {
    pub fn object(target: NodeId) -> Self {
        Self {
            kind: ContextKind::Object,
            target,
            delimiter: None,
            item: None,
            owner: None,
        }
    }

    /// A new array frame, freeform or not yet typed, held by `owner`.
    pub fn array(target: NodeId, owner: NodeId, freeform: bool) -> Self {
        let kind = if freeform {
            ContextKind::FreeformArray
        } else {
            ContextKind::UnknownArray
        };
        Self {
            kind,
            target,
            delimiter: None,
            item: None,
            owner: Some(owner),
        }
    }

    /// The object this frame writes properties into, if it has one.
    fn object_target(&self) -> Option<NodeId> {
        match self.kind {
            ContextKind::Object => Some(self.target),
            ContextKind::ObjectArray => self.item,
            _ => None,
        }
    }
}

/// Non-empty stack of frames; the bottom frame is the root object.
#[derive(Debug, Clone)]
pub struct ContextStack {
    frames: Vec<ContextFrame>,
}

impl ContextStack {
    pub fn new(root: NodeId) -> Self {
        Self {
            frames: vec![ContextFrame::object(root)],
        }
    }

    pub fn current(&self) -> &ContextFrame {
        // The root frame is never popped
        &self.frames[self.frames.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut ContextFrame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn kind(&self) -> ContextKind {
        self.current().kind
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.frames.len() == 1
    }

    pub fn push(&mut self, frame: ContextFrame) {
        self.frames.push(frame);
    }

    /// Pop the current frame. The root frame stays put.
    pub fn pop(&mut self) -> Option<ContextFrame> {
        if self.is_at_root() {
            None
        } else {
            self.frames.pop()
        }
    }

    /// The nearest object receiving writes, searching from the top of the stack down.
    ///
    /// Plain array frames are skipped; an object array counts through its current item.
    /// The root frame guarantees a result.
    pub fn enclosing_object(&self) -> NodeId {
        self.frames
            .iter()
            .rev()
            .find_map(ContextFrame::object_target)
            .unwrap_or(self.frames[0].target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aml::document::Document;

    #[test]
    fn test_root_frame_is_never_popped() {
        let doc = Document::new();
        let mut stack = ContextStack::new(doc.root_id());
        assert!(stack.pop().is_none());
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.kind(), ContextKind::Object);
    }

    #[test]
    fn test_enclosing_object_skips_array_frames() {
        let mut doc = Document::new();
        let scope = doc.new_object();
        let array = doc.new_array();
        let mut stack = ContextStack::new(doc.root_id());
        stack.push(ContextFrame::object(scope));
        stack.push(ContextFrame::array(array, scope, false));

        assert_eq!(stack.kind(), ContextKind::UnknownArray);
        assert_eq!(stack.enclosing_object(), scope);
    }

    #[test]
    fn test_enclosing_object_uses_current_item() {
        let mut doc = Document::new();
        let array = doc.new_array();
        let item = doc.new_object();
        let mut stack = ContextStack::new(doc.root_id());
        stack.push(ContextFrame::array(array, doc.root_id(), false));
        assert_eq!(stack.enclosing_object(), doc.root_id());

        let frame = stack.current_mut();
        frame.kind = ContextKind::ObjectArray;
        frame.item = Some(item);
        assert_eq!(stack.enclosing_object(), item);
    }

    #[test]
    fn test_freeform_frame_kind() {
        let mut doc = Document::new();
        let array = doc.new_array();
        assert_eq!(
            ContextFrame::array(array, doc.root_id(), true).kind,
            ContextKind::FreeformArray
        );
        assert!(ContextKind::FreeformArray.is_array());
        assert!(!ContextKind::Object.is_array());
    }
}
