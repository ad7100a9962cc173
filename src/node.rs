use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

use crate::{HtmlString, Selector};

/// The kind of a [`Node`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeKind {
    /// The sentinel kind: what [`Node::at`] and [`Node::select`] return when
    /// there is nothing to return.
    None,
    /// A run of text.
    Text,
    /// A tag (element). The only kind that can have children.
    Tag,
    /// A comment.
    Comment,
    /// A doctype declaration.
    Doctype,
}

/// The per-kind payload. Fields that make no sense for a kind do not exist.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum NodeData {
    None,
    Text {
        content: HtmlString,
    },
    Tag {
        name: HtmlString,
        attributes: BTreeMap<HtmlString, HtmlString>,
        self_closing: bool,
    },
    Comment {
        content: HtmlString,
    },
    Doctype {
        content: HtmlString,
    },
}

pub(crate) struct NodeInner {
    pub(crate) data: NodeData,
    parent: Weak<RefCell<NodeInner>>,
    children: Vec<Node>,
}

/// A handle to a node in a document tree.
///
/// Handles are cheap to clone and share ownership of the underlying node:
/// `clone()` gives a second handle to the *same* node, [`Node::deep_clone`]
/// duplicates the subtree. Children are owned by their parent; the parent
/// link is weak and never keeps an ancestor alive.
///
/// Out-of-range and failed lookups return a sentinel node of kind
/// [`NodeKind::None`] instead of failing, so access chains like
/// `root.at(0).at(2).get_attr("href")` are always safe to write.
#[derive(Clone)]
pub struct Node {
    inner: Rc<RefCell<NodeInner>>,
}

impl Default for Node {
    /// The sentinel node: kind [`NodeKind::None`], no children.
    fn default() -> Self {
        Node::from_data(NodeData::None)
    }
}

impl Node {
    pub(crate) fn from_data(data: NodeData) -> Node {
        Node {
            inner: Rc::new(RefCell::new(NodeInner {
                data,
                parent: Weak::new(),
                children: Vec::new(),
            })),
        }
    }

    /// Construct a standalone tag node. The name and attribute names are
    /// lowercased; duplicate attribute names keep the first occurrence.
    pub fn new_tag(name: impl Into<HtmlString>, attributes: &[(&str, &str)]) -> Node {
        let mut name: HtmlString = name.into();
        name.make_ascii_lowercase();
        let mut map = BTreeMap::new();
        for (k, v) in attributes {
            let mut k: HtmlString = (*k).into();
            k.make_ascii_lowercase();
            map.entry(k).or_insert_with(|| (*v).into());
        }
        Node::from_data(NodeData::Tag {
            name,
            attributes: map,
            self_closing: false,
        })
    }

    /// Construct a standalone text node.
    pub fn new_text(content: impl Into<HtmlString>) -> Node {
        Node::from_data(NodeData::Text {
            content: content.into(),
        })
    }

    /// Construct a standalone comment node.
    pub fn new_comment(content: impl Into<HtmlString>) -> Node {
        Node::from_data(NodeData::Comment {
            content: content.into(),
        })
    }

    /// Construct a standalone doctype node.
    pub fn new_doctype(content: impl Into<HtmlString>) -> Node {
        Node::from_data(NodeData::Doctype {
            content: content.into(),
        })
    }

    /// This node's kind.
    pub fn kind(&self) -> NodeKind {
        match self.inner.borrow().data {
            NodeData::None => NodeKind::None,
            NodeData::Text { .. } => NodeKind::Text,
            NodeData::Tag { .. } => NodeKind::Tag,
            NodeData::Comment { .. } => NodeKind::Comment,
            NodeData::Doctype { .. } => NodeKind::Doctype,
        }
    }

    /// Whether this is the sentinel node.
    pub fn is_null(&self) -> bool {
        self.kind() == NodeKind::None
    }

    /// The tag name, lowercased. Empty for non-tag nodes and for the
    /// synthetic root.
    pub fn tag_name(&self) -> HtmlString {
        match self.inner.borrow().data {
            NodeData::Tag { ref name, .. } => name.clone(),
            _ => HtmlString::default(),
        }
    }

    /// The literal payload of a text, comment or doctype node. Empty for
    /// tags.
    pub fn content(&self) -> HtmlString {
        match self.inner.borrow().data {
            NodeData::Text { ref content }
            | NodeData::Comment { ref content }
            | NodeData::Doctype { ref content } => content.clone(),
            _ => HtmlString::default(),
        }
    }

    /// Whether the source used `/>`, or the tag is a void element.
    pub fn self_closing(&self) -> bool {
        match self.inner.borrow().data {
            NodeData::Tag { self_closing, .. } => self_closing,
            _ => false,
        }
    }

    pub(crate) fn set_self_closing(&self, value: bool) {
        if let NodeData::Tag {
            ref mut self_closing,
            ..
        } = self.inner.borrow_mut().data
        {
            *self_closing = value;
        }
    }

    /// All attributes in deterministic (sorted) order.
    pub fn attributes(&self) -> Vec<(HtmlString, HtmlString)> {
        match self.inner.borrow().data {
            NodeData::Tag { ref attributes, .. } => attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Look up an attribute value. The name is lowercased before the lookup.
    pub fn get_attr(&self, name: impl AsRef<[u8]>) -> Option<HtmlString> {
        let name = name.as_ref().to_ascii_lowercase();
        match self.inner.borrow().data {
            NodeData::Tag { ref attributes, .. } => attributes.get(name.as_slice()).cloned(),
            _ => None,
        }
    }

    /// Set an attribute, replacing any previous value. The name is
    /// lowercased. No-op on non-tag nodes.
    pub fn set_attr(&self, name: impl Into<HtmlString>, value: impl Into<HtmlString>) {
        let mut name: HtmlString = name.into();
        name.make_ascii_lowercase();
        if let NodeData::Tag {
            ref mut attributes, ..
        } = self.inner.borrow_mut().data
        {
            attributes.insert(name, value.into());
        }
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Whether this node has no children.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().children.is_empty()
    }

    /// The child at index `i`, or the sentinel node when out of range.
    pub fn at(&self, i: usize) -> Node {
        self.inner
            .borrow()
            .children
            .get(i)
            .cloned()
            .unwrap_or_default()
    }

    /// Handles to all direct children, in order.
    pub fn children(&self) -> Vec<Node> {
        self.inner.borrow().children.clone()
    }

    /// The parent, if this node is linked into a tree.
    pub fn parent(&self) -> Option<Node> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| Node { inner })
    }

    /// Append `child` as the last child, rewiring its parent link. A child
    /// that already sits in a tree is detached from its previous parent
    /// first.
    ///
    /// Only tag nodes can carry children; appending to any other kind is a
    /// no-op, as is appending a node into its own subtree.
    pub fn append(&self, child: &Node) {
        if !matches!(self.inner.borrow().data, NodeData::Tag { .. }) {
            return;
        }
        if Rc::ptr_eq(&self.inner, &child.inner) || child.is_ancestor_of(self) {
            return;
        }
        child.detach();
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().children.push(child.clone());
    }

    /// Whether two handles refer to the same node, as opposed to the
    /// structural equality of `==`.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn is_ancestor_of(&self, node: &Node) -> bool {
        let mut cursor = node.parent();
        while let Some(n) = cursor {
            if Rc::ptr_eq(&n.inner, &self.inner) {
                return true;
            }
            cursor = n.parent();
        }
        false
    }

    fn detach(&self) {
        let parent = self.inner.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|c| !Rc::ptr_eq(&c.inner, &self.inner));
        }
        self.inner.borrow_mut().parent = Weak::new();
    }

    /// Duplicate this subtree. Parent links inside the clone point into the
    /// clone; the clone root has no parent.
    pub fn deep_clone(&self) -> Node {
        let inner = self.inner.borrow();
        let clone = Node::from_data(inner.data.clone());
        for child in &inner.children {
            let child_clone = child.deep_clone();
            child_clone.inner.borrow_mut().parent = Rc::downgrade(&clone.inner);
            clone.inner.borrow_mut().children.push(child_clone);
        }
        clone
    }

    /// Depth-first pre-order traversal over this node and its descendants.
    /// The visitor's return value decides whether to descend into the
    /// current node's children.
    pub fn walk<F: FnMut(&Node) -> bool>(&self, visitor: &mut F) {
        if visitor(self) {
            for child in self.children() {
                child.walk(visitor);
            }
        }
    }

    /// The first node in document order within this subtree (including the
    /// node itself) matching `selector`, or the sentinel node.
    pub fn select(&self, selector: &str) -> Node {
        self.try_select(selector).unwrap_or_default()
    }

    /// Like [`Node::select`], but with an explicit miss.
    pub fn try_select(&self, selector: &str) -> Option<Node> {
        self.select_with(&Selector::new(selector), true)
    }

    /// Query with a precompiled selector. With `nested` false only the node
    /// itself and its direct children are considered.
    pub fn select_with(&self, selector: &Selector, nested: bool) -> Option<Node> {
        if selector.is_empty() {
            return None;
        }
        if selector.matches(self) {
            return Some(self.clone());
        }
        if nested {
            for child in self.children() {
                if let Some(found) = child.select_with(selector, true) {
                    return Some(found);
                }
            }
            None
        } else {
            self.children().into_iter().find(|c| selector.matches(c))
        }
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        let mut s = f.debug_struct("Node");
        match inner.data {
            NodeData::None => s.field("kind", &NodeKind::None),
            NodeData::Text { ref content } => s.field("text", content),
            NodeData::Tag { ref name, .. } => s.field("tag", name),
            NodeData::Comment { ref content } => s.field("comment", content),
            NodeData::Doctype { ref content } => s.field("doctype", content),
        };
        if !inner.children.is_empty() {
            s.field("children", &inner.children);
        }
        s.finish()
    }
}

/// Structural equality: kind, name, content, attributes and the ordered
/// children, recursively. Parent links and node identity are ignored.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        let a = self.inner.borrow();
        let b = other.inner.borrow();
        a.data == b.data && a.children == b.children
    }
}

impl Eq for Node {}

#[cfg(test)]
mod tests {
    use super::{Node, NodeKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn at_out_of_range_is_sentinel() {
        let div = Node::new_tag("div", &[]);
        assert!(div.at(3).is_null());
        assert_eq!(div.at(3).kind(), NodeKind::None);
    }

    #[test]
    fn append_rewires_parent() {
        let a = Node::new_tag("a", &[]);
        let b = Node::new_tag("b", &[]);
        let child = Node::new_text("x");
        a.append(&child);
        assert_eq!(a.len(), 1);
        b.append(&child);
        assert_eq!(a.len(), 0);
        assert_eq!(b.len(), 1);
        assert!(child.parent().unwrap() == b);
    }

    #[test]
    fn append_into_own_subtree_is_rejected() {
        let a = Node::new_tag("a", &[]);
        let b = Node::new_tag("b", &[]);
        a.append(&b);
        b.append(&a);
        assert_eq!(b.len(), 0);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn attr_names_are_lowercased() {
        let tag = Node::new_tag("DIV", &[("HREF", "/x")]);
        assert_eq!(tag.tag_name(), "div");
        assert_eq!(tag.get_attr("Href").unwrap(), "/x");
        tag.set_attr("ID", "main");
        assert_eq!(tag.get_attr("id").unwrap(), "main");
    }

    #[test]
    fn set_attr_is_idempotent() {
        let a = Node::new_tag("a", &[]);
        a.set_attr("k", "v");
        let once = a.deep_clone();
        a.set_attr("k", "v");
        assert_eq!(a, once);
    }

    #[test]
    fn deep_clone_detaches_from_original() {
        let div = Node::new_tag("div", &[]);
        let p = Node::new_tag("p", &[]);
        div.append(&p);
        p.append(&Node::new_text("hi"));

        let clone = div.deep_clone();
        assert!(clone.parent().is_none());
        assert_eq!(clone, div);
        clone.at(0).set_attr("changed", "1");
        assert!(div.at(0).get_attr("changed").is_none());
        assert!(clone.at(0).parent().unwrap() == clone);
    }

    #[test]
    fn walk_can_prune() {
        let div = Node::new_tag("div", &[]);
        let p = Node::new_tag("p", &[]);
        p.append(&Node::new_text("deep"));
        div.append(&p);

        let mut seen = Vec::new();
        div.walk(&mut |node: &Node| {
            seen.push(node.kind());
            node.kind() != NodeKind::Tag || node.tag_name() != "p"
        });
        assert_eq!(seen, vec![NodeKind::Tag, NodeKind::Tag]);
    }
}
