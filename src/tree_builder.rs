use std::collections::BTreeMap;
use std::convert::Infallible;
use std::mem::take;

use crate::node::NodeData;
use crate::utils::{is_ascii_whitespace_byte, is_raw_text_element, is_void_element};
use crate::{Emitter, Error, HtmlString, Node, Selector, State};

pub(crate) type NodeHook<'h> = Box<dyn FnMut(&Node) + 'h>;
pub(crate) type ErrorHook<'h> = Box<dyn FnMut(Error, &Node) + 'h>;

/// The callback registry owned by [`crate::Parser`]: an ordered list of
/// hooks, each node hook keyed by an optional selector filter.
#[derive(Default)]
pub(crate) struct Callbacks<'h> {
    pub(crate) node: Vec<(Option<Selector>, NodeHook<'h>)>,
    pub(crate) error: Vec<ErrorHook<'h>>,
}

impl<'h> Callbacks<'h> {
    fn visit_node(&mut self, node: &Node) {
        for (filter, hook) in &mut self.node {
            match filter {
                None => hook(node),
                Some(selector) => {
                    if selector.matches(node) {
                        hook(node);
                    }
                }
            }
        }
    }

    fn visit_error(&mut self, error: Error, node: &Node) {
        for hook in &mut self.error {
            hook(error, node);
        }
    }
}

#[derive(Debug)]
enum CurrentToken {
    StartTag {
        name: HtmlString,
        attributes: BTreeMap<HtmlString, HtmlString>,
        self_closing: bool,
    },
    EndTag {
        name: HtmlString,
    },
    Comment {
        content: HtmlString,
    },
    Doctype {
        content: HtmlString,
    },
}

/// An [`Emitter`] that splices emitted constructs into a document tree.
///
/// The tree builder owns the open-element stack; the element on top is the
/// cursor all new nodes are appended to. Start tags descend the cursor
/// unless they are void or self-closing, close tags walk the stack looking
/// for the nearest matching open element and report everything they skip as
/// `tag-not-closed`.
pub(crate) struct TreeBuilder<'cb, 'h> {
    root: Node,
    /// Cursor stack; the synthetic root sits at index 0 and is never popped.
    open: Vec<Node>,
    text: HtmlString,
    current: Option<CurrentToken>,
    attr_name: HtmlString,
    attr_value: HtmlString,
    attr_in_flight: bool,
    last_start_tag: HtmlString,
    callbacks: &'cb mut Callbacks<'h>,
}

impl<'cb, 'h> TreeBuilder<'cb, 'h> {
    pub(crate) fn new(callbacks: &'cb mut Callbacks<'h>) -> Self {
        let root = Node::from_data(NodeData::Tag {
            name: HtmlString::default(),
            attributes: BTreeMap::new(),
            self_closing: false,
        });
        TreeBuilder {
            open: vec![root.clone()],
            root,
            text: HtmlString::default(),
            current: None,
            attr_name: HtmlString::default(),
            attr_value: HtmlString::default(),
            attr_in_flight: false,
            last_start_tag: HtmlString::default(),
            callbacks,
        }
    }

    pub(crate) fn into_root(self) -> Node {
        self.root
    }

    fn cursor(&self) -> Node {
        self.open.last().unwrap_or(&self.root).clone()
    }

    /// Turn the pending text run into a text node under the cursor. Runs
    /// that are entirely whitespace are dropped, except inside raw-text
    /// elements where content is kept byte-for-byte.
    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let content = take(&mut self.text);
        let cursor = self.cursor();
        let verbatim = is_raw_text_element(&cursor.tag_name());
        if !verbatim && content.iter().all(|&b| is_ascii_whitespace_byte(b)) {
            return;
        }
        let node = Node::from_data(NodeData::Text { content });
        cursor.append(&node);
        self.callbacks.visit_node(&node);
    }

    fn commit_attribute(&mut self) {
        if !self.attr_in_flight {
            return;
        }
        self.attr_in_flight = false;
        let name = take(&mut self.attr_name);
        let value = take(&mut self.attr_value);
        if name.is_empty() {
            return;
        }
        if let Some(CurrentToken::StartTag {
            ref mut attributes, ..
        }) = self.current
        {
            // first occurrence of a duplicate name wins
            attributes.entry(name).or_insert(value);
        }
        // end tags carry no attributes; anything parsed for them is dropped
    }

    /// Move the cursor above the nearest open element named `name`. Elements
    /// skipped on the way are implicitly closed and reported. A close tag
    /// with no matching open element has no effect.
    fn close_tag(&mut self, name: &HtmlString) {
        let Some(position) = self
            .open
            .iter()
            .skip(1)
            .rposition(|node| node.tag_name() == *name)
        else {
            return;
        };
        let position = position + 1;
        while self.open.len() > position + 1 {
            if let Some(node) = self.open.pop() {
                self.callbacks.visit_error(Error::TagNotClosed, &node);
            }
        }
        self.open.truncate(position);
    }

    fn append_leaf(&mut self, data: NodeData) {
        self.flush_text();
        let node = Node::from_data(data);
        self.cursor().append(&node);
        self.callbacks.visit_node(&node);
    }
}

impl<'cb, 'h> Emitter for TreeBuilder<'cb, 'h> {
    type Token = Infallible;

    fn pop_token(&mut self) -> Option<Infallible> {
        None
    }

    fn emit_eof(&mut self) {
        self.flush_text();
        while self.open.len() > 1 {
            if let Some(node) = self.open.pop() {
                self.callbacks.visit_error(Error::TagNotClosed, &node);
            }
        }
    }

    fn emit_string(&mut self, s: &[u8]) {
        self.text.extend(s);
    }

    fn init_start_tag(&mut self) {
        self.current = Some(CurrentToken::StartTag {
            name: HtmlString::default(),
            attributes: BTreeMap::new(),
            self_closing: false,
        });
        self.attr_in_flight = false;
    }

    fn init_end_tag(&mut self) {
        self.current = Some(CurrentToken::EndTag {
            name: HtmlString::default(),
        });
        self.attr_in_flight = false;
    }

    fn init_comment(&mut self) {
        self.current = Some(CurrentToken::Comment {
            content: HtmlString::default(),
        });
    }

    fn init_doctype(&mut self) {
        self.current = Some(CurrentToken::Doctype {
            content: HtmlString::default(),
        });
    }

    fn push_tag_name(&mut self, s: &[u8]) {
        match self.current {
            Some(CurrentToken::StartTag { ref mut name, .. })
            | Some(CurrentToken::EndTag { ref mut name }) => name.extend(s),
            _ => (),
        }
    }

    fn push_comment(&mut self, s: &[u8]) {
        if let Some(CurrentToken::Comment { ref mut content }) = self.current {
            content.extend(s);
        }
    }

    fn push_doctype_name(&mut self, s: &[u8]) {
        if let Some(CurrentToken::Doctype { ref mut content }) = self.current {
            content.extend(s);
        }
    }

    fn init_attribute(&mut self) {
        self.commit_attribute();
        self.attr_in_flight = true;
    }

    fn push_attribute_name(&mut self, s: &[u8]) {
        if self.attr_in_flight {
            self.attr_name.extend(s);
        }
    }

    fn push_attribute_value(&mut self, s: &[u8]) {
        if self.attr_in_flight {
            self.attr_value.extend(s);
        }
    }

    fn set_self_closing(&mut self) {
        if let Some(CurrentToken::StartTag {
            ref mut self_closing,
            ..
        }) = self.current
        {
            *self_closing = true;
        }
    }

    fn emit_current_tag(&mut self) -> Option<State> {
        self.commit_attribute();
        match self.current.take() {
            Some(CurrentToken::StartTag {
                name,
                attributes,
                self_closing,
            }) => {
                self.flush_text();
                self.last_start_tag = name.clone();
                let void = is_void_element(&name);
                let raw = is_raw_text_element(&name);
                let node = Node::from_data(NodeData::Tag {
                    name,
                    attributes,
                    self_closing: self_closing || void,
                });
                self.cursor().append(&node);
                self.callbacks.visit_node(&node);
                if !void && !self_closing {
                    self.open.push(node);
                }
                raw.then_some(State::RawText)
            }
            Some(CurrentToken::EndTag { name }) => {
                self.flush_text();
                self.close_tag(&name);
                None
            }
            _ => None,
        }
    }

    fn emit_current_comment(&mut self) {
        if let Some(CurrentToken::Comment { content }) = self.current.take() {
            self.append_leaf(NodeData::Comment { content });
        }
    }

    fn emit_current_doctype(&mut self) {
        if let Some(CurrentToken::Doctype { content }) = self.current.take() {
            self.append_leaf(NodeData::Doctype { content });
        }
    }

    fn current_is_appropriate_end_tag_token(&mut self) -> bool {
        match self.current {
            Some(CurrentToken::EndTag { ref name }) => {
                !self.last_start_tag.is_empty() && self.last_start_tag == *name
            }
            _ => false,
        }
    }

    fn set_last_start_tag(&mut self, last_start_tag: Option<&[u8]>) {
        self.last_start_tag.clear();
        self.last_start_tag
            .extend(last_start_tag.unwrap_or_default());
    }
}
