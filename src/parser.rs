use crate::tree_builder::{Callbacks, TreeBuilder};
use crate::{Error, Node, Selector, Tokenizer};

/// Parse a document or fragment into a tree, without callbacks.
///
/// The returned node is a synthetic root tag with an empty name; the
/// top-level parsed nodes are its direct children. Parsing never fails.
///
/// ```
/// use htmlgrove::parse;
///
/// let doc = parse("<p>hi</p>");
/// assert_eq!(doc.at(0).to_text(false), "hi");
/// ```
#[must_use]
pub fn parse(input: impl AsRef<[u8]>) -> Node {
    Parser::new().parse(input)
}

/// A reusable parser with per-node and per-error callbacks.
///
/// Callbacks run synchronously inside the tokenization loop, after the node
/// they concern has been linked into the tree, and stay registered across
/// [`Parser::parse`] calls until [`Parser::clear_callbacks`].
///
/// ```
/// use htmlgrove::Parser;
///
/// let mut links = Vec::new();
/// let mut parser = Parser::new();
/// parser.on_match("a[href]", |node| {
///     links.push(node.get_attr("href").unwrap());
/// });
/// parser.parse("<a href=/one>x</a><b><a href=/two>y</a></b>");
/// drop(parser);
/// assert_eq!(links, vec!["/one", "/two"]);
/// ```
#[derive(Default)]
pub struct Parser<'h> {
    callbacks: Callbacks<'h>,
}

impl<'h> Parser<'h> {
    /// A parser with no callbacks registered.
    #[must_use]
    pub fn new() -> Self {
        Parser::default()
    }

    /// Register a hook invoked for every node as it is linked into the
    /// tree: tags at their start tag, text, comments and doctypes at
    /// emission. Close tags produce no node and no invocation.
    pub fn on_node(&mut self, hook: impl FnMut(&Node) + 'h) -> &mut Self {
        self.callbacks.node.push((None, Box::new(hook)));
        self
    }

    /// Register a hook invoked only for nodes matching `selector` at the
    /// moment of emission. Ancestors are already linked, so descendant
    /// chains work mid-parse.
    pub fn on_match(&mut self, selector: impl Into<Selector>, hook: impl FnMut(&Node) + 'h) -> &mut Self {
        self.callbacks.node.push((Some(selector.into()), Box::new(hook)));
        self
    }

    /// Register a hook invoked for recoverable parse conditions, with the
    /// offending node. The only condition currently reported is
    /// [`Error::TagNotClosed`], once per element still open when its
    /// enclosing scope ends.
    pub fn on_error(&mut self, hook: impl FnMut(Error, &Node) + 'h) -> &mut Self {
        self.callbacks.error.push(Box::new(hook));
        self
    }

    /// Drop all registered callbacks.
    pub fn clear_callbacks(&mut self) {
        self.callbacks.node.clear();
        self.callbacks.error.clear();
    }

    /// Parse `input` into a fresh tree. See [`parse`].
    pub fn parse(&mut self, input: impl AsRef<[u8]>) -> Node {
        let input = input.as_ref();
        Tokenizer::new(input, TreeBuilder::new(&mut self.callbacks))
            .finish()
            .into_root()
    }
}
