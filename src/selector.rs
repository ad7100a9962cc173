use crate::utils::{find_subslice, is_ascii_whitespace_byte};
use crate::{HtmlString, Node, NodeKind};

/// Attribute comparison operators: `=`, `*=`, `^=`, `$=`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AttrOp {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Clone, Debug, Default)]
struct AttrCheck {
    name: HtmlString,
    /// `None` means presence-only: `[href]`.
    op: Option<AttrOp>,
    value: HtmlString,
}

/// One simple selector: every present field must hold for a node to pass.
#[derive(Clone, Debug, Default)]
struct Condition {
    tag_name: Option<HtmlString>,
    id: Option<HtmlString>,
    classes: Vec<HtmlString>,
    /// 1-based position among same-tag siblings; 0 matches any position.
    index: u32,
    attrs: Vec<AttrCheck>,
}

/// A descendant-combinator chain. `steps[0]` is the leaf condition, the
/// remaining steps are ancestor requirements, nearest first.
#[derive(Clone, Debug)]
struct Chain {
    steps: Vec<Condition>,
}

/// A compiled selector: a disjunction of matcher chains.
///
/// The grammar is a compact subset of CSS: tag names, `#id`, `.class`,
/// `:index`, `[attr]`/`[attr=v]`/`[attr*=v]`/`[attr^=v]`/`[attr$=v]`,
/// whitespace as the descendant combinator and `,` for alternatives.
///
/// Compilation never fails: ill-formed input (and the empty string) yields a
/// selector with no chains, which matches nothing.
///
/// ```
/// use htmlgrove::{parse, Selector};
///
/// let doc = parse("<div><a class='x y'>k</a></div>");
/// let selector = Selector::new("div a.x.y");
/// assert!(selector.matches(&doc.at(0).at(0)));
/// assert!(Selector::new("li:::").is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Selector {
    chains: Vec<Chain>,
}

impl Selector {
    /// Compile a selector expression.
    #[must_use]
    pub fn new(input: &str) -> Selector {
        Selector {
            chains: Compiler::new(input.as_bytes()).run().unwrap_or_default(),
        }
    }

    /// Whether compilation produced no usable matcher (empty or ill-formed
    /// input). An empty selector matches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Evaluate this selector against a node in its tree context. Ancestor
    /// requirements walk the node's parent chain.
    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        self.chains.iter().any(|chain| chain.matches(node))
    }
}

impl From<&str> for Selector {
    fn from(input: &str) -> Selector {
        Selector::new(input)
    }
}

impl Chain {
    fn matches(&self, node: &Node) -> bool {
        let mut steps = self.steps.iter();
        match steps.next() {
            Some(leaf) if leaf.matches(node) => (),
            _ => return false,
        }

        // each ancestor requirement must be satisfied strictly further from
        // the node than the previous one
        let mut cursor = node.parent();
        for step in steps {
            loop {
                match cursor {
                    None => return false,
                    Some(ancestor) => {
                        let matched = step.matches(&ancestor);
                        cursor = ancestor.parent();
                        if matched {
                            break;
                        }
                    }
                }
            }
        }
        true
    }
}

impl Condition {
    fn is_vacuous(&self) -> bool {
        self.tag_name.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.index == 0
            && self.attrs.is_empty()
    }

    fn matches(&self, node: &Node) -> bool {
        if node.kind() != NodeKind::Tag {
            return false;
        }

        if let Some(ref tag_name) = self.tag_name {
            if node.tag_name() != *tag_name {
                return false;
            }
        }

        if let Some(ref id) = self.id {
            match node.get_attr("id") {
                Some(ref value) if value == id => (),
                _ => return false,
            }
        }

        if !self.classes.is_empty() {
            let Some(class_attr) = node.get_attr("class") else {
                return false;
            };
            for class in &self.classes {
                let mut tokens = whitespace_tokens(&class_attr);
                if !tokens.any(|t| t == &class.0[..]) {
                    return false;
                }
            }
        }

        if self.index != 0 && !self.matches_sibling_index(node) {
            return false;
        }

        for attr in &self.attrs {
            let Some(value) = node.get_attr(&attr.name) else {
                return false;
            };
            let holds = match attr.op {
                None => true,
                Some(AttrOp::Equals) => value == attr.value,
                Some(AttrOp::Contains) => contains_subslice(&value, &attr.value),
                Some(AttrOp::StartsWith) => value.starts_with(&attr.value[..]),
                Some(AttrOp::EndsWith) => value.ends_with(&attr.value[..]),
            };
            if !holds {
                return false;
            }
        }

        true
    }

    /// Whether `node` sits at the required 1-based position among its
    /// parent's children of the same tag name.
    fn matches_sibling_index(&self, node: &Node) -> bool {
        let Some(parent) = node.parent() else {
            return false;
        };
        let name = node.tag_name();
        let mut position = 0u32;
        for sibling in parent.children() {
            if sibling.kind() == NodeKind::Tag && sibling.tag_name() == name {
                position += 1;
                if sibling.ptr_eq(node) {
                    return position == self.index;
                }
            }
        }
        false
    }
}

fn whitespace_tokens(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split(|&b| is_ascii_whitespace_byte(b))
        .filter(|token| !token.is_empty())
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    find_subslice(haystack, needle).is_some()
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LexState {
    /// At a boundary: between simple selectors or at the very start.
    Route,
    Tag,
    Class,
    Id,
    Index,
    AttrName,
    /// Between `*`/`^`/`$` and the required `=`.
    AttrOperator,
    AttrValue,
    /// A bracket expression just closed; only another part or a boundary may
    /// follow.
    AfterPart,
}

struct Compiler<'a> {
    input: &'a [u8],
    state: LexState,
    buffer: Vec<u8>,
    condition: Condition,
    /// Conditions of the current chain in source order (ancestors first).
    simples: Vec<Condition>,
    chains: Vec<Chain>,
    attr: AttrCheck,
    value_quote: Option<u8>,
    value_closed: bool,
}

impl<'a> Compiler<'a> {
    fn new(input: &'a [u8]) -> Self {
        Compiler {
            input,
            state: LexState::Route,
            buffer: Vec::new(),
            condition: Condition::default(),
            simples: Vec::new(),
            chains: Vec::new(),
            attr: AttrCheck::default(),
            value_quote: None,
            value_closed: false,
        }
    }

    /// `None` marks ill-formed input: the whole selector is discarded.
    fn run(mut self) -> Option<Vec<Chain>> {
        for i in 0..self.input.len() {
            let b = self.input[i];
            match self.state {
                LexState::Route | LexState::AfterPart => self.consume_boundary(b)?,
                LexState::Tag | LexState::Class | LexState::Id => {
                    if is_name_byte(b) {
                        self.buffer.push(b);
                    } else {
                        self.consume_delimiter(b)?;
                    }
                }
                LexState::Index => {
                    if b.is_ascii_digit() {
                        self.buffer.push(b);
                    } else {
                        self.consume_delimiter(b)?;
                    }
                }
                LexState::AttrName => match b {
                    b']' => {
                        self.finish_attr()?;
                    }
                    b'=' => {
                        self.attr.op = Some(AttrOp::Equals);
                        self.state = LexState::AttrValue;
                    }
                    b'*' => {
                        self.attr.op = Some(AttrOp::Contains);
                        self.state = LexState::AttrOperator;
                    }
                    b'^' => {
                        self.attr.op = Some(AttrOp::StartsWith);
                        self.state = LexState::AttrOperator;
                    }
                    b'$' => {
                        self.attr.op = Some(AttrOp::EndsWith);
                        self.state = LexState::AttrOperator;
                    }
                    _ if is_name_byte(b) => self.attr.name.push(b.to_ascii_lowercase()),
                    _ => return None,
                },
                LexState::AttrOperator => {
                    if b == b'=' {
                        self.state = LexState::AttrValue;
                    } else {
                        return None;
                    }
                }
                LexState::AttrValue => self.consume_attr_value(b)?,
            }
        }

        match self.state {
            LexState::AttrName | LexState::AttrOperator | LexState::AttrValue => return None,
            _ => {
                self.finish_part()?;
                self.finish_simple();
                self.finish_chain();
            }
        }

        Some(self.chains)
    }

    /// A byte seen while not inside a name or bracket expression.
    fn consume_boundary(&mut self, b: u8) -> Option<()> {
        match b {
            b'.' => self.start_part(LexState::Class),
            b'#' => self.start_part(LexState::Id),
            b':' => self.start_part(LexState::Index),
            b'[' => {
                self.attr = AttrCheck::default();
                self.value_quote = None;
                self.value_closed = false;
                self.start_part(LexState::AttrName);
            }
            _ if is_ascii_whitespace_byte(b) => {
                self.finish_simple();
                self.state = LexState::Route;
            }
            b',' => {
                self.finish_simple();
                self.finish_chain();
                self.state = LexState::Route;
            }
            _ if b.is_ascii_alphabetic() && self.state == LexState::Route => {
                self.buffer.push(b);
                self.state = LexState::Tag;
            }
            _ => return None,
        }
        Some(())
    }

    /// A non-name byte seen while lexing a name or index: close the current
    /// part, then treat the byte as a boundary.
    fn consume_delimiter(&mut self, b: u8) -> Option<()> {
        self.finish_part()?;
        self.state = LexState::AfterPart;
        self.consume_boundary(b)
    }

    fn consume_attr_value(&mut self, b: u8) -> Option<()> {
        if self.value_closed {
            if b == b']' {
                self.finish_attr()?;
                return Some(());
            }
            return None;
        }
        match self.value_quote {
            Some(quote) => {
                if b == quote {
                    self.value_closed = true;
                } else {
                    self.buffer.push(b);
                }
            }
            None => match b {
                b'"' | b'\'' if self.buffer.is_empty() => self.value_quote = Some(b),
                b']' => self.finish_attr()?,
                _ if is_name_byte(b) => self.buffer.push(b),
                _ => return None,
            },
        }
        Some(())
    }

    fn start_part(&mut self, next: LexState) {
        // only reached from Route/AfterPart, nothing to commit
        self.buffer.clear();
        self.state = next;
    }

    /// Commit the token accumulated for the current lexical state into the
    /// condition under construction.
    fn finish_part(&mut self) -> Option<()> {
        let token = std::mem::take(&mut self.buffer);
        match self.state {
            LexState::Route | LexState::AfterPart => (),
            LexState::Tag => {
                let mut name = HtmlString(token);
                name.make_ascii_lowercase();
                self.condition.tag_name = Some(name);
            }
            LexState::Class => {
                if token.is_empty() {
                    return None;
                }
                self.condition.classes.push(HtmlString(token));
            }
            LexState::Id => {
                if token.is_empty() {
                    return None;
                }
                self.condition.id = Some(HtmlString(token));
            }
            LexState::Index => {
                let digits = std::str::from_utf8(&token).ok()?;
                self.condition.index = digits.parse().ok()?;
            }
            LexState::AttrName | LexState::AttrOperator | LexState::AttrValue => return None,
        }
        Some(())
    }

    fn finish_attr(&mut self) -> Option<()> {
        if self.attr.name.is_empty() {
            return None;
        }
        let mut attr = std::mem::take(&mut self.attr);
        attr.value = HtmlString(std::mem::take(&mut self.buffer));
        self.condition.attrs.push(attr);
        self.value_quote = None;
        self.value_closed = false;
        self.state = LexState::AfterPart;
        Some(())
    }

    fn finish_simple(&mut self) {
        let condition = std::mem::take(&mut self.condition);
        if !condition.is_vacuous() {
            self.simples.push(condition);
        }
    }

    fn finish_chain(&mut self) {
        let mut steps = std::mem::take(&mut self.simples);
        if !steps.is_empty() {
            // source order is ancestors first; matching wants the leaf first
            steps.reverse();
            self.chains.push(Chain { steps });
        }
    }
}
