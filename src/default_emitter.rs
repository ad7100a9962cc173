use std::collections::{BTreeMap, VecDeque};
use std::mem::take;

use crate::utils::is_raw_text_element;
use crate::{Emitter, HtmlString, State};

/// A HTML start tag, such as `<p>` or `<a href="/x">`.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct StartTag {
    /// Whether this tag ended with `/>`.
    pub self_closing: bool,

    /// The tag name, lowercased.
    pub name: HtmlString,

    /// The attributes, with lowercased names. For duplicate attribute names
    /// the first occurrence wins.
    pub attributes: BTreeMap<HtmlString, HtmlString>,
}

/// A HTML end tag, such as `</p>`.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct EndTag {
    /// The tag name, lowercased.
    pub name: HtmlString,
}

/// A doctype declaration, such as `<!DOCTYPE html>`.
///
/// Only the name portion is kept; public and system identifiers are
/// discarded during tokenization.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct Doctype {
    /// The doctype's name, with original casing.
    pub name: HtmlString,
}

/// The token type produced by [`DefaultEmitter`].
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Token {
    /// A start tag.
    StartTag(StartTag),
    /// An end tag.
    EndTag(EndTag),
    /// A run of text. Consecutive character output is folded into one token.
    String(HtmlString),
    /// A comment.
    Comment(HtmlString),
    /// A doctype declaration.
    Doctype(Doctype),
}

#[derive(Debug)]
enum CurrentToken {
    StartTag(StartTag),
    EndTag(EndTag),
    Comment(HtmlString),
    Doctype(Doctype),
}

/// The default implementation of [`Emitter`]: queues up plain [`Token`]
/// values for the [`crate::Tokenizer`] iterator.
///
/// Start tags whose name is in the raw-text set (`script`, `style`, …)
/// switch the tokenizer into raw-text content automatically, so the token
/// stream over `<script>a<b</script>` contains a single text token for the
/// script body.
#[derive(Debug, Default)]
pub struct DefaultEmitter {
    current: Option<CurrentToken>,
    current_attribute: Option<(HtmlString, HtmlString)>,
    last_start_tag: HtmlString,
    text_buffer: HtmlString,
    token_queue: VecDeque<Token>,
}

impl DefaultEmitter {
    fn flush_text(&mut self) {
        if !self.text_buffer.is_empty() {
            let text = take(&mut self.text_buffer);
            self.token_queue.push_back(Token::String(text));
        }
    }

    fn flush_attribute(&mut self) {
        if let Some((name, value)) = self.current_attribute.take() {
            if let Some(CurrentToken::StartTag(ref mut tag)) = self.current {
                tag.attributes.entry(name).or_insert(value);
            }
            // end tags do not carry attributes; drop them
        }
    }
}

impl Emitter for DefaultEmitter {
    type Token = Token;

    fn pop_token(&mut self) -> Option<Token> {
        self.token_queue.pop_front()
    }

    fn emit_eof(&mut self) {
        self.flush_text();
    }

    fn emit_string(&mut self, s: &[u8]) {
        self.text_buffer.extend(s);
    }

    fn init_start_tag(&mut self) {
        self.current = Some(CurrentToken::StartTag(StartTag::default()));
        self.current_attribute = None;
    }

    fn init_end_tag(&mut self) {
        self.current = Some(CurrentToken::EndTag(EndTag::default()));
        self.current_attribute = None;
    }

    fn init_comment(&mut self) {
        self.current = Some(CurrentToken::Comment(HtmlString::default()));
    }

    fn init_doctype(&mut self) {
        self.current = Some(CurrentToken::Doctype(Doctype::default()));
    }

    fn push_tag_name(&mut self, s: &[u8]) {
        match self.current {
            Some(CurrentToken::StartTag(ref mut tag)) => tag.name.extend(s),
            Some(CurrentToken::EndTag(ref mut tag)) => tag.name.extend(s),
            _ => (),
        }
    }

    fn push_comment(&mut self, s: &[u8]) {
        if let Some(CurrentToken::Comment(ref mut content)) = self.current {
            content.extend(s);
        }
    }

    fn push_doctype_name(&mut self, s: &[u8]) {
        if let Some(CurrentToken::Doctype(ref mut doctype)) = self.current {
            doctype.name.extend(s);
        }
    }

    fn init_attribute(&mut self) {
        self.flush_attribute();
        self.current_attribute = Some(Default::default());
    }

    fn push_attribute_name(&mut self, s: &[u8]) {
        if let Some((ref mut name, _)) = self.current_attribute {
            name.extend(s);
        }
    }

    fn push_attribute_value(&mut self, s: &[u8]) {
        if let Some((_, ref mut value)) = self.current_attribute {
            value.extend(s);
        }
    }

    fn set_self_closing(&mut self) {
        if let Some(CurrentToken::StartTag(ref mut tag)) = self.current {
            tag.self_closing = true;
        }
    }

    fn emit_current_tag(&mut self) -> Option<State> {
        self.flush_attribute();
        self.flush_text();
        match self.current.take() {
            Some(CurrentToken::StartTag(tag)) => {
                self.last_start_tag = tag.name.clone();
                let raw = is_raw_text_element(&tag.name);
                self.token_queue.push_back(Token::StartTag(tag));
                raw.then_some(State::RawText)
            }
            Some(CurrentToken::EndTag(tag)) => {
                self.token_queue.push_back(Token::EndTag(tag));
                None
            }
            _ => None,
        }
    }

    fn emit_current_comment(&mut self) {
        self.flush_text();
        if let Some(CurrentToken::Comment(content)) = self.current.take() {
            self.token_queue.push_back(Token::Comment(content));
        }
    }

    fn emit_current_doctype(&mut self) {
        self.flush_text();
        if let Some(CurrentToken::Doctype(doctype)) = self.current.take() {
            self.token_queue.push_back(Token::Doctype(doctype));
        }
    }

    fn current_is_appropriate_end_tag_token(&mut self) -> bool {
        match self.current {
            Some(CurrentToken::EndTag(ref tag)) => {
                !self.last_start_tag.is_empty() && self.last_start_tag == tag.name
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
