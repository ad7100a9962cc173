use crate::State;

/// An emitter is an object providing methods to the tokenizer to produce
/// output with.
///
/// The state machine feeds an emitter pieces of the current construct as it
/// recognizes them (tag name bytes, attribute names and values, comment and
/// doctype content) and asks it to finalize a construct when the closing
/// delimiter is reached. What happens with a finalized construct is entirely
/// up to the emitter: the built-in [`crate::DefaultEmitter`] queues plain
/// tokens, while the tree builder behind [`crate::Parser`] splices nodes
/// into a document tree.
///
/// An emitter is assumed to have these internal states:
///
/// * _current token_: a start tag, end tag, comment or doctype under
///   construction. There is only one current token.
/// * _current attribute_: the attribute under construction, a name/value
///   pair of byte buffers.
/// * _last start tag_: the name of the most recently emitted start tag,
///   consulted while scanning for the end of a raw-text element.
///
/// Implementations that do not care about a construct can make the related
/// methods a no-op, with one exception: the machine relies on a functional
/// [`Emitter::current_is_appropriate_end_tag_token`] to leave raw-text
/// content correctly.
pub trait Emitter {
    /// The token type yielded by [`crate::Tokenizer`] when it is used as an
    /// iterator. Emitters with side effects only (such as tree building) use
    /// [`std::convert::Infallible`] here.
    type Token;

    /// Retrieve the next finalized token, if any.
    ///
    /// The tokenizer calls this after every machine step and yields the
    /// result from its iterator.
    fn pop_token(&mut self) -> Option<Self::Token>;

    /// The end of the input has been reached.
    fn emit_eof(&mut self);

    /// Emit a run of plain character bytes. Consecutive calls belong to the
    /// same text run until a non-text construct is emitted.
    fn emit_string(&mut self, s: &[u8]);

    /// Set the _current token_ to a fresh start tag.
    fn init_start_tag(&mut self);

    /// Set the _current token_ to a fresh end tag.
    fn init_end_tag(&mut self);

    /// Set the _current token_ to a fresh comment.
    fn init_comment(&mut self);

    /// Set the _current token_ to a fresh doctype.
    fn init_doctype(&mut self);

    /// Append bytes to the name of the current tag. The machine has already
    /// lowercased them.
    fn push_tag_name(&mut self, s: &[u8]);

    /// Append bytes to the content of the current comment.
    fn push_comment(&mut self, s: &[u8]);

    /// Append bytes to the content of the current doctype.
    fn push_doctype_name(&mut self, s: &[u8]);

    /// Begin a new attribute on the current tag, committing any attribute
    /// that was under construction before.
    fn init_attribute(&mut self);

    /// Append bytes to the current attribute's name. The machine has already
    /// lowercased them.
    fn push_attribute_name(&mut self, s: &[u8]);

    /// Append bytes to the current attribute's value. The machine has
    /// already decoded `&quot;` (the one entity the serializer emits) into a
    /// literal `"`.
    fn push_attribute_value(&mut self, s: &[u8]);

    /// Mark the current tag as self-closing (`/>`).
    fn set_self_closing(&mut self);

    /// Finalize the current tag.
    ///
    /// Returning `Some(state)` switches the tokenizer into that state, which
    /// is how emitters arrange for raw-text content handling after start
    /// tags such as `<script>`.
    fn emit_current_tag(&mut self) -> Option<State>;

    /// Finalize the current comment.
    fn emit_current_comment(&mut self);

    /// Finalize the current doctype.
    fn emit_current_doctype(&mut self);

    /// Whether the current end tag's name matches the _last start tag_. Used
    /// while tokenizing raw-text content: `</div>` inside `<script>` is
    /// text, `</script>` is not.
    fn current_is_appropriate_end_tag_token(&mut self) -> bool;

    /// Override the _last start tag_.
    ///
    /// Only useful together with [`crate::Tokenizer::set_state`] for parsing
    /// fragments that begin inside a raw-text element.
    fn set_last_start_tag(&mut self, last_start_tag: Option<&[u8]>);
}
