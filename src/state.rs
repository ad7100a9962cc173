/// States that the tokenizer can be switched to from within an emitter.
///
/// [`crate::Emitter::emit_current_tag`] may return one of these to override
/// the state the machine continues in, which is how raw-text elements like
/// `<script>` take effect: the tree builder sees the tag name and tells the
/// tokenizer to stop interpreting markup until the matching close tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// The data state: regular markup interpretation.
    Data,
    /// The raw text state: everything is literal text until the appropriate
    /// end tag.
    RawText,
}
