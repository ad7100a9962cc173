use crate::machine;
use crate::machine_helper::MachineHelper;
use crate::reader::ByteReader;
use crate::utils::ControlToken;
use crate::{Emitter, State};

/// The HTML tokenizer: drives the state machine over an input buffer and
/// forwards everything it recognizes to an [`Emitter`].
///
/// Used as an iterator it yields whatever tokens the emitter produces. An
/// emitter that only has side effects (such as the tree builder behind
/// [`crate::Parser`]) yields nothing; call [`Tokenizer::finish`] for those.
///
/// ```
/// use htmlgrove::{DefaultEmitter, Token, Tokenizer};
///
/// let tokens: Vec<Token> = Tokenizer::new("<p>hi</p>", DefaultEmitter::default()).collect();
/// assert_eq!(tokens.len(), 3);
/// ```
#[derive(Debug)]
pub struct Tokenizer<'a, E: Emitter> {
    eof: bool,
    pub(crate) emitter: E,
    pub(crate) reader: ByteReader<'a>,
    pub(crate) machine_helper: MachineHelper,
}

impl<'a, E: Emitter> Tokenizer<'a, E> {
    /// Construct a tokenizer over `input` with the given emitter.
    ///
    /// `input` is raw bytes; `&str` works too. No character-encoding
    /// handling takes place, bytes flow through as-is.
    pub fn new<I: AsRef<[u8]> + ?Sized>(input: &'a I, emitter: E) -> Self {
        Tokenizer {
            eof: false,
            emitter,
            reader: ByteReader::new(input.as_ref()),
            machine_helper: MachineHelper::default(),
        }
    }

    /// Override the initial state. Necessary for parsing fragments that
    /// start inside a raw-text element; pair with
    /// [`Emitter::set_last_start_tag`].
    pub fn set_state(&mut self, state: State) {
        self.machine_helper.state = state.into();
    }

    /// Override the emitter's record of the most recent start tag. See
    /// [`Tokenizer::set_state`].
    pub fn set_last_start_tag(&mut self, last_start_tag: Option<&[u8]>) {
        self.emitter.set_last_start_tag(last_start_tag);
    }

    /// Run the tokenizer to completion, discarding any tokens, and return
    /// the emitter for inspection.
    pub fn finish(mut self) -> E {
        while !self.eof {
            self.step();
        }
        while self.emitter.pop_token().is_some() {}
        self.emitter
    }

    fn step(&mut self) {
        match machine::consume(self) {
            ControlToken::Continue => (),
            ControlToken::Eof => {
                self.eof = true;
                self.emitter.emit_eof();
            }
        }
    }
}

impl<'a, E: Emitter> Iterator for Tokenizer<'a, E> {
    type Item = E::Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.emitter.pop_token() {
                break Some(token);
            } else if self.eof {
                break None;
            }
            self.step();
        }
    }
}
