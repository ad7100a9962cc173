#![deny(missing_docs)]
// This is an HTML parser. HTML can be untrusted input from the internet.
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod default_emitter;
mod emitter;
mod error;
mod htmlstring;
mod machine;
mod machine_helper;
mod node;
mod parser;
mod reader;
mod selector;
mod serialize;
mod state;
mod tokenizer;
mod tree_builder;
mod utils;

#[cfg(debug_assertions)]
pub mod testutils;

pub use default_emitter::{DefaultEmitter, Doctype, EndTag, StartTag, Token};
pub use emitter::Emitter;
pub use error::Error;
pub use htmlstring::HtmlString;
pub use node::{Node, NodeKind};
pub use parser::{parse, Parser};
pub use selector::Selector;
pub use state::State;
pub use tokenizer::Tokenizer;
