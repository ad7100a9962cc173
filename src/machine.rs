use crate::machine_helper::{
    cont, emit_current_tag_and_switch_to, eof, reconsume_in, switch_to,
};
use crate::utils::{
    is_ascii_whitespace_byte, whitespace_pat, with_quot_decoded, ControlToken, MachineState,
};
use crate::{Emitter, Tokenizer};

// Note: This is not implemented as a method on Tokenizer because the match
// arms want disjoint borrows of the tokenizer's fields, and a method would
// pin the whole receiver.
#[inline]
pub(crate) fn consume<E: Emitter>(slf: &mut Tokenizer<'_, E>) -> ControlToken {
    match slf.machine_helper.state {
        MachineState::Data => match slf.reader.read_byte() {
            Some(b'<') => switch_to!(slf, MachineState::TagOpen),
            Some(x) => {
                slf.reader.unread_byte(Some(x));
                let run = slf.reader.read_while(|b| b != b'<');
                slf.emitter.emit_string(run);
                cont!()
            }
            None => eof!(),
        },
        MachineState::RawText => match slf.reader.read_byte() {
            Some(b'<') => switch_to!(slf, MachineState::RawTextLessThanSign),
            Some(x) => {
                slf.reader.unread_byte(Some(x));
                let run = slf.reader.read_while(|b| b != b'<');
                slf.emitter.emit_string(run);
                cont!()
            }
            None => eof!(),
        },
        MachineState::TagOpen => match slf.reader.read_byte() {
            Some(b'!') => switch_to!(slf, MachineState::MarkupDeclarationOpen),
            Some(b'/') => switch_to!(slf, MachineState::EndTagOpen),
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.init_start_tag();
                reconsume_in!(slf, Some(x), MachineState::TagName)
            }
            c @ Some(b'?') => {
                slf.emitter.init_comment();
                reconsume_in!(slf, c, MachineState::BogusComment)
            }
            None => {
                slf.emitter.emit_string(b"<");
                eof!()
            }
            c @ Some(_) => {
                // not a tag after all, the `<` was literal text
                slf.emitter.emit_string(b"<");
                reconsume_in!(slf, c, MachineState::Data)
            }
        },
        MachineState::EndTagOpen => match slf.reader.read_byte() {
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.init_end_tag();
                reconsume_in!(slf, Some(x), MachineState::TagName)
            }
            Some(b'>') => switch_to!(slf, MachineState::Data),
            None => {
                slf.emitter.emit_string(b"</");
                eof!()
            }
            c @ Some(_) => {
                slf.emitter.init_comment();
                reconsume_in!(slf, c, MachineState::BogusComment)
            }
        },
        MachineState::TagName => match slf.reader.read_byte() {
            Some(whitespace_pat!()) => switch_to!(slf, MachineState::BeforeAttributeName),
            Some(b'/') => switch_to!(slf, MachineState::SelfClosingStartTag),
            Some(b'>') => emit_current_tag_and_switch_to!(slf, MachineState::Data),
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.push_tag_name(&[x.to_ascii_lowercase()]);
                cont!()
            }
            Some(x @ (b'0'..=b'9' | b'-' | b'_')) => {
                slf.emitter.push_tag_name(&[x]);
                cont!()
            }
            // any other byte has no place in a tag name and is dropped
            Some(_) => cont!(),
            None => eof!(),
        },
        MachineState::RawTextLessThanSign => match slf.reader.read_byte() {
            Some(b'/') => {
                slf.machine_helper.temporary_buffer.clear();
                switch_to!(slf, MachineState::RawTextEndTagOpen)
            }
            c => {
                slf.emitter.emit_string(b"<");
                reconsume_in!(slf, c, MachineState::RawText)
            }
        },
        MachineState::RawTextEndTagOpen => match slf.reader.read_byte() {
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.init_end_tag();
                reconsume_in!(slf, Some(x), MachineState::RawTextEndTagName)
            }
            c => {
                slf.emitter.emit_string(b"</");
                reconsume_in!(slf, c, MachineState::RawText)
            }
        },
        MachineState::RawTextEndTagName => match slf.reader.read_byte() {
            Some(whitespace_pat!()) if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(slf, MachineState::BeforeAttributeName)
            }
            Some(b'/') if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(slf, MachineState::SelfClosingStartTag)
            }
            Some(b'>') if slf.emitter.current_is_appropriate_end_tag_token() => {
                emit_current_tag_and_switch_to!(slf, MachineState::Data)
            }
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.push_tag_name(&[x.to_ascii_lowercase()]);
                slf.machine_helper.temporary_buffer.push(x);
                cont!()
            }
            c => {
                slf.emitter.emit_string(b"</");
                let buffer = std::mem::take(&mut slf.machine_helper.temporary_buffer);
                slf.emitter.emit_string(&buffer);
                reconsume_in!(slf, c, MachineState::RawText)
            }
        },
        MachineState::BeforeAttributeName => match slf.reader.read_byte() {
            Some(whitespace_pat!()) => cont!(),
            c @ (Some(b'/' | b'>') | None) => {
                reconsume_in!(slf, c, MachineState::AfterAttributeName)
            }
            Some(b'=') => {
                slf.emitter.init_attribute();
                slf.emitter.push_attribute_name(b"=");
                switch_to!(slf, MachineState::AttributeName)
            }
            Some(x) => {
                slf.emitter.init_attribute();
                reconsume_in!(slf, Some(x), MachineState::AttributeName)
            }
        },
        MachineState::AttributeName => match slf.reader.read_byte() {
            c @ (Some(whitespace_pat!() | b'/' | b'>') | None) => {
                reconsume_in!(slf, c, MachineState::AfterAttributeName)
            }
            Some(b'=') => switch_to!(slf, MachineState::BeforeAttributeValue),
            Some(x) => {
                slf.emitter.push_attribute_name(&[x.to_ascii_lowercase()]);
                cont!()
            }
        },
        MachineState::AfterAttributeName => match slf.reader.read_byte() {
            Some(whitespace_pat!()) => cont!(),
            Some(b'/') => switch_to!(slf, MachineState::SelfClosingStartTag),
            Some(b'=') => switch_to!(slf, MachineState::BeforeAttributeValue),
            Some(b'>') => emit_current_tag_and_switch_to!(slf, MachineState::Data),
            None => eof!(),
            Some(x) => {
                slf.emitter.init_attribute();
                reconsume_in!(slf, Some(x), MachineState::AttributeName)
            }
        },
        MachineState::BeforeAttributeValue => match slf.reader.read_byte() {
            Some(whitespace_pat!()) => cont!(),
            Some(b'"') => switch_to!(slf, MachineState::AttributeValueDoubleQuoted),
            Some(b'\'') => switch_to!(slf, MachineState::AttributeValueSingleQuoted),
            Some(b'>') => emit_current_tag_and_switch_to!(slf, MachineState::Data),
            c => reconsume_in!(slf, c, MachineState::AttributeValueUnquoted),
        },
        MachineState::AttributeValueDoubleQuoted => match slf.reader.read_byte() {
            Some(b'"') => switch_to!(slf, MachineState::AfterAttributeValueQuoted),
            Some(x) => {
                slf.reader.unread_byte(Some(x));
                let run = slf.reader.read_while(|b| b != b'"');
                // `&quot;` is the one entity the serializer emits, so it is
                // the one entity decoded here; no value delimiter can occur
                // inside it, so it never splits across runs
                with_quot_decoded(run, |chunk| slf.emitter.push_attribute_value(chunk));
                cont!()
            }
            None => eof!(),
        },
        MachineState::AttributeValueSingleQuoted => match slf.reader.read_byte() {
            Some(b'\'') => switch_to!(slf, MachineState::AfterAttributeValueQuoted),
            Some(x) => {
                slf.reader.unread_byte(Some(x));
                let run = slf.reader.read_while(|b| b != b'\'');
                with_quot_decoded(run, |chunk| slf.emitter.push_attribute_value(chunk));
                cont!()
            }
            None => eof!(),
        },
        MachineState::AttributeValueUnquoted => match slf.reader.read_byte() {
            Some(whitespace_pat!()) => switch_to!(slf, MachineState::BeforeAttributeName),
            Some(b'>') => emit_current_tag_and_switch_to!(slf, MachineState::Data),
            Some(x) => {
                slf.reader.unread_byte(Some(x));
                let run = slf
                    .reader
                    .read_while(|b| !is_ascii_whitespace_byte(b) && b != b'>');
                with_quot_decoded(run, |chunk| slf.emitter.push_attribute_value(chunk));
                cont!()
            }
            None => eof!(),
        },
        MachineState::AfterAttributeValueQuoted => match slf.reader.read_byte() {
            Some(whitespace_pat!()) => switch_to!(slf, MachineState::BeforeAttributeName),
            Some(b'/') => switch_to!(slf, MachineState::SelfClosingStartTag),
            Some(b'>') => emit_current_tag_and_switch_to!(slf, MachineState::Data),
            None => eof!(),
            c @ Some(_) => reconsume_in!(slf, c, MachineState::BeforeAttributeName),
        },
        MachineState::SelfClosingStartTag => match slf.reader.read_byte() {
            Some(b'>') => {
                slf.emitter.set_self_closing();
                emit_current_tag_and_switch_to!(slf, MachineState::Data)
            }
            None => eof!(),
            c @ Some(_) => reconsume_in!(slf, c, MachineState::BeforeAttributeName),
        },
        MachineState::BogusComment => match slf.reader.read_byte() {
            Some(b'>') => {
                slf.emitter.emit_current_comment();
                switch_to!(slf, MachineState::Data)
            }
            Some(x) => {
                slf.reader.unread_byte(Some(x));
                let run = slf.reader.read_while(|b| b != b'>');
                slf.emitter.push_comment(run);
                cont!()
            }
            None => {
                slf.emitter.emit_current_comment();
                eof!()
            }
        },
        MachineState::MarkupDeclarationOpen => match slf.reader.read_byte() {
            Some(b'-') if slf.reader.try_read_slice(b"-", true) => {
                slf.emitter.init_comment();
                switch_to!(slf, MachineState::CommentStart)
            }
            Some(b'd' | b'D') if slf.reader.try_read_slice(b"octype", false) => {
                slf.machine_helper.doctype_name_done = false;
                switch_to!(slf, MachineState::BeforeDoctypeName)
            }
            c => {
                slf.emitter.init_comment();
                reconsume_in!(slf, c, MachineState::BogusComment)
            }
        },
        MachineState::CommentStart => match slf.reader.read_byte() {
            Some(b'-') => switch_to!(slf, MachineState::CommentStartDash),
            Some(b'>') => {
                slf.emitter.emit_current_comment();
                switch_to!(slf, MachineState::Data)
            }
            c => reconsume_in!(slf, c, MachineState::Comment),
        },
        MachineState::CommentStartDash => match slf.reader.read_byte() {
            Some(b'-') => switch_to!(slf, MachineState::CommentEnd),
            Some(b'>') => {
                slf.emitter.emit_current_comment();
                switch_to!(slf, MachineState::Data)
            }
            None => {
                slf.emitter.emit_current_comment();
                eof!()
            }
            c @ Some(_) => {
                slf.emitter.push_comment(b"-");
                reconsume_in!(slf, c, MachineState::Comment)
            }
        },
        MachineState::Comment => match slf.reader.read_byte() {
            Some(b'-') => switch_to!(slf, MachineState::CommentEndDash),
            Some(x) => {
                slf.reader.unread_byte(Some(x));
                let run = slf.reader.read_while(|b| b != b'-');
                slf.emitter.push_comment(run);
                cont!()
            }
            None => {
                slf.emitter.emit_current_comment();
                eof!()
            }
        },
        MachineState::CommentEndDash => match slf.reader.read_byte() {
            Some(b'-') => switch_to!(slf, MachineState::CommentEnd),
            None => {
                slf.emitter.emit_current_comment();
                eof!()
            }
            c @ Some(_) => {
                slf.emitter.push_comment(b"-");
                reconsume_in!(slf, c, MachineState::Comment)
            }
        },
        MachineState::CommentEnd => match slf.reader.read_byte() {
            Some(b'>') => {
                slf.emitter.emit_current_comment();
                switch_to!(slf, MachineState::Data)
            }
            Some(b'-') => {
                slf.emitter.push_comment(b"-");
                cont!()
            }
            None => {
                slf.emitter.emit_current_comment();
                eof!()
            }
            c @ Some(_) => {
                slf.emitter.push_comment(b"--");
                reconsume_in!(slf, c, MachineState::Comment)
            }
        },
        MachineState::BeforeDoctypeName => match slf.reader.read_byte() {
            Some(whitespace_pat!()) => cont!(),
            Some(b'>') => {
                slf.emitter.init_doctype();
                slf.emitter.emit_current_doctype();
                switch_to!(slf, MachineState::Data)
            }
            None => {
                slf.emitter.init_doctype();
                slf.emitter.emit_current_doctype();
                eof!()
            }
            Some(x) => {
                slf.emitter.init_doctype();
                slf.emitter.push_doctype_name(&[x]);
                switch_to!(slf, MachineState::DoctypeName)
            }
        },
        MachineState::DoctypeName => match slf.reader.read_byte() {
            Some(whitespace_pat!()) => {
                // the name ends here; public/system identifiers are not kept
                slf.machine_helper.doctype_name_done = true;
                cont!()
            }
            Some(b'>') => {
                slf.emitter.emit_current_doctype();
                switch_to!(slf, MachineState::Data)
            }
            Some(x) => {
                if !slf.machine_helper.doctype_name_done {
                    slf.emitter.push_doctype_name(&[x]);
                }
                cont!()
            }
            None => {
                slf.emitter.emit_current_doctype();
                eof!()
            }
        },
    }
}
