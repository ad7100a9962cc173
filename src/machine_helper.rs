use crate::utils::{trace_log, MachineState};

/// Scratch state the machine carries between dispatch steps, separate from
/// anything the emitter accumulates.
#[derive(Debug)]
pub(crate) struct MachineHelper {
    /// Bytes tentatively consumed while scanning for a raw-text end tag.
    /// Flushed back out as text if the candidate turns out inappropriate.
    pub(crate) temporary_buffer: Vec<u8>,
    /// Set once whitespace ends the doctype name; the reduced state set has
    /// no AFTER_DOCTYPE_NAME state, so DOCTYPE_NAME keeps consuming but
    /// stops recording.
    pub(crate) doctype_name_done: bool,
    pub(crate) state: MachineState,
}

impl Default for MachineHelper {
    fn default() -> Self {
        MachineHelper {
            temporary_buffer: Vec::new(),
            doctype_name_done: false,
            state: MachineState::Data,
        }
    }
}

impl MachineHelper {
    pub(crate) fn switch_to(&mut self, state: MachineState) {
        trace_log!("switch_to: {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

macro_rules! switch_to {
    ($slf:expr, $state:expr) => {{
        $slf.machine_helper.switch_to($state);
        ControlToken::Continue
    }};
}

pub(crate) use switch_to;

macro_rules! reconsume_in {
    ($slf:expr, $c:expr, $state:expr) => {{
        let new_state = $state;
        let c = $c;
        $slf.reader.unread_byte(c);
        $slf.machine_helper.switch_to(new_state);
        ControlToken::Continue
    }};
}

pub(crate) use reconsume_in;

macro_rules! cont {
    () => {
        ControlToken::Continue
    };
}

pub(crate) use cont;

macro_rules! eof {
    () => {
        ControlToken::Eof
    };
}

pub(crate) use eof;

/// Finalize the current tag and continue in the state the emitter asks for,
/// or in `$state` if it has no opinion.
macro_rules! emit_current_tag_and_switch_to {
    ($slf:expr, $state:expr) => {{
        let state = $slf.emitter.emit_current_tag().map(MachineState::from);
        switch_to!($slf, state.unwrap_or($state))
    }};
}

pub(crate) use emit_current_tag_and_switch_to;
