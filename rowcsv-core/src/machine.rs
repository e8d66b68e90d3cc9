use crate::{DELIMITER, QUOTE};

/// The scanning mode.
///
/// The scanner is either outside of a quoted section (`Ground`) or inside
/// one (`Quoted`). Everything else the scanner needs to know about its
/// position in the input is carried by [`Lookahead`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Outside of a quoted section.
    Ground,
    /// Inside of a quoted section.
    Quoted,
}

impl Default for Mode {
    fn default() -> Mode {
        Mode::Ground
    }
}

/// A decision that has been deferred until the next byte is seen.
///
/// A CSV scanner needs one character of lookahead in two places: after a
/// `\r` (is this `\r\n`?) and after a quote inside a quoted section (is this
/// an escaped `""` or the end of the quoted section?). Rather than peeking
/// at the input and pushing a byte back, the scanner consumes the byte that
/// raises the question and records the question here. The next byte, which
/// may arrive in a different input buffer, answers it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lookahead {
    /// No decision is pending.
    Nothing,
    /// A record was just closed by `\r`. A following `\n` belongs to the
    /// same record break and is swallowed.
    Cr,
    /// A quote was seen inside a quoted section. A following quote is an
    /// escaped literal quote. A delimiter or record terminator ends the
    /// field. Anything else is dropped.
    CloseQuote,
    /// The lead byte of a multi-byte character was dropped after a closing
    /// quote. Its continuation bytes are dropped too.
    Dropping,
}

impl Default for Lookahead {
    fn default() -> Lookahead {
        Lookahead::Nothing
    }
}

/// The class of a single input byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Class {
    /// `"`
    Quote,
    /// `,`
    Delimiter,
    /// `\n`
    Lf,
    /// `\r`
    Cr,
    /// The first byte of a multi-byte UTF-8 sequence.
    Lead,
    /// A continuation byte of a multi-byte UTF-8 sequence.
    Continuation,
    /// Anything else.
    Other,
}

impl Class {
    /// Classify a byte.
    #[inline]
    pub fn of(b: u8) -> Class {
        match b {
            QUOTE => Class::Quote,
            DELIMITER => Class::Delimiter,
            b'\n' => Class::Lf,
            b'\r' => Class::Cr,
            0x80..=0xBF => Class::Continuation,
            0xC0..=0xFF => Class::Lead,
            _ => Class::Other,
        }
    }
}

/// What the scanner does with the byte that caused a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    /// Append the byte to the current field.
    Append,
    /// Consume the byte without appending it.
    Discard,
    /// Close the current field. The record continues.
    EndField,
    /// Close the current field and the current record.
    EndRecord,
}

/// The result of a single transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transition {
    /// The mode after the transition.
    pub mode: Mode,
    /// The pending decision after the transition.
    pub lookahead: Lookahead,
    /// What to do with the byte.
    pub action: Action,
}

impl Transition {
    #[inline]
    fn new(mode: Mode, lookahead: Lookahead, action: Action) -> Transition {
        Transition { mode, lookahead, action }
    }
}

/// The complete transition table of the scanner.
///
/// Every byte of input is consumed by exactly one call. A pending lookahead
/// is resolved first; when the byte does not answer it specially, it is
/// dispatched as if it had arrived in `Ground` with nothing pending.
pub fn transition(mode: Mode, lookahead: Lookahead, class: Class) -> Transition {
    use self::Action::*;
    use self::Class::*;
    use self::Mode::*;

    match (lookahead, mode, class) {
        (Lookahead::Cr, _, Lf) => {
            Transition::new(Ground, Lookahead::Nothing, Discard)
        }
        (Lookahead::Cr, _, _) => {
            transition(Ground, Lookahead::Nothing, class)
        }
        (Lookahead::CloseQuote, _, Quote) => {
            Transition::new(Quoted, Lookahead::Nothing, Append)
        }
        (Lookahead::CloseQuote, _, Delimiter)
        | (Lookahead::CloseQuote, _, Lf)
        | (Lookahead::CloseQuote, _, Cr) => {
            transition(Ground, Lookahead::Nothing, class)
        }
        // A character directly after a closing quote is neither appended
        // nor starts a new field. It is lost.
        (Lookahead::CloseQuote, _, Lead) => {
            Transition::new(Ground, Lookahead::Dropping, Discard)
        }
        (Lookahead::CloseQuote, _, _) => {
            Transition::new(Ground, Lookahead::Nothing, Discard)
        }
        (Lookahead::Dropping, _, Continuation) => {
            Transition::new(Ground, Lookahead::Dropping, Discard)
        }
        (Lookahead::Dropping, _, _) => {
            transition(Ground, Lookahead::Nothing, class)
        }
        (Lookahead::Nothing, Ground, Quote) => {
            Transition::new(Quoted, Lookahead::Nothing, Discard)
        }
        (Lookahead::Nothing, Ground, Delimiter) => {
            Transition::new(Ground, Lookahead::Nothing, EndField)
        }
        (Lookahead::Nothing, Ground, Lf) => {
            Transition::new(Ground, Lookahead::Nothing, EndRecord)
        }
        (Lookahead::Nothing, Ground, Cr) => {
            Transition::new(Ground, Lookahead::Cr, EndRecord)
        }
        (Lookahead::Nothing, Ground, _) => {
            Transition::new(Ground, Lookahead::Nothing, Append)
        }
        (Lookahead::Nothing, Quoted, Quote) => {
            Transition::new(Quoted, Lookahead::CloseQuote, Discard)
        }
        (Lookahead::Nothing, Quoted, _) => {
            Transition::new(Quoted, Lookahead::Nothing, Append)
        }
    }
}
