use memchr::{memchr, memchr_iter};

use crate::machine::{transition, Action, Class, Lookahead, Mode};
use crate::QUOTE;

/// A push based CSV reader.
///
/// This reader parses CSV data using an explicit two-state machine (see
/// [`transition`](crate::transition)). Callers feed it input incrementally
/// with [`read_field`](Reader::read_field); the input may be split at any
/// byte, including in the middle of a `\r\n` pair or a `""` escape.
///
/// # Malformed data
///
/// This reader never returns an error and always finds *a* parse:
///
/// * `\n`, `\r` and `\r\n` are each treated as a single record terminator.
/// * Records are permitted to be of varying length.
/// * An empty line is a record with a single empty field.
/// * A quote in the middle of an unquoted field starts a quoted section.
/// * A character directly after a closing quote that is not a delimiter,
///   quote or record terminator is dropped.
#[derive(Clone, Debug)]
pub struct Reader {
    /// The current mode.
    mode: Mode,
    /// The decision waiting on the next byte, if any.
    lookahead: Lookahead,
    /// The number of fields closed so far in the current record.
    fields: u64,
    /// The current line number. This counts `\n` bytes only.
    line: u64,
}

impl Default for Reader {
    fn default() -> Reader {
        Reader {
            mode: Mode::default(),
            lookahead: Lookahead::default(),
            fields: 0,
            line: 1,
        }
    }
}

/// The result of parsing at most one field from CSV data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadFieldResult {
    /// The caller provided input was exhausted before the end of a field or
    /// record was found.
    InputEmpty,
    /// The end of a field was found.
    ///
    /// Note that when `record_end` is true, then the end of this field also
    /// corresponds to the end of a record.
    Field {
        /// Whether this was the last field in a record or not.
        record_end: bool,
    },
    /// All CSV data has been read.
    ///
    /// This state can only be returned when an empty input buffer is provided
    /// by the caller.
    End,
}

impl Reader {
    /// Create a new reader in its initial state.
    pub fn new() -> Reader {
        Reader::default()
    }

    /// Return the current line number.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Return the current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Parse a single CSV field in `input`, appending its contents to
    /// `field`.
    ///
    /// This returns the result of parsing along with the number of bytes
    /// read from `input`. Field data is appended to `field`; the caller is
    /// expected to clear `field` after each `ReadFieldResult::Field`.
    ///
    /// An empty `input` signals the end of the data. In that case, a
    /// pending field or record is flushed as `Field { record_end: true }`
    /// if either the field buffer is non-empty or the record already has at
    /// least one field. Otherwise, `End` is returned, and will be returned
    /// for every subsequent call with empty input.
    pub fn read_field(
        &mut self,
        input: &[u8],
        field: &mut Vec<u8>,
    ) -> (ReadFieldResult, usize) {
        if input.is_empty() {
            return (self.finish(field), 0);
        }
        let mut nin = 0;
        while nin < input.len() {
            if self.mode == Mode::Quoted
                && self.lookahead == Lookahead::Nothing
            {
                // Everything up to the next quote is field data.
                let rest = &input[nin..];
                let end = memchr(QUOTE, rest).unwrap_or(rest.len());
                self.line += memchr_iter(b'\n', &rest[..end]).count() as u64;
                field.extend_from_slice(&rest[..end]);
                nin += end;
                if nin == input.len() {
                    break;
                }
            }
            let b = input[nin];
            nin += 1;
            if b == b'\n' {
                self.line += 1;
            }
            let t = transition(self.mode, self.lookahead, Class::of(b));
            self.mode = t.mode;
            self.lookahead = t.lookahead;
            match t.action {
                Action::Append => field.push(b),
                Action::Discard => {}
                Action::EndField => {
                    self.fields += 1;
                    return (ReadFieldResult::Field { record_end: false }, nin);
                }
                Action::EndRecord => {
                    self.fields = 0;
                    return (ReadFieldResult::Field { record_end: true }, nin);
                }
            }
        }
        (ReadFieldResult::InputEmpty, nin)
    }

    fn finish(&mut self, field: &[u8]) -> ReadFieldResult {
        // There is no next character, so every pending decision resolves
        // to "nothing follows". A closing quote closes the quoted section.
        self.mode = Mode::Ground;
        self.lookahead = Lookahead::Nothing;
        if field.is_empty() && self.fields == 0 {
            ReadFieldResult::End
        } else {
            self.fields = 0;
            ReadFieldResult::Field { record_end: true }
        }
    }
}
