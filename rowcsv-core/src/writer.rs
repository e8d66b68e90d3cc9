use memchr::{memchr, memchr3};

use crate::{DELIMITER, QUOTE, TERMINATOR};

/// Returns true if and only if the given field must be quoted.
///
/// A field must be quoted when it contains the delimiter, the quote
/// character, `\n` or `\r`. An empty field is never quoted.
#[inline]
pub fn needs_quotes(field: &[u8]) -> bool {
    memchr3(DELIMITER, QUOTE, b'\n', field).is_some()
        || memchr(b'\r', field).is_some()
}

/// A writer for CSV data.
///
/// The writer tracks only whether the next field is the first in its
/// record, so that delimiters are inserted between fields. All output is
/// appended to a caller provided buffer.
///
/// # RFC 4180
///
/// This writer conforms to RFC 4180 with two exceptions: records always end
/// with `\n` instead of `\r\n`, and it doesn't guarantee that all records
/// written are of the same length.
#[derive(Clone, Debug)]
pub struct Writer {
    first_field_in_record: bool,
}

impl Default for Writer {
    fn default() -> Writer {
        Writer { first_field_in_record: true }
    }
}

impl Writer {
    /// Creates a new CSV writer.
    pub fn new() -> Writer {
        Writer::default()
    }

    /// Write a single field to `output`, preceded by a delimiter if it is
    /// not the first field of the record.
    pub fn write_field(&mut self, input: &[u8], output: &mut Vec<u8>) {
        if !self.first_field_in_record {
            output.push(DELIMITER);
        }
        self.first_field_in_record = false;
        if needs_quotes(input) {
            quote_field(input, output);
        } else {
            output.extend_from_slice(input);
        }
    }

    /// Write the record terminator to `output` and start a new record.
    pub fn write_terminator(&mut self, output: &mut Vec<u8>) {
        output.push(TERMINATOR);
        self.first_field_in_record = true;
    }
}

/// Wrap `input` in quotes, doubling every quote inside it.
fn quote_field(mut input: &[u8], output: &mut Vec<u8>) {
    output.reserve(input.len() + 2);
    output.push(QUOTE);
    while let Some(i) = memchr(QUOTE, input) {
        output.extend_from_slice(&input[..i + 1]);
        output.push(QUOTE);
        input = &input[i + 1..];
    }
    output.extend_from_slice(input);
    output.push(QUOTE);
}

#[cfg(test)]
mod tests {
    use super::{needs_quotes, Writer};

    fn record(fields: &[&str]) -> String {
        let mut wtr = Writer::new();
        let mut out = vec![];
        for field in fields {
            wtr.write_field(field.as_bytes(), &mut out);
        }
        wtr.write_terminator(&mut out);
        String::from_utf8(out).unwrap()
    }

    macro_rules! writes_to {
        ($name:ident, $fields:expr, $expected:expr) => {
            #[test]
            fn $name() {
                assert_eq!(record(&$fields), $expected);
            }
        };
    }

    writes_to!(plain, ["a", "b", "c"], "a,b,c\n");
    writes_to!(single, ["a"], "a\n");
    writes_to!(single_empty, [""], "\n");
    writes_to!(empty_fields, ["", "", ""], ",,\n");
    writes_to!(spaces_unquoted, [" a ", "b\tc"], " a ,b\tc\n");
    writes_to!(comma, ["Jane, Doe", "x"], "\"Jane, Doe\",x\n");
    writes_to!(
        quotes,
        ["Bob \"The Builder\""],
        "\"Bob \"\"The Builder\"\"\"\n"
    );
    writes_to!(only_quote, ["\""], "\"\"\"\"\n");
    writes_to!(lf, ["a\nb"], "\"a\nb\"\n");
    writes_to!(cr, ["a\rb"], "\"a\rb\"\n");
    writes_to!(crlf, ["a\r\nb", "c"], "\"a\r\nb\",c\n");
    writes_to!(multibyte, ["caf\u{e9}", "\u{1F600},"], "caf\u{e9},\"\u{1F600},\"\n");

    #[test]
    fn needs_quotes_triggers() {
        assert!(needs_quotes(b","));
        assert!(needs_quotes(b"\""));
        assert!(needs_quotes(b"\n"));
        assert!(needs_quotes(b"\r"));
        assert!(needs_quotes(b"abc\rdef"));
        assert!(!needs_quotes(b""));
        assert!(!needs_quotes(b"abc def;ghi\t'"));
    }

    #[test]
    fn records_share_writer() {
        let mut wtr = Writer::new();
        let mut out = vec![];
        wtr.write_field(b"a", &mut out);
        wtr.write_field(b"b", &mut out);
        wtr.write_terminator(&mut out);
        wtr.write_field(b"c", &mut out);
        wtr.write_terminator(&mut out);
        assert_eq!(out, b"a,b\nc\n");
    }
}
