/*!
`rowcsv-core` provides the I/O-free engine behind `rowcsv`: a push based
two-state CSV scanner and a field writer that applies the quoting rules.

The dialect is fixed. Fields are separated by `,`, quoted with `"`, and a
literal quote inside a quoted field is written as `""`. On read, `\n`, `\r`
and `\r\n` each end a record. On write, every record ends with `\n`.

Callers own all buffers. The [`Reader`] consumes arbitrary slices of input
and appends field bytes to a `Vec<u8>` given by the caller; the [`Writer`]
renders fields into a `Vec<u8>`. This crate never touches a file or a socket.

# Example: reading

```
use rowcsv_core::{ReadFieldResult, Reader};

let mut rdr = Reader::new();
let mut data: &[u8] = b"a,\"b,c\"\n";
let mut field = Vec::new();
let mut fields = Vec::new();
loop {
    let (res, nin) = rdr.read_field(data, &mut field);
    data = &data[nin..];
    match res {
        ReadFieldResult::InputEmpty => {}
        ReadFieldResult::Field { .. } => {
            fields.push(String::from_utf8(field.clone()).unwrap());
            field.clear();
        }
        ReadFieldResult::End => break,
    }
}
assert_eq!(fields, vec!["a", "b,c"]);
```

# Example: writing

```
use rowcsv_core::Writer;

let mut wtr = Writer::new();
let mut out = Vec::new();
wtr.write_field(b"Jane, Doe", &mut out);
wtr.write_field(b"7", &mut out);
wtr.write_terminator(&mut out);
assert_eq!(out, b"\"Jane, Doe\",7\n");
```
*/

#![deny(missing_docs)]

pub use crate::machine::{transition, Action, Class, Lookahead, Mode, Transition};
pub use crate::reader::{ReadFieldResult, Reader};
pub use crate::writer::{needs_quotes, Writer};

mod machine;
mod reader;
mod writer;

/// The field delimiter.
pub const DELIMITER: u8 = b',';
/// The quote character.
pub const QUOTE: u8 = b'"';
/// The record terminator emitted by the writer.
pub const TERMINATOR: u8 = b'\n';
