/*!
The `rowcsv` crate reads and writes one fixed dialect of CSV.

Fields are separated by `,` and quoted with `"`. A field is quoted on write
only when it contains `,`, `"`, `\n` or `\r`, and quotes inside a quoted
field are doubled. Every written row ends with `\n`. On read, `\n`, `\r` and
`\r\n` each end a row.

The parsing engine lives in the
[`rowcsv-core`](https://docs.rs/rowcsv-core) crate, which has no I/O. This
crate adds buffered readers and writers on top of it, plus two path based
entry points:

* [`write_all`] writes a collection of rows to a file.
* [`reader()`] lazily reads the rows of a file.

# Example

```no_run
let rows = vec![
    vec!["ID", "Name", "Bio"],
    vec!["1", "John Doe", "Standard text"],
    vec!["2", "Jane, Doe", "Bio with a comma"],
    vec!["3", "Bob \"The Builder\"", "Bio with escaped quotes"],
    vec!["4", "Alice", "Bio with a\nnewline character"],
];
rowcsv::write_all("people.csv", &rows)?;

let read = rowcsv::reader("people.csv").collect::<Result<Vec<_>, _>>()?;
assert_eq!(read, rows);
# Ok::<(), rowcsv::Error>(())
```

# Malformed data

Reading never fails because of the shape of the data. Every input maps to
some sequence of rows:

* Rows may have different numbers of fields.
* An empty line is a row with one empty field.
* A quote in the middle of an unquoted field starts a quoted section.
* An unterminated quoted section runs to the end of the data.
* A character directly after a closing quote that is not `,`, `"` or a
  line terminator is dropped. `"foo"x,y` reads as `["foo", "y"]`.

The only read errors are I/O errors and fields that are not valid UTF-8.

# Logging

This crate emits `debug` level messages through the [`log`] facade when
files are opened, created and exhausted. It never installs a logger.
*/

#![deny(missing_docs)]

pub use rowcsv_core::{needs_quotes, DELIMITER, QUOTE, TERMINATOR};

pub use crate::error::{Error, Result, Utf8Error};
pub use crate::field::ToField;
pub use crate::reader::{
    reader, PathRows, Position, Reader, ReaderBuilder, RowsIntoIter, RowsIter,
};
pub use crate::writer::{write_all, Writer, WriterBuilder};

mod error;
mod field;
mod reader;
mod writer;
