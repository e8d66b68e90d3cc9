use std::error;
use std::fmt;
use std::io;
use std::result;

use crate::reader::Position;

/// A type alias for `Result<T, rowcsv::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when processing CSV data.
///
/// This error can happen when writing or reading CSV data.
///
/// Note that malformed CSV is never an error. Every input maps to some
/// sequence of rows, so the only failures are I/O failures and fields that
/// are not valid UTF-8.
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while opening, reading, writing or
    /// flushing a stream.
    Io(io::Error),
    /// A UTF-8 decoding error that occured while reading CSV data into Rust
    /// `String`s.
    Utf8 {
        /// The position of the record in which this error occurred, if
        /// available.
        pos: Option<Position>,
        /// The corresponding UTF-8 error.
        err: Utf8Error,
    },
}

impl Error {
    /// Return true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        match *self {
            Error::Io(_) => true,
            _ => false,
        }
    }

    /// Return the position for this error, if one exists.
    pub fn position(&self) -> Option<&Position> {
        match *self {
            Error::Utf8 { ref pos, .. } => pos.as_ref(),
            Error::Io(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Utf8 { ref err, .. } => Some(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::Utf8 { pos: None, ref err } => err.fmt(f),
            Error::Utf8 { pos: Some(ref pos), ref err } => write!(
                f,
                "row {} at line {} (byte {}): {}",
                pos.record(),
                pos.line(),
                pos.byte(),
                err
            ),
        }
    }
}

/// A UTF-8 validation error that occurred when converting a field to a
/// `String`.
///
/// The error includes the index of the field that failed validation, and the
/// last byte at which valid UTF-8 was verified.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Utf8Error {
    /// The field index of a record in which UTF-8 validation failed.
    field: usize,
    /// The index into the given field up to which valid UTF-8 was verified.
    valid_up_to: usize,
}

/// Create a new UTF-8 error.
pub(crate) fn new_utf8_error(field: usize, valid_up_to: usize) -> Utf8Error {
    Utf8Error { field, valid_up_to }
}

impl Utf8Error {
    /// The field index of a record in which UTF-8 validation failed.
    pub fn field(&self) -> usize {
        self.field
    }
    /// The index into the given field up to which valid UTF-8 was verified.
    pub fn valid_up_to(&self) -> usize {
        self.valid_up_to
    }
}

impl fmt::Display for Utf8Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "field {} is not valid UTF-8 after byte {}",
            self.field, self.valid_up_to
        )
    }
}

impl error::Error for Utf8Error {}
