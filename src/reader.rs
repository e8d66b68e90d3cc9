use std::fs::File;
use std::io::{self, BufRead};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use log::debug;
use rowcsv_core::{ReadFieldResult, Reader as CoreReader};

use crate::error::{new_utf8_error, Error, Result};

const DEFAULT_BUFFER_CAPACITY: usize = 8 * (1 << 10);

/// Lazily read every row of the CSV file at `path`.
///
/// The file is not opened until the first call to `next`. If it cannot be
/// opened, the first item is the I/O error and the iterator ends. The file
/// is closed as soon as the last row has been produced, as soon as an I/O
/// error has been yielded, or when the iterator is dropped, whichever comes
/// first. Abandoning iteration early therefore never leaks the handle.
///
/// The iterator is not restartable. To scan the file again, call `reader`
/// again.
///
/// # Example
///
/// ```no_run
/// for result in rowcsv::reader("people.csv") {
///     let row = result?;
///     println!("{:?}", row);
/// }
/// # Ok::<(), rowcsv::Error>(())
/// ```
pub fn reader<P: AsRef<Path>>(path: P) -> PathRows {
    ReaderBuilder::new().from_path_lazy(path)
}

/// Builds a CSV reader with various configuration knobs.
///
/// The dialect itself is fixed, so the only knob is the size of the
/// internal buffer. Once a CSV `Reader` is built, its configuration cannot
/// be changed.
#[derive(Clone, Debug)]
pub struct ReaderBuilder {
    capacity: usize,
}

impl Default for ReaderBuilder {
    fn default() -> ReaderBuilder {
        ReaderBuilder { capacity: DEFAULT_BUFFER_CAPACITY }
    }
}

impl ReaderBuilder {
    /// Create a new builder for configuring CSV parsing.
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Build a CSV parser from this configuration that reads data from the
    /// given file path.
    ///
    /// If there was a problem opening the file at the given path, then this
    /// returns the corresponding error.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Reader<File>> {
        let path = path.as_ref();
        debug!("opening CSV file {}", path.display());
        Ok(Reader::new(self, File::open(path)?))
    }

    /// Build a lazy row iterator from this configuration for the given file
    /// path. See [`reader`](fn@crate::reader).
    pub fn from_path_lazy<P: AsRef<Path>>(&self, path: P) -> PathRows {
        PathRows {
            path: path.as_ref().to_path_buf(),
            builder: self.clone(),
            state: PathState::Unopened,
        }
    }

    /// Build a CSV parser from this configuration that reads data from `rdr`.
    ///
    /// Note that the CSV reader is buffered automatically, so you should not
    /// wrap `rdr` in a buffered reader like `io::BufReader`.
    pub fn from_reader<R: io::Read>(&self, rdr: R) -> Reader<R> {
        Reader::new(self, rdr)
    }

    /// Set the capacity (in bytes) of the buffer used in the CSV reader.
    /// This defaults to a reasonable setting.
    ///
    /// A capacity of `0` is treated as `1`.
    pub fn buffer_capacity(&mut self, capacity: usize) -> &mut ReaderBuilder {
        self.capacity = capacity;
        self
    }
}

/// A position in CSV data.
///
/// A position is used to report errors in CSV data. All positions include
/// the byte offset, line number and record index at which the error
/// occurred.
///
/// Byte offsets and record indices start at `0`. Line numbers start at `1`
/// and count `\n` bytes only.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    byte: u64,
    line: u64,
    record: u64,
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl Position {
    /// Returns a new position initialized to the start value.
    pub fn new() -> Position {
        Position { byte: 0, line: 1, record: 0 }
    }

    /// The byte offset, starting at `0`, of this position.
    pub fn byte(&self) -> u64 {
        self.byte
    }
    /// The line number, starting at `1`, of this position.
    pub fn line(&self) -> u64 {
        self.line
    }
    /// The record index, starting with the first record at `0`.
    pub fn record(&self) -> u64 {
        self.record
    }
}

/// A CSV reader.
///
/// This reader parses CSV data one row at a time. Input is read from the
/// underlying reader a block at a time and scanned in memory, so the
/// underlying reader does not need to be buffered or seekable.
///
/// Malformed CSV is never an error; see
/// [`rowcsv_core::Reader`](rowcsv_core::Reader) for how odd input is
/// interpreted. The only errors are I/O errors and fields that are not
/// valid UTF-8.
///
/// The underlying reader is owned by this value and released when it is
/// dropped.
///
/// # Example
///
/// ```
/// let data = "\
/// ID,Name
/// 1,\"Jane, Doe\"
/// 2,\"Bob \"\"The Builder\"\"\"
/// ";
/// let mut rdr = rowcsv::Reader::from_reader(data.as_bytes());
/// let rows = rdr.rows().collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(rows, vec![
///     vec!["ID", "Name"],
///     vec!["1", "Jane, Doe"],
///     vec!["2", "Bob \"The Builder\""],
/// ]);
/// # Ok::<(), rowcsv::Error>(())
/// ```
#[derive(Debug)]
pub struct Reader<R> {
    core: CoreReader,
    rdr: io::BufReader<R>,
    /// The bytes of the field being scanned.
    field: Vec<u8>,
    state: ReaderState,
}

#[derive(Debug)]
struct ReaderState {
    /// The position of the parser just after the last consumed byte.
    cur_pos: Position,
    /// Whether the end of the CSV data has been reached.
    eof: bool,
}

impl Reader<File> {
    /// Create a new CSV parser with a default configuration for the given
    /// file path.
    ///
    /// If there was a problem opening the file at the given path, then this
    /// returns the corresponding error.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader<File>> {
        ReaderBuilder::new().from_path(path)
    }
}

impl<R: io::Read> Reader<R> {
    fn new(builder: &ReaderBuilder, rdr: R) -> Reader<R> {
        Reader {
            core: CoreReader::new(),
            // An empty buffer would read as end of input.
            rdr: io::BufReader::with_capacity(builder.capacity.max(1), rdr),
            field: Vec::with_capacity(64),
            state: ReaderState { cur_pos: Position::new(), eof: false },
        }
    }

    /// Create a new CSV parser with a default configuration for the given
    /// reader.
    pub fn from_reader(rdr: R) -> Reader<R> {
        ReaderBuilder::new().from_reader(rdr)
    }

    /// Read a single row into `row`, replacing its contents.
    ///
    /// Returns `true` if a row was read and `false` if there are no more
    /// rows, in which case `row` is left empty.
    ///
    /// If a field is not valid UTF-8, the rest of its row is still consumed
    /// so that the next call starts at the next row, and an `Error::Utf8`
    /// with the position of the offending row is returned.
    pub fn read_row(&mut self, row: &mut Vec<String>) -> Result<bool> {
        row.clear();
        if self.state.eof {
            return Ok(false);
        }
        let start = self.state.cur_pos.clone();
        let mut nfield = 0;
        let mut utf8_err = None;
        loop {
            let (res, nin) = {
                let input = self.rdr.fill_buf()?;
                self.core.read_field(input, &mut self.field)
            };
            self.rdr.consume(nin);
            self.state.cur_pos.byte += nin as u64;
            self.state.cur_pos.line = self.core.line();
            match res {
                ReadFieldResult::InputEmpty => {}
                ReadFieldResult::End => {
                    self.state.eof = true;
                    return Ok(false);
                }
                ReadFieldResult::Field { record_end } => {
                    match self.field.to_str() {
                        Ok(s) => row.push(s.to_owned()),
                        Err(err) if utf8_err.is_none() => {
                            utf8_err =
                                Some(new_utf8_error(nfield, err.valid_up_to()));
                        }
                        Err(_) => {}
                    }
                    self.field.clear();
                    nfield += 1;
                    if record_end {
                        self.state.cur_pos.record += 1;
                        if let Some(err) = utf8_err {
                            row.clear();
                            return Err(Error::Utf8 { pos: Some(start), err });
                        }
                        return Ok(true);
                    }
                }
            }
        }
    }

    /// Returns a borrowed iterator over all rows as `Vec<String>`.
    ///
    /// Each item yielded by this iterator is a `Result<Vec<String>, Error>`.
    /// Therefore, in order to access the row, callers must handle the
    /// possibility of error (typically with `?`).
    pub fn rows(&mut self) -> RowsIter<R> {
        RowsIter { rdr: self, done: false }
    }

    /// Returns an owned iterator over all rows as `Vec<String>`.
    ///
    /// The underlying reader is dropped as soon as the iterator is
    /// exhausted or yields an I/O error.
    pub fn into_rows(self) -> RowsIntoIter<R> {
        RowsIntoIter { rdr: Some(self) }
    }

    /// Return the current position of this CSV reader.
    ///
    /// The byte offset and line refer to the position just after the last
    /// consumed byte. The record index is the number of rows read so far.
    pub fn position(&self) -> &Position {
        &self.state.cur_pos
    }

    /// Returns true if and only if this reader has been exhausted.
    ///
    /// When this returns true, no more rows can be read from this reader.
    pub fn is_done(&self) -> bool {
        self.state.eof
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        self.rdr.get_ref()
    }

    /// Unwraps this CSV reader, returning the underlying reader.
    ///
    /// Note that any leftover data inside this reader's internal buffer is
    /// lost.
    pub fn into_inner(self) -> R {
        self.rdr.into_inner()
    }
}

/// A borrowed iterator over rows.
///
/// The lifetime parameter `'r` refers to the lifetime of the underlying
/// CSV `Reader`.
#[derive(Debug)]
pub struct RowsIter<'r, R: 'r> {
    rdr: &'r mut Reader<R>,
    done: bool,
}

impl<'r, R: io::Read> RowsIter<'r, R> {
    /// Return a reference to the underlying CSV reader.
    pub fn reader(&self) -> &Reader<R> {
        &self.rdr
    }

    /// Return a mutable reference to the underlying CSV reader.
    pub fn reader_mut(&mut self) -> &mut Reader<R> {
        &mut self.rdr
    }
}

impl<'r, R: io::Read> Iterator for RowsIter<'r, R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Result<Vec<String>>> {
        if self.done {
            return None;
        }
        let mut row = Vec::new();
        match self.rdr.read_row(&mut row) {
            Ok(true) => Some(Ok(row)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = err.is_io_error();
                Some(Err(err))
            }
        }
    }
}

impl<'r, R: io::Read> FusedIterator for RowsIter<'r, R> {}

/// An owned iterator over rows.
///
/// The underlying reader is released as soon as this iterator has yielded
/// its last item.
#[derive(Debug)]
pub struct RowsIntoIter<R> {
    rdr: Option<Reader<R>>,
}

impl<R: io::Read> RowsIntoIter<R> {
    /// Return a reference to the underlying CSV reader, if it has not been
    /// released yet.
    pub fn reader(&self) -> Option<&Reader<R>> {
        self.rdr.as_ref()
    }

    /// Drop the iterator and return the underlying CSV reader, if it has
    /// not been released yet.
    pub fn into_reader(self) -> Option<Reader<R>> {
        self.rdr
    }
}

impl<R: io::Read> Iterator for RowsIntoIter<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Result<Vec<String>>> {
        let rdr = self.rdr.as_mut()?;
        let mut row = Vec::new();
        match rdr.read_row(&mut row) {
            Ok(true) => Some(Ok(row)),
            Ok(false) => {
                debug!("CSV data exhausted after {} rows", rdr.position().record());
                self.rdr = None;
                None
            }
            Err(err) => {
                if err.is_io_error() {
                    self.rdr = None;
                }
                Some(Err(err))
            }
        }
    }
}

impl<R: io::Read> FusedIterator for RowsIntoIter<R> {}

/// A lazy iterator over the rows of a CSV file.
///
/// This is created by [`reader`](fn@crate::reader) or
/// [`ReaderBuilder::from_path_lazy`].
#[derive(Debug)]
pub struct PathRows {
    path: PathBuf,
    builder: ReaderBuilder,
    state: PathState,
}

#[derive(Debug)]
enum PathState {
    Unopened,
    Open(RowsIntoIter<File>),
    Done,
}

impl PathRows {
    /// The path this iterator reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the file is currently open.
    pub fn is_open(&self) -> bool {
        match self.state {
            PathState::Open(_) => true,
            PathState::Unopened | PathState::Done => false,
        }
    }
}

impl Iterator for PathRows {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Result<Vec<String>>> {
        loop {
            match self.state {
                PathState::Unopened => match self.builder.from_path(&self.path) {
                    Ok(rdr) => self.state = PathState::Open(rdr.into_rows()),
                    Err(err) => {
                        self.state = PathState::Done;
                        return Some(Err(err));
                    }
                },
                PathState::Open(ref mut rows) => {
                    let next = rows.next();
                    if rows.reader().is_none() {
                        debug!("closing CSV file {}", self.path.display());
                        self.state = PathState::Done;
                    }
                    return next;
                }
                PathState::Done => return None,
            }
        }
    }
}

impl FusedIterator for PathRows {}
