use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::debug;
use rowcsv_core::Writer as CoreWriter;

use crate::error::{Error, Result};
use crate::field::ToField;

const DEFAULT_BUFFER_CAPACITY: usize = 8 * (1 << 10);

/// Write every row in `rows` to the file at `path`.
///
/// The file is created if it does not already exist and is truncated
/// otherwise. Every row, including the last, ends with `\n`. All rows are
/// written and flushed, and the file is closed, before this returns.
///
/// If the file cannot be created or written, the I/O error is returned. A
/// failed write leaves the file partially written.
///
/// # Example
///
/// ```no_run
/// let rows = vec![
///     vec!["ID", "Name"],
///     vec!["1", "Jane, Doe"],
/// ];
/// rowcsv::write_all("people.csv", &rows)?;
/// # Ok::<(), rowcsv::Error>(())
/// ```
pub fn write_all<P, I, R, T>(path: P, rows: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = T>,
    T: ToField,
{
    let mut wtr = Writer::from_path(path.as_ref())?;
    wtr.write_all(rows)?;
    debug!("wrote {} rows to {}", wtr.rows(), path.as_ref().display());
    Ok(())
}

/// Builds a CSV writer with various configuration knobs.
///
/// The dialect itself is fixed, so the only knob is the size of the
/// internal buffer.
#[derive(Debug)]
pub struct WriterBuilder {
    capacity: usize,
}

impl Default for WriterBuilder {
    fn default() -> WriterBuilder {
        WriterBuilder { capacity: DEFAULT_BUFFER_CAPACITY }
    }
}

impl WriterBuilder {
    /// Create a new builder for configuring CSV writing.
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Build a CSV writer from this configuration that writes data to the
    /// given file path. The file is truncated if it already exists.
    ///
    /// If there was a problem creating the file, then an error is returned.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Writer<File>> {
        let path = path.as_ref();
        debug!("creating CSV file {}", path.display());
        Ok(Writer::new(self, File::create(path)?))
    }

    /// Build a CSV writer from this configuration that writes data to `wtr`.
    ///
    /// Note that the CSV writer is buffered automatically, so you should not
    /// wrap `wtr` in a buffered writer like `io::BufWriter`.
    pub fn from_writer<W: io::Write>(&self, wtr: W) -> Writer<W> {
        Writer::new(self, wtr)
    }

    /// Set the capacity (in bytes) of the internal buffer used in the CSV
    /// writer. This defaults to a reasonable setting.
    pub fn buffer_capacity(&mut self, capacity: usize) -> &mut WriterBuilder {
        self.capacity = capacity;
        self
    }
}

/// A CSV writer.
///
/// This writer writes CSV data with quoting applied only where it is
/// needed: a field is wrapped in quotes when it contains `,`, `"`, `\n` or
/// `\r`, and quotes inside it are doubled. Every record ends with `\n`.
///
/// Fields are anything that implements [`ToField`](crate::ToField).
///
/// The underlying writer is owned by this value and is flushed when it is
/// dropped. Errors during that final flush are ignored; call
/// [`flush`](Writer::flush) or [`into_inner`](Writer::into_inner) to observe
/// them.
///
/// # Example
///
/// ```
/// let mut wtr = rowcsv::Writer::from_writer(vec![]);
/// wtr.write_record(&["a", "b,c", "d\"e"])?;
/// wtr.write_record(&[1, 2, 3])?;
///
/// let data = String::from_utf8(wtr.into_inner()?).unwrap();
/// assert_eq!(data, "a,\"b,c\",\"d\"\"e\"\n1,2,3\n");
/// # Ok::<(), rowcsv::Error>(())
/// ```
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    core: CoreWriter,
    wtr: io::BufWriter<W>,
    /// Encoded output not yet handed to `wtr`.
    buf: Vec<u8>,
    /// The text of the field being written, before quoting.
    field: Vec<u8>,
    rows: u64,
}

impl Writer<File> {
    /// Build a CSV writer with a default configuration that writes data to
    /// the given file path. The file is truncated if it already exists.
    ///
    /// If there was a problem creating the file, then an error is returned.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Writer<File>> {
        WriterBuilder::new().from_path(path)
    }
}

impl<W: io::Write> Writer<W> {
    fn new(builder: &WriterBuilder, wtr: W) -> Writer<W> {
        Writer {
            core: CoreWriter::new(),
            wtr: io::BufWriter::with_capacity(builder.capacity, wtr),
            buf: Vec::with_capacity(64),
            field: Vec::with_capacity(64),
            rows: 0,
        }
    }

    /// Build a CSV writer with a default configuration that writes data to
    /// `wtr`.
    pub fn from_writer(wtr: W) -> Writer<W> {
        WriterBuilder::new().from_writer(wtr)
    }

    /// Write every row in `rows` and flush.
    ///
    /// Each row is any iterable of fields. The writer is flushed once all
    /// rows are written, so I/O errors are reported here rather than lost
    /// when the writer is dropped.
    pub fn write_all<I, R, T>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: ToField,
    {
        for row in rows {
            self.write_record(row)?;
        }
        self.flush()
    }

    /// Write a single record.
    ///
    /// A record with no fields is written as an empty line, which reads
    /// back as a record with one empty field.
    pub fn write_record<I, T>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: ToField,
    {
        for field in record {
            self.write_field(field)?;
        }
        self.write_terminator()
    }

    /// Write a single field.
    ///
    /// One should prefer using `write_record` over this method. It is
    /// provided for cases where writing a field at a time is more
    /// convenient than writing a record at a time.
    ///
    /// Note that if this API is used, `write_terminator` must be called
    /// to end the record.
    pub fn write_field<T: ToField>(&mut self, field: T) -> Result<()> {
        self.field.clear();
        field.write_field(&mut self.field);
        self.core.write_field(&self.field, &mut self.buf);
        self.drain()
    }

    /// Write the record terminator, ending the current record.
    pub fn write_terminator(&mut self) -> Result<()> {
        self.core.write_terminator(&mut self.buf);
        self.rows += 1;
        self.drain()
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    ///
    /// If there was a problem writing to the underlying writer, then an error
    /// is returned.
    ///
    /// Note that this also flushes the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.wtr.flush()?;
        Ok(())
    }

    /// The number of records written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Return a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        self.wtr.get_ref()
    }

    /// Flush the contents of the internal buffer and return the underlying
    /// writer.
    pub fn into_inner(self) -> Result<W> {
        self.wtr.into_inner().map_err(|err| Error::Io(err.into()))
    }

    fn drain(&mut self) -> Result<()> {
        self.wtr.write_all(&self.buf)?;
        self.buf.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::{Writer, WriterBuilder};
    use crate::ToField;

    fn wtr_as_string(wtr: Writer<Vec<u8>>) -> String {
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn one_record() {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(&["a", "b", "c"]).unwrap();

        assert_eq!(wtr_as_string(wtr), "a,b,c\n");
    }

    #[test]
    fn one_empty_record() {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(&[""]).unwrap();

        assert_eq!(wtr_as_string(wtr), "\n");
    }

    #[test]
    fn zero_fields_record() {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(Vec::<String>::new()).unwrap();
        wtr.write_record(&["a"]).unwrap();

        assert_eq!(wtr_as_string(wtr), "\na\n");
    }

    #[test]
    fn field_at_a_time() {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_field("a").unwrap();
        wtr.write_field("b,c").unwrap();
        wtr.write_terminator().unwrap();
        wtr.write_field(5u8).unwrap();
        wtr.write_terminator().unwrap();
        assert_eq!(wtr.rows(), 2);

        assert_eq!(wtr_as_string(wtr), "a,\"b,c\"\n5\n");
    }

    #[test]
    fn mixed_values() {
        let mut wtr = Writer::from_writer(vec![]);
        let record: Vec<Box<dyn ToField>> = vec![
            Box::new(1i64),
            Box::new("x\"y"),
            Box::new(0.5f64),
            Box::new('c'),
            Box::new(false),
        ];
        wtr.write_record(&record).unwrap();

        assert_eq!(wtr_as_string(wtr), "1,\"x\"\"y\",0.5,c,false\n");
    }

    #[test]
    fn write_all_rows() {
        let rows = vec![
            vec!["ID", "Name", "Bio"],
            vec!["1", "John Doe", "Standard text"],
            vec!["2", "Jane, Doe", "Bio with a comma"],
            vec!["3", "Bob \"The Builder\"", "Bio with escaped quotes"],
            vec!["4", "Alice", "Bio with a\nnewline character"],
        ];
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_all(&rows).unwrap();

        assert_eq!(
            wtr_as_string(wtr),
            "ID,Name,Bio\n\
             1,John Doe,Standard text\n\
             2,\"Jane, Doe\",Bio with a comma\n\
             3,\"Bob \"\"The Builder\"\"\",Bio with escaped quotes\n\
             4,Alice,\"Bio with a\nnewline character\"\n"
        );
    }

    #[test]
    fn small_buffer() {
        let mut wtr =
            WriterBuilder::new().buffer_capacity(1).from_writer(vec![]);
        wtr.write_record(&["abc", "d\re"]).unwrap();
        assert_eq!(wtr.get_ref().as_slice(), b"abc,\"d\re\"\n");

        assert_eq!(wtr_as_string(wtr), "abc,\"d\re\"\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_error_propagates() {
        let mut wtr = Writer::from_writer(Broken);
        let err = wtr.write_all(vec![vec!["a"]]).unwrap_err();
        assert!(err.is_io_error());
        assert_eq!(err.to_string(), "broken pipe");
    }
}
