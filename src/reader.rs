//! An alignment info file reader.

use std::io::BufRead;
use std::io::{self};
use std::iter;

use crate::Line;
use crate::alignment::block::Blocks;
use crate::alignment::block::call::DEFAULT_LOW_COVERAGE_THRESHOLD;
use crate::line;

/// The new line character.
const NEW_LINE: char = '\n';

/// The carriage return character.
const CARRIAGE_RETURN: char = '\r';

/// The source name used when none is provided.
pub const DEFAULT_SOURCE: &str = "<stream>";

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A line error.
    Line(line::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Line(err) => write!(f, "line error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// An alignment info file reader.
#[derive(Clone, Debug)]
pub struct Reader<T>
where
    T: BufRead,
{
    /// The inner reader.
    inner: T,

    /// The name of the source being read (used in error messages).
    source: String,

    /// The aligned depth below which a base has low coverage.
    low_coverage_threshold: u64,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates an alignment info file reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b">seq0\t1\n1\tA\tA\t18\t1\t1\t1\t1.16\t1.16";
    /// let reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// assert_eq!(reader.source(), "<stream>");
    /// assert_eq!(reader.low_coverage_threshold(), 10);
    /// ```
    pub fn new(inner: T) -> Self {
        Self::from(inner)
    }

    /// Sets the name of the source being read.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b">seq0\t1\n1\tA\tA\t18\t1\t1\t1\t1.16\t1.16";
    /// let reader = alignmentinfo::Reader::new(&data[..]).with_source("454AlignmentInfo.tsv");
    ///
    /// assert_eq!(reader.source(), "454AlignmentInfo.tsv");
    /// ```
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the aligned depth below which a base has low coverage.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b">seq0\t1\n1\tA\tA\t18\t1\t1\t1\t1.16\t1.16";
    /// let reader = alignmentinfo::Reader::new(&data[..]).with_low_coverage_threshold(20);
    ///
    /// assert_eq!(reader.low_coverage_threshold(), 20);
    /// ```
    pub fn with_low_coverage_threshold(mut self, threshold: u64) -> Self {
        self.low_coverage_threshold = threshold;
        self
    }

    /// Gets the name of the source being read.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Gets the aligned depth below which a base has low coverage.
    pub fn low_coverage_threshold(&self) -> u64 {
        self.low_coverage_threshold
    }

    /// Gets a reference to the inner reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    ///
    /// let data = b">seq0\t1\n1\tA\tA\t18\t1\t1\t1\t1.16\t1.16";
    /// let cursor = io::Cursor::new(data);
    ///
    /// let reader = alignmentinfo::Reader::new(cursor);
    /// assert_eq!(reader.inner().position(), 0);
    /// ```
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Gets a mutable reference to the inner reader.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consumes self and returns the inner reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::BufRead;
    ///
    /// let data = b">seq0\t1\n1\tA\tA\t18\t1\t1\t1\t1.16\t1.16";
    /// let reader = alignmentinfo::Reader::new(&data[..]);
    /// let mut lines = reader.into_inner().lines().map(|line| line.unwrap());
    ///
    /// assert_eq!(lines.next(), Some(String::from(">seq0\t1")));
    /// assert_eq!(
    ///     lines.next(),
    ///     Some(String::from("1\tA\tA\t18\t1\t1\t1\t1.16\t1.16"))
    /// );
    /// assert_eq!(lines.next(), None);
    /// ```
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Reads a raw, textual line from the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    ///
    /// let data = b">seq0\t1\r\n1\tA\t18\t1\t1\t1.16\t1.16";
    /// let mut reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 9);
    /// assert_eq!(buffer, ">seq0\t1");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 20);
    /// assert_eq!(buffer, "1\tA\t18\t1\t1\t1.16\t1.16");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 0);
    ///
    /// # Ok::<(), io::Error>(())
    /// ```
    pub fn read_line_raw(&mut self, buffer: &mut String) -> io::Result<usize> {
        read_line(self.inner_mut(), buffer)
    }

    /// Attempts to read a [`Line`] from the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::Line;
    ///
    /// let data = b"Position\tRef\n>seq0\t1\n1\tA\tA\t18\t1\t1\t1\t1.16\t1.16";
    /// let mut reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    /// assert!(matches!(
    ///     reader.read_line(&mut buffer)?,
    ///     Some(Line::ColumnHeader)
    /// ));
    /// assert!(matches!(
    ///     reader.read_line(&mut buffer)?,
    ///     Some(Line::Header(_))
    /// ));
    /// assert!(matches!(
    ///     reader.read_line(&mut buffer)?,
    ///     Some(Line::BaseCall(_))
    /// ));
    /// assert!(matches!(reader.read_line(&mut buffer)?, None));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_line(&mut self, buffer: &mut String) -> Result<Option<Line>, Error> {
        let read = self.read_line_raw(buffer).map_err(Error::Io)?;

        match read {
            0 => Ok(None),
            _ => {
                let line =
                    Line::parse(buffer, self.low_coverage_threshold).map_err(Error::Line)?;
                Ok(Some(line))
            }
        }
    }

    /// Returns an iterator over the `Line`s in the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b">seq0\t1\n1\tA\tA\t18\t1\t1\t1\t1.16\t1.16\n\n";
    /// let mut reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let lines = reader.lines().collect::<Vec<_>>();
    /// assert_eq!(lines.len(), 3);
    /// ```
    pub fn lines(&mut self) -> impl Iterator<Item = io::Result<Line>> + '_ {
        let mut buffer = String::new();

        iter::from_fn(move || {
            buffer.clear();

            match self.read_line_raw(&mut buffer) {
                Ok(0) => None,
                Ok(_) => Some(
                    Line::parse(&buffer, self.low_coverage_threshold)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
                ),
                Err(e) => Some(Err(e)),
            }
        })
    }

    /// Returns an iterator over the alignment blocks in the underlying
    /// reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b">seq0\t1\n1\tA\tA\t18\t1\t1\t1\t1.16\t1.16\n>seq1\t3\n";
    /// let mut reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let blocks = reader
    ///     .blocks()
    ///     .map(|result| result.unwrap())
    ///     .collect::<Vec<_>>();
    /// assert_eq!(blocks.len(), 2);
    /// ```
    pub fn blocks(&mut self) -> Blocks<'_, T> {
        Blocks::new(self)
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self {
            inner,
            source: String::from(DEFAULT_SOURCE),
            low_coverage_threshold: DEFAULT_LOW_COVERAGE_THRESHOLD,
        }
    }
}

/// Reads a line from a buffered reader, stripping the line ending.
fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    match reader.read_line(buffer) {
        Ok(0) => Ok(0),
        Ok(n) => {
            if buffer.ends_with(NEW_LINE) {
                buffer.pop();

                if buffer.ends_with(CARRIAGE_RETURN) {
                    buffer.pop();
                }
            }

            Ok(n)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_read_line() {
        let data = b"hello\r\nworld!";
        let mut cursor = io::Cursor::new(data);

        let mut buffer = String::new();
        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "hello");
        assert_eq!(len, 7);

        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "world!");
        assert_eq!(len, 6);
    }

    #[test]
    fn threshold_is_applied_to_lines() {
        let data = b"1\tA\tA\t18\t1\t12\t12\t1.16\t1.16";

        let mut reader = Reader::new(&data[..]);
        let mut buffer = String::new();
        match reader.read_line(&mut buffer).unwrap() {
            Some(Line::BaseCall(record)) => {
                assert_eq!(record.class(), crate::coverage::Class::Normal)
            }
            _ => unreachable!(),
        }

        let mut reader = Reader::new(&data[..]).with_low_coverage_threshold(13);
        match reader.read_line(&mut buffer).unwrap() {
            Some(Line::BaseCall(record)) => {
                assert_eq!(record.class(), crate::coverage::Class::LowCoverage)
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn invalid_line() {
        let data = b"1\t2";
        let mut reader = Reader::new(&data[..]);
        let mut buffer = String::new();

        let err = reader.read_line(&mut buffer).unwrap_err();
        assert!(matches!(err, Error::Line(line::Error::InvalidBaseCall(_, _))));
    }
}
