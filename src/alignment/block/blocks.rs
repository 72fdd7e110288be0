//! An iterator over the [alignment blocks](crate::alignment::Block) in a
//! reader.

use std::io;
use std::io::BufRead;

use crate::Line;
use crate::Reader;
use crate::alignment::Block;
use crate::alignment::block::Builder;
use crate::alignment::block::builder;
use crate::alignment::block::header;
use crate::line;
use crate::reader;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// The reason a line was rejected while reading alignment blocks.
#[derive(Debug)]
pub enum ParseError {
    /// The line could not be parsed.
    Line(line::Error),

    /// A base call was found before any block header.
    DataBeforeBlock,

    /// The base call could not be added to the current block.
    Builder(builder::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Line(err) => write!(f, "{err}"),
            ParseError::DataBeforeBlock => write!(f, "found base call before any block header"),
            ParseError::Builder(err) => write!(f, "builder error: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to [`Blocks`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A line that does not match the expected layout.
    BadFormat {
        /// The name of the source being read.
        source: String,

        /// The one-based number of the offending line.
        line_no: usize,

        /// The reason the line was rejected.
        reason: ParseError,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::BadFormat {
                source,
                line_no,
                reason,
            } => write!(f, "bad format in {source} at line {line_no}: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Blocks
////////////////////////////////////////////////////////////////////////////////////////

/// An iterator that traverses the alignment blocks of a reader.
///
/// A block runs from its header line up to the next header line (or the end
/// of the input). Because the next header is only seen once the current block
/// is complete, it is held over until the following call to `next()`.
#[derive(Debug)]
pub struct Blocks<'a, T>
where
    T: BufRead,
{
    /// The inner reader.
    reader: &'a mut Reader<T>,

    /// A header that was read but whose block has not been started.
    pending: Option<header::Record>,

    /// The line number.
    line_no: usize,

    /// Whether the input is exhausted (or an error ended the iteration).
    done: bool,
}

impl<'a, T> Blocks<'a, T>
where
    T: BufRead,
{
    /// Creates a new [`Blocks`].
    pub(crate) fn new(reader: &'a mut Reader<T>) -> Self {
        Self {
            reader,
            pending: None,
            line_no: 0usize,
            done: false,
        }
    }

    /// Ends the iteration with a format error at the current line.
    fn bad_format(&mut self, reason: ParseError) -> Error {
        self.done = true;

        Error::BadFormat {
            source: self.reader.source().to_string(),
            line_no: self.line_no,
            reason,
        }
    }

    /// Builds the block held by `builder`.
    fn finish(&mut self, builder: Builder) -> Result<Block> {
        builder
            .try_build()
            .map_err(|err| self.bad_format(ParseError::Builder(err)))
    }

    /// Starts a new block from its header.
    fn start(&mut self, record: header::Record) -> Result<Builder> {
        Builder::default()
            .header(record)
            .map_err(|err| self.bad_format(ParseError::Builder(err)))
    }
}

impl<T> Iterator for Blocks<'_, T>
where
    T: BufRead,
{
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut builder = match self.pending.take() {
            Some(record) => match self.start(record) {
                Ok(builder) => Some(builder),
                Err(err) => return Some(Err(err)),
            },
            None => None,
        };

        let mut buffer = String::new();

        loop {
            // (1) Reads the current line, bailing out on errors from the
            // underlying reader.
            let line = match self.reader.read_line(&mut buffer) {
                Ok(line) => line,
                Err(reader::Error::Io(err)) => {
                    self.done = true;
                    return Some(Err(Error::Io(err)));
                }
                Err(reader::Error::Line(err)) => {
                    self.line_no += 1;
                    return Some(Err(self.bad_format(ParseError::Line(err))));
                }
            };

            self.line_no += 1;

            // (2) At the end of the input, the block being read (if any) is
            // the last one.
            let line = match line {
                Some(line) => line,
                None => {
                    self.done = true;
                    return builder.map(|builder| self.finish(builder));
                }
            };

            // (3) A header closes the block being read and opens the next one.
            // Base calls are added to the block being read.
            builder = match (builder, line) {
                (builder, Line::Empty | Line::ColumnHeader) => builder,
                (None, Line::Header(record)) => match self.start(record) {
                    Ok(builder) => Some(builder),
                    Err(err) => return Some(Err(err)),
                },
                (Some(builder), Line::Header(record)) => {
                    self.pending = Some(record);
                    return Some(self.finish(builder));
                }
                (None, Line::BaseCall(_)) => {
                    return Some(Err(self.bad_format(ParseError::DataBeforeBlock)));
                }
                (Some(builder), Line::BaseCall(record)) => match builder.push_call(record) {
                    Ok(builder) => Some(builder),
                    Err(err) => return Some(Err(self.bad_format(ParseError::Builder(err)))),
                },
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let data = b"";
        let mut reader = Reader::new(&data[..]);
        assert!(reader.blocks().next().is_none());

        let data = b"Position\tRef\tConsensus\n";
        let mut reader = Reader::new(&data[..]);
        assert!(reader.blocks().next().is_none());
    }

    #[test]
    fn test_repeated_names_are_kept_as_separate_blocks() {
        let data = b">seq0\t1\n1\tA\t30\t12\t12\t1.0\t0.1\n>seq0\t3\n3\tA\t30\t12\t12\t1.0\t0.1\n";
        let mut reader = Reader::new(&data[..]);

        let blocks = reader
            .blocks()
            .map(|result| result.unwrap())
            .collect::<Vec<_>>();

        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|block| block.name() == "seq0"));
        assert_eq!(blocks[0].alignment_start(), 1);
        assert_eq!(blocks[1].alignment_start(), 3);
    }

    #[test]
    fn test_data_before_block() {
        let data = b"Position\n1\tA\t30\t12\t12\t1.0\t0.1\n";
        let mut reader = Reader::new(&data[..]).with_source("454AlignmentInfo.tsv");

        let err = reader.blocks().next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::BadFormat {
                line_no: 2,
                reason: ParseError::DataBeforeBlock,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "bad format in 454AlignmentInfo.tsv at line 2: found base call before any block \
             header"
        );
    }

    #[test]
    fn test_bad_base_call_line() {
        let data = b">seq0\t1\n1\tA\t30\t12\t12\t1.0\t0.1\n2\t2\n";
        let mut reader = Reader::new(&data[..]);

        let mut blocks = reader.blocks();
        let err = blocks.next().unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad format in <stream> at line 3: invalid base call record: parse error: invalid \
             number of fields in base call: expected 9 (with reference) or 7 (without \
             reference) fields, found 2 fields\n\nline: 2\t2"
        );

        assert!(blocks.next().is_none());
    }

    #[test]
    fn test_bad_header_line() {
        let data = b">seq0\t1\n1\tA\t30\t12\t12\t1.0\t0.1\n>seq1\n";
        let mut reader = Reader::new(&data[..]);

        let err = reader.blocks().next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::BadFormat {
                line_no: 3,
                reason: ParseError::Line(line::Error::InvalidHeader(_, _)),
                ..
            }
        ));
    }

    #[test]
    fn test_far_off_alignment_start() {
        let data = b">seq0\t1\n1\tA\t30\t12\t12\t1.0\t0.1\n>seq1\t4000000000\n";
        let mut reader = Reader::new(&data[..]);

        let mut blocks = reader.blocks();
        assert!(blocks.next().unwrap().is_ok());

        let err = blocks.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::BadFormat {
                line_no: 3,
                reason: ParseError::Builder(builder::Error::GapTooLong { .. }),
                ..
            }
        ));
        assert!(blocks.next().is_none());
    }

    #[test]
    fn test_out_of_order_positions() {
        let data = b">seq0\t1\n4\tA\t30\t12\t12\t1.0\t0.1\n2\tA\t30\t12\t12\t1.0\t0.1\n";
        let mut reader = Reader::new(&data[..]);

        let err = reader.blocks().next().unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad format in <stream> at line 3: builder error: base call at position 2 does not \
             follow position 4"
        );
    }
}
