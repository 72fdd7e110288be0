//! A block header record.

use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::position::Number;

/// The prefix for a block header record.
pub const HEADER_PREFIX: &str = ">";

/// The delimiter used when writing a block header record.
pub const DELIMITER: char = '\t';

/// The number of expected fields in a block header record.
pub const NUM_HEADER_FIELDS: usize = 2;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing a block header record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the header line.
    IncorrectNumberOfFields(usize),

    /// An invalid prefix.
    InvalidPrefix(String),

    /// The name following the prefix was empty.
    MissingName,

    /// An invalid alignment start.
    InvalidAlignmentStart(ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in header: expected {NUM_HEADER_FIELDS} fields, found \
                 {fields} fields"
            ),
            ParseError::InvalidPrefix(field) => write!(
                f,
                "invalid prefix: expected \"{HEADER_PREFIX}\", found \"{field}\""
            ),
            ParseError::MissingName => write!(f, "missing name after \"{HEADER_PREFIX}\""),
            ParseError::InvalidAlignmentStart(err) => write!(f, "invalid alignment start: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Record`].
#[derive(Debug)]
pub enum Error {
    /// Alignment starts are one-based, so a start of zero is not allowed.
    ZeroAlignmentStart,

    /// A parse error.
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroAlignmentStart => {
                write!(f, "alignment starts are one-based, found alignment start 0")
            }
            Error::Parse(err) => write!(f, "parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// A header record that opens an alignment block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The name of the reference or contig.
    name: String,

    /// The position of the first observed base call.
    alignment_start: Number,
}

impl Record {
    /// Attempts to create a new [`Record`].
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::header::Record;
    ///
    /// let header = Record::try_new("contig00001", 5)?;
    /// assert_eq!(header.name(), "contig00001");
    /// assert_eq!(header.alignment_start(), 5);
    ///
    /// assert!(Record::try_new("contig00001", 0).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(name: impl Into<String>, alignment_start: Number) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(Error::Parse(ParseError::MissingName));
        }

        if alignment_start == 0 {
            return Err(Error::ZeroAlignmentStart);
        }

        Ok(Self {
            name,
            alignment_start,
        })
    }

    /// Gets the name of the reference or contig.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::header;
    ///
    /// let header = ">CY081005_NS_Boston09\t1".parse::<header::Record>()?;
    /// assert_eq!(header.name(), "CY081005_NS_Boston09");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the position of the first observed base call.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::header;
    ///
    /// let header = ">CY081005_NS_Boston09\t460".parse::<header::Record>()?;
    /// assert_eq!(header.alignment_start(), 460);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn alignment_start(&self) -> Number {
        self.alignment_start
    }
}

impl FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s.split_whitespace().collect::<Vec<_>>();

        if parts.len() != NUM_HEADER_FIELDS {
            return Err(Error::Parse(ParseError::IncorrectNumberOfFields(
                parts.len(),
            )));
        }

        let name = parts[0]
            .strip_prefix(HEADER_PREFIX)
            .ok_or_else(|| Error::Parse(ParseError::InvalidPrefix(parts[0].into())))?;

        let alignment_start = parts[1]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidAlignmentStart(err)))?;

        Record::try_new(name, alignment_start)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{HEADER_PREFIX}{}{DELIMITER}{}",
            self.name, self.alignment_start
        )
    }
}
