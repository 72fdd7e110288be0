//! A line within an alignment info file.

use std::str::FromStr;

use crate::alignment::block::call;
use crate::alignment::block::call::DEFAULT_LOW_COVERAGE_THRESHOLD;
use crate::alignment::block::header;
use crate::alignment::block::header::HEADER_PREFIX;

/// The prefix of the column header line that may open the file.
pub const COLUMN_HEADER_PREFIX: &str = "Position";

/// An error associated with parsing a line.
#[derive(Debug)]
pub enum Error {
    /// An invalid block header record.
    InvalidHeader(header::Error, String),

    /// An invalid base call record.
    InvalidBaseCall(call::Error, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidHeader(err, line) => {
                write!(f, "invalid header record: {err}\n\nline: {line}")
            }
            Error::InvalidBaseCall(err, line) => {
                write!(f, "invalid base call record: {err}\n\nline: {line}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A line within an alignment info file.
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    /// An empty line.
    Empty,

    /// The column header line.
    ColumnHeader,

    /// A block header line.
    Header(header::Record),

    /// A base call line.
    BaseCall(call::Record),
}

impl Line {
    /// Attempts to parse a [`Line`], classifying base calls against
    /// `low_coverage_threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::Line;
    /// use alignmentinfo::coverage::Class;
    ///
    /// let line = Line::parse("1\tA\tA\t18\t5\t5\t5\t1.0\t0.1", 4)?;
    ///
    /// match line {
    ///     Line::BaseCall(record) => assert_eq!(record.class(), Class::Normal),
    ///     _ => unreachable!(),
    /// }
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(s: &str, low_coverage_threshold: u64) -> Result<Self, Error> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            Ok(Self::Empty)
        } else if trimmed.starts_with(COLUMN_HEADER_PREFIX) {
            Ok(Self::ColumnHeader)
        } else if trimmed.starts_with(HEADER_PREFIX) {
            trimmed
                .parse::<header::Record>()
                .map(Line::Header)
                .map_err(|e| Error::InvalidHeader(e, s.into()))
        } else {
            call::Record::parse(trimmed, low_coverage_threshold)
                .map(Line::BaseCall)
                .map_err(|e| Error::InvalidBaseCall(e, s.into()))
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Empty => write!(f, ""),
            Line::ColumnHeader => write!(f, "{COLUMN_HEADER_PREFIX}"),
            Line::Header(record) => write!(f, "{record}"),
            Line::BaseCall(record) => write!(f, "{record}"),
        }
    }
}

impl FromStr for Line {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Line::parse(s, DEFAULT_LOW_COVERAGE_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("".parse::<Line>()?, Line::Empty);
        assert_eq!("  \t".parse::<Line>()?, Line::Empty);
        Ok(())
    }

    #[test]
    fn column_header_line() -> Result<(), Box<dyn std::error::Error>> {
        let line = "Position\tRef\tConsensus\tQuality Score\tUnique Depth\tAlign Depth\tTotal \
                    Depth\tSignal\tStdDeviation"
            .parse::<Line>()?;
        assert_eq!(line, Line::ColumnHeader);
        Ok(())
    }

    #[test]
    fn valid_header_line() -> Result<(), Box<dyn std::error::Error>> {
        let line = ">contig00001\t1".parse::<Line>()?;
        assert!(matches!(line, Line::Header(_)));
        Ok(())
    }

    #[test]
    fn valid_base_call_lines() -> Result<(), Box<dyn std::error::Error>> {
        let line = "689\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse::<Line>()?;
        assert!(matches!(line, Line::BaseCall(_)));

        let line = "689\tA\t18\t1\t1\t1.16\t1.16".parse::<Line>()?;
        assert!(matches!(line, Line::BaseCall(_)));

        Ok(())
    }

    #[test]
    fn invalid_header_line() {
        let err = ">contig00001\t?".parse::<Line>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid header record: parse error: invalid alignment start: invalid digit found \
             in string\n\nline: >contig00001\t?"
        );
    }

    #[test]
    fn invalid_base_call_line() {
        let err = "1\t2".parse::<Line>().unwrap_err();
        assert!(matches!(err, Error::InvalidBaseCall(_, _)));
        assert_eq!(
            err.to_string(),
            "invalid base call record: parse error: invalid number of fields in base call: \
             expected 9 (with reference) or 7 (without reference) fields, found 2 fields\n\n\
             line: 1\t2"
        );
    }
}
