//! A base call record.

use std::num::ParseFloatError;
use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::position::Number;

use crate::coverage::Class;

/// The delimiter used when writing a base call record.
const DELIMITER: char = '\t';

/// The number of fields in a base call record that includes the reference
/// base and the total depth.
pub const NUM_FIELDS_WITH_REFERENCE: usize = 9;

/// The number of fields in a base call record without the reference base and
/// the total depth.
pub const NUM_FIELDS_WITHOUT_REFERENCE: usize = 7;

/// The aligned depth below which a base is considered to have low coverage.
pub const DEFAULT_LOW_COVERAGE_THRESHOLD: u64 = 10;

/// The base recorded for positions that were never observed.
const GAP_BASE: char = '-';

/// The quality recorded for positions that were never observed.
const GAP_QUALITY: u64 = 64;

/// The unique depth recorded for positions that were never observed.
const GAP_UNIQUE_DEPTH: u64 = 1;

/// The aligned and total depth recorded for positions that were never
/// observed.
const GAP_DEPTH: u64 = 1000;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to the parsing of a base call record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the base call line.
    IncorrectNumberOfFields(usize),

    /// An invalid position.
    InvalidPosition(ParseIntError),

    /// An invalid reference base.
    InvalidReferenceBase(String),

    /// An invalid consensus base.
    InvalidConsensusBase(String),

    /// An invalid quality.
    InvalidQuality(ParseIntError),

    /// An invalid unique depth.
    InvalidUniqueDepth(ParseIntError),

    /// An invalid aligned depth.
    InvalidAlignedDepth(ParseIntError),

    /// An invalid total depth.
    InvalidTotalDepth(ParseIntError),

    /// An invalid signal.
    InvalidSignal(ParseFloatError),

    /// An invalid standard deviation.
    InvalidStddev(ParseFloatError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in base call: expected {NUM_FIELDS_WITH_REFERENCE} \
                 (with reference) or {NUM_FIELDS_WITHOUT_REFERENCE} (without reference) fields, \
                 found {n} fields"
            ),
            ParseError::InvalidPosition(err) => write!(f, "invalid position: {err}"),
            ParseError::InvalidReferenceBase(base) => {
                write!(f, "invalid reference base: expected one character, found \"{base}\"")
            }
            ParseError::InvalidConsensusBase(base) => {
                write!(f, "invalid consensus base: expected one character, found \"{base}\"")
            }
            ParseError::InvalidQuality(err) => write!(f, "invalid quality: {err}"),
            ParseError::InvalidUniqueDepth(err) => write!(f, "invalid unique depth: {err}"),
            ParseError::InvalidAlignedDepth(err) => write!(f, "invalid aligned depth: {err}"),
            ParseError::InvalidTotalDepth(err) => write!(f, "invalid total depth: {err}"),
            ParseError::InvalidSignal(err) => write!(f, "invalid signal: {err}"),
            ParseError::InvalidStddev(err) => write!(f, "invalid stddev: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Record`].
#[derive(Debug)]
pub enum Error {
    /// Positions are one-based, so a position of zero is not allowed.
    ZeroPosition,

    /// A parse error.
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroPosition => write!(f, "positions are one-based, found position 0"),
            Error::Parse(err) => write!(f, "parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Classification
////////////////////////////////////////////////////////////////////////////////////////

/// Classifies an observed base by its aligned depth.
///
/// [`Class::Gap`] is never returned here, as it is reserved for positions
/// that were not observed at all.
///
/// # Examples
///
/// ```
/// use alignmentinfo::alignment::block::call::classify;
/// use alignmentinfo::coverage::Class;
///
/// assert_eq!(classify(9, 10), Class::LowCoverage);
/// assert_eq!(classify(10, 10), Class::Normal);
/// ```
pub fn classify(aligned_depth: u64, low_coverage_threshold: u64) -> Class {
    if aligned_depth < low_coverage_threshold {
        Class::LowCoverage
    } else {
        Class::Normal
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// The statistics for one aligned base.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The one-based position within the alignment.
    position: Number,

    /// The reference base (only present in the nine field layout).
    reference_base: Option<char>,

    /// The consensus base (`-` for a deletion).
    consensus_base: char,

    /// The quality score.
    quality: u64,

    /// The unique depth.
    unique_depth: u64,

    /// The aligned depth.
    aligned_depth: u64,

    /// The total depth (only present in the nine field layout).
    total_depth: Option<u64>,

    /// The signal.
    signal: f64,

    /// The standard deviation of the signal.
    stddev: f64,

    /// The coverage class.
    class: Class,
}

impl Record {
    /// Attempts to parse a [`Record`], classifying it against
    /// `low_coverage_threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::call::Record;
    /// use alignmentinfo::coverage::Class;
    ///
    /// let line = "689\tA\tA\t18\t1\t4\t4\t1.16\t1.16";
    ///
    /// let record = Record::parse(line, 10)?;
    /// assert_eq!(record.class(), Class::LowCoverage);
    ///
    /// let record = Record::parse(line, 4)?;
    /// assert_eq!(record.class(), Class::Normal);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(s: &str, low_coverage_threshold: u64) -> Result<Self> {
        let parts = s.split_whitespace().collect::<Vec<_>>();

        // The reference base and the total depth are the two optional columns.
        let offset = match parts.len() {
            NUM_FIELDS_WITH_REFERENCE => 1,
            NUM_FIELDS_WITHOUT_REFERENCE => 0,
            n => return Err(Error::Parse(ParseError::IncorrectNumberOfFields(n))),
        };

        let position = parts[0]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidPosition(err)))?;

        if position == 0 {
            return Err(Error::ZeroPosition);
        }

        let reference_base = match offset {
            0 => None,
            _ => Some(parse_base(parts[1]).ok_or_else(|| {
                Error::Parse(ParseError::InvalidReferenceBase(parts[1].into()))
            })?),
        };

        let consensus_base = parse_base(parts[offset + 1]).ok_or_else(|| {
            Error::Parse(ParseError::InvalidConsensusBase(parts[offset + 1].into()))
        })?;
        let quality = parts[offset + 2]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidQuality(err)))?;
        let unique_depth = parts[offset + 3]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidUniqueDepth(err)))?;
        let aligned_depth = parts[offset + 4]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidAlignedDepth(err)))?;

        let total_depth = match offset {
            0 => None,
            _ => Some(
                parts[offset + 5]
                    .parse()
                    .map_err(|err| Error::Parse(ParseError::InvalidTotalDepth(err)))?,
            ),
        };

        let signal = parts[parts.len() - 2]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidSignal(err)))?;
        let stddev = parts[parts.len() - 1]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidStddev(err)))?;

        Ok(Record {
            position,
            reference_base,
            consensus_base,
            quality,
            unique_depth,
            aligned_depth,
            total_depth,
            signal,
            stddev,
            class: classify(aligned_depth, low_coverage_threshold),
        })
    }

    /// Creates a placeholder [`Record`] for a position that was never
    /// observed.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::call::Record;
    /// use alignmentinfo::coverage::Class;
    ///
    /// let record = Record::gap(4);
    /// assert_eq!(record.position(), 4);
    /// assert_eq!(record.class(), Class::Gap);
    /// assert!(record.is_gap());
    /// ```
    pub fn gap(position: Number) -> Self {
        Record {
            position,
            reference_base: Some(GAP_BASE),
            consensus_base: GAP_BASE,
            quality: GAP_QUALITY,
            unique_depth: GAP_UNIQUE_DEPTH,
            aligned_depth: GAP_DEPTH,
            total_depth: Some(GAP_DEPTH),
            signal: 0.0,
            stddev: 0.0,
            class: Class::Gap,
        }
    }

    /// Gets the one-based position.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::call::Record;
    ///
    /// let record = "734\tC\tC\t24\t1\t1\t1\t0.73\t0.73".parse::<Record>()?;
    /// assert_eq!(record.position(), 734);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn position(&self) -> Number {
        self.position
    }

    /// Gets the reference base, if the record carried one.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::call::Record;
    ///
    /// let record = "734\tG\tC\t24\t1\t1\t1\t0.73\t0.73".parse::<Record>()?;
    /// assert_eq!(record.reference_base(), Some('G'));
    ///
    /// let record = "734\tC\t24\t1\t1\t0.73\t0.73".parse::<Record>()?;
    /// assert_eq!(record.reference_base(), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn reference_base(&self) -> Option<char> {
        self.reference_base
    }

    /// Gets the consensus base.
    pub fn consensus_base(&self) -> char {
        self.consensus_base
    }

    /// Gets the quality score.
    pub fn quality(&self) -> u64 {
        self.quality
    }

    /// Gets the unique depth.
    pub fn unique_depth(&self) -> u64 {
        self.unique_depth
    }

    /// Gets the aligned depth.
    pub fn aligned_depth(&self) -> u64 {
        self.aligned_depth
    }

    /// Gets the total depth, if the record carried one.
    pub fn total_depth(&self) -> Option<u64> {
        self.total_depth
    }

    /// Gets the signal.
    pub fn signal(&self) -> f64 {
        self.signal
    }

    /// Gets the standard deviation of the signal.
    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// Gets the coverage class.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Returns whether the record is a placeholder for an unobserved position.
    pub fn is_gap(&self) -> bool {
        self.class == Class::Gap
    }
}

impl FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Record::parse(s, DEFAULT_LOW_COVERAGE_THRESHOLD)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.position)?;

        if let Some(base) = self.reference_base {
            write!(f, "{DELIMITER}{base}")?;
        }

        write!(
            f,
            "{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.consensus_base, self.quality, self.unique_depth, self.aligned_depth
        )?;

        if let Some(depth) = self.total_depth {
            write!(f, "{DELIMITER}{depth}")?;
        }

        write!(f, "{DELIMITER}{}{DELIMITER}{}", self.signal, self.stddev)
    }
}

/// Parses a field that must hold exactly one base.
fn parse_base(field: &str) -> Option<char> {
    let mut chars = field.chars();

    match (chars.next(), chars.next()) {
        (Some(base), None) => Some(base),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_field_record() {
        let record = "689\tA\tT\t18\t2\t12\t13\t1.16\t0.5".parse::<Record>().unwrap();

        assert_eq!(record.position(), 689);
        assert_eq!(record.reference_base(), Some('A'));
        assert_eq!(record.consensus_base(), 'T');
        assert_eq!(record.quality(), 18);
        assert_eq!(record.unique_depth(), 2);
        assert_eq!(record.aligned_depth(), 12);
        assert_eq!(record.total_depth(), Some(13));
        assert_eq!(record.signal(), 1.16);
        assert_eq!(record.stddev(), 0.5);
        assert_eq!(record.class(), Class::Normal);
    }

    #[test]
    fn seven_field_record() {
        let record = "12\t-\t30\t3\t3\t0.91\t0.2".parse::<Record>().unwrap();

        assert_eq!(record.position(), 12);
        assert_eq!(record.reference_base(), None);
        assert_eq!(record.consensus_base(), '-');
        assert_eq!(record.quality(), 30);
        assert_eq!(record.unique_depth(), 3);
        assert_eq!(record.aligned_depth(), 3);
        assert_eq!(record.total_depth(), None);
        assert_eq!(record.signal(), 0.91);
        assert_eq!(record.stddev(), 0.2);
        assert_eq!(record.class(), Class::LowCoverage);
    }

    #[test]
    fn classification_uses_the_threshold() {
        let line = "1\tA\tA\t18\t18\t18\t18\t1.0\t0.01";
        assert_eq!(Record::parse(line, 10).unwrap().class(), Class::Normal);
        assert_eq!(Record::parse(line, 19).unwrap().class(), Class::LowCoverage);

        let line = "1\tA\tA\t18\t18\t1\t1\t1.0\t0.01";
        assert_eq!(Record::parse(line, 10).unwrap().class(), Class::LowCoverage);
    }

    #[test]
    fn invalid_number_of_fields() {
        let err = "1\t2".parse::<Record>().unwrap_err();

        assert!(matches!(
            err,
            Error::Parse(ParseError::IncorrectNumberOfFields(2))
        ));
        assert_eq!(
            err.to_string(),
            "parse error: invalid number of fields in base call: expected 9 (with reference) \
             or 7 (without reference) fields, found 2 fields"
        );
    }

    #[test]
    fn invalid_position() {
        let err = "?\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidPosition(_))));
        assert_eq!(
            err.to_string(),
            "parse error: invalid position: invalid digit found in string"
        );
    }

    #[test]
    fn zero_position() {
        let err = "0\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::ZeroPosition));
    }

    #[test]
    fn invalid_bases() {
        let err = "1\tAC\tA\t18\t1\t1\t1\t1.16\t1.16".parse::<Record>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: invalid reference base: expected one character, found \"AC\""
        );

        let err = "1\tAC\t18\t1\t1\t1.16\t1.16".parse::<Record>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: invalid consensus base: expected one character, found \"AC\""
        );
    }

    #[test]
    fn invalid_numbers() {
        let err = "1\tA\tA\t1.5\t1\t1\t1\t1.16\t1.16".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidQuality(_))));

        let err = "1\tA\tA\t18\t?\t1\t1\t1.16\t1.16".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidUniqueDepth(_))));

        let err = "1\tA\tA\t18\t1\t?\t1\t1.16\t1.16".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidAlignedDepth(_))));

        let err = "1\tA\tA\t18\t1\t1\t?\t1.16\t1.16".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidTotalDepth(_))));

        let err = "1\tA\tA\t18\t1\t1\t1\tx\t1.16".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidSignal(_))));
        assert_eq!(
            err.to_string(),
            "parse error: invalid signal: invalid float literal"
        );

        let err = "1\tA\t18\t1\t1\t1.16\tx".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidStddev(_))));
    }

    #[test]
    fn gap_record() {
        let record = Record::gap(3);
        assert_eq!(record.to_string(), "3\t-\t-\t64\t1\t1000\t1000\t0\t0");
        assert!(record.is_gap());
    }

    #[test]
    fn display() {
        let record = "689\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse::<Record>().unwrap();
        assert_eq!(record.to_string(), "689\tA\tA\t18\t1\t1\t1\t1.16\t1.16");

        let record = "12\t-\t30\t3\t3\t0.91\t0.2".parse::<Record>().unwrap();
        assert_eq!(record.to_string(), "12\t-\t30\t3\t3\t0.91\t0.2");
    }
}
