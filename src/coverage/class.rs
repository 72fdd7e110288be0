//! The coverage class of a base or a region.

use std::cmp::Ordering;
use std::str::FromStr;

/// An error related to parsing a [`Class`].
#[derive(Debug)]
pub enum ParseError {
    /// An unknown coverage class name.
    Unknown(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Unknown(name) => write!(
                f,
                "unknown coverage class: expected \"Gap\", \"LowCoverage\", or \"Normal\", found \
                 \"{name}\""
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// The coverage class of a base or a region.
///
/// Positional ordering of regions never consults the class. When two regions
/// compete for the same positions, the one with the higher
/// [precedence](Class::precedence) keeps them.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    /// No base was observed at the position.
    Gap,

    /// The aligned depth fell below the low coverage threshold.
    LowCoverage,

    /// The aligned depth met the low coverage threshold.
    Normal,
}

impl Class {
    /// Gets the precedence value of the class.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::coverage::Class;
    ///
    /// assert_eq!(Class::Gap.precedence(), -1);
    /// assert_eq!(Class::LowCoverage.precedence(), 0);
    /// assert_eq!(Class::Normal.precedence(), 1);
    /// ```
    pub fn precedence(&self) -> i8 {
        match self {
            Class::Gap => -1,
            Class::LowCoverage => 0,
            Class::Normal => 1,
        }
    }

    /// Compares two classes by precedence.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    ///
    /// use alignmentinfo::coverage::Class;
    ///
    /// assert_eq!(Class::Gap.cmp_precedence(&Class::Normal), Ordering::Less);
    /// assert_eq!(
    ///     Class::LowCoverage.cmp_precedence(&Class::LowCoverage),
    ///     Ordering::Equal
    /// );
    /// ```
    pub fn cmp_precedence(&self, other: &Class) -> Ordering {
        self.precedence().cmp(&other.precedence())
    }

    /// Gets the name of the class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Class::Gap => "Gap",
            Class::LowCoverage => "LowCoverage",
            Class::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Class {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Gap" => Ok(Class::Gap),
            "LowCoverage" => Ok(Class::LowCoverage),
            "Normal" => Ok(Class::Normal),
            _ => Err(ParseError::Unknown(s.into())),
        }
    }
}
