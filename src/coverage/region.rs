//! Closed, one-based regions of a single coverage class.

use std::cmp::Ordering;

use omics::coordinate::position::Number;

use crate::coverage::Class;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a [`Region`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The bounds of a region were invalid. Regions are one-based and must
    /// satisfy `start <= end`.
    InvalidBounds(Number, Number),

    /// Two regions that neither touch nor overlap were merged.
    NotIntersecting(Region, Region),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidBounds(start, end) => write!(
                f,
                "invalid region bounds: expected 1 <= start <= end, found start {start} and \
                 end {end}"
            ),
            Error::NotIntersecting(left, right) => write!(
                f,
                "invalid region operation: regions do not intersect or touch: {left} and {right}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Merged
////////////////////////////////////////////////////////////////////////////////////////

/// The outcome of merging two regions, in positional order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Merged {
    /// The regions collapsed into (or were absorbed by) a single region.
    One(Region),

    /// The regions were left side by side, possibly with an adjusted
    /// boundary.
    Two(Region, Region),

    /// A region of higher precedence split the region containing it.
    Three(Region, Region, Region),
}

impl Merged {
    /// Gets the number of regions in the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::coverage::Class;
    /// use alignmentinfo::coverage::Region;
    ///
    /// let a = Region::try_new(1, 7, Class::Gap)?;
    /// let b = Region::try_new(2, 5, Class::LowCoverage)?;
    /// assert_eq!(a.merge(&b)?.len(), 3);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Merged::One(_) => 1,
            Merged::Two(..) => 2,
            Merged::Three(..) => 3,
        }
    }

    /// Gets the last region in positional order.
    pub fn last(&self) -> &Region {
        match self {
            Merged::One(last) | Merged::Two(_, last) | Merged::Three(_, _, last) => last,
        }
    }

    /// Consumes `self` and splits off the last region from the ones before
    /// it.
    pub fn split_last(self) -> (Vec<Region>, Region) {
        match self {
            Merged::One(a) => (Vec::new(), a),
            Merged::Two(a, b) => (vec![a], b),
            Merged::Three(a, b, c) => (vec![a, b], c),
        }
    }

    /// Consumes `self` and returns the regions in positional order.
    pub fn into_vec(self) -> Vec<Region> {
        let (mut regions, last) = self.split_last();
        regions.push(last);
        regions
    }
}

impl IntoIterator for Merged {
    type Item = Region;
    type IntoIter = std::vec::IntoIter<Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Region
////////////////////////////////////////////////////////////////////////////////////////

/// A closed, one-based region `[start, end]` of a single coverage class.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Region {
    /// The first position of the region.
    start: Number,

    /// The last position of the region.
    end: Number,

    /// The coverage class.
    class: Class,
}

impl Region {
    /// Attempts to create a new [`Region`].
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::coverage::Class;
    /// use alignmentinfo::coverage::Region;
    ///
    /// let region = Region::try_new(1, 3, Class::Gap)?;
    /// assert_eq!(region.start(), 1);
    /// assert_eq!(region.end(), 3);
    /// assert_eq!(region.class(), Class::Gap);
    ///
    /// assert!(Region::try_new(0, 3, Class::Gap).is_err());
    /// assert!(Region::try_new(4, 3, Class::Gap).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(start: Number, end: Number, class: Class) -> Result<Self> {
        if start == 0 || start > end {
            return Err(Error::InvalidBounds(start, end));
        }

        Ok(Self { start, end, class })
    }

    /// Gets the first position of the region.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the last position of the region.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the coverage class of the region.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Gets the number of positions covered by the region.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::coverage::Class;
    /// use alignmentinfo::coverage::Region;
    ///
    /// assert_eq!(Region::try_new(4, 4, Class::Normal)?.len(), 1);
    /// assert_eq!(Region::try_new(2, 11, Class::Normal)?.len(), 10);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Number {
        self.end - self.start + 1
    }

    /// Returns whether `position` falls within the region.
    pub fn contains(&self, position: Number) -> bool {
        self.start <= position && position <= self.end
    }

    /// Compares two regions by position: first by start and then by end.
    ///
    /// The class is not consulted, so regions with identical bounds but
    /// different classes compare as [`Ordering::Equal`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    ///
    /// use alignmentinfo::coverage::Class;
    /// use alignmentinfo::coverage::Region;
    ///
    /// let a = Region::try_new(1, 2, Class::Normal)?;
    /// let b = Region::try_new(1, 3, Class::Gap)?;
    /// let c = Region::try_new(1, 2, Class::Gap)?;
    ///
    /// assert_eq!(a.cmp_position(&b), Ordering::Less);
    /// assert_eq!(b.cmp_position(&a), Ordering::Greater);
    /// assert_eq!(a.cmp_position(&c), Ordering::Equal);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn cmp_position(&self, other: &Region) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }

    /// Merges two regions that touch or overlap.
    ///
    /// Overlapping positions go to the region of higher
    /// [precedence](Class::precedence). Regions of the same class that overlap
    /// coalesce into one region, while regions that are merely adjacent are
    /// returned unchanged. Any region that would be left with no positions is
    /// dropped from the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::coverage::Class;
    /// use alignmentinfo::coverage::Region;
    /// use alignmentinfo::coverage::region::Merged;
    ///
    /// let a = Region::try_new(1, 5, Class::Gap)?;
    /// let b = Region::try_new(3, 7, Class::LowCoverage)?;
    ///
    /// assert_eq!(
    ///     a.merge(&b)?,
    ///     Merged::Two(
    ///         Region::try_new(1, 2, Class::Gap)?,
    ///         Region::try_new(3, 7, Class::LowCoverage)?
    ///     )
    /// );
    ///
    /// let c = Region::try_new(9, 10, Class::Gap)?;
    /// assert!(a.merge(&c).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn merge(&self, other: &Region) -> Result<Merged> {
        let (mut left, mut right) = match other.cmp_position(self) {
            Ordering::Less => (other.clone(), self.clone()),
            _ => (self.clone(), other.clone()),
        };

        // `right.start` is at least one, so neither side can overflow.
        if right.start - 1 > left.end {
            return Err(Error::NotIntersecting(left, right));
        }

        if right.start - 1 == left.end {
            return Ok(Merged::Two(left, right));
        }

        if left.end < right.end {
            if left.class == right.class {
                return Ok(Merged::One(Region {
                    start: left.start,
                    end: right.end,
                    class: left.class,
                }));
            }

            if left.class.cmp_precedence(&right.class) == Ordering::Less {
                // The two share a start, so nothing of `left` survives.
                if left.start == right.start {
                    return Ok(Merged::One(right));
                }

                left.end = right.start - 1;
            } else {
                right.start = left.end + 1;
            }

            return Ok(Merged::Two(left, right));
        }

        // `right` lies entirely within `left`.
        if left.class.cmp_precedence(&right.class) != Ordering::Less {
            return Ok(Merged::One(left));
        }

        let head = (left.start < right.start).then(|| Region {
            start: left.start,
            end: right.start - 1,
            class: left.class,
        });

        let tail = (right.end < left.end).then(|| Region {
            start: right.end + 1,
            end: left.end,
            class: left.class,
        });

        Ok(match (head, tail) {
            (Some(head), Some(tail)) => Merged::Three(head, right, tail),
            (Some(head), None) => Merged::Two(head, right),
            (None, Some(tail)) => Merged::Two(right, tail),
            (None, None) => Merged::One(right),
        })
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.start, self.end, self.class)
    }
}
