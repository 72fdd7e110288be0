//! A lookup of coverage classes by reference name and position.

use std::collections::HashMap;

use omics::coordinate::position::Number;
use rust_lapper as lapper;

use crate::Document;
use crate::coverage::Class;
use crate::coverage::Region;
use crate::document;

/// The inner value of the coverage lookup data structure.
///
/// Lapper intervals are half-open, so a region `[start, end]` is stored as
/// `[start, end + 1)`. The exclusive end saturates, which leaves
/// `Number::MAX` itself outside of every interval.
type Iv = lapper::Interval<Number, Region>;

/// An error related to building a [`Lookup`].
#[derive(Debug)]
pub enum Error {
    /// The regions of the document could not be merged.
    Merge(document::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Merge(err) => write!(f, "merge error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A lookup from a reference name and a position to the merged coverage
/// regions of a [`Document`].
#[derive(Debug)]
pub struct Lookup {
    /// The interval tree of merged regions for each name.
    inner: HashMap<String, lapper::Lapper<Number, Region>>,
}

impl Lookup {
    /// Builds a [`Lookup`] from the merged regions of `document`.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::coverage::Class;
    /// use alignmentinfo::coverage::Lookup;
    ///
    /// let data = b">seq0\t2\n2\tA\t30\t12\t12\t1.0\t0.1\n3\tA\t30\t2\t2\t1.0\t0.1\n";
    /// let document = alignmentinfo::Document::read(alignmentinfo::Reader::new(&data[..]))?;
    ///
    /// let lookup = Lookup::try_from_document(&document)?;
    /// assert_eq!(lookup.class_at("seq0", 1), Some(Class::Gap));
    /// assert_eq!(lookup.class_at("seq0", 2), Some(Class::Normal));
    /// assert_eq!(lookup.class_at("seq0", 3), Some(Class::LowCoverage));
    /// assert_eq!(lookup.class_at("seq0", 4), None);
    /// assert_eq!(lookup.class_at("seq1", 1), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_from_document(document: &Document) -> Result<Self, Error> {
        let mut inner = HashMap::new();

        for (name, regions) in document.merge_regions().map_err(Error::Merge)? {
            let intervals = regions
                .into_iter()
                .map(|region| Iv {
                    start: region.start(),
                    stop: region.end().saturating_add(1),
                    val: region,
                })
                .collect::<Vec<_>>();

            inner.insert(name, lapper::Lapper::new(intervals));
        }

        Ok(Self { inner })
    }

    /// Gets the class of the region covering `position` within `name`.
    ///
    /// If merged regions overlap at `position`, the class of whichever one
    /// the tree reports first is returned. Use [`Lookup::find()`] to see all
    /// of them.
    ///
    /// Returns [`None`] if the name is unknown or the position lies past the
    /// last region (`Number::MAX` is never covered).
    pub fn class_at(&self, name: &str, position: Number) -> Option<Class> {
        self.inner
            .get(name)?
            .find(position, position.saturating_add(1))
            .map(|iv| iv.val.class())
            .next()
    }

    /// Finds the regions of `name` that overlap the closed range `[start,
    /// end]`, ordered by position.
    ///
    /// Returns [`None`] if the name is unknown or nothing overlaps.
    pub fn find(&self, name: &str, start: Number, end: Number) -> Option<Vec<Region>> {
        let mut results = self
            .inner
            .get(name)?
            .find(start, end.saturating_add(1))
            .map(|iv| iv.val.clone())
            .collect::<Vec<_>>();

        results.sort_by(Region::cmp_position);

        match results.is_empty() {
            true => None,
            false => Some(results),
        }
    }
}
