//! A named block of base calls.

use omics::coordinate::position::Number;

use crate::coverage::Region;

pub mod builder;
pub mod blocks;
pub mod call;
pub mod header;

pub use blocks::Blocks;
pub use builder::Builder;

/// An alignment block: the base calls following one header line, along with
/// the coverage regions derived from them.
///
/// Every position from `1` through [`Block::last_position()`] is represented
/// in the base calls, either by an observed call or by a gap placeholder, and
/// the regions partition that same span.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// The header record.
    header: header::Record,

    /// The base calls.
    calls: Vec<call::Record>,

    /// The coverage regions.
    regions: Vec<Region>,
}

impl Block {
    /// Gets the header record for the [`Block`] by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::header::Record;
    ///
    /// let data = b">seq0\t2\n2\tA\tA\t18\t1\t1\t1\t1.16\t1.16";
    /// let mut reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let mut blocks = reader.blocks().collect::<Vec<_>>();
    /// assert_eq!(blocks.len(), 1);
    ///
    /// // SAFETY: we just checked that the length was one.
    /// let block = blocks.pop().unwrap()?;
    /// assert_eq!(block.header(), &Record::try_new("seq0", 2)?);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn header(&self) -> &header::Record {
        &self.header
    }

    /// Gets the name of the reference or contig.
    pub fn name(&self) -> &str {
        self.header.name()
    }

    /// Gets the position of the first observed base call.
    pub fn alignment_start(&self) -> Number {
        self.header.alignment_start()
    }

    /// Gets the base calls for the [`Block`] by reference.
    ///
    /// Positions before the alignment start and positions skipped within the
    /// block are filled with [gap calls](call::Record::gap).
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::coverage::Class;
    ///
    /// let data = b">seq0\t2\n2\tA\tA\t18\t1\t1\t1\t1.16\t1.16";
    /// let mut reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let mut blocks = reader.blocks().collect::<Vec<_>>();
    ///
    /// // SAFETY: there is exactly one block in the data above.
    /// let block = blocks.pop().unwrap()?;
    /// let classes = block
    ///     .calls()
    ///     .iter()
    ///     .map(|call| call.class())
    ///     .collect::<Vec<_>>();
    /// assert_eq!(classes, vec![Class::Gap, Class::LowCoverage]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn calls(&self) -> &[call::Record] {
        &self.calls
    }

    /// Gets the coverage regions for the [`Block`] by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::coverage::Class;
    /// use alignmentinfo::coverage::Region;
    ///
    /// let data = b">seq0\t2\n2\tA\tA\t18\t1\t1\t1\t1.16\t1.16";
    /// let mut reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let mut blocks = reader.blocks().collect::<Vec<_>>();
    ///
    /// // SAFETY: there is exactly one block in the data above.
    /// let block = blocks.pop().unwrap()?;
    /// assert_eq!(
    ///     block.regions(),
    ///     &[
    ///         Region::try_new(1, 1, Class::Gap)?,
    ///         Region::try_new(2, 2, Class::LowCoverage)?
    ///     ]
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Gets the last position represented in the block, if any.
    pub fn last_position(&self) -> Option<Number> {
        self.regions.last().map(|region| region.end())
    }
}
