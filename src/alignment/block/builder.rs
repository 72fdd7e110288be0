//! A builder for an alignment block.

use omics::coordinate::position::Number;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::alignment::Block;
use crate::alignment::block::call;
use crate::alignment::block::header;
use crate::coverage::Class;
use crate::coverage::Region;
use crate::coverage::region;

/// The longest run of unobserved positions that is filled with gap calls.
///
/// Every filled position is stored as a base call, so a run past this length
/// (from a far-off alignment start or base call position) is rejected rather
/// than allocated.
pub const MAX_GAP_LENGTH: Number = 1 << 24;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No header was provided to the [`Builder`].
    Header,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Header => write!(f, "header"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug)]
pub enum MultipleError {
    /// The header field was provided multiple times to the [`Builder`].
    Header,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Header => write!(f, "header"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),

    /// A base call did not move forward from the previous position (and was
    /// not a repeat of the previous observed position).
    PositionOutOfOrder {
        /// The last position represented in the block.
        previous: Number,

        /// The position of the offending base call.
        found: Number,
    },

    /// A run of unobserved positions was longer than [`MAX_GAP_LENGTH`].
    GapTooLong {
        /// The first unobserved position.
        start: Number,

        /// The last unobserved position.
        end: Number,
    },

    /// A region could not be closed.
    Region(region::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
            Error::PositionOutOfOrder { previous, found } => write!(
                f,
                "base call at position {found} does not follow position {previous}"
            ),
            Error::GapTooLong { start, end } => write!(
                f,
                "gap from position {start} through {end} exceeds the limit of \
                 {MAX_GAP_LENGTH} positions"
            ),
            Error::Region(err) => write!(f, "region error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Block`].
///
/// Regions are accumulated while base calls are pushed: a region stays open
/// for as long as consecutive calls share its class, and any positions that
/// were skipped are filled with gap calls and a gap region.
#[derive(Debug, Default)]
pub struct Builder {
    /// The header record.
    header: Option<header::Record>,

    /// The base calls.
    calls: Vec<call::Record>,

    /// The closed regions.
    regions: Vec<Region>,

    /// The start and class of the region that is still open.
    open: Option<(Number, Class)>,

    /// The last position represented in the base calls.
    last_position: Number,
}

impl Builder {
    /// Sets the header record for the [`Builder`].
    ///
    /// When the alignment starts after the first position, the positions
    /// leading up to it are filled in as gaps.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::Builder;
    /// use alignmentinfo::alignment::block::header::Record;
    ///
    /// let header = ">seq0\t1".parse::<Record>()?;
    /// let builder = Builder::default().header(header)?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn header(mut self, record: header::Record) -> Result<Self> {
        if self.header.is_some() {
            return Err(Error::Multiple(MultipleError::Header));
        }

        let start = record.alignment_start();
        check_gap(1, start - 1)?;

        if start > 1 {
            trace!(
                "{}: filling positions 1 through {} as a leading gap",
                record.name(),
                start - 1
            );

            self.calls.extend((1..start).map(call::Record::gap));
            self.open = Some((1, Class::Gap));
        }

        self.last_position = start - 1;
        self.header = Some(record);
        Ok(self)
    }

    /// Pushes a [base call](call::Record) into the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::Builder;
    ///
    /// let builder = Builder::default()
    ///     .header(">seq0\t1".parse()?)?
    ///     .push_call("1\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn push_call(mut self, record: call::Record) -> Result<Self> {
        let name = match self.header {
            Some(ref header) => header.name(),
            None => return Err(Error::Missing(MissingError::Header)),
        };

        let position = record.position();

        // A repeat of the last observed position (an insertion or a
        // homopolymer) extends the open region as is.
        let repeated = position == self.last_position
            && matches!(self.calls.last(), Some(last) if !last.is_gap());

        if repeated {
            if let Some((_, class)) = self.open {
                if class != record.class() {
                    warn!(
                        "{name}: repeated call at position {position} is {} but the open region \
                         is {class}; keeping {class}",
                        record.class()
                    );
                }
            }

            self.calls.push(record);
            return Ok(self);
        }

        if position <= self.last_position {
            return Err(Error::PositionOutOfOrder {
                previous: self.last_position,
                found: position,
            });
        }

        if position > self.last_position + 1 {
            let gap_start = self.last_position + 1;
            check_gap(gap_start, position - 1)?;

            trace!(
                "{name}: filling positions {gap_start} through {} as a gap",
                position - 1
            );

            if !matches!(self.open, Some((_, Class::Gap))) {
                self.close(self.last_position)?;
                self.open = Some((gap_start, Class::Gap));
            }

            self.calls.extend((gap_start..position).map(call::Record::gap));
            self.last_position = position - 1;
        }

        if self.open.map(|(_, class)| class) != Some(record.class()) {
            self.close(self.last_position)?;
            self.open = Some((position, record.class()));
        }

        self.last_position = position;
        self.calls.push(record);
        Ok(self)
    }

    /// Consumes `self` to attempt to build a [`Block`].
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::alignment::block::Builder;
    /// use alignmentinfo::coverage::Class;
    ///
    /// let block = Builder::default()
    ///     .header(">seq0\t1".parse()?)?
    ///     .push_call("1\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)?
    ///     .push_call("3\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)?
    ///     .try_build()?;
    ///
    /// assert_eq!(block.name(), "seq0");
    /// assert_eq!(block.calls().len(), 3);
    /// assert_eq!(block.regions().len(), 3);
    /// assert_eq!(block.regions()[1].class(), Class::Gap);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(mut self) -> Result<Block> {
        let header = self
            .header
            .take()
            .ok_or(Error::Missing(MissingError::Header))?;

        self.close(self.last_position)?;

        debug!(
            "{}: built block with {} base calls and {} regions",
            header.name(),
            self.calls.len(),
            self.regions.len()
        );

        Ok(Block {
            header,
            calls: self.calls,
            regions: self.regions,
        })
    }

    /// Closes the open region (if there is one) at `end`.
    fn close(&mut self, end: Number) -> Result<()> {
        if let Some((start, class)) = self.open.take() {
            let region = Region::try_new(start, end, class).map_err(Error::Region)?;
            self.regions.push(region);
        }

        Ok(())
    }
}

/// Ensures the run of unobserved positions `[start, end]` may be filled.
fn check_gap(start: Number, end: Number) -> Result<()> {
    if end >= start && end - start >= MAX_GAP_LENGTH {
        return Err(Error::GapTooLong { start, end });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_fails_to_produce_a_block_when_no_header_is_provided() {
        let err = Builder::default().try_build().unwrap_err();
        assert_eq!(err.to_string(), "missing required field: header");

        let err = Builder::default()
            .push_call("1\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse().unwrap())
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required field: header");
    }

    #[test]
    fn it_fails_to_produce_a_block_when_the_header_field_is_provided_more_than_once()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header(">seq0\t1".parse()?)?
            .header(">seq0\t1".parse()?)
            .unwrap_err();

        assert_eq!(err.to_string(), "singular field set multiple times: header");

        Ok(())
    }

    #[test]
    fn it_fails_when_positions_go_backwards() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let err = Builder::default()
            .header(">seq0\t1".parse()?)?
            .push_call("3\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)?
            .push_call("2\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::PositionOutOfOrder {
                previous: 3,
                found: 2
            }
        ));
        assert_eq!(
            err.to_string(),
            "base call at position 2 does not follow position 3"
        );

        Ok(())
    }

    #[test]
    fn it_fails_when_a_call_precedes_the_alignment_start()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header(">seq0\t5".parse()?)?
            .push_call("4\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::PositionOutOfOrder {
                previous: 4,
                found: 4
            }
        ));

        Ok(())
    }

    #[test]
    fn a_header_without_calls() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let block = Builder::default().header(">seq0\t4".parse()?)?.try_build()?;

        assert_eq!(block.calls().len(), 3);
        assert!(block.calls().iter().all(|call| call.is_gap()));
        assert_eq!(block.regions(), &[Region::try_new(1, 3, Class::Gap)?]);

        let block = Builder::default().header(">seq0\t1".parse()?)?.try_build()?;
        assert!(block.calls().is_empty());
        assert!(block.regions().is_empty());

        Ok(())
    }

    #[test]
    fn a_gap_after_the_leading_gap_is_coalesced()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let block = Builder::default()
            .header(">seq0\t3".parse()?)?
            .push_call("6\tA\tA\t18\t1\t12\t12\t1.16\t1.16".parse()?)?
            .try_build()?;

        assert_eq!(block.calls().len(), 6);
        assert_eq!(
            block.regions(),
            &[
                Region::try_new(1, 5, Class::Gap)?,
                Region::try_new(6, 6, Class::Normal)?
            ]
        );

        Ok(())
    }

    #[test]
    fn a_gap_before_a_low_coverage_run() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let block = Builder::default()
            .header(">seq0\t1".parse()?)?
            .push_call("1\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)?
            .push_call("2\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)?
            .push_call("4\tA\tA\t18\t1\t12\t12\t1.16\t1.16".parse()?)?
            .try_build()?;

        assert_eq!(
            block.regions(),
            &[
                Region::try_new(1, 2, Class::LowCoverage)?,
                Region::try_new(3, 3, Class::Gap)?,
                Region::try_new(4, 4, Class::Normal)?
            ]
        );

        Ok(())
    }

    #[test]
    fn it_fails_when_a_gap_is_too_long() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header(">seq0\t4000000000".parse()?)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::GapTooLong {
                start: 1,
                end: 3999999999
            }
        ));

        let err = Builder::default()
            .header(">seq0\t1".parse()?)?
            .push_call("1\tA\tA\t18\t1\t12\t12\t1.16\t1.16".parse()?)?
            .push_call("4000000000\tA\tA\t18\t1\t12\t12\t1.16\t1.16".parse()?)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "gap from position 2 through 3999999999 exceeds the limit of 16777216 positions"
        );

        Ok(())
    }

    #[test]
    fn gap_lengths_up_to_the_limit_are_filled() {
        assert!(check_gap(1, 0).is_ok());
        assert!(check_gap(2, MAX_GAP_LENGTH + 1).is_ok());
        assert!(matches!(
            check_gap(2, MAX_GAP_LENGTH + 2),
            Err(Error::GapTooLong { start: 2, .. })
        ));
    }

    #[test]
    fn a_repeated_position_extends_the_open_region()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let block = Builder::default()
            .header(">seq0\t1".parse()?)?
            .push_call("1\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)?
            .push_call("1\tA\tA\t18\t1\t12\t12\t1.16\t1.16".parse()?)?
            .push_call("2\tA\tA\t18\t1\t1\t1\t1.16\t1.16".parse()?)?
            .try_build()?;

        assert_eq!(block.calls().len(), 3);
        assert_eq!(
            block.regions(),
            &[Region::try_new(1, 2, Class::LowCoverage)?]
        );

        Ok(())
    }
}
