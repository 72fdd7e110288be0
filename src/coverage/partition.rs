//! Reducing overlapping region lists into a single ordered list.

use crate::coverage::Region;
use crate::coverage::region;

/// Merges a list of regions into a list of regions ordered by start.
///
/// The regions are sorted by position and then merged pairwise from left to
/// right. Everything but the last region of each pairwise merge is final, and
/// the last region is carried forward into the next merge. The sort is stable,
/// so regions with identical bounds keep their original relative order.
///
/// Only neighbours in the sorted list are ever compared. A list that is
/// already a partition comes back unchanged, but a region that was already
/// emitted is never revisited, so overlapping inputs can leave overlaps in
/// the result.
///
/// # Examples
///
/// ```
/// use alignmentinfo::coverage::Class;
/// use alignmentinfo::coverage::Region;
/// use alignmentinfo::coverage::partition;
///
/// let regions = vec![
///     Region::try_new(1, 3, Class::LowCoverage)?,
///     Region::try_new(4, 9, Class::Gap)?,
///     Region::try_new(1, 5, Class::Gap)?,
///     Region::try_new(6, 9, Class::Normal)?,
/// ];
///
/// assert_eq!(
///     partition::merge(regions)?,
///     vec![
///         Region::try_new(1, 3, Class::LowCoverage)?,
///         Region::try_new(4, 5, Class::Gap)?,
///         Region::try_new(6, 9, Class::Normal)?,
///     ]
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn merge(mut regions: Vec<Region>) -> Result<Vec<Region>, region::Error> {
    regions.sort_by(Region::cmp_position);

    let mut regions = regions.into_iter();

    let mut carried = match regions.next() {
        Some(region) => region,
        None => return Ok(Vec::new()),
    };

    let mut merged = Vec::with_capacity(regions.len() + 1);

    for next in regions {
        let (done, last) = carried.merge(&next)?.split_last();
        merged.extend(done);
        carried = last;
    }

    merged.push(carried);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use omics::coordinate::position::Number;

    use super::*;
    use crate::coverage::Class;

    fn region(start: Number, end: Number, class: Class) -> Region {
        Region::try_new(start, end, class).unwrap()
    }

    #[test]
    fn empty_and_single() {
        assert!(merge(Vec::new()).unwrap().is_empty());

        let single = vec![region(1, 4, Class::Normal)];
        assert_eq!(merge(single.clone()).unwrap(), single);
    }

    #[test]
    fn a_partition_merged_with_itself_is_unchanged() {
        let partition = vec![
            region(1, 4, Class::Gap),
            region(5, 9, Class::LowCoverage),
            region(10, 20, Class::Normal),
            region(21, 22, Class::Gap),
        ];

        let mut doubled = partition.clone();
        doubled.extend(partition.clone());

        assert_eq!(merge(doubled).unwrap(), partition);
        assert_eq!(merge(partition.clone()).unwrap(), partition);
    }

    #[test]
    fn two_passes_over_one_reference() {
        // The first pass only covers the start of the reference and the
        // second pass only covers the end.
        let regions = vec![
            region(1, 134, Class::LowCoverage),
            region(135, 2333, Class::Gap),
            region(1, 2106, Class::Gap),
            region(2107, 2134, Class::LowCoverage),
            region(2135, 2333, Class::Normal),
        ];

        assert_eq!(
            merge(regions).unwrap(),
            vec![
                region(1, 134, Class::LowCoverage),
                region(135, 2106, Class::Gap),
                region(2107, 2134, Class::LowCoverage),
                region(2135, 2333, Class::Normal),
            ]
        );
    }

    #[test]
    fn emitted_regions_are_not_revisited() {
        // The first split emits `3,4,Normal` and carries `5,10,Gap`, which
        // then only trims its own start against `3,8,LowCoverage`.
        let regions = vec![
            region(1, 10, Class::Gap),
            region(3, 8, Class::LowCoverage),
            region(3, 4, Class::Normal),
        ];

        assert_eq!(
            merge(regions).unwrap(),
            vec![
                region(1, 2, Class::Gap),
                region(3, 4, Class::Normal),
                region(3, 8, Class::LowCoverage),
                region(9, 10, Class::Gap),
            ]
        );
    }

    #[test]
    fn a_gap_between_regions_fails() {
        let regions = vec![region(1, 2, Class::Normal), region(5, 7, Class::Normal)];
        let err = merge(regions).unwrap_err();
        assert!(matches!(err, region::Error::NotIntersecting(_, _)));
    }
}
