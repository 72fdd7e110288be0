//! A whole alignment info file.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use nonempty::NonEmpty;

use crate::Reader;
use crate::alignment::Block;
use crate::alignment::block::blocks;
use crate::coverage::Region;
use crate::coverage::partition;
use crate::coverage::region;

/// The file extension that marks gzip-compressed input.
const GZIP_EXTENSION: &str = "gz";

/// An error related to a [`Document`].
#[derive(Debug)]
pub enum Error {
    /// The file could not be opened.
    Open(PathBuf, io::Error),

    /// An alignment block could not be read.
    Blocks(blocks::Error),

    /// The regions collected for one name could not be merged.
    Merge {
        /// The name whose regions failed to merge.
        name: String,

        /// The underlying region error.
        source: region::Error,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Open(path, err) => write!(f, "unable to open {}: {err}", path.display()),
            Error::Blocks(err) => write!(f, "{err}"),
            Error::Merge { name, source } => {
                write!(f, "unable to merge regions for {name}: {source}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The merged regions of every name in a [`Document`], in the order the
/// names were first seen.
pub type MergedRegions = Vec<(String, Vec<Region>)>;

/// A parsed alignment info file.
///
/// Blocks are kept in the order they appear. A name may head more than one
/// block, and each such block is retained separately until the regions are
/// merged.
#[derive(Clone, Debug, Default)]
pub struct Document {
    /// The blocks, in file order.
    blocks: Vec<Block>,

    /// The distinct names, in the order they were first seen.
    names: Vec<String>,

    /// The indices into `blocks` for each name.
    by_name: HashMap<String, NonEmpty<usize>>,
}

impl Document {
    /// Reads every block from `reader`.
    ///
    /// The first malformed line aborts the whole read.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b">seq0\t1\n1\tA\t30\t12\t12\t1.0\t0.1\n>seq1\t1\n1\tA\t30\t2\t2\t1.0\t0.1\n";
    /// let reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let document = alignmentinfo::Document::read(reader)?;
    /// assert_eq!(document.blocks().len(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read<T>(mut reader: Reader<T>) -> Result<Self>
    where
        T: BufRead,
    {
        let mut document = Self::default();

        for result in reader.blocks() {
            let block = result.map_err(Error::Blocks)?;
            document.push(block);
        }

        Ok(document)
    }

    /// Opens and reads the file at `path`, decompressing it first when its
    /// extension is `.gz`.
    pub fn from_path(path: impl AsRef<Path>, low_coverage_threshold: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::Open(path.to_path_buf(), err))?;

        let inner: Box<dyn BufRead> =
            if path.extension().and_then(|ext| ext.to_str()) == Some(GZIP_EXTENSION) {
                Box::new(BufReader::new(GzDecoder::new(file)))
            } else {
                Box::new(BufReader::new(file))
            };

        let reader = Reader::new(inner)
            .with_source(path.display().to_string())
            .with_low_coverage_threshold(low_coverage_threshold);

        Self::read(reader)
    }

    /// Gets the blocks, in file order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Gets the distinct names, in the order they were first seen.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b">seq1\t1\n>seq0\t1\n>seq1\t1\n";
    /// let reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let document = alignmentinfo::Document::read(reader)?;
    /// assert_eq!(document.names().collect::<Vec<_>>(), vec!["seq1", "seq0"]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| name.as_str())
    }

    /// Gets the blocks headed by `name`, in file order.
    pub fn blocks_for<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Block>> {
        let indices = self.by_name.get(name)?;
        Some(indices.iter().map(|i| &self.blocks[*i]))
    }

    /// Merges the regions of every block that shares a name into one list
    /// per name, ordered by start.
    ///
    /// The merge is the pairwise reduction of [`partition::merge()`]. A region
    /// emitted early is not revisited, so when several blocks share a name it
    /// may still overlap a later one.
    ///
    /// Names are merged in the order they were first seen, and the first
    /// name that fails to merge fails the whole operation. The document is
    /// left untouched, so calling this again produces the same result.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignmentinfo::coverage::Class;
    /// use alignmentinfo::coverage::Region;
    ///
    /// let data = b">seq0\t1\n1\tA\t30\t2\t2\t1.0\t0.1\n>seq0\t2\n2\tA\t30\t12\t12\t1.0\t0.1\n";
    /// let reader = alignmentinfo::Reader::new(&data[..]);
    ///
    /// let document = alignmentinfo::Document::read(reader)?;
    /// let merged = document.merge_regions()?;
    ///
    /// assert_eq!(merged.len(), 1);
    /// assert_eq!(merged[0].0, "seq0");
    /// assert_eq!(
    ///     merged[0].1,
    ///     vec![
    ///         Region::try_new(1, 1, Class::LowCoverage)?,
    ///         Region::try_new(2, 2, Class::Normal)?,
    ///     ]
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn merge_regions(&self) -> Result<MergedRegions> {
        self.names
            .iter()
            .map(|name| {
                let regions = self.merge(name)?;
                Ok((name.clone(), regions))
            })
            .collect()
    }

    /// Merges the regions of the blocks headed by `name`.
    ///
    /// Returns [`None`] if no block carries that name.
    pub fn merge_regions_for(&self, name: &str) -> Option<Result<Vec<Region>>> {
        if !self.by_name.contains_key(name) {
            return None;
        }

        Some(self.merge(name))
    }

    /// Adds a block, recording its index under its name.
    fn push(&mut self, block: Block) {
        let index = self.blocks.len();

        match self.by_name.get_mut(block.name()) {
            Some(indices) => indices.push(index),
            None => {
                self.names.push(block.name().to_string());
                self.by_name
                    .insert(block.name().to_string(), NonEmpty::new(index));
            }
        }

        self.blocks.push(block);
    }

    /// Merges the regions of every block headed by `name`.
    fn merge(&self, name: &str) -> Result<Vec<Region>> {
        let regions = self
            .blocks_for(name)
            .into_iter()
            .flatten()
            .flat_map(|block| block.regions().iter().cloned())
            .collect::<Vec<_>>();

        partition::merge(regions).map_err(|source| Error::Merge {
            name: name.to_string(),
            source,
        })
    }
}
