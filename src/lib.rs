//! `alignmentinfo` is a crate for reading per-base alignment listings (the
//! `454AlignmentInfo.tsv` layout) and summarizing them as coverage regions.
//!
//! An alignment info file is a series of blocks. Each block opens with a
//! header line (`>NAME<TAB>START`) and is followed by one line per called
//! base, giving its position, the consensus base, a quality score, and the
//! unique, aligned and (optionally) total read depths. The same reference name
//! may head several blocks in a single file.
//!
//! The crate provides three main points of entry:
//!
//! - Parsing and reading the blocks of a file directly.
//! - Merging the coverage regions of every block that shares a name.
//! - Looking up the coverage class of a position once merged.
//!
//! ## Reading blocks
//!
//! The [`Reader`] facility reads the file line by line, and
//! [`Reader::blocks()`] assembles the lines into [alignment
//! blocks](crate::alignment::Block). While a block is built, every base call
//! is classified as [`Normal`](crate::coverage::Class::Normal) or
//! [`LowCoverage`](crate::coverage::Class::LowCoverage) by comparing its
//! aligned depth against a threshold (see
//! [`Reader::with_low_coverage_threshold()`]). Positions that are skipped,
//! including those before the block's alignment start, are filled in with
//! [`Gap`](crate::coverage::Class::Gap) placeholders. Runs of a single class
//! become the block's [regions](crate::coverage::Region), which together
//! cover every position from `1` through the block's last position.
//!
//! ```
//! let data = b">contig00001\t3\n3\tA\tA\t30\t12\t12\t12\t1.0\t0.1\n4\tC\tC\t30\t2\t2\t2\t1.0\t0.1";
//! let mut reader = alignmentinfo::Reader::new(&data[..]);
//!
//! for result in reader.blocks() {
//!     let block = result?;
//!     println!("{}", block.header());
//!
//!     for region in block.regions() {
//!         println!("{region}");
//!     }
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Merging regions
//!
//! A [`Document`] holds every block of a file. Because blocks that share a
//! name describe the same reference, their regions overlap and disagree, and
//! [`Document::merge_regions()`] reduces them into a single list per name,
//! ordered by start. Where two regions overlap, the class with the higher precedence
//! wins (`Normal`, then `LowCoverage`, then `Gap`).
//!
//! ```
//! use alignmentinfo::Document;
//! use alignmentinfo::Reader;
//!
//! let data = b">seq0\t1\n1\tA\t30\t2\t2\t1.0\t0.1\n2\tA\t30\t2\t2\t1.0\t0.1\n\
//!              >seq0\t1\n1\tA\t30\t12\t12\t1.0\t0.1\n";
//! let document = Document::read(Reader::new(&data[..]))?;
//!
//! for (name, regions) in document.merge_regions()? {
//!     for region in regions {
//!         println!("{name}: {region}");
//!     }
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Looking up positions
//!
//! Once merged, the regions of a [`Document`] can be loaded into a
//! [`coverage::Lookup`] to answer which class covers a given position.
//!
//! ```
//! use alignmentinfo::Document;
//! use alignmentinfo::Reader;
//! use alignmentinfo::coverage::Class;
//! use alignmentinfo::coverage::Lookup;
//!
//! let data = b">seq0\t2\n2\tA\t30\t12\t12\t1.0\t0.1\n";
//! let document = Document::read(Reader::new(&data[..]))?;
//! let lookup = Lookup::try_from_document(&document)?;
//!
//! assert_eq!(lookup.class_at("seq0", 1), Some(Class::Gap));
//! assert_eq!(lookup.class_at("seq0", 2), Some(Class::Normal));
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod alignment;
pub mod coverage;
pub mod document;
pub mod line;
pub mod reader;

pub use document::Document;
pub use line::Line;

pub use self::reader::Reader;
