//! A binary that prints the merged coverage regions (or the per-base calls)
//! of an alignment info file.
//!
//! ```shell
//! cargo run --release --bin=coverage-regions --features=binaries 454AlignmentInfo.tsv
//! ```
//!
//! Gzip-compressed inputs (`*.gz`) are decompressed transparently.

use std::path::PathBuf;

use alignmentinfo::Document;
use alignmentinfo::alignment::block::call::DEFAULT_LOW_COVERAGE_THRESHOLD;
use alignmentinfo::coverage::Lookup;
use alignmentinfo::coverage::Region;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use omics::coordinate::position::Number;
use regex::Regex;
use tabled::builder::Builder;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tabled::settings::object::Rows;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////
// Ranges
////////////////////////////////////////////////////////////////////////////////////////

/// Parses a closed, one-based `START-END` range. `END` must be below
/// `Number::MAX`, which no region can cover.
fn parse_range(value: &str) -> Result<(Number, Number)> {
    let (start, end) = value
        .split_once('-')
        .with_context(|| format!("expected `START-END`, found `{value}`"))?;

    let start = start
        .parse::<Number>()
        .with_context(|| format!("invalid range start: `{start}`"))?;
    let end = end
        .parse::<Number>()
        .with_context(|| format!("invalid range end: `{end}`"))?;

    if start == 0 || start > end {
        bail!("invalid range: {start}-{end}");
    }

    if end == Number::MAX {
        bail!("range end must be less than {}", Number::MAX);
    }

    Ok((start, end))
}

#[cfg(test)]
mod range_tests {
    use super::*;

    #[test]
    fn valid_ranges() {
        assert_eq!(parse_range("1-10").unwrap(), (1, 10));
        assert_eq!(parse_range("5-5").unwrap(), (5, 5));
    }

    #[test]
    fn invalid_ranges() {
        assert!(parse_range("10").is_err());
        assert!(parse_range("0-10").is_err());
        assert!(parse_range("10-1").is_err());
        assert!(parse_range("a-10").is_err());
        assert!(parse_range(&format!("1-{}", Number::MAX)).is_err());
        assert_eq!(
            parse_range(&format!("1-{}", Number::MAX - 1)).unwrap(),
            (1, Number::MAX - 1)
        );
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// Prints the coverage of an alignment info file.
#[derive(Parser)]
struct Args {
    /// The alignment info file to read.
    src: PathBuf,

    /// The aligned depth below which a base has low coverage.
    #[arg(short, long, default_value_t = DEFAULT_LOW_COVERAGE_THRESHOLD)]
    threshold: u64,

    /// Only report these reference names (may be given more than once).
    #[arg(short, long)]
    name: Vec<String>,

    /// Only report reference names matching this regular expression.
    #[arg(short, long)]
    pattern: Option<String>,

    /// Only report merged regions overlapping this `START-END` range.
    #[arg(short, long, conflicts_with = "bases", value_parser = parse_range)]
    range: Option<(Number, Number)>,

    /// Print the per-base calls of every block instead of the merged
    /// regions.
    #[arg(short, long, default_value_t = false)]
    bases: bool,

    #[command(flatten)]
    verbose: Verbosity,
}

/// Whether the reference name should be reported.
fn wanted(args: &Args, pattern: Option<&Regex>, name: &str) -> bool {
    (args.name.is_empty() || args.name.iter().any(|n| n == name))
        && pattern.map(|p| p.is_match(name)).unwrap_or(true)
}

/// Builds the table of per-base calls.
fn bases(args: &Args, pattern: Option<&Regex>, document: &Document) -> Builder {
    let mut builder = Builder::default();
    builder.push_record([
        "Name", "Position", "Ref", "Consensus", "Quality", "Unique", "Aligned", "Total",
        "Signal", "StdDev", "Class",
    ]);

    for block in document.blocks() {
        if !wanted(args, pattern, block.name()) {
            continue;
        }

        for call in block.calls() {
            builder.push_record([
                block.name(),
                &call.position().to_string(),
                &call
                    .reference_base()
                    .map(|v| v.to_string())
                    .unwrap_or(String::from("<None>")),
                &call.consensus_base().to_string(),
                &call.quality().to_string(),
                &call.unique_depth().to_string(),
                &call.aligned_depth().to_string(),
                &call
                    .total_depth()
                    .map(|v| v.to_string())
                    .unwrap_or(String::from("<None>")),
                &call.signal().to_string(),
                &call.stddev().to_string(),
                call.class().as_str(),
            ]);
        }
    }

    builder
}

/// Builds the table of merged regions.
fn regions(args: &Args, pattern: Option<&Regex>, document: &Document) -> Result<Builder> {
    let mut builder = Builder::default();
    builder.push_record(["Name", "Start", "End", "Length", "Class"]);

    let mut push = |name: &str, region: &Region| {
        builder.push_record([
            name,
            &region.start().to_string(),
            &region.end().to_string(),
            &region.len().to_string(),
            region.class().as_str(),
        ]);
    };

    match args.range {
        Some((start, end)) => {
            let lookup = Lookup::try_from_document(document).context("building lookup")?;

            for name in document.names() {
                if !wanted(args, pattern, name) {
                    continue;
                }

                for region in lookup.find(name, start, end).unwrap_or_default() {
                    push(name, &region);
                }
            }
        }
        None => {
            for name in document.names() {
                if !wanted(args, pattern, name) {
                    continue;
                }

                let merged = match document.merge_regions_for(name) {
                    Some(result) => result.with_context(|| format!("merging regions for {name}"))?,
                    None => continue,
                };

                for region in &merged {
                    push(name, region);
                }
            }
        }
    }

    Ok(builder)
}

fn run(args: &Args) -> Result<()> {
    let pattern = args
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("compiling name pattern")?;

    let document = Document::from_path(&args.src, args.threshold)
        .with_context(|| format!("reading {}", args.src.display()))?;

    info!(
        "read {} block(s) covering {} name(s) from {}",
        document.blocks().len(),
        document.names().count(),
        args.src.display()
    );

    let builder = match args.bases {
        true => bases(args, pattern.as_ref(), &document),
        false => regions(args, pattern.as_ref(), &document)?,
    };

    let table = builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string();

    println!("{}", table);

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    run(&args)
}
