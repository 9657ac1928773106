//! Converting an outline font into a ufnt bitmap font asset.
//!
//! The binary is a thin wrapper around [`run`].

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use clap::{ArgAction, Parser};
use tempfile::NamedTempFile;
use ufnt::{
    read::{AssetRef, ReadError},
    validate::Validate,
    CodepointRange, FontContext, RangePolicy, RangeSet, ScaledFont,
};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// An inclusive range of codepoints to include, in any base (`0x20 0x7e`).
    ///
    /// May be repeated; groups are written in the order given.
    #[arg(
        long = "range",
        num_args = 2,
        value_names = ["FIRST", "LAST"],
        value_parser = ufnt::parse_codepoint,
        action = ArgAction::Append,
    )]
    pub range: Vec<u32>,

    /// Reject ranges that overlap or are not in ascending order
    #[arg(long)]
    pub strict: bool,

    /// The TrueType or OpenType font to convert
    #[arg(value_name = "FONT")]
    pub font: PathBuf,

    /// The size in pixels per em
    #[arg(value_name = "SIZE", value_parser = clap::value_parser!(u32).range(1..))]
    pub size: u32,

    /// Where to write the asset
    #[arg(value_name = "OUT")]
    pub out: PathBuf,
}

impl Args {
    /// The `--range` arguments as ranges.
    pub fn ranges(&self) -> Vec<CodepointRange> {
        self.range
            .chunks_exact(2)
            .map(|pair| CodepointRange::new(pair[0], pair[1]))
            .collect()
    }

    pub fn policy(&self) -> RangePolicy {
        if self.strict {
            RangePolicy::Strict
        } else {
            RangePolicy::Permissive
        }
    }
}

/// Any failure of the conversion.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("at least one range is required")]
    NoRanges,
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Build(#[from] ufnt::Error),
    #[error("encoded asset failed verification: {0}")]
    Verify(#[from] ReadError),
    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub groups: usize,
    pub glyphs: usize,
    pub bytes: usize,
}

/// Build the asset described by `args` and write it to `args.out`.
///
/// The output is only replaced once the whole asset has been built and
/// read back successfully.
pub fn run(args: &Args) -> Result<Summary, CliError> {
    let ranges = args.ranges();
    if ranges.is_empty() {
        return Err(CliError::NoRanges);
    }
    RangeSet::new(&ranges, args.policy())
        .validate()
        .map_err(ufnt::Error::from)?;

    let data = std::fs::read(&args.font).map_err(|source| CliError::Io {
        path: args.font.clone(),
        source,
    })?;
    let font = ScaledFont::new(&data, args.size as f32)?;
    let context = FontContext::from_rasterizer(&font)?;
    log::debug!("{}: {context:?}", args.font.display());

    let asset = ufnt::layout(&ranges, &context, &font, args.policy())?;
    let bytes = asset.to_bytes();
    let glyphs = AssetRef::new(&bytes)?.verify()?;

    write_atomic(&args.out, &bytes)?;
    let summary = Summary {
        groups: asset.groups.len(),
        glyphs,
        bytes: bytes.len(),
    };
    log::info!(
        "wrote {}: {} groups, {} glyphs, {} bytes",
        args.out.display(),
        summary.groups,
        summary.glyphs,
        summary.bytes
    );
    Ok(summary)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |source| CliError::Io {
        path: dir.to_owned(),
        source,
    };
    // dropped (and removed) on any early return
    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|e| CliError::Persist {
        path: path.to_owned(),
        source: e.error,
    })?;
    Ok(())
}
