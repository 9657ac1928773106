//! Inclusive codepoint ranges and their validation.

use std::{fmt, num::ParseIntError, ops::RangeInclusive, str::FromStr};

use crate::validate::{Validate, ValidationCtx};

/// An inclusive range of codepoints to include in an asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CodepointRange {
    pub start: u32,
    pub stop: u32,
}

impl CodepointRange {
    pub fn new(start: u32, stop: u32) -> Self {
        CodepointRange { start, stop }
    }

    /// The number of codepoints covered, or zero if the range is inverted.
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.stop - self.start) as u64 + 1
        }
    }

    /// Returns `true` if `stop < start`.
    pub fn is_empty(&self) -> bool {
        self.stop < self.start
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        (self.start..=self.stop).contains(&codepoint)
    }

    /// Returns `true` if any codepoint is in both ranges.
    pub fn overlaps(&self, other: &CodepointRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start <= other.stop
            && other.start <= self.stop
    }

    /// Iterate over every codepoint in the range, in ascending order.
    pub fn iter(&self) -> RangeInclusive<u32> {
        self.start..=self.stop
    }
}

impl From<RangeInclusive<u32>> for CodepointRange {
    fn from(src: RangeInclusive<u32>) -> Self {
        CodepointRange::new(*src.start(), *src.end())
    }
}

impl fmt::Display for CodepointRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}..=U+{:04X}", self.start, self.stop)
    }
}

/// Failure to parse a codepoint from the command line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCodepointError {
    #[error("invalid codepoint '{0}': a sign is not allowed")]
    Signed(String),
    #[error("invalid codepoint '{0}': leading zeros are not allowed in decimal")]
    LeadingZero(String),
    #[error("invalid codepoint '{text}': {source}")]
    Int { text: String, source: ParseIntError },
}

/// Parse an integer in any base.
///
/// Accepts a `0x`, `0o` or `0b` prefix (either case) or plain decimal.
/// Leading zeros on a non-zero decimal value are rejected, matching the
/// usual "integer literal with automatic base" convention.
pub fn parse_codepoint(text: &str) -> Result<u32, ParseCodepointError> {
    let trimmed = text.trim();
    let prefix = trimmed.get(..2).map(str::to_ascii_lowercase);
    let (digits, radix) = match prefix.as_deref() {
        Some("0x") => (&trimmed[2..], 16),
        Some("0o") => (&trimmed[2..], 8),
        Some("0b") => (&trimmed[2..], 2),
        _ => (trimmed, 10),
    };
    // from_str_radix tolerates a leading sign
    if digits.starts_with(['+', '-']) {
        return Err(ParseCodepointError::Signed(text.to_owned()));
    }
    if radix == 10 && digits.len() > 1 && digits.starts_with('0') {
        if digits.bytes().all(|b| b == b'0') {
            return Ok(0);
        }
        return Err(ParseCodepointError::LeadingZero(text.to_owned()));
    }
    u32::from_str_radix(digits, radix).map_err(|source| ParseCodepointError::Int {
        text: text.to_owned(),
        source,
    })
}

impl FromStr for CodepointRange {
    type Err = ParseCodepointError;

    /// Parse `FIRST..LAST` or `FIRST-LAST`, each in any base.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, stop) = s
            .split_once("..")
            .or_else(|| s.split_once('-'))
            .unwrap_or((s, s));
        Ok(CodepointRange::new(
            parse_codepoint(start)?,
            parse_codepoint(stop)?,
        ))
    }
}

/// How strictly to check the list of ranges before building.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RangePolicy {
    /// Only inverted ranges are rejected.
    ///
    /// Overlapping or repeated codepoints are rasterized and emitted once
    /// per occurrence, and groups are written in the order given.
    #[default]
    Permissive,
    /// Ranges must also be ascending and disjoint, so that a runtime can
    /// binary search the groups.
    Strict,
}

/// A list of ranges checked under a given policy.
#[derive(Clone, Copy, Debug)]
pub struct RangeSet<'a> {
    pub ranges: &'a [CodepointRange],
    pub policy: RangePolicy,
}

impl<'a> RangeSet<'a> {
    pub fn new(ranges: &'a [CodepointRange], policy: RangePolicy) -> Self {
        RangeSet { ranges, policy }
    }

    /// The total number of glyph records the ranges will produce.
    pub fn glyph_count(&self) -> u64 {
        self.ranges.iter().map(CodepointRange::len).sum()
    }
}

impl Validate for RangeSet<'_> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("RangeSet", |ctx| {
            ctx.in_field("ranges", |ctx| {
                if self.ranges.is_empty() {
                    ctx.report("at least one range is required");
                    return;
                }
                ctx.in_array(|ctx| {
                    let mut prev: Option<&CodepointRange> = None;
                    for range in self.ranges {
                        ctx.array_item(|ctx| {
                            if range.is_empty() {
                                ctx.report(format_args!(
                                    "range {:#x}..={:#x} ends before it starts",
                                    range.start, range.stop
                                ));
                            }
                            if self.policy == RangePolicy::Strict {
                                match prev {
                                    Some(p) if range.overlaps(p) => ctx.report(format_args!(
                                        "range {range} overlaps the previous range {p}"
                                    )),
                                    Some(p) if range.start <= p.stop => ctx.report(format_args!(
                                        "range {range} is not after the previous range {p}"
                                    )),
                                    _ => (),
                                }
                            }
                        });
                        if !range.is_empty() {
                            prev = Some(range);
                        }
                    }
                })
            })
        })
    }
}
