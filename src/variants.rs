//! Variant tags for special finishes and Doppler phases
//!
//! The marketplace filters order books for these variants through numeric
//! tag ids. One table drives both tag extraction and suffix stripping so the
//! two can never disagree about which keywords exist.

use lazy_static::lazy_static;
use regex::Regex;

/// A cosmetic sub-variant encoded in the item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantTag {
    Ruby,
    Sapphire,
    Emerald,
    BlackPearl,
    Phase1,
    Phase2,
    Phase3,
    Phase4,
}

impl VariantTag {
    /// Every known variant.
    pub const ALL: [VariantTag; 8] = [
        VariantTag::Ruby,
        VariantTag::Sapphire,
        VariantTag::Emerald,
        VariantTag::BlackPearl,
        VariantTag::Phase1,
        VariantTag::Phase2,
        VariantTag::Phase3,
        VariantTag::Phase4,
    ];

    /// Finish keywords, checked in priority order after the phase pattern.
    const FINISHES: [VariantTag; 4] = [
        VariantTag::Ruby,
        VariantTag::Sapphire,
        VariantTag::Emerald,
        VariantTag::BlackPearl,
    ];

    /// The marketplace's tag id for this variant.
    pub fn tag_id(self) -> u64 {
        match self {
            VariantTag::Ruby => 3435175,
            VariantTag::Sapphire => 3549384,
            VariantTag::Emerald => 447129,
            VariantTag::BlackPearl => 6009966,
            VariantTag::Phase1 => 446972,
            VariantTag::Phase2 => 446974,
            VariantTag::Phase3 => 446975,
            VariantTag::Phase4 => 446973,
        }
    }

    /// Lowercase keyword as it appears in item names.
    fn keyword(self) -> &'static str {
        match self {
            VariantTag::Ruby => "ruby",
            VariantTag::Sapphire => "sapphire",
            VariantTag::Emerald => "emerald",
            VariantTag::BlackPearl => "black pearl",
            VariantTag::Phase1 => "phase 1",
            VariantTag::Phase2 => "phase 2",
            VariantTag::Phase3 => "phase 3",
            VariantTag::Phase4 => "phase 4",
        }
    }

    /// Regex fragment matching this variant's keyword, tolerant of the
    /// whitespace variations seen in typed names ("Phase3", "Black  Pearl").
    fn keyword_pattern(self) -> &'static str {
        match self {
            VariantTag::Ruby => "ruby",
            VariantTag::Sapphire => "sapphire",
            VariantTag::Emerald => "emerald",
            VariantTag::BlackPearl => r"black\s+pearl",
            VariantTag::Phase1 => r"phase\s*1",
            VariantTag::Phase2 => r"phase\s*2",
            VariantTag::Phase3 => r"phase\s*3",
            VariantTag::Phase4 => r"phase\s*4",
        }
    }
}

lazy_static! {
    static ref PHASE_RE: Regex = Regex::new(r"(?i)phase\s*(\d+)").unwrap();
    static ref SUFFIX_RE: Regex = {
        let alternation = VariantTag::ALL
            .iter()
            .map(|t| t.keyword_pattern())
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)[-\s]*({})\s*$", alternation)).unwrap()
    };
}

fn phase_from_digit(digit: u64) -> Option<VariantTag> {
    match digit {
        1 => Some(VariantTag::Phase1),
        2 => Some(VariantTag::Phase2),
        3 => Some(VariantTag::Phase3),
        4 => Some(VariantTag::Phase4),
        _ => None,
    }
}

/// Extracts the variant tag encoded in an item name, if any.
///
/// A phase mention always takes precedence over finish keywords; a phase
/// digit outside 1-4 yields no tag at all rather than falling back.
pub fn extract_tag(raw_name: &str) -> Option<VariantTag> {
    if let Some(caps) = PHASE_RE.captures(raw_name) {
        return caps[1].parse().ok().and_then(phase_from_digit);
    }
    let lower = raw_name.to_lowercase();
    VariantTag::FINISHES
        .into_iter()
        .find(|tag| lower.contains(tag.keyword()))
}

/// Removes a trailing variant keyword (with any leading hyphen/whitespace)
/// from an item name. Keywords elsewhere in the name are left alone.
pub fn strip_variant_suffix(raw_name: &str) -> String {
    SUFFIX_RE.replace(raw_name, "").trim().to_string()
}
