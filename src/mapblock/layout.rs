//! Which parts of a map block record exist in which format version.
//!
//! The record layout changed in small steps between versions 20 and 28. Rather than
//! scattering version checks through the decoder, every version-dependent piece is
//! listed here as a rule over an inclusive version range.

use std::ops::RangeInclusive;

pub const MIN_VERSION: u8 = 20;
pub const MAX_VERSION: u8 = 28;

/// Bytes between the version byte's start and the first compressed stream.
const HEADER_SIZES: &[(RangeInclusive<u8>, usize)] = &[
    (27..=MAX_VERSION, 6),
    (22..=26, 4),
    (MIN_VERSION..=21, 2),
];

/// A piece of the record that follows the two compressed streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Fixed-size field that carries nothing needed for counting.
    Skip { bytes: usize, context: &'static str },
    /// Content-width byte, followed by 10-byte node timers when it equals 1.
    LegacyNodeTimers,
    /// Version byte, u16 count, then entries of a 13-byte head, u16 length and payload.
    StaticObjects,
    /// Version byte, u16 count, then (u16 id, u16 length, name) entries.
    NameIdMapping,
    /// Version byte, u16 count, then 10-byte timers.
    NodeTimers,
}

#[derive(Debug, Clone)]
pub struct FormatRule {
    pub versions: RangeInclusive<u8>,
    pub section: Section,
}

/// Sections after the compressed streams, in on-disk order.
pub const TRAILING_SECTIONS: &[FormatRule] = &[
    FormatRule {
        versions: MIN_VERSION..=21,
        section: Section::Skip {
            bytes: 2,
            context: "legacy field",
        },
    },
    FormatRule {
        versions: 23..=23,
        section: Section::Skip {
            bytes: 1,
            context: "version 23 field",
        },
    },
    FormatRule {
        versions: 24..=24,
        section: Section::LegacyNodeTimers,
    },
    FormatRule {
        versions: MIN_VERSION..=MAX_VERSION,
        section: Section::StaticObjects,
    },
    FormatRule {
        versions: MIN_VERSION..=MAX_VERSION,
        section: Section::Skip {
            bytes: 4,
            context: "timestamp",
        },
    },
    FormatRule {
        versions: 22..=MAX_VERSION,
        section: Section::NameIdMapping,
    },
    FormatRule {
        versions: 25..=MAX_VERSION,
        section: Section::NodeTimers,
    },
];

/// Header size for a supported version, `None` otherwise. This is the version gate of the decoder.
pub fn header_size(version: u8) -> Option<usize> {
    HEADER_SIZES
        .iter()
        .find(|(versions, _)| versions.contains(&version))
        .map(|(_, size)| *size)
}

/// The trailing sections present in `version`, in the order they appear in the record.
pub fn sections(version: u8) -> impl Iterator<Item = Section> {
    TRAILING_SECTIONS
        .iter()
        .filter(move |rule| rule.versions.contains(&version))
        .map(|rule| rule.section)
}

/// True if the voxel grid stores one big-endian u16 per node.
pub fn has_wide_content(version: u8) -> bool {
    version >= 24
}
