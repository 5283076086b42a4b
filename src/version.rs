//! QR code versions, error correction levels, and version selection.

use std::str::FromStr;

use tracing::debug;

use crate::error::{EncodeError, Error};
use crate::segment::{QrSegment, QrSegmentMode};
use crate::tables;

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of the symbol in modules, `4 * version + 17`.
    pub const fn size(self) -> usize {
        (self.0 as usize) * 4 + 17
    }

    /// Whether the symbol carries the two 6x3 version information blocks.
    pub const fn has_version_info(self) -> bool {
        self.0 >= 7
    }

    fn next(self) -> Option<Version> {
        (self.0 < Version::MAX.0).then(|| Version(self.0 + 1))
    }
}

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// Index into the per-level tables (in the range 0 to 3).
    pub(crate) fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    pub(crate) fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }

    /// Inverse of [`format_bits`](Self::format_bits).
    pub fn from_format_bits(bits: u8) -> Option<Self> {
        use QrCodeEcc::*;
        match bits {
            0 => Some(Medium),
            1 => Some(Low),
            2 => Some(High),
            3 => Some(Quartile),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        use QrCodeEcc::*;
        match self {
            Low => 'L',
            Medium => 'M',
            Quartile => 'Q',
            High => 'H',
        }
    }
}

/// Parses a level from its letter. Only the first character counts, case-insensitively,
/// so `"l"`, `"L"` and `"Low"` all give [`QrCodeEcc::Low`].
impl FromStr for QrCodeEcc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('L') => Ok(QrCodeEcc::Low),
            Some('M') => Ok(QrCodeEcc::Medium),
            Some('Q') => Ok(QrCodeEcc::Quartile),
            Some('H') => Ok(QrCodeEcc::High),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for QrCodeEcc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Data capacity of a symbol in bits.
pub fn data_capacity_bits(ver: Version, ecl: QrCodeEcc) -> usize {
    tables::num_data_codewords(ver, ecl) * 8
}

/// Largest raw byte payload a single Byte-mode segment can carry at this version and level.
pub fn byte_capacity(ver: Version, ecl: QrCodeEcc) -> usize {
    let ccbits = QrSegmentMode::Byte.num_char_count_bits(ver);
    let overhead = 4 + usize::from(ccbits);
    let fit = data_capacity_bits(ver, ecl).saturating_sub(overhead) / 8;
    fit.min((1usize << ccbits) - 1)
}

/// Finds the smallest version in `minversion..=maxversion` whose data capacity holds
/// all segments, returning it with the number of bits the segments occupy there.
///
/// # Errors
///
/// Returns [`EncodeError::SegmentTooLong`] if a segment's character count overflows its
/// count indicator at `maxversion`, and [`EncodeError::CapacityExceeded`] if the segments
/// fit their indicators but even `maxversion` is too small.
pub fn select_version(
    segs: &[QrSegment],
    ecl: QrCodeEcc,
    minversion: Version,
    maxversion: Version,
) -> Result<(Version, usize), EncodeError> {
    assert!(minversion <= maxversion, "Invalid value");
    let mut version: Version = minversion;
    loop {
        let capacity_bits = data_capacity_bits(version, ecl);
        let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
        match dataused {
            Some(n) if n <= capacity_bits => {
                debug!(version = version.value(), %ecl, used_bits = n, capacity_bits, "selected version");
                return Ok((version, n));
            }
            _ if version >= maxversion => {
                if let Some((num_chars, max_chars)) = QrSegment::find_overlong(segs, version) {
                    return Err(EncodeError::SegmentTooLong {
                        num_chars,
                        max_chars,
                    });
                }
                return Err(EncodeError::CapacityExceeded {
                    needed_bits: dataused
                        .unwrap_or_else(|| QrSegment::get_unbounded_bits(segs, version)),
                    capacity_bits,
                });
            }
            _ => {}
        }
        version = match version.next() {
            Some(v) => v,
            None => unreachable!("maxversion is at most Version::MAX"),
        };
    }
}
