//! Data segments and the codeword builder.
//!
//! A segment is a run of input in one encoding mode. The builder concatenates segments
//! into a bit stream (mode indicator, character count, payload bits), then terminates and
//! pads it to the exact data codeword capacity of the chosen version and level.

use std::borrow::Cow;

use crate::tables;
use crate::version::{QrCodeEcc, Version};

static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Pad codewords appended alternately once the terminator is written.
const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// A segment of data in a QR code.
///
/// Segments are immutable and created using factory functions like [`make_bytes`],
/// [`make_numeric`], or [`make_alphanumeric`]. Byte segments borrow their input.
///
/// [`make_bytes`]: QrSegment::make_bytes
/// [`make_numeric`]: QrSegment::make_numeric
/// [`make_alphanumeric`]: QrSegment::make_alphanumeric
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrSegment<'a> {
    mode: QrSegmentMode,
    numchars: usize,
    data: Cow<'a, [u8]>,
    bitlength: usize,
}

impl<'a> QrSegment<'a> {
    /// Creates a segment for binary data in byte mode.
    pub fn make_bytes(data: &'a [u8]) -> Self {
        QrSegment::new(QrSegmentMode::Byte, data.len(), Cow::Borrowed(data), data.len() * 8)
    }

    /// Creates a segment for a string of decimal digits in numeric mode.
    ///
    /// # Panics
    ///
    /// Panics if `text` contains non-digit characters.
    pub fn make_numeric(text: &str) -> QrSegment<'static> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for b in text.bytes() {
            assert!(b.is_ascii_digit(), "String contains non-numeric characters");
            accumdata = accumdata * 10 + u32::from(b - b'0');
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        let bitlength = bb.len();
        QrSegment::new(QrSegmentMode::Numeric, text.len(), Cow::Owned(bb.into_bytes()), bitlength)
    }

    /// Creates a segment for alphanumeric text.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    ///
    /// # Panics
    ///
    /// Panics if `text` contains invalid characters.
    pub fn make_alphanumeric(text: &str) -> QrSegment<'static> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for c in text.chars() {
            let i = ALPHANUMERIC_CHARSET
                .find(c)
                .expect("String contains unencodable characters in alphanumeric mode");
            accumdata = accumdata * 45 + i as u32;
            accumcount += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, 6);
        }
        let bitlength = bb.len();
        QrSegment::new(
            QrSegmentMode::Alphanumeric,
            text.chars().count(),
            Cow::Owned(bb.into_bytes()),
            bitlength,
        )
    }

    /// Picks the densest single mode able to represent `text`.
    pub fn make_text(text: &'a str) -> Self {
        if QrSegment::is_numeric(text) {
            QrSegment::make_numeric(text)
        } else if QrSegment::is_alphanumeric(text) {
            QrSegment::make_alphanumeric(text)
        } else {
            QrSegment::make_bytes(text.as_bytes())
        }
    }

    pub fn new(mode: QrSegmentMode, numchars: usize, data: Cow<'a, [u8]>, bitlength: usize) -> Self {
        assert!(bitlength == 0 || (bitlength - 1) / 8 < data.len());
        Self {
            mode,
            numchars,
            data,
            bitlength,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    pub fn bit_length(&self) -> usize {
        self.bitlength
    }

    /// Bits needed to encode all segments at `version`, or `None` if a segment's
    /// character count overflows its count indicator.
    pub(crate) fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if seg.numchars >= 1usize << ccbits {
                return None;
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.bitlength)?;
        }
        Some(result)
    }

    /// First segment whose character count does not fit its count indicator at `version`,
    /// as `(num_chars, max_chars)`.
    pub(crate) fn find_overlong(segs: &[Self], version: Version) -> Option<(usize, usize)> {
        segs.iter().find_map(|seg| {
            let maxchars = (1usize << seg.mode.num_char_count_bits(version)) - 1;
            (seg.numchars > maxchars).then_some((seg.numchars, maxchars))
        })
    }

    /// Like [`get_total_bits`](Self::get_total_bits) but saturates instead of failing,
    /// for error reporting.
    pub(crate) fn get_unbounded_bits(segs: &[Self], version: Version) -> usize {
        segs.iter()
            .map(|seg| 4 + usize::from(seg.mode.num_char_count_bits(version)) + seg.bitlength)
            .fold(0usize, usize::saturating_add)
    }

    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }

    fn bit(&self, i: usize) -> u32 {
        u32::from((self.data[i >> 3] >> (7 - (i & 7))) & 1)
    }
}

/// Encoding mode of a segment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
}

impl QrSegmentMode {
    /// The 4-bit mode indicator.
    pub fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Kanji => 0x8,
        }
    }

    /// Width of the character count indicator, which depends on the version band
    /// (1–9, 10–26, 27–40).
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Kanji => [8, 10, 12],
        })[usize::from((ver.value() + 7) / 17)]
    }
}

/// An appendable sequence of bits, packed big-endian into bytes.
#[derive(Clone, Debug, Default)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            data: Vec::with_capacity(bits.div_ceil(8)),
            length: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`, most significant first.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0);
        for i in (0..len).rev() {
            let shift: u8 = 7 - ((self.length as u8) & 7);
            let bit: u8 = ((val >> i) as u8) & 1;
            if shift == 7 {
                self.data.push(bit << shift);
            } else if let Some(last) = self.data.last_mut() {
                *last |= bit << shift;
            }
            self.length += 1;
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Builds the padded data codeword stream for `segs` at the given version and level.
///
/// The returned vector is exactly [`tables::num_data_codewords`] long.
///
/// # Panics
///
/// Panics if the segments do not fit; callers pick the version with
/// [`select_version`](crate::version::select_version) first.
pub fn build_codewords(segs: &[QrSegment], version: Version, ecl: QrCodeEcc) -> Vec<u8> {
    let datacapacitybits: usize = tables::num_data_codewords(version, ecl) * 8;
    let datausedbits = QrSegment::get_total_bits(segs, version)
        .filter(|&n| n <= datacapacitybits)
        .expect("segments exceed the data capacity of the selected version");

    let mut bb = BitBuffer::with_capacity(datacapacitybits);
    for seg in segs {
        bb.append_bits(seg.mode.mode_bits(), 4);
        bb.append_bits(seg.numchars as u32, seg.mode.num_char_count_bits(version));
        for i in 0..seg.bitlength {
            bb.append_bits(seg.bit(i), 1);
        }
    }
    debug_assert_eq!(bb.len(), datausedbits);

    // Add terminator and pad up to a byte if applicable
    let numzerobits = (datacapacitybits - bb.len()).min(4);
    bb.append_bits(0, numzerobits as u8);
    let numzerobits = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, numzerobits as u8);
    debug_assert_eq!(bb.len() % 8, 0);

    // Pad with alternating bytes until data capacity is reached
    for &padbyte in PAD_BYTES.iter().cycle() {
        if bb.len() >= datacapacitybits {
            break;
        }
        bb.append_bits(u32::from(padbyte), 8);
    }
    let codewords = bb.into_bytes();
    assert_eq!(
        codewords.len(),
        tables::num_data_codewords(version, ecl),
        "codeword stream does not match data capacity"
    );
    codewords
}
