#![forbid(unsafe_code)]
//! QR code encoding functionality.
//!
//! This module ties the pipeline together: segments are sized against the capacity table to
//! pick a version, built into padded data codewords, given Reed–Solomon error correction,
//! placed on the module grid, and masked. The result is an immutable [`QrCode`].

use tracing::debug;

use crate::ecc;
use crate::error::EncodeError;
use crate::mask::{self, Mask};
use crate::matrix::{Module, ModuleMatrix};
use crate::segment::{self, QrSegment};
use crate::tables;
use crate::version::{self, QrCodeEcc, Version};

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// This struct supports QR Code Model 2, covering versions 1 to 40 and all four error correction
/// levels. Instances are immutable after creation.
///
/// # Creation
///
/// - High-level: Use [`encode_binary`](QrCode::encode_binary) or [`encode_text`](QrCode::encode_text).
/// - Mid-level: Use [`encode_segments_advanced`](QrCode::encode_segments_advanced).
/// - Low-level: Use [`encode_codewords`](QrCode::encode_codewords) with data codewords you built yourself.
///
/// # Example
///
/// ```rust
/// use binqr::qrcode::QrCode;
/// use binqr::version::QrCodeEcc;
///
/// let qr = QrCode::encode_binary(&[0xCA, 0xFE, 0xBA, 0xBE], QrCodeEcc::Medium).unwrap();
///
/// println!("Version: {}", qr.version().value());
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,
    ecl: QrCodeEcc,
    mask: Mask,
    modules: ModuleMatrix,
}

impl QrCode {
    /// Encodes arbitrary bytes into a QR code in byte mode.
    ///
    /// The smallest version that holds the data at the given error correction level is chosen,
    /// and the mask is selected automatically.
    ///
    /// # Arguments
    ///
    /// * `data` - The bytes to encode, possibly empty.
    /// * `ecl` - Error correction level.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::CapacityExceeded`] if the data does not fit in version 40, or
    /// [`EncodeError::SegmentTooLong`] if it is longer than 65535 bytes.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> Result<QrCode, EncodeError> {
        let seg = QrSegment::make_bytes(data);
        QrCode::encode_segments(&[seg], ecl)
    }

    /// Encodes a text string into a QR code, using numeric or alphanumeric mode when the text
    /// allows it and byte mode (UTF-8) otherwise.
    ///
    /// # Example
    ///
    /// ```rust
    /// use binqr::qrcode::QrCode;
    /// use binqr::version::QrCodeEcc;
    ///
    /// let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Quartile).unwrap();
    /// assert_eq!(qr.size(), 21);
    /// ```
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<QrCode, EncodeError> {
        let seg = QrSegment::make_text(text);
        QrCode::encode_segments(&[seg], ecl)
    }

    /// Encodes the given segments over the full version range with automatic masking.
    pub fn encode_segments(segs: &[QrSegment], ecl: QrCodeEcc) -> Result<QrCode, EncodeError> {
        QrCode::encode_segments_advanced(segs, ecl, Version::MIN, Version::MAX, None, false)
    }

    /// Encodes segments with full control over the encoding parameters.
    ///
    /// The smallest possible QR Code version within the given range is automatically
    /// chosen for the output. If `boostecl` is `true`, the ECC level may be higher than the
    /// `ecl` argument if it can be done without increasing the version. The `msk` can be
    /// `None` for automatic selection or a value from 0 to 7.
    ///
    /// # Arguments
    ///
    /// * `segs` - Segments to encode, in order.
    /// * `ecl` - Error correction level.
    /// * `minversion` - Minimum QR code version.
    /// * `maxversion` - Maximum QR code version.
    /// * `msk` - Optional mask pattern.
    /// * `boostecl` - Whether to boost error correction if possible.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::SegmentTooLong`] if a segment's count indicator overflows at
    /// `maxversion`, or [`EncodeError::CapacityExceeded`] if the segments do not fit in it.
    pub fn encode_segments_advanced(
        segs: &[QrSegment],
        mut ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        msk: Option<Mask>,
        boostecl: bool,
    ) -> Result<QrCode, EncodeError> {
        let (version, datausedbits) = version::select_version(segs, ecl, minversion, maxversion)?;

        // Increase the error correction level while the data still fits
        for newecl in [QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            if boostecl && datausedbits <= version::data_capacity_bits(version, newecl) {
                ecl = newecl;
            }
        }

        let datacodewords = segment::build_codewords(segs, version, ecl);
        Ok(QrCode::encode_codewords(&datacodewords, version, ecl, msk))
    }

    /// Creates a new QR Code with the given version number,
    /// error correction level, data codeword bytes, and mask number.
    ///
    /// This is a low-level API that most users should not use directly.
    ///
    /// # Panics
    ///
    /// Panics if `datacodewords` is not exactly the data capacity of `version` at `ecl`.
    pub fn encode_codewords(
        datacodewords: &[u8],
        version: Version,
        ecl: QrCodeEcc,
        msk: Option<Mask>,
    ) -> QrCode {
        let allcodewords = ecc::add_ecc_and_interleave(datacodewords, version, ecl);

        let mut placed = ModuleMatrix::with_function_patterns(version);
        placed.place_codewords(&allcodewords);

        let (mask, modules) = match msk {
            Some(m) => (m, mask::finish(&placed, ecl, m)),
            None => mask::select_mask(&placed, ecl),
        };
        debug!(
            version = version.value(),
            %ecl,
            mask = mask.value(),
            codewords = allcodewords.len(),
            "encoded symbol"
        );
        QrCode {
            version,
            ecl,
            mask,
            modules,
        }
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.modules.size() as i32
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.ecl
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// The finished module grid.
    pub fn matrix(&self) -> &ModuleMatrix {
        &self.modules
    }

    /// Whether both version information blocks are present (versions 7 and up).
    pub fn has_version_info(&self) -> bool {
        self.version.has_version_info()
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`, so callers can sample the quiet zone freely.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size();
        range.contains(&x) && range.contains(&y) && self.modules.is_dark(x as usize, y as usize)
    }

    /// Whether the module at the given in-bounds coordinates belongs to a function pattern.
    pub fn is_function_module(&self, x: usize, y: usize) -> bool {
        matches!(self.modules.get(x, y), Module::Function(_))
    }

    /// Number of data codewords this symbol carries.
    pub fn num_data_codewords(&self) -> usize {
        tables::num_data_codewords(self.version, self.ecl)
    }
}
