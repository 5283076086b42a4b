use thiserror::Error;

/// Error type for when data does not fit in any allowed QR code version.
///
/// Ways to handle this error include:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the max version argument if it was less than `Version::MAX`.
/// - Enable deflate pre-compression, or make the input smaller.
/// - Propagate the error upward to the caller/user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A segment holds more characters than its count indicator can express, even at
    /// the largest allowed version.
    #[error("segment of {num_chars} characters exceeds the {max_chars} its count indicator can hold")]
    SegmentTooLong { num_chars: usize, max_chars: usize },

    /// Data length exceeds the capacity of the largest allowed version.
    #[error("data length = {needed_bits} bits, max capacity = {capacity_bits} bits")]
    CapacityExceeded {
        needed_bits: usize,
        capacity_bits: usize,
    },
}

/// binqr error types
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("invalid error_correction_level {0:?}, must be L, M, Q or H")]
    InvalidLevel(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
