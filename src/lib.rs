//! # binqr
//!
//! Turns any binary file into a QR code image.
//!
//! `binqr` reads a file's bytes, optionally deflate-compresses them, encodes them in byte mode
//! according to the QR Code Model 2 specification, and writes the symbol as a PNG scaled to a
//! requested width with a quiet zone. It supports versions 1 to 40 and all four error
//! correction levels.
//!
//! ## Features
//!
//! - Byte-mode encoding of arbitrary data, plus numeric and alphanumeric modes for text.
//! - Four error correction levels: Low, Medium, Quartile, High.
//! - Table-driven version selection, Reed–Solomon coding, and block interleaving.
//! - Parallel evaluation of the eight mask patterns.
//! - Rendering to an in-memory grayscale image buffer or a PNG file.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! Encode bytes and save a 512 pixel image with a 4-module quiet zone:
//!
//! ```rust,no_run
//! use binqr::helper::{qr_to_image_and_save, RenderOptions};
//! use binqr::qrcode::QrCode;
//! use binqr::version::QrCodeEcc;
//! use std::path::Path;
//!
//! fn main() -> binqr::Result<()> {
//!     let qr = QrCode::encode_binary(&[0x00, 0xFF, 0x10, 0x20], QrCodeEcc::Medium)?;
//!     qr_to_image_and_save(&qr, &RenderOptions::square(512, 4), Path::new("output/qr.png"))?;
//!     Ok(())
//! }
//! ```
//!
//! Run the whole file pipeline:
//!
//! ```rust,no_run
//! use binqr::config::GeneratorConfig;
//! use binqr::version::QrCodeEcc;
//!
//! let config = GeneratorConfig {
//!     input: "test.bin".into(),
//!     ecl: QrCodeEcc::Medium,
//!     width: 512,
//!     quiet_zone: 16,
//!     deflate: true,
//! };
//! let written = binqr::generate(&config).expect("failed to generate QR code");
//! println!("wrote {}", written.display());
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: The encoder and the finished [`QrCode`](qrcode::QrCode) symbol.
//! - [`version`]: Versions, error correction levels, and version selection.
//! - [`segment`]: Segments and the data codeword builder.
//! - [`ecc`]: Reed–Solomon coding and block interleaving.
//! - [`matrix`]: The module grid, function patterns, and codeword placement.
//! - [`mask`]: Mask patterns, penalty scoring, and mask selection.
//! - [`helper`]: Rendering to image buffers and PNG files.
//! - [`payload`]: Reading input and deflate pre-compression.
//! - [`config`]: Run configuration.

pub mod config;
pub mod ecc;
pub mod error;
pub mod helper;
pub mod mask;
pub mod matrix;
pub mod payload;
pub mod qrcode;
pub mod segment;
pub mod tables;
pub mod version;

pub use error::{EncodeError, Error, Result};

use std::path::PathBuf;

use tracing::info;

use config::GeneratorConfig;
use qrcode::QrCode;

/// Reads `config.input`, encodes it, and writes the PNG next to it.
///
/// Returns the path of the written image. Nothing is written unless encoding succeeds.
pub fn generate(config: &GeneratorConfig) -> Result<PathBuf> {
    let raw = payload::read_payload(&config.input)?;
    let prepared = payload::prepare_payload(raw, config.deflate);
    let qr = QrCode::encode_binary(&prepared.bytes, config.ecl)?;
    info!(
        version = qr.version().value(),
        ecl = %qr.error_correction_level(),
        mask = qr.mask().value(),
        compressed = prepared.compressed,
        "encoded QR code"
    );
    let output = config.output_path();
    helper::qr_to_image_and_save(&qr, &config.render_options(), &output)?;
    Ok(output)
}
