//! Reading the input file and the optional deflate pass.

use std::fs;
use std::path::Path;

use miniz_oxide::deflate::compress_to_vec_zlib;
use tracing::{info, warn};

use crate::error::Result;

/// Best compression, as zlib level 9.
pub const DEFLATE_LEVEL: u8 = 9;

/// Reads the whole file into memory.
pub fn read_payload(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path)?;
    info!(path = %path.display(), bytes = bytes.len(), "read payload");
    Ok(bytes)
}

/// Compresses `bytes` into a zlib-wrapped deflate stream.
pub fn deflate(bytes: &[u8]) -> Vec<u8> {
    compress_to_vec_zlib(bytes, DEFLATE_LEVEL)
}

/// Bytes that will actually be encoded, and whether they are compressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prepared {
    pub bytes: Vec<u8>,
    pub compressed: bool,
}

/// Applies deflate when requested, keeping the raw bytes if compression does not make
/// them strictly smaller.
pub fn prepare_payload(raw: Vec<u8>, deflate_requested: bool) -> Prepared {
    if !deflate_requested {
        return Prepared {
            bytes: raw,
            compressed: false,
        };
    }
    let packed = deflate(&raw);
    if packed.len() < raw.len() {
        info!(raw = raw.len(), compressed = packed.len(), "deflate applied");
        Prepared {
            bytes: packed,
            compressed: true,
        }
    } else {
        warn!(
            raw = raw.len(),
            compressed = packed.len(),
            "deflate does not shrink the payload, encoding raw bytes"
        );
        Prepared {
            bytes: raw,
            compressed: false,
        }
    }
}
