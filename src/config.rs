//! Run configuration for the file-to-QR pipeline.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Error;
use crate::helper::RenderOptions;
use crate::version::QrCodeEcc;

/// Yes/no switch for deflate pre-compression. Only the first character counts,
/// case-insensitively (`Y`, `yes`, `n`, `No`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DeflateFlag(pub bool);

impl FromStr for DeflateFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('Y') => Ok(DeflateFlag(true)),
            Some('N') => Ok(DeflateFlag(false)),
            _ => Err(Error::InvalidArgument(format!(
                "invalid deflate argument {:?}, must be Y or N",
                s
            ))),
        }
    }
}

/// Everything one run needs: what to read, how to encode it, how to draw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub input: PathBuf,
    pub ecl: QrCodeEcc,
    /// Requested image width and height in pixels.
    pub width: u32,
    /// Quiet zone in modules.
    pub quiet_zone: u32,
    pub deflate: bool,
}

impl GeneratorConfig {
    /// The image is written next to the input, with `.png` appended to the full file name.
    pub fn output_path(&self) -> PathBuf {
        png_path_for(&self.input)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::square(self.width, self.quiet_zone)
    }
}

fn png_path_for(input: &Path) -> PathBuf {
    let mut name: OsString = input.as_os_str().to_owned();
    name.push(".png");
    PathBuf::from(name)
}
