//! binqr CLI - write a file's bytes into a QR code PNG.

use std::path::PathBuf;

use binqr::config::{DeflateFlag, GeneratorConfig};
use binqr::version::QrCodeEcc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "binqr", version)]
#[command(
    about = "Encode a binary file as a QR code PNG",
    after_help = "Example: binqr test.bin M 512 16"
)]
struct Cli {
    /// File to encode; the image is written to <file>.png
    file: PathBuf,

    /// Error correction level: L, M, Q or H
    error_correction_level: QrCodeEcc,

    /// Requested image width (and height) in pixels
    image_width_px: u32,

    /// Quiet zone around the symbol, in modules
    quiet_zone_px: u32,

    /// Deflate the file before encoding: Y or N
    #[arg(default_value = "N")]
    deflate: DeflateFlag,
}

impl From<Cli> for GeneratorConfig {
    fn from(cli: Cli) -> Self {
        GeneratorConfig {
            input: cli.file,
            ecl: cli.error_correction_level,
            width: cli.image_width_px,
            quiet_zone: cli.quiet_zone_px,
            deflate: cli.deflate.0,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("binqr=info".parse()?),
        )
        .init();

    let config = GeneratorConfig::from(Cli::parse());
    binqr::generate(&config)?;
    Ok(())
}
