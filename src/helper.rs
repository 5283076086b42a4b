use crate::error::{Error, Result};
use crate::qrcode::QrCode;
use crate::version::QrCodeEcc;

use image::{ImageBuffer, ImageFormat, Luma};
use std::fs;
use std::path::Path;
use tracing::info;

/// 8-bit grayscale bitmap produced by the renderer.
pub type QrImage = ImageBuffer<Luma<u8>, Vec<u8>>;

const DARK: Luma<u8> = Luma([0u8]);
const LIGHT: Luma<u8> = Luma([255u8]);

/*---- Rendering ----*/

/// Requested canvas and margin for [`render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Requested canvas width in pixels.
    pub width: u32,
    /// Requested canvas height in pixels.
    pub height: u32,
    /// Light margin on every side, in modules.
    pub quiet_zone: u32,
}

impl RenderOptions {
    /// A square canvas of `size` pixels.
    pub fn square(size: u32, quiet_zone: u32) -> Self {
        Self {
            width: size,
            height: size,
            quiet_zone,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::square(0, 4)
    }
}

/// Largest canvas side, in pixels, that [`render`] will allocate.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Scales a QR code to pixels.
///
/// The symbol plus its quiet zone is scaled by the largest whole factor that fits the
/// requested canvas, then centered. If the canvas is smaller than the quiet-zoned symbol
/// at one pixel per module, the canvas grows to that size. For example, a 25x25 symbol with
/// a 4-module quiet zone is 33x33; at a requested 200x160 the factor is 4, giving a 100x100
/// symbol centered on the 200x160 canvas, and everything around it is padding.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if either canvas side would exceed [`MAX_CANVAS_SIDE`].
///
/// # Example
///
/// ```rust
/// use binqr::helper::{render, RenderOptions};
/// use binqr::qrcode::QrCode;
/// use binqr::version::QrCodeEcc;
///
/// let qr = QrCode::encode_binary(b"Hello, World!", QrCodeEcc::Low).unwrap();
/// let img = render(&qr, &RenderOptions::square(0, 4)).unwrap();
/// assert_eq!(img.dimensions(), (29, 29));
/// ```
pub fn render(qr: &QrCode, opts: &RenderOptions) -> Result<QrImage> {
    let input_size = qr.size() as u32;
    let qr_width = opts
        .quiet_zone
        .checked_mul(2)
        .and_then(|margin| margin.checked_add(input_size))
        .filter(|&w| w <= MAX_CANVAS_SIDE)
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "quiet zone of {} modules does not fit a {} pixel canvas",
                opts.quiet_zone, MAX_CANVAS_SIDE
            ))
        })?;
    let qr_height = qr_width;
    let output_width = opts.width.max(qr_width);
    let output_height = opts.height.max(qr_height);
    if output_width > MAX_CANVAS_SIDE || output_height > MAX_CANVAS_SIDE {
        return Err(Error::InvalidArgument(format!(
            "canvas {}x{} exceeds {} pixels per side",
            output_width, output_height, MAX_CANVAS_SIDE
        )));
    }

    // All products below stay within MAX_CANVAS_SIDE
    let multiple = (output_width / qr_width).min(output_height / qr_height);
    let left_padding = (output_width - input_size * multiple) / 2;
    let top_padding = (output_height - input_size * multiple) / 2;

    Ok(ImageBuffer::from_fn(output_width, output_height, |x, y| {
        let inside = x >= left_padding
            && y >= top_padding
            && x < left_padding + input_size * multiple
            && y < top_padding + input_size * multiple;
        if inside
            && qr.get_module(
                ((x - left_padding) / multiple) as i32,
                ((y - top_padding) / multiple) as i32,
            )
        {
            DARK
        } else {
            LIGHT
        }
    }))
}

/// Writes a rendered QR code as PNG, creating the parent directory if needed.
pub fn save_png(img: &QrImage, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    img.save_with_format(path, ImageFormat::Png)?;
    info!(path = %path.display(), width = img.width(), height = img.height(), "wrote image");
    Ok(())
}

/// Renders a QR code and saves it as PNG.
///
/// # Errors
///
/// Returns an error if the canvas is too large, the directory cannot be created, or the
/// image cannot be written.
pub fn qr_to_image_and_save(qr: &QrCode, opts: &RenderOptions, path: &Path) -> Result<()> {
    save_png(&render(qr, opts)?, path)
}

/// Generates a QR Code image buffer from the provided bytes.
///
/// # Arguments
///
/// * `content` - The bytes to encode into the QR Code.
/// * `ecl` - Error correction level.
/// * `opts` - Canvas size and quiet zone.
///
/// # Example
///
/// ```
/// use binqr::helper::{generate_image_buffer, RenderOptions};
/// use binqr::version::QrCodeEcc;
///
/// let img_buffer = generate_image_buffer(b"Hello, World!", QrCodeEcc::Low, &RenderOptions::square(290, 4)).unwrap();
/// assert_eq!(img_buffer.dimensions(), (290, 290));
/// ```
pub fn generate_image_buffer(content: &[u8], ecl: QrCodeEcc, opts: &RenderOptions) -> Result<QrImage> {
    let qr = QrCode::encode_binary(content, ecl)?;
    render(&qr, opts)
}
