//! Logo rasterization
//!
//! Converts an image into an ESC/POS `GS v 0` raster block:
//! - Downscaled to fit the maximum dot width (aspect ratio kept)
//! - Width cropped to a multiple of 8 from the right edge
//! - Thresholded to 1 bit per pixel (dark = ink)
//! - Packed MSB-first, 8 pixels per byte, rows top to bottom

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use tracing::{debug, instrument};

use crate::error::{PrintError, PrintResult};

/// GS v 0 m (m = 0, normal density)
pub const RASTER_OPCODE: [u8; 4] = [0x1D, 0x76, 0x30, 0x00];

/// Header length: opcode + xL xH + yL yH
pub const HEADER_LEN: usize = RASTER_OPCODE.len() + 4;

/// Gray values strictly below this print as ink
pub const INK_THRESHOLD: u8 = 128;

/// Printable dots on a 58mm head
pub const DEFAULT_MAX_WIDTH: u32 = 384;

/// Encoded raster image command
///
/// `data.len() == width_bytes * height` always holds; the constructors
/// are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBlock {
    width_bytes: u16,
    height: u16,
    data: Vec<u8>,
}

impl RasterBlock {
    /// Bytes per row
    pub fn width_bytes(&self) -> u16 {
        self.width_bytes
    }

    /// Width in dots
    pub fn width_px(&self) -> u32 {
        u32::from(self.width_bytes) * 8
    }

    /// Rows
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Packed bit rows, without header
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Total encoded length including header
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.data.len()
    }

    /// Whether the dot at (`x`, `y`) is ink
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        if x >= self.width_px() || y >= u32::from(self.height) {
            return false;
        }
        let idx = y as usize * self.width_bytes as usize + (x / 8) as usize;
        self.data[idx] & (0x80 >> (x % 8)) != 0
    }

    /// Serialize as a complete ESC/POS command
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    /// Append the complete ESC/POS command to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&RASTER_OPCODE);
        out.extend_from_slice(&self.width_bytes.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.data);
    }

    /// Parse a pre-built block (e.g. a converted logo file)
    ///
    /// The header dimensions must describe the payload exactly.
    pub fn from_bytes(bytes: &[u8]) -> PrintResult<Self> {
        if bytes.len() < HEADER_LEN || bytes[..4] != RASTER_OPCODE {
            return Err(PrintError::invalid_image("missing GS v 0 raster header"));
        }
        let width_bytes = u16::from_le_bytes([bytes[4], bytes[5]]);
        let height = u16::from_le_bytes([bytes[6], bytes[7]]);
        if width_bytes == 0 || height == 0 {
            return Err(PrintError::invalid_image(format!(
                "raster block has zero dimension ({width_bytes}x{height})"
            )));
        }

        let payload = &bytes[HEADER_LEN..];
        let expected = width_bytes as usize * height as usize;
        if payload.len() != expected {
            return Err(PrintError::invalid_image(format!(
                "raster payload is {} bytes, header declares {expected}",
                payload.len()
            )));
        }

        Ok(Self {
            width_bytes,
            height,
            data: payload.to_vec(),
        })
    }
}

/// Encode a grayscale image as a raster block
///
/// Images wider than `max_width` are downscaled (Lanczos3) to exactly
/// `max_width` dots first.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn encode(image: &GrayImage, max_width: u32) -> PrintResult<RasterBlock> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(PrintError::invalid_image(format!(
            "image has zero dimension ({w}x{h})"
        )));
    }

    let resized;
    let image = if w > max_width {
        let new_h = scaled_height(w, h, max_width);
        debug!(new_width = max_width, new_height = new_h, "downscaling logo");
        resized = image::imageops::resize(image, max_width, new_h, FilterType::Lanczos3);
        &resized
    } else {
        image
    };
    let (w, h) = image.dimensions();

    // Crop from the right edge to a multiple of 8
    let width_bytes = w / 8;
    if width_bytes == 0 {
        return Err(PrintError::invalid_image(format!(
            "image width {w} is narrower than 8 dots"
        )));
    }
    let width_bytes = u16::try_from(width_bytes)
        .map_err(|_| PrintError::invalid_image(format!("image width {w} too large")))?;
    let height = u16::try_from(h)
        .map_err(|_| PrintError::invalid_image(format!("image height {h} too large")))?;

    let mut data = Vec::with_capacity(width_bytes as usize * height as usize);
    for y in 0..h {
        for x_byte in 0..u32::from(width_bytes) {
            let mut byte = 0u8;
            for bit in 0..8 {
                let Luma([gray]) = *image.get_pixel(x_byte * 8 + bit, y);
                if gray < INK_THRESHOLD {
                    byte |= 0x80 >> bit;
                }
            }
            data.push(byte);
        }
    }

    debug!(width_bytes, height, bytes = data.len(), "logo rasterized");

    Ok(RasterBlock {
        width_bytes,
        height,
        data,
    })
}

/// Encode any decoded image, reducing it to grayscale first
pub fn encode_dynamic(image: &DynamicImage, max_width: u32) -> PrintResult<RasterBlock> {
    encode(&to_gray(image), max_width)
}

/// Decode PNG/JPEG/WebP bytes and encode them
pub fn encode_bytes(bytes: &[u8], max_width: u32) -> PrintResult<RasterBlock> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| PrintError::invalid_image(format!("cannot decode image: {e}")))?;
    encode_dynamic(&image, max_width)
}

/// Reduce to 8-bit gray with ITU-R 601-2 luma
///
/// Alpha is composited over white, so transparent areas never print.
pub fn to_gray(image: &DynamicImage) -> GrayImage {
    let rgba = image.to_rgba8();
    let mut gray = GrayImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
        let a = u32::from(a);
        let over_white = (luma * a + 255 * (255 - a)) / 255;
        gray.put_pixel(x, y, Luma([over_white as u8]));
    }
    gray
}

/// Height after scaling width `w` down to `max_width`, rounded, at least 1
fn scaled_height(w: u32, h: u32, max_width: u32) -> u32 {
    let scaled = (f64::from(h) * f64::from(max_width) / f64::from(w)).round();
    (scaled as u32).max(1)
}
