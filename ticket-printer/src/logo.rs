//! Logo sources
//!
//! A ticket logo arrives either as an image to rasterize or as a raster
//! block converted ahead of time. Callers pick the source; the ticket
//! encoder only ever sees the resolved [`RasterBlock`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{info, instrument};

use crate::error::{PrintError, PrintResult};
use crate::raster::{self, RASTER_OPCODE, RasterBlock};

/// Where a ticket logo comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogoSource {
    /// Print without a logo
    #[default]
    None,
    /// Encoded image (PNG/JPEG/WebP), rasterized on resolve
    InlineImage(Vec<u8>),
    /// Raster block converted ahead of time
    Prebuilt(RasterBlock),
}

impl LogoSource {
    /// Classify raw bytes: a `GS v 0` block is parsed as prebuilt,
    /// anything else is treated as an image
    pub fn from_bytes(bytes: Vec<u8>) -> PrintResult<Self> {
        if bytes.starts_with(&RASTER_OPCODE) {
            RasterBlock::from_bytes(&bytes).map(Self::Prebuilt)
        } else {
            Ok(Self::InlineImage(bytes))
        }
    }

    /// Decode base64 then classify as in [`LogoSource::from_bytes`]
    pub fn from_base64(encoded: &str) -> PrintResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| PrintError::invalid_image(format!("invalid base64 logo: {e}")))?;
        Self::from_bytes(bytes)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Produce the raster block to embed, if any
    #[instrument(skip(self), fields(kind = self.kind()))]
    pub fn resolve(&self, max_width: u32) -> PrintResult<Option<RasterBlock>> {
        let block = match self {
            Self::None => return Ok(None),
            Self::InlineImage(bytes) => raster::encode_bytes(bytes, max_width)?,
            Self::Prebuilt(block) => block.clone(),
        };
        info!(
            width = block.width_px(),
            height = block.height(),
            bytes = block.encoded_len(),
            "logo ready"
        );
        Ok(Some(block))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::InlineImage(_) => "image",
            Self::Prebuilt(_) => "prebuilt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::DEFAULT_MAX_WIDTH;
    use image::{GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = GrayImage::from_pixel(w, h, Luma([0]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_none_resolves_to_none() {
        assert_eq!(LogoSource::None.resolve(DEFAULT_MAX_WIDTH).unwrap(), None);
        assert!(LogoSource::default().is_none());
    }

    #[test]
    fn test_prebuilt_detected() {
        let block = raster::encode(&GrayImage::from_pixel(8, 3, Luma([0])), 384).unwrap();
        let source = LogoSource::from_bytes(block.to_bytes()).unwrap();
        assert_eq!(source, LogoSource::Prebuilt(block.clone()));
        assert_eq!(source.resolve(DEFAULT_MAX_WIDTH).unwrap(), Some(block));
    }

    #[test]
    fn test_inline_image_rasterized() {
        let source = LogoSource::from_bytes(png_bytes(20, 4)).unwrap();
        assert!(matches!(source, LogoSource::InlineImage(_)));

        let block = source.resolve(DEFAULT_MAX_WIDTH).unwrap().unwrap();
        assert_eq!(block.width_bytes(), 2);
        assert_eq!(block.height(), 4);
    }

    #[test]
    fn test_base64() {
        let encoded = STANDARD.encode(png_bytes(16, 1));
        let source = LogoSource::from_base64(&encoded).unwrap();
        assert!(source.resolve(DEFAULT_MAX_WIDTH).unwrap().is_some());

        assert!(LogoSource::from_base64("***").is_err());
    }

    #[test]
    fn test_broken_prebuilt_rejected() {
        let mut bytes = RASTER_OPCODE.to_vec();
        bytes.extend_from_slice(&[2, 0, 2, 0, 0xFF]);
        assert!(matches!(
            LogoSource::from_bytes(bytes),
            Err(PrintError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_undecodable_image_fails_on_resolve() {
        let source = LogoSource::from_bytes(b"GIF89a-not-really".to_vec()).unwrap();
        assert!(source.resolve(DEFAULT_MAX_WIDTH).is_err());
    }
}
