//! PNG codec for item images.
//!
//! Item images are stored as compressed PNG blobs. The camera side hands over
//! raw pixels; these functions convert between that raster and the stored
//! bytes.

use bytes::Bytes;

use crate::error::CodecError;

/// Channel layout of an 8-bit raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::GrayAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    fn png_color(self) -> png::ColorType {
        match self {
            PixelFormat::Gray => png::ColorType::Grayscale,
            PixelFormat::GrayAlpha => png::ColorType::GrayscaleAlpha,
            PixelFormat::Rgb => png::ColorType::Rgb,
            PixelFormat::Rgba => png::ColorType::Rgba,
        }
    }

    fn from_png(color: png::ColorType) -> Result<Self, CodecError> {
        match color {
            png::ColorType::Grayscale => Ok(PixelFormat::Gray),
            png::ColorType::GrayscaleAlpha => Ok(PixelFormat::GrayAlpha),
            png::ColorType::Rgb => Ok(PixelFormat::Rgb),
            png::ColorType::Rgba => Ok(PixelFormat::Rgba),
            png::ColorType::Indexed => Err(CodecError::Unsupported(
                "indexed color survived palette expansion".into(),
            )),
        }
    }
}

/// Uncompressed 8-bit image, rows packed top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Build a raster, checking the buffer length against the dimensions.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, CodecError> {
        let expected = width as usize * height as usize * format.channels();
        if pixels.len() != expected {
            return Err(CodecError::PixelMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }
}

/// Compress a raster to PNG bytes.
pub fn encode_png(image: &RasterImage) -> Result<Bytes, CodecError> {
    let expected = image.width as usize * image.height as usize * image.format.channels();
    if image.pixels.len() != expected {
        return Err(CodecError::PixelMismatch {
            expected,
            actual: image.pixels.len(),
        });
    }
    if image.width == 0 || image.height == 0 {
        return Err(CodecError::Unsupported("zero-sized image".into()));
    }

    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width, image.height);
        encoder.set_color(image.format.png_color());
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
        writer.finish()?;
    }
    Ok(Bytes::from(buf))
}

/// Decompress PNG bytes to an 8-bit raster.
///
/// Palette, low-bit-depth and 16-bit images are normalized to 8 bits per
/// channel.
pub fn decode_png(bytes: &[u8]) -> Result<RasterImage, CodecError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut pixels = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut pixels)?;
    pixels.truncate(frame.buffer_size());

    RasterImage::new(
        frame.width,
        frame.height,
        PixelFormat::from_png(frame.color_type)?,
        pixels,
    )
}
