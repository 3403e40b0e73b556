//! Image transform: resize to the tier bounds and encode as JPEG.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use photorelay_core::{QualityTier, ResolutionTier};
use thiserror::Error;

/// Transform failures. Any of these turns the pipeline run into a Failure
/// outcome; none of them reaches a sink.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Source image is empty")]
    EmptySource,

    #[error("Failed to decode source image: {0}")]
    Decode(String),

    #[error("Failed to encode output image: {0}")]
    Encode(String),
}

/// Produces the exact byte payload to deliver, from a source image plus the
/// configured resolution and quality tiers. Deterministic and side-effect
/// free, so implementations can run under `spawn_blocking`.
pub trait Transformer: Send + Sync {
    fn transform(
        &self,
        data: &[u8],
        resolution: ResolutionTier,
        quality: QualityTier,
    ) -> Result<Bytes, TransformError>;
}

/// Default transformer: decode, fit within the tier bounds (aspect ratio
/// preserved, never upscaled), encode as JPEG at the tier quality.
#[derive(Clone, Copy, Debug, Default)]
pub struct JpegTransformer;

impl JpegTransformer {
    fn fit(img: DynamicImage, resolution: ResolutionTier) -> DynamicImage {
        match resolution.max_dimensions() {
            Some((max_width, max_height)) => {
                let (width, height) = img.dimensions();
                if width > max_width || height > max_height {
                    img.resize(max_width, max_height, FilterType::Lanczos3)
                } else {
                    img
                }
            }
            None => img,
        }
    }
}

impl Transformer for JpegTransformer {
    fn transform(
        &self,
        data: &[u8],
        resolution: ResolutionTier,
        quality: QualityTier,
    ) -> Result<Bytes, TransformError> {
        if data.is_empty() {
            return Err(TransformError::EmptySource);
        }

        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        let (source_width, source_height) = img.dimensions();
        let img = Self::fit(img, resolution);
        let (width, height) = img.dimensions();

        // JPEG has no alpha channel.
        let img = DynamicImage::ImageRgb8(img.to_rgb8());

        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, quality.jpeg_quality());
        img.write_with_encoder(encoder)
            .map_err(|e| TransformError::Encode(e.to_string()))?;

        tracing::debug!(
            source_width,
            source_height,
            width,
            height,
            quality = quality.jpeg_quality(),
            size_bytes = buffer.len(),
            "Transformed photo"
        );

        Ok(Bytes::from(buffer))
    }
}
