//! Photorelay Processing Library
//!
//! Image transformation for the upload pipeline: tier-driven downscaling
//! and JPEG re-encoding. The pipeline only selects the target bounds and
//! quality; this crate owns the pixel work.

pub mod transform;

pub use transform::{JpegTransformer, TransformError, Transformer};
