//! Photorelay Pipeline Library
//!
//! The upload pipeline: validate configuration → transform → deliver to
//! every enabled destination in canonical order, stopping at the first
//! failure → report the terminal outcome through the progress reporter.
//!
//! The pipeline composes capabilities it does not own: a `Transformer`
//! (photorelay-processing), an ordered list of `Sink`s (photorelay-storage),
//! a `ProgressReporter` and an optional `AlbumWriter`. It never reads
//! ambient global state and returns the outcome as a value instead of
//! calling back into the UI.

pub mod album;
pub mod pipeline;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use album::{AlbumError, AlbumWriter, DirectoryAlbum};
pub use pipeline::{PipelineError, UploadPipeline};
pub use progress::{ProgressReporter, TracingReporter};
pub use session::UploadSession;
