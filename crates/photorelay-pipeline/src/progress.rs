//! Progress reporter capability.
//!
//! The overlay widget itself belongs to the caller; the pipeline only drives
//! its states through this trait.

/// Modal progress/status display driven by the pipeline.
///
/// Implementations must be cheap and non-blocking; every call happens on the
/// pipeline task.
pub trait ProgressReporter: Send + Sync {
    /// Put the display into its in-progress state with an overall label.
    fn show_progress(&self, label: &str);

    /// Update the detail line with the currently active destination.
    fn show_detail(&self, detail: &str);

    /// Terminal succeeded state.
    fn show_succeeded(&self);

    /// Terminal failed state.
    fn show_failed(&self);

    /// Remove the display after the settle delay has elapsed.
    fn dismiss(&self);
}

/// Reporter that logs state changes through `tracing`. Used by headless
/// callers such as the CLI.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn show_progress(&self, label: &str) {
        tracing::info!(label = label, "Upload in progress");
    }

    fn show_detail(&self, detail: &str) {
        tracing::info!(destination = detail, "Uploading to destination");
    }

    fn show_succeeded(&self) {
        tracing::info!("Upload succeeded");
    }

    fn show_failed(&self) {
        tracing::warn!("Upload failed");
    }

    fn dismiss(&self) {
        tracing::debug!("Progress display dismissed");
    }
}
