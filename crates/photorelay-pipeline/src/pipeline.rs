//! Upload pipeline: validate → transform → deliver (ordered, short-circuit)
//! → report outcome.
//!
//! Delivery is all-or-nothing across the enabled destinations: sinks are
//! attempted strictly in the order given (canonically WebDAV, then Dropbox)
//! and the first failure fails the whole request without touching the
//! remaining sinks. There is no retry and no fan-out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use photorelay_core::{
    ConfigError, DestinationConfig, UploadOutcome, UploadRequest, UploadSettings,
};
use photorelay_processing::Transformer;
use photorelay_storage::Sink;
use thiserror::Error;

use crate::album::AlbumWriter;
use crate::progress::ProgressReporter;

/// How long the terminal progress state stays visible before dismissal.
const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Conditions that refuse a run before it starts. Everything past the guard
/// is converted into an `UploadOutcome` instead of an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A run is already in flight on this pipeline instance.
    #[error("Upload already in progress")]
    Busy,
}

/// One-per-screen upload pipeline. Holds the configuration and the injected
/// capabilities; `run` is invoked once per user upload action.
pub struct UploadPipeline {
    destinations: DestinationConfig,
    settings: UploadSettings,
    transformer: Arc<dyn Transformer>,
    sinks: Vec<Arc<dyn Sink>>,
    reporter: Arc<dyn ProgressReporter>,
    album: Option<Arc<dyn AlbumWriter>>,
    settle_delay: Duration,
    in_flight: AtomicBool,
}

impl UploadPipeline {
    pub fn new(
        destinations: DestinationConfig,
        settings: UploadSettings,
        transformer: Arc<dyn Transformer>,
        sinks: Vec<Arc<dyn Sink>>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        UploadPipeline {
            destinations,
            settings,
            transformer,
            sinks,
            reporter,
            album: None,
            settle_delay: SETTLE_DELAY,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Attach a local album store for save-to-album copies.
    pub fn with_album(mut self, album: Arc<dyn AlbumWriter>) -> Self {
        self.album = Some(album);
        self
    }

    /// Override the settle delay (tests use zero).
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Run the pipeline for one request.
    ///
    /// Returns an error only when the run is refused before starting
    /// (configuration guard, busy guard). Once started, every path ends in
    /// exactly one `UploadOutcome`.
    pub async fn run(&self, request: UploadRequest) -> Result<UploadOutcome, PipelineError> {
        self.destinations.validate()?;

        let _guard = InflightGuard::acquire(&self.in_flight).ok_or(PipelineError::Busy)?;

        self.reporter.show_progress("Uploading");

        let name = request.effective_name();
        let transformer = Arc::clone(&self.transformer);
        let image = request.image.clone();
        let resolution = self.settings.resolution;
        let quality = self.settings.quality;
        let transformed =
            tokio::task::spawn_blocking(move || transformer.transform(&image, resolution, quality))
                .await;

        let payload = match transformed {
            Ok(Ok(payload)) => payload,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "Photo transform failed");
                return Ok(self.finish(UploadOutcome::Failure).await);
            }
            Err(err) => {
                tracing::error!(error = %err, "Photo transform task aborted");
                return Ok(self.finish(UploadOutcome::Failure).await);
            }
        };

        let object_name = format!("{}.jpg", name);

        // Fire-and-forget: album writes never gate the outcome.
        if request.save_to_album && self.settings.save_to_album {
            if let Some(ref album) = self.album {
                let album = Arc::clone(album);
                let object_name = object_name.clone();
                let payload = payload.clone();
                tokio::spawn(async move {
                    if let Err(err) = album.save(&object_name, payload).await {
                        tracing::warn!(error = %err, name = %object_name, "Album save failed");
                    }
                });
            }
        }

        for sink in &self.sinks {
            let label = sink.kind().label();
            self.reporter.show_detail(label);
            tracing::info!(destination = label, name = %object_name, "Delivering upload");

            if let Err(err) = sink.upload(&object_name, payload.clone()).await {
                tracing::warn!(
                    destination = label,
                    name = %object_name,
                    error = %err,
                    "Delivery failed, aborting remaining destinations"
                );
                return Ok(self.finish(UploadOutcome::Failure).await);
            }
        }

        Ok(self.finish(UploadOutcome::Success).await)
    }

    /// Show the terminal state, hold it for the settle delay, then dismiss.
    async fn finish(&self, outcome: UploadOutcome) -> UploadOutcome {
        match outcome {
            UploadOutcome::Success => self.reporter.show_succeeded(),
            UploadOutcome::Failure => self.reporter.show_failed(),
        }
        tokio::time::sleep(self.settle_delay).await;
        self.reporter.dismiss();
        outcome
    }
}

/// Re-entrancy guard: at most one run in flight per pipeline instance.
struct InflightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InflightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InflightGuard { flag })
    }
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use photorelay_core::{DropboxConfig, QualityTier, ResolutionTier, WebDavConfig};
    use photorelay_processing::TransformError;
    use photorelay_storage::{SinkError, SinkKind, SinkResult};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::mpsc;
    use tokio::sync::Notify;

    use crate::album::AlbumError;

    const TRANSFORMED: &[u8] = b"transformed-jpeg";

    fn both_enabled() -> DestinationConfig {
        DestinationConfig {
            webdav: WebDavConfig {
                enabled: true,
                url: "https://dav.example.com/photos".to_string(),
                ..Default::default()
            },
            dropbox: DropboxConfig {
                enabled: true,
                access_token: "token".to_string(),
                folder: "/photos".to_string(),
            },
        }
    }

    #[derive(Default)]
    struct StubTransformer {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Transformer for StubTransformer {
        fn transform(
            &self,
            _data: &[u8],
            _resolution: ResolutionTier,
            _quality: QualityTier,
        ) -> Result<Bytes, TransformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(TransformError::EmptySource)
            } else {
                Ok(Bytes::from_static(TRANSFORMED))
            }
        }
    }

    struct MockSink {
        kind: SinkKind,
        fail: bool,
        calls: AtomicUsize,
        names: Mutex<Vec<String>>,
        log: Arc<Mutex<Vec<SinkKind>>>,
    }

    impl MockSink {
        fn new(kind: SinkKind, fail: bool, log: Arc<Mutex<Vec<SinkKind>>>) -> Arc<Self> {
            Arc::new(MockSink {
                kind,
                fail,
                calls: AtomicUsize::new(0),
                names: Mutex::new(Vec::new()),
                log,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Sink for MockSink {
        fn kind(&self) -> SinkKind {
            self.kind
        }

        async fn upload(&self, name: &str, _data: Bytes) -> SinkResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.names.lock().unwrap().push(name.to_string());
            self.log.lock().unwrap().push(self.kind);
            if self.fail {
                Err(SinkError::Status { status: 500 })
            } else {
                Ok(())
            }
        }
    }

    /// Sink that blocks until released; used to hold a run in flight.
    struct BlockingSink {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl Sink for BlockingSink {
        fn kind(&self) -> SinkKind {
            SinkKind::WebDav
        }

        async fn upload(&self, _name: &str, _data: Bytes) -> SinkResult<()> {
            self.release.notified().await;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressReporter for RecordingReporter {
        fn show_progress(&self, label: &str) {
            self.events.lock().unwrap().push(format!("progress:{}", label));
        }

        fn show_detail(&self, detail: &str) {
            self.events.lock().unwrap().push(format!("detail:{}", detail));
        }

        fn show_succeeded(&self) {
            self.events.lock().unwrap().push("succeeded".to_string());
        }

        fn show_failed(&self) {
            self.events.lock().unwrap().push("failed".to_string());
        }

        fn dismiss(&self) {
            self.events.lock().unwrap().push("dismiss".to_string());
        }
    }

    struct FailingAlbum;

    #[async_trait]
    impl AlbumWriter for FailingAlbum {
        async fn save(&self, _name: &str, _data: Bytes) -> Result<(), AlbumError> {
            Err(AlbumError::Io(std::io::Error::other("disk full")))
        }
    }

    struct ChannelAlbum {
        sender: mpsc::UnboundedSender<(String, Bytes)>,
    }

    #[async_trait]
    impl AlbumWriter for ChannelAlbum {
        async fn save(&self, name: &str, data: Bytes) -> Result<(), AlbumError> {
            let _ = self.sender.send((name.to_string(), data));
            Ok(())
        }
    }

    fn request(name: &str) -> UploadRequest {
        UploadRequest {
            image: Bytes::from_static(b"source-image"),
            display_name: name.to_string(),
            save_to_album: false,
        }
    }

    struct Fixture {
        pipeline: UploadPipeline,
        transformer: Arc<StubTransformer>,
        webdav: Arc<MockSink>,
        dropbox: Arc<MockSink>,
        reporter: Arc<RecordingReporter>,
        log: Arc<Mutex<Vec<SinkKind>>>,
    }

    fn fixture(config: DestinationConfig, webdav_fails: bool) -> Fixture {
        let log = Arc::new(Mutex::new(Vec::new()));
        let transformer = Arc::new(StubTransformer::default());
        let webdav = MockSink::new(SinkKind::WebDav, webdav_fails, Arc::clone(&log));
        let dropbox = MockSink::new(SinkKind::Dropbox, false, Arc::clone(&log));
        let reporter = Arc::new(RecordingReporter::default());
        let sinks: Vec<Arc<dyn Sink>> = vec![webdav.clone(), dropbox.clone()];

        let pipeline = UploadPipeline::new(
            config,
            UploadSettings::default(),
            transformer.clone(),
            sinks,
            reporter.clone(),
        )
        .with_settle_delay(Duration::ZERO);

        Fixture {
            pipeline,
            transformer,
            webdav,
            dropbox,
            reporter,
            log,
        }
    }

    #[tokio::test]
    async fn refuses_when_no_destination_enabled() {
        let f = fixture(DestinationConfig::default(), false);

        let err = f.pipeline.run(request("holiday")).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Config(ConfigError::NoDestination)
        ));
        assert_eq!(f.transformer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.webdav.call_count(), 0);
        assert_eq!(f.dropbox.call_count(), 0);
        assert!(f.reporter.events().is_empty());
    }

    #[tokio::test]
    async fn refuses_webdav_with_empty_url() {
        let mut config = both_enabled();
        config.webdav.url.clear();
        let f = fixture(config, false);

        let err = f.pipeline.run(request("holiday")).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Config(ConfigError::InvalidWebDavUrl)
        ));
        assert_eq!(f.transformer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn delivers_in_order_and_succeeds() {
        let f = fixture(both_enabled(), false);

        let outcome = f.pipeline.run(request("holiday")).await.unwrap();

        assert_eq!(outcome, UploadOutcome::Success);
        assert_eq!(
            *f.log.lock().unwrap(),
            vec![SinkKind::WebDav, SinkKind::Dropbox]
        );
        assert_eq!(f.webdav.call_count(), 1);
        assert_eq!(f.dropbox.call_count(), 1);
        assert_eq!(
            f.reporter.events(),
            vec![
                "progress:Uploading",
                "detail:WebDAV",
                "detail:Dropbox",
                "succeeded",
                "dismiss"
            ]
        );
    }

    #[tokio::test]
    async fn first_failure_short_circuits() {
        let f = fixture(both_enabled(), true);

        let outcome = f.pipeline.run(request("holiday")).await.unwrap();

        assert_eq!(outcome, UploadOutcome::Failure);
        assert_eq!(f.webdav.call_count(), 1);
        assert_eq!(f.dropbox.call_count(), 0);
        assert_eq!(
            f.reporter.events(),
            vec!["progress:Uploading", "detail:WebDAV", "failed", "dismiss"]
        );
    }

    #[tokio::test]
    async fn object_name_gets_jpg_extension() {
        let f = fixture(both_enabled(), false);

        f.pipeline.run(request("holiday")).await.unwrap();

        assert_eq!(*f.webdav.names.lock().unwrap(), vec!["holiday.jpg"]);
    }

    #[tokio::test]
    async fn empty_name_falls_back_to_timestamp() {
        let f = fixture(both_enabled(), false);

        f.pipeline.run(request("")).await.unwrap();

        let names = f.webdav.names.lock().unwrap();
        // yyyyMMdd_HHmmss.jpg
        assert_eq!(names[0].len(), 19);
        assert!(names[0].ends_with(".jpg"));
    }

    #[tokio::test]
    async fn transform_error_fails_without_touching_sinks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let transformer = Arc::new(StubTransformer {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let webdav = MockSink::new(SinkKind::WebDav, false, Arc::clone(&log));
        let reporter = Arc::new(RecordingReporter::default());
        let sinks: Vec<Arc<dyn Sink>> = vec![webdav.clone()];
        let pipeline = UploadPipeline::new(
            both_enabled(),
            UploadSettings::default(),
            transformer,
            sinks,
            reporter.clone(),
        )
        .with_settle_delay(Duration::ZERO);

        let outcome = pipeline.run(request("holiday")).await.unwrap();

        assert_eq!(outcome, UploadOutcome::Failure);
        assert_eq!(webdav.call_count(), 0);
        assert_eq!(
            reporter.events(),
            vec!["progress:Uploading", "failed", "dismiss"]
        );
    }

    #[tokio::test]
    async fn album_failure_does_not_gate_outcome() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let webdav = MockSink::new(SinkKind::WebDav, false, Arc::clone(&log));
        let pipeline = UploadPipeline::new(
            both_enabled(),
            UploadSettings {
                save_to_album: true,
                ..Default::default()
            },
            Arc::new(StubTransformer::default()),
            vec![webdav.clone() as Arc<dyn Sink>],
            Arc::new(RecordingReporter::default()),
        )
        .with_settle_delay(Duration::ZERO)
        .with_album(Arc::new(FailingAlbum));

        let mut req = request("holiday");
        req.save_to_album = true;
        let outcome = pipeline.run(req).await.unwrap();

        assert_eq!(outcome, UploadOutcome::Success);
        assert_eq!(webdav.call_count(), 1);
    }

    #[tokio::test]
    async fn album_receives_transformed_payload() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let webdav = MockSink::new(SinkKind::WebDav, false, Arc::clone(&log));
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let pipeline = UploadPipeline::new(
            both_enabled(),
            UploadSettings {
                save_to_album: true,
                ..Default::default()
            },
            Arc::new(StubTransformer::default()),
            vec![webdav as Arc<dyn Sink>],
            Arc::new(RecordingReporter::default()),
        )
        .with_settle_delay(Duration::ZERO)
        .with_album(Arc::new(ChannelAlbum { sender }));

        let mut req = request("holiday");
        req.save_to_album = true;
        pipeline.run(req).await.unwrap();

        let (name, data) = receiver.recv().await.unwrap();
        assert_eq!(name, "holiday.jpg");
        assert_eq!(&data[..], TRANSFORMED);
    }

    #[tokio::test]
    async fn album_skipped_when_request_opts_out() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let webdav = MockSink::new(SinkKind::WebDav, false, Arc::clone(&log));
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let pipeline = UploadPipeline::new(
            both_enabled(),
            UploadSettings {
                save_to_album: true,
                ..Default::default()
            },
            Arc::new(StubTransformer::default()),
            vec![webdav as Arc<dyn Sink>],
            Arc::new(RecordingReporter::default()),
        )
        .with_settle_delay(Duration::ZERO)
        .with_album(Arc::new(ChannelAlbum { sender }));

        // save_to_album is false on the request.
        pipeline.run(request("holiday")).await.unwrap();

        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn concurrent_second_run_is_refused() {
        let release = Arc::new(Notify::new());
        let pipeline = Arc::new(
            UploadPipeline::new(
                both_enabled(),
                UploadSettings::default(),
                Arc::new(StubTransformer::default()),
                vec![Arc::new(BlockingSink {
                    release: Arc::clone(&release),
                }) as Arc<dyn Sink>],
                Arc::new(RecordingReporter::default()),
            )
            .with_settle_delay(Duration::ZERO),
        );

        let first = {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.run(request("one")).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = pipeline.run(request("two")).await.unwrap_err();
        assert!(matches!(err, PipelineError::Busy));

        release.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome, UploadOutcome::Success);
    }

    #[tokio::test]
    async fn sequential_runs_are_repeatable() {
        let f = fixture(both_enabled(), false);

        let first = f.pipeline.run(request("holiday")).await.unwrap();
        let second = f.pipeline.run(request("holiday")).await.unwrap();

        assert_eq!(first, UploadOutcome::Success);
        assert_eq!(second, UploadOutcome::Success);
        assert_eq!(f.webdav.call_count(), 2);
        assert_eq!(f.dropbox.call_count(), 2);
    }
}
