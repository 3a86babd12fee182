//! Playback progress watcher.
//!
//! Polls the page's media element on a fixed interval and reports each video
//! at most once per activation, after playback crosses the completion
//! threshold.

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use shichou_bridge::DataBridge;
use shichou_detect::PageSource;
use shichou_parse::{is_watch_url, video_id};
use tokio::time::MissedTickBehavior;

use crate::assembler::MediaAssembler;
use crate::config::AppConfig;
use crate::error::ShichouError;
use crate::models::ViewedEvent;

/// Receives one event per de-duplicated watched video.
pub trait ViewedSink: Send + Sync {
    fn report(&self, event: ViewedEvent) -> impl Future<Output = Result<(), ShichouError>> + Send;
}

/// Sink that logs each event as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ViewedSink for LogSink {
    fn report(&self, event: ViewedEvent) -> impl Future<Output = Result<(), ShichouError>> + Send {
        let payload = serde_json::to_string(&event);
        async move {
            let payload = payload.map_err(|e| ShichouError::Sink(e.to_string()))?;
            tracing::info!(event = %payload, "View threshold reached");
            Ok(())
        }
    }
}

/// Identifiers already reported during this activation.
#[derive(Debug, Default)]
pub struct ReportedSet {
    ids: HashSet<String>,
}

impl ReportedSet {
    /// Add an identifier. Returns `false` if it was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Not activated, or activated on a page that is not a playback page.
    Idle,
    /// The current video has not been reported yet.
    Watching,
    /// The current video has been reported; polling continues so navigation
    /// to another video is picked up.
    Reported,
}

/// What a single poll did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Another tick was still in flight.
    Busy,
    /// No media element, or its duration is not usable.
    NoVideo,
    BelowThreshold { progress: f64 },
    AlreadyReported { id: String },
    Reported { id: String, progress: f64 },
    /// Re-extraction failed; the id stays reported and is not retried.
    ExtractionFailed { id: String, error: String },
    /// The sink rejected the event; the id stays reported.
    SinkFailed { id: String, error: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatcherSettings {
    pub poll_interval: Duration,
    pub threshold: f64,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10_000),
            threshold: 0.8,
        }
    }
}

impl From<&AppConfig> for WatcherSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            threshold: config.watcher.threshold,
        }
    }
}

/// Watches one page activation.
pub struct ProgressWatcher<S> {
    assembler: Arc<MediaAssembler>,
    bridge: DataBridge,
    sink: S,
    settings: WatcherSettings,
    reported: Mutex<ReportedSet>,
    state: Mutex<WatchState>,
    busy: AtomicBool,
}

impl<S: ViewedSink> ProgressWatcher<S> {
    pub fn new(
        assembler: Arc<MediaAssembler>,
        bridge: DataBridge,
        sink: S,
        settings: WatcherSettings,
    ) -> Self {
        Self {
            assembler,
            bridge,
            sink,
            settings,
            reported: Mutex::new(ReportedSet::default()),
            state: Mutex::new(WatchState::Idle),
            busy: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> WatchState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_reported(&self, id: &str) -> bool {
        self.reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    pub fn reported_count(&self) -> usize {
        self.reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .ids
            .len()
    }

    fn set_state(&self, state: WatchState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Poll until `shutdown` resolves.
    ///
    /// Returns at once, leaving the watcher idle, when the page is not a
    /// playback page. The first poll happens one interval after activation.
    /// Shutdown also interrupts a tick that is waiting on the bridge; an id
    /// claimed by the interrupted tick stays reported.
    pub async fn run(&self, page: &dyn PageSource, shutdown: impl Future<Output = ()>) {
        if !is_watch_url(&page.current_url()) {
            tracing::info!("Watcher loaded, not on a playback page");
            return;
        }

        self.set_state(WatchState::Watching);
        tracing::info!(
            interval_ms = self.settings.poll_interval.as_millis() as u64,
            threshold = self.settings.threshold,
            "Progress watcher started"
        );

        let mut interval = tokio::time::interval(self.settings.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await;

        tokio::pin!(shutdown);
        loop {
            let poll = async {
                interval.tick().await;
                self.tick(page).await
            };
            tokio::select! {
                _ = &mut shutdown => break,
                outcome = poll => tracing::trace!(?outcome, "Watcher tick"),
            }
        }
        tracing::debug!("Progress watcher stopped");
    }

    /// Check progress once and report if due.
    ///
    /// Overlapping calls are rejected with [`TickOutcome::Busy`] before they
    /// read or change the reported set.
    pub async fn tick(&self, page: &dyn PageSource) -> TickOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("Previous tick still running, skipping");
            return TickOutcome::Busy;
        };

        let Some(progress) = page.playback().and_then(|p| p.progress()) else {
            tracing::warn!("No video element with a usable duration");
            return TickOutcome::NoVideo;
        };

        let url = page.current_url();
        let id = video_id(&url).map_or_else(|| url.clone(), str::to_string);
        if self.is_reported(&id) {
            self.set_state(WatchState::Reported);
        } else {
            self.set_state(WatchState::Watching);
        }

        tracing::debug!(progress, threshold = self.settings.threshold, "Progress check");
        if progress < self.settings.threshold {
            return TickOutcome::BelowThreshold { progress };
        }

        let newly_added = self
            .reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(&id);
        if !newly_added {
            return TickOutcome::AlreadyReported { id };
        }
        self.set_state(WatchState::Reported);

        let media = match self.assembler.extract(page, &self.bridge).await {
            Ok(media) => media,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Re-extraction failed, not retrying");
                return TickOutcome::ExtractionFailed {
                    id,
                    error: e.to_string(),
                };
            }
        };

        match self.sink.report(ViewedEvent::new(media, progress)).await {
            Ok(()) => {
                tracing::info!(id = %id, progress, "Reported viewed video");
                TickOutcome::Reported { id, progress }
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Viewed event not delivered");
                TickOutcome::SinkFailed {
                    id,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Holds the busy flag for the lifetime of one tick.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shichou_bridge::PageChannel;
    use shichou_detect::{HtmlPage, PlaybackState};

    const WATCH_URL: &str = "https://www.netflix.com/watch/80100172?trackId=1";
    const HTML: &str = r#"<html><body><div data-uia="video-title">Dark T1:E2 Lies</div></body></html>"#;

    #[derive(Clone, Default)]
    struct RecordingSink {
        events: Arc<Mutex<Vec<ViewedEvent>>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<ViewedEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ViewedSink for RecordingSink {
        fn report(
            &self,
            event: ViewedEvent,
        ) -> impl Future<Output = Result<(), ShichouError>> + Send {
            let events = self.events.clone();
            async move {
                events.lock().unwrap().push(event);
                Ok(())
            }
        }
    }

    struct FailingSink;

    impl ViewedSink for FailingSink {
        fn report(
            &self,
            _event: ViewedEvent,
        ) -> impl Future<Output = Result<(), ShichouError>> + Send {
            async { Err(ShichouError::Sink("offline".into())) }
        }
    }

    fn watcher<S: ViewedSink>(sink: S) -> ProgressWatcher<S> {
        ProgressWatcher::new(
            Arc::new(MediaAssembler::default()),
            DataBridge::new(PageChannel::new()),
            sink,
            WatcherSettings::default(),
        )
    }

    fn page_at(url: &str, current_time: f64, duration: f64) -> HtmlPage {
        HtmlPage::parse(HTML, url).with_playback(PlaybackState {
            current_time,
            duration,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_ticks_report_once() {
        let sink = RecordingSink::default();
        let watcher = watcher(sink.clone());
        let page = page_at(WATCH_URL, 2700.0, 3000.0);

        let first = watcher.tick(&page).await;
        let second = watcher.tick(&page).await;

        assert!(matches!(first, TickOutcome::Reported { ref id, .. } if id == "80100172"));
        assert_eq!(
            second,
            TickOutcome::AlreadyReported {
                id: "80100172".into()
            }
        );
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].media.title, "Dark");
        assert!((events[0].progress - 0.9).abs() < 1e-9);
        assert_eq!(watcher.state(), WatchState::Reported);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_tick_is_rejected() {
        let sink = RecordingSink::default();
        let watcher = watcher(sink.clone());
        let page = page_at(WATCH_URL, 2700.0, 3000.0);

        // The first tick parks on the bridge timeout while the second starts.
        let (first, second) = tokio::join!(watcher.tick(&page), watcher.tick(&page));

        assert!(matches!(first, TickOutcome::Reported { .. }));
        assert_eq!(second, TickOutcome::Busy);
        assert_eq!(sink.events().len(), 1);

        // The flag is released once the tick completes.
        assert!(matches!(
            watcher.tick(&page).await,
            TickOutcome::AlreadyReported { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_below_threshold() {
        let sink = RecordingSink::default();
        let watcher = watcher(sink.clone());
        let outcome = watcher.tick(&page_at(WATCH_URL, 600.0, 3000.0)).await;
        assert_eq!(outcome, TickOutcome::BelowThreshold { progress: 0.2 });
        assert_eq!(watcher.reported_count(), 0);
        assert!(sink.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_video() {
        let watcher = watcher(RecordingSink::default());
        let no_element = HtmlPage::parse(HTML, WATCH_URL);
        assert_eq!(watcher.tick(&no_element).await, TickOutcome::NoVideo);
        assert_eq!(
            watcher.tick(&page_at(WATCH_URL, 10.0, f64::NAN)).await,
            TickOutcome::NoVideo
        );
        assert_eq!(watcher.reported_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_extraction_keeps_id() {
        let sink = RecordingSink::default();
        let watcher = watcher(sink.clone());
        let page = page_at("not-a-url/watch/123", 2900.0, 3000.0);

        let first = watcher.tick(&page).await;
        assert!(matches!(first, TickOutcome::ExtractionFailed { ref id, .. } if id == "123"));
        assert!(watcher.is_reported("123"));
        assert_eq!(
            watcher.tick(&page).await,
            TickOutcome::AlreadyReported { id: "123".into() }
        );
        assert!(sink.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_url_is_fallback_id() {
        let watcher = watcher(RecordingSink::default());
        let url = "https://www.netflix.com/browse?jbv=80100172";
        let outcome = watcher.tick(&page_at(url, 95.0, 100.0)).await;
        assert!(matches!(outcome, TickOutcome::Reported { ref id, .. } if id == url));
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_reports_new_video() {
        let sink = RecordingSink::default();
        let watcher = watcher(sink.clone());
        let mut page = page_at(WATCH_URL, 2900.0, 3000.0);

        watcher.tick(&page).await;
        page.set_url("https://www.netflix.com/watch/80100173");
        watcher.tick(&page).await;

        assert_eq!(sink.events().len(), 2);
        assert!(watcher.is_reported("80100173"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_follows_current_video() {
        let watcher = watcher(RecordingSink::default());
        let mut page = page_at(WATCH_URL, 2900.0, 3000.0);
        assert_eq!(watcher.state(), WatchState::Idle);

        watcher.tick(&page).await;
        assert_eq!(watcher.state(), WatchState::Reported);

        page.set_url("https://www.netflix.com/watch/80100173");
        let page = page.with_playback(PlaybackState {
            current_time: 60.0,
            duration: 3000.0,
        });
        assert!(matches!(
            watcher.tick(&page).await,
            TickOutcome::BelowThreshold { .. }
        ));
        assert_eq!(watcher.state(), WatchState::Watching);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_pending_report() {
        let sink = RecordingSink::default();
        let watcher = watcher(sink.clone());
        let page = page_at(WATCH_URL, 2900.0, 3000.0);
        let started = tokio::time::Instant::now();

        // The first poll at 10s waits on the bridge until 11s.
        watcher
            .run(&page, tokio::time::sleep(Duration::from_millis(10_500)))
            .await;

        assert_eq!(started.elapsed(), Duration::from_millis(10_500));
        assert!(sink.events().is_empty());
        assert!(watcher.is_reported("80100172"));

        // The busy flag was released with the dropped tick.
        assert!(matches!(
            watcher.tick(&page).await,
            TickOutcome::AlreadyReported { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_failure_keeps_id() {
        let watcher = watcher(FailingSink);
        let page = page_at(WATCH_URL, 2900.0, 3000.0);
        assert!(matches!(
            watcher.tick(&page).await,
            TickOutcome::SinkFailed { .. }
        ));
        assert!(watcher.is_reported("80100172"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_polls_on_interval() {
        let sink = RecordingSink::default();
        let watcher = watcher(sink.clone());
        let page = page_at(WATCH_URL, 2900.0, 3000.0);

        watcher
            .run(&page, tokio::time::sleep(Duration::from_secs(35)))
            .await;

        assert_eq!(sink.events().len(), 1);
        assert_eq!(watcher.state(), WatchState::Reported);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stays_idle_off_playback_page() {
        let sink = RecordingSink::default();
        let watcher = watcher(sink.clone());
        let page = page_at("https://www.netflix.com/browse", 2900.0, 3000.0);

        watcher
            .run(&page, tokio::time::sleep(Duration::from_secs(35)))
            .await;

        assert_eq!(watcher.state(), WatchState::Idle);
        assert!(sink.events().is_empty());
    }
}
