//! Scan Loop Controller
//!
//! Owns one camera session at a time and drives the sampling loop:
//! frames arrive at display cadence, one is decoded every sample interval,
//! and the first new barcode stops the camera before the detection handler
//! runs.
//!
//! # Lifecycle
//! ```text
//! Idle --start--> Running --detect / stop--> Idle
//!                     |
//!               stop requested --> Stopping --next tick--> Idle
//! ```
//!
//! A device that was just released gets `restart_delay` to settle before
//! the next `start` opens it again.

use crate::clock::{Clock, SystemClock};
use crate::debounce::DuplicateFilter;
use crate::error::{Result, ScanError};
use crate::scheduler::{FrameHandle, FrameScheduler, FrameTicker};
use crate::session::{ScanSession, ScanState};
use crate::settings::ScanSettings;
use crate::stats::ScanStats;
use crate::surface::RenderSurface;
use logging::Logger;
use media::{BarcodeDecoder, CameraInfo, CameraSource, CaptureStream, DecodeOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Receives each detected barcode text
pub type DetectionHandler = Box<dyn FnMut(&str)>;

/// Result of a successful `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session is running
    Started,
    /// A session was already running; nothing changed
    AlreadyRunning,
}

/// What one frame tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Handle not pending or no session running; ignored
    Stale,
    /// A stop request was honoured
    Stopped,
    /// Too soon after the last sample
    Throttled,
    /// Stream has no size yet
    NotReady,
    /// Frame could not be read
    GrabFailed,
    /// Decoded nothing
    Missed,
    /// Decoder failed
    Faulted,
    /// Same text as the last detection
    Duplicate,
    /// New barcode; the session has been stopped and the handler called
    Detected(String),
}

/// Requests a stop from another thread
///
/// The controller honours the request at the start of its next tick.
#[derive(Debug, Clone)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Frame-throttled barcode scan loop
pub struct ScanLoopController<C: CameraSource, K: Clock = SystemClock> {
    camera: C,
    decoder: Box<dyn BarcodeDecoder>,
    scheduler: Box<dyn FrameScheduler>,
    clock: K,
    settings: ScanSettings,
    state: ScanState,
    session: Option<ScanSession<C::Stream>>,
    handler: Option<DetectionHandler>,
    filter: DuplicateFilter,
    last_detected: Option<String>,
    stop_requested: Arc<AtomicBool>,
    stats: ScanStats,
    last_started_at: Option<Instant>,
    last_stopped_at: Option<Instant>,
    settle_until: Option<Instant>,
    logger: Logger,
    decoder_logger: Logger,
}

impl<C: CameraSource> ScanLoopController<C, SystemClock> {
    /// Creates a controller running on wall-clock time
    ///
    /// # Errors
    /// `ScanError::Config` if `settings` has a zero duration
    pub fn new(
        camera: C,
        decoder: Box<dyn BarcodeDecoder>,
        settings: ScanSettings,
        logger: &Logger,
    ) -> Result<Self> {
        Self::with_clock(camera, decoder, settings, SystemClock, logger)
    }
}

impl<C: CameraSource, K: Clock + 'static> ScanLoopController<C, K> {
    /// Creates a controller reading time from `clock`
    ///
    /// Frames are paced by a [`FrameTicker`] on the same clock.
    pub fn with_clock(
        camera: C,
        decoder: Box<dyn BarcodeDecoder>,
        settings: ScanSettings,
        clock: K,
        logger: &Logger,
    ) -> Result<Self> {
        settings.validate()?;

        let scheduler = Box::new(FrameTicker::new(clock.clone(), settings.frame_interval));
        Ok(Self {
            camera,
            decoder,
            scheduler,
            clock,
            filter: DuplicateFilter::new(settings.debounce_window),
            settings,
            state: ScanState::Idle,
            session: None,
            handler: None,
            last_detected: None,
            stop_requested: Arc::new(AtomicBool::new(false)),
            stats: ScanStats::default(),
            last_started_at: None,
            last_stopped_at: None,
            settle_until: None,
            logger: logger.for_component("Scanner"),
            decoder_logger: logger.for_component("Decoder"),
        })
    }
}

impl<C: CameraSource, K: Clock> ScanLoopController<C, K> {
    /// Replaces the frame scheduler
    pub fn with_scheduler(mut self, scheduler: Box<dyn FrameScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Opens the camera, binds it to `surface` and schedules the first tick
    ///
    /// Starting while a session is running changes nothing and returns
    /// `StartOutcome::AlreadyRunning`. Every new session forgets the
    /// previous duplicate-filter value.
    ///
    /// # Errors
    /// - `ScanError::Surface` if the surface cannot take a stream
    /// - `ScanError::Camera` with the acquisition failure; the controller
    ///   stays idle
    pub fn start(
        &mut self,
        surface: Box<dyn RenderSurface>,
        handler: DetectionHandler,
    ) -> Result<StartOutcome> {
        if self.state != ScanState::Idle {
            self.logger.debug("Start ignored: session already running");
            return Ok(StartOutcome::AlreadyRunning);
        }

        if !surface.is_available() {
            self.logger.error("Render surface is not available");
            return Err(ScanError::Surface(
                "surface cannot receive a video stream".to_string(),
            ));
        }

        self.settle();
        let stream = match self.camera.open(&self.settings.constraints) {
            Ok(stream) => stream,
            Err(e) => {
                self.logger.error(&format!("Failed to start camera: {}", e));
                return Err(e.into());
            }
        };

        self.stop_requested.store(false, Ordering::SeqCst);
        self.filter.clear();
        self.handler = Some(handler);

        let mut session = ScanSession::open(stream, surface, self.settings.sample_interval);
        session.pending = Some(self.scheduler.request_frame());
        let (width, height) = session.stream.natural_size();
        self.logger.info(&format!(
            "Session {:08x} started ({}x{}, sampling every {}ms)",
            session.id,
            width,
            height,
            self.settings.sample_interval.as_millis()
        ));

        self.session = Some(session);
        self.state = ScanState::Running;
        self.stats.starts += 1;
        self.last_started_at = Some(self.clock.now());
        Ok(StartOutcome::Started)
    }

    /// Tears down the running session, if any
    ///
    /// Cancels the pending tick, stops every track and detaches the
    /// surface. Calling it while idle does nothing.
    pub fn stop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        self.state = ScanState::Stopping;
        if let Some(handle) = session.pending.take() {
            self.scheduler.cancel_frame(handle);
        }

        let id = session.id;
        session.close();

        self.state = ScanState::Idle;
        self.stats.stops += 1;
        let now = self.clock.now();
        self.last_stopped_at = Some(now);
        self.settle_until = Some(now + self.settings.restart_delay);
        self.logger.info(&format!("Session {:08x} stopped", id));
    }

    /// Stops, waits the restart delay, then starts again
    pub fn restart(
        &mut self,
        surface: Box<dyn RenderSurface>,
        handler: DetectionHandler,
    ) -> Result<StartOutcome> {
        self.stop();
        self.clock.sleep(self.settings.restart_delay);
        self.start(surface, handler)
    }

    /// Runs the loop body for one fired frame handle
    pub fn tick(&mut self, handle: FrameHandle) -> TickOutcome {
        if self.state != ScanState::Running {
            return TickOutcome::Stale;
        }

        if self.stop_requested.swap(false, Ordering::SeqCst) {
            self.logger.debug("Stop requested");
            self.stop();
            return TickOutcome::Stopped;
        }

        match self.session.as_mut() {
            Some(session) if session.pending == Some(handle) => session.pending = None,
            _ => return TickOutcome::Stale,
        }

        self.stats.ticks += 1;
        let now = self.clock.now();

        match self.sample(now) {
            TickOutcome::Detected(text) => {
                self.filter.record(&text, now);
                self.last_detected = Some(text.clone());
                self.stats.detections += 1;
                self.logger.info(&format!("Detected: {}", text));

                self.stop();
                self.deliver(&text);
                TickOutcome::Detected(text)
            }
            outcome => {
                self.reschedule();
                outcome
            }
        }
    }

    /// Waits for the next frame and ticks it
    ///
    /// Returns None once nothing is scheduled, i.e. the session ended.
    pub fn poll(&mut self) -> Option<TickOutcome> {
        let handle = self.scheduler.next_frame()?;
        Some(self.tick(handle))
    }

    /// Ticks until the session ends, returning the detection that ended it
    pub fn run_until_stopped(&mut self) -> Option<String> {
        let mut detected = None;
        while let Some(outcome) = self.poll() {
            if let TickOutcome::Detected(text) = outcome {
                detected = Some(text);
            }
        }
        detected
    }

    /// Delivers a typed-in value as a detection
    ///
    /// The value is trimmed; blank input is ignored and returns false.
    /// Otherwise the session is stopped and the handler called once.
    pub fn submit_manual(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            self.logger.debug("Ignoring blank manual entry");
            return false;
        }

        self.stop();

        self.filter.record(value, self.clock.now());
        self.last_detected = Some(value.to_string());
        self.stats.manual_entries += 1;
        self.logger.info(&format!("Manual entry: {}", value));

        self.deliver(value);
        true
    }

    /// Replaces the handler used for the next detection
    pub fn set_detection_handler(&mut self, handler: DetectionHandler) {
        self.handler = Some(handler);
    }

    /// Handle for stopping the loop from elsewhere
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            requested: Arc::clone(&self.stop_requested),
        }
    }

    /// Capture devices known to the camera source
    pub fn available_devices(&mut self) -> Result<Vec<CameraInfo>> {
        Ok(self.camera.list_devices()?)
    }

    pub fn is_camera_available(&mut self) -> bool {
        match self.camera.list_devices() {
            Ok(devices) => !devices.is_empty(),
            Err(e) => {
                self.logger.warn(&format!("Device enumeration failed: {}", e));
                false
            }
        }
    }

    /// Opens and releases the preferred camera to surface access problems
    ///
    /// While a session is running the camera is already known to work.
    pub fn probe_access(&mut self) -> Result<()> {
        if self.state == ScanState::Running {
            return Ok(());
        }
        self.camera
            .probe_access(&self.settings.constraints)
            .map_err(|e| {
                self.logger.warn(&format!("Camera access check failed: {}", e));
                ScanError::from(e)
            })?;
        self.settle_until = Some(self.clock.now() + self.settings.restart_delay);
        Ok(())
    }

    /// Current state; `Stopping` while a stop request waits for the next tick
    pub fn state(&self) -> ScanState {
        if self.state == ScanState::Running && self.stop_requested.load(Ordering::SeqCst) {
            return ScanState::Stopping;
        }
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ScanState::Running
    }

    /// True while the session's stream has a live track
    pub fn is_stream_live(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.stream.is_live())
    }

    /// Last value delivered to the handler (camera or manual)
    pub fn last_detected(&self) -> Option<&str> {
        self.last_detected.as_deref()
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn last_started_at(&self) -> Option<Instant> {
        self.last_started_at
    }

    pub fn last_stopped_at(&self) -> Option<Instant> {
        self.last_stopped_at
    }

    /// Random id of the running session
    pub fn session_id(&self) -> Option<u32> {
        self.session.as_ref().map(|session| session.id)
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    fn sample(&mut self, now: Instant) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Stale;
        };

        if !session.throttle.try_acquire(now) {
            self.stats.throttled += 1;
            return TickOutcome::Throttled;
        }

        let (width, height) = session.stream.poll_size();
        if width == 0 || height == 0 {
            self.stats.not_ready += 1;
            return TickOutcome::NotReady;
        }

        if let Err(e) = session.stream.read_frame(&mut session.frame) {
            self.stats.grab_failures += 1;
            self.logger.warn(&format!("Frame grab failed: {}", e));
            return TickOutcome::GrabFailed;
        }
        session.frame.mark_captured(now);
        session.surface.present(&session.frame);
        self.stats.samples += 1;

        match self.decoder.decode(&session.frame) {
            DecodeOutcome::NotFound => {
                self.stats.misses += 1;
                TickOutcome::Missed
            }
            DecodeOutcome::Fault(reason) => {
                self.stats.faults += 1;
                self.decoder_logger.warn(&format!(
                    "{} failed on {}x{} frame: {}",
                    self.decoder.name(),
                    width,
                    height,
                    reason
                ));
                TickOutcome::Faulted
            }
            DecodeOutcome::Found(text) => {
                // A camera detection ends the session and every start clears
                // the filter, so this only fires for a value recorded while
                // the session is still running
                if self.filter.is_duplicate(&text, now) {
                    self.stats.duplicates += 1;
                    self.logger.debug(&format!("Duplicate suppressed: {}", text));
                    TickOutcome::Duplicate
                } else {
                    TickOutcome::Detected(text)
                }
            }
        }
    }

    /// Sleeps out whatever is left of the settle delay
    fn settle(&mut self) {
        let Some(until) = self.settle_until.take() else {
            return;
        };
        let now = self.clock.now();
        if until > now {
            self.logger
                .debug(&format!("Waiting {}ms for the camera to settle", (until - now).as_millis()));
            self.clock.sleep(until - now);
        }
    }

    fn reschedule(&mut self) {
        if self.state != ScanState::Running {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.pending = Some(self.scheduler.request_frame());
        }
    }

    fn deliver(&mut self, text: &str) {
        match self.handler.as_mut() {
            Some(handler) => handler(text),
            None => self
                .logger
                .warn(&format!("No detection handler set; dropped '{}'", text)),
        }
    }
}

impl<C: CameraSource, K: Clock> Drop for ScanLoopController<C, K> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::surface::HeadlessSurface;
    use logging::LogLevel;
    use media::{CameraError, CaptureConstraints, RasterFrame, TrackInfo, TrackState};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct StillStream {
        state: TrackState,
    }

    impl CaptureStream for StillStream {
        fn natural_size(&self) -> (u32, u32) {
            (8, 8)
        }

        fn read_frame(&mut self, frame: &mut RasterFrame) -> media::error::Result<()> {
            frame.resize(8, 8);
            Ok(())
        }

        fn tracks(&self) -> Vec<TrackInfo> {
            vec![TrackInfo {
                label: "Still".to_string(),
                state: self.state,
            }]
        }

        fn stop_tracks(&mut self) {
            self.state = TrackState::Ended;
        }
    }

    struct StillCamera;

    impl CameraSource for StillCamera {
        type Stream = StillStream;

        fn open(
            &mut self,
            _constraints: &CaptureConstraints,
        ) -> std::result::Result<StillStream, CameraError> {
            Ok(StillStream {
                state: TrackState::Live,
            })
        }

        fn list_devices(&mut self) -> std::result::Result<Vec<CameraInfo>, CameraError> {
            Ok(Vec::new())
        }
    }

    struct FixedDecoder;

    impl BarcodeDecoder for FixedDecoder {
        fn decode(&mut self, _frame: &RasterFrame) -> DecodeOutcome {
            DecodeOutcome::Found("EAN-123".to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_value_recorded_in_running_session_is_suppressed() {
        let clock = ManualClock::new();
        let (logger, logs) = Logger::capture(LogLevel::Debug);
        let mut controller = ScanLoopController::with_clock(
            StillCamera,
            Box::new(FixedDecoder),
            ScanSettings::default(),
            clock.clone(),
            &logger,
        )
        .unwrap();

        let delivered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&delivered);
        controller
            .start(
                Box::new(HeadlessSurface::new()),
                Box::new(move |text: &str| sink.borrow_mut().push(text.to_string())),
            )
            .unwrap();
        controller.filter.record("EAN-123", clock.now());

        assert_eq!(controller.poll(), Some(TickOutcome::Duplicate));
        assert!(controller.is_running());
        assert_eq!(controller.stats().duplicates, 1);
        assert!(delivered.borrow().is_empty());
        assert!(logs.contains("Duplicate suppressed: EAN-123"));

        // Once the window has passed the same value is new again
        clock.advance(controller.settings().debounce_window);
        assert_eq!(controller.run_until_stopped().as_deref(), Some("EAN-123"));
        assert_eq!(*delivered.borrow(), vec!["EAN-123".to_string()]);
        assert!(!controller.is_running());
    }
}
