//! Scripted fakes shared by the scan loop integration tests.
//!
//! Every fake is a cheap clone over shared state so a test can keep one
//! handle for assertions while the controller owns the other.

#![allow(dead_code)]

use logging::{LogCapture, LogLevel, Logger};
use media::{
    BarcodeDecoder, CameraError, CameraInfo, CameraSource, CaptureConstraints, CaptureStream,
    DecodeOutcome, RasterFrame, TrackInfo, TrackState,
};
use scanner::{
    Clock, FrameHandle, FrameScheduler, FrameTicker, ManualClock, RenderSurface, ScanLoopController,
    ScanSettings, StreamBinding,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const FRAME: Duration = Duration::from_micros(16_667);

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

// ---------------------------------------------------------------- camera

struct CameraState {
    fail_with: Option<CameraError>,
    size: (u32, u32),
    ready_after: u32,
    opens: u32,
    streams: Vec<Arc<Mutex<TrackState>>>,
    devices: Vec<CameraInfo>,
}

#[derive(Clone)]
pub struct FakeCamera {
    state: Arc<Mutex<CameraState>>,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CameraState {
                fail_with: None,
                size: (640, 480),
                ready_after: 0,
                opens: 0,
                streams: Vec::new(),
                devices: vec![CameraInfo::new(0, "Rear Camera".to_string(), 1280, 720)],
            })),
        }
    }

    pub fn failing(err: CameraError) -> Self {
        let camera = Self::new();
        lock(&camera.state).fail_with = Some(err);
        camera
    }

    pub fn without_devices() -> Self {
        let camera = Self::new();
        lock(&camera.state).devices.clear();
        camera
    }

    /// Natural size reported by streams opened from now on
    pub fn set_size(&self, width: u32, height: u32) {
        lock(&self.state).size = (width, height);
    }

    /// Streams opened from now on report 0x0 for their first `polls`
    /// size checks, like a camera that has not delivered a frame yet
    pub fn set_ready_after(&self, polls: u32) {
        lock(&self.state).ready_after = polls;
    }

    pub fn opens(&self) -> u32 {
        lock(&self.state).opens
    }

    /// Live tracks across every stream ever opened
    pub fn live_tracks(&self) -> usize {
        lock(&self.state)
            .streams
            .iter()
            .filter(|track| *lock(&***track) == TrackState::Live)
            .count()
    }
}

pub struct FakeStream {
    size: (u32, u32),
    ready_after: u32,
    polls: u32,
    track: Arc<Mutex<TrackState>>,
}

impl CaptureStream for FakeStream {
    fn natural_size(&self) -> (u32, u32) {
        if self.polls <= self.ready_after && self.ready_after > 0 {
            (0, 0)
        } else {
            self.size
        }
    }

    fn poll_size(&mut self) -> (u32, u32) {
        self.polls += 1;
        self.natural_size()
    }

    fn read_frame(&mut self, frame: &mut RasterFrame) -> media::error::Result<()> {
        frame.resize(self.size.0, self.size.1);
        Ok(())
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        vec![TrackInfo {
            label: "Rear Camera".to_string(),
            state: *lock(&*self.track),
        }]
    }

    fn stop_tracks(&mut self) {
        *lock(&*self.track) = TrackState::Ended;
    }
}

impl CameraSource for FakeCamera {
    type Stream = FakeStream;

    fn open(&mut self, _constraints: &CaptureConstraints) -> Result<FakeStream, CameraError> {
        let mut state = lock(&self.state);
        if let Some(err) = state.fail_with.clone() {
            return Err(err);
        }
        state.opens += 1;
        let track = Arc::new(Mutex::new(TrackState::Live));
        state.streams.push(Arc::clone(&track));
        Ok(FakeStream {
            size: state.size,
            ready_after: state.ready_after,
            polls: 0,
            track,
        })
    }

    fn list_devices(&mut self) -> Result<Vec<CameraInfo>, CameraError> {
        Ok(lock(&self.state).devices.clone())
    }
}

// ---------------------------------------------------------------- decoder

struct DecoderState {
    script: VecDeque<DecodeOutcome>,
    fallback: DecodeOutcome,
    calls: Vec<Instant>,
}

#[derive(Clone)]
pub struct ScriptedDecoder {
    state: Arc<Mutex<DecoderState>>,
}

impl ScriptedDecoder {
    /// Returns `outcome` on every call
    pub fn always(outcome: DecodeOutcome) -> Self {
        Self::scripted(Vec::new(), outcome)
    }

    /// Plays `script` in order, then `fallback` forever
    pub fn scripted(script: Vec<DecodeOutcome>, fallback: DecodeOutcome) -> Self {
        Self {
            state: Arc::new(Mutex::new(DecoderState {
                script: script.into(),
                fallback,
                calls: Vec::new(),
            })),
        }
    }

    pub fn set_fallback(&self, outcome: DecodeOutcome) {
        lock(&self.state).fallback = outcome;
    }

    pub fn calls(&self) -> usize {
        lock(&self.state).calls.len()
    }

    /// Capture time of every frame handed to the decoder
    pub fn call_times(&self) -> Vec<Instant> {
        lock(&self.state).calls.clone()
    }
}

impl BarcodeDecoder for ScriptedDecoder {
    fn decode(&mut self, frame: &RasterFrame) -> DecodeOutcome {
        let mut state = lock(&self.state);
        if let Some(at) = frame.captured_at() {
            state.calls.push(at);
        }
        match state.script.pop_front() {
            Some(outcome) => outcome,
            None => state.fallback.clone(),
        }
    }

    fn name(&self) -> &str {
        "ScriptedDecoder"
    }
}

// ---------------------------------------------------------------- surface

#[derive(Default)]
struct SurfaceState {
    unavailable: bool,
    attached: u32,
    detached: u32,
    presented: u32,
    binding: Option<StreamBinding>,
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        let surface = Self::default();
        lock(&surface.state).unavailable = true;
        surface
    }

    pub fn boxed(&self) -> Box<dyn RenderSurface> {
        Box::new(self.clone())
    }

    pub fn attached(&self) -> u32 {
        lock(&self.state).attached
    }

    pub fn detached(&self) -> u32 {
        lock(&self.state).detached
    }

    pub fn presented(&self) -> u32 {
        lock(&self.state).presented
    }

    pub fn binding(&self) -> Option<StreamBinding> {
        lock(&self.state).binding.clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn is_available(&self) -> bool {
        !lock(&self.state).unavailable
    }

    fn attach(&mut self, binding: &StreamBinding) {
        let mut state = lock(&self.state);
        state.attached += 1;
        state.binding = Some(binding.clone());
    }

    fn present(&mut self, _frame: &RasterFrame) {
        lock(&self.state).presented += 1;
    }

    fn detach(&mut self) {
        let mut state = lock(&self.state);
        state.detached += 1;
        state.binding = None;
    }
}

// ---------------------------------------------------------------- scheduler

#[derive(Default)]
pub struct SchedulerLog {
    pub requested: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
}

/// Frame ticker that records every request and cancellation
pub struct RecordingScheduler {
    inner: FrameTicker<ManualClock>,
    log: Arc<Mutex<SchedulerLog>>,
}

impl RecordingScheduler {
    pub fn new(clock: ManualClock) -> (Self, Arc<Mutex<SchedulerLog>>) {
        let log = Arc::new(Mutex::new(SchedulerLog::default()));
        let scheduler = Self {
            inner: FrameTicker::new(clock, FRAME),
            log: Arc::clone(&log),
        };
        (scheduler, log)
    }
}

impl FrameScheduler for RecordingScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = self.inner.request_frame();
        lock(&self.log).requested.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        lock(&self.log).cancelled.push(handle);
        self.inner.cancel_frame(handle);
    }

    fn next_frame(&mut self) -> Option<FrameHandle> {
        self.inner.next_frame()
    }
}

// ---------------------------------------------------------------- harness

/// What the detection handler saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub text: String,
    pub live_tracks: usize,
    pub at: Instant,
}

/// Records every delivery along with the camera state at that moment
#[derive(Clone)]
pub struct Deliveries {
    inner: Rc<RefCell<Vec<Delivery>>>,
    camera: FakeCamera,
    clock: ManualClock,
}

impl Deliveries {
    pub fn new(camera: &FakeCamera, clock: &ManualClock) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Vec::new())),
            camera: camera.clone(),
            clock: clock.clone(),
        }
    }

    pub fn handler(&self) -> scanner::DetectionHandler {
        let this = self.clone();
        Box::new(move |text: &str| {
            this.inner.borrow_mut().push(Delivery {
                text: text.to_string(),
                live_tracks: this.camera.live_tracks(),
                at: this.clock.now(),
            });
        })
    }

    pub fn all(&self) -> Vec<Delivery> {
        self.inner.borrow().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.inner.borrow().iter().map(|d| d.text.clone()).collect()
    }
}

pub struct Harness {
    pub controller: ScanLoopController<FakeCamera, ManualClock>,
    pub camera: FakeCamera,
    pub decoder: ScriptedDecoder,
    pub surface: RecordingSurface,
    pub clock: ManualClock,
    pub deliveries: Deliveries,
    pub logs: LogCapture,
}

impl Harness {
    pub fn new(camera: FakeCamera, decoder: ScriptedDecoder) -> Self {
        let clock = ManualClock::new();
        let (logger, logs) = Logger::capture(LogLevel::Debug);
        let controller = ScanLoopController::with_clock(
            camera.clone(),
            Box::new(decoder.clone()),
            ScanSettings::default(),
            clock.clone(),
            &logger,
        )
        .expect("default settings are valid");

        Self {
            deliveries: Deliveries::new(&camera, &clock),
            controller,
            camera,
            decoder,
            surface: RecordingSurface::new(),
            clock,
            logs,
        }
    }

    pub fn start(&mut self) -> scanner::Result<scanner::StartOutcome> {
        let surface = self.surface.boxed();
        let handler = self.deliveries.handler();
        self.controller.start(surface, handler)
    }

    pub fn restart(&mut self) -> scanner::Result<scanner::StartOutcome> {
        let surface = self.surface.boxed();
        let handler = self.deliveries.handler();
        self.controller.restart(surface, handler)
    }

    /// Polls until `duration` of clock time has passed or the loop ends
    pub fn run_for(&mut self, duration: Duration) -> Vec<scanner::TickOutcome> {
        let deadline = self.clock.now() + duration;
        let mut outcomes = Vec::new();
        while self.clock.now() < deadline {
            match self.controller.poll() {
                Some(outcome) => outcomes.push(outcome),
                None => break,
            }
        }
        outcomes
    }
}
