// In-memory host and page doubles for driving the session controller.

#![allow(dead_code)]

use mic_listen::audio::{
    AnalyzerConfig, CaptureConstraints, ControlState, DeviceDescriptor, DeviceOption, HostEnvironment,
    HostError, PageOrigin, PresentationSurface, StatusMessage,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug)]
pub struct FakeStream {
    pub id: u64,
}

#[derive(Debug)]
pub struct FakeAnalyzer {
    pub stream_id: u64,
}

#[derive(Default)]
pub struct HostBehavior {
    pub enumerate_error: Option<HostError>,
    /// Fails the first `acquire_failures` acquisitions
    pub acquire_error: Option<HostError>,
    pub acquire_failures: usize,
    pub analyzer_error: Option<HostError>,
    pub play_error: Option<HostError>,
    pub release_error: Option<HostError>,
    pub close_error: Option<HostError>,
    pub detach_error: Option<HostError>,
    pub attach_error: Option<HostError>,
    /// When set, acquisitions wait for a notification
    pub acquire_gate: Option<Arc<Notify>>,
    /// When set, `play` waits for a notification
    pub play_gate: Option<Arc<Notify>>,
}

#[derive(Default)]
struct HostInner {
    devices: Vec<DeviceDescriptor>,
    behavior: HostBehavior,
    next_stream_id: u64,
    open_streams: HashSet<u64>,
    open_analyzers: usize,
    acquire_calls: Vec<CaptureConstraints>,
    enumerate_calls: usize,
    release_calls: usize,
    playback_attached: bool,
    spectrum_value: u8,
}

pub struct FakeHost {
    supported: bool,
    origin: PageOrigin,
    inner: Mutex<HostInner>,
}

impl FakeHost {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            supported: true,
            origin: PageOrigin::new("https:", "mesh.example.com"),
            inner: Mutex::new(HostInner {
                devices,
                ..Default::default()
            }),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_origin(protocol: &str, hostname: &str) -> Self {
        Self {
            origin: PageOrigin::new(protocol, hostname),
            ..Self::new(Vec::new())
        }
    }

    pub fn configure(&self, f: impl FnOnce(&mut HostBehavior)) {
        f(&mut self.inner.lock().unwrap().behavior);
    }

    pub fn set_devices(&self, devices: Vec<DeviceDescriptor>) {
        self.inner.lock().unwrap().devices = devices;
    }

    pub fn set_spectrum(&self, value: u8) {
        self.inner.lock().unwrap().spectrum_value = value;
    }

    pub fn open_streams(&self) -> usize {
        self.inner.lock().unwrap().open_streams.len()
    }

    pub fn open_analyzers(&self) -> usize {
        self.inner.lock().unwrap().open_analyzers
    }

    pub fn acquire_calls(&self) -> Vec<CaptureConstraints> {
        self.inner.lock().unwrap().acquire_calls.clone()
    }

    pub fn enumerate_calls(&self) -> usize {
        self.inner.lock().unwrap().enumerate_calls
    }

    pub fn release_calls(&self) -> usize {
        self.inner.lock().unwrap().release_calls
    }

    pub fn playback_attached(&self) -> bool {
        self.inner.lock().unwrap().playback_attached
    }
}

#[async_trait::async_trait]
impl HostEnvironment for FakeHost {
    type Stream = FakeStream;
    type Analyzer = FakeAnalyzer;

    fn capture_supported(&self) -> bool {
        self.supported
    }

    fn page_origin(&self) -> PageOrigin {
        self.origin.clone()
    }

    async fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.enumerate_calls += 1;
        match inner.behavior.enumerate_error.clone() {
            Some(e) => Err(e),
            None => Ok(inner.devices.clone()),
        }
    }

    async fn acquire_stream(&self, constraints: &CaptureConstraints) -> Result<FakeStream, HostError> {
        let gate = {
            let mut inner = self.inner.lock().unwrap();
            inner.acquire_calls.push(constraints.clone());
            inner.behavior.acquire_gate.clone()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut inner = self.inner.lock().unwrap();
        if inner.behavior.acquire_failures > 0 {
            inner.behavior.acquire_failures -= 1;
            return Err(inner
                .behavior
                .acquire_error
                .clone()
                .unwrap_or(HostError::PermissionDenied));
        }

        inner.next_stream_id += 1;
        let id = inner.next_stream_id;
        inner.open_streams.insert(id);
        Ok(FakeStream { id })
    }

    fn release_stream(&self, stream: &FakeStream) -> Result<(), HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.release_calls += 1;
        inner.open_streams.remove(&stream.id);
        match inner.behavior.release_error.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn create_analyzer(&self, stream: &FakeStream, config: &AnalyzerConfig) -> Result<FakeAnalyzer, HostError> {
        assert_eq!(config.fft_size, 256);
        let mut inner = self.inner.lock().unwrap();
        if let Some(e) = inner.behavior.analyzer_error.clone() {
            return Err(e);
        }
        inner.open_analyzers += 1;
        Ok(FakeAnalyzer { stream_id: stream.id })
    }

    fn read_spectrum(&self, _analyzer: &FakeAnalyzer, bins: &mut [u8]) {
        let value = self.inner.lock().unwrap().spectrum_value;
        bins.fill(value);
    }

    async fn close_analyzer(&self, _analyzer: FakeAnalyzer) -> Result<(), HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.open_analyzers = inner.open_analyzers.saturating_sub(1);
        match inner.behavior.close_error.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn attach_playback(&self, _stream: &FakeStream) -> Result<(), HostError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(e) = inner.behavior.attach_error.clone() {
            return Err(e);
        }
        inner.playback_attached = true;
        Ok(())
    }

    async fn play(&self) -> Result<(), HostError> {
        let gate = self.inner.lock().unwrap().behavior.play_gate.clone();

        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.inner.lock().unwrap().behavior.play_error.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn detach_playback(&self) -> Result<(), HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.playback_attached = false;
        match inner.behavior.detach_error.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn next_frame(&self) {
        tokio::time::sleep(Duration::from_millis(16)).await;
    }
}

/// Last-written state of every page element
#[derive(Debug, Clone)]
pub struct SurfaceView {
    pub options: Vec<DeviceOption>,
    pub controls: ControlState,
    pub meter_visible: bool,
    pub meter_level: f32,
    pub meter_updates: usize,
    pub playback_visible: bool,
    pub info_text: String,
    pub info_visible: bool,
    pub status: Option<StatusMessage>,
    pub status_visible: bool,
    pub status_history: Vec<StatusMessage>,
}

impl Default for SurfaceView {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            controls: ControlState::idle(),
            meter_visible: false,
            meter_level: 0.0,
            meter_updates: 0,
            playback_visible: false,
            info_text: String::new(),
            info_visible: false,
            status: None,
            status_visible: false,
            status_history: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    view: Mutex<SurfaceView>,
}

impl RecordingSurface {
    pub fn view(&self) -> SurfaceView {
        self.view.lock().unwrap().clone()
    }

    pub fn option_labels(&self) -> Vec<String> {
        self.view().options.into_iter().map(|o| o.label).collect()
    }

    pub fn status_text(&self) -> Option<String> {
        self.view().status.map(|s| s.text)
    }
}

impl PresentationSurface for RecordingSurface {
    fn set_device_options(&self, options: Vec<DeviceOption>) {
        self.view.lock().unwrap().options = options;
    }

    fn set_controls(&self, controls: ControlState) {
        self.view.lock().unwrap().controls = controls;
    }

    fn set_meter_visible(&self, visible: bool) {
        self.view.lock().unwrap().meter_visible = visible;
    }

    fn set_meter_level(&self, percent: f32) {
        let mut view = self.view.lock().unwrap();
        view.meter_level = percent;
        view.meter_updates += 1;
    }

    fn set_playback_visible(&self, visible: bool) {
        self.view.lock().unwrap().playback_visible = visible;
    }

    fn set_info_text(&self, text: &str) {
        self.view.lock().unwrap().info_text = text.to_string();
    }

    fn set_info_visible(&self, visible: bool) {
        self.view.lock().unwrap().info_visible = visible;
    }

    fn show_status(&self, status: &StatusMessage) {
        let mut view = self.view.lock().unwrap();
        view.status = Some(status.clone());
        view.status_visible = true;
        view.status_history.push(status.clone());
    }

    fn hide_status(&self) {
        self.view.lock().unwrap().status_visible = false;
    }
}

pub fn two_devices() -> Vec<DeviceDescriptor> {
    vec![
        DeviceDescriptor::audio_input("a", "Mic A"),
        DeviceDescriptor::audio_input("b", ""),
    ]
}
