use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::MonitorConfig;
use super::enumerator::request_devices;
use super::error::{HostError, SessionError, SessionResult};
use super::host::{CaptureConstraints, DeviceDescriptor, HostEnvironment};
use super::level::LevelMeter;
use super::playback::{route_playback, PlaybackState};
use super::render::render_device_list;
use super::state::{SessionPhase, SessionSnapshot, SessionState};
use super::status::StatusBanner;
use super::surface::{ControlState, PresentationSurface};

const MSG_UNSUPPORTED: &str = "Your browser does not support microphone access";
const MSG_INSECURE: &str = "HTTPS is required for microphone access";
const MSG_LOADING: &str = "Loading microphones...";
const MSG_LOAD_FAILED: &str = "Failed to load microphones. Please check permissions.";
const MSG_SELECT_FIRST: &str = "Please select a microphone first";
const MSG_REFRESH_BUSY: &str = "Stop listening before refreshing microphones";
const MSG_ALREADY_LISTENING: &str = "Already listening to a microphone";
const MSG_STARTING: &str = "Starting audio stream...";
const MSG_LISTENING: &str = "Listening to microphone...";
const MSG_START_FAILED: &str = "Failed to start listening. Please check microphone permissions.";
const MSG_STOPPED: &str = "Stopped listening";
const MSG_STOP_FAILED: &str = "Error stopping audio stream";

/// Drives one page's microphone monitoring session
///
/// Owns the session state and mediates between the host environment
/// (devices, streams, analyzer, playback) and the presentation surface.
/// `refresh_devices`, `start` and `stop` are serialized by an internal
/// operation gate: a `stop` issued while `start` is still awaiting the host
/// runs as soon as that start settles.
pub struct SessionController<H: HostEnvironment, S: PresentationSurface> {
    /// Unique per controller instance, used in logs
    session_id: String,

    config: MonitorConfig,

    host: Arc<H>,

    surface: Arc<S>,

    status: StatusBanner<S>,

    state: Arc<Mutex<SessionState<H>>>,

    /// Liveness flag polled by the level meter
    is_listening: Arc<AtomicBool>,

    /// Handle for the level meter task
    meter_task_handle: Mutex<Option<JoinHandle<()>>>,

    /// Held for the whole of every lifecycle operation
    operation_gate: Mutex<()>,
}

impl<H: HostEnvironment, S: PresentationSurface> SessionController<H, S> {
    /// Create a controller without touching the host or the page
    pub fn new(host: Arc<H>, surface: Arc<S>, config: MonitorConfig) -> Self {
        let status = StatusBanner::new(Arc::clone(&surface), config.status_auto_hide);

        Self {
            session_id: format!("mic-{}", uuid::Uuid::new_v4()),
            config,
            host,
            surface,
            status,
            state: Arc::new(Mutex::new(SessionState::new())),
            is_listening: Arc::new(AtomicBool::new(false)),
            meter_task_handle: Mutex::new(None),
            operation_gate: Mutex::new(()),
        }
    }

    /// Check the environment, then build the controller and load devices
    ///
    /// An unsupported or insecure environment leaves a persistent error on
    /// the page and no controller. A failed initial device load is reported
    /// but does not prevent construction.
    pub async fn initialize(host: Arc<H>, surface: Arc<S>, config: MonitorConfig) -> SessionResult<Self> {
        let reason = if !host.capture_supported() {
            Some(MSG_UNSUPPORTED)
        } else if !host.page_origin().is_secure() {
            Some(MSG_INSECURE)
        } else {
            None
        };

        if let Some(reason) = reason {
            StatusBanner::new(Arc::clone(&surface), config.status_auto_hide).error(reason);
            return Err(HostError::EnvironmentUnsupported(reason.to_string()).into());
        }

        let controller = Self::new(host, surface, config);
        info!("Initialized microphone session {}", controller.session_id);

        controller.reset_ui();

        if let Err(e) = controller.refresh_devices().await {
            warn!("Initial device load failed: {}", e);
        }

        Ok(controller)
    }

    /// Re-enumerate microphones and re-render the selector
    ///
    /// On failure the previous device list is kept.
    pub async fn refresh_devices(&self) -> SessionResult<usize> {
        let _gate = self.operation_gate.lock().await;

        if self.state.lock().await.phase != SessionPhase::Idle {
            warn!("Device refresh refused while a session is active");
            self.status.error(MSG_REFRESH_BUSY);
            return Err(SessionError::Busy);
        }

        self.status.info(MSG_LOADING);

        match request_devices(self.host.as_ref()).await {
            Ok(devices) => {
                let count = devices.len();
                self.surface.set_device_options(render_device_list(&devices));
                self.state.lock().await.known_devices = devices;

                self.status.success(&format!("Found {} microphone(s)", count));
                Ok(count)
            }
            Err(e) => {
                error!("Error loading microphones: {}", e);
                self.status.error(MSG_LOAD_FAILED);
                Err(e)
            }
        }
    }

    /// Start monitoring the given device
    ///
    /// If the returned future is dropped before it completes, whatever was
    /// already opened is released and the session returns to idle.
    pub async fn start(&self, device_id: &str) -> SessionResult<PlaybackState> {
        let device_id = device_id.trim();
        let _gate = self.operation_gate.lock().await;

        {
            let mut state = self.state.lock().await;

            if state.phase != SessionPhase::Idle {
                warn!("Listening session already active");
                self.status.error(MSG_ALREADY_LISTENING);
                return Err(SessionError::AlreadyListening);
            }

            if device_id.is_empty() {
                self.status.error(MSG_SELECT_FIRST);
                return Err(SessionError::NoDeviceSelected);
            }

            state.phase = SessionPhase::Starting;
        }

        // Dropped before the gate, so rollback finishes while still exclusive
        let mut pending = PendingStart::new(Arc::clone(&self.host), Arc::clone(&self.state));

        info!("Starting listening session {} on device {}", self.session_id, device_id);
        self.status.info(MSG_STARTING);

        let playback = match self.open_pipeline(device_id, &mut pending).await {
            Ok(playback) => playback,
            Err(e) => {
                error!("Error starting audio stream: {}", e);
                pending.rollback().await;
                self.status.error(MSG_START_FAILED);
                return Err(e);
            }
        };

        {
            let mut state = self.state.lock().await;
            pending.commit(&mut *state, device_id);
        }
        self.is_listening.store(true, Ordering::SeqCst);

        self.surface.set_controls(ControlState::listening());
        self.surface.set_meter_visible(true);
        self.surface.set_playback_visible(true);
        self.surface.set_info_visible(true);

        self.status.success(MSG_LISTENING);

        let meter = LevelMeter::spawn(
            Arc::clone(&self.host),
            Arc::clone(&self.surface),
            Arc::clone(&self.state),
            Arc::clone(&self.is_listening),
            self.config.analyzer,
        );

        {
            let mut handle = self.meter_task_handle.lock().await;
            *handle = Some(meter);
        }

        info!("Listening session started ({:?})", playback);

        Ok(playback)
    }

    /// Stop monitoring and reset the page
    ///
    /// A no-op apart from the UI reset when already idle. Every teardown step
    /// runs even if an earlier one fails; the state is always fully cleared.
    pub async fn stop(&self) -> SessionResult<()> {
        let _gate = self.operation_gate.lock().await;

        // Signal the meter first so it stops touching the analyzer
        self.is_listening.store(false, Ordering::SeqCst);

        {
            let mut handle = self.meter_task_handle.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Level meter task panicked: {}", e);
                }
            }
        }

        let (stream, analyzer, was_active) = {
            let mut state = self.state.lock().await;
            let was_active = state.phase != SessionPhase::Idle
                || state.active_stream.is_some()
                || state.analyzer.is_some();

            if was_active {
                state.phase = SessionPhase::Stopping;
            }

            (state.active_stream.take(), state.analyzer.take(), was_active)
        };

        let mut failures = Vec::new();

        if was_active {
            info!("Stopping listening session {}", self.session_id);

            if let Some(stream) = stream.as_ref() {
                if let Err(e) = self.host.release_stream(stream) {
                    error!("Failed to release capture stream: {}", e);
                    failures.push(e);
                }
            }

            if let Some(analyzer) = analyzer {
                if let Err(e) = self.host.close_analyzer(analyzer).await {
                    error!("Failed to close analysis context: {}", e);
                    failures.push(e);
                }
            }

            if let Err(e) = self.host.detach_playback() {
                error!("Failed to detach playback: {}", e);
                failures.push(e);
            }
        } else {
            debug!("Stop requested while idle");
        }

        drop(stream);

        {
            let mut state = self.state.lock().await;
            state.phase = SessionPhase::Idle;
            state.selected_device_id = None;
        }

        self.reset_ui();

        if failures.is_empty() {
            self.status.info(MSG_STOPPED);
            Ok(())
        } else {
            self.status.error(MSG_STOP_FAILED);
            Err(SessionError::Teardown(failures))
        }
    }

    /// Whether a session is currently listening
    pub fn is_listening(&self) -> bool {
        self.is_listening.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Devices from the last successful enumeration
    pub async fn known_devices(&self) -> Vec<DeviceDescriptor> {
        self.state.lock().await.known_devices.clone()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Acquire the stream and build analyzer + playback
    ///
    /// Every handle is parked in `pending` as soon as it exists so an early
    /// return or cancellation can release it.
    async fn open_pipeline(
        &self,
        device_id: &str,
        pending: &mut PendingStart<H>,
    ) -> SessionResult<PlaybackState> {
        let stream = self
            .host
            .acquire_stream(&CaptureConstraints::exact(device_id))
            .await?;

        let analyzer = self
            .host
            .create_analyzer(pending.stream.insert(stream), &self.config.analyzer)?;
        pending.analyzer = Some(analyzer);

        let Some(stream) = pending.stream.as_ref() else {
            return Err(HostError::Other("capture stream missing".to_string()).into());
        };

        Ok(route_playback(self.host.as_ref(), self.surface.as_ref(), stream).await?)
    }

    fn reset_ui(&self) {
        self.surface.set_controls(ControlState::idle());
        self.surface.set_meter_visible(false);
        self.surface.set_playback_visible(false);
        self.surface.set_info_visible(false);
        self.surface.set_meter_level(0.0);
    }
}

/// Handles opened by an in-flight `start`, released unless committed
struct PendingStart<H: HostEnvironment> {
    host: Arc<H>,
    state: Arc<Mutex<SessionState<H>>>,
    stream: Option<H::Stream>,
    analyzer: Option<H::Analyzer>,
    armed: bool,
}

impl<H: HostEnvironment> PendingStart<H> {
    fn new(host: Arc<H>, state: Arc<Mutex<SessionState<H>>>) -> Self {
        Self {
            host,
            state,
            stream: None,
            analyzer: None,
            armed: true,
        }
    }

    /// Hand the opened handles to the session and mark it listening
    fn commit(&mut self, state: &mut SessionState<H>, device_id: &str) {
        state.active_stream = self.stream.take();
        state.analyzer = self.analyzer.take();
        state.selected_device_id = Some(device_id.to_string());
        state.phase = SessionPhase::Listening;
        self.armed = false;
    }

    /// Release everything opened so far after a failed start
    async fn rollback(&mut self) {
        if let Some(analyzer) = self.analyzer.take() {
            if let Err(e) = self.host.close_analyzer(analyzer).await {
                warn!("Failed to close analyzer during rollback: {}", e);
            }
        }

        self.release_stream();
        reset_starting(&mut *self.state.lock().await);
        self.armed = false;
    }

    fn release_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = self.host.release_stream(&stream) {
                warn!("Failed to release stream during rollback: {}", e);
            }
            if let Err(e) = self.host.detach_playback() {
                warn!("Failed to detach playback during rollback: {}", e);
            }
        }
    }
}

impl<H: HostEnvironment> Drop for PendingStart<H> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        warn!("Start interrupted before completing, releasing partial session");

        self.release_stream();

        let runtime = tokio::runtime::Handle::try_current().ok();

        if let Some(analyzer) = self.analyzer.take() {
            match runtime.as_ref() {
                Some(runtime) => {
                    let host = Arc::clone(&self.host);
                    runtime.spawn(async move {
                        if let Err(e) = host.close_analyzer(analyzer).await {
                            warn!("Failed to close analyzer after interrupted start: {}", e);
                        }
                    });
                }
                None => warn!("No runtime available to close the analyzer"),
            }
        }

        match self.state.try_lock() {
            Ok(mut state) => reset_starting(&mut *state),
            Err(_) => {
                if let Some(runtime) = runtime.as_ref() {
                    let state = Arc::clone(&self.state);
                    runtime.spawn(async move {
                        reset_starting(&mut *state.lock().await);
                    });
                }
            }
        }
    }
}

fn reset_starting<H: HostEnvironment>(state: &mut SessionState<H>) {
    if state.phase == SessionPhase::Starting {
        state.phase = SessionPhase::Idle;
        state.selected_device_id = None;
    }
}
