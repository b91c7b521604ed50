//! AvatarApp struct definition and construction.

use std::sync::mpsc;
use std::time::Instant;

use tokio::sync::watch;

use aria_audio::{AudioManager, AudioOutput};
use aria_common::{EventBus, Viewport};
use aria_config::AriaConfig;
use aria_engine::{FrameOrchestrator, FrameTimer, Stage};

use super::types::{ConversationEvent, DEFAULT_VIEWPORT, EVENT_BUS_CAPACITY};

/// The headless avatar host.
pub struct AvatarApp {
    pub(super) config: AriaConfig,
    pub(super) stage: Stage,
    pub(super) orchestrator: FrameOrchestrator,
    pub(super) audio: AudioManager<Box<dyn AudioOutput>>,
    pub(super) timer: FrameTimer,
    pub(super) bus: EventBus,
    pub(super) viewport: Viewport,
    /// Origin of the host clock shared by audio and retry deadlines.
    pub(super) clock: Instant,

    pub(super) conversation_tx: Option<mpsc::Sender<String>>,
    pub(super) conversation_rx: Option<mpsc::Receiver<ConversationEvent>>,
    /// A user message is in flight.
    pub(super) awaiting_reply: bool,

    pub(super) config_rx: Option<watch::Receiver<AriaConfig>>,
    pub(super) input_closed: bool,
    pub(super) running: bool,
}

impl AvatarApp {
    pub fn new(config: AriaConfig) -> Self {
        let output = super::audio::select_output(&config.audio);
        Self {
            stage: Stage::new(),
            orchestrator: FrameOrchestrator::new(&config),
            audio: AudioManager::new(&config.audio, &config.lipsync, output),
            timer: FrameTimer::new(config.performance.frame_budget_ms),
            bus: EventBus::new(EVENT_BUS_CAPACITY),
            viewport: DEFAULT_VIEWPORT,
            clock: Instant::now(),
            conversation_tx: None,
            conversation_rx: None,
            awaiting_reply: false,
            config_rx: None,
            input_closed: false,
            running: false,
            config,
        }
    }

    /// Follow live config reloads.
    pub fn with_config_updates(mut self, rx: watch::Receiver<AriaConfig>) -> Self {
        self.config_rx = Some(rx);
        self
    }

    /// Seconds since the host started.
    pub(super) fn now(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Whether the input surface should accept a new message.
    pub fn accepts_input(&self) -> bool {
        !self.awaiting_reply && !self.audio.is_playing()
    }
}
