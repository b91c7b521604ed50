//! Audio lifecycle state machine.
//!
//! Every change goes through [`AudioManager::handle`]. Side effects
//! (decode, start, teardown) may queue follow-up events, which are
//! processed before `handle` returns. The frame loop only reads
//! [`AudioManager::is_playing`] and the live volume.

use std::collections::VecDeque;
use std::sync::Arc;

use aria_common::AudioError;
use aria_config::schema::{AudioConfig, LipSyncConfig};
use aria_engine::VolumeSource;

use crate::analyser::SpectrumAnalyser;
use crate::decode::{decode, DecodedAudio};
use crate::output::{apply_gain, AudioOutput};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioState {
    Idle,
    Loading,
    Playing,
    /// Playback was rejected; one retry is armed until `deadline`.
    AwaitingGesture { deadline: f64 },
    Ended,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    PayloadReceived(Vec<u8>),
    PlaySucceeded,
    PlayRejected(AudioError),
    UserInteracted,
    RetryTimedOut,
    PlaybackEnded,
    DecodeFailed(AudioError),
    TeardownRequested,
}

/// Notices for the host: mouth/blink reset on `Stopped`, UI gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioNotice {
    Started,
    Stopped,
}

/// The decode graph of one payload: decoded clip plus the analyser tapped
/// after gain.
struct Session {
    audio: Arc<DecodedAudio>,
    analyser: SpectrumAnalyser,
    scratch: Vec<f32>,
}

pub struct AudioManager<O: AudioOutput> {
    state: AudioState,
    output: O,
    session: Option<Session>,
    retry_armed: bool,
    gain: f32,
    autoplay_timeout: f64,
    lipsync: LipSyncConfig,
    now: f64,
    volume: f32,
    queue: VecDeque<AudioEvent>,
    notices: Vec<AudioNotice>,
}

impl<O: AudioOutput> AudioManager<O> {
    pub fn new(audio: &AudioConfig, lipsync: &LipSyncConfig, output: O) -> Self {
        Self {
            state: AudioState::Idle,
            output,
            session: None,
            retry_armed: false,
            gain: audio.gain as f32,
            autoplay_timeout: audio.autoplay_timeout,
            lipsync: lipsync.clone(),
            now: 0.0,
            volume: 0.0,
            queue: VecDeque::new(),
            notices: Vec::new(),
        }
    }

    /// Retune gain, timeout and analyser settings. The analyser of a
    /// session already playing keeps its settings.
    pub fn apply_config(&mut self, audio: &AudioConfig, lipsync: &LipSyncConfig) {
        self.gain = audio.gain as f32;
        self.output.set_gain(self.gain);
        self.autoplay_timeout = audio.autoplay_timeout;
        self.lipsync = lipsync.clone();
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == AudioState::Playing
    }

    pub fn retry_armed(&self) -> bool {
        self.retry_armed
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Notices produced since the last call.
    pub fn drain_notices(&mut self) -> Vec<AudioNotice> {
        std::mem::take(&mut self.notices)
    }

    /// The single transition function.
    pub fn handle(&mut self, event: AudioEvent, now: f64) {
        self.now = now;
        self.queue.push_back(event);
        while let Some(event) = self.queue.pop_front() {
            self.step(event);
        }
    }

    /// Turn output completion and retry deadlines into events.
    pub fn poll(&mut self, now: f64) {
        self.now = now;
        match self.state {
            AudioState::Playing if self.output.is_finished(now) => {
                self.handle(AudioEvent::PlaybackEnded, now);
            }
            AudioState::AwaitingGesture { deadline } if now >= deadline => {
                self.handle(AudioEvent::RetryTimedOut, now);
            }
            _ => {}
        }
    }

    fn step(&mut self, event: AudioEvent) {
        let before = self.state;
        match (self.state, event) {
            (_, AudioEvent::PayloadReceived(bytes)) => {
                self.teardown();
                self.state = AudioState::Loading;
                match decode(bytes) {
                    Ok(audio) => {
                        self.session = Some(Session {
                            audio: Arc::new(audio),
                            analyser: SpectrumAnalyser::from_config(&self.lipsync),
                            scratch: Vec::new(),
                        });
                        self.attempt_play();
                    }
                    Err(e) => self.queue.push_back(AudioEvent::DecodeFailed(e)),
                }
            }

            (AudioState::Loading | AudioState::AwaitingGesture { .. }, AudioEvent::PlaySucceeded) => {
                self.retry_armed = false;
                self.state = AudioState::Playing;
                self.notices.push(AudioNotice::Started);
            }

            (AudioState::Loading, AudioEvent::PlayRejected(e)) => {
                let deadline = self.now + self.autoplay_timeout;
                tracing::info!(error = %e, timeout = self.autoplay_timeout, "playback blocked, waiting for a user gesture");
                self.retry_armed = true;
                self.state = AudioState::AwaitingGesture { deadline };
            }

            (AudioState::AwaitingGesture { .. }, AudioEvent::PlayRejected(e)) => {
                tracing::warn!(error = %e, "retry after gesture was rejected");
                self.fail();
            }

            (AudioState::AwaitingGesture { .. }, AudioEvent::UserInteracted) => {
                self.output.user_gesture();
                if self.retry_armed {
                    self.retry_armed = false;
                    self.attempt_play();
                }
            }

            (_, AudioEvent::UserInteracted) => self.output.user_gesture(),

            (AudioState::AwaitingGesture { .. }, AudioEvent::RetryTimedOut) => {
                tracing::warn!("no user gesture before the retry deadline, giving up");
                self.fail();
            }

            (AudioState::Playing, AudioEvent::PlaybackEnded) => {
                self.teardown();
                self.state = AudioState::Ended;
            }

            (AudioState::Loading, AudioEvent::DecodeFailed(e)) => {
                tracing::warn!(error = %e, "speech payload could not be decoded");
                self.fail();
            }

            (_, AudioEvent::TeardownRequested) => {
                self.teardown();
                self.state = AudioState::Idle;
            }

            (state, event) => {
                tracing::debug!(?state, ?event, "audio event ignored");
            }
        }
        if self.state != before {
            tracing::debug!(from = ?before, to = ?self.state, "audio state");
        }
    }

    fn attempt_play(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let event = match self.output.start(Arc::clone(&session.audio), self.gain, self.now) {
            Ok(()) => AudioEvent::PlaySucceeded,
            Err(AudioError::NotAllowed) => AudioEvent::PlayRejected(AudioError::NotAllowed),
            Err(e) => {
                tracing::warn!(error = %e, "speech playback failed to start");
                self.fail();
                return;
            }
        };
        self.queue.push_back(event);
    }

    fn fail(&mut self) {
        self.teardown();
        self.state = AudioState::Failed;
    }

    /// Disconnect the output and release the session. Emits `Stopped`
    /// when something was audible.
    fn teardown(&mut self) {
        let was_playing = self.state == AudioState::Playing;
        self.output.stop();
        self.session = None;
        self.retry_armed = false;
        self.volume = 0.0;
        if was_playing {
            self.notices.push(AudioNotice::Stopped);
        }
    }

    /// Loudness of the audio around the current playback position.
    pub fn sample_volume(&mut self) -> f32 {
        if !self.is_playing() {
            return 0.0;
        }
        let Some(session) = self.session.as_mut() else {
            return 0.0;
        };
        let position = self.output.position(self.now);
        let end = ((position * f64::from(session.audio.sample_rate)) as usize)
            .min(session.audio.samples.len());
        let start = end.saturating_sub(session.analyser.fft_size());

        session.scratch.clear();
        session
            .scratch
            .extend(apply_gain(&session.audio.samples[start..end], self.gain));
        session.analyser.process(&session.scratch);
        self.volume = session.analyser.loudness();
        self.volume
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl<O: AudioOutput> VolumeSource for AudioManager<O> {
    fn is_playing(&self) -> bool {
        AudioManager::is_playing(self)
    }

    fn live_volume(&mut self) -> f32 {
        self.sample_volume()
    }
}

impl<O: AudioOutput> Drop for AudioManager<O> {
    fn drop(&mut self) {
        self.output.stop();
    }
}
