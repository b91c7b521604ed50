//! Where decoded speech goes once it plays.

use std::ops::Range;
use std::sync::Arc;

use aria_common::AudioError;

use crate::decode::DecodedAudio;

/// A playback sink. Times are host seconds from the same clock passed to
/// the lifecycle manager.
pub trait AudioOutput {
    /// Connect and start playing `audio` scaled by `gain`. At most one clip
    /// is connected at a time; callers stop the previous one first.
    fn start(
        &mut self,
        audio: Arc<DecodedAudio>,
        gain: f32,
        now: f64,
    ) -> Result<(), AudioError>;

    /// Change the gain of the connected clip, if any, and of later starts.
    fn set_gain(&mut self, gain: f32);

    /// Seconds of the current clip played so far.
    fn position(&self, now: f64) -> f64;

    fn is_finished(&self, now: f64) -> bool;

    /// Disconnect and release the current clip. Idempotent.
    fn stop(&mut self);

    fn is_connected(&self) -> bool;

    /// A user gesture happened; outputs gated on gestures may now start.
    fn user_gesture(&mut self) {}
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn start(
        &mut self,
        audio: Arc<DecodedAudio>,
        gain: f32,
        now: f64,
    ) -> Result<(), AudioError> {
        (**self).start(audio, gain, now)
    }

    fn set_gain(&mut self, gain: f32) {
        (**self).set_gain(gain)
    }

    fn position(&self, now: f64) -> f64 {
        (**self).position(now)
    }

    fn is_finished(&self, now: f64) -> bool {
        (**self).is_finished(now)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn user_gesture(&mut self) {
        (**self).user_gesture()
    }
}

/// The gain stage between a decoded clip and the sink. The analyser taps
/// the same stage so lip-sync follows what is heard.
pub fn apply_gain(samples: &[f32], gain: f32) -> impl Iterator<Item = f32> + '_ {
    samples.iter().map(move |s| s * gain)
}

/// Silent output that only runs a playback clock. Can simulate an
/// autoplay policy that rejects playback until the first gesture.
#[derive(Debug, Default)]
pub struct ClockOutput {
    current: Option<(Arc<DecodedAudio>, f64)>,
    gain: f32,
    block_until_gesture: bool,
    unlocked: bool,
    starts: usize,
}

impl ClockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_autoplay_block(block: bool) -> Self {
        Self {
            block_until_gesture: block,
            ..Self::default()
        }
    }

    /// Successful starts so far.
    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Samples a device would receive for `frames` of the connected clip.
    pub fn render(&self, frames: Range<usize>) -> Vec<f32> {
        match &self.current {
            Some((audio, _)) => {
                let end = frames.end.min(audio.samples.len());
                let start = frames.start.min(end);
                apply_gain(&audio.samples[start..end], self.gain).collect()
            }
            None => Vec::new(),
        }
    }
}

impl AudioOutput for ClockOutput {
    fn start(
        &mut self,
        audio: Arc<DecodedAudio>,
        gain: f32,
        now: f64,
    ) -> Result<(), AudioError> {
        if self.block_until_gesture && !self.unlocked {
            return Err(AudioError::NotAllowed);
        }
        if self.current.is_some() {
            return Err(AudioError::Device("output already connected".into()));
        }
        self.current = Some((audio, now));
        self.gain = gain;
        self.starts += 1;
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn position(&self, now: f64) -> f64 {
        match &self.current {
            Some((audio, started)) => (now - started).clamp(0.0, audio.duration()),
            None => 0.0,
        }
    }

    fn is_finished(&self, now: f64) -> bool {
        match &self.current {
            Some((audio, started)) => now - started >= audio.duration(),
            None => true,
        }
    }

    fn stop(&mut self) {
        self.current = None;
    }

    fn is_connected(&self) -> bool {
        self.current.is_some()
    }

    fn user_gesture(&mut self) {
        self.unlocked = true;
    }
}

#[cfg(feature = "device")]
pub use device::CpalOutput;

#[cfg(feature = "device")]
mod device {
    use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
    use std::sync::Arc;

    use aria_common::AudioError;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

    use super::AudioOutput;
    use crate::decode::DecodedAudio;

    struct Playing {
        _stream: cpal::Stream,
        frames: Arc<AtomicUsize>,
        done: Arc<AtomicBool>,
        device_rate: u32,
    }

    /// System output device via cpal. Speech is resampled by nearest
    /// neighbour and copied to every device channel.
    pub struct CpalOutput {
        device: cpal::Device,
        config: cpal::StreamConfig,
        playing: Option<Playing>,
        /// `f32` bits, shared with the stream callback.
        gain: Arc<AtomicU32>,
    }

    impl CpalOutput {
        pub fn new() -> Result<Self, AudioError> {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| AudioError::Device("no default output device".into()))?;
            let config = device
                .default_output_config()
                .map_err(|e| AudioError::Device(format!("no output config: {e}")))?
                .config();
            let name = device.name().unwrap_or_else(|_| "<unknown>".into());
            tracing::info!(device = %name, rate = config.sample_rate.0, channels = config.channels, "audio output ready");
            Ok(Self {
                device,
                config,
                playing: None,
                gain: Arc::new(AtomicU32::new(1.0f32.to_bits())),
            })
        }
    }

    impl AudioOutput for CpalOutput {
        fn start(
            &mut self,
            audio: Arc<DecodedAudio>,
            gain: f32,
            _now: f64,
        ) -> Result<(), AudioError> {
            if self.playing.is_some() {
                return Err(AudioError::Device("output already connected".into()));
            }
            self.gain.store(gain.to_bits(), Ordering::Relaxed);
            let channels = usize::from(self.config.channels.max(1));
            let device_rate = self.config.sample_rate.0;
            let ratio = f64::from(audio.sample_rate) / f64::from(device_rate);
            let frames = Arc::new(AtomicUsize::new(0));
            let done = Arc::new(AtomicBool::new(false));

            let cb_frames = Arc::clone(&frames);
            let cb_done = Arc::clone(&done);
            let cb_gain = Arc::clone(&self.gain);
            let stream = self
                .device
                .build_output_stream(
                    &self.config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        let mut frame = cb_frames.load(Ordering::Relaxed);
                        let gain = f32::from_bits(cb_gain.load(Ordering::Relaxed));
                        for out in data.chunks_mut(channels) {
                            let src = (frame as f64 * ratio) as usize;
                            let sample = match audio.samples.get(src) {
                                Some(s) => s * gain,
                                None => {
                                    cb_done.store(true, Ordering::Relaxed);
                                    0.0
                                }
                            };
                            out.iter_mut().for_each(|o| *o = sample);
                            frame += 1;
                        }
                        cb_frames.store(frame, Ordering::Relaxed);
                    },
                    |err| tracing::error!(error = %err, "audio output stream error"),
                    None,
                )
                .map_err(|e| AudioError::Device(format!("failed to build output stream: {e}")))?;
            stream
                .play()
                .map_err(|e| AudioError::Device(format!("failed to start output stream: {e}")))?;

            self.playing = Some(Playing {
                _stream: stream,
                frames,
                done,
                device_rate,
            });
            Ok(())
        }

        fn position(&self, _now: f64) -> f64 {
            match &self.playing {
                Some(p) => p.frames.load(Ordering::Relaxed) as f64 / f64::from(p.device_rate),
                None => 0.0,
            }
        }

        fn is_finished(&self, _now: f64) -> bool {
            self.playing
                .as_ref()
                .map_or(true, |p| p.done.load(Ordering::Relaxed))
        }

        fn set_gain(&mut self, gain: f32) {
            self.gain.store(gain.to_bits(), Ordering::Relaxed);
        }

        fn stop(&mut self) {
            self.playing = None;
        }

        fn is_connected(&self) -> bool {
            self.playing.is_some()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(seconds: f32) -> Arc<DecodedAudio> {
        Arc::new(DecodedAudio {
            samples: vec![0.0; (seconds * 1000.0) as usize],
            sample_rate: 1000,
        })
    }

    #[test]
    fn clock_runs_and_finishes() {
        let mut out = ClockOutput::new();
        out.start(clip(1.0), 1.0, 10.0).unwrap();
        assert!(out.is_connected());
        assert!((out.position(10.25) - 0.25).abs() < 1e-9);
        assert!(!out.is_finished(10.9));
        assert!(out.is_finished(11.0));
        assert_eq!(out.position(20.0), 1.0);
    }

    #[test]
    fn refuses_a_second_connection() {
        let mut out = ClockOutput::new();
        out.start(clip(1.0), 1.0, 0.0).unwrap();
        assert!(matches!(out.start(clip(1.0), 1.0, 0.0), Err(AudioError::Device(_))));
        out.stop();
        out.start(clip(1.0), 1.0, 0.0).unwrap();
        assert_eq!(out.starts(), 2);
    }

    #[test]
    fn autoplay_block_lifts_on_gesture() {
        let mut out = ClockOutput::with_autoplay_block(true);
        assert_eq!(out.start(clip(1.0), 1.0, 0.0), Err(AudioError::NotAllowed));
        out.user_gesture();
        assert!(out.start(clip(1.0), 1.0, 0.0).is_ok());
    }

    #[test]
    fn render_applies_gain_and_follows_changes() {
        let audio = Arc::new(DecodedAudio {
            samples: vec![0.5, -0.5, 1.0, 0.25],
            sample_rate: 4,
        });
        let mut out = ClockOutput::new();
        assert!(out.render(0..4).is_empty());
        out.start(audio, 0.5, 0.0).unwrap();
        assert_eq!(out.render(0..4), vec![0.25, -0.25, 0.5, 0.125]);
        out.set_gain(2.0);
        assert_eq!(out.render(2..10), vec![2.0, 0.5]);
    }

    #[test]
    fn boxed_output_forwards() {
        let mut out: Box<dyn AudioOutput> = Box::new(ClockOutput::with_autoplay_block(true));
        assert_eq!(out.start(clip(0.5), 1.0, 0.0), Err(AudioError::NotAllowed));
        out.user_gesture();
        out.start(clip(0.5), 1.0, 0.0).unwrap();
        assert!(out.is_connected());
        assert!(out.is_finished(0.5));
        out.stop();
        assert!(!out.is_connected());
    }
}
