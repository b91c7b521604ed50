//! Spectrum analyser with the behaviour of a browser `AnalyserNode`.
//!
//! Blackman window, FFT, magnitudes smoothed over time, converted to dB and
//! mapped onto bytes between `min_decibels` and `max_decibels`.

use std::f32::consts::TAU;
use std::sync::Arc;

use aria_config::schema::LipSyncConfig;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

pub struct SpectrumAnalyser {
    fft_size: usize,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl SpectrumAnalyser {
    pub fn new(fft_size: usize, smoothing: f32, min_db: f32, max_db: f32) -> Self {
        let fft_size = fft_size.max(2);
        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        Self {
            fft_size,
            smoothing: smoothing.clamp(0.0, 1.0),
            min_db,
            max_db,
            window: blackman(fft_size),
            fft,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
            bytes: vec![0; fft_size / 2],
        }
    }

    pub fn from_config(config: &LipSyncConfig) -> Self {
        Self::new(
            config.fft_size as usize,
            config.smoothing as f32,
            config.min_decibels as f32,
            config.max_decibels as f32,
        )
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Analyse the most recent `fft_size` samples (zero-padded at the
    /// front when fewer are given) and return the byte spectrum.
    pub fn process(&mut self, samples: &[f32]) -> &[u8] {
        let tail = &samples[samples.len().saturating_sub(self.fft_size)..];
        let pad = self.fft_size - tail.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { tail[i - pad] };
            let s = if s.is_finite() { s } else { 0.0 };
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let scale = 1.0 / self.fft_size as f32;
        let range = self.max_db - self.min_db;
        for k in 0..self.bin_count() {
            let magnitude = self.buffer[k].norm() * scale;
            let value = self.smoothing * self.smoothed[k] + (1.0 - self.smoothing) * magnitude;
            self.smoothed[k] = if value.is_finite() { value } else { 0.0 };

            let db = 20.0 * self.smoothed[k].log10();
            let scaled = 255.0 / range * (db - self.min_db);
            self.bytes[k] = if scaled.is_finite() {
                scaled.clamp(0.0, 255.0) as u8
            } else {
                0
            };
        }
        &self.bytes
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mean byte level over all bins, in `[0, 1]`.
    pub fn loudness(&self) -> f32 {
        if self.bytes.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.bytes.iter().map(|&b| u32::from(b)).sum();
        sum as f32 / self.bytes.len() as f32 / 255.0
    }

    /// Forget smoothing history.
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|v| *v = 0.0);
        self.bytes.iter_mut().for_each(|v| *v = 0);
    }
}

fn blackman(n: usize) -> Vec<f32> {
    let (a0, a1, a2) = (0.42, 0.5, 0.08);
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            a0 - a1 * (TAU * x).cos() + a2 * (2.0 * TAU * x).cos()
        })
        .collect()
}
