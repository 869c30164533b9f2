//! Common test utilities and synthetic window generators
//!
//! This module provides:
//! - A deterministic noise source so failures reproduce
//! - [`WindowBuilder`] for paired spectrograms with injected bursts
//! - Conversion of a pair into the JSON container layout

#![allow(dead_code)]

use core::ops::Range;

use ndarray::{Array1, Array2};
use serde_json::{json, Value};
use stereo_core::{Spacecraft, Spectrogram, StereoPair};

/// Sample spacing of the HFR receiver in seconds
pub const DT: f64 = 38.0;

/// Linear congruential generator, same constants as glibc
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((self.state >> 16) & 0x7fff) as f64 / 32_768.0
    }

    /// Uniform in `[-amplitude, amplitude)`
    pub fn noise(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

/// Burst injected into one spacecraft
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    /// First sample of the burst
    pub start: usize,
    /// Number of samples above threshold
    pub len: usize,
    /// Power at the burst centre
    pub peak: f64,
}

impl Burst {
    pub fn new(start: usize, len: usize, peak: f64) -> Self {
        Self { start, len, peak }
    }

    /// Triangular profile, never below half the peak inside the burst
    fn power_at(&self, sample: usize) -> Option<f64> {
        if sample < self.start || sample >= self.start + self.len {
            return None;
        }
        let half = (self.len.max(2) - 1) as f64 / 2.0;
        let offset = ((sample - self.start) as f64 - half).abs() / half;
        Some(self.peak * (1.0 - 0.5 * offset))
    }
}

/// Builder for a synthetic observation window
pub struct WindowBuilder {
    channels: usize,
    samples_a: usize,
    samples_b: usize,
    noise_floor: f64,
    seed: u32,
    bursts_a: Vec<Burst>,
    bursts_b: Vec<Burst>,
    nan_channels: Option<(Spacecraft, Range<usize>)>,
    nan_columns: Option<(Spacecraft, Range<usize>)>,
}

impl WindowBuilder {
    /// Quiet window with `channels` rows and `samples` columns on both sides
    pub fn new(channels: usize, samples: usize) -> Self {
        Self {
            channels,
            samples_a: samples,
            samples_b: samples,
            noise_floor: 1.0,
            seed: 42,
            bursts_a: Vec::new(),
            bursts_b: Vec::new(),
            nan_channels: None,
            nan_columns: None,
        }
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn noise_floor(mut self, floor: f64) -> Self {
        self.noise_floor = floor;
        self
    }

    /// Give B a different number of samples
    pub fn samples_b(mut self, samples: usize) -> Self {
        self.samples_b = samples;
        self
    }

    pub fn burst(mut self, spacecraft: Spacecraft, burst: Burst) -> Self {
        match spacecraft {
            Spacecraft::A => self.bursts_a.push(burst),
            Spacecraft::B => self.bursts_b.push(burst),
        }
        self
    }

    /// Same burst on both spacecraft, B delayed by `lag` samples
    pub fn burst_pair(self, burst: Burst, lag: usize) -> Self {
        let delayed = Burst { start: burst.start + lag, ..burst };
        self.burst(Spacecraft::A, burst).burst(Spacecraft::B, delayed)
    }

    /// Mark a block of channels as uncalibrated
    pub fn nan_channels(mut self, spacecraft: Spacecraft, rows: Range<usize>) -> Self {
        self.nan_channels = Some((spacecraft, rows));
        self
    }

    /// Blank a span of columns with NaN power
    pub fn nan_columns(mut self, spacecraft: Spacecraft, columns: Range<usize>) -> Self {
        self.nan_columns = Some((spacecraft, columns));
        self
    }

    pub fn build(&self) -> StereoPair {
        let mut rng = Lcg::new(self.seed);
        let a = self.spectrogram(Spacecraft::A, self.samples_a, &self.bursts_a, &mut rng);
        let b = self.spectrogram(Spacecraft::B, self.samples_b, &self.bursts_b, &mut rng);
        StereoPair::new(a, b)
    }

    fn spectrogram(
        &self,
        spacecraft: Spacecraft,
        samples: usize,
        bursts: &[Burst],
        rng: &mut Lcg,
    ) -> Spectrogram {
        let time = Array1::from_iter((0..samples).map(|i| i as f64 * DT));
        let mut frequency = Array1::from_iter((0..self.channels).map(|c| 0.125 + 0.05 * c as f64));
        let mut power = Array2::from_shape_fn((self.channels, samples), |(_, t)| {
            let burst = bursts.iter().filter_map(|b| b.power_at(t)).fold(0.0, f64::max);
            self.noise_floor + burst
        });
        power.mapv_inplace(|p| p + rng.noise(0.1 * self.noise_floor));

        if let Some((sc, rows)) = &self.nan_channels {
            if *sc == spacecraft {
                for row in rows.clone() {
                    frequency[row] = f64::NAN;
                }
            }
        }
        if let Some((sc, columns)) = &self.nan_columns {
            if *sc == spacecraft {
                for column in columns.clone() {
                    power.column_mut(column).fill(f64::NAN);
                }
            }
        }

        Spectrogram::new(spacecraft, time, frequency, power).expect("generator keeps shapes consistent")
    }
}

/// Lay a pair out the way the JSON container expects
///
/// NaN serialises as `null`, which the container reads back as NaN.
pub fn to_container_json(pair: &StereoPair) -> Value {
    let matrix = |m: &Array2<f64>| -> Vec<Vec<f64>> { m.rows().into_iter().map(|r| r.to_vec()).collect() };
    let table = |f: &Array1<f64>| -> Vec<Vec<f64>> { f.iter().map(|v| vec![*v, 0.0]).collect() };

    json!({
        "spectrogram": {
            "Time_A": pair.a.time.to_vec(),
            "Time_B": pair.b.time.to_vec(),
            "Frequency_A": table(&pair.a.frequency),
            "Frequency_B": table(&pair.b.frequency),
            "HFR_Ch1_S1Power_A": matrix(&pair.a.power),
            "HFR_Ch1_S1Power_B": matrix(&pair.b.power),
        }
    })
}
