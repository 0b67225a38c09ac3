//! Multi-channel tone generator with configurable noise

use bta_core::{BtaError, BtaResult, Recording, RecordingMetadata};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One sinusoidal component of a channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToneComponent {
    /// Frequency in Hz
    pub frequency: f64,
    /// Peak amplitude
    pub amplitude: f64,
    /// Phase offset in radians
    pub phase: f64,
}

impl ToneComponent {
    /// Create a zero-phase tone
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
            phase: 0.0,
        }
    }

    fn sample_at(&self, time: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency * time + self.phase).sin()
    }
}

/// Content specification for one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSpec {
    /// Channel label
    pub label: String,
    /// Sinusoidal components, summed
    pub tones: Vec<ToneComponent>,
    /// Constant DC offset
    pub offset: f64,
}

impl ChannelSpec {
    /// A channel carrying a single calibration tone
    pub fn calibration(label: &str, frequency: f64, amplitude: f64) -> Self {
        Self {
            label: label.to_string(),
            tones: vec![ToneComponent::new(frequency, amplitude)],
            offset: 0.0,
        }
    }

    /// A channel with no tone content, pinned at `level`
    pub fn flat(label: &str, level: f64) -> Self {
        Self {
            label: label.to_string(),
            tones: Vec::new(),
            offset: level,
        }
    }
}

/// Noise configuration shared by all channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Gaussian noise standard deviation (0.0 = no noise)
    pub gaussian_std: f64,
    /// Slow baseline wander amplitude
    pub baseline_wander: f64,
    /// Power line interference frequency (50/60 Hz), if any
    pub powerline_freq: Option<f64>,
    /// Power line interference amplitude
    pub powerline_amplitude: f64,
}

impl NoiseConfig {
    /// No noise at all; generation becomes fully deterministic
    pub fn silent() -> Self {
        Self {
            gaussian_std: 0.0,
            baseline_wander: 0.0,
            powerline_freq: None,
            powerline_amplitude: 0.0,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            gaussian_std: 0.05,
            baseline_wander: 0.02,
            powerline_freq: Some(50.0),
            powerline_amplitude: 0.05,
        }
    }
}

/// Configuration for the tone simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneConfig {
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// One spec per generated channel
    pub channels: Vec<ChannelSpec>,
    /// Noise applied to every channel
    pub noise: NoiseConfig,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 256.0,
            channels: vec![
                ChannelSpec::calibration("A1", 3.0, 50.0),
                ChannelSpec::calibration("A2", 3.0, 25.0),
            ],
            noise: NoiseConfig::default(),
            seed: None,
        }
    }
}

/// Synthetic recording generator
pub struct ToneSimulator {
    config: ToneConfig,
    rng: rand::rngs::StdRng,
    normal_dist: Normal<f64>,
    time_offset: f64,
}

impl ToneSimulator {
    /// Create a simulator with the given configuration
    pub fn new(config: ToneConfig) -> BtaResult<Self> {
        RecordingMetadata::validate_sampling_rate(config.sampling_rate)?;
        RecordingMetadata::validate_channel_count(config.channels.len())?;

        let seed = config.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

        let rng = rand::rngs::StdRng::seed_from_u64(seed);
        let normal_dist =
            Normal::new(0.0, config.noise.gaussian_std).map_err(|e| BtaError::SimulationError {
                message: format!("failed to create noise distribution: {}", e),
            })?;

        Ok(ToneSimulator {
            config,
            rng,
            normal_dist,
            time_offset: 0.0,
        })
    }

    /// Generate a recording of the given duration in seconds
    pub fn generate(&mut self, duration: f64) -> BtaResult<Recording> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(BtaError::SimulationError {
                message: format!("duration must be positive, got {}", duration),
            });
        }

        let channel_count = self.config.channels.len();
        let samples_per_channel = (duration * self.config.sampling_rate) as usize;
        let mut data = Vec::with_capacity(samples_per_channel * channel_count);

        let dt = 1.0 / self.config.sampling_rate;

        // Interleaved generation, one frame at a time
        for sample_idx in 0..samples_per_channel {
            let time = self.time_offset + sample_idx as f64 * dt;

            for channel_idx in 0..channel_count {
                let spec = &self.config.channels[channel_idx];

                let mut value = spec.offset;
                for tone in &spec.tones {
                    value += tone.sample_at(time);
                }
                value += self.noise_at(time);

                data.push(value);
            }
        }

        // Advance so repeated calls produce a continuous signal
        self.time_offset += duration;

        let labels = self
            .config
            .channels
            .iter()
            .map(|c| c.label.clone())
            .collect();
        let metadata = RecordingMetadata::new(
            self.config.sampling_rate,
            channel_count,
            duration,
            labels,
        )?;

        Recording::new(data, metadata)
    }

    fn noise_at(&mut self, time: f64) -> f64 {
        let mut noise = 0.0;

        if self.config.noise.gaussian_std > 0.0 {
            noise += self.normal_dist.sample(&mut self.rng);
        }

        // Baseline wander: slow 0.1 Hz drift
        if self.config.noise.baseline_wander > 0.0 {
            noise += self.config.noise.baseline_wander * (2.0 * PI * 0.1 * time).sin();
        }

        if let Some(powerline_freq) = self.config.noise.powerline_freq {
            noise += self.config.noise.powerline_amplitude
                * (2.0 * PI * powerline_freq * time).sin();
        }

        noise
    }

    /// Reset the time offset (restarts the generated signal)
    pub fn reset_time(&mut self) {
        self.time_offset = 0.0;
    }

    /// Current configuration
    pub fn config(&self) -> &ToneConfig {
        &self.config
    }
}
