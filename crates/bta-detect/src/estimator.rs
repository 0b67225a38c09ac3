//! Quadrature-envelope sinusoid amplitude estimation
//!
//! A pure sinusoid and its quarter-period-shifted copy form an approximate
//! sin/cos pair, so `sqrt(s[i]^2 + s[i+Q]^2)` traces the instantaneous
//! amplitude envelope. A flat envelope means a clean tone; a ragged one
//! means the channel holds something else.

use bta_core::error::{BtaError, BtaResult};
use bta_core::invalid_input;
use serde::{Deserialize, Serialize};

/// Outcome of a detection attempt
///
/// "No reliable sinusoid" is a normal outcome, not an error, and a
/// zero-amplitude channel is a legitimate `Found` result. The two are never
/// conflated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Detection {
    /// A stable sinusoid was found at the target frequency
    Found {
        /// Estimated peak amplitude
        amplitude: f64,
    },
    /// The envelope was too ragged to call a sinusoid
    NotFound {
        /// Mean of the rejected envelope
        envelope_mean: f64,
        /// Standard deviation of the rejected envelope
        envelope_std: f64,
    },
}

impl Detection {
    /// Estimated peak amplitude, if a sinusoid was found
    pub fn amplitude(&self) -> Option<f64> {
        match self {
            Detection::Found { amplitude } => Some(*amplitude),
            Detection::NotFound { .. } => None,
        }
    }

    /// Peak-to-peak amplitude (2x peak), if a sinusoid was found
    pub fn peak_to_peak(&self) -> Option<f64> {
        self.amplitude().map(|a| 2.0 * a)
    }

    /// Whether a sinusoid was found
    pub fn is_found(&self) -> bool {
        matches!(self, Detection::Found { .. })
    }
}

/// Detector configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Envelope acceptance threshold: reject when `std > mean * noise_ratio`
    ///
    /// The 1/3 default is an empirical figure with no analytical
    /// derivation, which is why it is a parameter and not a constant.
    pub noise_ratio: f64,
}

impl DetectorConfig {
    /// Default envelope acceptance threshold
    pub const DEFAULT_NOISE_RATIO: f64 = 1.0 / 3.0;

    /// Create a configuration with an explicit noise ratio
    pub fn new(noise_ratio: f64) -> Self {
        Self { noise_ratio }
    }

    /// Validate the configuration
    pub fn validate(&self) -> BtaResult<()> {
        if !self.noise_ratio.is_finite() || self.noise_ratio <= 0.0 {
            return Err(BtaError::ConfigurationError {
                message: format!("noise ratio must be positive, got {}", self.noise_ratio),
            });
        }
        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> BtaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BtaError::ConfigurationError {
            message: format!("failed to serialize configuration: {}", e),
        })
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> BtaResult<Self> {
        serde_json::from_str(json).map_err(|e| BtaError::ConfigurationError {
            message: format!("failed to deserialize configuration: {}", e),
        })
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            noise_ratio: Self::DEFAULT_NOISE_RATIO,
        }
    }
}

/// Sinusoid amplitude estimator
///
/// Stateless and pure: the same buffer, rate, and frequency always produce
/// the same result, and independent buffers may be estimated concurrently.
#[derive(Debug, Clone)]
pub struct SinusoidEstimator {
    config: DetectorConfig,
}

impl SinusoidEstimator {
    /// Create an estimator with the given configuration
    pub fn new(config: DetectorConfig) -> BtaResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an estimator with the default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: DetectorConfig::default(),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Quarter-period sample offset for a target frequency at a sampling rate
    ///
    /// `Q = floor(rate / (4 * frequency))`. A rate below four times the
    /// target frequency yields no usable offset and is rejected.
    pub fn quarter_period_offset(sampling_rate: u32, frequency: f64) -> BtaResult<usize> {
        if sampling_rate == 0 {
            return Err(invalid_input!("sampling rate must be positive"));
        }
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(invalid_input!(
                "target frequency must be positive, got {}",
                frequency
            ));
        }

        let offset = (sampling_rate as f64 / (4.0 * frequency)).floor() as usize;
        if offset == 0 {
            return Err(invalid_input!(
                "sampling rate {} Hz is below four times the target frequency {} Hz",
                sampling_rate,
                frequency
            ));
        }

        Ok(offset)
    }

    /// Estimate the peak amplitude of a sinusoid at `frequency` in `samples`
    ///
    /// Returns `Detection::NotFound` when the quadrature envelope is too
    /// ragged for the configured noise ratio. Malformed inputs (empty
    /// buffer, zero rate, non-positive frequency, buffer not longer than
    /// the quarter-period offset) fail with `InvalidInput`.
    pub fn estimate(
        &self,
        samples: &[f64],
        sampling_rate: u32,
        frequency: f64,
    ) -> BtaResult<Detection> {
        if samples.is_empty() {
            return Err(invalid_input!("signal buffer is empty"));
        }

        let offset = Self::quarter_period_offset(sampling_rate, frequency)?;
        if samples.len() <= offset {
            return Err(invalid_input!(
                "signal length {} does not exceed quarter-period offset {}",
                samples.len(),
                offset
            ));
        }

        let envelope_len = samples.len() - offset;
        let mut envelope = Vec::with_capacity(envelope_len);
        for i in 0..envelope_len {
            let in_phase = samples[i];
            let quadrature = samples[i + offset];
            envelope.push((in_phase * in_phase + quadrature * quadrature).sqrt());
        }

        let n = envelope.len() as f64;
        let mean = envelope.iter().sum::<f64>() / n;
        let variance = envelope.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        if std_dev > mean * self.config.noise_ratio {
            Ok(Detection::NotFound {
                envelope_mean: mean,
                envelope_std: std_dev,
            })
        } else {
            Ok(Detection::Found { amplitude: mean })
        }
    }
}

impl Default for SinusoidEstimator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
