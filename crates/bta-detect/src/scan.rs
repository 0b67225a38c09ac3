//! Per-recording tone scan
//!
//! Runs the estimator over every channel of a recording, plus the weighted
//! mix of the first channel pair, the combination the calibration rigs
//! drive with a shared test tone.

use crate::estimator::{Detection, SinusoidEstimator};
use crate::preprocess::{demean, mix};
use bta_core::error::BtaResult;
use bta_core::recording::Recording;
use serde::{Deserialize, Serialize};

/// Default weight applied to the second channel of the mixed pair
const DEFAULT_MIX_WEIGHT: f64 = 2.0;

/// Detection result for a single channel or channel combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReading {
    /// Channel index, or the first index of a mixed pair
    pub channel: usize,
    /// Human-readable channel name
    pub label: String,
    /// Detection outcome
    pub detection: Detection,
}

/// Scan outcome for a whole recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Target frequency in Hz
    pub frequency: f64,
    /// Sampling rate used by the estimator
    pub sampling_rate: u32,
    /// One reading per channel, in channel order
    pub readings: Vec<ChannelReading>,
    /// Reading for the weighted mix of the first two channels, when present
    pub mixed: Option<ChannelReading>,
}

/// Tone scan driver
pub struct ToneScan {
    estimator: SinusoidEstimator,
    mix_weight: f64,
}

impl ToneScan {
    /// Create a scan with the given estimator
    pub fn new(estimator: SinusoidEstimator) -> Self {
        Self {
            estimator,
            mix_weight: DEFAULT_MIX_WEIGHT,
        }
    }

    /// Override the weight for the mixed channel pair
    pub fn with_mix_weight(mut self, weight: f64) -> Self {
        self.mix_weight = weight;
        self
    }

    /// Scan every channel of a recording for a tone at `frequency`
    ///
    /// Channels are demeaned before estimation. The supplied sampling rate
    /// takes precedence over the recording metadata, mirroring how the
    /// acquisition rate is an operator-provided figure during calibration.
    pub fn run(
        &self,
        recording: &Recording,
        sampling_rate: u32,
        frequency: f64,
    ) -> BtaResult<ScanReport> {
        let channels: Vec<Vec<f64>> = recording
            .all_channels()?
            .iter()
            .map(|c| demean(c))
            .collect();

        let mut readings = Vec::with_capacity(channels.len());
        for (idx, channel) in channels.iter().enumerate() {
            let detection = self.estimator.estimate(channel, sampling_rate, frequency)?;
            readings.push(ChannelReading {
                channel: idx,
                label: recording.channel_label(idx),
                detection,
            });
        }

        let mixed = if channels.len() >= 2 {
            let combined = mix(&channels[0], &channels[1], self.mix_weight)?;
            let detection = self.estimator.estimate(&combined, sampling_rate, frequency)?;
            Some(ChannelReading {
                channel: 0,
                label: format!(
                    "{} + {}*{}",
                    recording.channel_label(0),
                    self.mix_weight,
                    recording.channel_label(1)
                ),
                detection,
            })
        } else {
            None
        };

        Ok(ScanReport {
            frequency,
            sampling_rate,
            readings,
            mixed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bta_sim::generator::{ChannelSpec, NoiseConfig, ToneConfig, ToneSimulator};

    fn clean_config(channels: Vec<ChannelSpec>) -> ToneConfig {
        ToneConfig {
            sampling_rate: 256.0,
            channels,
            noise: NoiseConfig::silent(),
            seed: Some(7),
        }
    }

    #[test]
    fn test_scan_finds_calibration_tone() {
        let config = clean_config(vec![
            ChannelSpec::calibration("A1", 3.0, 10.0),
            ChannelSpec::calibration("A2", 3.0, 5.0),
        ]);
        let mut simulator = ToneSimulator::new(config).unwrap();
        let recording = simulator.generate(4.0).unwrap();

        let scan = ToneScan::new(SinusoidEstimator::with_defaults());
        let report = scan.run(&recording, 256, 3.0).unwrap();

        assert_eq!(report.readings.len(), 2);

        let a1 = report.readings[0].detection.amplitude().unwrap();
        assert!((a1 - 10.0).abs() < 0.5, "A1 amplitude {}", a1);

        let a2 = report.readings[1].detection.amplitude().unwrap();
        assert!((a2 - 5.0).abs() < 0.25, "A2 amplitude {}", a2);

        // Mixed pair: A1 + 2*A2 = 10 + 2*5 = 20 for in-phase tones.
        let mixed = report.mixed.expect("two channels produce a mixed reading");
        assert_eq!(mixed.label, "A1 + 2*A2");
        let combined = mixed.detection.amplitude().unwrap();
        assert!((combined - 20.0).abs() < 1.0, "mixed amplitude {}", combined);
    }

    #[test]
    fn test_scan_demeans_offset_channels() {
        // A large DC offset must not disturb the envelope.
        let mut spec = ChannelSpec::calibration("A1", 3.0, 10.0);
        spec.offset = 500.0;

        let mut simulator = ToneSimulator::new(clean_config(vec![spec])).unwrap();
        let recording = simulator.generate(4.0).unwrap();

        let scan = ToneScan::new(SinusoidEstimator::with_defaults());
        let report = scan.run(&recording, 256, 3.0).unwrap();

        let amplitude = report.readings[0].detection.amplitude().unwrap();
        assert!((amplitude - 10.0).abs() < 0.5, "amplitude {}", amplitude);
        assert!(report.mixed.is_none());
    }

    #[test]
    fn test_scan_with_custom_mix_weight() {
        let config = clean_config(vec![
            ChannelSpec::calibration("A1", 3.0, 10.0),
            ChannelSpec::calibration("A2", 3.0, 10.0),
        ]);
        let mut simulator = ToneSimulator::new(config).unwrap();
        let recording = simulator.generate(4.0).unwrap();

        // A1 - A2 cancels identical in-phase tones to a flat zero channel.
        let scan = ToneScan::new(SinusoidEstimator::with_defaults()).with_mix_weight(-1.0);
        let report = scan.run(&recording, 256, 3.0).unwrap();

        let mixed = report.mixed.unwrap();
        assert_eq!(mixed.label, "A1 + -1*A2");
        assert_eq!(mixed.detection, Detection::Found { amplitude: 0.0 });
    }

    #[test]
    fn test_scan_rejects_noise_channel() {
        let config = ToneConfig {
            sampling_rate: 256.0,
            channels: vec![ChannelSpec::flat("status", 0.0)],
            noise: NoiseConfig {
                gaussian_std: 1.0,
                ..NoiseConfig::silent()
            },
            seed: Some(11),
        };
        let mut simulator = ToneSimulator::new(config).unwrap();
        let recording = simulator.generate(8.0).unwrap();

        let scan = ToneScan::new(SinusoidEstimator::with_defaults());
        let report = scan.run(&recording, 256, 3.0).unwrap();

        assert!(!report.readings[0].detection.is_found());
    }

    #[test]
    fn test_scan_report_serializes() {
        let config = clean_config(vec![ChannelSpec::calibration("A1", 3.0, 1.0)]);
        let mut simulator = ToneSimulator::new(config).unwrap();
        let recording = simulator.generate(2.0).unwrap();

        let scan = ToneScan::new(SinusoidEstimator::with_defaults());
        let report = scan.run(&recording, 256, 3.0).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let restored: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, restored);
    }
}
