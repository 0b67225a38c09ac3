//! Recording: container for decoded multi-channel signal data

use crate::error::BtaResult;
use crate::invalid_recording;
use crate::metadata::RecordingMetadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoded multi-channel recording
///
/// Samples are interleaved frame-major, the way acquisition front-ends hand
/// them over: `[ch0_s0, ch1_s0, ..., ch0_s1, ch1_s1, ...]`. The container is
/// read-only to the detector side.
#[derive(Debug, Clone)]
pub struct Recording {
    /// Unique identifier for this recording instance
    pub id: Uuid,
    /// Interleaved sample data
    pub data: Vec<f64>,
    /// Recording metadata
    pub metadata: RecordingMetadata,
    /// Creation timestamp (ms since epoch)
    pub created_at: u64,
}

impl Recording {
    /// Create a new recording from interleaved data and metadata
    pub fn new(data: Vec<f64>, metadata: RecordingMetadata) -> BtaResult<Self> {
        if data.is_empty() {
            return Err(invalid_recording!("recording contains no samples"));
        }
        if data.len() % metadata.channel_count != 0 {
            return Err(invalid_recording!(
                "data length {} is not a multiple of the channel count {}",
                data.len(),
                metadata.channel_count
            ));
        }

        Ok(Recording {
            id: Uuid::new_v4(),
            data,
            metadata,
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
        })
    }

    /// Create a recording from per-channel buffers, interleaving them
    ///
    /// This is the constructor loaders use: format collaborators decode one
    /// channel at a time.
    pub fn from_channels(channels: Vec<Vec<f64>>, metadata: RecordingMetadata) -> BtaResult<Self> {
        if channels.len() != metadata.channel_count {
            return Err(invalid_recording!(
                "{} channel buffers provided for {} channels",
                channels.len(),
                metadata.channel_count
            ));
        }

        let samples_per_channel = channels[0].len();
        if channels.iter().any(|c| c.len() != samples_per_channel) {
            return Err(invalid_recording!(
                "channel buffers have differing sample counts"
            ));
        }

        let mut data = Vec::with_capacity(samples_per_channel * channels.len());
        for sample_idx in 0..samples_per_channel {
            for channel in &channels {
                data.push(channel[sample_idx]);
            }
        }

        Self::new(data, metadata)
    }

    /// Total number of samples across all channels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the recording is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of samples per channel
    pub fn samples_per_channel(&self) -> usize {
        if self.metadata.channel_count == 0 {
            0
        } else {
            self.data.len() / self.metadata.channel_count
        }
    }

    /// Extract the data for a specific channel
    pub fn channel_data(&self, channel_index: usize) -> BtaResult<Vec<f64>> {
        if channel_index >= self.metadata.channel_count {
            return Err(invalid_recording!(
                "channel index {} out of bounds (0-{})",
                channel_index,
                self.metadata.channel_count - 1
            ));
        }

        let samples_per_channel = self.samples_per_channel();
        let mut channel_data = Vec::with_capacity(samples_per_channel);

        for sample_idx in 0..samples_per_channel {
            let data_idx = sample_idx * self.metadata.channel_count + channel_index;
            channel_data.push(self.data[data_idx]);
        }

        Ok(channel_data)
    }

    /// Extract all channels as separate vectors
    pub fn all_channels(&self) -> BtaResult<Vec<Vec<f64>>> {
        let mut channels = Vec::with_capacity(self.metadata.channel_count);

        for ch in 0..self.metadata.channel_count {
            channels.push(self.channel_data(ch)?);
        }

        Ok(channels)
    }

    /// Recording duration in seconds
    pub fn duration(&self) -> f64 {
        self.metadata.duration
    }

    /// Sampling rate reported by the source
    pub fn sampling_rate(&self) -> f64 {
        self.metadata.sampling_rate
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.metadata.channel_count
    }

    /// Label for a channel index, falling back to a generated name
    pub fn channel_label(&self, channel_index: usize) -> String {
        self.metadata
            .label(channel_index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("ch{}", channel_index))
    }

    /// Basic statistics for a channel
    pub fn channel_stats(&self, channel_index: usize) -> BtaResult<ChannelStats> {
        let data = self.channel_data(channel_index)?;
        Ok(ChannelStats::calculate(&data))
    }
}

/// Basic statistics for one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl ChannelStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = data.len() as f64;

        let sum: f64 = data.iter().sum();
        let mean = sum / n;

        let sum_sq: f64 = data.iter().map(|x| x * x).sum();
        let rms = (sum_sq / n).sqrt();

        let variance: f64 = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let peak_to_peak = max - min;

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak,
        }
    }
}
