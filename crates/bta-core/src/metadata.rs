//! Recording-level metadata supplied by the loading collaborator

use crate::error::{BtaError, BtaResult};
use serde::{Deserialize, Serialize};

/// Metadata for a decoded multi-channel recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// Sampling rate in Hz as reported by the source
    pub sampling_rate: f64,
    /// Number of channels
    pub channel_count: usize,
    /// Recording duration in seconds
    pub duration: f64,
    /// Channel labels, one per channel
    pub channel_labels: Vec<String>,
}

impl RecordingMetadata {
    /// Create new recording metadata
    ///
    /// An empty label list is filled with generated `ch<N>` labels; a
    /// non-empty list must match the channel count.
    pub fn new(
        sampling_rate: f64,
        channel_count: usize,
        duration: f64,
        channel_labels: Vec<String>,
    ) -> BtaResult<Self> {
        Self::validate_sampling_rate(sampling_rate)?;
        Self::validate_channel_count(channel_count)?;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(BtaError::InvalidRecording {
                reason: format!("duration must be positive, got {}", duration),
            });
        }

        let channel_labels = if channel_labels.is_empty() {
            (0..channel_count).map(|i| format!("ch{}", i)).collect()
        } else if channel_labels.len() == channel_count {
            channel_labels
        } else {
            return Err(BtaError::InvalidRecording {
                reason: format!(
                    "{} labels provided for {} channels",
                    channel_labels.len(),
                    channel_count
                ),
            });
        };

        Ok(RecordingMetadata {
            sampling_rate,
            channel_count,
            duration,
            channel_labels,
        })
    }

    /// Validate a sampling rate
    pub fn validate_sampling_rate(rate: f64) -> BtaResult<()> {
        if !rate.is_finite() || rate <= 0.0 {
            Err(BtaError::InvalidRecording {
                reason: format!("sampling rate must be positive, got {}", rate),
            })
        } else {
            Ok(())
        }
    }

    /// Validate a channel count
    pub fn validate_channel_count(count: usize) -> BtaResult<()> {
        // Upper bound taken from the EDF family's signal limit
        const MAX_CHANNELS: usize = 4096;

        if count == 0 || count > MAX_CHANNELS {
            Err(BtaError::InvalidRecording {
                reason: format!("channel count {} outside 1-{}", count, MAX_CHANNELS),
            })
        } else {
            Ok(())
        }
    }

    /// Label for a channel index, if in range
    pub fn label(&self, channel_index: usize) -> Option<&str> {
        self.channel_labels.get(channel_index).map(String::as_str)
    }
}
