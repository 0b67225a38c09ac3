//! EDF/EDF+ recording source backed by the `edfplus` crate
//!
//! All header decoding and sample calibration happens inside the
//! collaborator; this adapter only reshapes its output and passes its
//! failures through unmodified.

use crate::source::RecordingSource;
use bta_core::{invalid_input, invalid_recording};
use bta_core::{BtaError, BtaResult, Recording, RecordingMetadata};
use edfplus::{EdfHeader, EdfReader, EDFLIB_TIME_DIMENSION};
use std::path::Path;
use tracing::{debug, info};

/// Recording source for EDF/EDF+ files
#[derive(Debug, Clone, Default)]
pub struct EdfSource;

impl EdfSource {
    /// Create a new EDF source
    pub fn new() -> Self {
        Self
    }

    fn path_str(path: &Path) -> BtaResult<&str> {
        path.to_str()
            .ok_or_else(|| invalid_input!("path {} is not valid UTF-8", path.display()))
    }

    /// Build recording metadata from a collaborator header
    ///
    /// Returns the metadata and the per-channel sample count. The container
    /// holds one uniform rate, so files whose signals carry differing sample
    /// counts are rejected; resampling belongs to the collaborator layer.
    fn metadata_from(header: &EdfHeader) -> BtaResult<(RecordingMetadata, usize)> {
        if header.signals.is_empty() {
            return Err(invalid_recording!("file contains no signals"));
        }

        let samples_per_channel = header.signals[0].samples_in_file as usize;
        if header
            .signals
            .iter()
            .any(|s| s.samples_in_file as usize != samples_per_channel)
        {
            return Err(invalid_recording!(
                "signals carry differing sample counts; mixed-rate files are not supported"
            ));
        }

        let duration = header.file_duration as f64 / EDFLIB_TIME_DIMENSION as f64;
        if duration <= 0.0 {
            return Err(invalid_recording!(
                "file reports a non-positive duration ({} s)",
                duration
            ));
        }
        let sampling_rate = samples_per_channel as f64 / duration;

        let labels = header
            .signals
            .iter()
            .map(|s| s.label.trim().to_string())
            .collect();

        let metadata =
            RecordingMetadata::new(sampling_rate, header.signals.len(), duration, labels)?;
        Ok((metadata, samples_per_channel))
    }
}

fn upstream(err: edfplus::EdfError) -> BtaError {
    BtaError::UpstreamLoadFailure {
        message: err.to_string(),
    }
}

impl RecordingSource for EdfSource {
    fn load(&self, path: &Path) -> BtaResult<Recording> {
        let path_str = Self::path_str(path)?;
        let mut reader = EdfReader::open(path_str).map_err(upstream)?;
        let (metadata, samples_per_channel) = Self::metadata_from(reader.header())?;

        debug!(
            "decoding {} channels x {} samples at {:.1} Hz",
            metadata.channel_count, samples_per_channel, metadata.sampling_rate
        );

        let mut channels = Vec::with_capacity(metadata.channel_count);
        for signal_idx in 0..metadata.channel_count {
            let samples = reader
                .read_physical_samples(signal_idx, samples_per_channel)
                .map_err(upstream)?;
            channels.push(samples);
        }

        info!(
            "loaded {} ({} channels, {:.1} s)",
            path.display(),
            metadata.channel_count,
            metadata.duration
        );
        Recording::from_channels(channels, metadata)
    }

    fn header(&self, path: &Path) -> BtaResult<RecordingMetadata> {
        let path_str = Self::path_str(path)?;
        let reader = EdfReader::open(path_str).map_err(upstream)?;
        Self::metadata_from(reader.header()).map(|(metadata, _)| metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edfplus::{EdfWriter, SignalParam};
    use std::f64::consts::PI;

    fn tone_signal(label: &str) -> SignalParam {
        SignalParam {
            label: label.to_string(),
            samples_in_file: 0,
            physical_max: 200.0,
            physical_min: -200.0,
            digital_max: 32767,
            digital_min: -32768,
            samples_per_record: 256,
            physical_dimension: "uV".to_string(),
            prefilter: String::new(),
            transducer: String::new(),
        }
    }

    fn write_tone_file(path: &str, seconds: usize) {
        let mut writer = EdfWriter::create(path).unwrap();
        writer
            .set_patient_info("X001", "M", "01-JAN-2000", "calibration rig")
            .unwrap();
        writer.add_signal(tone_signal("A1")).unwrap();
        writer.add_signal(tone_signal("A2")).unwrap();

        for record in 0..seconds {
            let mut a1 = Vec::with_capacity(256);
            let mut a2 = Vec::with_capacity(256);
            for i in 0..256 {
                let t = (record * 256 + i) as f64 / 256.0;
                a1.push(50.0 * (2.0 * PI * 3.0 * t).sin());
                a2.push(25.0 * (2.0 * PI * 3.0 * t).sin());
            }
            writer.write_samples(&[a1, a2]).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_header_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.edf");
        write_tone_file(path.to_str().unwrap(), 4);

        let metadata = EdfSource::new().header(&path).unwrap();

        assert_eq!(metadata.channel_count, 2);
        assert_eq!(metadata.channel_labels, vec!["A1", "A2"]);
        assert!((metadata.sampling_rate - 256.0).abs() < 1e-6);
        assert!((metadata.duration - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.edf");
        write_tone_file(path.to_str().unwrap(), 4);

        let recording = EdfSource::new().load(&path).unwrap();

        assert_eq!(recording.channel_count(), 2);
        assert_eq!(recording.samples_per_channel(), 1024);

        // Samples survive the digital round trip within quantization error
        // (400 uV span over 16 bits is ~0.006 uV per step).
        let a1 = recording.channel_data(0).unwrap();
        for (i, &sample) in a1.iter().take(256).enumerate() {
            let t = i as f64 / 256.0;
            let expected = 50.0 * (2.0 * PI * 3.0 * t).sin();
            assert!(
                (sample - expected).abs() < 0.1,
                "sample {} was {}, expected {}",
                i,
                sample,
                expected
            );
        }
    }

    #[test]
    fn test_missing_file_is_upstream_failure() {
        let result = EdfSource::new().load(Path::new("/nonexistent/missing.edf"));
        assert!(matches!(result, Err(BtaError::UpstreamLoadFailure { .. })));
    }

    #[test]
    fn test_header_of_missing_file() {
        let result = EdfSource::new().header(Path::new("/nonexistent/missing.edf"));
        assert!(matches!(result, Err(BtaError::UpstreamLoadFailure { .. })));
    }
}
