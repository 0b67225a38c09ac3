//! Seam to the external recording collaborators

use bta_core::{BtaResult, Recording, RecordingMetadata};
use std::path::Path;

/// A source of decoded recordings
///
/// Implementations wrap external format libraries. Format parsing, header
/// decoding, and sample calibration are the collaborator's responsibility;
/// an implementation only adapts the decoded output and passes collaborator
/// failures through as `UpstreamLoadFailure`.
pub trait RecordingSource {
    /// Decode the full recording at `path`
    fn load(&self, path: &Path) -> BtaResult<Recording>;

    /// Read only the metadata of the recording at `path`
    fn header(&self, path: &Path) -> BtaResult<RecordingMetadata>;
}
