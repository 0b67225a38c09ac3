//! BTA-IO: Recording access through external format collaborators
//!
//! Biosignal file formats are decoded by external libraries; this crate
//! only adapts their output into `bta-core` containers.

pub mod edf;
pub mod source;

pub use edf::EdfSource;
pub use source::RecordingSource;
