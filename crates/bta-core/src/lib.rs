//! BTA-Core: Foundation types for biosignal tone analysis
//!
//! Containers and errors shared by the loader, detector, and simulator crates.

pub mod error;
pub mod metadata;
pub mod recording;

pub use error::{BtaError, BtaResult};
pub use metadata::RecordingMetadata;
pub use recording::{ChannelStats, Recording};
