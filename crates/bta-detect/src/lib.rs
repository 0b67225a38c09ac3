//! BTA-Detect: Sinusoid amplitude estimation for biosignal recordings
//!
//! Quadrature-envelope tone detection with channel preprocessing and a
//! per-recording scan driver.

pub mod estimator;
pub mod preprocess;
pub mod scan;

pub use estimator::{Detection, DetectorConfig, SinusoidEstimator};
pub use preprocess::{demean, mix};
pub use scan::{ChannelReading, ScanReport, ToneScan};
