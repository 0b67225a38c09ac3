//! BTA-Sim: Synthetic biosignal recordings for testing and development
//!
//! Generates multi-channel recordings with known tone content so detector
//! behavior can be checked against ground truth.

pub mod generator;

pub use generator::{ChannelSpec, NoiseConfig, ToneComponent, ToneConfig, ToneSimulator};
