//! Error handling for the bta workspace
//!
//! One error type shared by every crate in the workspace. "No reliable
//! sinusoid detected" is deliberately NOT represented here: that outcome is
//! a normal return value (`Detection::NotFound` in bta-detect), not an error.

use core::fmt;

/// Result type alias for bta operations
pub type BtaResult<T> = Result<T, BtaError>;

/// Error type for all bta operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BtaError {
    /// Estimator or preprocessing input violates a precondition
    InvalidInput {
        /// Description of the violated precondition
        reason: String,
    },

    /// Recording container and metadata are inconsistent
    InvalidRecording {
        /// Description of the inconsistency
        reason: String,
    },

    /// Detector or generator configuration is unusable
    ConfigurationError {
        /// Configuration error description
        message: String,
    },

    /// The external format collaborator failed; its message is carried unmodified
    UpstreamLoadFailure {
        /// Collaborator error message
        message: String,
    },

    /// Synthetic recording generation failed
    SimulationError {
        /// Generator error description
        message: String,
    },
}

impl fmt::Display for BtaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BtaError::InvalidInput { reason } => {
                write!(f, "Invalid input: {}", reason)
            }
            BtaError::InvalidRecording { reason } => {
                write!(f, "Invalid recording: {}", reason)
            }
            BtaError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            BtaError::UpstreamLoadFailure { message } => {
                write!(f, "Upstream load failure: {}", message)
            }
            BtaError::SimulationError { message } => {
                write!(f, "Simulation error: {}", message)
            }
        }
    }
}

impl std::error::Error for BtaError {}

/// Convenience macro for creating input-precondition errors
#[macro_export]
macro_rules! invalid_input {
    ($($arg:tt)*) => {
        $crate::error::BtaError::InvalidInput {
            reason: format!($($arg)*),
        }
    };
}

/// Convenience macro for creating recording-consistency errors
#[macro_export]
macro_rules! invalid_recording {
    ($($arg:tt)*) => {
        $crate::error::BtaError::InvalidRecording {
            reason: format!($($arg)*),
        }
    };
}
