use thiserror::Error;

/// Rejected swimmer parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwimError {
    #[error("base speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),
    #[error("speed jitter range [{min}, {max}] must be finite, positive and ordered")]
    InvalidJitter { min: f32, max: f32 },
}
