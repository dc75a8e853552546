//! Error types for lattice construction, valuation and export

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LatticeError>;

/// Lattice pricing errors.
///
/// Every variant is a local computation or input failure; none are transient,
/// so callers should surface them rather than retry.
#[derive(Debug, Error)]
pub enum LatticeError {
    /// Up/down multipliers violate `up > down > 0`
    #[error("Invalid lattice parameters: up = {up}, down = {down} (require up > down > 0)")]
    InvalidParameters {
        /// Up multiplier
        up: f64,
        /// Down multiplier
        down: f64,
    },

    /// A finite-difference denominator collapsed to zero
    #[error("Degenerate lattice: {0}")]
    DegenerateLattice(String),

    /// Option kind, specification or layout tag outside the known set
    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// Payment tree and price lattice were built for different shapes
    #[error("Payment tree shape {payments} does not match lattice shape {lattice}")]
    ShapeMismatch {
        /// Shape the lattice was asked to build
        lattice: String,
        /// Shape of the supplied payment tree
        payments: String,
    },

    /// Greeks need valued nodes at least two levels below the root
    #[error("Lattice needs at least {required} periods, got {periods}")]
    InsufficientDepth {
        /// Minimum number of periods
        required: usize,
        /// Periods actually in the lattice
        periods: usize,
    },

    /// Option values were read before any valuation ran
    #[error("Lattice has not been valued")]
    NotValued,

    /// Malformed contract input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters_message() {
        let err = LatticeError::InvalidParameters { up: 0.9, down: 1.1 };
        let msg = err.to_string();
        assert!(msg.contains("up = 0.9"));
        assert!(msg.contains("down = 1.1"));
    }

    #[test]
    fn test_insufficient_depth_message() {
        let err = LatticeError::InsufficientDepth { required: 2, periods: 1 };
        assert_eq!(err.to_string(), "Lattice needs at least 2 periods, got 1");
    }
}
