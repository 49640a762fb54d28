//! Shape parameter validation errors
//!
//! The mesh generators never fail: bad parameters give NaN or degenerate
//! geometry. Callers that want to reject such parameters up front use the
//! `validate` functions of [`crate::Pyramid`] and [`crate::Ellipsoid`].
use thiserror::Error;

/// Result type alias for shape validation
pub type Result<T> = std::result::Result<T, ShapeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Too few faces or segments to close a ring
    #[error("{shape} needs at least {min} {what}, got {actual}")]
    TooFewSegments {
        shape: &'static str,
        what: &'static str,
        min: usize,
        actual: usize,
    },

    /// A length that must be strictly positive and finite
    #[error("{shape} {name} must be positive and finite, got {value}")]
    NonPositiveLength {
        shape: &'static str,
        name: &'static str,
        value: f32,
    },

    /// A height band whose start is not below its stop
    #[error("height band is empty: start {start} is not below stop {stop}")]
    EmptyHeightBand { start: f32, stop: f32 },
}

/// Checks that `value` is a usable length.
pub(crate) fn positive(shape: &'static str, name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ShapeError::NonPositiveLength { shape, name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive() {
        assert!(positive("pyramid", "height", 0.9).is_ok());
        assert!(positive("pyramid", "height", 0.0).is_err());
        assert!(positive("pyramid", "height", f32::NAN).is_err());
        assert!(positive("pyramid", "height", f32::INFINITY).is_err());
    }

    #[test]
    fn test_messages() {
        let error = ShapeError::TooFewSegments {
            shape: "pyramid",
            what: "faces",
            min: 3,
            actual: 2,
        };
        assert_eq!(error.to_string(), "pyramid needs at least 3 faces, got 2");
    }
}
