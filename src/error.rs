use std::error::Error;
use std::fmt;

/// Errors surfaced by curve and point operations.
///
/// The algebraic special cases (adding inverse points, doubling a point of
/// order two, infinity operands) are never errors; they produce the
/// corresponding group element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcError {
    /// A malformed argument: negative doubling count, arithmetic on a
    /// detached point, a rejected point encoding, and similar.
    InvalidArgument(String),
    /// An affine coordinate accessor was called on a projective point
    /// with Z != 1.
    NotNormalized,
    /// Two points from curves with different parameters were combined.
    CurveMismatch,
    /// The operation has no branch for the point's coordinate system.
    UnsupportedCoordinateSystem,
    /// A point failed its curve-equation check.
    InvariantViolation(String),
}

impl fmt::Display for EcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            EcError::NotNormalized => write!(f, "point not in normal form"),
            EcError::CurveMismatch => {
                write!(f, "points on different curves cannot be combined")
            }
            EcError::UnsupportedCoordinateSystem => {
                write!(f, "unsupported coordinate system for this operation")
            }
            EcError::InvariantViolation(msg) => write!(f, "curve invariant broken: {}", msg),
        }
    }
}

impl Error for EcError {}

pub type EcResult<T> = Result<T, EcError>;

impl EcError {
    pub(crate) fn invalid(msg: impl Into<String>) -> EcError {
        EcError::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            EcError::invalid("'e' cannot be negative").to_string(),
            "invalid argument: 'e' cannot be negative"
        );
        assert_eq!(EcError::NotNormalized.to_string(), "point not in normal form");
        assert!(EcError::CurveMismatch.to_string().contains("different curves"));
    }
}
