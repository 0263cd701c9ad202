//! Error types for toolpath planning.

use thiserror::Error;

/// The precondition that a set of input parameters failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    #[error("{name} must be a positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("depth must not be negative, got {value}")]
    NegativeDepth { value: f64 },

    #[error("finished diameter {target} cannot exceed the stock diagonal {limit:.4}")]
    ExceedsDiagonal { target: f64, limit: f64 },

    #[error("finished diameter {target} must be less than stock size {stock}")]
    NotSmallerThanStock { target: f64, stock: f64 },

    #[error("safe Z {safe_z} must be above the work")]
    ClearanceNotAboveStock { safe_z: f64 },

    #[error("engage depth {engage} must be less than the length {length}")]
    EngageBeyondLength { engage: f64, length: f64 },

    #[error("{name} must be at least 1")]
    NoStations { name: &'static str },

    #[error("cut needs {passes} passes, more than the limit of {limit}")]
    TooManyPasses { passes: f64, limit: usize },

    #[error("cut plan removes {actual:.6}, but the stock needs {expected:.6}")]
    PlanMismatch { expected: f64, actual: f64 },
}

/// Errors raised while planning a toolpath. All of them are raised before the first
/// waypoint is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(#[from] Fault),
}

impl Error {
    /// The violated precondition.
    pub fn fault(&self) -> &Fault {
        match self {
            Error::InvalidGeometry(fault) => fault,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fail with `NonPositive` unless `value` is strictly positive, and with `NotFinite` if it is
/// infinite. NaN is non-positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_infinite() {
        Err(Fault::NotFinite { name, value }.into())
    } else if value > 0.0 {
        Ok(value)
    } else {
        Err(Fault::NonPositive { name, value }.into())
    }
}
