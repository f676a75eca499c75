use chrono::{DateTime, Utc};

use crate::geodesy::GeoError;
use crate::quantity::UnitMismatch;

/// Errors surfaced by a simulation run.
///
/// Every variant is a configuration or programming defect: the engine does
/// pure arithmetic and never retries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Two quantities of incompatible dimensions were combined.
    #[error(transparent)]
    UnitMismatch(#[from] UnitMismatch),

    /// A coordinate was outside the valid latitude/longitude domain, or a
    /// heading was requested between antipodal points.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(GeoError),

    /// `date_delta` is zero or negative, so the run would never end.
    #[error("date delta must be positive, got {delta_ms} ms")]
    NonAdvancingTime { delta_ms: i64 },

    /// `date_max` is not after `date_start`.
    #[error("date_max {max} must be after date_start {start}")]
    ConfigurationRange {
        start: DateTime<Utc>,
        max: DateTime<Utc>,
    },

    /// Advancing a step date left the representable range.
    #[error("step date overflowed after {0}")]
    DateOverflow(DateTime<Utc>),
}

impl From<GeoError> for SimError {
    fn from(err: GeoError) -> Self {
        match err {
            // Unit errors keep their own kind even when raised by geodesy.
            GeoError::Unit(mismatch) => SimError::UnitMismatch(mismatch),
            other => SimError::InvalidCoordinate(other),
        }
    }
}
