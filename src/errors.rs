//! Error types for celestial coordinate and orbital mechanics operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during celestial coordinate and orbital mechanics operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AstroError {
    /// Requested epoch is outside the valid range for the transformation.
    #[error("epoch {epoch} is outside valid range [JD {min_jd}, JD {max_jd}]")]
    EpochOutOfRange {
        /// The requested epoch
        epoch: DateTime<Utc>,
        /// Minimum valid Julian Date
        min_jd: f64,
        /// Maximum valid Julian Date
        max_jd: f64,
    },

    /// Time scale conversion failed.
    #[error("time scale conversion failed: {reason}")]
    TimeScaleConversionFailed {
        /// Description of the conversion failure
        reason: String,
    },

    /// Invalid celestial coordinates (e.g., declination outside [-90°, 90°]).
    #[error("invalid celestial coordinates: {reason}")]
    InvalidCoordinates {
        /// Description of the invalid coordinates
        reason: String,
    },

    /// Numerical precision issue in coordinate transformation.
    #[error("numerical precision error: {reason}")]
    NumericalPrecisionError {
        /// Description of the precision issue
        reason: String,
    },

    /// An orbit's elements violate one of the module's physical invariants
    /// (eccentricity near zero, inclination near zero, non-elliptical energy,
    /// perigee radius below the central body's surface, etc).
    #[error("invalid orbit: {reason}")]
    InvalidOrbit {
        /// Description of which invariant was violated
        reason: String,
    },

    /// A fixed-format record (TLE, ephemeris line, etc) could not be parsed.
    #[error("failed to parse {what}: {reason}")]
    ParseFailure {
        /// What was being parsed
        what: String,
        /// Description of the parse failure
        reason: String,
    },

    /// An iterative solver (Kepler's equation, Fukushima's quartic, a
    /// shooting method) exhausted its iteration budget without converging.
    #[error("{solver} failed to converge after {iterations} iterations")]
    NonConvergence {
        /// Name of the solver that failed to converge
        solver: String,
        /// Number of iterations attempted
        iterations: u32,
    },

    /// Two identically-named entities (e.g. satellites in a catalog) collided.
    #[error("name collision: {name}")]
    NameCollision {
        /// The colliding name
        name: String,
    },
}

/// Result type for astrodynamics operations.
pub type AstroResult<T> = Result<T, AstroError>;

// Aliases kept for callers that still refer to the celestial-frame-only
// naming predating the broader orbital-mechanics scope of this crate.
pub use AstroError as CelestialError;
pub use AstroResult as CelestialResult;
