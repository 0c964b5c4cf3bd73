//! Errors raised while advancing the physics.

use sluice_core::FieldError;
use thiserror::Error;

/// A physics step could not be completed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum HydroError {
    /// A field access fell outside its array.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Scratch arrays do not match the state they were built for.
    #[error("{stage}: face arrays span [{face_lo}, {face_hi}) but cells span [{cell_lo}, {cell_hi})")]
    Shape {
        /// Stage that found the mismatch.
        stage: &'static str,
        /// Face range.
        face_lo: i64,
        /// Face range end.
        face_hi: i64,
        /// Cell range.
        cell_lo: i64,
        /// Cell range end.
        cell_hi: i64,
    },
    /// `dt` is negative or not finite.
    #[error("step size {dt} is not a finite non-negative number")]
    BadStep {
        /// The offending step size.
        dt: f64,
    },
}
