//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! [`Error::InvalidDensity`] and [`Error::InvalidConfig`] report bad caller input.
//! The remaining variants signal broken contracts between the generator, the
//! spatial grid and the angular range tracker and are never retried.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid density {density}: must be finite and > 0")]
    InvalidDensity { density: f32 },

    #[error("invalid angular interval [{lo}, {hi})")]
    InvalidInterval { lo: f32, hi: f32 },

    #[error("cannot sample from an empty range set")]
    EmptyRange,

    #[error("point ({x}, {y}) lies outside the grid extent")]
    OutOfBounds { x: f32, y: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns `true` for errors caused by caller input rather than internal contract violations.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InvalidDensity { .. } | Error::InvalidConfig(_))
    }
}
