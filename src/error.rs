//! Error types for uniform reflection and animation tracks.

use thiserror::Error;

/// Errors raised while building uniform trees or keyframe tracks.
///
/// Runtime uploads never fail through this type: unknown names and
/// unsupported uniform types are silent no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UniformError {
    #[error("malformed uniform name: {name:?}")]
    MalformedName { name: String },
    #[error("keyframe track has {values} values for {times} times")]
    TrackLengthMismatch { times: usize, values: usize },
    #[error("keyframe track has no keyframes")]
    EmptyTrack,
    #[error("keyframe time {index} is not finite or goes backwards")]
    InvalidKeyTime { index: usize },
}

pub type Result<T> = std::result::Result<T, UniformError>;
