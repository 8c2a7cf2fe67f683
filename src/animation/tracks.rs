//! Track kinds: how the keys around a sample time are blended.

use std::fmt::Debug;

use super::KeyframeTrack;

/// Value type and blending rule of a keyframe track.
pub trait TrackKind {
    type Value: Copy + Debug + PartialEq;

    /// Name of the animated value type.
    const VALUE_TYPE_NAME: &'static str;

    /// Write the sample between keys `v0` and `v1` at `ratio` in `[0, 1)`.
    fn interpolate(
        v0: &[Self::Value],
        v1: &[Self::Value],
        ratio: f32,
        interpolant: bool,
        out: &mut [Self::Value],
    );
}

/// Numeric properties, blended linearly per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberTrack;

impl TrackKind for NumberTrack {
    type Value = f32;
    const VALUE_TYPE_NAME: &'static str = "number";

    fn interpolate(v0: &[f32], v1: &[f32], ratio: f32, interpolant: bool, out: &mut [f32]) {
        if !interpolant {
            out.copy_from_slice(v0);
            return;
        }
        for ((out, &a), &b) in out.iter_mut().zip(v0).zip(v1) {
            *out = a * (1.0 - ratio) + b * ratio;
        }
    }
}

/// Boolean properties. Always step: a sample holds the preceding key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanTrack;

impl TrackKind for BooleanTrack {
    type Value = bool;
    const VALUE_TYPE_NAME: &'static str = "bool";

    fn interpolate(v0: &[bool], _v1: &[bool], _ratio: f32, _interpolant: bool, out: &mut [bool]) {
        out.copy_from_slice(v0);
    }
}

pub type NumberKeyframeTrack = KeyframeTrack<NumberTrack>;
pub type BooleanKeyframeTrack = KeyframeTrack<BooleanTrack>;
