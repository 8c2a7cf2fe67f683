//! Keyframe tracks for animated properties.
//!
//! A track stores key times and a flat value buffer with `value_size`
//! components per key. Sampling finds the keys around `t` and lets the
//! track kind decide how to blend them.

mod tracks;

pub use tracks::{BooleanKeyframeTrack, BooleanTrack, NumberKeyframeTrack, NumberTrack, TrackKind};

use std::marker::PhantomData;

use crate::error::{Result, UniformError};

/// Keyframe track of kind `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<K: TrackKind> {
    property_path: String,
    times: Vec<f32>,
    values: Vec<K::Value>,
    value_size: usize,
    interpolant: bool,
    _kind: PhantomData<K>,
}

impl<K: TrackKind> KeyframeTrack<K> {
    /// Create a blending track.
    ///
    /// `times` must be finite and sorted ascending, and `values` must hold
    /// the same number of components for every key.
    pub fn new(
        property_path: impl Into<String>,
        times: Vec<f32>,
        values: Vec<K::Value>,
    ) -> Result<Self> {
        if times.is_empty() {
            return Err(UniformError::EmptyTrack);
        }
        if let Some(index) = times
            .iter()
            .enumerate()
            .position(|(i, &time)| !time.is_finite() || (i > 0 && time < times[i - 1]))
        {
            return Err(UniformError::InvalidKeyTime { index });
        }
        if values.is_empty() || values.len() % times.len() != 0 {
            return Err(UniformError::TrackLengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }

        Ok(Self {
            property_path: property_path.into(),
            value_size: values.len() / times.len(),
            times,
            values,
            interpolant: true,
            _kind: PhantomData,
        })
    }

    /// Disable blending: samples hold the value of the preceding key.
    pub fn with_interpolant(mut self, interpolant: bool) -> Self {
        self.interpolant = interpolant;
        self
    }

    pub fn value_type_name(&self) -> &'static str {
        K::VALUE_TYPE_NAME
    }

    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn values(&self) -> &[K::Value] {
        &self.values
    }

    /// Components per key.
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    pub fn interpolant(&self) -> bool {
        self.interpolant
    }

    /// Time of the last key.
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Components of key `index`.
    pub fn key(&self, index: usize) -> &[K::Value] {
        let start = index * self.value_size;
        &self.values[start..start + self.value_size]
    }

    /// Sample the track at `t` into `out`, which must hold
    /// [`value_size`](Self::value_size) components.
    ///
    /// Times before the first key or after the last one clamp to that key.
    /// NaN samples the first key.
    pub fn value_at<'a>(&self, t: f32, out: &'a mut [K::Value]) -> &'a mut [K::Value] {
        let last = self.times.len() - 1;
        let out = &mut out[..self.value_size];

        if t.is_nan() || t <= self.times[0] {
            out.copy_from_slice(self.key(0));
            return out;
        }
        if t >= self.times[last] {
            out.copy_from_slice(self.key(last));
            return out;
        }

        let index1 = self.times.partition_point(|&time| time <= t);
        let index0 = index1 - 1;
        let span = self.times[index1] - self.times[index0];
        let ratio = if span > 0.0 {
            (t - self.times[index0]) / span
        } else {
            0.0
        };

        K::interpolate(
            self.key(index0),
            self.key(index1),
            ratio,
            self.interpolant,
            out,
        );
        out
    }
}
