//! Keyframe container shared by the sequencer rows and the document model.
//!
//! Keys are kept sorted by frame. Several keys may share a frame; a new key
//! lands after the existing ones so insertion order breaks ties.

use serde::{Deserialize, Serialize};
use std::ops::Index;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub frame: u32,
    pub value: T,
}

/// Linear interpolation between two values, `t` in `[0, 1]`
pub trait Lerp {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl<const N: usize> Lerp for [f32; N] {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        std::array::from_fn(|i| self[i].lerp(&other[i], t))
    }
}

/// Frame-sorted keyframes of one track
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyframes<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> Default for Keyframes<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T> Keyframes<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe<T>> {
        self.keys.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Keyframe<T>> {
        self.keys.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.keys.get_mut(index).map(|k| &mut k.value)
    }

    pub fn frames(&self) -> impl Iterator<Item = u32> + '_ {
        self.keys.iter().map(|k| k.frame)
    }

    /// Insert keeping frame order. Returns the new key's index.
    pub fn insert(&mut self, frame: u32, value: T) -> usize {
        let index = self.keys.partition_point(|k| k.frame <= frame);
        self.keys.insert(index, Keyframe { frame, value });
        index
    }

    pub fn remove(&mut self, index: usize) -> Option<Keyframe<T>> {
        (index < self.keys.len()).then(|| self.keys.remove(index))
    }

    /// Move key `index` to `frame`, re-sorting. Returns its new index.
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_frame(&mut self, index: usize, frame: u32) -> usize {
        let value = self.keys.remove(index).value;
        self.insert(frame, value)
    }

    /// Index of the last key at or before `frame`
    pub fn active_index(&self, frame: u32) -> Option<usize> {
        self.keys.partition_point(|k| k.frame <= frame).checked_sub(1)
    }

    /// Last key at or before `frame` (step evaluation)
    pub fn active_at(&self, frame: u32) -> Option<&Keyframe<T>> {
        self.active_index(frame).map(|i| &self.keys[i])
    }
}

impl<T: Lerp + Clone> Keyframes<T> {
    /// Interpolated value at `frame`.
    ///
    /// Before the first key the value blends from `default`, anchored one
    /// frame before frame 0, so frame 0 already leans toward the first key.
    /// After the last key it holds.
    pub fn sample(&self, frame: u32, default: &T) -> T {
        if self.keys.is_empty() {
            return default.clone();
        }
        let next = self.keys.partition_point(|k| k.frame <= frame);
        if next == self.keys.len() {
            return self.keys[next - 1].value.clone();
        }
        let (from_frame, from_value) = match next {
            0 => (-1, default),
            i => (i64::from(self.keys[i - 1].frame), &self.keys[i - 1].value),
        };
        let to = &self.keys[next];
        let t = (i64::from(frame) - from_frame) as f32 / (i64::from(to.frame) - from_frame) as f32;
        from_value.lerp(&to.value, t)
    }
}

impl<T> Index<usize> for Keyframes<T> {
    type Output = Keyframe<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.keys[index]
    }
}

impl<T> FromIterator<(u32, T)> for Keyframes<T> {
    fn from_iter<I: IntoIterator<Item = (u32, T)>>(iter: I) -> Self {
        let mut keys = Self::new();
        for (frame, value) in iter {
            keys.insert(frame, value);
        }
        keys
    }
}

impl<'a, T> IntoIterator for &'a Keyframes<T> {
    type Item = &'a Keyframe<T>;
    type IntoIter = std::slice::Iter<'a, Keyframe<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
