//! Sequence document: objects with transform and clip tracks.
//!
//! Transform tracks interpolate, clip tracks step: the clip keyed last at or
//! before a frame is the one playing, and its elapsed time counts from that key.

use crate::track::Keyframes;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_END_FRAME: u32 = 100;

/// Animation or effect clip triggered by a key
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimClip {
    pub name: String,
    pub looping: bool,
}

/// Sampled transform of one object
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

/// Clip playing at a frame and how many frames ago it started
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveClip<'a> {
    pub clip: &'a AnimClip,
    pub elapsed: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceObject {
    pub name: String,
    /// Group expanded in the sequencer
    pub open: bool,
    pub position: Keyframes<[f32; 3]>,
    pub rotation: Keyframes<[f32; 3]>,
    pub scale: Keyframes<[f32; 3]>,
    pub animation: Keyframes<AnimClip>,
    pub effect: Keyframes<AnimClip>,
}

impl Default for SequenceObject {
    fn default() -> Self {
        Self::new("")
    }
}

impl SequenceObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: true,
            position: Keyframes::new(),
            rotation: Keyframes::new(),
            scale: Keyframes::new(),
            animation: Keyframes::new(),
            effect: Keyframes::new(),
        }
    }

    pub fn pose_at(&self, frame: u32) -> Pose {
        Pose {
            position: self.position.sample(frame, &[0.0; 3]),
            rotation: self.rotation.sample(frame, &[0.0; 3]),
            scale: self.scale.sample(frame, &[1.0; 3]),
        }
    }

    pub fn animation_at(&self, frame: u32) -> Option<ActiveClip<'_>> {
        active_clip(&self.animation, frame)
    }

    pub fn effect_at(&self, frame: u32) -> Option<ActiveClip<'_>> {
        active_clip(&self.effect, frame)
    }

    /// Total key count over all tracks
    pub fn key_count(&self) -> usize {
        self.position.len() + self.rotation.len() + self.scale.len() + self.animation.len() + self.effect.len()
    }
}

fn active_clip(keys: &Keyframes<AnimClip>, frame: u32) -> Option<ActiveClip<'_>> {
    keys.active_at(frame).map(|key| ActiveClip {
        clip: &key.value,
        elapsed: frame - key.frame,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceDocument {
    pub start_frame: u32,
    pub end_frame: u32,
    pub objects: Vec<SequenceObject>,
}

impl Default for SequenceDocument {
    fn default() -> Self {
        Self {
            start_frame: 0,
            end_frame: DEFAULT_END_FRAME,
            objects: Vec::new(),
        }
    }
}

impl SequenceDocument {
    pub fn object(&self, name: &str) -> Option<&SequenceObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Append an object named `base`, or `base N` when the name is taken.
    /// Returns the name used.
    pub fn add_object(&mut self, base: &str) -> String {
        let mut name = base.to_owned();
        let mut n = 1;
        while self.object(&name).is_some() {
            n += 1;
            name = format!("{} {}", base, n);
        }
        debug!("Adding object {:?}", name);
        self.objects.push(SequenceObject::new(name.clone()));
        name
    }

    pub fn remove_object(&mut self, name: &str) -> Option<SequenceObject> {
        let index = self.objects.iter().position(|o| o.name == name)?;
        debug!("Removing object {:?}", name);
        Some(self.objects.remove(index))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let doc: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse document: {}", path.display()))?;
        anyhow::ensure!(
            doc.start_frame < doc.end_frame,
            "Invalid frame range {}..{} in {}",
            doc.start_frame,
            doc.end_frame,
            path.display()
        );
        info!("Loaded document {} ({} objects)", path.display(), doc.objects.len());
        Ok(doc)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize document")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write document: {}", path.display()))?;
        info!("Saved document {}", path.display());
        Ok(())
    }
}
