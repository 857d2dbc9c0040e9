//! Per-kind animation sets and the animator each sprite carries.
//!
//! An `AnimationSet` maps the handful of poses a sprite kind can show
//! (`AnimKey`) to immutable clips from `tg_core::animation`. Sets are built once
//! per template and shared through an `Arc`; the `Animator` owns the mutable
//! playback cursor, so spawning a sprite never shares timing with its template.

use std::collections::HashMap;
use std::sync::Arc;

use tg_core::animation::{AnimationClip, AnimationState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimKey {
    Idle,
    RunLeft,
    RunRight,
    DeadLeft,
    DeadRight,
    IdleLeft,
    IdleRight,
    JumpLeft,
    JumpRight,
    FallLeft,
    FallRight,
    AttackLeft,
    AttackRight,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    clips: HashMap<AnimKey, AnimationClip>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: AnimKey, clip: AnimationClip) -> Self {
        self.clips.insert(key, clip);
        self
    }

    pub fn clip(&self, key: AnimKey) -> Option<&AnimationClip> {
        self.clips.get(&key)
    }

    pub fn contains(&self, key: AnimKey) -> bool {
        self.clips.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Animator {
    set: Arc<AnimationSet>,
    current: AnimKey,
    state: AnimationState,
}

impl Animator {
    pub fn new(set: Arc<AnimationSet>, initial: AnimKey) -> Self {
        Self {
            set,
            current: initial,
            state: AnimationState::new(),
        }
    }

    pub fn current(&self) -> AnimKey {
        self.current
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Show `key` for this frame. Switching to a different clip restarts it
    /// from its first frame; staying on the same clip advances its clock by
    /// `elapsed_ms`. Keys the set has no clip for are ignored.
    pub fn play(&mut self, key: AnimKey, elapsed_ms: u64) {
        if key != self.current && self.set.contains(key) {
            log::trace!("animation {:?} -> {:?}", self.current, key);
            self.current = key;
            self.state.restart();
        } else {
            self.advance(elapsed_ms);
        }
    }

    /// Advance the current clip without reconsidering the pose.
    pub fn advance(&mut self, elapsed_ms: u64) {
        if let Some(clip) = self.set.clip(self.current) {
            self.state.tick(elapsed_ms, clip);
        }
    }

    /// Sprite id of the frame currently on screen.
    pub fn frame_id(&self) -> &str {
        self.set
            .clip(self.current)
            .map(|clip| self.state.current(clip))
            .unwrap_or("")
    }

    pub fn shares_clips_with(&self, other: &Animator) -> bool {
        Arc::ptr_eq(&self.set, &other.set)
    }
}
