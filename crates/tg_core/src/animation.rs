//! Frame-based sprite animation clips and their playback cursor.
//!
//! A clip is an ordered list of frames, each shown for a fixed number of
//! milliseconds. Clips are immutable once built and can be shared between any
//! number of sprites; every sprite owns its own `AnimationState`, so two
//! sprites playing the same clip never disturb each other's timing.
//!
//! Time is tracked in whole milliseconds (`u64`), the same unit the simulation
//! uses for its per-frame elapsed time.

/// A single frame in an animation clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
    pub sprite_id: String,
    pub duration_ms: u64,
}

/// A sequence of frames that either loops forever or holds its last frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationClip {
    pub frames: Vec<AnimationFrame>,
    pub looping: bool,
}

impl AnimationClip {
    /// Build a clip from sprite ids that all share one frame duration.
    pub fn uniform<I, S>(sprite_ids: I, duration_ms: u64, looping: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: sprite_ids
                .into_iter()
                .map(|id| AnimationFrame {
                    sprite_id: id.into(),
                    duration_ms,
                })
                .collect(),
            looping,
        }
    }

    /// Total duration of one full cycle in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_ms).sum()
    }
}

/// Runtime playback cursor for one sprite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationState {
    pub frame_index: usize,
    pub elapsed_ms: u64,
    pub finished: bool,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewind to the first frame with a zeroed clock.
    pub fn restart(&mut self) {
        self.frame_index = 0;
        self.elapsed_ms = 0;
        self.finished = false;
    }

    /// Sprite id of the frame currently shown, without advancing time.
    pub fn current<'a>(&self, clip: &'a AnimationClip) -> &'a str {
        clip.frames
            .get(self.frame_index)
            .or_else(|| clip.frames.last())
            .map(|f| f.sprite_id.as_str())
            .unwrap_or("")
    }

    /// Advance the animation by `dt_ms` milliseconds and return the sprite id
    /// of the frame that is now current.
    pub fn tick<'a>(&mut self, dt_ms: u64, clip: &'a AnimationClip) -> &'a str {
        if clip.frames.is_empty() || self.finished {
            return self.current(clip);
        }
        if self.frame_index >= clip.frames.len() {
            self.restart();
        }

        self.elapsed_ms += dt_ms;

        // Long frames (a stalled loop) may skip whole cycles; reduce first so
        // the walk below stays bounded.
        let cycle = clip.total_duration_ms();
        if clip.looping && cycle > 0 && self.elapsed_ms >= cycle {
            self.elapsed_ms %= cycle;
            if self.elapsed_ms == 0 {
                self.frame_index = 0;
                return &clip.frames[0].sprite_id;
            }
        }

        loop {
            let current_frame = &clip.frames[self.frame_index];
            if self.elapsed_ms < current_frame.duration_ms {
                break;
            }

            self.elapsed_ms -= current_frame.duration_ms;
            self.frame_index += 1;

            if self.frame_index >= clip.frames.len() {
                if clip.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = clip.frames.len() - 1;
                    self.elapsed_ms = 0;
                    self.finished = true;
                    break;
                }
            }
        }

        &clip.frames[self.frame_index].sprite_id
    }
}
