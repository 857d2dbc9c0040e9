//! Frame clock feeding the simulation its per-step elapsed time.
//!
//! Two stepping models are supported:
//!  - **Variable**: one simulation step per rendered frame, carrying the
//!    measured frame time. Movement and gravity scale with that time, so runs
//!    at different frame rates are not bit-identical.
//!  - **Fixed**: frame time feeds an accumulator that is drained in equal
//!    slices, which makes a run reproducible for a given input script.
//!
//! Both modes cap a single frame's contribution so a stall (debugger, window
//! drag) cannot turn into one enormous physics step.

use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestep {
    Variable,
    Fixed { step_ms: u64 },
}

pub struct FrameClock {
    pub timestep: Timestep,
    pub max_frame_ms: u64,
    accumulator_ms: u64,
    pending_ms: Option<u64>,
    pub total_ms: u64,
    pub frame_count: u64,
    pub step_count: u64,
    pub steps_this_frame: u32,
    pub real_dt_ms: u64,
    last_instant: Instant,
}

impl FrameClock {
    pub fn new(timestep: Timestep) -> Self {
        Self {
            timestep,
            max_frame_ms: 250,
            accumulator_ms: 0,
            pending_ms: None,
            total_ms: 0,
            frame_count: 0,
            step_count: 0,
            steps_this_frame: 0,
            real_dt_ms: 0,
            last_instant: Instant::now(),
        }
    }

    /// Measure wall-clock time since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let dt_ms = now.duration_since(self.last_instant).as_millis() as u64;
        self.last_instant = now;
        self.feed(dt_ms);
    }

    /// Feed an externally measured (or scripted) frame duration.
    pub fn feed(&mut self, dt_ms: u64) {
        let mut dt_ms = dt_ms;
        if dt_ms > self.max_frame_ms {
            log::warn!(
                "Frame took {}ms, capping to {}ms",
                dt_ms,
                self.max_frame_ms
            );
            dt_ms = self.max_frame_ms;
        }

        self.real_dt_ms = dt_ms;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        match self.timestep {
            Timestep::Variable => self.pending_ms = Some(dt_ms),
            Timestep::Fixed { .. } => self.accumulator_ms += dt_ms,
        }
    }

    /// Elapsed milliseconds for the next simulation step of this frame, or
    /// `None` once the frame's time has been consumed.
    pub fn next_step(&mut self) -> Option<u64> {
        let step = match self.timestep {
            Timestep::Variable => self.pending_ms.take()?,
            Timestep::Fixed { step_ms } => {
                if step_ms == 0 || self.accumulator_ms < step_ms {
                    return None;
                }
                self.accumulator_ms -= step_ms;
                step_ms
            }
        };
        self.total_ms += step;
        self.step_count += 1;
        self.steps_this_frame += 1;
        Some(step)
    }

    /// Whole seconds of simulated time.
    pub fn seconds_passed(&self) -> u64 {
        self.total_ms / 1000
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Timestep::Variable)
    }
}
