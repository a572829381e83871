//! Host-driven simulation clock
//!
//! The host calls [`Simulation::frame`] from its frame callback with a
//! millisecond timestamp. Elapsed time is converted to reference frames and
//! one step is run per callback. Pausing simply stops steps from running.

use super::event::StepReport;
use super::level::{LevelError, parse_level};
use super::state::World;
use super::tick::{Attempt, AttemptStatus, StepInput};
use crate::consts::FRAME_MS;

/// Convert a wall-clock gap to reference frames. Not clamped; a backwards
/// timestamp counts as no time.
#[inline]
pub fn normalize_elapsed(elapsed_ms: f64) -> f32 {
    (elapsed_ms.max(0.0) / FRAME_MS) as f32
}

/// Tracks the last frame timestamp and the paused flag
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    last_ms: Option<f64>,
    paused: bool,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step scale for a frame at `now_ms`, or `None` when paused or when
    /// this is the first frame since a (re)start.
    pub fn advance(&mut self, now_ms: f64) -> Option<f32> {
        if self.paused {
            return None;
        }
        self.last_ms
            .replace(now_ms)
            .map(|prev| normalize_elapsed(now_ms - prev))
    }

    /// Idempotent. Any change drops the baseline so the paused gap is
    /// never integrated.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        self.last_ms = None;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Forget the baseline; the next frame only records its timestamp
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// A loaded level attempt plus the clock that drives it
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    attempt: Option<Attempt>,
    clock: SimClock,
    /// Host guard against huge gaps (tab switches, debugger stops)
    max_step: Option<f32>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `rows` and reset all entity state. Calling it again with the
    /// same rows yields the same world. On error nothing stays loaded.
    pub fn initialize<S: AsRef<str>>(&mut self, rows: &[S]) -> Result<(), LevelError> {
        self.attempt = None;
        self.clock.reset();
        let world = parse_level(rows)?;
        log::info!(
            "Level initialized: {}x{}, {} coins, {} enemies",
            world.cols,
            world.rows,
            world.coins.len(),
            world.enemy_count()
        );
        self.attempt = Some(Attempt::new(world));
        Ok(())
    }

    /// Drop the loaded level
    pub fn unload(&mut self) {
        self.attempt = None;
        self.clock.reset();
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.clock.is_paused() != paused {
            log::debug!("Simulation {}", if paused { "paused" } else { "resumed" });
        }
        self.clock.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Cap on the step scale of a single frame; `None` leaves it unclamped
    pub fn set_max_step(&mut self, max_step: Option<f32>) {
        self.max_step = max_step;
    }

    /// Run at most one step for a host frame at `now_ms`
    pub fn frame(&mut self, now_ms: f64, input: &StepInput) -> StepReport {
        let Some(mut dt) = self.clock.advance(now_ms) else {
            return StepReport::default();
        };
        if let Some(max) = self.max_step {
            dt = dt.min(max);
        }
        self.step(input, dt)
    }

    /// Run one step of `dt` reference frames, bypassing the clock
    pub fn step(&mut self, input: &StepInput, dt: f32) -> StepReport {
        match self.attempt.as_mut() {
            Some(attempt) => attempt.step(input, dt),
            None => {
                log::warn!("Step requested before a level was initialized");
                StepReport::default()
            }
        }
    }

    pub fn world(&self) -> Option<&World> {
        self.attempt.as_ref().map(Attempt::world)
    }

    pub fn status(&self) -> Option<AttemptStatus> {
        self.attempt.as_ref().map(Attempt::status)
    }
}
