//! One level attempt, stepped deterministically
//!
//! An [`Attempt`] owns the initial snapshot of a parsed level and the live
//! world. Each step runs movement, then interactions, then applies the
//! resolution (respawn, game over or level complete).

use serde::{Deserialize, Serialize};

use super::event::StepReport;
use super::interact::{self, Resolution};
use super::state::World;
use super::update;
use crate::input::Controls;

/// Input for a single step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInput {
    /// Held controls for this step
    pub controls: Controls,
    /// Lives the shell holds going into the step
    pub lives: u32,
}

/// Where the attempt stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptStatus {
    #[default]
    Running,
    /// Level complete was signalled; no more steps
    Complete,
    /// Game over was signalled; no more steps
    Dead,
}

/// A level attempt: the parsed layout plus the world being played
#[derive(Debug, Clone)]
pub struct Attempt {
    initial: World,
    world: World,
    status: AttemptStatus,
}

impl Attempt {
    pub fn new(initial: World) -> Self {
        Self {
            world: initial.clone(),
            initial,
            status: AttemptStatus::Running,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    /// Advance the attempt by `dt` reference frames
    pub fn step(&mut self, input: &StepInput, dt: f32) -> StepReport {
        let mut report = StepReport::default();

        if self.status != AttemptStatus::Running {
            log::trace!("Step ignored, attempt is {:?}", self.status);
            return report;
        }
        if self.world.player().is_none() {
            log::warn!("Step requested with no player loaded; idling");
            return report;
        }

        update::integrate(&mut self.world, &input.controls, dt, &mut report);

        let mut lives = input.lives;
        match interact::resolve(&mut self.world, &mut lives, &mut report) {
            Resolution::Continue => {}
            Resolution::Respawn => {
                log::info!("Fell off the level, respawning ({} lives left)", lives);
                self.world = self.initial.clone();
            }
            Resolution::Dead => self.status = AttemptStatus::Dead,
            Resolution::Complete => self.status = AttemptStatus::Complete,
        }

        if !report.is_empty() {
            log::trace!("Step report: {:?}", report);
        }
        report
    }
}
