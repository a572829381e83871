//! Game shell: screen flow and the counters that outlive a level
//!
//! The shell owns score, lives, the level index and the outer phase. It
//! drives the [`Simulation`] once per host frame and applies the returned
//! events in order. It never reaches into entity state.

use serde::Serialize;

use crate::audio::AudioManager;
use crate::consts::LEVEL_COMPLETE_DELAY_MS;
use crate::input::{Action, Controls};
use crate::levels::{LevelPack, LevelPackError};
use crate::settings::Settings;
use crate::sim::{GameEvent, LevelError, Simulation, StepInput, StepReport, World};

/// Outer game state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ShellPhase {
    #[default]
    Menu,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
    Victory,
}

/// Render-facing view of the shell
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    phase: ShellPhase,
    score: u64,
    lives: u32,
    /// 1-based for display
    level: usize,
    level_name: &'a str,
    world: Option<&'a World>,
}

pub struct GameShell {
    pack: LevelPack,
    settings: Settings,
    sim: Simulation,
    audio: AudioManager,
    controls: Controls,

    phase: ShellPhase,
    score: u64,
    lives: u32,
    level_index: usize,
    /// Host time at which a signalled level-complete becomes visible
    complete_at: Option<f64>,
}

impl GameShell {
    pub fn new(pack: LevelPack, settings: Settings) -> Self {
        let mut sim = Simulation::new();
        sim.set_max_step(settings.max_step());
        Self {
            audio: AudioManager::from_settings(&settings),
            lives: settings.starting_lives,
            pack,
            settings,
            sim,
            controls: Controls::default(),
            phase: ShellPhase::Menu,
            score: 0,
            level_index: 0,
            complete_at: None,
        }
    }

    /// Shell over the bundled levels
    pub fn with_bundled(settings: Settings) -> Result<Self, LevelPackError> {
        Ok(Self::new(LevelPack::bundled()?, settings))
    }

    // === Commands ===

    /// Fresh game from the first level
    pub fn start_game(&mut self) -> Result<(), LevelError> {
        self.score = 0;
        self.lives = self.settings.starting_lives;
        self.level_index = 0;
        log::info!("Starting new game with {} lives", self.lives);
        self.enter_level()
    }

    /// Same as starting over from the menu
    pub fn restart(&mut self) -> Result<(), LevelError> {
        self.start_game()
    }

    pub fn quit_to_menu(&mut self) {
        self.sim.unload();
        self.complete_at = None;
        self.controls.clear();
        self.set_phase(ShellPhase::Menu);
    }

    /// Escape: Playing <-> Paused. Ignored in every other phase.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            ShellPhase::Playing => self.pause(),
            ShellPhase::Paused => {
                self.sim.set_paused(false);
                self.set_phase(ShellPhase::Playing);
            }
            _ => {}
        }
    }

    /// Pause if playing (focus loss, tab hidden)
    pub fn pause(&mut self) {
        if self.phase == ShellPhase::Playing {
            self.sim.set_paused(true);
            self.set_phase(ShellPhase::Paused);
        }
    }

    /// Advance from the level-complete screen; Victory after the last level
    pub fn next_level(&mut self) -> Result<(), LevelError> {
        if self.phase != ShellPhase::LevelComplete {
            log::warn!("next_level ignored in phase {:?}", self.phase);
            return Ok(());
        }
        if self.level_index + 1 < self.pack.len() {
            self.level_index += 1;
            self.enter_level()
        } else {
            self.sim.unload();
            self.set_phase(ShellPhase::Victory);
            Ok(())
        }
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        match Action::from_key(key) {
            Some(Action::Pause) => {
                self.toggle_pause();
                true
            }
            Some(action) => self.controls.set(action, true),
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match Action::from_key(key) {
            Some(action) => self.controls.set(action, false),
            None => false,
        }
    }

    // === Frame ===

    /// One host frame at `now_ms`. Runs at most one simulation step.
    pub fn frame(&mut self, now_ms: f64) -> StepReport {
        if let Some(at) = self.complete_at {
            if now_ms >= at {
                self.complete_at = None;
                self.sim.set_paused(true);
                self.set_phase(ShellPhase::LevelComplete);
            }
        }

        if self.phase != ShellPhase::Playing {
            return StepReport::default();
        }

        let input = StepInput {
            controls: self.controls,
            lives: self.lives,
        };
        let report = self.sim.frame(now_ms, &input);

        self.audio.play_all(&report.cues);
        for &event in &report.events {
            self.apply_event(event, now_ms);
        }
        report
    }

    /// Apply one outbound simulation event
    pub fn apply_event(&mut self, event: GameEvent, now_ms: f64) {
        match event {
            GameEvent::ScoreGained { amount, .. } => self.score += amount,
            GameEvent::LifeLost { cause } => {
                self.lives = self.lives.saturating_sub(1);
                log::debug!("Life lost ({:?}), {} left", cause, self.lives);
            }
            GameEvent::GameOver => {
                self.complete_at = None;
                log::info!("Game over with score {}", self.score);
                self.set_phase(ShellPhase::GameOver);
            }
            GameEvent::LevelComplete => {
                log::info!("Level {} complete, score {}", self.level_index + 1, self.score);
                self.complete_at = Some(now_ms + LEVEL_COMPLETE_DELAY_MS);
            }
        }
    }

    fn enter_level(&mut self) -> Result<(), LevelError> {
        let Some(level) = self.pack.get(self.level_index) else {
            log::warn!("No level at index {}", self.level_index);
            self.quit_to_menu();
            return Ok(());
        };
        log::info!("Loading {}", level.name);
        if let Err(e) = self.sim.initialize(level.rows.as_slice()) {
            log::error!("Failed to load {}: {}", level.name, e);
            self.quit_to_menu();
            return Err(e);
        }
        self.sim.set_paused(false);
        self.complete_at = None;
        self.controls.clear();
        self.audio.resume();
        self.set_phase(ShellPhase::Playing);
        Ok(())
    }

    fn set_phase(&mut self, phase: ShellPhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.pack.len()
    }

    pub fn level_name(&self) -> &str {
        self.pack
            .get(self.level_index)
            .map_or("", |level| level.name.as_str())
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn world(&self) -> Option<&World> {
        self.sim.world()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.sim.set_max_step(settings.max_step());
        self.settings = settings;
    }

    /// Phase, counters and the live world as JSON for the renderer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Snapshot {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            level: self.level_index + 1,
            level_name: self.level_name(),
            world: self.world(),
        })
    }
}
