//! Outbound results of a simulation step
//!
//! The core never calls into the shell. Each step returns a [`StepReport`]
//! which the shell consumes synchronously, in order.

use serde::{Deserialize, Serialize};

/// Why points were awarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreReason {
    Coin,
    Stomp,
    BossHit,
    BossDefeated,
}

/// How the player got hurt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    /// Touched an enemy or the boss without stomping
    Hit,
    /// Dropped below the level grid
    Fall,
}

/// Mutations requested of the shell-owned aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreGained { amount: u64, reason: ScoreReason },
    /// Always emitted before a `GameOver` from the same damage
    LifeLost { cause: DamageCause },
    GameOver,
    LevelComplete,
}

/// Presentation triggers. Dropping these never changes simulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    Coin,
    Stomp,
    Hurt,
    LevelComplete,
    GameOver,
}

/// Everything one step produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub events: Vec<GameEvent>,
    pub cues: Vec<SoundCue>,
}

impl StepReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.cues.is_empty()
    }

    pub(crate) fn score(&mut self, amount: u64, reason: ScoreReason) {
        self.events.push(GameEvent::ScoreGained { amount, reason });
    }

    /// Total points awarded in this step
    pub fn score_total(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match e {
                GameEvent::ScoreGained { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }

    pub fn count(&self, wanted: GameEvent) -> usize {
        self.events.iter().filter(|e| **e == wanted).count()
    }

    pub fn lives_lost(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
            .count()
    }
}
