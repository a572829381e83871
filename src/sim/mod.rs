//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Normalized step scale only (1.0 = one reference frame)
//! - Stable iteration order (actors keyed by tile identity)
//! - No rendering, audio or platform dependencies
//! - Outbound effects are returned as events, never invoked inline

pub mod clock;
pub mod collision;
pub mod event;
pub mod interact;
pub mod level;
pub mod state;
pub mod tick;
pub mod update;

pub use clock::{SimClock, Simulation, normalize_elapsed};
pub use collision::{Axis, Contact, overlaps, resolve_axis};
pub use event::{DamageCause, GameEvent, ScoreReason, SoundCue, StepReport};
pub use level::{LevelError, Tile, parse_level};
pub use state::{
    Actor, ActorKind, Body, BossState, Coin, Direction, EnemyBehavior, EnemyState, EntityId,
    Invincibility, Platform, PlayerState, World,
};
pub use tick::{Attempt, AttemptStatus, StepInput};
