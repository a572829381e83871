//! Platform Quest - a tile-based platformer
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (level parsing, physics, interactions)
//! - `levels`: The bundled level pack
//! - `shell`: Score/lives/level bookkeeping and screen flow around the simulation
//! - `input`: Keyboard to control mapping
//! - `audio`: Sound cue playback
//! - `settings`: Player preferences and host guards

pub mod audio;
pub mod input;
pub mod levels;
pub mod settings;
pub mod shell;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Action, Controls};
pub use levels::{LevelDef, LevelPack, LevelPackError};
pub use settings::{Settings, SettingsError};
pub use shell::{GameShell, ShellPhase};

/// Game configuration constants
pub mod consts {
    /// Side length of one grid cell in world units
    pub const TILE_SIZE: f32 = 48.0;

    /// Reference frame duration; one simulation unit is one frame of this length
    pub const FRAME_MS: f64 = 16.67;

    /// Physics (per reference frame)
    pub const GRAVITY: f32 = 0.8;
    pub const MAX_FALL_SPEED: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Negative is up
    pub const JUMP_STRENGTH: f32 = -18.0;

    /// Bounce after stomping an enemy
    pub const STOMP_BOUNCE: f32 = JUMP_STRENGTH / 1.5;
    /// Bounce after stomping the boss
    pub const BOSS_STOMP_BOUNCE: f32 = JUMP_STRENGTH;
    /// Knockback after a non-fall hit
    pub const DAMAGE_KNOCKBACK: f32 = JUMP_STRENGTH / 2.0;

    /// Enemies
    pub const ENEMY_SPEED: f32 = 1.0;
    pub const ENEMY_AGGRO_RADIUS: f32 = TILE_SIZE * 8.0;
    pub const ENEMY_AGGRO_BAND: f32 = TILE_SIZE * 2.0;

    /// Boss
    pub const BOSS_SPEED: f32 = 2.0;
    pub const BOSS_MAX_HEALTH: u32 = 5;

    /// Invincibility windows (frames)
    pub const PLAYER_INVINCIBILITY_FRAMES: f32 = 120.0;
    pub const BOSS_INVINCIBILITY_FRAMES: f32 = 60.0;

    /// Score rewards
    pub const COIN_SCORE: u64 = 100;
    pub const STOMP_SCORE: u64 = 200;
    pub const BOSS_HIT_SCORE: u64 = 500;
    pub const BOSS_DEFEAT_SCORE: u64 = 5000;

    /// Shell bookkeeping
    pub const STARTING_LIVES: u32 = 3;
    pub const LEVEL_COMPLETE_DELAY_MS: f64 = 500.0;
}
