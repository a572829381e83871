//! World state and core simulation types
//!
//! Everything a level attempt mutates lives in [`World`]. Moving entities are
//! kept in an arena keyed by [`EntityId`]; platforms and coins are static
//! records in parse order.

use std::collections::BTreeMap;
use std::collections::btree_map::ValuesMut;

use glam::Vec2;
use serde::{Deserialize, Serialize, Serializer};

use crate::consts::*;

/// Stable identity of an entity.
///
/// Variant order is load-bearing: the arena iterates the player first, then
/// tile-spawned actors in row-major order, then the boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Player,
    Tile { row: u32, col: u32 },
    Boss,
}

impl EntityId {
    pub fn tile(row: usize, col: usize) -> Self {
        Self::Tile {
            row: row as u32,
            col: col as u32,
        }
    }
}

/// Axis-aligned box with velocity. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    #[inline]
    pub fn mid_y(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }
}

/// Horizontal facing of an enemy or the boss. There is no neutral value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction pointing along `offset`, or `None` when the offset is zero
    pub fn toward(offset: f32) -> Option<Self> {
        if offset < 0.0 {
            Some(Direction::Left)
        } else if offset > 0.0 {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

/// Timed damage immunity, counted in frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Invincibility {
    pub active: bool,
    pub remaining: f32,
}

impl Invincibility {
    /// Start a fresh window. The only way the counter ever goes up.
    pub fn grant(&mut self, frames: f32) {
        self.active = true;
        self.remaining = frames;
    }

    /// Count down by `dt` frames; clears once the counter reaches zero
    pub fn tick(&mut self, dt: f32) {
        if self.active {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.active = false;
            }
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub grounded: bool,
    pub invincibility: Invincibility,
}

/// Enemy behavior tag (fixed at spawn)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    #[default]
    Patrol,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    pub direction: Direction,
    pub behavior: EnemyBehavior,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub direction: Direction,
    pub health: u32,
    pub invincibility: Invincibility,
}

/// Per-kind behavior state of a moving entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActorKind {
    Player(PlayerState),
    Enemy(EnemyState),
    Boss(BossState),
}

/// A moving entity: shared body plus kind-specific state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: EntityId,
    pub body: Body,
    pub kind: ActorKind,
}

impl Actor {
    pub fn player(pos: Vec2) -> Self {
        Self {
            id: EntityId::Player,
            body: Body::new(pos, Vec2::new(TILE_SIZE * 0.8, TILE_SIZE * 0.95)),
            kind: ActorKind::Player(PlayerState::default()),
        }
    }

    pub fn enemy(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::splat(TILE_SIZE)),
            kind: ActorKind::Enemy(EnemyState {
                direction: Direction::Left,
                behavior: EnemyBehavior::Patrol,
            }),
        }
    }

    pub fn boss(pos: Vec2) -> Self {
        Self {
            id: EntityId::Boss,
            body: Body::new(pos, Vec2::splat(TILE_SIZE * 2.0)),
            kind: ActorKind::Boss(BossState {
                direction: Direction::Left,
                health: BOSS_MAX_HEALTH,
                invincibility: Invincibility::default(),
            }),
        }
    }
}

/// Immovable solid tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    pub body: Body,
}

impl Platform {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::splat(TILE_SIZE)),
        }
    }
}

/// Collectible; removed from the world on pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: EntityId,
    pub body: Body,
}

impl Coin {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::splat(TILE_SIZE * 0.6)),
        }
    }
}

/// Complete entity snapshot of one level attempt (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct World {
    /// Grid height in tiles
    pub rows: u32,
    /// Grid width in tiles
    pub cols: u32,
    /// Static geometry in parse order
    pub platforms: Vec<Platform>,
    /// Coins still in play, parse order
    pub coins: Vec<Coin>,
    /// Moving entities keyed by identity
    #[serde(serialize_with = "actors_as_list")]
    pub actors: BTreeMap<EntityId, Actor>,
}

fn actors_as_list<S: Serializer>(
    actors: &BTreeMap<EntityId, Actor>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(actors.values())
}

impl World {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            platforms: Vec::new(),
            coins: Vec::new(),
            actors: BTreeMap::new(),
        }
    }

    pub fn insert_actor(&mut self, actor: Actor) {
        self.actors.insert(actor.id, actor);
    }

    pub fn player(&self) -> Option<(&Body, &PlayerState)> {
        match self.actors.get(&EntityId::Player) {
            Some(Actor {
                body,
                kind: ActorKind::Player(state),
                ..
            }) => Some((body, state)),
            _ => None,
        }
    }

    pub fn boss(&self) -> Option<(&Body, &BossState)> {
        match self.actors.get(&EntityId::Boss) {
            Some(Actor {
                body,
                kind: ActorKind::Boss(state),
                ..
            }) => Some((body, state)),
            _ => None,
        }
    }

    pub fn enemies(&self) -> impl Iterator<Item = (&EntityId, &Body, &EnemyState)> {
        self.actors.values().filter_map(|actor| match &actor.kind {
            ActorKind::Enemy(state) => Some((&actor.id, &actor.body, state)),
            _ => None,
        })
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies().count()
    }

    /// World-space y below which the player counts as fallen off the level
    pub fn fall_limit(&self) -> f32 {
        self.rows as f32 * TILE_SIZE
    }

    /// Coins gone and no boss standing
    pub fn is_cleared(&self) -> bool {
        self.coins.is_empty() && self.boss().is_none()
    }
}

/// Split the arena into the player and every other actor.
///
/// Returns `None` when there is no player; the player always sorts first.
pub fn split_player(
    actors: &mut BTreeMap<EntityId, Actor>,
) -> Option<(&mut Actor, ValuesMut<'_, EntityId, Actor>)> {
    let mut rest = actors.values_mut();
    let first = rest.next()?;
    if first.id != EntityId::Player {
        return None;
    }
    Some((first, rest))
}
