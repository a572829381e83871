//! Level parsing
//!
//! A level is a list of equal-width text rows, top to bottom. Each character
//! is one tile:
//!
//! | char | tile           |
//! |------|----------------|
//! | ` `  | empty          |
//! | `P`  | platform       |
//! | `C`  | coin           |
//! | `E`  | patrol enemy   |
//! | `S`  | player spawn   |
//! | `B`  | boss spawn     |
//!
//! Tile `(col, row)` sits at world `(col * TILE_SIZE, row * TILE_SIZE)`.

use glam::Vec2;
use thiserror::Error;

use super::state::{Actor, Coin, EntityId, Platform, World};
use crate::consts::TILE_SIZE;

/// One grid cell of a level map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Platform,
    Coin,
    Enemy,
    Spawn,
    Boss,
}

impl Tile {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Tile::Empty),
            'P' => Some(Tile::Platform),
            'C' => Some(Tile::Coin),
            'E' => Some(Tile::Enemy),
            'S' => Some(Tile::Spawn),
            'B' => Some(Tile::Boss),
            _ => None,
        }
    }
}

/// Malformed level data. Fatal to loading that level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {tile:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, tile: char },
    #[error("level has no player spawn ('S')")]
    MissingSpawn,
    #[error("second player spawn at {second:?}, first at {first:?}")]
    DuplicateSpawn {
        first: (usize, usize),
        second: (usize, usize),
    },
    #[error("second boss spawn at {second:?}, first at {first:?}")]
    DuplicateBoss {
        first: (usize, usize),
        second: (usize, usize),
    },
}

#[inline]
fn tile_origin(row: usize, col: usize) -> Vec2 {
    Vec2::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE)
}

/// Parse a tile grid into the initial world snapshot.
///
/// Pure and deterministic: the same rows always give an identical `World`.
/// Spawn/boss positions in errors are `(row, col)`.
pub fn parse_level<S: AsRef<str>>(rows: &[S]) -> Result<World, LevelError> {
    let Some(first) = rows.first() else {
        return Err(LevelError::Empty);
    };
    let width = first.as_ref().chars().count();

    let mut world = World::new(rows.len() as u32, width as u32);
    let mut spawn: Option<(usize, usize)> = None;
    let mut boss: Option<(usize, usize)> = None;

    for (row, line) in rows.iter().enumerate() {
        let line = line.as_ref();
        let found = line.chars().count();
        if found != width {
            return Err(LevelError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }

        for (col, c) in line.chars().enumerate() {
            let tile = Tile::from_char(c).ok_or(LevelError::UnknownTile { row, col, tile: c })?;
            let pos = tile_origin(row, col);
            let id = EntityId::tile(row, col);

            match tile {
                Tile::Empty => {}
                Tile::Platform => world.platforms.push(Platform::new(id, pos)),
                Tile::Coin => world.coins.push(Coin::new(id, pos)),
                Tile::Enemy => world.insert_actor(Actor::enemy(id, pos)),
                Tile::Spawn => {
                    if let Some(first) = spawn {
                        return Err(LevelError::DuplicateSpawn {
                            first,
                            second: (row, col),
                        });
                    }
                    spawn = Some((row, col));
                    world.insert_actor(Actor::player(pos));
                }
                Tile::Boss => {
                    if let Some(first) = boss {
                        return Err(LevelError::DuplicateBoss {
                            first,
                            second: (row, col),
                        });
                    }
                    boss = Some((row, col));
                    world.insert_actor(Actor::boss(pos));
                }
            }
        }
    }

    if spawn.is_none() {
        return Err(LevelError::MissingSpawn);
    }

    log::debug!(
        "Parsed {}x{} level: {} platforms, {} coins, {} enemies, boss: {}",
        world.cols,
        world.rows,
        world.platforms.len(),
        world.coins.len(),
        world.enemy_count(),
        boss.is_some()
    );

    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BOSS_MAX_HEALTH;
    use crate::sim::state::{ActorKind, Direction};

    #[test]
    fn test_parse_spawn_and_coin_row() {
        let world = parse_level(&["S C "]).unwrap();

        let (player, state) = world.player().unwrap();
        assert_eq!(player.pos, Vec2::ZERO);
        assert_eq!(player.size, Vec2::new(TILE_SIZE * 0.8, TILE_SIZE * 0.95));
        assert!(!state.grounded);
        assert!(!state.invincibility.is_active());

        assert_eq!(world.coins.len(), 1);
        assert_eq!(world.coins[0].body.pos, Vec2::new(2.0 * TILE_SIZE, 0.0));
        assert_eq!(world.coins[0].body.size, Vec2::splat(TILE_SIZE * 0.6));
        assert_eq!(world.coins[0].id, EntityId::tile(0, 2));
        assert!(world.boss().is_none());
    }

    #[test]
    fn test_parse_all_tile_kinds() {
        let world = parse_level(&["  B ", "S E ", "PPPP"]).unwrap();

        assert_eq!(world.rows, 3);
        assert_eq!(world.cols, 4);
        assert_eq!(world.platforms.len(), 4);
        assert_eq!(world.platforms[3].body.pos, Vec2::new(3.0 * TILE_SIZE, 2.0 * TILE_SIZE));

        let enemies: Vec<_> = world.enemies().collect();
        assert_eq!(enemies.len(), 1);
        assert_eq!(*enemies[0].0, EntityId::tile(1, 2));
        assert_eq!(enemies[0].1.size, Vec2::splat(TILE_SIZE));
        assert_eq!(enemies[0].2.direction, Direction::Left);

        let (boss, state) = world.boss().unwrap();
        assert_eq!(boss.pos, Vec2::new(2.0 * TILE_SIZE, 0.0));
        assert_eq!(boss.size, Vec2::splat(TILE_SIZE * 2.0));
        assert_eq!(state.health, BOSS_MAX_HEALTH);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let rows = ["  C  E", " S  PP", "PPPPPP"];
        assert_eq!(parse_level(&rows).unwrap(), parse_level(&rows).unwrap());
    }

    #[test]
    fn test_missing_spawn_is_an_error() {
        assert_eq!(parse_level(&["  C ", "PPPP"]), Err(LevelError::MissingSpawn));
    }

    #[test]
    fn test_duplicate_spawn_is_an_error() {
        assert_eq!(
            parse_level(&["S  ", "  S"]),
            Err(LevelError::DuplicateSpawn {
                first: (0, 0),
                second: (1, 2)
            })
        );
    }

    #[test]
    fn test_duplicate_boss_is_an_error() {
        assert!(matches!(
            parse_level(&["SB B"]),
            Err(LevelError::DuplicateBoss { .. })
        ));
    }

    #[test]
    fn test_ragged_and_unknown_rows_rejected() {
        assert_eq!(
            parse_level(&["S  ", "PPPP"]),
            Err(LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 4
            })
        );
        assert_eq!(
            parse_level(&["S X"]),
            Err(LevelError::UnknownTile {
                row: 0,
                col: 2,
                tile: 'X'
            })
        );
        let empty: [&str; 0] = [];
        assert_eq!(parse_level(&empty), Err(LevelError::Empty));
    }

    #[test]
    fn test_actor_kinds_are_tagged() {
        let world = parse_level(&["SEB "]).unwrap();
        let kinds: Vec<_> = world
            .actors
            .values()
            .map(|a| match a.kind {
                ActorKind::Player(_) => "player",
                ActorKind::Enemy(_) => "enemy",
                ActorKind::Boss(_) => "boss",
            })
            .collect();
        assert_eq!(kinds, vec!["player", "enemy", "boss"]);
    }
}
