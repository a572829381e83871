//! Per-step movement of every actor
//!
//! Order within a step: player first (input, gravity, horizontal then
//! vertical resolution, timers), then every other actor against the player's
//! post-move position. Horizontal always resolves before vertical.

use super::collision::{Axis, resolve_axis};
use super::event::{SoundCue, StepReport};
use super::state::{
    ActorKind, Body, BossState, Direction, EnemyState, Platform, PlayerState, World, split_player,
};
use crate::consts::*;
use crate::input::Controls;

/// Advance all actors by `dt` frames. No-op (logged) without a player.
pub fn integrate(world: &mut World, controls: &Controls, dt: f32, report: &mut StepReport) {
    let World {
        platforms, actors, ..
    } = world;

    let Some((player, others)) = split_player(actors) else {
        log::warn!("integrate called on a world with no player; skipping step");
        return;
    };
    let ActorKind::Player(state) = &mut player.kind else {
        log::warn!("player slot holds a non-player actor; skipping step");
        return;
    };

    update_player(&mut player.body, state, controls, platforms, dt, report);
    let target = player.body;

    for actor in others {
        match &mut actor.kind {
            ActorKind::Enemy(enemy) => update_enemy(&mut actor.body, enemy, &target, platforms, dt),
            ActorKind::Boss(boss) => update_boss(&mut actor.body, boss, &target, platforms, dt),
            ActorKind::Player(_) => log::warn!("stray player actor {:?} ignored", actor.id),
        }
    }
}

fn update_player(
    body: &mut Body,
    state: &mut PlayerState,
    controls: &Controls,
    platforms: &[Platform],
    dt: f32,
    report: &mut StepReport,
) {
    // Horizontal speed is set, not accumulated
    body.vel.x = controls.horizontal() * PLAYER_SPEED;

    if controls.jump && state.grounded {
        body.vel.y = JUMP_STRENGTH;
        state.grounded = false;
        report.cues.push(SoundCue::Jump);
    }

    body.vel.y = (body.vel.y + GRAVITY * dt).min(MAX_FALL_SPEED);

    body.pos.x += body.vel.x * dt;
    resolve_axis(body, platforms, Axis::Horizontal);

    body.pos.y += body.vel.y * dt;
    state.grounded = resolve_axis(body, platforms, Axis::Vertical).landed;

    state.invincibility.tick(dt);
}

fn update_enemy(
    body: &mut Body,
    enemy: &mut EnemyState,
    player: &Body,
    platforms: &[Platform],
    dt: f32,
) {
    // Aggro: face the player when close horizontally and on roughly the same level
    let dx = player.pos.x - body.pos.x;
    let dy = player.pos.y - body.pos.y;
    if dx.abs() < ENEMY_AGGRO_RADIUS && dy.abs() < ENEMY_AGGRO_BAND {
        if let Some(dir) = Direction::toward(dx) {
            enemy.direction = dir;
        }
    }

    body.vel.x = ENEMY_SPEED * enemy.direction.sign();
    body.vel.y += GRAVITY * dt;

    body.pos.x += body.vel.x * dt;
    let contact = resolve_axis(body, platforms, Axis::Horizontal);
    for _ in 0..contact.side_hits {
        enemy.direction = enemy.direction.flipped();
    }

    body.pos.y += body.vel.y * dt;
    resolve_axis(body, platforms, Axis::Vertical);
}

fn update_boss(
    body: &mut Body,
    boss: &mut BossState,
    player: &Body,
    platforms: &[Platform],
    dt: f32,
) {
    boss.direction = if player.center_x() < body.center_x() {
        Direction::Left
    } else {
        Direction::Right
    };

    body.vel.x = BOSS_SPEED * boss.direction.sign();
    body.vel.y += GRAVITY * dt;

    body.pos.x += body.vel.x * dt;
    resolve_axis(body, platforms, Axis::Horizontal);

    body.pos.y += body.vel.y * dt;
    resolve_axis(body, platforms, Axis::Vertical);

    boss.invincibility.tick(dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::parse_level;
    use crate::sim::state::{EnemyBehavior, EntityId};
    use glam::Vec2;

    fn step(world: &mut World, controls: Controls) -> StepReport {
        let mut report = StepReport::default();
        integrate(world, &controls, 1.0, &mut report);
        report
    }

    fn right() -> Controls {
        Controls {
            right: true,
            ..Default::default()
        }
    }

    fn enemy(world: &World, id: EntityId) -> (Body, EnemyState) {
        match world.actors[&id].kind {
            ActorKind::Enemy(state) => (world.actors[&id].body, state),
            _ => panic!("not an enemy"),
        }
    }

    #[test]
    fn test_move_right_advances_by_player_speed() {
        let mut world = parse_level(&["S C "]).unwrap();
        step(&mut world, right());

        let (player, _) = world.player().unwrap();
        assert_eq!(player.pos.x, PLAYER_SPEED);
        assert_eq!(player.vel.y, GRAVITY);
    }

    #[test]
    fn test_player_lands_and_jumps() {
        let mut world = parse_level(&["S ", "PP"]).unwrap();

        // Fall onto the floor
        for _ in 0..10 {
            step(&mut world, Controls::default());
        }
        let (player, state) = world.player().unwrap();
        assert!(state.grounded);
        assert!((player.bottom() - TILE_SIZE).abs() < 1e-3);
        assert_eq!(player.vel.y, 0.0);

        let jump = Controls {
            jump: true,
            ..Default::default()
        };
        let report = step(&mut world, jump);
        assert_eq!(report.cues, vec![SoundCue::Jump]);
        let (player, state) = world.player().unwrap();
        assert!(!state.grounded);
        assert_eq!(player.vel.y, JUMP_STRENGTH + GRAVITY);

        // Holding jump mid-air does nothing
        let report = step(&mut world, jump);
        assert!(report.cues.is_empty());
    }

    #[test]
    fn test_fall_speed_is_clamped() {
        let mut world = parse_level(&["S", " ", " "]).unwrap();
        for _ in 0..40 {
            step(&mut world, Controls::default());
        }
        assert_eq!(world.player().unwrap().0.vel.y, MAX_FALL_SPEED);
    }

    #[test]
    fn test_player_blocked_by_wall() {
        let mut world = parse_level(&["S P", "PPP"]).unwrap();
        for _ in 0..30 {
            step(&mut world, right());
        }
        let (player, _) = world.player().unwrap();
        assert!((player.right() - 2.0 * TILE_SIZE).abs() < 1e-3);
    }

    #[test]
    fn test_enemy_aggros_toward_player() {
        // Enemy starts facing left; player is to its right within range
        let mut world = parse_level(&["  E   S ", "PPPPPPPP"]).unwrap();
        step(&mut world, Controls::default());

        let (body, state) = enemy(&world, EntityId::tile(0, 2));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(body.pos.x, 2.0 * TILE_SIZE + ENEMY_SPEED);
    }

    #[test]
    fn test_enemy_ignores_player_out_of_band() {
        let rows = [
            "S         ",
            "          ",
            "          ",
            "  E       ",
            "PPPPPPPPPP",
        ];
        let mut world = parse_level(&rows).unwrap();
        step(&mut world, Controls::default());

        let (body, state) = enemy(&world, EntityId::tile(3, 2));
        assert_eq!(state.direction, Direction::Left);
        assert_eq!(body.pos.x, 2.0 * TILE_SIZE - ENEMY_SPEED);
    }

    #[test]
    fn test_patrol_reverses_on_wall() {
        // Player far away so no aggro
        let rows = [
            "S                   ",
            "                    ",
            "                    ",
            "          PE        ",
            "PPPPPPPPPPPPPPPPPPPP",
        ];
        let mut world = parse_level(&rows).unwrap();
        step(&mut world, Controls::default());

        let (body, state) = enemy(&world, EntityId::tile(3, 11));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(body.pos.x, 11.0 * TILE_SIZE);
    }

    #[test]
    fn test_patrol_flips_once_per_wall_hit() {
        let walls = [
            Platform::new(EntityId::tile(0, 1), Vec2::new(TILE_SIZE, 0.0)),
            Platform::new(EntityId::tile(0, 2), Vec2::new(TILE_SIZE - 4.0, 0.0)),
        ];
        let mut body = Body::new(Vec2::ZERO, Vec2::splat(TILE_SIZE));
        let mut state = EnemyState {
            direction: Direction::Right,
            behavior: EnemyBehavior::Patrol,
        };
        let far_away = Body::new(Vec2::new(TILE_SIZE * 40.0, 0.0), Vec2::splat(TILE_SIZE));

        update_enemy(&mut body, &mut state, &far_away, &walls, 1.0);

        // Two side hits flip twice, ending where it started
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(body.right(), TILE_SIZE - 4.0);
    }

    #[test]
    fn test_boss_tracks_player() {
        let mut world = parse_level(&["S    B  ", "        ", "PPPPPPPP"]).unwrap();
        step(&mut world, Controls::default());

        let (body, state) = world.boss().unwrap();
        assert_eq!(state.direction, Direction::Left);
        assert_eq!(body.pos.x, 5.0 * TILE_SIZE - BOSS_SPEED);
    }

    #[test]
    fn test_no_player_is_a_noop() {
        let mut world = World::new(1, 1);
        world.insert_actor(crate::sim::state::Actor::boss(Vec2::ZERO));
        let before = world.clone();
        let report = step(&mut world, right());
        assert!(report.is_empty());
        assert_eq!(world, before);
    }
}
