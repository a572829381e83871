//! Gameplay collisions between the player and everything else
//!
//! Runs once per step after all movement. Order: coins, enemies, boss,
//! fall-off, then the level-complete check. The first pass that ends the
//! attempt (game over or fall respawn) stops the rest of the pass list.

use std::collections::BTreeMap;

use super::collision::overlaps;
use super::event::{DamageCause, GameEvent, ScoreReason, SoundCue, StepReport};
use super::state::{Actor, ActorKind, Body, Coin, EntityId, PlayerState, World, split_player};
use crate::consts::*;

/// How the step ended, as far as the attempt is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Keep playing
    Continue,
    /// Fell off with lives left: restore the initial layout
    Respawn,
    /// Lives exhausted; game over was signalled
    Dead,
    /// Level-complete was signalled
    Complete,
}

/// What a single damage event turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DamageOutcome {
    Knockback,
    Respawn,
    Dead,
}

/// Damage state machine: always grants invincibility and loses exactly one
/// life; then game over, knockback or respawn depending on what is left.
fn apply_damage(
    body: &mut Body,
    state: &mut PlayerState,
    cause: DamageCause,
    lives: &mut u32,
    report: &mut StepReport,
) -> DamageOutcome {
    state.invincibility.grant(PLAYER_INVINCIBILITY_FRAMES);
    report.cues.push(SoundCue::Hurt);
    report.events.push(GameEvent::LifeLost { cause });
    *lives = lives.saturating_sub(1);

    if *lives == 0 {
        log::info!("Player out of lives ({:?})", cause);
        report.cues.push(SoundCue::GameOver);
        report.events.push(GameEvent::GameOver);
        return DamageOutcome::Dead;
    }

    match cause {
        DamageCause::Hit => {
            body.vel.y = DAMAGE_KNOCKBACK;
            DamageOutcome::Knockback
        }
        DamageCause::Fall => DamageOutcome::Respawn,
    }
}

/// A falling player whose feet are above the target's vertical midpoint
#[inline]
fn is_stomp(player: &Body, target: &Body) -> bool {
    player.vel.y > 0.0 && player.bottom() < target.mid_y()
}

/// Resolve every player interaction for this step.
///
/// `lives` is the shell's count going into the step; it is decremented
/// locally so later damage in the same step sees the new value.
pub fn resolve(world: &mut World, lives: &mut u32, report: &mut StepReport) -> Resolution {
    let fall_limit = world.fall_limit();
    let World { coins, actors, .. } = world;

    let Some((player, _)) = split_player(actors) else {
        log::warn!("resolve called on a world with no player; skipping");
        return Resolution::Continue;
    };
    let mut body = player.body;
    let ActorKind::Player(mut state) = player.kind else {
        log::warn!("player slot holds a non-player actor; skipping");
        return Resolution::Continue;
    };

    let resolution =
        resolve_player(&mut body, &mut state, coins, actors, fall_limit, lives, report);

    if let Some(player) = actors.get_mut(&EntityId::Player) {
        player.body = body;
        player.kind = ActorKind::Player(state);
    }

    if resolution == Resolution::Continue && world.is_cleared() {
        log::info!("Level cleared");
        report.cues.push(SoundCue::LevelComplete);
        report.events.push(GameEvent::LevelComplete);
        return Resolution::Complete;
    }

    resolution
}

fn resolve_player(
    body: &mut Body,
    state: &mut PlayerState,
    coins: &mut Vec<Coin>,
    actors: &mut BTreeMap<EntityId, Actor>,
    fall_limit: f32,
    lives: &mut u32,
    report: &mut StepReport,
) -> Resolution {
    // Coins
    coins.retain(|coin| {
        if overlaps(body, &coin.body) {
            report.cues.push(SoundCue::Coin);
            report.score(COIN_SCORE, ScoreReason::Coin);
            false
        } else {
            true
        }
    });

    // Enemies, in arena order
    let mut stomped = Vec::new();
    let mut dead = false;
    for actor in actors.values() {
        let ActorKind::Enemy(_) = actor.kind else {
            continue;
        };
        if !overlaps(body, &actor.body) {
            continue;
        }

        if is_stomp(body, &actor.body) {
            stomped.push(actor.id);
            report.cues.push(SoundCue::Stomp);
            report.score(STOMP_SCORE, ScoreReason::Stomp);
            body.vel.y = STOMP_BOUNCE;
        } else if !state.invincibility.is_active()
            && apply_damage(body, state, DamageCause::Hit, lives, report) == DamageOutcome::Dead
        {
            dead = true;
            break;
        }
    }
    for id in &stomped {
        actors.remove(id);
    }
    if dead {
        return Resolution::Dead;
    }

    // Boss
    let mut boss_defeated = false;
    if let Some(Actor {
        body: boss_body,
        kind: ActorKind::Boss(boss),
        ..
    }) = actors.get_mut(&EntityId::Boss)
    {
        // A recovering boss cannot be stomped again, but still hurts on contact
        if overlaps(body, boss_body) {
            if is_stomp(body, boss_body) && !boss.invincibility.is_active() {
                boss.health = boss.health.saturating_sub(1);
                boss.invincibility.grant(BOSS_INVINCIBILITY_FRAMES);
                report.cues.push(SoundCue::Stomp);
                report.score(BOSS_HIT_SCORE, ScoreReason::BossHit);
                body.vel.y = BOSS_STOMP_BOUNCE;
                log::debug!("Boss hit, {} health left", boss.health);
                boss_defeated = boss.health == 0;
            } else if !state.invincibility.is_active()
                && apply_damage(body, state, DamageCause::Hit, lives, report)
                    == DamageOutcome::Dead
            {
                return Resolution::Dead;
            }
        }
    }
    if boss_defeated {
        log::info!("Boss defeated");
        report.score(BOSS_DEFEAT_SCORE, ScoreReason::BossDefeated);
        actors.remove(&EntityId::Boss);
    }

    // Fell below the grid. Invincibility does not help here.
    if body.pos.y > fall_limit {
        return match apply_damage(body, state, DamageCause::Fall, lives, report) {
            DamageOutcome::Dead => Resolution::Dead,
            _ => Resolution::Respawn,
        };
    }

    Resolution::Continue
}
