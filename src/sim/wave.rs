//! Waves of stars and bomb escalation
//!
//! A wave is cleared the moment its last active star is collected. Clearing
//! spawns a fresh wave and exactly one more bomb; bombs are never removed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Bomb, GameEvent, PlayState, Star};
use crate::consts::*;

/// The set of stars currently in flight
///
/// A cleared wave never lingers: [`collect_star`] replaces it in the same
/// call that emits `WaveCleared`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wave {
    /// 1-based wave number (0 before the first spawn)
    pub index: u32,
    pub stars: Vec<Star>,
}

impl Wave {
    pub fn active_count(&self) -> usize {
        self.stars.iter().filter(|s| s.active).count()
    }
}

/// Centre x of star slot `i` when `count` slots share the field width
pub fn star_slot_x(i: usize, count: usize, width: f32) -> f32 {
    let section = width / count as f32;
    i as f32 * section + section / 2.0
}

/// Replace the current wave with a full set of fresh stars dropped from y = 0
pub fn spawn_wave(state: &mut PlayState) {
    let count = state.tuning.stars_per_wave;
    let jitter = state.tuning.star_jitter;
    let (bounce_min, bounce_max) = (state.tuning.star_bounce_min, state.tuning.star_bounce_max);

    let mut stars = Vec::with_capacity(count);
    for i in 0..count {
        let offset = state.rng.random_range(-jitter..=jitter) as f32;
        let x = star_slot_x(i, count, FIELD_WIDTH) + offset;
        let bounce = if bounce_min < bounce_max {
            state.rng.random_range(bounce_min..=bounce_max)
        } else {
            bounce_min
        };
        let id = state.next_entity_id();
        stars.push(Star::new(id, Vec2::new(x, 0.0), bounce));
    }

    state.wave = Wave {
        index: state.wave.index + 1,
        stars,
    };
    log::debug!("Wave {} spawned with {} stars", state.wave.index, count);
}

/// Horizontal spawn position on the half of the field away from the player
pub fn bomb_spawn_x(player_x: f32, rng: &mut impl Rng) -> f32 {
    let half = (FIELD_WIDTH / 2.0) as i32;
    let full = FIELD_WIDTH as i32;
    if player_x < FIELD_WIDTH / 2.0 {
        rng.random_range(half..=full) as f32
    } else {
        rng.random_range(0..=half) as f32
    }
}

/// Add one bomb on the far side of the field from the player
pub fn spawn_bomb(state: &mut PlayState) {
    let x = bomb_spawn_x(state.player.body.pos.x, &mut state.rng);
    let vx_range = state.tuning.bomb_spawn_vx;
    let vx = state.rng.random_range(-vx_range..=vx_range) as f32;
    let vel = Vec2::new(vx, state.tuning.bomb_spawn_vy);

    let id = state.next_entity_id();
    let bomb = Bomb::new(id, Vec2::new(x, BOMB_SPAWN_Y), vel);
    state.events.push(GameEvent::BombSpawned {
        id,
        x,
        y: BOMB_SPAWN_Y,
        vx: vel.x,
        vy: vel.y,
    });
    state.bombs.push(bomb);
    log::info!("Bomb {} spawned at x={} ({} total)", id, x, state.bombs.len());
}

/// Collect the star at `index` of the current wave
///
/// Inactive stars are ignored, so repeated calls are harmless. Returns
/// whether this collection cleared the wave.
pub fn collect_star(state: &mut PlayState, index: usize) -> bool {
    let Some(star) = state.wave.stars.get_mut(index) else {
        return false;
    };
    if !star.active {
        return false;
    }
    let pos = star.body.pos;
    star.deactivate();

    state.score += state.tuning.points_per_star;
    state.events.push(GameEvent::StarCollected { x: pos.x, y: pos.y });
    state.events.push(GameEvent::ScoreChanged { score: state.score });
    log::debug!("Star collected at ({:.1}, {:.1}), score {}", pos.x, pos.y, state.score);

    if state.wave.active_count() > 0 {
        return false;
    }

    let cleared = state.wave.index;
    state.events.push(GameEvent::WaveCleared { wave: cleared });
    log::info!("Wave {} cleared, score {}", cleared, state.score);

    spawn_wave(state);
    spawn_bomb(state);
    true
}
