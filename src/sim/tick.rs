//! Fixed timestep simulation tick
//!
//! One tick runs in a fixed order: input → advance → resolve collisions.
//! Collision handlers react synchronously (scoring, wave clear, game over)
//! and queue events for the presentation layer.

use super::collision::{
    bomb_ground_bounce, first_bomb_contact, ground_contact, overlapping_stars, resolve_bomb_pairs,
};
use super::physics::{BoundSides, collide_world_bounds, integrate, reflect_bomb_walls};
use super::state::{DeferredAction, GameEvent, PlayState};
use super::wave::collect_star;
use crate::consts::*;
use glam::Vec2;

/// Input sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    /// Wins over `move_left` when both are held
    pub move_right: bool,
    /// Re-triggers every tick it is held while grounded
    pub jump: bool,
    /// Run the hit response without a bomb (debug key)
    pub force_game_over: bool,
}

/// Advance the play session by one fixed timestep
pub fn tick(state: &mut PlayState, input: &TickInput, dt: f32) {
    if input.force_game_over {
        log::debug!("Forced game over");
        let at = state.player.body.pos;
        trigger_game_over(state, at);
    }

    // Frozen after the player was hit
    if state.is_frozen() {
        return;
    }

    state.time_ticks += 1;

    apply_input(state, input);

    // --- ADVANCE ---
    let gravity = state.tuning.gravity;
    let flash_ms = state.tuning.hit_flash_ms;

    integrate(&mut state.player.body, gravity, dt);
    collide_world_bounds(&mut state.player.body, FIELD_WIDTH, BoundSides::ALL);

    for star in state.wave.stars.iter_mut().filter(|s| s.active) {
        integrate(&mut star.body, gravity, dt);
        collide_world_bounds(&mut star.body, FIELD_WIDTH, BoundSides::ALL);
    }

    for bomb in &mut state.bombs {
        integrate(&mut bomb.body, gravity, dt);
        collide_world_bounds(&mut bomb.body, FIELD_WIDTH, BoundSides::TOP_ONLY);
        if reflect_bomb_walls(bomb, FIELD_WIDTH) {
            state.events.push(GameEvent::BombBounced { id: bomb.id });
            state
                .timers
                .schedule(flash_ms, DeferredAction::ClearHitFlash { bomb_id: bomb.id });
        }
    }

    // --- RESOLVE ---
    let ground = state.ground.rect;
    ground_contact(&mut state.player.body, &ground);
    for star in state.wave.stars.iter_mut().filter(|s| s.active) {
        ground_contact(&mut star.body, &ground);
    }
    for bomb in &mut state.bombs {
        if ground_contact(&mut bomb.body, &ground) {
            bomb_ground_bounce(bomb, &state.tuning, &mut state.rng);
        }
    }

    // Only the last active star can clear the wave, so indices stay valid
    for index in overlapping_stars(&state.player, &state.wave.stars) {
        collect_star(state, index);
    }

    if let Some(bomb) = first_bomb_contact(&state.player, &state.bombs) {
        let at = bomb.body.pos;
        trigger_game_over(state, at);
        return;
    }

    // Runs after the landing bounce, whose speed guard leaves pushed bombs alone
    let impulse = state.tuning.bomb_separation_impulse;
    resolve_bomb_pairs(&mut state.bombs, impulse);
}

/// Set the player's velocity from input
fn apply_input(state: &mut PlayState, input: &TickInput) {
    let speed = state.tuning.player_speed;
    let grounded = state.player.grounded();
    let body = &mut state.player.body;

    body.vel.x = if input.move_right {
        speed
    } else if input.move_left {
        -speed
    } else {
        0.0
    };

    if input.jump && grounded {
        body.vel.y = state.tuning.jump_velocity;
    }
}

/// Player-hit response, guarded by the latch
///
/// Freezes the session, reports the score at the moment of the hit and
/// schedules the move to GameOver. Returns false if already triggered.
pub fn trigger_game_over(state: &mut PlayState, at: Vec2) -> bool {
    if state.game_over_triggered {
        return false;
    }
    state.game_over_triggered = true;

    let score = state.score;
    state.events.push(GameEvent::PlayerHit {
        x: at.x,
        y: at.y,
        score,
    });
    let delay = state.tuning.game_over_delay_ms;
    state.timers.schedule(delay, DeferredAction::EnterGameOver { score });
    log::info!("Player hit at ({:.1}, {:.1}), final score {}", at.x, at.y, score);
    true
}

/// Advance the session's real-time clock and fire due deferred actions
///
/// Runs regardless of the freeze. Actions whose target is gone are no-ops.
pub fn advance_clock(state: &mut PlayState, elapsed_ms: f64) {
    state.timers.advance(elapsed_ms);
    for action in state.timers.take_due() {
        match action {
            DeferredAction::ClearHitFlash { bomb_id } => {
                if let Some(bomb) = state.bombs.iter_mut().find(|b| b.id == bomb_id) {
                    bomb.hit_flash = false;
                }
            }
            DeferredAction::EnterGameOver { score } => {
                if state.finished.is_none() {
                    state.finished = Some(score);
                }
            }
        }
    }
}
