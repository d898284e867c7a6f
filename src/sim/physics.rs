//! Per-tick integration and world bounds
//!
//! Gravity and velocity are applied explicitly; the gravity constant is a
//! parameter so the play scene and any idle menu simulation can differ.

use super::state::{Body, Bomb};

/// Sides of the world a body bounces off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundSides {
    pub top: bool,
    pub left: bool,
    pub right: bool,
}

impl BoundSides {
    pub const ALL: Self = Self {
        top: true,
        left: true,
        right: true,
    };
    /// Bombs handle the side walls themselves
    pub const TOP_ONLY: Self = Self {
        top: true,
        left: false,
        right: false,
    };
}

/// Apply gravity, then move by velocity. Clears `touching_down`.
pub fn integrate(body: &mut Body, gravity: f32, dt: f32) {
    if !body.enabled {
        return;
    }
    body.touching_down = false;
    body.vel.y += gravity * dt;
    body.pos += body.vel * dt;
}

/// Keep a body inside `[0, width]` horizontally and below y = 0,
/// bouncing by its coefficient.
pub fn collide_world_bounds(body: &mut Body, width: f32, sides: BoundSides) {
    if !body.enabled {
        return;
    }
    let half = body.half_extents();

    if sides.left && body.pos.x - half.x < 0.0 {
        body.pos.x = half.x;
        if body.vel.x < 0.0 {
            body.vel.x = -body.vel.x * body.bounce;
        }
    } else if sides.right && body.pos.x + half.x > width {
        body.pos.x = width - half.x;
        if body.vel.x > 0.0 {
            body.vel.x = -body.vel.x * body.bounce;
        }
    }

    if sides.top && body.pos.y - half.y < 0.0 {
        body.pos.y = half.y;
        if body.vel.y < 0.0 {
            body.vel.y = -body.vel.y * body.bounce;
        }
    }
}

/// Perfect horizontal reflection for a bomb whose leading edge crossed a
/// side wall while still moving outward. Returns whether it reflected.
pub fn reflect_bomb_walls(bomb: &mut Bomb, width: f32) -> bool {
    let radius = bomb.radius();
    let body = &mut bomb.body;
    if !body.enabled {
        return false;
    }

    if body.pos.x - radius <= 0.0 && body.vel.x < 0.0 {
        body.pos.x = radius;
        body.vel.x = -body.vel.x;
    } else if body.pos.x + radius >= width && body.vel.x > 0.0 {
        body.pos.x = width - radius;
        body.vel.x = -body.vel.x;
    } else {
        return false;
    }
    bomb.hit_flash = true;
    true
}
