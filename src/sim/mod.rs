//! Deterministic play-scene simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod state;
pub mod tick;
pub mod timer;
pub mod wave;

pub use collision::{Aabb, Shape, separation_impulse};
pub use state::{Body, Bomb, DeferredAction, GameEvent, Ground, PlayState, Player, Star};
pub use tick::{TickInput, advance_clock, tick, trigger_game_over};
pub use timer::Scheduler;
pub use wave::{Wave, collect_star, spawn_bomb, spawn_wave};
