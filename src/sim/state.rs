//! Play-session state and entity records
//!
//! Entities are plain data; the systems in `physics`, `collision` and
//! `wave` operate over them. The session owns every entity for its lifetime.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Shape};
use super::timer::Scheduler;
use super::wave::{self, Wave};
use crate::consts::*;
use crate::settings::{ConfigError, Tuning};

/// Physics body shared by every entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre of the collision shape
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    /// Fraction of speed kept when bouncing off ground or world bounds
    pub bounce: f32,
    /// Set for the tick in which the body rested on the ground
    pub touching_down: bool,
    /// Disabled bodies are skipped by every system
    pub enabled: bool,
}

impl Body {
    pub fn new(pos: Vec2, shape: Shape, bounce: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            shape,
            bounce,
            touching_down: false,
            enabled: true,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.shape.half_extents()
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_extents().y
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half_extents())
    }
}

/// The player-controlled character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        let shape = Shape::Rect {
            half: Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0),
        };
        Self {
            body: Body::new(pos, shape, PLAYER_BOUNCE),
        }
    }

    /// Grounded this tick (gates jumping)
    pub fn grounded(&self) -> bool {
        self.body.touching_down
    }
}

/// A collectible star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub id: u32,
    pub body: Body,
    /// Cleared on collection; the record stays in its wave
    pub active: bool,
}

impl Star {
    pub fn new(id: u32, pos: Vec2, bounce: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, Shape::Circle { radius: STAR_RADIUS }, bounce),
            active: true,
        }
    }

    /// Remove from simulation without destroying the record
    pub fn deactivate(&mut self) {
        self.active = false;
        self.body.enabled = false;
        self.body.vel = Vec2::ZERO;
    }
}

/// A hazard bouncing around the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub body: Body,
    /// Visual flag after a wall reflection; no physics effect
    pub hit_flash: bool,
}

impl Bomb {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        let mut body = Body::new(pos, Shape::Circle { radius: BOMB_RADIUS }, BOMB_BOUNCE);
        body.vel = vel;
        Self {
            id,
            body,
            hit_flash: false,
        }
    }

    pub fn radius(&self) -> f32 {
        self.body.half_extents().x
    }
}

/// Static ground band at the bottom of the field
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ground {
    pub rect: Aabb,
}

impl Default for Ground {
    fn default() -> Self {
        Self {
            rect: Aabb::new(Vec2::new(0.0, GROUND_TOP), Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)),
        }
    }
}

impl Ground {
    /// Y of the walkable surface
    pub fn surface(&self) -> f32 {
        self.rect.min.y
    }
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StarCollected { x: f32, y: f32 },
    ScoreChanged { score: u32 },
    WaveCleared { wave: u32 },
    BombSpawned { id: u32, x: f32, y: f32, vx: f32, vy: f32 },
    /// Bomb reflected off a side wall (presentation flashes it)
    BombBounced { id: u32 },
    PlayerHit { x: f32, y: f32, score: u32 },
}

/// Actions fired by the session scheduler on a later frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    ClearHitFlash { bomb_id: u32 },
    EnterGameOver { score: u32 },
}

/// One play session: everything the Game scene owns
#[derive(Debug, Clone)]
pub struct PlayState {
    pub tuning: Tuning,
    pub score: u32,
    /// Latch: the hit response runs exactly once
    pub game_over_triggered: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub ground: Ground,
    /// Current wave of stars
    pub wave: Wave,
    /// Bombs accumulate across waves (sorted by id)
    pub bombs: Vec<Bomb>,
    /// Pending events for presentation
    pub events: Vec<GameEvent>,
    /// Deferred actions on the real-time clock
    pub timers: Scheduler<DeferredAction>,
    /// Final score once the game-over delay has elapsed
    pub finished: Option<u32>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl PlayState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::from_valid_tuning(seed, Tuning::default())
    }

    /// Create a new session with custom tuning, rejecting values the
    /// simulation cannot run with
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::from_valid_tuning(seed, tuning))
    }

    /// One player, one ground, one wave, no bombs. `tuning` must already
    /// have passed [`Tuning::validate`].
    pub(crate) fn from_valid_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            tuning,
            score: 0,
            game_over_triggered: false,
            time_ticks: 0,
            player: Player::new(Vec2::new(PLAYER_START_X, PLAYER_START_Y)),
            ground: Ground::default(),
            wave: Wave::default(),
            bombs: Vec::new(),
            events: Vec::new(),
            timers: Scheduler::new(),
            finished: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        wave::spawn_wave(&mut state);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation is frozen once the player was hit
    pub fn is_frozen(&self) -> bool {
        self.game_over_triggered
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn bomb(&self, id: u32) -> Option<&Bomb> {
        self.bombs.iter().find(|b| b.id == id)
    }
}
