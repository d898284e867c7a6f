//! Star Catcher - a small arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic play-scene simulation (entities, physics, collisions, waves)
//! - `scene`: Boot → MainMenu → Game → GameOver flow and the frame runner
//! - `settings`: Data-driven game balance

pub mod scene;
pub mod settings;
pub mod sim;

pub use scene::{Game, GameOverPayload, NullPresentation, Presentation, Scene, SceneKind, SceneTrigger};
pub use settings::{ConfigError, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the arcade physics rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the runner will simulate (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    pub const GROUND_HEIGHT: f32 = 32.0;
    /// Y of the ground surface (top edge of the ground band)
    pub const GROUND_TOP: f32 = FIELD_HEIGHT - GROUND_HEIGHT;

    /// Play-scene gravity (units/s²)
    pub const PLAY_GRAVITY: f32 = 600.0;
    /// Idle gravity of the menu scene, never used by the play simulation
    pub const MENU_GRAVITY: f32 = 300.0;
    /// Below this vertical speed a ground contact comes to rest
    pub const REST_SPEED: f32 = 30.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 450.0;
    pub const PLAYER_BOUNCE: f32 = 0.2;
    pub const PLAYER_SPEED: f32 = 160.0;
    pub const PLAYER_JUMP_VELOCITY: f32 = -330.0;

    /// Star defaults
    pub const STARS_PER_WAVE: usize = 12;
    pub const STAR_RADIUS: f32 = 12.0;
    pub const STAR_JITTER: i32 = 10;
    pub const STAR_BOUNCE_MIN: f32 = 0.4;
    pub const STAR_BOUNCE_MAX: f32 = 0.8;
    pub const POINTS_PER_STAR: u32 = 10;

    /// Bomb defaults
    pub const BOMB_RADIUS: f32 = 16.0;
    pub const BOMB_SPAWN_Y: f32 = 16.0;
    pub const BOMB_BOUNCE: f32 = 1.0;
    pub const BOMB_SPAWN_VX: i32 = 200;
    pub const BOMB_SPAWN_VY: f32 = 20.0;
    /// Upward velocity a bomb gets every time it lands
    pub const BOMB_GROUND_IMPULSE: f32 = -700.0;
    /// Horizontal speed under which a landing bomb gets a fresh heading
    pub const BOMB_REHEADING_THRESHOLD: f32 = 50.0;
    pub const BOMB_GROUND_VX: i32 = 150;
    /// Velocity impulse pushing two overlapping bombs apart
    pub const BOMB_SEPARATION_IMPULSE: f32 = 100.0;

    /// Deferred action delays (ms)
    pub const HIT_FLASH_MS: f64 = 100.0;
    pub const GAME_OVER_DELAY_MS: f64 = 1000.0;
    pub const MENU_START_DELAY_MS: f64 = 800.0;
}
