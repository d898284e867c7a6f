//! Scene flow: Boot → MainMenu → Game → GameOver
//!
//! [`Game`] owns the current scene and runs one frame at a time: real time
//! advances the clocks, physics runs in fixed substeps, events are handed
//! to the presentation layer, then any pending scene change is applied.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::{ConfigError, Tuning};
use crate::sim::{GameEvent, PlayState, Scheduler, TickInput, advance_clock, tick};

/// Which scene is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    /// One-shot setup, leaves on the first frame
    Boot,
    MainMenu,
    Game,
    GameOver,
}

/// Data handed from Game to GameOver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameOverPayload {
    #[serde(default)]
    pub score: u32,
}

impl GameOverPayload {
    /// Encouragement line shown with the final score
    pub fn message(&self) -> &'static str {
        match self.score {
            100.. => "Amazing! You're a star catching champion!",
            50.. => "Great job! Keep reaching for the stars!",
            20.. => "Good effort! Practice makes perfect!",
            _ => "Keep trying! Every star counts!",
        }
    }
}

/// The current scene and the state it owns
#[derive(Debug)]
pub enum Scene {
    Boot,
    MainMenu,
    Game(Box<PlayState>),
    GameOver(GameOverPayload),
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Boot => SceneKind::Boot,
            Scene::MainMenu => SceneKind::MainMenu,
            Scene::Game(_) => SceneKind::Game,
            Scene::GameOver(_) => SceneKind::GameOver,
        }
    }
}

/// Discrete menu inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTrigger {
    /// MainMenu → Game, after the menu transition delay
    Start,
    /// GameOver → Game with a fresh session
    Restart,
    /// GameOver → MainMenu
    Menu,
}

/// Rendering/audio collaborator; the core never waits on it
pub trait Presentation {
    fn on_event(&mut self, event: &GameEvent);

    fn on_scene_changed(&mut self, _from: SceneKind, _to: SceneKind) {}
}

/// Presentation that ignores everything (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn on_event(&mut self, _event: &GameEvent) {}
}

enum Transition {
    ToMenu,
    ToGame,
    ToGameOver(GameOverPayload),
}

/// Scene state machine plus fixed-timestep frame runner
#[derive(Debug)]
pub struct Game {
    scene: Scene,
    /// Base seed; each session derives its own from it
    seed: u64,
    tuning: Tuning,
    sessions: u64,
    accumulator: f32,
    /// Scene-level deferred triggers (menu start delay)
    pending: Scheduler<SceneTrigger>,
}

impl Game {
    /// Create a runner in Boot; every session it starts uses `tuning`
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            scene: Scene::Boot,
            seed,
            tuning,
            sessions: 0,
            accumulator: 0.0,
            pending: Scheduler::new(),
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Gravity for decorative bodies in the current scene. The menu uses its
    /// own lighter value; it never feeds the play simulation.
    pub fn scene_gravity(&self) -> Option<f32> {
        match self.scene {
            Scene::MainMenu => Some(self.tuning.menu_gravity),
            Scene::Game(_) => Some(self.tuning.gravity),
            Scene::Boot | Scene::GameOver(_) => None,
        }
    }

    /// Number of play sessions started so far
    pub fn sessions_started(&self) -> u64 {
        self.sessions
    }

    pub fn play_state(&self) -> Option<&PlayState> {
        match &self.scene {
            Scene::Game(state) => Some(state.as_ref()),
            _ => None,
        }
    }

    pub fn play_state_mut(&mut self) -> Option<&mut PlayState> {
        match &mut self.scene {
            Scene::Game(state) => Some(state.as_mut()),
            _ => None,
        }
    }

    /// Apply a menu trigger; returns false if the current scene ignores it
    pub fn trigger(&mut self, trigger: SceneTrigger, presentation: &mut dyn Presentation) -> bool {
        match (self.scene.kind(), trigger) {
            (SceneKind::MainMenu, SceneTrigger::Start) => {
                if self.pending.is_pending(|t| *t == SceneTrigger::Start) {
                    return false;
                }
                let delay = self.tuning.menu_start_delay_ms;
                self.pending.schedule(delay, SceneTrigger::Start);
                log::debug!("Game starts in {delay} ms");
                true
            }
            (SceneKind::GameOver, SceneTrigger::Restart) => {
                self.apply(Transition::ToGame, presentation);
                true
            }
            (SceneKind::GameOver, SceneTrigger::Menu) => {
                self.apply(Transition::ToMenu, presentation);
                true
            }
            (kind, trigger) => {
                log::debug!("Ignoring {trigger:?} in {kind:?}");
                false
            }
        }
    }

    /// Run one rendering frame of `frame_ms` real milliseconds
    pub fn frame(&mut self, input: &TickInput, frame_ms: f32, presentation: &mut dyn Presentation) {
        let frame_ms = if frame_ms.is_finite() { frame_ms.max(0.0) } else { 0.0 };

        let next = match &mut self.scene {
            Scene::Boot => Some(Transition::ToMenu),
            Scene::MainMenu => {
                self.pending.advance(f64::from(frame_ms));
                self.pending
                    .take_due()
                    .contains(&SceneTrigger::Start)
                    .then_some(Transition::ToGame)
            }
            Scene::Game(state) => {
                // Clock first, so delays scheduled by this frame's ticks
                // count only time that passes after them
                advance_clock(state, f64::from(frame_ms));

                self.accumulator += frame_ms.min(MAX_FRAME_MS) / 1000.0;

                let mut substeps = 0;
                while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                    tick(state, input, SIM_DT);
                    self.accumulator -= SIM_DT;
                    substeps += 1;
                }

                for event in state.drain_events() {
                    presentation.on_event(&event);
                }

                state
                    .finished
                    .map(|score| Transition::ToGameOver(GameOverPayload { score }))
            }
            Scene::GameOver(_) => None,
        };

        if let Some(transition) = next {
            self.apply(transition, presentation);
        }
    }

    /// Replace the current scene; the old scene and its timers are dropped
    fn apply(&mut self, transition: Transition, presentation: &mut dyn Presentation) {
        let from = self.scene.kind();
        self.scene = match transition {
            Transition::ToMenu => Scene::MainMenu,
            Transition::ToGame => {
                self.sessions += 1;
                let seed = self.seed.wrapping_add(self.sessions);
                log::info!("Session {} seeded with {seed}", self.sessions);
                Scene::Game(Box::new(PlayState::from_valid_tuning(seed, self.tuning.clone())))
            }
            Transition::ToGameOver(payload) => Scene::GameOver(payload),
        };
        self.accumulator = 0.0;
        self.pending.cancel_all();

        let to = self.scene.kind();
        match &self.scene {
            Scene::GameOver(payload) => log::info!("Scene {from:?} -> {to:?} (score {})", payload.score),
            _ => log::info!("Scene {from:?} -> {to:?}"),
        }
        presentation.on_scene_changed(from, to);
    }
}
