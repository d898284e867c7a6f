//! Star Catcher headless runner
//!
//! Plays sessions with a simple autopilot and logs the event stream.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use star_catcher::consts::*;
use star_catcher::sim::{GameEvent, PlayState, TickInput};
use star_catcher::{Game, Presentation, Scene, SceneKind, SceneTrigger, Tuning};

/// Frame length of the simulated display (ms)
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Give up on a session after this many frames (10 minutes)
const MAX_FRAMES: u32 = 60 * 60 * 10;

#[derive(Parser, Debug)]
#[command(name = "star-catcher")]
#[command(about = "Headless Star Catcher run driven by a simple autopilot")]
struct Cli {
    /// Base seed; session n plays with seed + n
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
    /// JSON tuning file (missing fields keep the built-in values)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Give up after this many frames
    #[arg(long, default_value_t = MAX_FRAMES)]
    max_frames: u32,
}

/// Presentation that writes everything to the log
#[derive(Default)]
struct LogPresentation {
    stars: u32,
    bombs: u32,
}

impl Presentation for LogPresentation {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::StarCollected { x, y } => {
                self.stars += 1;
                log::debug!("Star at ({x:.0}, {y:.0})");
            }
            GameEvent::ScoreChanged { score } => log::debug!("score {score}"),
            GameEvent::WaveCleared { wave } => log::info!("Wave {wave} cleared"),
            GameEvent::BombSpawned { id, x, .. } => {
                self.bombs += 1;
                log::info!("Bomb {id} dropped at x={x:.0}");
            }
            GameEvent::BombBounced { .. } => {}
            GameEvent::PlayerHit { score, .. } => log::info!("Hit, score {score}"),
        }
    }

    fn on_scene_changed(&mut self, from: SceneKind, to: SceneKind) {
        log::info!("{from:?} -> {to:?}");
    }
}

/// Chase the nearest active star, jump away from bombs closing in
fn autopilot(state: &PlayState) -> TickInput {
    let player = state.player.body.pos;
    let mut input = TickInput::default();

    let target = state
        .wave
        .stars
        .iter()
        .filter(|s| s.active)
        .min_by(|a, b| {
            let da = (a.body.pos.x - player.x).abs();
            let db = (b.body.pos.x - player.x).abs();
            da.total_cmp(&db)
        })
        .map(|s| s.body.pos.x);

    if let Some(x) = target {
        if x > player.x + 4.0 {
            input.move_right = true;
        } else if x < player.x - 4.0 {
            input.move_left = true;
        }
    }

    let threatened = state.bombs.iter().any(|b| {
        let to_player = player - b.body.pos;
        to_player.length() < 90.0 && b.body.vel.dot(to_player) > 0.0
    });
    input.jump = threatened;
    input
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    log::info!("Star Catcher (headless) starting, seed {}", cli.seed);
    let mut presentation = LogPresentation::default();
    let mut game = Game::new(cli.seed, tuning)?;

    // Boot -> MainMenu, then press start
    game.frame(&TickInput::default(), FRAME_MS, &mut presentation);
    if let Some(gravity) = game.scene_gravity() {
        log::debug!("Menu gravity {gravity}");
    }
    game.trigger(SceneTrigger::Start, &mut presentation);

    let mut frames = 0;
    while frames < cli.max_frames {
        let input = game.play_state().map(autopilot).unwrap_or_default();
        game.frame(&input, FRAME_MS, &mut presentation);
        frames += 1;
        if game.kind() == SceneKind::GameOver {
            break;
        }
    }

    match game.scene() {
        Scene::GameOver(payload) => {
            println!("Final score: {}", payload.score);
            println!("{}", payload.message());
        }
        _ => {
            let score = game.play_state().map(|s| s.score).unwrap_or(0);
            println!("Still alive after {frames} frames, score {score}");
        }
    }
    println!(
        "Stars caught: {}, bombs dropped: {}, field {}x{}",
        presentation.stars, presentation.bombs, FIELD_WIDTH, FIELD_HEIGHT
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["star-catcher"]).unwrap();
        assert_eq!(cli.seed, 0x5EED);
        assert_eq!(cli.tuning, None);
        assert_eq!(cli.max_frames, MAX_FRAMES);
    }

    #[test]
    fn test_cli_tuning_path_is_not_taken_as_seed() {
        let cli = Cli::try_parse_from(["star-catcher", "--tuning", "tuning.json"]).unwrap();
        assert_eq!(cli.seed, 0x5EED);
        assert_eq!(cli.tuning, Some(PathBuf::from("tuning.json")));

        // A bare positional path is an error, not a silently ignored seed
        assert!(Cli::try_parse_from(["star-catcher", "tuning.json"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_seed() {
        assert!(Cli::try_parse_from(["star-catcher", "--seed", "tuning.json"]).is_err());
        let cli = Cli::try_parse_from(["star-catcher", "--seed", "42"]).unwrap();
        assert_eq!(cli.seed, 42);
    }

    #[test]
    fn test_autopilot_chases_nearest_star() {
        let mut state = PlayState::new(3);
        let id = state.next_entity_id();
        let target = state.player.body.pos + glam::Vec2::new(200.0, -100.0);
        state.wave.stars = vec![star_catcher::sim::Star::new(id, target, 0.5)];
        let input = autopilot(&state);
        assert!(input.move_right);
        assert!(!input.move_left);
        assert!(!input.jump);
    }
}
