use std::path::PathBuf;
use std::process::ExitCode;

use tg_core::input::Controls;
use tg_core::time::FrameClock;
use tg_game::config::{load_config_from_path, GameConfig};
use tg_game::game::{Game, GameEvent};
use tg_game::hud::HudSnapshot;
use tg_game::map_loader::MapDirectory;
use tg_game::replay::{load_replay_from_path, ReplayPlayer};
use tg_game::viewport::{self, Viewport};

const USAGE: &str = "usage: tg_game --maps DIR [--config FILE] [--replay FILE] [--frames N]";
const IDLE_FRAME_MS: u64 = 16;
const DEFAULT_IDLE_FRAMES: u32 = 600;

#[derive(Debug, PartialEq)]
struct Args {
    maps: PathBuf,
    config: Option<PathBuf>,
    replay: Option<PathBuf>,
    /// Frames to run with no input when there is no replay.
    frames: u32,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut maps = None;
    let mut config = None;
    let mut replay = None;
    let mut frames = DEFAULT_IDLE_FRAMES;

    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| format!("{flag} expects a value"))
        };
        match flag.as_str() {
            "--maps" => maps = Some(PathBuf::from(value()?)),
            "--config" => config = Some(PathBuf::from(value()?)),
            "--replay" => replay = Some(PathBuf::from(value()?)),
            "--frames" => {
                let raw = value()?;
                frames = raw
                    .parse()
                    .map_err(|e| format!("--frames {raw}: {e}"))?;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }

    Ok(Args {
        maps: maps.ok_or_else(|| "--maps is required".to_string())?,
        config,
        replay,
        frames,
    })
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::MapLoaded { index } => log::info!("Map {index} loaded"),
        GameEvent::MapReloaded { index } => log::info!("Map {index} restarted"),
        GameEvent::PlayerDied => log::info!("Player died"),
        GameEvent::BossDefeated { seconds } => log::info!("Boss defeated at {seconds}s"),
        GameEvent::PlayerUpgraded { gate } => log::info!("Player upgrade {gate}"),
        GameEvent::LevelUp { level } => log::info!("Level up: {level}"),
        other => log::debug!("{other:?}"),
    }
}

fn run(args: &Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => {
            log::info!("No config given, using defaults");
            GameConfig::default()
        }
    };
    log::info!(
        "Config: gravity {} boundary {:?} penalty {:?} timestep {:?}",
        config.gravity,
        config.boundary,
        config.score_penalty,
        config.timestep
    );

    let mut script = match &args.replay {
        Some(path) => {
            let replay = load_replay_from_path(path)?;
            log::info!(
                "Replay {}: {} frames, {} ms",
                path.display(),
                replay.frames.len(),
                replay.total_ms()
            );
            Some(ReplayPlayer::new(&replay))
        }
        None => None,
    };

    let mut game = Game::new(config.clone(), Box::new(MapDirectory::new(&args.maps)))?;
    let mut clock = FrameClock::new(config.timestep.into());
    let idle = Controls::default();
    let mut idle_frames = args.frames;

    loop {
        let (controls, elapsed_ms) = match script.as_mut() {
            Some(script) => match script.advance() {
                Some(elapsed_ms) => (script.controls(), elapsed_ms),
                None => {
                    log::info!("Replay finished");
                    break;
                }
            },
            None => {
                if idle_frames == 0 {
                    break;
                }
                idle_frames -= 1;
                (&idle, IDLE_FRAME_MS)
            }
        };

        clock.feed(elapsed_ms);
        while let Some(step) = clock.next_step() {
            game.update(controls, step)?;
        }

        let view = Viewport::follow(game.map(), config.screen);
        viewport::wake_visible(game.map_mut(), &view);
        if log::log_enabled!(log::Level::Trace) {
            let commands = viewport::draw_list(game.map(), &view);
            log::trace!("Frame {}: {} draw commands", clock.frame_count, commands.len());
        }

        for event in game.drain_events() {
            log_event(&event);
        }
        if game.exit_requested() {
            log::info!("Exit requested, stopping.");
            break;
        }
        if game.done_secs().is_some() {
            break;
        }
    }

    let hud = HudSnapshot::capture(&game);
    let lines = if hud.done_secs.is_some() {
        hud.summary()
    } else {
        hud.lines()
    };
    log::info!(
        "Ran {} frames ({} steps, {} ms simulated)",
        clock.frame_count,
        clock.step_count,
        clock.total_ms
    );
    for line in lines {
        log::info!("{line}");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Tile game starting...");

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            log::error!("{err}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let parsed = args(&[
            "--maps", "maps", "--config", "game.json", "--replay", "run.json", "--frames", "30",
        ])
        .expect("args should parse");
        assert_eq!(
            parsed,
            Args {
                maps: PathBuf::from("maps"),
                config: Some(PathBuf::from("game.json")),
                replay: Some(PathBuf::from("run.json")),
                frames: 30,
            }
        );
    }

    #[test]
    fn maps_is_required() {
        let err = args(&["--config", "game.json"]).expect_err("missing maps");
        assert!(err.contains("--maps"));
    }

    #[test]
    fn flag_without_value_fails() {
        let err = args(&["--maps"]).expect_err("missing value");
        assert!(err.contains("expects a value"));
    }

    #[test]
    fn unknown_flag_fails() {
        let err = args(&["--maps", "m", "--fast"]).expect_err("unknown flag");
        assert!(err.contains("--fast"));
    }
}
