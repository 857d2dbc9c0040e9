use serde::Deserialize;
use std::fs;
use std::path::Path;

use tg_core::input::{Controls, InputState, Key};

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    #[serde(default = "default_elapsed_ms")]
    pub elapsed_ms: u64,
}

/// Keys held during one scripted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub exit: bool,
    pub elapsed_ms: u64,
}

impl ReplayInput {
    /// Bring the key state in line with this frame: listed keys go down,
    /// everything else comes up.
    pub fn apply(&self, input: &mut InputState) {
        for (held, key) in [
            (self.left, Key::Left),
            (self.right, Key::Right),
            (self.jump, Key::Space),
            (self.exit, Key::Escape),
        ] {
            if held {
                input.key_down(key);
            } else {
                input.key_up(key);
            }
        }
    }
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<ReplayInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(ReplayInput {
                    left: frame.left,
                    right: frame.right,
                    jump: frame.jump,
                    exit: frame.exit,
                    elapsed_ms: frame.elapsed_ms,
                });
            }
        }
        out
    }

    pub fn total_ms(&self) -> u64 {
        self.frames
            .iter()
            .map(|f| f.elapsed_ms * u64::from(f.repeat.max(1)))
            .sum()
    }
}

/// Plays a replay through the default key bindings, so held keys behave
/// exactly like a keyboard: a jump held across frames jumps once.
#[derive(Debug)]
pub struct ReplayPlayer {
    inputs: Vec<ReplayInput>,
    cursor: usize,
    controls: Controls,
}

impl ReplayPlayer {
    pub fn new(replay: &ReplaySequence) -> Self {
        Self {
            inputs: replay.expanded_inputs(),
            cursor: 0,
            controls: Controls::default(),
        }
    }

    /// Press the keys of the next frame and return its duration, or `None`
    /// once the script is exhausted.
    pub fn advance(&mut self) -> Option<u64> {
        let input = *self.inputs.get(self.cursor)?;
        self.cursor += 1;
        self.controls.input.end_frame();
        input.apply(&mut self.controls.input);
        Some(input.elapsed_ms)
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len() - self.cursor
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    if let Some(index) = replay.frames.iter().position(|f| f.elapsed_ms == 0) {
        return Err(format!(
            "Replay validation failed: frame {index} has elapsed_ms 0"
        ));
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

const fn default_elapsed_ms() -> u64 {
    16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::Game;
    use crate::map_loader::MemoryMaps;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tg_core::input::{Action, ActionSource};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "tg_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    const LEVEL: &str = "\
A                  A
A                  A
A                  A
A            4     A
A      3           A
AAAAAAAAAAAAAAAAAAAA
";

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "right": true, "repeat": 3 },
                { "jump": true, "repeat": 2, "elapsed_ms": 10 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[0].right);
        assert_eq!(expanded[0].elapsed_ms, 16);
        assert!(expanded[3].jump);
        assert!(expanded[4].jump);
        assert_eq!(replay.total_ms(), 68);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn held_jump_presses_once() {
        let replay = ReplaySequence {
            frames: vec![
                ReplayFrame {
                    left: false,
                    right: true,
                    jump: true,
                    exit: false,
                    repeat: 3,
                    elapsed_ms: 16,
                },
                ReplayFrame {
                    left: false,
                    right: false,
                    jump: false,
                    exit: false,
                    repeat: 1,
                    elapsed_ms: 16,
                },
            ],
        };
        let mut player = ReplayPlayer::new(&replay);
        let mut jumps = 0;
        let mut rights = 0;
        while player.advance().is_some() {
            if player.controls().is_pressed(Action::Jump) {
                jumps += 1;
            }
            if player.controls().is_pressed(Action::MoveRight) {
                rights += 1;
            }
        }
        assert_eq!((jumps, rights), (1, 3));
        assert_eq!(player.remaining(), 0);
        assert!(player.controls().input.is_just_released(Key::Space));
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_elapsed_frame_is_rejected() {
        let path = temp_file_path("zero");
        fs::write(&path, r#"{ "frames": [ { "elapsed_ms": 0 } ] }"#)
            .expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("zero step should fail");
        assert!(err.contains("frame 0"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "repeat": 60 },
                { "right": true, "repeat": 40 },
                { "right": true, "jump": true, "repeat": 30 },
                { "left": true, "repeat": 45, "elapsed_ms": 20 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let new_game = || {
            Game::new(GameConfig::default(), Box::new(MemoryMaps::new([LEVEL])))
                .expect("game should start")
        };

        let play = |game: &mut Game| {
            let mut script = ReplayPlayer::new(&replay);
            while let Some(elapsed_ms) = script.advance() {
                game.update(script.controls(), elapsed_ms).expect("update");
            }
        };

        let mut run_a = new_game();
        let mut run_b = new_game();
        play(&mut run_a);
        play(&mut run_b);

        let (a, b) = (&run_a.map().player, &run_b.map().player);
        assert_eq!(a.body.pos, b.body.pos);
        assert_eq!(a.body.vel, b.body.vel);
        assert_eq!(a.life_state(), b.life_state());
        assert_eq!(run_a.drain_events(), run_b.drain_events());
        assert_eq!(run_a.map().sprites.len(), run_b.map().sprites.len());

        let _ = fs::remove_file(path);
    }
}
