//! Tile-based platformer simulation: tile maps and sprite templates, gravity
//! and axis-separated tile collision, the stomp-or-get-hurt contact rules, and
//! campaign progression through numbered map files.
//!
//! The crate is headless. A renderer reads `viewport::draw_list` and a HUD
//! reads `hud::HudSnapshot`; audio reacts to `game::GameEvent`s.

pub mod animation;
pub mod behavior;
pub mod collision;
pub mod config;
pub mod contact;
pub mod coords;
pub mod entity;
pub mod game;
pub mod hud;
pub mod map_loader;
pub mod physics;
pub mod replay;
pub mod templates;
pub mod tilemap;
pub mod viewport;
