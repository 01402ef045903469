#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs No Room headlessly.

mod config;
mod headless;
mod scene;
mod schedule_file;
mod session;

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use no_room_core::{Command, GameState, CELL_LENGTH, GAME_TITLE, GRID_COLUMNS, GRID_ROWS};
use no_room_rendering::{Presentation, RenderingBackend, Scene, Viewport, CLEAR_COLOR};
use no_room_system_builder::MenuButton;
use no_room_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::GameConfig,
    headless::{HeadlessBackend, ScriptedClick},
    session::Session,
};

/// Runs a No Room wave schedule without a window.
#[derive(Debug, Parser)]
#[command(name = "no-room", version)]
struct Args {
    /// JSON wave schedule; a built-in schedule is used when omitted.
    #[arg(long, value_name = "PATH")]
    schedule: Option<PathBuf>,
    /// TOML file with rules, frame pacing and the initial layout.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Simulated frames per second.
    #[arg(long, value_name = "N")]
    fps: Option<u32>,
    /// Upper bound on simulated run length.
    #[arg(long, value_name = "SECONDS")]
    max_seconds: Option<f64>,
    /// Log filter directive, e.g. `debug` or `no_room_world=trace`.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log: String,
}

/// Entry point for the No Room command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let frame = config.frame.overridden(args.fps, args.max_seconds);
    frame.validate()?;

    let spawns = match &args.schedule {
        Some(path) => schedule_file::load(path)?,
        None => schedule_file::default_schedule(),
    };

    let mut session = Session::new(World::with_rules(config.rules));
    session.configure(Command::ConfigureSchedule { spawns });
    session.apply_layout(&config.layout);
    let session = Rc::new(RefCell::new(session));

    let viewport = Viewport::new(frame.window_width, frame.window_height)
        .context("invalid window size in frame config")?;
    let play = MenuButton::Play.bounds();
    let play_centre = Vec2::new(
        (play.x() + play.width() / 2.0) as f32,
        (play.y() + play.height() / 2.0) as f32,
    );
    let backend = HeadlessBackend::new(viewport, frame.frame_duration(), frame.max_frames())
        .with_click(
            0,
            ScriptedClick {
                window_position: viewport.to_window(play_centre),
                secondary: false,
            },
        );

    let scene = Scene::new(GRID_COLUMNS, GRID_ROWS, CELL_LENGTH as f32, GAME_TITLE);
    let presentation = Presentation::new(GAME_TITLE, CLEAR_COLOR, scene);
    let driver = Rc::clone(&session);
    backend.run(presentation, move |dt, input, scene| {
        driver.borrow_mut().frame(dt, input, scene);
    })?;

    let outcome = session.borrow().outcome();
    info!(state = ?outcome.state, clock_ms = outcome.clock.as_millis() as u64, "run ended");
    let verdict = match outcome.state {
        GameState::Won => "won",
        GameState::Lost => "lost",
        GameState::Setup | GameState::Active | GameState::Paused => "unfinished",
    };
    println!(
        "{GAME_TITLE}: {verdict} after {:.1}s with balance {} and {} safe-zone cells left",
        outcome.clock.as_secs_f64(),
        outcome.balance,
        outcome.safe_zones_remaining,
    );
    Ok(())
}

fn init_tracing(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log filter `{directive}`"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}
