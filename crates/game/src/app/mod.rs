mod context;
mod controller;
mod levels;
mod progress;
mod screens;
mod validate;

use osinter_platform::{resolve_game_paths, run_app, AppError, LoopConfig, StartupError};
use thiserror::Error;
use tracing::info;

use context::GameContext;
use controller::ScreenController;
use levels::LevelCatalog;
use progress::{ProgressError, ProgressStore};

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    App(#[from] AppError),
}

pub fn run() -> Result<(), GameError> {
    let paths = resolve_game_paths()?;
    info!(
        root = %paths.root.display(),
        levels_dir = %paths.levels_dir.display(),
        save_file = %paths.save_file.display(),
        "startup"
    );

    // A corrupt save document aborts here; it is never overwritten with a
    // fresh one.
    let progress = ProgressStore::open(paths.save_file.clone())?;
    let catalog = LevelCatalog::new(paths.levels_dir.clone());
    let ctx = GameContext {
        paths,
        catalog,
        progress,
    };
    let mut controller = ScreenController::new(ctx);

    let config = LoopConfig {
        window_title: "OSINT Christmas".to_string(),
        ..LoopConfig::default()
    };
    run_app(config, &mut controller)?;
    Ok(())
}
