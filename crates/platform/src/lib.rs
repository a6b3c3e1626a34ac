use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod atomic_io;
pub mod document;

pub use app::{
    run_app, AppError, AppHost, Canvas, ClipRect, InputCollector, InputSnapshot, LoopConfig,
    OffscreenCanvas, Rect, TextField, TextFieldEvent, TickFlow,
};
pub use app::render::font::{advance_px, line_advance_px, text_width_px};
pub use app::ui::Button;
pub use document::{read_document_text, write_document_atomic, DocumentIoError, DocumentText};

pub const ROOT_ENV_VAR: &str = "OSINTER_ROOT";

/// Filesystem locations the game reads and writes, all anchored at the
/// resolved repository root.
#[derive(Debug, Clone)]
pub struct GamePaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub levels_dir: PathBuf,
    pub save_file: PathBuf,
}

impl GamePaths {
    /// Lays out the fixed locations under a resolved root.
    pub fn at_root(root: PathBuf) -> Self {
        let assets_dir = root.join("assets");
        let levels_dir = assets_dir.join("osint_levels");
        let save_file = root.join("save_data.json");
        Self {
            root,
            assets_dir,
            levels_dir,
            save_file,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    ReadRootVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    LocateExecutable(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExecutableHasNoParent(PathBuf),
    #[error(
        "OSINTER_ROOT is set but does not point to a valid game root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect the game root by walking upward from the executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
PowerShell: $env:{env_var}=\"C:\\path\\to\\osinter\"\n\
Bash/zsh: export {env_var}=\"/path/to/osinter\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Locates the game root and lays the fixed paths out under it. The
/// environment variable wins when set; otherwise the root is found by
/// walking up from the executable.
pub fn resolve_game_paths() -> Result<GamePaths, StartupError> {
    let root = match env::var(ROOT_ENV_VAR) {
        Ok(value) => root_from_env(&value)?,
        Err(env::VarError::NotPresent) => root_from_executable()?,
        Err(source) => {
            return Err(StartupError::ReadRootVar {
                var: ROOT_ENV_VAR,
                source,
            })
        }
    };
    Ok(GamePaths::at_root(root))
}

fn root_from_env(value: &str) -> Result<PathBuf, StartupError> {
    let candidate = canonical_or_given(Path::new(value));
    if looks_like_game_root(&candidate) {
        Ok(candidate)
    } else {
        Err(StartupError::InvalidEnvRoot { path: candidate })
    }
}

fn root_from_executable() -> Result<PathBuf, StartupError> {
    let exe = env::current_exe().map_err(StartupError::LocateExecutable)?;
    let exe_dir = exe
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| StartupError::ExecutableHasNoParent(exe.clone()))?;

    for candidate in exe_dir.ancestors() {
        if looks_like_game_root(candidate) {
            return Ok(canonical_or_given(candidate));
        }
    }

    Err(StartupError::RootNotFound {
        start_dir: canonical_or_given(&exe_dir),
        env_var: ROOT_ENV_VAR,
    })
}

fn looks_like_game_root(path: &Path) -> bool {
    path.join("Cargo.toml").is_file()
        && (path.join("crates").is_dir() || path.join("assets").is_dir())
}

fn canonical_or_given(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
