use osinter_platform::GamePaths;

use crate::app::levels::LevelCatalog;
use crate::app::progress::ProgressStore;

/// Everything screens may touch besides their own widgets: resolved
/// filesystem locations, the level catalog, and player progress. Passed
/// explicitly into every screen tick instead of living in globals.
pub struct GameContext {
    pub paths: GamePaths,
    pub catalog: LevelCatalog,
    pub progress: ProgressStore,
}

impl GameContext {
    /// Background art for a screen, under `assets/background_images/`.
    pub fn background_path(&self, stem: &str) -> std::path::PathBuf {
        self.paths
            .assets_dir
            .join("background_images")
            .join(format!("{stem}.png"))
    }

    /// Grid icon for a level id, under `assets/level_icons/`.
    pub fn level_icon_path(&self, level_id: u8) -> std::path::PathBuf {
        self.paths
            .assets_dir
            .join("level_icons")
            .join(format!("level_{level_id}.png"))
    }
}
