use osinter_platform::{AppHost, Canvas, InputSnapshot, TickFlow};
use tracing::{error, info, warn};

use super::context::GameContext;
use super::levels::CatalogError;
use super::screens::{
    ChallengeScreen, CitySelectScreen, LevelGridScreen, Screen, ScreenCommand, ScreenKey,
    TitleScreen, WHITE,
};

/// Owns the active screen and applies navigation commands. Screens are
/// rebuilt on every navigation so completion marks and the player's name are
/// re-read from the context each time.
pub struct ScreenController {
    ctx: GameContext,
    active_key: ScreenKey,
    active: Box<dyn Screen>,
    status_line: Option<String>,
}

impl ScreenController {
    pub fn new(ctx: GameContext) -> Self {
        let active: Box<dyn Screen> = Box::new(TitleScreen::new(&ctx));
        Self {
            ctx,
            active_key: ScreenKey::Title,
            active,
            status_line: None,
        }
    }

    fn build_screen(&self, key: ScreenKey) -> Result<Box<dyn Screen>, CatalogError> {
        Ok(match key {
            ScreenKey::Title => Box::new(TitleScreen::new(&self.ctx)),
            ScreenKey::CitySelect => Box::new(CitySelectScreen::new()),
            ScreenKey::CityLevelGrid(city) => Box::new(LevelGridScreen::new(&self.ctx, city)?),
            ScreenKey::LevelChallenge(city, level_id) => {
                Box::new(ChallengeScreen::new(&self.ctx, city, level_id)?)
            }
        })
    }

    /// Swaps to `key`, or stays put with a visible message when the target
    /// refuses to load.
    fn navigate_to(&mut self, key: ScreenKey) {
        match self.build_screen(key) {
            Ok(screen) => {
                info!(from = ?self.active_key, to = ?key, "screen_navigated");
                self.active = screen;
                self.active_key = key;
                self.status_line = None;
            }
            Err(error) => {
                warn!(to = ?key, error = %error, "screen_load_failed");
                self.status_line = Some(format!("Could not load: {error}"));
            }
        }
    }
}

impl AppHost for ScreenController {
    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> TickFlow {
        match self.active.update(fixed_dt_seconds, input, &mut self.ctx) {
            ScreenCommand::None => TickFlow::Continue,
            ScreenCommand::NavigateTo(key) => {
                self.navigate_to(key);
                TickFlow::EndFrame
            }
            ScreenCommand::Quit => {
                info!(reason = "quit_clicked", "exit_requested");
                TickFlow::Exit
            }
        }
    }

    fn render(&mut self, canvas: &mut Canvas<'_>) {
        self.active.render(canvas);
        if let Some(status) = &self.status_line {
            let width = canvas.width();
            let bar_top = canvas.height() as i32 - 24;
            canvas.fill_rect(0, bar_top, width, 24, [40, 10, 10, 255]);
            canvas.draw_text(8, bar_top + 7, status, 2, WHITE);
        }
    }

    fn shutdown(&mut self) {
        match self.ctx.progress.save() {
            Ok(()) => info!("progress_saved"),
            Err(error) => error!(error = %error, "save_on_shutdown_failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::levels::{City, LevelCatalog, LEVEL_IDS};
    use crate::app::progress::ProgressStore;
    use osinter_platform::{GamePaths, OffscreenCanvas};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const DT: f32 = 1.0 / 60.0;

    fn write_portland_levels(root: &Path) {
        for id in LEVEL_IDS {
            let level_dir = root.join("assets/osint_levels/portland").join(id.to_string());
            fs::create_dir_all(&level_dir).expect("create level dir");
            fs::write(level_dir.join(format!("{id}.jpg")), b"jpg").expect("write image");
            fs::write(level_dir.join(format!("{id}.txt")), format!("44.0{id},-123.0{id}\n"))
                .expect("write solution");
        }
    }

    fn controller_at(root: &Path) -> ScreenController {
        let paths = GamePaths {
            root: root.to_path_buf(),
            assets_dir: root.join("assets"),
            levels_dir: root.join("assets/osint_levels"),
            save_file: root.join("save_data.json"),
        };
        let progress = ProgressStore::open(paths.save_file.clone()).expect("open store");
        let catalog = LevelCatalog::new(paths.levels_dir.clone());
        ScreenController::new(GameContext {
            paths,
            catalog,
            progress,
        })
    }

    fn click(x: f32, y: f32) -> InputSnapshot {
        InputSnapshot::empty()
            .with_cursor_px(Some((x, y)))
            .with_left_click_released(true)
    }

    #[test]
    fn begin_click_navigates_to_city_select_and_ends_the_frame() {
        let dir = TempDir::new().expect("temp dir");
        let mut controller = controller_at(dir.path());

        let flow = controller.tick(DT, &click(300.0, 475.0));
        assert_eq!(flow, TickFlow::EndFrame);
        assert_eq!(controller.active_key, ScreenKey::CitySelect);
        assert!(controller.status_line.is_none());
    }

    #[test]
    fn quit_click_requests_exit() {
        let dir = TempDir::new().expect("temp dir");
        let mut controller = controller_at(dir.path());

        assert_eq!(controller.tick(DT, &click(500.0, 475.0)), TickFlow::Exit);
        assert_eq!(controller.active_key, ScreenKey::Title);
    }

    #[test]
    fn failed_grid_load_keeps_the_current_screen_with_a_message() {
        let dir = TempDir::new().expect("temp dir");
        let mut controller = controller_at(dir.path());
        controller.navigate_to(ScreenKey::CitySelect);

        // No level assets exist, so Portland refuses to open.
        let flow = controller.tick(DT, &click(200.0, 100.0));
        assert_eq!(flow, TickFlow::EndFrame);
        assert_eq!(controller.active_key, ScreenKey::CitySelect);
        assert!(controller.status_line.is_some());

        let mut target = OffscreenCanvas::new(800, 600);
        controller.render(&mut target.canvas());
    }

    #[test]
    fn a_navigation_clears_the_previous_status_message() {
        let dir = TempDir::new().expect("temp dir");
        let mut controller = controller_at(dir.path());
        controller.navigate_to(ScreenKey::CitySelect);
        controller.navigate_to(ScreenKey::CityLevelGrid(City::Portland));
        assert!(controller.status_line.is_some());

        controller.navigate_to(ScreenKey::Title);
        assert!(controller.status_line.is_none());
    }

    #[test]
    fn playthrough_awards_points_once_for_a_repeated_level() {
        let dir = TempDir::new().expect("temp dir");
        write_portland_levels(dir.path());
        let mut controller = controller_at(dir.path());

        for _ in 0..2 {
            controller.navigate_to(ScreenKey::LevelChallenge(City::Portland, 3));
            assert_eq!(controller.active_key, ScreenKey::LevelChallenge(City::Portland, 3));
            controller.tick(
                DT,
                &InputSnapshot::empty().with_typed_chars("44.03,-123.03".chars().collect()),
            );
            controller.tick(DT, &InputSnapshot::empty().with_enter_pressed(true));
        }

        assert_eq!(controller.ctx.progress.player().points, 100);
    }

    #[test]
    fn shutdown_writes_the_save_document() {
        let dir = TempDir::new().expect("temp dir");
        let mut controller = controller_at(dir.path());
        controller.ctx.progress.mark_completed(City::Eugene, 1, 100);

        controller.shutdown();
        let saved = fs::read_to_string(dir.path().join("save_data.json")).expect("read save");
        assert!(saved.contains("eugene"));
    }
}
