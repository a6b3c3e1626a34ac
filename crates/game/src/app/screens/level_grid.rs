use std::path::PathBuf;

use osinter_platform::{Button, Canvas, InputSnapshot, Rect};

use super::super::context::GameContext;
use super::super::levels::{CatalogError, City};
use super::{
    draw_city_background, Screen, ScreenCommand, ScreenKey, GREEN, RETURN_BUTTON_CENTER, WHITE,
};

const ICON_SIZE: u32 = 160;
const ICON_GAP: i32 = 40;
const GRID_START_X: i32 = 100;
const GRID_START_Y: i32 = 60;

/// One city's five levels, three in the top row and two below.
#[derive(Debug)]
pub struct LevelGridScreen {
    city: City,
    background_path: PathBuf,
    tiles: Vec<LevelTile>,
    return_button: Button,
}

#[derive(Debug)]
struct LevelTile {
    level_id: u8,
    rect: Rect,
    icon_path: PathBuf,
    completed: bool,
    hovered: bool,
}

impl LevelTile {
    fn draw(&self, canvas: &mut Canvas<'_>) {
        // Fallback art first; the icon covers it when it decodes.
        canvas.fill_rect(
            self.rect.x,
            self.rect.y,
            self.rect.w,
            self.rect.h,
            [40, 40, 40, 255],
        );
        canvas.draw_text_centered(
            self.rect.center_x(),
            self.rect.center_y() - 10,
            &self.level_id.to_string(),
            4,
            WHITE,
        );
        canvas.blit_scaled(
            &self.icon_path,
            self.rect.x,
            self.rect.y,
            self.rect.w,
            self.rect.h,
        );

        if self.completed {
            canvas.outline_rect(self.rect.x, self.rect.y, self.rect.w, self.rect.h, 3, GREEN);
            canvas.draw_text_centered(
                self.rect.center_x(),
                self.rect.y + self.rect.h as i32 - 16,
                "Done",
                2,
                GREEN,
            );
        }
        if self.hovered {
            canvas.outline_rect(self.rect.x, self.rect.y, self.rect.w, self.rect.h, 3, WHITE);
        }
    }
}

impl LevelGridScreen {
    /// Loads the whole city catalog up front. A load failure keeps the
    /// previous screen on, so a partial grid is never shown.
    pub fn new(ctx: &GameContext, city: City) -> Result<Self, CatalogError> {
        let loaded = ctx.catalog.load_city(city.name())?;
        let tiles = loaded
            .levels()
            .iter()
            .enumerate()
            .map(|(index, level)| {
                let (col, row) = if index < 3 {
                    (index as i32, 0)
                } else {
                    (index as i32 - 3, 1)
                };
                let step = ICON_SIZE as i32 + ICON_GAP;
                LevelTile {
                    level_id: level.id,
                    rect: Rect::new(
                        GRID_START_X + col * step,
                        GRID_START_Y + row * step,
                        ICON_SIZE,
                        ICON_SIZE,
                    ),
                    icon_path: ctx.level_icon_path(level.id),
                    completed: ctx.progress.is_completed(city, level.id),
                    hovered: false,
                }
            })
            .collect();
        Ok(Self {
            city,
            background_path: ctx.background_path(city.name()),
            tiles,
            return_button: Button::new(
                RETURN_BUTTON_CENTER.0,
                RETURN_BUTTON_CENTER.1,
                "<--- Return to menu",
                2,
                WHITE,
            ),
        })
    }
}

impl Screen for LevelGridScreen {
    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        input: &InputSnapshot,
        _ctx: &mut GameContext,
    ) -> ScreenCommand {
        for tile in &mut self.tiles {
            tile.hovered = input
                .cursor_px()
                .is_some_and(|(x, y)| tile.rect.contains(x, y));
            if tile.hovered && input.left_click_released() {
                return ScreenCommand::NavigateTo(ScreenKey::LevelChallenge(
                    self.city,
                    tile.level_id,
                ));
            }
        }
        if self.return_button.update(input) {
            return ScreenCommand::NavigateTo(ScreenKey::CitySelect);
        }
        ScreenCommand::None
    }

    fn render(&mut self, canvas: &mut Canvas<'_>) {
        draw_city_background(canvas, &self.background_path);
        for tile in &self.tiles {
            tile.draw(canvas);
        }
        self.return_button.draw(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::levels::{LevelCatalog, LEVEL_IDS};
    use crate::app::progress::ProgressStore;
    use osinter_platform::{GamePaths, OffscreenCanvas};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_portland_levels(root: &Path) {
        for id in LEVEL_IDS {
            let level_dir = root.join("assets/osint_levels/portland").join(id.to_string());
            fs::create_dir_all(&level_dir).expect("create level dir");
            fs::write(level_dir.join(format!("{id}.jpg")), b"jpg").expect("write image");
            fs::write(level_dir.join(format!("{id}.txt")), format!("44.0{id},-123.0{id}\n"))
                .expect("write solution");
        }
    }

    fn context_at(root: &Path) -> GameContext {
        let paths = GamePaths {
            root: root.to_path_buf(),
            assets_dir: root.join("assets"),
            levels_dir: root.join("assets/osint_levels"),
            save_file: root.join("save_data.json"),
        };
        let progress = ProgressStore::open(paths.save_file.clone()).expect("open store");
        let catalog = LevelCatalog::new(paths.levels_dir.clone());
        GameContext {
            paths,
            catalog,
            progress,
        }
    }

    #[test]
    fn five_tiles_laid_out_three_then_two() {
        let dir = TempDir::new().expect("temp dir");
        write_portland_levels(dir.path());
        let ctx = context_at(dir.path());

        let grid = LevelGridScreen::new(&ctx, City::Portland).expect("build grid");
        let corners: Vec<(i32, i32)> = grid.tiles.iter().map(|t| (t.rect.x, t.rect.y)).collect();
        assert_eq!(
            corners,
            vec![(100, 60), (300, 60), (500, 60), (100, 260), (300, 260)]
        );
    }

    #[test]
    fn clicking_a_tile_opens_that_level() {
        let dir = TempDir::new().expect("temp dir");
        write_portland_levels(dir.path());
        let mut ctx = context_at(dir.path());
        let mut grid = LevelGridScreen::new(&ctx, City::Portland).expect("build grid");

        // Center of the third tile in the top row.
        let click = InputSnapshot::empty()
            .with_cursor_px(Some((580.0, 140.0)))
            .with_left_click_released(true);
        let command = grid.update(1.0 / 60.0, &click, &mut ctx);
        assert_eq!(
            command,
            ScreenCommand::NavigateTo(ScreenKey::LevelChallenge(City::Portland, 3))
        );
    }

    #[test]
    fn completion_marks_come_from_the_progress_store() {
        let dir = TempDir::new().expect("temp dir");
        write_portland_levels(dir.path());
        let mut ctx = context_at(dir.path());
        ctx.progress.mark_completed(City::Portland, 2, 100);

        let grid = LevelGridScreen::new(&ctx, City::Portland).expect("build grid");
        let completed: Vec<u8> = grid
            .tiles
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.level_id)
            .collect();
        assert_eq!(completed, vec![2]);
    }

    #[test]
    fn missing_assets_refuse_to_build_the_grid() {
        let dir = TempDir::new().expect("temp dir");
        let ctx = context_at(dir.path());
        let error = LevelGridScreen::new(&ctx, City::Portland).expect_err("no assets on disk");
        assert!(matches!(error, CatalogError::MissingAsset { .. }));
    }

    #[test]
    fn renders_without_icon_or_background_files() {
        let dir = TempDir::new().expect("temp dir");
        write_portland_levels(dir.path());
        let mut ctx = context_at(dir.path());
        let mut grid = LevelGridScreen::new(&ctx, City::Portland).expect("build grid");
        grid.update(
            1.0 / 60.0,
            &InputSnapshot::empty().with_cursor_px(Some((140.0, 100.0))),
            &mut ctx,
        );

        let mut target = OffscreenCanvas::new(800, 600);
        grid.render(&mut target.canvas());
    }
}
