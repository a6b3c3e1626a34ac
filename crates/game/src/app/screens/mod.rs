mod challenge;
mod city_select;
mod level_grid;
mod title;

pub use challenge::ChallengeScreen;
pub use city_select::CitySelectScreen;
pub use level_grid::LevelGridScreen;
pub use title::TitleScreen;

use std::path::Path;

use osinter_platform::{Canvas, InputSnapshot};

use super::context::GameContext;
use super::levels::City;

pub(crate) const WHITE: [u8; 4] = [255, 255, 255, 255];
pub(crate) const BLACK: [u8; 4] = [0, 0, 0, 255];
pub(crate) const LIGHT_GRAY: [u8; 4] = [180, 180, 180, 255];
pub(crate) const GREEN: [u8; 4] = [0, 200, 0, 255];
pub(crate) const RED: [u8; 4] = [200, 60, 60, 255];

pub(crate) const RETURN_BUTTON_CENTER: (i32, i32) = (140, 570);

/// Identity of a navigable screen. The grid and challenge screens are one
/// component each, parameterized here instead of one screen type per city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKey {
    Title,
    CitySelect,
    CityLevelGrid(City),
    LevelChallenge(City, u8),
}

/// What a screen wants the controller to do after a tick. Navigation flows
/// only through this value; screens never swap themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenCommand {
    None,
    NavigateTo(ScreenKey),
    Quit,
}

pub trait Screen {
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        ctx: &mut GameContext,
    ) -> ScreenCommand;
    fn render(&mut self, canvas: &mut Canvas<'_>);
}

/// Background shared by the grid and challenge screens: the city image
/// stretched over the full window, plain black when it cannot be loaded.
pub(crate) fn draw_city_background(canvas: &mut Canvas<'_>, path: &Path) {
    canvas.fill(BLACK);
    let (width, height) = (canvas.width(), canvas.height());
    canvas.blit_scaled(path, 0, 0, width, height);
}
