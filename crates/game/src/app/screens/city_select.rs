use osinter_platform::{Button, Canvas, InputSnapshot};

use super::super::context::GameContext;
use super::super::levels::City;
use super::{Screen, ScreenCommand, ScreenKey, BLACK, RETURN_BUTTON_CENTER, WHITE};

/// Picks which city's level grid to open.
pub struct CitySelectScreen {
    city_buttons: Vec<(City, Button)>,
    return_button: Button,
}

impl CitySelectScreen {
    pub fn new() -> Self {
        let city_buttons = City::ALL
            .iter()
            .enumerate()
            .map(|(index, city)| {
                let center_x = 200 + index as i32 * 200;
                (*city, Button::new(center_x, 100, city.display_name(), 3, WHITE))
            })
            .collect();
        Self {
            city_buttons,
            return_button: Button::new(
                RETURN_BUTTON_CENTER.0,
                RETURN_BUTTON_CENTER.1,
                "<--- Return to menu",
                2,
                WHITE,
            ),
        }
    }
}

impl Screen for CitySelectScreen {
    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        input: &InputSnapshot,
        _ctx: &mut GameContext,
    ) -> ScreenCommand {
        for (city, button) in &mut self.city_buttons {
            if button.update(input) {
                return ScreenCommand::NavigateTo(ScreenKey::CityLevelGrid(*city));
            }
        }
        if self.return_button.update(input) {
            return ScreenCommand::NavigateTo(ScreenKey::Title);
        }
        ScreenCommand::None
    }

    fn render(&mut self, canvas: &mut Canvas<'_>) {
        canvas.fill(BLACK);
        canvas.draw_text_centered(400, 35, "Select a city", 3, WHITE);
        for (_, button) in &self.city_buttons {
            button.draw(canvas);
        }
        self.return_button.draw(canvas);
    }
}
