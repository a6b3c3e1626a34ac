use osinter_platform::{Button, Canvas, InputSnapshot, Rect, TextField, TextFieldEvent};

use super::super::context::GameContext;
use super::{Screen, ScreenCommand, ScreenKey, BLACK, LIGHT_GRAY, WHITE};

/// Entry screen: game title, the player's name, and Begin/Quit.
pub struct TitleScreen {
    name_field: TextField,
    begin_button: Button,
    quit_button: Button,
}

impl TitleScreen {
    pub fn new(ctx: &GameContext) -> Self {
        let mut name_field = TextField::new(Rect::from_center(400, 320, 300, 40), 3);
        name_field.set_text(&ctx.progress.player().name);
        Self {
            name_field,
            begin_button: Button::new(300, 475, "Begin", 3, WHITE),
            quit_button: Button::new(500, 475, "Quit", 3, WHITE),
        }
    }

    fn commit_name(&self, ctx: &mut GameContext) {
        ctx.progress.set_player_name(self.name_field.text().trim());
    }
}

impl Screen for TitleScreen {
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        ctx: &mut GameContext,
    ) -> ScreenCommand {
        self.name_field.tick(fixed_dt_seconds);
        if let Some(TextFieldEvent::Submitted) = self.name_field.handle_input(input) {
            self.commit_name(ctx);
        }

        if self.begin_button.update(input) {
            self.commit_name(ctx);
            return ScreenCommand::NavigateTo(ScreenKey::CitySelect);
        }
        if self.quit_button.update(input) {
            self.commit_name(ctx);
            return ScreenCommand::Quit;
        }
        ScreenCommand::None
    }

    fn render(&mut self, canvas: &mut Canvas<'_>) {
        canvas.fill(BLACK);
        canvas.draw_text_centered(400, 125, "OSINT CHRISTMAS", 6, WHITE);
        canvas.draw_text_centered(400, 195, "Open-Source Intelligence Challenge", 2, LIGHT_GRAY);
        canvas.draw_text_centered(400, 284, "Agent name", 2, LIGHT_GRAY);
        self.name_field.draw(canvas);
        self.begin_button.draw(canvas);
        self.quit_button.draw(canvas);
    }
}
