use std::path::PathBuf;

use osinter_platform::{Canvas, InputSnapshot, Rect, TextField, TextFieldEvent};
use tracing::error;

use super::super::context::GameContext;
use super::super::levels::{CatalogError, City, Level};
use super::super::validate::answer_matches;
use super::{
    draw_city_background, Screen, ScreenCommand, ScreenKey, GREEN, LIGHT_GRAY, RED, WHITE,
};

const PANEL_RECT: (i32, i32, u32, u32) = (100, 80, 600, 440);
const PHOTO_RECT: (i32, i32, u32, u32) = (200, 120, 400, 250);
const FEEDBACK_SECONDS: f32 = 1.5;

/// A single level: the photograph, an answer field, and submit feedback.
pub struct ChallengeScreen {
    level: Level,
    background_path: PathBuf,
    answer_field: TextField,
    feedback: Option<Feedback>,
}

struct Feedback {
    message: String,
    color: [u8; 4],
    remaining_seconds: f32,
    returns_to_grid: bool,
}

impl Feedback {
    fn success(message: String) -> Self {
        Self {
            message,
            color: GREEN,
            remaining_seconds: FEEDBACK_SECONDS,
            returns_to_grid: true,
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            message: message.to_string(),
            color: RED,
            remaining_seconds: FEEDBACK_SECONDS,
            returns_to_grid: false,
        }
    }
}

impl ChallengeScreen {
    pub fn new(ctx: &GameContext, city: City, level_id: u8) -> Result<Self, CatalogError> {
        let level = ctx.catalog.load_level(city, level_id)?;
        let mut answer_field = TextField::new(Rect::new(250, 400, 300, 40), 3);
        answer_field.set_focused(true);
        Ok(Self {
            level,
            background_path: ctx.background_path(city.name()),
            answer_field,
            feedback: None,
        })
    }

    fn submit(&mut self, ctx: &mut GameContext) {
        if answer_matches(self.answer_field.text(), &self.level.solution) {
            let newly = ctx.progress.mark_completed(
                self.level.city,
                self.level.id,
                self.level.point_value,
            );
            if let Err(error) = ctx.progress.save() {
                error!(error = %error, "progress_save_failed");
            }
            let message = if newly {
                format!("Correct! +{} points", self.level.point_value)
            } else {
                "Correct!".to_string()
            };
            self.feedback = Some(Feedback::success(message));
        } else {
            self.feedback = Some(Feedback::failure("Incorrect, try again"));
        }
    }
}

impl Screen for ChallengeScreen {
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        ctx: &mut GameContext,
    ) -> ScreenCommand {
        self.answer_field.tick(fixed_dt_seconds);

        if let Some(feedback) = &mut self.feedback {
            feedback.remaining_seconds -= fixed_dt_seconds;
            if feedback.returns_to_grid {
                // Success holds the screen until the feedback window passes.
                if feedback.remaining_seconds <= 0.0 {
                    self.feedback = None;
                    return ScreenCommand::NavigateTo(ScreenKey::CityLevelGrid(self.level.city));
                }
                return ScreenCommand::None;
            }
            if feedback.remaining_seconds <= 0.0 {
                self.feedback = None;
            }
        }

        if input.escape_pressed() {
            return ScreenCommand::NavigateTo(ScreenKey::CityLevelGrid(self.level.city));
        }
        if let Some(TextFieldEvent::Submitted) = self.answer_field.handle_input(input) {
            self.submit(ctx);
        }
        ScreenCommand::None
    }

    fn render(&mut self, canvas: &mut Canvas<'_>) {
        draw_city_background(canvas, &self.background_path);
        let (width, height) = (canvas.width(), canvas.height());
        canvas.blend_rect(0, 0, width, height, [0, 0, 0, 180]);

        canvas.fill_rect(
            PANEL_RECT.0,
            PANEL_RECT.1,
            PANEL_RECT.2,
            PANEL_RECT.3,
            [30, 30, 30, 255],
        );
        canvas.outline_rect(PANEL_RECT.0, PANEL_RECT.1, PANEL_RECT.2, PANEL_RECT.3, 3, WHITE);

        canvas.draw_text(
            120,
            94,
            &format!("{} - Level {}", self.level.city.display_name(), self.level.id),
            2,
            LIGHT_GRAY,
        );
        canvas.draw_text_centered(400, 94, "Where was this photo taken?", 2, WHITE);

        // Placeholder behind the photo in case it fails to decode.
        canvas.fill_rect(
            PHOTO_RECT.0,
            PHOTO_RECT.1,
            PHOTO_RECT.2,
            PHOTO_RECT.3,
            [15, 15, 15, 255],
        );
        canvas.blit_scaled(
            &self.level.image_path,
            PHOTO_RECT.0,
            PHOTO_RECT.1,
            PHOTO_RECT.2,
            PHOTO_RECT.3,
        );

        canvas.draw_text_centered(
            400,
            378,
            &format!("Worth {} points", self.level.point_value),
            2,
            LIGHT_GRAY,
        );
        self.answer_field.draw(canvas);

        if let Some(feedback) = &self.feedback {
            canvas.draw_text_centered(400, 455, &feedback.message, 3, feedback.color);
        }
        canvas.draw_text_centered(400, 498, "Enter submits, Esc returns", 2, LIGHT_GRAY);
    }
}
