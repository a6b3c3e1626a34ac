use crate::app::input::InputSnapshot;
use crate::app::render::font;
use crate::app::render::Canvas;
use crate::app::ui::Rect;

/// Text label that acts as a click target. While hovered it renders one
/// scale step larger, and the hit rect tracks the rendered size so hover
/// does not flicker at the grown edge.
#[derive(Debug)]
pub struct Button {
    center_x: i32,
    center_y: i32,
    label: String,
    text_scale: i32,
    color: [u8; 4],
    hovered: bool,
}

impl Button {
    pub fn new(
        center_x: i32,
        center_y: i32,
        label: impl Into<String>,
        text_scale: i32,
        color: [u8; 4],
    ) -> Self {
        Self {
            center_x,
            center_y,
            label: label.into(),
            text_scale,
            color,
            hovered: false,
        }
    }

    fn current_scale(&self) -> i32 {
        if self.hovered {
            self.text_scale + 1
        } else {
            self.text_scale
        }
    }

    fn current_rect(&self) -> Rect {
        let scale = self.current_scale();
        let w = font::text_width_px(&self.label, scale).max(0) as u32;
        let h = font::glyph_height_px(scale).max(0) as u32;
        Rect::from_center(self.center_x, self.center_y, w, h)
    }

    /// Updates hover state from the snapshot and reports whether the button
    /// was clicked this tick. A click is a left release while hovered.
    pub fn update(&mut self, input: &InputSnapshot) -> bool {
        let Some((cursor_x, cursor_y)) = input.cursor_px() else {
            self.hovered = false;
            return false;
        };
        if self.current_rect().contains(cursor_x, cursor_y) {
            self.hovered = true;
            input.left_click_released()
        } else {
            self.hovered = false;
            false
        }
    }

    pub fn draw(&self, canvas: &mut Canvas<'_>) {
        let rect = self.current_rect();
        canvas.draw_text(rect.x, rect.y, &self.label, self.current_scale(), self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn hover_snapshot(x: f32, y: f32) -> InputSnapshot {
        InputSnapshot::empty().with_cursor_px(Some((x, y)))
    }

    #[test]
    fn click_requires_release_while_hovered() {
        let mut button = Button::new(100, 100, "Begin", 3, WHITE);

        assert!(!button.update(&hover_snapshot(100.0, 100.0)));
        assert!(button.update(
            &hover_snapshot(100.0, 100.0).with_left_click_released(true)
        ));
    }

    #[test]
    fn release_away_from_the_button_does_not_click() {
        let mut button = Button::new(100, 100, "Quit", 3, WHITE);
        let snapshot = hover_snapshot(500.0, 500.0).with_left_click_released(true);
        assert!(!button.update(&snapshot));
        assert!(!button.update(&InputSnapshot::empty().with_left_click_released(true)));
    }

    #[test]
    fn hover_grows_the_hit_rect_until_the_cursor_leaves_it() {
        let mut button = Button::new(100, 100, "Return", 3, WHITE);
        let resting = button.current_rect();

        assert!(!button.update(&hover_snapshot(100.0, 100.0)));
        let grown = button.current_rect();
        assert!(grown.w > resting.w);

        // A point inside the grown rect but outside the resting one keeps hover.
        let edge_x = (resting.x + resting.w as i32) as f32 + 1.0;
        assert!(grown.contains(edge_x, 100.0));
        button.update(&hover_snapshot(edge_x, 100.0));
        assert_eq!(button.current_rect(), grown);

        button.update(&hover_snapshot(700.0, 100.0));
        assert_eq!(button.current_rect(), resting);
    }
}
