use crate::app::input::InputSnapshot;
use crate::app::render::font;
use crate::app::render::{Canvas, ClipRect};
use crate::app::ui::Rect;

const PADDING_PX: i32 = 6;
const BORDER_PX: u32 = 2;
const BLINK_HALF_PERIOD_SECONDS: f32 = 0.5;

const FIELD_FILL: [u8; 4] = [0, 0, 0, 255];
const RESTING_BORDER: [u8; 4] = [120, 120, 120, 255];
const FOCUSED_BORDER: [u8; 4] = [255, 255, 255, 255];
const TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFieldEvent {
    /// Enter was pressed while the field had focus. The field does not act
    /// on its own contents; the owner decides what submission means.
    Submitted,
}

/// Single-line editable text box.
///
/// Entry is filtered to printable ASCII plus space, so byte and character
/// indices agree throughout. The caret blinks on elapsed time with equal
/// visible and hidden half-periods, and the text run scrolls horizontally
/// so the caret always stays inside the interior.
pub struct TextField {
    rect: Rect,
    text: String,
    caret: usize,
    scroll: usize,
    focused: bool,
    blink_seconds: f32,
    text_scale: i32,
}

impl TextField {
    pub fn new(rect: Rect, text_scale: i32) -> Self {
        Self {
            rect,
            text: String::new(),
            caret: 0,
            scroll: 0,
            focused: false,
            blink_seconds: 0.0,
            text_scale,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Replaces the contents, filtering exactly as typed entry does, and
    /// leaves the caret after the last character.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.caret = 0;
        self.scroll = 0;
        for ch in text.chars() {
            self.insert_char(ch);
        }
        self.scroll = effective_scroll(self.caret, self.scroll, self.visible_chars());
    }

    /// Applies one tick's worth of input. Pointer handling runs first so a
    /// click that moves focus also decides whether the rest of the snapshot
    /// reaches the buffer.
    pub fn handle_input(&mut self, input: &InputSnapshot) -> Option<TextFieldEvent> {
        if input.left_click_pressed() {
            match input.cursor_px() {
                Some((x, y)) if self.rect.contains(x, y) => {
                    self.focused = true;
                    self.caret = self.boundary_for_click(x);
                }
                _ => self.focused = false,
            }
        }
        if !self.focused {
            return None;
        }

        for ch in input.typed_chars() {
            self.insert_char(*ch);
        }
        if let Some(pasted) = input.pasted_text() {
            for ch in pasted.chars() {
                self.insert_char(ch);
            }
        }
        if input.backspace_pressed() {
            self.backspace();
        }
        if input.delete_pressed() {
            self.delete_forward();
        }
        if input.arrow_left_pressed() {
            self.caret = self.caret.saturating_sub(1);
        }
        if input.arrow_right_pressed() {
            self.caret = (self.caret + 1).min(self.text.len());
        }
        if input.home_pressed() {
            self.caret = 0;
        }
        if input.end_pressed() {
            self.caret = self.text.len();
        }
        self.scroll = effective_scroll(self.caret, self.scroll, self.visible_chars());

        if input.enter_pressed() {
            return Some(TextFieldEvent::Submitted);
        }
        None
    }

    pub fn tick(&mut self, dt_seconds: f32) {
        self.blink_seconds += dt_seconds;
    }

    pub fn draw(&self, canvas: &mut Canvas<'_>) {
        canvas.fill_rect(self.rect.x, self.rect.y, self.rect.w, self.rect.h, FIELD_FILL);
        let border = if self.focused {
            FOCUSED_BORDER
        } else {
            RESTING_BORDER
        };
        canvas.outline_rect(
            self.rect.x,
            self.rect.y,
            self.rect.w,
            self.rect.h,
            BORDER_PX,
            border,
        );

        let clip = ClipRect {
            left: self.rect.x + PADDING_PX,
            top: self.rect.y,
            right: self.rect.x + self.rect.w as i32 - PADDING_PX,
            bottom: self.rect.y + self.rect.h as i32,
        };
        if clip.is_empty() {
            return;
        }

        let advance = font::advance_px(self.text_scale);
        let text_left = self.rect.x + PADDING_PX - self.scroll as i32 * advance;
        let text_top = self.rect.center_y() - font::glyph_height_px(self.text_scale) / 2;
        canvas.draw_text_clipped(text_left, text_top, &self.text, self.text_scale, TEXT_COLOR, clip);

        if self.focused && self.cursor_visible() {
            let caret_x = text_left + self.caret as i32 * advance;
            if caret_x >= clip.left - 1 && caret_x < clip.right {
                canvas.fill_rect(
                    caret_x,
                    text_top,
                    2,
                    font::glyph_height_px(self.text_scale).max(0) as u32,
                    TEXT_COLOR,
                );
            }
        }
    }

    fn cursor_visible(&self) -> bool {
        self.blink_seconds.rem_euclid(2.0 * BLINK_HALF_PERIOD_SECONDS) < BLINK_HALF_PERIOD_SECONDS
    }

    fn boundary_for_click(&self, click_x: f32) -> usize {
        let text_left = (self.rect.x + PADDING_PX) as f32;
        let scrolled_offset =
            click_x - text_left + self.scroll as f32 * font::advance_px(self.text_scale) as f32;
        font::nearest_char_boundary(self.text.len(), self.text_scale, scrolled_offset)
    }

    fn visible_chars(&self) -> usize {
        let interior = self.rect.w as i32 - 2 * PADDING_PX;
        if interior <= 0 {
            return 0;
        }
        (interior / font::advance_px(self.text_scale)) as usize
    }

    fn insert_char(&mut self, ch: char) {
        if !(ch.is_ascii_graphic() || ch == ' ') {
            return;
        }
        self.text.insert(self.caret, ch);
        self.caret += 1;
    }

    fn backspace(&mut self) {
        if self.caret == 0 {
            return;
        }
        self.caret -= 1;
        self.text.remove(self.caret);
    }

    fn delete_forward(&mut self) {
        if self.caret < self.text.len() {
            self.text.remove(self.caret);
        }
    }
}

/// First visible character index that keeps the caret inside a window of
/// `visible` characters, moving the window as little as possible.
fn effective_scroll(caret: usize, scroll: usize, visible: usize) -> usize {
    if visible == 0 {
        return caret;
    }
    if caret < scroll {
        caret
    } else if caret >= scroll + visible {
        caret - visible + 1
    } else {
        scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::render::OffscreenCanvas;

    fn focused_field(text: &str) -> TextField {
        let mut field = TextField::new(Rect::new(0, 0, 300, 40), 3);
        field.set_text(text);
        field.set_focused(true);
        field
    }

    fn typed(ch: char) -> InputSnapshot {
        InputSnapshot::empty().with_typed_chars(vec![ch])
    }

    fn click_at(x: f32, y: f32) -> InputSnapshot {
        InputSnapshot::empty()
            .with_cursor_px(Some((x, y)))
            .with_left_click_pressed(true)
    }

    #[test]
    fn insert_then_backspace_restores_text_and_caret() {
        let mut field = focused_field("44.01,-123.94");
        let before_text = field.text().to_string();
        let before_caret = field.caret();

        field.handle_input(&typed('9'));
        assert_eq!(field.text(), "44.01,-123.949");
        field.handle_input(&InputSnapshot::empty().with_backspace_pressed(true));

        assert_eq!(field.text(), before_text);
        assert_eq!(field.caret(), before_caret);
    }

    #[test]
    fn insert_then_delete_after_stepping_left_restores_text_and_caret() {
        let mut field = focused_field("abc");
        field.handle_input(&InputSnapshot::empty().with_home_pressed(true));

        field.handle_input(&typed('x'));
        assert_eq!(field.text(), "xabc");
        assert_eq!(field.caret(), 1);

        field.handle_input(&InputSnapshot::empty().with_arrow_left_pressed(true));
        field.handle_input(&InputSnapshot::empty().with_delete_pressed(true));

        assert_eq!(field.text(), "abc");
        assert_eq!(field.caret(), 0);
    }

    #[test]
    fn home_and_end_jump_to_the_buffer_ends() {
        let mut field = focused_field("44.0175976,-123.9408846");
        let len = field.text().len();

        field.handle_input(&InputSnapshot::empty().with_home_pressed(true));
        assert_eq!(field.caret(), 0);

        field.handle_input(&InputSnapshot::empty().with_end_pressed(true));
        assert_eq!(field.caret(), len);
    }

    #[test]
    fn deletes_past_either_end_change_nothing() {
        let mut field = focused_field("xy");

        field.handle_input(&InputSnapshot::empty().with_home_pressed(true));
        field.handle_input(&InputSnapshot::empty().with_backspace_pressed(true));
        assert_eq!(field.text(), "xy");
        assert_eq!(field.caret(), 0);

        field.handle_input(&InputSnapshot::empty().with_end_pressed(true));
        field.handle_input(&InputSnapshot::empty().with_delete_pressed(true));
        assert_eq!(field.text(), "xy");
        assert_eq!(field.caret(), 2);
    }

    #[test]
    fn click_inside_focuses_and_lands_on_the_nearest_boundary() {
        let mut field = TextField::new(Rect::new(0, 0, 300, 40), 3);
        field.set_text("abcdef");
        assert!(!field.is_focused());

        let advance = font::advance_px(3) as f32;
        let text_left = PADDING_PX as f32;

        field.handle_input(&click_at(text_left + 2.3 * advance, 20.0));
        assert!(field.is_focused());
        assert_eq!(field.caret(), 2);

        field.handle_input(&click_at(text_left + 2.7 * advance, 20.0));
        assert_eq!(field.caret(), 3);

        field.handle_input(&click_at(text_left + 50.0 * advance, 20.0));
        assert_eq!(field.caret(), 6);

        field.handle_input(&click_at(1.0, 20.0));
        assert_eq!(field.caret(), 0);
    }

    #[test]
    fn click_outside_removes_focus_and_later_keys_are_ignored() {
        let mut field = focused_field("abc");

        field.handle_input(&click_at(500.0, 500.0));
        assert!(!field.is_focused());

        field.handle_input(&typed('z'));
        let submitted = field.handle_input(&InputSnapshot::empty().with_enter_pressed(true));
        assert_eq!(field.text(), "abc");
        assert_eq!(submitted, None);
    }

    #[test]
    fn enter_surfaces_a_submit_event_without_touching_the_buffer() {
        let mut field = focused_field("44,-123");
        let event = field.handle_input(&InputSnapshot::empty().with_enter_pressed(true));
        assert_eq!(event, Some(TextFieldEvent::Submitted));
        assert_eq!(field.text(), "44,-123");
    }

    #[test]
    fn pasted_text_is_inserted_at_the_caret_with_control_chars_dropped() {
        let mut field = focused_field("ad");
        field.handle_input(&InputSnapshot::empty().with_home_pressed(true));
        field.handle_input(&InputSnapshot::empty().with_arrow_right_pressed(true));

        field.handle_input(&InputSnapshot::empty().with_pasted_text("b\nc\t".to_string()));
        assert_eq!(field.text(), "abcd");
        assert_eq!(field.caret(), 3);
    }

    #[test]
    fn blink_half_periods_are_equal() {
        let mut field = focused_field("");
        assert!(field.cursor_visible());

        field.tick(0.49);
        assert!(field.cursor_visible());
        field.tick(0.02);
        assert!(!field.cursor_visible());
        field.tick(0.48);
        assert!(!field.cursor_visible());
        field.tick(0.02);
        assert!(field.cursor_visible());
    }

    #[test]
    fn scroll_follows_the_caret_in_both_directions() {
        // Interior fits 4 characters: width 60 = 2 * 6 padding + 4 * 12.
        let mut field = TextField::new(Rect::new(0, 0, 60, 30), 3);
        field.set_focused(true);
        for ch in "123456".chars() {
            field.handle_input(&typed(ch));
        }
        assert_eq!(field.scroll, 3);

        field.handle_input(&InputSnapshot::empty().with_home_pressed(true));
        assert_eq!(field.scroll, 0);

        field.handle_input(&InputSnapshot::empty().with_end_pressed(true));
        assert_eq!(field.scroll, 3);
    }

    #[test]
    fn draw_never_panics_when_the_rect_is_narrower_than_one_glyph() {
        let mut target = OffscreenCanvas::new(32, 32);

        let mut narrow = focused_field("44.0175976,-123.9408846");
        narrow.rect = Rect::new(2, 2, 8, 10);
        narrow.draw(&mut target.canvas());

        let mut sliver = focused_field("abc");
        sliver.rect = Rect::new(-5, -5, 3, 3);
        sliver.draw(&mut target.canvas());

        let mut offscreen = focused_field("abc");
        offscreen.rect = Rect::new(500, 500, 100, 30);
        offscreen.draw(&mut target.canvas());
    }
}
