use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Immutable per-tick view of the input state. Edge flags (clicks, edit
/// keys) are true for exactly one snapshot; a second snapshot taken in the
/// same frame sees them cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    cursor_px: Option<(f32, f32)>,
    left_click_pressed: bool,
    left_click_released: bool,
    typed_chars: Vec<char>,
    pasted_text: Option<String>,
    backspace_pressed: bool,
    delete_pressed: bool,
    arrow_left_pressed: bool,
    arrow_right_pressed: bool,
    home_pressed: bool,
    end_pressed: bool,
    enter_pressed: bool,
    escape_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_cursor_px(mut self, cursor_px: Option<(f32, f32)>) -> Self {
        self.cursor_px = cursor_px;
        self
    }

    pub fn with_left_click_pressed(mut self, pressed: bool) -> Self {
        self.left_click_pressed = pressed;
        self
    }

    pub fn with_left_click_released(mut self, released: bool) -> Self {
        self.left_click_released = released;
        self
    }

    pub fn with_typed_chars(mut self, typed_chars: Vec<char>) -> Self {
        self.typed_chars = typed_chars;
        self
    }

    pub fn with_pasted_text(mut self, pasted_text: String) -> Self {
        self.pasted_text = Some(pasted_text);
        self
    }

    pub fn with_backspace_pressed(mut self, pressed: bool) -> Self {
        self.backspace_pressed = pressed;
        self
    }

    pub fn with_delete_pressed(mut self, pressed: bool) -> Self {
        self.delete_pressed = pressed;
        self
    }

    pub fn with_arrow_left_pressed(mut self, pressed: bool) -> Self {
        self.arrow_left_pressed = pressed;
        self
    }

    pub fn with_arrow_right_pressed(mut self, pressed: bool) -> Self {
        self.arrow_right_pressed = pressed;
        self
    }

    pub fn with_home_pressed(mut self, pressed: bool) -> Self {
        self.home_pressed = pressed;
        self
    }

    pub fn with_end_pressed(mut self, pressed: bool) -> Self {
        self.end_pressed = pressed;
        self
    }

    pub fn with_enter_pressed(mut self, pressed: bool) -> Self {
        self.enter_pressed = pressed;
        self
    }

    pub fn with_escape_pressed(mut self, pressed: bool) -> Self {
        self.escape_pressed = pressed;
        self
    }

    pub fn cursor_px(&self) -> Option<(f32, f32)> {
        self.cursor_px
    }

    pub fn left_click_pressed(&self) -> bool {
        self.left_click_pressed
    }

    pub fn left_click_released(&self) -> bool {
        self.left_click_released
    }

    pub fn typed_chars(&self) -> &[char] {
        &self.typed_chars
    }

    pub fn pasted_text(&self) -> Option<&str> {
        self.pasted_text.as_deref()
    }

    pub fn backspace_pressed(&self) -> bool {
        self.backspace_pressed
    }

    pub fn delete_pressed(&self) -> bool {
        self.delete_pressed
    }

    pub fn arrow_left_pressed(&self) -> bool {
        self.arrow_left_pressed
    }

    pub fn arrow_right_pressed(&self) -> bool {
        self.arrow_right_pressed
    }

    pub fn home_pressed(&self) -> bool {
        self.home_pressed
    }

    pub fn end_pressed(&self) -> bool {
        self.end_pressed
    }

    pub fn enter_pressed(&self) -> bool {
        self.enter_pressed
    }

    pub fn escape_pressed(&self) -> bool {
        self.escape_pressed
    }
}

/// Accumulates window events between ticks and hands out one snapshot per
/// tick. Key repeat events are recorded like fresh presses so held edit keys
/// keep acting, which is what text entry wants; mouse clicks are true edges.
#[derive(Debug, Default)]
pub struct InputCollector {
    cursor_px: Option<(f32, f32)>,
    ctrl_down: bool,
    super_down: bool,
    left_pressed_edge: bool,
    left_released_edge: bool,
    typed_chars: Vec<char>,
    paste_requested: bool,
    backspace_edge: bool,
    delete_edge: bool,
    arrow_left_edge: bool,
    arrow_right_edge: bool,
    home_edge: bool,
    end_edge: bool,
    enter_edge: bool,
    escape_edge: bool,
}

impl InputCollector {
    pub fn record_cursor_moved(&mut self, x: f32, y: f32) {
        self.cursor_px = Some((x, y));
    }

    pub fn record_cursor_left(&mut self) {
        self.cursor_px = None;
    }

    pub fn record_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => self.left_pressed_edge = true,
            ElementState::Released => self.left_released_edge = true,
        }
    }

    pub fn set_modifiers(&mut self, ctrl_down: bool, super_down: bool) {
        self.ctrl_down = ctrl_down;
        self.super_down = super_down;
    }

    pub fn record_key_event(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        if let PhysicalKey::Code(code) = event.physical_key {
            if self.record_edit_key(code) {
                return;
            }
        }
        if self.paste_chord_down() {
            return;
        }
        if let Some(text) = event.text.as_ref() {
            for ch in text.chars() {
                self.record_typed_char(ch);
            }
        }
    }

    /// Returns true when the key was consumed as an editing or chord key and
    /// must not also be fed through as typed text.
    pub fn record_edit_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Backspace => self.backspace_edge = true,
            KeyCode::Delete => self.delete_edge = true,
            KeyCode::ArrowLeft => self.arrow_left_edge = true,
            KeyCode::ArrowRight => self.arrow_right_edge = true,
            KeyCode::Home => self.home_edge = true,
            KeyCode::End => self.end_edge = true,
            KeyCode::Enter | KeyCode::NumpadEnter => self.enter_edge = true,
            KeyCode::Escape => self.escape_edge = true,
            KeyCode::KeyV if self.paste_chord_down() => self.paste_requested = true,
            _ => return false,
        }
        true
    }

    pub fn record_typed_char(&mut self, ch: char) {
        if ch.is_ascii_graphic() || ch == ' ' {
            self.typed_chars.push(ch);
        }
    }

    /// True once per paste chord press; the loop reads the clipboard only
    /// when this fires.
    pub fn take_paste_request(&mut self) -> bool {
        std::mem::take(&mut self.paste_requested)
    }

    pub fn snapshot_for_tick(&mut self, pasted_text: Option<String>) -> InputSnapshot {
        let mut snapshot = InputSnapshot::empty()
            .with_cursor_px(self.cursor_px)
            .with_left_click_pressed(self.left_pressed_edge)
            .with_left_click_released(self.left_released_edge)
            .with_typed_chars(std::mem::take(&mut self.typed_chars))
            .with_backspace_pressed(self.backspace_edge)
            .with_delete_pressed(self.delete_edge)
            .with_arrow_left_pressed(self.arrow_left_edge)
            .with_arrow_right_pressed(self.arrow_right_edge)
            .with_home_pressed(self.home_edge)
            .with_end_pressed(self.end_edge)
            .with_enter_pressed(self.enter_edge)
            .with_escape_pressed(self.escape_edge);
        if let Some(text) = pasted_text {
            snapshot = snapshot.with_pasted_text(text);
        }
        self.clear_tick_edges();
        snapshot
    }

    fn paste_chord_down(&self) -> bool {
        self.ctrl_down || self.super_down
    }

    fn clear_tick_edges(&mut self) {
        self.left_pressed_edge = false;
        self.left_released_edge = false;
        self.backspace_edge = false;
        self.delete_edge = false;
        self.arrow_left_edge = false;
        self.arrow_right_edge = false;
        self.home_edge = false;
        self.end_edge = false;
        self.enter_edge = false;
        self.escape_edge = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_edges_are_consumed_by_the_first_snapshot() {
        let mut collector = InputCollector::default();
        collector.record_mouse_button(MouseButton::Left, ElementState::Pressed);
        collector.record_mouse_button(MouseButton::Left, ElementState::Released);

        let first = collector.snapshot_for_tick(None);
        assert!(first.left_click_pressed());
        assert!(first.left_click_released());

        let second = collector.snapshot_for_tick(None);
        assert!(!second.left_click_pressed());
        assert!(!second.left_click_released());
    }

    #[test]
    fn non_left_buttons_are_ignored() {
        let mut collector = InputCollector::default();
        collector.record_mouse_button(MouseButton::Right, ElementState::Pressed);
        let snapshot = collector.snapshot_for_tick(None);
        assert!(!snapshot.left_click_pressed());
    }

    #[test]
    fn typed_chars_drain_into_one_snapshot() {
        let mut collector = InputCollector::default();
        collector.record_typed_char('4');
        collector.record_typed_char('.');
        collector.record_typed_char('\u{8}');
        collector.record_typed_char(' ');

        let first = collector.snapshot_for_tick(None);
        assert_eq!(first.typed_chars(), &['4', '.', ' ']);

        let second = collector.snapshot_for_tick(None);
        assert!(second.typed_chars().is_empty());
    }

    #[test]
    fn edit_keys_set_their_edges_and_are_consumed() {
        let mut collector = InputCollector::default();
        assert!(collector.record_edit_key(KeyCode::Backspace));
        assert!(collector.record_edit_key(KeyCode::Home));
        assert!(collector.record_edit_key(KeyCode::NumpadEnter));
        assert!(!collector.record_edit_key(KeyCode::KeyA));

        let snapshot = collector.snapshot_for_tick(None);
        assert!(snapshot.backspace_pressed());
        assert!(snapshot.home_pressed());
        assert!(snapshot.enter_pressed());
        assert!(!snapshot.delete_pressed());
    }

    #[test]
    fn paste_chord_requires_a_modifier_and_fires_once() {
        let mut collector = InputCollector::default();
        assert!(!collector.record_edit_key(KeyCode::KeyV));
        assert!(!collector.take_paste_request());

        collector.set_modifiers(true, false);
        assert!(collector.record_edit_key(KeyCode::KeyV));
        assert!(collector.take_paste_request());
        assert!(!collector.take_paste_request());
    }

    #[test]
    fn pasted_text_rides_the_snapshot_it_was_read_for() {
        let mut collector = InputCollector::default();
        let snapshot = collector.snapshot_for_tick(Some("44.01,-123.94".to_string()));
        assert_eq!(snapshot.pasted_text(), Some("44.01,-123.94"));

        let next = collector.snapshot_for_tick(None);
        assert_eq!(next.pasted_text(), None);
    }

    #[test]
    fn cursor_position_persists_across_snapshots_until_it_leaves() {
        let mut collector = InputCollector::default();
        collector.record_cursor_moved(120.0, 80.0);
        assert_eq!(collector.snapshot_for_tick(None).cursor_px(), Some((120.0, 80.0)));
        assert_eq!(collector.snapshot_for_tick(None).cursor_px(), Some((120.0, 80.0)));

        collector.record_cursor_left();
        assert_eq!(collector.snapshot_for_tick(None).cursor_px(), None);
    }
}
