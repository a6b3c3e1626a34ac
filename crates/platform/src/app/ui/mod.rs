mod button;
mod text_field;

pub use button::Button;
pub use text_field::{TextField, TextFieldEvent};

/// Axis-aligned pixel rect, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center_x: i32, center_y: i32, w: u32, h: u32) -> Self {
        Self {
            x: center_x - w as i32 / 2,
            y: center_y - h as i32 / 2,
            w,
            h,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x as f32
            && px < (self.x + self.w as i32) as f32
            && py >= self.y as f32
            && py < (self.y + self.h as i32) as f32
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w as i32 / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h as i32 / 2
    }
}
