/// Pixel-space clip rectangle, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ClipRect {
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        }
    }

    pub fn intersect(self, other: ClipRect) -> ClipRect {
        ClipRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }
}

pub fn fill_frame(frame: &mut [u8], color: [u8; 4]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

pub fn write_pixel_rgba(frame: &mut [u8], width: u32, x: i32, y: i32, color: [u8; 4]) {
    let Some(byte_offset) = pixel_byte_offset(frame.len(), width, x, y) else {
        return;
    };
    frame[byte_offset..byte_offset + 4].copy_from_slice(&color);
}

/// Source-over blend of an RGBA color whose alpha channel is honored.
pub fn blend_pixel_rgba(frame: &mut [u8], width: u32, x: i32, y: i32, color: [u8; 4]) {
    let Some(byte_offset) = pixel_byte_offset(frame.len(), width, x, y) else {
        return;
    };
    let alpha = color[3] as u16;
    let inv = 255 - alpha;
    for channel in 0..3 {
        let src = color[channel] as u16;
        let dst = frame[byte_offset + channel] as u16;
        frame[byte_offset + channel] = ((src * alpha + dst * inv) / 255) as u8;
    }
    frame[byte_offset + 3] = 255;
}

fn pixel_byte_offset(frame_len: usize, width: u32, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x >= width as i32 {
        return None;
    }
    let pixel_offset = (y as usize).checked_mul(width as usize)?.checked_add(x as usize)?;
    let byte_offset = pixel_offset.checked_mul(4)?;
    let end = byte_offset.checked_add(4)?;
    if end > frame_len {
        return None;
    }
    Some(byte_offset)
}

pub fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_w: u32,
    rect_h: u32,
    color: [u8; 4],
) {
    let left = x.max(0);
    let top = y.max(0);
    let right = x.saturating_add(rect_w as i32).min(width as i32);
    let bottom = y.saturating_add(rect_h as i32).min(height as i32);
    for py in top..bottom {
        for px in left..right {
            write_pixel_rgba(frame, width, px, py, color);
        }
    }
}

pub fn blend_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_w: u32,
    rect_h: u32,
    color: [u8; 4],
) {
    let left = x.max(0);
    let top = y.max(0);
    let right = x.saturating_add(rect_w as i32).min(width as i32);
    let bottom = y.saturating_add(rect_h as i32).min(height as i32);
    for py in top..bottom {
        for px in left..right {
            blend_pixel_rgba(frame, width, px, py, color);
        }
    }
}

/// Outline as four filled strips so corners never double-blend.
pub fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_w: u32,
    rect_h: u32,
    thickness: u32,
    color: [u8; 4],
) {
    if rect_w == 0 || rect_h == 0 || thickness == 0 {
        return;
    }
    let t = thickness.min(rect_w).min(rect_h);
    draw_filled_rect(frame, width, height, x, y, rect_w, t, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x,
        y + rect_h as i32 - t as i32,
        rect_w,
        t,
        color,
    );
    let side_h = rect_h.saturating_sub(2 * t);
    draw_filled_rect(frame, width, height, x, y + t as i32, t, side_h, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x + rect_w as i32 - t as i32,
        y + t as i32,
        t,
        side_h,
        color,
    );
}
