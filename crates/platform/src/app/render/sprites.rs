use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::ImageReader;
use tracing::warn;

pub(crate) struct LoadedSprite {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba: Vec<u8>,
}

/// Decoded images keyed by source path. A failed load is cached as `None`
/// so each bad path decodes (and warns) at most once.
pub(crate) struct SpriteCache {
    loaded: HashMap<PathBuf, Option<LoadedSprite>>,
    warned_paths: HashSet<PathBuf>,
}

impl SpriteCache {
    pub(crate) fn new() -> Self {
        Self {
            loaded: HashMap::new(),
            warned_paths: HashSet::new(),
        }
    }

    pub(crate) fn resolve(&mut self, path: &Path) -> Option<&LoadedSprite> {
        if !self.loaded.contains_key(path) {
            let sprite = match load_sprite_rgba(path) {
                Ok(sprite) => Some(sprite),
                Err(reason) => {
                    self.warn_load_once(path, reason.as_str());
                    None
                }
            };
            self.loaded.insert(path.to_path_buf(), sprite);
        }
        self.loaded.get(path).and_then(Option::as_ref)
    }

    fn warn_load_once(&mut self, path: &Path, reason: &str) {
        if !self.warned_paths.insert(path.to_path_buf()) {
            return;
        }
        warn!(
            path = %path.display(),
            reason = reason,
            "sprite_load_failed_skipping_draw"
        );
    }
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

/// Nearest-neighbour blit of the whole sprite into a destination rect,
/// anchored at the rect's top-left corner. Fully transparent source pixels
/// leave the frame untouched.
pub(crate) fn draw_sprite_scaled_to_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    sprite: &LoadedSprite,
    dst_x: i32,
    dst_y: i32,
    dst_w: i32,
    dst_h: i32,
) {
    if sprite.width == 0 || sprite.height == 0 || width == 0 || height == 0 {
        return;
    }
    if dst_w <= 0 || dst_h <= 0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }

    let inv_scale_x = sprite.width as f32 / dst_w as f32;
    let inv_scale_y = sprite.height as f32 / dst_h as f32;
    let right = dst_x.saturating_add(dst_w);
    let bottom = dst_y.saturating_add(dst_h);

    let draw_left = dst_x.max(0);
    let draw_top = dst_y.max(0);
    let draw_right = right.min(width as i32);
    let draw_bottom = bottom.min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let frame_width = width as usize;
    let sprite_width = sprite.width as usize;

    for out_y in draw_top..draw_bottom {
        let dy = out_y - dst_y;
        let src_y = ((dy as f32) * inv_scale_y).floor() as u32;
        let src_y = src_y.min(sprite.height - 1) as usize;
        let src_row_offset = src_y * sprite_width * 4;
        let dst_row_offset = out_y as usize * frame_width * 4;

        for out_x in draw_left..draw_right {
            let dx = out_x - dst_x;
            let src_x = ((dx as f32) * inv_scale_x).floor() as u32;
            let src_x = src_x.min(sprite.width - 1) as usize;
            let src_offset = src_row_offset + src_x * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let dst_offset = dst_row_offset + out_x as usize * 4;
            frame[dst_offset] = sprite.rgba[src_offset];
            frame[dst_offset + 1] = sprite.rgba[src_offset + 1];
            frame[dst_offset + 2] = sprite.rgba[src_offset + 2];
            frame[dst_offset + 3] = alpha;
        }
    }
}
