mod frame;
pub mod font;
mod sprites;

use std::path::Path;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use winit::window::Window;

use crate::app::host::AppHost;

pub use frame::ClipRect;

use sprites::SpriteCache;

/// Draw surface for one frame. Wraps the raw RGBA buffer together with the
/// sprite cache so hosts can paint without touching either directly.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    sprites: &'a mut SpriteCache,
}

impl Canvas<'_> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        frame::fill_frame(self.frame, color);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, rect_w: u32, rect_h: u32, color: [u8; 4]) {
        frame::draw_filled_rect(self.frame, self.width, self.height, x, y, rect_w, rect_h, color);
    }

    /// Alpha-blends a translucent rect over what is already drawn.
    pub fn blend_rect(&mut self, x: i32, y: i32, rect_w: u32, rect_h: u32, color: [u8; 4]) {
        frame::blend_filled_rect(self.frame, self.width, self.height, x, y, rect_w, rect_h, color);
    }

    pub fn outline_rect(
        &mut self,
        x: i32,
        y: i32,
        rect_w: u32,
        rect_h: u32,
        thickness: u32,
        color: [u8; 4],
    ) {
        frame::draw_rect_outline(
            self.frame,
            self.width,
            self.height,
            x,
            y,
            rect_w,
            rect_h,
            thickness,
            color,
        );
    }

    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: i32, color: [u8; 4]) {
        font::draw_text(self.frame, self.width, self.height, x, y, text, scale, color);
    }

    /// Draws text so its run is horizontally centered on `center_x`.
    pub fn draw_text_centered(
        &mut self,
        center_x: i32,
        y: i32,
        text: &str,
        scale: i32,
        color: [u8; 4],
    ) {
        let x = center_x - font::text_width_px(text, scale) / 2;
        self.draw_text(x, y, text, scale, color);
    }

    pub fn draw_text_clipped(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        scale: i32,
        color: [u8; 4],
        clip: ClipRect,
    ) {
        font::draw_text_clipped(
            self.frame,
            self.width,
            self.height,
            x,
            y,
            text,
            scale,
            color,
            clip,
        );
    }

    /// Draws the image at `path` scaled to fill the destination rect. Images
    /// are decoded on first use and cached; a path that fails to decode warns
    /// once and then draws nothing.
    pub fn blit_scaled(&mut self, path: &Path, x: i32, y: i32, rect_w: u32, rect_h: u32) {
        let Some(sprite) = self.sprites.resolve(path) else {
            return;
        };
        sprites::draw_sprite_scaled_to_rect(
            self.frame,
            self.width,
            self.height,
            sprite,
            x,
            y,
            rect_w as i32,
            rect_h as i32,
        );
    }
}

/// Window-free draw target backed by an owned buffer. Hosts render into it
/// exactly as they would into the windowed frame, which keeps draw code
/// testable without a surface.
pub struct OffscreenCanvas {
    frame: Vec<u8>,
    width: u32,
    height: u32,
    sprites: SpriteCache,
}

impl OffscreenCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: vec![0; width as usize * height as usize * 4],
            width,
            height,
            sprites: SpriteCache::new(),
        }
    }

    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas {
            frame: self.frame.as_mut_slice(),
            width: self.width,
            height: self.height,
            sprites: &mut self.sprites,
        }
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }
}

/// Presents a fixed-size logical pixel buffer into the window. The buffer
/// never changes size; window resizes and scale-factor changes only adjust
/// the surface it is stretched onto, so draw code can assume one coordinate
/// space.
pub struct Renderer {
    pixels: Pixels<'static>,
    buffer_width: u32,
    buffer_height: u32,
    sprites: SpriteCache,
}

impl Renderer {
    pub fn new(window: Arc<Window>, buffer_width: u32, buffer_height: u32) -> Result<Self, Error> {
        let surface_size = window.inner_size();
        let surface = SurfaceTexture::new(
            surface_size.width.max(1),
            surface_size.height.max(1),
            window,
        );
        let pixels = Pixels::new(buffer_width, buffer_height, surface)?;
        Ok(Self {
            pixels,
            buffer_width,
            buffer_height,
            sprites: SpriteCache::new(),
        })
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub fn render_frame(&mut self, host: &mut dyn AppHost) -> Result<(), Error> {
        let mut canvas = Canvas {
            frame: self.pixels.frame_mut(),
            width: self.buffer_width,
            height: self.buffer_height,
            sprites: &mut self.sprites,
        };
        host.render(&mut canvas);
        self.pixels.render()
    }
}
