mod host;
mod input;
mod loop_runner;
pub mod render;
pub mod ui;

pub use host::{AppHost, TickFlow};
pub use input::{InputCollector, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use render::{Canvas, ClipRect, OffscreenCanvas, Renderer};
pub use ui::{Rect, TextField, TextFieldEvent};
