use crate::app::input::InputSnapshot;
use crate::app::render::Canvas;

/// What the frame loop should do after a simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    /// Stop ticking for this frame and present. Hosts return this when a
    /// tick changed what is on screen in a way that must be painted before
    /// any further input is routed, even if the frame had tick budget left.
    EndFrame,
    Exit,
}

/// The application driven by the frame loop: one `tick` per fixed simulation
/// step, one `render` per presented frame, and `shutdown` exactly once before
/// the process leaves the loop, whether by window close or by the app
/// requesting exit.
pub trait AppHost {
    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> TickFlow;
    fn render(&mut self, canvas: &mut Canvas<'_>);
    fn shutdown(&mut self);
}
