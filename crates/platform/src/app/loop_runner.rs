use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use arboard::Clipboard;
use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use super::host::{AppHost, TickFlow};
use super::input::InputCollector;
use super::render::Renderer;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "osinter".to_string(),
            window_width: 800,
            window_height: 600,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            max_render_fps: Some(60),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs the windowed fixed-timestep loop around `host` until the host asks
/// to exit or the window closes. The window is not resizable and the pixel
/// buffer matches the configured logical size, so cursor positions reported
/// in logical coordinates line up with buffer coordinates one to one.
pub fn run_app(config: LoopConfig, host: &mut dyn AppHost) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let loop_window = Arc::clone(&window);
    let mut renderer = Renderer::new(window, config.window_width, config.window_height)
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let tick_len = Duration::from_secs_f64(1.0 / config.target_tps.max(1) as f64);
    let tick_len_seconds = tick_len.as_secs_f32();
    let max_frame_delta = if config.max_frame_delta.is_zero() {
        Duration::from_millis(250)
    } else {
        config.max_frame_delta
    };
    let tick_cap = config.max_ticks_per_frame.max(1);
    let frame_budget = config
        .max_render_fps
        .filter(|fps| *fps > 0)
        .map(|fps| Duration::from_secs_f64(1.0 / fps as f64));

    let mut input_collector = InputCollector::default();
    // Paste silently no-ops for the whole session when no clipboard exists.
    let mut clipboard = Clipboard::new().ok();

    let cap_text = match config.max_render_fps.filter(|fps| *fps > 0) {
        Some(fps) => fps.to_string(),
        None => "off".to_string(),
    };
    info!(
        target_tps = config.target_tps.max(1),
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        tick_cap,
        render_fps_cap = %cap_text,
        clipboard_available = clipboard.is_some(),
        "loop_config"
    );

    let mut banked = Duration::ZERO;
    let mut prev_poll = Instant::now();
    let mut last_present = Instant::now();
    let mut shutdown_ran = false;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == loop_window.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        if !shutdown_ran {
                            host.shutdown();
                            shutdown_ran = true;
                        }
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize_surface(new_size.width, new_size.height)
                        {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let inner = loop_window.inner_size();
                        if let Err(error) = renderer.resize_surface(inner.width, inner.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ModifiersChanged(modifiers) => {
                        let mods = modifiers.state();
                        input_collector.set_modifiers(mods.control_key(), mods.super_key());
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        let pos = position.to_logical::<f32>(loop_window.scale_factor());
                        input_collector.record_cursor_moved(pos.x, pos.y);
                    }
                    WindowEvent::CursorLeft { .. } => {
                        input_collector.record_cursor_left();
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        input_collector.record_mouse_button(button, state);
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.record_key_event(&event);
                    }
                    WindowEvent::RedrawRequested => {
                        let polled_at = Instant::now();
                        let polled = polled_at.saturating_duration_since(prev_poll);
                        prev_poll = polled_at;
                        banked = banked.saturating_add(polled.min(max_frame_delta));

                        let batch = drain_ticks(banked, tick_len, tick_cap);
                        banked = batch.carry;

                        let mut flow = TickFlow::Continue;
                        for _ in 0..batch.ticks {
                            let pasted_text = if input_collector.take_paste_request() {
                                clipboard.as_mut().and_then(|handle| handle.get_text().ok())
                            } else {
                                None
                            };
                            let snapshot = input_collector.snapshot_for_tick(pasted_text);
                            flow = host.tick(tick_len_seconds, &snapshot);
                            match flow {
                                TickFlow::Continue => {}
                                TickFlow::EndFrame | TickFlow::Exit => break,
                            }
                        }

                        if batch.shed > Duration::ZERO {
                            warn!(
                                shed_ms = batch.shed.as_millis() as u64,
                                tick_cap, "tick_backlog_shed"
                            );
                        }

                        if flow == TickFlow::Exit {
                            if !shutdown_ran {
                                host.shutdown();
                                shutdown_ran = true;
                            }
                            info!(reason = "host_exit", "shutdown_requested");
                            window_target.exit();
                            return;
                        }

                        let since_present =
                            Instant::now().saturating_duration_since(last_present);
                        let pause = throttle_delay(since_present, frame_budget);
                        if pause > Duration::ZERO {
                            thread::sleep(pause);
                        }

                        if let Err(error) = renderer.render_frame(host) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        last_present = Instant::now();
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                loop_window.request_redraw();
            }
            Event::LoopExiting => {
                if !shutdown_ran {
                    host.shutdown();
                    shutdown_ran = true;
                }
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// How much of the banked simulation time one frame gets to run. Whatever
/// cannot run within the tick cap is shed outright instead of carried, so a
/// long stall never turns into a spiral of catch-up ticks.
#[derive(Debug, Clone, Copy)]
struct TickBatch {
    ticks: u32,
    carry: Duration,
    shed: Duration,
}

fn drain_ticks(banked: Duration, tick_len: Duration, tick_cap: u32) -> TickBatch {
    let tick_nanos = tick_len.as_nanos().max(1);
    let ready = banked.as_nanos() / tick_nanos;
    let ticks = ready.min(u128::from(tick_cap)) as u32;
    let leftover = banked.saturating_sub(tick_len.saturating_mul(ticks));
    if ready > u128::from(tick_cap) {
        TickBatch {
            ticks,
            carry: Duration::ZERO,
            shed: leftover,
        }
    } else {
        TickBatch {
            ticks,
            carry: leftover,
            shed: Duration::ZERO,
        }
    }
}

fn throttle_delay(since_present: Duration, frame_budget: Option<Duration>) -> Duration {
    match frame_budget {
        Some(budget) if since_present < budget => budget - since_present,
        _ => Duration::ZERO,
    }
}
