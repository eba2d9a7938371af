//! Engine-owned window for hosts without their own event loop
//!
//! Events are pumped without blocking, so a C host keeps control of its
//! frame loop. Uses winit's pump-events extension (desktop platforms).

use crate::config::WindowConfig;
use nasr_core::{Color, NasrError, Result};
use nasr_input::InputMap;
use nasr_render::{Canvas, RectBatch, RenderContext};
use std::sync::Arc;
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

/// Pumps allowed for the platform to deliver `resumed` after opening
const OPEN_ATTEMPTS: usize = 10;
const OPEN_PUMP_TIMEOUT: Duration = Duration::from_millis(5);

// Field order is drop order: the canvas and wgpu surface go before the window.
#[derive(Default)]
struct Surface {
    canvas: Option<Canvas>,
    context: Option<RenderContext>,
    window: Option<Arc<Window>>,
    close_requested: bool,
    error: Option<NasrError>,
}

impl Surface {
    fn create(&mut self, event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<()> {
        let window = event_loop
            .create_window(config.attributes())
            .map_err(|e| NasrError::RenderError(format!("Failed to create window: {e}")))?;
        let window = Arc::new(window);
        let context = RenderContext::new_blocking(window.clone())?;

        log::info!(
            "Window '{}' opened at {}x{}",
            config.title,
            context.config.width,
            context.config.height
        );
        self.canvas = Some(Canvas::new(&context));
        self.context = Some(context);
        self.window = Some(window);
        Ok(())
    }
}

/// Handler for one pump: borrows the surface and the input map it feeds
struct Pump<'a> {
    surface: &'a mut Surface,
    input: &'a mut InputMap,
    config: &'a WindowConfig,
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.window.is_some() || self.surface.error.is_some() {
            return;
        }
        if let Err(e) = self.surface.create(event_loop, self.config) {
            log::error!("{e}");
            self.surface.error = Some(e);
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if nasr_input::handle_window_event(self.input, &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.surface.close_requested = true;
            }
            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.surface.context {
                    context.resize(new_size);
                }
            }
            _ => {}
        }
    }
}

// Field order is drop order: the window goes before its event loop.
pub(crate) struct WindowHost {
    surface: Surface,
    event_loop: EventLoop<()>,
}

impl WindowHost {
    /// Create the event loop and pump until the window and its render
    /// surface exist
    pub(crate) fn open(input: &mut InputMap, config: &WindowConfig) -> Result<Self> {
        let event_loop = EventLoop::new()
            .map_err(|e| NasrError::RenderError(format!("Failed to create event loop: {e}")))?;
        let mut host = Self {
            surface: Surface::default(),
            event_loop,
        };

        for _ in 0..OPEN_ATTEMPTS {
            host.pump_with_timeout(input, config, OPEN_PUMP_TIMEOUT);
            if let Some(e) = host.surface.error.take() {
                return Err(e);
            }
            if host.surface.window.is_some() {
                return Ok(host);
            }
        }
        Err(NasrError::RenderError(
            "platform never resumed the event loop".into(),
        ))
    }

    /// Deliver pending events. Returns false once the window was closed.
    pub(crate) fn pump(&mut self, input: &mut InputMap, config: &WindowConfig) -> bool {
        self.pump_with_timeout(input, config, Duration::ZERO)
    }

    fn pump_with_timeout(
        &mut self,
        input: &mut InputMap,
        config: &WindowConfig,
        timeout: Duration,
    ) -> bool {
        let mut app = Pump {
            surface: &mut self.surface,
            input,
            config,
        };
        let status = self.event_loop.pump_app_events(Some(timeout), &mut app);
        !self.surface.close_requested && matches!(status, PumpStatus::Continue)
    }

    /// Draw `batch` to the window and clear it
    pub(crate) fn present(&mut self, batch: &mut RectBatch, clear: Color) -> Result<()> {
        match (&self.surface.context, &mut self.surface.canvas) {
            (Some(context), Some(canvas)) => Ok(canvas.present_batch(context, batch, clear)?),
            _ => {
                batch.clear();
                Err(NasrError::RenderError("window has no render surface".into()))
            }
        }
    }
}
