//! Hosts a content root in a winit window and logs its lifecycle.
//!
//! Run with: cargo run -p canopy --example hosted_window
//!
//! Set `RUST_LOG=canopy=debug,canopy_core=debug` to watch the transitions.
//! Place a `Package.toml` in the working directory to set the title and icon.

use std::sync::Arc;

use canopy::window::{
    ContentWindow, NativeWindowAdapter, PackageManifest, WindowConfig, WinitSurface,
};
use canopy::{Border, HostContext};
use canopy_core::{AppLifecycle, SystemNavigation};
use canopy_render::{Brush, Color, GradientStop, LinearGradientBrush, RecordingCanvas, Size};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

struct App {
    context: HostContext,
    config: WindowConfig,
    surface: Option<Arc<WinitSurface>>,
    adapter: Option<Arc<NativeWindowAdapter>>,
}

impl App {
    fn new() -> Self {
        let package = PackageManifest::load(".").unwrap_or_else(|error| {
            tracing::info!(%error, "no package manifest, using defaults");
            PackageManifest::new("", ".")
        });

        let lifecycle = AppLifecycle::new();
        lifecycle.entered_background().connect(|args| {
            tracing::info!(reason = ?args.reason, "application entered background");
        });
        lifecycle.leaving_background().connect(|_| {
            tracing::info!("application leaving background");
        });
        lifecycle.suspending().connect(|_| tracing::info!("application suspending"));

        Self {
            context: HostContext::new(lifecycle, SystemNavigation::new(), Arc::new(package)),
            config: WindowConfig::new("Canopy hosted window")
                .with_preferred_launch_size(Size::new(800.0, 600.0)),
            surface: None,
            adapter: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }

        let window = event_loop
            .create_window(self.config.to_window_attributes())
            .expect("Failed to create window");
        let surface = Arc::new(WinitSurface::new(Arc::new(window)));
        let content = Arc::new(ContentWindow::new());
        content
            .visibility_changed()
            .connect(|visible| tracing::info!(visible, "window visibility changed"));

        let adapter =
            NativeWindowAdapter::attach(&self.context, content.clone(), surface.clone(), &self.config)
                .expect("Failed to attach window");

        let background = LinearGradientBrush::horizontal(vec![
            GradientStop::new(0.0, Color::from_rgb(0.2, 0.4, 0.8)),
            GradientStop::new(1.0, Color::from_rgb(0.9, 0.5, 0.3)),
        ]);
        adapter
            .content_root()
            .set_public_root_visual(Some(
                Border::new(Size::new(800.0, 600.0))
                    .with_background(Brush::LinearGradient(background))
                    .into_ref(),
            ))
            .expect("Failed to set root visual");

        content.show();
        self.surface = Some(surface);
        self.adapter = Some(adapter);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let (Some(surface), Some(adapter)) = (&self.surface, &self.adapter) else {
            return;
        };

        let response = surface.handle_window_event(&event);
        match event {
            WindowEvent::CloseRequested if response.is_some_and(|r| !r.is_veto()) => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                let scale = surface.window().scale_factor() as f32;
                adapter.resize(Size::new(
                    size.width as f32 / scale,
                    size.height as f32 / scale,
                ));
                surface.window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let mut canvas = RecordingCanvas::new();
                match adapter.render(&mut canvas) {
                    Ok(()) => tracing::debug!(ops = canvas.ops().len(), "frame recorded"),
                    Err(error) => tracing::error!(%error, "failed to render background"),
                }
            }
            _ => {}
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App::new();

    event_loop.run_app(&mut app).expect("Event loop error");
}
