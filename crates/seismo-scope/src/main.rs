//! Live waveform viewer.
//!
//! Feeds a synthetic signal into a [`GraphScene`] at a fixed sample rate and
//! renders it with [`GraphRenderer`]. Escape closes the window.

use anyhow::Result;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use seismo_engine::core::{App, AppControl, FrameCtx};
use seismo_engine::coords::Rect;
use seismo_engine::device::GpuInit;
use seismo_engine::logging::{LoggingConfig, init_logging};
use seismo_engine::paint::Color;
use seismo_engine::render::GraphRenderer;
use seismo_engine::scene::GraphScene;
use seismo_engine::window::{Runtime, RuntimeConfig};

/// Seconds between appended samples.
const SAMPLE_STEP: f32 = 0.02;

/// Samples kept in the scrolling window.
const WINDOW_CAPACITY: usize = 320;

/// Border between the window edge and the graph rectangle, in logical px.
const MARGIN: f32 = 24.0;

struct ScopeApp {
    scene: GraphScene,
    renderer: GraphRenderer,
    rect: Rect,
    phase: f32,
    pending: f32,
}

impl ScopeApp {
    fn new() -> Self {
        Self {
            scene: GraphScene::new(),
            renderer: GraphRenderer::default(),
            rect: Rect::default(),
            phase: 0.0,
            pending: 0.0,
        }
    }

    /// Slow sine with a faster wobble riding on it, kept inside [0, 1].
    fn next_sample(&mut self) -> f64 {
        self.phase += 0.05;
        let base = self.phase.sin();
        let wobble = (self.phase * 3.7).sin() * 0.25;
        (0.5 + 0.32 * (base + wobble)) as f64
    }
}

impl App for ScopeApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state == ElementState::Pressed
                && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
            {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (w, h) = ctx.window.logical_size();
        let rect = Rect::new(
            MARGIN,
            MARGIN,
            (w - 2.0 * MARGIN).max(0.0),
            (h - 2.0 * MARGIN).max(0.0),
        );
        if rect != self.rect {
            self.rect = rect;
            self.scene.set_rect(rect);
        }

        // Feed the signal on a fixed cadence independent of frame rate.
        self.pending += ctx.time.dt;
        while self.pending >= SAMPLE_STEP {
            self.pending -= SAMPLE_STEP;
            let sample = self.next_sample();
            self.scene.append_sample(sample);
            while self.scene.samples().len() > WINDOW_CAPACITY {
                self.scene.remove_first_sample();
            }
        }

        if self.scene.needs_pass() {
            self.scene.update();
        }

        let (scene, renderer) = (&mut self.scene, &mut self.renderer);
        ctx.render(Color::from_straight(1.0, 1.0, 1.0, 1.0), |rctx, target| {
            renderer.render(rctx, target, scene);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("seismo-scope starting");

    Runtime::run(
        RuntimeConfig {
            title: "seismo scope".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
        },
        GpuInit::default(),
        ScopeApp::new(),
    )
}
