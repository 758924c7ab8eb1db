use std::sync::Arc;
use std::time::Duration;

use sequoia_overlay::{Compositor, FrameMetrics, OverlaySurface, Viewport};
use serde::Serialize;
use tracing::{debug, info};

/// Cursor travel per frame along the sweep line, in pixels.
const CURSOR_STEP_PX: f64 = 7.0;

/// Camera motion applied before each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraPath {
    /// Screen-space pan per frame.
    pub pan: (f64, f64),
    /// Wheel delta per frame, focused on the surface center.
    pub zoom: f64,
}

impl CameraPath {
    pub const STILL: Self = Self {
        pan: (0.0, 0.0),
        zoom: 0.0,
    };

    fn apply(&self, viewport: &mut Viewport, width: u32, height: u32) {
        if self.pan != (0.0, 0.0) {
            viewport.pan(self.pan.0, self.pan.1);
        }
        if self.zoom != 0.0 {
            viewport.zoom_at(self.zoom, f64::from(width) / 2.0, f64::from(height) / 2.0);
        }
    }
}

/// Totals for one run of the frame loop.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunSummary {
    pub frames: u32,
    pub rebuilds: u32,
    pub draw_calls: u64,
    pub last: FrameMetrics,
}

/// Render `frames` frames at a fixed interval. The camera moves along
/// `camera` and a simulated cursor sweeps across the middle of the surface
/// to drive hover.
pub async fn run(
    compositor: Arc<Compositor>,
    surface: &mut dyn OverlaySurface,
    mut viewport: Viewport,
    camera: CameraPath,
    frames: u32,
    interval: Duration,
) -> RunSummary {
    let mut ticker = tokio::time::interval(interval);
    let mut summary = RunSummary::default();
    let mut last_tick = tokio::time::Instant::now();

    for frame in 0..frames {
        ticker.tick().await;
        let now = tokio::time::Instant::now();
        compositor.advance_blink(now.duration_since(last_tick).as_secs_f64());
        last_tick = now;

        let (width, height) = surface.size();
        if frame > 0 {
            camera.apply(&mut viewport, width, height);
        }
        let cursor_x = (f64::from(frame) * CURSOR_STEP_PX) % f64::from(width.max(1));
        let cursor_y = f64::from(height) / 2.0;
        let hovered = compositor.territory_at_screen(&viewport, cursor_x, cursor_y);

        let metrics = compositor.render_frame(&mut *surface, viewport, hovered.as_deref());
        summary.frames += 1;
        summary.draw_calls += u64::from(metrics.draw_calls);
        if metrics.rebuilt {
            summary.rebuilds += 1;
            info!(
                frame,
                revision = metrics.revision,
                drawn = metrics.territories_drawn,
                culled = metrics.territories_culled,
                malformed = metrics.territories_malformed,
                out_of_range = metrics.territories_out_of_range,
                routes = metrics.routes_drawn,
                "overlay geometry rebuilt"
            );
        } else {
            debug!(frame, blink = metrics.blink_factor, "overlay frame reused geometry");
        }
        summary.last = metrics;
    }

    summary
}
