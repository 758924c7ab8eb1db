use crate::batch::{LineBatch, OverlayVertex, QuadBatch};
use crate::channel::{ShaderUniforms, shade};

/// Clear color under the overlay when no map image is drawn.
pub const MAP_BACKGROUND: [f32; 4] = [0.047, 0.055, 0.090, 1.0];

/// Geometry produced by one rebuild. `revision` increases every time the
/// arrays are rebuilt, so surfaces can skip re-uploading unchanged data.
#[derive(Debug, Clone, Default)]
pub struct FrameGeometry {
    pub territories: QuadBatch,
    pub routes: LineBatch,
    pub revision: u64,
}

/// A render target the compositor draws into once per frame.
pub trait OverlaySurface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Draw territories (one indexed draw) then routes (second pass).
    /// Returns the number of draw calls issued.
    fn draw(&mut self, frame: &FrameGeometry, uniforms: &ShaderUniforms) -> u32;
}

/// Software rasterizer into an RGBA float buffer. Applies the same decode
/// rule as the fragment shader, per pixel.
#[derive(Debug, Clone)]
pub struct CpuSurface {
    width: u32,
    height: u32,
    background: [f32; 4],
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, MAP_BACKGROUND)
    }

    pub fn with_background(width: u32, height: u32, background: [f32; 4]) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Fill every pixel whose center lies inside each quad of `batch`.
    fn raster_quads<F>(&mut self, batch: &QuadBatch, mut blend: F)
    where
        F: FnMut([f32; 4], [f32; 4]) -> [f32; 4],
    {
        for quad in batch.vertices.chunks_exact(4) {
            let color = quad[0].color;
            // Perimeter order: tl, tr, br, bl.
            let outline = [
                quad[0].position,
                quad[1].position,
                quad[3].position,
                quad[2].position,
            ];
            let Some((x0, y0, x1, y1)) = self.pixel_bounds(quad) else {
                continue;
            };
            for y in y0..y1 {
                for x in x0..x1 {
                    let center = [x as f32 + 0.5, y as f32 + 0.5];
                    if !covers(&outline, center) {
                        continue;
                    }
                    let idx = y as usize * self.width as usize + x as usize;
                    self.pixels[idx] = blend(color, self.pixels[idx]);
                }
            }
        }
    }

    /// Pixel range touched by a quad, clipped to the surface.
    fn pixel_bounds(&self, quad: &[OverlayVertex]) -> Option<(u32, u32, u32, u32)> {
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for v in quad {
            min_x = min_x.min(v.position[0]);
            min_y = min_y.min(v.position[1]);
            max_x = max_x.max(v.position[0]);
            max_y = max_y.max(v.position[1]);
        }
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return None;
        }
        let clip = |v: f32, hi: u32| v.floor().clamp(0.0, hi as f32) as u32;
        let x0 = clip(min_x, self.width);
        let y0 = clip(min_y, self.height);
        let x1 = clip(max_x.ceil(), self.width);
        let y1 = clip(max_y.ceil(), self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

impl OverlaySurface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw(&mut self, frame: &FrameGeometry, uniforms: &ShaderUniforms) -> u32 {
        self.clear();
        let mut calls = 0;
        if !frame.territories.is_empty() {
            self.raster_quads(&frame.territories, |overlay, bg| shade(overlay, bg, uniforms));
            calls += 1;
        }
        if !frame.routes.is_empty() {
            self.raster_quads(&frame.routes.tessellate(), blend_over);
            calls += 1;
        }
        calls
    }
}

/// Straight alpha blend that keeps the destination alpha.
fn blend_over(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let a = src[3];
    [
        dst[0] + (src[0] - dst[0]) * a,
        dst[1] + (src[1] - dst[1]) * a,
        dst[2] + (src[2] - dst[2]) * a,
        dst[3],
    ]
}

/// Point-in-convex-polygon, inclusive of edges, for either winding.
fn covers(outline: &[[f32; 2]; 4], p: [f32; 2]) -> bool {
    let mut sign = 0.0f32;
    for i in 0..4 {
        let a = outline[i];
        let b = outline[(i + 1) % 4];
        let cross = (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0]);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}
