//! Flat vertex/index batches for one territory draw and one route draw.

use sequoia_shared::WorldRect;

use crate::config::{SCREEN_SANITY_MAX, SCREEN_SANITY_MIN};
use crate::viewport::{ScreenRect, Viewport};

/// One vertex of a territory quad or tessellated route line.
/// `uv` always samples the single white texel, so `color` alone decides
/// the output.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

const WHITE_TEXEL_UV: [f32; 2] = [0.0, 0.0];

/// Why a territory produced no geometry this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Border data could not form a rectangle.
    Malformed,
    /// Entirely outside `[0, width) x [0, height)`.
    Offscreen,
    /// Zero or negative width/height after the transform.
    Degenerate,
    /// Transformed coordinates left the screen sanity window.
    OutOfRange,
}

/// Decide whether a screen-space rectangle may be drawn on a
/// `width` x `height` surface.
pub fn check_screen_rect(rect: &ScreenRect, width: f64, height: f64) -> Result<(), SkipReason> {
    if rect.x2 <= 0.0 || rect.x1 >= width || rect.y2 <= 0.0 || rect.y1 >= height {
        return Err(SkipReason::Offscreen);
    }
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Err(SkipReason::Degenerate);
    }
    // Written so that NaN fails every comparison.
    let in_range = rect.x1 > SCREEN_SANITY_MIN
        && rect.y1 > SCREEN_SANITY_MIN
        && rect.x2 < SCREEN_SANITY_MAX
        && rect.y2 < SCREEN_SANITY_MAX;
    if !in_range {
        return Err(SkipReason::OutOfRange);
    }
    Ok(())
}

/// Territory quads: 4 vertices and 6 indices each, drawn with one
/// indexed call.
#[derive(Debug, Clone, Default)]
pub struct QuadBatch {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
}

impl QuadBatch {
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Transform, cull and append one territory rectangle.
    pub fn push_territory(
        &mut self,
        viewport: &Viewport,
        rect: &WorldRect,
        color: [f32; 4],
        width: f64,
        height: f64,
    ) -> Result<(), SkipReason> {
        let screen = viewport.transform_rect(rect);
        check_screen_rect(&screen, width, height)?;
        self.push_quad(&screen, color);
        Ok(())
    }

    /// Append a quad without culling. Corners go top-left, top-right,
    /// bottom-left, bottom-right.
    pub fn push_quad(&mut self, rect: &ScreenRect, color: [f32; 4]) {
        let corners = [
            [rect.x1, rect.y1],
            [rect.x2, rect.y1],
            [rect.x1, rect.y2],
            [rect.x2, rect.y2],
        ];
        self.push_corners(corners.map(|[x, y]| [x as f32, y as f32]), color);
    }

    fn push_corners(&mut self, corners: [[f32; 2]; 4], color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(corners.into_iter().map(|position| OverlayVertex {
                position,
                uv: WHITE_TEXEL_UV,
                color,
            }));
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 2, base + 3]);
    }
}

/// One route line between two territory centers, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSegment {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: [f32; 4],
    pub thickness: f32,
}

/// Screen-space endpoints of the route between two territory rectangles,
/// or `None` when the line's bounding box misses the screen.
pub fn project_route(
    viewport: &Viewport,
    from: &WorldRect,
    to: &WorldRect,
    width: f64,
    height: f64,
) -> Option<([f64; 2], [f64; 2])> {
    let (fx, fy) = from.midpoint();
    let (tx, ty) = to.midpoint();
    let (x1, y1) = viewport.world_to_screen(fx, fy);
    let (x2, y2) = viewport.world_to_screen(tx, ty);

    let screen = WorldRect::new(0.0, 0.0, width, height);
    if !WorldRect::new(x1, y1, x2, y2).overlaps(&screen) {
        return None;
    }
    Some(([x1, y1], [x2, y2]))
}

/// Route lines for the second pass. Kept as segments so a rasterizer can
/// draw them directly; [`LineBatch::tessellate`] expands them into quads
/// for triangle pipelines.
#[derive(Debug, Clone, Default)]
pub struct LineBatch {
    pub segments: Vec<RouteSegment>,
}

impl LineBatch {
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: RouteSegment) {
        self.segments.push(segment);
    }

    /// Expand each segment into a thick quad. Zero-length segments are dropped.
    pub fn tessellate(&self) -> QuadBatch {
        let mut out = QuadBatch::with_capacity(self.segments.len());
        for seg in &self.segments {
            let dx = seg.to[0] - seg.from[0];
            let dy = seg.to[1] - seg.from[1];
            let len = (dx * dx + dy * dy).sqrt();
            if len <= f32::EPSILON {
                continue;
            }
            let half = seg.thickness * 0.5;
            let (nx, ny) = (-dy / len * half, dx / len * half);
            out.push_corners(
                [
                    [seg.from[0] + nx, seg.from[1] + ny],
                    [seg.to[0] + nx, seg.to[1] + ny],
                    [seg.from[0] - nx, seg.from[1] - ny],
                    [seg.to[0] - nx, seg.to[1] - ny],
                ],
                seg.color,
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use sequoia_shared::{Rgba, WorldRect};

    use super::*;

    fn push(batch: &mut QuadBatch, vp: &Viewport, rect: WorldRect) -> Result<(), SkipReason> {
        batch.push_territory(vp, &rect, [1.0, 1.0, 1.0, 0.5], 800.0, 600.0)
    }

    #[test]
    fn detlas_emits_one_quad_at_screen_coords() {
        let mut batch = QuadBatch::default();
        let fill = Rgba::new(255, 255, 255, 70).to_f32();
        batch
            .push_territory(
                &Viewport::default(),
                &WorldRect::new(0.0, 0.0, 100.0, 100.0),
                fill,
                800.0,
                600.0,
            )
            .expect("visible");

        assert_eq!(batch.quad_count(), 1);
        let positions: Vec<[f32; 2]> = batch.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[0.0, 0.0], [100.0, 0.0], [0.0, 100.0], [100.0, 100.0]]
        );
        assert_eq!(batch.indices, vec![0, 1, 2, 1, 2, 3]);
        assert!((batch.vertices[0].color[3] - 70.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn fully_offscreen_rect_is_skipped() {
        let mut batch = QuadBatch::default();
        let vp = Viewport::default();
        for rect in [
            WorldRect::new(-200.0, 0.0, -100.0, 100.0),
            WorldRect::new(800.0, 0.0, 900.0, 100.0),
            WorldRect::new(0.0, 600.0, 100.0, 700.0),
            WorldRect::new(0.0, -50.0, 100.0, 0.0),
        ] {
            assert_eq!(push(&mut batch, &vp, rect), Err(SkipReason::Offscreen));
        }
        assert!(batch.is_empty());
    }

    #[test]
    fn partially_visible_rect_is_emitted() {
        let mut batch = QuadBatch::default();
        let vp = Viewport::default();
        push(&mut batch, &vp, WorldRect::new(-50.0, -50.0, 50.0, 50.0)).expect("partial");
        push(&mut batch, &vp, WorldRect::new(750.0, 550.0, 900.0, 700.0)).expect("partial");
        assert_eq!(batch.quad_count(), 2);
        assert_eq!(&batch.indices[6..], &[4, 5, 6, 5, 6, 7]);
    }

    #[test]
    fn degenerate_and_runaway_rects_are_skipped() {
        let mut batch = QuadBatch::default();
        let vp = Viewport::default();
        assert_eq!(
            push(&mut batch, &vp, WorldRect::new(10.0, 10.0, 10.0, 50.0)),
            Err(SkipReason::Degenerate)
        );
        assert_eq!(
            push(&mut batch, &vp, WorldRect::new(50.0, 10.0, 20.0, 50.0)),
            Err(SkipReason::Degenerate)
        );
        assert_eq!(
            push(&mut batch, &vp, WorldRect::new(-20_000.0, 10.0, 20.0, 50.0)),
            Err(SkipReason::OutOfRange)
        );
        assert_eq!(
            push(&mut batch, &vp, WorldRect::new(10.0, 10.0, 30_000.0, 50.0)),
            Err(SkipReason::OutOfRange)
        );
        assert!(batch.is_empty());
    }

    #[test]
    fn viewport_transform_is_applied() {
        let mut batch = QuadBatch::default();
        let vp = Viewport::new(2.0, 10.0, 20.0);
        push(&mut batch, &vp, WorldRect::new(0.0, 0.0, 10.0, 10.0)).expect("visible");
        assert_eq!(batch.vertices[0].position, [10.0, 20.0]);
        assert_eq!(batch.vertices[3].position, [30.0, 40.0]);
    }

    #[test]
    fn route_is_culled_by_its_bounding_box() {
        let vp = Viewport::default();
        let a = WorldRect::new(0.0, 0.0, 100.0, 100.0);
        let b = WorldRect::new(200.0, 0.0, 300.0, 100.0);
        let (from, to) = project_route(&vp, &a, &b, 800.0, 600.0).expect("visible");
        assert_eq!(from, [50.0, 50.0]);
        assert_eq!(to, [250.0, 50.0]);

        let far = Viewport::new(1.0, -1000.0, 0.0);
        assert!(project_route(&far, &a, &b, 800.0, 600.0).is_none());

        // Flat bounding box with one endpoint off screen still crosses it.
        let crossing = Viewport::new(1.0, -200.0, 0.0);
        let (from, to) = project_route(&crossing, &a, &b, 800.0, 600.0).expect("crossing");
        assert_eq!((from, to), ([-150.0, 50.0], [50.0, 50.0]));
    }

    #[test]
    fn tessellated_line_has_requested_thickness() {
        let mut lines = LineBatch::default();
        lines.push(RouteSegment {
            from: [0.0, 10.0],
            to: [100.0, 10.0],
            color: [1.0, 0.0, 0.0, 1.0],
            thickness: 4.0,
        });
        lines.push(RouteSegment {
            from: [5.0, 5.0],
            to: [5.0, 5.0],
            color: [1.0, 0.0, 0.0, 1.0],
            thickness: 4.0,
        });
        let quads = lines.tessellate();
        assert_eq!(quads.quad_count(), 1);
        assert_eq!(quads.vertices[0].position, [0.0, 12.0]);
        assert_eq!(quads.vertices[2].position, [0.0, 8.0]);
        assert_eq!(quads.vertices[1].position, [100.0, 12.0]);
    }
}
