//! Per-frame orchestration: invalidation, resolve, batch, draw.
//!
//! The compositor is constructed once with its collaborators and shared by
//! handle (`Arc<Compositor>`) between the frame loop and UI/background
//! callers. Every mutator marks the gate dirty before returning; the frame
//! loop calls [`Compositor::render_frame`] once per frame and geometry is
//! rebuilt only when the gate says so.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use sequoia_shared::{GuildKey, Rgba};
use tracing::debug;

use crate::batch::{RouteSegment, SkipReason, project_route};
use crate::channel::{self, ShaderUniforms};
use crate::config::{BLINK_TIMER_WRAP_SECS, OverlayDefaults};
use crate::gate::InvalidationGate;
use crate::resolve::{
    ClaimLookup, GuildColorLookup, OverlayMode, ResolveContext, Selection, resolve,
};
use crate::routes::RouteTable;
use crate::surface::{FrameGeometry, OverlaySurface};
use crate::territories::TerritoryStore;
use crate::viewport::{ViewState, Viewport};

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameMetrics {
    /// Whether geometry was rebuilt this frame.
    pub rebuilt: bool,
    pub revision: u64,
    pub territories_drawn: usize,
    pub territories_culled: usize,
    pub territories_malformed: usize,
    pub territories_out_of_range: usize,
    pub routes_drawn: usize,
    pub draw_calls: u32,
    pub blink_factor: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct BuildStats {
    drawn: usize,
    culled: usize,
    malformed: usize,
    out_of_range: usize,
}

#[derive(Debug, Default)]
struct TransientState {
    mode: OverlayMode,
    selection: Option<Selection>,
    last_view: Option<ViewState>,
    last_hovered: Option<String>,
}

#[derive(Debug, Default)]
struct FrameCache {
    geometry: FrameGeometry,
    stats: BuildStats,
}

/// Route endpoints gathered under the territory lock, styled after it.
struct RouteCandidate {
    from: String,
    to: String,
    start: [f64; 2],
    end: [f64; 2],
}

pub struct Compositor {
    territories: Arc<TerritoryStore>,
    claims: Arc<dyn ClaimLookup>,
    guilds: Arc<dyn GuildColorLookup>,
    gate: Arc<InvalidationGate>,
    routes: RouteTable,
    state: Mutex<TransientState>,
    frame: Mutex<FrameCache>,
}

impl Compositor {
    pub fn new(
        defaults: &OverlayDefaults,
        territories: Arc<TerritoryStore>,
        claims: Arc<dyn ClaimLookup>,
        guilds: Arc<dyn GuildColorLookup>,
        gate: Arc<InvalidationGate>,
    ) -> Self {
        Self {
            territories,
            claims,
            guilds,
            gate,
            routes: RouteTable::new(defaults),
            state: Mutex::new(TransientState::default()),
            frame: Mutex::new(FrameCache::default()),
        }
    }

    pub fn gate(&self) -> &Arc<InvalidationGate> {
        &self.gate
    }

    pub fn mark_dirty(&self) {
        self.gate.mark_dirty();
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    // --- Modes ---

    /// Start a claim-edit session, replacing any active mode.
    pub fn set_editing_guild(&self, name: &str, tag: &str, claims: HashSet<String>) {
        self.with_state(|state| {
            state.mode = OverlayMode::EditClaims {
                guild: GuildKey::new(name, tag),
                claims,
            };
        });
        self.gate.mark_dirty();
    }

    /// End the claim-edit session. No-op when another mode is active.
    pub fn clear_editing_guild(&self) {
        self.clear_mode_if(|mode| matches!(mode, OverlayMode::EditClaims { .. }));
    }

    pub fn editing_guild(&self) -> Option<GuildKey> {
        self.with_state(|state| match &state.mode {
            OverlayMode::EditClaims { guild, .. } => Some(guild.clone()),
            _ => None,
        })
    }

    /// Whether `territory` is claimed in the active edit session.
    pub fn is_claimed_in_edit(&self, territory: &str) -> bool {
        self.with_state(|state| state.mode.editing_guild_for(territory).is_some())
    }

    /// Start a loadout-application session, replacing any active mode.
    pub fn set_loadout_mode(&self, name: &str, selected: HashSet<String>) {
        self.with_state(|state| {
            state.mode = OverlayMode::Loadout {
                name: name.to_string(),
                selected,
            };
        });
        self.gate.mark_dirty();
    }

    /// End the loadout session. No-op when another mode is active.
    pub fn clear_loadout_mode(&self) {
        self.clear_mode_if(|mode| matches!(mode, OverlayMode::Loadout { .. }));
    }

    pub fn is_loadout_mode(&self) -> bool {
        self.with_state(|state| matches!(state.mode, OverlayMode::Loadout { .. }))
    }

    pub fn is_loadout_selected(&self, territory: &str) -> bool {
        self.with_state(|state| state.mode.is_loadout_selected(territory))
    }

    pub fn mode(&self) -> OverlayMode {
        self.with_state(|state| state.mode.clone())
    }

    fn clear_mode_if(&self, active: impl FnOnce(&OverlayMode) -> bool) {
        let cleared = self.with_state(|state| {
            if active(&state.mode) {
                state.mode = OverlayMode::Normal;
                true
            } else {
                false
            }
        });
        if cleared {
            self.gate.mark_dirty();
        }
    }

    // --- Selection ---

    /// Select `name` and start blinking. Selecting the territory that is
    /// already selected deselects it.
    pub fn select_territory(&self, name: &str) {
        self.with_state(|state| {
            if state.selection.as_ref().is_some_and(|sel| sel.territory == name) {
                state.selection = None;
            } else {
                state.selection = Some(Selection {
                    territory: name.to_string(),
                    blink_timer: 0.0,
                });
            }
        });
        self.gate.mark_dirty();
    }

    pub fn deselect_territory(&self) {
        let had = self.with_state(|state| state.selection.take().is_some());
        if had {
            self.gate.mark_dirty();
        }
    }

    pub fn selected_territory(&self) -> Option<String> {
        self.with_state(|state| state.selection.as_ref().map(|sel| sel.territory.clone()))
    }

    /// Advance the blink clock by `dt` seconds. Marks dirty when the
    /// dimmed half-phase flips, since that is baked into vertex colors.
    pub fn advance_blink(&self, dt: f64) {
        let flipped = self.with_state(|state| {
            let Some(sel) = state.selection.as_mut() else {
                return false;
            };
            let before = channel::blink_dimmed(sel.blink_timer);
            sel.blink_timer += dt;
            if sel.blink_timer >= BLINK_TIMER_WRAP_SECS {
                sel.blink_timer = 0.0;
            }
            before != channel::blink_dimmed(sel.blink_timer)
        });
        if flipped {
            self.gate.mark_dirty();
        }
    }

    pub fn blink_timer(&self) -> Option<f64> {
        self.with_state(|state| state.selection.as_ref().map(|sel| sel.blink_timer))
    }

    // --- Routes ---

    pub fn select_route(&self, from: &str, to: &str) {
        self.routes.select(from, to);
        self.gate.mark_dirty();
    }

    pub fn clear_route_selection(&self) {
        self.routes.clear_selection();
        self.gate.mark_dirty();
    }

    pub fn set_route_color(&self, from: &str, to: &str, color: Rgba) {
        self.routes.set_color(from, to, color);
        self.gate.mark_dirty();
    }

    // --- Frame ---

    /// Territory under a screen point for the given viewport.
    pub fn territory_at_screen(&self, viewport: &Viewport, sx: f64, sy: f64) -> Option<String> {
        let (wx, wy) = viewport.screen_to_world(sx, sy);
        self.territories.find_at(wx, wy)
    }

    /// Copy of the geometry the last rebuild produced.
    pub fn geometry_snapshot(&self) -> FrameGeometry {
        self.frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .geometry
            .clone()
    }

    /// Draw one frame. Rebuilds geometry only when the gate is dirty or
    /// the view or hover target changed since the last rebuild.
    pub fn render_frame<S>(
        &self,
        surface: &mut S,
        viewport: Viewport,
        hovered: Option<&str>,
    ) -> FrameMetrics
    where
        S: OverlaySurface + ?Sized,
    {
        let (width, height) = surface.size();
        let view = ViewState {
            viewport,
            width,
            height,
        };

        self.with_state(|state| {
            if state.last_view.is_none_or(|last| last.differs_from(&view)) {
                state.last_view = Some(view);
                self.gate.mark_dirty();
            }
            if state.last_hovered.as_deref() != hovered {
                state.last_hovered = hovered.map(str::to_string);
                self.gate.mark_dirty();
            }
        });

        // Consume before snapshotting: a mark that lands after this point
        // is owed to the next frame, never swallowed by this one.
        let mut cache = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        let rebuilt = self.gate.consume();
        let (mode, selection) =
            self.with_state(|state| (state.mode.clone(), state.selection.clone()));
        if rebuilt {
            let ctx = ResolveContext {
                mode: &mode,
                selection: selection.as_ref(),
                hovered,
                claims: self.claims.as_ref(),
                guilds: self.guilds.as_ref(),
                default_fill: self.territories.default_fill(),
                default_border: self.territories.default_border(),
            };
            let FrameCache { geometry, stats } = &mut *cache;
            *stats = self.rebuild(geometry, &view, &ctx);
            geometry.revision += 1;
        }

        let blink_factor = selection
            .as_ref()
            .map_or(0.0, |sel| channel::blink_factor(sel.blink_timer));
        let uniforms = ShaderUniforms {
            blink_factor,
            hover_factor: if hovered.is_some() { 1.0 } else { 0.0 },
            ..ShaderUniforms::default()
        };
        let draw_calls = surface.draw(&cache.geometry, &uniforms);

        FrameMetrics {
            rebuilt,
            revision: cache.geometry.revision,
            territories_drawn: cache.stats.drawn,
            territories_culled: cache.stats.culled,
            territories_malformed: cache.stats.malformed,
            territories_out_of_range: cache.stats.out_of_range,
            routes_drawn: cache.geometry.routes.len(),
            draw_calls,
            blink_factor,
        }
    }

    fn rebuild(
        &self,
        geometry: &mut FrameGeometry,
        view: &ViewState,
        ctx: &ResolveContext<'_>,
    ) -> BuildStats {
        let (w, h) = (f64::from(view.width), f64::from(view.height));
        let vp = &view.viewport;
        let mut stats = BuildStats::default();
        geometry.territories.clear();
        geometry.routes.clear();

        let mut candidates = Vec::new();
        {
            let index = self.territories.read();
            let area = vp.visible_world_rect(w, h);
            for name in index.grid.query(&area) {
                let Some(territory) = index.territories.get(name) else {
                    continue;
                };
                let rect = match territory.rect() {
                    Ok(rect) => rect,
                    Err(e) => {
                        debug!("skipping territory {name}: {e}");
                        stats.malformed += 1;
                        continue;
                    }
                };
                let colors = resolve(name, ctx);
                match geometry
                    .territories
                    .push_territory(vp, &rect, colors.fill.to_f32(), w, h)
                {
                    Ok(()) => stats.drawn += 1,
                    Err(SkipReason::OutOfRange) => {
                        debug!("territory {name} outside screen sanity bounds");
                        stats.out_of_range += 1;
                    }
                    Err(SkipReason::Malformed) => stats.malformed += 1,
                    Err(SkipReason::Offscreen | SkipReason::Degenerate) => stats.culled += 1,
                }
            }
            let accounted = stats.drawn + stats.malformed + stats.out_of_range;
            stats.culled = index.territories.len().saturating_sub(accounted);

            let mut names: Vec<&String> = index.territories.keys().collect();
            names.sort();
            for from in names {
                let territory = &index.territories[from];
                let Ok(from_rect) = territory.rect() else {
                    continue;
                };
                for to in &territory.trading_routes {
                    let Some(Ok(to_rect)) = index.territories.get(to).map(|t| t.rect()) else {
                        continue;
                    };
                    if let Some((start, end)) = project_route(vp, &from_rect, &to_rect, w, h) {
                        candidates.push(RouteCandidate {
                            from: from.clone(),
                            to: to.clone(),
                            start,
                            end,
                        });
                    }
                }
            }
        }

        for candidate in candidates {
            self.routes.upsert(&candidate.from, &candidate.to, None);
            let Some(line) = self.routes.get(&candidate.from, &candidate.to) else {
                continue;
            };
            if !line.visible {
                continue;
            }
            let (color, thickness) = line.effective_style();
            geometry.routes.push(RouteSegment {
                from: candidate.start.map(|v| v as f32),
                to: candidate.end.map(|v| v as f32),
                color: color.to_f32(),
                thickness,
            });
        }

        debug!(
            drawn = stats.drawn,
            culled = stats.culled,
            routes = geometry.routes.len(),
            "overlay geometry rebuilt"
        );
        stats
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut TransientState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use sequoia_shared::{Rgba, Territory, TerritoryMap};

    use super::Compositor;
    use crate::claims::{ClaimStore, GuildRegistry};
    use crate::config::OverlayDefaults;
    use crate::gate::InvalidationGate;
    use crate::resolve::{LOADOUT_FILL, OverlayMode};
    use crate::surface::CpuSurface;
    use crate::territories::TerritoryStore;
    use crate::viewport::Viewport;

    const EMERALD: Rgba = Rgba::opaque(20, 200, 90);

    struct Fixture {
        compositor: Compositor,
        claims: Arc<ClaimStore>,
        guilds: Arc<GuildRegistry>,
        gate: Arc<InvalidationGate>,
        surface: CpuSurface,
    }

    fn fixture(map: TerritoryMap) -> Fixture {
        let defaults = OverlayDefaults::default();
        let gate = Arc::new(InvalidationGate::new());
        let territories = Arc::new(TerritoryStore::new(&defaults, Arc::clone(&gate)));
        territories.replace_all(map);
        let claims = Arc::new(ClaimStore::new(Arc::clone(&gate)));
        let guilds = Arc::new(GuildRegistry::new(Arc::clone(&gate)));
        let compositor = Compositor::new(
            &defaults,
            territories,
            claims.clone(),
            guilds.clone(),
            Arc::clone(&gate),
        );
        Fixture {
            compositor,
            claims,
            guilds,
            gate,
            surface: CpuSurface::new(800, 600),
        }
    }

    fn world() -> TerritoryMap {
        let mut map = TerritoryMap::new();
        map.insert(
            "Detlas".into(),
            Territory::new([0.0, 0.0, 100.0, 100.0]).with_routes(["Ragni"]),
        );
        map.insert(
            "Ragni".into(),
            Territory::new([200.0, 0.0, 300.0, 100.0]).with_routes(["Detlas"]),
        );
        map.insert("Almuj".into(), Territory::new([5000.0, 5000.0, 5100.0, 5100.0]));
        map
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    /// Fill color of the quad whose first vertex sits at `(x, y)`.
    fn quad_color_at(f: &Fixture, x: f32, y: f32) -> Option<[f32; 4]> {
        f.compositor
            .geometry_snapshot()
            .territories
            .vertices
            .chunks_exact(4)
            .find(|quad| quad[0].position == [x, y])
            .map(|quad| quad[0].color)
    }

    #[test]
    fn detlas_renders_as_single_default_quad() {
        let mut map = TerritoryMap::new();
        map.insert("Detlas".into(), Territory::new([0.0, 0.0, 100.0, 100.0]));
        let mut f = fixture(map);

        let metrics = f
            .compositor
            .render_frame(&mut f.surface, Viewport::default(), None);

        assert!(metrics.rebuilt);
        assert_eq!(metrics.territories_drawn, 1);
        assert_eq!(metrics.draw_calls, 1);
        let geometry = f.compositor.geometry_snapshot();
        let positions: Vec<[f32; 2]> =
            geometry.territories.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[0.0, 0.0], [100.0, 0.0], [0.0, 100.0], [100.0, 100.0]]
        );
        let alpha = geometry.territories.vertices[0].color[3];
        assert!((alpha - 70.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn persistent_claim_colors_territory() {
        let mut f = fixture(world());
        f.guilds.register("Emerald", "EMD", EMERALD);
        f.claims.add_claim("Ragni", "Emerald", "EMD");

        f.compositor
            .render_frame(&mut f.surface, Viewport::default(), None);

        assert_eq!(
            quad_color_at(&f, 200.0, 0.0),
            Some(EMERALD.with_alpha(70).to_f32())
        );
        assert_eq!(
            quad_color_at(&f, 0.0, 0.0),
            Some(Rgba::new(255, 255, 255, 70).to_f32())
        );
    }

    #[test]
    fn loadout_highlight_wins_over_claim() {
        let mut f = fixture(world());
        f.guilds.register("Emerald", "EMD", EMERALD);
        f.claims.add_claim("Ragni", "Emerald", "EMD");
        f.compositor.set_loadout_mode("Defense", set(&["Ragni"]));

        f.compositor
            .render_frame(&mut f.surface, Viewport::default(), None);

        assert_eq!(quad_color_at(&f, 200.0, 0.0), Some(LOADOUT_FILL.to_f32()));
    }

    #[test]
    fn repeated_marks_cause_one_rebuild() {
        let mut f = fixture(world());
        let vp = Viewport::default();
        assert!(f.compositor.render_frame(&mut f.surface, vp, None).rebuilt);
        assert!(!f.compositor.render_frame(&mut f.surface, vp, None).rebuilt);

        for _ in 0..10 {
            f.compositor.mark_dirty();
        }
        let first = f.compositor.render_frame(&mut f.surface, vp, None);
        let second = f.compositor.render_frame(&mut f.surface, vp, None);
        assert!(first.rebuilt);
        assert!(!second.rebuilt);
        assert_eq!(first.revision, second.revision);
        assert_eq!(second.territories_drawn, 2);
    }

    #[test]
    fn view_and_hover_changes_invalidate() {
        let mut f = fixture(world());
        let vp = Viewport::default();
        f.compositor.render_frame(&mut f.surface, vp, None);

        let nudged = Viewport::new(1.0, 0.05, 0.0);
        assert!(!f.compositor.render_frame(&mut f.surface, nudged, None).rebuilt);

        let panned = Viewport::new(1.0, 40.0, 0.0);
        assert!(f.compositor.render_frame(&mut f.surface, panned, None).rebuilt);

        let hovered = f.compositor.render_frame(&mut f.surface, panned, Some("Detlas"));
        assert!(hovered.rebuilt);
        assert_eq!(quad_color_at(&f, 40.0, 0.0).map(|c| c[3]), Some(1.0));
        assert!(!f.compositor.render_frame(&mut f.surface, panned, Some("Detlas")).rebuilt);
    }

    #[test]
    fn small_zoom_step_rebuilds_far_territories() {
        let mut map = TerritoryMap::new();
        map.insert("Nesaak".into(), Territory::new([1000.0, 0.0, 1100.0, 100.0]));
        let mut f = fixture(map);

        let wide = f
            .compositor
            .render_frame(&mut f.surface, Viewport::new(0.8, 0.0, 0.0), None);
        assert_eq!(wide.territories_drawn, 0);

        // Screen x1 moves from 800 to 795 and the quad comes on screen.
        let closer = f
            .compositor
            .render_frame(&mut f.surface, Viewport::new(0.795, 0.0, 0.0), None);
        assert!(closer.rebuilt);
        assert_eq!(closer.territories_drawn, 1);
    }

    #[test]
    fn mode_change_during_frame_is_not_lost() {
        let mut f = fixture(world());
        let vp = Viewport::default();
        f.compositor.render_frame(&mut f.surface, vp, None);

        thread::scope(|scope| {
            // Park the render thread on the frame cache while the mode changes.
            let cache = f.compositor.frame.lock().expect("frame lock");
            let compositor = &f.compositor;
            let render = scope.spawn(move || {
                let mut surface = CpuSurface::new(800, 600);
                compositor.render_frame(&mut surface, vp, None)
            });
            thread::sleep(Duration::from_millis(50));
            f.compositor.set_loadout_mode("Defense", set(&["Ragni"]));
            drop(cache);
            render.join().expect("render thread");
        });

        f.compositor.render_frame(&mut f.surface, vp, None);
        assert_eq!(quad_color_at(&f, 200.0, 0.0), Some(LOADOUT_FILL.to_f32()));
    }

    #[test]
    fn offscreen_and_malformed_territories_are_counted() {
        let mut map = world();
        map.insert(
            "Broken".into(),
            Territory {
                border: vec![0.0, f64::INFINITY, 10.0],
                trading_routes: Vec::new(),
            },
        );
        let mut f = fixture(map);
        let metrics = f
            .compositor
            .render_frame(&mut f.surface, Viewport::default(), None);
        assert_eq!(metrics.territories_drawn, 2);
        assert_eq!(metrics.territories_malformed, 1);
        assert_eq!(metrics.territories_culled, 1);
    }

    #[test]
    fn selection_toggles_and_blinks() {
        let f = fixture(world());
        f.compositor.select_territory("Ragni");
        assert_eq!(f.compositor.selected_territory().as_deref(), Some("Ragni"));
        f.gate.consume();

        f.compositor.advance_blink(0.1);
        assert!(!f.gate.consume());
        f.compositor.advance_blink(0.3);
        assert!(f.gate.consume());

        f.compositor.advance_blink(59.7);
        assert_eq!(f.compositor.blink_timer(), Some(0.0));

        f.compositor.select_territory("Ragni");
        assert!(f.compositor.selected_territory().is_none());
        f.gate.consume();
        f.compositor.deselect_territory();
        assert!(!f.gate.consume());
    }

    #[test]
    fn selected_territory_gets_pulse_uniform() {
        let mut f = fixture(world());
        f.compositor.select_territory("Ragni");
        f.compositor.advance_blink(0.33);
        let metrics = f
            .compositor
            .render_frame(&mut f.surface, Viewport::default(), None);
        assert!((metrics.blink_factor - 1.0).abs() < 1e-4);
        let color = quad_color_at(&f, 200.0, 0.0).expect("Ragni quad");
        assert_eq!(color[1], 1.0);
    }

    #[test]
    fn modes_are_exclusive() {
        let f = fixture(world());
        f.compositor
            .set_editing_guild("Emerald", "EMD", set(&["Detlas"]));
        assert!(f.compositor.is_claimed_in_edit("Detlas"));
        f.compositor.set_loadout_mode("Defense", set(&["Ragni"]));
        assert!(f.compositor.editing_guild().is_none());

        f.gate.consume();
        f.compositor.clear_editing_guild();
        assert!(!f.gate.consume());
        assert!(f.compositor.is_loadout_mode());

        f.compositor.clear_loadout_mode();
        assert!(f.gate.consume());
        assert_eq!(f.compositor.mode(), OverlayMode::Normal);
    }

    #[test]
    fn routes_are_created_and_styled() {
        let mut f = fixture(world());
        let metrics = f
            .compositor
            .render_frame(&mut f.surface, Viewport::default(), None);
        assert_eq!(metrics.routes_drawn, 2);
        assert_eq!(metrics.draw_calls, 2);
        assert_eq!(f.compositor.routes().len(), 2);

        f.compositor.select_route("Detlas", "Ragni");
        f.compositor
            .render_frame(&mut f.surface, Viewport::default(), None);
        let geometry = f.compositor.geometry_snapshot();
        let selected = geometry
            .routes
            .segments
            .iter()
            .find(|seg| seg.from == [50.0, 50.0])
            .expect("Detlas -> Ragni");
        assert_eq!(selected.thickness, 4.5);
        assert_eq!(f.compositor.routes().selected_count(), 1);
    }

    #[test]
    fn territory_hit_test_uses_viewport() {
        let f = fixture(world());
        let vp = Viewport::new(2.0, 0.0, 0.0);
        assert_eq!(
            f.compositor.territory_at_screen(&vp, 450.0, 50.0).as_deref(),
            Some("Ragni")
        );
        assert!(f.compositor.territory_at_screen(&vp, 300.0, 50.0).is_none());
    }
}
