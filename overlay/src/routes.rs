use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use sequoia_shared::Rgba;

use crate::config::{OverlayDefaults, ROUTE_VISIBLE_ALPHA};

const SELECTED_ROUTE_BRIGHTEN: f64 = 1.3;
const SELECTED_ROUTE_THICKEN: f32 = 1.5;

/// Directed route key. `(A, B)` and `(B, A)` are distinct routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId {
    pub from: String,
    pub to: String,
}

impl RouteId {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteLine {
    pub id: RouteId,
    pub color: Rgba,
    pub thickness: f32,
    pub selected: bool,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
}

impl RouteLine {
    /// Color and thickness to draw with, after the selection highlight.
    pub fn effective_style(&self) -> (Rgba, f32) {
        if self.selected {
            (
                self.color.scale_rgb(SELECTED_ROUTE_BRIGHTEN),
                self.thickness * SELECTED_ROUTE_THICKEN,
            )
        } else {
            (self.color, self.thickness)
        }
    }
}

#[derive(Debug, Default)]
struct RouteTableInner {
    lines: HashMap<RouteId, RouteLine>,
    selected: Option<RouteId>,
}

/// Keyed store of route visual state, independent of territory state.
///
/// Reads take the shared lock; `upsert`, `select` and color writes take the
/// exclusive one. At most one line has `selected == true` after any write.
#[derive(Debug)]
pub struct RouteTable {
    inner: RwLock<RouteTableInner>,
    default_color: Rgba,
    default_thickness: f32,
}

impl RouteTable {
    pub fn new(defaults: &OverlayDefaults) -> Self {
        Self {
            inner: RwLock::new(RouteTableInner::default()),
            default_color: defaults.route_color,
            default_thickness: defaults.route_thickness,
        }
    }

    /// Create the route if missing, otherwise refresh it in place.
    /// An existing route is always made visible again.
    pub fn upsert(&self, from: &str, to: &str, color: Option<Rgba>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = RouteId::new(from, to);
        if let Some(existing) = inner.lines.get_mut(&id) {
            if let Some(color) = color {
                existing.color = color;
            }
            existing.visible = true;
            return;
        }

        let color = color.unwrap_or(self.default_color.with_alpha(ROUTE_VISIBLE_ALPHA));
        inner.lines.insert(
            id.clone(),
            RouteLine {
                id,
                color,
                thickness: self.default_thickness,
                selected: false,
                visible: true,
                created_at: Utc::now(),
            },
        );
    }

    pub fn get(&self, from: &str, to: &str) -> Option<RouteLine> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.lines.get(&RouteId::new(from, to)).cloned()
    }

    /// Select a route, clearing the previous selection. Selecting a route
    /// that does not exist yet only clears the previous selection.
    pub fn select(&self, from: &str, to: &str) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        clear_selected(&mut inner);

        let id = RouteId::new(from, to);
        if let Some(line) = inner.lines.get_mut(&id) {
            line.selected = true;
            inner.selected = Some(id);
        }
    }

    pub fn clear_selection(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        clear_selected(&mut inner);
    }

    /// Recolor an existing route; no-op when the route is unknown.
    pub fn set_color(&self, from: &str, to: &str, color: Rgba) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(line) = inner.lines.get_mut(&RouteId::new(from, to)) {
            line.color = color;
        }
    }

    /// Hide an existing route until the next `upsert` touches it.
    pub fn hide(&self, from: &str, to: &str) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(line) = inner.lines.get_mut(&RouteId::new(from, to)) {
            line.visible = false;
        }
    }

    pub fn selected(&self) -> Option<RouteId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .selected
            .clone()
    }

    pub fn selected_count(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.lines.values().filter(|line| line.selected).count()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lines
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn clear_selected(inner: &mut RouteTableInner) {
    if let Some(prev) = inner.selected.take()
        && let Some(line) = inner.lines.get_mut(&prev)
    {
        line.selected = false;
    }
}
