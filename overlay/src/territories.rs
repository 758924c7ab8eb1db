use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use sequoia_shared::{Rgba, Territory, TerritoryMap};
use tracing::info;

use crate::config::OverlayDefaults;
use crate::gate::InvalidationGate;
use crate::spatial::SpatialGrid;

/// Territory borders plus the spatial index built from them.
#[derive(Debug, Clone)]
pub struct TerritoryIndex {
    pub territories: TerritoryMap,
    pub grid: SpatialGrid,
}

/// Owner of the territory border map. Mutated by the map loader, read by
/// the compositor for the length of one batch build.
#[derive(Debug)]
pub struct TerritoryStore {
    index: RwLock<TerritoryIndex>,
    default_fill: Rgba,
    default_border: Rgba,
    gate: Arc<InvalidationGate>,
}

impl TerritoryStore {
    pub fn new(defaults: &OverlayDefaults, gate: Arc<InvalidationGate>) -> Self {
        Self {
            index: RwLock::new(TerritoryIndex {
                territories: TerritoryMap::new(),
                grid: SpatialGrid::empty(),
            }),
            default_fill: defaults.fill_color,
            default_border: defaults.border_color,
            gate,
        }
    }

    /// Swap in a freshly loaded map. The spatial index is built before the
    /// write lock is taken.
    pub fn replace_all(&self, territories: TerritoryMap) {
        let grid = SpatialGrid::build(&territories);
        let count = territories.len();
        *self.index.write().unwrap_or_else(PoisonError::into_inner) =
            TerritoryIndex { territories, grid };
        self.gate.mark_dirty();
        info!("territory map replaced: {count} territories");
    }

    /// Insert or update a single territory and rebuild the index.
    pub fn update_territory(&self, name: &str, territory: Territory) {
        let mut index = self.index.write().unwrap_or_else(PoisonError::into_inner);
        index.territories.insert(name.to_string(), territory);
        index.grid = SpatialGrid::build(&index.territories);
        drop(index);
        self.gate.mark_dirty();
    }

    /// Shared read access; hold it only while building geometry.
    pub fn read(&self) -> RwLockReadGuard<'_, TerritoryIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Name of the territory under a world point, for cursor hit-testing.
    pub fn find_at(&self, wx: f64, wy: f64) -> Option<String> {
        self.read().grid.find_at(wx, wy).map(str::to_string)
    }

    pub fn default_fill(&self) -> Rgba {
        self.default_fill
    }

    pub fn default_border(&self) -> Rgba {
        self.default_border
    }

    pub fn len(&self) -> usize {
        self.read().territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
