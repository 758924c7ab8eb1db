use sequoia_shared::{TerritoryMap, WorldRect};

const GRID_COLS: usize = 50;
const GRID_ROWS: usize = 50;

/// A flat 2D spatial grid over world space for territory hit-testing and
/// visible-set queries. Rebuilt only when the territory map is replaced.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cells: Vec<Vec<usize>>,
    names: Vec<String>,
    rects: Vec<WorldRect>,
    /// Territories whose border could not be indexed; always reported as
    /// candidates so the batch builder can account for them.
    unindexed: Vec<String>,
    min_x: f64,
    min_y: f64,
    cell_w: f64,
    cell_h: f64,
}

impl SpatialGrid {
    pub fn empty() -> Self {
        Self {
            cells: Vec::new(),
            names: Vec::new(),
            rects: Vec::new(),
            unindexed: Vec::new(),
            min_x: 0.0,
            min_y: 0.0,
            cell_w: 1.0,
            cell_h: 1.0,
        }
    }

    pub fn build(territories: &TerritoryMap) -> Self {
        let mut grid = Self::empty();
        let mut entries = Vec::with_capacity(territories.len());
        for (name, territory) in territories {
            match territory.rect() {
                Ok(rect) => entries.push((name.clone(), rect)),
                Err(_) => grid.unindexed.push(name.clone()),
            }
        }
        grid.unindexed.sort();
        if entries.is_empty() {
            return grid;
        }
        // Deterministic cell contents regardless of map iteration order.
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        // Compute world bounds
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (_, rect) in &entries {
            min_x = min_x.min(rect.left());
            min_y = min_y.min(rect.top());
            max_x = max_x.max(rect.right());
            max_y = max_y.max(rect.bottom());
        }

        // Add small padding to avoid edge issues
        min_x -= 1.0;
        min_y -= 1.0;
        max_x += 1.0;
        max_y += 1.0;

        let cell_w = (max_x - min_x) / GRID_COLS as f64;
        let cell_h = (max_y - min_y) / GRID_ROWS as f64;

        let mut cells = vec![Vec::new(); GRID_COLS * GRID_ROWS];
        let mut names = Vec::with_capacity(entries.len());
        let mut rects = Vec::with_capacity(entries.len());

        for (idx, (name, rect)) in entries.into_iter().enumerate() {
            let (col_start, col_end) = span(rect.left(), rect.right(), min_x, cell_w, GRID_COLS);
            let (row_start, row_end) = span(rect.top(), rect.bottom(), min_y, cell_h, GRID_ROWS);

            // Insert into all overlapping grid cells
            for row in row_start..row_end {
                for col in col_start..col_end {
                    cells[row * GRID_COLS + col].push(idx);
                }
            }
            names.push(name);
            rects.push(rect);
        }

        grid.cells = cells;
        grid.names = names;
        grid.rects = rects;
        grid.min_x = min_x;
        grid.min_y = min_y;
        grid.cell_w = cell_w;
        grid.cell_h = cell_h;
        grid
    }

    /// Returns the world-coordinate bounding box of all indexed territories, or `None` if empty.
    pub fn world_bounds(&self) -> Option<WorldRect> {
        if self.cells.is_empty() {
            return None;
        }
        Some(WorldRect::new(
            self.min_x,
            self.min_y,
            self.min_x + self.cell_w * GRID_COLS as f64,
            self.min_y + self.cell_h * GRID_ROWS as f64,
        ))
    }

    /// Find the territory at a world coordinate. Returns `None` if no territory at that point.
    pub fn find_at(&self, wx: f64, wy: f64) -> Option<&str> {
        if self.cells.is_empty() || !wx.is_finite() || !wy.is_finite() {
            return None;
        }

        let col = ((wx - self.min_x) / self.cell_w).floor() as isize;
        let row = ((wy - self.min_y) / self.cell_h).floor() as isize;

        if col < 0 || row < 0 || col >= GRID_COLS as isize || row >= GRID_ROWS as isize {
            return None;
        }

        let cell = &self.cells[row as usize * GRID_COLS + col as usize];
        cell.iter()
            .find(|&&idx| self.rects[idx].contains(wx, wy))
            .map(|&idx| self.names[idx].as_str())
    }

    /// Names of all territories that may intersect `area`, sorted, plus every
    /// unindexed territory. A superset: callers still cull precisely.
    pub fn query(&self, area: &WorldRect) -> Vec<&str> {
        let mut hits: Vec<usize> = Vec::new();
        if !self.cells.is_empty() {
            let (col_start, col_end) =
                span(area.left(), area.right(), self.min_x, self.cell_w, GRID_COLS);
            let (row_start, row_end) =
                span(area.top(), area.bottom(), self.min_y, self.cell_h, GRID_ROWS);
            for row in row_start..row_end {
                for col in col_start..col_end {
                    hits.extend_from_slice(&self.cells[row * GRID_COLS + col]);
                }
            }
            hits.sort_unstable();
            hits.dedup();
        }
        // Indices follow sorted name order, so the output stays sorted.
        let mut out: Vec<&str> = hits.into_iter().map(|idx| self.names[idx].as_str()).collect();
        out.extend(self.unindexed.iter().map(String::as_str));
        out
    }

    pub fn len(&self) -> usize {
        self.names.len() + self.unindexed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Half-open cell index range covering `[lo, hi]` on one axis.
fn span(lo: f64, hi: f64, origin: f64, cell: f64, count: usize) -> (usize, usize) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0, count);
    }
    let start = ((lo - origin) / cell).floor().clamp(0.0, count as f64) as usize;
    let end = ((hi - origin) / cell).ceil().clamp(0.0, count as f64) as usize;
    // Zero-width rectangles still occupy the cell they sit in.
    (start, end.max((start + 1).min(count)))
}

#[cfg(test)]
mod tests {
    use sequoia_shared::{Territory, TerritoryMap, WorldRect};

    use super::SpatialGrid;

    fn sample_map() -> TerritoryMap {
        let mut map = TerritoryMap::new();
        map.insert("Detlas".into(), Territory::new([0.0, 0.0, 100.0, 100.0]));
        map.insert("Ragni".into(), Territory::new([200.0, 0.0, 300.0, 100.0]));
        map.insert("Almuj".into(), Territory::new([0.0, 900.0, 100.0, 1000.0]));
        map.insert(
            "Corrupt".into(),
            Territory {
                border: vec![f64::NAN, 0.0, 1.0, 1.0],
                trading_routes: Vec::new(),
            },
        );
        map
    }

    #[test]
    fn find_at_hits_inside_territory() {
        let grid = SpatialGrid::build(&sample_map());
        assert_eq!(grid.find_at(50.0, 50.0), Some("Detlas"));
        assert_eq!(grid.find_at(250.0, 10.0), Some("Ragni"));
        assert_eq!(grid.find_at(150.0, 50.0), None);
        assert_eq!(grid.find_at(-500.0, 50.0), None);
        assert_eq!(grid.find_at(f64::NAN, 50.0), None);
    }

    #[test]
    fn query_returns_nearby_and_unindexed() {
        let grid = SpatialGrid::build(&sample_map());
        let hits = grid.query(&WorldRect::new(0.0, 0.0, 350.0, 150.0));
        assert!(hits.contains(&"Detlas"));
        assert!(hits.contains(&"Ragni"));
        assert!(!hits.contains(&"Almuj"));
        assert_eq!(hits.last(), Some(&"Corrupt"));
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn empty_map_has_no_bounds() {
        let grid = SpatialGrid::build(&TerritoryMap::new());
        assert!(grid.world_bounds().is_none());
        assert!(grid.is_empty());
        assert!(grid.query(&WorldRect::new(0.0, 0.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn world_bounds_cover_all_territories() {
        let grid = SpatialGrid::build(&sample_map());
        let bounds = grid.world_bounds().expect("bounds");
        assert!(bounds.left() < 0.0 && bounds.top() < 0.0);
        assert!(bounds.right() > 300.0 && bounds.bottom() > 1000.0);
    }
}
