use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub type TerritoryMap = HashMap<String, Territory>;

/// A territory as published by the territory manager, keyed by name in a [`TerritoryMap`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Territory {
    /// World-space `[x1, y1, x2, y2]`. Kept raw so corrupted upstream data
    /// can be detected at draw time rather than at load time.
    #[serde(default)]
    pub border: Vec<f64>,
    /// Names of territories this one has an outbound trading route to.
    #[serde(default)]
    pub trading_routes: Vec<String>,
}

impl Territory {
    pub fn new(border: [f64; 4]) -> Self {
        Self {
            border: border.to_vec(),
            trading_routes: Vec::new(),
        }
    }

    pub fn with_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trading_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    pub fn rect(&self) -> Result<WorldRect, GeometryError> {
        WorldRect::from_border(&self.border)
    }
}

/// Why a border could not be turned into a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    TooFewCoordinates(usize),
    NonFinite,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewCoordinates(n) => write!(f, "border has {n} coordinates, need 4"),
            Self::NonFinite => f.write_str("border contains NaN or infinite coordinates"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Axis-aligned rectangle in world coordinates, corners in border order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl WorldRect {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_border(border: &[f64]) -> Result<Self, GeometryError> {
        let &[x1, y1, x2, y2, ..] = border else {
            return Err(GeometryError::TooFewCoordinates(border.len()));
        };
        if !(x1.is_finite() && y1.is_finite() && x2.is_finite() && y2.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Signed width; zero or negative means a degenerate rectangle.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn midpoint(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn left(&self) -> f64 {
        self.x1.min(self.x2)
    }

    pub fn right(&self) -> f64 {
        self.x1.max(self.x2)
    }

    pub fn top(&self) -> f64 {
        self.y1.min(self.y2)
    }

    pub fn bottom(&self) -> f64 {
        self.y1.max(self.y2)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// Open-interval overlap test against `[0, w) x [0, h)` style bounds:
    /// touching edges do not count as overlap.
    pub fn overlaps(&self, other: &WorldRect) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

/// Parse a `{ name: territory }` JSON document.
pub fn parse_territories(json: &str) -> Result<TerritoryMap, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::{GeometryError, Territory, WorldRect, parse_territories};

    #[test]
    fn from_border_rejects_short_borders() {
        assert_eq!(
            WorldRect::from_border(&[0.0, 1.0, 2.0]),
            Err(GeometryError::TooFewCoordinates(3))
        );
        assert_eq!(
            WorldRect::from_border(&[]),
            Err(GeometryError::TooFewCoordinates(0))
        );
    }

    #[test]
    fn from_border_rejects_non_finite() {
        assert_eq!(
            WorldRect::from_border(&[0.0, f64::NAN, 2.0, 3.0]),
            Err(GeometryError::NonFinite)
        );
        assert_eq!(
            WorldRect::from_border(&[0.0, 0.0, f64::INFINITY, 3.0]),
            Err(GeometryError::NonFinite)
        );
    }

    #[test]
    fn from_border_ignores_trailing_coordinates() {
        let rect = WorldRect::from_border(&[1.0, 2.0, 3.0, 4.0, 99.0]).expect("valid");
        assert_eq!(rect, WorldRect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn inverted_border_has_negative_width_but_sorted_edges() {
        let rect = WorldRect::new(10.0, 10.0, 0.0, 5.0);
        assert_eq!(rect.width(), -10.0);
        assert_eq!(rect.left(), 0.0);
        assert_eq!(rect.right(), 10.0);
        assert_eq!(rect.top(), 5.0);
        assert_eq!(rect.bottom(), 10.0);
    }

    #[test]
    fn overlap_excludes_touching_edges() {
        let screen = WorldRect::new(0.0, 0.0, 800.0, 600.0);
        assert!(WorldRect::new(-50.0, -50.0, 10.0, 10.0).overlaps(&screen));
        assert!(!WorldRect::new(-50.0, -50.0, 0.0, 10.0).overlaps(&screen));
        assert!(!WorldRect::new(800.0, 0.0, 900.0, 10.0).overlaps(&screen));
    }

    #[test]
    fn territory_json_defaults_missing_fields() {
        let map = parse_territories(
            r#"{
                "Detlas": { "border": [0, 0, 100, 100], "trading_routes": ["Ragni"] },
                "Ragni": { "border": [200, 0, 300, 100] },
                "Broken": {}
            }"#,
        )
        .expect("parse territories");
        assert_eq!(map.len(), 3);
        assert_eq!(map["Detlas"].trading_routes, vec!["Ragni".to_string()]);
        assert!(map["Ragni"].trading_routes.is_empty());
        assert_eq!(
            map["Broken"].rect(),
            Err(GeometryError::TooFewCoordinates(0))
        );
    }

    #[test]
    fn with_routes_collects_names() {
        let t = Territory::new([0.0, 0.0, 1.0, 1.0]).with_routes(["A", "B"]);
        assert_eq!(t.trading_routes, vec!["A".to_string(), "B".to_string()]);
    }
}
