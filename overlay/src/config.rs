use sequoia_shared::Rgba;

pub const DEFAULT_ROUTE_THICKNESS: f32 = 3.0;
pub const DEFAULT_ROUTE_COLOR: Rgba = Rgba::new(255, 100, 100, 220);
pub const DEFAULT_FILL_COLOR: Rgba = Rgba::new(255, 255, 255, 60);
pub const DEFAULT_BORDER_COLOR: Rgba = Rgba::new(255, 255, 255, 180);

/// Alpha forced onto routes created without an explicit color.
pub const ROUTE_VISIBLE_ALPHA: u8 = 220;

/// Screen-space sanity window; transformed rectangles outside it are dropped.
pub const SCREEN_SANITY_MIN: f64 = -10_000.0;
pub const SCREEN_SANITY_MAX: f64 = 20_000.0;

/// Pan deltas (screen pixels) below this do not invalidate cached geometry.
/// Any scale change invalidates: its on-screen shift grows with world distance.
pub const VIEW_PAN_EPSILON: f64 = 0.1;

/// Blink timer wraps back to zero after this many seconds.
pub const BLINK_TIMER_WRAP_SECS: f64 = 60.0;

pub const DEFAULT_SCREEN_WIDTH: u32 = 1280;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 720;
pub const DEFAULT_FRAME_COUNT: u32 = 120;

/// Compositor-wide defaults normally supplied by the territory manager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayDefaults {
    pub fill_color: Rgba,
    pub border_color: Rgba,
    pub route_color: Rgba,
    pub route_thickness: f32,
}

impl Default for OverlayDefaults {
    fn default() -> Self {
        Self {
            fill_color: DEFAULT_FILL_COLOR,
            border_color: DEFAULT_BORDER_COLOR,
            route_color: DEFAULT_ROUTE_COLOR,
            route_thickness: DEFAULT_ROUTE_THICKNESS,
        }
    }
}

impl OverlayDefaults {
    pub fn from_env() -> Self {
        Self {
            fill_color: fill_color(),
            border_color: border_color(),
            route_color: route_color(),
            route_thickness: route_thickness(),
        }
    }
}

fn env_color(key: &str) -> Option<Rgba> {
    std::env::var(key)
        .ok()
        .and_then(|value| Rgba::from_hex(&value))
}

pub fn route_thickness() -> f32 {
    std::env::var("OVERLAY_ROUTE_THICKNESS")
        .ok()
        .and_then(|value| value.trim().parse::<f32>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(DEFAULT_ROUTE_THICKNESS)
}

pub fn route_color() -> Rgba {
    env_color("OVERLAY_ROUTE_COLOR").unwrap_or(DEFAULT_ROUTE_COLOR)
}

pub fn fill_color() -> Rgba {
    env_color("OVERLAY_FILL_COLOR").unwrap_or(DEFAULT_FILL_COLOR)
}

pub fn border_color() -> Rgba {
    env_color("OVERLAY_BORDER_COLOR").unwrap_or(DEFAULT_BORDER_COLOR)
}

/// Parse a `WIDTHxHEIGHT` screen size such as `1280x720`.
pub fn parse_screen_size(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let w = w.trim().parse::<u32>().ok().filter(|w| *w > 0)?;
    let h = h.trim().parse::<u32>().ok().filter(|h| *h > 0)?;
    Some((w, h))
}

pub fn screen_size() -> (u32, u32) {
    std::env::var("SEQUOIA_SCREEN_SIZE")
        .ok()
        .and_then(|value| parse_screen_size(&value))
        .unwrap_or((DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT))
}

pub fn frame_count() -> u32 {
    std::env::var("SEQUOIA_FRAMES")
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_FRAME_COUNT)
}
