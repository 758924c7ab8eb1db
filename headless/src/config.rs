use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
/// Wheel delta applied per frame; negative zooms in.
pub const DEFAULT_CAMERA_ZOOM: f64 = -2.0;

/// Which [`OverlaySurface`](sequoia_overlay::OverlaySurface) the runner draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Cpu,
    Gpu,
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn territories_path() -> Option<PathBuf> {
    env_path("SEQUOIA_TERRITORIES_PATH")
}

pub fn guilds_path() -> Option<PathBuf> {
    env_path("SEQUOIA_GUILDS_PATH")
}

pub fn claims_path() -> Option<PathBuf> {
    env_path("SEQUOIA_CLAIMS_PATH")
}

pub fn frame_interval() -> Duration {
    std::env::var("SEQUOIA_FRAME_INTERVAL_MS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(DEFAULT_FRAME_INTERVAL_MS))
}

/// Screen-space camera drift per frame, `SEQUOIA_CAMERA_PAN=dx,dy`.
pub fn camera_pan() -> (f64, f64) {
    std::env::var("SEQUOIA_CAMERA_PAN")
        .ok()
        .and_then(|value| {
            let (dx, dy) = value.trim().split_once(',')?;
            let dx = dx.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            let dy = dy.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some((dx, dy))
        })
        .unwrap_or((0.0, 0.0))
}

pub fn camera_zoom() -> f64 {
    std::env::var("SEQUOIA_CAMERA_ZOOM")
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_CAMERA_ZOOM)
}

pub fn surface_kind() -> SurfaceKind {
    std::env::var("SEQUOIA_SURFACE")
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            if normalized == "gpu" {
                SurfaceKind::Gpu
            } else {
                SurfaceKind::Cpu
            }
        })
        .unwrap_or(SurfaceKind::Cpu)
}
