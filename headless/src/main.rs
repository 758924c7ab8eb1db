mod config;
mod loader;
mod services;

use std::sync::Arc;

use sequoia_overlay::gpu::GpuOverlay;
use sequoia_overlay::{
    ClaimStore, Compositor, CpuSurface, GuildRegistry, InvalidationGate, OverlayDefaults,
    OverlaySurface, TerritoryStore, Viewport,
};
use tracing_subscriber::EnvFilter;

use crate::config::SurfaceKind;
use crate::services::frame_loop::CameraPath;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let defaults = OverlayDefaults::from_env();
    let gate = Arc::new(InvalidationGate::new());
    let territories = Arc::new(TerritoryStore::new(&defaults, Arc::clone(&gate)));
    let claims = Arc::new(ClaimStore::new(Arc::clone(&gate)));
    let guilds = Arc::new(GuildRegistry::new(Arc::clone(&gate)));

    match config::territories_path() {
        Some(path) => match loader::load_territories(&path).await {
            Ok(map) => territories.replace_all(map),
            Err(e) => tracing::error!("failed to load territories from {}: {e}", path.display()),
        },
        None => tracing::warn!("SEQUOIA_TERRITORIES_PATH not set, rendering an empty map"),
    }

    if let Some(path) = config::guilds_path() {
        match loader::load_guilds(&path).await {
            Ok(entries) => {
                guilds.load_entries(&entries);
            }
            Err(e) => tracing::warn!("failed to load guilds from {}: {e}", path.display()),
        }
    }

    let pending_claims = match config::claims_path() {
        Some(path) => match loader::load_claims(&path).await {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("failed to load claims from {}: {e}", path.display());
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let compositor = Arc::new(Compositor::new(
        &defaults,
        Arc::clone(&territories),
        claims.clone(),
        guilds.clone(),
        Arc::clone(&gate),
    ));

    let (width, height) = sequoia_overlay::config::screen_size();
    let mut viewport = Viewport::default();
    if let Some(bounds) = territories.read().grid.world_bounds() {
        viewport.fit_bounds(bounds, f64::from(width), f64::from(height));
    }

    // Select the first territory so the blink path is exercised.
    let first = territories.read().territories.keys().min().cloned();
    if let Some(name) = first {
        tracing::info!("selecting {name}");
        compositor.select_territory(&name);
    }

    let mut surface: Box<dyn OverlaySurface> = match config::surface_kind() {
        SurfaceKind::Gpu => match GpuOverlay::headless(width, height).await {
            Ok(gpu) => Box::new(gpu),
            Err(e) => {
                tracing::warn!("{e}; falling back to the CPU surface");
                Box::new(CpuSurface::new(width, height))
            }
        },
        SurfaceKind::Cpu => Box::new(CpuSurface::new(width, height)),
    };

    let import = tokio::spawn(services::claim_import::run(Arc::clone(&claims), pending_claims));

    let summary = services::frame_loop::run(
        Arc::clone(&compositor),
        surface.as_mut(),
        viewport,
        CameraPath {
            pan: config::camera_pan(),
            zoom: config::camera_zoom(),
        },
        sequoia_overlay::config::frame_count(),
        config::frame_interval(),
    )
    .await;

    match import.await {
        Ok(applied) => tracing::info!(applied, claims = claims.len(), "claims in store"),
        Err(e) => tracing::error!("claim import panicked: {e}"),
    }

    match serde_json::to_string(&summary) {
        Ok(json) => tracing::info!("run summary: {json}"),
        Err(e) => tracing::warn!("failed to serialize run summary: {e}"),
    }
}
