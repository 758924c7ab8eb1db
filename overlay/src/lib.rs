//! Territory and trade-route overlay compositor.
//!
//! Territories are drawn as flat-colored quads in a single indexed draw;
//! selection and hover state travel inside the vertex color and are decoded
//! in the fragment stage (see [`channel`]). Routes are drawn in a second pass.

pub mod batch;
pub mod channel;
pub mod claims;
pub mod compositor;
pub mod config;
pub mod gate;
pub mod gpu;
pub mod resolve;
pub mod routes;
pub mod spatial;
pub mod surface;
pub mod territories;
pub mod viewport;

pub use claims::{ClaimStore, GuildRegistry, RedrawSuspension};
pub use compositor::{Compositor, FrameMetrics};
pub use config::OverlayDefaults;
pub use gate::InvalidationGate;
pub use resolve::{ClaimLookup, GuildColorLookup, OverlayMode};
pub use surface::{CpuSurface, FrameGeometry, OverlaySurface};
pub use territories::TerritoryStore;
pub use viewport::Viewport;
