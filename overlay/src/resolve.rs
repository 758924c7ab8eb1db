//! Per-territory color resolution.
//!
//! Precedence, highest first: loadout selection, claim-edit session,
//! persistent claim, manager default. The result then gets the fixed
//! presentation transform and the selection/hover channel encoding.

use std::collections::HashSet;

use sequoia_shared::{GuildKey, Rgba};

use crate::channel;

/// Fill/border used for territories picked in a loadout session.
pub const LOADOUT_FILL: Rgba = Rgba::new(255, 255, 0, 120);
pub const LOADOUT_BORDER: Rgba = Rgba::new(255, 200, 0, 255);

/// Fill alpha after the presentation transform; keeps the map legible.
pub const FILL_ALPHA: u8 = 70;
const BORDER_BRIGHTEN: f64 = 1.5;

/// Persistent ownership lookup: territory name to owning guild.
pub trait ClaimLookup: Send + Sync {
    fn claim_for(&self, territory: &str) -> Option<GuildKey>;
}

/// Guild color lookup by `(name, tag)`.
pub trait GuildColorLookup: Send + Sync {
    fn guild_color(&self, guild: &GuildKey) -> Option<Rgba>;
}

/// The single active UI override. Entering one mode replaces the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OverlayMode {
    #[default]
    Normal,
    EditClaims {
        guild: GuildKey,
        claims: HashSet<String>,
    },
    Loadout {
        name: String,
        selected: HashSet<String>,
    },
}

impl OverlayMode {
    pub fn is_loadout_selected(&self, territory: &str) -> bool {
        matches!(self, Self::Loadout { selected, .. } if selected.contains(territory))
    }

    /// Guild of the edit session when it claims `territory`.
    pub fn editing_guild_for(&self, territory: &str) -> Option<&GuildKey> {
        match self {
            Self::EditClaims { guild, claims } if claims.contains(territory) => Some(guild),
            _ => None,
        }
    }
}

/// The territory currently selected and blinking.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub territory: String,
    /// Seconds since the selection started, wrapped by the compositor.
    pub blink_timer: f64,
}

/// Everything the resolver reads besides the territory name.
pub struct ResolveContext<'a> {
    pub mode: &'a OverlayMode,
    pub selection: Option<&'a Selection>,
    pub hovered: Option<&'a str>,
    pub claims: &'a dyn ClaimLookup,
    pub guilds: &'a dyn GuildColorLookup,
    pub default_fill: Rgba,
    pub default_border: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSource {
    Loadout,
    EditSession,
    Claim,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColors {
    pub fill: Rgba,
    pub border: Rgba,
    pub source: ColorSource,
}

pub fn resolve(name: &str, ctx: &ResolveContext<'_>) -> ResolvedColors {
    if ctx.mode.is_loadout_selected(name) {
        // Exact highlight colors: no presentation transform, no encoding.
        return ResolvedColors {
            fill: LOADOUT_FILL,
            border: LOADOUT_BORDER,
            source: ColorSource::Loadout,
        };
    }

    let (base, source) = base_color(name, ctx);
    let (fill, border) = match base {
        Some(color) => (color, color),
        None => (ctx.default_fill, ctx.default_border),
    };
    let (mut fill, mut border) = presentation(fill, border);

    let selected = ctx.selection.filter(|sel| sel.territory == name);
    if let Some(sel) = selected {
        (fill, border) = channel::encode_selected(fill, border, sel.blink_timer);
    } else if ctx.hovered == Some(name) {
        (fill, border) = channel::encode_hovered(fill, border);
    }

    ResolvedColors {
        fill,
        border,
        source,
    }
}

/// Override color from the edit session or the persistent claim, if any
/// resolves through the guild lookup.
fn base_color(name: &str, ctx: &ResolveContext<'_>) -> (Option<Rgba>, ColorSource) {
    if let Some(guild) = ctx.mode.editing_guild_for(name)
        && let Some(color) = ctx.guilds.guild_color(guild)
    {
        return (Some(color), ColorSource::EditSession);
    }
    if let Some(guild) = ctx.claims.claim_for(name)
        && let Some(color) = ctx.guilds.guild_color(&guild)
    {
        return (Some(color), ColorSource::Claim);
    }
    (None, ColorSource::Default)
}

/// Low fill alpha, opaque and brightened border.
fn presentation(fill: Rgba, border: Rgba) -> (Rgba, Rgba) {
    (
        fill.with_alpha(FILL_ALPHA),
        border.scale_rgb(BORDER_BRIGHTEN).with_alpha(255),
    )
}
