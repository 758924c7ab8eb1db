//! Channel encoding of render state, and the matching decode rule.
//!
//! The CPU stores two flags in color channels: `green == 255` marks the
//! selected territory, `alpha == 255` marks the hovered one. The fragment
//! stage (`gpu/overlay.wgsl`, or [`shade`] on the CPU) decodes them with a
//! 0.95 threshold and applies the hover darkening and selection pulse with
//! per-draw uniforms, so animating `blink_factor` never re-batches geometry.

use sequoia_shared::Rgba;
use sequoia_shared::colors::luminance;

/// Full blink cycle; the first half is drawn dimmed.
pub const BLINK_PERIOD_MS: f64 = 660.0;
pub const BLINK_HALF_PERIOD_MS: f64 = 330.0;
const BLINK_DIM: f64 = 0.8;
const SELECTED_RED_BOOST: f64 = 1.2;

/// Normalized channel value above which a flag is considered set.
pub const FLAG_THRESHOLD: f32 = 0.95;

/// True during the dimmed half of the blink cycle.
pub fn blink_dimmed(blink_timer_secs: f64) -> bool {
    (blink_timer_secs * 1000.0).rem_euclid(BLINK_PERIOD_MS) < BLINK_HALF_PERIOD_MS
}

/// Continuous pulse in `[0, 1]` sharing the blink period: 0 at the start
/// of a cycle, 1 at the half-way point.
pub fn blink_factor(blink_timer_secs: f64) -> f32 {
    let phase = (blink_timer_secs * 1000.0).rem_euclid(BLINK_PERIOD_MS) / BLINK_PERIOD_MS;
    (0.5 - 0.5 * (phase * std::f64::consts::TAU).cos()) as f32
}

/// Mark a color pair as the selected territory.
pub fn encode_selected(fill: Rgba, border: Rgba, blink_timer_secs: f64) -> (Rgba, Rgba) {
    let (mut fill, mut border) = if blink_dimmed(blink_timer_secs) {
        (fill.scale_alpha(BLINK_DIM), border.scale_alpha(BLINK_DIM))
    } else {
        (fill, border)
    };
    // Both channels take the boosted fill red so the pair decodes alike.
    let red = fill.scale_rgb(SELECTED_RED_BOOST).r;
    fill.r = red;
    fill.g = 255;
    border.r = red;
    border.g = 255;
    (fill, border)
}

/// Mark a color pair as hovered.
pub fn encode_hovered(fill: Rgba, border: Rgba) -> (Rgba, Rgba) {
    (fill.with_alpha(255), border.with_alpha(255))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFlags {
    pub selected: bool,
    pub hovered: bool,
}

pub fn decode_flags(overlay: [f32; 4]) -> StateFlags {
    StateFlags {
        selected: overlay[1] > FLAG_THRESHOLD,
        hovered: overlay[3] > FLAG_THRESHOLD,
    }
}

/// Per-draw uniforms consumed by the fragment stage. Layout matches the
/// WGSL `Effects` struct.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderUniforms {
    pub fill_opacity: f32,
    pub blink_factor: f32,
    pub hover_factor: f32,
    pub _pad: f32,
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self {
            fill_opacity: 1.0,
            blink_factor: 0.0,
            hover_factor: 0.0,
            _pad: 0.0,
        }
    }
}

/// Territory color after the hover/selection effects, before blending.
/// Returns straight (non-premultiplied) `[r, g, b, a]`.
pub fn apply_effects(overlay: [f32; 4], uniforms: &ShaderUniforms) -> [f32; 4] {
    let flags = decode_flags(overlay);
    let mut color = [overlay[0], overlay[1], overlay[2]];
    let mut alpha = overlay[3] * uniforms.fill_opacity;

    if uniforms.hover_factor > 0.0 && flags.hovered && !flags.selected {
        alpha *= 0.2;
        color = color.map(|c| c * 0.4);
        let gray = luminance(color[0], color[1], color[2]);
        color = color.map(|c| gray + (c - gray) * 0.5);
    }

    if flags.selected {
        let pulse = 1.0 + 0.5 * uniforms.blink_factor;
        color = color.map(|c| c * pulse);
        alpha *= pulse;
    }

    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Full fragment rule: effects, then blend over `background` keeping the
/// background alpha. Color is clamped to `[0, 1]` before blending, as a
/// unorm render target does with fragment output.
pub fn shade(overlay: [f32; 4], background: [f32; 4], uniforms: &ShaderUniforms) -> [f32; 4] {
    if overlay[3] == 0.0 {
        return background;
    }
    let [r, g, b, a] = apply_effects(overlay, uniforms);
    let mix = |bg: f32, fg: f32| bg + (fg.clamp(0.0, 1.0) - bg) * a;
    [
        mix(background[0], r),
        mix(background[1], g),
        mix(background[2], b),
        background[3],
    ]
}
