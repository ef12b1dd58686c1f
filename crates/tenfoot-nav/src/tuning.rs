#![forbid(unsafe_code)]

//! Engine tunables, constructor-injected so every consumer sees one
//! consistent set of constants.

use std::time::Duration;

/// Tunable constants for resolution, debouncing, and scrolling.
///
/// Defaults match the shipped TV experience; hosts override per context
/// (e.g. a coarser margin for low-density launcher screens).
#[derive(Debug, Clone, PartialEq)]
pub struct NavTuning {
    /// Tolerance treating near-aligned edges as adjacent during the
    /// directional validity check, in pixels.
    pub direction_margin: f32,
    /// Weight of cross-axis center misalignment in the distance score.
    pub cross_axis_weight: f32,
    /// Lockout window serializing consecutive resolutions.
    pub debounce_lockout: Duration,
    /// Duration of smooth scroll animations.
    pub scroll_duration: Duration,
    /// Lists with content no longer than this multiple of the viewport
    /// center the focused item instead of minimally revealing it.
    pub short_list_factor: f32,
    /// Section placement: fraction of the viewport left above a section.
    pub section_top_ratio: f32,
    /// Sections shorter than this fraction of the viewport are centered.
    pub section_center_threshold: f32,
}

impl Default for NavTuning {
    fn default() -> Self {
        Self {
            direction_margin: 10.0,
            cross_axis_weight: 0.1,
            debounce_lockout: Duration::from_millis(100),
            scroll_duration: Duration::from_millis(200),
            short_list_factor: 1.5,
            section_top_ratio: 0.10,
            section_center_threshold: 0.80,
        }
    }
}
