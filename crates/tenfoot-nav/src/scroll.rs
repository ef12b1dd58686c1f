#![forbid(unsafe_code)]

//! Scroll/viewport coordination: keep the focused node visible without
//! fighting the resolver's geometry.
//!
//! Two nested scroll contexts react to every focus change, in order:
//! the node's list container (horizontal carousel or vertical list), then
//! the page itself when the node sits in a section. Both animate smoothly;
//! a new request for a container supersedes any in-flight animation for
//! that container, so rapid key repeat never queues a backlog.
//!
//! The coordinator owns no timers. The host passes a [`Timestamp`] into
//! every call and applies the offsets read back from [`ScrollCoordinator::offset_at`].

use std::collections::HashMap;
use std::time::Duration;

use tenfoot_core::event::Axis;
use tenfoot_core::geometry::Rect;
use tenfoot_core::time::Timestamp;
use tracing::trace;

use crate::registry::{FocusableNode, Section};
use crate::tuning::NavTuning;

/// Offsets closer than this are treated as already in place.
const SCROLL_EPSILON: f32 = 0.5;

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

/// A scrollable list container, registered by the host on mount.
///
/// `viewport` is the container's visible box in document pixels;
/// `content_extent` is the total content length along the scroll axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollContainer {
    pub id: String,
    pub viewport: Rect,
    pub content_extent: f32,
    pub axis: Axis,
    /// Spacing kept between a revealed item and the viewport edge.
    pub item_gap: f32,
}

impl ScrollContainer {
    /// Create a container with no content extent and the default 16px gap.
    #[must_use]
    pub fn new(id: impl Into<String>, viewport: Rect, axis: Axis) -> Self {
        Self {
            id: id.into(),
            viewport,
            content_extent: 0.0,
            axis,
            item_gap: 16.0,
        }
    }

    /// Builder: total scrollable content length along the axis.
    #[must_use]
    pub fn with_content_extent(mut self, extent: f32) -> Self {
        self.content_extent = extent;
        self
    }

    /// Builder: item spacing margin.
    #[must_use]
    pub fn with_item_gap(mut self, gap: f32) -> Self {
        self.item_gap = gap;
        self
    }

    fn viewport_len(&self) -> f32 {
        match self.axis {
            Axis::Horizontal => self.viewport.width,
            Axis::Vertical => self.viewport.height,
        }
    }

    fn max_scroll(&self) -> f32 {
        (self.content_extent - self.viewport_len()).max(0.0)
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// An in-flight smooth scroll. Superseded, never stacked.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    started: Timestamp,
    duration: Duration,
}

impl ScrollAnimation {
    fn sample(&self, now: Timestamp) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_since(self.started).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * ease_out_cubic(t)
    }

    fn finished(&self, now: Timestamp) -> bool {
        now.saturating_since(self.started) >= self.duration
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let u = 1.0 - t;
    1.0 - u * u * u
}

#[derive(Debug)]
struct ContainerState {
    spec: ScrollContainer,
    offset: f32,
    animation: Option<ScrollAnimation>,
}

impl ContainerState {
    fn offset_at(&self, now: Timestamp) -> f32 {
        self.animation.map_or(self.offset, |a| a.sample(now))
    }

    fn animate_to(&mut self, target: f32, now: Timestamp, duration: Duration) {
        let current = self.offset_at(now);
        if (target - current).abs() < SCROLL_EPSILON {
            return;
        }
        // Supersede: restart from wherever the in-flight animation got to.
        self.offset = current;
        self.animation = Some(ScrollAnimation {
            from: current,
            to: target,
            started: now,
            duration,
        });
    }
}

#[derive(Debug)]
struct PageState {
    viewport_height: f32,
    document_height: f32,
    offset: f32,
    animation: Option<ScrollAnimation>,
}

impl PageState {
    fn offset_at(&self, now: Timestamp) -> f32 {
        self.animation.map_or(self.offset, |a| a.sample(now))
    }

    fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport_height).max(0.0)
    }
}

// ---------------------------------------------------------------------------
// ScrollCoordinator
// ---------------------------------------------------------------------------

/// Reacts to focus changes by scrolling list containers and the page.
#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    containers: HashMap<String, ContainerState>,
    page: Option<PageState>,
}

impl ScrollCoordinator {
    /// Create a coordinator with no containers and no page metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a container. A re-registration (layout change) keeps the
    /// current offset, clamped to the new extent.
    pub fn register_container(&mut self, spec: ScrollContainer) {
        let id = spec.id.clone();
        match self.containers.get_mut(&id) {
            Some(state) => {
                state.offset = state.offset.min(spec.max_scroll());
                state.spec = spec;
            }
            None => {
                self.containers.insert(
                    id,
                    ContainerState {
                        spec,
                        offset: 0.0,
                        animation: None,
                    },
                );
            }
        }
    }

    /// Remove a container, cancelling any in-flight animation with it.
    pub fn unregister_container(&mut self, id: &str) {
        self.containers.remove(id);
    }

    /// Set (or refresh) page-level scroll metrics. Offsets are preserved
    /// and clamped.
    pub fn set_page_metrics(&mut self, viewport_height: f32, document_height: f32) {
        match self.page.as_mut() {
            Some(page) => {
                page.viewport_height = viewport_height;
                page.document_height = document_height;
                page.offset = page.offset.min(page.max_scroll());
            }
            None => {
                self.page = Some(PageState {
                    viewport_height,
                    document_height,
                    offset: 0.0,
                    animation: None,
                });
            }
        }
    }

    /// Container offset as of the last [`tick`](Self::tick).
    #[must_use]
    pub fn offset(&self, id: &str) -> Option<f32> {
        self.containers.get(id).map(|s| s.offset)
    }

    /// Container offset sampled mid-animation.
    #[must_use]
    pub fn offset_at(&self, id: &str, now: Timestamp) -> Option<f32> {
        self.containers.get(id).map(|s| s.offset_at(now))
    }

    /// Page offset as of the last tick, if page metrics were set.
    #[must_use]
    pub fn page_offset(&self) -> Option<f32> {
        self.page.as_ref().map(|p| p.offset)
    }

    /// Page offset sampled mid-animation.
    #[must_use]
    pub fn page_offset_at(&self, now: Timestamp) -> Option<f32> {
        self.page.as_ref().map(|p| p.offset_at(now))
    }

    /// Advance animations: commit sampled offsets and drop finished ones.
    pub fn tick(&mut self, now: Timestamp) {
        for state in self.containers.values_mut() {
            if let Some(anim) = state.animation {
                state.offset = anim.sample(now);
                if anim.finished(now) {
                    state.animation = None;
                }
            }
        }
        if let Some(page) = self.page.as_mut()
            && let Some(anim) = page.animation
        {
            page.offset = anim.sample(now);
            if anim.finished(now) {
                page.animation = None;
            }
        }
    }

    /// React to a focus change: list-local scroll first, then page scroll.
    /// Both may fire for the same change (nested scroll contexts).
    pub fn on_focus_changed(
        &mut self,
        node: &FocusableNode,
        section: Option<&Section>,
        now: Timestamp,
        tuning: &NavTuning,
    ) {
        if let Some(container_id) = node.container.as_deref()
            && let Some(state) = self.containers.get_mut(container_id)
        {
            reveal_in_container(state, &node.bounds, now, tuning);
        }
        if let Some(section) = section
            && let Some(page) = self.page.as_mut()
        {
            position_section(page, section, now, tuning);
        }
    }
}

/// Scroll a list container the minimum distance that brings the node (plus
/// item gap) fully into view; short lists center the node instead.
fn reveal_in_container(
    state: &mut ContainerState,
    bounds: &Rect,
    now: Timestamp,
    tuning: &NavTuning,
) {
    let spec = &state.spec;
    let viewport_len = spec.viewport_len();
    if viewport_len <= 0.0 {
        return;
    }
    let current = state.offset_at(now);

    // Content-space interval of the focused item. Bounds are document
    // coordinates, so the applied offset is added back in.
    let (viewport_start, item_start_doc, item_len) = match spec.axis {
        Axis::Horizontal => (spec.viewport.left(), bounds.left(), bounds.width),
        Axis::Vertical => (spec.viewport.top(), bounds.top(), bounds.height),
    };
    let item_start = item_start_doc - viewport_start + current;
    let item_end = item_start + item_len;
    let gap = spec.item_gap;

    let target = if spec.content_extent <= viewport_len {
        0.0
    } else if spec.content_extent <= tuning.short_list_factor * viewport_len {
        (item_start + item_len / 2.0) - viewport_len / 2.0
    } else if item_start - gap < current {
        item_start - gap
    } else if item_end + gap > current + viewport_len {
        item_end + gap - viewport_len
    } else {
        return;
    };
    let target = target.clamp(0.0, spec.max_scroll());
    trace!(container = %spec.id, target, "revealing focused node");
    let duration = tuning.scroll_duration;
    state.animate_to(target, now, duration);
}

/// Position a section comfortably in the page viewport: a slice of viewport
/// above it, or centered when the section is short.
fn position_section(page: &mut PageState, section: &Section, now: Timestamp, tuning: &NavTuning) {
    let viewport = page.viewport_height;
    if viewport <= 0.0 {
        return;
    }
    let section_top = section.bounds.top();
    let section_height = section.bounds.height;

    let mut target = section_top - viewport * tuning.section_top_ratio;
    if section_height < tuning.section_center_threshold * viewport {
        target = section_top - (viewport - section_height) / 2.0;
    }
    let target = target.clamp(0.0, page.max_scroll());

    let current = page.offset_at(now);
    if (target - current).abs() < SCROLL_EPSILON {
        return;
    }
    page.offset = current;
    page.animation = Some(ScrollAnimation {
        from: current,
        to: target,
        started: now,
        duration: tuning.scroll_duration,
    });
}

// =========================================================================
// Tests
// =========================================================================
