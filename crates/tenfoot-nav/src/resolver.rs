#![forbid(unsafe_code)]

//! Directional resolution: given the focused node and a direction, pick
//! the best next target.
//!
//! Resolution is a pure read over registry state, layered as:
//!
//! 1. group-local ±1 step when the group's orientation matches the
//!    direction's axis (with optional wrap-around),
//! 2. global geometric search over every other enabled node,
//! 3. section fallback for Up/Down when the geometric search leaves the
//!    current section or finds nothing.
//!
//! # Invariants
//!
//! 1. Disabled nodes neither receive focus nor block the search.
//! 2. Ties in the distance score go to the earlier-registered candidate,
//!    so identical layouts always resolve identically.
//! 3. A registry mid-update (members unmounting under a held key) never
//!    panics resolution; missing ids are simply absent candidates.
//!
//! # Complexity
//!
//! | Operation | Time |
//! |-----------|------|
//! | group-local step | O(members) |
//! | geometric search | O(nodes) |
//! | section fallback | O(sections + nodes) |

use tenfoot_core::event::Direction;

use crate::registry::{FocusRegistry, FocusableNode, NodeId};
use crate::tuning::NavTuning;

/// First-focus policy: the designated initial-focus node when still valid,
/// else the first registered node that can take focus.
#[must_use = "use the returned target id (if any)"]
pub fn first_focus(registry: &FocusRegistry) -> Option<NodeId> {
    if let Some(id) = registry.initial_focus()
        && registry.is_focusable(id)
        && registry.allowed_by_trap(id)
    {
        return Some(id.to_string());
    }
    registry.first_focusable().map(str::to_string)
}

/// Resolve the next focus target for `direction` from `current_id`.
///
/// `None` means the key press is a no-op: focus stays put. Never panics,
/// even against a registry whose nodes are unmounting concurrently with
/// the key press.
#[must_use = "use the returned target id (if any)"]
pub fn resolve(
    registry: &FocusRegistry,
    current_id: &str,
    direction: Direction,
    tuning: &NavTuning,
) -> Option<NodeId> {
    let current = registry.node(current_id)?;

    if let Some(target) = group_step(registry, current, direction) {
        return Some(target);
    }

    let global = spatial_search(registry, current, direction, tuning);

    if direction.is_vertical()
        && let Some(section_id) = current.section.as_deref()
    {
        let leaves_section = match &global {
            None => true,
            Some(target) => registry
                .node(target)
                .is_some_and(|t| t.section.as_deref() != Some(section_id)),
        };
        if leaves_section
            && let Some(target) = section_fallback(registry, section_id, direction)
        {
            return Some(target);
        }
    }

    global
}

/// Group-local movement: step ±1 through the group's enabled members in
/// stored order, wrapping when the group allows it. Returns `None` when the
/// group does not handle this axis or the step runs off a non-wrapping end.
fn group_step(
    registry: &FocusRegistry,
    current: &FocusableNode,
    direction: Direction,
) -> Option<NodeId> {
    let group = registry.group(current.group.as_deref()?)?;
    if !group.orientation.handles(direction.axis()) {
        return None;
    }

    // Prune unmounted and disabled members lazily; stored order is
    // navigational order.
    let members: Vec<&str> = group
        .members
        .iter()
        .map(String::as_str)
        .filter(|id| registry.is_focusable(id))
        .collect();
    let idx = members.iter().position(|id| *id == current.id)?;

    let step: isize = if direction.is_backward() { -1 } else { 1 };
    let next = idx as isize + step;
    let len = members.len() as isize;

    let target = if (0..len).contains(&next) {
        members[next as usize]
    } else if group.wrap_around && len > 0 {
        members[next.rem_euclid(len) as usize]
    } else {
        return None;
    };

    registry
        .allowed_by_trap(target)
        .then(|| target.to_string())
}

/// Global candidate search: every registered, enabled node on the correct
/// side of `current`, scored by facing-edge gap plus weighted cross-axis
/// center misalignment. Lowest score wins; ties keep the earlier-registered
/// candidate.
fn spatial_search(
    registry: &FocusRegistry,
    current: &FocusableNode,
    direction: Direction,
    tuning: &NavTuning,
) -> Option<NodeId> {
    let cur = &current.bounds;
    let cur_center = cur.center();
    let margin = tuning.direction_margin;

    let mut best: Option<(&str, f32)> = None;
    for candidate in registry.nodes_in_order() {
        if candidate.id == current.id
            || candidate.disabled
            || !registry.allowed_by_trap(&candidate.id)
        {
            continue;
        }
        let rect = &candidate.bounds;
        let center = rect.center();

        // Valid iff the candidate lies on the correct side, with a small
        // margin treating near-aligned edges as adjacent. The gap is the
        // distance between the facing edges, clamped at zero so the margin
        // cannot reward overlap.
        let (valid, gap, cross) = match direction {
            Direction::Left => (
                rect.right() <= cur.left() + margin,
                cur.left() - rect.right(),
                (center.y - cur_center.y).abs(),
            ),
            Direction::Right => (
                rect.left() >= cur.right() - margin,
                rect.left() - cur.right(),
                (center.y - cur_center.y).abs(),
            ),
            Direction::Up => (
                rect.bottom() <= cur.top() + margin,
                cur.top() - rect.bottom(),
                (center.x - cur_center.x).abs(),
            ),
            Direction::Down => (
                rect.top() >= cur.bottom() - margin,
                rect.top() - cur.bottom(),
                (center.x - cur_center.x).abs(),
            ),
        };
        if !valid {
            continue;
        }

        let score = gap.max(0.0) + tuning.cross_axis_weight * cross;
        // Strict < keeps the first-registered candidate on ties.
        if best.is_none_or(|(_, best_score)| score < best_score) {
            best = Some((candidate.id.as_str(), score));
        }
    }

    best.map(|(id, _)| id.to_string())
}

/// Page-level vertical fallback: the first enabled node of the adjacent
/// section in document order.
fn section_fallback(
    registry: &FocusRegistry,
    current_section: &str,
    direction: Direction,
) -> Option<NodeId> {
    let order = registry.section_order();
    let idx = order.iter().position(|s| s == current_section)?;
    let adjacent = match direction {
        Direction::Down => idx.checked_add(1).filter(|i| *i < order.len())?,
        Direction::Up => idx.checked_sub(1)?,
        Direction::Left | Direction::Right => return None,
    };
    let target_section = order[adjacent].as_str();

    registry
        .nodes_in_order()
        .find(|n| {
            n.section.as_deref() == Some(target_section)
                && !n.disabled
                && registry.allowed_by_trap(&n.id)
        })
        .map(|n| n.id.clone())
}

// =========================================================================
// Tests
// =========================================================================
