#![forbid(unsafe_code)]

//! Registry of focusable nodes, navigation groups, and page sections.
//!
//! The registry is the single owner of focus state. UI elements register on
//! mount, refresh their bounds on layout changes, and unregister on unmount;
//! the registry keeps `current_focus` valid across all of that churn.
//!
//! # Invariants
//!
//! 1. Node ids are unique; re-registering an id overwrites in place
//!    (last write wins) without disturbing first-registration order.
//! 2. `current_focus`, when set, names a registered, non-disabled node.
//!    Any mutation that would break this immediately re-resolves to a
//!    fallback (same group first, then any node, then `None`).
//! 3. At most one node is focused at any instant.
//! 4. Groups and sections never own member lifetimes; stale member ids are
//!    pruned lazily wherever members are read.
//!
//! All mutation is synchronous on the host's event loop; the registry has a
//! single writer by construction.

use std::collections::HashMap;
use std::collections::VecDeque;

use tenfoot_core::event::Axis;
use tenfoot_core::geometry::Rect;
use tracing::{debug, trace};

/// Unique identifier for a focusable node.
pub type NodeId = String;

// ---------------------------------------------------------------------------
// Node / group / section records
// ---------------------------------------------------------------------------

/// A single interactive element capable of holding directional focus.
///
/// Owned by the registry; the UI element keeps only its id. `bounds` is in
/// document pixels and is refreshed by the host on mount, resize, and
/// layout changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusableNode {
    pub id: NodeId,
    pub bounds: Rect,
    /// Group this node navigates within, if any.
    pub group: Option<String>,
    /// Page section the node belongs to, for coarse vertical fallback.
    pub section: Option<String>,
    /// Scrollable list container the node sits in, if any.
    pub container: Option<String>,
    /// Disabled nodes are never focus targets and never block search.
    pub disabled: bool,
}

impl FocusableNode {
    /// Create an enabled, ungrouped node.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            bounds,
            group: None,
            section: None,
            container: None,
            disabled: false,
        }
    }

    /// Builder: assign a navigation group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Builder: assign a page section.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Builder: assign a scroll container.
    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Builder: set the disabled flag.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Which directions a group intercepts before the global search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Grid groups defer both axes to the geometric search.
    Grid,
}

impl Orientation {
    /// Whether movement along `axis` is handled group-locally.
    #[must_use]
    pub const fn handles(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (Self::Horizontal, Axis::Horizontal) | (Self::Vertical, Axis::Vertical)
        )
    }
}

/// An ordered cluster of nodes sharing local directional semantics
/// (one carousel row, one settings column).
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationGroup {
    pub id: String,
    /// Insertion order is navigational order.
    pub members: Vec<NodeId>,
    pub orientation: Orientation,
    /// Stepping past the last member cycles to the first (and vice versa).
    pub wrap_around: bool,
}

impl NavigationGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new(id: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            id: id.into(),
            members: Vec::new(),
            orientation,
            wrap_around: false,
        }
    }

    /// Builder: set the member list.
    #[must_use]
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set wrap-around.
    #[must_use]
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap_around = wrap;
        self
    }
}

/// A page-level grouping of rows used for coarse Up/Down fallback.
/// Registration order is document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub bounds: Rect,
}

impl Section {
    /// Create a section.
    #[must_use]
    pub fn new(id: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            bounds,
        }
    }
}

// ---------------------------------------------------------------------------
// Events and traps
// ---------------------------------------------------------------------------

/// Focus transitions emitted by the registry.
///
/// UI bindings subscribe by draining these each host tick; the registry
/// never calls back into the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    /// A node gained focus with no predecessor.
    Gained { id: NodeId },
    /// The focused node was lost (unregistered or disabled) or blurred.
    Lost { id: NodeId },
    /// Focus moved between two live nodes.
    Moved { from: NodeId, to: NodeId },
    /// The focused node was activated.
    Selected { id: NodeId },
}

/// An active focus trap: while present, only the trap group's members can
/// receive focus. Used for auxiliary panels (subtitles, episode list).
#[derive(Debug, Clone)]
struct FocusTrap {
    group: String,
    return_focus: Option<NodeId>,
}

// ---------------------------------------------------------------------------
// FocusRegistry
// ---------------------------------------------------------------------------

/// Store of focusable nodes, groups, and sections, plus the focus state.
#[derive(Debug, Default)]
pub struct FocusRegistry {
    nodes: HashMap<NodeId, FocusableNode>,
    /// First-registration order; upserts do not reorder.
    order: Vec<NodeId>,
    groups: HashMap<String, NavigationGroup>,
    sections: HashMap<String, Section>,
    /// Registration order of sections (document order).
    section_order: Vec<String>,
    current: Option<NodeId>,
    initial_focus: Option<NodeId>,
    trap_stack: Vec<FocusTrap>,
    events: VecDeque<FocusEvent>,
}

impl FocusRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Node registration ---

    /// Idempotent upsert keyed by id; last registration wins. Tolerates
    /// re-render churn, so a duplicate id is diagnostic-level only.
    pub fn register(&mut self, node: FocusableNode) {
        let id = node.id.clone();
        let disables_current = node.disabled && self.current.as_deref() == Some(id.as_str());
        let group = node.group.clone();
        if self.nodes.insert(id.clone(), node).is_some() {
            trace!(id = %id, "re-registered focusable; last write wins");
        } else {
            self.order.push(id.clone());
        }
        if disables_current {
            self.refocus_fallback(id, group.as_deref());
        }
    }

    /// Remove a node. No-op if absent. Unregistering the focused node
    /// re-resolves focus so `current_focus` never dangles.
    pub fn unregister(&mut self, id: &str) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        self.order.retain(|n| n != id);
        if self.current.as_deref() == Some(id) {
            let FocusableNode { id: lost, group, .. } = node;
            self.refocus_fallback(lost, group.as_deref());
        }
    }

    /// Cheap, frequent mutation path for layout changes; never alters
    /// focus state.
    pub fn update_bounds(&mut self, id: &str, bounds: Rect) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.bounds = bounds;
        }
    }

    // --- Group and section registration ---

    /// Upsert a group. Unregistering members separately is fine; stale ids
    /// are pruned lazily when the group is read.
    pub fn register_group(&mut self, group: NavigationGroup) {
        self.groups.insert(group.id.clone(), group);
    }

    /// Remove a grouping relation. Members are untouched.
    pub fn unregister_group(&mut self, id: &str) {
        self.groups.remove(id);
    }

    /// Upsert a section; first registration fixes its document-order slot.
    pub fn register_section(&mut self, section: Section) {
        let id = section.id.clone();
        if self.sections.insert(id.clone(), section).is_none() {
            self.section_order.push(id);
        }
    }

    /// Remove a section.
    pub fn unregister_section(&mut self, id: &str) {
        if self.sections.remove(id).is_some() {
            self.section_order.retain(|s| s != id);
        }
    }

    /// Refresh a section's bounds on layout changes.
    pub fn update_section_bounds(&mut self, id: &str, bounds: Rect) {
        if let Some(section) = self.sections.get_mut(id) {
            section.bounds = bounds;
        }
    }

    // --- Lookups ---

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&FocusableNode> {
        self.nodes.get(id)
    }

    /// Nodes in first-registration order.
    pub fn nodes_in_order(&self) -> impl Iterator<Item = &FocusableNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Look up a group by id.
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&NavigationGroup> {
        self.groups.get(id)
    }

    /// Look up a section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.get(id)
    }

    /// Section ids in document order.
    #[must_use]
    pub fn section_order(&self) -> &[String] {
        &self.section_order
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Registered and not disabled.
    #[must_use]
    pub fn is_focusable(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(|n| !n.disabled)
    }

    /// Whether the active trap (if any) admits this id.
    #[must_use]
    pub fn allowed_by_trap(&self, id: &str) -> bool {
        let Some(trap) = self.trap_stack.last() else {
            return true;
        };
        self.groups
            .get(&trap.group)
            .is_some_and(|g| g.members.iter().any(|m| m == id))
    }

    /// First registered node that can take focus right now.
    #[must_use]
    pub fn first_focusable(&self) -> Option<&str> {
        self.order
            .iter()
            .map(String::as_str)
            .find(|id| self.is_focusable(id) && self.allowed_by_trap(id))
    }

    // --- Focus state ---

    /// Currently focused node id, if any.
    #[must_use]
    pub fn current_focus(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Designate the node the first-focus policy prefers, when valid.
    pub fn set_initial_focus(&mut self, id: impl Into<NodeId>) {
        self.initial_focus = Some(id.into());
    }

    /// The designated initial-focus id, if one was set.
    #[must_use]
    pub fn initial_focus(&self) -> Option<&str> {
        self.initial_focus.as_deref()
    }

    /// Move focus to `id`. Returns true when focus changed. Missing,
    /// disabled, or trap-excluded targets are silent no-ops.
    pub fn focus(&mut self, id: &str) -> bool {
        if !self.is_focusable(id) || !self.allowed_by_trap(id) {
            return false;
        }
        if self.current.as_deref() == Some(id) {
            return false;
        }
        let to = id.to_string();
        match self.current.replace(to.clone()) {
            Some(from) => self.events.push_back(FocusEvent::Moved { from, to }),
            None => self.events.push_back(FocusEvent::Gained { id: to }),
        }
        true
    }

    /// Activate the focused node. No focus, no-op.
    pub fn select(&mut self) -> bool {
        let Some(id) = self.current.clone() else {
            return false;
        };
        self.events.push_back(FocusEvent::Selected { id });
        true
    }

    /// Drain pending focus events, oldest first.
    #[must_use = "subscribers should apply the drained transitions"]
    pub fn drain_events(&mut self) -> Vec<FocusEvent> {
        self.events.drain(..).collect()
    }

    // --- Focus traps (auxiliary panels) ---

    /// Trap focus to a group's members. Stores the pre-trap focus for
    /// restoration and moves focus into the group if it isn't there yet.
    pub fn push_trap(&mut self, group_id: impl Into<String>) {
        let group = group_id.into();
        self.trap_stack.push(FocusTrap {
            group: group.clone(),
            return_focus: self.current.clone(),
        });
        let already_inside = self
            .current
            .as_deref()
            .is_some_and(|cur| self.group_contains(&group, cur));
        if !already_inside
            && let Some(first) = self.first_in_group(&group)
        {
            self.focus(&first);
        }
    }

    /// Pop the innermost trap, restoring the pre-trap focus when it is
    /// still valid. Returns false when no trap was active.
    pub fn pop_trap(&mut self) -> bool {
        let Some(trap) = self.trap_stack.pop() else {
            return false;
        };
        if let Some(id) = trap.return_focus
            && self.is_focusable(&id)
            && self.allowed_by_trap(&id)
        {
            self.focus(&id);
            return true;
        }
        if let Some(outer) = self.trap_stack.last().map(|t| t.group.clone())
            && let Some(first) = self.first_in_group(&outer)
        {
            self.focus(&first);
            return true;
        }
        let current_ok = self
            .current
            .as_deref()
            .is_some_and(|cur| self.is_focusable(cur) && self.allowed_by_trap(cur));
        if !current_ok
            && let Some(first) = self.first_focusable().map(str::to_string)
        {
            self.focus(&first);
        }
        true
    }

    /// Whether a trap is active.
    #[must_use]
    pub fn is_trapped(&self) -> bool {
        !self.trap_stack.is_empty()
    }

    // --- Internal ---

    fn group_contains(&self, group_id: &str, node_id: &str) -> bool {
        self.groups
            .get(group_id)
            .is_some_and(|g| g.members.iter().any(|m| m == node_id))
    }

    fn first_in_group(&self, group_id: &str) -> Option<NodeId> {
        self.groups
            .get(group_id)?
            .members
            .iter()
            .find(|m| self.is_focusable(m))
            .cloned()
    }

    /// Re-resolve focus after the focused node became unavailable:
    /// first available member of its group, else any registered node,
    /// else nothing.
    fn refocus_fallback(&mut self, lost: NodeId, prev_group: Option<&str>) {
        self.current = None;
        let fallback = prev_group
            .and_then(|gid| self.first_in_group_allowed(gid))
            .or_else(|| self.first_focusable().map(str::to_string));
        debug!(lost = %lost, fallback = ?fallback, "focused node went away; re-resolving");
        self.events.push_back(FocusEvent::Lost { id: lost });
        if let Some(id) = fallback {
            self.current = Some(id.clone());
            self.events.push_back(FocusEvent::Gained { id });
        }
    }

    fn first_in_group_allowed(&self, group_id: &str) -> Option<NodeId> {
        self.groups
            .get(group_id)?
            .members
            .iter()
            .find(|m| self.is_focusable(m) && self.allowed_by_trap(m))
            .cloned()
    }
}

// =========================================================================
// Tests
// =========================================================================
