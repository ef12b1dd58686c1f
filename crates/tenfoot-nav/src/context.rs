#![forbid(unsafe_code)]

//! `NavContext`: the explicitly constructed root of one navigation scope.
//!
//! A context owns the registry, the scroll coordinator, and the input
//! adapter for a single TV subtree. It is created when that subtree mounts
//! and dropped when it unmounts; nothing here is process-global, so a modal
//! with its own focus world can simply construct a second context.
//!
//! Control flow per key event: the adapter admits (or drops) the event,
//! the resolver computes the target, the registry performs the transition
//! and emits events, and the scroll coordinator is notified of the new
//! focus. All of it is synchronous on the host's event loop.

use tenfoot_core::event::{ColorButton, Direction, KeyEvent, NavAction};
use tenfoot_core::geometry::Rect;
use tenfoot_core::time::Timestamp;

use crate::input::InputAdapter;
use crate::registry::{
    FocusEvent, FocusRegistry, FocusableNode, NavigationGroup, Section,
};
use crate::resolver;
use crate::scroll::{ScrollContainer, ScrollCoordinator};
use crate::tuning::NavTuning;

/// Non-focus outcomes of a key event, surfaced to the host.
///
/// The engine does not own the surrounding navigation stack or the
/// application toggles behind the color buttons; it reports them and the
/// host decides (e.g. Red toggles a subtitle panel, which then calls
/// [`NavContext::open_panel`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Back pressed with no auxiliary panel open: pop the host's
    /// navigation stack.
    BackRequested,
    /// A TV-remote color button was pressed.
    Color(ColorButton),
}

/// One navigation scope: registry + resolver + scroll + input, driven by
/// the host's key events and timestamps.
#[derive(Debug, Default)]
pub struct NavContext {
    registry: FocusRegistry,
    scroll: ScrollCoordinator,
    adapter: InputAdapter,
    tuning: NavTuning,
}

impl NavContext {
    /// Create a context with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with custom tuning.
    #[must_use]
    pub fn with_tuning(tuning: NavTuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    /// The active tuning.
    #[must_use]
    pub fn tuning(&self) -> &NavTuning {
        &self.tuning
    }

    /// Read-only registry access (current focus, node lookups).
    #[must_use]
    pub fn registry(&self) -> &FocusRegistry {
        &self.registry
    }

    /// Read-only scroll state access (offsets to apply when rendering).
    #[must_use]
    pub fn scroll(&self) -> &ScrollCoordinator {
        &self.scroll
    }

    /// Currently focused node id, if any.
    #[must_use]
    pub fn current_focus(&self) -> Option<&str> {
        self.registry.current_focus()
    }

    // --- Registration passthroughs ---

    /// Register (or re-register) a focusable node. Takes `now` because an
    /// upsert that disables the focused node re-resolves focus, which the
    /// scroll coordinator must see.
    pub fn register_node(&mut self, node: FocusableNode, now: Timestamp) {
        self.synced(now, |reg| reg.register(node));
    }

    /// Unregister a node; the fallback re-resolution (if it was focused)
    /// is reported to the scroll coordinator.
    pub fn unregister_node(&mut self, id: &str, now: Timestamp) {
        self.synced(now, |reg| reg.unregister(id));
    }

    /// Refresh a node's bounds after a layout change.
    pub fn update_bounds(&mut self, id: &str, bounds: Rect) {
        self.registry.update_bounds(id, bounds);
    }

    /// Register (or re-register) a navigation group.
    pub fn register_group(&mut self, group: NavigationGroup) {
        self.registry.register_group(group);
    }

    /// Remove a grouping relation.
    pub fn unregister_group(&mut self, id: &str) {
        self.registry.unregister_group(id);
    }

    /// Register a page section.
    pub fn register_section(&mut self, section: Section) {
        self.registry.register_section(section);
    }

    /// Remove a page section.
    pub fn unregister_section(&mut self, id: &str) {
        self.registry.unregister_section(id);
    }

    /// Refresh a section's bounds after a layout change.
    pub fn update_section_bounds(&mut self, id: &str, bounds: Rect) {
        self.registry.update_section_bounds(id, bounds);
    }

    /// Designate the node the first key press should focus.
    pub fn set_initial_focus(&mut self, id: impl Into<String>) {
        self.registry.set_initial_focus(id);
    }

    /// Register (or refresh) a scrollable list container.
    pub fn register_container(&mut self, container: ScrollContainer) {
        self.scroll.register_container(container);
    }

    /// Remove a scroll container.
    pub fn unregister_container(&mut self, id: &str) {
        self.scroll.unregister_container(id);
    }

    /// Set page-level scroll metrics (viewport and document heights).
    pub fn set_page_metrics(&mut self, viewport_height: f32, document_height: f32) {
        self.scroll.set_page_metrics(viewport_height, document_height);
    }

    // --- Input ---

    /// Feed one key event through the adapter, resolver, and registry.
    ///
    /// Returns a [`ControlEvent`] when the key means something to the host
    /// rather than to the focus engine. Focus transitions are observable
    /// via [`drain_events`](Self::drain_events).
    pub fn handle_key(&mut self, event: KeyEvent, now: Timestamp) -> Option<ControlEvent> {
        let action = self.adapter.admit(event, now, &self.tuning)?;
        match action {
            NavAction::Move(direction) => {
                self.move_focus(direction, now);
                None
            }
            NavAction::Select => {
                self.registry.select();
                None
            }
            NavAction::Back => {
                if self.registry.is_trapped() {
                    self.close_panel(now);
                    None
                } else {
                    Some(ControlEvent::BackRequested)
                }
            }
            NavAction::Color(button) => Some(ControlEvent::Color(button)),
        }
    }

    /// Move focus in a direction. With nothing focused, applies the
    /// first-focus policy instead. Returns true when focus changed; a
    /// press with no valid candidate is a silent no-op.
    pub fn move_focus(&mut self, direction: Direction, now: Timestamp) -> bool {
        let target = match self.registry.current_focus() {
            None => resolver::first_focus(&self.registry),
            Some(current) => resolver::resolve(&self.registry, current, direction, &self.tuning),
        };
        match target {
            Some(id) => self.focus(&id, now),
            None => false,
        }
    }

    /// Programmatic focus with full transition semantics (events + scroll).
    pub fn focus(&mut self, id: &str, now: Timestamp) -> bool {
        if self.registry.focus(id) {
            self.notify_scroll(id, now);
            true
        } else {
            false
        }
    }

    /// Activate the focused node.
    pub fn select(&mut self) -> bool {
        self.registry.select()
    }

    // --- Auxiliary panels ---

    /// Open an auxiliary panel: trap focus to its group. While open, the
    /// panel owns directional input and Back closes it.
    pub fn open_panel(&mut self, group_id: impl Into<String>, now: Timestamp) {
        self.synced(now, |reg| reg.push_trap(group_id));
    }

    /// Close the innermost panel, restoring the pre-panel focus when it is
    /// still valid. Returns false when no panel was open.
    pub fn close_panel(&mut self, now: Timestamp) -> bool {
        let before = self.registry.current_focus().map(str::to_string);
        let popped = self.registry.pop_trap();
        self.sync_after(before, now);
        popped
    }

    /// Whether an auxiliary panel currently owns input.
    #[must_use]
    pub fn panel_open(&self) -> bool {
        self.registry.is_trapped()
    }

    // --- Host loop ---

    /// Advance scroll animations to `now`.
    pub fn tick(&mut self, now: Timestamp) {
        self.scroll.tick(now);
    }

    /// Drain pending focus events for UI bindings to apply.
    #[must_use = "subscribers should apply the drained transitions"]
    pub fn drain_events(&mut self) -> Vec<FocusEvent> {
        self.registry.drain_events()
    }

    // --- Internal ---

    /// Run a registry mutation and report any resulting focus change to
    /// the scroll coordinator.
    fn synced(&mut self, now: Timestamp, mutate: impl FnOnce(&mut FocusRegistry)) {
        let before = self.registry.current_focus().map(str::to_string);
        mutate(&mut self.registry);
        self.sync_after(before, now);
    }

    fn sync_after(&mut self, before: Option<String>, now: Timestamp) {
        let after = self.registry.current_focus().map(str::to_string);
        if after != before
            && let Some(id) = after
        {
            self.notify_scroll(&id, now);
        }
    }

    fn notify_scroll(&mut self, id: &str, now: Timestamp) {
        let Some(node) = self.registry.node(id) else {
            return;
        };
        let section = node
            .section
            .as_deref()
            .and_then(|s| self.registry.section(s));
        self.scroll.on_focus_changed(node, section, now, &self.tuning);
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Orientation;
    use tenfoot_core::event::{Axis, KeyCode};

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn node(id: &str, x: f32, y: f32) -> FocusableNode {
        FocusableNode::new(id, Rect::new(x, y, 100.0, 100.0))
    }

    fn simple_context() -> NavContext {
        let mut ctx = NavContext::new();
        ctx.register_node(node("a", 0.0, 0.0), ms(0));
        ctx.register_node(node("b", 120.0, 0.0), ms(0));
        ctx.register_node(node("c", 240.0, 0.0), ms(0));
        ctx
    }

    // --- First focus ---

    #[test]
    fn first_key_press_applies_first_focus_policy() {
        let mut ctx = simple_context();
        assert_eq!(ctx.current_focus(), None);

        let _ = ctx.handle_key(KeyCode::Right.into(), ms(0));
        assert_eq!(ctx.current_focus(), Some("a"));
    }

    #[test]
    fn first_focus_honors_designated_id() {
        let mut ctx = simple_context();
        ctx.set_initial_focus("b");
        let _ = ctx.handle_key(KeyCode::Down.into(), ms(0));
        assert_eq!(ctx.current_focus(), Some("b"));
    }

    // --- Movement ---

    #[test]
    fn arrow_keys_walk_the_row() {
        let mut ctx = simple_context();
        let _ = ctx.handle_key(KeyCode::Right.into(), ms(0)); // first focus -> a
        let _ = ctx.handle_key(KeyCode::Right.into(), ms(200)); // a -> b
        let _ = ctx.handle_key(KeyCode::Right.into(), ms(400)); // b -> c
        assert_eq!(ctx.current_focus(), Some("c"));

        let _ = ctx.handle_key(KeyCode::Left.into(), ms(600));
        assert_eq!(ctx.current_focus(), Some("b"));
    }

    #[test]
    fn no_candidate_is_a_silent_noop() {
        let mut ctx = simple_context();
        ctx.focus("a", ms(0));
        let _ = ctx.drain_events();

        let _ = ctx.handle_key(KeyCode::Up.into(), ms(0));
        assert_eq!(ctx.current_focus(), Some("a"));
        assert!(ctx.drain_events().is_empty());
    }

    #[test]
    fn debounce_collapses_a_key_burst() {
        let mut ctx = simple_context();
        ctx.focus("a", ms(0));
        let _ = ctx.drain_events();

        // 10 Rights inside one lockout window: only the first resolves.
        for i in 0..10u64 {
            let _ = ctx.handle_key(KeyCode::Right.into(), ms(i * 5));
        }
        let moves = ctx
            .drain_events()
            .iter()
            .filter(|e| matches!(e, FocusEvent::Moved { .. }))
            .count();
        assert_eq!(moves, 1);
        assert_eq!(ctx.current_focus(), Some("b"));
    }

    // --- Select / Back / Color ---

    #[test]
    fn select_emits_selected_for_focused_node() {
        let mut ctx = simple_context();
        ctx.focus("b", ms(0));
        let _ = ctx.drain_events();

        assert_eq!(ctx.handle_key(KeyCode::Enter.into(), ms(0)), None);
        assert_eq!(
            ctx.drain_events(),
            vec![FocusEvent::Selected { id: "b".into() }]
        );
    }

    #[test]
    fn select_without_focus_is_noop() {
        let mut ctx = simple_context();
        assert_eq!(ctx.handle_key(KeyCode::Enter.into(), ms(0)), None);
        assert!(ctx.drain_events().is_empty());
    }

    #[test]
    fn back_without_panel_is_delegated_to_host() {
        let mut ctx = simple_context();
        assert_eq!(
            ctx.handle_key(KeyCode::Escape.into(), ms(0)),
            Some(ControlEvent::BackRequested)
        );
    }

    #[test]
    fn color_buttons_are_surfaced() {
        let mut ctx = simple_context();
        assert_eq!(
            ctx.handle_key(KeyCode::ColorRed.into(), ms(0)),
            Some(ControlEvent::Color(ColorButton::Red))
        );
        assert_eq!(
            ctx.handle_key(KeyCode::ColorBlue.into(), ms(0)),
            Some(ControlEvent::Color(ColorButton::Blue))
        );
    }

    #[test]
    fn unmapped_key_does_nothing() {
        let mut ctx = simple_context();
        assert_eq!(ctx.handle_key(KeyCode::Char('x').into(), ms(0)), None);
        assert_eq!(ctx.current_focus(), None);
    }

    // --- Panels ---

    fn panel_context() -> NavContext {
        let mut ctx = simple_context();
        ctx.register_node(node("sub1", 500.0, 0.0).with_group("subtitles"), ms(0));
        ctx.register_node(node("sub2", 500.0, 120.0).with_group("subtitles"), ms(0));
        ctx.register_group(
            NavigationGroup::new("subtitles", Orientation::Vertical)
                .with_members(["sub1", "sub2"]),
        );
        ctx
    }

    #[test]
    fn open_panel_traps_and_focuses_first_item() {
        let mut ctx = panel_context();
        ctx.focus("a", ms(0));

        ctx.open_panel("subtitles", ms(0));
        assert!(ctx.panel_open());
        assert_eq!(ctx.current_focus(), Some("sub1"));
    }

    #[test]
    fn panel_owns_directional_input_while_open() {
        let mut ctx = panel_context();
        ctx.focus("a", ms(0));
        ctx.open_panel("subtitles", ms(0));

        let _ = ctx.handle_key(KeyCode::Down.into(), ms(200));
        assert_eq!(ctx.current_focus(), Some("sub2"));

        // Left would geometrically reach "a"; the trap hides it.
        let _ = ctx.handle_key(KeyCode::Left.into(), ms(400));
        assert_eq!(ctx.current_focus(), Some("sub2"));
    }

    #[test]
    fn back_closes_panel_before_delegating() {
        let mut ctx = panel_context();
        ctx.focus("a", ms(0));
        ctx.open_panel("subtitles", ms(0));

        assert_eq!(ctx.handle_key(KeyCode::Escape.into(), ms(0)), None);
        assert!(!ctx.panel_open());
        assert_eq!(ctx.current_focus(), Some("a"));

        assert_eq!(
            ctx.handle_key(KeyCode::Escape.into(), ms(100)),
            Some(ControlEvent::BackRequested)
        );
    }

    #[test]
    fn close_panel_without_panel_is_false() {
        let mut ctx = simple_context();
        assert!(!ctx.close_panel(ms(0)));
    }

    // --- Fallback + scroll coordination ---

    #[test]
    fn unregistering_focused_node_falls_back_and_scrolls() {
        let mut ctx = NavContext::new();
        ctx.register_container(
            ScrollContainer::new("row", Rect::new(0.0, 0.0, 400.0, 200.0), Axis::Horizontal)
                .with_content_extent(2000.0),
        );
        ctx.register_node(node("visible", 0.0, 0.0).with_container("row"), ms(0));
        ctx.register_node(node("offscreen", 600.0, 0.0).with_container("row"), ms(0));
        ctx.focus("visible", ms(0));
        let _ = ctx.drain_events();

        ctx.unregister_node("visible", ms(0));

        assert_eq!(ctx.current_focus(), Some("offscreen"));
        ctx.tick(ms(1000));
        // Fallback target was revealed by the scroll coordinator.
        assert_eq!(ctx.scroll().offset("row"), Some(316.0));
    }

    #[test]
    fn focus_transition_scrolls_section_into_place() {
        let mut ctx = NavContext::new();
        ctx.set_page_metrics(1080.0, 3000.0);
        ctx.register_section(Section::new("hero", Rect::new(0.0, 1200.0, 1920.0, 900.0)));
        ctx.register_node(node("h1", 0.0, 1250.0).with_section("hero"), ms(0));

        ctx.focus("h1", ms(0));
        ctx.tick(ms(1000));
        assert_eq!(ctx.scroll().page_offset(), Some(1092.0));
    }

    #[test]
    fn contexts_are_independent() {
        let mut main = NavContext::new();
        let mut modal = NavContext::new();
        main.register_node(node("m", 0.0, 0.0), ms(0));
        modal.register_node(node("x", 0.0, 0.0), ms(0));

        main.focus("m", ms(0));
        assert_eq!(main.current_focus(), Some("m"));
        assert_eq!(modal.current_focus(), None);
    }
}
