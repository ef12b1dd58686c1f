//! End-to-end navigation over two stacked carousel rows, driven through
//! the full context (adapter → resolver → registry → scroll).

use tenfoot_core::event::KeyCode;
use tenfoot_core::geometry::Rect;
use tenfoot_core::time::Timestamp;
use tenfoot_nav::{FocusEvent, FocusableNode, NavContext, NavigationGroup, Orientation};

fn ms(v: u64) -> Timestamp {
    Timestamp::from_millis(v)
}

/// Two horizontal rows of three aligned columns each:
/// a1 (0,0)   a2 (120,0)   a3 (240,0)
/// b1 (0,150) b2 (120,150) b3 (240,150)
fn two_rows() -> NavContext {
    let mut ctx = NavContext::new();
    let now = ms(0);
    for (id, x, y) in [
        ("a1", 0.0, 0.0),
        ("a2", 120.0, 0.0),
        ("a3", 240.0, 0.0),
        ("b1", 0.0, 150.0),
        ("b2", 120.0, 150.0),
        ("b3", 240.0, 150.0),
    ] {
        let group = if id.starts_with('a') { "row-a" } else { "row-b" };
        ctx.register_node(
            FocusableNode::new(id, Rect::new(x, y, 100.0, 100.0)).with_group(group),
            now,
        );
    }
    ctx.register_group(
        NavigationGroup::new("row-a", Orientation::Horizontal).with_members(["a1", "a2", "a3"]),
    );
    ctx.register_group(
        NavigationGroup::new("row-b", Orientation::Horizontal).with_members(["b1", "b2", "b3"]),
    );
    ctx
}

#[test]
fn down_right_up_walks_the_grid() {
    let mut ctx = two_rows();
    ctx.focus("a1", ms(0));

    // Down leaves row-a (horizontal group, vertical press) and lands on
    // the aligned node below.
    let _ = ctx.handle_key(KeyCode::Down.into(), ms(200));
    assert_eq!(ctx.current_focus(), Some("b1"));

    // Right is group-local within row-b.
    let _ = ctx.handle_key(KeyCode::Right.into(), ms(400));
    assert_eq!(ctx.current_focus(), Some("b2"));

    // Up finds the aligned node in row-a, not its neighbors.
    let _ = ctx.handle_key(KeyCode::Up.into(), ms(600));
    assert_eq!(ctx.current_focus(), Some("a2"));
}

#[test]
fn transitions_emit_paired_focus_events() {
    let mut ctx = two_rows();
    ctx.focus("a1", ms(0));
    let _ = ctx.handle_key(KeyCode::Down.into(), ms(200));
    let _ = ctx.handle_key(KeyCode::Right.into(), ms(400));

    assert_eq!(
        ctx.drain_events(),
        vec![
            FocusEvent::Gained { id: "a1".into() },
            FocusEvent::Moved {
                from: "a1".into(),
                to: "b1".into()
            },
            FocusEvent::Moved {
                from: "b1".into(),
                to: "b2".into()
            },
        ]
    );
}

#[test]
fn row_edges_without_wrap_stay_put() {
    let mut ctx = two_rows();
    ctx.focus("a3", ms(0));

    // No wrap, and nothing to the right of the rows.
    let _ = ctx.handle_key(KeyCode::Right.into(), ms(200));
    assert_eq!(ctx.current_focus(), Some("a3"));

    // Left works group-locally from the same position.
    let _ = ctx.handle_key(KeyCode::Left.into(), ms(400));
    assert_eq!(ctx.current_focus(), Some("a2"));
}

#[test]
fn held_key_burst_resolves_once_per_lockout_window() {
    let mut ctx = two_rows();
    ctx.focus("a1", ms(0));
    let _ = ctx.drain_events();

    // A held Right key repeating every 30ms for 300ms: far fewer than 10
    // resolutions happen, and focus never skips unpredictably.
    for i in 0..10u64 {
        let _ = ctx.handle_key(KeyCode::Right.into(), ms(i * 30));
    }
    let moves = ctx
        .drain_events()
        .iter()
        .filter(|e| matches!(e, FocusEvent::Moved { .. }))
        .count();
    assert!(moves < 10);
    // 0, 120, 240ms admitted: a1 -> a2 -> a3, then the row edge holds.
    assert_eq!(moves, 2);
    assert_eq!(ctx.current_focus(), Some("a3"));
}

#[test]
fn unmounting_a_row_mid_navigation_keeps_focus_valid() {
    let mut ctx = two_rows();
    ctx.focus("b2", ms(0));

    // Row B unmounts (e.g. scrolled out and virtualized away).
    for id in ["b1", "b2", "b3"] {
        ctx.unregister_node(id, ms(100));
    }
    ctx.unregister_group("row-b");

    // Fallback landed somewhere valid, and navigation still works.
    let current = ctx.current_focus().expect("focus fell back");
    assert!(current.starts_with('a'));
    let _ = ctx.handle_key(KeyCode::Right.into(), ms(300));
    assert!(ctx.current_focus().is_some());
}
