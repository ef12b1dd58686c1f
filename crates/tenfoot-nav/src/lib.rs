#![forbid(unsafe_code)]

//! Directional focus navigation for ten-foot (TV remote) interfaces.
//!
//! # Role in tenfoot
//! `tenfoot-nav` is the engine. Given an arbitrary 2D layout of focusable
//! elements, it decides which one receives focus when the user presses
//! Up/Down/Left/Right on a remote, keeps that decision stable while the
//! layout churns (items mounting, unmounting, scrolling), and keeps the
//! focused element in view.
//!
//! # Primary responsibilities
//! - **FocusRegistry**: nodes, groups, sections, and the single-focus
//!   invariant, with fallback re-resolution so focus never dangles.
//! - **resolver**: pure group-local / geometric / section-fallback target
//!   computation.
//! - **ScrollCoordinator**: container-local and page-level smooth scrolling
//!   that supersedes, never queues.
//! - **InputAdapter**: key-to-action translation with a debounce lockout.
//! - **NavContext**: one explicitly constructed navigation scope tying the
//!   pieces together.
//!
//! # How it fits in the system
//! The hosting UI layer registers elements with their measured bounds,
//! feeds key events and timestamps in, and drains focus events and scroll
//! offsets out. The engine never touches the rendering layer, reads a
//! clock, or assumes how bounds were measured.
//!
//! ```
//! use tenfoot_core::event::KeyCode;
//! use tenfoot_core::geometry::Rect;
//! use tenfoot_core::time::Timestamp;
//! use tenfoot_nav::{FocusableNode, NavContext};
//!
//! let mut ctx = NavContext::new();
//! let now = Timestamp::ZERO;
//! ctx.register_node(FocusableNode::new("play", Rect::new(0.0, 0.0, 100.0, 40.0)), now);
//! ctx.register_node(FocusableNode::new("info", Rect::new(120.0, 0.0, 100.0, 40.0)), now);
//!
//! let _ = ctx.handle_key(KeyCode::Right.into(), now); // first press focuses "play"
//! assert_eq!(ctx.current_focus(), Some("play"));
//! ```

pub mod context;
pub mod input;
pub mod registry;
pub mod resolver;
pub mod scroll;
pub mod tuning;

pub use context::{ControlEvent, NavContext};
pub use input::InputAdapter;
pub use registry::{
    FocusEvent, FocusRegistry, FocusableNode, NavigationGroup, NodeId, Orientation, Section,
};
pub use scroll::{ScrollContainer, ScrollCoordinator};
pub use tuning::NavTuning;
