#![forbid(unsafe_code)]

//! Core: geometry, remote-control key events, and logical actions.
//!
//! # Role in tenfoot
//! `tenfoot-core` is the input layer. It owns the value types the navigation
//! engine computes over: on-screen rectangles, normalized key events, and
//! the logical actions a four-direction remote can express.
//!
//! # Primary responsibilities
//! - **Rect/Point**: axis-aligned bounding boxes in document pixels.
//! - **KeyEvent**: canonical remote/keyboard input (arrows, select, back,
//!   color buttons), decoded from host key identifiers.
//! - **NavAction**: logical actions derived from key events.
//! - **Timestamp**: monotonic milliseconds supplied by the host, so the
//!   engine never reads a clock of its own.
//!
//! # How it fits in the system
//! The engine (`tenfoot-nav`) consumes these types and drives focus state.
//! Nothing here assumes a particular measurement mechanism or event source:
//! bounds and timestamps are opaque values the hosting UI layer provides.

pub mod event;
pub mod geometry;
pub mod time;
