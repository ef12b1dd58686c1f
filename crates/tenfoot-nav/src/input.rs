#![forbid(unsafe_code)]

//! Input adaptation: raw key events in, debounced logical actions out.
//!
//! One physical key event resolves to at most one resolver call. While a
//! transition (and its scroll side effects) settles, a short lockout drops
//! further directional presses — drops, never queues, so holding a key
//! cannot race the registry into an inconsistent focus state.
//!
//! The lockout is an explicit state flag with a monotonic timestamp
//! comparison; the adapter owns no timers.

use tenfoot_core::event::{KeyEvent, NavAction};
use tenfoot_core::time::Timestamp;
use tracing::trace;

use crate::tuning::NavTuning;

/// Translates key events into logical actions, debouncing directional
/// movement.
#[derive(Debug, Default)]
pub struct InputAdapter {
    lockout_until: Option<Timestamp>,
}

impl InputAdapter {
    /// Create an adapter with no lockout armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a key event: returns its logical action, or `None` when the
    /// key is unmapped or a directional press lands inside the lockout
    /// window.
    ///
    /// Only `Move` actions arm and respect the lockout; Select, Back, and
    /// color actions never enter the resolver and pass through untouched.
    pub fn admit(
        &mut self,
        event: KeyEvent,
        now: Timestamp,
        tuning: &NavTuning,
    ) -> Option<NavAction> {
        let action = NavAction::from_key(event)?;
        if matches!(action, NavAction::Move(_)) {
            if self.locked_out(now) {
                trace!(?action, "directional press dropped inside debounce lockout");
                return None;
            }
            self.lockout_until = Some(now + tuning.debounce_lockout);
        }
        Some(action)
    }

    /// Whether a directional press at `now` would be dropped.
    #[must_use]
    pub fn locked_out(&self, now: Timestamp) -> bool {
        self.lockout_until.is_some_and(|until| now < until)
    }

    /// Clear any armed lockout (e.g. when the TV subtree remounts).
    pub fn reset(&mut self) {
        self.lockout_until = None;
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tenfoot_core::event::{ColorButton, Direction, KeyCode};

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn tuning() -> NavTuning {
        NavTuning::default()
    }

    #[test]
    fn first_move_is_admitted_and_arms_lockout() {
        let mut adapter = InputAdapter::new();
        let action = adapter.admit(KeyCode::Right.into(), ms(0), &tuning());
        assert_eq!(action, Some(NavAction::Move(Direction::Right)));
        assert!(adapter.locked_out(ms(50)));
    }

    #[test]
    fn moves_inside_lockout_are_dropped_not_queued() {
        let mut adapter = InputAdapter::new();
        assert!(adapter.admit(KeyCode::Right.into(), ms(0), &tuning()).is_some());

        let mut admitted = 0;
        for i in 1..10 {
            if adapter.admit(KeyCode::Right.into(), ms(i * 10), &tuning()).is_some() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 0);
    }

    #[test]
    fn move_after_lockout_expiry_is_admitted() {
        let mut adapter = InputAdapter::new();
        assert!(adapter.admit(KeyCode::Right.into(), ms(0), &tuning()).is_some());
        assert!(adapter.admit(KeyCode::Right.into(), ms(99), &tuning()).is_none());
        assert!(adapter.admit(KeyCode::Right.into(), ms(100), &tuning()).is_some());
    }

    #[test]
    fn each_admitted_move_rearms_the_lockout() {
        let mut adapter = InputAdapter::new();
        assert!(adapter.admit(KeyCode::Right.into(), ms(0), &tuning()).is_some());
        assert!(adapter.admit(KeyCode::Right.into(), ms(120), &tuning()).is_some());
        // 120 + 100 = 220; still locked at 200.
        assert!(adapter.admit(KeyCode::Right.into(), ms(200), &tuning()).is_none());
    }

    #[test]
    fn select_back_and_color_bypass_the_lockout() {
        let mut adapter = InputAdapter::new();
        assert!(adapter.admit(KeyCode::Right.into(), ms(0), &tuning()).is_some());

        assert_eq!(
            adapter.admit(KeyCode::Enter.into(), ms(10), &tuning()),
            Some(NavAction::Select)
        );
        assert_eq!(
            adapter.admit(KeyCode::Escape.into(), ms(20), &tuning()),
            Some(NavAction::Back)
        );
        assert_eq!(
            adapter.admit(KeyCode::ColorRed.into(), ms(30), &tuning()),
            Some(NavAction::Color(ColorButton::Red))
        );
    }

    #[test]
    fn unmapped_keys_yield_nothing_and_do_not_arm() {
        let mut adapter = InputAdapter::new();
        assert!(adapter.admit(KeyCode::Char('q').into(), ms(0), &tuning()).is_none());
        assert!(!adapter.locked_out(ms(1)));
    }

    #[test]
    fn reset_clears_the_lockout() {
        let mut adapter = InputAdapter::new();
        assert!(adapter.admit(KeyCode::Right.into(), ms(0), &tuning()).is_some());
        adapter.reset();
        assert!(adapter.admit(KeyCode::Right.into(), ms(1), &tuning()).is_some());
    }
}
