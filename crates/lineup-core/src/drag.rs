// ── Drag interaction ──
//
// Headless gesture state machine. Front-ends translate their pointer and
// key events into these calls and resolve which entry sits under the
// pointer; the controller decides when a drag starts and what a drop
// means. All ids are from the rendered (filtered) list.

use crate::model::EntryId;
use crate::order::{Direction, MoveIntent, position};

/// Default pointer travel before a press turns into a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 5.0;

/// Pointer location in front-end units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Pointer is down on an entry but has not travelled far enough yet.
    Pressed { source: EntryId, origin: Point },
    /// An entry is being carried; `over` is the current drop target.
    Dragging {
        source: EntryId,
        over: Option<EntryId>,
    },
}

#[derive(Debug, Clone)]
pub struct DragController {
    enabled: bool,
    activation_distance: f64,
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}

impl DragController {
    /// A disabled controller; call [`set_enabled`](Self::set_enabled) to
    /// turn reordering on.
    pub fn new(activation_distance: f64) -> Self {
        Self {
            enabled: false,
            activation_distance: activation_distance.max(0.0),
            state: DragState::Idle,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning reordering off drops any gesture in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.state = DragState::Idle;
        }
    }

    pub fn activation_distance(&self) -> f64 {
        self.activation_distance
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Entry being carried, if a drag is active.
    pub fn source(&self) -> Option<EntryId> {
        match self.state {
            DragState::Dragging { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Current drop target, if a drag is active.
    pub fn hover(&self) -> Option<EntryId> {
        match self.state {
            DragState::Dragging { over, .. } => over,
            _ => None,
        }
    }

    // ── Pointer gestures ─────────────────────────────────────────────

    pub fn pointer_down(&mut self, entry: Option<EntryId>, at: Point) {
        if !self.enabled {
            return;
        }
        self.state = match entry {
            Some(source) => DragState::Pressed { source, origin: at },
            None => DragState::Idle,
        };
    }

    pub fn pointer_move(&mut self, over: Option<EntryId>, at: Point) {
        if !self.enabled {
            return;
        }
        match self.state {
            DragState::Pressed { source, origin } => {
                if origin.distance_to(at) > self.activation_distance {
                    self.state = DragState::Dragging { source, over };
                }
            }
            DragState::Dragging { source, .. } => {
                self.state = DragState::Dragging { source, over };
            }
            DragState::Idle => {}
        }
    }

    /// Release the pointer over `over`. A press that never became a drag
    /// is a click and yields nothing.
    pub fn pointer_up(&mut self, over: Option<EntryId>, rendered: &[EntryId]) -> Option<MoveIntent> {
        if !self.enabled {
            return None;
        }
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        match state {
            DragState::Dragging { source, .. } => MoveIntent::resolve(rendered, source, over?),
            _ => None,
        }
    }

    // ── Keyboard gestures ────────────────────────────────────────────

    /// Pick up `entry`; the drop target starts on the entry itself.
    pub fn pick_up(&mut self, entry: EntryId) {
        if !self.enabled {
            return;
        }
        self.state = DragState::Dragging {
            source: entry,
            over: Some(entry),
        };
    }

    /// Step the drop target one row. Clamps at both ends of the list.
    pub fn step(&mut self, direction: Direction, rendered: &[EntryId]) {
        if !self.enabled {
            return;
        }
        let DragState::Dragging { source, over } = self.state else {
            return;
        };
        let current = over
            .and_then(|id| position(rendered, id))
            .or_else(|| position(rendered, source));
        let Some(current) = current else {
            return;
        };
        let next = match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(rendered.len().saturating_sub(1)),
        };
        self.state = DragState::Dragging {
            source,
            over: rendered.get(next).copied(),
        };
    }

    /// Drop at the current target.
    pub fn release(&mut self, rendered: &[EntryId]) -> Option<MoveIntent> {
        if !self.enabled {
            return None;
        }
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        match state {
            DragState::Dragging { source, over } => MoveIntent::resolve(rendered, source, over?),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(raw: &[i64]) -> Vec<EntryId> {
        raw.iter().copied().map(EntryId::new).collect()
    }

    fn enabled() -> DragController {
        let mut drag = DragController::default();
        drag.set_enabled(true);
        drag
    }

    #[test]
    fn pointer_drag_produces_intent() {
        let rendered = ids(&[1, 2, 3]);
        let mut drag = enabled();

        drag.pointer_down(Some(EntryId::new(3)), Point::new(0.0, 20.0));
        drag.pointer_move(Some(EntryId::new(1)), Point::new(0.0, 0.0));
        assert!(drag.is_dragging());

        let intent = drag.pointer_up(Some(EntryId::new(1)), &rendered).unwrap();
        assert_eq!(intent.moved, EntryId::new(3));
        assert_eq!(intent.target, EntryId::new(1));
        assert_eq!(intent.direction, Direction::Up);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn movement_below_activation_distance_is_a_click() {
        let rendered = ids(&[1, 2, 3]);
        let mut drag = enabled();

        drag.pointer_down(Some(EntryId::new(3)), Point::new(0.0, 0.0));
        drag.pointer_move(Some(EntryId::new(2)), Point::new(3.0, 4.0));
        assert!(!drag.is_dragging());
        assert!(drag.pointer_up(Some(EntryId::new(2)), &rendered).is_none());
    }

    #[test]
    fn drop_on_self_or_outside_is_ignored() {
        let rendered = ids(&[1, 2, 3]);
        let mut drag = enabled();

        drag.pointer_down(Some(EntryId::new(2)), Point::new(0.0, 0.0));
        drag.pointer_move(Some(EntryId::new(2)), Point::new(0.0, 10.0));
        assert!(drag.pointer_up(Some(EntryId::new(2)), &rendered).is_none());

        drag.pointer_down(Some(EntryId::new(2)), Point::new(0.0, 0.0));
        drag.pointer_move(None, Point::new(0.0, 10.0));
        assert!(drag.pointer_up(None, &rendered).is_none());
    }

    #[test]
    fn disabled_controller_is_inert() {
        let rendered = ids(&[1, 2, 3]);
        let mut drag = DragController::default();

        drag.pointer_down(Some(EntryId::new(3)), Point::new(0.0, 20.0));
        drag.pointer_move(Some(EntryId::new(1)), Point::new(0.0, 0.0));
        assert_eq!(drag.state(), DragState::Idle);
        assert!(drag.pointer_up(Some(EntryId::new(1)), &rendered).is_none());

        drag.pick_up(EntryId::new(3));
        drag.step(Direction::Up, &rendered);
        assert_eq!(drag.state(), DragState::Idle);
        assert!(drag.release(&rendered).is_none());
    }

    #[test]
    fn disabling_mid_drag_cancels() {
        let mut drag = enabled();
        drag.pick_up(EntryId::new(1));
        drag.set_enabled(false);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn keyboard_steps_clamp_and_drop() {
        let rendered = ids(&[1, 2, 3]);
        let mut drag = enabled();

        drag.pick_up(EntryId::new(1));
        drag.step(Direction::Down, &rendered);
        drag.step(Direction::Down, &rendered);
        drag.step(Direction::Down, &rendered);
        assert_eq!(drag.hover(), Some(EntryId::new(3)));

        let intent = drag.release(&rendered).unwrap();
        assert_eq!(intent.moved, EntryId::new(1));
        assert_eq!(intent.target, EntryId::new(3));
        assert_eq!(intent.direction, Direction::Down);
    }

    #[test]
    fn keyboard_cancel_yields_nothing() {
        let rendered = ids(&[1, 2, 3]);
        let mut drag = enabled();

        drag.pick_up(EntryId::new(2));
        drag.step(Direction::Up, &rendered);
        drag.cancel();
        assert!(drag.release(&rendered).is_none());
    }
}
