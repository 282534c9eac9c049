// ── Queue ordering ──
//
// Pure helpers for relative moves. The backend only ever receives
// (moved, target, direction); absolute indices stay local.

use serde::{Deserialize, Serialize};

use crate::model::EntryId;

/// Where the moved entry lands relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Moved toward the front of the line (smaller index).
    Up,
    /// Moved toward the back of the line (larger index).
    Down,
}

impl Direction {
    /// `Up` when the moved entry currently sits after the target.
    pub fn between(moved_index: usize, target_index: usize) -> Self {
        if moved_index > target_index {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// A request to move one entry onto another's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub moved: EntryId,
    pub target: EntryId,
    pub direction: Direction,
}

impl MoveIntent {
    /// Build an intent from ids in `rendered`, the list as the operator
    /// sees it. Returns `None` for a no-op or when either id is absent.
    pub fn resolve(rendered: &[EntryId], moved: EntryId, target: EntryId) -> Option<Self> {
        if moved == target {
            return None;
        }
        let moved_index = position(rendered, moved)?;
        let target_index = position(rendered, target)?;
        Some(Self {
            moved,
            target,
            direction: Direction::between(moved_index, target_index),
        })
    }
}

pub(crate) fn position(order: &[EntryId], id: EntryId) -> Option<usize> {
    order.iter().position(|candidate| *candidate == id)
}

/// Array-move: take the element at `from` out and reinsert it at `to`.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Apply `intent` to a full order: the moved entry takes the target's
/// former index. Returns `None` when either id is not in `order`.
pub fn apply_move(order: &[EntryId], intent: &MoveIntent) -> Option<Vec<EntryId>> {
    let from = position(order, intent.moved)?;
    let to = position(order, intent.target)?;
    let mut next = order.to_vec();
    array_move(&mut next, from, to);
    Some(next)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(raw: &[i64]) -> Vec<EntryId> {
        raw.iter().copied().map(EntryId::new).collect()
    }

    #[test]
    fn moving_last_onto_first_goes_up() {
        let order = ids(&[1, 2, 3]);
        let intent = MoveIntent::resolve(&order, EntryId::new(3), EntryId::new(1)).unwrap();
        assert_eq!(intent.direction, Direction::Up);
        assert_eq!(apply_move(&order, &intent).unwrap(), ids(&[3, 1, 2]));
    }

    #[test]
    fn moving_first_onto_last_goes_down() {
        let order = ids(&[1, 2, 3]);
        let intent = MoveIntent::resolve(&order, EntryId::new(1), EntryId::new(3)).unwrap();
        assert_eq!(intent.direction, Direction::Down);
        assert_eq!(apply_move(&order, &intent).unwrap(), ids(&[2, 3, 1]));
    }

    #[test]
    fn direction_follows_index_comparison() {
        assert_eq!(Direction::between(4, 1), Direction::Up);
        assert_eq!(Direction::between(1, 4), Direction::Down);
    }

    #[test]
    fn same_source_and_target_is_no_intent() {
        let order = ids(&[1, 2, 3]);
        assert!(MoveIntent::resolve(&order, EntryId::new(2), EntryId::new(2)).is_none());
    }

    #[test]
    fn unknown_ids_are_no_intent() {
        let order = ids(&[1, 2, 3]);
        assert!(MoveIntent::resolve(&order, EntryId::new(9), EntryId::new(1)).is_none());
        assert!(MoveIntent::resolve(&order, EntryId::new(1), EntryId::new(9)).is_none());
    }

    #[test]
    fn filtered_direction_matches_full_order() {
        // Entry 2 is hidden from the rendered list; relative order is unchanged.
        let full = ids(&[1, 2, 3, 4]);
        let rendered = ids(&[1, 3, 4]);
        let intent = MoveIntent::resolve(&rendered, EntryId::new(4), EntryId::new(1)).unwrap();
        assert_eq!(intent.direction, Direction::Up);
        assert_eq!(apply_move(&full, &intent).unwrap(), ids(&[4, 1, 2, 3]));
    }

    #[test]
    fn array_move_ignores_out_of_range() {
        let mut items = vec!['a', 'b', 'c'];
        array_move(&mut items, 0, 7);
        assert_eq!(items, vec!['a', 'b', 'c']);
        array_move(&mut items, 2, 0);
        assert_eq!(items, vec!['c', 'a', 'b']);
    }
}
