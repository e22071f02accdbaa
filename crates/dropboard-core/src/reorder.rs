//! Single-element moves and the drag session that drives them.
//!
//! A move removes one element and reinserts it at another position; the
//! elements in between shift by one. It is not a swap:
//!
//! ```text
//! [A, B, C, D]  move(0, 3)  ->  [B, C, D, A]
//! [A, B, C, D]  move(2, 0)  ->  [C, A, B, D]
//! ```
//!
//! Moves work purely on position. Identity lives in the record ids, which is
//! why presentation must key items by id rather than by index.

use crate::error::ReorderError;

/// Move the element at `from` so that it ends up at index `to`.
///
/// Returns `Ok(false)` when `from == to` (nothing to do) and `Ok(true)` when
/// the sequence changed. Out-of-range indices are rejected and leave the
/// sequence untouched.
pub fn move_element<T>(items: &mut [T], from: usize, to: usize) -> Result<bool, ReorderError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::OutOfRange { index, len });
        }
    }
    if from == to {
        return Ok(false);
    }

    // The span between the two indices shifts by one toward `from`.
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    Ok(true)
}

/// A drag in progress over the board.
///
/// Mirrors the hover contract of a drag-and-drop layer: the dragged item
/// remembers its *current* index, every hover over another slot moves it
/// there, and the remembered index follows. Hovering over its own slot is
/// short-circuited so the board never sees a no-op move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    origin: usize,
    current: usize,
}

/// A move the board should apply in response to a hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverMove {
    pub from: usize,
    pub to: usize,
}

impl DragSession {
    /// Start dragging the item at `index`.
    pub fn start(index: usize) -> Self {
        Self {
            origin: index,
            current: index,
        }
    }

    /// Index the dragged item occupies right now.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Report a hover over `hover_index`.
    ///
    /// Returns the move to apply, or `None` when hovering over the item's own
    /// slot. The caller must apply the move before the next hover; once it
    /// has, call [`DragSession::commit`].
    pub fn hover(&self, hover_index: usize) -> Option<HoverMove> {
        if hover_index == self.current {
            return None;
        }
        Some(HoverMove {
            from: self.current,
            to: hover_index,
        })
    }

    /// Record that a hover move was applied.
    pub fn commit(&mut self, applied: HoverMove) {
        self.current = applied.to;
    }

    /// Run `hover` and apply it to a plain sequence in one step.
    pub fn hover_over<T>(
        &mut self,
        items: &mut [T],
        hover_index: usize,
    ) -> Result<bool, ReorderError> {
        match self.hover(hover_index) {
            Some(mv) => {
                let moved = move_element(items, mv.from, mv.to)?;
                self.commit(mv);
                Ok(moved)
            }
            None => Ok(false),
        }
    }

    /// End the drag, returning the net `(origin, final)` displacement.
    pub fn finish(self) -> (usize, usize) {
        (self.origin, self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_move_forward() {
        let mut items = letters("ABC");
        assert!(move_element(&mut items, 0, 2).unwrap());
        assert_eq!(items, letters("BCA"));
    }

    #[test]
    fn test_move_backward() {
        let mut items = letters("ABCD");
        assert!(move_element(&mut items, 2, 0).unwrap());
        assert_eq!(items, letters("CABD"));
    }

    #[test]
    fn test_move_zero_to_three_shifts_intervening_down() {
        let mut items = letters("ABCDE");
        move_element(&mut items, 0, 3).unwrap();
        assert_eq!(items, letters("BCDAE"));
    }

    #[test]
    fn test_move_adjacent() {
        let mut items = letters("ABCD");
        move_element(&mut items, 1, 2).unwrap();
        assert_eq!(items, letters("ACBD"));
        move_element(&mut items, 2, 1).unwrap();
        assert_eq!(items, letters("ABCD"));
    }

    #[test]
    fn test_same_index_is_identity() {
        for i in 0..4 {
            let mut items = letters("ABCD");
            assert!(!move_element(&mut items, i, i).unwrap());
            assert_eq!(items, letters("ABCD"));
        }
    }

    #[test]
    fn test_every_valid_move_preserves_elements() {
        let original = letters("ABCDEF");
        let n = original.len();
        for from in 0..n {
            for to in 0..n {
                let mut items = original.clone();
                move_element(&mut items, from, to).unwrap();
                assert_eq!(items.len(), n);
                assert_eq!(items[to], original[from]);
                let mut sorted = items.clone();
                sorted.sort();
                assert_eq!(sorted, original);
            }
        }
    }

    #[test]
    fn test_out_of_range_is_rejected_without_change() {
        let mut items = letters("ABC");
        let err = move_element(&mut items, 3, 0).unwrap_err();
        assert_eq!(err, ReorderError::OutOfRange { index: 3, len: 3 });
        let err = move_element(&mut items, 0, 7).unwrap_err();
        assert_eq!(err, ReorderError::OutOfRange { index: 7, len: 3 });
        assert_eq!(items, letters("ABC"));
    }

    #[test]
    fn test_empty_sequence_rejects_any_move() {
        let mut items: Vec<char> = Vec::new();
        assert!(move_element(&mut items, 0, 0).is_err());
    }

    #[test]
    fn test_drag_session_follows_item() {
        // Drag A across B and C, one hover at a time.
        let mut items = letters("ABCD");
        let mut drag = DragSession::start(0);

        assert!(drag.hover_over(&mut items, 1).unwrap());
        assert_eq!(items, letters("BACD"));
        assert_eq!(drag.current(), 1);

        assert!(drag.hover_over(&mut items, 2).unwrap());
        assert_eq!(items, letters("BCAD"));

        // Hovering over its own slot again changes nothing.
        assert!(!drag.hover_over(&mut items, 2).unwrap());
        assert_eq!(items, letters("BCAD"));

        assert_eq!(drag.finish(), (0, 2));
    }

    #[test]
    fn test_drag_session_same_slot_yields_no_move() {
        let drag = DragSession::start(2);
        assert_eq!(drag.hover(2), None);
        assert_eq!(drag.hover(0), Some(HoverMove { from: 2, to: 0 }));
    }

    #[test]
    fn test_drag_session_repeated_hover_settles() {
        // Repeated hovers over the same target after each commit are stable.
        let mut items = letters("ABCD");
        let mut drag = DragSession::start(3);
        drag.hover_over(&mut items, 0).unwrap();
        let after_first = items.clone();
        drag.hover_over(&mut items, 0).unwrap();
        assert_eq!(items, after_first);
        assert_eq!(items, letters("DABC"));
    }

    #[test]
    fn test_drag_session_bad_hover_keeps_index() {
        let mut items = letters("AB");
        let mut drag = DragSession::start(1);
        assert!(drag.hover_over(&mut items, 5).is_err());
        assert_eq!(drag.current(), 1);
        assert_eq!(items, letters("AB"));
    }
}
