//! Position exchange for sibling elements.
//!
//! Two semantics coexist on purpose and must not be unified: modules trade
//! places (`swap_positions`), while menu items, images and documents are
//! spliced out and reinserted (`move_element`), shifting everything in
//! between. The two have historically different behavior at their call
//! sites.

use tracing::warn;

/// Direct two-element swap. Out-of-range or identical indices are rejected
/// with a diagnostic and no mutation.
pub fn swap_positions<T>(items: &mut [T], a: usize, b: usize) -> bool {
    let len = items.len();
    if a >= len || b >= len {
        warn!(a, b, len, "swap rejected: index out of range");
        return false;
    }
    if a == b {
        warn!(index = a, "swap rejected: identical positions");
        return false;
    }
    items.swap(a, b);
    true
}

/// Ordered move: the element at `from` is removed and reinserted at `to`,
/// shifting the elements in between. `from == to` is a legal no-op.
pub fn move_element<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    let len = items.len();
    if from >= len || to >= len {
        warn!(from, to, len, "move rejected: index out of range");
        return false;
    }
    if from == to {
        return true;
    }
    let element = items.remove(from);
    items.insert(to, element);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_is_its_own_inverse() {
        let original = vec!["A", "B", "C", "D"];
        for (a, b) in [(0, 1), (0, 3), (1, 3), (2, 0)] {
            let mut items = original.clone();
            assert!(swap_positions(&mut items, a, b));
            assert!(swap_positions(&mut items, a, b));
            assert_eq!(items, original);
        }
    }

    #[test]
    fn swap_touches_only_the_two_positions() {
        let mut items = vec!["A", "B", "C", "D"];
        assert!(swap_positions(&mut items, 0, 2));
        assert_eq!(items, ["C", "B", "A", "D"]);
    }

    #[test]
    fn swap_rejects_invalid_indices_without_mutation() {
        let original = vec!["A", "B", "C"];
        for (a, b) in [(0, 3), (3, 0), (5, 5), (1, 1)] {
            let mut items = original.clone();
            assert!(!swap_positions(&mut items, a, b));
            assert_eq!(items, original);
        }
    }

    #[test]
    fn move_splices_and_shifts() {
        let mut items = vec!["A", "B", "C"];
        assert!(move_element(&mut items, 0, 2));
        assert_eq!(items, ["B", "C", "A"]);

        // the opposite move restores this particular case
        assert!(move_element(&mut items, 2, 0));
        assert_eq!(items, ["A", "B", "C"]);
    }

    #[test]
    fn move_applied_twice_is_not_an_identity() {
        // unlike swap, repeating the same move keeps rotating the list
        let mut items = vec!["A", "B", "C", "D"];
        assert!(move_element(&mut items, 1, 3));
        assert_eq!(items, ["A", "C", "D", "B"]);
        assert!(move_element(&mut items, 1, 3));
        assert_eq!(items, ["A", "D", "B", "C"]);

        // the same pair of indices under swap semantics restores the list
        let original = vec!["A", "B", "C", "D"];
        let mut swapped = original.clone();
        swap_positions(&mut swapped, 1, 3);
        swap_positions(&mut swapped, 1, 3);
        assert_eq!(swapped, original);
    }

    #[test]
    fn move_to_the_end_appends() {
        let mut items = vec!["A", "B", "C"];
        assert!(move_element(&mut items, 0, 2));
        assert_eq!(items, ["B", "C", "A"]);
    }

    #[test]
    fn move_rejects_out_of_range_and_allows_same_index() {
        let original = vec!["A", "B", "C"];
        let mut items = original.clone();
        assert!(!move_element(&mut items, 0, 3));
        assert!(!move_element(&mut items, 4, 0));
        assert_eq!(items, original);

        // moving onto the own position is a legal no-op
        assert!(move_element(&mut items, 1, 1));
        assert_eq!(items, original);
    }
}
