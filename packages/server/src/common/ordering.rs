//! Drag-and-drop ordering helpers for task lists.
//!
//! Positions are zero-based. Persisted `order_index` values are one-based and
//! strictly increasing.

use std::collections::HashSet;
use std::hash::Hash;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderingError {
    #[error("Position {0} is out of range")]
    OutOfRange(usize),

    #[error("Expected {expected} ids, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Duplicate id in new order")]
    Duplicate,

    #[error("Unknown id in new order")]
    Unknown,
}

/// Remove the item at `from` and insert it at `to`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), OrderingError> {
    if from >= items.len() {
        return Err(OrderingError::OutOfRange(from));
    }
    if to >= items.len() {
        return Err(OrderingError::OutOfRange(to));
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

/// Pair each id with its one-based position.
pub fn sequential_order<T: Clone>(ids: &[T]) -> Vec<(T, i32)> {
    ids.iter()
        .enumerate()
        .map(|(position, id)| (id.clone(), position as i32 + 1))
        .collect()
}

/// Check that `proposed` contains exactly the ids of `current`.
pub fn validate_permutation<T: Eq + Hash>(current: &[T], proposed: &[T]) -> Result<(), OrderingError> {
    if current.len() != proposed.len() {
        return Err(OrderingError::LengthMismatch {
            expected: current.len(),
            actual: proposed.len(),
        });
    }

    let known: HashSet<&T> = current.iter().collect();
    let mut seen = HashSet::with_capacity(proposed.len());
    for id in proposed {
        if !known.contains(id) {
            return Err(OrderingError::Unknown);
        }
        if !seen.insert(id) {
            return Err(OrderingError::Duplicate);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_item_forward() {
        let mut items = vec!["a", "b", "c", "d"];
        move_item(&mut items, 0, 2).unwrap();
        assert_eq!(items, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_move_item_backward() {
        let mut items = vec!["a", "b", "c", "d"];
        move_item(&mut items, 3, 1).unwrap();
        assert_eq!(items, vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_move_item_out_of_range() {
        let mut items = vec!["a", "b"];
        assert_eq!(move_item(&mut items, 2, 0), Err(OrderingError::OutOfRange(2)));
        assert_eq!(move_item(&mut items, 0, 5), Err(OrderingError::OutOfRange(5)));
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn test_sequential_order_is_one_based_and_increasing() {
        let order = sequential_order(&["x", "y", "z"]);
        assert_eq!(order, vec![("x", 1), ("y", 2), ("z", 3)]);
    }

    #[test]
    fn test_validate_permutation() {
        let current = [1, 2, 3];
        assert!(validate_permutation(&current, &[3, 1, 2]).is_ok());
        assert_eq!(
            validate_permutation(&current, &[1, 1, 2]),
            Err(OrderingError::Duplicate)
        );
        assert_eq!(
            validate_permutation(&current, &[1, 2, 4]),
            Err(OrderingError::Unknown)
        );
        assert!(matches!(
            validate_permutation(&current, &[1, 2]),
            Err(OrderingError::LengthMismatch { .. })
        ));
    }
}
