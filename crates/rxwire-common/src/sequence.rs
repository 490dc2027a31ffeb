//! Value-equality sequence container.
//!
//! Every descriptor in the pipeline is a plain value object so the whole
//! analysis is cacheable across incremental runs. `EquatableSequence` is the
//! building block: an immutable, order-sensitive wrapper whose equality and
//! hash are purely structural, suitable as a field inside cache keys.

use rustc_hash::FxHasher;
use serde::{Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Seed for the order-sensitive hash fold.
const HASH_SEED: u64 = 17;

/// Multiplier for the order-sensitive hash fold.
const HASH_STEP: u64 = 31;

/// Hash a single element with a deterministic hasher.
pub fn element_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash an optional component of a cache key, treating absence as 0.
pub fn component_hash<T: Hash>(value: Option<&T>) -> u64 {
    match value {
        Some(v) => element_hash(v),
        None => 0,
    }
}

/// Immutable sequence with structural equality and an order-sensitive,
/// deterministic hash.
///
/// Two states exist: *default* (no backing storage, hash 0) and *constructed*
/// (backing storage, possibly empty, hash folded from seed 17). A default
/// instance is never equal to a constructed empty instance; this keeps the
/// `Eq`/`Hash` contract consistent since their hashes differ (0 vs 17).
#[derive(Debug, Clone)]
pub struct EquatableSequence<T> {
    items: Option<Arc<[T]>>,
}

impl<T> Default for EquatableSequence<T> {
    fn default() -> Self {
        EquatableSequence { items: None }
    }
}

impl<T> EquatableSequence<T> {
    /// Construct from a materialized list. The sequence is immutable after this.
    pub fn new(items: Vec<T>) -> Self {
        EquatableSequence {
            items: Some(items.into()),
        }
    }

    /// Number of elements; 0 for default instances.
    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, |items| items.len())
    }

    /// True when there are no elements (default or constructed-empty).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True only for default-constructed instances (no backing storage).
    pub fn is_default(&self) -> bool {
        self.items.is_none()
    }

    /// The elements in order; empty slice for default instances.
    pub fn as_slice(&self) -> &[T] {
        self.items.as_deref().unwrap_or(&[])
    }

    /// Element at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Ordered iteration over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: Hash> EquatableSequence<T> {
    /// Deterministic, order-sensitive hash: 0 for default instances,
    /// otherwise a fold starting at the seed (so an empty constructed
    /// sequence hashes to 17).
    pub fn compute_hash(&self) -> u64 {
        match &self.items {
            None => 0,
            Some(items) => items.iter().fold(HASH_SEED, |acc, item| {
                acc.wrapping_mul(HASH_STEP)
                    .wrapping_add(element_hash(item))
            }),
        }
    }
}

impl<T: PartialEq> PartialEq for EquatableSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.items, &other.items) {
            (None, None) => true,
            (Some(a), Some(b)) => a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y),
            _ => false,
        }
    }
}

impl<T: Eq> Eq for EquatableSequence<T> {}

impl<T: Hash> Hash for EquatableSequence<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.compute_hash());
    }
}

impl<T> std::ops::Index<usize> for EquatableSequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<'a, T> IntoIterator for &'a EquatableSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> From<Vec<T>> for EquatableSequence<T> {
    fn from(items: Vec<T>) -> Self {
        EquatableSequence::new(items)
    }
}

impl<T: Serialize> Serialize for EquatableSequence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hash_is_zero() {
        let seq: EquatableSequence<String> = EquatableSequence::default();
        assert_eq!(seq.compute_hash(), 0);
    }

    #[test]
    fn test_empty_hash_is_seed() {
        let seq: EquatableSequence<String> = EquatableSequence::new(Vec::new());
        assert_eq!(seq.compute_hash(), 17);
    }

    #[test]
    fn test_component_hash_absent_is_zero() {
        assert_eq!(component_hash::<String>(None), 0);
        assert_ne!(component_hash(Some(&"x".to_string())), 0);
    }

    #[test]
    fn test_default_not_equal_to_empty() {
        let default: EquatableSequence<u32> = EquatableSequence::default();
        let empty: EquatableSequence<u32> = EquatableSequence::new(Vec::new());
        assert_ne!(default, empty);
        assert_eq!(default, EquatableSequence::default());
        assert_eq!(empty, EquatableSequence::new(Vec::new()));
    }

    #[test]
    fn test_equal_contents_equal_hash() {
        let a = EquatableSequence::new(vec!["x".to_string(), "y".to_string()]);
        let b = EquatableSequence::new(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(a, b);
        assert_eq!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_order_sensitive() {
        let ab = EquatableSequence::new(vec!["a", "b"]);
        let ba = EquatableSequence::new(vec!["b", "a"]);
        assert_ne!(ab, ba);
        assert_ne!(ab.compute_hash(), ba.compute_hash());
    }

    #[test]
    fn test_length_mismatch_not_equal() {
        let short = EquatableSequence::new(vec![1, 2]);
        let long = EquatableSequence::new(vec![1, 2, 3]);
        assert_ne!(short, long);
        assert_ne!(short.compute_hash(), long.compute_hash());
    }

    #[test]
    fn test_single_element_difference() {
        let a = EquatableSequence::new(vec![1, 2, 3]);
        let b = EquatableSequence::new(vec![1, 9, 3]);
        assert_ne!(a, b);
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_ordered_iteration() {
        let seq = EquatableSequence::new(vec![10, 20, 30]);
        let collected: Vec<i32> = seq.iter().copied().collect();
        assert_eq!(collected, vec![10, 20, 30]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[1], 20);
    }
}
