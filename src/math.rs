use std::{collections::BTreeSet, fmt::Display, hash::Hash};

use itertools::Itertools;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;
/// Type alias for sets whose iteration order is the natural order of the elements.
pub type OrderedSet<S> = BTreeSet<S>;
/// Type alias for maps that remember the order in which keys were inserted.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V>;

/// A partition is a different view on an equivalence relation, by grouping elements of
/// type `I` into their respective classes under the relation.
///
/// Unlike a plain set of sets, the classes and the elements within each class keep
/// the order in which they were discovered. Equality disregards both orders.
#[derive(Debug, Clone)]
pub struct Partition<I: Hash + Eq>(Vec<Vec<I>>);

impl<I: Hash + Eq> std::ops::Deref for Partition<I> {
    type Target = Vec<Vec<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Hash + Eq> IntoIterator for &'a Partition<I> {
    type Item = &'a Vec<I>;
    type IntoIter = std::slice::Iter<'a, Vec<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Hash + Ord> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        fn classes<I: Hash + Ord>(p: &Partition<I>) -> Set<OrderedSet<&I>> {
            p.iter().map(|class| class.iter().collect()).collect()
        }
        self.len() == other.len() && classes(self) == classes(other)
    }
}
impl<I: Hash + Ord> Eq for Partition<I> {}

impl<I: Hash + Eq> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators
    /// which yield elements of type `I`. Empty classes are dropped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect_vec())
                .filter(|class| !class.is_empty())
                .collect(),
        )
    }

    /// Returns the position of the class containing `element`, if any.
    pub fn class_of(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|class| class.contains(element))
    }

    /// Returns the total number of elements across all classes.
    pub fn element_count(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }
}

impl<I: Hash + Eq> From<Vec<Vec<I>>> for Partition<I> {
    fn from(value: Vec<Vec<I>>) -> Self {
        Self(value)
    }
}

impl<I: Hash + Eq + Display> Display for Partition<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            self.0
                .iter()
                .map(|class| format!("[{}]", class.iter().join(", ")))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn partition_equality_ignores_order() {
        let left = Partition::new([vec!["A", "B"], vec!["C"]]);
        let right = Partition::new([vec!["C"], vec!["B", "A"]]);
        assert_eq!(left, right);
        assert_ne!(left, Partition::new([vec!["A"], vec!["B", "C"]]));
    }

    #[test]
    fn partition_drops_empty_classes() {
        let p = Partition::new([vec![], vec![1, 2], vec![]]);
        assert_eq!(p.size(), 1);
        assert_eq!(p.class_of(&2), Some(0));
        assert_eq!(p.class_of(&3), None);
        assert_eq!(p.to_string(), "[[1, 2]]");
    }
}
