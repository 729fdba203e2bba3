/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// A set that remembers the order in which its elements were inserted. Iteration yields
/// elements in insertion order and each element can be addressed by its position.
pub type OrderedSet<S> = indexmap::IndexSet<S, fxhash::FxBuildHasher>;
/// A map that remembers the order in which its keys were inserted.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

#[cfg(test)]
mod tests {
    use super::OrderedSet;

    #[test]
    fn ordered_set_keeps_insertion_order() {
        let mut set: OrderedSet<&str> = OrderedSet::default();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(set.get_index_of("a"), Some(1));
    }
}
