//! Backing storage for remembered styles
//!
//! The cache only needs get/insert/contains/len/keys, so any map can back
//! it. `&mut S` lends a caller-owned map for the lifetime of one cache;
//! `Rc<RefCell<S>>` shares one map between several caches.
//!
//! None of these are synchronized. Sharing a store is safe for
//! single-threaded use only.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;

/// A key -> style map the remembered-style cache can read and write.
pub trait StyleStore {
    /// The lookup key (e.g. a data series name)
    type Key;
    /// The stored style
    type Style;

    /// A copy of the style stored for `key`, if any
    fn lookup(&self, key: &Self::Key) -> Option<Self::Style>;

    /// Store `style` under `key`
    fn insert(&mut self, key: Self::Key, style: Self::Style);

    /// Number of assigned keys
    fn len(&self) -> usize;

    /// The assigned keys, as of this call
    fn keys(&self) -> Vec<Self::Key>;

    /// Whether `key` has been assigned a style
    fn contains(&self, key: &Self::Key) -> bool {
        self.lookup(key).is_some()
    }

    /// True when nothing has been assigned
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<Q, T, S> StyleStore for HashMap<Q, T, S>
where
    Q: Eq + Hash + Clone,
    T: Clone,
    S: BuildHasher,
{
    type Key = Q;
    type Style = T;

    fn lookup(&self, key: &Q) -> Option<T> {
        self.get(key).cloned()
    }

    fn insert(&mut self, key: Q, style: T) {
        Self::insert(self, key, style);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn keys(&self) -> Vec<Q> {
        Self::keys(self).cloned().collect()
    }

    fn contains(&self, key: &Q) -> bool {
        self.contains_key(key)
    }
}

impl<Q, T> StyleStore for BTreeMap<Q, T>
where
    Q: Ord + Clone,
    T: Clone,
{
    type Key = Q;
    type Style = T;

    fn lookup(&self, key: &Q) -> Option<T> {
        self.get(key).cloned()
    }

    fn insert(&mut self, key: Q, style: T) {
        Self::insert(self, key, style);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn keys(&self) -> Vec<Q> {
        Self::keys(self).cloned().collect()
    }

    fn contains(&self, key: &Q) -> bool {
        self.contains_key(key)
    }
}

impl<M: StyleStore + ?Sized> StyleStore for &mut M {
    type Key = M::Key;
    type Style = M::Style;

    fn lookup(&self, key: &Self::Key) -> Option<Self::Style> {
        (**self).lookup(key)
    }

    fn insert(&mut self, key: Self::Key, style: Self::Style) {
        (**self).insert(key, style);
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn keys(&self) -> Vec<Self::Key> {
        (**self).keys()
    }

    fn contains(&self, key: &Self::Key) -> bool {
        (**self).contains(key)
    }
}

impl<M: StyleStore> StyleStore for Rc<RefCell<M>> {
    type Key = M::Key;
    type Style = M::Style;

    fn lookup(&self, key: &Self::Key) -> Option<Self::Style> {
        self.borrow().lookup(key)
    }

    fn insert(&mut self, key: Self::Key, style: Self::Style) {
        self.borrow_mut().insert(key, style);
    }

    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn keys(&self) -> Vec<Self::Key> {
        self.borrow().keys()
    }

    fn contains(&self, key: &Self::Key) -> bool {
        self.borrow().contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<S: StyleStore<Key = &'static str, Style = u8>>(mut store: S) -> S {
        assert!(store.is_empty());
        store.insert("cat", 1);
        store.insert("dog", 2);
        assert_eq!(store.lookup(&"cat"), Some(1));
        assert!(store.contains(&"dog"));
        assert!(!store.contains(&"emu"));
        assert_eq!(store.len(), 2);
        store
    }

    #[test]
    fn test_hash_map_store() {
        let store = exercise(HashMap::new());
        let mut keys = StyleStore::keys(&store);
        keys.sort_unstable();
        assert_eq!(keys, vec!["cat", "dog"]);
    }

    #[test]
    fn test_btree_map_store_keys_are_ordered() {
        let store = exercise(BTreeMap::new());
        assert_eq!(StyleStore::keys(&store), vec!["cat", "dog"]);
    }

    #[test]
    fn test_borrowed_store_writes_through() {
        let mut owned = BTreeMap::new();
        exercise(&mut owned);
        assert_eq!(owned.get("dog"), Some(&2));
    }

    #[test]
    fn test_shared_store_is_visible_to_all_handles() {
        let shared = Rc::new(RefCell::new(BTreeMap::new()));
        let handle = exercise(Rc::clone(&shared));
        assert_eq!(shared.borrow().len(), 2);
        assert_eq!(handle.len(), 2);
    }
}
