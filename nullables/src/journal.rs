//! Undo-journaled containers.
//!
//! Each write inside an open session records the value it replaced. Commit
//! folds the records into the enclosing session (or drops them at the
//! outermost level); rollback replays them in reverse.

use std::collections::BTreeMap;

/// An ordered map with nested undo sessions.
#[derive(Clone, Debug)]
pub struct JournaledMap<K, V> {
    rows: BTreeMap<K, V>,
    sessions: Vec<Vec<(K, Option<V>)>>,
}

impl<K: Ord + Clone, V: Clone> JournaledMap<K, V> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            sessions: Vec::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.rows.iter().next()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.rows.iter()
    }

    pub fn insert(&mut self, key: K, value: V) {
        let prev = self.rows.insert(key.clone(), value);
        self.record(key, prev);
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let prev = self.rows.remove(key);
        if prev.is_some() {
            self.record(key.clone(), prev.clone());
        }
        prev
    }

    fn record(&mut self, key: K, prev: Option<V>) {
        if let Some(session) = self.sessions.last_mut() {
            session.push((key, prev));
        }
    }

    pub fn begin(&mut self) {
        self.sessions.push(Vec::new());
    }

    /// Returns `false` when no session is open.
    pub fn commit(&mut self) -> bool {
        let Some(top) = self.sessions.pop() else {
            return false;
        };
        if let Some(parent) = self.sessions.last_mut() {
            parent.extend(top);
        }
        true
    }

    /// Returns `false` when no session is open.
    pub fn rollback(&mut self) -> bool {
        let Some(top) = self.sessions.pop() else {
            return false;
        };
        for (key, prev) in top.into_iter().rev() {
            match prev {
                Some(value) => {
                    self.rows.insert(key, value);
                }
                None => {
                    self.rows.remove(&key);
                }
            }
        }
        true
    }

    pub fn depth(&self) -> usize {
        self.sessions.len()
    }
}

impl<K: Ord + Clone, V: Clone> Default for JournaledMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A single value with nested undo sessions.
#[derive(Clone, Debug)]
pub struct JournaledValue<T> {
    value: T,
    sessions: Vec<Vec<T>>,
}

impl<T: Clone> JournaledValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            sessions: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        let prev = std::mem::replace(&mut self.value, value);
        if let Some(session) = self.sessions.last_mut() {
            session.push(prev);
        }
    }

    pub fn begin(&mut self) {
        self.sessions.push(Vec::new());
    }

    pub fn commit(&mut self) -> bool {
        let Some(top) = self.sessions.pop() else {
            return false;
        };
        if let Some(parent) = self.sessions.last_mut() {
            parent.extend(top);
        }
        true
    }

    pub fn rollback(&mut self) -> bool {
        let Some(top) = self.sessions.pop() else {
            return false;
        };
        // The first record of the session holds the value it started from.
        if let Some(original) = top.into_iter().next() {
            self.value = original;
        }
        true
    }
}

impl<T: Clone + Default> Default for JournaledValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
