//! Scratch store: process-lifetime key/value memory for user data.
//!
//! The store has no internal locking. [`crate::Bot`] keeps it behind a mutex
//! so command handlers can reach it through their context.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use thiserror::Error;

/// Raised when a lookup asserted an expected value and got something else.
///
/// `None` on either side means "absent and no default".
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "incorrect value in scratch data: queried {key:?}={actual:?}, expected {key:?}={expected:?}"
)]
pub struct ComparisonError<K, V> {
    pub key: K,
    pub actual: Option<V>,
    pub expected: Option<V>,
}

/// Ad hoc key/value store.
#[derive(Debug, Clone)]
pub struct ScratchStore<K = String, V = serde_json::Value> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for ScratchStore<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> ScratchStore<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`, returning the stored value.
    pub fn set(&mut self, key: K, value: V) -> &V {
        match self.entries.entry(key) {
            Entry::Occupied(mut slot) => {
                slot.insert(value);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(value),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Stored value for `key`, else `default`.
    pub fn get_or<Q>(&self, key: &Q, default: Option<V>) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.entries.get(key).cloned().or(default)
    }

    /// Like [`get_or`](Self::get_or), but fails unless the resolved value
    /// equals `expected`. Passing `expected = None` asserts that the key is
    /// absent and no default was given.
    pub fn get_checked<Q>(
        &self,
        key: &Q,
        default: Option<V>,
        expected: Option<V>,
    ) -> Result<Option<V>, ComparisonError<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        V: Clone + PartialEq,
    {
        self.lookup(key, default, Some(expected))
    }

    /// General lookup. The outer `Option` of `expected` says whether an
    /// assertion was requested at all.
    pub fn lookup<Q>(
        &self,
        key: &Q,
        default: Option<V>,
        expected: Option<Option<V>>,
    ) -> Result<Option<V>, ComparisonError<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        V: Clone + PartialEq,
    {
        let actual = self.get_or(key, default);
        match expected {
            Some(expected) if expected != actual => Err(ComparisonError {
                key: key.to_owned(),
                actual,
                expected,
            }),
            _ => Ok(actual),
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
