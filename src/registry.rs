//! Registry of named resize variants.
//!
//! Plugins declare variants (`thumb` = 100x100, `hero` = 1600x900, ...) by
//! registering them here while they are loaded. Loading is transactional:
//! [`Transaction`] snapshots the registry before a plugin runs and puts the
//! snapshot back unless the plugin finished cleanly, so a plugin that fails
//! halfway never leaves half of its variants behind.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

use crate::naming::ResizeKey;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("variant '{0}' is already registered")]
    AlreadyRegistered(String),
    #[error("variant '{0}' is not registered")]
    NotRegistered(String),
}

/// Store that can be rolled back to an earlier state.
pub trait Registry {
    type Snapshot;

    /// Copy of the current contents.
    fn snapshot(&self) -> Self::Snapshot;

    /// Replace the current contents with `snapshot`.
    fn restore(&mut self, snapshot: Self::Snapshot);
}

/// A named resize declared by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    pub key: String,
    pub width: u32,
    pub height: u32,
}

impl Variant {
    pub fn new(key: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            key: key.into(),
            width,
            height,
        }
    }

    pub fn resize_key(&self) -> ResizeKey {
        ResizeKey::new(self.width, self.height, self.key.clone())
    }
}

/// Variants keyed by name, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizedImageRegistry {
    variants: BTreeMap<String, Variant>,
}

impl SizedImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, variant: Variant) -> Result<(), RegistryError> {
        if self.variants.contains_key(&variant.key) {
            return Err(RegistryError::AlreadyRegistered(variant.key));
        }
        self.variants.insert(variant.key.clone(), variant);
        Ok(())
    }

    pub fn unregister(&mut self, key: &str) -> Result<Variant, RegistryError> {
        self.variants
            .remove(key)
            .ok_or_else(|| RegistryError::NotRegistered(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.variants.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.variants.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values()
    }
}

impl Registry for SizedImageRegistry {
    type Snapshot = BTreeMap<String, Variant>;

    fn snapshot(&self) -> Self::Snapshot {
        self.variants.clone()
    }

    fn restore(&mut self, snapshot: Self::Snapshot) {
        self.variants = snapshot;
    }
}

/// Rollback guard over a [`Registry`].
///
/// Derefs to the registry so code running inside the transaction uses it
/// directly. Dropping the guard without calling [`commit`](Self::commit)
/// restores the snapshot taken in [`begin`](Self::begin).
pub struct Transaction<'a, R: Registry> {
    registry: &'a mut R,
    snapshot: Option<R::Snapshot>,
}

impl<'a, R: Registry> Transaction<'a, R> {
    pub fn begin(registry: &'a mut R) -> Self {
        let snapshot = registry.snapshot();
        Self {
            registry,
            snapshot: Some(snapshot),
        }
    }

    /// Keep every change made through this transaction.
    pub fn commit(mut self) {
        self.snapshot = None;
    }
}

impl<R: Registry> Deref for Transaction<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.registry
    }
}

impl<R: Registry> DerefMut for Transaction<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut *self.registry
    }
}

impl<R: Registry> Drop for Transaction<'_, R> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.registry.restore(snapshot);
        }
    }
}
