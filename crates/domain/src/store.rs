//! Persistent Catalog Store
//!
//! Client-local key-value slots holding JSON documents. Reads never fail: a missing slot or a
//! document that does not deserialize yields the caller's fallback. Writes overwrite the whole
//! slot, so concurrent writers sharing the same storage silently replace each other's data.

use std::{cell::RefCell, collections::BTreeMap};

use log::warn;
use serde::{Serialize, de::DeserializeOwned};
use strum::AsRefStr;

use crate::StorageError;

/// Raw access to a durable string slot, e.g. the browser's `localStorage`.
pub trait KeyValueRepository {
    fn read_value(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write_value(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<R: KeyValueRepository + ?Sized> KeyValueRepository for &R {
    fn read_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read_value(key)
    }

    fn write_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write_value(key, value)
    }
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    #[strum(serialize = "coach_ai_exercise_catalog_v1")]
    ExerciseCatalog,
    #[strum(serialize = "coach_ai_routines_v1")]
    Routines,
    #[strum(serialize = "coach_ai_athlete_id_v1")]
    AthleteID,
}

pub struct JsonStore<R> {
    repository: R,
}

impl<R: KeyValueRepository> JsonStore<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn load<T: DeserializeOwned>(&self, key: Key, fallback: T) -> T {
        match self.repository.read_value(key.as_ref()) {
            Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!("failed to parse {}, using fallback: {err}", key.as_ref());
                    fallback
                }
            },
            Ok(_) => fallback,
            Err(err) => {
                warn!("failed to read {}, using fallback: {err}", key.as_ref());
                fallback
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: Key, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.repository.write_value(key.as_ref(), &raw)
    }
}

/// Volatile storage for hosts without a durable store.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(self, key: Key, value: &str) -> Self {
        self.values
            .borrow_mut()
            .insert(key.as_ref().to_string(), value.to_string());
        self
    }
}

impl KeyValueRepository for MemoryRepository {
    fn read_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
