//! Exercise Catalog
//!
//! The athlete's personal list of canonical exercise names. Names are unique under
//! case-insensitive comparison; the check happens on insertion only, so a collection written
//! by another client is read as-is.

use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CreateError, DeleteError, JsonStore, Key, KeyValueRepository, Name};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCatalogItem {
    pub id: CatalogItemID,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    pub created_at_utc: DateTime<Utc>,
}

#[derive(Deref, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogItemID(String);

impl CatalogItemID {
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("ex_{}", Uuid::new_v4().simple()))
    }
}

impl From<&str> for CatalogItemID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

pub struct ExerciseCatalog<R> {
    store: JsonStore<R>,
}

impl<R: KeyValueRepository> ExerciseCatalog<R> {
    pub fn new(repository: R) -> Self {
        Self {
            store: JsonStore::new(repository),
        }
    }

    fn read(&self) -> Vec<ExerciseCatalogItem> {
        self.store.load(Key::ExerciseCatalog, vec![])
    }

    /// Items sorted by name, case-sensitive.
    pub fn list(&self) -> Vec<ExerciseCatalogItem> {
        let mut items = self.read();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// Names offered as suggestions while entering an exercise.
    pub fn names(&self) -> Vec<Name> {
        self.list().into_iter().map(|item| item.name).collect()
    }

    pub fn add(&self, name: &str, group: Option<&str>) -> Result<ExerciseCatalogItem, CreateError> {
        let name = Name::new(name).map_err(crate::ValidationError::from)?;
        let mut items = self.read();

        if items.iter().any(|item| item.name.eq_ignore_case(&name)) {
            debug!("rejected duplicate exercise name {name}");
            return Err(CreateError::Conflict(name.to_string()));
        }

        let item = ExerciseCatalogItem {
            id: CatalogItemID::generate(),
            name,
            group: group
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(ToString::to_string),
            aliases: None,
            created_at_utc: Utc::now(),
        };
        items.push(item.clone());
        self.store.save(Key::ExerciseCatalog, &items)?;

        Ok(item)
    }

    pub fn remove(&self, id: &CatalogItemID) -> Result<(), DeleteError> {
        let mut items = self.read();
        let len = items.len();
        items.retain(|item| item.id != *id);

        if items.len() != len {
            self.store.save(Key::ExerciseCatalog, &items)?;
        }

        Ok(())
    }
}
