use derive_more::{Deref, Display};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{Key, KeyValueRepository, StorageError};

pub const DEFAULT_ATHLETE_ID: &str = "a1";

#[derive(Deref, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AthleteID(String);

impl AthleteID {
    /// Trims the identifier; a blank identifier falls back to the default athlete.
    #[must_use]
    pub fn new(id: &str) -> Self {
        let id = id.trim();
        if id.is_empty() {
            Self::default()
        } else {
            Self(id.to_string())
        }
    }
}

impl Default for AthleteID {
    fn default() -> Self {
        Self(DEFAULT_ATHLETE_ID.to_string())
    }
}

impl From<&str> for AthleteID {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The athlete all views operate on, persisted across sessions.
///
/// Storage is the single source of truth: every read goes to the repository, so all holders
/// of a `CurrentAthlete` over the same storage agree on the value.
pub struct CurrentAthlete<R> {
    repository: R,
}

impl<R: KeyValueRepository> CurrentAthlete<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn get(&self) -> AthleteID {
        match self.repository.read_value(Key::AthleteID.as_ref()) {
            Ok(Some(id)) => AthleteID::new(&id),
            Ok(None) => AthleteID::default(),
            Err(err) => {
                warn!("failed to read current athlete: {err}");
                AthleteID::default()
            }
        }
    }

    pub fn set(&self, id: &str) -> Result<AthleteID, StorageError> {
        let id = AthleteID::new(id);
        self.repository.write_value(Key::AthleteID.as_ref(), &id)?;
        Ok(id)
    }
}
