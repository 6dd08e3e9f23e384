use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CreateError, DeleteError, JsonStore, Key, KeyValueRepository, Name, ValidationError};

/// A named, ordered list of exercise names used to pre-fill a session draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineTemplate {
    pub id: RoutineID,
    pub name: Name,
    pub exercises: Vec<String>,
    pub created_at_utc: DateTime<Utc>,
}

#[derive(Deref, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutineID(String);

impl RoutineID {
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("rt_{}", Uuid::new_v4().simple()))
    }
}

impl From<&str> for RoutineID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Splits a block of text into exercise names, one per non-blank line.
pub fn parse_exercise_lines(lines: &str) -> Result<Vec<String>, ValidationError> {
    let exercises = lines
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    if exercises.is_empty() {
        return Err(ValidationError::NoRoutineExercise);
    }

    Ok(exercises)
}

pub struct RoutineTemplates<R> {
    store: JsonStore<R>,
}

impl<R: KeyValueRepository> RoutineTemplates<R> {
    pub fn new(repository: R) -> Self {
        Self {
            store: JsonStore::new(repository),
        }
    }

    fn read(&self) -> Vec<RoutineTemplate> {
        self.store.load(Key::Routines, vec![])
    }

    pub fn list(&self) -> Vec<RoutineTemplate> {
        let mut routines = self.read();
        routines.sort_by(|a, b| a.name.cmp(&b.name));
        routines
    }

    pub fn get(&self, id: &RoutineID) -> Option<RoutineTemplate> {
        self.read().into_iter().find(|routine| routine.id == *id)
    }

    // Routine names may repeat, unlike exercise names in the catalog.
    pub fn add(&self, name: &str, exercise_lines: &str) -> Result<RoutineTemplate, CreateError> {
        let name = Name::new(name).map_err(ValidationError::from)?;
        let exercises = parse_exercise_lines(exercise_lines)?;

        let routine = RoutineTemplate {
            id: RoutineID::generate(),
            name,
            exercises,
            created_at_utc: Utc::now(),
        };
        let mut routines = self.read();
        routines.push(routine.clone());
        self.store.save(Key::Routines, &routines)?;

        Ok(routine)
    }

    pub fn remove(&self, id: &RoutineID) -> Result<(), DeleteError> {
        let mut routines = self.read();
        let len = routines.len();
        routines.retain(|routine| routine.id != *id);

        if routines.len() != len {
            self.store.save(Key::Routines, &routines)?;
        }

        Ok(())
    }
}
