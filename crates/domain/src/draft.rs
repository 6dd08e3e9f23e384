//! Session Draft Builder
//!
//! The editable state of one workout session form. Every transition consumes the draft and
//! returns the complete successor, so a reader holding a previous draft never observes a
//! partially applied edit.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::{
    AthleteID, ExerciseEntry, MODALITY_STRENGTH, Name, RoutineID, RoutineTemplate, SessionRecord,
    Set, Source, ValidationError, parse_number,
};

const DEFAULT_DURATION_MIN: &str = "60";
const DEFAULT_RPE: &str = "7";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionDraft {
    start_time: Option<DateTime<Utc>>,
    duration_min: String,
    rpe: String,
    notes: String,
    routine_id: Option<RoutineID>,
    exercises: Vec<ExerciseDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseDraft {
    pub name: String,
    pub sets: Vec<SetDraft>,
}

impl ExerciseDraft {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sets: vec![SetDraft::default()],
        }
    }

    fn normalize(&self) -> Option<ExerciseEntry> {
        let name = Name::new(&self.name).ok()?;
        let sets = self
            .sets
            .iter()
            .filter_map(SetDraft::normalize)
            .collect::<Vec<_>>();
        if sets.is_empty() {
            return None;
        }
        Some(ExerciseEntry { name, sets })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetDraft {
    pub reps: String,
    pub load_kg: String,
}

impl SetDraft {
    fn normalize(&self) -> Option<Set> {
        let reps = parse_number(&self.reps);
        let load_kg = parse_number(&self.load_kg);

        if !reps.is_finite() || reps <= 0.0 || reps.fract() != 0.0 || reps > f64::from(u32::MAX)
        {
            return None;
        }
        if !load_kg.is_finite() || load_kg < 0.0 {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let reps = reps as u32;

        Some(Set { reps, load_kg })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Reps,
    LoadKg,
}

impl Default for SessionDraft {
    fn default() -> Self {
        Self {
            start_time: None,
            duration_min: DEFAULT_DURATION_MIN.to_string(),
            rpe: DEFAULT_RPE.to_string(),
            notes: String::new(),
            routine_id: None,
            exercises: vec![ExerciseDraft::named("")],
        }
    }
}

impl SessionDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    #[must_use]
    pub fn duration_min(&self) -> &str {
        &self.duration_min
    }

    #[must_use]
    pub fn rpe(&self) -> &str {
        &self.rpe
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn routine_id(&self) -> Option<&RoutineID> {
        self.routine_id.as_ref()
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseDraft] {
        &self.exercises
    }

    #[must_use]
    pub fn set_start_time(self, start_time: Option<DateTime<Utc>>) -> Self {
        Self { start_time, ..self }
    }

    /// Sets the start time from a local date-time form value (`YYYY-MM-DDTHH:MM[:SS]`).
    ///
    /// An empty or unparsable value unsets the start time.
    #[must_use]
    pub fn set_local_start_time(self, value: &str) -> Self {
        let start_time = parse_local_date_time(value, &Local);
        self.set_start_time(start_time)
    }

    #[must_use]
    pub fn set_duration_min(self, duration_min: &str) -> Self {
        Self {
            duration_min: duration_min.to_string(),
            ..self
        }
    }

    #[must_use]
    pub fn set_rpe(self, rpe: &str) -> Self {
        Self {
            rpe: rpe.to_string(),
            ..self
        }
    }

    #[must_use]
    pub fn set_notes(self, notes: &str) -> Self {
        Self {
            notes: notes.to_string(),
            ..self
        }
    }

    #[must_use]
    pub fn add_exercise(self) -> Self {
        let mut exercises = self.exercises;
        exercises.push(ExerciseDraft::named(""));
        Self { exercises, ..self }
    }

    /// Removes an exercise; the last remaining exercise is kept.
    #[must_use]
    pub fn remove_exercise(self, idx: usize) -> Self {
        if self.exercises.len() <= 1 || idx >= self.exercises.len() {
            return self;
        }
        let mut exercises = self.exercises;
        exercises.remove(idx);
        Self { exercises, ..self }
    }

    #[must_use]
    pub fn set_exercise_name(self, idx: usize, name: &str) -> Self {
        self.map_exercise(idx, |exercise| ExerciseDraft {
            name: name.to_string(),
            ..exercise
        })
    }

    #[must_use]
    pub fn add_set(self, exercise_idx: usize) -> Self {
        self.map_exercise(exercise_idx, |mut exercise| {
            exercise.sets.push(SetDraft::default());
            exercise
        })
    }

    /// Removes a set; the last remaining set of an exercise is kept.
    #[must_use]
    pub fn remove_set(self, exercise_idx: usize, set_idx: usize) -> Self {
        self.map_exercise(exercise_idx, |mut exercise| {
            if exercise.sets.len() > 1 && set_idx < exercise.sets.len() {
                exercise.sets.remove(set_idx);
            }
            exercise
        })
    }

    #[must_use]
    pub fn set_set_field(
        self,
        exercise_idx: usize,
        set_idx: usize,
        field: SetField,
        value: &str,
    ) -> Self {
        self.map_exercise(exercise_idx, |mut exercise| {
            if let Some(set) = exercise.sets.get_mut(set_idx) {
                match field {
                    SetField::Reps => set.reps = value.to_string(),
                    SetField::LoadKg => set.load_kg = value.to_string(),
                }
            }
            exercise
        })
    }

    /// Replaces all exercises by one entry with an empty set per routine exercise.
    ///
    /// Exercise and set data entered before is discarded.
    #[must_use]
    pub fn apply_routine(self, routine: &RoutineTemplate) -> Self {
        Self {
            routine_id: Some(routine.id.clone()),
            exercises: routine
                .exercises
                .iter()
                .map(|name| ExerciseDraft::named(name))
                .collect(),
            ..self
        }
    }

    fn map_exercise(self, idx: usize, f: impl FnOnce(ExerciseDraft) -> ExerciseDraft) -> Self {
        if idx >= self.exercises.len() {
            return self;
        }
        let mut exercises = self.exercises;
        let exercise = std::mem::take(&mut exercises[idx]);
        exercises[idx] = f(exercise);
        Self { exercises, ..self }
    }

    /// Validates the draft and builds the session record to submit.
    ///
    /// Checks are applied in order and the first failure is returned. Sets without positive
    /// integral reps or with a negative load are dropped, as are exercises without a name or
    /// without any remaining set.
    pub fn to_session_record(&self, athlete_id: &AthleteID) -> Result<SessionRecord, ValidationError> {
        let start_time = self.start_time.ok_or(ValidationError::MissingStartTime)?;

        let duration_min = parse_number(&self.duration_min);
        if !duration_min.is_finite() || duration_min <= 0.0 {
            return Err(ValidationError::InvalidDuration);
        }

        let rpe = parse_number(&self.rpe);
        if !rpe.is_finite() || !(0.0..=10.0).contains(&rpe) {
            return Err(ValidationError::InvalidRPE);
        }

        let exercises = self
            .exercises
            .iter()
            .filter_map(ExerciseDraft::normalize)
            .collect::<Vec<_>>();
        if exercises.is_empty() {
            return Err(ValidationError::NoValidExercise);
        }

        let mut meta = Map::new();
        if !self.notes.is_empty() {
            meta.insert("note".to_string(), Value::String(self.notes.clone()));
        }

        Ok(SessionRecord {
            athlete_id: athlete_id.clone(),
            start_time,
            duration_min,
            rpe,
            modality: MODALITY_STRENGTH.to_string(),
            exercises,
            source: Source::UI,
            meta,
        })
    }
}

fn parse_local_date_time<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    fn athlete() -> AthleteID {
        AthleteID::from("a1")
    }

    fn routine(exercises: &[&str]) -> RoutineTemplate {
        RoutineTemplate {
            id: RoutineID::from("rt_1"),
            name: Name::new("Push A").unwrap(),
            exercises: exercises.iter().map(ToString::to_string).collect(),
            created_at_utc: start(),
        }
    }

    fn names(draft: &SessionDraft) -> Vec<&str> {
        draft.exercises().iter().map(|e| e.name.as_str()).collect()
    }

    fn valid_draft() -> SessionDraft {
        SessionDraft::new()
            .set_start_time(Some(start()))
            .set_exercise_name(0, "Bench Press")
            .set_set_field(0, 0, SetField::Reps, "8")
            .set_set_field(0, 0, SetField::LoadKg, "60")
    }

    #[test]
    fn test_new() {
        let draft = SessionDraft::new();

        assert_eq!(draft.start_time(), None);
        assert_eq!(draft.duration_min(), "60");
        assert_eq!(draft.rpe(), "7");
        assert_eq!(draft.notes(), "");
        assert_eq!(draft.exercises(), &[ExerciseDraft::named("")]);
    }

    #[test]
    fn test_transitions_keep_previous_value() {
        let draft = SessionDraft::new().set_exercise_name(0, "Squat");
        let previous = draft.clone();

        let next = draft.add_exercise().set_exercise_name(1, "Row").add_set(1);

        assert_eq!(names(&previous), vec!["Squat"]);
        assert_eq!(names(&next), vec!["Squat", "Row"]);
        assert_eq!(next.exercises()[1].sets.len(), 2);
    }

    #[test]
    fn test_remove_exercise() {
        let draft = SessionDraft::new()
            .set_exercise_name(0, "Squat")
            .add_exercise()
            .set_exercise_name(1, "Row")
            .add_exercise()
            .set_exercise_name(2, "Dips");

        let draft = draft.remove_exercise(1);
        assert_eq!(names(&draft), vec!["Squat", "Dips"]);

        let draft = draft.remove_exercise(5);
        assert_eq!(names(&draft), vec!["Squat", "Dips"]);

        let draft = draft.remove_exercise(0).remove_exercise(0);
        assert_eq!(names(&draft), vec!["Dips"]);
    }

    #[test]
    fn test_remove_set() {
        let draft = SessionDraft::new()
            .add_set(0)
            .set_set_field(0, 0, SetField::Reps, "5")
            .set_set_field(0, 1, SetField::Reps, "3");

        let draft = draft.remove_set(0, 0);
        assert_eq!(
            draft.exercises()[0].sets,
            vec![SetDraft {
                reps: "3".to_string(),
                load_kg: String::new()
            }]
        );

        let draft = draft.remove_set(0, 0).remove_set(3, 0);
        assert_eq!(draft.exercises()[0].sets.len(), 1);
    }

    #[test]
    fn test_set_set_field_out_of_range() {
        let draft = SessionDraft::new();

        assert_eq!(
            draft.clone().set_set_field(0, 4, SetField::Reps, "5"),
            draft
        );
        assert_eq!(draft.clone().set_exercise_name(2, "Row"), draft);
    }

    #[test]
    fn test_apply_routine() {
        let draft = SessionDraft::new()
            .set_exercise_name(0, "Squat")
            .set_set_field(0, 0, SetField::Reps, "5")
            .add_set(0)
            .set_notes("tired");

        let draft = draft.apply_routine(&routine(&["Bench", "Row"]));

        assert_eq!(names(&draft), vec!["Bench", "Row"]);
        assert!(
            draft
                .exercises()
                .iter()
                .all(|e| e.sets == vec![SetDraft::default()])
        );
        assert_eq!(draft.routine_id(), Some(&RoutineID::from("rt_1")));
        assert_eq!(draft.notes(), "tired");
    }

    #[test]
    fn test_to_session_record() {
        let draft = valid_draft()
            .set_duration_min("45")
            .set_rpe("8.5")
            .set_notes("low sleep");

        assert_eq!(
            draft.to_session_record(&athlete()),
            Ok(SessionRecord {
                athlete_id: athlete(),
                start_time: start(),
                duration_min: 45.0,
                rpe: 8.5,
                modality: "strength".to_string(),
                exercises: vec![ExerciseEntry {
                    name: Name::new("Bench Press").unwrap(),
                    sets: vec![Set {
                        reps: 8,
                        load_kg: 60.0
                    }],
                }],
                source: Source::UI,
                meta: json!({ "note": "low sleep" })
                    .as_object()
                    .cloned()
                    .unwrap(),
            })
        );
    }

    #[test]
    fn test_to_session_record_without_notes() {
        assert_eq!(
            valid_draft().to_session_record(&athlete()).unwrap().meta,
            Map::new()
        );
    }

    #[test]
    fn test_to_session_record_missing_start_time() {
        assert_eq!(
            valid_draft()
                .set_start_time(None)
                .set_rpe("11")
                .to_session_record(&athlete()),
            Err(ValidationError::MissingStartTime)
        );
    }

    #[rstest]
    #[case("0")]
    #[case("")]
    #[case("-5")]
    #[case("abc")]
    #[case("inf")]
    fn test_to_session_record_invalid_duration(#[case] duration: &str) {
        assert_eq!(
            valid_draft()
                .set_duration_min(duration)
                .to_session_record(&athlete()),
            Err(ValidationError::InvalidDuration)
        );
    }

    #[rstest]
    #[case("11", Err(ValidationError::InvalidRPE))]
    #[case("-1", Err(ValidationError::InvalidRPE))]
    #[case("10.1", Err(ValidationError::InvalidRPE))]
    #[case("NaN", Err(ValidationError::InvalidRPE))]
    #[case("x", Err(ValidationError::InvalidRPE))]
    #[case("8,5", Err(ValidationError::InvalidRPE))]
    #[case("0", Ok(0.0))]
    #[case("10", Ok(10.0))]
    #[case("", Ok(0.0))]
    fn test_to_session_record_rpe(
        #[case] rpe: &str,
        #[case] expected: Result<f64, ValidationError>,
    ) {
        assert_eq!(
            valid_draft()
                .set_rpe(rpe)
                .to_session_record(&athlete())
                .map(|s| s.rpe),
            expected
        );
    }

    #[test]
    fn test_to_session_record_drops_invalid_exercises() {
        let draft = valid_draft()
            .set_exercise_name(0, "Squat")
            .set_set_field(0, 0, SetField::Reps, "0")
            .add_exercise()
            .set_exercise_name(1, " Row ")
            .set_set_field(1, 0, SetField::Reps, "10")
            .set_set_field(1, 0, SetField::LoadKg, "40")
            .add_exercise()
            .set_set_field(2, 0, SetField::Reps, "10");

        let session = draft.to_session_record(&athlete()).unwrap();

        assert_eq!(
            session.exercises,
            vec![ExerciseEntry {
                name: Name::new("Row").unwrap(),
                sets: vec![Set {
                    reps: 10,
                    load_kg: 40.0
                }],
            }]
        );
    }

    #[test]
    fn test_to_session_record_no_valid_exercise() {
        let draft = valid_draft()
            .set_set_field(0, 0, SetField::Reps, "0")
            .add_exercise()
            .set_exercise_name(1, "Row")
            .set_set_field(1, 0, SetField::LoadKg, "-5")
            .set_set_field(1, 0, SetField::Reps, "5");

        assert_eq!(
            draft.to_session_record(&athlete()),
            Err(ValidationError::NoValidExercise)
        );
    }

    #[rstest]
    #[case("8", "60", Some(Set { reps: 8, load_kg: 60.0 }))]
    #[case("8", "", Some(Set { reps: 8, load_kg: 0.0 }))]
    #[case(" 12 ", "22.5", Some(Set { reps: 12, load_kg: 22.5 }))]
    #[case("12", "22,5", None)]
    #[case("5", "1,000", None)]
    #[case("", "60", None)]
    #[case("0", "60", None)]
    #[case("-3", "60", None)]
    #[case("8.5", "60", None)]
    #[case("x", "60", None)]
    #[case("8", "-1", None)]
    #[case("8", "heavy", None)]
    #[case("8", "inf", None)]
    fn test_set_normalize(#[case] reps: &str, #[case] load_kg: &str, #[case] expected: Option<Set>) {
        assert_eq!(
            SetDraft {
                reps: reps.to_string(),
                load_kg: load_kg.to_string()
            }
            .normalize(),
            expected
        );
    }

    #[rstest]
    #[case("2024-01-01T11:00", Some(start()))]
    #[case("2024-01-01T11:00:00", Some(start()))]
    #[case(" 2024-01-01T11:00 ", Some(start()))]
    #[case("", None)]
    #[case("2024-01-01", None)]
    #[case("yesterday", None)]
    fn test_parse_local_date_time(
        #[case] value: &str,
        #[case] expected: Option<DateTime<Utc>>,
    ) {
        assert_eq!(
            parse_local_date_time(value, &FixedOffset::east_opt(3600).unwrap()),
            expected
        );
    }

    #[test]
    fn test_set_local_start_time() {
        assert!(
            SessionDraft::new()
                .set_local_start_time("2024-01-01T11:00")
                .start_time()
                .is_some()
        );
        assert_eq!(
            SessionDraft::new()
                .set_start_time(Some(start()))
                .set_local_start_time("")
                .start_time(),
            None
        );
    }
}
