use crate::{SessionRecord, StoredSession};

/// Best-effort tonnage: the sum of `reps × load_kg` over all sets.
///
/// Sets without finite positive reps or without a finite non-negative load contribute nothing.
pub fn volume_load_kg(sets: impl IntoIterator<Item = (Option<f64>, Option<f64>)>) -> f64 {
    sets.into_iter()
        .filter_map(valid_set)
        .map(|(reps, load_kg)| reps * load_kg)
        .sum()
}

fn valid_set((reps, load_kg): (Option<f64>, Option<f64>)) -> Option<(f64, f64)> {
    let reps = reps.filter(|r| r.is_finite() && *r > 0.0)?;
    let load_kg = load_kg.filter(|l| l.is_finite() && *l >= 0.0)?;
    Some((reps, load_kg))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMetrics {
    pub duration_min: f64,
    pub rpe: Option<f64>,
    pub srpe_load: Option<f64>,
    pub volume_load_kg: Option<f64>,
    pub reps_total: Option<f64>,
    pub sets_total: Option<usize>,
    pub exercise_count: usize,
}

impl SessionMetrics {
    fn compute(
        duration_min: Option<f64>,
        rpe: Option<f64>,
        exercise_count: usize,
        sets: impl IntoIterator<Item = (Option<f64>, Option<f64>)>,
    ) -> Self {
        let duration_min = duration_min
            .filter(|d| d.is_finite())
            .map_or(0.0, |d| d.max(0.0));
        let rpe = rpe.filter(|r| r.is_finite());
        let valid_sets = sets.into_iter().filter_map(valid_set).collect::<Vec<_>>();
        let has_sets = !valid_sets.is_empty();

        Self {
            duration_min,
            rpe,
            srpe_load: rpe.map(|r| r * duration_min),
            volume_load_kg: has_sets
                .then(|| volume_load_kg(valid_sets.iter().map(|(r, l)| (Some(*r), Some(*l))))),
            reps_total: has_sets.then(|| valid_sets.iter().map(|(r, _)| r).sum()),
            sets_total: has_sets.then_some(valid_sets.len()),
            exercise_count,
        }
    }
}

impl SessionRecord {
    #[must_use]
    pub fn volume_load_kg(&self) -> f64 {
        volume_load_kg(self.sets())
    }

    #[must_use]
    pub fn metrics(&self) -> SessionMetrics {
        SessionMetrics::compute(
            Some(self.duration_min),
            Some(self.rpe),
            self.exercises.len(),
            self.sets(),
        )
    }

    fn sets(&self) -> impl Iterator<Item = (Option<f64>, Option<f64>)> + '_ {
        self.exercises.iter().flat_map(|e| {
            e.sets
                .iter()
                .map(|s| (Some(f64::from(s.reps)), Some(s.load_kg)))
        })
    }
}

impl StoredSession {
    #[must_use]
    pub fn volume_load_kg(&self) -> f64 {
        volume_load_kg(self.sets())
    }

    #[must_use]
    pub fn metrics(&self) -> SessionMetrics {
        SessionMetrics::compute(
            self.duration_min,
            self.rpe,
            self.exercises.len(),
            self.sets(),
        )
    }

    fn sets(&self) -> impl Iterator<Item = (Option<f64>, Option<f64>)> + '_ {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter().map(|s| (s.reps, s.load_kg)))
    }
}
