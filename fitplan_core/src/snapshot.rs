//! Serializable form of a generated plan.
//!
//! A [`PlanResult`] borrows from the catalog, so it cannot be stored as is.
//! The snapshot keeps exercise ids instead and is resolved against a catalog
//! again when loaded.

use crate::catalog::ExerciseCatalog;
use crate::metrics::HealthMetrics;
use crate::profile::UserProfile;
use crate::types::{DaySlot, DaySplit, PlanResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DaySnapshot {
    pub day_label: String,
    pub split: DaySplit,
    pub label: String,
    pub exercise_ids: Vec<String>,
}

impl DaySnapshot {
    pub fn title(&self) -> String {
        format!("{} - {}", self.day_label, self.label)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanSnapshot {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub metrics: HealthMetrics,
    pub days: Vec<DaySnapshot>,
}

impl PlanSnapshot {
    /// Capture a freshly generated plan
    pub fn capture(profile: &UserProfile, plan: &PlanResult<'_>) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            profile: profile.clone(),
            metrics: plan.metrics.clone(),
            days: plan
                .days
                .iter()
                .map(|day| DaySnapshot {
                    day_label: day.day_label.clone(),
                    split: day.split,
                    label: day.label.clone(),
                    exercise_ids: day.exercises.iter().map(|e| e.id.clone()).collect(),
                })
                .collect(),
        }
    }

    pub fn day(&self, index: usize) -> Option<&DaySnapshot> {
        self.days.get(index)
    }

    /// Rebuild the plan against a catalog
    ///
    /// Ids the catalog no longer knows are dropped with a warning.
    pub fn resolve<'a>(&self, catalog: &'a ExerciseCatalog) -> PlanResult<'a> {
        let days = self
            .days
            .iter()
            .map(|day| DaySlot {
                day_label: day.day_label.clone(),
                split: day.split,
                label: day.label.clone(),
                exercises: day
                    .exercise_ids
                    .iter()
                    .filter_map(|id| {
                        let found = catalog.get(id);
                        if found.is_none() {
                            tracing::warn!(
                                "Plan {} references unknown exercise '{}', dropping it",
                                self.id,
                                id
                            );
                        }
                        found
                    })
                    .collect(),
            })
            .collect();

        PlanResult {
            metrics: self.metrics.clone(),
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::profile::sample_profile;
    use crate::schedule::generate_plan;

    #[test]
    fn test_capture_keeps_ids_in_order() {
        let catalog = build_default_catalog().unwrap();
        let profile = sample_profile();
        let plan = generate_plan(&catalog, &profile);
        let snapshot = PlanSnapshot::capture(&profile, &plan);

        assert_eq!(snapshot.days.len(), plan.days.len());
        for (snap, day) in snapshot.days.iter().zip(&plan.days) {
            let ids: Vec<_> = day.exercises.iter().map(|e| e.id.clone()).collect();
            assert_eq!(snap.exercise_ids, ids);
            assert_eq!(snap.title(), day.title());
        }
    }

    #[test]
    fn test_resolve_restores_plan() {
        let catalog = build_default_catalog().unwrap();
        let profile = sample_profile();
        let plan = generate_plan(&catalog, &profile);
        let snapshot = PlanSnapshot::capture(&profile, &plan);

        let json = serde_json::to_string(&snapshot).unwrap();
        let loaded: PlanSnapshot = serde_json::from_str(&json).unwrap();
        let resolved = loaded.resolve(&catalog);

        assert_eq!(resolved.metrics.calorie_target, plan.metrics.calorie_target);
        assert!((resolved.metrics.bmi - plan.metrics.bmi).abs() < 1e-9);
        assert_eq!(loaded.id, snapshot.id);
        assert_eq!(resolved.days[1].exercises, plan.days[1].exercises);
    }

    #[test]
    fn test_resolve_drops_unknown_ids() {
        let catalog = build_default_catalog().unwrap();
        let profile = sample_profile();
        let plan = generate_plan(&catalog, &profile);
        let mut snapshot = PlanSnapshot::capture(&profile, &plan);
        let before = snapshot.days[0].exercise_ids.len();
        snapshot.days[0].exercise_ids.insert(0, "retired_exercise".into());

        let resolved = snapshot.resolve(&catalog);
        assert_eq!(resolved.days[0].exercises.len(), before);
    }
}
