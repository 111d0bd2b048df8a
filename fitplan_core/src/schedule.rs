//! Weekly schedule generation.
//!
//! Selection logic, applied per day of the chosen template:
//!
//! 1. **Pool**: exercises whose split is one of the day's targets, plus every
//!    core and cardio exercise, minus anything the profile rules out
//!    (injury contraindication, age outside the eligible range, gym-only
//!    equipment for home training).
//! 2. **Per target type**: highest intensity first, catalog order on ties,
//!    2 per type on full-body days and 3 otherwise.
//! 3. **Core accessory**: first 1 (full body) or 2 remaining core exercises
//!    in catalog order.
//! 4. **Cardio**: on cardio days, or for lose/endurance goals, one remaining
//!    cardio exercise picked at `day_index % pool_size`.
//!
//! There is no randomness: identical inputs produce identical plans. Running
//! out of candidates only shortens a day.

use crate::catalog::ExerciseCatalog;
use crate::metrics::HealthMetrics;
use crate::profile::{Goal, TrainingLocation, UserProfile};
use crate::types::{DaySlot, DaySplit, ExerciseRecord, LocationRequirement, PlanResult, SplitType};
use std::collections::HashSet;

/// One entry of a day template
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateSlot {
    pub split: DaySplit,
    pub label: &'static str,
    /// The label marks this as a cardio day
    pub cardio_day: bool,
}

const fn slot(split: DaySplit, label: &'static str) -> TemplateSlot {
    TemplateSlot {
        split,
        label,
        cardio_day: false,
    }
}

const fn cardio_slot(split: DaySplit, label: &'static str) -> TemplateSlot {
    TemplateSlot {
        split,
        label,
        cardio_day: true,
    }
}

/// Full-body rotation
const THREE_DAY: [TemplateSlot; 3] = [
    slot(DaySplit::Full, "Full Body A"),
    slot(DaySplit::Full, "Full Body B"),
    cardio_slot(DaySplit::Full, "Full Body C + Cardio"),
];

/// Upper/lower split
const FOUR_DAY: [TemplateSlot; 4] = [
    slot(DaySplit::Upper, "Upper (Strength)"),
    slot(DaySplit::Lower, "Lower (Strength)"),
    slot(DaySplit::Upper, "Upper (Volume)"),
    cardio_slot(DaySplit::Lower, "Lower (Volume) + Cardio"),
];

/// Push/pull/legs followed by upper/lower
const FIVE_DAY: [TemplateSlot; 5] = [
    slot(DaySplit::Push, "Push"),
    slot(DaySplit::Pull, "Pull"),
    slot(DaySplit::Legs, "Legs"),
    slot(DaySplit::Upper, "Upper + Core"),
    cardio_slot(DaySplit::Lower, "Lower + Cardio"),
];

/// Push/pull/legs twice, second round for volume
const SIX_DAY: [TemplateSlot; 6] = [
    slot(DaySplit::Push, "Push"),
    slot(DaySplit::Pull, "Pull"),
    slot(DaySplit::Legs, "Legs"),
    slot(DaySplit::Push, "Push (Volume)"),
    slot(DaySplit::Pull, "Pull (Volume)"),
    cardio_slot(DaySplit::Legs, "Legs + Cardio"),
];

/// Day template for a weekly training-day count; empty if unsupported
pub fn day_template(training_days: u8) -> &'static [TemplateSlot] {
    match training_days {
        3 => &THREE_DAY,
        4 => &FOUR_DAY,
        5 => &FIVE_DAY,
        6 => &SIX_DAY,
        _ => &[],
    }
}

fn picks_per_type(split: DaySplit) -> usize {
    if split == DaySplit::Full {
        2
    } else {
        3
    }
}

fn core_picks(split: DaySplit) -> usize {
    if split == DaySplit::Full {
        1
    } else {
        2
    }
}

/// Hard exclusions. An exercise failing any of these is never selected.
pub fn is_eligible(exercise: &ExerciseRecord, profile: &UserProfile) -> bool {
    if exercise.is_contraindicated_for(profile.injury) {
        return false;
    }
    if !exercise.eligible_ages.contains(profile.age) {
        return false;
    }
    if profile.location == TrainingLocation::Home
        && exercise.location == LocationRequirement::GymOnly
    {
        return false;
    }
    true
}

fn needs_cardio(slot: &TemplateSlot, goal: Goal) -> bool {
    slot.cardio_day || matches!(goal, Goal::Endurance | Goal::Lose)
}

/// Build the candidate pool for one day, in catalog order
fn day_pool<'a>(
    catalog: &'a ExerciseCatalog,
    profile: &UserProfile,
    targets: &[SplitType],
) -> Vec<&'a ExerciseRecord> {
    catalog
        .iter()
        .filter(|ex| {
            targets.contains(&ex.split)
                || ex.split == SplitType::Core
                || ex.split == SplitType::Cardio
        })
        .filter(|ex| is_eligible(ex, profile))
        .collect()
}

fn build_day<'a>(
    catalog: &'a ExerciseCatalog,
    profile: &UserProfile,
    day_index: usize,
    slot: &TemplateSlot,
) -> DaySlot<'a> {
    let targets = slot.split.targets();
    let pool = day_pool(catalog, profile, targets);

    let mut exercises: Vec<&'a ExerciseRecord> = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();

    for &target in targets {
        let mut candidates: Vec<&'a ExerciseRecord> = pool
            .iter()
            .copied()
            .filter(|ex| ex.split == target && !used.contains(ex.id.as_str()))
            .collect();
        // stable: equal intensities keep catalog order
        candidates.sort_by(|a, b| b.intensity.cmp(&a.intensity));

        for ex in candidates.into_iter().take(picks_per_type(slot.split)) {
            used.insert(ex.id.as_str());
            exercises.push(ex);
        }
    }

    let core: Vec<&'a ExerciseRecord> = pool
        .iter()
        .copied()
        .filter(|ex| ex.split == SplitType::Core && !used.contains(ex.id.as_str()))
        .take(core_picks(slot.split))
        .collect();
    for ex in core {
        used.insert(ex.id.as_str());
        exercises.push(ex);
    }

    if needs_cardio(slot, profile.goal) {
        let cardio: Vec<&'a ExerciseRecord> = pool
            .iter()
            .copied()
            .filter(|ex| ex.split == SplitType::Cardio && !used.contains(ex.id.as_str()))
            .collect();
        if !cardio.is_empty() {
            exercises.push(cardio[day_index % cardio.len()]);
        }
    }

    tracing::debug!(
        "Day {} ({:?}): {} exercises from a pool of {}",
        day_index + 1,
        slot.split,
        exercises.len(),
        pool.len()
    );

    DaySlot {
        day_label: format!("Day {}", day_index + 1),
        split: slot.split,
        label: slot.label.to_string(),
        exercises,
    }
}

/// Generate the weekly schedule for a profile and training-day count
///
/// Unsupported day counts yield an empty schedule. The catalog is only read.
pub fn generate_schedule<'a>(
    catalog: &'a ExerciseCatalog,
    profile: &UserProfile,
    training_days: u8,
) -> Vec<DaySlot<'a>> {
    let template = day_template(training_days);
    if template.is_empty() {
        tracing::warn!(
            "No day template for {} training days, returning empty schedule",
            training_days
        );
    }

    template
        .iter()
        .enumerate()
        .map(|(day_index, slot)| build_day(catalog, profile, day_index, slot))
        .collect()
}

/// Compute metrics and schedule for a profile in one call
pub fn generate_plan<'a>(catalog: &'a ExerciseCatalog, profile: &UserProfile) -> PlanResult<'a> {
    let metrics = HealthMetrics::compute(profile);
    let days = generate_schedule(catalog, profile, profile.training_days_per_week);

    tracing::info!(
        "Generated {}-day plan ({} exercises total)",
        days.len(),
        days.iter().map(|d| d.exercises.len()).sum::<usize>()
    );

    PlanResult { metrics, days }
}
