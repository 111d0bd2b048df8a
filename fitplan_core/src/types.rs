//! Core domain types for the Fitplan system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Split taxonomy for exercises and training days
//! - Normalized exercise records
//! - Day slots and generated plans

use crate::metrics::HealthMetrics;
use crate::profile::Injury;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Split Types
// ============================================================================

/// Bucket an exercise is selected under
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    Push,
    Pull,
    Legs,
    Core,
    Cardio,
    Flexibility,
}

/// Split tag of a whole training day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DaySplit {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
    Full,
}

/// Display text and icon glyph attached to a tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagDisplay {
    pub label: &'static str,
    pub icon: &'static str,
}

impl SplitType {
    pub const ALL: [SplitType; 6] = [
        SplitType::Push,
        SplitType::Pull,
        SplitType::Legs,
        SplitType::Core,
        SplitType::Cardio,
        SplitType::Flexibility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SplitType::Push => "push",
            SplitType::Pull => "pull",
            SplitType::Legs => "legs",
            SplitType::Core => "core",
            SplitType::Cardio => "cardio",
            SplitType::Flexibility => "flexibility",
        }
    }

    pub fn display(self) -> TagDisplay {
        match self {
            SplitType::Push => TagDisplay { label: "Push", icon: "🏋" },
            SplitType::Pull => TagDisplay { label: "Pull", icon: "🧗" },
            SplitType::Legs => TagDisplay { label: "Legs", icon: "🦵" },
            SplitType::Core => TagDisplay { label: "Core", icon: "🎯" },
            SplitType::Cardio => TagDisplay { label: "Cardio", icon: "❤" },
            SplitType::Flexibility => TagDisplay { label: "Flexibility", icon: "🧘" },
        }
    }
}

impl std::str::FromStr for SplitType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        SplitType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::Other(format!("Unknown split type: {}", s)))
    }
}

impl DaySplit {
    /// Exercise split types trained on a day of this kind, in processing order
    pub fn targets(self) -> &'static [SplitType] {
        match self {
            DaySplit::Push => &[SplitType::Push],
            DaySplit::Pull => &[SplitType::Pull],
            DaySplit::Legs => &[SplitType::Legs],
            DaySplit::Upper => &[SplitType::Push, SplitType::Pull],
            DaySplit::Lower => &[SplitType::Legs],
            DaySplit::Full => &[SplitType::Push, SplitType::Pull, SplitType::Legs],
        }
    }

    pub fn display(self) -> TagDisplay {
        match self {
            DaySplit::Push => SplitType::Push.display(),
            DaySplit::Pull => SplitType::Pull.display(),
            DaySplit::Legs => SplitType::Legs.display(),
            DaySplit::Upper => TagDisplay { label: "Upper", icon: "🏋" },
            DaySplit::Lower => TagDisplay { label: "Lower", icon: "🦵" },
            DaySplit::Full => TagDisplay { label: "Full body", icon: "🔥" },
        }
    }
}

// ============================================================================
// Exercise Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Flexibility,
}

/// Muscle an exercise primarily targets. Absent for cardio and flexibility work.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TargetMuscle {
    Chest,
    Back,
    Legs,
    Core,
    FullBody,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LocationRequirement {
    GymOnly,
    Any,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    High,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Prescribed volume, e.g. 3 × "10-12"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetScheme {
    pub sets: u32,
    pub reps: String,
}

/// Inclusive age bounds
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub fn contains(&self, age: u32) -> bool {
        (self.min..=self.max).contains(&age)
    }
}

/// A normalized catalog exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    pub instructions: String,
    pub category: ExerciseCategory,
    pub target_muscle: Option<TargetMuscle>,
    pub muscle_groups: Vec<String>,
    pub split: SplitType,
    pub location: LocationRequirement,
    /// 1..=10
    pub intensity: u8,
    pub impact: ImpactLevel,
    pub contraindications: BTreeSet<Injury>,
    pub eligible_ages: AgeRange,
    pub scheme: SetScheme,
    pub difficulty: Difficulty,
}

impl ExerciseRecord {
    pub fn is_contraindicated_for(&self, injury: Injury) -> bool {
        !injury.is_none() && self.contraindications.contains(&injury)
    }
}

// ============================================================================
// Plan Types
// ============================================================================

/// One training day of a generated plan
///
/// Exercises are shared references into the catalog the plan was built from.
#[derive(Clone, Debug, Serialize)]
pub struct DaySlot<'a> {
    pub day_label: String,
    pub split: DaySplit,
    pub label: String,
    pub exercises: Vec<&'a ExerciseRecord>,
}

impl DaySlot<'_> {
    /// "Day 2 - Lower (Strength)"
    pub fn title(&self) -> String {
        format!("{} - {}", self.day_label, self.label)
    }
}

/// Output of one generation call. Superseded wholesale by the next one.
#[derive(Clone, Debug, Serialize)]
pub struct PlanResult<'a> {
    pub metrics: HealthMetrics,
    pub days: Vec<DaySlot<'a>>,
}
