//! Health metrics derived from a user profile.
//!
//! Every function here is pure. Inputs are assumed to be within the ranges
//! enforced by [`UserProfile::validate`]; nothing is checked again.

use crate::profile::{ActivityLevel, Gender, Goal, Injury, UserProfile};
use serde::{Deserialize, Serialize};

/// Multiplier applied when an activity level name is not recognized
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.5;

pub const LOSE_DEFICIT_KCAL: f64 = 500.0;
pub const GAIN_SURPLUS_KCAL: f64 = 350.0;

const WATER_LITERS_PER_KG: f64 = 0.033;

// ============================================================================
// BMI
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

/// Upper (exclusive) bound of each band, checked in order
const BMI_BANDS: [(f64, BmiCategory); 4] = [
    (18.5, BmiCategory::Underweight),
    (25.0, BmiCategory::Healthy),
    (30.0, BmiCategory::Overweight),
    (f64::INFINITY, BmiCategory::Obese),
];

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        BMI_BANDS
            .iter()
            .find(|(max, _)| bmi < *max)
            .map(|(_, category)| *category)
            .unwrap_or(BmiCategory::Obese)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Healthy => "healthy",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Healthy => "Healthy weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Color token for rendering
    pub fn color(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "#38bdf8",
            BmiCategory::Healthy => "#22c55e",
            BmiCategory::Overweight => "#eab308",
            BmiCategory::Obese => "#ef4444",
        }
    }
}

pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

pub fn bmi_category(bmi: f64) -> BmiCategory {
    BmiCategory::from_bmi(bmi)
}

// ============================================================================
// Energy
// ============================================================================

/// Basal metabolic rate (Mifflin-St Jeor), kcal/day
pub fn bmr(gender: Gender, weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.4,
            ActivityLevel::Active => 1.6,
            ActivityLevel::Athlete => 1.85,
        }
    }
}

/// Multiplier for a raw activity level name, falling back to
/// [`DEFAULT_ACTIVITY_MULTIPLIER`] for anything unrecognized.
pub fn activity_multiplier(name: &str) -> f64 {
    name.parse::<ActivityLevel>()
        .map(ActivityLevel::multiplier)
        .unwrap_or(DEFAULT_ACTIVITY_MULTIPLIER)
}

/// Total daily energy expenditure, kcal/day
pub fn tdee(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

pub fn calorie_target(tdee: f64, goal: Goal) -> i64 {
    let target = match goal {
        Goal::Lose => tdee - LOSE_DEFICIT_KCAL,
        Goal::Gain => tdee + GAIN_SURPLUS_KCAL,
        Goal::Endurance | Goal::Maintain => tdee,
    };
    target.round() as i64
}

/// Daily water intake in liters, one decimal place
pub fn water_intake_liters(weight_kg: f64) -> f64 {
    (weight_kg * WATER_LITERS_PER_KG * 10.0).round() / 10.0
}

// ============================================================================
// Health score
// ============================================================================

pub fn health_score(bmi: f64, activity: ActivityLevel, injury: Injury) -> u8 {
    let mut score: i32 = 70;

    if (18.5..25.0).contains(&bmi) {
        score += 15;
    } else if (25.0..30.0).contains(&bmi) {
        score += 5;
    } else {
        score -= 5;
    }

    // Athlete is checked first; the two bonuses never stack.
    if activity == ActivityLevel::Athlete {
        score += 15;
    } else if activity == ActivityLevel::Active {
        score += 10;
    }

    if !injury.is_none() {
        score -= 10;
    }

    score.clamp(0, 100) as u8
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreRating {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ScoreRating::Excellent
        } else if score >= 60 {
            ScoreRating::Good
        } else {
            ScoreRating::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreRating::Excellent => "Excellent",
            ScoreRating::Good => "Good",
            ScoreRating::NeedsImprovement => "Needs improvement",
        }
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// All metrics for one profile
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthMetrics {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmr: f64,
    pub tdee: f64,
    pub calorie_target: i64,
    pub water_liters: f64,
    pub health_score: u8,
}

impl HealthMetrics {
    pub fn compute(profile: &UserProfile) -> Self {
        let bmi_value = bmi(profile.weight_kg, profile.height_cm);
        let bmr_value = bmr(
            profile.gender,
            profile.weight_kg,
            profile.height_cm,
            profile.age,
        );
        let tdee_value = tdee(bmr_value, profile.activity_level);

        Self {
            bmi: bmi_value,
            bmi_category: bmi_category(bmi_value),
            bmr: bmr_value,
            tdee: tdee_value,
            calorie_target: calorie_target(tdee_value, profile.goal),
            water_liters: water_intake_liters(profile.weight_kg),
            health_score: health_score(bmi_value, profile.activity_level, profile.injury),
        }
    }

    pub fn score_rating(&self) -> ScoreRating {
        ScoreRating::from_score(self.health_score)
    }

    /// Approximate number of 250 ml glasses
    pub fn water_glasses(&self) -> u32 {
        (self.water_liters * 4.0).round() as u32
    }
}

/// Short description of how the calorie target was derived
pub fn calorie_note(goal: Goal) -> &'static str {
    match goal {
        Goal::Lose => "500 kcal deficit",
        Goal::Gain => "350 kcal surplus",
        Goal::Endurance | Goal::Maintain => "maintenance",
    }
}
