//! User questionnaire profile and its field-level validation.
//!
//! The core assumes a validated profile. Callers run [`UserProfile::validate`]
//! first and report the returned field messages themselves.

use crate::{Error, FieldError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Questionnaire enums
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// Daily activity level used for the TDEE multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    #[default]
    Active,
    Athlete,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    Lose,
    Gain,
    Endurance,
    Maintain,
}

/// Where the user trains
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainingLocation {
    #[default]
    Gym,
    Home,
}

/// Injury tag. Also used as an exercise contraindication.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub enum Injury {
    #[default]
    None,
    Knee,
    Back,
    Shoulder,
}

impl Injury {
    pub fn is_none(self) -> bool {
        self == Injury::None
    }
}

/// Implements `FromStr` and `Display` over a fixed table of names.
macro_rules! named_enum {
    ($ty:ty, $what:literal, [$(($variant:path, $name:literal)),+ $(,)?]) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($variant => $name,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let trimmed = s.trim();
                $(if trimmed.eq_ignore_ascii_case($name) {
                    return Ok($variant);
                })+
                Err(Error::Other(format!("Unknown {}: {}", $what, s)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

named_enum!(Gender, "gender", [(Gender::Male, "male"), (Gender::Female, "female")]);
named_enum!(
    ActivityLevel,
    "activity level",
    [
        (ActivityLevel::Sedentary, "sedentary"),
        (ActivityLevel::Active, "active"),
        (ActivityLevel::Athlete, "athlete"),
    ]
);
named_enum!(
    Goal,
    "goal",
    [
        (Goal::Lose, "lose"),
        (Goal::Gain, "gain"),
        (Goal::Endurance, "endurance"),
        (Goal::Maintain, "maintain"),
    ]
);
named_enum!(
    TrainingLocation,
    "location",
    [(TrainingLocation::Gym, "gym"), (TrainingLocation::Home, "home")]
);
named_enum!(
    Injury,
    "injury",
    [
        (Injury::None, "None"),
        (Injury::Knee, "Knee"),
        (Injury::Back, "Back"),
        (Injury::Shoulder, "Shoulder"),
    ]
);

// ============================================================================
// Profile
// ============================================================================

pub const AGE_RANGE: (u32, u32) = (10, 100);
pub const HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);
pub const WEIGHT_RANGE_KG: (f64, f64) = (30.0, 250.0);
pub const SUPPORTED_TRAINING_DAYS: [u8; 4] = [3, 4, 5, 6];

/// Questionnaire answers. Immutable for the duration of one generation call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    pub gender: Gender,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub location: TrainingLocation,
    pub injury: Injury,
    pub training_days_per_week: u8,
}

impl UserProfile {
    /// Check every range-constrained field, collecting all failures.
    pub fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.age < AGE_RANGE.0 || self.age > AGE_RANGE.1 {
            errors.push(FieldError::new(
                "age",
                format!("age must be between {} and {}", AGE_RANGE.0, AGE_RANGE.1),
            ));
        }
        if !(HEIGHT_RANGE_CM.0..=HEIGHT_RANGE_CM.1).contains(&self.height_cm) {
            errors.push(FieldError::new(
                "height",
                format!(
                    "height must be between {} and {} cm",
                    HEIGHT_RANGE_CM.0, HEIGHT_RANGE_CM.1
                ),
            ));
        }
        if !(WEIGHT_RANGE_KG.0..=WEIGHT_RANGE_KG.1).contains(&self.weight_kg) {
            errors.push(FieldError::new(
                "weight",
                format!(
                    "weight must be between {} and {} kg",
                    WEIGHT_RANGE_KG.0, WEIGHT_RANGE_KG.1
                ),
            ));
        }
        if !SUPPORTED_TRAINING_DAYS.contains(&self.training_days_per_week) {
            errors.push(FieldError::new(
                "days",
                "training days per week must be 3, 4, 5 or 6",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and convert failures into [`Error::InvalidProfile`]
    pub fn validated(self) -> Result<Self> {
        self.validate().map_err(Error::InvalidProfile)?;
        Ok(self)
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> UserProfile {
    UserProfile {
        name: None,
        gender: Gender::Male,
        age: 30,
        height_cm: 175.0,
        weight_kg: 70.0,
        activity_level: ActivityLevel::Active,
        goal: Goal::Gain,
        location: TrainingLocation::Gym,
        injury: Injury::None,
        training_days_per_week: 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_profile_passes() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn test_collects_all_field_errors() {
        let profile = UserProfile {
            age: 9,
            height_cm: 260.0,
            weight_kg: 29.0,
            training_days_per_week: 7,
            ..sample_profile()
        };

        let errors = profile.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["age", "height", "weight", "days"]);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let profile = UserProfile {
            age: 100,
            height_cm: 100.0,
            weight_kg: 250.0,
            training_days_per_week: 3,
            ..sample_profile()
        };
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validated_maps_to_error() {
        let profile = UserProfile {
            age: 5,
            ..sample_profile()
        };
        let err = profile.validated().unwrap_err();
        assert!(matches!(err, Error::InvalidProfile(ref e) if e.len() == 1));
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_parse_names_case_insensitive() {
        assert_eq!("KNEE".parse::<Injury>().unwrap(), Injury::Knee);
        assert_eq!("none".parse::<Injury>().unwrap(), Injury::None);
        assert_eq!("Athlete".parse::<ActivityLevel>().unwrap(), ActivityLevel::Athlete);
        assert_eq!("home".parse::<TrainingLocation>().unwrap(), TrainingLocation::Home);
        assert!("elbow".parse::<Injury>().is_err());
    }

    #[test]
    fn test_profile_json_uses_tag_names() {
        let json = serde_json::to_value(sample_profile()).unwrap();
        assert_eq!(json["activity_level"], "active");
        assert_eq!(json["injury"], "None");
    }
}
