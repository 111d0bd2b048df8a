//! Exercise catalog: raw CSV source plus the fixed mapping to [`ExerciseRecord`].
//!
//! The raw schema mirrors a plain exercise list (category, equipment, level,
//! target muscle, excluded injuries). Everything the schedule generator needs
//! (split type, location requirement, intensity, eligible ages, set scheme) is
//! derived once here, at load time, and never recomputed at use sites.

use crate::profile::Injury;
use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

/// Raw catalog compiled into the binary
const EMBEDDED_CATALOG_CSV: &str = include_str!("../data/exercises.csv");

/// Cached default catalog - built once and shared read-only
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(|| match build_default_catalog() {
    Ok(catalog) => catalog,
    Err(e) => {
        tracing::error!("Embedded exercise catalog failed to load: {}", e);
        ExerciseCatalog::default()
    }
});

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

/// Parse the embedded catalog
///
/// **Note**: prefer [`get_default_catalog`], which parses once and caches.
pub fn build_default_catalog() -> Result<ExerciseCatalog> {
    ExerciseCatalog::from_csv_reader(EMBEDDED_CATALOG_CSV.as_bytes())
}

// ============================================================================
// Raw schema
// ============================================================================

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RawCategory {
    Cardio,
    Flexibility,
    /// Anything that is not cardio or flexibility is strength work
    #[serde(other)]
    Strength,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RawLevel {
    Beginner,
    Intermediate,
    Advanced,
    #[serde(other)]
    Unknown,
}

/// One row of the raw catalog source
#[derive(Clone, Debug, Deserialize)]
pub struct RawExercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub instructions: String,
    pub category: RawCategory,
    #[serde(default)]
    pub target_muscle: Option<String>,
    #[serde(default)]
    pub equipment: String,
    pub level: RawLevel,
    /// Semicolon separated, lower-case injury names
    #[serde(default)]
    pub excluded_injuries: String,
}

// ============================================================================
// Mapping tables
// ============================================================================

fn target_muscle(raw: &str) -> Option<TargetMuscle> {
    match raw {
        "chest" => Some(TargetMuscle::Chest),
        "back" => Some(TargetMuscle::Back),
        "legs" => Some(TargetMuscle::Legs),
        "core" => Some(TargetMuscle::Core),
        "full_body" => Some(TargetMuscle::FullBody),
        _ => None,
    }
}

fn split_for(category: RawCategory, muscle: Option<TargetMuscle>) -> SplitType {
    match (category, muscle) {
        (RawCategory::Cardio, _) => SplitType::Cardio,
        (RawCategory::Flexibility, _) => SplitType::Flexibility,
        (RawCategory::Strength, Some(TargetMuscle::Back)) => SplitType::Pull,
        (RawCategory::Strength, Some(TargetMuscle::Legs)) => SplitType::Legs,
        (RawCategory::Strength, Some(TargetMuscle::Core)) => SplitType::Core,
        // chest, full body and unknown muscles all land in push
        (RawCategory::Strength, _) => SplitType::Push,
    }
}

fn location_for(equipment: &str) -> LocationRequirement {
    if equipment == "gym_machine" {
        LocationRequirement::GymOnly
    } else {
        LocationRequirement::Any
    }
}

fn intensity_for(level: RawLevel) -> u8 {
    match level {
        RawLevel::Beginner => 4,
        RawLevel::Intermediate => 6,
        RawLevel::Advanced => 9,
        RawLevel::Unknown => 5,
    }
}

fn ages_for(level: RawLevel) -> AgeRange {
    let (min, max) = match level {
        RawLevel::Beginner => (12, 75),
        RawLevel::Intermediate => (14, 65),
        RawLevel::Advanced => (16, 55),
        RawLevel::Unknown => (14, 65),
    };
    AgeRange { min, max }
}

fn scheme_for(category: RawCategory, level: RawLevel) -> SetScheme {
    let (sets, reps) = match (category, level) {
        (RawCategory::Cardio, _) => (1, "15-20 min"),
        (RawCategory::Flexibility, _) => (1, "20-30 sec"),
        (RawCategory::Strength, RawLevel::Advanced) => (4, "8-10"),
        (RawCategory::Strength, _) => (3, "10-12"),
    };
    SetScheme {
        sets,
        reps: reps.to_string(),
    }
}

fn difficulty_for(level: RawLevel) -> Difficulty {
    match level {
        RawLevel::Beginner => Difficulty::Easy,
        RawLevel::Advanced => Difficulty::Hard,
        RawLevel::Intermediate | RawLevel::Unknown => Difficulty::Medium,
    }
}

fn muscle_groups_for(category: RawCategory, raw_muscle: Option<&str>) -> Vec<String> {
    let groups: &[&str] = match (category, raw_muscle) {
        (RawCategory::Cardio, _) => &["cardio"],
        (RawCategory::Flexibility, _) => &["flexibility"],
        (_, Some("chest")) => &["chest", "triceps"],
        (_, Some("back")) => &["back", "biceps"],
        (_, Some("legs")) => &["quads", "glutes"],
        (_, Some("core")) => &["core"],
        (_, Some("full_body")) => &["chest", "back", "quads"],
        (_, Some(other)) => return vec![other.to_string()],
        (_, None) => &[],
    };
    groups.iter().map(|g| g.to_string()).collect()
}

fn injury_for(raw: &str) -> Option<Injury> {
    match raw {
        "knee" => Some(Injury::Knee),
        "back" => Some(Injury::Back),
        "shoulder" => Some(Injury::Shoulder),
        _ => None,
    }
}

impl RawExercise {
    /// Apply the mapping tables
    pub fn normalize(&self) -> ExerciseRecord {
        let raw_muscle = self
            .target_muscle
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());
        let muscle = match self.category {
            RawCategory::Strength => raw_muscle.and_then(target_muscle),
            RawCategory::Cardio | RawCategory::Flexibility => None,
        };

        let mut contraindications = BTreeSet::new();
        for name in self
            .excluded_injuries
            .split(';')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
        {
            match injury_for(&name) {
                Some(injury) => {
                    contraindications.insert(injury);
                }
                None => tracing::warn!(
                    "Exercise '{}' lists unknown injury '{}', ignoring",
                    self.id,
                    name
                ),
            }
        }

        let impact = if self.level == RawLevel::Advanced
            || (self.category == RawCategory::Cardio
                && contraindications.contains(&Injury::Knee))
        {
            ImpactLevel::High
        } else {
            ImpactLevel::Low
        };

        ExerciseRecord {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            instructions: self.instructions.trim().to_string(),
            category: match self.category {
                RawCategory::Strength => ExerciseCategory::Strength,
                RawCategory::Cardio => ExerciseCategory::Cardio,
                RawCategory::Flexibility => ExerciseCategory::Flexibility,
            },
            target_muscle: muscle,
            muscle_groups: muscle_groups_for(self.category, raw_muscle),
            split: split_for(self.category, muscle),
            location: location_for(self.equipment.trim()),
            intensity: intensity_for(self.level),
            impact,
            contraindications,
            eligible_ages: ages_for(self.level),
            scheme: scheme_for(self.category, self.level),
            difficulty: difficulty_for(self.level),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Immutable, ordered collection of normalized exercises
///
/// Catalog order is significant: it breaks intensity ties and drives core
/// accessory selection.
#[derive(Clone, Debug, Default)]
pub struct ExerciseCatalog {
    exercises: Vec<ExerciseRecord>,
}

impl ExerciseCatalog {
    /// Normalize raw rows, keeping the first row for any repeated id
    pub fn from_raw(rows: impl IntoIterator<Item = RawExercise>) -> Self {
        let mut seen = HashSet::new();
        let mut exercises = Vec::new();

        for row in rows {
            let record = row.normalize();
            if !seen.insert(record.id.clone()) {
                tracing::warn!("Duplicate exercise id '{}' in catalog, skipping", record.id);
                continue;
            }
            exercises.push(record);
        }

        tracing::debug!("Loaded {} exercises into catalog", exercises.len());
        Self { exercises }
    }

    /// Read a raw CSV catalog (header row required)
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let rows = csv_reader
            .deserialize::<RawExercise>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self::from_raw(rows))
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_csv_reader(std::io::BufReader::new(file))?;
        tracing::info!("Loaded custom catalog from {:?}", path);
        Ok(catalog)
    }

    /// Exercises in catalog order
    pub fn exercises(&self) -> &[ExerciseRecord] {
        &self.exercises
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseRecord> {
        self.exercises.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseRecord> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn by_split(&self, split: SplitType) -> impl Iterator<Item = &ExerciseRecord> {
        self.exercises.iter().filter(move |e| e.split == split)
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            if exercise.id.is_empty() {
                errors.push(format!("Exercise '{}' has empty ID", exercise.name));
            } else if !seen.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise id '{}'", exercise.id));
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if !(1..=10).contains(&exercise.intensity) {
                errors.push(format!(
                    "Exercise '{}': intensity {} outside 1-10",
                    exercise.id, exercise.intensity
                ));
            }
            if exercise.eligible_ages.min > exercise.eligible_ages.max {
                errors.push(format!(
                    "Exercise '{}': min age {} > max age {}",
                    exercise.id, exercise.eligible_ages.min, exercise.eligible_ages.max
                ));
            }
        }

        for split in [SplitType::Push, SplitType::Pull, SplitType::Legs] {
            if self.by_split(split).next().is_none() {
                errors.push(format!("Catalog has no {} exercises", split.as_str()));
            }
        }

        errors
    }

    /// Like [`validate`](Self::validate) but as a single error
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::CatalogValidation(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, category: RawCategory, muscle: Option<&str>, equipment: &str, level: RawLevel) -> RawExercise {
        RawExercise {
            id: id.into(),
            name: id.into(),
            instructions: String::new(),
            category,
            target_muscle: muscle.map(Into::into),
            equipment: equipment.into(),
            level,
            excluded_injuries: String::new(),
        }
    }

    #[test]
    fn test_embedded_catalog_loads_and_validates() {
        let catalog = build_default_catalog().unwrap();
        assert_eq!(catalog.len(), 47);
        let errors = catalog.validate();
        assert!(errors.is_empty(), "Embedded catalog errors: {:?}", errors);
    }

    #[test]
    fn test_default_catalog_is_cached() {
        let a = get_default_catalog() as *const ExerciseCatalog;
        let b = get_default_catalog() as *const ExerciseCatalog;
        assert_eq!(a, b);
        assert!(!get_default_catalog().is_empty());
    }

    #[test]
    fn test_every_split_represented() {
        let catalog = build_default_catalog().unwrap();
        for split in SplitType::ALL {
            assert!(
                catalog.by_split(split).count() >= 2,
                "Not enough {:?} exercises",
                split
            );
        }
    }

    #[test]
    fn test_split_mapping() {
        let cases = [
            (RawCategory::Strength, Some("chest"), SplitType::Push),
            (RawCategory::Strength, Some("full_body"), SplitType::Push),
            (RawCategory::Strength, Some("back"), SplitType::Pull),
            (RawCategory::Strength, Some("legs"), SplitType::Legs),
            (RawCategory::Strength, Some("core"), SplitType::Core),
            (RawCategory::Strength, Some("neck"), SplitType::Push),
            (RawCategory::Cardio, None, SplitType::Cardio),
            (RawCategory::Flexibility, Some("legs"), SplitType::Flexibility),
        ];
        for (category, muscle, expected) in cases {
            let record = raw("x", category, muscle, "none", RawLevel::Beginner).normalize();
            assert_eq!(record.split, expected, "{:?}/{:?}", category, muscle);
        }
    }

    #[test]
    fn test_level_derived_fields() {
        let advanced = raw("a", RawCategory::Strength, Some("chest"), "barbell", RawLevel::Advanced).normalize();
        assert_eq!(advanced.intensity, 9);
        assert_eq!(advanced.eligible_ages, AgeRange { min: 16, max: 55 });
        assert_eq!(advanced.scheme.sets, 4);
        assert_eq!(advanced.scheme.reps, "8-10");
        assert_eq!(advanced.impact, ImpactLevel::High);
        assert_eq!(advanced.difficulty, Difficulty::Hard);

        let unknown = raw("u", RawCategory::Strength, Some("legs"), "none", RawLevel::Unknown).normalize();
        assert_eq!(unknown.intensity, 5);
        assert_eq!(unknown.eligible_ages, AgeRange { min: 14, max: 65 });
        assert_eq!(unknown.scheme.sets, 3);

        let cardio = raw("c", RawCategory::Cardio, None, "none", RawLevel::Advanced).normalize();
        assert_eq!(cardio.scheme.reps, "15-20 min");
        assert_eq!(cardio.muscle_groups, vec!["cardio".to_string()]);
        assert_eq!(cardio.target_muscle, None);
    }

    #[test]
    fn test_gym_machine_is_gym_only() {
        let machine = raw("m", RawCategory::Strength, Some("legs"), "gym_machine", RawLevel::Beginner).normalize();
        let dumbbell = raw("d", RawCategory::Strength, Some("legs"), "dumbbell", RawLevel::Beginner).normalize();
        assert_eq!(machine.location, LocationRequirement::GymOnly);
        assert_eq!(dumbbell.location, LocationRequirement::Any);
    }

    #[test]
    fn test_contraindications_parsed() {
        let mut row = raw("r", RawCategory::Cardio, None, "none", RawLevel::Beginner);
        row.excluded_injuries = "knee; Shoulder;elbow".into();
        let record = row.normalize();

        assert!(record.contraindications.contains(&Injury::Knee));
        assert!(record.contraindications.contains(&Injury::Shoulder));
        assert_eq!(record.contraindications.len(), 2);
        // cardio that excludes knees counts as high impact
        assert_eq!(record.impact, ImpactLevel::High);
        assert!(record.is_contraindicated_for(Injury::Knee));
        assert!(!record.is_contraindicated_for(Injury::None));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let first = raw("dup", RawCategory::Strength, Some("chest"), "none", RawLevel::Beginner);
        let second = raw("dup", RawCategory::Strength, Some("back"), "none", RawLevel::Beginner);
        let catalog = ExerciseCatalog::from_raw(vec![first, second]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("dup").unwrap().split, SplitType::Push);
    }

    #[test]
    fn test_csv_reader_handles_empty_optional_columns() {
        let csv = "id,name,instructions,category,target_muscle,equipment,level,excluded_injuries\n\
                   walk,Walk,Just walk,cardio,,none,beginner,\n\
                   row,Row,\"Pull, then return\",strength,back,gym_machine,expert,back\n";
        let catalog = ExerciseCatalog::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 2);
        let row = catalog.get("row").unwrap();
        assert_eq!(row.instructions, "Pull, then return");
        assert_eq!(row.intensity, 5);
        assert_eq!(row.location, LocationRequirement::GymOnly);
    }

    #[test]
    fn test_csv_reader_rejects_malformed_rows() {
        let csv = "id,name\nonly,two\n";
        assert!(ExerciseCatalog::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_validate_flags_missing_splits() {
        let catalog = ExerciseCatalog::from_raw(vec![raw(
            "p",
            RawCategory::Strength,
            Some("chest"),
            "none",
            RawLevel::Beginner,
        )]);
        let errors = catalog.validate();
        assert_eq!(errors.len(), 2);
        assert!(catalog.ensure_valid().is_err());
    }
}
