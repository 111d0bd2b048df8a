#![forbid(unsafe_code)]

//! Core domain model and business logic for Fitplan.
//!
//! This crate provides:
//! - Profile and exercise domain types
//! - Health metrics (BMI, BMR, TDEE, calorie target, water, health score)
//! - Exercise catalog loading and normalization
//! - Weekly schedule generation
//! - Plan snapshots and per-user persistence
//! - Guided session timer and its real-time runner

pub mod types;
pub mod error;
pub mod profile;
pub mod metrics;
pub mod catalog;
pub mod schedule;
pub mod routine;
pub mod snapshot;
pub mod completion;
pub mod store;
pub mod identity;
pub mod user_data;
pub mod tone;
pub mod session;
pub mod runner;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, FieldError, Result};
pub use types::*;
pub use profile::{ActivityLevel, Gender, Goal, Injury, TrainingLocation, UserProfile};
pub use metrics::{BmiCategory, HealthMetrics, ScoreRating};
pub use catalog::{build_default_catalog, get_default_catalog, ExerciseCatalog};
pub use schedule::{generate_plan, generate_schedule};
pub use snapshot::{DaySnapshot, PlanSnapshot};
pub use completion::CompletedExercises;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use identity::UserIdentity;
pub use user_data::UserData;
pub use tone::{Cue, LazyEmitter, SilentEmitter, TerminalBell, Tone, ToneEmitter};
pub use session::{Phase, PhaseDurations, SessionState, SessionTimer};
pub use runner::{SessionCommand, SessionEvent, SessionRunner, SessionSummary};
pub use config::Config;
