//! Typed access to one user's stored profile, plan and completion set.

use crate::completion::CompletedExercises;
use crate::identity::UserIdentity;
use crate::profile::UserProfile;
use crate::snapshot::PlanSnapshot;
use crate::store::KeyValueStore;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const PROFILE_KEY: &str = "profile";
pub const PLAN_KEY: &str = "plan";
pub const COMPLETED_KEY: &str = "completed";

pub struct UserData<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> UserData<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.store.get(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Stored '{}' has an unexpected shape: {}. Ignoring.", key, e);
                None
            }
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_value(value)?;
        self.store.put(key, &json)
    }

    /// Write without surfacing failures
    fn save_best_effort<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Err(e) = self.save(key, value) {
            tracing::warn!("Failed to persist '{}': {}", key, e);
        }
    }

    pub fn load_profile(&self) -> Option<UserProfile> {
        self.load(PROFILE_KEY)
    }

    /// Stored profile, else the one cached at sign-in after onboarding
    pub fn resolve_profile(&self, identity: &UserIdentity) -> Option<UserProfile> {
        self.load_profile().or_else(|| {
            let cached = identity.onboarded_profile()?.clone();
            tracing::info!("Using cached profile for user '{}'", identity.user_id);
            Some(cached)
        })
    }

    pub fn load_plan(&self) -> Option<PlanSnapshot> {
        self.load(PLAN_KEY)
    }

    /// Absent is the same as nothing completed
    pub fn load_completed(&self) -> CompletedExercises {
        self.load(COMPLETED_KEY).unwrap_or_default()
    }

    pub fn save_profile(&mut self, profile: &UserProfile) {
        self.save_best_effort(PROFILE_KEY, profile);
    }

    /// Store a new plan. Completion marks belong to the old plan and are cleared.
    pub fn save_plan(&mut self, plan: &PlanSnapshot) {
        self.save_best_effort(PLAN_KEY, plan);
        self.save_best_effort(COMPLETED_KEY, &CompletedExercises::new());
    }

    pub fn save_completed(&mut self, completed: &CompletedExercises) {
        self.save_best_effort(COMPLETED_KEY, completed);
    }

    /// Toggle one exercise and persist the set, returning the new state
    pub fn toggle_completed(&mut self, day_index: usize, exercise_id: &str) -> bool {
        let mut completed = self.load_completed();
        let done = completed.toggle(day_index, exercise_id);
        self.save_completed(&completed);
        done
    }

    /// Remove everything stored for this user
    pub fn reset(&mut self) -> Result<()> {
        for key in [PROFILE_KEY, PLAN_KEY, COMPLETED_KEY] {
            self.store.remove(key)?;
        }
        tracing::info!("Cleared stored profile, plan and completion state");
        Ok(())
    }
}
