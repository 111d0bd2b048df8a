//! Completed-exercise tracking for a plan.
//!
//! Entries are keyed `"{day_index}_{exercise_id}"`, so the same exercise on
//! two different days is tracked separately.

use crate::snapshot::DaySnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub fn completion_key(day_index: usize, exercise_id: &str) -> String {
    format!("{}_{}", day_index, exercise_id)
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CompletedExercises {
    keys: BTreeSet<String>,
}

impl CompletedExercises {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self, day_index: usize, exercise_id: &str) -> bool {
        self.keys.contains(&completion_key(day_index, exercise_id))
    }

    /// Flip an entry, returning whether it is now marked done
    pub fn toggle(&mut self, day_index: usize, exercise_id: &str) -> bool {
        let key = completion_key(day_index, exercise_id);
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// (done, total) for one day of a plan
    pub fn day_progress(&self, day_index: usize, day: &DaySnapshot) -> (usize, usize) {
        let done = day
            .exercise_ids
            .iter()
            .filter(|id| self.is_done(day_index, id))
            .count();
        (done, day.exercise_ids.len())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}
