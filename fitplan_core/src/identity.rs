//! Result of the external authentication step.
//!
//! Login and sessions live elsewhere. The core only needs the user id, to
//! scope persistence, and the onboarding flag with an optional cached profile.

use crate::profile::UserProfile;
use crate::store::JsonFileStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Id used when no authentication service is involved
pub const LOCAL_USER_ID: &str = "local";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserIdentity {
    pub user_id: String,
    #[serde(default)]
    pub onboarding_complete: bool,
    #[serde(default)]
    pub cached_profile: Option<UserProfile>,
}

impl UserIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            onboarding_complete: false,
            cached_profile: None,
        }
    }

    pub fn local() -> Self {
        Self::new(LOCAL_USER_ID)
    }

    /// Read an identity handed over by the sign-in step as JSON
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let identity: Self = serde_json::from_str(&contents)?;
        tracing::debug!(
            "Loaded identity '{}' (onboarding complete: {})",
            identity.user_id,
            identity.onboarding_complete
        );
        Ok(identity)
    }

    /// Profile carried over from a finished onboarding, if any
    pub fn onboarded_profile(&self) -> Option<&UserProfile> {
        if self.onboarding_complete {
            self.cached_profile.as_ref()
        } else {
            None
        }
    }

    pub fn needs_onboarding(&self) -> bool {
        self.onboarded_profile().is_none()
    }

    /// Directory-safe form of the user id
    pub fn storage_id(&self) -> String {
        let cleaned: String = self
            .user_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if cleaned.is_empty() {
            LOCAL_USER_ID.to_string()
        } else {
            cleaned
        }
    }

    /// File store rooted at `<data_dir>/users/<id>`
    pub fn file_store(&self, data_dir: &Path) -> JsonFileStore {
        JsonFileStore::new(data_dir.join("users").join(self.storage_id()))
    }
}
