//! Grain type registrations.
//!
//! A grain type declared with a persistent state named `accountStateName`
//! in a storage provider named `accountStorageName` has its state written to
//! blobs named `accountStateName-accountStorageName/<grainId>.json`. The
//! registry maps each grain type we care about to that blob name prefix.

use serde::Deserialize;
use std::collections::HashSet;

use crate::error::{ListerError, ListerResult};

/// A single grain type and the blob name prefix its state is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrainRegistration {
    #[serde(rename = "GrainType")]
    pub grain_type: String,
    #[serde(rename = "Prefix")]
    pub prefix: String,
}

impl GrainRegistration {
    pub fn new(grain_type: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            grain_type: grain_type.into(),
            prefix: prefix.into(),
        }
    }

    /// Builds the prefix used by a `[PersistentState(state, storage)]` grain.
    pub fn from_persistent_state(
        grain_type: impl Into<String>,
        state_name: &str,
        storage_name: &str,
    ) -> Self {
        Self::new(grain_type, format!("{}-{}", state_name, storage_name))
    }
}

/// Ordered, immutable table of grain registrations.
///
/// Grain types are unique. Iteration follows definition order, which is also
/// the order the scanner processes them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrainRegistry {
    entries: Vec<GrainRegistration>,
}

impl GrainRegistry {
    /// Creates a registry, rejecting empty names and duplicate grain types.
    pub fn new(entries: Vec<GrainRegistration>) -> ListerResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.grain_type.is_empty() {
                return Err(ListerError::Registry("grain type must not be empty".into()));
            }
            if entry.prefix.is_empty() {
                return Err(ListerError::Registry(format!(
                    "prefix for grain type '{}' must not be empty",
                    entry.grain_type
                )));
            }
            if !seen.insert(entry.grain_type.as_str()) {
                return Err(ListerError::Registry(format!(
                    "grain type '{}' is registered more than once",
                    entry.grain_type
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Returns the registration for a grain type.
    pub fn get(&self, grain_type: &str) -> Option<&GrainRegistration> {
        self.entries.iter().find(|e| e.grain_type == grain_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GrainRegistration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GrainRegistry {
    fn default() -> Self {
        Self {
            entries: vec![
                GrainRegistration::from_persistent_state(
                    "Account",
                    "accountStateName",
                    "accountStorageName",
                ),
                GrainRegistration::from_persistent_state(
                    "Client",
                    "clientStateName",
                    "clientStorageName",
                ),
            ],
        }
    }
}

impl<'a> IntoIterator for &'a GrainRegistry {
    type Item = &'a GrainRegistration;
    type IntoIter = std::slice::Iter<'a, GrainRegistration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
