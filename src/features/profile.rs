// Profile directory: display names and bios keyed by screen name.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileEntry {
    pub screen_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileDirectory {
    profiles: HashMap<String, ProfileEntry>,
}

impl ProfileDirectory {
    pub fn from_entries(entries: Vec<ProfileEntry>) -> Self {
        let profiles = entries
            .into_iter()
            .map(|entry| (entry.screen_name.clone(), entry))
            .collect();
        Self { profiles }
    }

    /// Load a JSON array of profile objects.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profiles {}", path.display()))?;
        let entries: Vec<ProfileEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse profiles {}", path.display()))?;

        let directory = Self::from_entries(entries);
        info!(profiles = directory.len(), "Loaded profile directory");
        Ok(directory)
    }

    pub fn get(&self, screen_name: &str) -> Option<&ProfileEntry> {
        self.profiles.get(screen_name)
    }

    pub fn name(&self, screen_name: &str) -> Option<&str> {
        self.get(screen_name).and_then(|p| p.name.as_deref())
    }

    pub fn description(&self, screen_name: &str) -> Option<&str> {
        self.get(screen_name).and_then(|p| p.description.as_deref())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
