//! Local YAML fixtures: a merchant directory and a user location profile.
//!
//! These back the CLI front end. The directory answers searches with a
//! simple local policy: name searches match by case-insensitive substring,
//! location searches match by city (every merchant when the city is unknown).

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::location::UserLocationProfile;
use crate::merchants::MerchantSummary;
use crate::query_args::SearchQueryArgs;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub city: Option<String>,
}

impl DirectoryEntry {
    #[must_use]
    pub fn summary(&self) -> MerchantSummary {
        MerchantSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            logo: self.logo.clone(),
        }
    }

    fn in_city(&self, city: &str) -> bool {
        self.city
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(city.trim()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryFile {
    pub merchants: Vec<DirectoryEntry>,
}

impl DirectoryFile {
    /// Merchants answering `args`, in file order.
    #[must_use]
    pub fn matching(&self, args: &SearchQueryArgs) -> Vec<MerchantSummary> {
        match args.geo_location() {
            Some(geo) if geo.city.trim().is_empty() => {
                self.merchants.iter().map(DirectoryEntry::summary).collect()
            }
            Some(geo) => self
                .merchants
                .iter()
                .filter(|m| m.in_city(&geo.city))
                .map(DirectoryEntry::summary)
                .collect(),
            None => {
                let needle = args.search_name().trim().to_lowercase();
                self.merchants
                    .iter()
                    .filter(|m| m.name.to_lowercase().contains(&needle))
                    .map(DirectoryEntry::summary)
                    .collect()
            }
        }
    }
}

/// Load and validate a merchant directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_directory(path: &Path) -> Result<DirectoryFile, ConfigError> {
    let content = read(path)?;
    let directory: DirectoryFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_directory(&directory)?;

    Ok(directory)
}

/// Load a user location profile from a YAML file. Any field may be omitted.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_profile(path: &Path) -> Result<UserLocationProfile, ConfigError> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
        path: path.display().to_string(),
        source: e,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })
}

fn validate_directory(directory: &DirectoryFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for merchant in &directory.merchants {
        if merchant.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "merchant '{}' has an empty id",
                merchant.name
            )));
        }

        if merchant.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "merchant '{}' has an empty name",
                merchant.id
            )));
        }

        if !seen_ids.insert(merchant.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate merchant id: '{}'",
                merchant.id
            )));
        }
    }

    Ok(())
}
