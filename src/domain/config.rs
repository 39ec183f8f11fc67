use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::user::UserLabel;

/// Configuration for an organisation directory.
///
/// Lives in `.org/config.toml` under the directory root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Path of the snapshot file, relative to the directory root.
    snapshot: PathBuf,

    /// How users are labelled in org charts.
    pub user_label: UserLabel,

    /// Whether users are put in surname order before building the user
    /// hierarchy.
    ///
    /// Roots and direct reports then appear alphabetically in the chart.
    pub sort_users_by_surname: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
            user_label: UserLabel::default(),
            sort_users_by_surname: true,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the snapshot path relative to the directory root.
    #[must_use]
    pub fn snapshot(&self) -> &Path {
        &self.snapshot
    }

    /// Sets the snapshot path.
    pub fn set_snapshot(&mut self, path: PathBuf) {
        self.snapshot = path;
    }
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("org.yaml")
}

const fn default_sort() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_snapshot")]
        snapshot: PathBuf,

        #[serde(default)]
        user_label: UserLabel,

        #[serde(default = "default_sort")]
        sort_users_by_surname: bool,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                snapshot,
                user_label,
                sort_users_by_surname,
            } => Self {
                snapshot,
                user_label,
                sort_users_by_surname,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            snapshot: config.snapshot,
            user_label: config.user_label,
            sort_users_by_surname: config.sort_users_by_surname,
        }
    }
}
