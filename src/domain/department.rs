use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum length of a department name, after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// A department name, trimmed and at least [`MIN_NAME_LEN`] characters long.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartmentName(String);

/// The error returned for department names that are too short.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("department name must contain at least {MIN_NAME_LEN} characters, got '{0}'")]
pub struct InvalidNameError(pub String);

impl DepartmentName {
    /// Trims and validates a department name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNameError`] if fewer than [`MIN_NAME_LEN`] characters
    /// remain after trimming.
    pub fn new(name: &str) -> Result<Self, InvalidNameError> {
        let trimmed = name.trim();
        if trimmed.chars().count() < MIN_NAME_LEN {
            return Err(InvalidNameError(name.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepartmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DepartmentName {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DepartmentName> for String {
    fn from(name: DepartmentName) -> Self {
        name.0
    }
}

/// Whether a department is still operating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartmentStatus {
    /// Operating.
    #[default]
    #[serde(alias = "Active")]
    Active,
    /// Closed down.
    #[serde(alias = "Closed")]
    Closed,
}

/// A department within a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier.
    pub id: Uuid,
    /// The company this department belongs to.
    pub company: Uuid,
    /// Where the department is based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<Uuid>,
    /// Department name, e.g. `Finance`.
    pub name: DepartmentName,
    /// Whether the department is still operating.
    #[serde(default)]
    pub status: DepartmentStatus,
}

impl Department {
    /// Creates an active department for `company`.
    #[must_use]
    pub fn new(company: Uuid, name: DepartmentName) -> Self {
        Self {
            id: Uuid::new_v4(),
            company,
            geolocation: None,
            name,
            status: DepartmentStatus::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("IT", "IT")]
    #[test_case("  R&D ", "R&D")]
    fn names_are_trimmed(input: &str, expected: &str) {
        assert_eq!(DepartmentName::new(input).unwrap().as_str(), expected);
    }

    #[test_case("")]
    #[test_case(" x ")]
    fn short_names_are_rejected(input: &str) {
        assert!(DepartmentName::new(input).is_err());
    }

    #[test]
    fn capitalised_status_is_accepted() {
        let status: DepartmentStatus = serde_yaml::from_str("Closed").unwrap();
        assert_eq!(status, DepartmentStatus::Closed);
    }
}
