use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::collation::SortKey;

/// Maximum length of a given name or surname.
pub const MAX_NAME_LEN: usize = 100;

/// A non-empty personal name of at most [`MAX_NAME_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

/// The error returned for empty or overlong names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPersonNameError {
    /// The name was empty or whitespace.
    #[error("name must not be empty")]
    Empty,
    /// The name exceeded [`MAX_NAME_LEN`] characters.
    #[error("name must be at most {MAX_NAME_LEN} characters, got {0}")]
    TooLong(usize),
}

impl PersonName {
    /// Validates a personal name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPersonNameError`] if the name is blank or longer than
    /// [`MAX_NAME_LEN`] characters.
    pub fn new(name: &str) -> Result<Self, InvalidPersonNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(InvalidPersonNameError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LEN {
            return Err(InvalidPersonNameError::TooLong(len));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for PersonName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PersonName {
    type Error = InvalidPersonNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<&str> for PersonName {
    type Error = InvalidPersonNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PersonName> for String {
    fn from(name: PersonName) -> Self {
        name.0
    }
}

/// An employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// First name(s).
    pub given_name: PersonName,
    /// Family name.
    pub surname: PersonName,
    /// Work email address, unique across the directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Assigned Microsoft 365 licence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m365_license: Option<String>,
    /// The department the user works in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Uuid>,
    /// The user's line manager.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<Uuid>,
}

impl User {
    /// Creates a user with no department or manager.
    #[must_use]
    pub fn new(given_name: PersonName, surname: PersonName) -> Self {
        Self {
            id: Uuid::new_v4(),
            given_name,
            surname,
            email: None,
            m365_license: None,
            department: None,
            manager: None,
        }
    }

    /// `"{given name} {surname}"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
    }

    /// Sort key placing users in Swedish alphabetical surname order.
    ///
    /// Users sharing a surname compare equal, so a stable sort keeps their
    /// stored order.
    #[must_use]
    pub fn surname_key(&self) -> SortKey {
        SortKey::swedish(&self.surname)
    }
}

/// How users are labelled in org charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UserLabel {
    /// Given name and surname.
    #[default]
    FullName,
    /// Email address, falling back to the full name for users without one.
    Email,
    /// The bare identifier.
    Id,
}

impl UserLabel {
    /// The label for `user`, or `None` to fall back to the identifier.
    #[must_use]
    pub fn apply(self, user: &User) -> Option<String> {
        match self {
            Self::FullName => Some(user.full_name()),
            Self::Email => Some(user.email.clone().unwrap_or_else(|| user.full_name())),
            Self::Id => None,
        }
    }
}
