use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of digits in a [`CompanyCode`].
pub const CODE_DIGITS: usize = 4;

/// A four digit numeric company code.
///
/// Shorter numeric input is padded with leading zeros, so `"7"` becomes
/// `"0007"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyCode(String);

/// The error returned when a company code is not 1-4 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("company code is of wrong format, expected 4 digit numeric string, got '{0}'")]
pub struct InvalidCodeError(pub String);

impl CompanyCode {
    /// Parses and pads a company code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCodeError`] if the input is empty, longer than four
    /// characters, or contains anything other than ASCII digits.
    pub fn new(code: &str) -> Result<Self, InvalidCodeError> {
        if code.is_empty() || code.len() > CODE_DIGITS || !code.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(InvalidCodeError(code.to_string()));
        }
        Ok(Self(format!("{code:0>width$}", width = CODE_DIGITS)))
    }

    /// The padded code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for CompanyCode {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for CompanyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CompanyCode {
    type Err = InvalidCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CompanyCode {
    type Error = InvalidCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CompanyCode> for String {
    fn from(code: CompanyCode) -> Self {
        code.0
    }
}

/// Lifecycle state of a company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    /// Trading normally.
    Active,
    /// Wound down. May not be chosen as a parent company.
    #[serde(alias = "decomissioned")]
    Decommissioned,
    /// Being set up.
    #[default]
    Onboarding,
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Decommissioned => "decommissioned",
            Self::Onboarding => "onboarding",
        })
    }
}

/// A legal entity, optionally owned by a parent company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier.
    pub id: Uuid,
    /// Trading name.
    pub name: NonEmptyString,
    /// Unique four digit code.
    pub code: CompanyCode,
    /// Lifecycle state.
    #[serde(default)]
    pub status: CompanyStatus,
    /// The owning company, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uuid>,
    /// Sites this company operates from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geolocations: Vec<Uuid>,
}

impl Company {
    /// Creates an onboarding company with no parent.
    #[must_use]
    pub fn new(name: NonEmptyString, code: CompanyCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            code,
            status: CompanyStatus::default(),
            parent: None,
            geolocations: Vec::new(),
        }
    }

    /// The label used in org charts, e.g. `Arveti (0001)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }

    /// Whether the company has been wound down.
    #[must_use]
    pub fn is_decommissioned(&self) -> bool {
        self.status == CompanyStatus::Decommissioned
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("0001", "0001"; "already padded")]
    #[test_case("001", "0001"; "three digits")]
    #[test_case("7", "0007"; "single digit")]
    #[test_case("9999", "9999"; "upper bound")]
    fn valid_codes_are_padded(input: &str, expected: &str) {
        assert_eq!(CompanyCode::new(input).unwrap().as_str(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("12345"; "too long")]
    #[test_case("12a4"; "not numeric")]
    #[test_case("-123"; "signed")]
    fn invalid_codes_are_rejected(input: &str) {
        let err = CompanyCode::new(input).unwrap_err();
        assert_eq!(err, InvalidCodeError(input.to_string()));
    }

    #[test]
    fn legacy_status_spelling_is_accepted() {
        let status: CompanyStatus = serde_yaml::from_str("decomissioned").unwrap();
        assert_eq!(status, CompanyStatus::Decommissioned);
        assert_eq!(
            serde_yaml::to_string(&status).unwrap().trim(),
            "decommissioned"
        );
    }

    #[test]
    fn code_is_validated_when_deserialising() {
        let yaml = "id: 8c1d3f0e-6c5e-4c53-9d35-52d1c1a0f001\nname: Arveti\ncode: '12'\n";
        let company: Company = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(company.code.as_str(), "0012");
        assert_eq!(company.status, CompanyStatus::Onboarding);
        assert_eq!(company.label(), "Arveti (0012)");

        let bad = "id: 8c1d3f0e-6c5e-4c53-9d35-52d1c1a0f001\nname: Arveti\ncode: 'x1'\n";
        assert!(serde_yaml::from_str::<Company>(bad).is_err());
    }
}
