//! Free-text user search.
//!
//! Names are matched as case-insensitive substrings. A multi-word query is
//! first read as "given names, then surname"; when that finds nobody, growing
//! prefixes of the query are tried against given names alone and then
//! against surnames alone.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{domain::User, storage::Directory};

/// Errors raised while preparing a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The category filter was not valid JSON.
    #[error("invalid categories: {0}")]
    Categories(#[from] serde_json::Error),
    /// A name pattern could not be compiled.
    #[error("invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// What to search for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free text matched against names.
    pub text: Option<String>,
    /// Restrict to users in any of these departments.
    pub departments: Vec<Uuid>,
    /// Restrict to users working for any of these companies.
    pub companies: Vec<Uuid>,
    /// Restrict to users with at least one direct report.
    pub managers_only: bool,
}

/// Category filters in the JSON shape used by the search endpoint:
/// `{"department": [...], "company": [...], "isManager": true}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Categories {
    #[serde(default)]
    department: Vec<Uuid>,
    #[serde(default)]
    company: Vec<Uuid>,
    #[serde(default)]
    is_manager: bool,
}

impl SearchQuery {
    /// A query matching `text` with no category filters.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Adds the filters from a JSON categories object.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Categories`] if `json` is malformed.
    pub fn with_categories_json(mut self, json: &str) -> Result<Self, SearchError> {
        let categories: Categories = serde_json::from_str(json)?;
        self.departments.extend(categories.department);
        self.companies.extend(categories.company);
        self.managers_only |= categories.is_manager;
        Ok(self)
    }
}

/// A matched user, serialised as the user's fields plus `fullName` and
/// `directReports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit<'a> {
    /// The matched user.
    #[serde(flatten)]
    pub user: &'a User,
    /// Given name and surname.
    pub full_name: String,
    /// Ids of users reporting to this one.
    pub direct_reports: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy)]
enum Match {
    Any,
    All,
}

/// Runs `query` against the directory.
///
/// Hits keep the directory's stored order.
///
/// # Errors
///
/// Returns [`SearchError::Pattern`] if a name pattern cannot be compiled.
#[instrument(level = "debug", skip(directory))]
pub fn search_users<'a>(
    directory: &'a Directory,
    query: &SearchQuery,
) -> Result<Vec<SearchHit<'a>>, SearchError> {
    let candidates: Vec<&User> = directory
        .users()
        .iter()
        .filter(|u| in_categories(directory, u, query))
        .collect();

    let parts: Vec<&str> = query
        .text
        .as_deref()
        .map(|t| t.split(' ').collect())
        .unwrap_or_default();

    let mut found = match parts.as_slice() {
        [] => by_name(&candidates, None, None, Match::Any)?,
        [single] => by_name(&candidates, Some(*single), Some(*single), Match::Any)?,
        [given @ .., surname] => by_parts(&candidates, &given.join(" "), surname, &parts)?,
    };

    let managers: HashSet<Uuid> = directory.users().iter().filter_map(|u| u.manager).collect();
    if query.managers_only {
        found.retain(|u| managers.contains(&u.id));
    }
    tracing::debug!(hits = found.len(), "search finished");

    Ok(found
        .into_iter()
        .map(|user| SearchHit {
            user,
            full_name: user.full_name(),
            direct_reports: directory.direct_reports(user.id).map(|r| r.id).collect(),
        })
        .collect())
}

fn by_parts<'a>(
    candidates: &[&'a User],
    given: &str,
    surname: &str,
    parts: &[&str],
) -> Result<Vec<&'a User>, SearchError> {
    let found = by_name(candidates, Some(given), Some(surname), Match::All)?;
    if !found.is_empty() {
        return Ok(found);
    }

    for i in 2..parts.len() {
        let prefix = parts[..i].join(" ");
        let found = by_name(candidates, Some(&prefix), None, Match::Any)?;
        if !found.is_empty() {
            return Ok(found);
        }
    }

    for i in 2..parts.len() {
        let prefix = parts[..i].join(" ");
        let found = by_name(candidates, None, Some(&prefix), Match::Any)?;
        if !found.is_empty() {
            return Ok(found);
        }
    }

    Ok(Vec::new())
}

/// Filters `candidates` by name.
///
/// Empty patterns are ignored when matching [`Match::Any`]; if there are none
/// left, every candidate matches. With [`Match::All`] a missing pattern
/// matches anything.
fn by_name<'a>(
    candidates: &[&'a User],
    given: Option<&str>,
    surname: Option<&str>,
    mode: Match,
) -> Result<Vec<&'a User>, SearchError> {
    let given = given.filter(|s| !s.is_empty()).map(pattern).transpose()?;
    let surname = surname.filter(|s| !s.is_empty()).map(pattern).transpose()?;

    let matches = |user: &User| match (&given, &surname, mode) {
        (None, None, _) => true,
        (g, s, Match::Any) => {
            g.as_ref().is_some_and(|g| g.is_match(&user.given_name))
                || s.as_ref().is_some_and(|s| s.is_match(&user.surname))
        }
        (g, s, Match::All) => {
            g.as_ref().is_none_or(|g| g.is_match(&user.given_name))
                && s.as_ref().is_none_or(|s| s.is_match(&user.surname))
        }
    };

    Ok(candidates.iter().copied().filter(|u| matches(*u)).collect())
}

fn pattern(text: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()
}

fn in_categories(directory: &Directory, user: &User, query: &SearchQuery) -> bool {
    if !query.departments.is_empty()
        && !user
            .department
            .is_some_and(|d| query.departments.contains(&d))
    {
        return false;
    }
    if !query.companies.is_empty()
        && !directory
            .company_of(user)
            .is_some_and(|c| query.companies.contains(&c.id))
    {
        return false;
    }
    true
}
