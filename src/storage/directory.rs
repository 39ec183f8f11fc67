//! A file backed organisation directory
//!
//! The [`Directory`] loads a YAML [`Snapshot`] and answers the queries the
//! rest of the application needs: lookups by id, the populated records that
//! feed the org-chart [`Hierarchy`], and the derived collections (users of a
//! department, subsidiaries of a company, and so on).

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;
use uuid::Uuid;

use crate::{
    domain::{
        BuildError, Company, CompanyRecord, Config, Department, EntityRef, Geolocation, Hierarchy,
        User, UserRecord,
        records::{company_ref, user_ref},
        user::UserLabel,
    },
    storage::Snapshot,
};

/// Name of the directory holding the configuration file.
pub const CONFIG_DIR: &str = ".org";

/// Errors that can occur when loading a directory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The snapshot file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the snapshot file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The snapshot file is not a valid snapshot.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Path of the snapshot file.
        path: PathBuf,
        /// The underlying error.
        source: serde_yaml::Error,
    },
    /// Two entries of the same collection share an id.
    #[error("duplicate {collection} id {id}")]
    DuplicateId {
        /// The collection containing the duplicate.
        collection: &'static str,
        /// The repeated id.
        id: Uuid,
    },
}

/// Errors that can occur when saving a directory.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_yaml::Error),
    /// The snapshot file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Path of the snapshot file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

/// An in-memory organisation directory.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    config: Config,
    companies: Vec<Company>,
    departments: Vec<Department>,
    users: Vec<User>,
    geolocations: Vec<Geolocation>,

    company_index: HashMap<Uuid, usize>,
    department_index: HashMap<Uuid, usize>,
    user_index: HashMap<Uuid, usize>,
    geolocation_index: HashMap<Uuid, usize>,
}

impl Directory {
    /// Opens the directory rooted at `root`.
    ///
    /// The configuration is read from `.org/config.toml`, falling back to the
    /// defaults if it is missing or invalid. The snapshot path is taken from
    /// the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the snapshot cannot be read or parsed, or if
    /// it contains duplicate ids.
    #[instrument(level = "debug")]
    pub fn open(root: &Path) -> Result<Self, LoadError> {
        let config = load_config(root);
        let path = root.join(config.snapshot());

        let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let snapshot: Snapshot =
            serde_yaml::from_str(&content).map_err(|source| LoadError::Parse {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(
            companies = snapshot.companies.len(),
            departments = snapshot.departments.len(),
            users = snapshot.users.len(),
            "loaded snapshot from {}",
            path.display()
        );

        Self::from_snapshot(snapshot, config)
    }

    /// Builds a directory from an in-memory snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateId`] if any collection repeats an id.
    pub fn from_snapshot(snapshot: Snapshot, config: Config) -> Result<Self, LoadError> {
        Ok(Self {
            config,
            company_index: index_by_id("company", &snapshot.companies, |c| c.id)?,
            department_index: index_by_id("department", &snapshot.departments, |d| d.id)?,
            user_index: index_by_id("user", &snapshot.users, |u| u.id)?,
            geolocation_index: index_by_id("geolocation", &snapshot.geolocations, |g| g.id)?,
            companies: snapshot.companies,
            departments: snapshot.departments,
            users: snapshot.users,
            geolocations: snapshot.geolocations,
        })
    }

    /// Writes the directory contents to `path` as a YAML snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if serialization or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        let content = serde_yaml::to_string(&self.snapshot())?;
        std::fs::write(path, content).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// A copy of the directory contents.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            companies: self.companies.clone(),
            departments: self.departments.clone(),
            users: self.users.clone(),
            geolocations: self.geolocations.clone(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// All companies, in stored order.
    #[must_use]
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// All departments, in stored order.
    #[must_use]
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// All users, in stored order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// All geolocations, in stored order.
    #[must_use]
    pub fn geolocations(&self) -> &[Geolocation] {
        &self.geolocations
    }

    /// Looks up a company by id.
    #[must_use]
    pub fn company(&self, id: Uuid) -> Option<&Company> {
        self.company_index.get(&id).map(|&i| &self.companies[i])
    }

    /// Looks up a department by id.
    #[must_use]
    pub fn department(&self, id: Uuid) -> Option<&Department> {
        self.department_index.get(&id).map(|&i| &self.departments[i])
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.user_index.get(&id).map(|&i| &self.users[i])
    }

    /// Looks up a geolocation by id.
    #[must_use]
    pub fn geolocation(&self, id: Uuid) -> Option<&Geolocation> {
        self.geolocation_index.get(&id).map(|&i| &self.geolocations[i])
    }

    /// The company a user works for, derived through their department.
    #[must_use]
    pub fn company_of(&self, user: &User) -> Option<&Company> {
        let department = self.department(user.department?)?;
        self.company(department.company)
    }

    /// Departments belonging to a company, in stored order.
    pub fn departments_of(&self, company: Uuid) -> impl Iterator<Item = &Department> + '_ {
        self.departments
            .iter()
            .filter(move |d| d.company == company)
    }

    /// Users working in a department, in surname order.
    #[must_use]
    pub fn users_of_department(&self, department: Uuid) -> Vec<&User> {
        let mut users: Vec<_> = self
            .users
            .iter()
            .filter(|u| u.department == Some(department))
            .collect();
        users.sort_by_cached_key(|u| u.surname_key());
        users
    }

    /// Users working in any department of a company, in surname order.
    #[must_use]
    pub fn users_of_company(&self, company: Uuid) -> Vec<&User> {
        let mut users: Vec<_> = self
            .users
            .iter()
            .filter(|u| self.company_of(u).is_some_and(|c| c.id == company))
            .collect();
        users.sort_by_cached_key(|u| u.surname_key());
        users
    }

    /// Users whose manager is `manager`, in stored order.
    pub fn direct_reports(&self, manager: Uuid) -> impl Iterator<Item = &User> + '_ {
        self.users
            .iter()
            .filter(move |u| u.manager == Some(manager))
    }

    /// Companies populated with their parent and subsidiaries, in stored
    /// order.
    #[must_use]
    pub fn company_records(&self) -> Vec<CompanyRecord<'_>> {
        let mut subsidiaries: HashMap<Uuid, Vec<EntityRef>> = HashMap::new();
        for company in &self.companies {
            if let Some(parent) = company.parent {
                subsidiaries
                    .entry(parent)
                    .or_default()
                    .push(company_ref(company));
            }
        }

        self.companies
            .iter()
            .map(|company| CompanyRecord {
                company,
                parent: company.parent.map(|id| {
                    self.company(id)
                        .map_or_else(|| EntityRef::unresolved(id), company_ref)
                }),
                subsidiaries: subsidiaries.remove(&company.id).unwrap_or_default(),
            })
            .collect()
    }

    /// Users populated with their manager and direct reports.
    ///
    /// Users appear in surname order when `sorted` is set and in stored order
    /// otherwise. Direct reports follow the same order.
    #[must_use]
    pub fn user_records(&self, label: UserLabel, sorted: bool) -> Vec<UserRecord<'_>> {
        let mut users: Vec<&User> = self.users.iter().collect();
        if sorted {
            users.sort_by_cached_key(|u| u.surname_key());
        }

        let mut reports: HashMap<Uuid, Vec<EntityRef>> = HashMap::new();
        for user in &users {
            if let Some(manager) = user.manager {
                reports
                    .entry(manager)
                    .or_default()
                    .push(user_ref(user, label));
            }
        }

        users
            .into_iter()
            .map(|user| UserRecord {
                user,
                label: label.apply(user),
                manager: user.manager.map(|id| {
                    self.user(id)
                        .map_or_else(|| EntityRef::unresolved(id), |m| user_ref(m, label))
                }),
                direct_reports: reports.remove(&user.id).unwrap_or_default(),
            })
            .collect()
    }

    /// The company ownership chart.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::CyclicReference`] if companies own each other.
    #[instrument(level = "debug", skip(self))]
    pub fn company_hierarchy(&self) -> Result<Hierarchy<Uuid>, BuildError<Uuid>> {
        Hierarchy::build(&self.company_records())
    }

    /// The reporting-line chart, labelled and ordered per the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::CyclicReference`] if managers report to each
    /// other.
    #[instrument(level = "debug", skip(self))]
    pub fn user_hierarchy(&self) -> Result<Hierarchy<Uuid>, BuildError<Uuid>> {
        let records =
            self.user_records(self.config.user_label, self.config.sort_users_by_surname);
        Hierarchy::build(&records)
    }
}

fn index_by_id<T>(
    collection: &'static str,
    items: &[T],
    id_of: impl Fn(&T) -> Uuid,
) -> Result<HashMap<Uuid, usize>, LoadError> {
    let mut index = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let id = id_of(item);
        if index.insert(id, i).is_some() {
            return Err(LoadError::DuplicateId { collection, id });
        }
    }
    Ok(index)
}

/// The path of the configuration file for a directory rooted at `root`.
#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join("config.toml")
}

fn load_config(root: &Path) -> Config {
    let path = config_path(root);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}
