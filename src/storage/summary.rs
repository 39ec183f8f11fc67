use tracing::instrument;
use uuid::Uuid;

use crate::{
    domain::{BuildError, Company, Department, Hierarchy, User},
    storage::Directory,
};

/// Headline figures for the directory landing page.
#[derive(Debug)]
pub struct Summary<'a> {
    /// Number of companies.
    pub company_count: usize,
    /// Number of departments.
    pub department_count: usize,
    /// Number of users.
    pub user_count: usize,
    /// Users not assigned to any department.
    pub users_without_department: Vec<&'a User>,
    /// Decommissioned companies that still have departments, with those
    /// departments.
    pub decommissioned_with_departments: Vec<(&'a Company, Vec<&'a Department>)>,
    /// The reporting-line chart.
    pub org_chart: Hierarchy<Uuid>,
}

impl Summary<'_> {
    /// Number of levels shown in the flattened org chart, 0 when it is empty.
    ///
    /// Placeholder managers that never appear in the chart are not counted.
    #[must_use]
    pub fn chart_levels(&self) -> usize {
        self.org_chart
            .flatten()
            .iter()
            .map(|node| node.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl Directory {
    /// Gathers the landing page figures.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::CyclicReference`] if reporting lines loop.
    #[instrument(level = "debug", skip(self))]
    pub fn summary(&self) -> Result<Summary<'_>, BuildError<Uuid>> {
        let users_without_department = self
            .users()
            .iter()
            .filter(|u| u.department.is_none())
            .collect();

        let decommissioned_with_departments = self
            .companies()
            .iter()
            .filter(|c| c.is_decommissioned())
            .map(|c| (c, self.departments_of(c.id).collect::<Vec<_>>()))
            .filter(|(_, departments)| !departments.is_empty())
            .collect();

        Ok(Summary {
            company_count: self.companies().len(),
            department_count: self.departments().len(),
            user_count: self.users().len(),
            users_without_department,
            decommissioned_with_departments,
            org_chart: self.user_hierarchy()?,
        })
    }
}
