use std::path::Path;

use clap::Parser;
use orgchart::{SearchQuery, search_users};
use tracing::instrument;
use uuid::Uuid;

/// Command arguments for `org search`.
#[derive(Debug, Parser)]
#[command(about = "Search users by name and print the matches as JSON")]
pub struct Search {
    /// Names to look for, e.g. "anna karin berg".
    query: Option<String>,

    /// Only users in this department (repeatable).
    #[arg(long, value_name = "ID")]
    department: Vec<Uuid>,

    /// Only users working for this company (repeatable).
    #[arg(long, value_name = "ID")]
    company: Vec<Uuid>,

    /// Only users with direct reports.
    #[arg(long)]
    managers: bool,

    /// Category filters as JSON: {"department": [..], "company": [..], "isManager": bool}
    #[arg(long, value_name = "JSON")]
    categories: Option<String>,
}

impl Search {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = super::open(root)?;

        let mut query = SearchQuery {
            text: self.query,
            departments: self.department,
            companies: self.company,
            managers_only: self.managers,
        };
        if let Some(json) = &self.categories {
            query = query.with_categories_json(json)?;
        }

        let hits = search_users(&directory, &query)?;
        println!("{}", serde_json::to_string_pretty(&hits)?);
        Ok(())
    }
}
