use std::path::Path;

use clap::{Parser, ValueEnum};
use orgchart::{
    Directory, Hierarchy,
    domain::{UserLabel, company::CompanyStatus},
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use super::terminal::{Colorize, status_badge};

/// Command arguments for `org tree`.
#[derive(Debug, Parser)]
#[command(about = "Print an org chart, parents before their children")]
pub struct Tree {
    /// Which chart to print.
    chart: Chart,

    /// Output format (default: text).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Override the configured user label.
    #[arg(long, value_enum)]
    label: Option<UserLabel>,

    /// Only print nodes up to this depth (0 = roots only).
    #[arg(long, value_name = "N")]
    depth: Option<usize>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Chart {
    /// Reporting lines, managers above their direct reports.
    Users,
    /// Ownership, parent companies above their subsidiaries.
    Companies,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: &'a Uuid,
    label: &'a str,
    depth: usize,
    parent: Option<&'a Uuid>,
    children: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<CompanyStatus>,
}

impl Tree {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = super::open(root)?;

        let hierarchy = match self.chart {
            Chart::Companies => directory.company_hierarchy()?,
            Chart::Users => {
                let config = directory.config();
                let label = self.label.unwrap_or(config.user_label);
                let records = directory.user_records(label, config.sort_users_by_surname);
                Hierarchy::build(&records)?
            }
        };

        let rows = self.rows(&directory, &hierarchy);
        match self.output {
            OutputFormat::Text => render_text(&rows),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        }
        Ok(())
    }

    fn rows<'a>(
        &self,
        directory: &Directory,
        hierarchy: &'a Hierarchy<Uuid>,
    ) -> Vec<Row<'a>> {
        let limit = self.depth.unwrap_or(usize::MAX);
        hierarchy
            .flatten()
            .into_iter()
            .filter(|node| node.depth() <= limit)
            .map(|node| Row {
                id: node.key(),
                label: node.label(),
                depth: node.depth(),
                parent: hierarchy.parent_of(node).map(|p| p.key()),
                children: node.children().len(),
                status: match self.chart {
                    Chart::Companies => directory.company(*node.key()).map(|c| c.status),
                    Chart::Users => None,
                },
            })
            .collect()
    }
}

fn render_text(rows: &[Row<'_>]) {
    if rows.is_empty() {
        println!("{}", "Nothing to show.".dim());
        return;
    }
    for row in rows {
        let indent = "  ".repeat(row.depth);
        let mut line = format!("{indent}{}", row.label);
        if let Some(status) = row.status {
            line.push(' ');
            line.push_str(&status_badge(status));
        }
        if row.children > 0 {
            line.push(' ');
            line.push_str(&format!("({})", row.children).dim());
        }
        println!("{line}");
    }
}
