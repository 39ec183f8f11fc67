use std::path::Path;

use clap::Parser;
use orgchart::storage::Summary;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "Show directory counts and loose ends")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = super::open(root)?;
        let summary = directory.summary()?;

        if summary.company_count + summary.department_count + summary.user_count == 0 {
            println!("The directory is empty. Add companies to the snapshot to get started.");
            return Ok(());
        }

        match self.output {
            OutputFormat::Json => Self::output_json(&summary)?,
            OutputFormat::Table if self.quiet => Self::output_quiet(&summary),
            OutputFormat::Table => Self::output_table(&summary),
        }
        Ok(())
    }

    fn output_json(summary: &Summary<'_>) -> anyhow::Result<()> {
        use serde_json::json;

        let without_department: Vec<_> = summary
            .users_without_department
            .iter()
            .map(|u| json!({ "id": u.id, "fullName": u.full_name() }))
            .collect();

        let decommissioned: Vec<_> = summary
            .decommissioned_with_departments
            .iter()
            .map(|(company, departments)| {
                json!({
                    "id": company.id,
                    "name": company.label(),
                    "departments": departments
                        .iter()
                        .map(|d| json!({ "id": d.id, "name": d.name }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        let chart: Vec<_> = summary
            .org_chart
            .flatten()
            .into_iter()
            .map(|node| json!({ "id": node.key(), "label": node.label(), "depth": node.depth() }))
            .collect();

        let output = json!({
            "counts": {
                "companies": summary.company_count,
                "departments": summary.department_count,
                "users": summary.user_count,
            },
            "usersWithoutDepartment": without_department,
            "decommissionedCompaniesWithDepartments": decommissioned,
            "orgChart": chart,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(summary: &Summary<'_>) {
        println!(
            "companies={} departments={} users={} unassigned={} decommissioned={}",
            summary.company_count,
            summary.department_count,
            summary.user_count,
            summary.users_without_department.len(),
            summary.decommissioned_with_departments.len(),
        );
    }

    fn output_table(summary: &Summary<'_>) {
        const MAX_DISPLAY: usize = 5;

        println!("Directory counts");
        println!("{}", "────────────────".dim());
        if is_narrow() {
            println!("Companies: {}", summary.company_count);
            println!("Departments: {}", summary.department_count);
            println!("Users: {}", summary.user_count);
        } else {
            println!("{:<12} {}", "Companies", summary.company_count);
            println!("{:<12} {}", "Departments", summary.department_count);
            println!("{:<12} {}", "Users", summary.user_count);
        }
        println!();

        let unassigned = &summary.users_without_department;
        if unassigned.is_empty() {
            println!("Users without department: {} ✅", "0".success());
        } else {
            println!(
                "Users without department: {} ⚠️",
                unassigned.len().to_string().warning()
            );
            for user in unassigned.iter().take(MAX_DISPLAY) {
                println!("  - {}", user.full_name());
            }
            if unassigned.len() > MAX_DISPLAY {
                println!("  - ... and {} more", unassigned.len() - MAX_DISPLAY);
            }
        }
        println!();

        let decommissioned = &summary.decommissioned_with_departments;
        if decommissioned.is_empty() {
            println!("Departments of decommissioned companies: {} ✅", "0".success());
        } else {
            let count: usize = decommissioned.iter().map(|(_, d)| d.len()).sum();
            println!(
                "Departments of decommissioned companies: {} ⚠️",
                count.to_string().warning()
            );
            for (company, departments) in decommissioned {
                let names: Vec<_> = departments.iter().map(|d| d.name.as_str()).collect();
                println!("  - {}: {}", company.label(), names.join(", "));
            }
            println!("{}", "Move or close these departments.".dim());
        }
        println!();

        let charted = summary.org_chart.flatten().len();
        if charted == 0 {
            println!("Org chart: {}", "nobody to show".dim());
            return;
        }
        println!(
            "Org chart: {} people, {} top-level, {} levels deep",
            charted,
            summary.org_chart.root_ids().len(),
            summary.chart_levels(),
        );
        println!("{}", "Run 'org tree users' to see it.".dim());
    }
}
