use std::{path::Path, process};

use clap::Parser;
use orgchart::ValidationError;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check companies, departments and users for integrity problems")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = super::open(root)?;
        let errors = directory.validate();

        match self.output {
            OutputFormat::Json => {
                let messages: Vec<_> = errors.iter().map(ToString::to_string).collect();
                let output = serde_json::json!({
                    "valid": errors.is_empty(),
                    "problems": messages,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => Self::output_table(&errors, self.quiet),
        }

        if !errors.is_empty() {
            process::exit(1);
        }
        Ok(())
    }

    fn output_table(errors: &[ValidationError], quiet: bool) {
        if errors.is_empty() {
            if !quiet {
                println!("{} ✅", "Directory is valid".success());
            }
            return;
        }

        if !quiet {
            println!(
                "{} ⚠️",
                format!("{} problem(s) found", errors.len()).warning()
            );
        }
        for error in errors {
            println!("  - {error}");
        }
    }
}
