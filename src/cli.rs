use std::path::{Path, PathBuf};

mod search;
mod status;
mod terminal;
mod tree;
mod validate;

use clap::ArgAction;
use orgchart::{Config, Directory, Snapshot, storage::directory};
use search::Search;
use status::Status;
use tracing::instrument;
use tree::Tree;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the organisation directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show directory counts and loose ends (default)
    Status(Status),

    /// Initialize a new organisation directory
    Init,

    /// Print an org chart
    Tree(Tree),

    /// Search users by name
    Search(Search),

    /// Check directory integrity
    Validate(Validate),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init => Init::run(root)?,
            Self::Tree(command) => command.run(root)?,
            Self::Search(command) => command.run(root)?,
            Self::Validate(command) => command.run(root)?,
        }
        Ok(())
    }
}

struct Init;

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use std::fs;

        let config_dir = root.join(directory::CONFIG_DIR);
        if config_dir.exists() {
            anyhow::bail!(
                "Directory already initialized (found existing {} directory)",
                directory::CONFIG_DIR
            );
        }

        fs::create_dir_all(&config_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", config_dir.display()))?;

        let config = Config::default();
        config
            .save(&directory::config_path(root))
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        let snapshot_path = root.join(config.snapshot());
        if snapshot_path.exists() {
            println!("Keeping existing snapshot {}", snapshot_path.display());
        } else {
            Directory::from_snapshot(Snapshot::default(), config.clone())?
                .save(&snapshot_path)?;
            println!("  Created: {}", config.snapshot().display());
        }

        println!("Initialized organisation directory in {}", root.display());
        println!("  Created: {}/config.toml", directory::CONFIG_DIR);
        Ok(())
    }
}

/// Opens the directory, attaching the root to any error.
fn open(root: &Path) -> anyhow::Result<Directory> {
    use anyhow::Context;

    Directory::open(root)
        .with_context(|| format!("Failed to open organisation directory at {}", root.display()))
}
