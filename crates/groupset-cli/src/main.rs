use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "groupsetctl",
    about = "Leader-worker group sets: admission, rollout planning, gang sync",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Controller config file.
    #[arg(short, long, global = true, default_value = "groupset.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a scaffold groupset.toml
    Init {
        /// Directory the constraint-group store lives in.
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
    /// Run admission checks on a set manifest.
    Validate {
        /// Set manifest (.toml or .json).
        #[arg(short, long)]
        file: PathBuf,
        /// Previously admitted manifest; validates the change as an update.
        #[arg(long)]
        previous: Option<PathBuf>,
        /// Reject partitions greater than replicas instead of warning.
        #[arg(long)]
        strict_partition: bool,
    },
    /// Plan one rolling-update pass against observed groups.
    Plan {
        #[arg(short, long)]
        file: PathBuf,
        /// JSON array of observed groups: {index, revision, ready}.
        #[arg(long)]
        observed: PathBuf,
        /// Update revision; defaults to the hash of the manifest's templates.
        #[arg(long)]
        revision: Option<String>,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Annotate units and ensure one constraint group per leader.
    Sync {
        #[arg(short, long)]
        file: PathBuf,
        /// JSON array of units: {name, namespace, labels, annotations}.
        #[arg(long)]
        units: PathBuf,
        /// Output format: text or json (annotated units)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List stored constraint groups.
    Groups {
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,groupset=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { data_dir, force } => commands::init::init(&cli.config, &data_dir, force),
        Commands::Validate {
            file,
            previous,
            strict_partition,
        } => commands::validate::validate(&cli.config, &file, previous.as_deref(), strict_partition),
        Commands::Plan {
            file,
            observed,
            revision,
            format,
        } => commands::plan::plan(&cli.config, &file, &observed, revision.as_deref(), &format),
        Commands::Sync {
            file,
            units,
            format,
        } => commands::sync::sync(&cli.config, &file, &units, &format).await,
        Commands::Groups { namespace } => commands::groups::groups(&cli.config, namespace.as_deref()),
    }
}
