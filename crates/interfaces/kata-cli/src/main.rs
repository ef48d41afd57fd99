use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use kata_cli::commands;
use kata_config::Config;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[arg(long, global = true, env = "KATA_CONFIG", help = "Path to config.json")]
    config: Option<Utf8PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download exercises into the workspace without touching existing files
    Fetch {
        track: String,
        #[arg(help = "Exercise slugs (default: the whole track)")]
        exercises: Vec<String>,
    },
    /// Submit a solution file from the workspace
    Submit { file: Utf8PathBuf },
    /// Skip an exercise
    Skip { track: String, exercise: String },
    /// Show progress on a track
    Status { track: String },
    /// Show the latest submission for an exercise
    Latest { track: String, exercise: String },
    /// List exercises of a track already in the workspace
    Local {
        track: String,
        #[arg(required = true, help = "Exercise slugs to look for")]
        slugs: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!("Workspace root: {}", config.dir);

    // Everything except the offline listing talks to the API.
    if !matches!(cli.command, Commands::Local { .. }) {
        config.require_api_key()?;
    }

    match cli.command {
        Commands::Fetch { track, exercises } => {
            commands::cmd_fetch(&config, track, exercises).await?;
        }
        Commands::Submit { file } => {
            commands::cmd_submit(&config, file).await?;
        }
        Commands::Skip { track, exercise } => {
            commands::cmd_skip(&config, track, exercise).await?;
        }
        Commands::Status { track } => {
            commands::cmd_status(&config, track).await?;
        }
        Commands::Latest { track, exercise } => {
            commands::cmd_latest(&config, track, exercise).await?;
        }
        Commands::Local { track, slugs } => {
            commands::cmd_local(&config, track, slugs)?;
        }
    }

    Ok(())
}
