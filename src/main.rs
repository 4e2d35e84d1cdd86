use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use fwrecipe::App;
use fwrecipe::Recipe;
use fwrecipe::ops::git::RealGit;
use fwrecipe::ops::shell::RealShell;
use fwrecipe::recipe::DEFAULT_RECIPE;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Layer as _;

#[derive(Parser)]
#[command(name = "fwrecipe")]
#[command(about = "Build firmware from a JSON recipe of git and shell steps", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bring the working tree to the recipe's state and run its operations
    Build {
        /// Recipe file
        #[arg(default_value = DEFAULT_RECIPE)]
        file: PathBuf,
        /// Only show the steps, don't run them
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the steps of a recipe without running them
    Show {
        /// Recipe file
        #[arg(default_value = DEFAULT_RECIPE)]
        file: PathBuf,
    },
}

fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let app = App::new(RealGit, RealShell);
    let cli = Cli::parse();

    let (file, dry_run) = match cli.command {
        Some(Commands::Build { file, dry_run }) => (file, dry_run),
        Some(Commands::Show { file }) => (file, true),
        None => (PathBuf::from(DEFAULT_RECIPE), false),
    };

    let recipe = Recipe::from_file(&file)?;
    if dry_run {
        app.cmd_display(&recipe, &mut std::io::stdout())?;
    } else {
        app.cmd_build(&recipe, &mut std::io::stdout()).await?;
    }

    Ok(())
}
