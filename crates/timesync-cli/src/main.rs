use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use timesync_engine::{Command, ConfigRecord, EngineOptions, Session};

mod render;
mod share;

#[derive(Parser)]
#[command(name = "timesync")]
#[command(about = "Find fair meeting windows across time zones", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank meeting windows for a configuration
    Suggest(SuggestArgs),
    /// Show each participant's availability across the baseline day
    Grid(GridArgs),
    /// Encode or decode a share-link blob
    #[command(subcommand)]
    Share(ShareCommand),
    /// List known IANA time zones
    Zones {
        /// Only zones containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Configuration JSON file ("-" reads stdin)
    #[arg(short, long)]
    config: PathBuf,

    /// Reference day in the baseline zone (defaults to the record's date, then today)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Tick granularity in minutes
    #[arg(short, long)]
    granularity: Option<u32>,

    /// Reject a malformed configuration instead of falling back to defaults
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct SuggestArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Maximum number of ranked windows
    #[arg(short, long)]
    top: Option<usize>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GridArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ShareCommand {
    /// Print a URL-safe blob for a configuration file
    Encode {
        /// Configuration JSON file ("-" reads stdin)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the configuration JSON held in a blob
    Decode {
        blob: String,

        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Suggest(args) => run_suggest(args),
        Commands::Grid(args) => run_grid(args),
        Commands::Share(cmd) => run_share(cmd),
        Commands::Zones { filter } => {
            let needle = filter.map(|f| f.to_lowercase());
            for zone in timesync_engine::time::zone_names() {
                if needle
                    .as_deref()
                    .is_none_or(|n| zone.to_lowercase().contains(n))
                {
                    println!("{zone}");
                }
            }
            Ok(())
        }
    }
}

fn run_suggest(args: SuggestArgs) -> Result<()> {
    let mut session = load_session(&args.input)?;
    if let Some(top) = args.top {
        let options = EngineOptions {
            top_n: top,
            ..session.options().clone()
        };
        session.apply(Command::SetOptions(options))?;
    }

    let suggestions = session.suggestions().context("compute suggestions")?;
    info!("{} suggestion(s)", suggestions.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else {
        print!("{}", render::suggestions(&session, &suggestions));
    }
    Ok(())
}

fn run_grid(args: GridArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    let grid = session.grid().context("build availability grid")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    } else {
        print!("{}", render::timeline(&session, &grid));
    }
    Ok(())
}

fn run_share(cmd: ShareCommand) -> Result<()> {
    match cmd {
        ShareCommand::Encode { config } => {
            let text = read_input(&config)?;
            let record = ConfigRecord::from_json(&text)
                .with_context(|| format!("parse {}", config.display()))?;
            println!("{}", share::encode(&record)?);
        }
        ShareCommand::Decode { blob, output } => {
            let record = share::decode(&blob)?;
            let json = record.to_json()?;
            match output {
                Some(path) => {
                    fs::write(&path, json + "\n")
                        .with_context(|| format!("write {}", path.display()))?;
                    info!("wrote {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}

/// Read and validate the configuration, applying CLI overrides.
fn load_session(input: &InputArgs) -> Result<Session> {
    let text = read_input(&input.config)?;
    let today = chrono::Utc::now().date_naive();

    let mut session = if input.strict {
        ConfigRecord::from_json(&text)
            .with_context(|| format!("parse {}", input.config.display()))?
            .into_session(today)
            .context("validate configuration")?
    } else {
        let imported = ConfigRecord::import_or_default(&text, input.date.unwrap_or(today));
        if let Some(issue) = &imported.issue {
            warn!("{issue}; using the default configuration");
        }
        imported.session
    };

    if let Some(date) = input.date {
        let mut baseline = session.baseline().clone();
        baseline.date = date;
        session.apply(Command::SetBaseline(baseline))?;
    }
    if let Some(granularity) = input.granularity {
        let options = EngineOptions {
            granularity,
            ..session.options().clone()
        };
        session.apply(Command::SetOptions(options))?;
    }
    Ok(session)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("read configuration from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
    }
}
