//! karmactl - inspect Karma Aligns compute payloads from the terminal.
//!
//! Reads a compute response from a file or stdin and prints the normalized
//! form, strength buckets, achievements and ACG city matches.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use karma_core::acg::{Angle, CityFilter};
use karma_core::config::{config_path, KarmaConfig};
use karma_core::norm::SECTION_NAMES;
use karma_core::{FileStore, UserPreferences};
use karmactl::{commands, errors, input, logging, output};
use std::path::PathBuf;
use tracing::debug;

// Version is embedded at build time
const VERSION: &str = env!("KARMA_VERSION");

#[derive(Parser)]
#[command(name = "karmactl")]
#[command(about = "Karma Aligns - inspect compute payloads", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Config file (default: ~/.config/karma/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized payload as JSON
    Normalize {
        /// Payload file ("-" or omitted reads stdin)
        file: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,

        /// Leave out the raw payload
        #[arg(long)]
        no_raw: bool,
    },

    /// Bucket and label for each score
    Classify {
        /// Scores in 0..1
        #[arg(allow_negative_numbers = true)]
        scores: Vec<f64>,

        /// Print the bucket thresholds
        #[arg(long)]
        legend: bool,
    },

    /// Shadbala, Bhava Bala and strengths with buckets and achievements
    Strengths {
        /// Payload file ("-" or omitted reads stdin)
        file: Option<PathBuf>,
    },

    /// Filter astrocartography city rows
    Acg {
        /// City rows file ("-" or omitted reads stdin)
        file: Option<PathBuf>,

        /// Country contains
        #[arg(long)]
        country: Option<String>,

        /// City name contains
        #[arg(long)]
        city: Option<String>,

        /// Planet name
        #[arg(long)]
        planet: Option<String>,

        /// Line angle: ASC, MC, DSC or IC
        #[arg(long)]
        angle: Option<Angle>,

        /// Only rows on a line
        #[arg(long)]
        hit_only: bool,

        /// Maximum distance to the line
        #[arg(long)]
        max_km: Option<f64>,
    },

    /// Show or edit view preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print label style and section states
    Show,

    /// Use classical (Sanskrit) pillar labels
    SetClassical {
        #[arg(value_enum)]
        state: Switch,
    },

    /// Collapse or expand a result section
    Toggle {
        /// Section name, e.g. shadbala or bhavaBala
        section: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        output::display_error(&format!("{:#}", e));
        std::process::exit(errors::exit_code_for(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => KarmaConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => KarmaConfig::load_default()
            .with_context(|| format!("loading config {}", config_path().display()))?,
    };

    logging::init(&config.log.level);

    let color = !cli.no_color && output::color_enabled();
    let prefs_path = config.preferences.effective_path();
    debug!(prefs = %prefs_path.display(), "preferences file");

    match cli.command {
        Commands::Normalize { file, compact, no_raw } => {
            let payload = input::read_payload(file.as_deref())?;
            println!("{}", commands::normalize(&payload, compact, no_raw)?);
        }
        Commands::Classify { scores, legend } => {
            if legend {
                println!("{}", commands::legend(color));
            }
            if !scores.is_empty() {
                println!("{}", commands::classify(&scores, color));
            }
        }
        Commands::Strengths { file } => {
            let payload = input::read_payload(file.as_deref())?;
            let store = FileStore::open(&prefs_path)?;
            let prefs = UserPreferences::load(&store, &SECTION_NAMES);
            println!("{}", commands::strengths(&payload, &prefs, color));
        }
        Commands::Acg {
            file,
            country,
            city,
            planet,
            angle,
            hit_only,
            max_km,
        } => {
            let payload = input::read_payload(file.as_deref())?;
            let filter = CityFilter {
                country,
                city,
                planet,
                angle,
                hit_only,
                max_distance_km: max_km,
            };
            println!("{}", commands::acg(&payload, &filter, color));
        }
        Commands::Prefs { action } => {
            let mut store = FileStore::open(&prefs_path)?;
            let out = match action {
                PrefsAction::Show => {
                    let prefs = UserPreferences::load(&store, &SECTION_NAMES);
                    commands::prefs_show(&prefs, color)
                }
                PrefsAction::SetClassical { state } => {
                    commands::prefs_set_classical(&mut store, matches!(state, Switch::On))?
                }
                PrefsAction::Toggle { section } => commands::prefs_toggle(&mut store, &section)?,
            };
            println!("{}", out);
        }
    }

    Ok(())
}
