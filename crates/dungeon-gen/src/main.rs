//! Grid dungeon generator
//!
//! Main entry point: builds a layout and prints or saves it.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::{debug, warn};

use dg_core::{DungeonRng, GenerationConfig, try_generate};
use dg_save::{default_output_dir, save_dungeon, save_json};

/// Grid dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(author, version, about = "Generate a connected grid of dungeon rooms", long_about = None)]
struct Args {
    /// Number of rows (10-100)
    #[arg(short = 'H', long = "height")]
    height: Option<usize>,

    /// Number of columns (10-100)
    #[arg(short = 'W', long = "width")]
    width: Option<usize>,

    /// Largest share of clear rooms, in percent (25-75)
    #[arg(short = 'e', long = "empty-percent")]
    empty_percent: Option<u8>,

    /// Seed for a reproducible layout
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Give up after this many rejected layouts
    #[arg(long = "max-attempts")]
    max_attempts: Option<u32>,

    /// JSON file with generation settings; flags override it
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Save the layout as the next numbered CSV file
    #[arg(long = "save")]
    save: bool,

    /// Output directory for saved layouts
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Write a JSON snapshot of the layout to this path
    #[arg(long = "snapshot")]
    snapshot: Option<PathBuf>,

    /// Print the layout as JSON instead of a table
    #[arg(long = "json")]
    json: bool,

    /// Do not print the layout
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Verbose output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Settings from the config file (if any) with command-line overrides
    fn generation_config(&self) -> Result<GenerationConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str(&text)?
            }
            None => GenerationConfig::default(),
        };

        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(percent) = self.empty_percent {
            config.empty_percent = percent;
        }
        if let Some(attempts) = self.max_attempts {
            config.max_attempts = Some(attempts);
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.generation_config()?;
    debug!("generation config: {config:?}");

    let mut rng = match args.seed {
        Some(seed) => DungeonRng::new(seed),
        None => DungeonRng::from_entropy(),
    };
    let seed = rng.seed();

    let result = try_generate(&config, &mut rng)?;
    if result.attempts > 100 {
        warn!("layout needed {} attempts; consider a higher --empty-percent", result.attempts);
    }

    if !args.quiet {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", result.grid);
            println!("{}", result.start_location_text());
            println!("Seed {seed}, {} attempt(s)", result.attempts);
        }
    }

    if args.save {
        let dir = args.out.clone().unwrap_or_else(default_output_dir);
        let path = save_dungeon(&result, &dir)?;
        println!("Saved to {}", path.display());
    }

    if let Some(path) = &args.snapshot {
        save_json(&result, Some(seed), path)?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}
