//! CLI frontend for the Sphera action roller.

mod commands;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sr",
    about = "Sphera RPG action roller",
    version,
    propagate_version = true
)]
struct Cli {
    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Prefix a chat line must start with
    #[arg(long, global = true, env = "SR_PREFIX", default_value = "?")]
    prefix: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one chat line, e.g. "?r heal b b 5 # aoe"
    Exec {
        /// The chat line
        line: String,
    },

    /// Resolve an action from separate arguments
    #[command(allow_negative_numbers = true)]
    Roll {
        /// Action word or XdY dice notation
        action: String,

        /// Mastery rank, weapon rank and numeric modifiers
        args: Vec<String>,

        /// Comment holding the triggers
        #[arg(short, long)]
        comment: Option<String>,

        /// Values to use for the first dice, comma separated
        #[arg(long, value_delimiter = ',')]
        force: Vec<u32>,
    },

    /// Read chat lines from stdin and reply to each command
    Listen,

    /// List every action in the catalog
    Actions,

    /// Show the mastery and weapon rank tables
    Ranks,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let opts = commands::Options {
        seed: cli.seed,
        prefix: cli.prefix,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Exec { line } => commands::exec::run(&opts, &line),
        Commands::Roll {
            action,
            args,
            comment,
            force,
        } => commands::roll::run(&opts, &action, &args, comment, force),
        Commands::Listen => commands::listen::run(&opts),
        Commands::Actions => commands::actions::run(&opts),
        Commands::Ranks => commands::ranks::run(&opts),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
