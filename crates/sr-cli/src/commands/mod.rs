pub mod actions;
pub mod exec;
pub mod listen;
pub mod ranks;
pub mod roll;

use colored::Colorize;
use sr_engine::{ActionResult, Engine, EngineConfig};

/// Settings shared by every subcommand.
pub struct Options {
    pub seed: Option<u64>,
    pub prefix: String,
    pub json: bool,
}

/// Build an engine from the command-line settings.
fn build_engine(opts: &Options) -> Result<Engine, String> {
    let mut config = EngineConfig::default().with_prefix(opts.prefix.clone());
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }
    Engine::new(config).map_err(|e| e.to_string())
}

/// Print one reply, as text or as a JSON object.
fn print_result(result: &ActionResult, json: bool) -> Result<(), String> {
    if json {
        let out = serde_json::to_string(result).map_err(|e| format!("json: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    let rendered = result.to_string();
    let mut lines = rendered.lines();
    if let Some(header) = lines.next() {
        println!("{}", header.bold());
    }
    for line in lines {
        println!("{line}");
    }
    if result.capped() {
        println!("{}", "(dice pool stopped at the safety cap)".dimmed());
    }
    Ok(())
}
