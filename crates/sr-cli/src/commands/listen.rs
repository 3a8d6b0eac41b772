use std::io::{self, BufRead};

use colored::Colorize;

use super::Options;

/// Reply to every command line on stdin until EOF. Errors are reported per
/// line and do not stop the loop.
pub fn run(opts: &Options) -> Result<(), String> {
    let engine = super::build_engine(opts)?;
    let mut source = engine.config().source();
    let stdin = io::stdin();

    let mut replies = 0usize;
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| format!("reading stdin: {e}"))?;
        match engine.resolve_line(&line, &mut source) {
            Ok(Some(result)) => {
                if replies > 0 && !opts.json {
                    println!();
                }
                super::print_result(&result, opts.json)?;
                replies += 1;
            }
            Ok(None) => tracing::debug!(line = %line, "ignored non-command line"),
            Err(e) => eprintln!("{} {e}", "error:".red()),
        }
    }
    Ok(())
}
