use super::Options;

pub fn run(opts: &Options, line: &str) -> Result<(), String> {
    let engine = super::build_engine(opts)?;
    let mut source = engine.config().source();

    match engine
        .resolve_line(line, &mut source)
        .map_err(|e| e.to_string())?
    {
        Some(result) => super::print_result(&result, opts.json),
        None => Err(format!(
            "not a command (lines start with '{}')",
            engine.config().prefix
        )),
    }
}
