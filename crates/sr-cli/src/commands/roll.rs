use sr_engine::{ActionRequest, ParsedArgs};

use super::Options;

pub fn run(
    opts: &Options,
    action: &str,
    args: &[String],
    comment: Option<String>,
    force: Vec<u32>,
) -> Result<(), String> {
    let engine = super::build_engine(opts)?;
    let mut source = engine.config().source();

    let parsed = ParsedArgs::from_words(action, args.iter().map(String::as_str));
    let mut request = ActionRequest::from(parsed).with_forced_rolls(force);
    request.comment = comment.filter(|c| !c.trim().is_empty());

    let result = engine
        .resolve(&request, &mut source)
        .map_err(|e| e.to_string())?;
    super::print_result(&result, opts.json)
}
