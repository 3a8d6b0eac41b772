use comfy_table::{ContentArrangement, Table};
use sr_engine::{ActionSpec, RankUse};

use super::Options;

fn ranks_label(spec: &ActionSpec) -> &'static str {
    match spec.ranks {
        RankUse::None => "-",
        RankUse::Mastery => "MR",
        RankUse::MasteryAndWeapon => "MR WR",
    }
}

fn minimum_label(spec: &ActionSpec) -> String {
    spec.gates
        .iter()
        .find(|g| g.when.is_none())
        .map_or_else(|| "-".to_string(), |g| g.minimum.to_string())
}

pub fn run(opts: &Options) -> Result<(), String> {
    let engine = super::build_engine(opts)?;
    let catalog = engine.catalog();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Action", "Aliases", "Kind", "Ranks", "Min", "Summary"]);

    for spec in catalog.specs() {
        let aliases = if spec.aliases.is_empty() {
            "-".to_string()
        } else {
            spec.aliases.join(", ")
        };
        table.add_row(vec![
            spec.key.to_string(),
            aliases,
            spec.kind.to_string(),
            ranks_label(spec).to_string(),
            minimum_label(spec),
            spec.summary.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} actions", catalog.len());

    Ok(())
}
