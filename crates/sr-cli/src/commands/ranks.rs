use comfy_table::{ContentArrangement, Table};
use sr_engine::RankCategory;

use super::Options;

pub fn run(opts: &Options) -> Result<(), String> {
    let engine = super::build_engine(opts)?;
    let ranks = engine.ranks();

    if opts.json {
        let out = serde_json::json!({
            "mastery": ranks.entries(RankCategory::Mastery),
            "weapon": ranks.entries(RankCategory::Weapon),
        });
        println!("{out}");
        return Ok(());
    }

    let mut mastery = Table::new();
    mastery.set_content_arrangement(ContentArrangement::Dynamic);
    mastery.set_header(vec![
        "MR",
        "Value",
        "Counter check",
        "Counter dmg",
        "Burst",
        "Haste",
        "Inspire",
        "Shield wall HP",
    ]);
    for e in ranks.entries(RankCategory::Mastery) {
        mastery.add_row(vec![
            e.rank.to_string(),
            e.value.to_string(),
            e.counter_check.to_string(),
            e.counter_dmg.to_string(),
            e.burst_mod.to_string(),
            e.surge_haste.to_string(),
            e.surge_inspire.to_string(),
            e.sw_hp.to_string(),
        ]);
    }

    let mut weapon = Table::new();
    weapon.set_content_arrangement(ContentArrangement::Dynamic);
    weapon.set_header(vec!["WR", "Value", "Burst"]);
    for e in ranks.entries(RankCategory::Weapon) {
        weapon.add_row(vec![
            e.rank.to_string(),
            e.value.to_string(),
            e.burst_mod.to_string(),
        ]);
    }

    println!("{mastery}");
    println!();
    println!("{weapon}");

    Ok(())
}
