use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::amount;
use crate::loader::load_table;
use crate::settings::load_settings;
use crate::summary::{build_summaries, filter_summaries, summary_totals, team_leaders};

pub fn run(data_dir: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let rows = load_table(&settings.source_paths(data_dir).shop_balance)?;
    let summaries = build_summaries(&rows);

    let leaders = team_leaders(&summaries);
    if leaders.is_empty() {
        println!("No team leaders found in the balance sheet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Team Leader", "Shops", "Running Bal"]);
    for leader in &leaders {
        let members = filter_summaries(&summaries, Some(leader.as_str()), None);
        let totals = summary_totals(&members);
        table.add_row(vec![
            Cell::new(leader),
            Cell::new(members.len()),
            Cell::new(amount(totals.running_balance)),
        ]);
    }

    println!("{table}");
    Ok(())
}
