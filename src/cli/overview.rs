use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::amount;
use crate::loader::load_table;
use crate::settings::load_settings;
use crate::summary::{build_summaries, filter_summaries, summary_totals, ShopSummary};

pub fn run(leader: Option<&str>, search: Option<&str>, data_dir: Option<&str>) -> Result<()> {
    #[cfg(feature = "gate")]
    gate(leader)?;

    let settings = load_settings();
    let rows = load_table(&settings.source_paths(data_dir).shop_balance)?;
    let summaries = build_summaries(&rows);
    let visible = filter_summaries(&summaries, leader, search);

    if visible.is_empty() {
        println!("No shops match.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Shop",
        "Team Leader",
        "Sec. Dep",
        "B/F",
        "Deposit",
        "Withdrawal",
        "In",
        "Out",
        "Settlement",
        "Special",
        "Adjustment",
        "DP Comm",
        "WD Comm",
        "Add Comm",
        "Running Bal",
    ]);
    for summary in &visible {
        table.add_row(summary_cells(summary, &summary.shop, &summary.team_leader));
    }
    let totals = summary_totals(&visible);
    table.add_row(summary_cells(&totals, &"TOTAL".bold().to_string(), ""));

    println!("{table}");
    println!("{} shops", visible.len());
    Ok(())
}

fn summary_cells(s: &ShopSummary, name: &str, leader: &str) -> Vec<Cell> {
    let mut cells = vec![Cell::new(name), Cell::new(leader)];
    for value in [
        s.security_deposit,
        s.bring_forward,
        s.total_deposit,
        s.total_withdrawal,
        s.transfer_in,
        s.transfer_out,
        s.settlement,
        s.special_payment,
        s.adjustment,
        s.dp_comm,
        s.wd_comm,
        s.add_comm,
        s.running_balance,
    ] {
        cells.push(Cell::new(amount(value)));
    }
    cells
}

/// Admin views require the admin PIN when one is configured; team-leader
/// views require that leader's PIN. An empty store gates nothing.
#[cfg(feature = "gate")]
fn gate(leader: Option<&str>) -> Result<()> {
    use zeroize::Zeroizing;

    use crate::credentials::{CredentialStore, Role};
    use crate::normalize::normalize_key;

    let store = CredentialStore::load(&crate::settings::credentials_path())?;
    if store.is_empty() {
        return Ok(());
    }
    match leader {
        Some(name) => {
            store.lookup(Role::TeamLeader, name)?;
            let pin = Zeroizing::new(rpassword::prompt_password(format!(
                "PIN for {}: ",
                normalize_key(name)
            ))?);
            store.verify(Role::TeamLeader, name, &pin)
        }
        None => {
            if !store.has_admin() {
                return Ok(());
            }
            let pin = Zeroizing::new(rpassword::prompt_password("Admin PIN: ")?);
            store.verify(Role::Admin, "", &pin)
        }
    }
}
