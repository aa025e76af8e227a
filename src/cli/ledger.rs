use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::amount;
use crate::ledger::{build_ledger, CategoryAmounts};
use crate::loader::load_sources;
use crate::records::{self, CommissionRates, ShopInfo, ShopKey};
use crate::settings::load_settings;

pub fn run(shop_name: &str, data_dir: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let sources = load_sources(&settings.source_paths(data_dir))?;

    let shop = ShopKey::new(shop_name);
    let info = ShopInfo::for_shop(&sources.shop_balance, &shop);
    let rates = CommissionRates::for_shop(&sources.commissions, &shop);

    let deposits = records::txn_rows(&sources.deposits);
    let withdrawals = records::txn_rows(&sources.withdrawals);
    let settlements = records::settlement_rows(&sources.settlements);

    let ledger = build_ledger(
        &shop,
        &deposits,
        &withdrawals,
        &settlements,
        rates,
        info.bring_forward,
        info.security_deposit,
    );

    println!("{}", shop.as_str().bold());
    println!("Team leader:      {}", info.team_leader);
    println!("B/F balance:      {}", amount(info.bring_forward));
    println!("Security deposit: {}", amount(info.security_deposit));
    println!();

    if ledger.entries.is_empty() {
        println!("No activity recorded for {shop}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Date",
        "Deposit",
        "Withdrawal",
        "In",
        "Out",
        "Settlement",
        "Special",
        "Adjustment",
        "Sec. Dep",
        "DP Comm",
        "WD Comm",
        "Add Comm",
        "Balance",
    ]);
    for entry in &ledger.entries {
        let label = entry
            .date
            .clone()
            .unwrap_or_else(|| "B/F Balance".to_string());
        let label = if entry.most_recent {
            label.green().bold().to_string()
        } else {
            label
        };
        let mut cells = vec![Cell::new(label)];
        cells.extend(category_cells(&entry.amounts));
        cells.push(Cell::new(amount(entry.balance)));
        table.add_row(cells);
    }
    let mut cells = vec![Cell::new("TOTAL".bold())];
    cells.extend(category_cells(&ledger.totals));
    cells.push(Cell::new(amount(ledger.final_balance)));
    table.add_row(cells);

    println!("{table}");
    Ok(())
}

fn category_cells(a: &CategoryAmounts) -> Vec<Cell> {
    [
        a.deposits,
        a.withdrawals,
        a.transfer_in,
        a.transfer_out,
        a.settlement,
        a.special_payment,
        a.adjustment,
        a.security_deposit,
        a.dp_comm,
        a.wd_comm,
        a.add_comm,
    ]
    .into_iter()
    .map(|v| Cell::new(amount(v)))
    .collect()
}
