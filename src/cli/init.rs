use colored::Colorize;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(path: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(path) = path {
        settings.data_dir = shellexpand_path(&path);
    }
    std::fs::create_dir_all(&settings.data_dir)?;
    save_settings(&settings)?;

    println!("{}", "shoptally is set up.".green().bold());
    println!("Data dir: {}", settings.data_dir);
    println!();
    println!("Drop the sheet exports there (csv, json or xlsx):");
    for name in [
        &settings.sources.deposits,
        &settings.sources.withdrawals,
        &settings.sources.settlements,
        &settings.sources.commissions,
        &settings.sources.shop_balance,
    ] {
        println!("  {name}");
    }
    println!();
    println!("Then run `shoptally overview` or `shoptally ledger <shop>`.");
    Ok(())
}
