use crate::error::Result;
use crate::loader::load_table;
use crate::settings::load_settings;

pub fn run(data_dir: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let dir = data_dir.unwrap_or(&settings.data_dir);
    println!("Data dir:   {dir}");

    let paths = settings.source_paths(data_dir);
    let tables = [
        ("Deposits", &paths.deposits),
        ("Withdrawals", &paths.withdrawals),
        ("Settlements", &paths.settlements),
        ("Commissions", &paths.commissions),
        ("Balances", &paths.shop_balance),
    ];

    println!();
    for (label, path) in tables {
        match load_table(path) {
            Ok(rows) => println!("{label:<13} {:>6} rows   {}", rows.len(), path.display()),
            Err(e) => println!("{label:<13} unavailable ({e})"),
        }
    }

    #[cfg(feature = "gate")]
    {
        let store = crate::credentials::CredentialStore::load(&crate::settings::credentials_path())?;
        println!();
        if store.is_empty() {
            println!("Gate:       off (no PINs configured)");
        } else {
            println!(
                "Gate:       on ({} admin, {} team leaders)",
                if store.has_admin() { "1" } else { "0" },
                store.leaders().len()
            );
        }
    }

    Ok(())
}
