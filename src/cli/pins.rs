use zeroize::Zeroizing;

use crate::credentials::{CredentialStore, Role};
use crate::error::{Result, TallyError};
use crate::normalize::normalize_key;
use crate::settings::credentials_path;

fn prompt_new_pin(label: &str) -> Result<Zeroizing<String>> {
    let first = Zeroizing::new(rpassword::prompt_password(format!("New PIN for {label}: "))?);
    let second = Zeroizing::new(rpassword::prompt_password("Repeat PIN: ")?);
    if first.trim().is_empty() {
        return Err(TallyError::Other("PIN cannot be empty".to_string()));
    }
    if *first != *second {
        return Err(TallyError::Other("PINs do not match".to_string()));
    }
    Ok(first)
}

pub fn set(leader: Option<&str>) -> Result<()> {
    let path = credentials_path();
    let mut store = CredentialStore::load(&path)?;
    match leader {
        Some(name) => {
            let name = normalize_key(name);
            let pin = prompt_new_pin(&name)?;
            store.set(Role::TeamLeader, &name, &pin);
            store.save(&path)?;
            println!("PIN set for {name}.");
        }
        None => {
            let pin = prompt_new_pin("admin")?;
            store.set(Role::Admin, "", &pin);
            store.save(&path)?;
            println!("Admin PIN set.");
        }
    }
    Ok(())
}

pub fn remove(leader: Option<&str>) -> Result<()> {
    let path = credentials_path();
    let mut store = CredentialStore::load(&path)?;
    let (removed, label) = match leader {
        Some(name) => {
            let name = normalize_key(name);
            (store.remove(Role::TeamLeader, &name), name)
        }
        None => (store.remove(Role::Admin, ""), "admin".to_string()),
    };
    if removed {
        store.save(&path)?;
        println!("Removed PIN for {label}.");
    } else {
        println!("No PIN configured for {label}.");
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let store = CredentialStore::load(&credentials_path())?;
    if store.is_empty() {
        println!("No PINs configured; all views are open.");
        return Ok(());
    }
    println!(
        "Admin PIN:    {}",
        if store.has_admin() { "set" } else { "(not set)" }
    );
    let leaders = store.leaders();
    println!("Team leaders: {}", leaders.len());
    for name in leaders {
        println!("  {name}");
    }
    Ok(())
}
