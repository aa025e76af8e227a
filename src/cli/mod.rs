pub mod init;
pub mod leaders;
pub mod ledger;
pub mod overview;
#[cfg(feature = "gate")]
pub mod pins;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shoptally",
    about = "Shop settlement ledger CLI for agent payout networks."
)]
pub struct Cli {
    /// Data directory holding the sheet exports (overrides settings)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up shoptally: choose the directory holding the sheet exports.
    Init {
        /// Path for the data directory (default: ~/Documents/shoptally)
        path: Option<String>,
    },
    /// Per-shop ledger: daily activity with a running balance.
    Ledger {
        /// Shop name (matched case-insensitively)
        shop: String,
    },
    /// Network overview: one aggregated balance row per shop.
    Overview {
        /// Only shops under this team leader
        #[arg(long)]
        leader: Option<String>,
        /// Shop-name substring filter
        #[arg(long)]
        search: Option<String>,
    },
    /// Team-leader roll-up across the balance sheet.
    Leaders,
    /// Manage access PINs for the admin and team-leader views.
    #[cfg(feature = "gate")]
    Pins {
        #[command(subcommand)]
        command: PinsCommands,
    },
    /// Show configuration and source table status.
    Status,
}

#[cfg(feature = "gate")]
#[derive(Subcommand)]
pub enum PinsCommands {
    /// Set a team leader's PIN, or the admin PIN when --leader is omitted.
    Set {
        /// Team leader name
        #[arg(long)]
        leader: Option<String>,
    },
    /// Remove a PIN.
    Remove {
        /// Team leader name (removes the admin PIN when omitted)
        #[arg(long)]
        leader: Option<String>,
    },
    /// List roles with a PIN configured.
    List,
}
