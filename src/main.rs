mod cli;
#[cfg(feature = "gate")]
mod credentials;
mod error;
mod fmt;
mod ledger;
mod loader;
mod normalize;
mod records;
mod settings;
mod summary;

use clap::Parser;

#[cfg(feature = "gate")]
use cli::PinsCommands;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    let result = match cli.command {
        Commands::Init { path } => cli::init::run(path),
        Commands::Ledger { shop } => cli::ledger::run(&shop, data_dir),
        Commands::Overview { leader, search } => {
            cli::overview::run(leader.as_deref(), search.as_deref(), data_dir)
        }
        Commands::Leaders => cli::leaders::run(data_dir),
        #[cfg(feature = "gate")]
        Commands::Pins { command } => match command {
            PinsCommands::Set { leader } => cli::pins::set(leader.as_deref()),
            PinsCommands::Remove { leader } => cli::pins::remove(leader.as_deref()),
            PinsCommands::List => cli::pins::list(),
        },
        Commands::Status => cli::status::run(data_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
