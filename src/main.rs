//! branchbooks CLI
//!
//! Imports chart-of-accounts and journal CSV files into a freshly seeded
//! ledger and prints the resulting collections in the same format.
//!
//! # Usage
//!
//! ```bash
//! branchbooks login FirstDev --password '...'
//! branchbooks import-transactions journal.csv > journal-out.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use branchbooks::config::Config;
use branchbooks::navigation::{menu_for, VisibleItem};
use branchbooks::{ImportReport, Ledger, LedgerError, Result, SessionStore};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "branchbooks", about = "Bookkeeping for multi-branch organizations.")]
struct Cli {
    /// Config file (default: <config dir>/branchbooks/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Session file, overriding the configured one
    #[arg(long = "session-file", global = true)]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a chart-of-accounts CSV and print the resulting accounts.
    ImportAccounts {
        file: PathBuf,
    },
    /// Import a journal CSV and print the resulting transactions.
    ImportTransactions {
        file: PathBuf,
        /// Chart-of-accounts CSV to import first
        #[arg(long)]
        accounts: Option<PathBuf>,
    },
    /// Income and expense totals, by month.
    Summary {
        /// Journal CSV to import before summarizing
        #[arg(long)]
        transactions: Option<PathBuf>,
    },
    /// Log in and remember the session.
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the current session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Show the menu entries available to the logged-in user.
    Menu,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref());
    let sessions = SessionStore::new(
        cli.session_file
            .unwrap_or_else(|| config.session_file.clone()),
    );
    let mut ledger = Ledger::from_config(&config);

    match cli.command {
        Commands::ImportAccounts { file } => {
            let session = sessions.load();
            let actor = &session.authorize("/setup/accounts")?.username;
            let report = ledger.import_accounts(&read(&file)?, actor)?;
            finish_import(&report)?;
            ledger.write_accounts(io::stdout().lock())
        }
        Commands::ImportTransactions { file, accounts } => {
            let session = sessions.load();
            let actor = &session.authorize("/transaction/new")?.username;
            if let Some(path) = accounts {
                session.authorize("/setup/accounts")?;
                let report = ledger.import_accounts(&read(&path)?, actor)?;
                finish_import(&report)?;
            }
            let report = ledger.import_transactions(&read(&file)?, actor)?;
            finish_import(&report)?;
            ledger.write_transactions(io::stdout().lock())
        }
        Commands::Summary { transactions } => {
            let session = sessions.load();
            let actor = &session.authorize("/analysis")?.username;
            if let Some(path) = transactions {
                let report = ledger.import_transactions(&read(&path)?, actor)?;
                finish_import(&report)?;
            }
            let summary = ledger.summary();
            println!("Total income: {}", summary.total_income);
            println!("Total expenses: {}", summary.total_expenses);
            println!("Net: {}", summary.net);
            for month in &summary.months {
                println!(
                    "{}: income {}, expenses {}",
                    month.label, month.income, month.expenses
                );
            }
            Ok(())
        }
        Commands::Login { username, password } => {
            let session = sessions.login(&config, &username, &password)?;
            if let Some(user) = session.current_user() {
                println!("Logged in as {} ({})", user.username, user.display_name());
            }
            Ok(())
        }
        Commands::Logout => {
            sessions.logout()?;
            println!("Logged out");
            Ok(())
        }
        Commands::Whoami => {
            let session = sessions.load();
            let user = session.require_user()?;
            println!(
                "{} ({}, level {})",
                user.username,
                user.user_level,
                user.user_level.rank()
            );
            println!("{}, {}", user.display_name(), user.position);
            Ok(())
        }
        Commands::Menu => {
            print_menu(&menu_for(sessions.load().level()), 0);
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Prints the report summary to stderr and fails on a rejected batch.
fn finish_import(report: &ImportReport) -> Result<()> {
    for error in &report.errors {
        eprintln!("{}", error);
    }
    if report.is_rejected() {
        return Err(LedgerError::ImportRejected {
            errors: report.errors.len(),
        });
    }
    for duplicate in &report.duplicates {
        eprintln!("Skipped duplicate {}", duplicate);
    }
    eprintln!(
        "Imported {} record(s), skipped {} duplicate(s)",
        report.imported.len(),
        report.duplicates.len()
    );
    Ok(())
}

fn print_menu(items: &[VisibleItem], depth: usize) {
    for item in items {
        println!("{}{} ({})", "  ".repeat(depth), item.name, item.path);
        print_menu(&item.items, depth + 1);
    }
}
