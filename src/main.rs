use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use libris::cli::{Console, StdinPrompter};
use libris::config::{LibrisPaths, Settings};
use libris::crypto::{CaesarCodec, CredentialCodec};
use libris::models::ADMIN_USERNAME;
use libris::services::SystemClock;
use libris::storage::{ensure_default_admin, Storage, DEFAULT_ADMIN_PASSWORD};

#[derive(Parser)]
#[command(
    name = "libris",
    version,
    about = "Terminal-based library lending tracker",
    long_about = "Libris keeps a small library's catalog, members and loans in plain \
                  text files and runs an interactive menu for librarians and members."
)]
struct Cli {
    /// Directory holding settings, the audit log and the record files
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive console (the default)
    Run,

    /// Create the data directory, settings file and default librarian
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => LibrisPaths::with_base_dir(dir),
        None => LibrisPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    let codec = CaesarCodec::default();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            bootstrap_admin(&storage, &codec)?;
            let clock = SystemClock;
            let mut console =
                Console::new(&storage, &settings, &codec, &clock, StdinPrompter::new());
            console.run()?;
        }
        Commands::Init => {
            println!("Initializing Libris at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            bootstrap_admin(&storage, &codec)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'libris' to open the console.");
        }
        Commands::Config => {
            println!("Libris Configuration");
            println!("====================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Audit log:         {}", paths.audit_log().display());
            println!("Books file:        {}", paths.books_file().display());
            println!("Members file:      {}", paths.members_file().display());
            println!("Transactions file: {}", paths.transactions_file().display());
            println!();
            println!("Settings:");
            println!("  Loan period:          {} days", settings.loan_days);
            println!(
                "  Fine per day:         {}",
                settings
                    .fine_per_day
                    .format_with_symbol(&settings.currency_symbol)
            );
            println!("  Session timeout:      {} seconds", settings.session_timeout_secs);
            println!("  Max login attempts:   {}", settings.max_login_attempts);
            println!("  Date format:          {}", settings.date_format);
            println!("  Log level:            {}", settings.log_level);
            println!("  Credential codec:     {}", codec.name());
        }
        Commands::Audit { limit } => {
            let entries = storage.audit_log().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the configured level
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Create the librarian on an empty member store and announce its password
fn bootstrap_admin(storage: &Storage, codec: &dyn CredentialCodec) -> Result<()> {
    if ensure_default_admin(&storage.members, codec)?.is_some() {
        println!("No users found. Creating a default admin account.");
        println!("Username: {}", ADMIN_USERNAME);
        println!("Password: {}", DEFAULT_ADMIN_PASSWORD);
        println!(
            "WARNING: this password is publicly known. Log in now; you will be \
             required to change it."
        );
    }
    Ok(())
}
