use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use concierge_cli::{
    config::{ConfigError, Locale, embedded_catalog, load_catalog, resolve_data_dir},
    session::{Session, run_and_save, unhandled_intents},
    store::DataFiles,
};
use concierge_core::{IntentCatalog, IntentResolver, StdConsole};

#[derive(Debug, Parser)]
#[command(
    name = "concierge",
    about = "Contacts and notes assistant that understands loose phrasing",
    version
)]
struct Cli {
    /// Intent catalog to use instead of the built-in one
    #[arg(short, long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Language of the built-in catalog
    #[arg(short, long, value_enum, default_value_t = Locale::En)]
    locale: Locale,

    /// Directory holding the address book and notebook
    #[arg(long, env = "CONCIERGE_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log resolver decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = match read_catalog(cli.catalog.as_deref(), cli.locale) {
        Ok(catalog) => catalog,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };
    for intent in unhandled_intents(&catalog) {
        warn!(%intent, "catalog intent has no command");
    }

    let data_dir = resolve_data_dir(cli.data_dir);
    let files = DataFiles::in_dir(&data_dir);
    let (book, notes) = files.load()?;
    info!(
        data_dir = %data_dir.display(),
        contacts = book.len(),
        notes = notes.len(),
        "loaded data"
    );

    let resolver = IntentResolver::new(catalog);
    let session = Session::new(&resolver, StdConsole::new(), book, notes);
    run_and_save(session, &files)?;
    println!("Your data is saved. Goodbye!");

    Ok(())
}

fn read_catalog(path: Option<&Path>, locale: Locale) -> Result<IntentCatalog, ConfigError> {
    match path {
        Some(path) => load_catalog(path),
        None => embedded_catalog(locale),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
