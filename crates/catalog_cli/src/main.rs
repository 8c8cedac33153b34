//! Command-line front end for the catalog store.
//!
//! # Responsibility
//! - Load configuration, start logging and open the catalog database.
//! - Expose bulk import, CSV export and listing as subcommands.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog_core::db::open_db;
use catalog_core::{
    core_version, init_logging, sqlite_catalog, BookCriteria, BookListQuery, CatalogConfig,
    DEFAULT_PAGE,
};
use clap::{Args, Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(name = "catalog", about = "Author and book catalog tools", version)]
struct Cli {
    /// TOML configuration file; built-in defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides `database_path` from the configuration
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import books from a JSON array file
    Import { file: PathBuf },
    /// Write matching books as CSV to a file or stdout
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print one page of matching books as JSON
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    author_id: Option<i64>,
    /// Case-insensitive title substring
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    year: Option<i32>,
}

impl FilterArgs {
    fn criteria(self) -> BookCriteria {
        BookCriteria::new(self.author_id, self.title, self.year)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CatalogConfig::default(),
    };
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if let Some(dir) = &config.logging.dir {
        init_logging(&config.logging.level, dir).context("starting logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok core_version={} database={}",
        core_version(),
        config.database_path.display()
    );

    let conn = open_db(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    let catalog = sqlite_catalog(&conn)?;

    match cli.command {
        Command::Import { file } => {
            let payload =
                fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let result = catalog.import_books_json(&payload)?;
            info!(
                "event=cli_import module=cli status=ok file={} total={}",
                file.display(),
                result.total()
            );
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Export { filters, output } => {
            let bytes = catalog.export_books_csv(&filters.criteria())?;
            match output {
                Some(path) => fs::write(&path, &bytes)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => io::stdout().lock().write_all(&bytes)?,
            }
        }
        Command::List {
            filters,
            page,
            size,
        } => {
            let query = BookListQuery {
                author_id: filters.author_id,
                title: filters.title,
                year: filters.year,
                page,
                size: size.unwrap_or(config.default_page_size),
            };
            let listing = catalog.list_books(&query)?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}
