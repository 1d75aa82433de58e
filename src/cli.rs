use clap::{Parser, Subcommand};
use nu_plugin_case_archive::algo::export::ExportOptions;
use nu_plugin_case_archive::algo::filter::FilterState;
use nu_plugin_case_archive::config::ArchiveConfig;
use nu_plugin_case_archive::fetch::{load_catalog, TableFetcher};
use nu_plugin_case_archive::{ops, ArchiveError, Result};
use serde_json::{json, Value};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "archive",
    version,
    about = "Criminal case archive: ingest, filter, bookmark and export case records"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Published case table URL (overrides the config file)
    #[arg(long, global = true, env = "CASE_ARCHIVE_URL")]
    url: Option<String>,

    /// SQLite store for bookmarks and the visitor counter
    #[arg(long, global = true, env = "CASE_ARCHIVE_STORE")]
    store: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse case-table text (file or stdin) into JSON records
    Ingest {
        /// Read from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Emit {records, report} instead of the bare record array
        #[arg(short, long)]
        report: bool,
    },
    /// Fetch the published table, falling back to the sample cases
    Fetch,
    /// Filter JSON records from stdin
    Filter {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long)]
        crime_type: Option<String>,
        #[arg(short, long)]
        district: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
        /// Four-digit year
        #[arg(short, long)]
        year: Option<String>,
        /// Two-digit month, e.g. 03
        #[arg(short, long)]
        month: Option<String>,
        /// Earliest incident date (inclusive)
        #[arg(long)]
        from: Option<String>,
        /// Latest incident date (inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Only bookmarked cases (reads the store)
        #[arg(long)]
        saved_only: bool,
    },
    /// Facet lists for JSON records from stdin
    Facets,
    /// Append `_id` to each JSON record from stdin
    Ids,
    /// Render one JSON record from stdin as a paginated case file
    Export {
        #[arg(short, long, default_value_t = 80)]
        width: usize,
        #[arg(short, long, default_value_t = 54)]
        page_lines: usize,
        /// Write `<case id>.txt` into this directory instead of stdout
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Manage bookmarked cases
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Show (or bump) the visitor counter
    Visits {
        #[arg(long)]
        increment: bool,
    },
    /// Accept the content warning; the first acceptance counts a visit
    AcceptWarning,
}

#[derive(Subcommand)]
enum SavedAction {
    List,
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "nu_plugin_case_archive=debug,archive=debug"
    } else {
        "nu_plugin_case_archive=info,archive=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ArchiveConfig::resolve(cli.config.as_deref())?.with_overrides(cli.url, cli.store);
    let store_path = config.store_path.to_string_lossy().into_owned();

    let output = match cli.command {
        Commands::Ingest { file, report } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => read_stdin()?,
            };
            let result = ops::op_ingest(&text)?;
            if report {
                result
            } else {
                result["records"].clone()
            }
        }
        Commands::Fetch => cmd_fetch(&config)?,
        Commands::Filter {
            query,
            crime_type,
            district,
            status,
            year,
            month,
            from,
            to,
            saved_only,
        } => {
            let rows = read_stdin_json()?;
            let state = FilterState {
                query,
                crime_type,
                district,
                status,
                year,
                month,
                date_from: from,
                date_to: to,
                saved_only,
            };
            let saved = if saved_only {
                ops::load_saved(Some(&store_path))?
            } else {
                Default::default()
            };
            ops::op_filter(&rows, &state, &saved)?
        }
        Commands::Facets => ops::op_facets(&read_stdin_json()?)?,
        Commands::Ids => ops::op_case_ids(&read_stdin_json()?)?,
        Commands::Export {
            width,
            page_lines,
            out_dir,
        } => {
            let rows = read_stdin_json()?;
            let row = match rows.as_slice() {
                [row] => row,
                _ => {
                    return Err(ArchiveError::InvalidInput(format!(
                        "export expects exactly one record, got {}",
                        rows.len()
                    )))
                }
            };
            let options = ExportOptions {
                line_width: width,
                lines_per_page: page_lines,
            };
            let doc = ops::op_export(row, &options)?;
            let text = doc["text"].as_str().unwrap_or_default();
            match out_dir {
                Some(dir) => {
                    let file_name = doc["file_name"].as_str().unwrap_or("case.txt");
                    let path = dir.join(file_name);
                    std::fs::write(&path, text)?;
                    tracing::info!(path = %path.display(), "wrote case file");
                    json!({ "path": path.display().to_string(), "page_count": doc["page_count"] })
                }
                None => {
                    print!("{text}");
                    return Ok(());
                }
            }
        }
        Commands::Saved { action } => match action {
            SavedAction::List => ops::op_saved_list(&store_path)?,
            SavedAction::Add { id } => ops::op_saved_set(&store_path, &id, true)?,
            SavedAction::Remove { id } => ops::op_saved_set(&store_path, &id, false)?,
            SavedAction::Toggle { id } => ops::op_saved_toggle(&store_path, &id)?,
        },
        Commands::Visits { increment } => ops::op_visits(&store_path, increment)?,
        Commands::AcceptWarning => ops::op_accept_warning(&store_path)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_fetch(config: &ArchiveConfig) -> Result<Value> {
    let fetcher = TableFetcher::new(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(load_catalog(&fetcher));
    Ok(json!({
        "origin": outcome.origin,
        "total": outcome.catalog.len(),
        "records": outcome.catalog,
    }))
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn read_stdin_json() -> Result<Vec<Value>> {
    let parsed: Value = serde_json::from_str(&read_stdin()?)?;
    Ok(match parsed {
        Value::Array(arr) => arr,
        single => vec![single],
    })
}
