use anyhow::{Context, Result, bail};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use script_review::ReviewStatus;
use script_review::api::{HttpStore, ScriptFilters, ScriptStore};
use script_review::cli::{self, Commands, ConnectionArgs, FilterArgs};
use script_review::queue::ReviewQueueController;
use script_review::store::ScriptLibrary;
use script_review::tui::{App, run_tui};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    match args.command {
        None | Some(Commands::Review) => {
            let filters = parse_filters(&args.filters)?;
            let store = build_store(&args.connection)?;
            handle_review(store, filters, args.filters.page_size).await
        }
        Some(Commands::Stats) => {
            let store = build_store(&args.connection)?;
            handle_stats(store.as_ref()).await
        }
        Some(Commands::Reasons) => {
            let store = build_store(&args.connection)?;
            handle_reasons(store.as_ref()).await
        }
        Some(Commands::Import(import)) => handle_import(&args.connection, &import.dir),
    }
}

/// Build the store: HTTP client when a server is given, local library
/// otherwise.
fn build_store(connection: &ConnectionArgs) -> Result<Arc<dyn ScriptStore>> {
    if let Some(server) = &connection.server {
        let token = connection
            .token
            .clone()
            .or_else(|| std::env::var("SCRIPT_REVIEW_TOKEN").ok());
        Ok(Arc::new(HttpStore::new(server.clone(), token)))
    } else {
        let library = ScriptLibrary::open(&connection.db)
            .with_context(|| format!("Failed to open library at {}", connection.db.display()))?;
        Ok(Arc::new(library))
    }
}

/// Translate CLI filter flags into the store's filter set.
fn parse_filters(args: &FilterArgs) -> Result<ScriptFilters> {
    let status = match args.status.as_str() {
        "all" => None,
        other => Some(
            ReviewStatus::from_str(other)
                .map_err(|e| anyhow::anyhow!("{e} (expected pending, approved, rejected, or all)"))?,
        ),
    };

    let parse_date = |label: &str, value: &Option<String>| -> Result<Option<chrono::NaiveDate>> {
        match value {
            None => Ok(None),
            Some(raw) => chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .with_context(|| format!("Invalid --{label} date: {raw} (expected YYYY-MM-DD)")),
        }
    };

    Ok(ScriptFilters {
        dj: args.dj.clone(),
        category: args.category.clone(),
        status,
        date_from: parse_date("from", &args.from)?,
        date_to: parse_date("to", &args.to)?,
    })
}

/// Handle the review command - load the queue and launch the TUI.
async fn handle_review(
    store: Arc<dyn ScriptStore>,
    filters: ScriptFilters,
    page_size: u32,
) -> Result<()> {
    let mut queue = ReviewQueueController::new(Arc::clone(&store), filters, page_size);
    queue
        .load_page()
        .await
        .context("Failed to load the first page of scripts")?;

    let reasons = match store.rejection_reasons().await {
        Ok(reasons) if !reasons.is_empty() => reasons,
        _ => script_review::default_reasons(),
    };
    let stats = store.stats().await.ok();

    let app = App::new(store, queue, reasons, stats);
    run_tui(app).await
}

/// Handle the stats command - print the tally.
async fn handle_stats(store: &dyn ScriptStore) -> Result<()> {
    let stats = store.stats().await.context("Failed to fetch statistics")?;

    let total = stats.total_pending + stats.total_approved + stats.total_rejected;
    println!("Review Progress");
    println!("─────────────────────────────────────");
    println!("  Pending:    {}", stats.total_pending);
    println!("  Approved:   {}", stats.total_approved);
    println!("  Rejected:   {}", stats.total_rejected);
    println!("  Total:      {total}");

    if !stats.by_dj.is_empty() {
        println!();
        for (dj, tally) in &stats.by_dj {
            println!(
                "  {:24} {} pending, {} approved, {} rejected",
                dj, tally.pending, tally.approved, tally.rejected
            );
        }
    }

    if total > 0 && stats.total_pending == 0 {
        println!("\n✓ All scripts reviewed!");
    }

    Ok(())
}

/// Handle the reasons command - print the catalogue.
async fn handle_reasons(store: &dyn ScriptStore) -> Result<()> {
    let reasons = store
        .rejection_reasons()
        .await
        .context("Failed to fetch rejection reasons")?;

    for reason in reasons {
        println!("{:20} {} ({})", reason.id, reason.label, reason.category);
    }
    Ok(())
}

/// Handle the import command - ingest scripts into the local library.
fn handle_import(connection: &ConnectionArgs, dir: &std::path::Path) -> Result<()> {
    if connection.server.is_some() {
        bail!("import works on the local library; drop --server");
    }
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let library = ScriptLibrary::open(&connection.db)
        .with_context(|| format!("Failed to open library at {}", connection.db.display()))?;
    let imported = library.import_dir(dir).context("Import failed")?;

    println!("✓ Imported {} scripts into {}", imported, connection.db.display());
    Ok(())
}
