mod catalog;
mod db;
mod parser;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "fmhy_parser", about = "Parse FMHY-style markdown wiki pages into structured catalogs")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, default_value = db::DEFAULT_DB_PATH)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one markdown file and print it as JSON
    Parse {
        file: PathBuf,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Parse every markdown file under a directory and store the results
    Process {
        dir: PathBuf,
        /// Max documents to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Also write the combined catalog as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Show catalog statistics
    Stats,
    /// Documents overview table
    Overview {
        /// Filter by filename or title substring
        #[arg(short, long)]
        filter: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { file, pretty } => {
            let source = catalog::load_file(&file)?;
            let doc = parser::parse_markdown_document(&source.content, &source.filename);
            let json = if pretty {
                serde_json::to_string_pretty(&doc)?
            } else {
                serde_json::to_string(&doc)?
            };
            println!("{}", json);
            Ok(())
        }
        Commands::Process { dir, limit, json } => {
            let mut loaded = catalog::load_sources(&dir)?;
            if let Some(n) = limit {
                loaded.sources.truncate(n);
            }
            if loaded.sources.is_empty() {
                println!("No markdown files found under {}.", dir.display());
                return Ok(());
            }

            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            println!("Processing {} documents...", loaded.sources.len());
            let documents = process_documents(&conn, &loaded.sources)?;

            let catalog = catalog::Catalog::build(documents, loaded.skipped);
            if let Some(path) = json {
                catalog.write_json(&path)?;
            }
            let t = &catalog.totals;
            println!(
                "Saved {} documents, {} items ({} starred, {} index, {} cross-references), {} skipped.",
                catalog.document_count,
                t.total_items,
                t.starred_items,
                t.index_items,
                t.cross_references,
                catalog.skipped.len(),
            );
            Ok(())
        }
        Commands::Stats => {
            let conn = open_db(&cli.db)?;
            let s = db::get_stats(&conn)?;
            println!("Documents:        {}", s.documents);
            println!("Sections:         {}", s.sections);
            println!("Subsections:      {}", s.subsections);
            println!("Items:            {}", s.items);
            println!("Starred:          {}", s.starred);
            println!("Index:            {}", s.index);
            println!("Cross-references: {}", s.cross_references);
            if !s.links_by_type.is_empty() {
                println!("\n--- Links ---");
                for (link_type, n) in &s.links_by_type {
                    println!("  {:<10} {}", link_type, n);
                }
            }
            Ok(())
        }
        Commands::Overview { filter, limit } => {
            let conn = open_db(&cli.db)?;
            let rows = db::fetch_overview(&conn, filter.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No documents found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<28} | {:<28} | {:>4} | {:>4} | {:>5} | {:>4} | {:>5} | {:>4}",
                "#", "File", "Title", "Sect", "Sub", "Items", "Star", "Index", "XRef"
            );
            println!("{}", "-".repeat(108));

            for (i, r) in rows.iter().enumerate() {
                println!(
                    "{:>3} | {:<28} | {:<28} | {:>4} | {:>4} | {:>5} | {:>4} | {:>5} | {:>4}",
                    i + 1,
                    truncate(&r.filename, 28),
                    truncate(&r.title, 28),
                    r.sections,
                    r.subsections,
                    r.total_items,
                    r.starred_items,
                    r.index_items,
                    r.cross_references,
                );
            }

            println!("\n{} documents", rows.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn open_db(path: &Path) -> anyhow::Result<rusqlite::Connection> {
    if !path.exists() {
        anyhow::bail!("No database at {}. Run 'process' first.", path.display());
    }
    let conn = db::connect(path)?;
    db::init_schema(&conn)?;
    Ok(conn)
}

fn process_documents(
    conn: &rusqlite::Connection,
    sources: &[catalog::SourceFile],
) -> anyhow::Result<Vec<parser::ParsedDocument>> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut documents = Vec::with_capacity(sources.len());
    for chunk in sources.chunks(500) {
        let parsed = catalog::parse_sources(chunk);
        db::save_documents(conn, &parsed).context("Failed to save parsed documents")?;
        pb.inc(chunk.len() as u64);
        documents.extend(parsed);
    }

    pb.finish_and_clear();
    info!("Processed {} documents", documents.len());
    Ok(documents)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
