use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use doc_store::infrastructure::preload::{
    default_entries, PreloadEntry, Preloader, DEFAULT_DEST_DIR, DEFAULT_SOURCE_DIR,
};
use doc_store::infrastructure::{init_tracing, LogFormat};

/// Seed the document store with fixed files under fixed identifiers.
#[derive(Debug, Parser)]
#[command(name = "preload", version)]
struct Args {
    /// Directory holding the files to seed.
    #[arg(long, env = "PRELOAD_SOURCE_DIR", default_value = DEFAULT_SOURCE_DIR)]
    source_dir: PathBuf,

    /// Storage root of the document service.
    #[arg(long, env = "STORAGE_PATH", default_value = DEFAULT_DEST_DIR)]
    dest_dir: PathBuf,

    /// `<filename>=<id>` mapping; repeat for several files. Defaults to the demo set.
    #[arg(long = "entry", value_name = "FILENAME=ID")]
    entries: Vec<PreloadEntry>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::Text, "preload=info,doc_store=info");

    let args = Args::parse();
    let entries = if args.entries.is_empty() {
        default_entries()
    } else {
        args.entries
    };

    let report = Preloader::new(&args.source_dir, &args.dest_dir)
        .run(&entries)
        .await?;

    for id in &report.seeded {
        info!(%id, "seeded");
    }
    for (file, reason) in &report.failed {
        error!(file = %file, reason = %reason, "not seeded");
    }

    if !report.is_success() {
        anyhow::bail!("{} of {} entries failed", report.failed.len(), entries.len());
    }
    Ok(())
}
