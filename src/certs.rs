use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use doc_store::infrastructure::{init_tracing, CertificateBundle, LogFormat};

/// Generate a root CA plus CA-signed server and client certificates.
#[derive(Debug, Parser)]
#[command(name = "certs", version)]
struct Args {
    /// Where to write ca/server/client `.key` and `.pem` files.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Validity period of every certificate, in days.
    #[arg(long, default_value_t = 365, value_parser = clap::value_parser!(i64).range(1..))]
    days: i64,
}

fn main() -> anyhow::Result<()> {
    init_tracing(LogFormat::Text, "certs=info,doc_store=info");
    let args = Args::parse();

    let bundle = CertificateBundle::generate(args.days)?;
    for path in bundle.write_to(&args.out_dir)? {
        info!(path = %path.display(), "written");
    }
    Ok(())
}
