use clap::Parser;
use postgrust_arrow::{ArrowConverter, ConverterConfig, Table, UnsupportedTypePolicy, render_batch};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pgr_arrow")]
#[command(about = "Convert a PostgrustQL table snapshot into Arrow record batches", long_about = None)]
struct Args {
    /// Table snapshot (JSON) to convert
    input: PathBuf,

    /// Rows per page, -1 for a single unbounded page
    #[arg(short = 'p', long, allow_hyphen_values = true)]
    page_size: Option<i64>,

    /// Rows to skip before the first page
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Convert the whole result in one batch instead of paging
    #[arg(short = 'a', long, conflicts_with_all = ["page_size", "offset"])]
    all: bool,

    /// Drop columns with unsupported SQL types instead of failing
    #[arg(long)]
    skip_unsupported: bool,

    /// Config file (default: /etc/postgrust/pgr_arrow.toml or ./pgr_arrow.toml)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    // CLI flags override ENV and config file
    let mut config = ConverterConfig::load(args.config.as_deref())?;
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if args.skip_unsupported {
        config.unsupported_types = UnsupportedTypePolicy::Skip;
    }

    let mut table = Table::load_json(&args.input)?;
    let converter = ArrowConverter::from_config(&config);
    let mut stdout = io::stdout().lock();

    if args.all {
        let batch = converter.convert_all(&mut table)?;
        write!(stdout, "{}", render_batch(&batch)?)?;
        writeln!(stdout, "Total: {} rows in 1 batch", batch.num_rows())?;
        return Ok(());
    }

    let page_size = config.page_size()?;
    let mut fetch = converter.open_paginated(&mut table, page_size);
    fetch.advance(args.offset);

    let mut batches = 0;
    let mut rows = 0;
    for batch in fetch.pages() {
        let batch = batch?;
        batches += 1;
        rows += batch.num_rows();
        writeln!(stdout, "-- batch {batches} (page size {page_size})")?;
        write!(stdout, "{}", render_batch(&batch)?)?;
    }

    writeln!(stdout, "Total: {rows} rows in {batches} batches, next offset {}", fetch.offset())?;
    Ok(())
}
