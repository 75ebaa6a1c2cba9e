//! svcfind - search a services catalog from the command line

mod debounce;
mod handler;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use svccache::{IndexedSearch, SharedCache, DEFAULT_CAPACITY};
use svcstore::load_catalog;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::debounce::Debouncer;
use crate::handler::{Command, CommandHandler};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog file (.json array, or tabular text)
    #[arg(short, long)]
    catalog: PathBuf,

    /// Maximum number of memoized queries
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    cache_capacity: usize,

    /// Capacity of the key/value cache (GET/PUT/DEL)
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    kv_capacity: usize,

    /// Quiet period in milliseconds before a typed query runs (0 = off)
    #[arg(short, long, default_value_t = 0)]
    debounce_ms: u64,

    /// Run a single query, print the result and exit
    #[arg(short, long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, responses to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting svcfind v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {}", args.catalog.display());

    let records = load_catalog(&args.catalog)
        .with_context(|| format!("failed to load catalog {}", args.catalog.display()))?;
    info!("Indexed {} records", records.len());

    let search = IndexedSearch::with_cache_capacity(records, args.cache_capacity)?;
    let kv = SharedCache::try_new(args.kv_capacity)?;
    let mut handler = CommandHandler::new(search, kv, Some(args.catalog.clone()));

    if let Some(query) = args.query {
        let response = handler.handle(Command::Search(query));
        println!("{}", response);
        return Ok(());
    }

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    run(&mut handler, input, &mut output, Duration::from_millis(args.debounce_ms)).await
}

/// Answer input lines until EOF; queries wait out `debounce` when non-zero
async fn run<R, W>(
    handler: &mut CommandHandler,
    input: R,
    output: &mut W,
    debounce: Duration,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut pending = Debouncer::new(debounce);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if let Some(cmd) = pending.flush() {
                        write_response(output, &handler.handle(cmd)).await?;
                    }
                    info!("Input closed");
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }

                match Command::parse(&line) {
                    Ok(cmd) if cmd.is_query() && !debounce.is_zero() => {
                        debug!("Debouncing query {:?}", line);
                        pending.push(cmd);
                    }
                    _ => write_response(output, &handler.handle_line(&line)).await?,
                }
            }
            Some(cmd) = pending.ready(), if pending.is_pending() => {
                write_response(output, &handler.handle(cmd)).await?;
            }
        }
    }
}

async fn write_response<W>(output: &mut W, response: &Value) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut out = serde_json::to_vec(response)?;
    out.push(b'\n');
    output.write_all(&out).await?;
    output.flush().await?;
    Ok(())
}
