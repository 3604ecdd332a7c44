use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use volatility_avl::data_gen::{SyntheticConfig, generate_price_records};
use volatility_avl::key_stream::read_records_from_path;
use volatility_avl::stock_book::normalize_ticker;
use volatility_avl::utils::try_init_tracing;
use volatility_avl::{AvlTree, Key, LinearIndex, Side, StockBook, build_both, query_both};

/// Build an AVL tree and a linear index over daily price volatilities and
/// compare their lookup times.
#[derive(Parser, Debug)]
#[command(name = "volatility-bench")]
struct HarnessArgs {
    /// CSV with `date,open,high,low,close,volume,Name` rows. A synthetic
    /// dataset is generated when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Tickers in the synthetic dataset
    #[arg(long, default_value = "500")]
    groups: usize,

    /// Trading days per synthetic ticker
    #[arg(long, default_value = "1259")]
    days: usize,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Ticker for a one-shot query
    #[arg(long, requires = "side")]
    ticker: Option<String>,

    /// BUY looks up the lowest volatility, SELL the highest
    #[arg(long)]
    side: Option<Side>,

    /// Prompt for queries on stdin after building
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> anyhow::Result<()> {
    if let Err(err) = try_init_tracing() {
        eprintln!("tracing disabled: {err}");
    }
    let args = HarnessArgs::parse();

    let records = match &args.input {
        Some(path) => read_records_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            let config = SyntheticConfig {
                groups: args.groups,
                days: args.days,
                seed: args.seed,
            };
            info!(?config, "no input given, generating synthetic prices");
            generate_price_records(config)?
        }
    };

    let book = StockBook::from_records(&records);
    info!(
        rows = records.len(),
        groups = book.group_count(),
        keyed = book.record_count(),
        "dataset loaded"
    );
    drop(records);

    let report = build_both(book.key_stream());
    println!("Build times");
    println!("{report}");

    if let (Some(ticker), Some(side)) = (&args.ticker, args.side) {
        run_query(&book, &report.tree, &report.baseline, ticker, side)?;
    }

    if args.interactive {
        interactive(&book, &report.tree, &report.baseline)?;
    }

    Ok(())
}

fn run_query(
    book: &StockBook,
    tree: &AvlTree<Key>,
    baseline: &LinearIndex<Key>,
    ticker: &str,
    side: Side,
) -> anyhow::Result<()> {
    let target = book.extreme(&normalize_ticker(ticker), side)?;
    println!(
        "\n{side} {}: {} on {}",
        target.group_id, target.key, target.timestamp
    );
    let query = query_both(tree, baseline, &target.key);
    println!("{query}");
    Ok(())
}

fn interactive(
    book: &StockBook,
    tree: &AvlTree<Key>,
    baseline: &LinearIndex<Key>,
) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nTicker to search (-1 to stop): ");
        io::stdout().flush()?;
        let Some(ticker) = lines.next().transpose()? else {
            break;
        };
        let ticker = normalize_ticker(&ticker);
        if ticker == "-1" {
            break;
        }
        if !book.contains_group(&ticker) {
            println!("Unknown ticker {ticker}");
            continue;
        }

        print!("BUY for the deepest dip, SELL for the strongest rise: ");
        io::stdout().flush()?;
        let Some(answer) = lines.next().transpose()? else {
            break;
        };
        let side = match answer.parse::<Side>() {
            Ok(side) => side,
            Err(err) => {
                warn!(%err, "ignoring query");
                continue;
            }
        };

        run_query(book, tree, baseline, &ticker, side)?;
    }

    Ok(())
}
