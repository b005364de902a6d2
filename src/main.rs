use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use gambit_core::{Position, STARTING_FEN, to_uci};
use gambit_engine::{MATE_SCORE, MATE_THRESHOLD, SearchConfig, SearchControl, Searcher, compute_limits};
use tracing::{Level, info};

/// Thinking time when neither a move time, a clock, nor a depth is given.
const DEFAULT_MOVETIME_MS: u64 = 1000;

/// Pick one chess move within a time budget and print it.
#[derive(Debug, Parser)]
#[command(name = "gambit", version)]
struct Args {
    /// Position to search.
    #[arg(long, default_value = STARTING_FEN)]
    fen: String,

    /// Moves to play from the FEN first, in UCI notation.
    #[arg(long, num_args = 1.., value_name = "UCI")]
    moves: Vec<String>,

    /// Fixed thinking time for this move.
    #[arg(long, conflicts_with = "remaining_ms")]
    movetime_ms: Option<u64>,

    /// Remaining game clock; a share of it is spent on this move.
    #[arg(long)]
    remaining_ms: Option<u64>,

    /// Clock increment per move.
    #[arg(long, requires = "remaining_ms")]
    increment_ms: Option<u64>,

    /// Deepest iteration to run.
    #[arg(long)]
    depth: Option<u8>,

    /// Transposition table size in megabytes.
    #[arg(long, default_value_t = 16)]
    hash_mb: usize,

    /// Disable the transposition table.
    #[arg(long)]
    no_tt: bool,

    /// Disable killer-move ordering.
    #[arg(long)]
    no_killers: bool,

    /// Log each completed iteration to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn format_score(score: i32) -> String {
    if score.abs() > MATE_THRESHOLD {
        let plies = MATE_SCORE - score.abs();
        let moves = (plies + 1) / 2;
        format!("mate {}", if score > 0 { moves } else { -moves })
    } else {
        format!("cp {score}")
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let defaults = SearchConfig::default();
    let config = SearchConfig {
        tt_mb: args.hash_mb,
        max_depth: args.depth.unwrap_or(defaults.max_depth),
        use_tt: !args.no_tt,
        use_killers: !args.no_killers,
        ..defaults
    };
    let mut searcher = Searcher::with_config(config).context("invalid search configuration")?;

    let mut pos = Position::from_fen(&args.fen)?;
    for uci in &args.moves {
        pos.push_uci(uci)?;
    }

    let stop = Arc::new(AtomicBool::new(false));
    let control = match (args.movetime_ms, args.remaining_ms) {
        (Some(ms), _) => {
            let budget = Duration::from_millis(ms);
            SearchControl::new_timed(stop, budget, budget)
        }
        (None, Some(remaining)) => {
            let (soft, hard) = compute_limits(
                Duration::from_millis(remaining),
                Duration::from_millis(args.increment_ms.unwrap_or(0)),
                searcher.config().budget_divisor,
            );
            SearchControl::new_timed(stop, soft, hard)
        }
        (None, None) if args.depth.is_some() => SearchControl::new_infinite(stop),
        (None, None) => {
            let budget = Duration::from_millis(DEFAULT_MOVETIME_MS);
            SearchControl::new_timed(stop, budget, budget)
        }
    };

    info!(fen = %args.fen, moves = args.moves.len(), "searching");

    let max_depth = searcher.config().depth_cap();
    let result = searcher.search(&mut pos, max_depth, &control, |depth, score, nodes, best| {
        let elapsed_ms = control.elapsed().as_millis().max(1);
        let nps = (nodes as u128 * 1000) / elapsed_ms;
        println!(
            "info depth {} score {} nodes {} nps {} time {} pv {}",
            depth,
            format_score(score),
            nodes,
            nps,
            elapsed_ms,
            to_uci(best)
        );
    });

    let best = result.best_move.as_ref().map_or_else(|| "0000".to_string(), to_uci);
    info!(
        best = %best,
        depth = result.depth,
        score = result.score,
        nodes = result.nodes,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "search finished"
    );
    println!("bestmove {best}");

    Ok(())
}
