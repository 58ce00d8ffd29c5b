use std::fs;
use std::num::NonZeroUsize;

use clap::Parser;
use rayon::prelude::*;

use mcts_chess::logging::setup_logging;
use mcts_chess::{
    ChessPosition, LinearOracle, MaterialOracle, Mcts, OracleError, SearchConfig,
    SearchError, SearchLimits, SharedEvaluationCache, Turn, ValueCache, ValueOracle,
};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TurnCli {
    White,
    Black,
}

impl From<TurnCli> for Turn {
    fn from(cli: TurnCli) -> Self {
        match cli {
            TurnCli::White => Turn::White,
            TurnCli::Black => Turn::Black,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OracleKind {
    /// Material balance squashed with tanh
    Material,
    /// Linear model over the board array, loaded from --weights
    Linear,
}

#[derive(Parser, Debug)]
#[command(name = "mcts_chess", version, about = "MCTS move selection for chess positions")]
struct Config {
    /// Position to analyze (a board-only FEN is accepted together with --turn)
    #[arg(long, required_unless_present = "fen_file")]
    fen: Option<String>,

    /// File with one FEN per line, analyzed in parallel
    #[arg(long, conflicts_with = "fen")]
    fen_file: Option<String>,

    /// Override the side to move of the FEN
    #[arg(long, value_enum)]
    turn: Option<TurnCli>,

    /// Number of MCTS iterations per position
    #[arg(short = 'i', long, default_value_t = 1000)]
    iterations: usize,

    /// Pick randomly among the most visited moves instead of the most visited one
    #[arg(long, default_value_t = false)]
    explore: bool,

    /// Value oracle guiding the search
    #[arg(long, value_enum, default_value = "material")]
    oracle: OracleKind,

    /// JSON weights for the linear oracle
    #[arg(long, required_if_eq("oracle", "linear"))]
    weights: Option<String>,

    /// JSON search configuration
    #[arg(long)]
    config: Option<String>,

    /// Write rotating log files to this directory instead of stderr
    #[arg(long)]
    log_dir: Option<String>,

    /// Seed for the exploratory move choice
    #[arg(long)]
    seed: Option<u64>,

    /// Override the exploration constant of the config
    #[arg(short = 'c', long)]
    exploration_constant: Option<f64>,
}

/// Oracle chosen on the command line.
enum ChessOracle {
    Material(MaterialOracle),
    Linear(LinearOracle),
}

impl ValueOracle<ChessPosition> for ChessOracle {
    fn predict(&self, position: &ChessPosition) -> Result<f64, OracleError> {
        match self {
            ChessOracle::Material(oracle) => oracle.predict(position),
            ChessOracle::Linear(oracle) => oracle.predict(position),
        }
    }
}

fn load_oracle(args: &Config) -> mcts_chess::Result<ChessOracle> {
    match (args.oracle, args.weights.as_deref()) {
        (OracleKind::Material, _) => Ok(ChessOracle::Material(MaterialOracle::default())),
        (OracleKind::Linear, Some(path)) => Ok(ChessOracle::Linear(LinearOracle::from_json_file(path)?)),
        (OracleKind::Linear, None) => Err(mcts_chess::Error::Config(
            "--oracle linear requires --weights".to_string(),
        )),
    }
}

fn parse_position(fen: &str, turn: Option<TurnCli>) -> mcts_chess::Result<ChessPosition> {
    let position = match turn {
        Some(turn) => ChessPosition::from_fen_with_turn(fen, turn.into())?,
        None => ChessPosition::from_fen(fen)?,
    };
    Ok(position)
}

/// Runs one search and renders the line printed for it.
fn analyze<O, C>(
    engine: &mut Mcts<O, C>,
    position: &ChessPosition,
    iterations: usize,
    explore: bool,
) -> Result<String, SearchError>
where
    O: ValueOracle<ChessPosition>,
    C: ValueCache,
{
    match engine.run(position, SearchLimits::iterations(iterations), explore) {
        Ok(result) => {
            log::info!(
                "📊 {}: {} iterations, {} nodes, cache hit rate {:.1}%",
                position.fen(),
                result.iterations,
                result.tree_size,
                result.cache_stats.hit_rate() * 100.0
            );
            Ok(format!("best move: {}", result.best_move))
        }
        Err(SearchError::NoLegalMoves) => Ok("No legal moves".to_string()),
        Err(e) => Err(e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Config::parse();
    let _logger = setup_logging("info", args.log_dir.as_deref())?;

    let mut config = match args.config.as_deref() {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(c) = args.exploration_constant {
        config.exploration_constant = c;
    }
    config.validate()?;
    log::info!("🚀 Starting mcts_chess {} with {}", mcts_chess::VERSION, config.to_config_string());

    let oracle = load_oracle(&args)?;
    let capacity = NonZeroUsize::new(config.cache_capacity)
        .ok_or_else(|| mcts_chess::Error::Config("cache_capacity must be at least 1".to_string()))?;

    if let Some(path) = args.fen_file.as_deref() {
        let contents = fs::read_to_string(path)?;
        let fens: Vec<&str> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        log::info!("🔄 Analyzing {} positions from {}", fens.len(), path);

        let cache = SharedEvaluationCache::new(capacity);
        let lines: Vec<String> = fens
            .par_iter()
            .map(|fen| -> mcts_chess::Result<String> {
                let position = parse_position(fen, args.turn)?;
                let mut engine = Mcts::new(config.clone(), &oracle, cache.clone())?;
                let line = analyze(&mut engine, &position, args.iterations, args.explore)?;
                Ok(format!("{} => {}", fen, line))
            })
            .collect::<mcts_chess::Result<Vec<_>>>()?;

        for line in lines {
            println!("{}", line);
        }
        let stats = cache.stats();
        log::info!(
            "✅ Done: {} cached evaluations, {} hits, {} misses, {} evictions",
            cache.len(),
            stats.hits,
            stats.misses,
            stats.evictions
        );
        return Ok(());
    }

    let fen = args
        .fen
        .as_deref()
        .ok_or_else(|| mcts_chess::Error::Config("either --fen or --fen-file is required".to_string()))?;
    let position = parse_position(fen, args.turn)?;
    let mut engine = Mcts::with_config_cache(config, oracle)?;
    println!("{}", analyze(&mut engine, &position, args.iterations, args.explore)?);
    Ok(())
}
