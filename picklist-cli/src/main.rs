mod config;
mod output;
mod parse;

use clap::Parser;
use picklist_core::{
    EngineConfig, GreedyConfig, HeadToHeadConfig, RandomizedSearchConfig, RankingEngine, RankingResult,
    RawComparison, Strategy, TeamId,
};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::PicklistConfig;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "picklist", version, about = "Rank teams from pairwise comparisons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rank teams from a comparisons file
    Rank(RankArgs),
    /// Create a default config file at ~/.config/picklist/config.toml
    Init {
        /// Write the config here instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Parser)]
struct RankArgs {
    /// Comparisons file: JSON array or one "team_a,team_b,better_team" per line.
    /// Read from stdin when omitted.
    #[arg(long)]
    comparisons: Option<PathBuf>,

    /// File listing the teams to rank. Defaults to every team in the comparisons.
    #[arg(long)]
    teams: Option<PathBuf>,

    /// Inline team (repeatable)
    #[arg(long = "team")]
    inline_teams: Vec<TeamId>,

    /// "point-tally", "randomized", "greedy", or "all"
    #[arg(long)]
    strategy: Option<String>,

    /// Seed for the randomized search. A fresh one is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Randomized search rounds
    #[arg(long)]
    rounds: Option<usize>,

    /// Random permutations tried per round
    #[arg(long)]
    trials: Option<usize>,

    /// Greedy insertion budget of insertions plus repairs
    #[arg(long)]
    max_steps: Option<usize>,

    /// Run randomized trials on one thread
    #[arg(long)]
    sequential: bool,

    /// Also refine each ranking with adjacent head-to-head swaps
    #[arg(long)]
    head_to_head: bool,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Show progress during execution
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/picklist/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_strategies(name: &str) -> Vec<Strategy> {
    match name {
        "point-tally" => vec![Strategy::PointTally],
        "randomized" => vec![Strategy::RandomizedSearch],
        "greedy" => vec![Strategy::GreedyInsertion],
        "all" => vec![Strategy::PointTally, Strategy::RandomizedSearch, Strategy::GreedyInsertion],
        other => bail(format!(
            "Unknown strategy \"{other}\". Use \"point-tally\", \"randomized\", \"greedy\", or \"all\"."
        )),
    }
}

fn read_file(path: &Path, what: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| bail(format!("Failed to read {what} file {}: {e}", path.display())))
}

/// Load comparisons from --comparisons or stdin.
fn load_comparisons(args: &RankArgs) -> Vec<RawComparison> {
    let content = match args.comparisons {
        Some(ref path) => read_file(path, "comparisons"),
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                bail("No comparisons provided. Use --comparisons <file> or pipe them via stdin.");
            }
            let mut content = String::new();
            stdin
                .read_to_string(&mut content)
                .unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}")));
            content
        }
    };
    parse::parse_comparisons_from_str(&content).unwrap_or_else(|e| bail(e))
}

/// Teams from --teams and --team. Empty means "derive from the comparisons".
fn load_teams(args: &RankArgs) -> Vec<TeamId> {
    let mut teams = match args.teams {
        Some(ref path) => parse::parse_teams_from_str(&read_file(path, "teams")).unwrap_or_else(|e| bail(e)),
        None => Vec::new(),
    };
    teams.extend(args.inline_teams.iter().copied());
    teams
}

fn engine_config(args: &RankArgs, cfg: &PicklistConfig, seed: u64) -> EngineConfig {
    let defaults = RandomizedSearchConfig::default();
    let randomized = RandomizedSearchConfig {
        seed,
        rounds: args.rounds.or(cfg.rounds).unwrap_or(defaults.rounds),
        trials_per_round: args.trials.or(cfg.trials).unwrap_or(defaults.trials_per_round),
        good_threshold_base: cfg.good_threshold_base.unwrap_or(defaults.good_threshold_base),
        good_threshold_decay: cfg.good_threshold_decay.unwrap_or(defaults.good_threshold_decay),
        parallel: !args.sequential && cfg.parallel.unwrap_or(defaults.parallel),
        ..defaults
    };
    let greedy = GreedyConfig {
        max_steps: args.max_steps.or(cfg.max_steps).unwrap_or(GreedyConfig::default().max_steps),
        start: None,
    };
    EngineConfig {
        randomized,
        greedy,
        head_to_head: HeadToHeadConfig::default(),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Init { config: path } => {
            let path = path.unwrap_or_else(config::config_path);
            config::create_default_config(&path);
            println!("Created config at {}", path.display());
            println!("Edit it to set your default strategy, search budget, etc.");
        }
    }
}

fn run_rank(args: RankArgs) {
    init_tracing(args.verbose);

    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let strategy_name = args
        .strategy
        .clone()
        .or_else(|| cfg.strategy.clone())
        .unwrap_or_else(|| "randomized".to_string());
    let strategies = parse_strategies(&strategy_name);

    let seed = args.seed.or(cfg.seed).unwrap_or_else(rand::random);
    let engine_config = engine_config(&args, &cfg, seed);

    let raw = load_comparisons(&args);
    let teams = load_teams(&args);
    let engine = if teams.is_empty() {
        RankingEngine::from_comparisons(&raw)
    } else {
        RankingEngine::new(&teams, &raw)
    }
    .unwrap_or_else(|e| bail(e));

    if engine.teams().len() < 2 {
        bail(format!("Need at least 2 teams to rank, got {}", engine.teams().len()));
    }

    let summary = engine.summary();
    if args.verbose {
        eprintln!(
            "Ranking {} teams from {} comparisons ({} used after cleanup)",
            engine.teams().len(),
            summary.total,
            summary.clean,
        );
        eprintln!("Seed: {seed}");
    }

    let mut results: Vec<RankingResult> = Vec::new();
    for strategy in strategies {
        if args.verbose {
            eprintln!("Running {strategy}...");
        }
        let result = engine.rank(strategy, &engine_config).unwrap_or_else(|e| bail(e));
        if args.verbose {
            eprintln!(
                "  {:.1}% compliance after {} iterations{}",
                result.compliance_percent,
                result.iterations,
                if result.complete { "" } else { " (budget ran out)" },
            );
        }

        if args.head_to_head {
            let refined = engine
                .refine_head_to_head(&result.ordered_entities, &engine_config.head_to_head)
                .unwrap_or_else(|e| bail(e));
            results.push(result);
            results.push(refined);
        } else {
            results.push(result);
        }
    }

    if args.json {
        output::print_json(&results, summary, seed);
    } else {
        output::print_table(&results, summary);
    }
}
