mod progress;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ga_ipd::contract::{serve_model_request, ModelRequest};
use ga_ipd::game::tournament::{head_to_head_all, HeadToHeadConfig};
use ga_ipd::genetic_optimizer::{GeneticConfig, GeneticOptimizer};
use ga_ipd::local_search::{
    AcceptanceRule, AnnealingConfig, BeamConfig, HillClimbConfig, HillClimbing, LocalBeamSearch,
    SimulatedAnnealing, TabuConfig, TabuSearch,
};
use ga_ipd::monitor::{CompositeMonitor, TimeLimitMonitor};
use ga_ipd::neighbor::RandomBitFlip;
use ga_ipd::{
    MemoryLayout, OpponentPool, Optimizer, PayoffMatrix, PoolFitnessCalculator, SearchResult,
};
use progress::ProgressMonitor;

#[derive(Parser, Debug)]
#[command(about = "Evolve iterated prisoner's dilemma strategies")]
struct Cli {
    /// Encoding length in bits (21, 85, 149, ...).
    #[arg(long, global = true, default_value_t = 149)]
    memory_size: usize,

    /// Seed for the random source; drawn from the OS when omitted.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Payoff table as `cc,cd,dc,dd` from the mover's point of view.
    #[arg(long, global = true, default_value = "3,0,5,1", value_parser = parse_payoffs)]
    payoffs: PayoffMatrix,

    /// Opponents as `name=count`; one of each baseline when omitted.
    #[arg(long, global = true, value_delimiter = ',', value_parser = parse_opponent)]
    opponents: Vec<(String, usize)>,

    /// Fewest bits a neighbor move flips.
    #[arg(long, global = true, default_value_t = 1)]
    min_flips: usize,

    /// Most bits a neighbor move flips.
    #[arg(long, global = true, default_value_t = 10)]
    max_flips: usize,

    /// Rounds per fitness match.
    #[arg(long, global = true, default_value_t = 10)]
    rounds: usize,

    /// Wall-clock budget in seconds.
    #[arg(long, global = true)]
    time_limit: Option<f64>,

    /// Show a progress bar.
    #[arg(long, global = true)]
    progress: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    HillClimb(ClimbArgs),
    Tabu(TabuArgs),
    Anneal(AnnealArgs),
    Genetic(GeneticArgs),
    Beam(BeamArgs),
    /// Serve a JSON model request read from a file, or stdin for `-`.
    Request { input: String },
}

#[derive(Args, Debug)]
struct ClimbArgs {
    #[arg(long, default_value_t = 1)]
    restarts: usize,
    #[arg(long, default_value_t = 16)]
    iterations: usize,
}

#[derive(Args, Debug)]
struct TabuArgs {
    #[command(flatten)]
    climb: ClimbArgs,
    #[arg(long, default_value_t = 10_000)]
    capacity: usize,
}

#[derive(Args, Debug)]
struct AnnealArgs {
    #[arg(long, default_value_t = 5)]
    restarts: usize,
    #[arg(long, default_value_t = 100.0)]
    temperature: f64,
    #[arg(long, default_value_t = 0.99)]
    cooling: f64,
    /// Use `exp(delta)` instead of `exp(delta / t)`.
    #[arg(long)]
    unnormalized: bool,
}

#[derive(Args, Debug)]
struct GeneticArgs {
    #[arg(long, default_value_t = 20)]
    population: usize,
    #[arg(long, default_value_t = 20)]
    generations: usize,
    #[arg(long, default_value_t = 1.0)]
    crossover_percent: f64,
    #[arg(long, default_value_t = 0.0)]
    mutation_percent: f64,
    #[arg(long, default_value_t = 0)]
    mutation_count: usize,
}

#[derive(Args, Debug)]
struct BeamArgs {
    #[arg(long, default_value_t = 16)]
    iterations: usize,
    #[arg(long, default_value_t = 8)]
    width: usize,
}

fn parse_payoffs(s: &str) -> Result<PayoffMatrix, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("{v:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match values[..] {
        [cc, cd, dc, dd] => PayoffMatrix::new([[cc, cd], [dc, dd]]).map_err(|e| e.to_string()),
        _ => Err(format!("expected 4 comma separated values, got {}", values.len())),
    }
}

fn parse_opponent(s: &str) -> Result<(String, usize), String> {
    let (name, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=count, got {s:?}"))?;
    let count = count
        .trim()
        .parse()
        .map_err(|e| format!("bad count in {s:?}: {e}"))?;
    Ok((name.trim().to_string(), count))
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn opponent_pool(cli: &Cli) -> anyhow::Result<OpponentPool> {
    if cli.opponents.is_empty() {
        return Ok(OpponentPool::standard());
    }
    let mut counts = BTreeMap::new();
    for (name, count) in &cli.opponents {
        *counts.entry(name.as_str()).or_insert(0) += count;
    }
    Ok(OpponentPool::from_counts(&counts)?)
}

fn run<O: Optimizer>(
    engine: &O,
    cli: &Cli,
    rng: &mut ChaCha8Rng,
) -> anyhow::Result<SearchResult> {
    let mut monitor = CompositeMonitor::new();
    if let Some(seconds) = cli.time_limit {
        let limit = Duration::try_from_secs_f64(seconds).context("invalid --time-limit")?;
        monitor.add_monitor(TimeLimitMonitor::new(limit));
    }
    if cli.progress {
        monitor.add_monitor(ProgressMonitor::new()?);
    }
    Ok(engine.optimize(rng, &mut monitor))
}

fn report(result: &SearchResult, cli: &Cli, rng: &mut ChaCha8Rng) -> anyhow::Result<()> {
    let baselines = OpponentPool::standard().players();
    let h2h = head_to_head_all(
        &cli.payoffs,
        &result.encoding,
        &baselines,
        &HeadToHeadConfig::default(),
        rng,
    )?;
    println!("Best Fitness: {}", result.fitness);
    println!("Head To Head: {:.2}", h2h);
    println!(
        "Restarts: {}, Iterations: {}, Evaluations: {}, Termination: {}",
        result.stats.restarts,
        result.stats.iterations,
        result.stats.evaluations,
        result.stats.termination
    );
    println!("Model: {}", result.bit_string());
    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    let path = PathBuf::from(input);
    std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

fn serve(input: &str, cli: &Cli, rng: &mut ChaCha8Rng) -> anyhow::Result<()> {
    let request = ModelRequest::from_json(&read_input(input)?)?;
    let mut monitor = CompositeMonitor::new();
    if cli.progress {
        monitor.add_monitor(ProgressMonitor::new()?);
    }
    let response = serve_model_request(&request, rng, &mut monitor)?;
    println!("{}", response.to_json()?);
    Ok(())
}

fn search(cli: &Cli, rng: &mut ChaCha8Rng) -> anyhow::Result<SearchResult> {
    let layout = MemoryLayout::from_memory_size(cli.memory_size)?;
    let fitness =
        PoolFitnessCalculator::new(cli.payoffs, opponent_pool(cli)?).with_rounds(cli.rounds)?;
    let neighbors = RandomBitFlip::new(cli.min_flips, cli.max_flips)?;

    match &cli.command {
        Command::HillClimb(args) => {
            let config = HillClimbConfig {
                num_restarts: args.restarts,
                num_iterations: args.iterations,
                layout,
            };
            let engine = HillClimbing::new(config, fitness)?.with_neighbor_generator(neighbors);
            run(&engine, cli, rng)
        }
        Command::Tabu(args) => {
            let config = TabuConfig {
                num_restarts: args.climb.restarts,
                num_iterations: args.climb.iterations,
                tabu_capacity: args.capacity,
                layout,
            };
            let engine = TabuSearch::new(config, fitness)?.with_neighbor_generator(neighbors);
            run(&engine, cli, rng)
        }
        Command::Anneal(args) => {
            let config = AnnealingConfig {
                num_restarts: args.restarts,
                temperature: args.temperature,
                cooling_factor: args.cooling,
                acceptance: if args.unnormalized {
                    AcceptanceRule::Unnormalized
                } else {
                    AcceptanceRule::Metropolis
                },
                layout,
                ..AnnealingConfig::default()
            };
            let engine =
                SimulatedAnnealing::new(config, fitness)?.with_neighbor_generator(neighbors);
            run(&engine, cli, rng)
        }
        Command::Genetic(args) => {
            let config = GeneticConfig {
                population_size: args.population,
                num_generations: args.generations,
                percent_for_crossover: args.crossover_percent,
                mutation_percent: args.mutation_percent,
                mutation_count: args.mutation_count,
                layout,
            };
            run(&GeneticOptimizer::new(config, fitness)?, cli, rng)
        }
        Command::Beam(args) => {
            let config = BeamConfig {
                num_iterations: args.iterations,
                beam_width: args.width,
                layout,
            };
            let engine = LocalBeamSearch::new(config, fitness)?.with_neighbor_generator(neighbors);
            run(&engine, cli, rng)
        }
        Command::Request { .. } => bail!("`request` does not run a search"),
    }
}

fn main() -> anyhow::Result<()> {
    enable_tracing();
    let cli = Cli::parse();

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, "seeding random source");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    if let Command::Request { input } = &cli.command {
        return serve(input, &cli, &mut rng);
    }
    let result = search(&cli, &mut rng)?;
    report(&result, &cli, &mut rng)
}
