use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, error};

use collab_routing::formulation::ProblemFormulator;
use collab_routing::plot::{SolutionPlotter, SvgPlotter};
use collab_routing::report::format_report;
use collab_routing::scenario::Scenario;
use collab_routing::solver::{
    solve, FirstSolutionStrategy, LocalSearchBackend, LocalSearchMetaheuristic, SolveOutcome,
};

/// Exit status when no solution exists.
const EXIT_NO_SOLUTION: u8 = 2;
/// Exit status when the solution breaks a constraint.
const EXIT_DEGRADED: u8 = 3;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Scenario JSON file (default: built-in two-depot instance)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Search time limit in seconds
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Maximum number of guided local search rounds
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Improvement metaheuristic
    #[arg(short, long, value_enum)]
    metaheuristic: Option<Metaheuristic>,

    /// First solution strategy
    #[arg(short, long, value_enum)]
    first_solution: Option<FirstSolution>,

    /// Output path of the route plot
    #[arg(short, long, default_value = "routes.svg")]
    plot: PathBuf,

    /// Skip the route plot
    #[arg(long)]
    no_plot: bool,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Metaheuristic {
    GreedyDescent,
    GuidedLocalSearch,
}

impl From<Metaheuristic> for LocalSearchMetaheuristic {
    fn from(m: Metaheuristic) -> Self {
        match m {
            Metaheuristic::GreedyDescent => Self::GreedyDescent,
            Metaheuristic::GuidedLocalSearch => Self::GuidedLocalSearch,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FirstSolution {
    PathCheapestArc,
    ParallelCheapestInsertion,
}

impl From<FirstSolution> for FirstSolutionStrategy {
    fn from(f: FirstSolution) -> Self {
        match f {
            FirstSolution::PathCheapestArc => Self::PathCheapestArc,
            FirstSolution::ParallelCheapestInsertion => Self::ParallelCheapestInsertion,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("cannot load scenario {}", path.display()))?,
        None => Scenario::default(),
    };
    apply_overrides(&mut scenario, &cli)?;
    debug!(search = ?scenario.search, "search parameters");

    let formulation = ProblemFormulator::from_scenario(&scenario)
        .and_then(ProblemFormulator::build)
        .context("invalid scenario")?;
    let report = solve(&formulation, &scenario.search, &LocalSearchBackend)
        .context("solver returned malformed routes")?;

    print!("{}", format_report(&report, &formulation));

    if let (Some(solution), false) = (report.outcome.solution(), cli.no_plot) {
        SvgPlotter::default()
            .plot(solution, formulation.locations(), &cli.plot)
            .with_context(|| format!("cannot write plot {}", cli.plot.display()))?;
        println!("Plot written to {}", cli.plot.display());
    }

    Ok(match report.outcome {
        SolveOutcome::Feasible(_) => ExitCode::SUCCESS,
        SolveOutcome::NoSolution { .. } => ExitCode::from(EXIT_NO_SOLUTION),
        SolveOutcome::Degraded { .. } => ExitCode::from(EXIT_DEGRADED),
    })
}

/// Command line flags take precedence over the scenario's search section.
fn apply_overrides(scenario: &mut Scenario, cli: &Cli) -> anyhow::Result<()> {
    let search = &mut scenario.search;
    if let Some(secs) = cli.time_limit {
        search.time_limit = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("invalid time limit {secs}"))?;
    }
    if let Some(n) = cli.iterations {
        search.iteration_limit = Some(n);
    }
    if cli.seed.is_some() {
        search.seed = cli.seed;
    }
    if let Some(m) = cli.metaheuristic {
        search.metaheuristic = m.into();
    }
    if let Some(f) = cli.first_solution {
        search.first_solution = f.into();
    }
    Ok(())
}
