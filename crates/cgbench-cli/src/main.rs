//! cgbench - fork-join parallel Conjugate Gradient benchmark
//!
//! Solves `A x = b` for the implicit matrix with `2` on the diagonal and `1`
//! elsewhere, then prints the iteration count, relative residual and wall
//! time of the solve.
//!
//! ## Usage
//!
//! - `cgbench 1` - right-hand side `N + 1`, default thread count
//! - `cgbench 2 8` - sine right-hand side on 8 worker threads
//! - `cgbench 2 8 --kernel row-sum --json` - fast kernel, JSON report

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cgbench_solver::cg::ConjugateGradientSolver;
use cgbench_solver::matvec::{ImplicitMatrix, MatVecKernel};
use cgbench_solver::pool::WorkerPool;
use cgbench_solver::problem::{InitialGuess, Variant};
use cgbench_solver::types::{
    SolverConfig, DEFAULT_DIMENSION, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
use cgbench_solver::validation::validate_dimension;

mod report;

use report::BenchReport;

const EXIT_USAGE: u8 = 1;
const EXIT_FAILURE: u8 = 2;

/// Fork-join parallel Conjugate Gradient benchmark
#[derive(Parser, Debug)]
#[command(name = "cgbench")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "cgbench <VARIANT: 1|2> [THREADS] [OPTIONS]")]
struct Cli {
    /// Benchmark variant: 1 (b = N + 1) or 2 (b = A sin)
    #[arg(allow_negative_numbers = true)]
    variant: i64,

    /// Worker threads; zero, negative or absent keeps the default
    #[arg(allow_negative_numbers = true)]
    threads: Option<i64>,

    /// System dimension N
    #[arg(long, default_value_t = DEFAULT_DIMENSION)]
    size: usize,

    /// Relative residual tolerance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    eps: f64,

    /// Iteration cap
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iters: usize,

    /// Mat-vec kernel
    #[arg(long, value_enum, default_value_t = KernelArg::Naive)]
    kernel: KernelArg,

    /// Starting iterate
    #[arg(long, value_enum, default_value_t = GuessArg::Zero)]
    initial_guess: GuessArg,

    /// Print the report as one JSON object
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KernelArg {
    /// O(N^2) loop over the matrix entries
    Naive,
    /// x[i] + sum(x)
    RowSum,
}

impl From<KernelArg> for MatVecKernel {
    fn from(arg: KernelArg) -> Self {
        match arg {
            KernelArg::Naive => MatVecKernel::Naive,
            KernelArg::RowSum => MatVecKernel::RowSum,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GuessArg {
    /// x0 = 0
    Zero,
    /// x0[i] = sin(4 pi i / N)
    Harmonic,
}

impl From<GuessArg> for InitialGuess {
    fn from(arg: GuessArg) -> Self {
        match arg {
            GuessArg::Zero => InitialGuess::Zero,
            GuessArg::Harmonic => InitialGuess::Harmonic,
        }
    }
}

impl Cli {
    /// Pool size request; only positive counts override the default.
    fn requested_threads(&self) -> Option<usize> {
        self.threads
            .filter(|&t| t > 0)
            .and_then(|t| usize::try_from(t).ok())
    }

    fn solver_config(&self) -> SolverConfig {
        SolverConfig::default()
            .with_tolerance(self.eps)
            .with_max_iterations(self.max_iters)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Logs go to stderr so stdout carries only the report
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let Some(variant) = Variant::from_index(cli.variant) else {
        eprintln!("Variant must be 1 or 2");
        return ExitCode::from(EXIT_USAGE);
    };

    let result = run(&cli, variant).and_then(|report| emit(&report, cli.json));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Build the problem, run one solve and summarise it.
fn run(cli: &Cli, variant: Variant) -> anyhow::Result<BenchReport> {
    validate_dimension(cli.size)?;

    let pool = WorkerPool::new(cli.requested_threads()).context("starting worker pool")?;
    let matrix = ImplicitMatrix::new(cli.size, cli.kernel.into());
    info!(
        variant = variant.index(),
        dimension = cli.size,
        kernel = %matrix.kernel(),
        threads = pool.threads(),
        "benchmark configured"
    );

    let rhs = variant.build_rhs(&pool, &matrix);
    let x0 = InitialGuess::from(cli.initial_guess).build(cli.size);

    let solver = ConjugateGradientSolver::new(cli.solver_config());
    let report = solver
        .solve_with_guess(&pool, &matrix, &rhs, &x0)
        .context("conjugate gradient solve failed")?;
    debug!(status = %report.status, iterations = report.iterations, "benchmark finished");

    Ok(BenchReport::new(variant, &matrix, &report))
}

fn emit(report: &BenchReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", report.render_json()?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}
