//! Benchmark report rendering.

use cgbench_solver::matvec::{ImplicitMatrix, MatVecKernel};
use cgbench_solver::problem::Variant;
use cgbench_solver::types::{SolveReport, SolveStatus};
use serde::Serialize;

/// Summary of one benchmark run, as printed on stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    pub variant: u8,
    pub threads: usize,
    pub iterations: usize,
    pub relative_residual: f64,
    pub time_sec: f64,
    pub status: SolveStatus,
    pub dimension: usize,
    pub kernel: MatVecKernel,
}

impl BenchReport {
    pub fn new(variant: Variant, matrix: &ImplicitMatrix, report: &SolveReport) -> Self {
        Self {
            variant: variant.index(),
            threads: report.threads,
            iterations: report.iterations,
            relative_residual: report.relative_residual,
            time_sec: report.wall_time.as_secs_f64(),
            status: report.status,
            dimension: matrix.dim(),
            kernel: matrix.kernel(),
        }
    }

    /// `key = value` lines in the fixed benchmark order.
    pub fn render_text(&self) -> String {
        format!(
            "variant = {}\nthreads = {}\niterations = {}\nrelative_residual = {:.10}\ntime_sec = {}\nstatus = {}\n",
            self.variant,
            self.threads,
            self.iterations,
            self.relative_residual,
            self.time_sec,
            self.status,
        )
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
