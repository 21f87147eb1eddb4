//! Console report of a solve.

use std::fmt::Write;

use crate::formulation::Formulation;
use crate::models::Solution;
use crate::solver::{SearchStats, SolveOutcome, SolveReport, StopReason};

/// Formats the outcome as printed by the command line tool.
///
/// A solution is listed with the node table, one line per truck and the
/// total distance; a missing solution with its reason. Degraded solutions
/// list their violations first.
pub fn format_report(report: &SolveReport, formulation: &Formulation) -> String {
    let mut out = String::new();
    match &report.outcome {
        SolveOutcome::NoSolution { reason } => {
            let _ = writeln!(out, "No solution found: {reason}.");
            let _ = writeln!(out, "Try increasing the distance limit or the time limit.");
        }
        SolveOutcome::Feasible(solution) => {
            let _ = writeln!(out, "Balanced solution found!\n");
            write_solution(&mut out, solution, formulation);
        }
        SolveOutcome::Degraded {
            solution,
            violations,
        } => {
            let _ = writeln!(out, "Solution breaks {} constraint(s):", violations.len());
            for v in violations {
                let _ = writeln!(out, "  - {v}");
            }
            let _ = writeln!(out);
            write_solution(&mut out, solution, formulation);
        }
    }
    let _ = writeln!(out, "\n{}", format_stats(&report.stats));
    out
}

fn write_solution(out: &mut String, solution: &Solution, formulation: &Formulation) {
    let _ = writeln!(out, "{:<28} Coordinates", "Nodes (index -> name)");
    for l in formulation.locations() {
        let _ = writeln!(
            out,
            "{:>2} -> {:<8}    ({}, {})",
            l.index(),
            l.name(),
            l.x(),
            l.y()
        );
    }

    let _ = writeln!(out, "\n--- Routes ---");
    for route in solution.routes() {
        let _ = writeln!(
            out,
            "Truck {}: distance = {:>5.1}  route = {:?}",
            route.vehicle_id(),
            route.distance(),
            route.node_indices()
        );
    }
    let _ = writeln!(
        out,
        "\nTotal distance for all vehicles: {:.1}",
        solution.total_distance()
    );
}

/// One-line summary of the search counters.
pub fn format_stats(stats: &SearchStats) -> String {
    let reason = match stats.stop_reason {
        StopReason::Converged => "converged",
        StopReason::IterationLimit => "iteration limit",
        StopReason::TimeLimit => "time limit",
        StopReason::NoFirstSolution => "no first solution",
    };
    format!(
        "Search: {} round(s) in {:.2} s ({reason})",
        stats.iterations,
        stats.elapsed.as_secs_f64()
    )
}
