// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS, linked in-process
// Each call builds and drops its own HiGHS model; nothing is shared between calls

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;
use tracing::debug;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;

        // Add variables first, then constraints
        let mut pb = RowProblem::default();
        let mut vars = Vec::with_capacity(problem.variables.len());

        for (i, var_def) in problem.variables.iter().enumerate() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
            let obj_coeff = problem.objective.coefficients[i];

            let col = match var_def.variable_type {
                VariableType::Integer | VariableType::Binary => {
                    pb.add_integer_column(obj_coeff, lower..=upper)
                }
                VariableType::Continuous => pb.add_column(obj_coeff, lower..=upper),
            };
            vars.push(col);
        }

        // No variable definitions means non-negative continuous columns
        if problem.variables.is_empty() {
            for &coeff in &problem.objective.coefficients {
                vars.push(pb.add_column(coeff, 0.0..));
            }
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .coefficients
                .iter()
                .enumerate()
                .filter(|&(_, &coeff)| coeff != 0.0)
                .map(|(i, &coeff)| (vars[i], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = if problem.objective.optimization_type == OptimizationType::Maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        let mut model = pb.optimise(sense);
        model.set_option("output_flag", config.verbose);
        if let Some(limit) = config.time_limit {
            model.set_option("time_limit", limit);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        let solved = model.solve();
        let statistics = SolverStatistics::for_problem(
            problem,
            start_time.elapsed().as_secs_f64() * 1000.0,
        );
        let status = solved.status();
        debug!(?status, solve_time_ms = statistics.solve_time_ms, "HiGHS finished");

        let solution = match status {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                DomainSolution::optimal(solved.objective_value(), variable_values)
                    .with_message(format!("Optimal solution found for '{}'", problem.name))
            }
            HighsModelStatus::Infeasible => DomainSolution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            HighsModelStatus::Unbounded => DomainSolution::new(
                SolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            ),
            HighsModelStatus::UnboundedOrInfeasible => DomainSolution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible or unbounded",
            ),
            HighsModelStatus::ReachedTimeLimit => DomainSolution::new(
                SolutionStatus::TimeLimit,
                "Time limit reached before optimality was proven",
            ),
            other => DomainSolution::new(
                SolutionStatus::Error,
                format!("HiGHS solver returned status: {:?}", other),
            ),
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
