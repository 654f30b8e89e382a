use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType},
};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolutionStatus as CbcStatus, SolverModel,
    Variable as GoodLpVariable,
};
use std::time::Instant;
use tracing::debug;

/// COIN-OR CBC through `good_lp`. CBC is driven through its C API, so no
/// model or solution files are written.
pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;

        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(problem.num_variables());

        for var_def in problem.variables.iter() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let var = match var_def.variable_type {
                VariableType::Binary => vars.add(variable().binary()),
                VariableType::Integer => vars.add(variable().integer().min(lower).max(upper)),
                VariableType::Continuous => vars.add(variable().min(lower).max(upper)),
            };
            lp_variables.push(var);
        }

        if problem.variables.is_empty() {
            for _ in 0..problem.num_variables() {
                lp_variables.push(vars.add(variable().min(0.0)));
            }
        }

        // good_lp minimises here, so negate for maximization
        let is_maximize = problem.objective.optimization_type == OptimizationType::Maximize;
        let mut obj_expr: Expression = 0.into();
        for (i, &coeff) in problem.objective.coefficients.iter().enumerate() {
            if coeff != 0.0 {
                let c = if is_maximize { -coeff } else { coeff };
                obj_expr += c * lp_variables[i];
            }
        }

        let mut lp_model = vars.minimise(obj_expr.clone()).using(coin_cbc::coin_cbc);
        lp_model.set_parameter("log", if config.verbose { "1" } else { "0" });
        if let Some(limit) = config.time_limit {
            lp_model.set_parameter("seconds", &limit.to_string());
        }
        if let Some(gap) = config.gap_tolerance {
            lp_model.set_parameter("ratioGap", &gap.to_string());
        }

        for constraint in &problem.constraints {
            let mut lhs: Expression = 0.into();
            for (i, &coeff) in constraint.coefficients.iter().enumerate() {
                if coeff != 0.0 {
                    lhs += coeff * lp_variables[i];
                }
            }

            lp_model = match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
                ConstraintType::Equal => lp_model.with(lhs.eq(constraint.bound)),
                ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(constraint.bound)),
            };
        }

        let solution_result = lp_model.solve();
        let statistics = SolverStatistics::for_problem(
            problem,
            start_time.elapsed().as_secs_f64() * 1000.0,
        );
        debug!(
            ok = solution_result.is_ok(),
            solve_time_ms = statistics.solve_time_ms,
            "CBC finished"
        );

        let solution = match solution_result {
            Ok(sol) => {
                let status = domain_status(sol.status());
                // Objective on CBC's assignment, back in the caller's sense
                let reported = obj_expr.eval_with(&sol);
                let objective = if is_maximize { -reported } else { reported };

                if status == SolutionStatus::Optimal {
                    let variable_values: Vec<f64> =
                        lp_variables.iter().map(|&var| sol.value(var)).collect();
                    DomainSolution::optimal(objective, variable_values)
                        .with_message(format!("Optimal solution found for '{}'", problem.name))
                } else {
                    debug!(%status, incumbent = objective, "CBC stopped early");
                    DomainSolution::new(
                        status,
                        format!(
                            "CBC stopped before optimality was proven (incumbent {})",
                            objective
                        ),
                    )
                }
            }
            Err(e) => failure_solution(e),
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Only a proven optimum counts as optimal; an incumbent kept on a time or
/// gap stop is merely feasible.
fn domain_status(status: CbcStatus) -> SolutionStatus {
    match status {
        CbcStatus::Optimal => SolutionStatus::Optimal,
        CbcStatus::TimeLimit => SolutionStatus::TimeLimit,
        CbcStatus::GapLimit => SolutionStatus::Feasible,
    }
}

fn failure_solution(error: ResolutionError) -> DomainSolution {
    match error {
        ResolutionError::Infeasible => DomainSolution::new(
            SolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        ),
        ResolutionError::Unbounded => DomainSolution::new(
            SolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        ),
        ResolutionError::Other(reason) => DomainSolution::new(SolutionStatus::Error, reason),
        ResolutionError::Str(reason) => DomainSolution::new(SolutionStatus::Error, reason),
    }
}
