// Squad selection use case: turn a roster into a 0/1 program, solve it with the
// injected backend and decode the answer.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::mappers::{self, SquadRequest};
use crate::config::OptimizerConfig;
use crate::domain::{
    Candidate, Constraint, ConstraintType, ObjectiveFunction, OptimizationProblem,
    OptimizationType, Position, Solution, SolutionStatus, SolverConfig, SolverError,
    SolverService, SquadResult, SquadRules, Variable,
};
use crate::solver::SolverFactory;

/// Failures that stop an optimization before the solver is consulted.
///
/// An infeasible squad is not an error: it comes back as a status in
/// [`SquadStatistics`](crate::domain::SquadStatistics).
#[derive(Debug, thiserror::Error)]
pub enum SquadError {
    #[error("column '{column}' has {found} entries, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' row {index}: '{raw}' is not a finite number")]
    NonNumeric {
        column: &'static str,
        index: usize,
        raw: String,
    },

    #[error("duplicate candidate id '{0}'")]
    DuplicateId(String),

    #[error("every optimisation value is zero, there is nothing to maximise")]
    DegenerateObjective,

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// The integer program for one call, plus the arena mapping its columns back
/// to candidates.
#[derive(Debug, Clone)]
pub struct SquadModel {
    pub problem: OptimizationProblem,
    /// `columns[j]` is the candidate index behind decision variable `j`.
    pub columns: Vec<usize>,
    /// Candidate indices left out because their position is unknown.
    pub excluded: Vec<usize>,
    /// Forced candidate indices that made it into the model, deduplicated.
    pub forced: Vec<usize>,
}

/// Picks the best squad under [`SquadRules`] with whatever solver it is given.
#[derive(Clone)]
pub struct SquadOptimizer {
    solver: Arc<dyn SolverService>,
    rules: SquadRules,
    config: SolverConfig,
}

impl SquadOptimizer {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self {
            solver,
            rules: SquadRules::default(),
            config: SolverConfig::default(),
        }
    }

    /// Build an optimizer with the backend named in `config`.
    pub fn from_config(config: &OptimizerConfig) -> Result<Self, SolverError> {
        let solver = SolverFactory::create_from_backend(config.solver.backend)?;
        Ok(Self::new(solver)
            .with_rules(config.rules.clone())
            .with_config(config.solver.clone()))
    }

    pub fn with_rules(mut self, rules: SquadRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rules(&self) -> &SquadRules {
        &self.rules
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Validate the raw columns and optimize.
    pub fn optimize(&self, request: &SquadRequest) -> Result<SquadResult, SquadError> {
        let candidates = mappers::request_to_candidates(request)?;
        self.optimize_candidates(&candidates, &request.target_label, &request.forced_ids)
    }

    pub fn optimize_candidates(
        &self,
        candidates: &[Candidate],
        target_label: &str,
        forced_ids: &[String],
    ) -> Result<SquadResult, SquadError> {
        if candidates.iter().all(|c| c.value == 0.0) {
            return Err(SquadError::DegenerateObjective);
        }

        let model = self.build_model(candidates, forced_ids);

        if !model.excluded.is_empty() {
            warn!(
                count = model.excluded.len(),
                ids = ?model.excluded.iter().map(|&i| candidates[i].id.as_str()).collect::<Vec<_>>(),
                "Candidates with unrecognised positions left out of the model"
            );
        }

        let solution = if model.columns.is_empty() {
            if self.rules.quotas.squad_size() > 0 {
                Solution::new(
                    SolutionStatus::Infeasible,
                    "No candidate has a recognised position",
                )
            } else {
                Solution::optimal(0.0, Vec::new())
                    .with_message("Every quota is zero, the empty squad is optimal")
            }
        } else {
            info!(
                candidates = candidates.len(),
                variables = model.problem.num_variables(),
                constraints = model.problem.constraints.len(),
                forced = model.forced.len(),
                solver = self.solver.name(),
                target = target_label,
                "Solving squad selection"
            );
            self.solver.solve(&model.problem)?
        };

        let result =
            mappers::solution_to_result(candidates, &model, &solution, target_label, self.solver.name());

        info!(
            status = %result.statistics.status,
            total_value = result.statistics.total_value,
            total_price = result.statistics.total_price,
            selected = result.roster.len(),
            "Squad selection finished"
        );

        Ok(result)
    }

    /// Formulate the binary program for `candidates`.
    ///
    /// One column per candidate with a known position. Rows are the four
    /// position quotas, the budget, one cap per team and one equality per
    /// forced candidate, in that order.
    pub fn build_model(&self, candidates: &[Candidate], forced_ids: &[String]) -> SquadModel {
        let mut columns = Vec::with_capacity(candidates.len());
        let mut excluded = Vec::new();
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.position.is_some() {
                columns.push(i);
            } else {
                excluded.push(i);
            }
        }
        let n = columns.len();

        let variables = columns
            .iter()
            .map(|&i| Variable::binary(format!("p{}", i)))
            .collect();
        let objective = ObjectiveFunction::new(
            OptimizationType::Maximize,
            columns.iter().map(|&i| candidates[i].value).collect(),
        );

        let mut problem = OptimizationProblem::new(objective)
            .with_name("squad selection")
            .with_variables(variables)
            .with_config(self.config.clone());

        for position in Position::ALL {
            let coefficients = columns
                .iter()
                .map(|&i| indicator(candidates[i].position == Some(position)))
                .collect();
            problem = problem.add_constraint(
                Constraint::new(
                    ConstraintType::Equal,
                    coefficients,
                    self.rules.quotas.quota(position) as f64,
                )
                .with_name(format!("{} quota", position)),
            );
        }

        problem = problem.add_constraint(
            Constraint::new(
                ConstraintType::LessThanOrEqual,
                columns.iter().map(|&i| candidates[i].price).collect(),
                self.rules.budget,
            )
            .with_name("budget"),
        );

        let mut teams: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (col, &i) in columns.iter().enumerate() {
            teams.entry(candidates[i].team.as_str()).or_default().push(col);
        }
        for (team, members) in &teams {
            let mut coefficients = vec![0.0; n];
            for &col in members {
                coefficients[col] = 1.0;
            }
            problem = problem.add_constraint(
                Constraint::new(
                    ConstraintType::LessThanOrEqual,
                    coefficients,
                    self.rules.max_per_team as f64,
                )
                .with_name(format!("max per {}", team)),
            );
        }

        let column_of: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(col, &i)| (candidates[i].id.as_str(), col))
            .collect();
        let mut seen = HashSet::new();
        let mut forced = Vec::new();
        for id in forced_ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            let Some(&col) = column_of.get(id.as_str()) else {
                debug!(id = %id, "Forced id is not a known candidate, ignoring");
                continue;
            };
            let mut coefficients = vec![0.0; n];
            coefficients[col] = 1.0;
            problem = problem.add_constraint(
                Constraint::new(ConstraintType::Equal, coefficients, 1.0)
                    .with_name(format!("forced {}", id)),
            );
            forced.push(columns[col]);
        }

        SquadModel {
            problem,
            columns,
            excluded,
            forced,
        }
    }
}

fn indicator(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
