// Mappers: Convert the tabular roster handed over by the caller into domain candidates
// Column validation happens here so the optimizer only ever sees well-formed input

use std::collections::HashSet;

use serde::Deserialize;
use tracing::warn;

use super::squad_optimizer::{SquadError, SquadModel};
use crate::domain::{
    round2, Candidate, Position, RosterEntry, Solution, SolutionStatus, SquadResult,
    SquadStatistics,
};

/// Solved values above this count as "selected".
const SELECTION_THRESHOLD: f64 = 0.5;

/// Slack allowed when re-checking rows against the rounded selection.
const ROW_TOLERANCE: f64 = 1e-6;

/// A numeric cell as it arrives from the roster table: either a number or a
/// numeric string such as `"7.5"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn to_f64(&self) -> Option<f64> {
        let x = match self {
            Cell::Number(x) => *x,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        x.is_finite().then_some(x)
    }

    fn raw(&self) -> String {
        match self {
            Cell::Number(x) => x.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Number(x)
    }
}

impl From<i32> for Cell {
    fn from(x: i32) -> Self {
        Cell::Number(x.into())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// One optimization call: five parallel columns plus the target label and
/// optional forced selections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SquadRequest {
    pub ids: Vec<String>,
    pub positions: Vec<String>,
    pub values: Vec<Cell>,
    pub prices: Vec<Cell>,
    pub teams: Vec<String>,
    pub target_label: String,
    #[serde(default)]
    pub forced_ids: Vec<String>,
}

impl SquadRequest {
    pub fn new(
        ids: impl IntoIterator<Item = impl Into<String>>,
        positions: impl IntoIterator<Item = impl Into<String>>,
        values: impl IntoIterator<Item = impl Into<Cell>>,
        prices: impl IntoIterator<Item = impl Into<Cell>>,
        teams: impl IntoIterator<Item = impl Into<String>>,
        target_label: impl Into<String>,
    ) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            positions: positions.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
            prices: prices.into_iter().map(Into::into).collect(),
            teams: teams.into_iter().map(Into::into).collect(),
            target_label: target_label.into(),
            forced_ids: Vec::new(),
        }
    }

    pub fn with_forced(mut self, forced: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.forced_ids = forced.into_iter().map(Into::into).collect();
        self
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn check_len(column: &'static str, expected: usize, found: usize) -> Result<(), SquadError> {
    if expected == found {
        Ok(())
    } else {
        Err(SquadError::LengthMismatch {
            column,
            expected,
            found,
        })
    }
}

fn parse_column(column: &'static str, cells: &[Cell]) -> Result<Vec<f64>, SquadError> {
    cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            cell.to_f64().ok_or_else(|| SquadError::NonNumeric {
                column,
                index,
                raw: cell.raw(),
            })
        })
        .collect()
}

/// Validate the request columns and zip them into candidates.
///
/// Unknown position labels are kept as `position: None`; deciding what to do
/// with them is left to the optimizer.
pub fn request_to_candidates(request: &SquadRequest) -> Result<Vec<Candidate>, SquadError> {
    let n = request.ids.len();
    check_len("positions", n, request.positions.len())?;
    check_len("values", n, request.values.len())?;
    check_len("prices", n, request.prices.len())?;
    check_len("teams", n, request.teams.len())?;

    let mut seen = HashSet::with_capacity(n);
    for id in &request.ids {
        if !seen.insert(id.as_str()) {
            return Err(SquadError::DuplicateId(id.clone()));
        }
    }

    let values = parse_column("values", &request.values)?;
    let prices = parse_column("prices", &request.prices)?;

    Ok((0..n)
        .map(|i| Candidate {
            id: request.ids[i].clone(),
            position: Position::from_label(&request.positions[i]),
            value: values[i],
            price: prices[i],
            team: request.teams[i].clone(),
        })
        .collect())
}

/// Decode a solver answer into the caller-facing roster and statistics.
///
/// Rows are only produced for an optimal answer; any other status yields an
/// empty roster with the status and solver message carried through verbatim.
pub fn solution_to_result(
    candidates: &[Candidate],
    model: &SquadModel,
    solution: &Solution,
    target_label: &str,
    solver_name: &str,
) -> SquadResult {
    let mut roster = Vec::new();
    let mut total_price = 0.0;
    let mut total_value = 0.0;

    if solution.status == SolutionStatus::Optimal {
        let mut selection = vec![0.0; model.columns.len()];
        for (col, &i) in model.columns.iter().enumerate() {
            let picked = solution
                .variable_values
                .get(col)
                .is_some_and(|&x| x > SELECTION_THRESHOLD);
            if !picked {
                continue;
            }
            let candidate = &candidates[i];
            let Some(position) = candidate.position else {
                continue;
            };
            selection[col] = 1.0;
            total_price += candidate.price;
            roster.push(RosterEntry {
                id: candidate.id.clone(),
                position,
                price: round2(candidate.price),
                value: candidate.value,
            });
        }

        let recomputed = model.problem.objective.evaluate(&selection);
        total_value = solution.optimal_value.unwrap_or(recomputed);
        if (total_value - recomputed).abs() > 1e-6 * total_value.abs().max(1.0) {
            warn!(
                reported = total_value,
                recomputed,
                "Solver objective disagrees with the decoded selection"
            );
        }
        for row in &model.problem.constraints {
            if !row.is_satisfied_by(&selection, ROW_TOLERANCE) {
                warn!(row = %row.name, "Decoded selection violates a model row");
            }
        }
    }

    SquadResult {
        roster,
        statistics: SquadStatistics {
            status: solution.status,
            status_text: solution.status.to_string(),
            target_label: target_label.to_string(),
            total_price: round2(total_price),
            total_value: round2(total_value),
            message: solution.message.clone(),
            solver: solver_name.to_string(),
            solve_time_ms: solution.statistics.solve_time_ms,
            excluded: model
                .excluded
                .iter()
                .map(|&i| candidates[i].id.clone())
                .collect(),
        },
    }
}
