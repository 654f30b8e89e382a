use serde::{Deserialize, Serialize};

use super::value_objects::{Position, SolutionStatus};

/// A player eligible for selection, after input validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    /// `None` when the feed label is not one of the four canonical positions.
    pub position: Option<Position>,
    pub value: f64,
    pub price: f64,
    pub team: String,
}

/// Required number of selected players per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PositionQuotas {
    pub goalkeepers: u32,
    pub defenders: u32,
    pub midfielders: u32,
    pub forwards: u32,
}

impl PositionQuotas {
    pub fn quota(&self, position: Position) -> u32 {
        match position {
            Position::Goalkeeper => self.goalkeepers,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    pub fn squad_size(&self) -> u32 {
        Position::ALL.iter().map(|p| self.quota(*p)).sum()
    }
}

impl Default for PositionQuotas {
    fn default() -> Self {
        Self {
            goalkeepers: 2,
            defenders: 5,
            midfielders: 5,
            forwards: 3,
        }
    }
}

/// Squad-building rules: quotas, budget ceiling and per-team cap.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SquadRules {
    pub quotas: PositionQuotas,
    pub budget: f64,
    pub max_per_team: u32,
}

impl Default for SquadRules {
    fn default() -> Self {
        Self {
            quotas: PositionQuotas::default(),
            budget: 100.0,
            max_per_team: 3,
        }
    }
}

/// One selected player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub id: String,
    pub position: Position,
    /// Rounded to two decimals.
    pub price: f64,
    pub value: f64,
}

/// Summary of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadStatistics {
    pub status: SolutionStatus,
    /// `status` rendered for display, e.g. "Optimal" or "Infeasible".
    pub status_text: String,
    /// Name of the metric that was maximised. Echoed back, never interpreted.
    pub target_label: String,
    pub total_price: f64,
    /// Objective value reported by the solver.
    pub total_value: f64,
    pub message: String,
    pub solver: String,
    pub solve_time_ms: f64,
    /// Candidates left out of the model because their position was not recognised.
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadResult {
    pub roster: Vec<RosterEntry>,
    pub statistics: SquadStatistics,
}

impl SquadResult {
    pub fn is_optimal(&self) -> bool {
        self.statistics.status == SolutionStatus::Optimal
    }

    /// Selected players in one position, in input order.
    pub fn by_position(&self, position: Position) -> Vec<&RosterEntry> {
        self.roster
            .iter()
            .filter(|entry| entry.position == position)
            .collect()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.roster.iter().map(|entry| entry.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.roster.iter().any(|entry| entry.id == id)
    }
}

/// Round to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
