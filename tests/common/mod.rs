//! Shared fixtures for the integration tests.
//!
//! The base roster has 19 players: 3 goalkeepers, 6 defenders, 6 midfielders
//! and 4 forwards. Within each position the value rises with input order, so
//! the cheapest-to-drop player is always the first one of its position.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Once};

use squadopt::{HighsSolver, Position, SquadOptimizer, SquadRequest, SquadResult, SquadRules};

pub const NAMES: [&str; 19] = [
    "degea", "martinez", "pope",
    "yedlin", "terry", "rose", "bissaka", "stones", "lascelles",
    "westwood", "debruyne", "lampard", "alli", "salah", "henderson",
    "firminio", "rashford", "giroud", "jesus",
];

pub const POSITIONS: [&str; 19] = [
    "Goalkeeper", "Goalkeeper", "Goalkeeper",
    "Defender", "Defender", "Defender", "Defender", "Defender", "Defender",
    "Midfielder", "Midfielder", "Midfielder", "Midfielder", "Midfielder", "Midfielder",
    "Forward", "Forward", "Forward", "Forward",
];

pub const BASE_VALUES: [f64; 19] = [
    1.0, 2.0, 3.0,
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0,
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0,
    1.0, 2.0, 3.0, 4.0,
];

pub const BASE_TEAMS: [&str; 19] = [
    "ManUtd", "Villa", "Burnley",
    "Newcastle", "Chelsea", "Tottenham", "ManUtd", "ManCity", "Newcastle",
    "Burnley", "ManCity", "Chelsea", "Tottenham", "Liverpool", "Liverpool",
    "Liverpool", "ManUtd", "Chelsea", "ManCity",
];

/// Everyone except the lowest-value player of each position.
pub const BEST_FIFTEEN: [&str; 15] = [
    "martinez", "pope",
    "terry", "rose", "bissaka", "stones", "lascelles",
    "debruyne", "lampard", "alli", "salah", "henderson",
    "rashford", "giroud", "jesus",
];

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("squadopt=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn optimizer() -> SquadOptimizer {
    init_tracing();
    SquadOptimizer::new(Arc::new(HighsSolver::new()))
}

pub fn request(values: &[f64], prices: &[f64], teams: &[&str]) -> SquadRequest {
    SquadRequest::new(
        NAMES,
        POSITIONS,
        values.iter().copied(),
        prices.iter().copied(),
        teams.iter().copied(),
        "value",
    )
}

pub fn base_request() -> SquadRequest {
    request(&BASE_VALUES, &BASE_VALUES, &BASE_TEAMS)
}

pub fn sorted_ids(result: &SquadResult) -> Vec<String> {
    let mut ids: Vec<String> = result.roster.iter().map(|e| e.id.clone()).collect();
    ids.sort();
    ids
}

pub fn sorted(names: &[&str]) -> Vec<String> {
    let mut ids: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    ids.sort();
    ids
}

/// Assert every squad rule against the request the result came from.
pub fn assert_valid_squad(request: &SquadRequest, result: &SquadResult, rules: &SquadRules) {
    assert!(result.is_optimal(), "status was {}", result.statistics.status_text);

    for position in Position::ALL {
        assert_eq!(
            result.by_position(position).len() as u32,
            rules.quotas.quota(position),
            "wrong number of {}s",
            position
        );
    }

    let index: HashMap<&str, usize> = request
        .ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut per_team: HashMap<&str, u32> = HashMap::new();
    let mut price = 0.0;
    let mut value = 0.0;
    for entry in &result.roster {
        let i = index[entry.id.as_str()];
        *per_team.entry(request.teams[i].as_str()).or_default() += 1;
        price += request.prices[i].to_f64().unwrap();
        value += request.values[i].to_f64().unwrap();
    }

    assert!(price <= rules.budget + 1e-6, "over budget: {}", price);
    for (team, count) in per_team {
        assert!(count <= rules.max_per_team, "{} has {} players", team, count);
    }
    assert!(
        (result.statistics.total_value - value).abs() < 0.01,
        "reported {} but selection sums to {}",
        result.statistics.total_value,
        value
    );
}
