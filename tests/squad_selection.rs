#![cfg(feature = "highs")]

mod common;

use common::*;
use squadopt::{Cell, Position, SolutionStatus, SquadError, SquadRules};

#[test]
fn maximises_value_by_dropping_the_weakest_per_position() {
    let request = base_request();
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert_eq!(sorted_ids(&result), sorted(&BEST_FIFTEEN));
    assert_eq!(result.statistics.total_value, 54.0);
    assert_eq!(result.statistics.total_price, 54.0);
    assert_eq!(result.statistics.target_label, "value");
    assert_eq!(result.statistics.status_text, "Optimal");
    assert_eq!(result.statistics.solver, "HiGHS");
    assert!(result.statistics.excluded.is_empty());
}

#[test]
fn goalkeeper_quota_holds_when_goalkeepers_dominate() {
    let mut values = BASE_VALUES;
    values[..3].copy_from_slice(&[7.0, 8.0, 9.0]);
    let request = request(&values, &BASE_VALUES, &BASE_TEAMS);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert_eq!(sorted_ids(&result), sorted(&BEST_FIFTEEN));
    assert_eq!(result.statistics.total_value, 66.0);
}

#[test]
fn defender_quota_holds_when_defenders_dominate() {
    let mut values = BASE_VALUES;
    values[3..9].copy_from_slice(&[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    let request = request(&values, &BASE_VALUES, &BASE_TEAMS);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert_eq!(sorted_ids(&result), sorted(&BEST_FIFTEEN));
    assert_eq!(result.statistics.total_value, 84.0);
}

#[test]
fn midfielder_quota_holds_when_midfielders_dominate() {
    let mut values = BASE_VALUES;
    values[9..15].copy_from_slice(&[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    let request = request(&values, &BASE_VALUES, &BASE_TEAMS);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert_eq!(sorted_ids(&result), sorted(&BEST_FIFTEEN));
    assert_eq!(result.statistics.total_value, 84.0);
}

#[test]
fn forward_quota_holds_when_forwards_dominate() {
    let mut values = BASE_VALUES;
    values[15..].copy_from_slice(&[7.0, 8.0, 9.0, 10.0]);
    let request = request(&values, &BASE_VALUES, &BASE_TEAMS);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert_eq!(sorted_ids(&result), sorted(&BEST_FIFTEEN));
    assert_eq!(result.statistics.total_value, 72.0);
    assert_eq!(result.by_position(Position::Forward).len(), 3);
}

#[test]
fn team_cap_drops_the_cheapest_loss_among_four_teammates() {
    // terry, lampard, giroud and jesus all play for Chelsea; losing lampard
    // costs 5.5, losing any of the others costs 6
    let mut values = BASE_VALUES;
    values[4] = 7.0;
    values[11] = 6.5;
    values[17] = 7.0;
    values[18] = 8.0;
    let mut teams = BASE_TEAMS;
    teams[18] = "Chelsea";
    let request = request(&values, &BASE_VALUES, &teams);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert_eq!(result.roster.len(), 15);
    assert!(!result.contains("lampard"));
    assert!(result.contains("westwood"));
    for id in ["terry", "giroud", "jesus"] {
        assert!(result.contains(id), "{} should be selected", id);
    }
    assert_eq!(result.statistics.total_value, 65.0);
}

#[test]
fn team_cap_with_tied_teammates_keeps_the_optimal_total() {
    let mut values = BASE_VALUES;
    values[4] = 7.0;
    values[11] = 7.0;
    values[17] = 7.0;
    values[18] = 8.0;
    let mut teams = BASE_TEAMS;
    teams[18] = "Chelsea";
    let request = request(&values, &BASE_VALUES, &teams);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert_eq!(result.statistics.total_value, 65.0);
}

#[test]
fn player_priced_over_the_headroom_is_left_out() {
    let mut prices = BASE_VALUES;
    prices[14] = 99.0;
    let request = request(&BASE_VALUES, &prices, &BASE_TEAMS);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert!(!result.contains("henderson"));
    assert!(result.contains("westwood"));
    assert_eq!(result.statistics.total_price, 49.0);
    assert_eq!(result.statistics.total_value, 49.0);
}

#[test]
fn squad_costing_exactly_the_budget_is_allowed() {
    let mut prices = BASE_VALUES;
    prices[14] = 52.0;
    let request = request(&BASE_VALUES, &prices, &BASE_TEAMS);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert_eq!(sorted_ids(&result), sorted(&BEST_FIFTEEN));
    assert_eq!(result.statistics.total_price, 100.0);
}

#[test]
fn fractional_prices_are_rounded_in_the_output() {
    let prices: Vec<f64> = BASE_VALUES.iter().map(|p| p + 0.3333).collect();
    let request = request(&BASE_VALUES, &prices, &BASE_TEAMS);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    let pope = result.roster.iter().find(|e| e.id == "pope").unwrap();
    assert_eq!(pope.price, 3.33);
    // 54 + 15 * 0.3333
    assert_eq!(result.statistics.total_price, 59.0);
}

#[test]
fn numeric_strings_are_accepted() {
    let mut request = base_request();
    request.values = BASE_VALUES.iter().map(|v| Cell::from(format!("{:.1}", v))).collect();
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert_eq!(result.statistics.total_value, 54.0);
}

#[test]
fn forced_low_value_player_is_selected() {
    let request = base_request().with_forced(["degea"]);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert!(result.contains("degea"));
    assert!(!result.contains("martinez"));
    assert_eq!(result.statistics.total_value, 53.0);
}

#[test]
fn duplicate_and_unknown_forced_ids_are_harmless() {
    let request = base_request().with_forced(["degea", "degea", "pele"]);
    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert!(result.contains("degea"));
    assert_eq!(result.statistics.total_value, 53.0);
}

#[test]
fn forcing_three_goalkeepers_is_infeasible() {
    let request = base_request().with_forced(["degea", "martinez", "pope"]);
    let result = optimizer().optimize(&request).unwrap();

    assert_eq!(result.statistics.status, SolutionStatus::Infeasible);
    assert_eq!(result.statistics.status_text, "Infeasible");
    assert!(result.roster.is_empty());
    assert_eq!(result.statistics.total_value, 0.0);
}

#[test]
fn forcing_over_budget_is_infeasible() {
    let mut prices = BASE_VALUES;
    prices[14] = 99.0;
    let request = request(&BASE_VALUES, &prices, &BASE_TEAMS).with_forced(["henderson"]);
    let result = optimizer().optimize(&request).unwrap();

    assert_eq!(result.statistics.status, SolutionStatus::Infeasible);
    assert!(result.roster.is_empty());
}

#[test]
fn too_few_goalkeepers_is_infeasible() {
    let mut request = base_request();
    request.positions[0] = "Defender".to_string();
    request.positions[1] = "Defender".to_string();
    let result = optimizer().optimize(&request).unwrap();

    assert_eq!(result.statistics.status, SolutionStatus::Infeasible);
    assert!(result.roster.is_empty());
}

#[test]
fn all_zero_values_are_rejected() {
    let request = request(&[0.0; 19], &BASE_VALUES, &BASE_TEAMS);
    let err = optimizer().optimize(&request).unwrap_err();
    assert!(matches!(err, SquadError::DegenerateObjective));
}

#[test]
fn unknown_position_never_enters_the_squad() {
    let mut request = base_request();
    request.ids.push("ronaldo".to_string());
    request.positions.push("Striker".to_string());
    request.values.push(Cell::from(100.0));
    request.prices.push(Cell::from(1.0));
    request.teams.push("Villa".to_string());

    let result = optimizer().optimize(&request).unwrap();

    assert_valid_squad(&request, &result, &SquadRules::default());
    assert!(!result.contains("ronaldo"));
    assert_eq!(result.statistics.excluded, vec!["ronaldo".to_string()]);
    assert_eq!(result.statistics.total_value, 54.0);
}

#[test]
fn mismatched_columns_are_rejected_before_solving() {
    let mut request = base_request();
    request.prices.pop();
    assert!(matches!(
        optimizer().optimize(&request),
        Err(SquadError::LengthMismatch { column: "prices", .. })
    ));
}

#[test]
fn result_serializes_for_the_presenter() {
    let result = optimizer().optimize(&base_request()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["statistics"]["status"], "Optimal");
    assert_eq!(json["statistics"]["total_value"], 54.0);
    assert_eq!(json["roster"].as_array().unwrap().len(), 15);
    assert_eq!(json["roster"][0]["position"], "Goalkeeper");
}
