//! Integration tests for choice resolution.

use grapher_decision::{ChoiceState, DecisionMatrix, ExplorerSession, GrapherTab, Resolution};
use grapher_model::{GrapherError, ResolverOptions};
use proptest::prelude::*;

fn matrix(rows: &[&[&str]]) -> DecisionMatrix {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
        .collect();
    DecisionMatrix::from_matrix(&rows).expect("valid matrix")
}

fn emissions() -> DecisionMatrix {
    matrix(&[
        &["Gas Radio", "Count Radio", "yVariableIds", "hasMapTab", "tab"],
        &["CO₂", "Per capita", "1", "true", "map"],
        &["CO₂", "Per country", "2", "false", ""],
        &["CH₄", "Per country", "3", "true", ""],
        &["All GHGs", "Per country", "4", "true", ""],
    ])
}

#[test]
fn unmatched_state_falls_back_to_first_available_row() {
    let m = emissions();
    let initial = ChoiceState::new()
        .with("Gas", "All GHGs")
        .with("Count", "Per capita");
    assert_eq!(m.resolve_exact(&initial), Resolution::NoMatchingRow);

    let changed = initial.clone().with("Gas", "CO₂");
    let first = m.resolve(&changed);
    assert_eq!(first.row().and_then(|row| row.field("yVariableIds")), Some("1"));

    let mut session = ExplorerSession::with_state(&m, ResolverOptions::default(), &initial);
    assert_eq!(session.state().get("Count"), Some("Per country"));

    let resolution = session.set_choice("Gas", "CO₂").expect("known dimension");
    let row = resolution.row().expect("resolves");
    assert_eq!(row.choice("Gas"), Some("CO₂"));
    assert_eq!(session.state().get("Gas"), Some("CO₂"));
}

#[test]
fn availability_follows_earlier_dimensions() {
    let m = emissions();
    let state = ChoiceState::new().with("Gas", "CH₄");
    assert_eq!(
        m.available_options(&state, "Count").expect("known dimension"),
        vec!["Per country"]
    );
    assert!(!m.is_option_available(&state, "Count", "Per capita").expect("known"));
    assert!(m.is_option_available(&state, "Gas", "CO₂").expect("known"));

    let choices = m.choices_with_availability(&state);
    let count = &choices[1];
    assert_eq!(count.selected.as_deref(), Some("Per country"));
    assert_eq!(
        count
            .options
            .iter()
            .map(|option| option.available)
            .collect::<Vec<_>>(),
        vec![false, true]
    );
}

#[test]
fn tab_is_kept_when_the_new_row_offers_it() {
    let m = emissions();
    let mut session = ExplorerSession::new(&m, ResolverOptions::default());
    assert_eq!(session.tab(), Some(GrapherTab::MAP));

    session.set_choice("Gas", "CH₄").expect("known dimension");
    assert_eq!(session.tab(), Some(GrapherTab::MAP));

    session.set_choice("Gas", "CO₂").expect("known dimension");
    assert_eq!(session.state().get("Count"), Some("Per country"));
    assert_eq!(session.tab(), Some(GrapherTab::CHART));
}

#[test]
fn tab_resets_when_preservation_is_off() {
    let m = emissions();
    let mut session = ExplorerSession::new(&m, ResolverOptions { preserve_tab: false });
    assert!(session.set_tab("table"));
    session.set_choice("Gas", "CH₄").expect("known dimension");
    assert_eq!(session.tab(), Some(GrapherTab::CHART));
    assert!(!ExplorerSession::new(&m, ResolverOptions::default()).set_tab("globe"));
}

#[test]
fn unknown_dimension_is_an_error() {
    let m = emissions();
    let mut session = ExplorerSession::new(&m, ResolverOptions::default());
    assert_eq!(
        session.set_choice("Sector", "Energy").map(|r| r.is_resolved()),
        Err(GrapherError::UnknownDimension("Sector".to_string()))
    );
}

#[test]
fn resolved_row_serializes_for_collaborators() {
    let m = emissions();
    let row = m.resolve(&m.default_state()).row().expect("resolves").clone();
    let json = serde_json::to_value(&row).expect("serialize");
    assert_eq!(json["fields"]["yVariableIds"], "1");
    assert_eq!(json["choices"]["Gas"], "CO₂");
}

proptest! {
    #[test]
    fn resolution_is_deterministic_and_first_wins(
        rows in prop::collection::vec((0u8..3, 0u8..3), 1..12),
        gas in 0u8..3,
        count in 0u8..3,
    ) {
        let mut text: Vec<Vec<String>> = vec![vec!["Gas Radio".into(), "Count Radio".into(), "id".into()]];
        for (index, (g, c)) in rows.iter().enumerate() {
            text.push(vec![format!("g{g}"), format!("c{c}"), index.to_string()]);
        }
        let m = DecisionMatrix::from_matrix(&text).expect("valid matrix");
        let state = ChoiceState::new().with("Gas", format!("g{gas}")).with("Count", format!("c{count}"));

        let first = m.resolve(&state);
        prop_assert_eq!(&first, &m.resolve(&state));

        let row = first.row().expect("non-empty matrix always resolves");
        let resolved = first.state().expect("resolved state");
        let earliest = m.rows().iter().position(|candidate| {
            candidate.choice("Gas") == resolved.get("Gas")
                && candidate.choice("Count") == resolved.get("Count")
        });
        prop_assert_eq!(Some(row.index), earliest);
    }
}
