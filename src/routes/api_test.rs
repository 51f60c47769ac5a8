use super::*;
use crate::state::test_helpers::{MockLlm, sample_table, seed_session_with_table, test_app_state};
use crate::table::Cell;
use std::sync::Arc;

fn envelope(csv: &str, chart: &str) -> String {
    serde_json::json!({ "csv": csv, "chart": chart }).to_string()
}

// =========================================================================
// session lifecycle
// =========================================================================

#[tokio::test]
async fn create_then_get_session_snapshot() {
    let state = test_app_state(Arc::new(MockLlm::new(vec![])));
    let Json(created) = create_session(State(state.clone())).await;

    let Json(snapshot) = get_session(State(state), Path(created.session_id))
        .await
        .unwrap();
    assert_eq!(snapshot.session_id, created.session_id);
    assert!(snapshot.table.is_none());
    assert_eq!(snapshot.suggested_chart, ChartKind::Bar);
    assert!(snapshot.config.is_none());
}

#[tokio::test]
async fn get_unknown_session_is_404() {
    let state = test_app_state(Arc::new(MockLlm::new(vec![])));
    let err = get_session(State(state), Path(Uuid::new_v4())).await.unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sample_returns_builtin_text() {
    let Json(response) = sample().await;
    assert!(response.text.contains("Monthly Product Sales"));
    assert!(response.text.contains("Product A, Jan, $12,500"));
}

// =========================================================================
// clean endpoint
// =========================================================================

#[tokio::test]
async fn clean_returns_snapshot_with_defaults() {
    let mock = Arc::new(MockLlm::new(vec![Ok(envelope("Category,Value\nA,1\nB,2\nC,3", "bar"))]));
    let state = test_app_state(mock);
    let Json(created) = create_session(State(state.clone())).await;

    let Json(snapshot) = clean(
        State(state),
        Path(created.session_id),
        Json(CleanBody { raw_text: "A,1\nB,2\nC,3".into() }),
    )
    .await
    .unwrap();

    let table = snapshot.table.unwrap();
    assert_eq!(table.column_names(), vec!["Category", "Value"]);
    assert_eq!(snapshot.suggested_chart, ChartKind::Bar);
    let config = snapshot.config.unwrap();
    assert_eq!(config.title, "Value by Category");
    assert!(snapshot.insight_text.is_empty());
}

#[tokio::test]
async fn clean_empty_input_is_400() {
    let mock = Arc::new(MockLlm::new(vec![]));
    let state = test_app_state(mock.clone());
    let Json(created) = create_session(State(state.clone())).await;

    let err = clean(State(state), Path(created.session_id), Json(CleanBody { raw_text: String::new() }))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn clean_llm_transport_failure_is_502() {
    use crate::llm::types::LlmError;
    let mock = Arc::new(MockLlm::new(vec![Err(LlmError::ApiRequest("timeout".into()))]));
    let state = test_app_state(mock);
    let Json(created) = create_session(State(state.clone())).await;

    let err = clean(State(state), Path(created.session_id), Json(CleanBody { raw_text: "data".into() }))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn clean_bad_envelope_is_422() {
    let mock = Arc::new(MockLlm::new(vec![Ok("nope".into())]));
    let state = test_app_state(mock);
    let Json(created) = create_session(State(state.clone())).await;

    let err = clean(State(state), Path(created.session_id), Json(CleanBody { raw_text: "data".into() }))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =========================================================================
// chart endpoint
// =========================================================================

#[tokio::test]
async fn chart_builds_spec_from_stored_table() {
    let state = test_app_state(Arc::new(MockLlm::new(vec![])));
    let session_id = seed_session_with_table(&state, sample_table()).await;

    let config = ChartConfig {
        kind: ChartKind::Bar,
        x: "Category".into(),
        y: "Value".into(),
        title: "Value by Category".into(),
    };
    let Json(spec) = chart(State(state), Path(session_id), Json(config)).await.unwrap();
    match spec {
        ChartSpec::Xy { points, .. } => {
            assert_eq!(points.len(), 3);
            assert_eq!(points[0].label, "A");
        }
        ChartSpec::Pie { .. } => panic!("expected xy spec"),
    }
}

#[tokio::test]
async fn chart_render_failure_is_422_and_keeps_table() {
    let state = test_app_state(Arc::new(MockLlm::new(vec![])));
    let table = crate::table::DataTable::from_csv("Category,Note\nA,hello\n").unwrap();
    let session_id = seed_session_with_table(&state, table).await;

    let config = ChartConfig { kind: ChartKind::Bar, x: "Category".into(), y: "Note".into(), title: "t".into() };
    let err = chart(State(state.clone()), Path(session_id), Json(config))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

    // Render failures must not disturb stored state.
    let sessions = state.sessions.read().await;
    let session = sessions.get(&session_id).unwrap();
    let note = session.cleaned_table.as_ref().unwrap().column("Note").unwrap();
    assert_eq!(note.values[0], Cell::Text("hello".into()));
}

#[tokio::test]
async fn chart_without_table_is_409() {
    let state = test_app_state(Arc::new(MockLlm::new(vec![])));
    let Json(created) = create_session(State(state.clone())).await;

    let config = ChartConfig { kind: ChartKind::Line, x: "A".into(), y: "B".into(), title: "t".into() };
    let err = chart(State(state), Path(created.session_id), Json(config))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);
}

// =========================================================================
// insight endpoint
// =========================================================================

#[tokio::test]
async fn insight_endpoint_returns_text() {
    let mock = Arc::new(MockLlm::replying("- do the thing"));
    let state = test_app_state(mock);
    let session_id = seed_session_with_table(&state, sample_table()).await;

    let Json(response) = insight(State(state), Path(session_id)).await.unwrap();
    assert_eq!(response.insight, "- do the thing");
}

#[tokio::test]
async fn insight_without_table_is_409() {
    let state = test_app_state(Arc::new(MockLlm::new(vec![])));
    let Json(created) = create_session(State(state.clone())).await;

    let err = insight(State(state), Path(created.session_id)).await.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);
}
