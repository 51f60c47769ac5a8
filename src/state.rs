//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the text-generation client and a map of live sessions. Each
//! session owns the user's raw input, the most recent cleaned table, the
//! suggested chart type, and the latest insight text. A session is only
//! ever mutated by its own requests; the map lock serializes writers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::chart::ChartKind;
use crate::llm::TextGen;
use crate::table::DataTable;

// =============================================================================
// SESSION STATE
// =============================================================================

/// Per-session state surviving across user interactions. Created with
/// defaults at session start and kept until the process ends — there is
/// no explicit teardown.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Last raw text submitted for cleaning.
    pub raw_input: String,
    /// Most recent cleaned table; `None` until a clean succeeds, and
    /// cleared again when one fails.
    pub cleaned_table: Option<DataTable>,
    /// Chart type suggested by the last successful clean.
    pub suggested_chart: ChartKind,
    /// Latest insight text, or an error description when the insight
    /// call failed. Empty until first requested.
    pub insight_text: String,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, cloneable for Axum. All inner fields are
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionState>>>,
    pub llm: Arc<dyn TextGen>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Arc<dyn TextGen>) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), llm }
    }

    /// Create a fresh session with default state and return its ID.
    pub async fn create_session(&self) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(session_id, SessionState::new());
        session_id
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
