//! Insight service — cleaned table → short actionable suggestions.
//!
//! DESIGN
//! ======
//! One plain-text LLM call at moderate temperature; successive calls may
//! legitimately differ. Failures are deliberately soft: the error
//! description itself becomes the stored insight text so it renders
//! visibly instead of dropping silently. The latest insight always
//! overwrites the previous one — no history is kept.

use std::sync::{Arc, OnceLock};

use tracing::{info, warn};
use uuid::Uuid;

use crate::llm::types::GenerationRequest;
use crate::state::AppState;

const DEFAULT_INSIGHT_MAX_TOKENS: u32 = 1024;
const INSIGHT_TEMPERATURE: f32 = 0.5;

fn insight_max_tokens() -> u32 {
    static VALUE: OnceLock<u32> = OnceLock::new();
    *VALUE.get_or_init(|| {
        std::env::var("INSIGHT_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_INSIGHT_MAX_TOKENS)
    })
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("no cleaned table — clean some data first")]
    NoTable,
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Handle one "Get AI Suggestions" action.
///
/// The returned string is what ends up in `insight_text`: either genuine
/// model output or an error description. An LLM failure is never an
/// `Err` here — only a missing session or missing table is.
///
/// # Errors
///
/// Returns [`InsightError::SessionNotFound`] or [`InsightError::NoTable`].
pub async fn handle_insight(state: &AppState, session_id: Uuid) -> Result<String, InsightError> {
    let table_text = {
        let sessions = state.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or(InsightError::SessionNotFound(session_id))?;
        session
            .cleaned_table
            .as_ref()
            .ok_or(InsightError::NoTable)?
            .to_text()
    };

    info!(%session_id, "insight: request received");

    let llm = Arc::clone(&state.llm);
    let request = GenerationRequest {
        prompt: build_insight_prompt(&table_text),
        temperature: INSIGHT_TEMPERATURE,
        max_tokens: insight_max_tokens(),
        json_object: false,
    };

    let insight = match llm.generate(&request).await {
        Ok(completion) => {
            info!(
                %session_id,
                model = %completion.model,
                input_tokens = completion.input_tokens,
                output_tokens = completion.output_tokens,
                "insight: LLM response"
            );
            completion.text
        }
        Err(e) => {
            // Fail visibly, fail soft: the error text renders in place of
            // the insight instead of crashing the interaction.
            warn!(%session_id, error = %e, "insight: request failed");
            format!("An error occurred: {e}")
        }
    };

    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or(InsightError::SessionNotFound(session_id))?;
    session.insight_text = insight.clone();
    Ok(insight)
}

// =============================================================================
// PROMPT
// =============================================================================

pub(crate) fn build_insight_prompt(table_text: &str) -> String {
    format!(
        "You are a helpful business analyst. Based on the following data, provide 2-3 simple, \
         actionable suggestions to improve the outcome (e.g. increase sales, find trends).\n\
         Format your response as a concise markdown list. Be brief and to the point.\n\n\
         Data:\n```\n{table_text}```"
    )
}

#[cfg(test)]
#[path = "insight_test.rs"]
mod tests;
