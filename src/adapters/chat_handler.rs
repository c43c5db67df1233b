//! `POST /v1/chat`

use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::Instrument;
use uuid::Uuid;

use crate::adapters::error::ApiError;
use crate::agents::{FailureKind, InvocationOutcome};
use crate::domain::{select_input, ChatRequest, ChatResponse, ValidationError};
use crate::AppState;

/// Validate the conversation, hand its most relevant message to the agent
/// and wrap the reply.
///
/// Message content is never logged; only counts and outcomes are.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);

    async move {
        let Json(request) = payload.map_err(|rejection| {
            tracing::warn!(status = %rejection.status(), "Rejected malformed chat request");
            ApiError::from(rejection)
        })?;

        if let Err(e) = request.validate() {
            tracing::warn!(error = %e, "Rejected invalid conversation");
            return Err(e.into());
        }

        let message_count = request.messages.len();
        let input = select_input(&request.messages)
            .ok_or(ValidationError::EmptyConversation)?
            .to_string();
        drop(request);

        tracing::debug!(message_count, "Invoking agent");
        let started = Instant::now();

        match state.bridge.invoke(input).await {
            InvocationOutcome::Success { text } => {
                tracing::info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Agent responded"
                );
                Ok(Json(ChatResponse::assistant(text)))
            }
            InvocationOutcome::Failure {
                kind: FailureKind::Timeout,
                message,
            } => {
                tracing::warn!(%message, "Agent timed out");
                Err(ApiError::Timeout(message))
            }
            InvocationOutcome::Failure {
                kind: FailureKind::AgentError,
                message,
            } => {
                tracing::error!(%message, "Agent failed");
                Err(ApiError::Agent(message))
            }
        }
    }
    .instrument(span)
    .await
}
