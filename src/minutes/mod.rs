//! Meeting minutes extraction: request validation, prompt contract,
//! completion and reconciliation of the model's reply.

pub mod reconcile;
pub mod request;
pub mod schema;
pub mod timestamps;

use crate::error::Result;
use crate::llm::prompts;
use crate::llm::CompletionClient;

pub use request::RequestConfig;
pub use schema::{ActionItem, SchemaVariant, Sentiment, StructuredResult, TimelineEntry};

/// Run one request end to end. Invalid requests are rejected before the
/// client is called; completion errors propagate untouched.
pub async fn generate_minutes(
    client: &dyn CompletionClient,
    request: &RequestConfig,
) -> Result<StructuredResult> {
    request.validate()?;

    let variant = SchemaVariant::for_request(request);
    if request.include_timeline && !variant.timeline {
        tracing::info!("No timestamp cues in transcript, timeline disabled");
    }

    let prompt = prompts::render_prompt(request, variant);
    tracing::info!(
        "Rendered prompt: {} chars (timeline: {}, sentiment: {}, dated: {})",
        prompt.len(),
        variant.timeline,
        variant.sentiment,
        request.meeting_date.is_some()
    );

    let raw = client.complete(&prompt).await?;
    let result = reconcile::reconcile(&raw, request, variant)?;

    tracing::info!(
        "Extracted {} action items, {} summary points",
        result.action_items.len(),
        result.summary_short.len()
    );
    Ok(result)
}
