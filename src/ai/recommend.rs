use crate::ai::common::{build_chat_body, request_completion, GROQ_CHAT_URL};
use crate::ai::prompts::build_plan_prompt;
use crate::profile::UserProfile;
use anyhow::Result;
use tracing::instrument;

/// Ask the completion API for a diet and workout plan.
///
/// Returns the model's raw free-text reply; splitting it into sections is
/// [`crate::extract::extract`]'s job. `url` overrides the Groq endpoint in
/// tests.
#[instrument(level = "trace", skip(api_key, profile))]
pub async fn request_plan(
    api_key: &str,
    model: &str,
    profile: &UserProfile,
    labels: &[String],
    url: Option<&str>,
) -> Result<String> {
    let url = url.unwrap_or(GROQ_CHAT_URL);
    let prompt = build_plan_prompt(profile, labels);
    let body = build_chat_body(model, &prompt);

    request_completion(api_key, &body, url).await
}
