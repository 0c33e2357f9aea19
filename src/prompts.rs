//! Prompt construction for the three generation calls.
//!
//! Kept in one module so the exact wording sent to the model service stays
//! greppable and unit-tested.

use crate::external::ExternalSnippet;

/// Fixed instruction for the Vision stage: extract pollution-relevant cues.
pub const VISION_INSTRUCTION: &str =
    "Describe this image for air quality monitoring: pollution levels, location hints, hazards.";

/// Classification/forecast prompt for the Analysis stage. When a conditions
/// snippet is available it is appended to the prompt, not sent as a separate
/// turn.
pub fn analysis_prompt(observation: &str, external: Option<&ExternalSnippet>) -> String {
    let mut prompt = format!(
        "Analyze urban air quality from: {observation}. \
         Forecast impacts (health, resources). Suggest optimizations."
    );
    if let Some(snippet) = external {
        prompt.push_str(&format!(
            " External data ({}): {}",
            snippet.source, snippet.value
        ));
    }
    prompt
}

/// Final synthesis prompt. `vision` may be empty for non-image runs; the
/// context block always carries all three fields so runs are comparable.
pub fn orchestration_prompt(intake: &str, vision: &str, analysis: &str) -> String {
    let context = format!("{intake}\nVision: {vision}\nAnalysis: {analysis}");
    format!(
        "Orchestrate response: Summarize air quality issue from {context}. \
         Provide recommendations, alerts, and optimizations. Keep concise."
    )
}
