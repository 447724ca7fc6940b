//! Gemini-powered narrator
//!
//! Sends the numeric plan as JSON and asks for a short explanation. The model
//! is told not to alter or invent figures.

use crate::gemini::GeminiClient;
use crate::narrative::{NarrativeContext, NarrativeGenerator};
use crate::Result;
use async_trait::async_trait;

const SYSTEM_PROMPT: &str = r#"You are a personal finance planner explaining a savings plan.

Guidelines:
- Use only the figures provided; never change or invent numbers
- Be encouraging, concise and practical (at most 120 words)
- If the plan is infeasible, explain the suggested longer timeframe
- Amounts are in Indian Rupees (₹)

Format: plain prose, no markdown headings."#;

pub struct GeminiNarrator {
    client: GeminiClient,
}

impl GeminiNarrator {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            client: GeminiClient::new(api_key)?,
        })
    }

    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }

    fn build_prompt(context: &NarrativeContext<'_>) -> Result<String> {
        let numbers = serde_json::to_string_pretty(context)?;
        Ok(format!(
            "Explain this savings plan to the user.\n\nPLAN:\n{}\n",
            numbers
        ))
    }
}

/// Map a hex plan seed onto Gemini's integer seed
pub fn gemini_seed(seed: &str) -> Option<i32> {
    let prefix = seed.get(..8)?;
    u32::from_str_radix(prefix, 16).ok().map(|v| v as i32)
}

#[async_trait]
impl NarrativeGenerator for GeminiNarrator {
    async fn generate_narrative(&self, context: &NarrativeContext<'_>, seed: &str) -> Result<String> {
        let prompt = Self::build_prompt(context)?;
        self.client
            .generate(&prompt, SYSTEM_PROMPT, gemini_seed(seed))
            .await
    }
}
