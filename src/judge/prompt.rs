//! Audit prompt construction.
//!
//! Both judge tiers receive the identical prompt; only the model id
//! differs. Context is capped in both count and length so token cost is
//! bounded regardless of how much the retrieval layer returns.

use std::fmt::Write;

use crate::types::EvaluationRequest;

/// System role sent with every judge call.
pub const SYSTEM_INSTRUCTION: &str = "You are a strict QA Auditor. Output ONLY valid JSON.";

/// At most this many context snippets are embedded in the prompt.
pub const MAX_CONTEXT_SNIPPETS: usize = 5;

/// Each embedded snippet is truncated to this many characters.
pub const MAX_SNIPPET_CHARS: usize = 2000;

/// Render the compliance-audit prompt for one interaction.
pub fn build_audit_prompt(request: &EvaluationRequest) -> String {
    let mut context_block = String::new();
    for (i, text) in request
        .context_texts
        .iter()
        .take(MAX_CONTEXT_SNIPPETS)
        .enumerate()
    {
        let snippet: String = text.chars().take(MAX_SNIPPET_CHARS).collect();
        let _ = writeln!(context_block, "[{}] {}", i + 1, snippet);
    }

    format!(
        r#"ROLE: Strict Compliance Auditor for a Medical/Legal Chatbot.

INPUT DATA:
[User Query]: "{query}"
[AI Response]: "{response}"
[Retrieval Context]:
{context}
EVALUATION CRITERIA:
1. RELEVANCE & COMPLETENESS:
   - Does the AI answer the specific question asked?
   - Is the answer complete? (Score 0 if it ignores key details from context).
2. FAITHFULNESS (Hallucination Check):
   - Every claim in the AI response must be supported by the [Retrieval Context].
   - If the AI invents a fact (e.g., a price, location, or service) NOT in the text, it is a Hallucination (Score 0).

OUTPUT FORMAT (JSON Only):
{{
    "relevance_score": <float 0.0-1.0>,
    "faithfulness_score": <float 0.0-1.0>,
    "reasoning": "Concise explanation. Quote the context that supports or contradicts the response."
}}"#,
        query = request.user_query,
        response = request.ai_response,
        context = context_block,
    )
}
