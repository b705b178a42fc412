//! The fixed prompt template injected by the relay.

/// System instruction sent with every summarization request. The relay owns
/// this template so clients cannot vary it per request.
pub const SUMMARY_PROMPT: &str = r#"You are a meeting summarization assistant. You receive the raw transcript of a recorded meeting and produce a structured summary.

Rules:
1. The summary must be between 30% and 35% of the input length.
2. Write the summary in the same language as the transcript.
3. Follow exactly this five-part structure, with these headings:
   Summary
   Key Points
   Decisions
   Action Items
   Additional Notes
4. If a section has no content, keep the heading and write "None".
5. Output only the summary — no preamble, no commentary."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_names_all_five_sections() {
        for heading in [
            "Summary",
            "Key Points",
            "Decisions",
            "Action Items",
            "Additional Notes",
        ] {
            assert!(
                SUMMARY_PROMPT.contains(heading),
                "missing heading: {heading}"
            );
        }
    }

    #[test]
    fn template_pins_length_and_language() {
        assert!(SUMMARY_PROMPT.contains("30%"));
        assert!(SUMMARY_PROMPT.contains("35%"));
        assert!(SUMMARY_PROMPT.contains("same language"));
    }
}
