/// Built-in instruction sent with every summarization request.
pub const SYSTEM_PROMPT: &str = "You are a document summarizer. Create a concise summary of the provided text.

Requirements:
- Keep the summary brief and scannable for mobile reading
- Use bullet points for key information
- Highlight the most important facts and dates
- Format for Telegram (use simple markdown: *bold*, _italic_)
- Maximum 500 words
- Write in the same language as the source document
";

/// Prefix placed before the document text in the user turn.
pub const DOCUMENT_PREAMBLE: &str = "Please summarize the following document:\n\n";

/// Picks the override when it has content, the built-in instruction otherwise.
#[must_use]
pub fn resolve_system_prompt(override_prompt: Option<&str>) -> String {
    override_prompt
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| SYSTEM_PROMPT.to_string(), |s| sanitize_prompt(s))
}

/// Strips control characters other than line breaks and tabs.
#[must_use]
pub fn sanitize_prompt(raw: &str) -> String {
    raw.chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect()
}

#[must_use]
pub fn build_user_message(text: &str) -> String {
    format!("{DOCUMENT_PREAMBLE}{text}")
}
