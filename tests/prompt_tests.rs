use boe_digest::ai::prompt::{
    DOCUMENT_PREAMBLE, SYSTEM_PROMPT, build_user_message, resolve_system_prompt, sanitize_prompt,
};
use boe_digest::estimate_tokens;

#[test]
fn test_default_prompt_is_used_without_override() {
    assert_eq!(resolve_system_prompt(None), SYSTEM_PROMPT);
    assert_eq!(resolve_system_prompt(Some("   \n")), SYSTEM_PROMPT);
}

#[test]
fn test_override_replaces_default() {
    let custom = "Resume el BOE en tres viñetas.";
    assert_eq!(resolve_system_prompt(Some(custom)), custom);
    assert_eq!(resolve_system_prompt(Some(&format!("  {custom}\n"))), custom);
}

#[test]
fn test_sanitize_strips_control_characters() {
    assert_eq!(sanitize_prompt("a\u{0}b\u{7}c"), "abc");
    assert_eq!(sanitize_prompt("línea 1\n\tlínea 2"), "línea 1\n\tlínea 2");
}

#[test]
fn test_default_prompt_consistency() {
    assert!(SYSTEM_PROMPT.starts_with("You are a document summarizer."));
    assert!(SYSTEM_PROMPT.contains("Maximum 500 words"));
    assert!(SYSTEM_PROMPT.contains("same language as the source document"));
}

#[test]
fn test_user_message_has_preamble() {
    let message = build_user_message("Real Decreto 1/2024");
    assert!(message.starts_with(DOCUMENT_PREAMBLE));
    assert!(message.ends_with("Real Decreto 1/2024"));
}

#[test]
fn test_estimate_tokens() {
    assert_eq!(estimate_tokens(""), 1);
    assert_eq!(estimate_tokens("hello"), 2);

    let text = "This is a longer sentence that should be approximately twelve tokens.";
    assert_eq!(estimate_tokens(text), text.chars().count() / 4 + 1);
}
