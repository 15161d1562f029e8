//! All AI/LLM functionality

pub mod client;
pub mod prompt;
pub mod summarizer;

// Re-export main types for convenience
pub use client::{GeminiClient, estimate_tokens};
pub use summarizer::{GeminiSummarizer, Summarizer, SummarizerSettings, create_summarizer};
