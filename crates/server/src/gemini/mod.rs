//! Gemini AI integration: client, prompt construction, and output parsing.

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use parse::{MenuSuggestions, ParsedSuggestions, parse_menu_suggestions};
