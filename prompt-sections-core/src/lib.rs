// Prompt Sections Core Library
//
// Classifies comma-separated image-generation prompt tags into semantic
// sections (style, quality, background, character, pose, clothing, rest)
// with an ordered rule chain, a user-editable override table, and a
// per-tag decision trace.

pub mod classifier;
pub mod config;
pub mod formatter;
pub mod rules;
pub mod store;
pub mod tokenizer;
pub mod types;

// Re-export main types and functions for easy use
pub use classifier::PromptClassifier;
pub use config::PromptConfig;
pub use formatter::format_sections;
pub use store::{load_rules, save_rules, ImportError, RuleStore, RuleTable};
pub use types::*;
