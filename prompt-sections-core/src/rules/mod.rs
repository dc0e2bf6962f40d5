// Per-token classification rules - delegates to semantic sub-modules
// This module holds the building blocks the classifier evaluates in priority
// order; the ordering itself lives in classifier.rs:
// - keywords.rs: precompiled keyword lists and the identifier set
// - style_pair.rs: author/style lookahead detection
// - character_section.rs: sub-priority inside an open character section

pub mod character_section;
pub mod keywords;
pub mod style_pair;

pub use keywords::CompiledConfig;
