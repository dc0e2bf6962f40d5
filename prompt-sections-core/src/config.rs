use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Keyword lists consumed by the classifier, bundled as JSON.
/// Every key is optional; a missing key means an empty list.
const BUNDLED_CONFIG: &str = include_str!("../config/prompt_config.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Substring matches routed to Quality (e.g. "masterpiece").
    #[serde(default)]
    pub quality_terms: Vec<String>,
    /// Substring matches that set the background flag (e.g. "outdoors").
    #[serde(default)]
    pub background_keywords: Vec<String>,
    /// Exact matches that open a character section (e.g. "1girl").
    #[serde(default)]
    pub character_identifiers: Vec<String>,
    /// Permanent physical traits kept inside an open character section.
    #[serde(default)]
    pub physical_traits: Vec<String>,
    /// Actions that end a character section and fall to Remainder.
    #[serde(default)]
    pub action_clothing_keywords: Vec<String>,
    /// Substring matches routed to Clothing.
    #[serde(default)]
    pub clothing_keywords: Vec<String>,
    /// Substring matches routed to Pose.
    #[serde(default)]
    pub pose_keywords: Vec<String>,
}

impl PromptConfig {
    /// The keyword lists compiled into the binary.
    pub fn bundled() -> Self {
        serde_json::from_str(BUNDLED_CONFIG).expect("bundled prompt_config.json is valid")
    }

    /// Load a custom keyword config. YAML or JSON, chosen by extension.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON config: {}", path.display()))?
        };
        Ok(config)
    }

    /// Load config with fallback to the bundled defaults.
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                eprintln!("⚠️  Failed to load config from {p}: {e}; using defaults");
                Self::bundled()
            }),
            None => Self::bundled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_parses_and_is_populated() {
        let config = PromptConfig::bundled();
        assert!(config.quality_terms.iter().any(|t| t == "masterpiece"));
        assert!(config.background_keywords.iter().any(|t| t == "outdoors"));
        assert!(config.character_identifiers.iter().any(|t| t == "1girl"));
        assert!(config.clothing_keywords.iter().any(|t| t == "bikini"));
        assert!(!config.pose_keywords.is_empty());
    }

    #[test]
    fn missing_keys_default_to_empty_lists() {
        let config: PromptConfig =
            serde_json::from_str(r#"{"quality_terms": ["masterpiece"]}"#).unwrap();
        assert_eq!(config.quality_terms, vec!["masterpiece"]);
        assert!(config.background_keywords.is_empty());
        assert!(config.pose_keywords.is_empty());
    }

    #[test]
    fn load_with_fallback_uses_bundled_on_missing_file() {
        let config = PromptConfig::load_with_fallback(Some("/nonexistent/config.yaml"));
        assert!(config.quality_terms.iter().any(|t| t == "masterpiece"));
    }
}
