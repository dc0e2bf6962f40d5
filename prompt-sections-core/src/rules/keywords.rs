use crate::config::PromptConfig;
use std::collections::HashSet;

/// An ordered keyword list, lower-cased once at build time. Matching is
/// case-insensitive substring containment; a linear scan returns the first
/// configured keyword that hits, which is also the tie-break when several
/// would match.
#[derive(Debug, Clone)]
pub struct KeywordList {
    terms: Vec<String>,
}

impl KeywordList {
    fn new(terms: &[String]) -> Self {
        Self {
            terms: terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// First configured keyword contained in `tag_lower`, if any.
    pub fn find_match(&self, tag_lower: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|term| tag_lower.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, tag_lower: &str) -> bool {
        self.find_match(tag_lower).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Exact-match terms (character identifiers). Unlike [`KeywordList`] this is
/// whole-tag equality, not substring containment.
#[derive(Debug, Clone)]
pub struct IdentifierSet {
    terms: HashSet<String>,
}

impl IdentifierSet {
    fn new(terms: &[String]) -> Self {
        Self {
            terms: terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, tag_lower: &str) -> bool {
        self.terms.contains(tag_lower)
    }
}

/// All keyword lists compiled for matching. Built once per classifier, never
/// per call.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub quality: KeywordList,
    pub background: KeywordList,
    pub character_identifiers: IdentifierSet,
    pub physical_traits: KeywordList,
    pub actions: KeywordList,
    pub clothing: KeywordList,
    pub poses: KeywordList,
}

impl CompiledConfig {
    pub fn new(config: &PromptConfig) -> Self {
        Self {
            quality: KeywordList::new(&config.quality_terms),
            background: KeywordList::new(&config.background_keywords),
            character_identifiers: IdentifierSet::new(&config.character_identifiers),
            physical_traits: KeywordList::new(&config.physical_traits),
            actions: KeywordList::new(&config.action_clothing_keywords),
            clothing: KeywordList::new(&config.clothing_keywords),
            poses: KeywordList::new(&config.pose_keywords),
        }
    }
}
