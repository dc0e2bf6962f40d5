use serde::{Deserialize, Serialize};

/// The synthetic literal emitted for the Background section whenever any
/// background keyword was seen. The section never holds the raw tags.
pub const BACKGROUND_MARKER: &str = "((simple background))";

/// Reason strings recorded in the classification trace.
/// Keyword-based branches interpolate the matched keyword and are built
/// with the `*_reason` helpers below instead.
pub mod reasons {
    pub const STYLE_AUTHOR: &str = "author detected in style sequence";
    pub const STYLE_TAG: &str = "tag identified as style";
    pub const CHARACTER_IDENTIFIER: &str = "character identifier";
    pub const NAMED_CHARACTER: &str = "named character detected";
    pub const PHYSICAL_TRAIT: &str = "permanent physical trait";
    pub const CLOTHING_ITEM: &str = "clothing item detected";
    pub const POSE: &str = "pose detected";
    pub const ACTION: &str = "action/pose detected";
    pub const SHORT_DESCRIPTION: &str = "short description attributed to character";
    pub const CUSTOM_RULE: &str = "custom rule";
    pub const NO_RULE: &str = "no rule applied";

    pub fn quality(keyword: &str) -> String {
        format!("quality indicator ({keyword})")
    }

    pub fn background(keyword: &str) -> String {
        format!("scenery detected ({keyword})")
    }
}

/// The closed set of classification buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Style,
    Quality,
    Background,
    Character,
    Pose,
    Clothing,
    Remainder,
}

impl Category {
    /// Fixed display/output order for sections.
    pub const ALL: [Category; 7] = [
        Category::Style,
        Category::Quality,
        Category::Background,
        Category::Character,
        Category::Pose,
        Category::Clothing,
        Category::Remainder,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Style => "Style",
            Category::Quality => "Quality",
            Category::Background => "Background",
            Category::Character => "Character",
            Category::Pose => "Pose",
            Category::Clothing => "Clothing",
            Category::Remainder => "Remainder",
        }
    }

    /// Category name as written in rule files. The rule-file format predates
    /// this crate, so these are the original application's labels.
    pub fn rule_label(&self) -> &'static str {
        match self {
            Category::Style => "Estilo",
            Category::Quality => "Qualidade",
            Category::Background => "Background",
            Category::Character => "Personagem",
            Category::Pose => "Pose",
            Category::Clothing => "Roupas",
            Category::Remainder => "Restante do Prompt",
        }
    }

    /// Parse a category value from a rule file. Accepts the rule-file labels
    /// and the English names as aliases; anything else is unrecognized and
    /// downgraded to Remainder at application time.
    pub fn from_rule_value(value: &str) -> Option<Category> {
        match value {
            "Estilo" | "Style" => Some(Category::Style),
            "Qualidade" | "Quality" => Some(Category::Quality),
            "Background" => Some(Category::Background),
            "Personagem" | "Character" => Some(Category::Character),
            "Pose" => Some(Category::Pose),
            "Roupas" | "Clothing" => Some(Category::Clothing),
            "Restante do Prompt" | "Remainder" => Some(Category::Remainder),
            _ => None,
        }
    }
}

/// One per-token decision record. Order matches token processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub tag: String,
    pub category: Category,
    pub reason: String,
}

impl TraceEntry {
    pub fn new(tag: impl Into<String>, category: Category, reason: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            category,
            reason: reason.into(),
        }
    }
}

/// Per-category tag lists, first-seen order preserved within each category.
/// Background holds either nothing or the single synthetic marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    pub style: Vec<String>,
    pub quality: Vec<String>,
    pub background: Vec<String>,
    pub character: Vec<String>,
    pub pose: Vec<String>,
    pub clothing: Vec<String>,
    pub remainder: Vec<String>,
}

impl Sections {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Style => &self.style,
            Category::Quality => &self.quality,
            Category::Background => &self.background,
            Category::Character => &self.character,
            Category::Pose => &self.pose,
            Category::Clothing => &self.clothing,
            Category::Remainder => &self.remainder,
        }
    }

    pub(crate) fn push(&mut self, category: Category, tag: String) {
        let list = match category {
            Category::Style => &mut self.style,
            Category::Quality => &mut self.quality,
            Category::Background => &mut self.background,
            Category::Character => &mut self.character,
            Category::Pose => &mut self.pose,
            Category::Clothing => &mut self.clothing,
            Category::Remainder => &mut self.remainder,
        };
        list.push(tag);
    }

    /// Iterate categories in the fixed output order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, tags)| tags.is_empty())
    }
}

/// Result of one classification pass: the categorized sections plus the
/// per-token decision trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub sections: Sections,
    pub trace: Vec<TraceEntry>,
}

impl Classification {
    /// Tags that landed in Remainder because no rule applied, deduplicated,
    /// in first-seen order. These are the candidates for new custom rules.
    pub fn unmatched_tags(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.trace {
            if entry.category == Category::Remainder
                && entry.reason == reasons::NO_RULE
                && !seen.contains(&entry.tag.as_str())
            {
                seen.push(&entry.tag);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_rule_value(category.rule_label()), Some(category));
            assert_eq!(Category::from_rule_value(category.label()), Some(category));
        }
    }

    #[test]
    fn unknown_rule_value_is_unrecognized() {
        assert_eq!(Category::from_rule_value("Quality!!"), None);
        assert_eq!(Category::from_rule_value(""), None);
        // Matching is exact, not case-insensitive
        assert_eq!(Category::from_rule_value("personagem"), None);
    }

    #[test]
    fn unmatched_tags_deduplicates_and_keeps_order() {
        let classification = Classification {
            sections: Sections::default(),
            trace: vec![
                TraceEntry::new("zeta", Category::Remainder, reasons::NO_RULE),
                TraceEntry::new("alpha", Category::Remainder, reasons::NO_RULE),
                TraceEntry::new("zeta", Category::Remainder, reasons::NO_RULE),
                TraceEntry::new("held", Category::Remainder, reasons::ACTION),
            ],
        };
        assert_eq!(classification.unmatched_tags(), vec!["zeta", "alpha"]);
    }
}
