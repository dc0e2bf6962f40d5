use super::keywords::CompiledConfig;
use crate::types::{reasons, Category};

/// Outcome of evaluating a tag while a character section is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDecision {
    pub category: Category,
    pub reason: String,
    /// Whether the character section survives this tag.
    pub keeps_section_open: bool,
}

/// Sub-priority applied while a character section is open. Physical traits
/// stay with the character; clothing, poses and actions end the section;
/// short digit-free descriptions are attributed to the character. `None`
/// means no branch matched and the tag falls through to the later steps
/// without closing the section.
pub fn evaluate_in_section(
    tag: &str,
    tag_lower: &str,
    config: &CompiledConfig,
) -> Option<SectionDecision> {
    if config.physical_traits.matches(tag_lower) {
        return Some(SectionDecision {
            category: Category::Character,
            reason: reasons::PHYSICAL_TRAIT.to_string(),
            keeps_section_open: true,
        });
    }

    if config.clothing.matches(tag_lower) {
        return Some(SectionDecision {
            category: Category::Clothing,
            reason: reasons::CLOTHING_ITEM.to_string(),
            keeps_section_open: false,
        });
    }

    if config.poses.matches(tag_lower) {
        return Some(SectionDecision {
            category: Category::Pose,
            reason: reasons::POSE.to_string(),
            keeps_section_open: false,
        });
    }

    if config.actions.matches(tag_lower) {
        return Some(SectionDecision {
            category: Category::Remainder,
            reason: reasons::ACTION.to_string(),
            keeps_section_open: false,
        });
    }

    // Generic short descriptions ("medieval barmaid") belong to the
    // character as long as they carry no digits.
    if tag.split_whitespace().count() <= 3 && !tag.chars().any(|c| c.is_ascii_digit()) {
        return Some(SectionDecision {
            category: Category::Character,
            reason: reasons::SHORT_DESCRIPTION.to_string(),
            keeps_section_open: true,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PromptConfig;

    fn config() -> CompiledConfig {
        CompiledConfig::new(&PromptConfig::bundled())
    }

    #[test]
    fn physical_trait_stays_with_character() {
        let decision = evaluate_in_section("long hair", "long hair", &config()).unwrap();
        assert_eq!(decision.category, Category::Character);
        assert!(decision.keeps_section_open);
    }

    #[test]
    fn clothing_closes_the_section() {
        let decision = evaluate_in_section("bikini", "bikini", &config()).unwrap();
        assert_eq!(decision.category, Category::Clothing);
        assert!(!decision.keeps_section_open);
    }

    #[test]
    fn action_falls_to_remainder_and_closes() {
        let decision =
            evaluate_in_section("serving beer mugs", "serving beer mugs", &config()).unwrap();
        assert_eq!(decision.category, Category::Remainder);
        assert_eq!(decision.reason, reasons::ACTION);
        assert!(!decision.keeps_section_open);
    }

    #[test]
    fn short_description_is_attributed_to_character() {
        let decision = evaluate_in_section("medieval barmaid", "medieval barmaid", &config()).unwrap();
        assert_eq!(decision.category, Category::Character);
        assert_eq!(decision.reason, reasons::SHORT_DESCRIPTION);
        assert!(decision.keeps_section_open);
    }

    #[test]
    fn digits_and_long_tags_fall_through() {
        assert_eq!(evaluate_in_section("3d", "3d", &config()), None);
        assert_eq!(
            evaluate_in_section(
                "a very long generic description here",
                "a very long generic description here",
                &config()
            ),
            None
        );
    }
}
