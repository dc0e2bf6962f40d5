use crate::config::PromptConfig;
use crate::rules::character_section;
use crate::rules::style_pair::detect_style_pair;
use crate::rules::CompiledConfig;
use crate::store::RuleTable;
use crate::tokenizer::{normalize_tag, tokenize};
use crate::types::{reasons, Category, Classification, Sections, TraceEntry, BACKGROUND_MARKER};

/// The classification engine: keyword config compiled once, then one pure
/// pass per prompt. Custom rules are injected per call so the classifier
/// never owns shared mutable state.
pub struct PromptClassifier {
    config: CompiledConfig,
}

impl PromptClassifier {
    pub fn new(config: &PromptConfig) -> Self {
        Self {
            config: CompiledConfig::new(config),
        }
    }

    /// Classifier over the bundled keyword lists.
    pub fn bundled() -> Self {
        Self::new(&PromptConfig::bundled())
    }

    /// Classify a prompt into sections, recording one trace entry per
    /// processed tag. Total over its input: the empty prompt yields empty
    /// sections and an empty trace.
    ///
    /// Tokens are consumed left to right. Each step applies the first
    /// matching branch of the priority chain below and advances the cursor
    /// by one tag, except a style pair, which consumes two.
    pub fn classify(&self, prompt: &str, rules: &RuleTable) -> Classification {
        let tags = tokenize(prompt);
        let mut state = PassState::default();

        let mut index = 0;
        while index < tags.len() {
            // 1. Style pair: author tag followed by a style tag derived
            //    from it. Consumes both tokens.
            if detect_style_pair(&tags, index) {
                let author = normalize_tag(&tags[index]);
                let style = normalize_tag(&tags[index + 1]);
                state.emit(Category::Style, author, reasons::STYLE_AUTHOR);
                state.emit(Category::Style, style, reasons::STYLE_TAG);
                index += 2;
                continue;
            }

            let tag = normalize_tag(&tags[index]);
            let tag_lower = tag.to_lowercase();
            index += 1;

            // 2. Quality indicators.
            if let Some(keyword) = self.config.quality.find_match(&tag_lower) {
                state.emit(Category::Quality, tag, reasons::quality(keyword));
                continue;
            }

            // 3. Background keywords set the flag; the tag itself is never
            //    emitted; the section holds at most the synthetic marker.
            if let Some(keyword) = self.config.background.find_match(&tag_lower) {
                state.background_detected = true;
                state.trace.push(TraceEntry::new(
                    tag,
                    Category::Background,
                    reasons::background(keyword),
                ));
                continue;
            }

            // 4. Character identifiers open a character section.
            if self.config.character_identifiers.contains(&tag_lower) {
                state.in_character_section = true;
                state.emit(Category::Character, tag, reasons::CHARACTER_IDENTIFIER);
                continue;
            }

            // 5. Named characters ("zero two from darling in the franxx").
            if tag.contains(" from ") {
                state.in_character_section = true;
                state.emit(Category::Character, tag, reasons::NAMED_CHARACTER);
                continue;
            }

            // 6. Inside an open character section, the section sub-priority
            //    decides; no match falls through without closing it.
            if state.in_character_section {
                if let Some(decision) =
                    character_section::evaluate_in_section(&tag, &tag_lower, &self.config)
                {
                    state.in_character_section = decision.keeps_section_open;
                    state.emit(decision.category, tag, decision.reason);
                    continue;
                }
            }

            // 7. Custom rules, with the same section side effects the
            //    built-in category would have. Unrecognized category values
            //    downgrade to Remainder.
            if let Some(value) = rules.category_for(&tag_lower) {
                let category = Category::from_rule_value(value.trim());
                self.apply_custom_rule(category.unwrap_or(Category::Remainder), tag, &mut state);
                continue;
            }

            // 8. Clothing outside a character section.
            if self.config.clothing.matches(&tag_lower) {
                state.in_character_section = false;
                state.emit(Category::Clothing, tag, reasons::CLOTHING_ITEM);
                continue;
            }

            // 9. Poses outside a character section.
            if self.config.poses.matches(&tag_lower) {
                state.in_character_section = false;
                state.emit(Category::Pose, tag, reasons::POSE);
                continue;
            }

            // 10. Everything else.
            state.emit(Category::Remainder, tag, reasons::NO_RULE);
        }

        state.finish()
    }

    fn apply_custom_rule(&self, category: Category, tag: String, state: &mut PassState) {
        match category {
            Category::Background => {
                state.background_detected = true;
                state
                    .trace
                    .push(TraceEntry::new(tag, Category::Background, reasons::CUSTOM_RULE));
            }
            Category::Character => {
                state.in_character_section = true;
                state.emit(Category::Character, tag, reasons::CUSTOM_RULE);
            }
            Category::Pose | Category::Clothing => {
                state.in_character_section = false;
                state.emit(category, tag, reasons::CUSTOM_RULE);
            }
            Category::Style | Category::Quality | Category::Remainder => {
                state.emit(category, tag, reasons::CUSTOM_RULE);
            }
        }
    }
}

/// Accumulator threaded through one classification pass.
#[derive(Debug, Default)]
struct PassState {
    in_character_section: bool,
    background_detected: bool,
    sections: Sections,
    trace: Vec<TraceEntry>,
}

impl PassState {
    fn emit(&mut self, category: Category, tag: String, reason: impl Into<String>) {
        self.trace
            .push(TraceEntry::new(tag.clone(), category, reason));
        self.sections.push(category, tag);
    }

    fn finish(mut self) -> Classification {
        if self.background_detected {
            self.sections
                .background
                .push(BACKGROUND_MARKER.to_string());
        }
        Classification {
            sections: self.sections,
            trace: self.trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(prompt: &str) -> Classification {
        PromptClassifier::bundled().classify(prompt, &RuleTable::default())
    }

    #[test]
    fn empty_prompt_yields_empty_result() {
        let result = classify("");
        assert!(result.sections.is_empty());
        assert!(result.trace.is_empty());
    }

    #[test]
    fn style_pair_consumes_two_tokens() {
        let result = classify("melkor, melkor_bt_style, extra");
        assert_eq!(result.sections.style, vec!["melkor", "melkor_bt_style"]);
        assert_eq!(result.trace.len(), 3);
        assert_eq!(result.trace[0].reason, reasons::STYLE_AUTHOR);
        assert_eq!(result.trace[1].reason, reasons::STYLE_TAG);
    }

    #[test]
    fn background_section_holds_only_the_marker() {
        let result = classify("outdoors, beach, blurry background");
        assert_eq!(result.sections.background, vec![BACKGROUND_MARKER]);
        // All three tags are traced even though none is emitted
        assert_eq!(result.trace.len(), 3);
        assert!(result
            .trace
            .iter()
            .all(|entry| entry.category == Category::Background));
    }

    #[test]
    fn named_character_opens_the_section() {
        let result = classify("((Zero Two from Darling in the Franxx)), pink hair");
        assert_eq!(
            result.sections.character,
            vec!["((Zero Two from Darling in the Franxx))", "pink hair"]
        );
        assert_eq!(result.trace[0].reason, reasons::NAMED_CHARACTER);
        assert_eq!(result.trace[1].reason, reasons::PHYSICAL_TRAIT);
    }

    #[test]
    fn weighted_tags_are_normalized_before_matching() {
        let result = classify("(masterpiece:1.2)");
        assert_eq!(result.sections.quality, vec!["masterpiece"]);
    }

    #[test]
    fn custom_character_rule_opens_the_section() {
        let table = RuleTable::from_value(&serde_json::json!({"cyberpunk": "Personagem"}));
        let result = PromptClassifier::bundled().classify("cyberpunk, scarred face", &table);

        assert_eq!(result.sections.character, vec!["cyberpunk"]);
        assert_eq!(result.trace[0].reason, reasons::CUSTOM_RULE);
        // The short follow-up tag lands inside the freshly opened section
        assert_eq!(result.sections.get(Category::Character).len(), 2);
    }

    #[test]
    fn custom_clothing_rule_closes_the_section() {
        // "belt v2" carries a digit, so the in-section sub-priority falls
        // through and the custom rule decides.
        let table = RuleTable::from_value(&serde_json::json!({"belt v2": "Roupas"}));
        let result =
            PromptClassifier::bundled().classify("1girl, belt v2, serious look", &table);

        assert_eq!(result.sections.clothing, vec!["belt v2"]);
        // Section was closed by the custom clothing rule, so the trailing
        // description no longer attaches to the character.
        assert_eq!(result.sections.character, vec!["1girl"]);
        assert_eq!(result.sections.remainder, vec!["serious look"]);
    }

    #[test]
    fn unknown_custom_category_downgrades_to_remainder() {
        let table = RuleTable::from_value(&serde_json::json!({"mystery": "Nonsense"}));
        let result = PromptClassifier::bundled().classify("mystery", &table);

        assert_eq!(result.sections.remainder, vec!["mystery"]);
        assert_eq!(result.trace[0].category, Category::Remainder);
        assert_eq!(result.trace[0].reason, reasons::CUSTOM_RULE);
    }

    #[test]
    fn custom_rule_loses_to_builtin_quality() {
        // The quality step runs before custom rules
        let table = RuleTable::from_value(&serde_json::json!({"masterpiece": "Pose"}));
        let result = PromptClassifier::bundled().classify("masterpiece", &table);
        assert_eq!(result.sections.quality, vec!["masterpiece"]);
        assert!(result.sections.pose.is_empty());
    }
}
