use prompt_sections_core::{Classification, TraceEntry};
use std::collections::BTreeMap;

/// Render the per-tag decision trace as a markdown table.
pub fn render_trace_table(trace: &[TraceEntry]) -> String {
    let mut rows = vec![
        "| Tag | Category | Reason |".to_string(),
        "| --- | --- | --- |".to_string(),
    ];
    for entry in trace {
        rows.push(format!(
            "| {} | {} | {} |",
            escape(&entry.tag),
            entry.category.label(),
            escape(&entry.reason)
        ));
    }
    rows.join("\n")
}

/// One-line note listing the tags no rule applied to, if any. These are the
/// candidates for `rules set`.
pub fn render_unmatched_note(classification: &Classification) -> Option<String> {
    let unmatched = classification.unmatched_tags();
    if unmatched.is_empty() {
        return None;
    }
    Some(format!("ℹ️  No specific rule for: {}", unmatched.join(", ")))
}

/// Render the raw rule table as aligned `tag → category` lines.
pub fn render_rules_list(rules: &BTreeMap<String, String>) -> String {
    let width = rules.keys().map(|tag| tag.chars().count()).max().unwrap_or(0);
    rules
        .iter()
        .map(|(tag, category)| format!("{tag:width$} → {category}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape(value: &str) -> String {
    value.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_sections_core::{reasons, Category, Sections};

    #[test]
    fn trace_table_escapes_pipes() {
        let trace = vec![TraceEntry::new(
            "odd|tag",
            Category::Remainder,
            reasons::NO_RULE,
        )];
        let table = render_trace_table(&trace);

        assert!(table.starts_with("| Tag | Category | Reason |"));
        assert!(table.contains("| odd\\|tag | Remainder | no rule applied |"));
    }

    #[test]
    fn unmatched_note_lists_only_no_rule_tags() {
        let classification = Classification {
            sections: Sections::default(),
            trace: vec![
                TraceEntry::new("tsinne", Category::Remainder, reasons::NO_RULE),
                TraceEntry::new("arm up", Category::Remainder, reasons::ACTION),
            ],
        };
        let note = render_unmatched_note(&classification).unwrap();
        assert!(note.contains("tsinne"));
        assert!(!note.contains("arm up"));
    }

    #[test]
    fn unmatched_note_is_absent_when_everything_matched() {
        let classification = Classification {
            sections: Sections::default(),
            trace: vec![],
        };
        assert_eq!(render_unmatched_note(&classification), None);
    }

    #[test]
    fn rules_list_aligns_tags() {
        let rules: BTreeMap<String, String> = [
            ("tsinne".to_string(), "Estilo".to_string()),
            ("zz".to_string(), "Pose".to_string()),
        ]
        .into_iter()
        .collect();

        let listing = render_rules_list(&rules);
        assert_eq!(listing, "tsinne → Estilo\nzz     → Pose");
    }
}
