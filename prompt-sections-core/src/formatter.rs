use crate::types::Sections;

/// Render the categorized sections as the final grouped prompt: tags joined
/// with ", " within a section, non-empty sections joined with a blank line,
/// in the fixed category order. Pure function of its input.
pub fn format_sections(sections: &Sections) -> String {
    sections
        .iter()
        .filter(|(_, tags)| !tags.is_empty())
        .map(|(_, tags)| tags.join(", "))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BACKGROUND_MARKER;

    #[test]
    fn joins_sections_in_fixed_order() {
        let sections = Sections {
            quality: vec!["masterpiece".into(), "best quality".into()],
            background: vec![BACKGROUND_MARKER.into()],
            character: vec!["1girl".into()],
            remainder: vec!["tsinne".into()],
            ..Sections::default()
        };

        assert_eq!(
            format_sections(&sections),
            "masterpiece, best quality\n\n((simple background))\n\n1girl\n\ntsinne"
        );
    }

    #[test]
    fn empty_sections_are_skipped_entirely() {
        assert_eq!(format_sections(&Sections::default()), "");

        let sections = Sections {
            pose: vec!["sitting".into()],
            ..Sections::default()
        };
        assert_eq!(format_sections(&sections), "sitting");
    }
}
