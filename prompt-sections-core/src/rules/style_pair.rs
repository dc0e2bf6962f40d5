// Style-pair lookahead: prompts often carry an author tag immediately
// followed by a style tag derived from it ("melkor, melkor_bt_style").
// When that pattern is present both raw tokens are consumed as Style.

/// Returns true when the token at `index` starts a style pair: a next token
/// exists, contains "style", and shares a word longer than 2 characters with
/// the current token (words split on underscore/hyphen/space). On a match the
/// classifier consumes both tokens.
pub fn detect_style_pair(tags: &[String], index: usize) -> bool {
    let (Some(current), Some(next)) = (tags.get(index), tags.get(index + 1)) else {
        return false;
    };

    let current = current.trim().to_lowercase();
    let next = next.trim().to_lowercase();

    if !next.contains("style") {
        return false;
    }

    current
        .replace(['_', '-'], " ")
        .split_whitespace()
        .any(|word| word.chars().count() > 2 && next.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn detects_author_followed_by_style_tag() {
        assert!(detect_style_pair(&tags(&["melkor", "melkor_bt_style"]), 0));
        assert!(detect_style_pair(
            &tags(&["john doe", "john doe style", "extra"]),
            0
        ));
    }

    #[test]
    fn no_match_without_style_in_next_token() {
        assert!(!detect_style_pair(&tags(&["foo", "bar"]), 0));
        assert!(!detect_style_pair(&tags(&["melkor", "melkor_bt"]), 0));
    }

    #[test]
    fn no_match_without_shared_author_word() {
        assert!(!detect_style_pair(&tags(&["melkor", "ghibli style"]), 0));
        // Short words (<= 2 chars) never anchor a match
        assert!(!detect_style_pair(&tags(&["by xy", "xy style"]), 0));
    }

    #[test]
    fn last_token_cannot_start_a_pair() {
        assert!(!detect_style_pair(&tags(&["melkor"]), 0));
        assert!(!detect_style_pair(&tags(&["a", "b"]), 5));
    }
}
