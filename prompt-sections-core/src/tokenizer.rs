use once_cell::sync::Lazy;
use regex::Regex;

// Non-negative decimal: digits with at most one decimal point ("1", "1.2",
// "5.", ".5"). Mirrors the weight gate of the emphasis syntax.
static WEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)$").expect("weight regex is valid"));

// Tags shorter than this can't carry `(x:w)` emphasis; returned untouched.
const MIN_EMPHASIS_LEN: usize = 5;

/// Split a prompt on commas into trimmed, non-empty tags. Order preserved.
pub fn tokenize(prompt: &str) -> Vec<String> {
    prompt
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip simple numeric-weight emphasis of the form `(tag:1.2)`, keeping only
/// the tag. Applies only when the tag is wrapped in one pair of parentheses,
/// the interior has exactly one colon, the part before it is non-empty, and
/// the part after it is a well-formed non-negative decimal. Anything else,
/// including double parentheses like `((simple background))`, is returned
/// trimmed but otherwise verbatim.
pub fn normalize_tag(tag: &str) -> String {
    let stripped = tag.trim();
    if stripped.chars().count() < MIN_EMPHASIS_LEN {
        return stripped.to_string();
    }

    if let Some(inner) = stripped
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        // split_once takes the first colon; a second one anywhere after it
        // means this is not weight emphasis.
        if let Some((candidate, weight)) = inner.split_once(':') {
            let candidate = candidate.trim();
            let weight = weight.trim();
            if !weight.contains(':') && !candidate.is_empty() && WEIGHT_RE.is_match(weight) {
                return candidate.to_string();
            }
        }
    }

    stripped.to_string()
}
