//! Small text helpers for rendering localized strings.

use regex::Regex;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Replace `$name` placeholders with the matching parameter values.
///
/// Placeholders without a matching parameter are left untouched.
///
/// # Example
/// ```
/// use game_hub::text::substitute_params;
///
/// let text = substitute_params("Guess between $min and $max", &[("min", "1"), ("max", "100")]);
/// assert_eq!(text, "Guess between 1 and 100");
/// ```
pub fn substitute_params<K, V>(template: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if params.is_empty() {
        return template.to_string();
    }

    let regex = PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern is valid")
    });

    regex
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            params
                .iter()
                .find(|(key, _)| key.as_ref() == name)
                .map(|(_, value)| value.as_ref().to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Uppercase the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Word-wrap each CRLF-separated line to at most `width` characters.
///
/// Words longer than `width` are kept whole. A width of 0 disables wrapping.
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split("\r\n").enumerate() {
        if i > 0 {
            out.push_str("\r\n");
        }
        let mut column = 0;
        for (j, word) in line.split(' ').enumerate() {
            let len = word.chars().count();
            if j > 0 {
                if column > 0 && column + 1 + len > width {
                    out.push_str("\r\n");
                    column = 0;
                } else {
                    out.push(' ');
                    column += 1;
                }
            }
            out.push_str(word);
            column += len;
        }
    }
    out
}
