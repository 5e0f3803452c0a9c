//! English text modifiers.
//!
//! Each function has the [`TextModifierFn`](super::modifiers::TextModifierFn)
//! signature and returns empty input unchanged.

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// The character before the last one, if any.
fn penultimate(text: &str) -> Option<char> {
    text.chars().rev().nth(1)
}

/// Prefix an indefinite article: "a cat", "an owl", "a unicorn".
pub fn article(text: &str, _params: &[&str]) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let third = chars.nth(1);
    if first.eq_ignore_ascii_case(&'u') && third.is_some_and(|c| c.eq_ignore_ascii_case(&'i')) {
        return format!("a {text}");
    }
    if is_vowel(first) {
        format!("an {text}")
    } else {
        format!("a {text}")
    }
}

/// Pluralize: "fox" -> "foxes", "guppy" -> "guppies", "monkey" -> "monkeys".
pub fn plural(text: &str, _params: &[&str]) -> String {
    match text.chars().last() {
        None => String::new(),
        Some('s' | 'h' | 'x') => format!("{text}es"),
        Some('y') if !penultimate(text).is_some_and(is_vowel) => {
            format!("{}ies", &text[..text.len() - 1])
        }
        Some(_) => format!("{text}s"),
    }
}

/// Past tense: "pass" -> "passed", "replace" -> "replaced",
/// "carry" -> "carried".
///
/// A vowel before a final `y` only appends `d` ("monkey" -> "monkeyd").
pub fn past_tense(text: &str, _params: &[&str]) -> String {
    match text.chars().last() {
        None => String::new(),
        Some('e') => format!("{text}d"),
        Some('y') if penultimate(text).is_some_and(is_vowel) => format!("{text}d"),
        Some('y') => format!("{}ied", &text[..text.len() - 1]),
        Some(_) => format!("{text}ed"),
    }
}

/// Uppercase the first grapheme.
pub fn capitalize(text: &str, _params: &[&str]) -> String {
    let mut graphemes = text.graphemes(true);
    match graphemes.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), graphemes.as_str()),
        None => String::new(),
    }
}

/// Uppercase the first character of every alphanumeric run.
pub fn capitalize_all(text: &str, _params: &[&str]) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                result.extend(c.to_uppercase());
                at_word_start = false;
            } else {
                result.push(c);
            }
        } else {
            at_word_start = true;
            result.push(c);
        }
    }
    result
}

/// `replace(target, replacement)`: replace every match of the `target`
/// regular expression. A target that is not a valid regex is matched
/// literally.
pub fn replace(text: &str, params: &[&str]) -> String {
    let [target, replacement] = params else {
        return text.to_string();
    };
    match Regex::new(target) {
        Ok(pattern) => pattern.replace_all(text, *replacement).into_owned(),
        Err(_) => text.replace(target, replacement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_rules() {
        assert_eq!(article("albatross", &[]), "an albatross");
        assert_eq!(article("fish", &[]), "a fish");
        assert_eq!(article("union", &[]), "a union");
        assert_eq!(article("Umbrella", &[]), "an Umbrella");
        assert_eq!(article("up", &[]), "an up");
        assert_eq!(article("", &[]), "");
    }

    #[test]
    fn plural_rules() {
        assert_eq!(plural("fox", &[]), "foxes");
        assert_eq!(plural("bus", &[]), "buses");
        assert_eq!(plural("wish", &[]), "wishes");
        assert_eq!(plural("guppy", &[]), "guppies");
        assert_eq!(plural("monkey", &[]), "monkeys");
        assert_eq!(plural("y", &[]), "ies");
        assert_eq!(plural("cat", &[]), "cats");
        assert_eq!(plural("", &[]), "");
    }

    #[test]
    fn past_tense_rules() {
        let words = ["pass", "replace", "cash", "box", "carry", "monkey", "hand"];
        let past: Vec<String> = words.iter().map(|w| past_tense(w, &[])).collect();
        assert_eq!(
            past,
            vec!["passed", "replaced", "cashed", "boxed", "carried", "monkeyd", "handed"]
        );
        assert_eq!(past_tense("", &[]), "");
    }

    #[test]
    fn capitalize_first_grapheme() {
        assert_eq!(capitalize("albatross", &[]), "Albatross");
        assert_eq!(capitalize("élan vital", &[]), "Élan vital");
        assert_eq!(capitalize("", &[]), "");
    }

    #[test]
    fn capitalize_every_word() {
        assert_eq!(
            capitalize_all("an albatross ate a fish", &[]),
            "An Albatross Ate A Fish"
        );
        assert_eq!(
            capitalize_all("00flour from italy", &[]),
            "00flour From Italy"
        );
        assert_eq!(capitalize_all("well-known", &[]), "Well-Known");
        assert_eq!(capitalize_all("", &[]), "");
    }

    #[test]
    fn replace_with_regex_or_literal() {
        assert_eq!(
            replace("an albatross ate a fish", &["a", "b"]),
            "bn blbbtross bte b fish"
        );
        assert_eq!(replace("cat hat", &["[ch]at", "dog"]), "dog dog");
        assert_eq!(replace("a(b", &["(", "-"]), "a-b");
        assert_eq!(replace("", &["a", "b"]), "");
    }
}
