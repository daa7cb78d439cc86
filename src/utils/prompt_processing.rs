use std::collections::HashSet;
use regex::{Captures, Regex};
use lazy_static::lazy_static;


lazy_static! {
    /// Matches `{{name}}`. Names cannot contain braces or line breaks.
    pub(crate) static ref PLACEHOLDER_MATCH_RE: Regex = Regex::new(r"\{\{([^{}\r\n]*)\}\}").unwrap();
}

#[inline]
pub(crate) fn strip_format(key: &str) -> &str {
    //! Strips "{{" and "}}" and surrounding whitespace, which is algorithmically unsafe.
    //! Ensure the string is properly formatted like "{{a}}".
    key[2..key.len() - 2].trim()
}

/// Get placeholder names in order of first appearance, without duplicates.
/// `{{ a }}` and `{{a}}` are the same placeholder; `{{}}` is not a placeholder.
pub fn get_placeholders(string: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut placeholders = Vec::new();
    collect_placeholders(string, &mut seen, &mut placeholders);
    placeholders
}

/// Append the placeholders of `string` that are not in `seen` to `placeholders`, keeping first-seen order.
pub(crate) fn collect_placeholders(string: &str, seen: &mut HashSet<String>, placeholders: &mut Vec<String>) {
    for captures in PLACEHOLDER_MATCH_RE.captures_iter(string) {
        let name = strip_format(&captures[0]);
        if !name.is_empty() && seen.insert(name.to_string()) {
            placeholders.push(name.to_string());
        }
    }
}

/// Replace every placeholder for which `resolve` returns a value. Other placeholders are kept verbatim.
pub fn replace_placeholders_with<F, S>(original: &str, mut resolve: F) -> String
    where F: FnMut(&str) -> Option<S>, S: AsRef<str> {
    PLACEHOLDER_MATCH_RE.replace_all(original, |captures: &Captures| {
        let match_text = &captures[0];
        let name = strip_format(match_text);
        if name.is_empty() {
            return match_text.to_string();
        }
        match resolve(name) {
            Some(value) => value.as_ref().to_string(),
            None => match_text.to_string(),
        }
    }).into_owned()
}

/// Replace one named placeholder with `value`, leaving every other placeholder untouched.
pub fn replace_placeholder(original: &str, placeholder: &str, value: &str) -> String {
    let placeholder = placeholder.trim();
    replace_placeholders_with(original, |name| if name == placeholder { Some(value) } else { None })
}

#[cfg(test)]
mod string_tests {
    use super::{get_placeholders, replace_placeholder, replace_placeholders_with};

    #[test]
    fn test_get_keys() {
        let string = "{{a}}";
        let keys = get_placeholders(string);
        assert_eq!(vec!["a".to_string()], keys);

        let string = "{{a\n}}";
        let keys = get_placeholders(string);
        assert_eq!(0, keys.len());

        let string = "{{b}}    {{ a }} {{b}}";
        let keys = get_placeholders(string);
        assert_eq!(vec!["b".to_string(), "a".to_string()], keys);

        let string = "{{}} and {{  }}";
        assert!(get_placeholders(string).is_empty());
    }

    #[test]
    fn test_replace() {
        let string = "{{a}} and {{b}} and {{ a }} and {{c}}";
        let replaced = replace_placeholders_with(string, |name| match name {
            "a" => Some("alice"),
            "b" => Some("bob"),
            _ => None,
        });
        assert_eq!("alice and bob and alice and {{c}}", replaced);
    }

    #[test]
    fn test_replace_single() {
        let string = "item {{i}} of {{n}}";
        assert_eq!("item 2 of {{n}}", replace_placeholder(string, "i", "2"));
        assert_eq!("{{}}", replace_placeholder("{{}}", "", "x"));
    }
}
