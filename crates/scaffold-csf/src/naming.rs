//! Story naming and identity
//!
//! - [`story_name_from_export`]: `primaryButton` → `Primary Button`
//! - [`sanitize`]: `Example/foo bar` → `example-foo-bar`
//! - [`to_id`]: `("Example/foo", "Primary")` → `example-foo--primary`

use crate::error::{IdPart, IdentityError};

/// Characters that become `-` in a story id
const SEPARATORS: &[char] = &[
    ' ', '\u{2019}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2032}', '\u{bf}', '\'', '`', '~',
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '|', '+', '-', '=', '?', ';', ':',
    '"', ',', '.', '<', '>', '{', '}', '[', ']', '\\', '/',
];

/// Delimiter between the title and name halves of an id
pub const ID_DELIMITER: &str = "--";

/// Human display name for an export key, in start case
#[must_use]
pub fn story_name_from_export(key: &str) -> String {
    split_words(key)
        .into_iter()
        .map(upper_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// URL-safe lowercase slug
#[must_use]
pub fn sanitize(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars().flat_map(char::to_lowercase) {
        if SEPARATORS.contains(&c) {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else {
            slug.push(c);
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Stable story id from a title and display name
///
/// # Errors
/// Returns [`IdentityError::Unsanitizable`] if either part has no characters
/// left after [`sanitize`].
pub fn to_id(kind: &str, name: &str) -> Result<String, IdentityError> {
    let kind_slug = sanitize_part(kind, IdPart::Kind)?;
    if name.is_empty() {
        return Ok(kind_slug);
    }
    let name_slug = sanitize_part(name, IdPart::Name)?;
    Ok(format!("{kind_slug}{ID_DELIMITER}{name_slug}"))
}

fn sanitize_part(value: &str, part: IdPart) -> Result<String, IdentityError> {
    let slug = sanitize(value);
    if slug.is_empty() {
        return Err(IdentityError::Unsanitizable {
            part,
            value: value.to_string(),
        });
    }
    Ok(slug)
}

fn split_words(input: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for segment in input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
    {
        let chars: Vec<(usize, char)> = segment.char_indices().collect();
        let mut start = 0;
        for i in 1..chars.len() {
            let prev = chars[i - 1].1;
            let (offset, cur) = chars[i];
            let next = chars.get(i + 1).map(|&(_, c)| c);

            let boundary = (prev.is_lowercase() && cur.is_uppercase())
                || (prev.is_alphabetic() && cur.is_numeric())
                || (prev.is_numeric() && cur.is_alphabetic())
                || (prev.is_uppercase()
                    && cur.is_uppercase()
                    && next.is_some_and(char::is_lowercase));

            if boundary {
                words.push(&segment[start..offset]);
                start = offset;
            }
        }
        words.push(&segment[start..]);
    }
    words
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn start_case_names() {
        assert_eq!(story_name_from_export("A"), "A");
        assert_eq!(story_name_from_export("primaryButton"), "Primary Button");
        assert_eq!(story_name_from_export("WithLongName"), "With Long Name");
        assert_eq!(story_name_from_export("HTMLButton"), "HTML Button");
        assert_eq!(story_name_from_export("button_large"), "Button Large");
        assert_eq!(story_name_from_export("Button2"), "Button 2");
        assert_eq!(story_name_from_export("__private"), "Private");
    }

    #[test]
    fn sanitize_titles() {
        assert_eq!(sanitize("Example/foo/bar"), "example-foo-bar");
        assert_eq!(sanitize("A"), "a");
        assert_eq!(sanitize("  Hello   World!! "), "hello-world");
        assert_eq!(sanitize("Über/Fancy"), "über-fancy");
    }

    #[test]
    fn ids_join_title_and_name() {
        assert_eq!(to_id("Example/foo/bar", "A").unwrap(), "example-foo-bar--a");
        assert_eq!(
            to_id("Example/Header", "Logged In").unwrap(),
            "example-header--logged-in"
        );
        assert_eq!(to_id("Example/Header", "").unwrap(), "example-header");
    }

    #[test]
    fn ids_reject_empty_parts() {
        assert_eq!(
            to_id("!!", "A"),
            Err(IdentityError::Unsanitizable {
                part: IdPart::Kind,
                value: "!!".into()
            })
        );
        assert!(matches!(
            to_id("foo", "..."),
            Err(IdentityError::Unsanitizable { part: IdPart::Name, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_sanitize_has_no_stray_dashes(input in ".{0,40}") {
            let slug = sanitize(&input);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_names_are_deterministic(key in "[A-Za-z_][A-Za-z0-9_]{0,20}") {
            prop_assert_eq!(story_name_from_export(&key), story_name_from_export(&key));
        }
    }
}
