//! Case normalization for native names.

/// Convert a SCREAMING_SNAKE native name into PascalCase.
///
/// Segments that already contain lowercase letters keep their casing apart
/// from the first letter, so PascalCase output passes through unchanged.
/// An underscore is kept between two numeric segments (`11_0`).
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_ends_with_digit = false;

    for segment in name.split('_').filter(|s| !s.is_empty()) {
        let starts_with_digit = segment.starts_with(|c: char| c.is_ascii_digit());
        if prev_ends_with_digit && starts_with_digit {
            out.push('_');
        }

        let mixed_case = segment.chars().any(|c| c.is_lowercase());
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            if mixed_case {
                out.push_str(chars.as_str());
            } else {
                out.extend(chars.flat_map(char::to_lowercase));
            }
        }

        prev_ends_with_digit = segment.ends_with(|c: char| c.is_ascii_digit());
    }

    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalize_is_idempotent(name in r"[A-Z]{2,6}(_[A-Z]{2,6}){0,4}") {
            let once = normalize_name(&name);
            let twice = normalize_name(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn normalize_drops_letter_underscores(name in r"_?[A-Z]{1,6}(_[A-Z]{1,6}){0,4}") {
            prop_assert!(!normalize_name(&name).contains('_'));
        }
    }
}
