//! URL-safe slugs for category addresses.

/// Longest slug a category column accepts.
pub const MAX_SLUG_LEN: usize = 120;

/// Lowercase ASCII, transliterated, with runs of other characters collapsed to
/// a single hyphen and no hyphen at either end.
pub fn slugify(input: &str) -> String {
    let slug = slug::slugify(input);
    if slug.len() <= MAX_SLUG_LEN {
        return slug;
    }
    slug[..MAX_SLUG_LEN].trim_end_matches('-').to_string()
}

/// Slug to store for a category: the explicit one when it is not blank,
/// otherwise one derived from the name.
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> String {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slugify(slug),
        None => slugify(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("Electrónica y Hogar", "electronica-y-hogar" ; "transliterates accents")]
    #[test_case("  Ropa   de Niños!! ", "ropa-de-ninos" ; "collapses separators")]
    #[test_case("Zapatos_2024", "zapatos-2024" ; "underscore becomes hyphen")]
    #[test_case("---", "" ; "only separators")]
    fn slugify_examples(input: &str, expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn explicit_slug_wins_over_name() {
        assert_eq!(resolve_slug(Some("Mi Slug"), "Otro nombre"), "mi-slug");
        assert_eq!(resolve_slug(Some("   "), "Otro nombre"), "otro-nombre");
        assert_eq!(resolve_slug(None, "Otro nombre"), "otro-nombre");
    }

    #[test]
    fn long_names_are_truncated_without_trailing_hyphen() {
        let name = "ab ".repeat(80);
        let slug = slugify(&name);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    proptest! {
        #[test]
        fn slugs_are_url_safe(input in "\\PC{0,150}") {
            let slug = slugify(&input);
            prop_assert!(slug.len() <= MAX_SLUG_LEN);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn slugify_is_idempotent(input in "\\PC{0,150}") {
            let once = slugify(&input);
            prop_assert_eq!(slugify(&once), once);
        }
    }
}
