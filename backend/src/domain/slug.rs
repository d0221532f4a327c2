//! URL slugs derived from bootcamp names.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits and single hyphens.

/// Derive a slug from a display name.
///
/// Alphanumeric runs are lowercased and joined by single hyphens; every
/// other character acts as a separator. Non-ASCII letters are dropped.
///
/// # Examples
/// ```
/// use bootcamp_directory::domain::slugify;
///
/// assert_eq!(slugify("Devworks Bootcamp"), "devworks-bootcamp");
/// assert_eq!(slugify("  UI/UX -- Academy! "), "ui-ux-academy");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch.is_ascii_punctuation() {
            pending_separator = true;
        }
    }
    slug
}

/// Return `true` when `value` is a valid slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}
