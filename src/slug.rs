/*!
 * Tag slug utilities.
 *
 * Tags are identified by a slug derived deterministically from a human label.
 * The derivation is one-way: the display name is fixed by the first label
 * that produced the slug and is never re-derived on later references.
 */

/// Normalize a human-provided label into a URL-safe slug.
///
/// Lowercases the label and collapses every run of non-alphanumeric
/// characters into a single hyphen, with no leading or trailing hyphen.
/// A label with no alphanumeric content yields an empty slug.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_separator = false;

    for ch in label.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Derive the display name stored on first tag creation.
///
/// First character uppercased, rest untouched. First write wins: repeated
/// references with different casing do not update the stored name.
pub fn display_name(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
