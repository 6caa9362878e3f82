//! Slug generation
//!
//! Category slugs are derived from display names: lowercased, whitespace
//! collapsed to single hyphens, everything that is not ASCII alphanumeric
//! stripped. The output is stable for a given name, so regenerating after a
//! rename is safe.

/// Converts a display name into a URL-friendly slug
///
/// # Example
///
/// ```
/// use listora_shared::slug::slugify;
///
/// assert_eq!(slugify("Cloud Hosting"), "cloud-hosting");
/// assert_eq!(slugify("  VPN & Proxy!  "), "vpn-proxy");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
        // Any other character is dropped without forcing a separator.
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_hyphenates() {
        assert_eq!(slugify("Game Servers"), "game-servers");
        assert_eq!(slugify("VPN"), "vpn");
    }

    #[test]
    fn test_strips_special_characters() {
        assert_eq!(slugify("C++ Hosting!"), "c-hosting");
        assert_eq!(slugify("50% Off"), "50-off");
    }

    #[test]
    fn test_collapses_whitespace_and_trims() {
        assert_eq!(slugify("  a   b  "), "a-b");
        assert_eq!(slugify("a---b"), "a-b");
        assert_eq!(slugify("snake_case name"), "snake-case-name");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_stable_for_same_name() {
        assert_eq!(slugify("Dedicated Servers"), slugify("Dedicated Servers"));
    }
}
