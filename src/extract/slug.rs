//! Heading text to URL-safe identifier.

/// Derive a candidate identifier from heading text.
///
/// Lower-cases and trims the text, drops everything except ASCII word
/// characters (`[a-z0-9_]`), whitespace and hyphens, then turns every run of
/// whitespace/hyphens into a single `-`. Leading and trailing separators are
/// dropped. May return an empty string (e.g. for `"???"` or `"日本語"`); the
/// caller supplies the positional fallback.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for ch in lowered.trim().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else if is_space(ch) || ch == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// Unicode whitespace plus U+FEFF, which browsers' `\s` also matches.
fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{FEFF}'
}

/// Positional fallback for headings whose text yields an empty slug.
pub fn fallback_id(index: usize) -> String {
    format!("heading-{index}")
}

/// Candidate id for the heading at `index`: its slug, or the positional fallback.
pub fn candidate_id(text: &str, index: usize) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        fallback_id(index)
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates_words() {
        assert_eq!(slugify("Getting Started"), "getting-started");
    }

    #[test]
    fn strips_punctuation_without_inserting_separators() {
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
    }

    #[test]
    fn collapses_whitespace_and_hyphen_runs() {
        assert_eq!(slugify("a  -  b"), "a-b");
        assert_eq!(slugify("a\t\nb"), "a-b");
        assert_eq!(slugify("a---b"), "a-b");
    }

    #[test]
    fn byte_order_mark_separates_words() {
        assert_eq!(slugify("a\u{FEFF}b"), "a-b");
        assert_eq!(slugify("\u{FEFF}Intro\u{FEFF}"), "intro");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(slugify("  -- Intro --  "), "intro");
    }

    #[test]
    fn keeps_digits_and_underscores() {
        assert_eq!(slugify("Step 2: snake_case"), "step-2-snake_case");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(slugify("Café Crème"), "caf-crme");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn empty_and_symbol_only_text_yield_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!?*"), "");
    }

    #[test]
    fn candidate_falls_back_to_position() {
        assert_eq!(candidate_id("???", 3), "heading-3");
        assert_eq!(candidate_id("Intro", 3), "intro");
    }
}
