//! In-page reference slugs.

/// URL-friendly slug for a heading or title.
///
/// Case is preserved and alphanumerics are kept. Every run of anything
/// else becomes a single `-`, and separators at either end are dropped:
/// `"  This $%@! Long Title  "` becomes `This-Long-Title`.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending && !out.is_empty() {
                out.push('-');
            }
            pending = false;
            out.push(c);
        } else {
            pending = true;
        }
    }
    out
}

/// Local reference to a heading, e.g. `#This-Long-Title`.
pub fn local_ref(text: &str) -> String {
    format!("#{}", slug(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(slug("  This $%@! Long Title  "), "This-Long-Title");
    }

    #[test]
    fn keeps_case_and_digits() {
        assert_eq!(slug("Example: Hello World 2"), "Example-Hello-World-2");
        assert_eq!(slug("snake_case_name"), "snake-case-name");
    }

    #[test]
    fn unicode_letters_survive() {
        assert_eq!(slug("Café au lait"), "Café-au-lait");
    }

    #[test]
    fn empty_and_symbol_only() {
        assert_eq!(slug(""), "");
        assert_eq!(slug("!!!"), "");
    }

    #[test]
    fn local_ref_has_hash() {
        assert_eq!(local_ref("Point Class"), "#Point-Class");
    }
}
