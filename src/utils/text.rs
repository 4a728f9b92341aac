//! Text helpers.

/// Similarity of two strings in `[0, 1]`, ignoring case and surrounding whitespace.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.trim().to_lowercase(), &b.trim().to_lowercase())
}

/// Lowercase key with all non-word characters removed, for duplicate detection.
pub fn dedup_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Truncate to at most `max` characters, appending `...` when shortened.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("Web Developer", " web developer "), 1.0);
        assert!(similarity("Web Developer", "Web Developers") > 0.9);
        assert!(similarity("Web Developer", "Data Analyst") < 0.5);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_dedup_key() {
        assert_eq!(dedup_key("Manage projects, on-site!"), "manageprojectsonsite");
        assert_eq!(dedup_key("MANAGE projects on site"), "manageprojectsonsite");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("Senior Backend Engineer", 12), "Senior Ba...");
        assert_eq!(truncate_chars("ääääää", 5), "ää...");
    }
}
