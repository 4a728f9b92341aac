//! HTML escaping utilities.

/// Escape HTML special characters for safe rendering in text and attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Turn an arbitrary label into a CSS class suffix.
///
/// ASCII alphanumerics are lowercased, everything else becomes `-`.
pub fn css_identifier(label: &str) -> String {
    let ident: String = label
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if ident.is_empty() {
        "unnamed".to_string()
    } else {
        ident
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_basic() {
        assert_eq!(html_escape("hello"), "hello");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(html_escape("Bachelor's"), "Bachelor&#39;s");
    }

    #[test]
    fn test_html_escape_ampersand_first() {
        assert_eq!(html_escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_css_identifier() {
        assert_eq!(css_identifier("title"), "title");
        assert_eq!(css_identifier("Job Title"), "job-title");
        assert_eq!(css_identifier("lieu/ville"), "lieu-ville");
        assert_eq!(css_identifier("  "), "unnamed");
    }
}
