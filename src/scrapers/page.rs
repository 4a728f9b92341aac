//! Visible text extraction from HTML pages.

use scraper::{ElementRef, Html, Selector};

/// Elements whose subtree never contains posting content.
const SKIPPED_ELEMENTS: &[&str] = &[
    "nav", "footer", "header", "script", "style", "noscript", "template",
];

/// Extract the visible text of a page, one trimmed text node per line.
///
/// Navigation, header and footer chrome are dropped along with scripts and
/// styles. Whitespace-only text nodes are skipped.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    collect_text(document.root_element(), &mut lines);
    lines.join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    if SKIPPED_ELEMENTS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
    }
}

/// Get the page `<title>`, if present and non-empty.
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title> Careers | Acme </title>
  <style>body { color: red; }</style>
  <script>var tracking = "Project Manager";</script>
</head>
<body>
  <header><a href="/">Acme Home</a></header>
  <nav><ul><li>Services</li><li>Careers</li></ul></nav>
  <main>
    <h2>Project Manager</h2>
    <p>Karachi, Pakistan</p>
    <p>Minimum <b>3 years</b> experience required.</p>
    <!-- not content -->
  </main>
  <footer>Copyright Acme</footer>
</body>
</html>"#;

    #[test]
    fn test_visible_text_drops_chrome() {
        let text = visible_text(PAGE);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Careers | Acme",
                "Project Manager",
                "Karachi, Pakistan",
                "Minimum",
                "3 years",
                "experience required.",
            ]
        );
        assert!(!text.contains("tracking"));
        assert!(!text.contains("Services"));
        assert!(!text.contains("Copyright"));
        assert!(!text.contains("not content"));
    }

    #[test]
    fn test_visible_text_empty_document() {
        assert_eq!(visible_text(""), "");
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title(PAGE), Some("Careers | Acme".to_string()));
        assert_eq!(page_title("<html><body>x</body></html>"), None);
    }
}
