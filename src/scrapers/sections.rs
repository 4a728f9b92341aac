//! Splitting page text into candidate job sections.

use regex::{RegexSet, RegexSetBuilder};

/// Patterns whose match on a line starts a new job section.
pub const DEFAULT_SECTION_PATTERNS: &[&str] = &[
    r"(project manager|software developer|web developer|data analyst|ui/ux designer|quality assurance|devops engineer|marketing manager|sales manager)",
    r"(position|role|job|opening|career|hiring)",
];

/// Separator placed between sections when they are combined for extraction.
pub const DEFAULT_SECTION_SEPARATOR: &str = "\n\n--- SECTION ---\n\n";

/// Line-oriented splitter driven by case-insensitive start patterns.
#[derive(Debug, Clone)]
pub struct SectionSplitter {
    patterns: RegexSet,
}

impl SectionSplitter {
    /// Build a splitter from section start patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = RegexSetBuilder::new(patterns)
            .case_insensitive(true)
            .build()?;
        Ok(Self { patterns })
    }

    /// Whether a line opens a new section.
    pub fn is_section_start(&self, line: &str) -> bool {
        self.patterns.is_match(line)
    }

    /// Split text into sections.
    ///
    /// Lines are trimmed and blank lines dropped. A start line closes the
    /// current section (if any) and opens a new one.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut sections = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if self.is_section_start(line) && !current.is_empty() {
                sections.push(current.join("\n"));
                current = vec![line];
            } else {
                current.push(line);
            }
        }

        if !current.is_empty() {
            sections.push(current.join("\n"));
        }

        sections
    }
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_PATTERNS).expect("default section patterns are valid")
    }
}

/// Join sections into one document for extraction.
pub fn combine_sections(sections: &[String], separator: &str) -> String {
    sections.join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_job_lines() {
        let text = "Acme Solutions\nWe build things\n\nProject Manager\nKarachi\n  \nSoftware Developer\nRemote\n";
        let sections = SectionSplitter::default().split(text);
        assert_eq!(
            sections,
            vec![
                "Acme Solutions\nWe build things",
                "Project Manager\nKarachi",
                "Software Developer\nRemote",
            ]
        );
    }

    #[test]
    fn test_first_start_line_does_not_emit_empty_section() {
        let sections = SectionSplitter::default().split("Open Positions\nData Analyst\nLahore");
        assert_eq!(sections, vec!["Open Positions", "Data Analyst\nLahore"]);
    }

    #[test]
    fn test_case_insensitive_and_substring_match() {
        let splitter = SectionSplitter::default();
        assert!(splitter.is_section_start("WE ARE HIRING!"));
        assert!(splitter.is_section_start("Browse jobs"));
        assert!(splitter.is_section_start("devops engineer (mid)"));
        assert!(!splitter.is_section_start("Karachi, Pakistan"));
    }

    #[test]
    fn test_empty_text() {
        assert!(SectionSplitter::default().split("\n \n").is_empty());
    }

    #[test]
    fn test_custom_patterns() {
        let splitter = SectionSplitter::new(["^vacancy"]).unwrap();
        let sections = splitter.split("intro\nVacancy: Chef\nkitchen\nvacancy: Waiter");
        assert_eq!(sections, vec!["intro", "Vacancy: Chef\nkitchen", "vacancy: Waiter"]);
        assert!(SectionSplitter::new(["("]).is_err());
    }

    #[test]
    fn test_combine_sections() {
        let sections = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            combine_sections(&sections, DEFAULT_SECTION_SEPARATOR),
            "a\n\n--- SECTION ---\n\nb"
        );
    }
}
