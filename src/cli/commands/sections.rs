//! Section preview command.

use console::style;

use crate::cli::helpers::{load_source, section_splitter};
use crate::config::Settings;
use crate::utils::truncate_chars;

/// Print the job sections detected in a page.
pub async fn cmd_sections(settings: &Settings, source: &str) -> anyhow::Result<()> {
    let page = load_source(settings, source).await?;
    let sections = section_splitter(settings)?.split(&page.text);

    if sections.is_empty() {
        println!("No job sections found.");
        return Ok(());
    }

    if let Some(title) = &page.title {
        println!("{}", style(title).bold());
    }
    println!("Found {} text sections\n", sections.len());

    for (i, section) in sections.iter().enumerate() {
        let mut lines = section.lines();
        let heading = lines.next().unwrap_or_default();
        println!(
            "{} {}",
            style(format!("[{}]", i + 1)).cyan(),
            style(truncate_chars(heading, 76)).bold()
        );
        for line in lines {
            println!("    {}", truncate_chars(line, 100));
        }
        println!();
    }

    Ok(())
}
