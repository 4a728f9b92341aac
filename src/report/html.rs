//! Static HTML visualization of an annotated document.

use crate::extraction::{AnnotatedDocument, Extraction};
use crate::jobs::JobPosting;
use crate::utils::{css_identifier, html_escape};

/// Highlight colours, assigned to classes in first-seen order.
const PALETTE: &[&str] = &[
    "#fde68a", "#bfdbfe", "#bbf7d0", "#fbcfe8", "#ddd6fe", "#fed7aa", "#a5f3fc", "#e5e7eb",
];

/// Render a self-contained page with highlighted spans and a postings table.
pub fn render_html(document: &AnnotatedDocument, jobs: &[JobPosting]) -> String {
    let classes = document.classes();

    let styles: String = classes
        .iter()
        .enumerate()
        .map(|(i, class)| {
            format!(
                "        mark.cls-{} {{ background: {}; }}\n",
                css_identifier(class),
                PALETTE[i % PALETTE.len()]
            )
        })
        .collect();

    let legend: String = classes
        .iter()
        .map(|class| {
            format!(
                r#"<span class="legend-item"><mark class="cls-{}">{}</mark></span>"#,
                css_identifier(class),
                html_escape(class)
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    let grounded = document.grounded().count();
    let title = html_escape(&document.document_id);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - jobsift</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 60rem; color: #111827; }}
        #document {{ white-space: pre-wrap; line-height: 1.6; border: 1px solid #e5e7eb; padding: 1rem; border-radius: 6px; }}
        mark {{ border-radius: 3px; padding: 0 2px; }}
        .legend-item {{ margin-right: 0.5rem; }}
        table {{ border-collapse: collapse; width: 100%; margin-top: 2rem; }}
        th, td {{ border: 1px solid #e5e7eb; padding: 0.5rem; text-align: left; vertical-align: top; }}
{styles}    </style>
</head>
<body>
    <h1>{title}</h1>
    <p class="summary">{total} extraction(s), {grounded} grounded</p>
    <div id="legend">{legend}</div>
    <div id="document">{body}</div>
    {table}
</body>
</html>
"#,
        title = title,
        styles = styles,
        total = document.extractions.len(),
        grounded = grounded,
        legend = legend,
        body = highlight(document),
        table = jobs_table(jobs),
    )
}

/// Document text with grounded extractions wrapped in `<mark>`.
///
/// Spans overlapping an earlier span are left unmarked.
fn highlight(document: &AnnotatedDocument) -> String {
    let mut spans: Vec<&Extraction> = document
        .grounded()
        .filter(|e| e.char_interval.is_some_and(|i| !i.is_empty()))
        .collect();
    spans.sort_by_key(|e| {
        e.char_interval
            .map(|i| (i.start_pos, std::cmp::Reverse(i.end_pos)))
            .unwrap_or((0, std::cmp::Reverse(0)))
    });

    let chars: Vec<char> = document.text.chars().collect();
    let mut out = String::new();
    let mut pos = 0usize;

    for extraction in spans {
        let Some(interval) = extraction.char_interval else {
            continue;
        };
        let end = interval.end_pos.min(chars.len());
        if interval.start_pos < pos || interval.start_pos >= end {
            continue;
        }

        out.push_str(&escape_chars(&chars[pos..interval.start_pos]));
        out.push_str(&format!(
            r#"<mark class="cls-{}" title="{}">{}</mark>"#,
            css_identifier(&extraction.extraction_class),
            html_escape(&tooltip(extraction)),
            escape_chars(&chars[interval.start_pos..end])
        ));
        pos = end;
    }

    out.push_str(&escape_chars(&chars[pos..]));
    out
}

fn tooltip(extraction: &Extraction) -> String {
    let mut tip = format!("{} #{}", extraction.extraction_class, extraction.extraction_index);
    if let Some(status) = extraction.alignment_status {
        if let Ok(serde_json::Value::String(name)) = serde_json::to_value(status) {
            tip.push_str(&format!(" ({})", name));
        }
    }
    for (key, value) in &extraction.attributes {
        tip.push_str(&format!("\n{}: {}", key, value));
    }
    tip
}

fn escape_chars(chars: &[char]) -> String {
    html_escape(&chars.iter().collect::<String>())
}

fn jobs_table(jobs: &[JobPosting]) -> String {
    if jobs.is_empty() {
        return "<p>No job postings.</p>".to_string();
    }

    let mut rows = String::new();
    for job in jobs {
        rows.push_str(&format!(
            r#"
            <tr>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
            </tr>"#,
            html_escape(&job.title),
            html_escape(job.location_or_none()),
            html_escape(&job.description)
        ));
    }

    format!(
        r#"<table class="jobs">
        <thead>
            <tr>
                <th>Title</th>
                <th>Location</th>
                <th>Description</th>
            </tr>
        </thead>
        <tbody>{}
        </tbody>
    </table>"#,
        rows
    )
}
