//! Dropping postings that do not look like real openings.

use tracing::debug;

use super::{JobPosting, JobSettings};

/// Whether `title` contains one of the configured job keywords.
pub fn is_job_title(title: &str, settings: &JobSettings) -> bool {
    let title = title.to_lowercase();
    settings
        .title_keywords
        .iter()
        .any(|keyword| !keyword.is_empty() && title.contains(&keyword.to_lowercase()))
}

/// Keep postings with a job-like title and a substantial description.
pub fn filter_jobs(jobs: Vec<JobPosting>, settings: &JobSettings) -> Vec<JobPosting> {
    jobs.into_iter()
        .filter(|job| {
            let keep = is_job_title(&job.title, settings)
                && job.description.chars().count() > settings.min_description_chars;
            if !keep {
                debug!("Filtered out '{}'", job.title);
            }
            keep
        })
        .collect()
}
