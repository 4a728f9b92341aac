//! jobsift - job posting extraction from careers pages.
//!
//! Fetches a careers page, reduces it to visible text, splits it into job
//! sections and runs few-shot LLM extraction with source grounding. The
//! extracted records are consolidated into unique job postings and reported
//! as text, JSON or an HTML visualization.

pub mod cli;
pub mod config;
pub mod extraction;
pub mod jobs;
pub mod llm;
pub mod report;
pub mod scrapers;
pub mod utils;
