//! Match scoring — pluggable, trait-based scorer that turns a source posting into a
//! scored `JobPosting` for one candidate's skill list.
//!
//! Default: `KeywordMatchScorer` (pure-Rust, deterministic).
//! `AppState` holds an `Arc<dyn MatchScorer>`.

use std::collections::HashSet;

use serde::Serialize;

use crate::analytics::stats::round_to;
use crate::models::job::{JobPosting, SourceJob};

/// Per-candidate settings used by bulk matching.
pub const BULK_TOP_N: usize = 10;
pub const BULK_MIN_MATCH: u32 = 10;
/// Postings echoed back per candidate.
pub const BULK_TOP_JOBS: usize = 5;

/// Implement this to swap scoring backends without touching the handlers.
pub trait MatchScorer: Send + Sync {
    fn score(&self, resume_skills: &[String], job: &SourceJob) -> JobPosting;
}

/// Keyword overlap scorer.
///
/// Algorithm:
/// 1. Lower-case and trim both skill lists.
/// 2. Every skill present in both lists counts 1.0.
/// 3. Every other resume skill whose text contains, or is contained in, a
///    non-exact job skill counts 0.5 (first such job skill only).
/// 4. match = min(100, total / job_skills × 100), rounded to an integer.
pub struct KeywordMatchScorer;

impl MatchScorer for KeywordMatchScorer {
    fn score(&self, resume_skills: &[String], job: &SourceJob) -> JobPosting {
        let pct = match_percentage(resume_skills, &job.required_skills);
        JobPosting {
            title: job.title.clone(),
            company: job.company.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            link: job.link.clone(),
            scraped_at: job.scraped_at,
            is_fallback: job.is_fallback,
            match_score: pct.round() as u32,
            matching_skills: matching_skills(resume_skills, &job.required_skills),
        }
    }
}

fn normalized(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Percentage of the job's skills covered by the resume, 0.0–100.0.
pub fn match_percentage(resume_skills: &[String], job_skills: &[String]) -> f64 {
    let resume = normalized(resume_skills);
    let job = normalized(job_skills);
    if resume.is_empty() || job.is_empty() {
        return 0.0;
    }

    let job_set: HashSet<&str> = job.iter().map(String::as_str).collect();
    let exact: HashSet<&str> = resume
        .iter()
        .map(String::as_str)
        .filter(|s| job_set.contains(s))
        .collect();

    let partial = resume
        .iter()
        .filter(|rs| !exact.contains(rs.as_str()))
        .filter(|rs| {
            job.iter()
                .filter(|js| !exact.contains(js.as_str()))
                .any(|js| overlaps(rs, js))
        })
        .count() as f64
        * 0.5;

    let total = exact.len() as f64 + partial;
    (total / job.len() as f64 * 100.0).min(100.0)
}

/// Job skills, in their original spelling, that overlap some resume skill.
pub fn matching_skills(resume_skills: &[String], job_skills: &[String]) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();
    for rs in resume_skills {
        let rs_low = rs.trim().to_lowercase();
        if rs_low.is_empty() {
            continue;
        }
        for js in job_skills {
            let js_low = js.trim().to_lowercase();
            if js_low.is_empty() {
                continue;
            }
            if overlaps(&rs_low, &js_low) && !matched.contains(js) {
                matched.push(js.clone());
            }
        }
    }
    matched
}

/// Scores the pool, keeps postings at or above `min_match`, and returns the
/// best `top_n` by descending match. Equal scores keep pool order.
pub fn recommend(
    scorer: &dyn MatchScorer,
    resume_skills: &[String],
    pool: &[SourceJob],
    top_n: usize,
    min_match: u32,
) -> Vec<JobPosting> {
    let mut matches: Vec<JobPosting> = pool
        .iter()
        .map(|job| scorer.score(resume_skills, job))
        .filter(|posting| posting.match_score >= min_match)
        .collect();

    matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    matches.truncate(top_n);
    matches
}

/// One candidate's outcome against the shared pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    pub skills_count: usize,
    pub jobs_found: usize,
    /// Mean match over the recommended postings, one decimal. 0 when none matched.
    pub avg_match: f64,
    pub top_match: u32,
    pub top_jobs: Vec<JobPosting>,
}

/// Matches each candidate's skill list against the same pool. Output order
/// follows input order.
pub fn summarize_candidates(
    scorer: &dyn MatchScorer,
    candidates: &[Vec<String>],
    pool: &[SourceJob],
) -> Vec<CandidateSummary> {
    candidates
        .iter()
        .map(|skills| {
            let jobs = recommend(scorer, skills, pool, BULK_TOP_N, BULK_MIN_MATCH);
            let avg_match = if jobs.is_empty() {
                0.0
            } else {
                jobs.iter().map(|j| f64::from(j.match_score)).sum::<f64>() / jobs.len() as f64
            };
            CandidateSummary {
                skills_count: skills.len(),
                jobs_found: jobs.len(),
                avg_match: round_to(avg_match, 1),
                top_match: jobs.iter().map(|j| j.match_score).max().unwrap_or(0),
                top_jobs: jobs.into_iter().take(BULK_TOP_JOBS).collect(),
            }
        })
        .collect()
}
