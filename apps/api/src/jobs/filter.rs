//! Job filter engine — the client-side equivalent of the filter endpoint.
//!
//! A posting passes iff all three predicates hold:
//! - `criteria.location` is `None` or equals `job.location` (case-sensitive)
//! - every required skill appears in `job.matching_skills`
//! - `job.match_score >= criteria.min_match`
//!
//! The predicates are independent and conjunctive, so the order they are
//! applied in never changes the result.

use std::collections::BTreeSet;

use crate::errors::EngineError;
use crate::models::job::{FilterCriteria, JobPosting};

/// Default number of skill facets shown in the filter panel.
pub const DEFAULT_SKILL_DISPLAY_CAP: usize = 20;

impl FilterCriteria {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0..=100).contains(&self.min_match) {
            return Err(EngineError::InvalidCriteria(format!(
                "min_match must be within 0..=100, got {}",
                self.min_match
            )));
        }
        Ok(())
    }

    /// Returns a copy with `skill` added if absent, removed if present.
    pub fn with_skill_toggled(&self, skill: &str) -> FilterCriteria {
        FilterCriteria {
            required_skills: toggle_skill(&self.required_skills, skill),
            ..self.clone()
        }
    }

    pub fn accepts(&self, job: &JobPosting) -> bool {
        let location_ok = match &self.location {
            None => true,
            Some(wanted) => job.location.as_deref() == Some(wanted.as_str()),
        };

        let skills_ok = self
            .required_skills
            .iter()
            .all(|skill| job.matching_skills.iter().any(|s| s == skill));

        let match_ok = i64::from(job.match_score) >= i64::from(self.min_match);

        location_ok && skills_ok && match_ok
    }
}

/// Stable filter: survivors keep their original relative order.
/// No matches is a valid outcome, not an error.
pub fn filter(jobs: &[JobPosting], criteria: &FilterCriteria) -> Result<Vec<JobPosting>, EngineError> {
    criteria.validate()?;
    Ok(jobs.iter().filter(|job| criteria.accepts(job)).cloned().collect())
}

pub fn available_locations(jobs: &[JobPosting]) -> BTreeSet<String> {
    jobs.iter().filter_map(|job| job.location.clone()).collect()
}

/// Union of every posting's matching skills, untruncated.
pub fn available_skills(jobs: &[JobPosting]) -> BTreeSet<String> {
    jobs.iter()
        .flat_map(|job| job.matching_skills.iter().cloned())
        .collect()
}

/// First `cap` skills in sorted order, for display.
pub fn display_skills(skills: &BTreeSet<String>, cap: usize) -> Vec<String> {
    skills.iter().take(cap).cloned().collect()
}

/// Symmetric difference with `{skill}`. Toggling twice restores the input.
pub fn toggle_skill(skills: &BTreeSet<String>, skill: &str) -> BTreeSet<String> {
    let mut next = skills.clone();
    if !next.remove(skill) {
        next.insert(skill.to_string());
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, location: Option<&str>, score: u32, skills: &[&str]) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            company: "Acme".to_string(),
            description: String::new(),
            location: location.map(str::to_string),
            link: None,
            scraped_at: None,
            is_fallback: false,
            match_score: score,
            matching_skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn pool() -> Vec<JobPosting> {
        vec![
            job("Python Developer", Some("Bangalore, India"), 80, &["python", "sql"]),
            job("Data Analyst", Some("Pune, India"), 40, &["sql", "excel"]),
            job("DevOps Engineer", Some("Remote"), 55, &["docker", "python"]),
            job("React Developer", None, 95, &["react"]),
        ]
    }

    fn titles(jobs: &[JobPosting]) -> Vec<&str> {
        jobs.iter().map(|j| j.title.as_str()).collect()
    }

    fn skills(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_criteria_returns_everything_in_order() {
        let jobs = pool();
        let result = filter(&jobs, &FilterCriteria::default()).unwrap();
        assert_eq!(result, jobs);
    }

    #[test]
    fn test_min_match_is_inclusive() {
        let jobs = vec![job("A", None, 80, &[]), job("B", None, 40, &[])];
        let criteria = FilterCriteria {
            min_match: 50,
            ..Default::default()
        };
        assert_eq!(titles(&filter(&jobs, &criteria).unwrap()), vec!["A"]);

        let at_bound = FilterCriteria {
            min_match: 40,
            ..Default::default()
        };
        assert_eq!(filter(&jobs, &at_bound).unwrap().len(), 2);
    }

    #[test]
    fn test_location_is_exact_and_case_sensitive() {
        let criteria = FilterCriteria {
            location: Some("Remote".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&filter(&pool(), &criteria).unwrap()), vec!["DevOps Engineer"]);

        let lower = FilterCriteria {
            location: Some("remote".to_string()),
            ..Default::default()
        };
        assert!(filter(&pool(), &lower).unwrap().is_empty());
    }

    #[test]
    fn test_required_skills_is_subset_test() {
        let criteria = FilterCriteria {
            required_skills: skills(&["python", "sql"]),
            ..Default::default()
        };
        assert_eq!(titles(&filter(&pool(), &criteria).unwrap()), vec!["Python Developer"]);
    }

    #[test]
    fn test_combined_predicates_keep_order() {
        let criteria = FilterCriteria {
            required_skills: skills(&["python"]),
            min_match: 50,
            ..Default::default()
        };
        assert_eq!(
            titles(&filter(&pool(), &criteria).unwrap()),
            vec!["Python Developer", "DevOps Engineer"]
        );
    }

    #[test]
    fn test_raising_min_match_never_grows_result() {
        let jobs = pool();
        let mut previous = usize::MAX;
        for min_match in (0..=100).step_by(5) {
            let criteria = FilterCriteria {
                min_match,
                ..Default::default()
            };
            let count = filter(&jobs, &criteria).unwrap().len();
            assert!(count <= previous, "min_match {min_match} grew the result");
            previous = count;
        }
    }

    #[test]
    fn test_adding_required_skill_never_grows_result() {
        let jobs = pool();
        let one = FilterCriteria {
            required_skills: skills(&["sql"]),
            ..Default::default()
        };
        let two = one.with_skill_toggled("excel");
        let wide = filter(&jobs, &one).unwrap().len();
        let narrow = filter(&jobs, &two).unwrap().len();
        assert!(narrow <= wide);
        assert_eq!(narrow, 1);
    }

    #[test]
    fn test_no_matches_is_ok() {
        let criteria = FilterCriteria {
            location: Some("Mars".to_string()),
            ..Default::default()
        };
        assert!(filter(&pool(), &criteria).unwrap().is_empty());
    }

    #[test]
    fn test_min_match_out_of_range_is_invalid() {
        for min_match in [-1, 101] {
            let criteria = FilterCriteria {
                min_match,
                ..Default::default()
            };
            assert!(matches!(
                filter(&pool(), &criteria),
                Err(EngineError::InvalidCriteria(_))
            ));
        }
    }

    #[test]
    fn test_available_locations_skips_missing() {
        let locations = available_locations(&pool());
        assert_eq!(locations.len(), 3);
        assert!(locations.contains("Remote"));
    }

    #[test]
    fn test_available_skills_union_and_display_cap() {
        let all = available_skills(&pool());
        assert_eq!(
            all.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["docker", "excel", "python", "react", "sql"]
        );
        assert_eq!(display_skills(&all, 2), vec!["docker", "excel"]);
        assert_eq!(display_skills(&all, DEFAULT_SKILL_DISPLAY_CAP).len(), 5);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let original = skills(&["python"]);
        let once = toggle_skill(&original, "sql");
        assert!(once.contains("sql"));
        assert_eq!(toggle_skill(&once, "sql"), original);

        let removed = toggle_skill(&original, "python");
        assert!(removed.is_empty());
        assert_eq!(toggle_skill(&removed, "python"), original);
    }
}
