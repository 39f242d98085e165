//! Job sources — where the job pool comes from.
//!
//! Live board scraping lives outside this service; anything that can hand back a
//! list of `SourceJob`s plugs in through `JobSource`. `FallbackJobSource` serves a
//! fixed catalogue so the pool is never empty.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::job::SourceJob;

#[async_trait]
pub trait JobSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<SourceJob>, AppError>;
}

/// Serves the built-in catalogue.
pub struct FallbackJobSource;

#[async_trait]
impl JobSource for FallbackJobSource {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn fetch(&self) -> Result<Vec<SourceJob>, AppError> {
        Ok(fallback_catalogue())
    }
}

/// Drops later postings whose `(title, company)` repeats case-insensitively,
/// then keeps at most `max_jobs`.
pub fn dedupe(jobs: Vec<SourceJob>, max_jobs: usize) -> Vec<SourceJob> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert((job.title.to_lowercase(), job.company.to_lowercase())))
        .take(max_jobs)
        .collect()
}

fn posting(
    title: &str,
    company: &str,
    location: &str,
    description: &str,
    skills: &[&str],
    link: &str,
) -> SourceJob {
    SourceJob {
        title: title.to_string(),
        company: company.to_string(),
        location: Some(location.to_string()),
        description: description.to_string(),
        required_skills: skills.iter().map(|s| s.to_string()).collect(),
        link: Some(link.to_string()),
        scraped_at: None,
        is_fallback: true,
    }
}

pub fn fallback_catalogue() -> Vec<SourceJob> {
    vec![
        posting("Python Developer", "TCS", "Bangalore, India", "Python developer for enterprise",
            &["python", "django", "sql", "rest api", "git"], "https://www.tcs.com/careers"),
        posting("Full Stack Developer", "Infosys", "Hyderabad, India", "Full stack with React and Node.js",
            &["javascript", "react", "node", "mongodb", "html", "css"], "https://www.infosys.com/careers"),
        posting("Data Analyst", "Wipro", "Pune, India", "Data analyst with Excel and SQL",
            &["excel", "sql", "python", "data analysis", "tableau"], "https://careers.wipro.com"),
        posting("VBA Developer", "Accenture India", "Mumbai, India", "VBA developer for Excel automation",
            &["vba", "excel", "macros", "sql", "access"], "https://www.accenture.com/in-en/careers"),
        posting("Java Developer", "HCL Technologies", "Chennai, India", "Java backend developer",
            &["java", "spring", "sql", "rest api", "microservices"], "https://www.hcltech.com/careers"),
        posting("DevOps Engineer", "Tech Mahindra", "Bangalore, India", "DevOps with AWS and Docker",
            &["aws", "docker", "kubernetes", "jenkins", "linux"], "https://www.techmahindra.com/careers"),
        posting("React Developer", "Cognizant", "Noida, India", "Frontend React developer",
            &["react", "javascript", "html", "css", "typescript"], "https://careers.cognizant.com"),
        posting("Business Analyst", "Capgemini India", "Gurgaon, India", "Business analyst with Excel and VBA",
            &["excel", "vba", "sql", "power bi", "data analysis"], "https://www.capgemini.com/in-en/careers"),
        posting("Senior Python Developer", "TechCorp Solutions", "Remote", "Experienced Python developer for scalable backend",
            &["python", "django", "flask", "api", "sql", "git", "docker"], "https://example.com/jobs/python-dev"),
        posting("Data Scientist", "DataTech Analytics", "Remote", "Data Scientist with ML and Python",
            &["python", "machine learning", "data analysis", "sql", "pandas", "numpy"], "https://example.com/jobs/data-scientist"),
        posting("DevOps Engineer", "Cloud Infrastructure Co", "Remote", "DevOps with AWS and Kubernetes",
            &["docker", "kubernetes", "aws", "ci/cd", "linux", "git", "python"], "https://example.com/jobs/devops"),
        posting("Frontend React Developer", "UI/UX Studios", "Remote", "Frontend React developer",
            &["react", "javascript", "html", "css", "typescript", "git"], "https://example.com/jobs/frontend"),
    ]
}
