pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analytics API
        .route(
            "/api/v1/analytics/evaluate",
            post(analytics::handle_evaluate),
        )
        // Jobs API
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/match", post(jobs::handle_match))
        .route("/api/v1/jobs/filter", post(jobs::handle_filter))
        .route("/api/v1/jobs/bulk-match", post(jobs::handle_bulk_match))
        .route("/api/v1/jobs/cache-status", get(jobs::handle_cache_status))
        .route("/api/v1/jobs/refresh", post(jobs::handle_refresh))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    fn router() -> Router {
        build_router(AppState::new(Config::default()))
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn model_json(auc: f64) -> Value {
        json!({
            "accuracy": 0.84, "precision": 0.82, "recall": 0.8, "f1_score": 0.81,
            "auc_score": auc,
            "confusion_matrix": [[50, 8], [12, 30]],
            "support": { "rejected": 58, "accepted": 42 },
            "roc_curve": { "fpr": [0.0, 0.15, 1.0], "tpr": [0.0, 0.75, 1.0] }
        })
    }

    fn bundle_json() -> Value {
        json!({
            "decision_tree": model_json(0.79),
            "logistic_regression": model_json(0.86),
            "random_forest": model_json(0.92),
            "feature_importance": [
                { "feature": "skills_count", "importance": 0.45 },
                { "feature": "experience_years", "importance": 0.3 }
            ],
            "cross_validation": {
                "decision_tree": [0.78, 0.8, 0.76, 0.81, 0.79],
                "logistic_regression": [0.84, 0.85, 0.83, 0.86, 0.84],
                "random_forest": [0.9, 0.8, 0.85, 0.95, 0.9]
            }
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(router(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_evaluate_returns_report() {
        let (status, body) = send(
            router(),
            "POST",
            "/api/v1/analytics/evaluate?best_model=auc",
            Some(bundle_json()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["best_model"]["selected"], "random_forest");
        assert_eq!(body["auc_ranking"][0], "random_forest");
        assert_eq!(body["models"].as_array().unwrap().len(), 3);
        assert_eq!(body["comparison"]["accuracy"]["decision_tree"], 84.0);
    }

    #[tokio::test]
    async fn test_evaluate_missing_model_is_unprocessable() {
        let mut bundle = bundle_json();
        bundle.as_object_mut().unwrap().remove("random_forest");

        let (status, body) =
            send(router(), "POST", "/api/v1/analytics/evaluate", Some(bundle)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_evaluate_overflowing_support_is_unprocessable() {
        let mut bundle = bundle_json();
        bundle["random_forest"]["support"] = json!({ "rejected": u64::MAX, "accepted": 1 });

        let (status, body) =
            send(router(), "POST", "/api/v1/analytics/evaluate", Some(bundle)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_evaluate_rejects_unknown_policy() {
        let (status, _) = send(
            router(),
            "POST",
            "/api/v1/analytics/evaluate?best_model=svm",
            Some(bundle_json()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_match_scores_fallback_pool() {
        let (status, body) = send(
            router(),
            "POST",
            "/api/v1/jobs/match",
            Some(json!({ "skills": ["python", "sql", "docker"] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let jobs = body["jobs"].as_array().unwrap();
        assert!(!jobs.is_empty());
        assert!(jobs.len() <= 20);
        let scores: Vec<u64> = jobs.iter().map(|j| j["match"].as_u64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(body["cache_info"]["is_fresh"], true);
        assert!(body["available_locations"]
            .as_array()
            .unwrap()
            .contains(&json!("Remote")));
    }

    #[tokio::test]
    async fn test_match_without_overlap_lowers_threshold() {
        let (status, body) = send(
            router(),
            "POST",
            "/api/v1/jobs/match",
            Some(json!({ "skills": ["zzqx"] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let jobs = body["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 12);
        assert!(jobs.iter().all(|j| j["match"] == 0));
        assert_eq!(body["total_jobs"], 12);
    }

    #[tokio::test]
    async fn test_bulk_match_summarizes_each_candidate() {
        let (status, body) = send(
            router(),
            "POST",
            "/api/v1/jobs/bulk-match",
            Some(json!({
                "candidates": [
                    { "label": "alice.pdf", "skills": ["python", "sql", "docker"] },
                    { "label": "bob.pdf", "skills": [] }
                ]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["processed"], 2);
        let results = body["results"].as_array().unwrap();

        assert_eq!(results[0]["label"], "alice.pdf");
        assert_eq!(results[0]["skills_count"], 3);
        assert!(results[0]["jobs_found"].as_u64().unwrap() > 0);
        assert!(results[0]["jobs_found"].as_u64().unwrap() <= 10);
        assert!(results[0]["top_jobs"].as_array().unwrap().len() <= 5);
        assert!(results[0]["top_match"].as_u64().unwrap() >= 10);

        assert_eq!(results[1]["label"], "bob.pdf");
        assert_eq!(results[1]["jobs_found"], 0);
        assert_eq!(results[1]["avg_match"], 0.0);
    }

    #[tokio::test]
    async fn test_bulk_match_requires_candidates() {
        let (status, body) = send(
            router(),
            "POST",
            "/api/v1/jobs/bulk-match",
            Some(json!({ "candidates": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_filter_applies_shared_predicate() {
        let (status, body) = send(
            router(),
            "POST",
            "/api/v1/jobs/filter",
            Some(json!({
                "skills": ["python", "sql"],
                "location": "Remote",
                "skill_filters": ["python"],
                "min_match": 20
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let jobs = body["jobs"].as_array().unwrap();
        assert_eq!(body["total_jobs"].as_u64().unwrap() as usize, jobs.len());
        assert!(!jobs.is_empty());
        for job in jobs {
            assert_eq!(job["location"], "Remote");
            assert!(job["match"].as_u64().unwrap() >= 20);
            assert!(job["matching_skills"]
                .as_array()
                .unwrap()
                .contains(&json!("python")));
        }
    }

    #[tokio::test]
    async fn test_filter_rejects_out_of_range_min_match() {
        let (status, body) = send(
            router(),
            "POST",
            "/api/v1/jobs/filter",
            Some(json!({ "skills": ["python"], "min_match": 150 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_cache_status_before_and_after_refresh() {
        let app = router();

        let (_, before) = send(app.clone(), "GET", "/api/v1/jobs/cache-status", None).await;
        assert_eq!(before["jobs_count"], 0);
        assert_eq!(before["is_fresh"], false);

        let (status, refreshed) = send(app.clone(), "POST", "/api/v1/jobs/refresh", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(refreshed["jobs_count"], 12);

        let (_, after) = send(app, "GET", "/api/v1/jobs/cache-status", None).await;
        assert_eq!(after["jobs_count"], 12);
        assert_eq!(after["is_fresh"], true);
        assert_eq!(after["cache_duration_minutes"], 30);
    }
}
