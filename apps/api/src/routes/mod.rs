pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assembly::handlers as documents;
use crate::catalog::handlers as catalog;
use crate::import::handlers as import;
use crate::render::handlers as export;
use crate::sessions::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_clear_session),
        )
        // Catalog
        .route(
            "/api/v1/github/users/:username/repos",
            get(catalog::handle_list_repositories),
        )
        .route(
            "/api/v1/github/users/:username/profile",
            get(catalog::handle_user_profile),
        )
        .route(
            "/api/v1/github/cache/refresh",
            post(catalog::handle_refresh_cache),
        )
        // Import flow
        .route("/api/v1/sessions/:id/import", get(import::handle_import_status))
        .route(
            "/api/v1/sessions/:id/import/catalog",
            post(import::handle_load_catalog),
        )
        .route(
            "/api/v1/sessions/:id/import/selection",
            post(import::handle_toggle_selection),
        )
        .route(
            "/api/v1/sessions/:id/import/analyze",
            post(import::handle_analyze),
        )
        // Documents
        .route("/api/v1/sessions/:id/resume", get(documents::handle_get_resume))
        .route(
            "/api/v1/sessions/:id/resume/groups",
            get(documents::handle_get_resume_groups),
        )
        .route(
            "/api/v1/sessions/:id/portfolio",
            get(documents::handle_get_portfolio),
        )
        // Export
        .route(
            "/api/v1/export/resume/pdf",
            post(export::handle_export_resume_pdf),
        )
        .route(
            "/api/v1/export/resume/json",
            post(export::handle_export_resume_json),
        )
        .route(
            "/api/v1/export/resume/share",
            post(export::handle_share_resume),
        )
        .route(
            "/api/v1/export/portfolio",
            post(export::handle_export_portfolio),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::{CatalogError, RepositoryCatalog};
    use crate::import::services::{BulletContext, BulletGenerator, ServiceError, SkillExtractor};
    use crate::import::ImportOrchestrator;
    use crate::models::analysis::{Bullet, SkillRecord};
    use crate::models::documents::{PortfolioModel, ResumeModel};
    use crate::models::repository::{snapshot, RepositorySnapshot};
    use crate::models::user::GitHubProfile;
    use crate::render::{DocumentRenderer, RenderError, ShareLink};
    use crate::sessions::SessionStore;

    struct FakeCatalog;

    #[async_trait]
    impl RepositoryCatalog for FakeCatalog {
        async fn list_repositories(
            &self,
            username: &str,
            limit: usize,
        ) -> Result<Vec<RepositorySnapshot>, CatalogError> {
            if username == "ghost" {
                return Err(CatalogError::NotFound(username.to_string()));
            }
            let mut repos = vec![
                snapshot("api", &["Go"]),
                snapshot("web", &["TypeScript"]),
                snapshot("infra", &["HCL"]),
            ];
            repos.truncate(limit);
            Ok(repos)
        }

        async fn user_profile(&self, username: &str) -> Result<GitHubProfile, CatalogError> {
            if username == "ghost" {
                return Err(CatalogError::NotFound(username.to_string()));
            }
            Ok(GitHubProfile {
                login: username.to_string(),
                name: Some("The Octocat".to_string()),
                bio: None,
                location: Some("San Francisco".to_string()),
                email: None,
                blog: None,
                avatar_url: None,
                html_url: format!("https://github.com/{username}"),
                public_repos: 3,
                followers: 0,
            })
        }
    }

    #[derive(Clone, Copy)]
    enum Mode {
        Succeed,
        FailBullets,
        Hang,
    }

    struct FakeAnalysis {
        mode: Mode,
    }

    #[async_trait]
    impl SkillExtractor for FakeAnalysis {
        async fn extract_skills(
            &self,
            repos: &[RepositorySnapshot],
        ) -> Result<Vec<SkillRecord>, ServiceError> {
            if let Mode::Hang = self.mode {
                std::future::pending::<()>().await;
            }
            Ok(repos
                .iter()
                .map(|r| SkillRecord {
                    repo: r.name.clone(),
                    skills: r.languages.clone(),
                    tools: vec!["Docker".to_string()],
                    ..Default::default()
                })
                .collect())
        }
    }

    #[async_trait]
    impl BulletGenerator for FakeAnalysis {
        async fn generate_bullets(
            &self,
            projects: &[RepositorySnapshot],
            _context: &BulletContext,
        ) -> Result<Vec<Bullet>, ServiceError> {
            match self.mode {
                Mode::Succeed => {}
                Mode::FailBullets => {
                    return Err(ServiceError::Api {
                        status: 500,
                        message: "Bullet generation failed".to_string(),
                    })
                }
                Mode::Hang => std::future::pending::<()>().await,
            }
            Ok(projects
                .iter()
                .map(|p| Bullet {
                    project: p.name.clone(),
                    text: "x".repeat(250),
                    ..Default::default()
                })
                .collect())
        }
    }

    struct FakeRenderer;

    #[async_trait]
    impl DocumentRenderer for FakeRenderer {
        async fn resume_pdf(&self, _resume: &ResumeModel) -> Result<Bytes, RenderError> {
            Ok(Bytes::from_static(b"%PDF-1.7"))
        }

        async fn resume_json(&self, resume: &ResumeModel) -> Result<Value, RenderError> {
            Ok(json!({ "basics": { "name": resume.profile.name } }))
        }

        async fn share_resume(&self, _resume: &ResumeModel) -> Result<ShareLink, RenderError> {
            Err(RenderError::Api {
                status: 503,
                message: "share service down".to_string(),
            })
        }

        async fn portfolio_bundle(&self, _portfolio: &PortfolioModel) -> Result<Bytes, RenderError> {
            Ok(Bytes::from_static(b"PK"))
        }
    }

    fn app_with(mode: Mode) -> Router {
        let analysis = Arc::new(FakeAnalysis { mode });
        build_router(AppState {
            catalog: Arc::new(FakeCatalog),
            orchestrator: ImportOrchestrator::new(
                analysis.clone(),
                analysis,
                Duration::from_secs(1),
            ),
            renderer: Arc::new(FakeRenderer),
            sessions: SessionStore::new(),
            catalog_limit: 10,
        })
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn sign_in(app: &Router) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({ "username": "octocat", "name": "Mona Lisa" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app_with(Mode::Succeed), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "devprofile-api");
    }

    #[tokio::test]
    async fn test_full_import_flow() {
        let app = app_with(Mode::Succeed);
        let id = sign_in(&app).await;

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/catalog"),
            Some(json!({ "username": "octocat" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stage"], "awaiting_selection");
        assert_eq!(body["repos"].as_array().unwrap().len(), 3);

        for name in ["infra", "api"] {
            let (status, _) = call(
                &app,
                Method::POST,
                &format!("/api/v1/sessions/{id}/import/selection"),
                Some(json!({ "name": name })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, result) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/analyze"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["username"], "octocat");
        assert_eq!(result["repos"][0]["name"], "api");
        assert_eq!(result["repos"][1]["name"], "infra");

        let (_, resume) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/resume"), None).await;
        assert_eq!(resume["profile"]["name"], "Mona Lisa");
        assert_eq!(resume["skills"], json!(["Go", "Docker", "HCL"]));

        let (_, groups) = call(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/resume/groups"),
            None,
        )
        .await;
        assert_eq!(groups[0]["project"], "api");
        assert_eq!(groups[0]["bullets"][0]["truncated"], true);
        assert_eq!(
            groups[0]["bullets"][0]["text"].as_str().unwrap().chars().count(),
            200
        );

        let (_, portfolio) = call(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/portfolio"),
            None,
        )
        .await;
        assert_eq!(portfolio["projects"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_analysis_failure_leaves_no_result() {
        let app = app_with(Mode::FailBullets);
        let id = sign_in(&app).await;
        call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/catalog"),
            Some(json!({ "username": "octocat" })),
        )
        .await;
        call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/selection"),
            Some(json!({ "name": "api" })),
        )
        .await;

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/analyze"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "ANALYSIS_ERROR");
        assert_eq!(body["error"]["side"], "bullet_generation");

        let (_, status_body) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/import"), None).await;
        assert_eq!(status_body["stage"], "awaiting_selection");
        assert!(status_body["result"].is_null());
        assert_eq!(status_body["selected"], json!(["api"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_analyze_request_still_settles_session() {
        let app = app_with(Mode::Hang);
        let id = sign_in(&app).await;
        call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/catalog"),
            Some(json!({ "username": "octocat" })),
        )
        .await;
        call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/selection"),
            Some(json!({ "name": "api" })),
        )
        .await;

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/v1/sessions/{id}/import/analyze"))
            .body(Body::empty())
            .unwrap();
        let abandoned =
            tokio::time::timeout(Duration::from_millis(100), app.clone().oneshot(request)).await;
        assert!(abandoned.is_err());

        // past the 1s analysis timeout
        tokio::time::sleep(Duration::from_secs(2)).await;

        let (_, status_body) =
            call(&app, Method::GET, &format!("/api/v1/sessions/{id}/import"), None).await;
        assert_eq!(status_body["stage"], "awaiting_selection");
        assert!(status_body["result"].is_null());
        assert_eq!(status_body["selected"], json!(["api"]));

        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/catalog"),
            Some(json!({ "username": "octocat" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected() {
        let app = app_with(Mode::Succeed);
        let id = sign_in(&app).await;
        call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/catalog"),
            Some(json!({ "username": "octocat" })),
        )
        .await;

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/import/analyze"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EMPTY_SELECTION");
    }

    #[tokio::test]
    async fn test_unknown_session_is_unauthorized() {
        let app = app_with(Mode::Succeed);
        let uri = format!("/api/v1/sessions/{}/resume", uuid::Uuid::new_v4());
        let (status, body) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let app = app_with(Mode::Succeed);
        let id = sign_in(&app).await;

        let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_resume_without_import_is_identity_only() {
        let app = app_with(Mode::Succeed);
        let id = sign_in(&app).await;

        let (status, resume) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}/resume"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resume["profile"]["github_url"], "https://github.com/octocat");
        assert_eq!(resume["skills"], json!([]));
        assert_eq!(resume["bullets"], json!([]));
    }

    #[tokio::test]
    async fn test_stateless_catalog_lookup() {
        let app = app_with(Mode::Succeed);

        let (status, body) = call(&app, Method::GET, "/api/v1/github/users/octocat/repos?limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["repos"].as_array().unwrap().len(), 2);

        let (status, _) = call(&app, Method::GET, "/api/v1/github/users/octocat/repos?limit=21", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&app, Method::GET, "/api/v1/github/users/ghost/repos", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_user_profile_lookup() {
        let app = app_with(Mode::Succeed);

        let (status, body) = call(&app, Method::GET, "/api/v1/github/users/octocat/profile", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"], "San Francisco");

        let (status, _) = call(&app, Method::GET, "/api/v1/github/users/ghost/profile", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, Method::GET, "/api/v1/github/users/bad%20name/profile", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pdf_export_sets_download_headers() {
        let app = app_with(Mode::Succeed);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/export/resume/pdf")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "profile": { "name": "Mona Lisa" } }).to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Mona_Lisa_resume.pdf\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_render_failure_maps_to_render_error() {
        let (status, body) = call(
            &app_with(Mode::Succeed),
            Method::POST,
            "/api/v1/export/resume/share",
            Some(json!({ "profile": { "name": "Mona" } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "RENDER_ERROR");
    }
}
