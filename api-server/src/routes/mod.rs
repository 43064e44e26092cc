//! 路由模块
//!
//! Precedence: API routes, then the named HTML pages, then the static file
//! fallback. Unknown paths, including unknown `/api/*` paths, end at the
//! static server and 404 there whatever the method.

pub mod auth;
pub mod health;
pub mod ideas;
pub mod pages;
pub mod teams;
pub mod users;

use std::path::Path;

use axum::handler::HandlerWithoutStateExt;
use axum::Router;
use common::errors::AppError;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Feature route groups and their mount prefixes.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/users", users::router())
        .nest("/api/teams", teams::router())
        .nest("/api/ideas", ideas::router())
}

/// Full route table rooted at `static_root`.
pub fn router(static_root: &Path) -> Router<AppState> {
    api_router()
        .merge(pages::router(static_root))
        .fallback_service(
            ServeDir::new(static_root)
                .call_fallback_on_method_not_allowed(true)
                .fallback(not_found.into_service()),
        )
}

async fn not_found() -> AppError {
    AppError::NotFound("resource".into())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use common::config::AppConfig;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::create_router;
    use crate::db::ConnectivityState;
    use crate::state::AppState;

    struct TestApp {
        state: AppState,
        static_root: PathBuf,
    }

    impl TestApp {
        fn new() -> Self {
            let static_root =
                std::env::temp_dir().join(format!("hackmate-static-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&static_root).unwrap();
            std::fs::write(static_root.join("index.html"), "<h1>home</h1>").unwrap();
            std::fs::write(static_root.join("login.html"), "<h1>login</h1>").unwrap();
            std::fs::write(static_root.join("style.css"), "body { margin: 0 }").unwrap();

            let mut config = AppConfig::from_lookup("api-server", |_| None);
            config.static_root = static_root.clone();

            Self {
                state: AppState::new(config),
                static_root,
            }
        }

        async fn send(&self, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            create_router(self.state.clone()).oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str) -> Response {
            self.send(Method::GET, uri, None).await
        }
    }

    impl Drop for TestApp {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.static_root);
        }
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_each_state() {
        let app = TestApp::new();
        for state in ConnectivityState::ALL {
            app.state.monitor.set_state(state);
            let response = app.get("/api/health").await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                body_json(response).await,
                serde_json::json!({ "status": "ok", "db": state.as_str() })
            );
        }
    }

    #[tokio::test]
    async fn test_health_unmapped_state_is_unknown() {
        let app = TestApp::new();
        app.state.monitor.set_state_code(7);
        let response = app.get("/api/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["db"], "unknown");
    }

    #[tokio::test]
    async fn test_helth_alias_matches_health() {
        let app = TestApp::new();
        app.state.monitor.set_state(ConnectivityState::Connecting);
        let health = body_bytes(app.get("/api/health").await).await;
        let helth = body_bytes(app.get("/api/helth").await).await;
        assert_eq!(health, helth);
    }

    #[tokio::test]
    async fn test_named_page_served_from_static_root() {
        let app = TestApp::new();
        let response = app.get("/login.html").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"<h1>login</h1>");
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let app = TestApp::new();
        let response = app.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_missing_named_page_is_404() {
        let app = TestApp::new();
        assert_eq!(app.get("/profile.html").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_asset_fallback() {
        let app = TestApp::new();
        let response = app.get("/style.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/css"));
    }

    #[tokio::test]
    async fn test_unknown_api_path_falls_through_to_404() {
        let app = TestApp::new();
        assert_eq!(app.get("/api/unknown").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_path_is_404_for_any_method() {
        let app = TestApp::new();
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let response = app.send(method.clone(), "/api/unknown", None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method}");
            assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
        }
        let response = app.send(Method::POST, "/no-such-page.html", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let app = TestApp::new();
        let response = app
            .send(
                Method::POST,
                "/api/auth/register",
                Some(serde_json::json!({ "email": "ada@example.com" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_validation_error() {
        let app = TestApp::new();
        let team = serde_json::json!({
            "name": "Rustaceans",
            "owner_id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "max_members": -1,
        });
        let response = app.send(Method::POST, "/api/teams", Some(team)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let app = TestApp::new();
        let register = serde_json::json!({
            "name": "   ",
            "email": "ada@example.com",
            "password": "long enough",
        });
        let response = app.send(Method::POST, "/api/auth/register", Some(register)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");

        let idea = serde_json::json!({
            "title": " \t ",
            "description": "A matchmaking bot",
            "author_id": "65a1f0c2e4b0a1b2c3d4e5f6",
        });
        let response = app.send(Method::POST, "/api/ideas", Some(idea)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_feature_groups_need_database() {
        let app = TestApp::new();
        let login = serde_json::json!({ "email": "ada@example.com", "password": "hunter22" });

        let responses = vec![
            app.send(Method::POST, "/api/auth/login", Some(login)).await,
            app.get("/api/users").await,
            app.get("/api/teams").await,
            app.get("/api/ideas").await,
        ];
        for response in responses {
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
            let body = body_json(response).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"]["code"], "DATABASE_UNAVAILABLE");
            assert_eq!(body["error"]["message"], "database is disconnected");
        }
    }

    #[tokio::test]
    async fn test_groups_are_distinct() {
        let app = TestApp::new();
        // Teams accept POST on the group root; users do not.
        let team = serde_json::json!({
            "name": "Rustaceans",
            "owner_id": "65a1f0c2e4b0a1b2c3d4e5f6",
        });
        let teams = app.send(Method::POST, "/api/teams", Some(team.clone())).await;
        assert_eq!(teams.status(), StatusCode::SERVICE_UNAVAILABLE);

        let users = app.send(Method::POST, "/api/users", Some(team)).await;
        assert_eq!(users.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_validation_runs_before_database() {
        let app = TestApp::new();
        let response = app
            .send(
                Method::POST,
                "/api/auth/register",
                Some(serde_json::json!({ "name": "", "email": "nope", "password": "x" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let app = TestApp::new();
        let response = app.get("/api/teams/not-an-id").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_request_id_header_is_set() {
        let app = TestApp::new();
        let response = app.get("/api/health").await;
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let app = TestApp::new();
        let response = app.get("/api-docs/openapi.json").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/api/health"].is_object());
        assert!(body["paths"]["/api/teams/{id}/join"].is_object());
    }
}
