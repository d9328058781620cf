//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router with every route mounted under `prefix`.
pub(crate) fn create_router(state: Arc<AppState>, prefix: &str) -> Router {
    let api_routes = Router::new()
        .route(
            "/pages",
            get(handlers::pages::list_pages).post(handlers::pages::create_page),
        )
        .route("/pages/", get(handlers::pages::get_root_page))
        .route(
            "/pages/{*route}",
            get(handlers::pages::get_page)
                .put(handlers::pages::update_page)
                .patch(handlers::pages::update_page)
                .delete(handlers::pages::delete_page),
        )
        .route("/users", get(handlers::users::list_users))
        .route("/users/{username}", get(handlers::users::get_user))
        .with_state(state);

    // Nesting at "/" is not allowed, so an empty prefix merges instead.
    let router = if prefix.is_empty() {
        Router::new().merge(api_routes)
    } else {
        Router::new().nest(prefix, api_routes)
    };

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(security::csp_layer())
            .layer(security::content_type_options_layer())
            .layer(security::frame_options_layer()),
    )
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{ServerConfig, build_app};

    fn app(root: &Path, prefix: &str) -> Router {
        build_app(&ServerConfig {
            prefix: prefix.to_owned(),
            pages_dir: root.join("pages"),
            users_dir: root.join("accounts"),
            ..ServerConfig::default()
        })
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_blog_post_lifecycle() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("pages/blog")).unwrap();
        let app = app(temp_dir.path(), "/api");

        let (status, created) = send(
            app.clone(),
            Method::POST,
            "/api/pages",
            Some(json!({"route": "/blog/post1", "template": "item", "content": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["route"], json!("/blog/post1"));

        let (status, page) = send(app.clone(), Method::GET, "/api/pages/blog/post1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["template"], json!("item"));
        assert_eq!(page["content"], json!("hello"));

        let (status, _) = send(app.clone(), Method::DELETE, "/api/pages/blog/post1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(!temp_dir.path().join("pages/blog").exists());

        let (status, _) = send(app, Method::GET, "/api/pages/blog", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "pages/01.home/default.md", "Home");
        write(temp_dir.path(), "pages/02.about/default.md", "About");

        let (status, pages) =
            send(app(temp_dir.path(), "/api"), Method::GET, "/api/pages", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(pages[0]["route"], json!("/home"));
        assert_eq!(pages[1]["route"], json!("/about"));
    }

    #[tokio::test]
    async fn test_create_conflict_is_forbidden() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "pages/about/default.md", "About");

        let (status, body) = send(
            app(temp_dir.path(), "/api"),
            Method::POST,
            "/api/pages",
            Some(json!({"route": "about"})),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["kind"], json!("conflict"));
    }

    #[tokio::test]
    async fn test_create_without_route_is_bad_request() {
        let temp_dir = tempfile::tempdir().unwrap();

        let (status, body) = send(
            app(temp_dir.path(), "/api"),
            Method::POST,
            "/api/pages",
            Some(json!({"content": "orphan"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": {
                "kind": "validation_error",
                "message": "You must provide a `route` field"
            }})
        );
    }

    #[tokio::test]
    async fn test_create_unstorable_routes_are_bad_requests() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = app(temp_dir.path(), "/api");

        for route in ["/.draft", "/01.blog"] {
            let (status, body) = send(
                app.clone(),
                Method::POST,
                "/api/pages",
                Some(json!({"route": route})),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{route}");
            assert_eq!(body["error"]["kind"], json!("validation_error"), "{route}");
        }
        assert!(!temp_dir.path().join("pages/.draft").exists());
        assert!(!temp_dir.path().join("pages/01.blog").exists());
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let temp_dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/pages")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(temp_dir.path(), "/api").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_updates_page() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "pages/about/default.md", "---\ntitle: About\n---\nOld");

        let (status, page) = send(
            app(temp_dir.path(), "/api"),
            Method::PATCH,
            "/api/pages/about",
            Some(json!({"route": "/about", "content": "New", "template": "info"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["content"], json!("New"));
        assert_eq!(page["template"], json!("info"));
        assert!(temp_dir.path().join("pages/about/info.md").is_file());
    }

    #[tokio::test]
    async fn test_update_missing_page_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();

        let (status, body) = send(
            app(temp_dir.path(), "/api"),
            Method::PUT,
            "/api/pages/nope",
            Some(json!({"route": "/nope"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["kind"], json!("not_found"));
    }

    #[tokio::test]
    async fn test_users() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "accounts/joe.yaml", "email: joe@example.com\n");
        let app = app(temp_dir.path(), "/api");

        let (status, users) = send(app.clone(), Method::GET, "/api/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(users, json!([{"username": "joe", "email": "joe@example.com"}]));

        let (status, _) = send(app, Method::GET, "/api/users/ann", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_users_empty_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();

        let (status, _) =
            send(app(temp_dir.path(), "/api"), Method::GET, "/api/users", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_prefix_and_security_headers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let request = Request::builder().uri("/pages").body(Body::empty()).unwrap();

        let response = app(temp_dir.path(), "").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }
}
