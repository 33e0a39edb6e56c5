//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Query endpoints are public; anything
//! that writes or reads the caller's own data extracts [`CurrentUser`].
//! Middleware: CORS, tracing.
//!
//! [`CurrentUser`]: crate::http::extractors::auth::CurrentUser

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers::{announcement, conference, profile, session, speaker, wishlist};
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Conferences
        .route("/conferences", post(conference::create_conference))
        .route("/conferences/query", post(conference::query_conferences))
        .route(
            "/conferences/{key}",
            get(conference::get_conference)
                .put(conference::update_conference)
                .delete(conference::delete_conference),
        )
        .route(
            "/conferences/{key}/registration",
            post(conference::register).delete(conference::unregister),
        )
        .route(
            "/conferences/{key}/featured-speaker",
            get(session::featured_speaker),
        )
        // Sessions
        .route(
            "/conferences/{key}/sessions",
            get(session::list_sessions).post(session::create_session),
        )
        .route(
            "/conferences/{key}/sessions/by-type",
            get(session::sessions_by_type),
        )
        .route(
            "/conferences/{key}/sessions/by-duration",
            get(session::sessions_by_duration),
        )
        .route(
            "/conferences/{key}/sessions/non-workshop-before-seven",
            get(session::non_workshop_before_seven),
        )
        .route(
            "/conferences/{key}/sessions/window",
            get(session::sessions_in_window),
        )
        .route("/sessions/by-speaker", get(session::sessions_by_speaker))
        // Speakers
        .route(
            "/speakers",
            get(speaker::list_speakers).post(speaker::create_speaker),
        )
        .route(
            "/speakers/{email}",
            get(speaker::get_speaker).delete(speaker::delete_speaker),
        )
        // Profile
        .route(
            "/profile",
            get(profile::get_profile).put(profile::save_profile),
        )
        .route(
            "/profile/conferences/created",
            get(profile::conferences_created),
        )
        .route(
            "/profile/conferences/attending",
            get(profile::conferences_to_attend),
        )
        // Wishlist
        .route("/wishlist", get(wishlist::list_wishlist))
        .route(
            "/wishlist/{session_key}",
            post(wishlist::add_to_wishlist).delete(wishlist::remove_from_wishlist),
        )
        .route("/announcement", get(announcement::get_announcement));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::http::extractors::auth::issue_api_key;
    use crate::state::test_support::test_state;

    async fn call(
        router: &Router,
        method: Method,
        uri: &str,
        key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("authorization", format!("Bearer {key}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn names(body: &Value) -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap().to_string())
            .collect()
    }

    /// A conference with four sessions:
    /// keynote 09:00 (30m), workshop 14:00 (90m), lecture 18:30 (45m),
    /// lecture 20:00 (120m).
    async fn seeded() -> (Router, String, String) {
        let state = test_state().await;
        let key = issue_api_key(&state.db_pool, "org@example.com", "Org")
            .await
            .unwrap();
        let router = build_router(state);

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/v1/conferences",
            Some(&key),
            Some(json!({
                "name": "RustConf",
                "start_date": "2024-06-01",
                "end_date": "2024-06-03",
                "max_attendees": 10
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let conf = body["data"]["id"].as_str().unwrap().to_string();

        for (name, kind, time, duration) in [
            ("Opening", "keynote", "09:00", 30),
            ("Hands-on", "workshop", "14:00", 90),
            ("Ownership", "lecture", "18:30", 45),
            ("Late night", "lecture", "20:00", 120),
        ] {
            let (status, _) = call(
                &router,
                Method::POST,
                &format!("/api/v1/conferences/{conf}/sessions"),
                Some(&key),
                Some(json!({
                    "name": name,
                    "session_type": kind,
                    "date": "2024-06-01",
                    "start_time": time,
                    "duration": duration
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        (router, conf, key)
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(test_state().await);
        let (status, body) = call(&router, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_non_workshop_before_seven_endpoint() {
        let (router, conf, _) = seeded().await;
        let uri = format!("/api/v1/conferences/{conf}/sessions/non-workshop-before-seven");

        let (status, body) = call(&router, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Opening", "Ownership"]);

        let (_, again) = call(&router, Method::GET, &uri, None, None).await;
        assert_eq!(names(&again), names(&body));
    }

    #[tokio::test]
    async fn test_by_duration_endpoint() {
        let (router, conf, _) = seeded().await;

        let (status, body) = call(
            &router,
            Method::GET,
            &format!("/api/v1/conferences/{conf}/sessions/by-duration?max_duration=60"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Opening", "Ownership"]);

        let (_, body) = call(
            &router,
            Method::GET,
            &format!("/api/v1/conferences/{conf}/sessions/by-duration?max_duration=45"),
            None,
            None,
        )
        .await;
        assert_eq!(names(&body), vec!["Opening"]);
    }

    #[tokio::test]
    async fn test_unknown_conference_is_404() {
        let (router, _, _) = seeded().await;
        let missing = uuid::Uuid::now_v7();

        for uri in [
            format!("/api/v1/conferences/{missing}/sessions/non-workshop-before-seven"),
            format!("/api/v1/conferences/{missing}/sessions/by-duration?max_duration=60"),
            "/api/v1/conferences/not-a-key/sessions/non-workshop-before-seven".to_string(),
        ] {
            let (status, body) = call(&router, Method::GET, &uri, None, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["errors"][0]["code"], "CONFERENCE_NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn test_writes_require_api_key() {
        let (router, conf, _) = seeded().await;

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/v1/conferences",
            None,
            Some(json!({"name": "Anonymous"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["errors"][0]["code"], "UNAUTHORIZED");

        let (status, _) = call(
            &router,
            Method::POST,
            &format!("/api/v1/conferences/{conf}/registration"),
            Some("cc_not_a_key"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let (router, conf, key) = seeded().await;
        let uri = format!("/api/v1/conferences/{conf}/registration");

        let (status, _) = call(&router, Method::POST, &uri, Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&router, Method::POST, &uri, Some(&key), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["errors"][0]["code"], "CONFLICT");

        let (_, body) = call(
            &router,
            Method::GET,
            &format!("/api/v1/conferences/{conf}"),
            None,
            None,
        )
        .await;
        assert_eq!(body["data"]["seats_available"], 9);
    }
}
