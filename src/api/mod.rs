use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod error;
mod state;
pub mod validate;
pub mod videos;

pub use error::*;
pub use state::*;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

pub fn create_router(app: App) -> Router {
    Router::new()
        .route("/api/videos", get(videos::list).post(videos::create_next))
        .route(
            "/api/videos/:id",
            get(videos::get)
                .put(videos::create)
                .patch(videos::update)
                .delete(videos::delete),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use super::*;
    use crate::database::memory;
    use crate::model::{Video, VideoId, MAX_VIDEO_ID};

    async fn server() -> TestServer {
        let app = App::new(memory().await);
        TestServer::new(create_router(app)).unwrap()
    }

    fn video(id: i64, name: &str, views: i64, likes: i64) -> Video {
        Video::new(id, name.to_string(), views, likes)
    }

    #[tokio::test]
    async fn video_lifecycle() {
        let server = server().await;

        let response = server
            .put("/api/videos/1")
            .json(&json!({ "name": "intro", "views": 10, "likes": 2 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({ "id": 1, "name": "intro", "views": 10, "likes": 2 }));

        let response = server
            .patch("/api/videos/1")
            .json(&json!({ "likes": 5 }))
            .await;
        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "id": 1, "name": "intro", "views": 10, "likes": 5 }));

        let response = server.delete("/api/videos/1").await;
        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.text().is_empty());

        let response = server.get("/api/videos/1").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "message": "no video found with id 1" }));
    }

    #[tokio::test]
    async fn get_returns_what_was_created() {
        let server = server().await;

        let created = server
            .post("/api/videos")
            .json(&json!({ "name": "trailer", "views": 300, "likes": 12 }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let created: Video = created.json();

        let response = server.get(&format!("/api/videos/{}", created.id)).await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Video>(), video(created.id, "trailer", 300, 12));
    }

    #[tokio::test]
    async fn create_with_taken_id_is_a_conflict() {
        let server = server().await;
        server
            .put("/api/videos/1")
            .json(&json!({ "name": "intro", "views": 10, "likes": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .put("/api/videos/1")
            .json(&json!({ "name": "other", "views": 0, "likes": 0 }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        response.assert_json(&json!({ "message": "a video with id 1 already exists" }));

        let stored: Video = server.get("/api/videos/1").await.json();
        assert_eq!(stored, video(1, "intro", 10, 2));
    }

    #[tokio::test]
    async fn create_with_invalid_body_is_rejected() {
        let server = server().await;

        let response = server
            .put("/api/videos/1")
            .json(&json!({ "name": "intro", "views": 10 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "field `likes` is required" }));

        let response = server
            .post("/api/videos")
            .json(&json!({ "name": "intro", "views": "ten", "likes": 2 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "field `views` must be an integer" }));

        let response = server.post("/api/videos").text("not json").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        server.get("/api/videos/1").await.assert_status(StatusCode::NOT_FOUND);
        let videos: Vec<Video> = server.get("/api/videos").await.json();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn invalid_body_for_taken_id_is_a_bad_request() {
        let server = server().await;
        server
            .put("/api/videos/1")
            .json(&json!({ "name": "intro", "views": 10, "likes": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.put("/api/videos/1").json(&json!({ "name": "a" })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "field `views` is required" }));

        let stored: Video = server.get("/api/videos/1").await.json();
        assert_eq!(stored, video(1, "intro", 10, 2));
    }

    #[tokio::test]
    async fn ids_outside_the_valid_range_are_not_found() {
        let server = server().await;
        let body = json!({ "name": "intro", "views": 10, "likes": 2 });

        for id in ["-3".to_string(), "0".to_string(), VideoId::MAX.to_string()] {
            let response = server.put(&format!("/api/videos/{id}")).json(&body).await;
            response.assert_status(StatusCode::NOT_FOUND);
            response.assert_json(&json!({ "message": format!("no video found with id {id}") }));
        }

        let response = server.post("/api/videos").json(&body).await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Video>(), video(1, "intro", 10, 2));
    }

    #[tokio::test]
    async fn automatic_ids_run_out_at_the_maximum() {
        let server = server().await;
        let body = json!({ "name": "intro", "views": 10, "likes": 2 });

        server
            .put(&format!("/api/videos/{MAX_VIDEO_ID}"))
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post("/api/videos").json(&body).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "message": "no video id is left to assign" }));

        server
            .delete(&format!("/api/videos/{MAX_VIDEO_ID}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .post("/api/videos")
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn automatic_ids_follow_explicit_ones() {
        let server = server().await;
        server
            .put("/api/videos/41")
            .json(&json!({ "name": "explicit", "views": 1, "likes": 1 }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/videos")
            .json(&json!({ "name": "automatic", "views": 2, "likes": 2 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Video>(), video(42, "automatic", 2, 2));
    }

    #[tokio::test]
    async fn list_returns_every_video() {
        let server = server().await;
        let response = server.get("/api/videos").await;
        response.assert_status(StatusCode::OK);
        response.assert_json(&json!([]));

        for id in 1..=3 {
            server
                .put(&format!("/api/videos/{id}"))
                .json(&json!({ "name": format!("video {id}"), "views": id * 10, "likes": id }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let videos: Vec<Video> = server.get("/api/videos").await.json();
        assert_eq!(
            videos,
            vec![
                video(1, "video 1", 10, 1),
                video(2, "video 2", 20, 2),
                video(3, "video 3", 30, 3),
            ]
        );
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let server = server().await;
        server
            .put("/api/videos/1")
            .json(&json!({ "name": "intro", "views": 10, "likes": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .patch("/api/videos/1")
            .json(&json!({ "views": 11, "name": null }))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Video>(), video(1, "intro", 11, 2));

        let response = server.patch("/api/videos/1").json(&json!({})).await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Video>(), video(1, "intro", 11, 2));

        let response = server.patch("/api/videos/1").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Video>(), video(1, "intro", 11, 2));
    }

    #[tokio::test]
    async fn update_errors() {
        let server = server().await;

        let response = server
            .patch("/api/videos/9")
            .json(&json!({ "likes": 5 }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "message": "no video found with id 9" }));

        server
            .put("/api/videos/9")
            .json(&json!({ "name": "intro", "views": 10, "likes": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .patch("/api/videos/9")
            .json(&json!({ "likes": "five" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let stored: Video = server.get("/api/videos/9").await.json();
        assert_eq!(stored, video(9, "intro", 10, 2));
    }

    #[tokio::test]
    async fn delete_missing_video() {
        let server = server().await;
        server
            .put("/api/videos/1")
            .json(&json!({ "name": "intro", "views": 10, "likes": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.delete("/api/videos/2").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "message": "no video found with id 2" }));

        let videos: Vec<Video> = server.get("/api/videos").await.json();
        assert_eq!(videos, vec![video(1, "intro", 10, 2)]);
    }

    #[tokio::test]
    async fn non_integer_id_is_not_found() {
        let server = server().await;

        let response = server.get("/api/videos/abc").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "message": "no video found with id abc" }));
    }
}
