use axum::{
    middleware::from_fn,
    routing::{delete, get, patch, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{connection, donation, event, feedback, job, message, network, post as posts, story, user};
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/user", user_routes())
        .nest("/post", post_routes())
        .nest("/job", job_routes())
        .nest("/story", story_routes())
        .nest("/donation", donation_routes())
        .nest("/event", event_routes())
        .nest("/feedback", feedback_routes())
        .nest("/connection", connection_routes())
        .nest("/network", network_routes())
        .merge(message_routes())
}

fn user_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/update", put(user::update))
        .route("/delete", delete(user::delete))
        .route_layer(from_fn(auth_middleware));

    Router::new()
        .route("/signup", post(user::signup))
        .route("/signin", post(user::signin))
        .merge(protected)
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(posts::create))
        .route("/delete/:postId", delete(posts::delete))
        .route("/:postId/comment", post(posts::add_comment))
        .route("/:postId/comment/:commentId", delete(posts::delete_comment))
        .route("/like/:postId", post(posts::like))
        .route("/unlike/:postId", delete(posts::unlike))
        .route_layer(from_fn(auth_middleware))
}

fn job_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/create", post(job::create))
        .route("/update/:jobId", put(job::update))
        .route("/delete/:jobId", delete(job::delete))
        .route_layer(from_fn(auth_middleware));

    Router::new()
        .route("/", get(job::list))
        .route("/:jobId", get(job::get))
        .merge(protected)
}

fn story_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/create", post(story::create))
        .route("/:storyId", put(story::publish))
        .route_layer(from_fn(auth_middleware));

    Router::new().route("/", get(story::list)).merge(protected)
}

fn donation_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/create", post(donation::create))
        .route_layer(from_fn(auth_middleware));

    Router::new()
        .route("/", get(donation::list))
        .route("/leaderboard", get(donation::leaderboard))
        .merge(protected)
}

fn event_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/create", post(event::create))
        .route("/:eventId", delete(event::delete))
        .route_layer(from_fn(auth_middleware));

    Router::new()
        .route("/upcoming", get(event::upcoming))
        .route("/past", get(event::past))
        .merge(protected)
}

fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(feedback::create))
        .route("/feedbacks", get(feedback::list))
        .route("/feedback/:feedbackId", delete(feedback::delete))
        .route_layer(from_fn(auth_middleware))
}

fn connection_routes() -> Router<AppState> {
    Router::new()
        .route("/connections", post(connection::send_request).get(connection::view))
        .route("/connections/accept", patch(connection::accept))
        .route("/connections/reject", patch(connection::reject))
        .route_layer(from_fn(auth_middleware))
}

fn network_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(network::search))
        .route("/filter", get(network::filter))
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/message", post(message::send_message))
        .route("/message/:peerId", get(message::conversation))
        .route_layer(from_fn(auth_middleware))
}

async fn health() -> axum::Json<Value> {
    axum::Json(json!({
        "status": 200,
        "message": "ok",
        "data": { "timestamp": chrono::Utc::now() }
    }))
}
