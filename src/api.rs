use crate::session::SessionManager;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub fn make_router(manager: &'static SessionManager) -> Router {
    Router::new()
        .route("/rooms", get(get_rooms))
        .route("/pastgames", get(get_past_games))
        .with_state(manager)
}

pub async fn listen(port: u16) -> TcpListener {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .expect("could not bind to port");
    log::info!("API listening on {}", listener.local_addr().unwrap());
    listener
}

async fn get_rooms(State(manager): State<&'static SessionManager>) -> Json<Value> {
    Json(json!({
        "num_rooms": manager.num_rooms()
    }))
}

async fn get_past_games(State(manager): State<&'static SessionManager>) -> Json<Value> {
    Json(json!({
        "games": manager.past_games()
    }))
}
