use crate::session::SessionManager;
use crate::ws::accept_connection;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;
use tokio::net::TcpListener;

mod api;
mod client;
mod error;
mod game;
mod room;
mod session;
mod time;
mod ws;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::try_init().ok();

    let Ok(Ok(port)) = std::env::var("PORT").map(|s| s.parse::<u16>()) else {
        log::error!("port is unspecified or is invalid");
        return;
    };

    let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| "rooms.sled".into());
    let db = match sled::open(&db_path) {
        Ok(db) => db,
        Err(err) => {
            log::error!("Could not open database {}: {:?}", db_path, err);
            return;
        }
    };

    let manager = match SessionManager::new(db) {
        Ok(manager) => &*Box::leak(Box::new(manager)),
        Err(err) => {
            log::error!("Could not restore sessions: {:?}", err);
            return;
        }
    };

    // Drop rooms that have been idle for too long
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(300)).await;
            manager.purge_rooms();
        }
    });

    if let Ok(Ok(api_port)) = std::env::var("API_PORT").map(|s| s.parse::<u16>()) {
        tokio::spawn(async move {
            let listener = api::listen(api_port).await;
            axum::serve(listener, api::make_router(manager)).await.ok();
        });
    }

    let addr = SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), port);
    let Ok(listener) = TcpListener::bind(addr).await else {
        log::error!("Could not bind to address: {:?}", addr);
        return;
    };
    log::info!("Listening on: {:?}", addr);

    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(accept_connection(stream, manager));
    }
}
