use crate::{
    client::{Client, PlayerAction},
    error::GameError,
    room::ResetReason,
    session::SessionManager,
};
use futures_util::{select, FutureExt, SinkExt, StreamExt, TryStreamExt};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;

#[derive(Error, Debug)]
enum WsError {
    #[error("violation of the application-layer protocol")]
    ProtocolError,
}

pub async fn accept_connection(stream: TcpStream, manager: &SessionManager) {
    log::info!("Accepted new connection");

    let Ok(stream) = tokio_tungstenite::accept_async(stream).await else {
        log::error!("Error occured during websocket handshake");
        return;
    };
    let (mut write, read) = stream.split();
    let mut read = read.fuse();

    let mut client = Client::new(manager);

    loop {
        select! {
            msg = read.try_next() => {
                let Ok(Some(Message::Text(msg))) = msg else {
                    break;
                };
                let Ok(msg) = serde_json::from_str::<Value>(&msg) else {
                    log::error!("Invalid JSON received: {}", &msg);
                    break;
                };
                let Ok(msg) = parse_request(&msg) else {
                    log::error!("Invalid message received: {}", &msg);
                    break;
                };
                match process_request(msg, &mut client) {
                    Ok(Some(reply)) => {
                        write.send(Message::Text(reply.to_string())).await.ok();
                    },
                    Ok(None) => {},
                    Err(err) => {
                        let reply = json!({
                            "type": "error",
                            "error": err.to_string()
                        });
                        write.send(Message::Text(reply.to_string())).await.ok();
                    }
                }
            },
            state = client.next_state().fuse() => {
                let reply = json!({
                    "type": "update",
                    "state": state
                });
                if write.send(Message::Text(reply.to_string())).await.is_err() {
                    log::error!("Could not send websockets message");
                    break;
                }
            }
        }
    }
}

/// A message sent by a game client to the server.
enum Request {
    CreateRoom { user_id: String, name: String },
    JoinRoom { room_id: String, user_id: String, name: String },
    Spectate { room_id: String },
    LeaveRoom,
    PlayerAction(PlayerAction),
    Heartbeat,
}

/// Parses a websockets message from the client.
fn parse_request(req: &Value) -> Result<Request, WsError> {
    let field = |name: &str| {
        req[name]
            .as_str()
            .map(|s| s.to_string())
            .ok_or(WsError::ProtocolError)
    };

    match req["type"].as_str().unwrap_or("") {
        "create_room" => Ok(Request::CreateRoom {
            user_id: field("userId")?,
            name: field("name")?,
        }),
        "join_room" => Ok(Request::JoinRoom {
            room_id: field("roomId")?.to_ascii_uppercase(),
            user_id: field("userId")?,
            name: field("name")?,
        }),
        "spectate" => Ok(Request::Spectate {
            room_id: field("roomId")?.to_ascii_uppercase(),
        }),
        "leave_room" => Ok(Request::LeaveRoom),
        "player_action" => {
            let action = match req["action"].as_str().unwrap_or("") {
                "start_game" => PlayerAction::StartGame,
                "set_ready" => PlayerAction::SetReady {
                    ready: req["ready"].as_bool().ok_or(WsError::ProtocolError)?,
                },
                "rename" => PlayerAction::Rename { name: field("name")? },
                "investigate" => PlayerAction::Investigate {
                    target_id: field("targetId")?,
                },
                "transfer_admin" => PlayerAction::TransferAdmin {
                    player_id: field("playerId")?,
                },
                "remove_player" => PlayerAction::RemovePlayer {
                    player_id: field("playerId")?,
                },
                "reset_game" => PlayerAction::ResetGame {
                    reason: match req["reason"].as_str().unwrap_or("GAME_OVER") {
                        "GAME_OVER" => ResetReason::GameOver,
                        "ADMIN_REQUEST" => ResetReason::AdminRequest,
                        "CONSENSUS" => ResetReason::Consensus,
                        _ => return Err(WsError::ProtocolError),
                    },
                },
                _ => return Err(WsError::ProtocolError),
            };
            Ok(Request::PlayerAction(action))
        }
        "heartbeat" => Ok(Request::Heartbeat),
        _ => Err(WsError::ProtocolError),
    }
}

/// Processes a request from the client.
fn process_request(req: Request, client: &mut Client) -> Result<Option<Value>, GameError> {
    match req {
        Request::CreateRoom { user_id, name } => {
            let room_id = client.create_room(&user_id, &name)?;
            Ok(Some(json!({
                "type": "room_created",
                "roomId": room_id
            })))
        }
        Request::JoinRoom { room_id, user_id, name } => {
            client.join_room(&room_id, &user_id, &name)?;
            Ok(Some(json!({
                "type": "room_joined",
                "roomId": room_id,
                "userId": user_id
            })))
        }
        Request::Spectate { room_id } => {
            client.join_spectator(&room_id)?;
            Ok(Some(json!({
                "type": "room_joined",
                "roomId": room_id,
                "userId": Value::Null
            })))
        }
        Request::LeaveRoom => {
            client.leave_room()?;
            Ok(None)
        }
        Request::PlayerAction(action) => {
            let result = client.player_action(action)?;
            Ok(result.map(|record| {
                json!({
                    "type": "investigation_result",
                    "record": record
                })
            }))
        }
        Request::Heartbeat => {
            client.heartbeat();
            Ok(None)
        }
    }
}
