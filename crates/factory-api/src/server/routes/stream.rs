async fn stream_factory(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_socket(socket, state))
}

async fn stream_socket(mut socket: WebSocket, state: AppState) {
    // Subscribe before taking the initial snapshot so no tick committed in
    // between can be missed; at worst the client sees the same tick twice.
    let mut rx = state.runtime.subscribe();
    let initial = state.runtime.snapshot_now().await;

    if send_snapshot(&mut socket, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                        break;
                    }
                    _ => {}
                }
            }
            outgoing = rx.recv() => {
                match outgoing {
                    Ok(snapshot) => {
                        if send_snapshot(&mut socket, &snapshot).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Every message is a full snapshot, so skipped ticks
                        // cost nothing; the next one catches the client up.
                        debug!(skipped, "slow stream client skipped snapshots");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }
}

async fn send_snapshot(socket: &mut WebSocket, snapshot: &WorldSnapshot) -> Result<(), axum::Error> {
    let message = StreamMessage {
        message_type: "factory-update",
        data: snapshot,
    };
    let payload = serde_json::to_string(&message).map_err(axum::Error::new)?;
    socket.send(Message::Text(payload.into())).await
}

#[derive(Debug, Serialize)]
struct StreamMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    data: &'a WorldSnapshot,
}
