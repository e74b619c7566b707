//! WebSocket front end: accepts transports and wires them to the match.

use crate::config::Config;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tracing::{debug, error, info, warn};

pub mod broadcast;
pub mod client;
pub mod game;

use broadcast::Broadcaster;
use client::ClientHandle;
pub use game::{Game, GameHandle, JoinError, Phase, run_game_loop};

/// Run the game server.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on ws://{}{}", addr, config.server.path);
    serve(listener, config).await
}

/// Spawn the match and the broadcaster, then accept connections on `listener`
/// until it fails.
pub async fn serve(listener: TcpListener, config: Config) -> anyhow::Result<()> {
    let (handle, inbox) = game::channels(&config.game);
    let (broadcast_tx, broadcast_rx) = mpsc::channel(config.game.snapshot_buffer.max(1));

    tokio::spawn(Broadcaster::new().run(broadcast_rx));
    tokio::spawn(run_game_loop(
        Game::new(&config.game),
        inbox,
        broadcast_tx,
        config.game.tick_interval(),
    ));

    let path: Arc<str> = config.server.path.into();
    let outbound = config.game.outbound_buffer.max(1);

    loop {
        let (stream, addr) = listener.accept().await?;
        let handle = handle.clone();
        let path = Arc::clone(&path);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, addr, handle, path, outbound).await {
                error!("Connection error from {}: {}", addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    game: GameHandle,
    path: Arc<str>,
    outbound: usize,
) -> anyhow::Result<()> {
    let check_path = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        if request.uri().path() == &*path {
            return Ok(response);
        }
        warn!("Rejecting {}: unknown path {}", addr, request.uri().path());
        let mut rejection = ErrorResponse::new(Some("not found".to_string()));
        *rejection.status_mut() = StatusCode::NOT_FOUND;
        Err(rejection)
    };
    let mut ws_stream = accept_hdr_async(stream, check_path).await?;
    info!("New connection from {}", addr);

    let (tx, mut rx) = mpsc::channel::<Arc<str>>(outbound);
    let player_id = match game.join(ClientHandle::new(addr, tx)).await {
        Ok(id) => id,
        Err(e) => {
            warn!("Rejecting {}: {}", addr, e);
            ws_stream.close(None).await?;
            return Ok(());
        }
    };

    let (mut write, mut read) = ws_stream.split();

    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;

                _ = &mut stop_rx => break,
                frame = rx.recv() => {
                    let Some(frame) = frame else { break };
                    if let Err(e) = write.send(Message::text(frame.to_string())).await {
                        warn!("Failed to send to {}: {}", addr, e);
                        break;
                    }
                }
            }
        }
        // Later snapshots for this slot fail fast instead of piling up.
        drop(rx);
        if let Err(e) = write.close().await {
            debug!("Close handshake with {} did not complete: {}", addr, e);
        }
    });

    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if !dispatch(&game, addr, text.as_str()).await {
                    warn!("Match loop is gone, closing {}", addr);
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} ({}) disconnected", player_id, addr);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket error from {}: {}", addr, e);
                break;
            }
        }
    }

    let _ = stop_tx.send(());
    if let Err(e) = writer.await {
        warn!("Writer for {} failed: {}", addr, e);
    }
    Ok(())
}

/// Route one text frame to the match. Returns `false` once the match is gone.
async fn dispatch(game: &GameHandle, addr: SocketAddr, text: &str) -> bool {
    match protocol::decode(text) {
        Ok(Some(protocol::Message::PlayerInput(input))) => game.input(input).await,
        Ok(Some(protocol::Message::GameCommand(command))) => game.command(command).await,
        Ok(Some(other)) => {
            debug!("Ignoring {} from {}", other.kind(), addr);
            true
        }
        Ok(None) => {
            debug!("Ignoring message of unknown type from {}", addr);
            true
        }
        Err(e) => {
            warn!("Malformed message from {}: {}", addr, e);
            true
        }
    }
}
