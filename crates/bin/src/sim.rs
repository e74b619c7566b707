//! Simulated player that steers at random.

use anyhow::{Context, bail};
use futures_util::{Sink, SinkExt, StreamExt};
use protocol::{Direction, GameCommand, Message, PlayerId, PlayerInput};
use rand::Rng;
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite;
use tracing::{debug, info, warn};

/// Longest pause between two turns, in seconds (exclusive).
const MAX_PAUSE_SECS: u64 = 10;

/// Connect, take a slot and send random turns until the connection drops.
pub async fn run(url: &str, start: bool) -> anyhow::Result<()> {
    let (ws_stream, _) = connect_async(url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    info!("Connected to {}", url);
    let (mut write, mut read) = ws_stream.split();

    let player_id = loop {
        match read.next().await {
            Some(Ok(tungstenite::Message::Text(text))) => match protocol::decode(text.as_str()) {
                Ok(Some(Message::PlayerAssignment(assignment))) => break assignment.player_id,
                Ok(Some(other)) => debug!("Ignoring {} before assignment", other.kind()),
                Ok(None) => debug!("Ignoring unknown message before assignment"),
                Err(e) => warn!("Malformed message from server: {}", e),
            },
            Some(Ok(tungstenite::Message::Close(_))) | None => {
                bail!("server closed the connection before assigning a slot")
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
        }
    };
    info!("Playing as {}", player_id);

    if start {
        send(&mut write, Message::GameCommand(GameCommand::start())).await?;
        info!("Sent start");
    }

    let reader = tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(tungstenite::Message::Text(text)) => match protocol::decode(text.as_str()) {
                    Ok(Some(Message::GameState(state))) => info!("{:?}", state),
                    Ok(_) => {}
                    Err(e) => warn!("Malformed message from server: {}", e),
                },
                Ok(tungstenite::Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Connection error: {}", e);
                    break;
                }
            }
        }
        info!("Server connection closed");
    });

    while !reader.is_finished() {
        let (pause, input) = random_turn(player_id)?;
        tokio::time::sleep(pause).await;
        debug!("Turning {:?}", input.direction);
        if let Err(e) = send(&mut write, Message::PlayerInput(input)).await {
            warn!("Failed to send input: {}", e);
            break;
        }
    }

    reader.abort();
    Ok(())
}

/// Pick a pause and a direction for the next turn.
fn random_turn(player_id: PlayerId) -> anyhow::Result<(Duration, PlayerInput)> {
    let mut rng = rand::rng();
    let pause = Duration::from_secs(rng.random_range(0..MAX_PAUSE_SECS));
    let direction = Direction::try_from(rng.random_range(0..4u8))?;
    Ok((
        pause,
        PlayerInput {
            player_id,
            direction,
        },
    ))
}

async fn send<S>(write: &mut S, message: Message) -> anyhow::Result<()>
where
    S: Sink<tungstenite::Message, Error = tungstenite::Error> + Unpin,
{
    write.send(tungstenite::Message::text(protocol::encode(&message)?)).await?;
    Ok(())
}
