//! Snapshot fan-out.

use super::client::ClientHandle;
use protocol::{GameState, Message, PlayerId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

/// Events consumed by the broadcaster, in the order the match produced them.
#[derive(Debug)]
pub enum BroadcastEvent {
    /// A slot got a transport; it receives every later snapshot.
    Register { id: PlayerId, client: ClientHandle },
    /// One tick's (or countdown second's) snapshot.
    Snapshot(GameState),
}

#[derive(Debug)]
struct Target {
    id: PlayerId,
    client: ClientHandle,
    writable: bool,
}

/// Writes each snapshot to every registered transport.
///
/// Sends never wait: a full queue drops that snapshot for that player only and
/// a closed queue marks the transport unwritable.
#[derive(Debug, Default)]
pub struct Broadcaster {
    targets: Vec<Target>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the transport for a slot.
    pub fn register(&mut self, id: PlayerId, client: ClientHandle) {
        debug!("Registering {} ({}) for snapshots", id, client.addr());
        self.targets.retain(|target| target.id != id);
        self.targets.push(Target {
            id,
            client,
            writable: true,
        });
        self.targets.sort_by_key(|target| target.id);
    }

    /// Number of transports still accepting frames.
    pub fn writable_count(&self) -> usize {
        self.targets.iter().filter(|target| target.writable).count()
    }

    /// Offer a snapshot to every writable transport. Returns how many accepted it.
    pub fn deliver(&mut self, state: GameState) -> usize {
        let frame: Arc<str> = match protocol::encode(&Message::GameState(state)) {
            Ok(text) => text.into(),
            Err(e) => {
                error!("Failed to encode snapshot: {}", e);
                return 0;
            }
        };

        let mut delivered = 0;
        let mut closed = 0;
        for target in self.targets.iter_mut().filter(|target| target.writable) {
            match target.client.try_send(Arc::clone(&frame)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!("Dropping snapshot for {} ({}): queue full", target.id, target.client.addr());
                }
                Err(TrySendError::Closed(_)) => {
                    info!("Transport for {} ({}) closed, skipping from now on", target.id, target.client.addr());
                    target.writable = false;
                    closed += 1;
                }
            }
        }
        if closed > 0 {
            info!("{} of {} transports still writable", self.writable_count(), self.targets.len());
        }
        delivered
    }

    /// Consume events until the match side hangs up.
    pub async fn run(mut self, mut events: mpsc::Receiver<BroadcastEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                BroadcastEvent::Register { id, client } => self.register(id, client),
                BroadcastEvent::Snapshot(state) => {
                    self.deliver(state);
                }
            }
        }
        info!("Snapshot channel closed, broadcaster exiting");
    }
}
