//! Match state and main loop.

use super::broadcast::BroadcastEvent;
use super::client::ClientHandle;
use crate::collision;
use crate::config::GameConfig;
use crate::player::{Player, is_legal_turn};
use protocol::{GameCommand, GameState, Message, PlayerAssignment, PlayerId, PlayerInput};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

const MILLIS_PER_SECOND: u64 = 1000;

/// Match lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first start command.
    Menu,
    /// Players are on their spawn points, counting down.
    Countdown,
    /// Cycles are moving.
    Running,
    /// Someone crashed; waiting for a start command.
    Ended,
}

impl Phase {
    /// Whether the ticker drives this phase.
    pub fn is_ticking(self) -> bool {
        matches!(self, Phase::Countdown | Phase::Running)
    }
}

/// Why a transport could not claim a slot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("both player slots are taken")]
    RosterFull,
    #[error("the match loop is no longer running")]
    Closed,
}

/// Requests for the match loop other than steering input.
#[derive(Debug)]
pub enum Control {
    /// A new transport wants a slot.
    Join {
        client: ClientHandle,
        reply: oneshot::Sender<Result<PlayerId, JoinError>>,
    },
    /// Administrative command from a client.
    Command(GameCommand),
}

/// The single match. Only the task running [`run_game_loop`] touches it.
#[derive(Debug)]
pub struct Game {
    /// Indexed by `PlayerId::index`.
    players: [Option<Player>; 2],
    phase: Phase,
    tick: u64,
    countdown: u32,
    countdown_secs: u32,
    tick_ms: u64,
    /// Countdown time not yet turned into whole seconds.
    elapsed_ms: u64,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            players: [None, None],
            phase: Phase::Menu,
            tick: 0,
            countdown: 0,
            countdown_secs: config.countdown_secs,
            tick_ms: config.tick_interval_ms.max(1),
            elapsed_ms: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players[id.index()].as_ref()
    }

    fn roster(&self) -> Vec<&Player> {
        self.players.iter().flatten().collect()
    }

    /// Give the transport the first open slot.
    pub fn join(&mut self, client: ClientHandle) -> Result<PlayerId, JoinError> {
        let id = PlayerId::ALL
            .into_iter()
            .find(|id| self.players[id.index()].is_none())
            .ok_or(JoinError::RosterFull)?;
        info!("{} joined from {}", id, client.addr());
        self.players[id.index()] = Some(Player::spawn(id, 0, client));
        Ok(id)
    }

    /// Apply an administrative command.
    pub fn handle_command(&mut self, command: &GameCommand) {
        if !command.is_start() {
            warn!("Ignoring unknown command {:?}", command.command);
            return;
        }
        match self.phase {
            Phase::Menu | Phase::Ended => {
                if self.players.iter().any(Option::is_none) {
                    info!("Start ignored: waiting for a second player");
                    return;
                }
                self.start_round();
            }
            Phase::Running => debug!("Start received while running, nothing to do"),
            Phase::Countdown => debug!("Start received during countdown, nothing to do"),
        }
    }

    /// Reset both cycles and begin the countdown.
    fn start_round(&mut self) {
        for player in self.players.iter_mut().flatten() {
            if player.client().is_closed() {
                warn!("{} ({}) has disconnected but keeps the slot", player.id, player.client().addr());
            }
            player.reset();
        }
        self.countdown = self.countdown_secs;
        self.elapsed_ms = 0;
        self.phase = if self.countdown == 0 {
            Phase::Running
        } else {
            Phase::Countdown
        };
        info!("Round starting, countdown {}s", self.countdown);
    }

    /// Steer cycles from queued input.
    ///
    /// Each request is judged against the heading the cycle had when the tick
    /// began, and the last legal request per player wins.
    pub fn apply_inputs(&mut self, inputs: &[PlayerInput]) {
        for player in self.players.iter_mut().flatten() {
            let current = player.direction;
            let mut chosen = current;
            for input in inputs.iter().filter(|input| input.player_id == player.id) {
                if is_legal_turn(current, input.direction) {
                    chosen = input.direction;
                } else {
                    debug!(
                        "Bad direction change for {}: can't go from {:?} to {:?}",
                        player.id, current, input.direction
                    );
                }
            }
            player.direction = chosen;
        }
        for input in inputs {
            if self.players[input.player_id.index()].is_none() {
                debug!("Input for unassigned slot {}", input.player_id);
            }
        }
    }

    /// Advance one tick. Returns the snapshot to broadcast, if this tick
    /// produces one.
    pub fn tick(&mut self, inputs: &[PlayerInput]) -> Option<GameState> {
        match self.phase {
            Phase::Countdown => {
                self.apply_inputs(inputs);
                self.elapsed_ms += self.tick_ms;
                if self.elapsed_ms < MILLIS_PER_SECOND {
                    return None;
                }
                let seconds = u32::try_from(self.elapsed_ms / MILLIS_PER_SECOND).unwrap_or(u32::MAX);
                self.elapsed_ms %= MILLIS_PER_SECOND;
                self.countdown = self.countdown.saturating_sub(seconds);
                let snapshot = self.snapshot();
                if self.countdown == 0 {
                    info!("Countdown finished, round running");
                    self.phase = Phase::Running;
                }
                Some(snapshot)
            }
            Phase::Running => {
                self.apply_inputs(inputs);
                self.move_all_players();
                let verdict = collision::detect(&self.roster());
                for id in &verdict.killed {
                    if let Some(player) = self.players[id.index()].as_mut() {
                        info!("Killing player {}", id);
                        player.kill();
                    }
                }
                if let Some(id) = verdict.scorer {
                    if let Some(player) = self.players[id.index()].as_mut() {
                        player.points += 1;
                    }
                }
                self.tick += 1;
                let snapshot = self.snapshot();
                if verdict.any_death() {
                    info!("Round over at tick {}", self.tick);
                    self.phase = Phase::Ended;
                }
                Some(snapshot)
            }
            Phase::Menu | Phase::Ended => None,
        }
    }

    /// Move every living cycle one cell, in slot order.
    fn move_all_players(&mut self) {
        for player in self.players.iter_mut().flatten() {
            player.advance();
        }
    }

    pub fn snapshot(&self) -> GameState {
        let players: BTreeMap<PlayerId, _> = self
            .players
            .iter()
            .flatten()
            .map(|player| (player.id, player.state()))
            .collect();
        GameState {
            players,
            tick: self.tick,
            countdown: self.countdown,
        }
    }
}

/// Sending side of the match channels, cloned into every connection.
#[derive(Debug, Clone)]
pub struct GameHandle {
    control_tx: mpsc::Sender<Control>,
    input_tx: mpsc::Sender<PlayerInput>,
}

impl GameHandle {
    /// Claim a slot for a transport.
    pub async fn join(&self, client: ClientHandle) -> Result<PlayerId, JoinError> {
        let (reply, response) = oneshot::channel();
        self.control_tx
            .send(Control::Join { client, reply })
            .await
            .map_err(|_| JoinError::Closed)?;
        response.await.map_err(|_| JoinError::Closed)?
    }

    /// Forward an administrative command. `false` if the loop is gone.
    pub async fn command(&self, command: GameCommand) -> bool {
        self.control_tx.send(Control::Command(command)).await.is_ok()
    }

    /// Forward steering input. `false` if the loop is gone.
    pub async fn input(&self, input: PlayerInput) -> bool {
        self.input_tx.send(input).await.is_ok()
    }
}

/// Receiving side of the match channels, owned by the loop.
#[derive(Debug)]
pub struct GameInbox {
    control_rx: mpsc::Receiver<Control>,
    input_rx: mpsc::Receiver<PlayerInput>,
}

/// Create the control and input channels for one match.
pub fn channels(config: &GameConfig) -> (GameHandle, GameInbox) {
    let (control_tx, control_rx) = mpsc::channel(16);
    let (input_tx, input_rx) = mpsc::channel(config.input_capacity());
    (
        GameHandle {
            control_tx,
            input_tx,
        },
        GameInbox {
            control_rx,
            input_rx,
        },
    )
}

/// Send the slot assignment straight to the new client's queue.
fn send_assignment(client: &ClientHandle, id: PlayerId) {
    let frame = match protocol::encode(&Message::PlayerAssignment(PlayerAssignment { player_id: id })) {
        Ok(text) => Arc::<str>::from(text),
        Err(e) => {
            error!("Failed to encode assignment for {}: {}", id, e);
            return;
        }
    };
    if let Err(e) = client.try_send(frame) {
        warn!("Failed to queue assignment for {} ({}): {}", id, client.addr(), e);
    }
}

/// Run the match loop until every control sender is dropped.
///
/// This task is the only owner of `game`. Commands are served before ticks,
/// input is drained on each tick, and each snapshot goes to the broadcaster in
/// tick order.
pub async fn run_game_loop(
    mut game: Game,
    inbox: GameInbox,
    broadcast_tx: mpsc::Sender<BroadcastEvent>,
    tick_interval: Duration,
) {
    let GameInbox {
        mut control_rx,
        mut input_rx,
    } = inbox;
    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut inputs_open = true;
    let mut pending: Vec<PlayerInput> = Vec::new();

    loop {
        tokio::select! {
            biased;

            control = control_rx.recv() => {
                let Some(control) = control else {
                    info!("Control channel closed, match loop exiting");
                    break;
                };
                match control {
                    Control::Join { client, reply } => {
                        let result = game.join(client.clone());
                        if let Ok(id) = result {
                            send_assignment(&client, id);
                            if broadcast_tx.send(BroadcastEvent::Register { id, client }).await.is_err() {
                                warn!("Broadcaster is gone; {} will not receive snapshots", id);
                            }
                        }
                        let _ = reply.send(result);
                    }
                    Control::Command(command) => {
                        let was_ticking = game.phase().is_ticking();
                        game.handle_command(&command);
                        if !was_ticking && game.phase().is_ticking() {
                            // Full period before the first tick of the round.
                            ticker.reset();
                        }
                    }
                }
            }

            _ = ticker.tick(), if game.phase().is_ticking() => {
                pending.clear();
                while let Ok(input) = input_rx.try_recv() {
                    pending.push(input);
                }
                if let Some(snapshot) = game.tick(&pending) {
                    if broadcast_tx.send(BroadcastEvent::Snapshot(snapshot)).await.is_err() {
                        warn!("Broadcaster is gone; dropping snapshot for tick {}", game.tick_count());
                    }
                }
            }

            input = input_rx.recv(), if inputs_open && !game.phase().is_ticking() => {
                match input {
                    Some(input) => debug!("Discarding input from {} while idle", input.player_id),
                    None => inputs_open = false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{Coordinate, Direction, Status};
    use std::net::SocketAddr;

    fn config(countdown_secs: u32) -> GameConfig {
        GameConfig {
            countdown_secs,
            ..GameConfig::default()
        }
    }

    /// Two joined players, round started, countdown skipped.
    fn running_game() -> Game {
        let mut game = Game::new(&config(0));
        game.join(ClientHandle::detached()).unwrap();
        game.join(ClientHandle::detached()).unwrap();
        game.handle_command(&GameCommand::start());
        assert_eq!(game.phase(), Phase::Running);
        game
    }

    fn input(player_id: PlayerId, direction: Direction) -> PlayerInput {
        PlayerInput {
            player_id,
            direction,
        }
    }

    fn position(game: &Game, id: PlayerId) -> Coordinate {
        game.player(id).unwrap().position
    }

    #[test]
    fn test_slots_fill_in_order() {
        let mut game = Game::new(&config(10));
        assert_eq!(game.join(ClientHandle::detached()), Ok(PlayerId::Player1));
        assert_eq!(game.join(ClientHandle::detached()), Ok(PlayerId::Player2));
        assert_eq!(game.join(ClientHandle::detached()), Err(JoinError::RosterFull));
    }

    #[test]
    fn test_start_needs_two_players() {
        let mut game = Game::new(&config(10));
        game.handle_command(&GameCommand::start());
        assert_eq!(game.phase(), Phase::Menu);
        game.join(ClientHandle::detached()).unwrap();
        game.handle_command(&GameCommand::start());
        assert_eq!(game.phase(), Phase::Menu);
        game.join(ClientHandle::detached()).unwrap();
        game.handle_command(&GameCommand::start());
        assert_eq!(game.phase(), Phase::Countdown);
        assert_eq!(game.countdown(), 10);
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let mut game = Game::new(&config(10));
        game.join(ClientHandle::detached()).unwrap();
        game.join(ClientHandle::detached()).unwrap();
        game.handle_command(&GameCommand {
            command: "restart".to_string(),
        });
        assert_eq!(game.phase(), Phase::Menu);
    }

    #[test]
    fn test_idle_phases_do_not_tick() {
        let mut game = Game::new(&config(10));
        assert_eq!(game.tick(&[]), None);
        assert_eq!(game.tick_count(), 0);
    }

    #[test]
    fn test_countdown_emits_once_per_second() {
        let mut game = Game::new(&config(3));
        game.join(ClientHandle::detached()).unwrap();
        game.join(ClientHandle::detached()).unwrap();
        game.handle_command(&GameCommand::start());

        let mut countdowns = Vec::new();
        for _ in 0..30 {
            if let Some(snapshot) = game.tick(&[]) {
                countdowns.push(snapshot.countdown);
            }
        }
        assert_eq!(countdowns, vec![2, 1, 0]);
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.tick_count(), 0);
        assert_eq!(position(&game, PlayerId::Player1), Coordinate::new(1, 15));
    }

    /// Ticks until the countdown reaches zero.
    fn countdown_ticks(tick_interval_ms: u64, countdown_secs: u32) -> u64 {
        let mut game = Game::new(&GameConfig {
            tick_interval_ms,
            countdown_secs,
            ..GameConfig::default()
        });
        game.join(ClientHandle::detached()).unwrap();
        game.join(ClientHandle::detached()).unwrap();
        game.handle_command(&GameCommand::start());
        let mut ticks = 0;
        while game.phase() == Phase::Countdown {
            game.tick(&[]);
            ticks += 1;
            assert!(ticks < 10_000, "countdown never finished");
        }
        ticks
    }

    #[test]
    fn test_countdown_follows_elapsed_time() {
        // Intervals that do not divide a second still count real time.
        assert_eq!(countdown_ticks(30, 3), 100);
        assert_eq!(countdown_ticks(300, 3), 10);
        assert_eq!(countdown_ticks(1500, 3), 2);
        assert_eq!(countdown_ticks(100, 10), 100);
    }

    #[test]
    fn test_start_while_running_is_a_no_op() {
        let mut game = running_game();
        game.tick(&[]);
        game.handle_command(&GameCommand::start());
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(position(&game, PlayerId::Player1), Coordinate::new(2, 15));
    }

    #[test]
    fn test_start_during_countdown_is_ignored() {
        let mut game = Game::new(&config(2));
        game.join(ClientHandle::detached()).unwrap();
        game.join(ClientHandle::detached()).unwrap();
        game.handle_command(&GameCommand::start());
        for _ in 0..10 {
            game.tick(&[]);
        }
        assert_eq!(game.countdown(), 1);
        game.handle_command(&GameCommand::start());
        assert_eq!(game.countdown(), 1);
    }

    #[test]
    fn test_player_one_wraps_around() {
        let mut game = running_game();
        // Send player 2 onto another row so the lanes never cross.
        game.tick(&[input(PlayerId::Player2, Direction::Up)]);
        game.tick(&[]);
        assert_eq!(position(&game, PlayerId::Player1), Coordinate::new(3, 15));

        for i in 0..47 {
            let inputs = if i == 3 {
                vec![input(PlayerId::Player2, Direction::Left)]
            } else {
                Vec::new()
            };
            assert!(game.tick(&inputs).is_some());
        }
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(position(&game, PlayerId::Player1), Coordinate::new(2, 15));
        assert_eq!(game.tick_count(), 49);
    }

    #[test]
    fn test_trail_never_exceeds_capacity() {
        let mut game = running_game();
        game.tick(&[input(PlayerId::Player2, Direction::Up)]);
        game.tick(&[input(PlayerId::Player2, Direction::Left)]);
        for _ in 0..30 {
            game.tick(&[]);
            for id in PlayerId::ALL {
                assert!(game.player(id).unwrap().trail.len() <= crate::trail::TRAIL_CAPACITY);
            }
        }
    }

    #[test]
    fn test_illegal_turn_is_dropped() {
        let mut game = running_game();
        game.tick(&[input(PlayerId::Player1, Direction::Left)]);
        assert_eq!(game.player(PlayerId::Player1).unwrap().direction, Direction::Right);
        game.tick(&[input(PlayerId::Player1, Direction::Down)]);
        assert_eq!(game.player(PlayerId::Player1).unwrap().direction, Direction::Down);
    }

    #[test]
    fn test_last_legal_input_wins_within_a_tick() {
        let mut game = running_game();
        // UP then LEFT: LEFT reverses the start-of-tick heading and is dropped.
        game.tick(&[
            input(PlayerId::Player1, Direction::Up),
            input(PlayerId::Player1, Direction::Left),
        ]);
        assert_eq!(game.player(PlayerId::Player1).unwrap().direction, Direction::Up);
        assert_eq!(position(&game, PlayerId::Player1), Coordinate::new(1, 14));

        game.tick(&[
            input(PlayerId::Player1, Direction::Left),
            input(PlayerId::Player1, Direction::Right),
        ]);
        assert_eq!(game.player(PlayerId::Player1).unwrap().direction, Direction::Right);
    }

    #[test]
    fn test_head_on_crash_ends_round_without_points() {
        let mut game = running_game();
        let mut last = None;
        while game.phase() == Phase::Running {
            last = game.tick(&[]);
            assert!(game.tick_count() <= 30, "cycles never met");
        }
        assert_eq!(game.phase(), Phase::Ended);
        assert_eq!(game.tick_count(), 23);

        let last = last.unwrap();
        for id in PlayerId::ALL {
            let state = &last.players[&id];
            assert_eq!(state.status, Status::Dead);
            assert_eq!(state.position, Coordinate::new(24, 15));
            assert_eq!(state.points, 0);
        }
        assert_eq!(game.tick(&[]), None);
    }

    #[test]
    fn test_trail_kill_awards_point_and_restart_keeps_it() {
        let mut game = running_game();
        // Player 1 turns down at x=20; player 2 keeps driving left along
        // row 15 and runs into player 1's trail cell (20, 15).
        for _ in 0..19 {
            game.tick(&[]);
        }
        game.tick(&[input(PlayerId::Player1, Direction::Down)]);
        assert_eq!(position(&game, PlayerId::Player1), Coordinate::new(20, 16));
        while game.phase() == Phase::Running {
            game.tick(&[]);
            assert!(game.tick_count() <= 40, "player 2 never crashed");
        }
        assert_eq!(game.tick_count(), 27);
        let p1 = game.player(PlayerId::Player1).unwrap();
        let p2 = game.player(PlayerId::Player2).unwrap();
        assert!(p1.is_alive());
        assert!(!p2.is_alive());
        assert_eq!(p2.position, Coordinate::new(20, 15));
        assert_eq!(p1.points, 1);
        assert_eq!(p2.points, 0);

        game.handle_command(&GameCommand::start());
        assert_eq!(game.phase(), Phase::Running);
        let p1 = game.player(PlayerId::Player1).unwrap();
        let p2 = game.player(PlayerId::Player2).unwrap();
        assert_eq!(p1.points, 1);
        assert!(p2.is_alive());
        assert_eq!(p2.position, Coordinate::new(47, 15));
    }

    #[test]
    fn test_same_inputs_give_same_snapshots() {
        let script: Vec<Vec<PlayerInput>> = (0..60)
            .map(|tick| match tick {
                1 => vec![input(PlayerId::Player1, Direction::Up)],
                4 => vec![
                    input(PlayerId::Player2, Direction::Down),
                    input(PlayerId::Player1, Direction::Right),
                ],
                9 => vec![input(PlayerId::Player2, Direction::Left)],
                20 => vec![input(PlayerId::Player1, Direction::Down)],
                _ => Vec::new(),
            })
            .collect();

        let play = || {
            let mut game = Game::new(&config(1));
            game.join(ClientHandle::detached()).unwrap();
            game.join(ClientHandle::detached()).unwrap();
            game.handle_command(&GameCommand::start());
            script
                .iter()
                .filter_map(|inputs| game.tick(inputs))
                .collect::<Vec<_>>()
        };
        let first = play();
        assert!(!first.is_empty());
        assert_eq!(first, play());
    }

    fn client() -> (ClientHandle, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(64);
        (ClientHandle::new(SocketAddr::from(([127, 0, 0, 1], 7000)), tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_assigns_counts_down_and_runs() {
        let game_config = config(2);
        let (handle, inbox) = channels(&game_config);
        let (broadcast_tx, mut broadcast_rx) = mpsc::channel(64);
        tokio::spawn(run_game_loop(
            Game::new(&game_config),
            inbox,
            broadcast_tx,
            game_config.tick_interval(),
        ));

        let (a, mut rx_a) = client();
        let (b, _rx_b) = client();
        let (c, _rx_c) = client();
        assert_eq!(handle.join(a).await, Ok(PlayerId::Player1));
        assert_eq!(handle.join(b).await, Ok(PlayerId::Player2));
        assert_eq!(handle.join(c).await, Err(JoinError::RosterFull));

        match protocol::decode(&rx_a.recv().await.unwrap()) {
            Ok(Some(Message::PlayerAssignment(assignment))) => {
                assert_eq!(assignment.player_id, PlayerId::Player1)
            }
            other => panic!("expected assignment, got {other:?}"),
        }

        for expected in PlayerId::ALL {
            match broadcast_rx.recv().await.unwrap() {
                BroadcastEvent::Register { id, .. } => assert_eq!(id, expected),
                other => panic!("expected registration, got {other:?}"),
            }
        }

        assert!(handle.command(GameCommand::start()).await);
        // Input during the countdown is applied on the next tick.
        assert!(handle.input(input(PlayerId::Player1, Direction::Down)).await);

        let mut snapshots = Vec::new();
        while snapshots.len() < 4 {
            match broadcast_rx.recv().await.unwrap() {
                BroadcastEvent::Snapshot(state) => snapshots.push(state),
                other => panic!("expected snapshot, got {other:?}"),
            }
        }
        let countdowns: Vec<u32> = snapshots.iter().map(|s| s.countdown).collect();
        assert_eq!(countdowns, vec![1, 0, 0, 0]);
        let ticks: Vec<u64> = snapshots.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![0, 0, 1, 2]);
        let p1 = &snapshots[3].players[&PlayerId::Player1];
        assert_eq!(p1.direction, Direction::Down);
        assert_eq!(p1.position, Coordinate::new(1, 17));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_input_is_discarded() {
        let game_config = config(0);
        let (handle, inbox) = channels(&game_config);
        let (broadcast_tx, mut broadcast_rx) = mpsc::channel(64);
        tokio::spawn(run_game_loop(
            Game::new(&game_config),
            inbox,
            broadcast_tx,
            game_config.tick_interval(),
        ));

        let (a, _rx_a) = client();
        let (b, _rx_b) = client();
        handle.join(a).await.unwrap();
        handle.join(b).await.unwrap();

        // Queued while in the menu; must not steer the next round.
        assert!(handle.input(input(PlayerId::Player1, Direction::Up)).await);
        tokio::time::sleep(game_config.tick_interval() * 5).await;
        assert!(handle.command(GameCommand::start()).await);

        let state = loop {
            match broadcast_rx.recv().await.unwrap() {
                BroadcastEvent::Snapshot(state) => break state,
                BroadcastEvent::Register { .. } => {}
            }
        };
        assert_eq!(state.tick, 1);
        let p1 = &state.players[&PlayerId::Player1];
        assert_eq!(p1.direction, Direction::Right);
        assert_eq!(p1.position, Coordinate::new(2, 15));
    }
}
