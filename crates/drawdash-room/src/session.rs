//! Room actor: an isolated Tokio task that owns one room's state.
//!
//! Each room runs in its own task and talks to the outside world through
//! an mpsc channel. All mutation paths (commands and countdown ticks)
//! flow through the same `select!` loop, so a guess arriving at the same
//! instant as a timer expiry is totally ordered against it: exactly one
//! of them triggers the round transition, and the other sees the result.

use drawdash_clock::Countdown;
use drawdash_protocol::{
    ConnectionId, Player, PlayerId, RoomCode, RoomSnapshot, RoomStatus, ServerEvent,
};
use tokio::sync::{mpsc, oneshot};

use crate::hub::{BroadcastHub, EventSender};
use crate::round::RoundEngine;
use crate::{RoomConfig, RoomError};

/// Commands sent to a room actor through its channel. Variants carrying a
/// `oneshot::Sender` are request/reply; the rest are fire-and-forget.
pub(crate) enum RoomCommand {
    /// Attach a connection to the broadcast hub.
    Connect {
        sender: EventSender,
        reply: oneshot::Sender<ConnectionId>,
    },

    /// Detach a connection.
    Disconnect { conn: ConnectionId },

    /// Add a player, attaching and binding their connection.
    Join {
        name: String,
        sender: EventSender,
        reply: oneshot::Sender<Result<(PlayerId, ConnectionId), RoomError>>,
    },

    /// Remove a player. Replies with `true` if the room is now empty.
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<Result<bool, RoomError>>,
    },

    /// Start the game (first round).
    Start {
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Skip ahead to the next round without waiting for a guess or the
    /// clock.
    NextRound {
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Evaluate a guess against the current word.
    Guess {
        player: PlayerId,
        text: String,
        reply: oneshot::Sender<Result<bool, RoomError>>,
    },

    /// Relay an opaque drawing payload to everyone but the sender.
    Draw {
        sender: ConnectionId,
        payload: serde_json::Value,
    },

    /// Request the current room snapshot.
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },

    /// Terminate the room.
    End { reply: oneshot::Sender<()> },
}

/// Which event a round start is announced with. The first round rides on
/// `game_start`; every later transition on `round_end`.
#[derive(Clone, Copy)]
enum RoundAnnounce {
    GameStart,
    NextRound,
}

/// Handle to a running room actor. Cheap to clone; the registry holds one
/// per room.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's join code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Attaches a connection; it receives all subsequent broadcasts.
    pub async fn connect(&self, sender: EventSender) -> Result<ConnectionId, RoomError> {
        self.request(|reply| RoomCommand::Connect { sender, reply })
            .await
    }

    /// Detaches a connection. Idempotent.
    pub async fn disconnect(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Disconnect { conn }).await
    }

    /// Adds a player to the room, attaching `sender` as their connection.
    pub async fn join(
        &self,
        name: String,
        sender: EventSender,
    ) -> Result<(PlayerId, ConnectionId), RoomError> {
        self.request(|reply| RoomCommand::Join { name, sender, reply })
            .await?
    }

    /// Removes a player. Returns `true` if the room emptied and stopped.
    pub async fn leave(&self, player: PlayerId) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::Leave { player, reply })
            .await?
    }

    /// Starts the game.
    pub async fn start(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Start { reply }).await?
    }

    /// Forces the next round to start immediately, superseding the
    /// current round's timer.
    pub async fn next_round(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::NextRound { reply }).await?
    }

    /// Submits a guess. Returns whether it was correct.
    pub async fn guess(&self, player: PlayerId, text: String) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::Guess { player, text, reply })
            .await?
    }

    /// Relays a drawing payload (fire-and-forget).
    pub async fn draw(
        &self,
        sender: ConnectionId,
        payload: serde_json::Value,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Draw { sender, payload }).await
    }

    /// Requests the current room snapshot.
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// Terminates the room actor. The registry removes the entry.
    pub async fn end(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::End { reply }).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(make(reply_tx)).await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    code: RoomCode,
    config: RoomConfig,
    status: RoomStatus,
    players: Vec<Player>,
    /// Monotonic player id source; ids are never reused within a room.
    next_player_id: u64,
    current_round: u32,
    current_word: String,
    time_remaining: u32,
    hub: BroadcastHub,
    engine: RoundEngine,
    countdown: Countdown,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until the room ends or all handles are dropped.
    async fn run(mut self) {
        tracing::info!(room = %self.code, "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if self.handle_command(cmd) {
                        break;
                    }
                }
                _ = self.countdown.tick() => {
                    self.handle_tick();
                }
            }
        }

        self.countdown.cancel();
        self.status = RoomStatus::Ended;
        tracing::info!(room = %self.code, "room actor stopped");
    }

    /// Applies one command. Returns `true` when the actor should stop.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Connect { sender, reply } => {
                let conn = self.hub.add(sender);
                tracing::debug!(room = %self.code, %conn, "connection attached");
                let _ = reply.send(conn);
            }
            RoomCommand::Disconnect { conn } => {
                if self.hub.remove(conn) {
                    tracing::debug!(room = %self.code, %conn, "connection detached");
                }
            }
            RoomCommand::Join { name, sender, reply } => {
                let _ = reply.send(self.handle_join(name, sender));
            }
            RoomCommand::Leave { player, reply } => {
                let result = self.handle_leave(player);
                let emptied = matches!(result, Ok(true));
                let _ = reply.send(result);
                if emptied {
                    return true;
                }
            }
            RoomCommand::Start { reply } => {
                let _ = reply.send(self.handle_start());
            }
            RoomCommand::NextRound { reply } => {
                let _ = reply.send(self.handle_next_round());
            }
            RoomCommand::Guess { player, text, reply } => {
                let _ = reply.send(self.handle_guess(player, text));
            }
            RoomCommand::Draw { sender, payload } => {
                self.handle_draw(sender, payload);
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            RoomCommand::End { reply } => {
                self.countdown.cancel();
                tracing::info!(room = %self.code, "room ended");
                let _ = reply.send(());
                return true;
            }
        }
        false
    }

    fn handle_join(
        &mut self,
        name: String,
        sender: EventSender,
    ) -> Result<(PlayerId, ConnectionId), RoomError> {
        if !self.status.is_joinable() {
            return Err(RoomError::InvalidState(format!(
                "cannot join room in state {}",
                self.status
            )));
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        self.next_player_id += 1;
        let id = PlayerId(self.next_player_id.to_string());
        let player = Player {
            id: id.clone(),
            name,
            is_drawing: false,
            score: 0,
        };
        self.players.push(player.clone());

        let conn = self.hub.add(sender);
        self.hub.bind(conn, id.clone());
        tracing::info!(
            room = %self.code,
            player = %id,
            players = self.players.len(),
            "player joined"
        );

        self.hub.broadcast(&ServerEvent::PlayerJoined { player });
        Ok((id, conn))
    }

    fn handle_leave(&mut self, player: PlayerId) -> Result<bool, RoomError> {
        let Some(pos) = self.players.iter().position(|p| p.id == player) else {
            return Err(RoomError::PlayerNotFound(player, self.code.clone()));
        };

        // A drawing player leaving mid-round leaves the round drawerless
        // until the next transition; the timer still ends it on schedule.
        let was_drawing = self.players[pos].is_drawing;
        self.players.remove(pos);
        self.hub.unbind(&player);
        tracing::info!(
            room = %self.code,
            player = %player,
            players = self.players.len(),
            was_drawing,
            "player left"
        );

        self.hub
            .broadcast(&ServerEvent::PlayerLeft { player_id: player });

        if self.players.is_empty() {
            self.countdown.cancel();
            return Ok(true);
        }
        Ok(false)
    }

    fn handle_start(&mut self) -> Result<(), RoomError> {
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::InvalidState(format!(
                "cannot start game in state {}",
                self.status
            )));
        }
        if self.players.len() < self.config.min_players {
            return Err(RoomError::InsufficientPlayers {
                have: self.players.len(),
                need: self.config.min_players,
            });
        }

        self.status = RoomStatus::Active;
        self.begin_round(RoundAnnounce::GameStart);
        Ok(())
    }

    /// Manually advances to the next round. Scores nothing and reveals
    /// nothing; the transition itself is identical to a timeout.
    fn handle_next_round(&mut self) -> Result<(), RoomError> {
        if !self.status.is_active() {
            return Err(RoomError::InvalidState(format!(
                "cannot advance round in state {}",
                self.status
            )));
        }
        tracing::info!(
            room = %self.code,
            round = self.current_round,
            "round skipped"
        );
        self.begin_round(RoundAnnounce::NextRound);
        Ok(())
    }

    /// Evaluates a guess. Correct guesses score and trigger exactly one
    /// round transition; incorrect guesses change nothing.
    fn handle_guess(&mut self, player: PlayerId, text: String) -> Result<bool, RoomError> {
        if !self.status.is_active() {
            return Err(RoomError::InvalidState(format!(
                "cannot guess in state {}",
                self.status
            )));
        }
        let Some(guesser) = self.players.iter_mut().find(|p| p.id == player) else {
            return Err(RoomError::PlayerNotFound(player, self.code.clone()));
        };

        if !RoundEngine::is_match(&self.current_word, &text) {
            self.hub.broadcast(&ServerEvent::Guess {
                player_id: player,
                correct: false,
                word: None,
            });
            return Ok(false);
        }

        guesser.score += 1;
        tracing::info!(
            room = %self.code,
            player = %player,
            round = self.current_round,
            "correct guess"
        );
        self.hub.broadcast(&ServerEvent::Guess {
            player_id: player,
            correct: true,
            word: Some(self.current_word.clone()),
        });
        self.begin_round(RoundAnnounce::NextRound);
        Ok(true)
    }

    fn handle_draw(&mut self, sender: ConnectionId, payload: serde_json::Value) {
        if !self.status.is_active() {
            tracing::debug!(room = %self.code, "draw outside active round, dropped");
            return;
        }
        self.hub
            .broadcast_except(sender, &ServerEvent::Draw(payload));
    }

    /// One countdown tick: decrement, announce, and at zero start the next
    /// round as a correct guess would (without a word reveal).
    fn handle_tick(&mut self) {
        if !self.status.is_active() {
            // A tick raced a state change; discard it.
            self.countdown.cancel();
            return;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.hub.broadcast(&ServerEvent::TimeUpdate {
            time_remaining: self.time_remaining,
        });

        if self.time_remaining == 0 {
            tracing::info!(
                room = %self.code,
                round = self.current_round,
                "round timed out"
            );
            self.begin_round(RoundAnnounce::NextRound);
        }
    }

    /// Starts the next round: new word, next drawer, fresh countdown.
    ///
    /// Re-arming the countdown here, inside the same serialized operation
    /// that applies the transition, is what makes timer replacement atomic.
    fn begin_round(&mut self, announce: RoundAnnounce) {
        let Some(drawer) = RoundEngine::rotate_drawer(&mut self.players) else {
            // A leave can empty the room between a transition being due
            // and it being applied; a zero-player round start is a no-op.
            self.countdown.cancel();
            return;
        };

        self.current_word = self.engine.pick_word();
        self.current_round += 1;
        self.time_remaining = self.config.round_duration.as_secs() as u32;
        self.countdown.arm();

        let drawer_id = self.players[drawer].id.clone();
        tracing::info!(
            room = %self.code,
            round = self.current_round,
            drawer = %drawer_id,
            "round started"
        );

        // Per-recipient redaction: only the drawer's connection sees the
        // word, in both the word field and the embedded snapshot.
        let snapshot = self.snapshot();
        let word = self.current_word.clone();
        self.hub.broadcast_with(|bound| {
            let visible = if bound == Some(&drawer_id) {
                word.clone()
            } else {
                String::new()
            };
            let mut room = snapshot.clone();
            room.current_word = visible.clone();
            match announce {
                RoundAnnounce::GameStart => ServerEvent::GameStart {
                    room,
                    current_word: visible,
                },
                RoundAnnounce::NextRound => ServerEvent::RoundEnd {
                    room,
                    current_word: visible,
                },
            }
        });
    }

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            code: self.code.clone(),
            players: self.players.clone(),
            current_round: self.current_round,
            current_word: self.current_word.clone(),
            time_remaining: self.time_remaining,
            status: self.status,
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(code: RoomCode, config: RoomConfig) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_capacity);

    let actor = RoomActor {
        code: code.clone(),
        status: RoomStatus::Waiting,
        players: Vec::new(),
        next_player_id: 0,
        current_round: 0,
        current_word: String::new(),
        time_remaining: 0,
        hub: BroadcastHub::new(),
        engine: RoundEngine::new(config.words.clone()),
        countdown: Countdown::new(std::time::Duration::from_secs(1)),
        config,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
