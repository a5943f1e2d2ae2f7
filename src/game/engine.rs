use super::collision;
use super::constants::{
    ROUND_DURATION_MS, ROUND_RESET_DELAY_MS, ROUND_START_DELAY_MS, TICK_MS, TICK_RATE,
};
use super::input::{self, InputEvent};
use super::leaderboard;
use super::metrics::{MetricsReport, TickMetrics};
use super::physics;
use super::spawner;
use super::types::{ArenaConfig, LeaderboardEntry, Pellet, Phase, Player, PowerUp, Snake};
use crate::protocol::{ClientMessage, PlayerView, RoundStatus, ServerMessage};
use rand::{thread_rng, Rng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// One authoritative arena. The tick task is the only writer of the inner
/// state; transport handlers and the phase timer go through the same lock,
/// so a tick and a delayed transition can never interleave.
#[derive(Debug)]
pub struct Engine {
    state: Mutex<EngineState>,
    running: AtomicBool,
    started_at: Instant,
}

#[derive(Debug)]
struct SessionEntry {
    sender: UnboundedSender<String>,
    player_id: Option<Uuid>,
}

#[derive(Debug)]
enum QueuedEvent {
    Join { session_id: Uuid },
    Leave { player_id: Uuid },
    Input(InputEvent),
}

#[derive(Debug, Clone, Copy)]
enum PendingTransition {
    StartRound,
    ResetArena,
}

#[derive(Debug)]
struct EngineState {
    arena: ArenaConfig,
    sessions: HashMap<Uuid, SessionEntry>,
    players: HashMap<Uuid, Player>,
    pellets: Vec<Pellet>,
    power_ups: Vec<PowerUp>,
    queue: Vec<QueuedEvent>,
    round: u32,
    phase: Phase,
    round_started_at: Option<i64>,
    time_remaining_ms: i64,
    leaderboard: Vec<LeaderboardEntry>,
    next_join_seq: u64,
    rounds_played: u32,
    phase_timer: Option<JoinHandle<()>>,
    metrics: TickMetrics,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_arena(ArenaConfig::default())
    }

    pub fn with_arena(arena: ArenaConfig) -> Self {
        Self {
            state: Mutex::new(EngineState::new(arena)),
            running: AtomicBool::new(false),
            started_at: Instant::now(),
        }
    }

    /// Spawns the tick task. Idempotent. Ticks are scheduled run-to-run:
    /// under overload the cadence slips instead of bursting to catch up.
    pub fn start(self: &Arc<Self>) {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !engine.running.load(Ordering::SeqCst) {
                    break;
                }
                let started = Instant::now();
                let mut state = engine.state.lock().await;
                engine.run_tick(&mut state);
                state.metrics.record(started.elapsed());
            }
        });
    }

    /// Prevents any further tick and tears down the pending phase timer.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if let Some(timer) = state.phase_timer.take() {
            timer.abort();
        }
    }

    pub async fn add_session(&self, sender: UnboundedSender<String>) -> Uuid {
        let session_id = Uuid::new_v4();
        let mut state = self.state.lock().await;
        state.sessions.insert(
            session_id,
            SessionEntry {
                sender,
                player_id: None,
            },
        );
        state.queue.push(QueuedEvent::Join { session_id });
        session_id
    }

    pub async fn remove_session(&self, session_id: Uuid) {
        let mut state = self.state.lock().await;
        let Some(entry) = state.sessions.remove(&session_id) else {
            return;
        };
        if let Some(player_id) = entry.player_id {
            state.queue.push(QueuedEvent::Leave { player_id });
        }
    }

    pub async fn handle_message(&self, session_id: Uuid, text: &str) {
        let Ok(message) = serde_json::from_str::<ClientMessage>(text) else {
            return;
        };
        let mut state = self.state.lock().await;
        match message {
            ClientMessage::Input { direction } => {
                let Some(player_id) = state
                    .sessions
                    .get(&session_id)
                    .and_then(|entry| entry.player_id)
                else {
                    return;
                };
                state.queue.push(QueuedEvent::Input(InputEvent {
                    player_id,
                    direction,
                    received_at: now_millis(),
                }));
            }
        }
    }

    pub async fn start_round(self: &Arc<Self>) {
        let mut state = self.state.lock().await;
        self.start_round_locked(&mut state);
    }

    pub async fn end_round(self: &Arc<Self>) -> Vec<LeaderboardEntry> {
        let mut state = self.state.lock().await;
        self.end_round_locked(&mut state)
    }

    pub async fn reset_arena(self: &Arc<Self>) {
        let mut state = self.state.lock().await;
        self.reset_arena_locked(&mut state);
    }

    pub async fn metrics_report(&self) -> MetricsReport {
        let state = self.state.lock().await;
        MetricsReport {
            player_count: state.players.len(),
            tick_rate: TICK_RATE,
            average_tick_ms: state.metrics.average_ms(),
            p95_tick_ms: state.metrics.p95_ms(),
            pellet_count: state.pellets.len(),
            power_up_count: state.power_ups.len(),
            rounds_played: state.rounds_played,
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }

    fn run_tick(self: &Arc<Self>, state: &mut EngineState) {
        let now = now_millis();
        let mut rng = thread_rng();

        state.drain_queue(&mut rng);
        if state.phase == Phase::Playing {
            physics::step(
                &mut state.players,
                &mut state.pellets,
                &state.arena,
                &mut rng,
            );
        }
        let killed = collision::resolve(
            &mut state.players,
            &mut state.pellets,
            &state.arena,
            &mut rng,
        );
        if !killed.is_empty() {
            tracing::debug!(count = killed.len(), "collision pass killed players");
        }
        spawner::sweep_expired_power_ups(&mut state.power_ups, now);
        spawner::maybe_spawn_power_up(
            &state.players,
            &state.pellets,
            &mut state.power_ups,
            &state.arena,
            &mut rng,
            now,
        );
        self.advance_round(state, now);
        state.leaderboard = leaderboard::compute(&state.players);
        state.broadcast_update(now);
    }

    fn advance_round(self: &Arc<Self>, state: &mut EngineState, now: i64) {
        if state.phase != Phase::Playing {
            return;
        }
        let Some(started_at) = state.round_started_at else {
            return;
        };
        state.time_remaining_ms = (ROUND_DURATION_MS - (now - started_at)).max(0);
        if state.time_remaining_ms == 0 {
            self.end_round_locked(state);
        }
    }

    fn start_round_locked(&self, state: &mut EngineState) {
        state.cancel_phase_timer();
        state.phase = Phase::Playing;
        state.round_started_at = Some(now_millis());
        state.time_remaining_ms = ROUND_DURATION_MS;
        tracing::info!(round = state.round, "round started");
        state.broadcast(&ServerMessage::RoundStarted {
            round: state.round,
            duration: ROUND_DURATION_MS,
        });
    }

    fn end_round_locked(self: &Arc<Self>, state: &mut EngineState) -> Vec<LeaderboardEntry> {
        state.cancel_phase_timer();
        state.phase = Phase::Ending;
        state.rounds_played += 1;
        let final_board = state.leaderboard.clone();
        tracing::info!(
            round = state.round,
            winner_score = final_board.first().map(|entry| entry.score).unwrap_or(0),
            "round ended"
        );
        state.broadcast(&ServerMessage::RoundEnded {
            round: state.round,
            leaderboard: final_board.clone(),
        });
        self.schedule_transition(state, ROUND_RESET_DELAY_MS, PendingTransition::ResetArena);
        final_board
    }

    fn reset_arena_locked(self: &Arc<Self>, state: &mut EngineState) {
        state.cancel_phase_timer();
        state.phase = Phase::Resetting;

        let mut rng = thread_rng();
        for player in state.players.values_mut() {
            let spawn = spawner::random_spawn_point(&state.arena, &mut rng);
            player.snake = Snake::new(spawn, spawner::random_color(&mut rng));
            player.score = 0;
            player.alive = true;
        }
        state.pellets.clear();
        state.power_ups.clear();
        spawner::seed_pellets(&state.players, &mut state.pellets, &state.arena, &mut rng);

        state.round += 1;
        state.phase = Phase::Waiting;
        state.round_started_at = None;
        state.time_remaining_ms = ROUND_DURATION_MS;
        tracing::info!(round = state.round, "arena reset");
        state.broadcast(&ServerMessage::ArenaReset { round: state.round });
        self.schedule_transition(state, ROUND_START_DELAY_MS, PendingTransition::StartRound);
    }

    fn schedule_transition(
        self: &Arc<Self>,
        state: &mut EngineState,
        delay_ms: u64,
        transition: PendingTransition,
    ) {
        state.cancel_phase_timer();
        let engine = Arc::clone(self);
        state.phase_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if !engine.running.load(Ordering::SeqCst) {
                return;
            }
            match transition {
                PendingTransition::StartRound => engine.start_round().await,
                PendingTransition::ResetArena => engine.reset_arena().await,
            }
        }));
    }
}

impl EngineState {
    fn new(arena: ArenaConfig) -> Self {
        let mut state = Self {
            arena,
            sessions: HashMap::new(),
            players: HashMap::new(),
            pellets: Vec::new(),
            power_ups: Vec::new(),
            queue: Vec::new(),
            round: 1,
            phase: Phase::Waiting,
            round_started_at: None,
            time_remaining_ms: ROUND_DURATION_MS,
            leaderboard: Vec::new(),
            next_join_seq: 0,
            rounds_played: 0,
            phase_timer: None,
            metrics: TickMetrics::new(),
        };
        spawner::seed_pellets(
            &state.players,
            &mut state.pellets,
            &state.arena,
            &mut thread_rng(),
        );
        state
    }

    fn cancel_phase_timer(&mut self) {
        if let Some(timer) = self.phase_timer.take() {
            timer.abort();
        }
    }

    fn drain_queue(&mut self, rng: &mut impl Rng) {
        let events = std::mem::take(&mut self.queue);
        for event in events {
            match event {
                QueuedEvent::Join { session_id } => self.process_join(session_id, rng),
                QueuedEvent::Leave { player_id } => {
                    if self.players.remove(&player_id).is_some() {
                        tracing::info!(%player_id, "player left");
                    }
                }
                QueuedEvent::Input(event) => self.apply_input(event),
            }
        }
    }

    fn apply_input(&mut self, event: InputEvent) {
        let Some(player) = self.players.get_mut(&event.player_id) else {
            return;
        };
        if !player.alive {
            return;
        }
        if !input::is_valid_turn(player.snake.direction, event.direction) {
            return;
        }
        player.snake.next_direction = event.direction;
        player.last_input = event.received_at;
    }

    fn process_join(&mut self, session_id: Uuid, rng: &mut impl Rng) {
        // The socket may already be gone by the time its join is drained.
        if !self.sessions.contains_key(&session_id) {
            return;
        }

        let player_id = Uuid::new_v4();
        let spawn = spawner::random_spawn_point(&self.arena, rng);
        let snake = Snake::new(spawn, spawner::random_color(rng));
        self.players.insert(
            player_id,
            Player {
                id: player_id,
                snake: snake.clone(),
                score: 0,
                alive: true,
                last_input: now_millis(),
                join_seq: self.next_join_seq,
            },
        );
        self.next_join_seq += 1;

        let message = ServerMessage::Joined {
            player_id,
            snake,
            arena: self.arena,
        };
        if let Some(session) = self.sessions.get_mut(&session_id) {
            session.player_id = Some(player_id);
            if let Ok(payload) = serde_json::to_string(&message) {
                let _ = session.sender.send(payload);
            }
        }
        tracing::info!(%player_id, "player joined");
    }

    fn broadcast(&mut self, message: &ServerMessage) {
        let Ok(payload) = serde_json::to_string(message) else {
            return;
        };
        let mut stale = Vec::new();
        for (session_id, session) in &self.sessions {
            if session.sender.send(payload.clone()).is_err() {
                stale.push(*session_id);
            }
        }
        for session_id in stale {
            if let Some(entry) = self.sessions.remove(&session_id) {
                if let Some(player_id) = entry.player_id {
                    self.queue.push(QueuedEvent::Leave { player_id });
                }
            }
        }
    }

    fn broadcast_update(&mut self, now: i64) {
        let mut ordered: Vec<&Player> = self.players.values().collect();
        ordered.sort_unstable_by_key(|player| player.join_seq);
        let players: Vec<PlayerView> = ordered.into_iter().map(PlayerView::of).collect();

        let message = ServerMessage::GameUpdate {
            timestamp: now,
            players,
            pellets: self.pellets.clone(),
            power_ups: self.power_ups.clone(),
            leaderboard: self.leaderboard.clone(),
            game_state: RoundStatus {
                phase: self.phase,
                time_remaining: self.time_remaining_ms,
                round: self.round,
            },
        };
        self.broadcast(&message);
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
