//! Feed client: connection lifecycle state machine and receive loop
//!
//! One tokio task owns the transport for the client's whole lifetime. The
//! task runs an explicit state machine (connect, drive, back off, retry)
//! instead of callback handlers, so the reconnect invariants are plain
//! data: the backoff delay doubles up to a cap, and the attempt counter
//! resets only on a successful connect.

use crate::core::backoff::Backoff;
use crate::core::config::ClientConfig;
use crate::core::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::core::pong_tracker::PongTracker;
use crate::traits::{FeedSockError, FrameHandler, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// How often blocking waits re-check the stop flag
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle events emitted by the client
///
/// These are one-way observability signals; consumers drain them from the
/// event channel and must not feed anything back into the client.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Transport opened and subscription handshake completed
    Connected,
    /// Transport lost; a reconnect may follow
    Disconnected,
    /// Waiting out a backoff delay before retry (attempt number)
    Reconnecting(u32),
    /// Retry budget exhausted; the client will not reconnect
    Failed { attempts: u32 },
}

/// Snapshot of client counters
#[derive(Debug, Clone)]
pub struct Metrics {
    pub frames_received: u64,
    pub frames_sent: u64,
    pub reconnect_count: u64,
    pub connection_state: ConnectionState,
}

/// Resilient WebSocket feed client
///
/// Created with [`FeedClient::start`], which spawns the connection task.
/// All shared state (connection state, counters) is published via atomics
/// so observers can probe it concurrently.
pub struct FeedClient {
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    /// True while the client should keep running; cleared by `stop`
    run_flag: Arc<AtomicBool>,
    event_rx: Receiver<ClientEvent>,
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl FeedClient {
    /// Start the connection task
    ///
    /// Must be called from within a tokio runtime. The handler is invoked
    /// inline from the receive loop for each inbound text frame.
    pub fn start<H>(config: ClientConfig, handler: H) -> Self
    where
        H: FrameHandler + 'static,
    {
        let state = Arc::new(AtomicConnectionState::new(ConnectionState::Disconnected));
        let metrics = Arc::new(AtomicMetrics::new());
        let run_flag = Arc::new(AtomicBool::new(true));
        let (event_tx, event_rx) = unbounded();

        let task_handle = {
            let state = Arc::clone(&state);
            let metrics = Arc::clone(&metrics);
            let run_flag = Arc::clone(&run_flag);
            tokio::spawn(async move {
                run_client(config, state, metrics, run_flag, event_tx, handler).await;
            })
        };

        Self {
            state,
            metrics,
            run_flag,
            event_rx,
            task_handle: Some(task_handle),
        }
    }

    /// Current connection state
    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Check if connected
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Shared handle to the published connection state
    ///
    /// This is the only piece of client state observers may read; watchdog
    /// tasks hold this instead of the client itself.
    pub fn state_handle(&self) -> Arc<AtomicConnectionState> {
        Arc::clone(&self.state)
    }

    /// Snapshot of the traffic counters
    pub fn metrics(&self) -> Metrics {
        Metrics {
            frames_received: self.metrics.frames_received(),
            frames_sent: self.metrics.frames_sent(),
            reconnect_count: self.metrics.reconnect_count(),
            connection_state: self.state.get(),
        }
    }

    /// Try to receive a lifecycle event (non-blocking)
    pub fn try_recv_event(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive a lifecycle event (blocking)
    pub fn recv_event(&self) -> std::result::Result<ClientEvent, crossbeam_channel::RecvError> {
        self.event_rx.recv()
    }

    /// Stop the client
    ///
    /// Valid from any state and idempotent. Cancels a pending backoff wait,
    /// closes the transport if open, and leaves the state `Disconnected`.
    /// Returns once the connection task has exited (bounded by the
    /// stop-poll interval).
    pub async fn stop(&mut self) {
        self.run_flag.store(false, Ordering::Release);
        if let Some(handle) = self.task_handle.take() {
            if let Err(e) = handle.await {
                debug!("Connection task join error: {}", e);
            }
        }
        self.state.set(ConnectionState::Disconnected);
        info!("Feed client stopped");
    }
}

/// Main connection task loop
async fn run_client<H>(
    config: ClientConfig,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    run_flag: Arc<AtomicBool>,
    event_tx: Sender<ClientEvent>,
    handler: H,
) where
    H: FrameHandler + 'static,
{
    let mut backoff = Backoff::new(
        config.initial_reconnect_delay,
        config.max_reconnect_delay,
        config.max_reconnect_attempts,
    );
    let url = config.stream_url();

    loop {
        if !run_flag.load(Ordering::Acquire) {
            break;
        }

        state.set(ConnectionState::Connecting);
        info!("Connecting to {}", url);

        match connect_async(&url).await {
            Ok((ws_stream, _)) => {
                info!("WebSocket connection established");
                info!("Subscribed to streams: {}", config.streams.join(", "));
                state.set(ConnectionState::Connected);
                backoff.reset();
                let _ = event_tx.send(ClientEvent::Connected);

                match drive_connection(ws_stream, &config, &metrics, &run_flag, &handler).await {
                    Ok(()) => {
                        // Only a stop request returns Ok from the drive loop
                        debug!("Receive loop closed on stop request");
                    }
                    Err(e) => {
                        warn!("WebSocket closed: {}", e);
                    }
                }
                let _ = event_tx.send(ClientEvent::Disconnected);
            }
            Err(e) => {
                error!("Failed to connect: {}", e);
            }
        }

        if !run_flag.load(Ordering::Acquire) {
            break;
        }

        // Transport is down and we were not asked to stop: consume retry
        // budget and wait out the backoff delay.
        match backoff.next_delay() {
            Some(delay) => {
                state.set(ConnectionState::Reconnecting);
                metrics.increment_reconnects();
                let _ = event_tx.send(ClientEvent::Reconnecting(backoff.attempts()));
                info!(
                    "Attempting to reconnect in {:?} ({}/{})",
                    delay,
                    backoff.attempts(),
                    backoff.max_attempts()
                );
                if !interruptible_sleep(delay, &run_flag).await {
                    debug!("Stop requested during reconnect delay");
                    break;
                }
            }
            None => {
                state.set(ConnectionState::Failed);
                error!(
                    "Max reconnection attempts reached ({}), giving up",
                    backoff.max_attempts()
                );
                let _ = event_tx.send(ClientEvent::Failed {
                    attempts: backoff.attempts(),
                });
                // Terminal: leave the Failed state published and exit
                return;
            }
        }
    }

    state.set(ConnectionState::Disconnected);
    info!("Connection task exiting");
}

/// Drive an open connection until it dies or a stop is requested
///
/// Returns `Ok(())` only for a stop request; every transport-level ending
/// is an error so the caller takes the reconnect path.
async fn drive_connection<H>(
    ws_stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    config: &ClientConfig,
    metrics: &AtomicMetrics,
    run_flag: &AtomicBool,
    handler: &H,
) -> Result<()>
where
    H: FrameHandler,
{
    let (mut write, mut read) = ws_stream.split();

    let pong_tracker = PongTracker::new(config.ping_timeout);
    // Skip the immediate first tick so the first ping goes out one full
    // interval after connect.
    let mut ping_timer = tokio::time::interval_at(
        tokio::time::Instant::now() + config.ping_interval,
        config.ping_interval,
    );
    ping_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stop_check = tokio::time::interval(STOP_POLL_INTERVAL);

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        metrics.increment_received();
                        // Inline dispatch keeps per-symbol updates in
                        // arrival order. Handler errors are data-quality
                        // events, never connection events.
                        if let Err(e) = handler.on_frame(&text).await {
                            debug!("Frame handler error: {}", e);
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        write.send(Message::Pong(payload)).await.map_err(|e| {
                            FeedSockError::WebSocket(format!("Failed to send pong: {}", e))
                        })?;
                        metrics.increment_sent();
                    }
                    Some(Ok(Message::Pong(_))) => {
                        pong_tracker.record_pong_received();
                    }
                    Some(Ok(Message::Close(frame))) => {
                        return Err(FeedSockError::ConnectionClosed(match frame {
                            Some(f) => format!("{} - {}", f.code, f.reason),
                            None => "no close frame".to_string(),
                        }));
                    }
                    Some(Ok(_)) => {
                        // Binary and raw frames are not part of the feed
                    }
                    Some(Err(e)) => {
                        return Err(FeedSockError::WebSocket(e.to_string()));
                    }
                    None => {
                        return Err(FeedSockError::ConnectionClosed("stream ended".to_string()));
                    }
                }
            }

            _ = ping_timer.tick() => {
                if !pong_tracker.is_healthy() {
                    return Err(FeedSockError::KeepaliveTimeout(format!(
                        "no pong within {:?}",
                        config.ping_timeout
                    )));
                }
                write.send(Message::Ping(Vec::new())).await.map_err(|e| {
                    FeedSockError::WebSocket(format!("Failed to send ping: {}", e))
                })?;
                pong_tracker.record_ping_sent();
                metrics.increment_sent();
            }

            _ = stop_check.tick() => {
                if !run_flag.load(Ordering::Acquire) {
                    let _ = write.close().await;
                    return Ok(());
                }
            }
        }
    }
}

/// Sleep for `duration`, re-checking the stop flag at the poll interval
///
/// Returns `false` if the sleep was interrupted by a stop request.
async fn interruptible_sleep(duration: Duration, run_flag: &AtomicBool) -> bool {
    let mut elapsed = Duration::ZERO;
    while elapsed < duration {
        if !run_flag.load(Ordering::Acquire) {
            return false;
        }
        let step = STOP_POLL_INTERVAL.min(duration - elapsed);
        tokio::time::sleep(step).await;
        elapsed += step;
    }
    run_flag.load(Ordering::Acquire)
}
