//! Discord gateway: reaction events over a websocket
//!
//! A background task holds the websocket, keeps the heartbeat going and
//! forwards reaction events from the voting channel into a
//! [`ReactionStream`]. Dropped sessions are re-identified after a delay;
//! the stream only ends on cancellation or a fatal close code.
//!
//! Events wait in a local backlog until the stream has room, so a slow
//! consumer never stalls the heartbeat.

use super::error::{DiscordError, Result};
use super::protocol::{self, GatewayPayload, Hello, ReactionPayload, Ready, opcode};
use futures::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use votegate_application::ReactionStream;
use votegate_domain::{ChannelId, ReactionEvent};

const EVENT_BUFFER: usize = 256;
const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// How a single gateway session ended
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Cancelled,
    Reconnect,
    /// Nobody is reading the stream any more
    Abandoned,
}

enum Frame {
    Payload(GatewayPayload),
    Closed(Option<u16>),
    Other,
}

fn classify(message: Message) -> Result<Frame> {
    match message {
        Message::Text(text) => Ok(Frame::Payload(serde_json::from_str(&text)?)),
        Message::Close(frame) => Ok(Frame::Closed(frame.map(|f| u16::from(f.code)))),
        _ => Ok(Frame::Other),
    }
}

pub struct DiscordGateway {
    url: String,
    token: String,
    voting_channel: ChannelId,
    reconnect_delay: Duration,
    event_buffer: usize,
}

impl DiscordGateway {
    pub fn new(url: impl Into<String>, token: impl Into<String>, voting_channel: ChannelId) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            voting_channel,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            event_buffer: EVENT_BUFFER,
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    /// Start the background connection and return its event stream
    pub fn spawn(self, cancellation: CancellationToken) -> (ReactionStream, JoinHandle<()>) {
        let (tx, stream) = ReactionStream::channel(self.event_buffer);
        let handle = tokio::spawn(async move { self.run(tx, cancellation).await });
        (stream, handle)
    }

    async fn run(self, tx: mpsc::Sender<ReactionEvent>, cancellation: CancellationToken) {
        let mut backlog = VecDeque::new();
        loop {
            match self.session(&tx, &mut backlog, &cancellation).await {
                Ok(SessionEnd::Cancelled) | Ok(SessionEnd::Abandoned) => break,
                Ok(SessionEnd::Reconnect) => info!("Gateway session ended, reconnecting"),
                Err(DiscordError::FatalClose(code)) => {
                    error!("Gateway closed with fatal code {}, giving up", code);
                    break;
                }
                Err(e) => warn!("Gateway session failed: {}", e),
            }

            if !Self::drain(&tx, &mut backlog, &cancellation).await {
                break;
            }
            tokio::select! {
                _ = cancellation.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
        debug!("Gateway task finished");
        // Dropping `tx` closes the stream.
    }

    /// Deliver queued events between sessions; `false` if the loop should stop
    async fn drain(
        tx: &mpsc::Sender<ReactionEvent>,
        backlog: &mut VecDeque<ReactionEvent>,
        cancellation: &CancellationToken,
    ) -> bool {
        while let Some(event) = backlog.pop_front() {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => return false,
                sent = tx.send(event) => {
                    if sent.is_err() {
                        return false;
                    }
                }
            }
        }
        true
    }

    async fn session(
        &self,
        tx: &mpsc::Sender<ReactionEvent>,
        backlog: &mut VecDeque<ReactionEvent>,
        cancellation: &CancellationToken,
    ) -> Result<SessionEnd> {
        let (socket, _) = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Ok(SessionEnd::Cancelled),
            connected = connect_async(self.url.as_str()) => connected?,
        };
        let (mut sink, mut source) = socket.split();

        let hello = loop {
            let Some(message) = source.next().await else {
                return Ok(SessionEnd::Reconnect);
            };
            match classify(message?)? {
                Frame::Payload(payload) if payload.op == opcode::HELLO => {
                    break serde_json::from_value::<Hello>(payload.d)?;
                }
                Frame::Payload(payload) => {
                    return Err(DiscordError::UnexpectedPayload(format!(
                        "expected HELLO, got op {}",
                        payload.op
                    )));
                }
                Frame::Closed(code) => return Self::closed(code),
                Frame::Other => {}
            }
        };

        sink.send(Message::Text(protocol::identify(&self.token).to_string()))
            .await?;

        let period = Duration::from_millis(hello.heartbeat_interval.max(1));
        let mut heartbeat = tokio::time::interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sequence: Option<u64> = None;
        let mut awaiting_ack = false;

        loop {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    let _ = sink.close().await;
                    return Ok(SessionEnd::Cancelled);
                }
                _ = heartbeat.tick() => {
                    if awaiting_ack {
                        warn!("Heartbeat not acknowledged");
                        return Ok(SessionEnd::Reconnect);
                    }
                    sink.send(Message::Text(protocol::heartbeat(sequence).to_string())).await?;
                    awaiting_ack = true;
                }
                permit = tx.reserve(), if !backlog.is_empty() => {
                    let Ok(permit) = permit else {
                        return Ok(SessionEnd::Abandoned);
                    };
                    if let Some(event) = backlog.pop_front() {
                        permit.send(event);
                    }
                }
                message = source.next() => {
                    let Some(message) = message else {
                        return Ok(SessionEnd::Reconnect);
                    };
                    let payload = match classify(message?)? {
                        Frame::Payload(payload) => payload,
                        Frame::Closed(code) => return Self::closed(code),
                        Frame::Other => continue,
                    };
                    if payload.s.is_some() {
                        sequence = payload.s;
                    }

                    match payload.op {
                        opcode::DISPATCH => {
                            if let Some(event) = self.dispatch(payload) {
                                backlog.push_back(event);
                            }
                        }
                        opcode::HEARTBEAT => {
                            sink.send(Message::Text(protocol::heartbeat(sequence).to_string())).await?;
                        }
                        opcode::HEARTBEAT_ACK => awaiting_ack = false,
                        opcode::RECONNECT | opcode::INVALID_SESSION => {
                            debug!("Gateway requested a new session (op {})", payload.op);
                            return Ok(SessionEnd::Reconnect);
                        }
                        other => debug!("Ignoring gateway op {}", other),
                    }
                }
            }
        }
    }

    fn closed(code: Option<u16>) -> Result<SessionEnd> {
        match code {
            Some(code) if protocol::is_fatal_close(code) => Err(DiscordError::FatalClose(code)),
            Some(code) => {
                debug!("Gateway closed with code {}", code);
                Ok(SessionEnd::Reconnect)
            }
            None => Ok(SessionEnd::Reconnect),
        }
    }

    /// Turn a dispatch into a reaction event for the voting channel, if it is one
    fn dispatch(&self, payload: GatewayPayload) -> Option<ReactionEvent> {
        let added = match payload.t.as_deref() {
            Some("MESSAGE_REACTION_ADD") => true,
            Some("MESSAGE_REACTION_REMOVE") => false,
            Some("READY") => {
                match serde_json::from_value::<Ready>(payload.d) {
                    Ok(ready) => info!("Gateway ready as {}", ready.user.id),
                    Err(e) => warn!("Malformed READY payload: {}", e),
                }
                return None;
            }
            _ => return None,
        };

        let reaction: ReactionPayload = match serde_json::from_value(payload.d) {
            Ok(reaction) => reaction,
            Err(e) => {
                warn!("Malformed reaction payload: {}", e);
                return None;
            }
        };
        if reaction.channel_id != self.voting_channel.as_str() {
            return None;
        }
        reaction.into_event(added)
    }
}
