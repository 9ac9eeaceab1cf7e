//! Mock ports shared by the use case tests

use crate::ports::decision_log::{DecisionEntry, DecisionLog};
use crate::ports::message_channel::{ChannelError, MessageChannel};
use crate::ports::record_source::{RecordSource, RecordSourceError};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, mpsc};
use votegate_domain::{
    ApplicationRecord, MessageId, ReactionEvent, ReactionOrigin, RecordStatus, RowId,
    VotableUnit, VoterId,
};

pub const VOTING_CHANNEL: &str = "vote-channel";
pub const BOT_ID: &str = "bot-self";

// ==================== Record Source ====================

#[derive(Default)]
pub struct MockRecordSource {
    pub pending: Mutex<VecDeque<Result<Option<ApplicationRecord>, RecordSourceError>>>,
    pub reports: Mutex<Vec<(RowId, RecordStatus)>>,
    pub fail_reports: Mutex<Option<RecordSourceError>>,
    /// When set, terminal reports wait here before completing
    pub gate: Option<Notify>,
    pub in_flight: AtomicUsize,
}

impl MockRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Default::default()
        }
    }

    pub fn with_record(self, record: ApplicationRecord) -> Self {
        self.pending.lock().unwrap().push_back(Ok(Some(record)));
        self
    }

    pub fn with_fetch_error(self, error: RecordSourceError) -> Self {
        self.pending.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn failing_reports(self, error: RecordSourceError) -> Self {
        *self.fail_reports.lock().unwrap() = Some(error);
        self
    }

    pub fn reports(&self) -> Vec<(RowId, RecordStatus)> {
        self.reports.lock().unwrap().clone()
    }

    pub fn terminal_reports(&self) -> Vec<(RowId, RecordStatus)> {
        self.reports()
            .into_iter()
            .filter(|(_, status)| status.is_terminal())
            .collect()
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn fetch_next(&self) -> Result<Option<ApplicationRecord>, RecordSourceError> {
        self.pending.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn report_status(
        &self,
        row: RowId,
        status: RecordStatus,
    ) -> Result<(), RecordSourceError> {
        self.reports.lock().unwrap().push((row, status));
        if status.is_terminal()
            && let Some(gate) = &self.gate
        {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
        }
        match self.fail_reports.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

// ==================== Message Channel ====================

#[derive(Default)]
pub struct MockChannel {
    pub posted: Mutex<Vec<VotableUnit>>,
    pub affordances: Mutex<Vec<MessageId>>,
    pub replies: Mutex<Vec<(MessageId, String)>>,
    pub bots: HashSet<String>,
    pub unresolvable: HashSet<String>,
    pub fail_posts: bool,
    pub fail_affordances: bool,
    pub resolve_calls: AtomicUsize,
    /// Delivered to the reaction stream while affordances are being added
    pub early_reaction: Option<(mpsc::Sender<ReactionEvent>, ReactionEvent)>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bot(mut self, id: &str) -> Self {
        self.bots.insert(id.to_string());
        self
    }

    pub fn with_unresolvable(mut self, id: &str) -> Self {
        self.unresolvable.insert(id.to_string());
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    pub fn failing_affordances(mut self) -> Self {
        self.fail_affordances = true;
        self
    }

    pub fn with_early_reaction(
        mut self,
        tx: mpsc::Sender<ReactionEvent>,
        event: ReactionEvent,
    ) -> Self {
        self.early_reaction = Some((tx, event));
        self
    }

    pub fn replies(&self) -> Vec<(MessageId, String)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageChannel for MockChannel {
    async fn authenticate(&self) -> Result<VoterId, ChannelError> {
        Ok(VoterId::from(BOT_ID))
    }

    async fn post_unit(&self, unit: &VotableUnit) -> Result<MessageId, ChannelError> {
        if self.fail_posts {
            return Err(ChannelError::Transport("connection reset".to_string()));
        }
        let mut posted = self.posted.lock().unwrap();
        posted.push(unit.clone());
        Ok(MessageId::new(format!("M{}", posted.len())))
    }

    async fn add_affordances(
        &self,
        message_id: &MessageId,
        _unit: &VotableUnit,
    ) -> Result<(), ChannelError> {
        if let Some((tx, event)) = &self.early_reaction {
            tx.try_send(event.clone()).unwrap();
            tokio::task::yield_now().await;
        }
        if self.fail_affordances {
            return Err(ChannelError::Transport("rate limited".to_string()));
        }
        self.affordances.lock().unwrap().push(message_id.clone());
        Ok(())
    }

    async fn resolve_origin(&self, voter: &VoterId) -> Result<ReactionOrigin, ChannelError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if self.unresolvable.contains(voter.as_str()) {
            return Err(ChannelError::NotFound(voter.to_string()));
        }
        Ok(ReactionOrigin::from_bot_flag(
            self.bots.contains(voter.as_str()),
        ))
    }

    async fn reply_to(&self, message_id: &MessageId, text: &str) -> Result<(), ChannelError> {
        self.replies
            .lock()
            .unwrap()
            .push((message_id.clone(), text.to_string()));
        Ok(())
    }
}

// ==================== Decision Log ====================

#[derive(Default)]
pub struct RecordingDecisionLog {
    pub entries: Mutex<Vec<DecisionEntry>>,
}

impl DecisionLog for RecordingDecisionLog {
    fn record(&self, entry: &DecisionEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}
