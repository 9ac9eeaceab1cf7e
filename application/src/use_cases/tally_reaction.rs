//! Tally Reaction use case (the decision engine)
//!
//! Turns one reaction event into a ledger mutation and, when a side reaches
//! quorum, into a single decision report.
//!
//! # Exactly-once reporting
//!
//! The quorum check and the eviction of the entry happen under the same
//! ledger guard, and the guard is released before the report is awaited.
//! Any event that arrives while a report is in flight finds no entry and is
//! ignored, so a message is reported at most once even when several
//! reactions cross the threshold together.

use crate::config::VotingParams;
use crate::ledger::SharedLedger;
use crate::ports::decision_log::{DecisionEntry, DecisionLog, NoDecisionLog};
use crate::ports::message_channel::MessageChannel;
use crate::ports::record_source::RecordSource;
use std::sync::Arc;
use tracing::{debug, info, warn};
use votegate_domain::submission::confirmation_text;
use votegate_domain::{
    Decision, MessageId, ReactionEvent, ReactionOrigin, RowId, Tally, VoteIntent, VoterId,
};

/// Why an event did not change any vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Reaction in a channel other than the voting channel
    ForeignChannel,
    /// Reaction by a bot
    NonHuman,
    /// Reaction by the adapter's own identity
    OwnReaction,
    /// Partial payload whose author could not be looked up
    Unresolvable,
    /// Message is not (or no longer) open for voting
    NotVotable,
    /// Reaction is neither the approve nor the deny symbol
    UnknownSymbol,
}

/// A decision that has been evicted from the ledger and still needs reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    pub message_id: MessageId,
    pub row: RowId,
    pub decision: Decision,
    pub tally: Tally,
}

/// Result of handling one reaction event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyOutcome {
    Ignored(IgnoreReason),
    /// Admitted, but the vote state was already like that
    Unchanged { row: RowId, tally: Tally },
    /// Vote state changed, no decision yet
    Counted { row: RowId, tally: Tally },
    /// Quorum reached; the entry has already left the ledger
    Decided(PendingDecision),
}

impl TallyOutcome {
    pub fn is_decided(&self) -> bool {
        matches!(self, TallyOutcome::Decided(_))
    }
}

/// Use case for counting reactions and reporting decisions
pub struct TallyReactionUseCase<R: RecordSource, C: MessageChannel> {
    ledger: SharedLedger,
    record_source: Arc<R>,
    channel: Arc<C>,
    params: VotingParams,
    own_id: Option<VoterId>,
    decision_log: Arc<dyn DecisionLog>,
}

impl<R: RecordSource + 'static, C: MessageChannel + 'static> TallyReactionUseCase<R, C> {
    pub fn new(
        ledger: SharedLedger,
        record_source: Arc<R>,
        channel: Arc<C>,
        params: VotingParams,
    ) -> Self {
        Self {
            ledger,
            record_source,
            channel,
            params,
            own_id: None,
            decision_log: Arc::new(NoDecisionLog),
        }
    }

    /// Ignore reactions made under the adapter's own identity
    pub fn with_own_id(mut self, own_id: VoterId) -> Self {
        self.own_id = Some(own_id);
        self
    }

    pub fn with_decision_log(mut self, decision_log: Arc<dyn DecisionLog>) -> Self {
        self.decision_log = decision_log;
        self
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Handle an event and, if it decided the vote, report the decision
    pub async fn execute(&self, event: ReactionEvent) -> TallyOutcome {
        let outcome = self.apply(event).await;
        if let TallyOutcome::Decided(pending) = &outcome {
            self.report(pending).await;
        }
        outcome
    }

    /// Handle an event without reporting
    ///
    /// A `Decided` outcome must be passed to [`Self::report`]; the ledger no
    /// longer knows about the message.
    pub async fn apply(&self, event: ReactionEvent) -> TallyOutcome {
        if event.channel_id != self.params.voting_channel {
            return TallyOutcome::Ignored(IgnoreReason::ForeignChannel);
        }
        if self.own_id.as_ref() == Some(&event.voter_id) {
            return TallyOutcome::Ignored(IgnoreReason::OwnReaction);
        }
        if event.origin == ReactionOrigin::Bot {
            return TallyOutcome::Ignored(IgnoreReason::NonHuman);
        }
        let Some(intent) = self.params.symbols.intent_for(&event.symbol) else {
            return TallyOutcome::Ignored(IgnoreReason::UnknownSymbol);
        };
        if !self.ledger.contains(&event.message_id) {
            return TallyOutcome::Ignored(IgnoreReason::NotVotable);
        }

        if event.is_partial() {
            match self.channel.resolve_origin(&event.voter_id).await {
                Ok(ReactionOrigin::Human) => {}
                Ok(_) => return TallyOutcome::Ignored(IgnoreReason::NonHuman),
                Err(e) => {
                    debug!(
                        message_id = %event.message_id,
                        voter = %event.voter_id,
                        "Dropping unresolvable reaction: {}",
                        e
                    );
                    return TallyOutcome::Ignored(IgnoreReason::Unresolvable);
                }
            }
        }

        self.mutate(&event, intent)
    }

    /// Apply the vote, check quorum and evict, all under one guard
    fn mutate(&self, event: &ReactionEvent, intent: VoteIntent) -> TallyOutcome {
        let mut ledger = self.ledger.lock();
        let Some(record) = ledger.get_mut(&event.message_id) else {
            return TallyOutcome::Ignored(IgnoreReason::NotVotable);
        };

        let changed = record.apply(&event.voter_id, intent, event.added);
        let row = record.source_row_id();
        let tally = record.tally();

        if !changed {
            return TallyOutcome::Unchanged { row, tally };
        }

        info!(
            row = %row,
            approve = tally.approve,
            deny = tally.deny,
            "Row {} — {}",
            row,
            tally
        );

        match record.decision(self.params.quorum) {
            Some(decision) => {
                ledger.remove(&event.message_id);
                TallyOutcome::Decided(PendingDecision {
                    message_id: event.message_id.clone(),
                    row,
                    decision,
                    tally,
                })
            }
            None => TallyOutcome::Counted { row, tally },
        }
    }

    /// Report a decision to the record source, then confirm in the channel
    ///
    /// Failures are logged and dropped; the record stays `Posted` until a
    /// human intervenes. Returns whether the report succeeded.
    pub async fn report(&self, pending: &PendingDecision) -> bool {
        let reported = match self
            .record_source
            .report_status(pending.row, pending.decision.into())
            .await
        {
            Ok(()) => {
                info!(
                    row = %pending.row,
                    message_id = %pending.message_id,
                    "Sheet updated: {}",
                    pending.decision
                );
                true
            }
            Err(e) => {
                warn!(
                    row = %pending.row,
                    message_id = %pending.message_id,
                    "Failed to update sheet with {}: {}",
                    pending.decision,
                    e
                );
                false
            }
        };

        self.decision_log.record(&DecisionEntry {
            message_id: pending.message_id.clone(),
            row: pending.row,
            decision: pending.decision,
            tally: pending.tally,
            reported,
        });

        if reported && self.params.confirm_decisions {
            let text = confirmation_text(pending.decision, pending.row, &self.params.symbols);
            if let Err(e) = self.channel.reply_to(&pending.message_id, &text).await {
                warn!(message_id = %pending.message_id, "Could not post confirmation: {}", e);
            }
        }

        reported
    }
}
