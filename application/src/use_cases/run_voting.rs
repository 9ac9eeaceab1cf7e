//! Run Voting use case
//!
//! Drains the reaction stream into the decision engine. Events are applied
//! strictly in stream order; decision reports run as separate tasks so a
//! slow record source never holds up later reactions.

use crate::ports::message_channel::{MessageChannel, ReactionStream};
use crate::ports::record_source::RecordSource;
use crate::use_cases::tally_reaction::{TallyOutcome, TallyReactionUseCase};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why the voting loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotingStop {
    Cancelled,
    /// The transport ended the reaction stream for good
    StreamClosed,
}

/// Counters for one voting session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotingSummary {
    pub events: usize,
    pub counted: usize,
    pub decisions: usize,
    pub stop: VotingStop,
}

/// Use case for running the reaction → decision pipeline
pub struct RunVotingUseCase<R: RecordSource, C: MessageChannel> {
    tally: Arc<TallyReactionUseCase<R, C>>,
}

impl<R: RecordSource + 'static, C: MessageChannel + 'static> RunVotingUseCase<R, C> {
    pub fn new(tally: Arc<TallyReactionUseCase<R, C>>) -> Self {
        Self { tally }
    }

    /// Consume events until cancelled or the stream closes
    ///
    /// Reports already in flight are always awaited before returning.
    pub async fn execute(
        &self,
        mut stream: ReactionStream,
        cancellation: CancellationToken,
    ) -> VotingSummary {
        let mut reports = JoinSet::new();
        let mut events = 0;
        let mut counted = 0;
        let mut decisions = 0;

        let stop = loop {
            tokio::select! {
                _ = cancellation.cancelled() => break VotingStop::Cancelled,
                Some(joined) = reports.join_next(), if !reports.is_empty() => {
                    if let Err(e) = joined {
                        warn!("Decision report task failed: {}", e);
                    }
                }
                event = stream.next() => {
                    let Some(event) = event else {
                        break VotingStop::StreamClosed;
                    };
                    events += 1;
                    match self.tally.apply(event).await {
                        TallyOutcome::Decided(pending) => {
                            decisions += 1;
                            info!(
                                row = %pending.row,
                                message_id = %pending.message_id,
                                "Quorum reached: {}",
                                pending.decision
                            );
                            let tally = Arc::clone(&self.tally);
                            reports.spawn(async move {
                                tally.report(&pending).await;
                            });
                        }
                        TallyOutcome::Counted { .. } => counted += 1,
                        outcome => debug!(?outcome, "Reaction not counted"),
                    }
                }
            }
        };

        while let Some(joined) = reports.join_next().await {
            if let Err(e) = joined {
                warn!("Decision report task failed: {}", e);
            }
        }

        info!(events, decisions, ?stop, "Voting loop stopped");
        VotingSummary {
            events,
            counted,
            decisions,
            stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VotingParams;
    use crate::ledger::SharedLedger;
    use crate::config::IngestionParams;
    use crate::use_cases::ingest_records::IngestRecordsUseCase;
    use crate::use_cases::test_support::{MockChannel, MockRecordSource, VOTING_CHANNEL};
    use std::time::Duration;
    use votegate_domain::{
        ApplicationRecord, MessageId, Quorum, ReactionEvent, RecordStatus, RowId,
    };

    fn tally(
        source: Arc<MockRecordSource>,
        quorum: usize,
    ) -> Arc<TallyReactionUseCase<MockRecordSource, MockChannel>> {
        let ledger = SharedLedger::new();
        ledger.register(MessageId::from("M1"), RowId::new(42));
        let params = VotingParams::new(VOTING_CHANNEL)
            .with_quorum(Quorum::new(quorum).unwrap())
            .without_confirmation();
        Arc::new(TallyReactionUseCase::new(
            ledger,
            source,
            Arc::new(MockChannel::new()),
            params,
        ))
    }

    #[tokio::test]
    async fn test_burst_past_quorum_reports_once() {
        let source = Arc::new(MockRecordSource::new());
        let use_case = RunVotingUseCase::new(tally(source.clone(), 3));
        let (tx, stream) = ReactionStream::channel(16);

        for voter in ["a", "b", "c", "d", "e"] {
            tx.send(ReactionEvent::added("M1", VOTING_CHANNEL, voter, "✅"))
                .await
                .unwrap();
        }
        drop(tx);

        let summary = use_case.execute(stream, CancellationToken::new()).await;

        assert_eq!(summary.events, 5);
        assert_eq!(summary.counted, 2);
        assert_eq!(summary.decisions, 1);
        assert_eq!(summary.stop, VotingStop::StreamClosed);
        assert_eq!(
            source.terminal_reports(),
            vec![(RowId::new(42), RecordStatus::Accepted)]
        );
    }

    #[tokio::test]
    async fn test_cancellation_waits_for_in_flight_report() {
        let source = Arc::new(MockRecordSource::gated());
        let use_case = Arc::new(RunVotingUseCase::new(tally(source.clone(), 1)));
        let (tx, stream) = ReactionStream::channel(4);
        let cancellation = CancellationToken::new();

        let handle = tokio::spawn({
            let use_case = use_case.clone();
            let cancellation = cancellation.clone();
            async move { use_case.execute(stream, cancellation).await }
        });

        tx.send(ReactionEvent::added("M1", VOTING_CHANNEL, "a", "❌"))
            .await
            .unwrap();
        while source.in_flight.load(std::sync::atomic::Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        cancellation.cancel();
        source.gate.as_ref().unwrap().notify_one();

        let summary = handle.await.unwrap();
        assert_eq!(summary.stop, VotingStop::Cancelled);
        assert_eq!(
            source.terminal_reports(),
            vec![(RowId::new(42), RecordStatus::Denied)]
        );
    }

    #[tokio::test]
    async fn test_reaction_while_affordances_are_added_is_counted() {
        let (tx, stream) = ReactionStream::channel(4);
        let source = Arc::new(
            MockRecordSource::new().with_record(ApplicationRecord::new(RowId::new(8))),
        );
        let channel = Arc::new(MockChannel::new().with_early_reaction(
            tx,
            ReactionEvent::added("M1", VOTING_CHANNEL, "alice", "✅"),
        ));
        let ledger = SharedLedger::new();
        let params = VotingParams::new(VOTING_CHANNEL)
            .with_quorum(Quorum::new(1).unwrap())
            .without_confirmation();
        let tally = Arc::new(TallyReactionUseCase::new(
            ledger.clone(),
            source.clone(),
            channel.clone(),
            params,
        ));
        let ingest = IngestRecordsUseCase::new(
            ledger.clone(),
            source.clone(),
            channel.clone(),
            IngestionParams::default(),
        );
        let cancellation = CancellationToken::new();
        let pump = tokio::spawn({
            let cancellation = cancellation.clone();
            async move { RunVotingUseCase::new(tally).execute(stream, cancellation).await }
        });

        ingest.tick().await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), async {
            while source.terminal_reports().is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("early vote was never counted");
        cancellation.cancel();
        let summary = pump.await.unwrap();

        assert_eq!(summary.decisions, 1);
        assert_eq!(
            source.terminal_reports(),
            vec![(RowId::new(8), RecordStatus::Accepted)]
        );
        assert!(ledger.is_empty());
    }
}
