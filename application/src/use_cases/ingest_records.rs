//! Ingest Records use case
//!
//! Pulls pending applications from the record source and posts them for
//! voting, one record per tick.
//!
//! ```text
//!   ┌──────┐  tick   ┌─────────┐  posted + registered  ┌──────┐
//!   │ Idle │ ──────► │ Posting │ ────────────────────► │ Idle │
//!   └──────┘         └─────────┘                       └──────┘
//! ```
//!
//! Ticks never overlap: the next fetch starts only after the previous
//! post and registration have completed.

use crate::config::IngestionParams;
use crate::ledger::SharedLedger;
use crate::ports::message_channel::{ChannelError, MessageChannel};
use crate::ports::record_source::{RecordSource, RecordSourceError};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use votegate_domain::{MessageId, RecordStatus, RowId, VotableUnit, VoteSymbols};

/// Errors that abort a single ingestion tick
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Record source error: {0}")]
    Source(#[from] RecordSourceError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing pending
    Idle,
    /// One record was posted and opened for voting
    Posted { row: RowId, message_id: MessageId },
}

/// Use case for materializing pending records as votable messages
pub struct IngestRecordsUseCase<R: RecordSource, C: MessageChannel> {
    ledger: SharedLedger,
    record_source: Arc<R>,
    channel: Arc<C>,
    symbols: VoteSymbols,
    params: IngestionParams,
}

impl<R: RecordSource + 'static, C: MessageChannel + 'static> IngestRecordsUseCase<R, C> {
    pub fn new(
        ledger: SharedLedger,
        record_source: Arc<R>,
        channel: Arc<C>,
        params: IngestionParams,
    ) -> Self {
        Self {
            ledger,
            record_source,
            channel,
            symbols: VoteSymbols::default(),
            params,
        }
    }

    pub fn with_symbols(mut self, symbols: VoteSymbols) -> Self {
        self.symbols = symbols;
        self
    }

    /// Run one tick: fetch, post, register, add affordances, mark as posted
    pub async fn tick(&self) -> Result<TickOutcome, IngestError> {
        let Some(record) = self.record_source.fetch_next().await? else {
            debug!("No pending applications");
            return Ok(TickOutcome::Idle);
        };

        let row = record.row;
        let unit = VotableUnit::for_record(&record, &self.symbols);
        let message_id = self.channel.post_unit(&unit).await?;

        // Open the vote before adding affordances so that early reactions count.
        if !self.ledger.register(message_id.clone(), row) {
            warn!(row = %row, message_id = %message_id, "Message already registered");
        }
        info!(row = %row, message_id = %message_id, "Posted application for voting");

        if let Err(e) = self.channel.add_affordances(&message_id, &unit).await {
            warn!(message_id = %message_id, "Could not add reaction affordances: {}", e);
        }

        // The vote is open either way; a failed status write only risks a
        // duplicate post on a later tick.
        if let Err(e) = self
            .record_source
            .report_status(row, RecordStatus::Posted)
            .await
        {
            warn!(row = %row, "Failed to mark row as posted: {}", e);
        }

        Ok(TickOutcome::Posted { row, message_id })
    }

    /// Tick until cancelled
    ///
    /// Failed ticks are logged and followed by an exponentially growing,
    /// jittered delay; a successful tick resets the delay to the poll
    /// interval.
    pub async fn run(&self, cancellation: CancellationToken) {
        info!(
            interval_secs = self.params.poll_interval.as_secs(),
            "Ingestion loop started"
        );
        let mut failures: u32 = 0;

        while !cancellation.is_cancelled() {
            match self.tick().await {
                Ok(_) => failures = 0,
                Err(IngestError::Source(e)) if e.is_unauthorized() => {
                    failures = failures.saturating_add(1);
                    warn!("Record source rejected the shared secret; check the configured secret");
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    warn!(failures, "Ingestion tick failed: {}", e);
                }
            }

            let delay = self.params.next_delay(failures);
            tokio::select! {
                _ = cancellation.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Ingestion loop stopped");
    }
}
