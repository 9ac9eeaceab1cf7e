//! Record source port
//!
//! Defines how the application pulls pending applications and writes their
//! status back to the system of record.

use async_trait::async_trait;
use thiserror::Error;
use votegate_domain::{ApplicationRecord, RecordStatus, RowId};

/// Errors that can occur talking to the record source
#[derive(Error, Debug)]
pub enum RecordSourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Record source rejected the shared secret")]
    Unauthorized,

    #[error("Record source rejected the request: {0}")]
    Rejected(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl RecordSourceError {
    /// Check if the failure was caused by the shared secret
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RecordSourceError::Unauthorized)
    }
}

/// System of record for applications
///
/// Every call made by an implementation must carry the shared secret.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Next application that has not been posted yet, if any
    async fn fetch_next(&self) -> Result<Option<ApplicationRecord>, RecordSourceError>;

    /// Write a status for a row (`Posted`, then `Accepted` or `Denied`)
    async fn report_status(&self, row: RowId, status: RecordStatus)
    -> Result<(), RecordSourceError>;
}
