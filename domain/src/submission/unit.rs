//! Votable units: what gets posted to the voting channel
//!
//! The row number is embedded in the unit's caption as `Sheet Row #<n>` so
//! the correlation can be recovered from the posted message alone.

use crate::core::ids::RowId;
use crate::submission::record::{ApplicationRecord, RecordField};
use crate::vote::decision::Decision;
use crate::vote::intent::VoteSymbols;

const CAPTION_PREFIX: &str = "Sheet Row #";

/// Default title of a posted application
pub const DEFAULT_TITLE: &str = "New Application";

/// Content of one votable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotableUnit {
    pub row: RowId,
    pub title: String,
    pub fields: Vec<RecordField>,
    pub caption: String,
    /// Reaction affordances, approve first
    pub reactions: Vec<String>,
}

impl VotableUnit {
    /// Build the unit for a record, captioned with its row number
    pub fn for_record(record: &ApplicationRecord, symbols: &VoteSymbols) -> Self {
        Self {
            row: record.row,
            title: DEFAULT_TITLE.to_string(),
            fields: record.fields.clone(),
            caption: row_caption(record.row),
            reactions: symbols.all().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Caption that carries the row number
pub fn row_caption(row: RowId) -> String {
    format!("{CAPTION_PREFIX}{row}")
}

/// Reply posted under a message once its decision has been recorded
pub fn confirmation_text(decision: Decision, row: RowId, symbols: &VoteSymbols) -> String {
    let symbol = symbols.symbol_for(decision.intent());
    format!(
        "{symbol} **{decision}** — Row #{row} has been updated. Next application incoming..."
    )
}
