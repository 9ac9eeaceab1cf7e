//! Application submissions and how they are posted for voting

pub mod record;
pub mod unit;

pub use record::{ApplicationRecord, RecordField};
pub use unit::{DEFAULT_TITLE, VotableUnit, confirmation_text, row_caption};
