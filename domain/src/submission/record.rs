//! Application records pulled from the record store

use crate::core::ids::RowId;
use serde::{Deserialize, Serialize};

/// One labelled field of an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    pub name: String,
    pub value: String,
    /// Render side by side with neighbouring inline fields
    #[serde(default)]
    pub inline: bool,
}

impl RecordField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }
}

/// A pending application awaiting a vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub row: RowId,
    /// Fields in the order the record store lists them
    #[serde(default)]
    pub fields: Vec<RecordField>,
}

impl ApplicationRecord {
    pub fn new(row: RowId) -> Self {
        Self {
            row,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: RecordField) -> Self {
        self.fields.push(field);
        self
    }
}
