//! Vote intents and the reaction symbols that express them

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default approve reaction
pub const APPROVE_SYMBOL: &str = "✅";

/// Default deny reaction
pub const DENY_SYMBOL: &str = "❌";

/// What a recognized reaction means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteIntent {
    Approve,
    Deny,
}

impl VoteIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteIntent::Approve => "approve",
            VoteIntent::Deny => "deny",
        }
    }
}

impl std::fmt::Display for VoteIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping between reaction symbols and vote intents
///
/// Exactly two symbols are recognized. Any other reaction on a votable
/// message is ignored.
///
/// # Example
///
/// ```
/// use votegate_domain::vote::{VoteIntent, VoteSymbols};
///
/// let symbols = VoteSymbols::default();
/// assert_eq!(symbols.intent_for("✅"), Some(VoteIntent::Approve));
/// assert_eq!(symbols.intent_for("❌"), Some(VoteIntent::Deny));
/// assert_eq!(symbols.intent_for("🎉"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSymbols {
    approve: String,
    deny: String,
}

impl VoteSymbols {
    pub fn new(approve: impl Into<String>, deny: impl Into<String>) -> Result<Self, DomainError> {
        let approve = approve.into();
        let deny = deny.into();
        if approve.is_empty() || deny.is_empty() {
            return Err(DomainError::Malformed("empty vote symbol".to_string()));
        }
        if approve == deny {
            return Err(DomainError::AmbiguousSymbols);
        }
        Ok(Self { approve, deny })
    }

    pub fn intent_for(&self, symbol: &str) -> Option<VoteIntent> {
        if symbol == self.approve {
            Some(VoteIntent::Approve)
        } else if symbol == self.deny {
            Some(VoteIntent::Deny)
        } else {
            None
        }
    }

    pub fn symbol_for(&self, intent: VoteIntent) -> &str {
        match intent {
            VoteIntent::Approve => &self.approve,
            VoteIntent::Deny => &self.deny,
        }
    }

    /// Both symbols, approve first (the order affordances are added in)
    pub fn all(&self) -> [&str; 2] {
        [&self.approve, &self.deny]
    }
}

impl Default for VoteSymbols {
    fn default() -> Self {
        Self {
            approve: APPROVE_SYMBOL.to_string(),
            deny: DENY_SYMBOL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_symbols() {
        let symbols = VoteSymbols::new("👍", "👎").unwrap();
        assert_eq!(symbols.intent_for("👍"), Some(VoteIntent::Approve));
        assert_eq!(symbols.intent_for("✅"), None);
        assert_eq!(symbols.symbol_for(VoteIntent::Deny), "👎");
        assert_eq!(symbols.all(), ["👍", "👎"]);
    }

    #[test]
    fn test_identical_symbols_rejected() {
        assert_eq!(
            VoteSymbols::new("✅", "✅"),
            Err(DomainError::AmbiguousSymbols)
        );
        assert!(VoteSymbols::new("", "❌").is_err());
    }
}
