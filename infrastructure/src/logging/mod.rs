//! Decision audit logging.
//!
//! Provides [`JsonlDecisionLog`], a JSONL file writer that implements the
//! [`DecisionLog`](votegate_application::DecisionLog) port.

mod jsonl_decision_log;

pub use jsonl_decision_log::JsonlDecisionLog;
