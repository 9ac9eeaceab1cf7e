//! Use cases (application services)

pub mod ingest_records;
pub mod run_voting;
pub mod tally_reaction;

#[cfg(test)]
pub(crate) mod test_support;
