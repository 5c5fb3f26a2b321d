//! Evaluation of comparison scores.
//!
//! Groups the scores of one probe against its galleries into normalized
//! aggregates and turns them into accept/reject [`Verdict`]s.

mod verdict;

pub use verdict::{GroupAggregate, Verdict, VerdictConfig};
