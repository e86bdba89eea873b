//! Novelty counting: how many sequences of a trace are new to the model,
//! and how many are distinct within the trace itself.
pub mod accumulator;
pub mod processor;

pub use accumulator::{NoveltyAccumulator, TraceReport};
pub use processor::{SetProcessor, SetSummary, TraceProcessor};
