use crate::bloom::ApproximateSet;
use crate::error::{NoveltyError, Result};
use crate::trace::{Sequence, TerminatorFilter, TransferRecord};
use serde::Serialize;

/// Per-trace counters fed by completed windows.
///
/// `model` outlives the accumulator and keeps every insertion; `seen` is
/// owned and dropped with it.
pub struct NoveltyAccumulator<'m, M, S> {
    model: &'m mut M,
    seen: S,
    terminators: TerminatorFilter,
    novel_to_model: u64,
    novel_to_trace: u64,
    key: Vec<u8>,
}

impl<'m, M, S> NoveltyAccumulator<'m, M, S>
where
    M: ApproximateSet,
    S: ApproximateSet,
{
    pub fn new(model: &'m mut M, seen: S, terminators: TerminatorFilter) -> Self {
        Self {
            model,
            seen,
            terminators,
            novel_to_model: 0,
            novel_to_trace: 0,
            key: Vec::new(),
        }
    }

    /// Count `sequence` if the record that completed it is a terminator.
    ///
    /// The model and seen sets are updated independently, both on every
    /// counted window. Returns whether the window was counted.
    pub fn observe(
        &mut self,
        sequence: &Sequence<'_>,
        record: &TransferRecord,
    ) -> bool {
        if !self.terminators.matches(record) {
            return false;
        }
        sequence.write_key(&mut self.key);

        if !self.model.test_and_insert(&self.key) {
            self.novel_to_model += 1;
        }
        if !self.seen.test_and_insert(&self.key) {
            self.novel_to_trace += 1;
        }
        true
    }

    pub fn report(&self) -> TraceReport {
        TraceReport {
            novel_to_model: self.novel_to_model,
            novel_to_trace: self.novel_to_trace,
        }
    }

    pub fn finish(self) -> TraceReport {
        self.report()
    }
}

/// Result of one trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraceReport {
    /// Sequences the model had not seen before this trace
    pub novel_to_model: u64,
    /// Distinct sequences within the trace
    pub novel_to_trace: u64,
}

impl TraceReport {
    /// `novel_to_model / novel_to_trace`.
    ///
    /// Undefined for traces without a single counted window.
    pub fn ratio(&self) -> Result<f64> {
        if self.novel_to_trace == 0 {
            return Err(NoveltyError::DivisionUndefined);
        }
        Ok(self.novel_to_model as f64 / self.novel_to_trace as f64)
    }
}
