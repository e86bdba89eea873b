use super::{NoveltyAccumulator, TraceReport};
use crate::bloom::{ApproximateSet, ScalableBloomFilter};
use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::error::{NoveltyError, Result};
use crate::report::ReportWriter;
use crate::trace::{SlidingWindow, TraceReader, TransferRecord};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Runs one trace through the window and the accumulator.
pub struct TraceProcessor<'a> {
    config: &'a RunConfig,
    cancel: &'a CancelToken,
}

impl<'a> TraceProcessor<'a> {
    pub fn new(config: &'a RunConfig, cancel: &'a CancelToken) -> Self {
        Self { config, cancel }
    }

    /// Open the trace at `location` and count it against `model`.
    pub fn process<M: ApproximateSet>(
        &self,
        model: &mut M,
        location: &Path,
    ) -> Result<TraceReport> {
        let reader = TraceReader::open(location)?;
        debug!(path = %reader.path().display(), "Reading trace");
        self.process_records(model, reader)
    }

    /// Count an already opened record stream against `model`.
    ///
    /// A fresh seen set is built for every call. A malformed record is
    /// logged and dropped, and the window restarts after it so no sequence
    /// spans the gap. An I/O error ends the trace early and the counters
    /// gathered so far are returned, so every window inserted into `model`
    /// belongs to a reported trace. On interrupt the partial counters are
    /// dropped.
    pub fn process_records<M, I>(
        &self,
        model: &mut M,
        records: I,
    ) -> Result<TraceReport>
    where
        M: ApproximateSet,
        I: IntoIterator<Item = Result<TransferRecord>>,
    {
        let seen = ScalableBloomFilter::new(self.config.seen_filter.clone())?;
        let mut window = SlidingWindow::new(self.config.seq_len)?;
        let mut accumulator =
            NoveltyAccumulator::new(model, seen, self.config.terminators);
        let mut malformed = 0usize;

        for record in records {
            if self.cancel.is_cancelled() {
                return Err(NoveltyError::Interrupted);
            }
            let record = match record {
                Ok(record) => record,
                Err(e @ NoveltyError::MalformedRecord { .. }) => {
                    warn!(error = %e, "Dropping malformed record");
                    malformed += 1;
                    window.reset();
                    continue;
                }
                Err(NoveltyError::Io(e)) => {
                    warn!(error = %e, "Trace truncated, keeping records read so far");
                    break;
                }
                Err(e) => return Err(e),
            };
            if let Some(sequence) = window.feed(&record) {
                accumulator.observe(&sequence, &record);
            }
        }

        if malformed > 0 {
            debug!(malformed, "Trace had malformed records");
        }
        Ok(accumulator.finish())
    }
}

/// Per-group tally, logged once the group is done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetSummary {
    pub group: String,
    /// Traces that produced an output line
    pub reported: usize,
    /// Reported traces whose ratio was undefined
    pub undefined: usize,
    /// Traces that could not be opened
    pub skipped: usize,
}

/// Runs every trace of a group, in order, against one model.
pub struct SetProcessor<'a> {
    traces: TraceProcessor<'a>,
    cancel: &'a CancelToken,
}

impl<'a> SetProcessor<'a> {
    pub fn new(config: &'a RunConfig, cancel: &'a CancelToken) -> Self {
        Self {
            traces: TraceProcessor::new(config, cancel),
            cancel,
        }
    }

    /// Process `traces` in list order and write one line per trace.
    ///
    /// Traces that cannot be opened are logged and get a skip marker in
    /// place of their counters, so output lines stay aligned with the set
    /// file. Returns
    /// [`NoveltyError::Interrupted`] when cancelled; every trace finished
    /// before that has already been written and folded into `model`.
    pub fn process_set<M, W>(
        &self,
        model: &mut M,
        label: &str,
        traces: &[PathBuf],
        writer: &mut ReportWriter<W>,
    ) -> Result<SetSummary>
    where
        M: ApproximateSet,
        W: Write,
    {
        info!(group = label, traces = traces.len(), "Parsing set");
        writer.write_header(label)?;

        let mut summary = SetSummary {
            group: label.to_string(),
            ..SetSummary::default()
        };

        for (index, location) in traces.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(NoveltyError::Interrupted);
            }
            debug!(group = label, index, trace = %location.display(), "Processing trace");

            match self.traces.process(model, location) {
                Ok(report) => {
                    if report.novel_to_trace == 0 {
                        warn!(
                            trace = %location.display(),
                            "No qualifying sequence, ratio undefined"
                        );
                        summary.undefined += 1;
                    }
                    writer.write_trace(label, location, &report)?;
                    summary.reported += 1;
                }
                Err(e) if e.is_trace_local() => {
                    warn!(trace = %location.display(), error = %e, "Skipping trace");
                    writer.write_skipped(label, location, &e)?;
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            group = label,
            reported = summary.reported,
            undefined = summary.undefined,
            skipped = summary.skipped,
            "Finished set"
        );
        writer.write_summary(&summary)?;
        Ok(summary)
    }
}
