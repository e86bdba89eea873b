use crate::error::{NoveltyError, Result};
use crate::novelty::{SetSummary, TraceReport};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Placeholder written in the ratio column when it is undefined.
pub const UNDEFINED_RATIO: &str = "undefined";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// `-- label --` headers and `model,trace,ratio` lines
    #[default]
    Csv,
    /// One JSON object per trace
    Json,
}

#[derive(Serialize)]
struct TraceLine<'a> {
    group: &'a str,
    trace: String,
    novel_to_model: u64,
    novel_to_trace: u64,
    ratio: Option<f64>,
}

#[derive(Serialize)]
struct SkippedLine<'a> {
    group: &'a str,
    trace: String,
    error: String,
}

/// Writes per-trace results. Every line is flushed as soon as it is
/// written so nothing is lost when the run is interrupted.
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn write_header(&mut self, label: &str) -> Result<()> {
        if self.format == OutputFormat::Csv {
            writeln!(self.out, "-- {label} --")?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn write_trace(
        &mut self,
        label: &str,
        location: &Path,
        report: &TraceReport,
    ) -> Result<()> {
        let ratio = report.ratio().ok();
        match self.format {
            OutputFormat::Csv => {
                let ratio = ratio.map_or_else(
                    || UNDEFINED_RATIO.to_string(),
                    |r| format!("{r:?}"),
                );
                writeln!(
                    self.out,
                    "{},{},{}",
                    report.novel_to_model, report.novel_to_trace, ratio
                )?;
            }
            OutputFormat::Json => {
                let line = TraceLine {
                    group: label,
                    trace: location.display().to_string(),
                    novel_to_model: report.novel_to_model,
                    novel_to_trace: report.novel_to_trace,
                    ratio,
                };
                serde_json::to_writer(&mut self.out, &line)
                    .map_err(std::io::Error::from)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Marker written in place of a trace that could not be opened.
    ///
    /// CSV gets a `# <error>` comment line so the remaining lines still
    /// line up with the set file.
    pub fn write_skipped(
        &mut self,
        label: &str,
        location: &Path,
        error: &NoveltyError,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Csv => writeln!(self.out, "# {error}")?,
            OutputFormat::Json => {
                let line = SkippedLine {
                    group: label,
                    trace: location.display().to_string(),
                    error: error.to_string(),
                };
                serde_json::to_writer(&mut self.out, &line)
                    .map_err(std::io::Error::from)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Trailing summary of a group, JSON mode only.
    pub fn write_summary(&mut self, summary: &SetSummary) -> Result<()> {
        if self.format == OutputFormat::Json {
            serde_json::to_writer(&mut self.out, summary)
                .map_err(std::io::Error::from)?;
            writeln!(self.out)?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
