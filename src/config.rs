use crate::bloom::ScalableFilterConfig;
use crate::error::{NoveltyError, Result};
use crate::trace::TerminatorFilter;
use derive_builder::Builder;

pub const DEFAULT_SEQ_LEN: usize = 32;

/// Everything a run needs to know before the first trace is opened.
#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct RunConfig {
    /// Number of source addresses per sequence
    #[builder(default = "DEFAULT_SEQ_LEN")]
    pub seq_len: usize,

    /// Transfer kinds that may end a counted sequence
    pub terminators: TerminatorFilter,

    /// Tuning of the run-wide model filter
    #[builder(default)]
    pub model_filter: ScalableFilterConfig,

    /// Tuning of the per-trace filter, rebuilt for every trace
    #[builder(default)]
    pub seen_filter: ScalableFilterConfig,
}

impl RunConfig {
    /// Pre-flight checks, run before the model filter is allocated.
    pub fn validate(&self) -> Result<()> {
        if self.seq_len == 0 {
            return Err(NoveltyError::InvalidSequenceLength(self.seq_len));
        }
        self.terminators.validate()?;
        self.model_filter.validate()?;
        self.seen_filter.validate()?;
        Ok(())
    }
}
