//! Control-flow novelty counting over execution traces.
//!
//! Every trace is a stream of control-flow transfer records. A sliding window
//! of `seq_len` source addresses turns the stream into sequences, and each
//! sequence whose last transfer is an enabled terminator (return, indirect
//! call, indirect jump) is tested against two scalable Bloom filters:
//!
//!    * Model: one filter for the whole run. A sequence it has not seen is
//!      "novel to the model".
//!    * Seen: a fresh filter per trace. A sequence it has not seen is
//!      "novel to the trace".
//!
//! The ratio of the two counters tells how much new behavior a trace adds
//! on top of every trace processed before it, which is what decides whether
//! a trace is worth keeping in a training set.
//!
//! Scalable Bloom filter:
//!     * A list of shards, each a plain Bloom filter sized for a capacity and
//!       an error target.
//!     * Queries hit all shards. Inserts go to the newest shard only.
//!     * A full shard is followed by one `growth_factor` times bigger with its
//!       error target multiplied by `tightening_ratio`, so the compound false
//!       positive rate stays under the configured one.
//!
//! Caveats:
//!     * False positives make the novelty counters undercount, never
//!       overcount.
//!     * The model only lives as long as the process, nothing is persisted.

pub mod bloom;
pub mod cancel;
pub mod common;
pub mod config;
mod error;
mod hash;
pub mod novelty;
pub mod report;
pub mod trace;

pub use bloom::{
    ApproximateSet, ApproximateSetStats, ScalableBloomFilter,
    ScalableFilterConfig, ScalableFilterConfigBuilder,
    ScalableFilterConfigBuilderError,
};
pub use cancel::CancelToken;
pub use config::{
    DEFAULT_SEQ_LEN, RunConfig, RunConfigBuilder, RunConfigBuilderError,
};
pub use error::{NoveltyError, Result};
pub use hash::{
    HashFunction, KeyDigest, default_hash_function, optimal_bit_vector_size,
    optimal_num_hashes,
};
pub use novelty::{
    NoveltyAccumulator, SetProcessor, SetSummary, TraceProcessor, TraceReport,
};
pub use report::{OutputFormat, ReportWriter, UNDEFINED_RATIO};
pub use trace::{
    Sequence, SlidingWindow, TEST_GROUP, TRACE_FILE_NAME, TRAIN_GROUP,
    TerminatorFilter, TraceReader, TraceSet, TransferKind, TransferRecord,
};
