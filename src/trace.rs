//! Trace side of the pipeline: transfer records, the text trace reader,
//! terminator selection, the sliding window over source addresses and the
//! set file that groups traces.
pub mod reader;
pub mod record;
pub mod set_file;
pub mod terminator;
pub mod window;

pub use reader::{TRACE_FILE_NAME, TraceReader, resolve_trace_path};
pub use record::{TransferKind, TransferRecord};
pub use set_file::{TEST_GROUP, TRAIN_GROUP, TraceSet};
pub use terminator::TerminatorFilter;
pub use window::{Sequence, SlidingWindow};
