use super::TransferRecord;
use crate::error::{NoveltyError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// File looked up inside a trace directory.
pub const TRACE_FILE_NAME: &str = "trace_parsed.gz";

/// Map a set-file location to the trace file to read.
///
/// Directories hold their trace as [`TRACE_FILE_NAME`]; anything else is
/// taken as the trace file itself.
pub fn resolve_trace_path(location: &Path) -> PathBuf {
    if location.is_dir() {
        location.join(TRACE_FILE_NAME)
    } else {
        location.to_path_buf()
    }
}

/// Lazy record stream over one trace file.
///
/// Yields `Ok(record)` per data line and `None` at end of file. `.gz`
/// files are decompressed on the fly.
pub struct TraceReader {
    path: PathBuf,
    lines: Box<dyn BufRead>,
    line_number: usize,
    buf: String,
}

impl TraceReader {
    /// Open the trace behind `location`. Anything that is not a directory
    /// is read as a stream, so named pipes work as well as files.
    pub fn open(location: &Path) -> Result<Self> {
        let path = resolve_trace_path(location);
        if !path.exists() || path.is_dir() {
            return Err(NoveltyError::TraceUnavailable { path });
        }

        let file = File::open(&path)?;
        let lines: Box<dyn BufRead> =
            if path.extension().is_some_and(|ext| ext == "gz") {
                Box::new(BufReader::new(GzDecoder::new(file)))
            } else {
                Box::new(BufReader::new(file))
            };

        Ok(Self {
            path,
            lines,
            line_number: 0,
            buf: String::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for TraceReader {
    type Item = Result<TransferRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.lines.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;

            match TransferRecord::parse_line(&self.buf) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(reason) => {
                    return Some(Err(NoveltyError::MalformedRecord {
                        path: self.path.clone(),
                        line: self.line_number,
                        reason,
                    }));
                }
            }
        }
    }
}

impl std::fmt::Debug for TraceReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceReader")
            .field("path", &self.path)
            .field("line_number", &self.line_number)
            .finish()
    }
}
