#![allow(dead_code)]
use flate2::{Compression, write::GzEncoder};
use novelty_bloom_rs::TRACE_FILE_NAME;
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Temporary directory holding trace fixtures, removed on drop.
pub struct TraceDir {
    dir: TempDir,
}

impl TraceDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `records` as `<name>/trace_parsed.gz` and return the directory.
    pub fn trace(&self, name: &str, records: &[(u64, &str)]) -> PathBuf {
        let trace_dir = self.dir.path().join(name);
        std::fs::create_dir_all(&trace_dir).expect("Failed to create trace dir");

        let file = File::create(trace_dir.join(TRACE_FILE_NAME))
            .expect("Failed to create trace file");
        let mut encoder = GzEncoder::new(file, Compression::fast());
        for (source, kind) in records {
            writeln!(encoder, "{source:#x},0,{kind}")
                .expect("Failed to write record");
        }
        encoder.finish().expect("Failed to finish gzip stream");
        trace_dir
    }

    /// Write a plain text trace file and return its path.
    pub fn text_trace(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write trace");
        path
    }

    /// Write a set file with the given groups and return its path.
    pub fn set_file(&self, groups: &[(&str, &[PathBuf])]) -> PathBuf {
        let mut contents = String::new();
        for (label, traces) in groups {
            contents.push_str(&format!("[{label}]\n"));
            for trace in *traces {
                contents.push_str(&format!("{}\n", trace.display()));
            }
        }
        let path = self.dir.path().join("traces.set");
        std::fs::write(&path, contents).expect("Failed to write set file");
        path
    }
}

/// The reference trace: windows [1,2,3,4] and [3,4,5,6] end in returns.
pub const SCENARIO: &[(u64, &str)] = &[
    (1, "jmp"),
    (2, "jmp"),
    (3, "jmp"),
    (4, "ret"),
    (5, "jmp"),
    (6, "ret"),
];

// Helper function to generate consistent test data
pub fn generate_test_items(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("test_item_{:06}", i).into_bytes())
        .collect()
}
