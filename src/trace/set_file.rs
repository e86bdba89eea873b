use crate::error::{NoveltyError, Result};
use std::path::{Path, PathBuf};

/// Default group names, in processing order.
pub const TRAIN_GROUP: &str = "b_train";
pub const TEST_GROUP: &str = "b_test";

/// Named groups of trace locations, as listed in a set file.
///
/// ```text
/// [b_train]
/// traces/run-001
/// traces/run-002
/// [b_test]
/// traces/run-101
/// ```
///
/// Locations before the first `[label]` header are ignored. A label that
/// appears twice keeps collecting into the same group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceSet {
    groups: Vec<(String, Vec<PathBuf>)>,
}

impl TraceSet {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(NoveltyError::SetFileMissing(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut set = Self::default();
        let mut current: Option<usize> = None;

        for line in contents.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            if let Some(label) =
                line.strip_prefix('[').and_then(|l| l.strip_suffix(']'))
            {
                current = Some(set.group_index(label));
            } else if let Some(index) = current {
                set.groups[index].1.push(PathBuf::from(line));
            }
        }
        set
    }

    fn group_index(&mut self, label: &str) -> usize {
        match self.groups.iter().position(|(name, _)| name == label) {
            Some(index) => index,
            None => {
                self.groups.push((label.to_string(), Vec::new()));
                self.groups.len() - 1
            }
        }
    }

    /// Trace locations of `label`, empty when the group is absent.
    pub fn group(&self, label: &str) -> &[PathBuf] {
        self.groups
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, traces)| traces.as_slice())
            .unwrap_or(&[])
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn total_traces(&self) -> usize {
        self.groups.iter().map(|(_, traces)| traces.len()).sum()
    }
}
